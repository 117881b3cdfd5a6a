//! warcwriter CLI
//!
//! Command-line tools for writing and checking WARC segments.
//!
//! # Commands
//!
//! - `record` - Archive exchanges read from a JSON lines file
//! - `inspect` - List the records of a segment
//! - `verify` - Check segment structure and record linkage in a directory

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use warcwriter_core::CrawlPolicy;

/// warcwriter command-line archive tools.
#[derive(Parser)]
#[command(name = "warcwriter")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Archive exchanges from a JSON lines file
    Record {
        /// JSON lines file, one exchange per line
        #[arg(short, long)]
        input: PathBuf,

        /// Directory to write segments to
        #[arg(short, long)]
        output_dir: PathBuf,

        /// Maximum segment size in bytes
        #[arg(short, long)]
        max_segment_size: u64,

        /// Segment name prefix
        #[arg(long, default_value = "rec")]
        prefix: String,

        /// Operator contact
        #[arg(long, default_value = "")]
        operator: String,

        /// Collection name
        #[arg(long, default_value = "")]
        collection: String,

        /// Crawl description
        #[arg(long, default_value = "")]
        description: String,

        /// Robots policy (obey, ignore)
        #[arg(long, default_value = "obey")]
        robots: CrawlPolicy,

        /// Declared crawler user agent
        #[arg(long, default_value = "")]
        user_agent: String,

        /// Host identifier for segment names
        #[arg(long)]
        host: Option<String>,
    },

    /// List the records of a segment
    Inspect {
        /// Segment file
        file: PathBuf,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Verify all segments in a directory
    Verify {
        /// Directory holding segments
        dir: PathBuf,
    },

    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Record {
            input,
            output_dir,
            max_segment_size,
            prefix,
            operator,
            collection,
            description,
            robots,
            user_agent,
            host,
        } => {
            let mut config = warcwriter_core::WriterConfig::new(output_dir, max_segment_size)
                .prefix(prefix)
                .operator(operator)
                .collection(collection)
                .description(description)
                .robots(robots)
                .user_agent(user_agent)
                .software(format!("warcwriter-cli/{}", env!("CARGO_PKG_VERSION")));
            if let Some(host) = host {
                config = config.host(host);
            }
            commands::record::run(&input, config)?;
        }
        Commands::Inspect { file, format } => {
            commands::inspect::run(&file, &format)?;
        }
        Commands::Verify { dir } => {
            commands::verify::run(&dir)?;
        }
        Commands::Version => {
            println!("warcwriter CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("warcwriter core v{}", warcwriter_core::VERSION);
        }
    }

    Ok(())
}
