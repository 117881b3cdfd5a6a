//! Writer configuration.

use crate::error::{CoreError, CoreResult};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use warcwriter_codec::CompressionConfig;

/// Published WARC 1.0 specification, written as `conformsTo`.
pub const WARC_SPEC_URL: &str =
    "https://iipc.github.io/warc-specifications/specifications/warc-format/warc-1.0/";

/// Value written as `format` in `warcinfo` records.
pub const WARC_FORMAT: &str = "WARC file version 1.0";

/// How the crawler treated `robots.txt`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CrawlPolicy {
    /// robots.txt rules were honoured.
    #[default]
    Obey,
    /// robots.txt rules were ignored.
    Ignore,
}

impl CrawlPolicy {
    /// Value written as `robots` in `warcinfo` records.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Obey => "obey",
            Self::Ignore => "ignore",
        }
    }
}

impl fmt::Display for CrawlPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CrawlPolicy {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "obey" => Ok(Self::Obey),
            "ignore" => Ok(Self::Ignore),
            other => Err(CoreError::invalid_config(format!(
                "unknown robots policy {other:?} (expected obey or ignore)"
            ))),
        }
    }
}

/// Configuration for a [`crate::WarcWriter`].
///
/// The output directory and size limit have no defaults and must be given
/// to [`WriterConfig::new`]. Everything else is set with builder methods.
#[derive(Debug, Clone)]
pub struct WriterConfig {
    /// Directory segments are written to. An empty path means the working
    /// directory.
    pub output_dir: PathBuf,

    /// Maximum segment size in bytes before rotating.
    pub max_segment_size: u64,

    /// File name prefix, the first component of every segment name.
    pub prefix: String,

    /// Contact for the archive operator.
    pub operator: String,

    /// Collection the archive belongs to (`isPartOf`).
    pub collection: String,

    /// Free-text description of the crawl.
    pub description: String,

    /// Robots policy of the crawl.
    pub robots: CrawlPolicy,

    /// User agent the crawler declared.
    pub user_agent: String,

    /// Host identifier used in segment names; `None` uses the machine's
    /// short host name.
    pub host: Option<String>,

    /// Digit width of the zero-padded serial.
    pub serial_width: usize,

    /// Gzip settings for every record.
    pub compression: CompressionConfig,

    /// Whether to fsync the segment after each record.
    pub sync_on_write: bool,

    /// Software identification for `warcinfo`.
    pub software: String,

    /// Value of `conformsTo` in `warcinfo`.
    pub conforms_to: String,
}

impl WriterConfig {
    /// Creates a configuration with the two required settings.
    #[must_use]
    pub fn new(output_dir: impl Into<PathBuf>, max_segment_size: u64) -> Self {
        Self {
            output_dir: output_dir.into(),
            max_segment_size,
            prefix: "rec".to_string(),
            operator: String::new(),
            collection: String::new(),
            description: String::new(),
            robots: CrawlPolicy::Obey,
            user_agent: String::new(),
            host: None,
            serial_width: 5,
            compression: CompressionConfig::default(),
            sync_on_write: true,
            software: format!("warcwriter/{}", crate::VERSION),
            conforms_to: WARC_SPEC_URL.to_string(),
        }
    }

    /// Sets the segment name prefix.
    #[must_use]
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Sets the operator contact.
    #[must_use]
    pub fn operator(mut self, operator: impl Into<String>) -> Self {
        self.operator = operator.into();
        self
    }

    /// Sets the collection name.
    #[must_use]
    pub fn collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    /// Sets the crawl description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the robots policy.
    #[must_use]
    pub const fn robots(mut self, robots: CrawlPolicy) -> Self {
        self.robots = robots;
        self
    }

    /// Sets the declared user agent.
    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Overrides the host identifier.
    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Sets the serial digit width.
    #[must_use]
    pub const fn serial_width(mut self, width: usize) -> Self {
        self.serial_width = width;
        self
    }

    /// Sets the gzip level (0-9).
    #[must_use]
    pub const fn compression_level(mut self, level: u32) -> Self {
        self.compression = CompressionConfig { level };
        self
    }

    /// Sets whether to sync after every record.
    #[must_use]
    pub const fn sync_on_write(mut self, value: bool) -> Self {
        self.sync_on_write = value;
        self
    }

    /// Sets the software identification.
    #[must_use]
    pub fn software(mut self, software: impl Into<String>) -> Self {
        self.software = software.into();
        self
    }

    /// Largest serial the configured width can represent.
    #[must_use]
    pub fn max_serial(&self) -> u64 {
        u32::try_from(self.serial_width)
            .ok()
            .and_then(|w| 10u64.checked_pow(w))
            .map_or(u64::MAX, |n| n - 1)
    }

    /// Returns the host identifier used in segment names.
    #[must_use]
    pub fn resolved_host(&self) -> String {
        match &self.host {
            Some(host) => short_name(host),
            None => short_hostname(),
        }
    }

    /// Returns true if a destination directory was configured explicitly.
    #[must_use]
    pub fn has_output_dir(&self) -> bool {
        !self.output_dir.as_os_str().is_empty()
    }

    /// Returns the directory segments are written to.
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Checks the configuration for values the writer cannot work with.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidConfig`] describing the first problem.
    pub fn validate(&self) -> CoreResult<()> {
        if self.max_segment_size == 0 {
            return Err(CoreError::invalid_config("max_segment_size must be positive"));
        }
        if !(1..=9).contains(&self.serial_width) {
            return Err(CoreError::invalid_config(format!(
                "serial_width must be between 1 and 9, got {}",
                self.serial_width
            )));
        }
        validate_name_part("prefix", &self.prefix)?;
        validate_name_part("host", &self.resolved_host())?;
        self.compression
            .validate()
            .map_err(|e| CoreError::invalid_config(e.to_string()))?;
        Ok(())
    }
}

fn validate_name_part(what: &str, value: &str) -> CoreResult<()> {
    if value.is_empty() {
        return Err(CoreError::invalid_config(format!("{what} must not be empty")));
    }
    if value
        .chars()
        .any(|c| matches!(c, '/' | '\\') || c.is_whitespace() || c.is_control())
    {
        return Err(CoreError::invalid_config(format!(
            "{what} {value:?} cannot be used in a file name"
        )));
    }
    Ok(())
}

fn short_name(host: &str) -> String {
    host.split('.').next().unwrap_or(host).to_string()
}

/// Returns the first label of the machine's host name.
///
/// Looks at `HOSTNAME`, then the kernel's host name files, and falls back to
/// `localhost`.
#[must_use]
pub fn short_hostname() -> String {
    let from_env = std::env::var("HOSTNAME").ok();
    let from_files = || {
        ["/proc/sys/kernel/hostname", "/etc/hostname"]
            .iter()
            .find_map(|p| std::fs::read_to_string(p).ok())
    };

    from_env
        .or_else(from_files)
        .map(|h| short_name(h.trim()))
        .filter(|h| !h.is_empty())
        .unwrap_or_else(|| "localhost".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = WriterConfig::new("/tmp/out", 1000);
        assert_eq!(config.prefix, "rec");
        assert_eq!(config.serial_width, 5);
        assert_eq!(config.max_serial(), 99_999);
        assert_eq!(config.robots, CrawlPolicy::Obey);
        assert!(config.sync_on_write);
        assert!(config.software.starts_with("warcwriter/"));
        assert_eq!(config.conforms_to, WARC_SPEC_URL);
    }

    #[test]
    fn builder_pattern() {
        let config = WriterConfig::new("out", 10)
            .prefix("TLA")
            .operator("ops@example.org")
            .collection("quotes")
            .description("test crawl")
            .robots(CrawlPolicy::Ignore)
            .user_agent("bot/1.0")
            .host("crawler01.example.org")
            .serial_width(3)
            .compression_level(9)
            .sync_on_write(false);

        assert_eq!(config.prefix, "TLA");
        assert_eq!(config.operator, "ops@example.org");
        assert_eq!(config.collection, "quotes");
        assert_eq!(config.robots.as_str(), "ignore");
        assert_eq!(config.resolved_host(), "crawler01");
        assert_eq!(config.max_serial(), 999);
        assert_eq!(config.compression.level, 9);
        assert!(!config.sync_on_write);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_zero_size() {
        let config = WriterConfig::new("out", 0).host("h");
        assert!(matches!(
            config.validate(),
            Err(CoreError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn validate_rejects_bad_width() {
        assert!(WriterConfig::new("out", 1).host("h").serial_width(0).validate().is_err());
        assert!(WriterConfig::new("out", 1).host("h").serial_width(10).validate().is_err());
    }

    #[test]
    fn validate_rejects_bad_prefix() {
        for prefix in ["", "a/b", "with space"] {
            let config = WriterConfig::new("out", 1).host("h").prefix(prefix);
            assert!(config.validate().is_err(), "{prefix:?} should be rejected");
        }
    }

    #[test]
    fn validate_rejects_bad_level() {
        let config = WriterConfig::new("out", 1).host("h").compression_level(12);
        assert!(config.validate().is_err());
    }

    #[test]
    fn output_dir_presence() {
        assert!(WriterConfig::new("out", 1).has_output_dir());
        assert!(!WriterConfig::new("", 1).has_output_dir());
    }

    #[test]
    fn crawl_policy_parse() {
        assert_eq!("obey".parse::<CrawlPolicy>().unwrap(), CrawlPolicy::Obey);
        assert_eq!("IGNORE".parse::<CrawlPolicy>().unwrap(), CrawlPolicy::Ignore);
        assert!("sometimes".parse::<CrawlPolicy>().is_err());
    }

    #[test]
    fn hostname_is_short() {
        let host = short_hostname();
        assert!(!host.is_empty());
        assert!(!host.contains('.'));
    }
}
