//! Segment rotation.

use super::naming::SegmentName;
use super::Segment;
use crate::config::WriterConfig;
use crate::error::{CoreError, CoreResult};
use crate::types::{Clock, WarcDate};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use warcwriter_storage::{FileBackend, StorageError};

/// Mutable rotation state: the open segment and the next serial to hand out.
#[derive(Debug, Default)]
pub struct WriterState {
    current: Option<Segment>,
    next_serial: u64,
}

impl WriterState {
    /// The open segment, if any.
    #[must_use]
    pub fn current(&self) -> Option<&Segment> {
        self.current.as_ref()
    }

    /// Serial the next rotation will use.
    #[must_use]
    pub fn next_serial(&self) -> u64 {
        self.next_serial
    }
}

/// Outcome of [`SegmentManager::maybe_rotate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationResult {
    /// Whether a new segment was opened.
    pub rolled: bool,
    /// Path of the new segment, when one was opened.
    pub new_path: Option<PathBuf>,
}

impl RotationResult {
    fn kept() -> Self {
        Self {
            rolled: false,
            new_path: None,
        }
    }
}

/// Decides when to start a new segment and creates it.
///
/// Size accounting is pessimistic: the on-disk (compressed) size of the
/// current segment plus the caller's uncompressed estimate is compared with
/// the limit.
#[derive(Debug)]
pub struct SegmentManager {
    output_dir: PathBuf,
    check_destination: bool,
    prefix: String,
    host: String,
    serial_width: usize,
    max_serial: u64,
    max_segment_size: u64,
    clock: Arc<dyn Clock>,
    state: WriterState,
}

impl SegmentManager {
    /// Creates a manager with no open segment.
    #[must_use]
    pub fn new(config: &WriterConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            output_dir: config.output_dir.clone(),
            check_destination: config.has_output_dir(),
            prefix: config.prefix.clone(),
            host: config.resolved_host(),
            serial_width: config.serial_width,
            max_serial: config.max_serial(),
            max_segment_size: config.max_segment_size,
            clock,
            state: WriterState::default(),
        }
    }

    /// Rotation state.
    #[must_use]
    pub fn state(&self) -> &WriterState {
        &self.state
    }

    /// The open segment, if any.
    #[must_use]
    pub fn current(&self) -> Option<&Segment> {
        self.state.current.as_ref()
    }

    /// The open segment, mutably.
    pub fn current_mut(&mut self) -> Option<&mut Segment> {
        self.state.current.as_mut()
    }

    /// Makes `segment` the open segment.
    ///
    /// The serial counter moves past the segment's serial so later rotations
    /// never reuse it.
    pub fn adopt(&mut self, segment: Segment) {
        self.state.next_serial = self.state.next_serial.max(segment.serial() + 1);
        self.state.current = Some(segment);
    }

    /// Opens a new segment if `additional_bytes` would not fit.
    ///
    /// Rotates when no segment is open, when the open segment's file has
    /// disappeared, or when `size + additional_bytes >= max_segment_size`.
    /// On failure the previous segment stays current and no serial is
    /// consumed.
    ///
    /// # Errors
    ///
    /// - [`CoreError::SerialOverflow`] if the serial width is exhausted
    /// - [`CoreError::DestinationMissing`] if the output directory is gone
    /// - [`CoreError::Collision`] if the new file name is already taken
    pub fn maybe_rotate(&mut self, additional_bytes: u64) -> CoreResult<RotationResult> {
        self.segment_for(additional_bytes)
            .map(|(rotation, _)| rotation)
    }

    /// Like [`SegmentManager::maybe_rotate`], but also hands out the segment
    /// the next `additional_bytes` should be written to.
    ///
    /// # Errors
    ///
    /// See [`SegmentManager::maybe_rotate`].
    pub fn segment_for(
        &mut self,
        additional_bytes: u64,
    ) -> CoreResult<(RotationResult, &mut Segment)> {
        if self.needs_rotation(additional_bytes)? {
            let segment = self.rotate()?;
            let rotation = RotationResult {
                rolled: true,
                new_path: Some(segment.path().to_path_buf()),
            };
            return Ok((rotation, segment));
        }

        // needs_rotation is true whenever no segment is open.
        let segment = self
            .state
            .current
            .as_mut()
            .ok_or(StorageError::Closed)?;
        Ok((RotationResult::kept(), segment))
    }

    fn needs_rotation(&self, additional_bytes: u64) -> CoreResult<bool> {
        let Some(segment) = &self.state.current else {
            return Ok(true);
        };

        if !segment.is_present() {
            warn!(path = %segment.path().display(), "current segment disappeared");
            return Ok(true);
        }

        let size = segment.size()?;
        Ok(size.saturating_add(additional_bytes) >= self.max_segment_size)
    }

    fn rotate(&mut self) -> CoreResult<&mut Segment> {
        let serial = self.state.next_serial;
        if serial > self.max_serial {
            return Err(CoreError::SerialOverflow {
                serial,
                max: self.max_serial,
            });
        }

        if self.check_destination && !self.output_dir.exists() {
            return Err(CoreError::DestinationMissing {
                path: self.output_dir.clone(),
            });
        }

        let name = SegmentName {
            prefix: self.prefix.clone(),
            created: WarcDate::from_datetime(self.clock.now()),
            serial,
            width: self.serial_width,
            host: self.host.clone(),
        };
        let path = self.output_dir.join(name.to_string());
        if path.exists() {
            return Err(CoreError::Collision { path });
        }

        let backend = FileBackend::create_new(&path).map_err(|e| match e {
            StorageError::AlreadyExists { path } => CoreError::Collision { path },
            other => CoreError::Storage(other),
        })?;

        info!(path = %path.display(), serial, "opened new segment");
        self.state.next_serial = serial + 1;
        Ok(self
            .state
            .current
            .insert(Segment::new(path, serial, Box::new(backend))))
    }
}
