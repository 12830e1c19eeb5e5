//! Synthetic I/O descriptor

use crate::config::workload::{Asu, BLOCK_SIZE};
use crate::error::Spc1Error;
use crate::Result;
use std::fmt;
use std::time::Duration;

/// One synthetic I/O request
///
/// Lengths and offsets are in 4 KiB blocks relative to the start of the ASU.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IoDescriptor {
    /// Target ASU
    pub asu: Asu,
    /// Read (true) or write (false)
    pub is_read: bool,
    /// Transfer length in blocks
    pub blocks: u32,
    /// Stream within the ASU (0-based)
    pub stream: u32,
    /// Starting block within the ASU
    pub offset: u32,
    /// Scheduled issue time relative to the start of the run
    pub when: Duration,
}

impl IoDescriptor {
    /// Byte offset within the ASU
    pub fn offset_bytes(&self) -> u64 {
        u64::from(self.offset) * BLOCK_SIZE
    }

    /// Transfer length in bytes
    pub fn len_bytes(&self) -> u64 {
        u64::from(self.blocks) * BLOCK_SIZE
    }

    /// Check that the descriptor fits inside an ASU of `asu_size` blocks
    /// with `streams` streams
    pub(crate) fn check_bounds(&self, asu_size: u32, streams: u32) -> Result<()> {
        if self.blocks == 0 {
            return Err(Spc1Error::fault("descriptor with zero-length transfer"));
        }
        if u64::from(self.offset) + u64::from(self.blocks) > u64::from(asu_size) {
            return Err(Spc1Error::fault(format!(
                "offset {} + {} blocks exceeds ASU{} size {}",
                self.offset, self.blocks, self.asu, asu_size
            )));
        }
        if self.stream >= streams {
            return Err(Spc1Error::fault(format!(
                "stream {} out of range for ASU{} ({} streams)",
                self.stream, self.asu, streams
            )));
        }
        Ok(())
    }
}

impl fmt::Display for IoDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "asu={}:rw={}:blocks={}:stream={}:offset={}:when={:?}",
            self.asu, self.is_read, self.blocks, self.stream, self.offset, self.when
        )
    }
}
