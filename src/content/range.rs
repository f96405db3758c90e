//! `Range` header parsing
//!
//! Only a single `bytes=start-end` range is supported, `end` optional.
//! Suffix ranges (`bytes=-500`), multiple ranges and other units are
//! treated as unsatisfiable.

use crate::error::{AppError, Result};

/// Inclusive byte range within a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: u64,
    pub end: u64,
}

impl ByteRange {
    pub fn len(&self) -> u64 {
        self.end - self.start + 1
    }

    /// `Content-Range` value for a satisfied range
    pub fn content_range(&self, size: u64) -> String {
        format!("bytes {}-{}/{}", self.start, self.end, size)
    }
}

/// Parse and validate a `Range` header against a resource of `size` bytes
pub fn parse_range(header: &str, size: u64) -> Result<ByteRange> {
    let unsatisfiable = || AppError::RangeNotSatisfiable { size };

    let range_set = header
        .trim()
        .strip_prefix("bytes=")
        .ok_or_else(unsatisfiable)?;
    let (start, end) = range_set.split_once('-').ok_or_else(unsatisfiable)?;

    let start: u64 = start.trim().parse().map_err(|_| unsatisfiable())?;
    let end: u64 = match end.trim() {
        "" => size.checked_sub(1).ok_or_else(unsatisfiable)?,
        end => end.parse().map_err(|_| unsatisfiable())?,
    };

    if start > end || end >= size {
        return Err(unsatisfiable());
    }

    Ok(ByteRange { start, end })
}
