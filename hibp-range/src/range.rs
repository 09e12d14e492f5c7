//! Parsing and scanning of range API response bodies.
//!
//! A body is a list of `SUFFIX:COUNT` lines, one per breached hash sharing the
//! queried prefix. Bodies are small (a few hundred to a few thousand lines), so
//! a linear scan in received order is all that is needed.

use std::num::IntErrorKind;

use tracing::warn;

use crate::check::CheckResult;

/// One `SUFFIX:COUNT` line of a range response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeEntry<'a> {
    pub suffix: &'a str,
    count: &'a str,
}

impl<'a> RangeEntry<'a> {
    /// Splits `line` on its first colon and trims both halves.
    ///
    /// Returns `None` for lines without a colon (blank lines, trailing
    /// newline).
    #[inline]
    pub fn parse(line: &'a str) -> Option<Self> {
        let (suffix, count) = line.split_once(':')?;
        Some(Self { suffix: suffix.trim(), count: count.trim() })
    }

    /// Parses the occurrence count. Only done for the matching line.
    ///
    /// Counts too large for a `u64` saturate; a non-numeric count is `None`.
    pub fn count(&self) -> Option<u64> {
        match self.count.parse::<u64>() {
            Ok(count) => Some(count),
            Err(e) if *e.kind() == IntErrorKind::PosOverflow => Some(u64::MAX),
            Err(_) => None,
        }
    }
}

/// Scans `body` for `suffix` and reports how often it was seen in breaches.
///
/// Comparison is exact and case-sensitive, and any matching line is a breach.
/// A match with an unreadable count is reported as breached with count `0`.
/// When `padded` is set the body was requested with `Add-Padding`, and a
/// match with count `0` is one of the decoys, so it is not a breach.
pub fn find_suffix(body: &str, suffix: &str, padded: bool) -> CheckResult {
    let Some(entry) = body.lines().filter_map(RangeEntry::parse).find(|e| e.suffix == suffix)
    else {
        return CheckResult::not_breached();
    };

    match entry.count() {
        Some(0) if padded => CheckResult::not_breached(),
        Some(count) => CheckResult::breached(count),
        None => {
            warn!(count = entry.count, "matching range entry has a non-numeric count");
            CheckResult::breached(0)
        }
    }
}
