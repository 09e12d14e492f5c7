use std::future::Future;

use crate::digest::{PasswordHash, RangePrefix};
use crate::error::Error;
use crate::range::find_suffix;

/// Outcome of a single breach lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CheckResult {
    pub breached: bool,
    /// Number of times the password was seen in breaches; `0` when not breached.
    pub count: u64,
}

impl CheckResult {
    pub fn breached(count: u64) -> Self {
        Self { breached: true, count }
    }

    pub fn not_breached() -> Self {
        Self { breached: false, count: 0 }
    }
}

/// Something that can answer a range query for a hash prefix.
///
/// [`crate::RangeClient`] talks to the Pwned Passwords API; tests substitute
/// canned bodies.
pub trait RangeSource {
    /// Returns the raw `SUFFIX:COUNT` body for `prefix`.
    fn fetch_range(&self, prefix: RangePrefix)
    -> impl Future<Output = Result<String, Error>> + Send;

    /// Whether bodies carry `SUFFIX:0` padding decoys.
    fn padded(&self) -> bool {
        false
    }
}

/// Checks `password` against `source`.
///
/// Only the 5 character hash prefix is handed to `source`; the suffix is
/// compared locally. Errors from the range query propagate unchanged.
pub async fn check_password<S: RangeSource>(
    source: &S,
    password: &str,
) -> Result<CheckResult, Error> {
    let hash = PasswordHash::of(password);
    let body = source.fetch_range(hash.prefix()).await?;
    Ok(find_suffix(&body, hash.suffix(), source.padded()))
}
