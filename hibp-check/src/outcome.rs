use std::fmt;

use hibp_range::{CheckResult, Error};
use serde::Serialize;
use tracing::error;

/// What to show when a check could not be completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Log the failure and show the password as safe.
    #[default]
    AssumeSafe,
    /// Show a distinct "check failed" result.
    Report,
}

/// The result shown to the user for one password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Breached { count: u64 },
    Safe,
    CheckFailed { reason: String },
}

impl Outcome {
    pub fn from_check(result: Result<CheckResult, Error>, policy: FailurePolicy) -> Self {
        match result {
            Ok(CheckResult { breached: true, count }) => Outcome::Breached { count },
            Ok(_) => Outcome::Safe,
            Err(e) => {
                error!(error = %e, "Error checking password");
                match policy {
                    FailurePolicy::AssumeSafe => Outcome::Safe,
                    FailurePolicy::Report => Outcome::CheckFailed { reason: e.to_string() },
                }
            }
        }
    }

    pub fn headline(&self) -> &'static str {
        match self {
            Outcome::Breached { .. } => "Password Has Been Compromised!",
            Outcome::Safe => "Password Appears Safe!",
            Outcome::CheckFailed { .. } => "Password Check Failed",
        }
    }

    pub fn detail(&self) -> String {
        match self {
            Outcome::Breached { count: 0 } => "Found in an unknown number of data breaches".to_string(),
            Outcome::Breached { count } => format!("Found in {} data breaches", format_count(*count)),
            Outcome::Safe => "No breaches found containing this password".to_string(),
            Outcome::CheckFailed { reason } => format!("Could not query the breach database: {reason}"),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n{}", self.headline(), self.detail())
    }
}

/// Formats `n` with comma thousands separators, e.g. `3,730,471`.
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
