//! Terminal front end for [`hibp_range`].
//!
//! Each password, piped on stdin or typed at a masked prompt, is checked on its
//! own, one at a time, with a spinner shown while the range query is in flight. Results are rendered as
//! breached (with the occurrence count), safe, or check failed.

pub mod error;
pub mod outcome;
pub mod session;

pub use error::Error;
pub use outcome::{FailurePolicy, Outcome, format_count};
pub use session::{
    PasswordInput, RunOptions, Summary, TerminalPrompt, check_with_progress, run, spinner,
};
