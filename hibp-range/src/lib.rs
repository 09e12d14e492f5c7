//! Password breach checking against the Have I Been Pwned range API.
//!
//! The password never leaves the process. It is hashed with SHA1, and only the
//! first 5 hex characters of the hash are sent to
//! `https://api.pwnedpasswords.com/range/{PREFIX}`. The API answers with every
//! breached hash suffix sharing that prefix, and the remaining 35 characters
//! are matched locally.
//!
//! # Usage
//!
//! ```no_run
//! use hibp_range::RangeClient;
//!
//! # async fn run() -> Result<(), hibp_range::Error> {
//! let client = RangeClient::new()?;
//! let result = client.check_password("password123").await?;
//! if result.breached {
//!     println!("seen {} times in breaches", result.count);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Any type implementing [`RangeSource`] can stand in for the HTTP client,
//! which is how the lookup is tested without network access.

pub mod check;
pub mod client;
pub mod digest;
pub mod error;
pub mod range;

pub use check::{CheckResult, RangeSource, check_password};
pub use client::{ClientConfig, DEFAULT_BASE_URL, RangeClient};
pub use digest::{HASH_HEX_LEN, PREFIX_LEN, PasswordHash, RangePrefix, SUFFIX_LEN};
pub use error::Error;
pub use range::{RangeEntry, find_suffix};
