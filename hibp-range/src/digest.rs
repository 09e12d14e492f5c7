use std::fmt;

use sha1::{Digest, Sha1};

/// The length of a full SHA1 hash rendered as hex.
pub const HASH_HEX_LEN: usize = 40;

/// The length of the hash prefix sent to the range API (5 hex characters).
pub const PREFIX_LEN: usize = 5;

/// The length of the suffix that is only ever compared locally.
pub const SUFFIX_LEN: usize = HASH_HEX_LEN - PREFIX_LEN;

/// Hex lookup table for uppercase rendering.
pub const HEX_CHARS: &[u8; 16] = b"0123456789ABCDEF";

/// Uppercase hex SHA1 of a password.
///
/// The full hash is sensitive (it can be cracked offline), so `Debug` only
/// shows the prefix.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash {
    hex: [u8; HASH_HEX_LEN],
}

impl PasswordHash {
    /// Hashes the UTF-8 bytes of `password`. Never fails, including for "".
    pub fn of(password: &str) -> Self {
        let mut hasher = Sha1::new();
        hasher.update(password.as_bytes());
        let hash: [u8; 20] = hasher.finalize().into();

        let mut hex = [0u8; HASH_HEX_LEN];
        for (i, byte) in hash.iter().enumerate() {
            hex[i * 2] = HEX_CHARS[(byte >> 4) as usize];
            hex[i * 2 + 1] = HEX_CHARS[(byte & 0x0f) as usize];
        }

        Self { hex }
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        // SAFETY: every byte comes from HEX_CHARS, which is ASCII.
        unsafe { std::str::from_utf8_unchecked(&self.hex) }
    }

    /// The part of the hash that is sent to the range API.
    #[inline]
    pub fn prefix(&self) -> RangePrefix {
        let mut prefix = [0u8; PREFIX_LEN];
        prefix.copy_from_slice(&self.hex[..PREFIX_LEN]);
        RangePrefix(prefix)
    }

    /// The part of the hash that never leaves the process.
    #[inline]
    pub fn suffix(&self) -> &str {
        &self.as_str()[PREFIX_LEN..]
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordHash")
            .field("prefix", &self.prefix().as_str())
            .finish_non_exhaustive()
    }
}

/// A 5 character uppercase hex prefix naming one range of the breach corpus.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct RangePrefix([u8; PREFIX_LEN]);

impl RangePrefix {
    #[inline]
    pub fn as_str(&self) -> &str {
        // SAFETY: constructed only from ASCII hex digits.
        unsafe { std::str::from_utf8_unchecked(&self.0) }
    }
}

impl fmt::Display for RangePrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for RangePrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RangePrefix({})", self.as_str())
    }
}
