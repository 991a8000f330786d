mod decoded;
mod snowflake;

pub use decoded::*;
pub use snowflake::*;

use crate::{Error, Result};

/// Parses a non-negative decimal integer, rejecting anything `u64::from_str`
/// rejects (signs other than `+`, whitespace, overflow).
pub(crate) fn parse_decimal(s: &str) -> Result<u64> {
    s.parse::<u64>().map_err(|_| Error::malformed(s))
}
