//! Width oracles: the injected source of per-codepoint display widths.
//!
//! An oracle answers `-1` (no displayable width), `0`, `1` or `2`. Any other
//! answer is rejected by the scanner, so oracles may be thin wrappers over
//! foreign functions without validating their own output.

mod unicode;

#[cfg(unix)]
mod locale;

pub use unicode::UnicodeOracle;

#[cfg(unix)]
pub use locale::LocaleOracle;

use crate::core::errors::TableError;
use serde::{Deserialize, Serialize};

/// Source of per-codepoint display widths.
pub trait WidthOracle {
    /// Width of `codepoint`, or `-1` when it has none.
    fn width(&self, codepoint: u32) -> i32;
}

impl<F> WidthOracle for F
where
    F: Fn(u32) -> i32,
{
    fn width(&self, codepoint: u32) -> i32 {
        self(codepoint)
    }
}

/// Built-in oracle selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OracleKind {
    /// UAX #11 widths from the `unicode-width` tables
    #[default]
    Unicode,
    /// UAX #11 widths with East Asian Ambiguous treated as wide
    UnicodeCjk,
    /// The C library's `wcwidth` under a configured locale
    Libc,
}

impl OracleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OracleKind::Unicode => "unicode",
            OracleKind::UnicodeCjk => "unicode_cjk",
            OracleKind::Libc => "libc",
        }
    }

    /// Instantiates the oracle. `locale` is only consulted by [`OracleKind::Libc`].
    pub fn open(self, locale: &str) -> Result<Box<dyn WidthOracle>, TableError> {
        match self {
            OracleKind::Unicode => Ok(Box::new(UnicodeOracle::new(false))),
            OracleKind::UnicodeCjk => Ok(Box::new(UnicodeOracle::new(true))),
            OracleKind::Libc => open_locale(locale),
        }
    }
}

#[cfg(unix)]
fn open_locale(locale: &str) -> Result<Box<dyn WidthOracle>, TableError> {
    Ok(Box::new(LocaleOracle::new(locale)?))
}

#[cfg(not(unix))]
fn open_locale(_locale: &str) -> Result<Box<dyn WidthOracle>, TableError> {
    Err(TableError::environment(
        "the libc width oracle is only available on unix targets",
        "use --oracle unicode instead",
    ))
}
