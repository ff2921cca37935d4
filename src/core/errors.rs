use std::fmt;

/// Errors that can occur while building or reading a width table.
#[derive(Debug, PartialEq, Eq)]
pub enum TableError {
    /// The oracle reported a width outside {-1, 0, 1, 2}
    UnexpectedWidth { codepoint: u32, width: i32 },
    /// The width oracle could not be initialized (e.g. missing locale)
    Environment { message: String, hint: String },
    /// Trie shift parameters are out of range
    InvalidParams { shift1: u32, shift2: u32, reason: String },
    /// A run handed to the sparse encoder is out of bounds or out of order
    InvalidRun { start: u32, end: u32, reason: String },
    /// The serialized layout cannot be addressed with 32-bit offsets
    TableTooLarge { size: usize },
    /// A serialized table failed structural validation
    Malformed { offset: usize, reason: String },
    /// A built table disagrees with the oracle it was built from
    VerificationFailed {
        codepoint: u32,
        expected: u8,
        actual: u8,
    },
}

impl TableError {
    /// Create an Environment error with a remediation hint
    pub fn environment(message: impl Into<String>, hint: impl Into<String>) -> Self {
        TableError::Environment {
            message: message.into(),
            hint: hint.into(),
        }
    }

    /// Create an InvalidParams error
    pub fn invalid_params(shift1: u32, shift2: u32, reason: impl Into<String>) -> Self {
        TableError::InvalidParams {
            shift1,
            shift2,
            reason: reason.into(),
        }
    }

    /// Create an InvalidRun error
    pub fn invalid_run(start: u32, end: u32, reason: impl Into<String>) -> Self {
        TableError::InvalidRun {
            start,
            end,
            reason: reason.into(),
        }
    }

    /// Create a Malformed error pointing at a byte offset
    pub fn malformed(offset: usize, reason: impl Into<String>) -> Self {
        TableError::Malformed {
            offset,
            reason: reason.into(),
        }
    }
}

fn write_error(f: &mut fmt::Formatter<'_>, use_color: bool, message: &str) -> fmt::Result {
    if use_color {
        write!(f, "\x1b[1;31merror:\x1b[0m {}", message)
    } else {
        write!(f, "error: {}", message)
    }
}

fn write_hint(f: &mut fmt::Formatter<'_>, use_color: bool, hint: &str) -> fmt::Result {
    if use_color {
        write!(f, "\n\x1b[1;36mhint:\x1b[0m {}", hint)
    } else {
        write!(f, "\nhint: {}", hint)
    }
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let use_color = should_use_color();

        match self {
            TableError::UnexpectedWidth { codepoint, width } => {
                write_error(
                    f,
                    use_color,
                    &format!("unexpected width {} at U+{:06X}", width, codepoint),
                )?;
                write_hint(
                    f,
                    use_color,
                    "the width oracle must only report -1, 0, 1 or 2",
                )
            }
            TableError::Environment { message, hint } => {
                write_error(f, use_color, message)?;
                write_hint(f, use_color, hint)
            }
            TableError::InvalidParams {
                shift1,
                shift2,
                reason,
            } => {
                write_error(
                    f,
                    use_color,
                    &format!("invalid trie shifts {}/{}: {}", shift1, shift2, reason),
                )?;
                write_hint(f, use_color, "shifts must satisfy 0 < shift2 <= shift1 <= 21")
            }
            TableError::InvalidRun { start, end, reason } => {
                write_error(
                    f,
                    use_color,
                    &format!("invalid run U+{:06X}..U+{:06X}: {}", start, end, reason),
                )?;
                write_hint(
                    f,
                    use_color,
                    "runs must lie within U+0000..U+10FFFF and ascend within each width class",
                )
            }
            TableError::TableTooLarge { size } => write_error(
                f,
                use_color,
                &format!(
                    "table of {} bytes cannot be addressed with 32-bit offsets",
                    size
                ),
            ),
            TableError::Malformed { offset, reason } => write_error(
                f,
                use_color,
                &format!("malformed width table at byte {}: {}", offset, reason),
            ),
            TableError::VerificationFailed {
                codepoint,
                expected,
                actual,
            } => {
                write_error(
                    f,
                    use_color,
                    &format!(
                        "table lookup for U+{:06X} returned 0x{:02X}, oracle says 0x{:02X}",
                        codepoint, actual, expected
                    ),
                )?;
                write_hint(f, use_color, "no artifact was written")
            }
        }
    }
}

impl std::error::Error for TableError {}

/// Formats a non-fatal diagnostic the way the CLI prints warnings.
pub(crate) fn warning_line(message: &str, use_color: bool) -> String {
    if use_color {
        format!("\x1b[1;33mwarning:\x1b[0m {}", message)
    } else {
        format!("warning: {}", message)
    }
}

/// Prints a warning to stderr, coloured when stderr is a terminal.
pub(crate) fn warn(message: &str) {
    eprintln!("{}", warning_line(message, should_use_color()));
}

/// Check if colored output should be used
pub(crate) fn should_use_color() -> bool {
    // Respect NO_COLOR environment variable
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    // Check if stderr is a terminal
    use std::io::IsTerminal;
    std::io::stderr().is_terminal()
}
