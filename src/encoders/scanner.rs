//! Width scanner: sweeps the codepoint space and groups maximal runs.

use crate::core::errors::TableError;
use crate::core::width::WidthClass;
use crate::oracle::WidthOracle;

/// A maximal inclusive span of codepoints sharing one width.
///
/// `class` is `None` for spans the oracle marked invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Run {
    pub start: u32,
    pub end: u32,
    pub class: Option<WidthClass>,
}

impl Run {
    /// Number of codepoints covered.
    pub fn len(&self) -> u32 {
        self.end - self.start + 1
    }

    pub fn is_singleton(&self) -> bool {
        self.start == self.end
    }
}

/// Incremental run grouper.
///
/// Codepoints must be fed in ascending, gap-free order starting at 0.
#[derive(Debug, Default)]
pub struct Scanner {
    open: Option<Run>,
}

impl Scanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds the oracle's answer for the next codepoint.
    ///
    /// Returns the run that was closed by a width change, if any.
    pub fn feed(&mut self, codepoint: u32, raw_width: i32) -> Result<Option<Run>, TableError> {
        let class = WidthClass::classify(codepoint, raw_width)?;

        match self.open.as_mut() {
            Some(run) if run.class == class => {
                debug_assert_eq!(run.end + 1, codepoint);
                run.end = codepoint;
                Ok(None)
            }
            _ => Ok(self.open.replace(Run {
                start: codepoint,
                end: codepoint,
                class,
            })),
        }
    }

    /// Closes and returns the run still open after the last codepoint.
    pub fn finish(self) -> Option<Run> {
        self.open
    }
}

/// Queries `oracle` for every codepoint in `0..=last` and reports each closed
/// run, invalid runs included, in ascending order.
pub fn scan<O, F>(oracle: &O, last: u32, mut on_run: F) -> Result<(), TableError>
where
    O: WidthOracle + ?Sized,
    F: FnMut(Run),
{
    let mut scanner = Scanner::new();
    for codepoint in 0..=last {
        if let Some(run) = scanner.feed(codepoint, oracle.width(codepoint))? {
            on_run(run);
        }
    }
    if let Some(run) = scanner.finish() {
        on_run(run);
    }
    Ok(())
}
