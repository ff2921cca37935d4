use crate::core::errors::TableError;
use serde::Serialize;
use std::ops::{Index, IndexMut};

/// Highest Unicode scalar position covered by a table.
pub const MAX_CODEPOINT: u32 = 0x10FFFF;

/// Number of positions in the codepoint space.
pub const CODEPOINT_COUNT: usize = MAX_CODEPOINT as usize + 1;

/// Byte stored for codepoints with no displayable width.
pub const SENTINEL: u8 = 0xFF;

/// Display width class of a codepoint.
///
/// Codepoints the oracle marks invalid have no class and are stored as
/// [`SENTINEL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[repr(u8)]
pub enum WidthClass {
    /// Combining marks, format characters and the like
    Zero = 0,
    /// Ordinary single-column characters
    Narrow = 1,
    /// East Asian wide and fullwidth characters
    Wide = 2,
}

impl WidthClass {
    /// All classes in byte-value order.
    pub const ALL: [WidthClass; 3] = [WidthClass::Zero, WidthClass::Narrow, WidthClass::Wide];

    /// Byte value written into leaf blocks.
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Maps a raw oracle answer onto a class.
    ///
    /// `-1` yields `Ok(None)`. Anything outside {-1, 0, 1, 2} is an oracle
    /// contract violation reported against `codepoint`.
    pub fn classify(codepoint: u32, raw: i32) -> Result<Option<WidthClass>, TableError> {
        match raw {
            -1 => Ok(None),
            0 => Ok(Some(WidthClass::Zero)),
            1 => Ok(Some(WidthClass::Narrow)),
            2 => Ok(Some(WidthClass::Wide)),
            width => Err(TableError::UnexpectedWidth { codepoint, width }),
        }
    }
}

/// One value per width class, indexed by [`WidthClass`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ByClass<T>([T; 3]);

impl<T> ByClass<T> {
    pub fn new(zero: T, narrow: T, wide: T) -> Self {
        Self([zero, narrow, wide])
    }

    /// Iterates `(class, value)` pairs in class order.
    pub fn iter(&self) -> impl Iterator<Item = (WidthClass, &T)> {
        WidthClass::ALL.into_iter().zip(self.0.iter())
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> ByClass<U> {
        ByClass(self.0.map(f))
    }
}

impl<T> Index<WidthClass> for ByClass<T> {
    type Output = T;

    fn index(&self, class: WidthClass) -> &T {
        &self.0[class as usize]
    }
}

impl<T> IndexMut<WidthClass> for ByClass<T> {
    fn index_mut(&mut self, class: WidthClass) -> &mut T {
        &mut self.0[class as usize]
    }
}

/// Formats a codepoint as `U+XXXX` (at least four hex digits).
pub fn format_codepoint(codepoint: u32) -> String {
    format!("U+{:04X}", codepoint)
}
