//! Read side of the serialized table, used to check artifacts.

use crate::core::errors::TableError;
use crate::core::width::SENTINEL;
use crate::encoders::binary_writer::read_u32_le;
use crate::encoders::serializer::HEADER_LEN;
use serde::Serialize;

/// Decoded header of a serialized width table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TableHeader {
    pub shift1: u32,
    pub top_bound: u32,
    pub shift2: u32,
    pub mask2: u32,
    pub mask3: u32,
}

impl TableHeader {
    pub fn mid_len(&self) -> usize {
        self.mask2 as usize + 1
    }

    pub fn leaf_len(&self) -> usize {
        self.mask3 as usize + 1
    }
}

/// A validated view over a serialized width table.
#[derive(Debug, Clone, Copy)]
pub struct WidthTable<'a> {
    bytes: &'a [u8],
    header: TableHeader,
}

impl<'a> WidthTable<'a> {
    /// Validates the header and every top-level and mid-level pointer.
    pub fn parse(bytes: &'a [u8]) -> Result<Self, TableError> {
        let field = |at: usize| {
            read_u32_le(bytes, at).ok_or_else(|| TableError::malformed(at, "truncated header"))
        };
        let header = TableHeader {
            shift1: field(0)?,
            top_bound: field(4)?,
            shift2: field(8)?,
            mask2: field(12)?,
            mask3: field(16)?,
        };

        if header.shift2 == 0 || header.shift2 > header.shift1 || header.shift1 > 21 {
            return Err(TableError::malformed(0, "shift fields out of range"));
        }
        if header.mask3 != (1 << header.shift2) - 1
            || header.mask2 != (1 << (header.shift1 - header.shift2)) - 1
        {
            return Err(TableError::malformed(12, "masks do not match shifts"));
        }
        if header.top_bound == 0 || header.top_bound > (1 << (21 - header.shift1)) {
            return Err(TableError::malformed(4, "top-level bound out of range"));
        }

        let mid_bytes = 4 * header.mid_len();
        let index_end = HEADER_LEN + 4 * header.top_bound as usize * (1 + header.mid_len());
        if bytes.len() < index_end {
            return Err(TableError::malformed(
                bytes.len(),
                format!("index arrays need {} bytes", index_end),
            ));
        }

        for i1 in 0..header.top_bound as usize {
            let at = HEADER_LEN + 4 * i1;
            let mid = read_u32_le(bytes, at)
                .ok_or_else(|| TableError::malformed(at, "truncated top-level array"))?
                as usize;
            if mid.checked_add(mid_bytes).is_none_or(|end| end > bytes.len()) {
                return Err(TableError::malformed(at, "mid table pointer out of bounds"));
            }

            for i2 in 0..header.mid_len() {
                let slot_at = mid + 4 * i2;
                let Some(leaf) = read_u32_le(bytes, slot_at) else {
                    return Err(TableError::malformed(slot_at, "truncated mid table"));
                };
                let leaf = leaf as usize;
                if leaf != 0
                    && leaf
                        .checked_add(header.leaf_len())
                        .is_none_or(|end| end > bytes.len())
                {
                    return Err(TableError::malformed(slot_at, "leaf pointer out of bounds"));
                }
            }
        }

        Ok(Self { bytes, header })
    }

    pub fn header(&self) -> TableHeader {
        self.header
    }

    /// Width byte of `codepoint`; [`SENTINEL`] when absent.
    pub fn lookup(&self, codepoint: u32) -> u8 {
        let h = &self.header;
        let i1 = codepoint >> h.shift1;
        if i1 >= h.top_bound {
            return SENTINEL;
        }
        let i2 = (codepoint >> h.shift2) & h.mask2;
        let i3 = codepoint & h.mask3;

        // Pointers were bounds-checked in `parse`.
        let mid = self.word(HEADER_LEN + 4 * i1 as usize) as usize;
        match self.word(mid + 4 * i2 as usize) as usize {
            0 => SENTINEL,
            leaf => self.bytes[leaf + i3 as usize],
        }
    }

    /// Number of distinct leaf offsets referenced by mid tables.
    pub fn referenced_leaves(&self) -> usize {
        let h = &self.header;
        let mut offsets: Vec<u32> = (0..h.top_bound as usize)
            .flat_map(|i1| {
                let mid = self.word(HEADER_LEN + 4 * i1) as usize;
                (0..h.mid_len()).map(move |i2| mid + 4 * i2)
            })
            .map(|at| self.word(at))
            .filter(|&offset| offset != 0)
            .collect();
        offsets.sort_unstable();
        offsets.dedup();
        offsets.len()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    fn word(&self, at: usize) -> u32 {
        read_u32_le(self.bytes, at).unwrap_or(0)
    }
}
