//! Binary layout of a width table.
//!
//! ```text
//! offset 0   u32 shift1
//!        4   u32 top_bound
//!        8   u32 shift2
//!        12  u32 mask2
//!        16  u32 mask3
//!        20  u32 × top_bound        absolute offset of each mid table
//!        ..  u32 × (mask2 + 1) × top_bound   0 or absolute offset of a leaf
//!        ..  u8 × (mask3 + 1) × leaves       leaf blocks in discovery order
//! ```
//!
//! All integers are little-endian.

use crate::core::errors::TableError;
use crate::encoders::binary_writer::BinaryWriter;
use crate::encoders::trie::Trie;

/// Five u32 header fields.
pub const HEADER_LEN: usize = 5 * 4;

/// Lays `trie` out as one contiguous buffer with absolute offsets.
pub fn serialize(trie: &Trie) -> Result<Vec<u8>, TableError> {
    let total = trie.serialized_len();
    if u32::try_from(total).is_err() {
        return Err(TableError::TableTooLarge { size: total });
    }

    let params = trie.params();
    let mids = trie.mids();
    let leaf_len = params.leaf_len();
    let mut writer = BinaryWriter::with_capacity(total);

    writer.write_u32_le(params.shift1());
    writer.write_u32_le(params.top_bound());
    writer.write_u32_le(params.shift2());
    writer.write_u32_le(params.mask2());
    writer.write_u32_le(params.mask3());

    let top_start = writer.position();
    let mid_start = top_start + 4 * mids.len();
    let leaf_start = mid_start + 4 * mids.iter().map(Vec::len).sum::<usize>();

    let mut mid_offset = mid_start;
    for mid in mids {
        writer.write_u32_le(mid_offset as u32);
        mid_offset += 4 * mid.len();
    }

    for mid in mids {
        for &slot in mid {
            let offset = match slot {
                0 => 0,
                index => leaf_start + (index as usize - 1) * leaf_len,
            };
            writer.write_u32_le(offset as u32);
        }
    }

    debug_assert_eq!(writer.position(), leaf_start);
    for leaf in trie.leaves() {
        writer.write_bytes(leaf);
    }

    debug_assert_eq!(writer.position(), total);
    Ok(writer.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::width::WidthClass;
    use crate::encoders::binary_writer::read_u32_le;
    use crate::encoders::sparse::DenseWidths;
    use crate::encoders::trie::TrieParams;

    fn sample_trie(dedupe: bool) -> Trie {
        let mut dense = DenseWidths::new();
        dense.set_range(0, 2, WidthClass::Zero);
        dense.set_range(3, 34, WidthClass::Narrow);
        dense.set(35, WidthClass::Wide);
        Trie::build(&dense, TrieParams::default(), dedupe)
    }

    #[test]
    fn test_header_fields() {
        let bytes = serialize(&sample_trie(false)).unwrap();

        assert_eq!(read_u32_le(&bytes, 0), Some(11));
        assert_eq!(read_u32_le(&bytes, 4), Some(544));
        assert_eq!(read_u32_le(&bytes, 8), Some(5));
        assert_eq!(read_u32_le(&bytes, 12), Some(63));
        assert_eq!(read_u32_le(&bytes, 16), Some(31));
    }

    #[test]
    fn test_total_size_formula() {
        let trie = sample_trie(false);
        let bytes = serialize(&trie).unwrap();
        let leaves = 0x110000 / 32;

        assert_eq!(bytes.len(), 20 + 4 * 544 + 4 * 544 * 64 + 32 * leaves);
        assert_eq!(bytes.len(), trie.serialized_len());
    }

    #[test]
    fn test_offsets_are_absolute() {
        let bytes = serialize(&sample_trie(false)).unwrap();
        let mid_start = 20 + 4 * 544;
        let leaf_start = mid_start + 4 * 544 * 64;

        // Top entries step one mid table (64 × 4 bytes) at a time
        assert_eq!(read_u32_le(&bytes, 20), Some(mid_start as u32));
        assert_eq!(read_u32_le(&bytes, 24), Some((mid_start + 256) as u32));

        // First two mid slots point at the first two leaves
        assert_eq!(read_u32_le(&bytes, mid_start), Some(leaf_start as u32));
        assert_eq!(read_u32_le(&bytes, mid_start + 4), Some((leaf_start + 32) as u32));

        assert_eq!(&bytes[leaf_start..leaf_start + 4], &[0, 0, 0, 1]);
        assert_eq!(bytes[leaf_start + 32 + 3], 2); // U+0023
        assert_eq!(bytes[leaf_start + 32 + 4], 0xFF);
    }

    #[test]
    fn test_deduped_layout_is_smaller() {
        let plain = serialize(&sample_trie(false)).unwrap();
        let shared = serialize(&sample_trie(true)).unwrap();

        assert_eq!(shared.len(), 20 + 4 * 544 + 4 * 544 * 64 + 32 * 3);
        assert!(shared.len() < plain.len());
    }
}
