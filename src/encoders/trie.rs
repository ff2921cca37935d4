//! Three-level trie over the dense width array.
//!
//! A codepoint `cp` is split into `i1 = cp >> shift1`,
//! `i2 = (cp >> shift2) & mask2` and `i3 = cp & mask3`. The top level is
//! indexed by `i1` and selects a mid table, the mid table is indexed by `i2`
//! and selects a leaf, and the leaf holds one width byte per `i3`.

use crate::core::errors::TableError;
use crate::core::width::{MAX_CODEPOINT, SENTINEL};
use crate::encoders::sparse::DenseWidths;
use serde::Serialize;
use std::collections::HashMap;

/// Bits addressed below the top level.
pub const DEFAULT_SHIFT1: u32 = 11;
/// Bits addressed by a leaf block.
pub const DEFAULT_SHIFT2: u32 = 5;

/// Validated shift parameters and the constants derived from them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TrieParams {
    shift1: u32,
    shift2: u32,
}

impl TrieParams {
    pub fn new(shift1: u32, shift2: u32) -> Result<Self, TableError> {
        if shift2 == 0 {
            return Err(TableError::invalid_params(
                shift1,
                shift2,
                "leaf blocks must span at least two codepoints",
            ));
        }
        if shift2 > shift1 {
            return Err(TableError::invalid_params(
                shift1,
                shift2,
                "shift2 exceeds shift1",
            ));
        }
        if shift1 > 21 {
            return Err(TableError::invalid_params(
                shift1,
                shift2,
                "shift1 exceeds the 21-bit codepoint space",
            ));
        }
        Ok(Self { shift1, shift2 })
    }

    pub fn shift1(&self) -> u32 {
        self.shift1
    }

    pub fn shift2(&self) -> u32 {
        self.shift2
    }

    /// Bytes per leaf block.
    pub fn leaf_len(&self) -> usize {
        1 << self.shift2
    }

    pub fn mask3(&self) -> u32 {
        (1 << self.shift2) - 1
    }

    pub fn mask2(&self) -> u32 {
        (1 << (self.shift1 - self.shift2)) - 1
    }

    /// Entries per mid table.
    pub fn mid_len(&self) -> usize {
        self.mask2() as usize + 1
    }

    /// Entries in the top-level array.
    pub fn top_bound(&self) -> u32 {
        (MAX_CODEPOINT >> self.shift1) + 1
    }

    /// First codepoint of the block addressed by `(i1, i2)`.
    pub fn block_base(&self, i1: u32, i2: u32) -> u32 {
        (i1 << self.shift1) | (i2 << self.shift2)
    }
}

impl Default for TrieParams {
    fn default() -> Self {
        Self {
            shift1: DEFAULT_SHIFT1,
            shift2: DEFAULT_SHIFT2,
        }
    }
}

/// Partitioned width data, ready for serialization.
#[derive(Debug, Clone)]
pub struct Trie {
    params: TrieParams,
    /// One table per top-level entry; each slot is a 1-based leaf index, 0 if absent
    mids: Vec<Vec<u32>>,
    /// Leaf blocks back to back, `params.leaf_len()` bytes each
    leaves: Vec<u8>,
}

impl Trie {
    /// Partitions `dense` into leaves. With `dedupe`, identical leaves are
    /// stored once and shared by every mid slot that needs them.
    pub fn build(dense: &DenseWidths, params: TrieParams, dedupe: bool) -> Self {
        let leaf_len = params.leaf_len();
        let mut mids = Vec::with_capacity(params.top_bound() as usize);
        let mut leaves = Vec::new();
        let mut cache: HashMap<Vec<u8>, u32> = HashMap::new();
        let mut leaf_count = 0u32;

        for i1 in 0..params.top_bound() {
            let mut mid = vec![0u32; params.mid_len()];

            for (i2, slot) in mid.iter_mut().enumerate() {
                let base = params.block_base(i1, i2 as u32);
                if base > MAX_CODEPOINT {
                    continue;
                }

                let leaf: Vec<u8> = (0..leaf_len as u32)
                    .map(|i3| {
                        let cp = base + i3;
                        if cp <= MAX_CODEPOINT {
                            dense.get(cp)
                        } else {
                            SENTINEL
                        }
                    })
                    .collect();

                *slot = if dedupe {
                    *cache.entry(leaf).or_insert_with_key(|leaf| {
                        leaves.extend_from_slice(leaf);
                        leaf_count += 1;
                        leaf_count
                    })
                } else {
                    leaves.extend_from_slice(&leaf);
                    leaf_count += 1;
                    leaf_count
                };
            }

            mids.push(mid);
        }

        Self {
            params,
            mids,
            leaves,
        }
    }

    pub fn params(&self) -> TrieParams {
        self.params
    }

    pub fn mids(&self) -> &[Vec<u32>] {
        &self.mids
    }

    /// Number of stored leaf blocks.
    pub fn leaf_count(&self) -> usize {
        self.leaves.len() / self.params.leaf_len()
    }

    /// Leaf block by 1-based index, as stored in mid tables.
    pub fn leaf(&self, index: u32) -> Option<&[u8]> {
        let leaf_len = self.params.leaf_len();
        let start = (index as usize).checked_sub(1)? * leaf_len;
        self.leaves.get(start..start + leaf_len)
    }

    pub fn leaves(&self) -> impl Iterator<Item = &[u8]> {
        self.leaves.chunks_exact(self.params.leaf_len())
    }

    /// In-memory lookup mirroring the serialized read contract.
    pub fn lookup(&self, codepoint: u32) -> u8 {
        let p = &self.params;
        let i1 = (codepoint >> p.shift1) as usize;
        let i2 = ((codepoint >> p.shift2) & p.mask2()) as usize;
        let i3 = (codepoint & p.mask3()) as usize;

        self.mids
            .get(i1)
            .and_then(|mid| self.leaf(mid[i2]))
            .map_or(SENTINEL, |leaf| leaf[i3])
    }

    /// Byte length of the serialized layout.
    pub fn serialized_len(&self) -> usize {
        let mid_entries: usize = self.mids.iter().map(Vec::len).sum();
        crate::encoders::serializer::HEADER_LEN
            + 4 * self.mids.len()
            + 4 * mid_entries
            + self.leaves.len()
    }

    pub fn stats(&self) -> TrieStats {
        let distinct: std::collections::HashSet<&[u8]> = self.leaves().collect();
        TrieStats {
            top_entries: self.mids.len(),
            mid_entries: self.mids.iter().map(Vec::len).sum(),
            present_leaves: self
                .mids
                .iter()
                .flatten()
                .filter(|&&slot| slot != 0)
                .count(),
            stored_leaves: self.leaf_count(),
            distinct_leaves: distinct.len(),
            serialized_len: self.serialized_len(),
        }
    }
}

/// Size summary of a built trie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TrieStats {
    pub top_entries: usize,
    pub mid_entries: usize,
    /// Mid slots that point at a leaf
    pub present_leaves: usize,
    pub stored_leaves: usize,
    pub distinct_leaves: usize,
    pub serialized_len: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::width::WidthClass;

    fn sample_dense() -> DenseWidths {
        let mut dense = DenseWidths::new();
        dense.set_range(0, 2, WidthClass::Zero);
        dense.set_range(3, 34, WidthClass::Narrow);
        dense.set(35, WidthClass::Wide);
        dense
    }

    #[test]
    fn test_default_derived_constants() {
        let p = TrieParams::default();
        assert_eq!(p.leaf_len(), 32);
        assert_eq!(p.mask3(), 31);
        assert_eq!(p.mask2(), 63);
        assert_eq!(p.mid_len(), 64);
        assert_eq!(p.top_bound(), 544);
    }

    #[test]
    fn test_params_validation() {
        assert!(TrieParams::new(11, 5).is_ok());
        assert!(TrieParams::new(5, 5).is_ok());
        assert!(TrieParams::new(21, 1).is_ok());
        assert!(TrieParams::new(4, 5).is_err());
        assert!(TrieParams::new(8, 0).is_err());
        assert!(TrieParams::new(22, 5).is_err());
    }

    #[test]
    fn test_concrete_scenario_lookups() {
        let trie = Trie::build(&sample_dense(), TrieParams::default(), false);

        assert_eq!(trie.lookup(35), 2);
        assert_eq!(trie.lookup(3), 1);
        assert_eq!(trie.lookup(34), 1);
        assert_eq!(trie.lookup(2), 0);
        assert_eq!(trie.lookup(36), SENTINEL);

        // Everything above lives under top index 0, first two leaves
        assert_eq!(trie.mids()[0][0], 1);
        assert_eq!(trie.mids()[0][1], 2);
    }

    #[test]
    fn test_every_in_range_block_gets_a_leaf() {
        let trie = Trie::build(&DenseWidths::new(), TrieParams::default(), false);
        let stats = trie.stats();

        assert_eq!(stats.top_entries, 544);
        assert_eq!(stats.mid_entries, 544 * 64);
        assert_eq!(stats.stored_leaves, 0x110000 / 32);
        assert_eq!(stats.present_leaves, stats.stored_leaves);
        assert_eq!(stats.distinct_leaves, 1);
        assert_eq!(
            stats.serialized_len,
            20 + 4 * 544 + 4 * 544 * 64 + 32 * (0x110000 / 32)
        );
    }

    #[test]
    fn test_blocks_beyond_codepoint_space_are_absent() {
        // shift1 = 17 leaves the last top-level table half past U+10FFFF
        let params = TrieParams::new(17, 5).unwrap();
        assert_eq!(params.top_bound(), 9);
        let trie = Trie::build(&DenseWidths::new(), params, false);

        let last = trie.mids().last().unwrap();
        assert_eq!(last.len(), 4096);
        let present = last.iter().filter(|&&slot| slot != 0).count();
        assert_eq!(present, 2048);
        assert!(last[2048..].iter().all(|&slot| slot == 0));
        assert_eq!(trie.lookup(0x110000), SENTINEL);
        assert_eq!(trie.lookup(0x10FFFF), SENTINEL);
    }

    #[test]
    fn test_padding_past_last_codepoint_is_sentinel() {
        // A 2^20-codepoint leaf straddles U+10FFFF when shift2 = 20
        let mut dense = DenseWidths::new();
        dense.set_range(0x100000, 0x10FFFF, WidthClass::Narrow);
        let params = TrieParams::new(20, 20).unwrap();
        let trie = Trie::build(&dense, params, false);

        assert_eq!(trie.leaf_count(), 2);
        let last = trie.leaf(2).unwrap();
        assert_eq!(last[0xFFFF], 1);
        assert_eq!(last[0x10000], SENTINEL);
    }

    #[test]
    fn test_dedupe_shares_identical_leaves() {
        let dense = sample_dense();
        let plain = Trie::build(&dense, TrieParams::default(), false);
        let shared = Trie::build(&dense, TrieParams::default(), true);

        // Leaf 1 holds U+0000..U+001F, leaf 2 the tail of the sample, the rest are empty
        assert_eq!(shared.leaf_count(), 3);
        assert_eq!(shared.stats().present_leaves, plain.leaf_count());

        for cp in (0..=MAX_CODEPOINT).step_by(31) {
            assert_eq!(shared.lookup(cp), plain.lookup(cp), "U+{:04X}", cp);
        }
        for cp in 0..64 {
            assert_eq!(shared.lookup(cp), dense.get(cp));
        }
    }
}
