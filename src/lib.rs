//! Display-width lookup tables for the whole Unicode codepoint space.
//!
//! A width oracle is swept over U+0000..=U+10FFFF, the answers are grouped
//! into runs, delta-encoded per width class, and rebuilt into a three-level
//! trie serialized as one little-endian byte buffer with absolute offsets.
//!
//! ```
//! use width_trie::{BuildOptions, TableBuilder, WidthTable};
//!
//! let oracle = |cp: u32| if cp < 0x80 { 1 } else { -1 };
//! let artifact = TableBuilder::build(&oracle, BuildOptions::default()).unwrap();
//! let table = WidthTable::parse(&artifact.bytes).unwrap();
//! assert_eq!(table.lookup('A' as u32), 1);
//! assert_eq!(table.lookup(0x80), width_trie::SENTINEL);
//! ```

mod builder;
mod core;
mod emit;
mod encoders;
mod oracle;

pub use builder::{Artifact, BuildOptions, TableBuilder};
pub use crate::core::config::{OracleSettings, OutputSettings, Settings, SettingsLayer, TrieSettings};
pub use crate::core::errors::TableError;
pub use crate::core::width::{
    ByClass, CODEPOINT_COUNT, MAX_CODEPOINT, SENTINEL, WidthClass, format_codepoint,
};
pub use emit::{OutputFormat, checksum, list_sizes, render, write_atomically};
pub use encoders::reader::{TableHeader, WidthTable};
pub use encoders::scanner::{Run, Scanner, scan};
pub use encoders::serializer::{HEADER_LEN, serialize};
pub use encoders::sparse::{DeltaList, DenseWidths, SparseEncoder, SparseTables};
pub use encoders::trie::{DEFAULT_SHIFT1, DEFAULT_SHIFT2, Trie, TrieParams, TrieStats};
pub use oracle::{OracleKind, UnicodeOracle, WidthOracle};

#[cfg(unix)]
pub use oracle::LocaleOracle;
