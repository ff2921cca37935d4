use crate::core::errors::TableError;
use crate::core::width::{MAX_CODEPOINT, SENTINEL, WidthClass};
use crate::encoders::reader::WidthTable;
use crate::encoders::scanner::{Run, Scanner};
use crate::encoders::serializer::serialize;
use crate::encoders::sparse::{SparseEncoder, SparseTables};
use crate::encoders::trie::{Trie, TrieParams, TrieStats};
use crate::oracle::WidthOracle;

/// Knobs for turning sparse lists into a serialized trie.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildOptions {
    pub params: TrieParams,
    /// Store structurally identical leaf blocks once
    pub dedupe_leaves: bool,
}

/// Owns the scan state and sparse lists for one table build.
///
/// Feed it an oracle (or runs directly), then call [`TableBuilder::finish`]
/// for the delta-encoded lists or [`TableBuilder::into_artifact`] for the
/// serialized trie.
#[derive(Debug, Default)]
pub struct TableBuilder {
    options: BuildOptions,
    scanner: Scanner,
    encoder: SparseEncoder,
    next: u32,
}

impl TableBuilder {
    pub fn new(options: BuildOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Queries `oracle` for every codepoint up to and including U+10FFFF.
    pub fn scan<O: WidthOracle + ?Sized>(&mut self, oracle: &O) -> Result<(), TableError> {
        self.scan_until(oracle, MAX_CODEPOINT)
    }

    /// Queries `oracle` for the codepoints from the current position through `last`.
    pub fn scan_until<O: WidthOracle + ?Sized>(
        &mut self,
        oracle: &O,
        last: u32,
    ) -> Result<(), TableError> {
        let last = last.min(MAX_CODEPOINT);
        while self.next <= last {
            let codepoint = self.next;
            if let Some(run) = self.scanner.feed(codepoint, oracle.width(codepoint))? {
                self.encoder.push(run)?;
            }
            self.next += 1;
        }
        Ok(())
    }

    /// Records an already-closed run, bypassing the scanner.
    ///
    /// The run must lie within the codepoint space and start after every
    /// run already recorded for its class.
    pub fn push_run(&mut self, run: Run) -> Result<(), TableError> {
        self.encoder.push(run)
    }

    /// Closes the open run and delta-encodes every list.
    pub fn finish(mut self) -> Result<SparseTables, TableError> {
        if let Some(run) = std::mem::take(&mut self.scanner).finish() {
            self.encoder.push(run)?;
        }
        Ok(self.encoder.finish())
    }

    /// Finishes the lists, rebuilds the trie from them and serializes it.
    pub fn into_artifact(self) -> Result<Artifact, TableError> {
        let options = self.options;
        let tables = self.finish()?;
        Artifact::from_tables(tables, options)
    }

    /// Scans the whole codepoint space and builds the artifact in one go.
    pub fn build<O: WidthOracle + ?Sized>(
        oracle: &O,
        options: BuildOptions,
    ) -> Result<Artifact, TableError> {
        let mut builder = Self::new(options);
        builder.scan(oracle)?;
        builder.into_artifact()
    }
}

/// A finished width table together with the lists it was built from.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub tables: SparseTables,
    pub params: TrieParams,
    pub stats: TrieStats,
    pub bytes: Vec<u8>,
}

impl Artifact {
    pub fn from_tables(tables: SparseTables, options: BuildOptions) -> Result<Self, TableError> {
        let trie = {
            let dense = tables.to_dense();
            Trie::build(&dense, options.params, options.dedupe_leaves)
        };
        let bytes = serialize(&trie)?;

        Ok(Self {
            tables,
            params: options.params,
            stats: trie.stats(),
            bytes,
        })
    }

    /// Checks every codepoint of the serialized table against `oracle`.
    pub fn verify<O: WidthOracle + ?Sized>(&self, oracle: &O) -> Result<(), TableError> {
        let table = WidthTable::parse(&self.bytes)?;
        for codepoint in 0..=MAX_CODEPOINT {
            let expected = WidthClass::classify(codepoint, oracle.width(codepoint))?
                .map_or(SENTINEL, WidthClass::as_u8);
            let actual = table.lookup(codepoint);
            if actual != expected {
                return Err(TableError::VerificationFailed {
                    codepoint,
                    expected,
                    actual,
                });
            }
        }
        Ok(())
    }

    /// CRC-32 (ISO-HDLC) of the serialized bytes.
    pub fn checksum(&self) -> u32 {
        crate::emit::checksum(&self.bytes)
    }
}
