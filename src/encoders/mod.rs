//! The build pipeline, in data-flow order: oracle answers become runs
//! ([`scanner`]), runs become delta-encoded lists ([`sparse`]), the lists are
//! rebuilt into a trie ([`trie`]) and the trie is laid out as bytes
//! ([`serializer`]). [`reader`] is the matching read side.

pub mod binary_writer;
pub mod reader;
pub mod scanner;
pub mod serializer;
pub mod sparse;
pub mod trie;
