//! Rendering a finished artifact for downstream consumers.

use crate::builder::Artifact;
use crate::core::width::WidthClass;
use serde::{Deserialize, Serialize};
use std::fmt::Write as FmtWrite;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// How a width table is written out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// The raw serialized buffer
    Binary,
    /// Rust source with header constants and a static byte array
    #[default]
    Rust,
    /// Trie parameters and the delta-encoded sparse lists
    Json,
    /// Lowercase hex of the serialized buffer
    Hex,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Binary => "binary",
            OutputFormat::Rust => "rust",
            OutputFormat::Json => "json",
            OutputFormat::Hex => "hex",
        }
    }

    pub fn is_text(&self) -> bool {
        !matches!(self, OutputFormat::Binary)
    }
}

/// CRC-32 (ISO-HDLC) of `bytes`.
pub fn checksum(bytes: &[u8]) -> u32 {
    static CRC: crc::Crc<u32> = crc::Crc::<u32>::new(&crc::CRC_32_ISO_HDLC);
    CRC.checksum(bytes)
}

/// Renders `artifact` in `format`. `source` names the oracle in generated headers.
pub fn render(
    artifact: &Artifact,
    format: OutputFormat,
    source: &str,
) -> Result<Vec<u8>, serde_json::Error> {
    Ok(match format {
        OutputFormat::Binary => artifact.bytes.clone(),
        OutputFormat::Rust => render_rust(artifact, source).into_bytes(),
        OutputFormat::Json => {
            let mut text = serde_json::to_string_pretty(&json_document(artifact, source))?;
            text.push('\n');
            text.into_bytes()
        }
        OutputFormat::Hex => {
            let mut text = hex::encode(&artifact.bytes);
            text.push('\n');
            text.into_bytes()
        }
    })
}

fn render_rust(artifact: &Artifact, source: &str) -> String {
    let p = &artifact.params;
    let mut buf = String::with_capacity(artifact.bytes.len() * 6 + 512);

    _ = writeln!(
        buf,
        "// Generated by width-trie from the `{}` width oracle, {} bytes, crc32 {:#010x}",
        source,
        artifact.bytes.len(),
        artifact.checksum(),
    );
    _ = writeln!(buf, "pub const SHIFT1: u32 = {};", p.shift1());
    _ = writeln!(buf, "pub const TOP_BOUND: u32 = {};", p.top_bound());
    _ = writeln!(buf, "pub const SHIFT2: u32 = {};", p.shift2());
    _ = writeln!(buf, "pub const MASK2: u32 = {};", p.mask2());
    _ = writeln!(buf, "pub const MASK3: u32 = {};", p.mask3());
    _ = writeln!(buf);
    _ = write!(
        buf,
        "#[rustfmt::skip]\npub static WIDTH_TABLE: [u8; {}] = [",
        artifact.bytes.len()
    );
    for (i, byte) in artifact.bytes.iter().enumerate() {
        if i % 16 == 0 {
            buf.push_str("\n   ");
        }
        _ = write!(buf, " 0x{:02x},", byte);
    }
    buf.push_str("\n];\n");
    buf
}

fn json_document(artifact: &Artifact, source: &str) -> serde_json::Value {
    let widths: serde_json::Map<String, serde_json::Value> = artifact
        .tables
        .iter()
        .map(|(class, list)| {
            (
                class.as_u8().to_string(),
                serde_json::json!({
                    "codepoints": list.codepoints,
                    "ranges": list.ranges,
                }),
            )
        })
        .collect();

    serde_json::json!({
        "oracle": source,
        "shift1": artifact.params.shift1(),
        "shift2": artifact.params.shift2(),
        "bytes": artifact.bytes.len(),
        "crc32": artifact.checksum(),
        "widths": widths,
    })
}

/// Writes `bytes` to a sibling temporary file and renames it over `path`,
/// so a failed write never leaves a partial artifact behind.
pub fn write_atomically(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let tmp = temporary_sibling(path);
    let result = fs::write(&tmp, bytes).and_then(|_| fs::rename(&tmp, path));
    if result.is_err() {
        _ = fs::remove_file(&tmp);
    }
    result
}

fn temporary_sibling(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

/// Counts of list entries per width class, for summaries.
pub fn list_sizes(artifact: &Artifact) -> Vec<(WidthClass, usize, usize)> {
    artifact
        .tables
        .iter()
        .map(|(class, list)| (class, list.codepoints.len(), list.ranges.len()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{BuildOptions, TableBuilder};

    fn sample_artifact() -> Artifact {
        let oracle = |cp: u32| match cp {
            0..=2 => 0,
            3..=34 => 1,
            35 => 2,
            _ => -1,
        };
        let options = BuildOptions {
            dedupe_leaves: true,
            ..BuildOptions::default()
        };
        let mut builder = TableBuilder::new(options);
        builder.scan_until(&oracle, 35).unwrap();
        builder.into_artifact().unwrap()
    }

    #[test]
    fn test_checksum_known_value() {
        assert_eq!(checksum(b"123456789"), 0xCBF4_3926);
    }

    #[test]
    fn test_binary_is_raw_buffer() {
        let artifact = sample_artifact();
        let out = render(&artifact, OutputFormat::Binary, "test").unwrap();
        assert_eq!(out, artifact.bytes);
    }

    #[test]
    fn test_rust_source_shape() {
        let artifact = sample_artifact();
        let out = String::from_utf8(render(&artifact, OutputFormat::Rust, "test").unwrap()).unwrap();

        assert!(out.starts_with("// Generated by width-trie from the `test` width oracle"));
        assert!(out.contains("pub const SHIFT1: u32 = 11;"));
        assert!(out.contains("pub const TOP_BOUND: u32 = 544;"));
        assert!(out.contains("pub const MASK3: u32 = 31;"));
        assert!(out.contains(&format!(
            "pub static WIDTH_TABLE: [u8; {}] = [",
            artifact.bytes.len()
        )));
        // Header begins with shift1 = 11 little-endian
        assert!(out.contains("\n    0x0b, 0x00, 0x00, 0x00, 0x20, 0x02,"));
        assert!(out.ends_with("\n];\n"));
    }

    #[test]
    fn test_json_carries_delta_lists() {
        let artifact = sample_artifact();
        let out = render(&artifact, OutputFormat::Json, "test").unwrap();
        let doc: serde_json::Value = serde_json::from_slice(&out).unwrap();

        assert_eq!(doc["shift1"], 11);
        assert_eq!(doc["widths"]["0"]["ranges"], serde_json::json!([[0, 2]]));
        assert_eq!(doc["widths"]["1"]["ranges"], serde_json::json!([[3, 31]]));
        assert_eq!(doc["widths"]["2"]["codepoints"], serde_json::json!([35]));
        assert_eq!(doc["crc32"], artifact.checksum());
    }

    #[test]
    fn test_hex_output() {
        let artifact = sample_artifact();
        let out = String::from_utf8(render(&artifact, OutputFormat::Hex, "test").unwrap()).unwrap();
        assert!(out.starts_with("0b00000020020000"));
        assert_eq!(out.trim_end().len(), artifact.bytes.len() * 2);
    }

    #[test]
    fn test_write_atomically_replaces_file() {
        let dir = std::env::temp_dir().join(format!("width-trie-emit-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("table.bin");

        fs::write(&path, b"old").unwrap();
        write_atomically(&path, b"new contents").unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"new contents");
        assert!(!temporary_sibling(&path).exists());
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_write_atomically_failure_leaves_nothing() {
        let path = std::env::temp_dir()
            .join("width-trie-missing-dir")
            .join("nested")
            .join("table.bin");
        assert!(write_atomically(&path, b"x").is_err());
        assert!(!path.exists());
    }
}
