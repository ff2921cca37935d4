/// Tests for the public library API
///
/// Drives the pipeline stage by stage the way a downstream build script would.
use width_trie::{
    BuildOptions, DeltaList, HEADER_LEN, MAX_CODEPOINT, Run, SENTINEL, SparseEncoder,
    TableBuilder, TableError, Trie, TrieParams, WidthClass, WidthTable, scan, serialize,
};

fn sample_oracle(cp: u32) -> i32 {
    match cp {
        0..=2 => 0,
        3..=34 => 1,
        35 => 2,
        _ => -1,
    }
}

#[test]
fn test_stages_compose() {
    let mut runs: Vec<Run> = Vec::new();
    scan(&sample_oracle, 35, |run| runs.push(run)).unwrap();
    assert_eq!(runs.len(), 3);

    let mut encoder = SparseEncoder::new();
    for run in runs {
        encoder.push(run).unwrap();
    }

    let tables = encoder.finish();
    assert_eq!(
        tables.get(WidthClass::Zero),
        &DeltaList {
            codepoints: vec![],
            ranges: vec![[0, 2]],
        }
    );

    let dense = tables.to_dense();
    let trie = Trie::build(&dense, TrieParams::default(), false);
    let bytes = serialize(&trie).unwrap();
    let table = WidthTable::parse(&bytes).unwrap();

    for cp in 0..=40 {
        assert_eq!(table.lookup(cp), trie.lookup(cp));
        assert_eq!(table.lookup(cp), dense.get(cp));
    }
}

#[test]
fn test_manual_read_contract() {
    let mut builder = TableBuilder::new(BuildOptions::default());
    builder.scan_until(&sample_oracle, 35).unwrap();
    let artifact = builder.into_artifact().unwrap();
    let bytes = &artifact.bytes;

    let word = |at: usize| u32::from_le_bytes(bytes[at..at + 4].try_into().unwrap()) as usize;
    let (shift1, shift2, mask2, mask3) = (word(0), word(8), word(12), word(16));

    let read = |cp: usize| {
        let mid = word(HEADER_LEN + 4 * (cp >> shift1));
        match word(mid + 4 * ((cp >> shift2) & mask2)) {
            0 => SENTINEL,
            leaf => bytes[leaf + (cp & mask3)],
        }
    };

    assert_eq!(read(35), 2);
    assert_eq!(read(3), 1);
    assert_eq!(read(34), 1);
    assert_eq!(read(2), 0);
    assert_eq!(read(MAX_CODEPOINT as usize), SENTINEL);
}

#[test]
fn test_errors_surface_through_api() {
    assert!(matches!(
        TrieParams::new(3, 9),
        Err(TableError::InvalidParams { .. })
    ));

    let bad = |cp: u32| if cp == 0x300 { -5 } else { 0 };
    let err = TableBuilder::build(&bad, BuildOptions::default()).unwrap_err();
    assert!(err.to_string().contains("unexpected width -5 at U+000300"));
}
