use crate::cli::{args::InspectArgs, global::GlobalArgs};
use std::fs;
use width_trie::{HEADER_LEN, WidthTable, checksum};

pub fn handle(args: InspectArgs, _global: &GlobalArgs) -> Result<(), Box<dyn std::error::Error>> {
    let bytes = fs::read(&args.file)
        .map_err(|e| format!("Cannot read {}: {}", args.file.display(), e))?;
    let table = WidthTable::parse(&bytes)?;
    let header = table.header();

    let top_bytes = 4 * header.top_bound as usize;
    let mid_bytes = top_bytes * header.mid_len();
    // `parse` guarantees the index arrays fit
    let leaf_bytes = table.len() - HEADER_LEN - top_bytes - mid_bytes;
    let leaf_blocks = leaf_bytes / header.leaf_len();
    let crc = checksum(&bytes);

    if args.json {
        let output = serde_json::json!({
            "header": header,
            "sections": {
                "header": HEADER_LEN,
                "top": top_bytes,
                "mid": mid_bytes,
                "leaves": leaf_bytes,
            },
            "leaf_blocks": leaf_blocks,
            "referenced_leaves": table.referenced_leaves(),
            "bytes": table.len(),
            "crc32": crc,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("Width table: {}", args.file.display());
    println!("  Size: {} bytes (crc32 {:#010x})", table.len(), crc);
    println!(
        "  Header: shift1={} top_bound={} shift2={} mask2={} mask3={}",
        header.shift1, header.top_bound, header.shift2, header.mask2, header.mask3
    );
    println!("  Top level: {} bytes", top_bytes);
    println!(
        "  Mid level: {} bytes ({} tables of {} entries)",
        mid_bytes,
        header.top_bound,
        header.mid_len()
    );
    println!(
        "  Leaves: {} bytes ({} blocks of {}, {} referenced)",
        leaf_bytes,
        leaf_blocks,
        header.leaf_len(),
        table.referenced_leaves()
    );

    Ok(())
}
