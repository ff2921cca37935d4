use crate::cli::{args::GenerateArgs, global::GlobalArgs};
use std::io::{self, IsTerminal, Write};
use width_trie::{Settings, TableBuilder, format_codepoint, list_sizes, render, write_atomically};

pub fn handle(
    args: GenerateArgs,
    global: &GlobalArgs,
    mut settings: Settings,
) -> Result<(), Box<dyn std::error::Error>> {
    apply_overrides(&args, &mut settings);

    let options = settings.trie.build_options()?;
    let format = settings.output.format;
    let output_path = args.output.clone().or_else(|| settings.output.resolved_path());

    if output_path.is_none() && !format.is_text() && io::stdout().is_terminal() {
        return Err("Refusing to write a binary table to a terminal; use --output or redirect stdout".into());
    }

    let kind = settings.oracle.kind;
    let oracle = kind.open(&settings.oracle.locale)?;

    global.info(&format!(
        "Scanning {}..{} with the {} oracle (shift1 = {}, shift2 = {})",
        format_codepoint(0),
        format_codepoint(width_trie::MAX_CODEPOINT),
        kind.as_str(),
        options.params.shift1(),
        options.params.shift2(),
    ));

    let artifact = TableBuilder::build(&*oracle, options)?;

    for (class, singles, ranges) in list_sizes(&artifact) {
        global.info(&format!(
            "  width {}: {} codepoints, {} ranges",
            class.as_u8(),
            singles,
            ranges
        ));
    }

    if args.verify {
        artifact.verify(&*oracle)?;
        global.info("  verified every codepoint against the oracle");
    }

    let rendered = render(&artifact, format, kind.as_str())?;

    match &output_path {
        Some(path) => write_atomically(path, &rendered)
            .map_err(|e| format!("Failed to write {}: {}", path.display(), e))?,
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(&rendered)?;
            stdout.flush()?;
        }
    }

    let stats = artifact.stats;
    let destination = output_path
        .as_ref()
        .map_or_else(|| "stdout".to_string(), |p| p.display().to_string());
    global.success(&format!(
        "{} table written to {}: {} bytes, {} leaves ({} distinct), crc32 {:#010x}",
        format.as_str(),
        destination,
        stats.serialized_len,
        stats.stored_leaves,
        stats.distinct_leaves,
        artifact.checksum(),
    ));

    if !settings.trie.dedupe_leaves && stats.distinct_leaves < stats.stored_leaves / 4 {
        global.warn(&format!(
            "only {} of {} leaves are distinct; --dedupe would shrink the table",
            stats.distinct_leaves, stats.stored_leaves
        ));
    }

    Ok(())
}

/// Command-line flags override every configuration layer.
fn apply_overrides(args: &GenerateArgs, settings: &mut Settings) {
    if let Some(format) = args.format {
        settings.output.format = format.into();
    }
    if let Some(oracle) = args.oracle {
        settings.oracle.kind = oracle.into();
    }
    if let Some(locale) = &args.locale {
        settings.oracle.locale = locale.clone();
    }
    if let Some(shift1) = args.shift1 {
        settings.trie.shift1 = shift1;
    }
    if let Some(shift2) = args.shift2 {
        settings.trie.shift2 = shift2;
    }
    if args.dedupe {
        settings.trie.dedupe_leaves = true;
    }
}
