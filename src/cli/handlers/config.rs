use crate::cli::{args::ConfigAction, global::GlobalArgs};
use width_trie::Settings;

pub fn handle(
    action: ConfigAction,
    _global: &GlobalArgs,
    settings: &Settings,
) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Show { json } => handle_show(json, settings),
    }
}

fn handle_show(json: bool, settings: &Settings) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(settings)?);
        return Ok(());
    }

    println!("Trie:");
    println!("  shift1: {}", settings.trie.shift1);
    println!("  shift2: {}", settings.trie.shift2);
    println!(
        "  dedupe_leaves: {}",
        if settings.trie.dedupe_leaves { "yes" } else { "no" }
    );
    println!("Oracle:");
    println!("  kind: {}", settings.oracle.kind.as_str());
    println!("  locale: {}", settings.oracle.locale);
    println!("Output:");
    println!("  format: {}", settings.output.format.as_str());
    match settings.output.resolved_path() {
        Some(path) => println!("  path: {}", path.display()),
        None => println!("  path: (stdout)"),
    }

    // Surface bad shifts here rather than at generate time
    if let Err(e) = settings.trie.build_options() {
        eprintln!("{}", e);
    }

    Ok(())
}
