mod args;
mod global;
mod handlers;

use clap::{Parser, Subcommand};
use width_trie::Settings;

use args::{ConfigAction, GenerateArgs, InspectArgs};
use global::GlobalArgs;

#[derive(Parser)]
#[command(name = "width-trie")]
#[command(version)]
#[command(about = "Compile per-codepoint display widths into a compact three-level lookup table", long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scan the width oracle and write the lookup table
    Generate(GenerateArgs),
    /// Describe a binary lookup table
    Inspect(InspectArgs),
    /// Show configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.global.no_color {
        // SAFETY: called before any other thread is spawned.
        unsafe {
            std::env::set_var("NO_COLOR", "1");
        }
    }

    match cli.command {
        Command::Generate(args) => {
            let settings = Settings::load_with_overrides(cli.global.config.as_deref())?;
            handlers::generate::handle(args, &cli.global, settings)
        }
        Command::Inspect(args) => handlers::inspect::handle(args, &cli.global),
        Command::Config { action } => {
            let settings = Settings::load_with_overrides(cli.global.config.as_deref())?;
            handlers::config::handle(action, &cli.global, &settings)
        }
    }
}
