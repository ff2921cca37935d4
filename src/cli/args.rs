use clap::{Args, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Arguments for generating a width table
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Output file (writes to stdout if not provided)
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'f', long, value_enum)]
    pub format: Option<OutputFormatCli>,

    /// Width oracle to query
    #[arg(long, value_enum)]
    pub oracle: Option<OracleKindCli>,

    /// Locale activated for the libc oracle
    #[arg(long, value_name = "LOCALE")]
    pub locale: Option<String>,

    /// Bits addressed below the top level
    #[arg(long, value_name = "N")]
    pub shift1: Option<u32>,

    /// Bits addressed by a leaf block
    #[arg(long, value_name = "N")]
    pub shift2: Option<u32>,

    /// Store identical leaf blocks once
    #[arg(long)]
    pub dedupe: bool,

    /// Check every codepoint of the table against the oracle before writing
    #[arg(long)]
    pub verify: bool,
}

/// Arguments for inspecting a binary width table
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Binary table produced with `--format binary`
    pub file: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Config subcommand actions
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show the effective settings after all overrides
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Output formats (CLI enum)
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormatCli {
    Binary,
    Rust,
    Json,
    Hex,
}

impl From<OutputFormatCli> for width_trie::OutputFormat {
    fn from(cli: OutputFormatCli) -> Self {
        match cli {
            OutputFormatCli::Binary => width_trie::OutputFormat::Binary,
            OutputFormatCli::Rust => width_trie::OutputFormat::Rust,
            OutputFormatCli::Json => width_trie::OutputFormat::Json,
            OutputFormatCli::Hex => width_trie::OutputFormat::Hex,
        }
    }
}

/// Width oracles (CLI enum)
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OracleKindCli {
    Unicode,
    UnicodeCjk,
    Libc,
}

impl From<OracleKindCli> for width_trie::OracleKind {
    fn from(cli: OracleKindCli) -> Self {
        match cli {
            OracleKindCli::Unicode => width_trie::OracleKind::Unicode,
            OracleKindCli::UnicodeCjk => width_trie::OracleKind::UnicodeCjk,
            OracleKindCli::Libc => width_trie::OracleKind::Libc,
        }
    }
}
