use clap::Args;
use std::path::PathBuf;

/// Global arguments that apply to all subcommands
#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Suppress informational notices
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Extra configuration file, applied after user and local overrides
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

impl GlobalArgs {
    fn use_color(&self) -> bool {
        use std::io::IsTerminal;
        !self.no_color && std::env::var("NO_COLOR").is_err() && std::io::stderr().is_terminal()
    }

    /// Prints an informational line to stderr unless `--quiet` is set.
    pub fn info(&self, message: &str) {
        if !self.quiet {
            eprintln!("{}", message);
        }
    }

    /// Prints a success banner to stderr unless `--quiet` is set.
    pub fn success(&self, message: &str) {
        if self.quiet {
            return;
        }
        if self.use_color() {
            eprintln!("\x1b[48;5;10m\x1b[38;5;16m SUCCESS \x1b[49;39m {}", message);
        } else {
            eprintln!("SUCCESS {}", message);
        }
    }

    /// Prints a warning to stderr. Warnings are not silenced by `--quiet`.
    pub fn warn(&self, message: &str) {
        if self.use_color() {
            eprintln!("\x1b[1;33mwarning:\x1b[0m {}", message);
        } else {
            eprintln!("warning: {}", message);
        }
    }
}
