use clap::Parser;

/// watchrun - rerun a command every time a file in the current directory is saved
#[derive(Parser, Debug)]
#[command(name = "watchrun")]
#[command(author, version, about, long_about = None)]
#[command(
    after_help = "While watching, type `r` and Enter to rerun, `q` and Enter (or Ctrl+C) to quit."
)]
pub struct Cli {
    /// Command to run, followed by its arguments
    #[arg(
        value_name = "COMMAND",
        required = true,
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub command: Vec<String>,
}
