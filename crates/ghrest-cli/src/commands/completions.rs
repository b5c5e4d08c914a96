//! `ghrest completions` command - Generate shell completions.

use clap::CommandFactory;
use clap_complete::{Shell, generate};

use super::Cli;

/// Run the completions command.
pub fn run(shell: Shell) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "ghrest", &mut std::io::stdout());
}
