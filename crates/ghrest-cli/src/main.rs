//! ghrest CLI - GitHub REST helpers and Actions workflows for Rust projects.

use clap::Parser;

mod commands;
mod logging;
mod output;

use commands::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    output::set_quiet(cli.quiet);
    logging::init(cli.verbose, cli.quiet);

    let repo = cli.repo.as_deref();
    let result = match cli.command {
        Commands::Pr(command) => commands::pr::run(command, repo, cli.json),
        Commands::Branch(command) => commands::branch::run(command, repo, cli.json),
        Commands::Org(command) => commands::org::run(command, cli.json),
        Commands::Bench(command) => commands::bench::run(command, &cli.config),
        Commands::Profile(args) => commands::profile::run(args, &cli.config),
        Commands::Completions { shell } => {
            commands::completions::run(shell);
            Ok(())
        }
    };

    if let Err(e) = result {
        output::error(&format!("{e:#}"));
        std::process::exit(1);
    }
}
