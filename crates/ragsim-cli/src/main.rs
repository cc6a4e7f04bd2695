use clap::Parser;

mod cli;
mod cmd;
mod error;
mod io;
mod script;
mod session;

use cli::{Cli, Command};

fn main() {
    let cli = Cli::parse();

    let result = match &cli.command {
        Command::Run { script } => cmd::run::run(script, &cli.format),
        Command::Check { script } => cmd::check::run(script, &cli.format),
        Command::Stats { script } => cmd::stats::run(script, &cli.format),
    };

    if let Err(err) = result {
        let message = err.message();
        if !message.is_empty() {
            eprintln!("{message}");
        }
        std::process::exit(err.exit_code());
    }
}
