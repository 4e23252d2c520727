use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use minishop_cli::Cli;

fn main() -> anyhow::Result<ExitCode> {
    let result = minishop_cli::run(Cli::parse());

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", result.output).context("failed to write command output")?;
    Ok(ExitCode::from(result.exit_code))
}
