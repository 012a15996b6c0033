use anyhow::Result;
use clap::{Parser, Subcommand};

mod check;
mod schema;

#[derive(Parser)]
#[command(name = "pulse")]
#[command(about = "Survey report linter.", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Check report documents against the grammar and data-binding rules.
    Check(check::CheckArgs),
    /// Print an embedded JSON Schema.
    Schema(schema::SchemaArgs),
}

fn main() -> std::process::ExitCode {
    match try_main() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{err:#}");
            std::process::ExitCode::from(2)
        }
    }
}

fn try_main() -> Result<std::process::ExitCode> {
    let cli = Cli::parse();
    match cli.cmd {
        Cmd::Check(args) => check::cmd_check(args),
        Cmd::Schema(args) => schema::cmd_schema(args),
    }
}
