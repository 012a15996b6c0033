use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use jsonschema::{Draft, Validator};
use serde_json::Value;

pub const REPORT_SCHEMA_BYTES: &[u8] = include_bytes!("../../../spec/pulse.report.schema.json");
pub const DIAG_SCHEMA_BYTES: &[u8] = include_bytes!("../../../spec/pulse.diag.schema.json");

/// Grammar-level validator for report documents, run before the semantic
/// checks.
pub fn build_report_validator() -> Result<Validator> {
    let schema: Value =
        serde_json::from_slice(REPORT_SCHEMA_BYTES).context("parse embedded report schema")?;
    jsonschema::options()
        .with_draft(Draft::Draft202012)
        .build(&schema)
        .context("build report schema validator")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[clap(rename_all = "kebab_case")]
pub enum SchemaKind {
    Report,
    Diag,
}

#[derive(Debug, Args)]
pub struct SchemaArgs {
    /// Which embedded schema to print.
    #[arg(long, value_enum, default_value_t = SchemaKind::Report)]
    pub which: SchemaKind,
}

pub fn cmd_schema(args: SchemaArgs) -> Result<std::process::ExitCode> {
    let bytes = match args.which {
        SchemaKind::Report => REPORT_SCHEMA_BYTES,
        SchemaKind::Diag => DIAG_SCHEMA_BYTES,
    };
    let value: Value = serde_json::from_slice(bytes).context("parse embedded schema")?;
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(std::process::ExitCode::SUCCESS)
}
