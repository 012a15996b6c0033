//! Shared, version-pinned schema identifiers.
//!
//! These constants are the single source of truth for the schema/version
//! strings stamped into machine-readable I/O: the report document grammar,
//! the diagnostics report the lint engine emits, and the CLI tool envelope.

pub const PULSE_REPORT_SCHEMA_VERSION: &str = "pulse.report@0.1.0";
pub const PULSE_DIAG_SCHEMA_VERSION: &str = "pulse.diag@0.1.0";
pub const PULSE_TOOL_REPORT_SCHEMA_VERSION: &str = "pulse.tool.report@0.1.0";
