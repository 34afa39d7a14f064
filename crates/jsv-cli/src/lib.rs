//! # jsv-cli — JSON Schema Validation CLI
//!
//! Provides the `jsv` command:
//!
//! ```bash
//! jsv schema.json object.json
//! jsv --draft 7 -v schema.json object.json
//! ```
//!
//! Exit status is `0` when the object conforms to the schema and `1`
//! otherwise (too few arguments, unreadable or malformed files, an invalid
//! schema, or any violation).
//!
//! ## Crate Policy
//!
//! - Argument parsing is separated from validation logic, which lives in
//!   `jsv-schema`.
//! - Only the usage case is handled here; every other failure is returned
//!   to `main` as an error and reported there.

pub mod validate;

use std::ffi::OsString;

/// Program name used when the invocation name is unavailable.
pub const DEFAULT_PROGRAM_NAME: &str = "jsv";

/// Derive the display name of the running program from `argv[0]`.
pub fn program_name(argv0: Option<OsString>) -> String {
    argv0
        .map(|arg| arg.to_string_lossy().into_owned())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| DEFAULT_PROGRAM_NAME.to_string())
}

/// The one-line usage message printed when arguments are missing.
pub fn usage_line(program: &str) -> String {
    format!("Usage: {program} schema object")
}
