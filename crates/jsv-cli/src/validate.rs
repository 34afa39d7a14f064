//! # Validate Command
//!
//! Resolves the schema and object paths from the command line, then hands
//! both to `jsv-schema` for loading and validation.
//!
//! Argument order is fixed: the schema comes first, the object second.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};

use jsv_schema::{validate_json_with_schema, Draft};

/// JSON Schema drafts accepted by `--draft`.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum DraftArg {
    /// Draft 4.
    #[value(name = "4")]
    Draft4,
    /// Draft 6.
    #[value(name = "6")]
    Draft6,
    /// Draft 7.
    #[value(name = "7")]
    Draft7,
    /// Draft 2019-09.
    #[value(name = "2019-09")]
    Draft201909,
    /// Draft 2020-12.
    #[value(name = "2020-12")]
    Draft202012,
}

impl From<DraftArg> for Draft {
    fn from(arg: DraftArg) -> Self {
        match arg {
            DraftArg::Draft4 => Draft::Draft4,
            DraftArg::Draft6 => Draft::Draft6,
            DraftArg::Draft7 => Draft::Draft7,
            DraftArg::Draft201909 => Draft::Draft201909,
            DraftArg::Draft202012 => Draft::Draft202012,
        }
    }
}

/// Arguments for validating one object against one schema.
#[derive(Args, Debug, Default)]
pub struct ValidateArgs {
    /// Path to the JSON Schema document.
    #[arg(value_name = "SCHEMA", allow_hyphen_values = true)]
    pub schema: Option<PathBuf>,

    /// Path to the JSON document to check.
    #[arg(value_name = "OBJECT", allow_hyphen_values = true)]
    pub object: Option<PathBuf>,

    /// Pin the JSON Schema draft instead of detecting it from `$schema`.
    #[arg(long, value_enum, value_name = "DRAFT")]
    pub draft: Option<DraftArg>,

    /// Ignored. Accepted so that trailing arguments do not abort the run.
    #[arg(value_name = "EXTRA", hide = true, allow_hyphen_values = true)]
    pub extra: Vec<String>,
}

/// Execute the validation.
///
/// Returns exit code 0 when the object conforms and 1 on a usage error.
/// Load, parse, schema and validation failures are returned as errors.
pub fn run_validate(args: &ValidateArgs, program: &str) -> Result<u8> {
    let (Some(schema_path), Some(object_path)) = (&args.schema, &args.object) else {
        println!("{}", crate::usage_line(program));
        return Ok(1);
    };

    if !args.extra.is_empty() {
        tracing::debug!(ignored = ?args.extra, "ignoring extra arguments");
    }

    validate_json_with_schema(object_path, schema_path, args.draft.map(Draft::from))
        .with_context(|| {
            format!(
                "failed to validate {} against {}",
                object_path.display(),
                schema_path.display()
            )
        })?;

    tracing::info!(
        object = %object_path.display(),
        schema = %schema_path.display(),
        "validation passed"
    );
    Ok(0)
}
