//! # jsv-schema — Document Loading & Schema Validation
//!
//! Loads a JSON Schema document and a JSON instance document from disk
//! and checks the instance against the schema. The keyword semantics
//! themselves (`type`, `properties`, `required`, `$ref`, formats, ...)
//! come from the `jsonschema` crate; this crate only wires documents
//! into it and turns its output into structured errors.
//!
//! ## Modules
//!
//! - [`document`] — reads a file and parses it as JSON.
//! - [`retrieve`] — local-only `$ref` retrieval (`file://` and paths
//!   relative to the schema file). Remote URIs are refused.
//! - [`validate`] — [`SchemaValidator`], the compiled-validator wrapper,
//!   and the [`SchemaValidationError`] taxonomy.
//!
//! ## Crate Policy
//!
//! - No network access: every `$ref` is resolved from the filesystem.
//! - Documents are forwarded to the validator as-is. The draft is taken
//!   from the schema's `$schema` keyword unless explicitly pinned.
//! - Violations are reported with instance path, schema path and the
//!   library's own message; nothing is reworded here.

pub mod document;
pub mod retrieve;
pub mod validate;

pub use document::load_document;
pub use jsonschema::Draft;
pub use retrieve::LocalFileRetriever;
pub use validate::{
    validate_json_with_schema, SchemaValidationError, SchemaValidator, ValidationViolations,
    Violation,
};
