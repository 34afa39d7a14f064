//! # Schema Validation
//!
//! Checks a JSON instance against a JSON Schema using the `jsonschema`
//! crate and reports every violation it finds.
//!
//! ## Draft Selection
//!
//! By default the draft is detected from the schema's `$schema` keyword,
//! falling back to the library's default (Draft 2020-12). A draft can be
//! pinned with [`SchemaValidator::with_draft`].
//!
//! ## Schema Resolution
//!
//! External `$ref`s are resolved by [`LocalFileRetriever`] relative to the
//! directory holding the schema file. Internal `$ref`s of the form
//! `#/$defs/<name>` are resolved by the jsonschema crate natively.

use std::fmt;
use std::path::{Path, PathBuf};

use jsonschema::{Draft, ValidationOptions, Validator};
use serde_json::Value;
use thiserror::Error;

use crate::document::load_document;
use crate::retrieve::LocalFileRetriever;

/// Error during document loading or schema validation.
#[derive(Error, Debug)]
pub enum SchemaValidationError {
    /// The document did not conform to the schema.
    #[error("validation failed against schema '{schema_name}':\n{violations}")]
    ValidationFailed {
        /// Name of the schema that was validated against.
        schema_name: String,
        /// Structured list of individual violations.
        violations: ValidationViolations,
    },

    /// A schema or instance file could not be read or parsed.
    #[error("document load error for '{path}': {reason}")]
    DocumentLoadError {
        /// Path to the document that failed to load.
        path: String,
        /// Reason the document could not be loaded.
        reason: String,
    },

    /// The compiled validator could not be built (invalid schema or an
    /// unresolvable `$ref`).
    #[error("validator build error for schema '{schema_name}': {reason}")]
    ValidatorBuildError {
        /// Schema filename or identifier.
        schema_name: String,
        /// Reason the validator could not be built.
        reason: String,
    },
}

/// A single validation violation with structured context.
#[derive(Debug, Clone)]
pub struct Violation {
    /// JSON Pointer path to the violating field in the instance.
    pub instance_path: String,
    /// JSON Pointer path within the schema that triggered the error.
    pub schema_path: String,
    /// Human-readable description of the violation.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.instance_path.is_empty() {
            write!(f, "  (root): {} (at {})", self.message, self.schema_path)
        } else {
            write!(
                f,
                "  {}: {} (at {})",
                self.instance_path, self.message, self.schema_path
            )
        }
    }
}

/// Collection of validation violations.
#[derive(Debug, Clone)]
pub struct ValidationViolations {
    violations: Vec<Violation>,
}

impl ValidationViolations {
    /// Returns the number of violations.
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Returns true if there are no violations.
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Returns a slice of all violations.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Consumes self and returns the inner Vec.
    pub fn into_inner(self) -> Vec<Violation> {
        self.violations
    }
}

impl fmt::Display for ValidationViolations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.violations.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}

/// A schema validator backed by the `jsonschema` crate.
///
/// Holds one parsed schema document together with the directory used to
/// resolve its relative `$ref`s. Each call to [`validate_document`]
/// compiles the schema once and checks a single instance.
///
/// [`validate_document`]: SchemaValidator::validate_document
#[derive(Debug, Clone)]
pub struct SchemaValidator {
    /// Display name used in error messages (the schema file path).
    schema_name: String,
    /// Parsed schema document.
    schema: Value,
    /// Directory that relative `$ref`s resolve against.
    base_dir: PathBuf,
    /// Pinned draft, or `None` to detect from `$schema`.
    draft: Option<Draft>,
}

impl SchemaValidator {
    /// Load a schema from a JSON file.
    ///
    /// Relative `$ref`s in the schema resolve against the file's parent
    /// directory.
    ///
    /// # Errors
    ///
    /// Returns `SchemaValidationError::DocumentLoadError` if the file cannot
    /// be read or is not valid JSON.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SchemaValidationError> {
        let path = path.as_ref();
        let schema = load_document(path)?;
        let base_dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        tracing::info!(schema = %path.display(), "loaded schema");

        Ok(Self {
            schema_name: path.display().to_string(),
            schema,
            base_dir,
            draft: None,
        })
    }

    /// Wrap an already-parsed schema.
    ///
    /// `base_dir` is the directory relative `$ref`s resolve against.
    pub fn from_value(
        schema_name: impl Into<String>,
        schema: Value,
        base_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            schema_name: schema_name.into(),
            schema,
            base_dir: base_dir.into(),
            draft: None,
        }
    }

    /// Pin the JSON Schema draft instead of detecting it from `$schema`.
    pub fn with_draft(mut self, draft: Draft) -> Self {
        self.draft = Some(draft);
        self
    }

    /// Returns the parsed schema document.
    pub fn schema(&self) -> &Value {
        &self.schema
    }

    /// Returns the pinned draft, if any.
    pub fn draft(&self) -> Option<Draft> {
        self.draft
    }

    /// Build `ValidationOptions` with the local retriever installed so that
    /// external `$ref` URIs never reach the network.
    fn build_options(&self) -> ValidationOptions {
        let mut opts = jsonschema::options();
        if let Some(draft) = self.draft {
            opts.with_draft(draft);
        }
        opts.with_retriever(LocalFileRetriever::new(&self.base_dir));
        opts
    }

    /// Build a compiled `Validator` for the schema.
    ///
    /// # Errors
    ///
    /// Returns `SchemaValidationError::ValidatorBuildError` if the schema is
    /// not a valid JSON Schema or one of its `$ref`s cannot be resolved.
    pub fn build_validator(&self) -> Result<Validator, SchemaValidationError> {
        self.build_options().build(&self.schema).map_err(|e| {
            SchemaValidationError::ValidatorBuildError {
                schema_name: self.schema_name.clone(),
                reason: e.to_string(),
            }
        })
    }

    /// Validate a parsed JSON value against the schema.
    ///
    /// # Errors
    ///
    /// Returns `SchemaValidationError::ValidationFailed` with every
    /// violation the validator reports if the document is invalid, or
    /// `ValidatorBuildError` if the schema cannot be compiled.
    pub fn validate_document(&self, instance: &Value) -> Result<(), SchemaValidationError> {
        let validator = self.build_validator()?;

        let errors: Vec<Violation> = validator
            .iter_errors(instance)
            .map(|e| Violation {
                instance_path: e.instance_path.to_string(),
                schema_path: e.schema_path.to_string(),
                message: e.to_string(),
            })
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            tracing::debug!(
                schema = %self.schema_name,
                violations = errors.len(),
                "instance does not conform"
            );
            Err(SchemaValidationError::ValidationFailed {
                schema_name: self.schema_name.clone(),
                violations: ValidationViolations { violations: errors },
            })
        }
    }
}

/// Validate the JSON document at `object_path` against the schema at
/// `schema_path`.
///
/// The instance is loaded before the schema, so when both files are bad
/// the instance error is the one reported.
pub fn validate_json_with_schema(
    object_path: &Path,
    schema_path: &Path,
    draft: Option<Draft>,
) -> Result<(), SchemaValidationError> {
    let instance = load_document(object_path)?;
    tracing::info!(instance = %object_path.display(), "loaded instance");

    let mut validator = SchemaValidator::from_file(schema_path)?;
    if let Some(draft) = draft {
        tracing::debug!(?draft, "pinning JSON Schema draft");
        validator = validator.with_draft(draft);
    }
    validator.validate_document(&instance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn validator_for(schema: Value) -> SchemaValidator {
        SchemaValidator::from_value("inline", schema, ".")
    }

    #[test]
    fn test_object_schema_accepts_object() {
        validator_for(json!({"type": "object"}))
            .validate_document(&json!({"a": 1}))
            .unwrap();
    }

    #[test]
    fn test_object_schema_rejects_array() {
        let err = validator_for(json!({"type": "object"}))
            .validate_document(&json!([1, 2, 3]))
            .unwrap_err();
        match &err {
            SchemaValidationError::ValidationFailed { violations, .. } => {
                assert_eq!(violations.len(), 1);
                let v = &violations.violations()[0];
                assert_eq!(v.instance_path, "");
                assert!(v.schema_path.contains("type"), "got: {}", v.schema_path);
            }
            other => panic!("Expected ValidationFailed, got: {other}"),
        }
        assert!(err.to_string().contains("type"));
    }

    #[test]
    fn test_missing_required_property_reported() {
        let schema = json!({
            "type": "object",
            "required": ["name", "kind"],
            "properties": {
                "name": {"type": "string"},
                "kind": {"enum": ["legal", "technical"]}
            }
        });
        let err = validator_for(schema)
            .validate_document(&json!({"name": "x"}))
            .unwrap_err();
        match &err {
            SchemaValidationError::ValidationFailed { violations, .. } => {
                let messages: Vec<&str> =
                    violations.violations().iter().map(|v| v.message.as_str()).collect();
                assert!(
                    messages.iter().any(|m| m.contains("kind")),
                    "Expected violation mentioning 'kind', got: {messages:?}"
                );
            }
            other => panic!("Expected ValidationFailed, got: {other}"),
        }
    }

    #[test]
    fn test_all_violations_are_collected() {
        let schema = json!({
            "type": "object",
            "properties": {
                "age": {"type": "integer", "minimum": 0},
                "email": {"type": "string"}
            }
        });
        let err = validator_for(schema)
            .validate_document(&json!({"age": -3, "email": 7}))
            .unwrap_err();
        match err {
            SchemaValidationError::ValidationFailed { violations, .. } => {
                assert_eq!(violations.len(), 2);
                let mut paths: Vec<String> = violations
                    .into_inner()
                    .into_iter()
                    .map(|v| v.instance_path)
                    .collect();
                paths.sort();
                assert_eq!(paths, vec!["/age".to_string(), "/email".to_string()]);
            }
            other => panic!("Expected ValidationFailed, got: {other}"),
        }
    }

    #[test]
    fn test_scalar_schema_and_instance() {
        let validator = validator_for(json!({"type": "string", "maxLength": 3}));
        validator.validate_document(&json!("abc")).unwrap();
        assert!(validator.validate_document(&json!("abcd")).is_err());
    }

    #[test]
    fn test_boolean_schemas() {
        validator_for(json!(true))
            .validate_document(&json!({"anything": [1, 2]}))
            .unwrap();
        assert!(validator_for(json!(false))
            .validate_document(&json!(null))
            .is_err());
    }

    #[test]
    fn test_invalid_schema_is_build_error() {
        let err = validator_for(json!({"type": 12}))
            .validate_document(&json!({}))
            .unwrap_err();
        assert!(
            matches!(err, SchemaValidationError::ValidatorBuildError { .. }),
            "Expected ValidatorBuildError, got: {err}"
        );
    }

    #[test]
    fn test_internal_ref_resolution() {
        let schema = json!({
            "$defs": {"positive": {"type": "integer", "exclusiveMinimum": 0}},
            "type": "array",
            "items": {"$ref": "#/$defs/positive"}
        });
        let validator = validator_for(schema);
        validator.validate_document(&json!([1, 2, 3])).unwrap();
        assert!(validator.validate_document(&json!([1, 0])).is_err());
    }

    #[test]
    fn test_pinned_draft4_exclusive_minimum() {
        // Draft 4 spells exclusiveMinimum as a boolean modifier.
        let schema = json!({"minimum": 5, "exclusiveMinimum": true});
        let validator = validator_for(schema).with_draft(Draft::Draft4);
        assert_eq!(validator.draft(), Some(Draft::Draft4));
        validator.validate_document(&json!(6)).unwrap();
        assert!(matches!(
            validator.validate_document(&json!(5)),
            Err(SchemaValidationError::ValidationFailed { .. })
        ));
    }

    #[test]
    fn test_draft_detected_from_schema_keyword() {
        let schema = json!({
            "$schema": "http://json-schema.org/draft-04/schema#",
            "minimum": 5,
            "exclusiveMinimum": true
        });
        let validator = validator_for(schema);
        assert_eq!(validator.draft(), None);
        assert!(validator.validate_document(&json!(5)).is_err());
        validator.validate_document(&json!(6)).unwrap();
    }

    #[test]
    fn test_relative_file_ref_resolution() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("name.schema.json"),
            br#"{"type": "string", "minLength": 1}"#,
        )
        .unwrap();
        let schema_path = dir.path().join("person.schema.json");
        std::fs::write(
            &schema_path,
            br#"{"type": "object", "properties": {"name": {"$ref": "name.schema.json"}}}"#,
        )
        .unwrap();

        let validator = SchemaValidator::from_file(&schema_path).unwrap();
        validator.validate_document(&json!({"name": "Ada"})).unwrap();
        assert!(matches!(
            validator.validate_document(&json!({"name": ""})),
            Err(SchemaValidationError::ValidationFailed { .. })
        ));
    }

    #[test]
    fn test_relative_ref_with_encoded_file_name() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("my defs.json"), br#"{"type": "integer"}"#).unwrap();
        let schema_path = dir.path().join("schema.json");
        std::fs::write(&schema_path, br#"{"$ref": "my%20defs.json"}"#).unwrap();

        let validator = SchemaValidator::from_file(&schema_path).unwrap();
        validator.validate_document(&json!(3)).unwrap();
        assert!(matches!(
            validator.validate_document(&json!("three")),
            Err(SchemaValidationError::ValidationFailed { .. })
        ));
    }

    #[test]
    fn test_remote_ref_is_refused() {
        let schema = json!({"$ref": "https://example.com/schemas/remote.json"});
        let err = validator_for(schema).build_validator().unwrap_err();
        assert!(
            matches!(err, SchemaValidationError::ValidatorBuildError { .. }),
            "Expected ValidatorBuildError, got: {err}"
        );
    }

    #[test]
    fn test_validate_json_with_schema_files() {
        let dir = tempfile::tempdir().unwrap();
        let schema_path = dir.path().join("schema.json");
        let good = dir.path().join("good.json");
        let bad = dir.path().join("bad.json");
        std::fs::write(&schema_path, br#"{"type": "object"}"#).unwrap();
        std::fs::write(&good, br#"{"a": 1}"#).unwrap();
        std::fs::write(&bad, b"[1, 2, 3]").unwrap();

        validate_json_with_schema(&good, &schema_path, None).unwrap();
        assert!(matches!(
            validate_json_with_schema(&bad, &schema_path, None),
            Err(SchemaValidationError::ValidationFailed { .. })
        ));
    }

    #[test]
    fn test_instance_loaded_before_schema() {
        let dir = tempfile::tempdir().unwrap();
        let missing_schema = dir.path().join("missing.schema.json");
        let missing_instance = dir.path().join("missing.json");

        let err = validate_json_with_schema(&missing_instance, &missing_schema, None).unwrap_err();
        match err {
            SchemaValidationError::DocumentLoadError { path, .. } => {
                assert!(path.ends_with("missing.json"), "got: {path}");
                assert!(!path.ends_with("missing.schema.json"), "got: {path}");
            }
            other => panic!("Expected DocumentLoadError, got: {other}"),
        }
    }

    #[test]
    fn test_from_file_base_dir_is_parent() {
        let dir = tempfile::tempdir().unwrap();
        let schema_path = dir.path().join("s.json");
        std::fs::write(&schema_path, b"{}").unwrap();
        let validator = SchemaValidator::from_file(&schema_path).unwrap();
        assert_eq!(validator.base_dir, dir.path());
        assert_eq!(validator.schema(), &json!({}));
    }

    #[test]
    fn test_violation_display_format() {
        let v = Violation {
            instance_path: "/items/1".to_string(),
            schema_path: "/properties/items/items/type".to_string(),
            message: r#""x" is not of type "integer""#.to_string(),
        };
        let display = v.to_string();
        assert!(display.contains("/items/1"));
        assert!(display.contains("is not of type"));
        assert!(display.contains("/properties/items/items/type"));
    }

    #[test]
    fn test_violation_display_root() {
        let v = Violation {
            instance_path: String::new(),
            schema_path: "/type".to_string(),
            message: r#"[1,2,3] is not of type "object""#.to_string(),
        };
        assert!(v.to_string().contains("(root)"));
    }
}
