//! Checker configuration
//!
//! Controls where packages are searched for and how imports resolve collisions.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::CoreError;

fn config_error(message: impl Into<String>) -> CoreError {
    CoreError::Config {
        message: message.into(),
    }
}

/// How `import` treats a name already bound in the importing scope.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportPolicy {
    /// Imported binding silently replaces the existing one.
    #[default]
    Permissive,
    /// Collision fails with `DuplicateBinding`.
    Strict,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckerConfig {
    /// Directories probed, in order, for `<dir>/<Package>.<ext>`
    #[serde(default)]
    pub include_path: Vec<PathBuf>,

    /// Extension of package source files
    #[serde(default = "default_source_extension")]
    pub source_extension: String,

    #[serde(default)]
    pub import_policy: ImportPolicy,

    /// Add `Function1..FunctionN` constructors to every session
    #[serde(default)]
    pub synthesize_function_constructors: bool,

    /// Exclusive upper bound on synthesized function arities
    #[serde(default = "default_function_arity_limit")]
    pub function_arity_limit: usize,
}

fn default_source_extension() -> String {
    "bsv".to_string()
}

fn default_function_arity_limit() -> usize {
    20
}

impl Default for CheckerConfig {
    fn default() -> Self {
        CheckerConfig {
            include_path: Vec::new(),
            source_extension: default_source_extension(),
            import_policy: ImportPolicy::Permissive,
            synthesize_function_constructors: false,
            function_arity_limit: default_function_arity_limit(),
        }
    }
}

impl CheckerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, CoreError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| config_error(format!("failed to read {}: {e}", path.display())))?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, CoreError> {
        let config: CheckerConfig =
            toml::from_str(content).map_err(|e| config_error(format!("failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.source_extension.is_empty() || self.source_extension.starts_with('.') {
            return Err(config_error(format!(
                "source_extension must be a bare extension, got '{}'",
                self.source_extension
            )));
        }
        if self.synthesize_function_constructors && self.function_arity_limit < 2 {
            return Err(config_error("function_arity_limit must be at least 2"));
        }
        Ok(())
    }

    pub fn with_include_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.include_path.push(dir.into());
        self
    }

    pub fn with_import_policy(mut self, policy: ImportPolicy) -> Self {
        self.import_policy = policy;
        self
    }

    pub fn with_function_constructors(mut self, limit: usize) -> Self {
        self.synthesize_function_constructors = true;
        self.function_arity_limit = limit;
        self
    }
}
