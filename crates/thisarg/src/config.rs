//! `thisarg.toml` project configuration.
//!
//! ```toml
//! [syntax]
//! bind_operator = true
//! typescript = false
//! decorators = false
//! # module = true      # default: decided by file extension
//!
//! [lower]
//! guard_global_receiver = true
//!
//! [output]
//! out_dir = "dist"
//! indent = 2
//! verify = false
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::CompileOptions;
use thisarg_codegen::EmitOptions;
use thisarg_parser::Syntax;
use thisarg_transform::LowerOptions;

pub const CONFIG_FILE: &str = "thisarg.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid configuration in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub syntax: SyntaxConfig,
    pub lower: LowerConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyntaxConfig {
    pub bind_operator: bool,
    pub typescript: bool,
    pub decorators: bool,
    /// `None` picks by extension: `.mjs`/`.mts` are modules
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module: Option<bool>,
}

impl Default for SyntaxConfig {
    fn default() -> Self {
        Self {
            bind_operator: true,
            typescript: false,
            decorators: false,
            module: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LowerConfig {
    pub guard_global_receiver: bool,
}

impl Default for LowerConfig {
    fn default() -> Self {
        Self {
            guard_global_receiver: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub out_dir: PathBuf,
    pub indent: usize,
    pub verify: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("dist"),
            indent: 2,
            verify: false,
        }
    }
}

impl Config {
    pub fn from_toml(text: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&text, path)?;
        log::debug!("loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Look for `thisarg.toml` in `start` and its ancestors.
    pub fn discover(start: &Path) -> Result<Option<(PathBuf, Self)>, ConfigError> {
        for dir in start.ancestors() {
            let candidate = dir.join(CONFIG_FILE);
            if candidate.is_file() {
                let config = Self::load(&candidate)?;
                return Ok(Some((candidate, config)));
            }
        }
        Ok(None)
    }

    /// Dialect for one input file.
    pub fn syntax_for(&self, file: &Path) -> Syntax {
        let extension = file.extension().and_then(|e| e.to_str()).unwrap_or("");
        Syntax {
            bind_operator: self.syntax.bind_operator,
            typescript: self.syntax.typescript || matches!(extension, "ts" | "mts"),
            decorators: self.syntax.decorators,
            module: self
                .syntax
                .module
                .unwrap_or(matches!(extension, "mjs" | "mts")),
        }
    }

    /// Pipeline options for one input file.
    pub fn compile_options(&self, file: &Path) -> CompileOptions {
        CompileOptions {
            syntax: self.syntax_for(file),
            lower: LowerOptions {
                guard_global_receiver: self.lower.guard_global_receiver,
            },
            emit: EmitOptions {
                indent: self.output.indent,
            },
            verify: self.output.verify,
        }
    }

    /// Text written by `thisarg init`.
    pub fn default_toml() -> String {
        let body = toml::to_string_pretty(&Config::default()).unwrap_or_default();
        format!(
            "# thisarg configuration\n# `[syntax] module` defaults to the file extension (.mjs is a module)\n\n{}",
            body
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_sections_use_defaults() {
        let config = Config::from_toml("[output]\nindent = 4\n", Path::new("thisarg.toml")).unwrap();
        assert_eq!(config.output.indent, 4);
        assert_eq!(config.output.out_dir, PathBuf::from("dist"));
        assert!(config.syntax.bind_operator);
        assert!(config.lower.guard_global_receiver);
    }

    #[test]
    fn test_module_follows_extension() {
        let config = Config::default();
        assert!(config.syntax_for(Path::new("a.mjs")).module);
        assert!(!config.syntax_for(Path::new("a.js")).module);
        assert!(config.syntax_for(Path::new("a.ts")).typescript);

        let forced = Config::from_toml("[syntax]\nmodule = true\n", Path::new("x")).unwrap();
        assert!(forced.syntax_for(Path::new("a.js")).module);
    }

    #[test]
    fn test_bad_toml_names_the_file() {
        let err = Config::from_toml("[lower]\nguard_global_receiver = \"yes\"\n", Path::new("cfg/thisarg.toml"))
            .unwrap_err();
        assert!(err.to_string().contains("cfg/thisarg.toml"));
    }

    #[test]
    fn test_default_file_round_trips() {
        let text = Config::default_toml();
        let parsed = Config::from_toml(&text, Path::new("thisarg.toml")).unwrap();
        assert_eq!(parsed, Config::default());
    }
}
