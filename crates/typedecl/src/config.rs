//! Configuration module
//!
//! Handles loading of `typedecl.toml`. Every section and field is optional.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use typedecl_core::ResolveOptions;

/// Root configuration from typedecl.toml
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TypedeclConfig {
    #[serde(default)]
    pub project: ProjectSection,

    #[serde(default)]
    pub resolve: ResolveSection,

    #[serde(default)]
    pub render: RenderSection,
}

/// [project] section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectSection {
    /// Root that source paths are reported relative to
    #[serde(default = "default_source_directory")]
    pub source_directory: PathBuf,
    /// Where rendered files are meant to be written
    #[serde(default = "default_output_directory")]
    pub output_directory: PathBuf,
}

/// [resolve] section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolveSection {
    #[serde(default = "default_max_instantiation_depth")]
    pub max_instantiation_depth: usize,
}

/// [render] section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderSection {
    /// Target environment checked against `@ignore` tags
    #[serde(default)]
    pub environment: Option<String>,
    /// Also emit the unresolved IR as `.ast.json`
    #[serde(default)]
    pub dump_ast: bool,
}

fn default_source_directory() -> PathBuf {
    PathBuf::from(".")
}

fn default_output_directory() -> PathBuf {
    PathBuf::from("generated")
}

fn default_max_instantiation_depth() -> usize {
    ResolveOptions::default().max_instantiation_depth
}

impl Default for ProjectSection {
    fn default() -> Self {
        Self {
            source_directory: default_source_directory(),
            output_directory: default_output_directory(),
        }
    }
}

impl Default for ResolveSection {
    fn default() -> Self {
        Self {
            max_instantiation_depth: default_max_instantiation_depth(),
        }
    }
}

impl TypedeclConfig {
    /// Load configuration from a file path
    pub fn load(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> crate::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn resolve_options(&self) -> ResolveOptions {
        ResolveOptions {
            max_instantiation_depth: self.resolve.max_instantiation_depth,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_toml() -> anyhow::Result<()> {
        let toml_content = r#"
[project]
source_directory = "schemas"

[resolve]
max_instantiation_depth = 16

[render]
environment = "swift"
dump_ast = true
"#;
        let dir = tempfile::tempdir()?;
        let file_path = dir.path().join("typedecl.toml");
        std::fs::write(&file_path, toml_content)?;

        let config = TypedeclConfig::load(&file_path)?;
        assert_eq!(config.project.source_directory, PathBuf::from("schemas"));
        assert_eq!(config.project.output_directory, PathBuf::from("generated"));
        assert_eq!(config.resolve_options().max_instantiation_depth, 16);
        assert_eq!(config.render.environment.as_deref(), Some("swift"));
        assert!(config.render.dump_ast);

        Ok(())
    }

    #[test]
    fn test_empty_config_uses_defaults() -> anyhow::Result<()> {
        let config = TypedeclConfig::from_toml_str("")?;
        assert_eq!(config, TypedeclConfig::default());
        assert_eq!(config.resolve.max_instantiation_depth, 64);
        assert!(!config.render.dump_ast);
        Ok(())
    }

    #[test]
    fn test_invalid_config() {
        let err = TypedeclConfig::from_toml_str("[resolve]\nmax_instantiation_depth = \"deep\"")
            .unwrap_err();
        assert!(matches!(err, crate::Error::Config(_)));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = TypedeclConfig::load(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, crate::Error::Io(_)));
    }
}
