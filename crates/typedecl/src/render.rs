//! Renderer contract and the IR dump renderer.

use serde::Serialize;
use std::path::PathBuf;
use typedecl_core::ir::RootNode;

/// Where the output being rendered will be written.
///
/// Both paths name the output file, not the declaration file it comes from,
/// so renderers can build links between generated files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderMeta {
    /// The output file, anchored at the working directory when the output
    /// directory is relative.
    pub absolute_path: PathBuf,
    /// The output file relative to the output directory, e.g. `types/b.schema.json`.
    pub relative_path: PathBuf,
}

/// Turns one IR root into the contents of one output file.
///
/// Renderers are stateless and shared across files.
pub trait Renderer: Send + Sync {
    /// Name used in error messages.
    fn name(&self) -> &str;

    /// Suffix replacing the source file's extension, e.g. `.schema.json`.
    fn file_extension(&self) -> &str;

    /// Whether the renderer is handed the resolved root (generics inlined,
    /// references annotated) or the root as lowered.
    fn requires_resolution(&self) -> bool {
        true
    }

    /// `Ok(None)` when the file produces no output.
    fn render(&self, root: &RootNode, meta: &RenderMeta) -> anyhow::Result<Option<String>>;
}

/// Dumps the IR as pretty printed JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JsonRenderer {
    resolved: bool,
}

impl JsonRenderer {
    /// The IR as lowered, written next to other outputs as `.ast.json`.
    pub fn ast() -> Self {
        Self { resolved: false }
    }

    /// The IR after resolution.
    pub fn resolved() -> Self {
        Self { resolved: true }
    }
}

impl Renderer for JsonRenderer {
    fn name(&self) -> &str {
        if self.resolved { "resolved-json" } else { "ast-json" }
    }

    fn file_extension(&self) -> &str {
        if self.resolved { ".resolved.json" } else { ".ast.json" }
    }

    fn requires_resolution(&self) -> bool {
        self.resolved
    }

    fn render(&self, root: &RootNode, _meta: &RenderMeta) -> anyhow::Result<Option<String>> {
        Ok(Some(to_pretty_json(root)?))
    }
}

fn to_pretty_json<T: Serialize>(value: &T) -> serde_json::Result<String> {
    let mut json = serde_json::to_string_pretty(value)?;
    json.push('\n');
    Ok(json)
}
