//! Two-phase generation: lower every file, then resolve and render.

use crate::config::TypedeclConfig;
use crate::error::{Error, Result};
use crate::render::{JsonRenderer, RenderMeta, Renderer};
use indexmap::IndexMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use typedecl_core::ignore::strip_ignored;
use typedecl_core::ir::{FileMap, RootNode};
use typedecl_core::resolve_all;
use typedecl_frontend::{FrontEnd, lower_all};

/// One rendered output, not yet written anywhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFile {
    pub path: PathBuf,
    pub contents: String,
}

/// Everything one `generate` call produced.
///
/// A file that fails to resolve or render only loses its own outputs; the
/// error is kept in `failures` and the remaining files are still rendered.
#[derive(Debug, Default)]
pub struct Generation {
    pub outputs: Vec<RenderedFile>,
    pub failures: Vec<Error>,
}

impl Generation {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// The outputs, or the first failure.
    pub fn into_result(self) -> Result<Vec<RenderedFile>> {
        match self.failures.into_iter().next() {
            Some(err) => Err(err),
            None => Ok(self.outputs),
        }
    }
}

pub struct Generator<'f> {
    front_end: &'f dyn FrontEnd,
    config: TypedeclConfig,
    renderers: Vec<Box<dyn Renderer>>,
}

impl<'f> Generator<'f> {
    /// A generator with no renderers besides the `.ast.json` dump when
    /// `render.dump_ast` is set.
    pub fn new(front_end: &'f dyn FrontEnd, config: TypedeclConfig) -> Self {
        let mut renderers: Vec<Box<dyn Renderer>> = Vec::new();
        if config.render.dump_ast {
            renderers.push(Box::new(JsonRenderer::ast()));
        }
        Self {
            front_end,
            config,
            renderers,
        }
    }

    pub fn with_renderer(mut self, renderer: impl Renderer + 'static) -> Self {
        self.renderers.push(Box::new(renderer));
        self
    }

    pub fn config(&self) -> &TypedeclConfig {
        &self.config
    }

    /// Lower `paths`, resolve them when a renderer asks for it, and render
    /// every file with every renderer. Outputs follow the order of `paths`,
    /// then the order renderers were added in.
    ///
    /// Only lowering failures abort the run. A file whose resolved root
    /// collapses to nothing is skipped by renderers that need resolution.
    pub fn generate<P>(&self, paths: &[P]) -> Result<Generation>
    where
        P: AsRef<str> + Sync,
    {
        info!("Lowering {} files", paths.len());
        let files = self.lower(paths)?;

        let mut resolved: IndexMap<String, _> =
            if self.renderers.iter().any(|r| r.requires_resolution()) {
                info!("Resolving {} files", files.len());
                resolve_all(&files, self.config.resolve_options())
                    .into_iter()
                    .collect()
            } else {
                IndexMap::new()
            };

        let mut generation = Generation::default();
        for root in files.roots() {
            let file = root.file_name.as_str();
            let resolved_root = match resolved.shift_remove(file) {
                Some(Err(source)) => {
                    warn!("Resolution failed for {file}: {source}");
                    generation.failures.push(Error::Resolve {
                        file: file.to_string(),
                        source,
                    });
                    None
                }
                Some(Ok(root)) => {
                    if root.is_none() {
                        debug!("Nothing left to render in {file} after resolution");
                    }
                    root
                }
                None => None,
            };

            for renderer in &self.renderers {
                let input = if renderer.requires_resolution() {
                    match &resolved_root {
                        Some(root) => root,
                        None => continue,
                    }
                } else {
                    root
                };
                match self.render(renderer.as_ref(), input) {
                    Ok(Some(output)) => generation.outputs.push(output),
                    Ok(None) => {}
                    Err(err) => {
                        warn!("{err}");
                        generation.failures.push(err);
                    }
                }
            }
        }
        info!(
            "Rendered {} files, {} failures",
            generation.outputs.len(),
            generation.failures.len()
        );
        Ok(generation)
    }

    fn lower<P>(&self, paths: &[P]) -> Result<FileMap>
    where
        P: AsRef<str> + Sync,
    {
        let files = lower_all(paths, self.front_end)?;
        Ok(match self.config.render.environment.as_deref() {
            Some(environment) => files
                .roots()
                .map(|root| strip_ignored(root, environment))
                .collect(),
            None => files,
        })
    }

    fn render(&self, renderer: &dyn Renderer, root: &RootNode) -> Result<Option<RenderedFile>> {
        let meta = self.meta(&root.file_name, renderer.file_extension())?;
        let contents = renderer
            .render(root, &meta)
            .map_err(|err| Error::Render {
                file: root.file_name.clone(),
                renderer: renderer.name().to_string(),
                message: err.to_string(),
            })?;

        let Some(contents) = contents else {
            debug!("{} produced nothing for {}", renderer.name(), root.file_name);
            return Ok(None);
        };
        let path = self.config.project.output_directory.join(&meta.relative_path);
        Ok(Some(RenderedFile { path, contents }))
    }

    /// Paths of the output `file_name` renders to with `extension`.
    fn meta(&self, file_name: &str, extension: &str) -> Result<RenderMeta> {
        let path = Path::new(file_name);
        let source_relative = path
            .strip_prefix(&self.config.project.source_directory)
            .unwrap_or(path);
        let relative_path = output_name(source_relative, extension);

        let output_directory = &self.config.project.output_directory;
        let absolute_path = if output_directory.is_absolute() {
            output_directory.join(&relative_path)
        } else {
            std::env::current_dir()?
                .join(output_directory)
                .join(&relative_path)
        };
        Ok(RenderMeta {
            absolute_path,
            relative_path,
        })
    }
}

/// `relative` with its declaration extension replaced by `extension`.
fn output_name(relative: &Path, extension: &str) -> PathBuf {
    let text = relative.to_string_lossy();
    let stem = [".d.ts", ".ts"]
        .iter()
        .find_map(|ext| text.strip_suffix(ext))
        .unwrap_or(&text);
    PathBuf::from(format!("{stem}{extension}"))
}
