//! Document service
//!
//! Loads schemas and submission values, builds documents and writes rendered output.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rayon::prelude::*;
use tracing::{debug, info, instrument};

use crate::application::error_ext::{DomainResultExt, IoResultExt};
use crate::application::render::Renderer;
use crate::application::schema::{parse_schema, parse_values};
use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{Document, DocumentSchema, FlatValueMap};
use crate::infrastructure::traits::FileSystem;

/// Outcome for one values file in a batch: the built document, or the
/// path it was written to.
#[derive(Debug)]
pub struct BuildOutcome<T = Document> {
    pub source: PathBuf,
    pub result: ApplicationResult<T>,
}

/// Service for building documents from schema and values files.
pub struct DocumentService {
    fs: Arc<dyn FileSystem>,
}

impl DocumentService {
    /// Create a new document service.
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// Load and validate a schema file.
    #[instrument(level = "debug", skip(self))]
    pub fn load_schema(&self, path: &Path) -> ApplicationResult<DocumentSchema> {
        let content = self.read(path, "read schema")?;
        let schema = parse_schema(&content, path)?;
        info!(
            root = schema.root_name(),
            groups = schema.table().len(),
            "loaded schema {}",
            path.display()
        );
        Ok(schema)
    }

    /// Load one submission's values.
    #[instrument(level = "debug", skip(self))]
    pub fn load_values(&self, path: &Path) -> ApplicationResult<FlatValueMap> {
        let content = self.read(path, "read values")?;
        parse_values(&content, path)
    }

    /// Build a document for the values stored at `values_path`.
    #[instrument(level = "debug", skip(self, schema))]
    pub fn build(&self, schema: &DocumentSchema, values_path: &Path) -> ApplicationResult<Document> {
        let values = self.load_values(values_path)?;
        let document = Document::build(schema, &values).in_file(values_path)?;
        debug!(nodes = document.root().node_count(), "built document");
        Ok(document)
    }

    /// Build many values files against one shared schema, in parallel.
    ///
    /// Each build owns its tree; results keep the input order.
    pub fn build_batch(&self, schema: &DocumentSchema, sources: &[PathBuf]) -> Vec<BuildOutcome> {
        debug!(count = sources.len(), "batch build");
        sources
            .par_iter()
            .map(|source| BuildOutcome {
                source: source.clone(),
                result: self.build(schema, source),
            })
            .collect()
    }

    /// Build a batch and write each document to `<dir>/<stem>.xml`.
    ///
    /// A failed build or write only fails that entry; the rest are still written.
    #[instrument(level = "debug", skip(self, schema, sources, renderer))]
    pub fn write_batch(
        &self,
        schema: &DocumentSchema,
        sources: &[PathBuf],
        renderer: &dyn Renderer,
        dir: &Path,
    ) -> Vec<BuildOutcome<PathBuf>> {
        self.build_batch(schema, sources)
            .into_iter()
            .map(|BuildOutcome { source, result }| {
                let result = result.and_then(|document| {
                    let target = Self::output_path_for(dir, &source);
                    self.write_rendered(&document, renderer, &target)?;
                    Ok(target)
                });
                BuildOutcome { source, result }
            })
            .collect()
    }

    /// Render `document` and write it to `target`, creating parent directories.
    pub fn write_rendered(
        &self,
        document: &Document,
        renderer: &dyn Renderer,
        target: &Path,
    ) -> ApplicationResult<()> {
        self.fs
            .ensure_parent(target)
            .with_path_context("create parent directory", target)?;
        let rendered = renderer.render(document)?;
        self.fs
            .write(target, &rendered)
            .with_path_context("write document", target)?;
        info!("wrote {}", target.display());
        Ok(())
    }

    /// `<dir>/<stem of source>.xml`
    pub fn output_path_for(dir: &Path, source: &Path) -> PathBuf {
        let stem = source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document".to_string());
        dir.join(format!("{stem}.xml"))
    }

    fn read(&self, path: &Path, action: &str) -> ApplicationResult<String> {
        if !self.fs.is_file(path) {
            return Err(ApplicationError::OperationFailed {
                context: format!("{}: {}", action, path.display()),
                source: "file not found".into(),
            });
        }
        self.fs.read_to_string(path).with_path_context(action, path)
    }
}
