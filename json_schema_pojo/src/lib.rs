//! Generate Java types with data-binding and validation annotations from JSON Schema.
//!
//! A [`GenerationRun`] collects schema documents, builds a graph of Java types
//! for them and, once finished, yields a [`GeneratedModel`] that renders one
//! source unit per top-level type.

pub mod annotate;
mod builder;
pub mod codegen;
mod dispatch;
mod error;
pub mod json_pointer;
pub mod model;
pub mod naming;
mod polymorphism;
pub mod resolver;
pub mod schema;
pub mod settings;
pub mod validate;

pub use codegen::SourceUnit;
pub use error::{GenerationError, Result};
pub use settings::{AnnotationStyle, DiscriminatorId, GenerationSettings};
pub use validate::ConstraintViolation;

use serde_json::Value;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::annotate::Decorations;
use crate::builder::GraphBuilder;
use crate::model::{TypeGraph, TypeId, TypeRef};
use crate::schema::CanonicalUri;

/// URI under which in-memory schemas are registered.
fn memory_uri(name: &str) -> String {
    if name.contains("://") {
        name.to_string()
    } else {
        format!("mem:///{}", name.trim_start_matches('/'))
    }
}

/// One generation run: schema documents in, a frozen type model out.
///
/// Schemas reached from several documents share one generated type.
#[derive(Debug)]
pub struct GenerationRun {
    builder: GraphBuilder,
}

impl GenerationRun {
    #[must_use]
    pub fn new(settings: &GenerationSettings) -> Self {
        Self {
            builder: GraphBuilder::new(settings.clone()),
        }
    }

    #[must_use]
    pub const fn settings(&self) -> &GenerationSettings {
        &self.builder.settings
    }

    /// Generates the types a schema file describes.
    ///
    /// # Errors
    ///
    /// Returns the first `GenerationError` raised while resolving or building.
    pub fn add_document(&mut self, path: impl AsRef<Path>) -> Result<TypeRef> {
        let uri: String = resolver::file_uri(path.as_ref())?;
        self.builder.generate(&CanonicalUri::document_root(uri))
    }

    /// Makes schema text available to references without generating anything.
    ///
    /// `name` is a file name such as `address.json`, resolved as `mem:///address.json`,
    /// or an absolute URI. Returns the document URI.
    ///
    /// # Errors
    ///
    /// Returns `SchemaResolution` if the text is not valid JSON.
    pub fn register_schema_str(&mut self, name: &str, json: &str) -> Result<String> {
        let uri: String = memory_uri(name);
        let content: Value =
            serde_json::from_str(json).map_err(|e| GenerationError::resolution(&uri, e.to_string()))?;
        self.builder.store.register_document(uri.clone(), content);
        Ok(uri)
    }

    /// Registers schema text and generates the types it describes.
    ///
    /// # Errors
    ///
    /// Same as [`GenerationRun::register_schema_str`] and [`GenerationRun::add_document`].
    pub fn add_schema_str(&mut self, name: &str, json: &str) -> Result<TypeRef> {
        let uri: String = self.register_schema_str(name, json)?;
        self.builder.generate(&CanonicalUri::document_root(uri))
    }

    /// Generates the schema at `uri`, which may carry a JSON pointer fragment.
    ///
    /// A location without a scheme is a file path, relative to the current
    /// directory: `schemas/defs.json#/definitions/money`.
    ///
    /// # Errors
    ///
    /// Returns the first `GenerationError` raised while resolving or building.
    pub fn add_uri(&mut self, uri: &str) -> Result<TypeRef> {
        let (document, fragment): (&str, &str) = uri.split_once('#').unwrap_or((uri, ""));
        let document_uri: String = if resolver::has_scheme(document) {
            document.to_string()
        } else {
            resolver::file_uri(Path::new(document))?
        };
        let canonical: CanonicalUri = resolver::reference_uri(&document_uri, &format!("#{fragment}"))?;
        self.builder.generate(&canonical)
    }

    /// Forgets every document, type and name seen so far.
    pub fn reset(&mut self) {
        self.builder.reset();
    }

    /// Links discriminated subtypes and decorates the graph.
    ///
    /// # Errors
    ///
    /// Returns `AnnotationBinding` for inconsistent discriminators.
    pub fn finish(self) -> Result<GeneratedModel> {
        let GraphBuilder {
            settings,
            mut graph,
            pending,
            ..
        } = self.builder;
        polymorphism::bind_all(&mut graph, &pending)?;
        let decorations: Decorations = annotate::decorate(&graph, &settings);
        info!(
            types = graph.len(),
            directives = decorations.len(),
            "generation finished"
        );
        Ok(GeneratedModel {
            graph,
            decorations,
            settings,
        })
    }
}

/// The frozen result of a run.
#[derive(Debug)]
pub struct GeneratedModel {
    graph: TypeGraph,
    decorations: Decorations,
    settings: GenerationSettings,
}

impl GeneratedModel {
    #[must_use]
    pub const fn graph(&self) -> &TypeGraph {
        &self.graph
    }

    #[must_use]
    pub const fn decorations(&self) -> &Decorations {
        &self.decorations
    }

    /// Source units, ordered by path.
    #[must_use]
    pub fn units(&self) -> Vec<SourceUnit> {
        codegen::render_units(&self.graph, &self.decorations, &self.settings)
    }

    /// Writes every unit below `directory`, creating package directories.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError::Io` if a directory or file cannot be written.
    pub fn write_to(&self, directory: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
        let directory: &Path = directory.as_ref();
        let mut written: Vec<PathBuf> = Vec::new();
        for unit in self.units() {
            let path: PathBuf = directory.join(&unit.path);
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, unit.contents.as_bytes())?;
            debug!(path = %path.display(), "wrote source unit");
            written.push(path);
        }
        Ok(written)
    }

    /// Writes every unit to `writer`, separated by blank lines.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError::Io` if writing fails.
    pub fn render_to_writer<W: Write>(&self, writer: &mut W) -> Result<()> {
        for (index, unit) in self.units().iter().enumerate() {
            if index > 0 {
                writeln!(writer)?;
            }
            writer.write_all(unit.contents.as_bytes())?;
        }
        Ok(())
    }

    /// Checks `instance` against the validation directives of the named type.
    ///
    /// `type_name` is a qualified name or an unambiguous binary name such as
    /// `Order.Line`. Returns `None` when no such type exists. Only runs with
    /// validation annotations enabled carry constraints to check.
    #[must_use]
    pub fn check_instance(&self, type_name: &str, instance: &Value) -> Option<Vec<ConstraintViolation>> {
        let id: TypeId = self.graph.find(type_name)?;
        Some(validate::check_instance(&self.graph, &self.decorations, id, instance))
    }
}

/// Generates Java sources from one schema and writes them to `writer`.
///
/// The root type is named `Root`.
///
/// # Errors
///
/// Returns `GenerationError` if the schema is invalid, cannot be generated, or
/// writing to the writer fails.
pub fn generate_to_writer<W: Write>(
    schema_json: &str,
    writer: &mut W,
    settings: &GenerationSettings,
) -> Result<()> {
    let mut run: GenerationRun = GenerationRun::new(settings);
    run.add_schema_str("root.json", schema_json)?;
    run.finish()?.render_to_writer(writer)
}

/// Generates Java sources for schema files into `target`.
///
/// # Errors
///
/// Returns the first `GenerationError`; nothing is written when generation fails.
pub fn generate_from_paths(
    paths: &[PathBuf],
    target: impl AsRef<Path>,
    settings: &GenerationSettings,
) -> Result<Vec<PathBuf>> {
    let mut run: GenerationRun = GenerationRun::new(settings);
    for path in paths {
        debug!(path = %path.display(), "adding schema document");
        run.add_document(path)?;
    }
    run.finish()?.write_to(target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_uris() {
        assert_eq!(memory_uri("a.json"), "mem:///a.json");
        assert_eq!(memory_uri("/a.json"), "mem:///a.json");
        assert_eq!(memory_uri("file:///x/a.json"), "file:///x/a.json");
    }

    #[test]
    fn generate_to_writer_renders_root_type() {
        let schema = r#"{ "type": "object", "properties": { "name": { "type": "string" } } }"#;
        let mut out: Vec<u8> = Vec::new();
        let settings = GenerationSettings {
            annotation_style: AnnotationStyle::None,
            include_hashcode_and_equals: false,
            include_to_string: false,
            ..GenerationSettings::default()
        };
        generate_to_writer(schema, &mut out, &settings).expect("generation should succeed");
        let text = String::from_utf8(out).expect("utf-8");
        let expected = r"public class Root {

    private String name;

    public String getName() {
        return name;
    }

    public void setName(String name) {
        this.name = name;
    }
}
";
        assert_eq!(text, expected);
    }

    #[test]
    fn invalid_json_is_a_resolution_error() {
        let mut out: Vec<u8> = Vec::new();
        let err = generate_to_writer("{", &mut out, &GenerationSettings::default())
            .expect_err("malformed JSON");
        assert!(matches!(err, GenerationError::SchemaResolution { .. }));
        assert!(out.is_empty());
    }
}
