//! Binary to generate Java sources from JSON Schema files.
//!
//! Usage: `jsonschema2pojo --target out/ --package com.example schemas/`
//!
//! Directories are searched recursively for `*.json` files. Set `RUST_LOG=debug`
//! to trace resolution and type registration.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

use json_schema_pojo::{AnnotationStyle, GenerationSettings, generate_from_paths};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StyleArg {
    Jackson2,
    Gson,
    Moshi,
    None,
}

impl From<StyleArg> for AnnotationStyle {
    fn from(style: StyleArg) -> Self {
        match style {
            StyleArg::Jackson2 => Self::Jackson2,
            StyleArg::Gson => Self::Gson,
            StyleArg::Moshi => Self::Moshi,
            StyleArg::None => Self::None,
        }
    }
}

/// Generate Java types from JSON Schema
#[derive(Parser, Debug)]
#[command(name = "jsonschema2pojo", version)]
#[expect(clippy::struct_excessive_bools)]
struct Cli {
    /// Schema files, or directories searched recursively for `*.json`
    #[arg(required = true)]
    sources: Vec<PathBuf>,

    /// Directory the generated sources are written to
    #[arg(short, long)]
    target: PathBuf,

    /// Package of generated types
    #[arg(short, long)]
    package: Option<String>,

    /// JSON settings file; command-line flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Annotation vocabulary to emit
    #[arg(short, long, value_enum)]
    annotation_style: Option<StyleArg>,

    /// Emit fluent `withX` setters
    #[arg(short, long)]
    builders: bool,

    /// Use primitive types where possible
    #[arg(long)]
    use_primitives: bool,

    /// Map schema `integer` to `Long`
    #[arg(long)]
    use_long_integers: bool,

    /// Map schema `number` to `BigDecimal`
    #[arg(long)]
    use_big_decimals: bool,

    /// Emit bean-validation annotations
    #[arg(long)]
    jsr303_annotations: bool,

    /// Use `jakarta.validation` for validation annotations
    #[arg(long)]
    jakarta: bool,

    /// Do not generate extension maps for open objects
    #[arg(long)]
    no_additional_properties: bool,
}

impl Cli {
    fn settings(&self) -> Result<GenerationSettings, Box<dyn std::error::Error>> {
        let mut settings: GenerationSettings = match &self.config {
            Some(path) => GenerationSettings::from_json_file(path)?,
            None => GenerationSettings::default(),
        };
        if let Some(package) = &self.package {
            settings.target_package.clone_from(package);
        }
        if let Some(style) = self.annotation_style {
            settings.annotation_style = style.into();
        }
        settings.generate_builders |= self.builders;
        settings.use_primitives |= self.use_primitives;
        settings.use_long_integers |= self.use_long_integers;
        settings.use_big_decimals |= self.use_big_decimals;
        settings.include_jsr303_annotations |= self.jsr303_annotations;
        settings.use_jakarta_validation |= self.jakarta;
        if self.no_additional_properties {
            settings.include_additional_properties = false;
        }
        Ok(settings)
    }
}

/// Expands directories into their `*.json` files, in file-name order.
fn collect_sources(sources: &[PathBuf]) -> Result<Vec<PathBuf>, walkdir::Error> {
    let mut files: Vec<PathBuf> = Vec::new();
    for source in sources {
        if !source.is_dir() {
            files.push(source.clone());
            continue;
        }
        for entry in WalkDir::new(source).sort_by_file_name() {
            let entry = entry?;
            let is_schema: bool = entry.file_type().is_file()
                && entry.path().extension().is_some_and(|extension| extension == "json");
            if is_schema {
                files.push(entry.into_path());
            }
        }
    }
    Ok(files)
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let settings: GenerationSettings = cli.settings()?;
    let sources: Vec<PathBuf> = collect_sources(&cli.sources)?;
    let written: Vec<PathBuf> = generate_from_paths(&sources, &cli.target, &settings)?;
    tracing::info!(
        sources = sources.len(),
        units = written.len(),
        target = %cli.target.display(),
        "done"
    );
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli: Cli = Cli::parse();
    if let Err(e) = run(&cli) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
