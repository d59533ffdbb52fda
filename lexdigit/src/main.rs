//! lexdigit - Legal document digitization toolkit
//!
//! A CLI tool for turning recorded model responses about a legal document
//! into Markdown, LaTeX, Akoma Ntoso XML, HTML and JSON exports.

#![deny(unsafe_code)]

use anyhow::{bail, Context, Result};
use clap::Parser;
use lexdigit::cli::{Cli, Commands};
use lexdigit::config::AppConfig;
use lexdigit::export::ExportFormat;
use lexdigit::index_tree::{IndexTreeState, NodePath};
use lexdigit::llm::{ReplayBackend, RequestKind};
use lexdigit::selection::ExportMode;
use lexdigit::session::{source_error_message, Session};
use lexdigit::source::{self, DocxTextExtractor, SourceDocument, SourcePayload};
use lexdigit::{repair, response, roadmap};
use std::path::{Path, PathBuf};

/// Main entry point for the lexdigit CLI application
fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:?}", e);
        std::process::exit(1);
    }
}

/// Run the CLI application
fn run() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging if verbose
    if cli.verbose {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }

    let config = AppConfig::load_or_default(cli.config.as_deref())
        .context("Failed to load configuration")?;

    match cli.command {
        Commands::Repair { raw } => handle_repair_command(&raw)?,

        Commands::Outline {
            structure,
            expand_all,
        } => handle_outline_command(&structure, expand_all)?,

        Commands::Render {
            structure,
            chunks,
            source,
            key,
            node,
            format,
            single,
            mode,
            output,
            snapshot,
        } => {
            let options = RenderOptions {
                structure,
                chunks,
                source,
                key,
                node,
                format,
                single,
                mode,
                output,
                snapshot,
            };
            handle_render_command(&config, options)?;
        }

        Commands::Inspect { file } => handle_inspect_command(&file)?,

        Commands::Roadmap { raw } => handle_roadmap_command(&raw)?,
    }

    Ok(())
}

/// Read a recorded response file
fn read_raw(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read response file {}", path.display()))
}

/// Handle the repair command
fn handle_repair_command(raw: &Path) -> Result<()> {
    let text = read_raw(raw)?;
    let value = repair::repair(&text)
        .with_context(|| format!("Failed to repair {}", raw.display()))?;

    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

/// Handle the outline command
fn handle_outline_command(structure: &Path, expand_all: bool) -> Result<()> {
    let analysis = response::parse_structure(&read_raw(structure)?)
        .with_context(|| format!("Failed to parse structure from {}", structure.display()))?;

    println!("{}", analysis.law_title);
    if !analysis.last_reform_date.is_empty() {
        println!("Última Reforma: {}", analysis.last_reform_date);
    }
    println!();

    let mut tree = IndexTreeState::new();
    if expand_all {
        tree.expand_all(&analysis.structure);
    }

    for (path, node) in tree.visible(&analysis.structure) {
        let marker = match (node.has_children(), tree.is_expanded(&path)) {
            (false, _) => ' ',
            (true, false) => '+',
            (true, true) => '-',
        };
        let pages = node
            .page_range
            .as_deref()
            .map(|range| format!(" (págs. {})", range))
            .unwrap_or_default();

        println!(
            "{}{} {:<8} [{}] {}{}",
            "  ".repeat(path.depth()),
            marker,
            path.to_string(),
            node.kind,
            node.label(),
            pages
        );
    }

    Ok(())
}

/// Arguments of the render command
struct RenderOptions {
    structure: PathBuf,
    chunks: PathBuf,
    source: Option<PathBuf>,
    key: Option<String>,
    node: NodePath,
    format: Option<ExportFormat>,
    single: Option<String>,
    mode: Option<ExportMode>,
    output: Option<PathBuf>,
    snapshot: bool,
}

/// Resolve the export format from the flag, the output extension or the config
fn resolve_format(
    format: Option<ExportFormat>,
    output: Option<&Path>,
    config: &AppConfig,
) -> Result<ExportFormat> {
    if let Some(format) = format {
        return Ok(format);
    }

    match output.and_then(|p| p.extension()).and_then(|e| e.to_str()) {
        Some(ext) => ExportFormat::from_extension(ext).with_context(|| {
            format!(
                "Cannot infer export format from extension '.{}'; use --format",
                ext
            )
        }),
        None => Ok(config.export.format),
    }
}

/// Handle the render command
fn handle_render_command(config: &AppConfig, options: RenderOptions) -> Result<()> {
    let format = resolve_format(options.format, options.output.as_deref(), config)?;

    let source = match &options.source {
        Some(path) => source::load_source(path, &DocxTextExtractor).map_err(|e| {
            let message = source_error_message(&e);
            anyhow::Error::new(e).context(message)
        })?,
        None => SourceDocument {
            name: options
                .structure
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or_default()
                .to_string(),
            original_mime: source::MIME_TEXT.to_string(),
            payload: SourcePayload::Text(String::new()),
        },
    };

    let backend = ReplayBackend::new()
        .with_response_file(RequestKind::AnalyzeStructure, &options.structure)
        .with_context(|| format!("Failed to read {}", options.structure.display()))?
        .with_response_file(RequestKind::ConvertNode, &options.chunks)
        .with_context(|| format!("Failed to read {}", options.chunks.display()))?;

    let mut session = Session::new();
    session.load_source(source)?;
    if let Some(key) = options.key.or_else(|| config.default_doc_key.clone()) {
        session.set_doc_key(key);
    }

    let metadata = session
        .analyze(&backend)
        .with_context(|| format!("Failed to analyze {}", options.structure.display()))?;
    log::info!("Analyzed '{}' ({})", metadata.law_title, metadata.key());

    let result = session
        .process_node(&options.node, &backend, &config.retry)
        .with_context(|| format!("Failed to convert node {}", options.node))?;
    log::info!("Node {} produced {} chunks", options.node, result.chunks.len());

    let content = if options.snapshot {
        let Some(result) = session.result() else {
            bail!("No processing result available");
        };
        match format {
            ExportFormat::Markdown => result.markdown.clone(),
            ExportFormat::Latex => result.latex.clone(),
            ExportFormat::Xml => result.xml.clone(),
            ExportFormat::Json => result.json.clone(),
            ExportFormat::Html => bail!("No HTML snapshot is stored; omit --snapshot"),
        }
    } else {
        match &options.single {
            Some(id) => {
                if session.select_chunk_by_id(id).is_none() {
                    bail!("No chunk with id '{}' in the result", id);
                }
                session.set_export_mode(ExportMode::Single);
            }
            None => session.set_export_mode(options.mode.unwrap_or(config.export.mode)),
        }
        session.export(format)
    };

    match &options.output {
        Some(path) => {
            std::fs::write(path, &content)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("✓ Successfully wrote: {}", path.display());
        }
        None => print!("{}", content),
    }

    Ok(())
}

/// Handle the inspect command
fn handle_inspect_command(file: &Path) -> Result<()> {
    let document = source::load_source(file, &DocxTextExtractor).map_err(|e| {
        let message = source_error_message(&e);
        anyhow::Error::new(e).context(message)
    })?;

    println!("File: {}", document.name);
    println!("Detected type: {}", document.original_mime);
    println!("Sent as: {}", document.payload.mime_type());
    println!("Payload size: {} bytes", document.payload.len());

    if let SourcePayload::Text(text) = &document.payload {
        println!("Characters: {}", text.chars().count());
        println!();
        for line in text.lines().filter(|l| !l.trim().is_empty()).take(5) {
            println!("  {}", line);
        }
    }

    Ok(())
}

/// Handle the roadmap command
fn handle_roadmap_command(raw: &Path) -> Result<()> {
    let steps = roadmap::parse_roadmap(&read_raw(raw)?)
        .with_context(|| format!("Failed to parse roadmap from {}", raw.display()))?;

    for step in &steps {
        println!("{}: {}", step.phase, step.title);
        if !step.description.is_empty() {
            println!("  {}", step.description);
        }
        for item in &step.action_items {
            println!("  - {}", item);
        }
        println!();
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_format_prefers_flag() {
        let config = AppConfig::default();
        let format =
            resolve_format(Some(ExportFormat::Json), Some(Path::new("out.xml")), &config).unwrap();
        assert_eq!(format, ExportFormat::Json);
    }

    #[test]
    fn test_resolve_format_from_extension() {
        let config = AppConfig::default();
        assert_eq!(
            resolve_format(None, Some(Path::new("ley.tex")), &config).unwrap(),
            ExportFormat::Latex
        );
        assert_eq!(
            resolve_format(None, Some(Path::new("ley.htm")), &config).unwrap(),
            ExportFormat::Html
        );
        assert!(resolve_format(None, Some(Path::new("ley.pdf")), &config).is_err());
    }

    #[test]
    fn test_resolve_format_falls_back_to_config() {
        let mut config = AppConfig::default();
        config.export.format = ExportFormat::Xml;
        assert_eq!(resolve_format(None, None, &config).unwrap(), ExportFormat::Xml);
    }
}
