//! CLI tool for generating presentation decks from a JSON specification.

use anyhow::{Context, Result};
use clap::Parser;
use deck_core::{
    Catalog, ExtractiveOutliner, InputNormalizer, Outliner, SpecBuilder, Specification,
    Unavailable, validate_model,
};
use deck_html::HtmlRenderer;
use deck_pptx::PptxRenderer;
use std::fs;
use std::path::PathBuf;

/// Generate a PPTX deck and an HTML replica from a declarative JSON spec.
#[derive(Parser, Debug)]
#[command(name = "deckgen")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input specification file (JSON)
    spec: PathBuf,

    /// Output directory (default: taken from the specification)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the intermediate slide model as JSON to stdout
    #[arg(long)]
    print_model: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    let spec = load_spec(&args)?;
    let catalog = Catalog::new();

    // Fail on an unsupported language before doing any content work.
    catalog.ensure_language(spec.language())?;

    if args.verbose {
        eprintln!(
            "Generating {} slides in '{}' for {}",
            spec.slides_count(),
            spec.language(),
            spec.user().display_name()
        );
    }

    let mut warnings = Vec::new();

    // Audio transcription and research expansion need external services that
    // this binary does not ship; the normalizer degrades with warnings.
    let normalizer = InputNormalizer::new(&Unavailable, &Unavailable);
    let fragments = normalizer.normalize(&spec, &mut warnings)?;

    log::debug!("normalized {} input fragments", fragments.len());

    let model = ExtractiveOutliner::new().outline(&fragments, &spec, &catalog, &mut warnings)?;

    let (valid, findings) = validate_model(&model, &spec);
    for finding in &findings {
        log::warn!("model check: {}", finding);
    }
    if !valid {
        anyhow::bail!("generated model failed validation: {}", findings.join("; "));
    }

    if args.print_model {
        let json = serde_json::to_string_pretty(&model)?;
        println!("{}", json);
        for warning in &warnings {
            eprintln!("Warning: {}", warning);
        }
        return Ok(());
    }

    let out_dir = spec.output_dir().to_path_buf();
    fs::create_dir_all(&out_dir)
        .with_context(|| format!("Failed to create output directory: {}", out_dir.display()))?;

    let pptx_path = out_dir.join("presentation.pptx");
    PptxRenderer::new()
        .render_to_file(&model, &catalog, &pptx_path)
        .with_context(|| format!("Failed to write {}", pptx_path.display()))?;

    let html_path = out_dir.join("presentation.html");
    HtmlRenderer::new()
        .render_to_file(&model, &catalog, &html_path)
        .with_context(|| format!("Failed to write {}", html_path.display()))?;

    println!("Written: {}", pptx_path.display());
    println!("Written: {}", html_path.display());

    for warning in &warnings {
        eprintln!("Warning: {}", warning);
    }

    Ok(())
}

/// Read, parse, and validate the specification file.
fn load_spec(args: &Args) -> Result<Specification> {
    let raw = fs::read_to_string(&args.spec)
        .with_context(|| format!("Failed to open {}", args.spec.display()))?;

    let mut builder: SpecBuilder = serde_json::from_str(&raw)
        .with_context(|| format!("Invalid JSON in {}", args.spec.display()))?;

    if let Some(dir) = &args.output {
        builder = builder.output_dir(dir.clone());
    }

    builder
        .build()
        .with_context(|| format!("Invalid specification in {}", args.spec.display()))
}
