//! CLI tool for turning scripts, documents, or topics into PowerPoint decks.

use anyhow::{anyhow, Context, Result};
use clap::{ArgGroup, Parser, ValueEnum};
use deck_ai::{
    attach_images, sources_from_config, AiConfig, ImageSource, OutlineOrigin, OutlineStructurer,
    ProviderKind, Structured,
};
use deck_core::{OutlineFormatter, OutlineStyle, SegmentConfig, Segmenter, ShortSlidePolicy, SlideBounds};
use deck_pptx::{DocumentReader, PptxWriter, Theme};
use std::path::{Path, PathBuf};

/// Generate slide decks from free text.
#[derive(Parser, Debug)]
#[command(name = "deck-gen")]
#[command(author, version, about, long_about = None)]
#[command(group(ArgGroup::new("source").required(true).args(["input", "text", "topic"])))]
struct Args {
    /// Input document(s) (.txt, .md, .docx or .pptx)
    input: Vec<PathBuf>,

    /// Use this text instead of an input file
    #[arg(long)]
    text: Option<String>,

    /// Ask the AI to write a deck about a topic
    #[arg(long)]
    topic: Option<String>,

    /// Output directory (default: same as input file, or current directory)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Minimum number of slides requested from the AI
    #[arg(long, default_value = "10")]
    min_slides: usize,

    /// Maximum number of content slides
    #[arg(long, default_value = "20")]
    max_slides: usize,

    /// Provider to try, in order (repeatable): deepseek, claude, gemini, groq, hf, ollama
    #[arg(long = "provider")]
    providers: Vec<String>,

    /// Skip the AI and segment the text deterministically
    #[arg(long)]
    no_ai: bool,

    /// Fetch a stock photo for each content slide
    #[arg(long)]
    images: bool,

    /// JSON configuration file (keys, models, endpoints, timeouts)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Fewest bullets on a content slide
    #[arg(long, default_value = "4")]
    min_bullets: usize,

    /// Most bullets on a content slide
    #[arg(long, default_value = "6")]
    max_bullets: usize,

    /// Longest bullet, in characters
    #[arg(long, default_value = "150")]
    max_bullet_chars: usize,

    /// Keep short final slides instead of padding them with filler bullets
    #[arg(long)]
    relax_short: bool,

    /// Visual theme: professional, dark, minimal, vibrant
    #[arg(long, default_value = "professional")]
    theme: String,

    /// Print the outline to stdout instead of writing a .pptx
    #[arg(short, long)]
    print: bool,

    /// Outline format used with --print
    #[arg(short, long, value_enum, default_value = "markdown")]
    format: OutputFormat,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Markdown,
    Json,
}

impl From<OutputFormat> for OutlineStyle {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Markdown => OutlineStyle::Markdown,
            OutputFormat::Json => OutlineStyle::Json,
        }
    }
}

/// What to build one deck from.
enum Source<'a> {
    File(&'a Path),
    Text(&'a str),
    Topic(&'a str),
}

/// Everything shared between decks.
struct Pipeline {
    reader: DocumentReader,
    structurer: OutlineStructurer,
    image_sources: Vec<Box<dyn ImageSource>>,
    writer: PptxWriter,
    formatter: OutlineFormatter,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    let pipeline = build_pipeline(&args)?;

    let mut sources: Vec<Source> = args.input.iter().map(|p| Source::File(p)).collect();
    if let Some(text) = &args.text {
        sources.push(Source::Text(text));
    }
    if let Some(topic) = &args.topic {
        sources.push(Source::Topic(topic));
    }

    for source in sources {
        let label = match source {
            Source::File(path) => path.display().to_string(),
            Source::Text(_) => "--text".to_string(),
            Source::Topic(topic) => format!("topic '{topic}'"),
        };
        if args.verbose {
            eprintln!("Processing: {label}");
        }

        if let Err(e) = process_source(&source, &args, &pipeline).await {
            eprintln!("Error processing {label}: {e:#}");
        }
    }

    Ok(())
}

fn build_pipeline(args: &Args) -> Result<Pipeline> {
    let mut config = match &args.config {
        Some(path) => AiConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => AiConfig::from_env(),
    };
    if !args.providers.is_empty() {
        config.providers = args
            .providers
            .iter()
            .map(|name| name.parse::<ProviderKind>())
            .collect::<Result<_, _>>()?;
    }

    let bounds = SlideBounds::new(args.min_slides, args.max_slides);
    let segmenter = Segmenter::new(segment_config(args));

    let structurer = if args.no_ai {
        OutlineStructurer::deterministic(bounds)
    } else {
        OutlineStructurer::from_config(&config, bounds)
    }
    .with_segmenter(segmenter);
    if !args.no_ai && structurer.provider_names().is_empty() {
        log::warn!("No AI provider configured; using deterministic segmentation");
    }

    let image_sources = if args.images {
        let sources = sources_from_config(&config.images);
        if sources.is_empty() {
            log::warn!("--images given but neither PEXELS_API_KEY nor UNSPLASH_ACCESS_KEY is set");
        }
        sources
    } else {
        Vec::new()
    };

    let theme = Theme::from_name(&args.theme).ok_or_else(|| {
        anyhow!(
            "Unknown theme '{}' (expected one of: {})",
            args.theme,
            Theme::names().join(", ")
        )
    })?;

    Ok(Pipeline {
        reader: DocumentReader::new(),
        structurer,
        image_sources,
        writer: PptxWriter::new().with_theme(theme),
        formatter: OutlineFormatter::new().with_style(args.format.into()),
    })
}

fn segment_config(args: &Args) -> SegmentConfig {
    let policy = if args.relax_short {
        ShortSlidePolicy::Relax
    } else {
        ShortSlidePolicy::Pad
    };
    SegmentConfig::new()
        .with_bullet_range(args.min_bullets, args.max_bullets)
        .with_max_bullet_chars(args.max_bullet_chars)
        .with_short_slide_policy(policy)
}

/// Build and emit one deck.
async fn process_source(source: &Source<'_>, args: &Args, pipeline: &Pipeline) -> Result<()> {
    let Structured { outline, origin } = match source {
        Source::File(path) => {
            let text = pipeline
                .reader
                .read_path(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            pipeline.structurer.structure(&text).await
        }
        Source::Text(text) => pipeline.structurer.structure(text).await,
        Source::Topic(topic) => pipeline.structurer.structure_topic(topic).await,
    };

    if args.verbose {
        let origin = match origin {
            OutlineOrigin::Ai(name) => name,
            OutlineOrigin::Deterministic => "deterministic segmentation".to_string(),
        };
        eprintln!(
            "  Found {} slides, {} bullets ({origin})",
            outline.content_slides().count(),
            outline.bullet_count()
        );
    }

    if args.print {
        let output = pipeline.formatter.format_with_newline(&outline)?;
        print!("{output}");
        return Ok(());
    }

    let output_path = get_output_path(source, args.output.as_ref())?;
    let image_dir = output_path.with_extension("images");
    let outline = attach_images(outline, &pipeline.image_sources, &image_dir).await;

    pipeline
        .writer
        .save(&outline, &output_path)
        .with_context(|| format!("Failed to write {}", output_path.display()))?;

    if args.verbose {
        eprintln!("Written to: {}", output_path.display());
    }

    Ok(())
}

/// Determine the output path for a deck.
fn get_output_path(source: &Source<'_>, output_dir: Option<&PathBuf>) -> Result<PathBuf> {
    let (stem, default_dir) = match source {
        Source::File(path) => (
            path.file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("presentation"),
            path.parent(),
        ),
        Source::Text(_) | Source::Topic(_) => ("presentation", None),
    };

    let output_filename = format!("{stem}.pptx");

    let output_path = match output_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;
            dir.join(output_filename)
        }
        None => match default_dir {
            Some(parent) => parent.join(output_filename),
            None => PathBuf::from(output_filename),
        },
    };

    Ok(output_path)
}
