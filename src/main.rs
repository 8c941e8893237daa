//! lsys: render an L-system grammar file to SVG.

use std::io::Write;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use lsys::config::{GrammarFile, Settings};
use lsys::render::{draw_segments, render_segments, SvgDocument, Viewport};

#[derive(Parser)]
#[command(name = "lsys")]
#[command(about = "Expand an L-system grammar and draw it as SVG", version)]
struct Args {
    /// Grammar file (YAML)
    grammar: PathBuf,

    /// Number of rewriting generations
    #[arg(short, long)]
    generations: Option<u32>,

    /// Angle of a bare "+" or "-", in degrees
    #[arg(short, long)]
    angle: Option<f64>,

    /// Replace the file's axiom
    #[arg(long)]
    axiom: Option<String>,

    #[arg(long)]
    width: Option<f64>,

    #[arg(long)]
    height: Option<f64>,

    /// Empty margin on every side
    #[arg(long)]
    padding: Option<f64>,

    /// Output SVG path; stdout when omitted
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Log debug output
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "lsys=debug" } else { "lsys=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::load();

    let mut file = GrammarFile::load(&args.grammar)?;
    if let Some(axiom) = args.axiom {
        file.axiom = axiom;
    }

    let grammar = file.compile()?;
    for rule_error in &grammar.rule_errors {
        eprintln!("{rule_error}");
    }

    let mut params = grammar.params.clone();
    if let Some(generations) = args.generations {
        params.generations = generations;
    }
    if let Some(angle) = args.angle {
        params.default_angle = angle;
    }
    if params.generations > settings.max_generations {
        warn!(
            requested = params.generations,
            max = settings.max_generations,
            "capping generations"
        );
        params.generations = settings.max_generations;
    }

    let viewport = Viewport::new(
        args.width.unwrap_or(settings.width),
        args.height.unwrap_or(settings.height),
        args.padding.unwrap_or(settings.padding),
    );

    info!(
        grammar = %args.grammar.display(),
        generations = params.generations,
        angle = params.default_angle,
        symbols = grammar.bindings.len(),
        "rendering"
    );

    let segments = render_segments(&grammar.axiom, &grammar.bindings, &params, &viewport);

    let mut doc = SvgDocument::new(viewport.width, viewport.height);
    if let Some(bg) = grammar.background.or(settings.background) {
        doc = doc.with_background(bg);
    }
    let drawn = draw_segments(&mut doc, &segments);
    let svg = doc.finish();

    match &args.output {
        Some(path) => std::fs::write(path, svg)?,
        None => std::io::stdout().write_all(svg.as_bytes())?,
    }

    info!(segments = segments.len(), drawn, "done");
    Ok(())
}

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    if let Err(e) = run(args) {
        eprintln!("lsys: {e}");
        process::exit(1);
    }
}
