use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::Parser;
use heartscope_annotator::domain::Bounds;
use heartscope_annotator::{AnnotationCanvas, EditorConfig, ImageSource, export, script};

/// Headless host for the HeartScope annotation editor
///
/// Loads an image into a viewport, replays a scripted editing session and
/// writes the annotated composite as PNG.
#[derive(Parser, Debug)]
#[command(name = "heartscope-annotator", version)]
struct Cli {
    /// Source image to annotate
    image: PathBuf,
    /// JSON script of editor actions (or - for stdin)
    #[arg(long)]
    script: Option<PathBuf>,
    /// Output PNG path (default: <downloads>/annotated-image.png)
    #[arg(long)]
    out: Option<PathBuf>,
    /// Container size the editor is laid out in, as WIDTHxHEIGHT
    #[arg(long, default_value = "1024x768", value_parser = parse_size)]
    container: (f32, f32),
    /// Alternative config file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Keep the selection highlight in the exported image
    #[arg(long)]
    include_selection: bool,
}

fn parse_size(s: &str) -> Result<(f32, f32), String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got {s:?}"))?;
    let w: f32 = w.trim().parse().map_err(|e| format!("bad width: {e}"))?;
    let h: f32 = h.trim().parse().map_err(|e| format!("bad height: {e}"))?;
    if w <= 0.0 || h <= 0.0 {
        return Err("container size must be positive".to_string());
    }
    Ok((w, h))
}

/// Resolve the editor config before logging is configured
///
/// A load failure falls back to defaults and is handed back so it can be
/// logged once the logger reflects the configured level.
fn load_config(cli: &Cli) -> (EditorConfig, Option<anyhow::Error>) {
    let loaded = match &cli.config {
        Some(path) => EditorConfig::load_from(path),
        None => EditorConfig::try_load(),
    };
    let (mut config, error) = match loaded {
        Ok(config) => (config, None),
        Err(err) => (EditorConfig::default(), Some(err)),
    };
    if cli.include_selection {
        config.export_include_selection = true;
    }
    (config, error)
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    let (config, load_error) = load_config(&cli);

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.log_level.as_filter()),
    )
    .init();

    if let Some(err) = load_error {
        log::warn!("Error loading config, using defaults: {err:#}");
    }

    if let Err(err) = run(cli, config).await {
        log::error!("{err:#}");
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: EditorConfig) -> anyhow::Result<()> {
    let source = ImageSource::Path(cli.image.clone());
    let mut canvas = AnnotationCanvas::new(source.clone(), config.clone(), || {
        log::info!("Editor closed by user");
    });

    // Scripted export steps and the final export share one destination
    if let Some(out) = &cli.out {
        canvas.set_export_path(out);
    }

    let (container_w, container_h) = cli.container;
    canvas.attach_container(container_w, container_h);

    // Decoding is the only asynchronous step; the canvas stays not ready until it lands
    let ticket = canvas.begin_load();
    let decoded = tokio::task::spawn_blocking(move || {
        heartscope_annotator::capture::image::decode_source(&source)
    })
    .await
    .context("Image decode task failed")?;
    canvas.image_decoded(ticket, decoded);

    if canvas.has_failed() {
        bail!("Could not load {}", cli.image.display());
    }
    if !canvas.is_ready() {
        bail!("Editor did not become ready; check the container size");
    }

    let Some(size) = canvas.surface_size() else {
        bail!("Editor has no surface");
    };
    // Headless: the surface is shown 1:1 at the origin
    let bounds = Bounds::new(0.0, 0.0, size.width as f32, size.height as f32);

    if let Some(script_path) = &cli.script {
        let steps = script::load_script(script_path)?;
        let report = script::run_script(&mut canvas, bounds, &steps)?;
        log::info!(
            "Replayed {} step(s), {} redraw(s), {} export(s)",
            report.steps,
            report.redraws,
            report.exports
        );
    }

    if canvas.is_closed() {
        log::info!("Editor closed before final export");
        return Ok(());
    }

    let Some(image) = canvas.export_image() else {
        bail!("Nothing to export");
    };
    let out = canvas.export_path();
    let shown = out.display().to_string();
    tokio::task::spawn_blocking(move || export::save_rgba(&image, &out))
        .await
        .context("Export task failed")??;
    println!("{shown}");

    log::debug!(
        "Exported {} shape(s) at scale {:?}",
        canvas.state().shapes().len(),
        canvas.scale()
    );
    Ok(())
}
