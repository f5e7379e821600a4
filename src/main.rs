use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use log::info;
use simplelog::LevelFilter;

use lumen_tracer::color::Color;
use lumen_tracer::consts::OUT_FILE;
use lumen_tracer::scene::Scene;

/// Renders a JSON scene description to a PPM image.
#[derive(Debug, Parser)]
#[clap(author, version, about)]
struct Args {
    /// The scene description to render.
    #[clap(parse(from_os_str))]
    scene: PathBuf,

    /// Where to write the rendered image.
    #[clap(short, long, parse(from_os_str), default_value = OUT_FILE)]
    output: PathBuf,

    /// Render threads, overriding the scene's camera. Zero renders on the
    /// main thread.
    #[clap(short, long)]
    threads: Option<usize>,

    /// Draw a white grid line every INTERVAL pixels over the image.
    #[clap(long, value_name = "INTERVAL")]
    grid: Option<usize>,

    /// Log debugging details.
    #[clap(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    simplelog::TermLogger::init(
        if args.verbose { LevelFilter::Debug } else { LevelFilter::Info },
        simplelog::ConfigBuilder::new()
            .set_target_level(LevelFilter::Off)
            .set_location_level(LevelFilter::Off)
            .build(),
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    )?;

    let mut scene = Scene::load(&args.scene)
        .with_context(|| format!("could not load scene {}", args.scene.display()))?;

    if let Some(threads) = args.threads {
        scene.camera = scene.camera.with_threads(threads);
    }

    let mut canvas = scene.render().context("render failed")?;

    if let Some(interval) = args.grid {
        info!("drawing grid every {} pixels", interval);
        canvas.print_grid(interval, &Color::white());
    }

    canvas.save(&args.output)
        .with_context(|| format!("could not write image {}", args.output.display()))?;

    Ok(())
}
