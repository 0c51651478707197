mod demos;
mod tonemap;

use anyhow::{Context, Result};
use clap::Parser;
use flexi_logger::FileSpec;
use log::info;

use wavefront_core::engine::PathTracer;
use wavefront_core::image::Image;
use wavefront_core::stopwatch::Stopwatch;

use demos::DemoScene;

/// Command-line front end for the wavefront path tracer.
#[derive(Parser)]
#[command(name = "wavefront", version, about = "CPU wavefront path tracer")]
struct Cli {
    /// Image width in pixels
    #[arg(long, default_value_t = 400)]
    width: u32,

    /// Image height in pixels
    #[arg(long, default_value_t = 300)]
    height: u32,

    /// Samples per pixel
    #[arg(long, default_value_t = 16)]
    spp: u32,

    /// Maximum scattering events per path (K in spec terms)
    #[arg(long, default_value_t = 4)]
    depth: u32,

    /// Worker threads; 0 uses hardware concurrency
    #[arg(long, default_value_t = 0)]
    threads: usize,

    /// Disable parallelism (the deterministic testing path)
    #[arg(long)]
    serial: bool,

    /// Engine seed every per-(pixel, sample, stage) RNG stream derives from
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Demo scene to render
    #[arg(long, value_enum, default_value_t = DemoScene::CornellRoom)]
    scene: DemoScene,

    /// Output PNG path
    #[arg(short, long, default_value = "image.png")]
    output: String,

    /// Verbose (debug-level) logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    println!("wavefront 0.1 [detected {} cores]", num_cpus::get());
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    flexi_logger::Logger::try_with_str(format!("wavefront={level},wavefront_core={level}"))
        .unwrap()
        .log_to_file(FileSpec::default().suppress_timestamp().directory(std::env::temp_dir()))
        .format(flexi_logger::opt_format)
        .start()
        .unwrap_or_else(|e| panic!("failed to initialize logger: {e}"));

    if let Err(e) = run(&cli) {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    if cli.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()
            .context("failed to configure worker thread pool")?;
    }

    let (scene, camera) = demos::build(cli.scene);
    let tracer = PathTracer::new(&scene).with_seed(cli.seed);

    let mut image = Image::new(cli.width, cli.height);
    let mut stopwatch = Stopwatch::new();
    let parallel = !cli.serial;

    info!(
        "rendering {}x{} at {} spp, depth {}, {}",
        cli.width,
        cli.height,
        cli.spp,
        cli.depth,
        if parallel { "parallel" } else { "serial" }
    );

    // The engine's render call is a single synchronous barrier pipeline
    // (spec §5: "no suspension points... only blocking is the stage-end
    // join"), so there is no per-tile hook to drive incremental progress
    // from — just a spinner bracketing the one call, not a tile counter.
    let pb = indicatif::ProgressBar::new_spinner();
    pb.set_style(indicatif::ProgressStyle::default_spinner().template("{spinner} {elapsed_precise} {msg}").unwrap());
    pb.set_message("rendering...");
    pb.enable_steady_tick(std::time::Duration::from_millis(100));

    let stats = tracer
        .render(&mut image, &mut stopwatch, cli.spp, parallel, cli.depth, &camera)
        .context("render failed")?;

    pb.finish_with_message("render complete");

    info!(
        "done in {:.2}s: {} primary rays, {} shadow rays, {} numeric hazards discarded",
        stats.elapsed_secs, stats.primary_rays_traced, stats.shadow_rays_traced, stats.numeric_hazards_discarded
    );
    if stats.numeric_hazards_discarded > 0 {
        log::warn!("{} non-finite samples were discarded during accumulation", stats.numeric_hazards_discarded);
    }

    let buffer = tonemap::to_png_buffer(&image);
    buffer.save(&cli.output).with_context(|| format!("failed to write {}", cli.output))?;
    println!("wrote {}", cli.output);

    Ok(())
}
