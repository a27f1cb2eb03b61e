use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};

use photobooth::{
    BoothConfig, CaptureSession, FilterRegistry, HtmlFileSpooler, ImageFrame, LivePreview, Phase,
    PhaseTimings, PhotoBooth, SequenceObserver, SystemClock, encode_png, open_source_spec,
};

#[derive(Parser, Debug)]
#[command(name = "photobooth", version, about = "Countdown photo booth with collage output")]
struct Cli {
    /// Booth config JSON.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output directory (overrides config and PHOTOBOOTH_OUTPUT_DIR).
    #[arg(long, global = true)]
    out_dir: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the available filters.
    Filters,
    /// Render one preview frame as a PNG.
    Preview(PreviewArgs),
    /// Run a capture session and save the collage.
    Shoot(ShootArgs),
    /// Compose existing images into a collage.
    Collage(CollageArgs),
}

#[derive(Args, Debug)]
struct SourceArgs {
    /// Camera: `synthetic[:WxH]`, `none`, `/dev/videoN` or an image path.
    #[arg(long, default_value = "synthetic")]
    source: String,

    /// Filter name (see `photobooth filters`).
    #[arg(long)]
    filter: Option<String>,
}

#[derive(Args, Debug)]
struct PreviewArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct ShootArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Number of shots (2, 3 or 4).
    #[arg(long)]
    shots: Option<u8>,

    /// Skip the countdown and flash waits.
    #[arg(long, default_value_t = false)]
    instant: bool,

    /// Also write the print document.
    #[arg(long, default_value_t = false)]
    print: bool,
}

#[derive(Args, Debug)]
struct CollageArgs {
    /// Images in slot order, top to bottom.
    images: Vec<PathBuf>,

    /// Also write the print document.
    #[arg(long, default_value_t = false)]
    print: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    match cli.cmd {
        Command::Filters => cmd_filters(),
        Command::Preview(args) => cmd_preview(config, args),
        Command::Shoot(args) => cmd_shoot(config, args),
        Command::Collage(args) => cmd_collage(config, args),
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<BoothConfig> {
    let config = match &cli.config {
        Some(path) => BoothConfig::from_path(path)
            .with_context(|| format!("load config '{}'", path.display()))?,
        None => BoothConfig::default(),
    };
    let mut config = config.with_env_overrides();
    if let Some(dir) = &cli.out_dir {
        config.output_dir = dir.clone();
    }
    Ok(config)
}

fn cmd_filters() -> anyhow::Result<()> {
    let registry = FilterRegistry::builtin()?;
    for f in registry.iter() {
        let marker = if f.is_special_overlay { " (overlay)" } else { "" };
        println!("{:<14} {}{marker}", f.name, f.css_expression);
    }
    Ok(())
}

fn build_booth(mut config: BoothConfig, source: &SourceArgs) -> anyhow::Result<PhotoBooth> {
    if let Some(filter) = &source.filter {
        config.filter = filter.clone();
    }
    let camera = open_source_spec(&source.source)?;
    let spooler = HtmlFileSpooler::new(config.output_dir.clone(), config.open_print_document);
    Ok(PhotoBooth::new(config, camera, Box::new(spooler))?)
}

fn cmd_preview(config: BoothConfig, args: PreviewArgs) -> anyhow::Result<()> {
    let mut preview = LivePreview::new(config.preview);
    let registry = FilterRegistry::builtin()?;
    let name = args.source.filter.as_deref().unwrap_or(&config.filter);
    preview.apply_filter(registry.resolve(name)?);
    preview.attach_stream(open_source_spec(&args.source.source)?);

    let frame = preview.render_frame()?;
    let png = encode_png(&frame)?;
    if let Some(parent) = args.out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&args.out, png.bytes())
        .with_context(|| format!("write png '{}'", args.out.display()))?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

/// Prints countdown progress to stderr.
struct ConsoleObserver;

impl SequenceObserver for ConsoleObserver {
    fn phase_entered(&mut self, phase: Phase, shot: usize) {
        if let Some(label) = phase.countdown_label() {
            eprintln!("[shot {}] {label}", shot + 1);
        } else if phase == Phase::Flash {
            eprintln!("[shot {}] *flash*", shot + 1);
        }
    }
}

fn cmd_shoot(mut config: BoothConfig, args: ShootArgs) -> anyhow::Result<()> {
    if args.instant {
        config.timings = PhaseTimings::INSTANT;
    }
    if let Some(shots) = args.shots {
        config.shots = shots;
    }
    let mut booth = build_booth(config, &args.source)?;

    let session: &CaptureSession = booth.run_capture(&mut SystemClock, &mut ConsoleObserver)?;
    if !session.skipped_shots().is_empty() {
        eprintln!("skipped shots: {:?}", session.skipped_shots());
    }

    if args.print {
        let job = booth.print().map_err(report)?;
        if let Some(path) = job.location {
            eprintln!("wrote {}", path.display());
        }
    }
    let path = booth.download().map_err(report)?;
    eprintln!("wrote {}", path.display());
    Ok(())
}

fn cmd_collage(config: BoothConfig, args: CollageArgs) -> anyhow::Result<()> {
    let frames = args
        .images
        .iter()
        .map(|p| ImageFrame::from_path(p).with_context(|| format!("load '{}'", p.display())))
        .collect::<anyhow::Result<Vec<_>>>()?;
    let spooler = HtmlFileSpooler::new(config.output_dir.clone(), config.open_print_document);
    let mut exporter = photobooth::Exporter::new(
        config.collage,
        config.output_dir,
        config.title_font,
        Box::new(spooler),
    )?;

    if args.print {
        let job = exporter.print(&frames).map_err(report)?;
        if let Some(path) = job.location {
            eprintln!("wrote {}", path.display());
        }
    }
    let path = exporter.download(&frames).map_err(report)?;
    eprintln!("wrote {}", path.display());
    Ok(())
}

/// Show the user-facing alert text for export errors, keeping the detail for the log.
fn report(err: photobooth::BoothError) -> anyhow::Error {
    match err.user_message() {
        Some(msg) => {
            tracing::error!(%err, "export failed");
            anyhow::anyhow!(msg)
        }
        None => err.into(),
    }
}
