use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{ArgAction, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "stardeck", version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Animate a particle field off-screen and save the last frame as a PNG.
    Frame(FrameArgs),
    /// Group a team roster JSON into display sections.
    Team(TeamArgs),
    /// List the built-in page themes.
    Presets,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Viewport width in CSS pixels.
    #[arg(long, default_value_t = 640.0)]
    width: f64,

    /// Viewport height in CSS pixels.
    #[arg(long, default_value_t = 360.0)]
    height: f64,

    /// Device pixel ratio.
    #[arg(long, default_value_t = 1.0)]
    dpr: f64,

    /// Number of frames to run before capturing.
    #[arg(long, default_value_t = 60)]
    frames: usize,

    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Page theme (home, about, services, ...).
    #[arg(long, value_parser = parse_preset)]
    preset: Option<stardeck::ThemePreset>,

    /// Override the star count.
    #[arg(long)]
    stars: Option<usize>,

    /// Field configuration JSON; flags are applied on top.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct TeamArgs {
    /// Roster JSON: `{"members": [...], "roles": [...]}` or a bare member array.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Write grouped JSON here instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,
}

fn parse_preset(s: &str) -> Result<stardeck::ThemePreset, String> {
    stardeck::ThemePreset::from_name(s).ok_or_else(|| {
        let names: Vec<&str> = stardeck::ThemePreset::ALL
            .iter()
            .map(|p| p.name())
            .collect();
        format!("unknown preset '{s}' (expected one of: {})", names.join(", "))
    })
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Team(args) => cmd_team(args),
        Command::Presets => {
            for preset in stardeck::ThemePreset::ALL {
                println!("{}", preset.name());
            }
            Ok(())
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(args: &FrameArgs) -> anyhow::Result<stardeck::FieldConfig> {
    let mut cfg = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("read config '{}'", path.display()))?;
            serde_json::from_str::<stardeck::FieldConfig>(&text)
                .with_context(|| format!("parse config '{}'", path.display()))?
        }
        None => stardeck::FieldConfig::default(),
    };
    if let Some(preset) = args.preset {
        cfg.theme = preset.theme();
    }
    if let Some(stars) = args.stars {
        cfg.star_count = stars;
    }
    Ok(cfg)
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    use stardeck::FrameHost as _;

    let cfg = load_config(&args)?;
    let viewport = stardeck::Viewport::new(args.width, args.height)?;
    let dpr = stardeck::sane_device_pixel_ratio(args.dpr);
    if dpr != args.dpr {
        tracing::warn!(requested = args.dpr, "unusable device pixel ratio, using {dpr}");
    }
    let host = stardeck::ManualHost::new(viewport, dpr);
    let surface = stardeck::CpuSurface::new(viewport.to_pixels(host.device_pixel_ratio()))?;

    let mounted = stardeck::MountedField::mount(Some(surface), host.clone(), cfg, args.seed)
        .context("particle field could not be mounted on the surface")?;
    host.run_frames(args.frames);
    let frames = mounted.frames();
    let surface = mounted
        .unmount()
        .context("surface was not handed back on unmount")?;

    ensure_parent(&args.out)?;
    surface
        .write_png(&args.out)
        .with_context(|| format!("write png '{}'", args.out.display()))?;

    tracing::info!(frames, "frame captured");
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_team(args: TeamArgs) -> anyhow::Result<()> {
    let text = fs::read_to_string(&args.in_path)
        .with_context(|| format!("read roster '{}'", args.in_path.display()))?;
    let roster = stardeck::TeamRoster::from_json_str(&text)
        .with_context(|| format!("parse roster '{}'", args.in_path.display()))?;
    let json = serde_json::to_string_pretty(&roster.grouped()).context("encode groups")?;

    match &args.out {
        Some(out) => {
            ensure_parent(out)?;
            fs::write(out, json + "\n")
                .with_context(|| format!("write groups '{}'", out.display()))?;
            eprintln!("wrote {}", out.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn ensure_parent(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    Ok(())
}
