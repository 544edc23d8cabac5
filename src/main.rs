use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use kitchenthing::epd7in5b::{HEIGHT, WIDTH};
use kitchenthing::photo::{self, Photo};
use kitchenthing::render::{Info, Item, Renderer};
use kitchenthing::{Framebuffer, RandomPick};

/// Partial refresh window, `x,y,width,height`
#[derive(Debug, Clone, Copy)]
struct Window {
    x: u32,
    y: u32,
    width: u32,
    height: u32,
}

fn parse_window(s: &str) -> Result<Window, String> {
    let parts: Vec<u32> = s
        .split(',')
        .map(|p| p.trim().parse::<u32>().map_err(|e| format!("{:?}: {}", p, e)))
        .collect::<Result<_, _>>()?;
    match parts[..] {
        [x, y, width, height] => Ok(Window {
            x,
            y,
            width,
            height,
        }),
        _ => Err(format!("expected x,y,width,height, got {:?}", s)),
    }
}

/// Kitchen dashboard for a 7.5" black/white/red e-paper panel
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Render to this PNG file instead of driving the panel
    #[arg(long, value_name = "FILE")]
    test_render: Option<PathBuf>,

    /// Directory to pick the photo from
    #[arg(long, value_name = "DIR")]
    photo_dir: Option<PathBuf>,

    /// Fixed headline instead of one matching the item count
    #[arg(long)]
    headline: Option<String>,

    /// List item as `text` or `text|note`, repeatable
    #[arg(long = "item", value_name = "TEXT")]
    items: Vec<String>,

    /// Minutes until the next update, shown in the footer
    #[arg(long, default_value_t = 30)]
    refresh_minutes: i64,

    /// Refresh only this window (experimental): x,y,width,height
    #[arg(long, value_parser = parse_window)]
    partial: Option<Window>,

    /// Log at debug level regardless of RUST_LOG
    #[arg(long)]
    debug: bool,
}

fn init_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn build_info(args: &Args) -> Info {
    let now = chrono::Local::now();
    let next = now + chrono::Duration::minutes(args.refresh_minutes);
    Info {
        today: now.format("%a %e %b").to_string(),
        headline: args.headline.clone(),
        items: args.items.iter().map(|s| Item::parse(s)).collect(),
        footer: format!("Next update: ~{}", next.format("%H:%M:%S")),
    }
}

fn load_photo(args: &Args) -> Option<Photo> {
    let dir = args.photo_dir.as_deref()?;
    match photo::load(dir, &mut RandomPick) {
        Ok(photo) => Some(photo),
        Err(e) => {
            log::warn!("Skipping photo: {}", e);
            None
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.debug);

    let info = build_info(&args);
    let photo = load_photo(&args);
    let renderer = Renderer::default();

    if let Some(out) = &args.test_render {
        let mut fb = Framebuffer::new(WIDTH, HEIGHT)?;
        let area = renderer.render(&mut fb, &info, photo.as_ref(), &mut RandomPick)?;
        log::debug!("Photo area {:?}", area);
        fb.to_rgb_image()
            .save(out)
            .with_context(|| format!("writing render to {}", out.display()))?;
        log::info!("Wrote render to {}", out.display());
        return Ok(());
    }

    log::info!("kitchenthing starting...");
    refresh_panel(&args, &renderer, &info, photo.as_ref())?;
    log::info!("kitchenthing done");
    Ok(())
}

/// One cycle: open, init, render, refresh, sleep, close
#[cfg(feature = "linux")]
fn refresh_panel(
    args: &Args,
    renderer: &Renderer<'_, embedded_graphics::mono_font::MonoFont<'_>>,
    info: &Info,
    photo: Option<&Photo>,
) -> anyhow::Result<()> {
    use kitchenthing::epd7in5b::linux;
    use kitchenthing::PanelConfig;

    let mut panel = linux::acquire(PanelConfig::default()).context("acquiring panel")?;
    panel.open().context("opening panel")?;

    let cycle = draw_and_refresh(&mut panel, args, renderer, info, photo);
    if cycle.is_err() && !panel.power_down() {
        log::warn!("Panel may still be powered");
    }
    panel.close();
    cycle
}

#[cfg(feature = "linux")]
fn draw_and_refresh(
    panel: &mut kitchenthing::epd7in5b::linux::LinuxPanel,
    args: &Args,
    renderer: &Renderer<'_, embedded_graphics::mono_font::MonoFont<'_>>,
    info: &Info,
    photo: Option<&Photo>,
) -> anyhow::Result<()> {
    panel.init().context("initializing panel")?;

    renderer.render(panel.framebuffer_mut(), info, photo, &mut RandomPick)?;

    match args.partial {
        Some(w) => panel
            .display_partial_refresh(w.x, w.y, w.width, w.height)
            .context("partial refresh")?,
        None => panel.display_refresh().context("refreshing panel")?,
    }
    panel.sleep().context("putting panel to sleep")?;
    Ok(())
}

#[cfg(not(feature = "linux"))]
fn refresh_panel(
    _args: &Args,
    _renderer: &Renderer<'_, embedded_graphics::mono_font::MonoFont<'_>>,
    _info: &Info,
    _photo: Option<&Photo>,
) -> anyhow::Result<()> {
    anyhow::bail!("built without the `linux` feature, use --test-render <FILE> to render without a panel")
}
