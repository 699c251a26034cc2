//! Desktop simulator for the neolog bar watchface.
//!
//! Renders the neolog-core watchface into a PNG file, or into an SDL2 window
//! via `embedded-graphics-simulator` when built with the `window` feature.
//! Battery, Bluetooth, locale and time can be set from the command line so
//! the face can be exercised without a watch.
//!
//! # Key bindings (`window` feature)
//!
//! | Key | Action                    |
//! |-----|---------------------------|
//! | S   | Toggle status bar         |
//! | B   | Toggle Bluetooth          |
//! | +   | Battery +10 %             |
//! | -   | Battery -10 %             |
//! | Q   | Quit                      |

mod companion;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use chrono::{Local, NaiveDateTime};
use clap::{Parser, ValueEnum};
use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics_simulator::{OutputSettings, OutputSettingsBuilder, SimulatorDisplay};
use log::{info, warn};

use neolog_core::color::{ColorDepth, ColorDisplay, HEX_BLACK, MonochromeDisplay};
use neolog_core::display_manager::{Clock, DisplayManager};
use neolog_core::framebuffer::FrameBuffer;
use neolog_core::layout::{SCREEN_HEIGHT_PX, SCREEN_WIDTH_PX};
use neolog_core::storage::MemoryStore;
use neolog_core::time::HourPolicy;

use crate::companion::WebConfig;

/// Format accepted by `--at`
const AT_FORMAT: &str = "%Y-%m-%d %H:%M";

type Manager<P> =
    DisplayManager<FrameBuffer<<P as ColorDepth>::Color>, P, MemoryStore, SimClock>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum HourPolicyArg {
    /// Noon and midnight light all twelve hour bars
    Wrap,
    /// Noon lights all twelve, midnight none
    NoonOverflow,
}

impl From<HourPolicyArg> for HourPolicy {
    fn from(arg: HourPolicyArg) -> Self {
        match arg {
            HourPolicyArg::Wrap => HourPolicy::Wrap,
            HourPolicyArg::NoonOverflow => HourPolicy::NoonOverflow,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "neolog-simulator", version, about = "Render the neolog watchface on a desktop")]
struct Args {
    /// Fixed time to show, "YYYY-MM-DD HH:MM" (defaults to the local clock)
    #[arg(long, value_parser = parse_at)]
    at: Option<NaiveDateTime>,

    /// Locale used for the date in the status bar
    #[arg(long, env = "NEOLOG_LOCALE", default_value = "en_US")]
    locale: String,

    /// Simulate a black and white panel
    #[arg(long)]
    mono: bool,

    /// How noon and midnight map to hour bars
    #[arg(long, value_enum, default_value_t = HourPolicyArg::Wrap)]
    hour_policy: HourPolicyArg,

    /// Battery charge in percent
    #[arg(long, default_value_t = 100, value_parser = clap::value_parser!(u8).range(0..=100))]
    battery: u8,

    /// Start with a phone connected
    #[arg(long)]
    bluetooth: bool,

    /// Companion page response (JSON) to apply as a configuration message
    #[arg(long)]
    web_config: Option<PathBuf>,

    /// Settings snapshot, read at start and written whenever settings change
    #[arg(long, env = "NEOLOG_SETTINGS")]
    settings: Option<PathBuf>,

    /// Write a PNG of the face and exit
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Pixel scale of the PNG and the window
    #[arg(long, default_value_t = 2)]
    scale: u32,
}

fn parse_at(text: &str) -> Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(text, AT_FORMAT)
        .map_err(|e| format!("expected \"{AT_FORMAT}\": {e}"))
}

/// Local clock, or a fixed instant from `--at`
#[derive(Debug, Clone, Copy)]
struct SimClock {
    fixed: Option<NaiveDateTime>,
}

impl Clock for SimClock {
    fn now(&self) -> NaiveDateTime {
        self.fixed.unwrap_or_else(|| Local::now().naive_local())
    }
}

fn load_store(path: Option<&Path>) -> Result<MemoryStore> {
    let Some(path) = path else {
        return Ok(MemoryStore::new());
    };
    if !path.exists() {
        info!("No settings at {}, using defaults", path.display());
        return Ok(MemoryStore::new());
    }

    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    MemoryStore::from_bytes(&bytes).map_err(|e| anyhow!("{}: {e}", path.display()))
}

fn save_store(path: Option<&Path>, store: &MemoryStore) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let bytes = store.to_bytes().map_err(|e| anyhow!("{e}"))?;
    fs::write(path, bytes).with_context(|| format!("writing {}", path.display()))?;
    info!("Saved {} settings to {}", store.len(), path.display());
    Ok(())
}

fn output_settings(scale: u32) -> OutputSettings {
    OutputSettingsBuilder::new().scale(scale.max(1)).build()
}

/// Copy whatever changed in the manager's framebuffer to the simulator.
fn present<P>(manager: &mut Manager<P>, display: &mut SimulatorDisplay<P::Color>)
where
    P: ColorDepth,
{
    let Ok(()) = manager.display_mut().flush(display);
}

fn run<P>(args: &Args) -> Result<()>
where
    P: ColorDepth,
    P::Color: Into<Rgb888> + From<Rgb888>,
{
    let store = load_store(args.settings.as_deref())?;
    let clock = SimClock { fixed: args.at };
    let background = P::from_hex(HEX_BLACK);

    let mut manager: Manager<P> = DisplayManager::new(
        FrameBuffer::new(background),
        store,
        clock,
        args.hour_policy.into(),
    );

    let face = manager.watchface_mut();
    face.set_locale(&args.locale);
    face.on_battery(args.battery);
    face.on_bluetooth(args.bluetooth);

    if let Some(path) = &args.web_config {
        let json = fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        if let Some(message) = WebConfig::from_json(&json)?.into_message()? {
            if let Err(e) = manager.apply_config(&message) {
                warn!("Configuration applied but not fully persisted: {e}");
            }
            save_store(args.settings.as_deref(), manager.store())?;
        }
    }

    let size = Size::new(SCREEN_WIDTH_PX, SCREEN_HEIGHT_PX);
    let mut display = SimulatorDisplay::with_default_color(size, background);
    let Ok(_) = manager.render();
    present(&mut manager, &mut display);

    if let Some(path) = &args.output {
        display
            .to_rgb_output_image(&output_settings(args.scale))
            .save_png(path)
            .with_context(|| format!("writing {}", path.display()))?;
        info!("Wrote {}", path.display());
        return Ok(());
    }

    #[cfg(feature = "window")]
    return window::run(&mut manager, &mut display, args);

    #[cfg(not(feature = "window"))]
    anyhow::bail!("nothing to do: pass --output, or build with the `window` feature for a live window")
}

#[cfg(feature = "window")]
mod window {
    use std::time::{Duration, Instant};

    use anyhow::Result;
    use chrono::Timelike;
    use embedded_graphics::pixelcolor::Rgb888;
    use embedded_graphics_simulator::{SimulatorDisplay, SimulatorEvent, Window, sdl2::Keycode};
    use log::{error, info};

    use neolog_core::color::ColorDepth;
    use neolog_core::config::ConfigMessage;
    use neolog_core::display_manager::{Clock, WatchEvent, event_receiver, event_sender};

    use super::{Args, Manager, output_settings, present, save_store};

    /// Target frame duration (~30 FPS).
    const FRAME_DURATION: Duration = Duration::from_millis(33);

    /// Battery step for the +/- keys
    const BATTERY_STEP: u8 = 10;

    pub(super) fn run<P>(
        manager: &mut Manager<P>,
        display: &mut SimulatorDisplay<P::Color>,
        args: &Args,
    ) -> Result<()>
    where
        P: ColorDepth,
        P::Color: Into<Rgb888> + From<Rgb888>,
    {
        info!("Keys: S=status bar  B=Bluetooth  +/-=battery  Q=quit");

        let mut window = Window::new("neolog", &output_settings(args.scale));
        // The SDL window is lazily initialized on the first `update()` call.
        window.update(display);

        let sender = event_sender();
        let receiver = event_receiver();
        let mut last_minute = manager.clock_mut().now().minute();

        'running: loop {
            let frame_start = Instant::now();
            let state = manager.watchface().state().clone();
            let mut settings_changed = false;

            for event in window.events() {
                let watch_event = match event {
                    SimulatorEvent::Quit => break 'running,
                    SimulatorEvent::KeyDown { keycode, .. } => match keycode {
                        Keycode::Q | Keycode::Escape => break 'running,
                        Keycode::S => {
                            settings_changed = true;
                            WatchEvent::Config(ConfigMessage {
                                status_bar: Some(!state.config.status_bar),
                                ..ConfigMessage::default()
                            })
                        }
                        Keycode::B => WatchEvent::Bluetooth(!state.status.bluetooth_connected),
                        Keycode::Plus | Keycode::Equals | Keycode::KpPlus => WatchEvent::Battery(
                            state.status.charge_percent.saturating_add(BATTERY_STEP).min(100),
                        ),
                        Keycode::Minus | Keycode::KpMinus => WatchEvent::Battery(
                            state.status.charge_percent.saturating_sub(BATTERY_STEP),
                        ),
                        _ => continue,
                    },
                    _ => continue,
                };
                if sender.try_send(watch_event).is_err() {
                    error!("Event channel full, dropping {:?}", watch_event);
                }
            }

            let minute = manager.clock_mut().now().minute();
            if minute != last_minute {
                last_minute = minute;
                if sender.try_send(WatchEvent::Tick).is_err() {
                    error!("Event channel full, dropping tick");
                }
            }

            let Ok(drawn) = manager.drain(&receiver);
            if drawn {
                present(manager, display);
            }
            if settings_changed {
                save_store(args.settings.as_deref(), manager.store())?;
            }

            window.update(display);

            let elapsed = frame_start.elapsed();
            if elapsed < FRAME_DURATION {
                std::thread::sleep(FRAME_DURATION - elapsed);
            }
        }

        info!("Simulator exiting");
        Ok(())
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    info!(
        "Starting neolog simulator: {}x{}, {} panel",
        SCREEN_WIDTH_PX,
        SCREEN_HEIGHT_PX,
        if args.mono { MonochromeDisplay::NAME } else { ColorDisplay::NAME }
    );

    if args.mono {
        run::<MonochromeDisplay>(&args)
    } else {
        run::<ColorDisplay>(&args)
    }
}
