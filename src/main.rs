// Copyright (c) 2026 rezky_nightky

mod cell;
mod clock;
mod color;
mod config;
mod flake;
mod frame;
mod logging;
mod palette;
mod pool;
mod render;
mod runtime;
mod scheduler;
mod snowfall;
mod terminal;
mod vortex;
mod wind;

use std::env;
use std::time::{Duration, Instant};

#[cfg(unix)]
use std::thread;

use clap::builder::styling::{AnsiColor as ClapAnsiColor, Color as ClapColor};
use clap::builder::styling::{Effects as ClapEffects, Style as ClapStyle};
use clap::builder::Styles as ClapStyles;
use clap::{CommandFactory, FromArgMatches};
use crossterm::event::{Event, KeyCode, KeyEventKind};
use rand::{rngs::StdRng, SeedableRng};
use tracing::{info, warn};

#[cfg(unix)]
use signal_hook::consts::{SIGHUP, SIGINT, SIGTERM};
#[cfg(unix)]
use signal_hook::iterator::Signals;

use crate::clock::MonotonicClock;
use crate::color::{hex_to_rgb, Rgb, WHITE};
use crate::config::{color_enabled_stdout, help_block, Args, CONTROLS_HELP, DEFAULT_PARAMS_USAGE};
use crate::frame::Frame;
use crate::palette::SkyPalette;
use crate::runtime::ColorMode;
use crate::snowfall::{Settings, Snowfall};
use crate::terminal::{restore_terminal_best_effort, Terminal};

const HELP_TEMPLATE_PLAIN: &str = "\
{before-help}{about-with-newline}
USAGE:
  {usage}

{all-args}{after-help}";

const HELP_TEMPLATE_COLOR: &str = "\
{before-help}{about-with-newline}
\x1b[1;36mUSAGE:\x1b[0m
  {usage}

{all-args}{after-help}";

const FLAKE_STEP: f64 = 50.0;
const MULTIPLIER_STEP: f32 = 0.1;
const MULTIPLIER_MIN: f32 = 0.1;
const MULTIPLIER_MAX: f32 = 5.0;

const HUD_DAY: &str = "#2b3440";

fn build_info() -> &'static str {
    env!("SNOWDRIFT_BUILD")
}

fn git_sha() -> &'static str {
    env!("SNOWDRIFT_GIT_SHA")
}

fn clap_styles() -> ClapStyles {
    ClapStyles::styled()
        .header(
            ClapStyle::new()
                .effects(ClapEffects::BOLD)
                .fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Cyan))),
        )
        .usage(
            ClapStyle::new()
                .effects(ClapEffects::BOLD)
                .fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Green))),
        )
        .literal(ClapStyle::new().fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Yellow))))
        .placeholder(ClapStyle::new().fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Magenta))))
}

fn default_to_ascii() -> bool {
    let lang = env::var("LANG").unwrap_or_default();
    !lang.to_ascii_uppercase().contains("UTF")
}

fn detect_color_mode_auto() -> ColorMode {
    let colorterm = env::var("COLORTERM")
        .unwrap_or_default()
        .to_ascii_lowercase();
    if colorterm.contains("truecolor") || colorterm.contains("24bit") {
        return ColorMode::TrueColor;
    }

    let term = env::var("TERM").unwrap_or_default().to_ascii_lowercase();
    if term == "dumb" {
        return ColorMode::Mono;
    }
    if term.contains("256color") {
        return ColorMode::Color256;
    }
    if term.starts_with("linux") || term.starts_with("vt") {
        return ColorMode::Color16;
    }

    ColorMode::Color256
}

fn detect_color_mode(args: &Args) -> ColorMode {
    match args.colormode {
        Some(0) => ColorMode::Mono,
        Some(16) => ColorMode::Color16,
        Some(8 | 256) => ColorMode::Color256,
        Some(24 | 32) => ColorMode::TrueColor,
        Some(m) => {
            warn!(colormode = m, "unknown --colormode, detecting instead");
            detect_color_mode_auto()
        }
        None => detect_color_mode_auto(),
    }
}

fn color_mode_label(m: ColorMode) -> &'static str {
    match m {
        ColorMode::TrueColor => "24-bit truecolor",
        ColorMode::Color256 => "8-bit (256-color)",
        ColorMode::Mono => "mono",
        ColorMode::Color16 => "16-color",
    }
}

fn hud_color(daylight: bool) -> Rgb {
    if daylight {
        hex_to_rgb(HUD_DAY)
    } else {
        WHITE
    }
}

/// One key step. Values already outside the key range (set from the
/// command line) move by a single step and never jump to the bound.
fn nudge(value: f32, delta: f32) -> f32 {
    let lo = MULTIPLIER_MIN.min(value);
    let hi = MULTIPLIER_MAX.max(value);
    // Round to one decimal so repeated presses land on slider steps.
    (((value + delta) * 10.0).round() / 10.0).clamp(lo, hi)
}

fn main() -> std::io::Result<()> {
    std::panic::set_hook(Box::new(|info| {
        restore_terminal_best_effort();
        eprintln!("{}", info);
    }));

    #[cfg(unix)]
    {
        if let Ok(mut signals) = Signals::new([SIGINT, SIGTERM, SIGHUP]) {
            thread::spawn(move || {
                if let Some(sig) = signals.forever().next() {
                    restore_terminal_best_effort();
                    std::process::exit(128 + sig);
                }
            });
        }
    }

    #[cfg(windows)]
    {
        if let Err(e) = ctrlc::set_handler(|| {
            restore_terminal_best_effort();
            std::process::exit(130);
        }) {
            eprintln!("failed to install Ctrl-C handler: {}", e);
        }
    }

    let mut cmd = Args::command();
    cmd = cmd.styles(clap_styles());
    cmd = cmd.before_help(help_block(DEFAULT_PARAMS_USAGE));
    cmd = cmd.after_help(help_block(CONTROLS_HELP));
    let help_template = if color_enabled_stdout() {
        HELP_TEMPLATE_COLOR
    } else {
        HELP_TEMPLATE_PLAIN
    };
    cmd = cmd.help_template(help_template);
    cmd.build();

    if cmd.get_arguments().any(|a| a.get_id().as_str() == "help") {
        cmd = cmd.mut_arg("help", |a| a.help_heading("HELP"));
    }
    cmd.build();

    let matches = cmd.get_matches();
    let args = Args::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    logging::init(args.log_file.as_deref())?;

    if args.check_bitcolor {
        let colorterm = env::var("COLORTERM").unwrap_or_default();
        let term = env::var("TERM").unwrap_or_default();
        let auto = detect_color_mode_auto();
        let effective = detect_color_mode(&args);

        println!("BITCOLOR CHECK:");
        println!(
            "  COLORTERM: {}",
            if colorterm.is_empty() {
                "(unset)"
            } else {
                &colorterm
            }
        );
        println!(
            "  TERM: {}",
            if term.is_empty() { "(unset)" } else { &term }
        );
        println!("  auto_detected: {}", color_mode_label(auto));
        if args.colormode.is_some() {
            println!("  forced: {}", color_mode_label(effective));
        }
        println!("  effective: {}", color_mode_label(effective));
        return Ok(());
    }

    if args.version {
        println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    if args.info {
        println!("Version: v{}", env!("CARGO_PKG_VERSION"));
        println!("Build: {}", build_info());
        println!("Commit: {}", git_sha());
        println!("Copyright: (c) 2026 {}", env!("CARGO_PKG_AUTHORS"));
        println!("License: {}", env!("CARGO_PKG_LICENSE"));
        println!("Source: {}", env!("CARGO_PKG_REPOSITORY"));
        return Ok(());
    }

    let color_mode = detect_color_mode(&args);
    let glyphs = args.glyphs.resolve(default_to_ascii());
    let target_fps = args.target_fps();
    let settings = Settings {
        flakes: args.flake_count(),
        vertical_multiplier: args.vertical_multiplier(),
        wind_multiplier: args.wind_multiplier(),
        daylight: args.day,
    };

    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let mut term = Terminal::new(color_mode)?;
    let (w, h) = term.size()?;

    let mut frame = Frame::new(
        w,
        h,
        args.cell,
        glyphs,
        &SkyPalette::for_daylight(settings.daylight),
    );
    let mut snow = Snowfall::new(settings, frame.viewport(), rng, MonotonicClock::new());
    let mut hud = args.hud;

    info!(
        cols = w,
        rows = h,
        color = color_mode_label(color_mode),
        fps = target_fps,
        seed = ?args.seed,
        "terminal ready"
    );

    let start_time = Instant::now();
    let end_time = args
        .duration_secs()
        .map(|s| start_time + Duration::from_secs_f64(s));

    let target_period = Duration::from_secs_f64(1.0 / target_fps);
    let mut next_frame = Instant::now();
    let mut running = true;

    while running {
        if end_time.is_some_and(|end| Instant::now() >= end) {
            break;
        }
        let mut pending_resize: Option<(u16, u16)> = None;
        let daylight_before = snow.daylight();

        loop {
            while Terminal::poll_event(Duration::from_millis(0))? {
                match Terminal::read_event()? {
                    Event::Resize(nw, nh) => {
                        pending_resize = Some((nw, nh));
                    }
                    Event::Key(k) if k.kind == KeyEventKind::Press => {
                        if args.screensaver {
                            running = false;
                            break;
                        }

                        match k.code {
                            KeyCode::Esc | KeyCode::Char('q') => running = false,
                            KeyCode::Up => {
                                let n = snow.flakes().len() as f64 + FLAKE_STEP;
                                snow.set_flake_count(n.min(config::MAX_FLAKES));
                            }
                            KeyCode::Down => {
                                let n = snow.flakes().len() as f64 - FLAKE_STEP;
                                snow.set_flake_count(n);
                            }
                            KeyCode::Right => {
                                let m = snow.wind().multiplier();
                                snow.set_wind_multiplier(nudge(m, MULTIPLIER_STEP));
                            }
                            KeyCode::Left => {
                                let m = snow.wind().multiplier();
                                snow.set_wind_multiplier(nudge(m, -MULTIPLIER_STEP));
                            }
                            KeyCode::Char('+') | KeyCode::Char('=') => {
                                let m = snow.vertical_multiplier();
                                snow.set_vertical_multiplier(nudge(m, MULTIPLIER_STEP));
                            }
                            KeyCode::Char('-') => {
                                let m = snow.vertical_multiplier();
                                snow.set_vertical_multiplier(nudge(m, -MULTIPLIER_STEP));
                            }
                            KeyCode::Char('d') => snow.toggle_daylight(),
                            KeyCode::Char('h') => hud = !hud,
                            _ => {}
                        }
                    }
                    _ => {}
                }
            }

            if !running || pending_resize.is_some() {
                break;
            }

            let now = Instant::now();
            if now >= next_frame {
                break;
            }

            let mut timeout = next_frame - now;
            if let Some(end) = end_time {
                if now >= end {
                    break;
                }
                timeout = timeout.min(end - now);
            }
            let _ = Terminal::poll_event(timeout)?;
        }

        if !running {
            break;
        }

        let sky = SkyPalette::for_daylight(snow.daylight());
        if let Some((nw, nh)) = pending_resize {
            frame = Frame::new(nw, nh, args.cell, glyphs, &sky);
            snow.resize(frame.viewport());
        } else if snow.daylight() != daylight_before {
            frame.set_sky(&sky);
        }

        snow.run_timers();
        frame.clear();
        snow.step(&mut frame);
        if hud {
            frame.put_str(0, 0, &snow.status_line(), hud_color(snow.daylight()));
        }
        term.draw(&frame)?;

        next_frame += target_period;
        let now = Instant::now();
        if now > next_frame {
            next_frame = now;
        }
    }

    snow.stop_timers();
    info!(
        elapsed_s = start_time.elapsed().as_secs_f64(),
        "snowfall stopped"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nudge_stays_on_slider_steps() {
        assert_eq!(nudge(1.0, 0.1), 1.1);
        assert_eq!(nudge(0.1, -0.1), 0.1);
        assert_eq!(nudge(4.95, 0.1), 5.0);
        assert_eq!(nudge(0.7, -0.1), 0.6);
    }

    #[test]
    fn nudge_from_outside_the_key_range_moves_one_step() {
        assert_eq!(nudge(-1.5, 0.1), -1.4);
        assert_eq!(nudge(-1.5, -0.1), -1.5);
        assert_eq!(nudge(8.0, -0.1), 7.9);
        assert_eq!(nudge(8.0, 0.1), 8.0);
    }
}
