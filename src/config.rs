// Copyright (c) 2026 rezky_nightky

use std::convert::Infallible;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::str::FromStr;

use clap::Parser;
use tracing::warn;

use crate::frame::CellSize;
use crate::runtime::GlyphSet;

pub const DEFAULT_PARAMS_USAGE: &str = "DEFAULT PARAMS USAGE:\n  snowdrift --flakes 600 --vertical 1.0 --wind 1.0 --fps 60 --cell 8x16 --glyphs auto";

pub const CONTROLS_HELP: &str = "CONTROLS:\n  q, Esc       quit\n  Up / Down    more / fewer flakes (50 at a time)\n  Right / Left stronger / weaker wind\n  + / -        faster / slower fall\n  d            toggle day / night\n  h            toggle the status line";

/// Upper bound on the flake count accepted from the outside.
pub const MAX_FLAKES: f64 = 50_000.0;

const DEFAULT_FPS: f64 = 60.0;
const MAX_CELL_SIDE: u16 = 64;

pub fn color_enabled_stdout() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if matches!(std::env::var("CLICOLOR").ok().as_deref(), Some("0")) {
        return false;
    }
    std::io::stdout().is_terminal()
}

/// Paints all-caps heading lines cyan and the command name blue.
pub fn colorize_help(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 64);
    for chunk in text.split_inclusive('\n') {
        let (line, nl) = chunk
            .strip_suffix('\n')
            .map(|l| (l, "\n"))
            .unwrap_or((chunk, ""));

        let is_heading =
            !line.starts_with(' ') && line.ends_with(':') && line == line.to_ascii_uppercase();

        if is_heading {
            out.push_str("\x1b[1;36m");
            out.push_str(line);
            out.push_str("\x1b[0m");
        } else if let Some(rest) = line.strip_prefix("  snowdrift") {
            out.push_str("  \x1b[1;34msnowdrift\x1b[0m");
            out.push_str(rest);
        } else {
            out.push_str(line);
        }
        out.push_str(nl);
    }
    out
}

pub fn help_block(text: &str) -> String {
    if color_enabled_stdout() {
        colorize_help(text)
    } else {
        text.to_string()
    }
}

/// Parses the longest numeric prefix of `s`, the way browsers read a
/// number out of a form field: `"12px"` is 12, `"abc"` is nothing.
pub fn leading_number(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let int_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    let mut digits = end - int_start;
    if bytes.get(end) == Some(&b'.') {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while bytes.get(frac_end).is_some_and(u8::is_ascii_digit) {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }
    if digits == 0 {
        return None;
    }
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while bytes.get(exp_end).is_some_and(u8::is_ascii_digit) {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }
    s[..end].parse().ok()
}

/// Integer counterpart of [`leading_number`]: sign and digits only, so it
/// stops at the first `.` or `e` (`"2e2"` is 2).
pub fn leading_integer(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let sign = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let end = sign
        + bytes[sign..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count();
    if end == sign {
        return None;
    }
    s[..end].parse().ok()
}

/// A numeric control value that never fails to parse. Garbage, zero and
/// non-finite input all read as "missing" and fall back to the default.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Lenient {
    float: Option<f64>,
    int: Option<f64>,
}

impl Lenient {
    pub fn or(self, default: f64) -> f64 {
        self.float.filter(|v| *v != 0.0).unwrap_or(default)
    }

    /// Integer reading: only the leading digits count, so `"0.7"` is
    /// missing just like `"0"`.
    pub fn count_or(self, default: f64) -> f64 {
        self.int.filter(|v| *v != 0.0).unwrap_or(default)
    }
}

impl FromStr for Lenient {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self {
            float: leading_number(s).filter(|v| v.is_finite()),
            int: leading_integer(s).filter(|v| v.is_finite()),
        })
    }
}

impl FromStr for CellSize {
    type Err = Infallible;

    /// `WxH` or `W,H`; anything unreadable keeps the default side.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let def = CellSize::default();
        let (w, h) = s
            .split_once(['x', 'X', ','])
            .unwrap_or((s, ""));
        let side = |v: &str, fallback: u16| {
            leading_number(v)
                .filter(|n| n.is_finite() && *n >= 1.0)
                .map(|n| n.min(MAX_CELL_SIDE as f64) as u16)
                .unwrap_or(fallback)
        };
        Ok(Self {
            width: side(w, def.width),
            height: side(h, def.height),
        })
    }
}

/// Clamps `v` into `[min, max]`; non-finite input becomes `default`.
pub fn coerce_range(name: &str, v: f64, min: f64, max: f64, default: f64) -> f64 {
    if !v.is_finite() {
        warn!(option = name, value = v, fallback = default, "not a finite number, using default");
        return default;
    }
    let c = v.clamp(min, max);
    if c != v {
        warn!(option = name, value = v, min, max, "out of range, clamped");
    }
    c
}

#[derive(Parser, Debug, Clone)]
#[command(name = "snowdrift", version, disable_version_flag = true)]
pub struct Args {
    #[arg(
        short = 'n',
        long = "flakes",
        allow_hyphen_values = true,
        default_value = "600",
        help_heading = "SNOW",
        help = "Number of flakes (min 1 max 50000; 0 or garbage means 600)"
    )]
    pub flakes: Lenient,

    #[arg(
        short = 'V',
        long = "vertical",
        allow_hyphen_values = true,
        default_value = "1.0",
        help_heading = "SNOW",
        help = "Fall speed multiplier (0 or garbage means 1.0)"
    )]
    pub vertical: Lenient,

    #[arg(
        short = 'w',
        long = "wind",
        allow_hyphen_values = true,
        default_value = "1.0",
        help_heading = "SNOW",
        help = "Wind strength multiplier (0 or garbage means 1.0)"
    )]
    pub wind: Lenient,

    #[arg(
        long = "seed",
        help_heading = "SNOW",
        help = "Seed the random source for a repeatable snowfall"
    )]
    pub seed: Option<u64>,

    #[arg(
        short = 'D',
        long = "day",
        help_heading = "APPEARANCE",
        help = "Start under a daylight sky"
    )]
    pub day: bool,

    #[arg(
        long = "glyphs",
        default_value_t = GlyphSet::Auto,
        value_enum,
        help_heading = "APPEARANCE",
        help = "Flake glyphs (auto, ascii, unicode)"
    )]
    pub glyphs: GlyphSet,

    #[arg(
        long = "cell",
        default_value = "8x16",
        help_heading = "APPEARANCE",
        help = "Virtual pixels per terminal cell: WxH (min 1 max 64 each)"
    )]
    pub cell: CellSize,

    #[arg(
        long = "colormode",
        help_heading = "APPEARANCE",
        help = "Force color mode (0, 16, 8/256, 24/32). Default: detected from COLORTERM/TERM"
    )]
    pub colormode: Option<u16>,

    #[arg(
        long = "hud",
        help_heading = "APPEARANCE",
        help = "Show a status line with the current control values"
    )]
    pub hud: bool,

    #[arg(
        short = 'f',
        long = "fps",
        default_value_t = DEFAULT_FPS,
        help_heading = "GENERAL",
        help = "Target FPS (min 1 max 240)"
    )]
    pub fps: f64,

    #[arg(
        long = "duration",
        allow_hyphen_values = true,
        help_heading = "GENERAL",
        help = "Stop after N seconds (min 0.1 max 86400; <=0 disables)"
    )]
    pub duration: Option<f64>,

    #[arg(
        short = 's',
        long = "screensaver",
        help_heading = "GENERAL",
        help = "Screensaver mode (exit on keypress)"
    )]
    pub screensaver: bool,

    #[arg(
        long = "log-file",
        value_name = "PATH",
        help_heading = "GENERAL",
        help = "Write logs to PATH (filter with SNOWDRIFT_LOG, default info)"
    )]
    pub log_file: Option<PathBuf>,

    #[arg(
        long = "check-bitcolor",
        help_heading = "HELP",
        help = "Print detected terminal color capability and exit"
    )]
    pub check_bitcolor: bool,

    #[arg(
        long = "info",
        short = 'i',
        help_heading = "HELP",
        help = "Print version info and exit"
    )]
    pub info: bool,

    #[arg(
        long = "version",
        short = 'v',
        help_heading = "HELP",
        help = "Print version and exit"
    )]
    pub version: bool,
}

impl Args {
    pub fn flake_count(&self) -> f64 {
        let n = self.flakes.count_or(crate::snowfall::DEFAULT_FLAKES);
        if n > MAX_FLAKES {
            warn!(value = n, max = MAX_FLAKES, "too many flakes, clamped");
            return MAX_FLAKES;
        }
        n
    }

    pub fn vertical_multiplier(&self) -> f32 {
        self.vertical.or(crate::snowfall::DEFAULT_VERTICAL as f64) as f32
    }

    pub fn wind_multiplier(&self) -> f32 {
        self.wind.or(crate::snowfall::DEFAULT_WIND as f64) as f32
    }

    pub fn target_fps(&self) -> f64 {
        coerce_range("--fps", self.fps, 1.0, 240.0, DEFAULT_FPS)
    }

    /// `None` when the run should not stop on its own.
    pub fn duration_secs(&self) -> Option<f64> {
        let s = self.duration?;
        if !s.is_finite() || s <= 0.0 {
            return None;
        }
        Some(coerce_range("--duration", s, 0.1, 86400.0, 0.1))
    }
}
