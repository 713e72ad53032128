use super::VERSION;
use crate::error::{Error, Result};
use crate::check_range;
use crate::style::{parse_color, MarkerSymbol};
use clap::{value_t, App, AppSettings, Arg, ArgMatches};
use plotters::style::RGBColor;
use std::ffi::OsString;
use std::path::PathBuf;
use std::str::FromStr;

/// options spelled with a single dash although they have several letters
const LONG_SINGLE_DASH: &[&str] = &[
    "xname", "lc", "lw", "ms", "mc", "mw", "mlc", "mlw", "ff", "fs",
];

/// short options and the number of values they take
const SHORT_WITH_VALUES: &[(&str, usize)] = &[
    ("-F", 1),
    ("-W", 1),
    ("-H", 1),
    ("-s", 1),
    ("-e", 1),
    ("-n", 1),
    ("-i", 1),
    ("-y", 2),
];

/// Largest figure side, font or marker size in pixels after scaling.
pub const MAX_PIXELS: f64 = 10000.;

/// Which part of the series goes on which screen.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub start: usize,
    pub end: Option<usize>,
    pub num_samples: Option<usize>,
    pub num_screens: usize,
}

/// Bars, markers and fonts.
#[derive(Debug, Clone, PartialEq)]
pub struct Appearance {
    pub scale: f64,
    pub width: u32,
    pub height: u32,
    pub grid: bool,
    pub ylim: Option<(f64, f64)>,
    pub xname: String,
    pub line_color: RGBColor,
    pub line_width: f64,
    pub marker_symbol: MarkerSymbol,
    pub marker_color: RGBColor,
    pub marker_size: f64,
    pub marker_line_color: RGBColor,
    pub marker_line_width: f64,
    pub font_family: String,
    pub font_size: u32,
}

impl Default for Appearance {
    fn default() -> Self {
        Appearance {
            scale: 1.,
            width: 700,
            height: 500,
            grid: false,
            ylim: None,
            xname: String::from("Time [sample]"),
            line_color: RGBColor(0x63, 0x6e, 0xfa),
            line_width: 0.02,
            marker_symbol: MarkerSymbol::Circle,
            marker_color: RGBColor(0x63, 0x6e, 0xfa),
            marker_size: 6.,
            marker_line_color: RGBColor(25, 25, 112),
            marker_line_width: 0.,
            font_family: String::from("sans-serif"),
            font_size: 12,
        }
    }
}

impl Appearance {
    /// Checks every size, scaled by `-F`, against `MAX_PIXELS`.
    pub fn validate(&self) -> Result<()> {
        positive("-F", self.scale)?;
        positive("-W", self.width as f64)?;
        positive("-H", self.height as f64)?;
        positive("-fs", self.font_size as f64)?;
        not_negative("-lw", self.line_width)?;
        not_negative("-mw", self.marker_size)?;
        not_negative("-mlw", self.marker_line_width)?;
        at_most_pixels("-W", self.width as f64 * self.scale)?;
        at_most_pixels("-H", self.height as f64 * self.scale)?;
        at_most_pixels("-fs", self.font_size as f64 * self.scale)?;
        at_most_pixels("-mw", self.marker_size * self.scale)?;
        at_most_pixels("-mlw", self.marker_line_width * self.scale)?;
        Ok(())
    }

    /// width and height of the figure in pixels
    pub fn pixel_size(&self) -> Result<(u32, u32)> {
        self.validate()?;
        Ok((
            (self.width as f64 * self.scale).round() as u32,
            (self.height as f64 * self.scale).round() as u32,
        ))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlotConfig {
    /// standard input when missing
    pub infile: Option<PathBuf>,
    pub outfile: PathBuf,
    pub selection: Selection,
    pub appearance: Appearance,
}

/// Rewrites the toolkit spelling `-xname` into `--xname` so that clap sees a long option.
/// The values of options are passed through untouched, so `-xname -lc` keeps `-lc` as the title.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut options_done = false;
    let mut pending_values = 0;
    args.into_iter()
        .enumerate()
        .map(|(i, a)| {
            let a: OsString = a.into();
            if i == 0 || options_done {
                return a;
            }
            if pending_values > 0 {
                pending_values -= 1;
                return a;
            }
            let long = match a.to_str() {
                Some("--") => {
                    options_done = true;
                    None
                }
                Some(s) if s.starts_with("--") => {
                    pending_values = values_taken(&s[2..]);
                    None
                }
                Some(s) if s.starts_with('-') && LONG_SINGLE_DASH.contains(&&s[1..]) => {
                    pending_values = 1;
                    Some(format!("-{}", s))
                }
                Some(s) if s.starts_with('-') => {
                    pending_values = SHORT_WITH_VALUES
                        .iter()
                        .find(|(short, _)| *short == s)
                        .map_or(0, |(_, n)| *n);
                    None
                }
                _ => None,
            };
            long.map_or(a, OsString::from)
        })
        .collect()
}

/// number of values following the long option `name`
fn values_taken(name: &str) -> usize {
    if LONG_SINGLE_DASH.contains(&name) {
        1
    } else {
        0
    }
}

fn app() -> App<'static, 'static> {
    let opt = |name: &'static str, help: &'static str| {
        Arg::with_name(name).help(help).takes_value(true)
    };
    App::new("gseries")
        .version(VERSION.unwrap_or("unknown"))
        .about("draw a discrete series (double)")
        .setting(AppSettings::AllowNegativeNumbers)
        .setting(AppSettings::ColorNever)
        .arg(opt("factor", "scale of figure").short("F").default_value("1.0"))
        .arg(opt("width", "width of figure [px]").short("W").default_value("700"))
        .arg(opt("height", "height of figure [px]").short("H").default_value("500"))
        .arg(Arg::with_name("grid").help("draw grid").short("g"))
        .arg(opt("start_point", "start point").short("s").default_value("0"))
        .arg(opt("end_point", "end point").short("e"))
        .arg(opt("num_samples", "number of samples per screen").short("n"))
        .arg(opt("num_screens", "number of screens").short("i").default_value("1"))
        .arg(
            opt("ylim", "y-axis limits")
                .short("y")
                .number_of_values(2)
                .value_names(&["YMIN", "YMAX"])
                .allow_hyphen_values(true),
        )
        .arg(
            opt("xname", "x-axis title")
                .long("xname")
                .default_value("Time [sample]")
                .allow_hyphen_values(true),
        )
        .arg(opt("line_color", "line color").long("lc").default_value("#636EFA"))
        .arg(opt("line_width", "line width").long("lw").default_value("0.02"))
        .arg(
            opt("marker_symbol", "marker symbol, 0 (none) to 12")
                .long("ms")
                .default_value("1"),
        )
        .arg(opt("marker_color", "marker color").long("mc").default_value("#636EFA"))
        .arg(opt("marker_size", "marker size").long("mw").default_value("6"))
        .arg(
            opt("marker_line_color", "marker line color")
                .long("mlc")
                .default_value("midnightblue"),
        )
        .arg(opt("marker_line_width", "marker line width").long("mlw").default_value("0"))
        .arg(
            opt("font_family", "font family")
                .long("ff")
                .default_value("sans-serif")
                .allow_hyphen_values(true),
        )
        .arg(opt("font_size", "font size").long("fs").default_value("12"))
        .arg(
            Arg::with_name("files")
                .help("[infile] outfile; infile is the double-type discrete series (default stdin), outfile the figure")
                .required(true)
                .multiple(true)
                .min_values(1)
                .max_values(2),
        )
}

/// Takes the CLI arguments that control the drawing of the discrete series.
pub fn parse_cli() -> std::result::Result<PlotConfig, CliError> {
    parse_cli_from(std::env::args_os())
}

/// Either clap refused the arguments (including --help) or a value is out of range.
#[derive(Debug)]
pub enum CliError {
    Clap(clap::Error),
    Value(Error),
}

impl CliError {
    /// --help and --version end up here too, they are not failures
    pub fn is_info(&self) -> bool {
        match self {
            CliError::Clap(e) => matches!(
                e.kind,
                clap::ErrorKind::HelpDisplayed | clap::ErrorKind::VersionDisplayed
            ),
            CliError::Value(_) => false,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Clap(e) => {
                let plain = strip_ansi(&e.message);
                write!(f, "{}", plain.trim_start_matches("error: ").trim_end())
            }
            CliError::Value(e) => write!(f, "{}", e),
        }
    }
}

/// clap colors some messages on a terminal whatever the app settings
fn strip_ansi(msg: &str) -> String {
    let mut plain = String::with_capacity(msg.len());
    let mut chars = msg.chars();
    while let Some(c) = chars.next() {
        if c == '\u{1b}' {
            chars.by_ref().find(|c| c.is_ascii_alphabetic());
        } else {
            plain.push(c);
        }
    }
    plain
}

impl From<clap::Error> for CliError {
    fn from(e: clap::Error) -> Self {
        CliError::Clap(e)
    }
}

impl From<Error> for CliError {
    fn from(e: Error) -> Self {
        CliError::Value(e)
    }
}

pub fn parse_cli_from<I, T>(args: I) -> std::result::Result<PlotConfig, CliError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let m = app().get_matches_from_safe(normalize_args(args))?;
    config_from_matches(&m)
}

fn config_from_matches(m: &ArgMatches) -> std::result::Result<PlotConfig, CliError> {
    let files: Vec<&str> = m.values_of("files").map(|v| v.collect()).unwrap_or_default();
    let (infile, outfile) = match files[..] {
        [out] => (None, PathBuf::from(out)),
        [inp, out] => (Some(PathBuf::from(inp)), PathBuf::from(out)),
        _ => unreachable!("clap enforces one or two positional arguments"),
    };

    let selection = Selection {
        start: value_t!(m, "start_point", usize)?,
        end: optional::<usize>(m, "end_point")?,
        num_samples: optional::<usize>(m, "num_samples")?,
        num_screens: value_t!(m, "num_screens", usize)?,
    };
    positive("-i", selection.num_screens as f64)?;
    if let Some(n) = selection.num_samples {
        positive("-n", n as f64)?;
    }

    let ylim = match m.values_of("ylim") {
        Some(v) => {
            let lim = v
                .map(|s| parse_value::<f64>("-y", s))
                .collect::<Result<Vec<f64>>>()?;
            Some(check_range(lim[0], lim[1])?)
        }
        None => None,
    };

    let appearance = Appearance {
        scale: value_t!(m, "factor", f64)?,
        width: value_t!(m, "width", u32)?,
        height: value_t!(m, "height", u32)?,
        grid: m.is_present("grid"),
        ylim,
        xname: m.value_of("xname").unwrap_or_default().to_string(),
        line_color: parse_color(m.value_of("line_color").unwrap_or_default())?,
        line_width: value_t!(m, "line_width", f64)?,
        marker_symbol: MarkerSymbol::from_index(value_t!(m, "marker_symbol", u32)?)?,
        marker_color: parse_color(m.value_of("marker_color").unwrap_or_default())?,
        marker_size: value_t!(m, "marker_size", f64)?,
        marker_line_color: parse_color(m.value_of("marker_line_color").unwrap_or_default())?,
        marker_line_width: value_t!(m, "marker_line_width", f64)?,
        font_family: m.value_of("font_family").unwrap_or_default().to_string(),
        font_size: value_t!(m, "font_size", u32)?,
    };
    appearance.validate()?;

    Ok(PlotConfig {
        infile,
        outfile,
        selection,
        appearance,
    })
}

fn optional<T: FromStr>(m: &ArgMatches, name: &str) -> std::result::Result<Option<T>, clap::Error> {
    if m.is_present(name) {
        Ok(Some(value_t!(m, name, T)?))
    } else {
        Ok(None)
    }
}

fn parse_value<T: FromStr>(name: &'static str, s: &str) -> Result<T> {
    s.parse::<T>().map_err(|_| Error::InvalidOption {
        name,
        reason: format!("{:?} is not a number", s),
    })
}

fn positive(name: &'static str, v: f64) -> Result<()> {
    if v > 0. {
        Ok(())
    } else {
        Err(Error::InvalidOption {
            name,
            reason: format!("{} must be positive", v),
        })
    }
}

fn at_most_pixels(name: &'static str, v: f64) -> Result<()> {
    if v <= MAX_PIXELS {
        Ok(())
    } else {
        Err(Error::InvalidOption {
            name,
            reason: format!("{} px is larger than {} px once scaled", v, MAX_PIXELS),
        })
    }
}

fn not_negative(name: &'static str, v: f64) -> Result<()> {
    if v >= 0. {
        Ok(())
    } else {
        Err(Error::InvalidOption {
            name,
            reason: format!("{} must not be negative", v),
        })
    }
}
