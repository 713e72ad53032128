use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Cannot open {}", .0.display())]
    CannotOpen(PathBuf),
    #[error("could not read the discrete series: {0}")]
    Io(#[from] std::io::Error),
    #[error("no samples between start point {start} and end point {end}")]
    EmptySelection { start: usize, end: String },
    #[error("invalid y-axis limits {0} {1}, YMIN must be lower than YMAX")]
    InvalidRange(f64, f64),
    #[error("invalid value for {name}: {reason}")]
    InvalidOption { name: &'static str, reason: String },
    #[error("invalid color {0:?}")]
    InvalidColor(String),
    #[error("invalid marker symbol {0}, expected 0 to 12")]
    InvalidMarker(u32),
    #[error("unsupported figure format {0:?}, use svg, png, jpeg or bmp")]
    UnsupportedFormat(String),
    #[error("could not draw the figure: {0}")]
    Drawing(String),
}
