use log::{info, warn};
use std::fs::File;
use std::io::{BufReader, Read};
use std::ops::Range;
use std::path::Path;
pub mod draw;
pub mod error;
pub mod plot;
pub mod style;

pub use error::{Error, Result};

pub const VERSION: Option<&'static str> = option_env!("CARGO_PKG_VERSION");

const SAMPLE_BYTES: usize = std::mem::size_of::<f64>();

/// The main struct for the discrete series,
/// a flat sequence of samples addressed by their index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiscreteSeries {
    pub samples: Vec<f64>,
}

impl DiscreteSeries {
    pub fn new(samples: Vec<f64>) -> DiscreteSeries {
        DiscreteSeries { samples }
    }

    /// Init a DiscreteSeries from a file of native-endian doubles.
    pub fn read_binary(fin: &Path) -> Result<DiscreteSeries> {
        if !fin.exists() {
            return Err(Error::CannotOpen(fin.to_path_buf()));
        }
        let file = File::open(fin).map_err(|_| Error::CannotOpen(fin.to_path_buf()))?;
        let series = DiscreteSeries::from_reader(BufReader::new(file))?;
        info!("read {} samples from {}", series.len(), fin.display());
        Ok(series)
    }

    pub fn read_stdin() -> Result<DiscreteSeries> {
        let stdin = std::io::stdin();
        let series = DiscreteSeries::from_reader(stdin.lock())?;
        info!("read {} samples from standard input", series.len());
        Ok(series)
    }

    /// reads the whole stream, a trailing partial double is dropped
    pub fn from_reader<R: Read>(mut reader: R) -> Result<DiscreteSeries> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        let chunks = bytes.chunks_exact(SAMPLE_BYTES);
        if !chunks.remainder().is_empty() {
            warn!(
                "ignoring {} trailing byte(s) that do not make a whole double",
                chunks.remainder().len()
            );
        }
        let samples = chunks
            .map(|c| {
                let mut b = [0u8; SAMPLE_BYTES];
                b.copy_from_slice(c);
                f64::from_ne_bytes(b)
            })
            .collect();
        Ok(DiscreteSeries { samples })
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Samples from `start` to `end` inclusive, `end` defaults to the last sample.
    /// Out of range bounds are clamped, so the result may be empty.
    pub fn select(&self, start: usize, end: Option<usize>) -> &[f64] {
        let len = self.samples.len();
        let stop = end.map_or(len, |e| e.saturating_add(1).min(len));
        if start >= stop {
            return &[];
        }
        &self.samples[start..stop]
    }
}

impl std::fmt::Display for DiscreteSeries {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "index, sample")?;
        for (i, v) in self.samples.iter().enumerate() {
            writeln!(f, "{},{}", i, v)?
        }
        Ok(())
    }
}

/// One row of the figure: the samples it draws and the index span it covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screen {
    /// indices into the selection, clamped to its length
    pub samples: Range<usize>,
    /// nominal indices, may run past the selection for fixed-size screens
    pub span: Range<usize>,
}

/// Splits `len` selected samples into `num_screens` screens.
/// Without `num_samples` the last screen takes the remainder of `len / num_screens`,
/// with it every screen covers exactly `num_samples` indices.
pub fn partition(len: usize, num_screens: usize, num_samples: Option<usize>) -> Vec<Screen> {
    let n = num_samples.unwrap_or(len / num_screens.max(1));
    let mut screens = Vec::with_capacity(num_screens);
    let mut s = 0;
    for i in 0..num_screens {
        let last = i + 1 == num_screens;
        let e = if num_samples.is_none() && last { len } else { s + n };
        screens.push(Screen {
            samples: s.min(len)..e.min(len),
            span: s..e,
        });
        s = e;
    }
    screens
}

/// Largest default half range; the axis span `2 * YLIM_MAX` stays finite.
pub const YLIM_MAX: f64 = f64::MAX / 4.;

/// max of the absolute values, ignoring NAN and infinite samples
pub fn abs_max(y: &[f64]) -> f64 {
    y.iter()
        .filter(|v| v.is_finite())
        .fold(0f64, |m, v| m.max(v.abs()))
}

/// Accepts y-axis limits that are finite, ordered, and with a finite span.
pub fn check_range(ymin: f64, ymax: f64) -> Result<(f64, f64)> {
    if ymin.is_finite() && ymax.is_finite() && ymin < ymax && (ymax - ymin).is_finite() {
        Ok((ymin, ymax))
    } else {
        Err(Error::InvalidRange(ymin, ymax))
    }
}

/// The user y-axis limits or the symmetric range around zero
/// that contains every sample, clamped to `YLIM_MAX`.
pub fn ylim(y: &[f64], user: Option<(f64, f64)>) -> Result<(f64, f64)> {
    match user {
        Some((ymin, ymax)) => check_range(ymin, ymax),
        None => {
            let ymax = abs_max(y).min(YLIM_MAX);
            if ymax > 0. {
                Ok((-ymax, ymax))
            } else {
                Ok((-1., 1.))
            }
        }
    }
}
