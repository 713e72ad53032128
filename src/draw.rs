use crate::error::{Error, Result};
use crate::plot::{Appearance, Selection};
use crate::style::MarkerSymbol;
use crate::{partition, ylim, DiscreteSeries, Screen};
use log::{debug, info};
use plotters::coord::{cartesian::Cartesian2d, types::RangedCoordf64, Shift};
use plotters::prelude::*;
use std::path::Path;

/// The backend is chosen by the extension of the output file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Bitmap,
}

impl OutputFormat {
    pub fn from_path(fout: &Path) -> Result<OutputFormat> {
        let ext = fout
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();
        match ext.as_str() {
            "svg" => Ok(OutputFormat::Svg),
            "png" | "jpg" | "jpeg" | "bmp" => Ok(OutputFormat::Bitmap),
            _ => Err(Error::UnsupportedFormat(ext)),
        }
    }
}

/// The selected samples laid out over the screens, ready to be drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct Figure<'a> {
    pub samples: &'a [f64],
    /// index of the first selected sample, the x of samples[0]
    pub offset: usize,
    pub screens: Vec<Screen>,
    pub ylim: (f64, f64),
}

impl<'a> Figure<'a> {
    pub fn new(
        series: &'a DiscreteSeries,
        selection: &Selection,
        user_ylim: Option<(f64, f64)>,
    ) -> Result<Figure<'a>> {
        let samples = series.select(selection.start, selection.end);
        if samples.is_empty() {
            return Err(Error::EmptySelection {
                start: selection.start,
                end: selection
                    .end
                    .map_or_else(|| String::from("last"), |e| e.to_string()),
            });
        }
        let screens = partition(samples.len(), selection.num_screens, selection.num_samples);
        for (i, s) in screens.iter().enumerate() {
            debug!(
                "screen {}: samples {}..{} of the selection",
                i + 1,
                s.samples.start,
                s.samples.end
            );
        }
        let ylim = ylim(samples, user_ylim)?;
        Ok(Figure {
            samples,
            offset: selection.start,
            screens,
            ylim,
        })
    }

    /// x-axis range of a screen, half a sample of padding on both sides
    pub fn xrange(&self, screen: &Screen) -> (f64, f64) {
        let first = (self.offset + screen.span.start) as f64;
        let width = screen.span.len().max(1) as f64;
        (first - 0.5, first + width - 0.5)
    }

    /// (x, y) of the finite samples of a screen
    pub fn points(&self, screen: &Screen) -> Vec<(f64, f64)> {
        self.samples[screen.samples.clone()]
            .iter()
            .enumerate()
            .filter(|(_, y)| y.is_finite())
            .map(|(k, y)| ((self.offset + screen.samples.start + k) as f64, *y))
            .collect()
    }

    /// writes the figure, svg or bitmap depending on the extension of fout
    pub fn save(&self, appearance: &Appearance, fout: &Path) -> Result<()> {
        let format = OutputFormat::from_path(fout)?;
        let size = appearance.pixel_size()?;
        let drawn = match format {
            OutputFormat::Svg => {
                self.draw_on(SVGBackend::new(fout, size).into_drawing_area(), appearance)
            }
            OutputFormat::Bitmap => {
                self.draw_on(BitMapBackend::new(fout, size).into_drawing_area(), appearance)
            }
        };
        drawn.map_err(|e| Error::Drawing(e.to_string()))?;
        info!(
            "drew {} samples on {} screen(s) to {}",
            self.samples.len(),
            self.screens.len(),
            fout.display()
        );
        Ok(())
    }

    fn draw_on<DB>(
        &self,
        root: DrawingArea<DB, Shift>,
        a: &Appearance,
    ) -> std::result::Result<(), Box<dyn std::error::Error>>
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        root.fill(&WHITE)?;
        let panels = root.split_evenly((self.screens.len(), 1));
        let font_px = scaled(a.font_size as f64, a.scale);
        let font = (a.font_family.as_str(), font_px);
        let (ymin, ymax) = self.ylim;
        let clamp = |y: f64| y.max(ymin).min(ymax);

        for (i, (screen, panel)) in self.screens.iter().zip(panels.iter()).enumerate() {
            let last = i + 1 == self.screens.len();
            let (xmin, xmax) = self.xrange(screen);
            let mut chart = ChartBuilder::on(panel)
                .margin(scaled(10., a.scale))
                .x_label_area_size(font_px.saturating_mul(if last { 4 } else { 2 }))
                .y_label_area_size(font_px.saturating_mul(4))
                .build_cartesian_2d(xmin..xmax, ymin..ymax)?;

            let mut mesh = chart.configure_mesh();
            mesh.label_style(font)
                .axis_desc_style(font)
                .light_line_style(&TRANSPARENT)
                .bold_line_style(RGBColor(220, 220, 220).stroke_width(1))
                .set_all_tick_mark_size(scaled(3., a.scale));
            if !a.grid {
                mesh.disable_mesh();
            }
            if last {
                mesh.x_desc(a.xname.as_str());
            }
            mesh.draw()?;

            if ymin < 0. && 0. < ymax {
                chart.draw_series(LineSeries::new(
                    vec![(xmin, 0.), (xmax, 0.)],
                    RGBColor(150, 150, 150).stroke_width(1),
                ))?;
            }

            let points = self.points(screen);
            if a.line_width > 0. {
                let half = a.line_width / 2.;
                chart.draw_series(points.iter().map(|&(x, y)| {
                    Rectangle::new(
                        [(x - half, clamp(0.)), (x + half, clamp(y))],
                        a.line_color.filled(),
                    )
                }))?;
            }

            let inside: Vec<(f64, f64)> = points
                .into_iter()
                .filter(|&(_, y)| ymin <= y && y <= ymax)
                .collect();
            draw_markers(&mut chart, &inside, a)?;
        }
        root.present()?;
        Ok(())
    }
}

fn draw_markers<DB>(
    chart: &mut ChartContext<DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
    points: &[(f64, f64)],
    a: &Appearance,
) -> std::result::Result<(), Box<dyn std::error::Error>>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let size = scaled(a.marker_size, a.scale);
    let stroke = scaled(a.marker_line_width, a.scale) as u32;
    let symbol = a.marker_symbol;
    if symbol == MarkerSymbol::None || size == 0 {
        return Ok(());
    }
    let fill = a.marker_color.filled();
    // open symbols take the marker color for their outline
    let line = if symbol.is_open() {
        Some(a.marker_color.stroke_width(stroke.max(1)))
    } else if stroke > 0 {
        Some(a.marker_line_color.stroke_width(stroke))
    } else {
        None
    };
    let r = (size / 2).max(1);

    match symbol {
        MarkerSymbol::Circle | MarkerSymbol::CircleOpen => {
            if !symbol.is_open() {
                chart.draw_series(points.iter().map(|&p| Circle::new(p, r, fill)))?;
            }
            if let Some(line) = line {
                chart.draw_series(points.iter().map(|&p| Circle::new(p, r, line)))?;
            }
        }
        MarkerSymbol::Cross => {
            let style = a.marker_color.stroke_width(stroke.max(1));
            chart.draw_series(points.iter().map(|&p| Cross::new(p, r, style)))?;
        }
        MarkerSymbol::Plus => {
            let style = a.marker_color.stroke_width(stroke.max(1));
            chart.draw_series(points.iter().map(|&p| {
                EmptyElement::at(p)
                    + PathElement::new(vec![(-r, 0), (r, 0)], style)
                    + PathElement::new(vec![(0, -r), (0, r)], style)
            }))?;
        }
        _ => {
            let outline = symbol.outline(size).unwrap_or_default();
            if !symbol.is_open() {
                chart.draw_series(
                    points
                        .iter()
                        .map(|&p| EmptyElement::at(p) + Polygon::new(outline.clone(), fill)),
                )?;
            }
            if let Some(line) = line {
                let mut closed = outline.clone();
                if let Some(&first) = outline.first() {
                    closed.push(first);
                }
                chart.draw_series(
                    points
                        .iter()
                        .map(|&p| EmptyElement::at(p) + PathElement::new(closed.clone(), line)),
                )?;
            }
        }
    }
    Ok(())
}

/// pixel size of a length given at scale 1
fn scaled(v: f64, scale: f64) -> i32 {
    (v * scale).round().max(0.) as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use plotters::style::{FontDesc, FontFamily, FontStyle};
    use std::path::PathBuf;

    fn selection(start: usize, end: Option<usize>, n: Option<usize>, i: usize) -> Selection {
        Selection {
            start,
            end,
            num_samples: n,
            num_screens: i,
        }
    }

    #[test]
    fn format_from_extension() {
        let f = |p: &str| OutputFormat::from_path(&PathBuf::from(p));
        assert_eq!(f("out.svg").unwrap(), OutputFormat::Svg);
        assert_eq!(f("out.PNG").unwrap(), OutputFormat::Bitmap);
        assert_eq!(f("dir/out.jpeg").unwrap(), OutputFormat::Bitmap);
        assert!(matches!(f("out.pdf"), Err(Error::UnsupportedFormat(e)) if e == "pdf"));
        assert!(matches!(f("out"), Err(Error::UnsupportedFormat(_))));
    }

    #[test]
    fn figure_offsets_x_by_start() {
        let series = DiscreteSeries::new(vec![0., 1., -4., 2., 3.]);
        let fig = Figure::new(&series, &selection(1, Some(3), None, 1), None).unwrap();
        assert_eq!(fig.samples, &[1., -4., 2.]);
        assert_eq!(fig.ylim, (-4., 4.));
        assert_eq!(
            fig.points(&fig.screens[0]),
            vec![(1., 1.), (2., -4.), (3., 2.)]
        );
        assert_eq!(fig.xrange(&fig.screens[0]), (0.5, 3.5));
    }

    #[test]
    fn figure_over_screens() {
        let series = DiscreteSeries::new((0..10).map(|v| v as f64).collect());
        let fig = Figure::new(&series, &selection(2, None, None, 3), None).unwrap();
        let ranges: Vec<_> = fig.screens.iter().map(|s| s.samples.clone()).collect();
        assert_eq!(ranges, vec![0..2, 2..4, 4..8]);
        assert_eq!(fig.points(&fig.screens[1]), vec![(4., 4.), (5., 5.)]);
        assert_eq!(fig.xrange(&fig.screens[2]), (5.5, 9.5));
    }

    #[test]
    fn fixed_screens_keep_their_width() {
        let series = DiscreteSeries::new(vec![1.; 5]);
        let fig = Figure::new(&series, &selection(0, None, Some(4), 2), None).unwrap();
        assert_eq!(fig.points(&fig.screens[1]), vec![(4., 1.)]);
        assert_eq!(fig.xrange(&fig.screens[1]), (3.5, 7.5));
    }

    #[test]
    fn nan_samples_are_not_drawn() {
        let series = DiscreteSeries::new(vec![1., f64::NAN, -2.]);
        let fig = Figure::new(&series, &selection(0, None, None, 1), None).unwrap();
        assert_eq!(fig.points(&fig.screens[0]), vec![(0., 1.), (2., -2.)]);
    }

    #[test]
    fn empty_selection_is_an_error() {
        let series = DiscreteSeries::new(vec![1., 2.]);
        let err = Figure::new(&series, &selection(5, None, None, 1), None).unwrap_err();
        assert!(matches!(err, Error::EmptySelection { start: 5, .. }));
        assert!(Figure::new(&DiscreteSeries::default(), &selection(0, None, None, 1), None).is_err());
    }

    #[test]
    fn user_ylim_is_checked() {
        let series = DiscreteSeries::new(vec![1., 2.]);
        let sel = selection(0, None, None, 1);
        assert_eq!(Figure::new(&series, &sel, Some((0., 3.))).unwrap().ylim, (0., 3.));
        assert!(Figure::new(&series, &sel, Some((3., 0.))).is_err());
    }

    #[test]
    fn scaled_sizes() {
        assert_eq!(scaled(700., 1.), 700);
        assert_eq!(scaled(700., 1.5), 1050);
        assert_eq!(scaled(0.02, 1.), 0);
    }

    /// plotters lays out labels with a system font, without one nothing can be drawn
    fn fonts_available() -> bool {
        FontDesc::new(FontFamily::SansSerif, 12., FontStyle::Normal)
            .box_size("0")
            .is_ok()
    }

    fn temp_figure(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("gseries-draw-{}-{}", std::process::id(), name))
    }

    #[test]
    fn draws_svg() {
        if !fonts_available() {
            eprintln!("no sans-serif font, skipping");
            return;
        }
        let series = DiscreteSeries::new((0..64).map(|v| (v as f64 / 5.).sin()).collect());
        let fig = Figure::new(&series, &selection(0, None, None, 2), None).unwrap();
        let fout = temp_figure("svg.svg");
        let appearance = Appearance {
            grid: true,
            marker_symbol: MarkerSymbol::DiamondOpen,
            ..Appearance::default()
        };
        fig.save(&appearance, &fout).unwrap();
        let svg = std::fs::read_to_string(&fout).unwrap();
        std::fs::remove_file(&fout).unwrap();
        assert!(svg.contains("<svg"));
    }

    #[test]
    fn draws_every_marker_to_bitmap() {
        if !fonts_available() {
            eprintln!("no sans-serif font, skipping");
            return;
        }
        let mut samples: Vec<f64> = (0..40).map(|v| (v as f64 / 4.).cos()).collect();
        samples[7] = f64::NAN;
        samples[11] = 5.;
        let series = DiscreteSeries::new(samples);
        let fig = Figure::new(&series, &selection(3, None, Some(15), 3), Some((-1.5, 1.5))).unwrap();
        for i in 0..=12 {
            let appearance = Appearance {
                grid: i % 2 == 0,
                marker_symbol: MarkerSymbol::from_index(i).unwrap(),
                marker_line_width: 1.,
                width: 300,
                height: 240,
                ..Appearance::default()
            };
            let fout = temp_figure(&format!("marker-{}.png", i));
            fig.save(&appearance, &fout)
                .unwrap_or_else(|e| panic!("marker {}: {}", i, e));
            let png = std::fs::read(&fout).unwrap();
            std::fs::remove_file(&fout).unwrap();
            assert_eq!(&png[1..4], b"PNG", "marker {}", i);
        }
    }

    #[test]
    fn draws_huge_samples() {
        if !fonts_available() {
            eprintln!("no sans-serif font, skipping");
            return;
        }
        let series = DiscreteSeries::new(vec![1e308, -2., 3.]);
        let fig = Figure::new(&series, &selection(0, None, None, 1), None).unwrap();
        let fout = temp_figure("huge.png");
        fig.save(&Appearance::default(), &fout).unwrap();
        std::fs::remove_file(&fout).unwrap();
    }

    #[test]
    fn oversized_figure_is_refused_before_drawing() {
        let series = DiscreteSeries::new(vec![1., -1.]);
        let fig = Figure::new(&series, &selection(0, None, None, 1), None).unwrap();
        let fout = temp_figure("oversized.png");
        for appearance in &[
            Appearance {
                font_size: 1_000_000_000,
                ..Appearance::default()
            },
            Appearance {
                scale: 100_000.,
                ..Appearance::default()
            },
        ] {
            assert!(matches!(
                fig.save(appearance, &fout),
                Err(Error::InvalidOption { .. })
            ));
        }
        assert!(!fout.exists());
    }
}
