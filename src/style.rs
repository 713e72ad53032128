//! Colors and marker symbols accepted on the command line.
use crate::error::{Error, Result};
use plotters::style::RGBColor;

/// CSS color names, the subset commonly used in the toolkit scripts.
const NAMED_COLORS: &[(&str, (u8, u8, u8))] = &[
    ("black", (0, 0, 0)),
    ("white", (255, 255, 255)),
    ("gray", (128, 128, 128)),
    ("grey", (128, 128, 128)),
    ("darkgray", (169, 169, 169)),
    ("darkgrey", (169, 169, 169)),
    ("lightgray", (211, 211, 211)),
    ("lightgrey", (211, 211, 211)),
    ("silver", (192, 192, 192)),
    ("red", (255, 0, 0)),
    ("darkred", (139, 0, 0)),
    ("crimson", (220, 20, 60)),
    ("orange", (255, 165, 0)),
    ("darkorange", (255, 140, 0)),
    ("gold", (255, 215, 0)),
    ("yellow", (255, 255, 0)),
    ("green", (0, 128, 0)),
    ("darkgreen", (0, 100, 0)),
    ("lime", (0, 255, 0)),
    ("limegreen", (50, 205, 50)),
    ("olive", (128, 128, 0)),
    ("teal", (0, 128, 128)),
    ("cyan", (0, 255, 255)),
    ("aqua", (0, 255, 255)),
    ("blue", (0, 0, 255)),
    ("darkblue", (0, 0, 139)),
    ("navy", (0, 0, 128)),
    ("midnightblue", (25, 25, 112)),
    ("royalblue", (65, 105, 225)),
    ("steelblue", (70, 130, 180)),
    ("skyblue", (135, 206, 235)),
    ("lightblue", (173, 216, 230)),
    ("purple", (128, 0, 128)),
    ("magenta", (255, 0, 255)),
    ("fuchsia", (255, 0, 255)),
    ("violet", (238, 130, 238)),
    ("pink", (255, 192, 203)),
    ("brown", (165, 42, 42)),
    ("maroon", (128, 0, 0)),
];

/// Parses `#rgb`, `#rrggbb`, `rgb(r, g, b)` or a CSS color name.
pub fn parse_color(s: &str) -> Result<RGBColor> {
    let invalid = || Error::InvalidColor(s.to_string());
    let lower = s.trim().to_ascii_lowercase();
    if let Some(hex) = lower.strip_prefix('#') {
        let channel = |h: &str| u8::from_str_radix(h, 16).map_err(|_| invalid());
        return match hex.len() {
            3 => {
                let mut c = [0u8; 3];
                for (i, h) in hex.chars().enumerate() {
                    let v = h.to_digit(16).ok_or_else(invalid)? as u8;
                    c[i] = v * 17;
                }
                Ok(RGBColor(c[0], c[1], c[2]))
            }
            6 => Ok(RGBColor(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            _ => Err(invalid()),
        };
    }
    if let Some(args) = lower
        .strip_prefix("rgb(")
        .and_then(|rest| rest.strip_suffix(')'))
    {
        let channels: Vec<u8> = args
            .split(',')
            .map(|v| v.trim().parse::<u8>())
            .collect::<std::result::Result<_, _>>()
            .map_err(|_| invalid())?;
        return match channels[..] {
            [r, g, b] => Ok(RGBColor(r, g, b)),
            _ => Err(invalid()),
        };
    }
    NAMED_COLORS
        .iter()
        .find(|(name, _)| *name == lower)
        .map(|(_, (r, g, b))| RGBColor(*r, *g, *b))
        .ok_or_else(invalid)
}

/// Marker shape drawn on top of every bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerSymbol {
    None,
    Circle,
    CircleOpen,
    Square,
    SquareOpen,
    Diamond,
    DiamondOpen,
    Cross,
    Plus,
    TriangleUp,
    TriangleUpOpen,
    TriangleDown,
    TriangleDownOpen,
}

impl MarkerSymbol {
    pub fn from_index(i: u32) -> Result<MarkerSymbol> {
        let symbol = match i {
            0 => MarkerSymbol::None,
            1 => MarkerSymbol::Circle,
            2 => MarkerSymbol::CircleOpen,
            3 => MarkerSymbol::Square,
            4 => MarkerSymbol::SquareOpen,
            5 => MarkerSymbol::Diamond,
            6 => MarkerSymbol::DiamondOpen,
            7 => MarkerSymbol::Cross,
            8 => MarkerSymbol::Plus,
            9 => MarkerSymbol::TriangleUp,
            10 => MarkerSymbol::TriangleUpOpen,
            11 => MarkerSymbol::TriangleDown,
            12 => MarkerSymbol::TriangleDownOpen,
            _ => return Err(Error::InvalidMarker(i)),
        };
        Ok(symbol)
    }

    /// open symbols are drawn with the marker line only
    pub fn is_open(self) -> bool {
        matches!(
            self,
            MarkerSymbol::CircleOpen
                | MarkerSymbol::SquareOpen
                | MarkerSymbol::DiamondOpen
                | MarkerSymbol::TriangleUpOpen
                | MarkerSymbol::TriangleDownOpen
        )
    }

    /// Outline of the symbol as pixel offsets around the sample,
    /// `None` for the circle and line-only symbols.
    pub fn outline(self, size: i32) -> Option<Vec<(i32, i32)>> {
        let r = (size / 2).max(1);
        match self {
            MarkerSymbol::Square | MarkerSymbol::SquareOpen => {
                Some(vec![(-r, -r), (r, -r), (r, r), (-r, r)])
            }
            MarkerSymbol::Diamond | MarkerSymbol::DiamondOpen => {
                Some(vec![(0, -r), (r, 0), (0, r), (-r, 0)])
            }
            // pixel rows grow downwards
            MarkerSymbol::TriangleUp | MarkerSymbol::TriangleUpOpen => {
                Some(vec![(0, -r), (r, r), (-r, r)])
            }
            MarkerSymbol::TriangleDown | MarkerSymbol::TriangleDownOpen => {
                Some(vec![(-r, -r), (r, -r), (0, r)])
            }
            _ => None,
        }
    }
}
