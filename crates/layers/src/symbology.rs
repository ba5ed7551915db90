use std::fmt;

use foundation::HourOfWeek;
use streaming::CellRecord;

pub type Rgba = [u8; 4];

pub const MAX_CATEGORY_COLORS: usize = 5;
pub const DEFAULT_GRADIENT_FROM: &str = "#59bfd9";
pub const DEFAULT_GRADIENT_TO: &str = "#d9ae43";
pub const DEFAULT_GRADIENT_STEPS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaletteError {
    Empty,
    TooManyCategories { given: usize, max: usize },
    InvalidHex(String),
}

impl fmt::Display for PaletteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaletteError::Empty => write!(f, "palette needs at least one color"),
            PaletteError::TooManyCategories { given, max } => {
                write!(f, "too many category colors: given={given} max={max}")
            }
            PaletteError::InvalidHex(s) => write!(f, "invalid hex color: {s:?}"),
        }
    }
}

impl std::error::Error for PaletteError {}

/// Parse `#rrggbb` (leading `#` optional) into an opaque color.
pub fn parse_hex(s: &str) -> Result<Rgba, PaletteError> {
    let hex = s.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return Err(PaletteError::InvalidHex(s.to_string()));
    }
    let channel = |i: usize| {
        u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| PaletteError::InvalidHex(s.to_string()))
    };
    Ok([channel(0)?, channel(2)?, channel(4)?, 255])
}

/// Small fixed palette keyed by category; the last color is the fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryPalette {
    colors: Vec<Rgba>,
}

impl CategoryPalette {
    pub fn new(colors: Vec<Rgba>) -> Result<Self, PaletteError> {
        if colors.is_empty() {
            return Err(PaletteError::Empty);
        }
        if colors.len() > MAX_CATEGORY_COLORS {
            return Err(PaletteError::TooManyCategories {
                given: colors.len(),
                max: MAX_CATEGORY_COLORS,
            });
        }
        Ok(Self { colors })
    }

    pub fn fallback(&self) -> Rgba {
        self.colors[self.colors.len() - 1]
    }

    pub fn color_for(&self, category: i32) -> Rgba {
        let keyed = self.colors.len() - 1;
        match usize::try_from(category) {
            Ok(i) if i < keyed => self.colors[i],
            _ => self.fallback(),
        }
    }
}

impl Default for CategoryPalette {
    fn default() -> Self {
        Self {
            colors: vec![
                [89, 191, 217, 255],
                [217, 174, 67, 255],
                [231, 76, 60, 255],
                [155, 89, 182, 255],
                [255, 128, 0, 255],
            ],
        }
    }
}

/// Gradient sampled once into a fixed number of colors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradientPalette {
    colors: Vec<Rgba>,
}

impl GradientPalette {
    pub fn from_colors(colors: Vec<Rgba>) -> Result<Self, PaletteError> {
        if colors.is_empty() {
            return Err(PaletteError::Empty);
        }
        Ok(Self { colors })
    }

    /// `steps` colors evenly spaced from `from` to `to` in CIE LCh.
    pub fn lch(from: Rgba, to: Rgba, steps: usize) -> Result<Self, PaletteError> {
        if steps == 0 {
            return Err(PaletteError::Empty);
        }
        let a = Lch::from_rgb(from);
        let b = Lch::from_rgb(to);
        let colors = (0..steps)
            .map(|i| {
                let t = if steps == 1 {
                    0.0
                } else {
                    i as f64 / (steps - 1) as f64
                };
                a.mix(b, t).to_rgb()
            })
            .collect();
        Self::from_colors(colors)
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn colors(&self) -> &[Rgba] {
        &self.colors
    }

    /// Color for a continuous value: `min(floor(value), len - 1)`, negatives map to 0.
    pub fn color_for_value(&self, value: f32) -> Rgba {
        let last = self.colors.len() - 1;
        let i = if value.is_finite() && value > 0.0 {
            (value.floor() as usize).min(last)
        } else {
            0
        };
        self.colors[i]
    }

    /// Color for a discrete key, wrapping around the palette.
    pub fn color_for_key(&self, key: i32) -> Rgba {
        let n = self.colors.len() as i32;
        self.colors[key.rem_euclid(n) as usize]
    }
}

impl Default for GradientPalette {
    fn default() -> Self {
        let from = [89, 191, 217, 255];
        let to = [217, 174, 67, 255];
        // Non-zero step count cannot fail.
        Self::lch(from, to, DEFAULT_GRADIENT_STEPS).unwrap_or(Self { colors: vec![from, to] })
    }
}

/// How a cell record is turned into a fill color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorScheme {
    ByCategory(CategoryPalette),
    BySeries(GradientPalette),
    CategoryGradient(GradientPalette),
}

impl ColorScheme {
    pub fn fill_color(&self, record: &CellRecord, time: HourOfWeek) -> Rgba {
        match self {
            ColorScheme::ByCategory(p) => p.color_for(record.category),
            ColorScheme::BySeries(p) => p.color_for_value(record.value_at(time)),
            ColorScheme::CategoryGradient(p) => p.color_for_key(record.category),
        }
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        ColorScheme::CategoryGradient(GradientPalette::default())
    }
}

const WHITE_X: f64 = 0.950_47;
const WHITE_Y: f64 = 1.0;
const WHITE_Z: f64 = 1.088_83;
const LAB_EPS: f64 = 6.0 / 29.0;

#[derive(Debug, Copy, Clone, PartialEq)]
struct Lch {
    l: f64,
    c: f64,
    h: f64,
    alpha: f64,
}

impl Lch {
    fn from_rgb(rgb: Rgba) -> Self {
        let r = srgb_to_linear(rgb[0] as f64 / 255.0);
        let g = srgb_to_linear(rgb[1] as f64 / 255.0);
        let b = srgb_to_linear(rgb[2] as f64 / 255.0);

        let x = 0.412_456_4 * r + 0.357_576_1 * g + 0.180_437_5 * b;
        let y = 0.212_672_9 * r + 0.715_152_2 * g + 0.072_175_0 * b;
        let z = 0.019_333_9 * r + 0.119_192_0 * g + 0.950_304_1 * b;

        let fx = lab_f(x / WHITE_X);
        let fy = lab_f(y / WHITE_Y);
        let fz = lab_f(z / WHITE_Z);

        let l = 116.0 * fy - 16.0;
        let a = 500.0 * (fx - fy);
        let bb = 200.0 * (fy - fz);

        Self {
            l,
            c: (a * a + bb * bb).sqrt(),
            h: bb.atan2(a).to_degrees().rem_euclid(360.0),
            alpha: rgb[3] as f64,
        }
    }

    fn mix(self, other: Lch, t: f64) -> Lch {
        // Interpolate hue along the shorter arc.
        let mut dh = other.h - self.h;
        if dh > 180.0 {
            dh -= 360.0;
        } else if dh < -180.0 {
            dh += 360.0;
        }
        Lch {
            l: self.l + (other.l - self.l) * t,
            c: self.c + (other.c - self.c) * t,
            h: (self.h + dh * t).rem_euclid(360.0),
            alpha: self.alpha + (other.alpha - self.alpha) * t,
        }
    }

    fn to_rgb(self) -> Rgba {
        let hr = self.h.to_radians();
        let a = self.c * hr.cos();
        let b = self.c * hr.sin();

        let fy = (self.l + 16.0) / 116.0;
        let fx = fy + a / 500.0;
        let fz = fy - b / 200.0;

        let x = WHITE_X * lab_f_inv(fx);
        let y = WHITE_Y * lab_f_inv(fy);
        let z = WHITE_Z * lab_f_inv(fz);

        let r = 3.240_454_2 * x - 1.537_138_5 * y - 0.498_531_4 * z;
        let g = -0.969_266_0 * x + 1.876_010_8 * y + 0.041_556_0 * z;
        let bl = 0.055_643_4 * x - 0.204_025_9 * y + 1.057_225_2 * z;

        [
            to_channel(linear_to_srgb(r)),
            to_channel(linear_to_srgb(g)),
            to_channel(linear_to_srgb(bl)),
            self.alpha.round().clamp(0.0, 255.0) as u8,
        ]
    }
}

fn lab_f(t: f64) -> f64 {
    if t > LAB_EPS * LAB_EPS * LAB_EPS {
        t.cbrt()
    } else {
        t / (3.0 * LAB_EPS * LAB_EPS) + 4.0 / 29.0
    }
}

fn lab_f_inv(t: f64) -> f64 {
    if t > LAB_EPS {
        t * t * t
    } else {
        3.0 * LAB_EPS * LAB_EPS * (t - 4.0 / 29.0)
    }
}

fn srgb_to_linear(c: f64) -> f64 {
    if c <= 0.040_45 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

fn linear_to_srgb(c: f64) -> f64 {
    if c <= 0.003_130_8 {
        12.92 * c
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

fn to_channel(c: f64) -> u8 {
    (c * 255.0).round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::{
        CategoryPalette, DEFAULT_GRADIENT_FROM, DEFAULT_GRADIENT_TO, GradientPalette,
        PaletteError, parse_hex,
    };

    fn close(a: [u8; 4], b: [u8; 4]) -> bool {
        a.iter().zip(b.iter()).all(|(x, y)| x.abs_diff(*y) <= 1)
    }

    #[test]
    fn parse_hex_accepts_with_and_without_hash() {
        assert_eq!(parse_hex("#59bfd9"), Ok([0x59, 0xbf, 0xd9, 255]));
        assert_eq!(parse_hex("D9AE43"), Ok([0xd9, 0xae, 0x43, 255]));
        assert!(matches!(parse_hex("#12345"), Err(PaletteError::InvalidHex(_))));
        assert!(parse_hex("#zzzzzz").is_err());
    }

    #[test]
    fn category_palette_falls_back_to_last_color() {
        let p = CategoryPalette::new(vec![[1, 0, 0, 255], [2, 0, 0, 255], [9, 9, 9, 255]]).unwrap();
        assert_eq!(p.color_for(0), [1, 0, 0, 255]);
        assert_eq!(p.color_for(1), [2, 0, 0, 255]);
        // Index 2 is the fallback slot, not a keyed color.
        assert_eq!(p.color_for(2), [9, 9, 9, 255]);
        assert_eq!(p.color_for(17), [9, 9, 9, 255]);
        assert_eq!(p.color_for(-1), [9, 9, 9, 255]);
    }

    #[test]
    fn category_palette_is_bounded() {
        assert_eq!(CategoryPalette::new(vec![]), Err(PaletteError::Empty));
        let too_many = vec![[0, 0, 0, 255]; 6];
        assert!(matches!(
            CategoryPalette::new(too_many),
            Err(PaletteError::TooManyCategories { given: 6, max: 5 })
        ));
    }

    #[test]
    fn lch_gradient_hits_both_endpoints() {
        let from = parse_hex(DEFAULT_GRADIENT_FROM).unwrap();
        let to = parse_hex(DEFAULT_GRADIENT_TO).unwrap();
        let p = GradientPalette::lch(from, to, 10).unwrap();
        assert_eq!(p.len(), 10);
        assert!(close(p.colors()[0], from), "{:?}", p.colors()[0]);
        assert!(close(p.colors()[9], to), "{:?}", p.colors()[9]);
    }

    #[test]
    fn lch_gradient_of_one_color_is_the_start() {
        let from = parse_hex("#ff0000").unwrap();
        let p = GradientPalette::lch(from, parse_hex("#0000ff").unwrap(), 1).unwrap();
        assert!(close(p.colors()[0], from));
        assert!(GradientPalette::lch(from, from, 0).is_err());
    }

    #[test]
    fn value_lookup_floors_and_clamps() {
        let colors: Vec<[u8; 4]> = (0..4).map(|i| [i, 0, 0, 255]).collect();
        let p = GradientPalette::from_colors(colors).unwrap();
        assert_eq!(p.color_for_value(0.0)[0], 0);
        assert_eq!(p.color_for_value(2.9)[0], 2);
        assert_eq!(p.color_for_value(3.0)[0], 3);
        assert_eq!(p.color_for_value(250.0)[0], 3);
        assert_eq!(p.color_for_value(-1.0)[0], 0);
        assert_eq!(p.color_for_value(f32::NAN)[0], 0);
    }

    #[test]
    fn key_lookup_wraps() {
        let colors: Vec<[u8; 4]> = (0..4).map(|i| [i, 0, 0, 255]).collect();
        let p = GradientPalette::from_colors(colors).unwrap();
        assert_eq!(p.color_for_key(1)[0], 1);
        assert_eq!(p.color_for_key(5)[0], 1);
        assert_eq!(p.color_for_key(-1)[0], 3);
    }
}
