//! Palette, day/night textures and texel blending

use std::collections::HashMap;
use std::f64::consts::PI;
use std::path::{Path, PathBuf};

use crate::math::Vec3;

#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    #[error("Failed to read texture {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Texture {0} is empty")]
    Empty(String),

    #[error("Texture {name} row {row} has width {found}, expected {expected}")]
    RaggedRow {
        name: String,
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Texture {name} has character {ch:?} at row {row}, column {column} which is not in the palette")]
    UnknownCharacter {
        name: String,
        ch: char,
        row: usize,
        column: usize,
    },

    #[error("Day texture is {day_width}x{day_height} but night texture is {night_width}x{night_height}")]
    DimensionMismatch {
        day_width: usize,
        day_height: usize,
        night_width: usize,
        night_height: usize,
    },

    #[error("Palette is empty")]
    EmptyPalette,
}

/// Characters ordered by brightness, darkest first
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    chars: Vec<char>,
    ranks: HashMap<char, usize>,
}

impl Default for Palette {
    fn default() -> Self {
        Self::from_chars(crate::DEFAULT_PALETTE.chars().collect())
    }
}

impl Palette {
    pub fn new(ramp: &str) -> Result<Self, TextureError> {
        let chars: Vec<char> = ramp.chars().collect();
        if chars.is_empty() {
            return Err(TextureError::EmptyPalette);
        }
        Ok(Self::from_chars(chars))
    }

    fn from_chars(chars: Vec<char>) -> Self {
        let mut ranks = HashMap::with_capacity(chars.len());
        for (rank, &c) in chars.iter().enumerate() {
            // first occurrence wins
            ranks.entry(c).or_insert(rank);
        }
        Self { chars, ranks }
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn rank(&self, c: char) -> Option<usize> {
        self.ranks.get(&c).copied()
    }

    /// Character for `rank`, clamped into the palette
    pub fn char_at(&self, rank: usize) -> char {
        self.chars[rank.min(self.chars.len() - 1)]
    }
}

/// A rectangular character grid validated against a palette.
///
/// Cells are stored as palette ranks; the character lookup happens once at load time.
#[derive(Debug, Clone, PartialEq)]
pub struct Texture {
    width: usize,
    height: usize,
    ranks: Vec<usize>,
}

impl Texture {
    /// Parse newline-separated rows. Every row must have the same width and every
    /// character must be in `palette`.
    pub fn parse(name: &str, text: &str, palette: &Palette) -> Result<Self, TextureError> {
        let rows: Vec<&str> = text.lines().collect();
        let width = rows.first().map(|r| r.chars().count()).unwrap_or(0);
        if rows.is_empty() || width == 0 {
            return Err(TextureError::Empty(name.to_string()));
        }

        let mut ranks = Vec::with_capacity(width * rows.len());
        for (row, line) in rows.iter().enumerate() {
            let found = line.chars().count();
            if found != width {
                return Err(TextureError::RaggedRow {
                    name: name.to_string(),
                    row,
                    expected: width,
                    found,
                });
            }
            for (column, ch) in line.chars().enumerate() {
                let rank = palette.rank(ch).ok_or_else(|| TextureError::UnknownCharacter {
                    name: name.to_string(),
                    ch,
                    row,
                    column,
                })?;
                ranks.push(rank);
            }
        }

        Ok(Self {
            width,
            height: rows.len(),
            ranks,
        })
    }

    pub fn from_file<P: AsRef<Path>>(path: P, palette: &Palette) -> Result<Self, TextureError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| TextureError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&path.display().to_string(), &text, palette)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn rank_at(&self, x: usize, y: usize) -> usize {
        self.ranks[y * self.width + x]
    }
}

/// Day and night textures of identical size sharing one palette
#[derive(Debug, Clone, PartialEq)]
pub struct TexturePair {
    pub palette: Palette,
    pub day: Texture,
    pub night: Texture,
}

impl TexturePair {
    pub fn new(palette: Palette, day: Texture, night: Texture) -> Result<Self, TextureError> {
        if day.width != night.width || day.height != night.height {
            return Err(TextureError::DimensionMismatch {
                day_width: day.width,
                day_height: day.height,
                night_width: night.width,
                night_height: night.height,
            });
        }
        Ok(Self { palette, day, night })
    }

    pub fn load<P: AsRef<Path>>(day: P, night: P, palette: Palette) -> Result<Self, TextureError> {
        let day_texture = Texture::from_file(&day, &palette)?;
        let night_texture = Texture::from_file(&night, &palette)?;
        let pair = Self::new(palette, day_texture, night_texture)?;
        tracing::info!(
            width = pair.width(),
            height = pair.height(),
            day = %day.as_ref().display(),
            night = %night.as_ref().display(),
            "Loaded textures"
        );
        Ok(pair)
    }

    pub fn width(&self) -> usize {
        self.day.width
    }

    pub fn height(&self) -> usize {
        self.day.height
    }

    /// Map fractional coordinates to a clamped `(column, row)` texel
    pub fn texel(&self, phi: f64, theta: f64) -> (usize, usize) {
        let max_x = self.width() - 1;
        let max_y = self.height() - 1;
        // `as` truncates toward zero and saturates negatives to 0
        let x = ((theta * max_x as f64) as usize).min(max_x);
        let y = ((phi * max_y as f64) as usize).min(max_y);
        (x, y)
    }

    /// Blend day and night at `(phi, theta)` by `luminance` and return the character
    pub fn shade(&self, phi: f64, theta: f64, luminance: f64) -> char {
        let (x, y) = self.texel(phi, theta);
        let rank = blend_rank(
            self.day.rank_at(x, y),
            self.night.rank_at(x, y),
            luminance,
            self.palette.len(),
        );
        self.palette.char_at(rank)
    }
}

/// Fractional texture coordinates `(phi, theta)` of an untilted surface point.
///
/// `phi` runs from the north pole (0) to the south pole (1). `theta` is
/// `atan2(y, x) / PI + 0.5` shifted by the spin angle and wrapped into `[0, 1)`;
/// increasing `angle_offset` scrolls the texture towards positive longitude.
pub fn texture_coordinates(point: &Vec3, radius: f64, angle_offset: f64) -> (f64, f64) {
    let phi = -point.z / (2.0 * radius) + 0.5;
    let mut theta = point.y.atan2(point.x) / PI + 0.5 + angle_offset / (2.0 * PI);
    theta -= theta.floor();
    (phi, theta)
}

/// `trunc((1 - l) * night + l * day)` clamped into a palette of `palette_len`
pub fn blend_rank(day: usize, night: usize, luminance: f64, palette_len: usize) -> usize {
    let blended = (1.0 - luminance) * night as f64 + luminance * day as f64;
    (blended as usize).min(palette_len.saturating_sub(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::TAU;

    fn palette() -> Palette {
        Palette::default()
    }

    #[test]
    fn test_palette_reverse_lookup() {
        let p = palette();
        assert_eq!(p.len(), 18);
        assert_eq!(p.rank(' '), Some(0));
        assert_eq!(p.rank('@'), Some(17));
        assert_eq!(p.rank('Z'), None);
        assert_eq!(p.char_at(17), '@');
        assert_eq!(p.char_at(99), '@');
    }

    #[test]
    fn test_palette_duplicates_first_wins() {
        let p = Palette::new(".a.b").unwrap();
        assert_eq!(p.rank('.'), Some(0));
        assert_eq!(p.rank('b'), Some(3));
    }

    #[test]
    fn test_empty_palette() {
        assert!(matches!(Palette::new(""), Err(TextureError::EmptyPalette)));
    }

    #[test]
    fn test_parse_texture() {
        let t = Texture::parse("t", "@@.\n:: \n", &palette()).unwrap();
        assert_eq!(t.width(), 3);
        assert_eq!(t.height(), 2);
        assert_eq!(t.rank_at(0, 0), 17);
        assert_eq!(t.rank_at(2, 0), 1);
        assert_eq!(t.rank_at(2, 1), 0);
    }

    #[test]
    fn test_parse_crlf() {
        let t = Texture::parse("t", "@.\r\n.@\r\n", &palette()).unwrap();
        assert_eq!(t.width(), 2);
        assert_eq!(t.height(), 2);
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert!(matches!(
            Texture::parse("t", "", &palette()),
            Err(TextureError::Empty(_))
        ));
        assert!(matches!(
            Texture::parse("t", "\n\n", &palette()),
            Err(TextureError::Empty(_))
        ));
    }

    #[test]
    fn test_parse_rejects_ragged_rows() {
        let err = Texture::parse("t", "@@@\n@@\n", &palette()).unwrap_err();
        assert!(matches!(
            err,
            TextureError::RaggedRow { row: 1, expected: 3, found: 2, .. }
        ));
    }

    #[test]
    fn test_parse_rejects_unknown_character() {
        let err = Texture::parse("t", "@@\n@Z\n", &palette()).unwrap_err();
        assert!(matches!(
            err,
            TextureError::UnknownCharacter { ch: 'Z', row: 1, column: 1, .. }
        ));
    }

    #[test]
    fn test_pair_rejects_width_mismatch() {
        let p = palette();
        let day = Texture::parse("day", "@@@\n@@@", &p).unwrap();
        let night = Texture::parse("night", "..\n..", &p).unwrap();
        let err = TexturePair::new(p, day, night).unwrap_err();
        assert!(matches!(
            err,
            TextureError::DimensionMismatch { day_width: 3, night_width: 2, .. }
        ));
    }

    #[test]
    fn test_pair_rejects_height_mismatch() {
        let p = palette();
        let day = Texture::parse("day", "@@\n@@\n@@", &p).unwrap();
        let night = Texture::parse("night", "..\n..", &p).unwrap();
        assert!(TexturePair::new(p, day, night).is_err());
    }

    #[test]
    fn test_blend_rank_truncates() {
        assert_eq!(blend_rank(10, 0, 0.5, 18), 5);
        assert_eq!(blend_rank(11, 0, 0.5, 18), 5);
        assert_eq!(blend_rank(10, 4, 1.0, 18), 10);
        assert_eq!(blend_rank(10, 4, 0.0, 18), 4);
        assert_eq!(blend_rank(30, 30, 1.0, 18), 17);
    }

    #[test]
    fn test_theta_periodic() {
        let p = Vec3::new(1.0, 1.0, 0.0).normalize();
        let (phi0, theta0) = texture_coordinates(&p, 1.0, 0.0);
        let (phi1, theta1) = texture_coordinates(&p, 1.0, TAU);
        assert_eq!(phi0, phi1);
        assert!((theta0 - theta1).abs() < 1e-12);
        assert!((theta0 - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_theta_wrapped_into_unit_interval() {
        for i in 0..32 {
            let angle = i as f64 * 0.37;
            let p = Vec3::new(angle.cos(), angle.sin(), 0.1);
            let (_, theta) = texture_coordinates(&p, 1.0, angle * 3.0);
            assert!((0.0..1.0).contains(&theta));
        }
    }

    #[test]
    fn test_phi_poles() {
        let (north, _) = texture_coordinates(&Vec3::new(0.0, 0.0, 2.0), 2.0, 0.0);
        let (south, _) = texture_coordinates(&Vec3::new(0.0, 0.0, -2.0), 2.0, 0.0);
        assert_eq!(north, 0.0);
        assert_eq!(south, 1.0);
    }

    #[test]
    fn test_texel_clamps() {
        let p = palette();
        let day = Texture::parse("day", "@@@@\n@@@@\n@@@@", &p).unwrap();
        let pair = TexturePair::new(p, day.clone(), day).unwrap();
        assert_eq!(pair.texel(0.0, 0.0), (0, 0));
        assert_eq!(pair.texel(1.0, 0.999), (2, 2));
        assert_eq!(pair.texel(1.2, 1.5), (3, 2));
        assert_eq!(pair.texel(-0.2, -0.1), (0, 0));
    }

    #[test]
    fn test_shade_blends_day_and_night() {
        let p = palette();
        let day = Texture::parse("day", "@@\n@@", &p).unwrap();
        let night = Texture::parse("night", "..\n..", &p).unwrap();
        let pair = TexturePair::new(p, day, night).unwrap();
        assert_eq!(pair.shade(0.5, 0.5, 1.0), '@');
        assert_eq!(pair.shade(0.5, 0.5, 0.0), '.');
        // trunc(0.5 * 1 + 0.5 * 17) = 9
        assert_eq!(pair.shade(0.5, 0.5, 0.5), 'g');
    }
}
