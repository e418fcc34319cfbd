//! Board rendering.
//!
//! Turns feedback strings into a grid of coloured tiles and, from there, into
//! an RGB raster that the vision encoder consumes.

use serde::Serialize;
use std::fmt;

pub const CELL_SIZE: usize = 50;
const BORDER: usize = 1;
const BORDER_RGB: [u8; 3] = [0, 0, 0];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TileColor {
    /// Letter in the right position.
    Green,
    /// Letter elsewhere in the word.
    Orange,
    /// Letter not in the word.
    Gray,
    /// Empty or unreadable cell.
    White,
}

impl TileColor {
    #[must_use]
    pub fn from_feedback_char(c: char) -> Self {
        if c == '?' {
            Self::Gray
        } else if c.is_uppercase() {
            Self::Green
        } else if c.is_lowercase() {
            Self::Orange
        } else {
            Self::White
        }
    }

    #[must_use]
    pub fn rgb(self) -> [u8; 3] {
        match self {
            Self::Green => [0, 128, 0],
            Self::Orange => [255, 165, 0],
            Self::Gray => [211, 211, 211],
            Self::White => [255, 255, 255],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Tile {
    pub letter: char,
    pub color: TileColor,
}

impl Tile {
    const BLANK: Tile = Tile {
        letter: ' ',
        color: TileColor::White,
    };

    fn from_feedback_char(c: char) -> Self {
        let letter = c.to_uppercase().next().unwrap_or(c);
        Self {
            letter,
            color: TileColor::from_feedback_char(c),
        }
    }
}

/// Rendered board: one row of tiles per attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardImage {
    pub word_length: usize,
    pub rows: Vec<Vec<Tile>>,
}

/// Row-major RGB pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<[u8; 3]>,
}

impl Raster {
    #[must_use]
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 3] {
        self.pixels[y * self.width + x]
    }
}

impl BoardImage {
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn pixels(&self) -> Raster {
        let width = self.word_length * CELL_SIZE;
        let height = self.rows.len() * CELL_SIZE;
        let mut pixels = vec![BORDER_RGB; width * height];
        for (r, row) in self.rows.iter().enumerate() {
            // Tiles past the word length have no column in the raster.
            for (c, tile) in row.iter().take(self.word_length).enumerate() {
                let rgb = tile.color.rgb();
                for y in BORDER..CELL_SIZE - BORDER {
                    let start = (r * CELL_SIZE + y) * width + c * CELL_SIZE;
                    pixels[start + BORDER..start + CELL_SIZE - BORDER].fill(rgb);
                }
            }
        }
        Raster {
            width,
            height,
            pixels,
        }
    }
}

impl fmt::Display for BoardImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.rows {
            for tile in row {
                match tile.color {
                    TileColor::Green => write!(f, "[{}]", tile.letter)?,
                    TileColor::Orange => write!(f, "({})", tile.letter)?,
                    TileColor::Gray | TileColor::White => write!(f, " {} ", tile.letter)?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

pub trait BoardRenderer {
    fn render(&self, feedbacks: &[&str], word_length: usize) -> BoardImage;
}

/// Default renderer.
///
/// Feedback whose length differs from the word length (the invalid-length
/// marker) becomes a row of blank tiles. An empty history renders one blank row.
#[derive(Debug, Default, Clone, Copy)]
pub struct TileRenderer;

impl BoardRenderer for TileRenderer {
    fn render(&self, feedbacks: &[&str], word_length: usize) -> BoardImage {
        let blank_row = || vec![Tile::BLANK; word_length];
        let mut rows: Vec<Vec<Tile>> = feedbacks
            .iter()
            .map(|feedback| {
                if feedback.chars().count() == word_length {
                    feedback.chars().map(Tile::from_feedback_char).collect()
                } else {
                    blank_row()
                }
            })
            .collect();
        if rows.is_empty() {
            rows.push(blank_row());
        }
        BoardImage { word_length, rows }
    }
}
