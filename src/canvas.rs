//! Output grid: viewport geometry and the character canvas

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::math::Vec3;

/// Pixel size of the output and the pixel size of one character cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Viewport {
    pub width_px: usize,
    pub height_px: usize,
    pub cell_width: usize,
    pub cell_height: usize,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width_px: 800,
            height_px: 608,
            cell_width: 4,
            cell_height: 8,
        }
    }
}

impl Viewport {
    pub fn new(width_px: usize, height_px: usize) -> Self {
        Self {
            width_px,
            height_px,
            ..Self::default()
        }
    }

    /// Viewport whose cell grid is exactly `columns` x `rows`
    pub fn from_cells(columns: usize, rows: usize) -> Self {
        let cell = Self::default();
        Self::new(columns * cell.cell_width, rows * cell.cell_height)
    }

    /// Whole cells across; a zero cell width holds no cells
    pub fn columns(&self) -> usize {
        self.width_px.checked_div(self.cell_width).unwrap_or(0)
    }

    pub fn rows(&self) -> usize {
        self.height_px.checked_div(self.cell_height).unwrap_or(0)
    }

    pub fn half_columns(&self) -> f64 {
        self.width_px as f64 / self.cell_width as f64 / 2.0
    }

    pub fn half_rows(&self) -> f64 {
        self.height_px as f64 / self.cell_height as f64 / 2.0
    }

    /// Horizontal half-width measured in row-height units. Used as the vertical
    /// denominator so a cell keeps its on-screen aspect.
    pub fn vertical_scale(&self) -> f64 {
        self.width_px as f64 / self.cell_height as f64 / 2.0
    }

    /// Camera-local ray direction through the centre of cell `(xi, yi)`
    pub fn ray_direction(&self, xi: usize, yi: usize) -> Vec3 {
        let half_columns = self.half_columns();
        Vec3::new(
            -((xi as f64 - half_columns) + 0.5) / half_columns * 1.2,
            ((yi as f64 - self.half_rows()) + 0.5) / self.vertical_scale(),
            -1.0,
        )
    }
}

/// A grid of characters, one per output cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    columns: usize,
    rows: usize,
    background: char,
    cells: Vec<char>,
}

impl Canvas {
    pub fn new(columns: usize, rows: usize, background: char) -> Self {
        Self {
            columns,
            rows,
            background,
            cells: vec![background; columns * rows],
        }
    }

    pub fn for_viewport(viewport: &Viewport, background: char) -> Self {
        Self::new(viewport.columns(), viewport.rows(), background)
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn background(&self) -> char {
        self.background
    }

    pub fn get(&self, x: usize, y: usize) -> Option<char> {
        if x >= self.columns || y >= self.rows {
            return None;
        }
        Some(self.cells[y * self.columns + x])
    }

    /// Write a cell; out-of-range coordinates are ignored.
    pub fn draw_point(&mut self, x: usize, y: usize, c: char) {
        if x >= self.columns || y >= self.rows {
            return;
        }
        self.cells[y * self.columns + x] = c;
    }

    pub fn clear(&mut self) {
        self.cells.fill(self.background);
    }

    /// Row-major cell storage, for writers that fill whole rows at once
    pub fn cells_mut(&mut self) -> &mut [char] {
        &mut self.cells
    }

    pub fn row(&self, y: usize) -> &[char] {
        &self.cells[y * self.columns..(y + 1) * self.columns]
    }

    /// Number of cells that differ from the background
    pub fn filled(&self) -> usize {
        self.cells.iter().filter(|&&c| c != self.background).count()
    }

    /// Serialize as newline-joined rows (no trailing newline)
    pub fn to_frame(&self) -> String {
        let mut frame = String::with_capacity(self.cells.len() + self.rows);
        for y in 0..self.rows {
            if y > 0 {
                frame.push('\n');
            }
            frame.extend(self.row(y).iter());
        }
        frame
    }
}

impl fmt::Display for Canvas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_frame())
    }
}
