//! Frame sequence persistence for the image-compositing step

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::canvas::Canvas;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Failed to write frames: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode frames: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Frame {index} is {columns}x{rows}, expected {expected_columns}x{expected_rows}")]
    SizeMismatch {
        index: usize,
        columns: usize,
        rows: usize,
        expected_columns: usize,
        expected_rows: usize,
    },
}

/// Ordered frames of one revolution, each a newline-joined canvas
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct FrameSequence {
    pub frames: Vec<String>,
    pub count: usize,
    pub columns: usize,
    pub rows: usize,
}

impl FrameSequence {
    pub fn new(columns: usize, rows: usize) -> Self {
        Self {
            frames: Vec::new(),
            count: 0,
            columns,
            rows,
        }
    }

    /// Collect canvases that all share one grid size
    pub fn from_canvases<I>(canvases: I) -> Result<Self, ExportError>
    where
        I: IntoIterator<Item = Canvas>,
    {
        let mut sequence: Option<Self> = None;
        for canvas in canvases {
            let seq = sequence.get_or_insert_with(|| Self::new(canvas.columns(), canvas.rows()));
            seq.push(&canvas)?;
        }
        Ok(sequence.unwrap_or_default())
    }

    pub fn push(&mut self, canvas: &Canvas) -> Result<(), ExportError> {
        if canvas.columns() != self.columns || canvas.rows() != self.rows {
            return Err(ExportError::SizeMismatch {
                index: self.frames.len(),
                columns: canvas.columns(),
                rows: canvas.rows(),
                expected_columns: self.columns,
                expected_rows: self.rows,
            });
        }
        self.frames.push(canvas.to_frame());
        self.count = self.frames.len();
        Ok(())
    }

    pub fn to_json(&self) -> Result<String, ExportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write_json<P: AsRef<Path>>(&self, path: P) -> Result<(), ExportError> {
        let path = path.as_ref();
        std::fs::write(path, self.to_json()?)?;
        tracing::info!(
            frames = self.count,
            path = %path.display(),
            "Wrote frame sequence"
        );
        Ok(())
    }

    pub fn read_json<P: AsRef<Path>>(path: P) -> Result<Self, ExportError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}
