//! A batch of sequences and its flat tensor views.
//!
//! Tensors are row-major `u8` buffers:
//!
//! - frames: `[sequences, frames, height, width, 3]`
//! - maps: `[sequences, frames, rows, cols]`
//!
//! Every sequence of a batch comes from the same
//! [`GeneratorConfig`](crate::generator::GeneratorConfig), so shapes are read
//! off the first one.

use crate::generator::{SceneVariant, Sequence, SequenceDiagnostics};

/// Sequences generated together under one batch index.
#[derive(Debug, Clone)]
pub struct Batch {
    index: u64,
    sequences: Vec<Sequence>,
}

impl Batch {
    pub fn new(index: u64, sequences: Vec<Sequence>) -> Self {
        Self { index, sequences }
    }

    /// Position of this batch in the generator's stream.
    pub fn index(&self) -> u64 {
        self.index
    }

    pub fn sequences(&self) -> &[Sequence] {
        &self.sequences
    }

    pub fn into_sequences(self) -> Vec<Sequence> {
        self.sequences
    }

    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }

    /// `[sequences, frames, height, width, 3]`; all zeros for an empty batch.
    pub fn frames_shape(&self) -> [usize; 5] {
        let Some(first) = self.sequences.first() else {
            return [0; 5];
        };
        let (width, height) = first
            .frames
            .first()
            .map(|f| f.dimensions())
            .unwrap_or((0, 0));
        [
            self.sequences.len(),
            first.frames.len(),
            height as usize,
            width as usize,
            3,
        ]
    }

    /// `[sequences, frames, rows, cols]`; all zeros for an empty batch.
    pub fn maps_shape(&self) -> [usize; 4] {
        let Some(first) = self.sequences.first() else {
            return [0; 4];
        };
        let (rows, cols) = first
            .maps
            .first()
            .map(|m| (m.rows(), m.cols()))
            .unwrap_or((0, 0));
        [self.sequences.len(), first.maps.len(), rows, cols]
    }

    /// All frames as one flat buffer in [`frames_shape`](Self::frames_shape)
    /// order.
    pub fn frames_tensor(&self) -> Vec<u8> {
        let len = self.frames_shape().iter().product();
        let mut out = Vec::with_capacity(len);
        for frame in self.sequences.iter().flat_map(|s| &s.frames) {
            out.extend_from_slice(frame.as_raw());
        }
        out
    }

    /// All motion maps as one flat buffer in
    /// [`maps_shape`](Self::maps_shape) order.
    pub fn maps_tensor(&self) -> Vec<u8> {
        let len = self.maps_shape().iter().product();
        let mut out = Vec::with_capacity(len);
        for map in self.sequences.iter().flat_map(|s| &s.maps) {
            out.extend_from_slice(map.as_slice());
        }
        out
    }

    /// Fraction of motion-map cells set to 1 across the batch.
    pub fn marked_fraction(&self) -> f64 {
        let total: usize = self.maps_shape().iter().product();
        if total == 0 {
            return 0.0;
        }
        let marked: usize = self
            .sequences
            .iter()
            .flat_map(|s| &s.maps)
            .map(|m| m.marked_count())
            .sum();
        marked as f64 / total as f64
    }

    /// Scene variant of each sequence, in order.
    pub fn variants(&self) -> impl Iterator<Item = SceneVariant> + '_ {
        self.sequences.iter().map(|s| s.variant)
    }

    /// Per-stage times summed over sequences.
    pub fn diagnostics(&self) -> SequenceDiagnostics {
        let mut total = SequenceDiagnostics::default();
        for sequence in &self.sequences {
            total.accumulate(&sequence.diagnostics);
        }
        total
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
