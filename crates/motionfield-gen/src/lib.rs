//! Motionfield Gen -- batched training sequences from simulated worlds.
//!
//! Builds on [`motionfield_core`]: a [`SequenceGenerator`](generator::SequenceGenerator)
//! creates one world per sequence, records `draw` and `draw_motion_map` for a
//! fixed number of frames, and stacks sequences into
//! [`Batch`](batch::Batch)es with flat tensor views.
//!
//! # Quick Start
//!
//! ```
//! use motionfield_gen::prelude::*;
//!
//! let config = GeneratorConfig {
//!     num_frames: 3,
//!     map_size: MapSize::new(8, 8),
//!     sequences_per_batch: 2,
//!     world_size: Dimensions::new(80, 60),
//!     view_size: Dimensions::new(40, 30),
//!     population: Population::Count(20),
//!     seed: Some(42),
//!     ..Default::default()
//! };
//! let generator = SequenceGenerator::new(config).unwrap();
//! let batch = generator.generate_batch(0).unwrap();
//!
//! assert_eq!(batch.frames_shape(), [2, 3, 30, 40, 3]);
//! assert_eq!(batch.maps_shape(), [2, 3, 8, 8]);
//! assert_eq!(batch.frames_tensor().len(), 2 * 3 * 30 * 40 * 3);
//! ```

#![deny(unsafe_code)]

pub mod batch;
pub mod generator;

/// Re-export the core crate for convenience.
pub use motionfield_core;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors produced while configuring or running a generator.
#[derive(Debug, thiserror::Error)]
pub enum GenError {
    /// A world could not be built from the derived configuration.
    #[error(transparent)]
    Sim(#[from] motionfield_core::SimError),

    #[error("sequences must have at least one frame")]
    ZeroFrames,

    #[error("batches must have at least one sequence")]
    ZeroSequences,

    /// Unparsable or zero-sized motion-map grid.
    #[error("invalid map size '{0}', expected 'ROWSxCOLS' with both positive")]
    InvalidMapSize(String),
}

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use motionfield_core::prelude::*;

    pub use crate::batch::Batch;
    pub use crate::generator::{
        GeneratorConfig, MapSize, SceneVariant, Sequence, SequenceDiagnostics, SequenceGenerator,
    };
    pub use crate::GenError;
}
