//! Motionfield Core -- simulated 2D worlds for motion-detection training data.
//!
//! A [`World`](world::World) owns a canvas, a background, a collection of
//! randomly walking [`Shape`](shape::Shape)s and a movable
//! [`View`](view::View). Each tick it emits three aligned outputs cropped to
//! the view: the rendered frame, a binary motion mask and a coarse
//! [`MotionMap`](motion_map::MotionMap) grid.
//!
//! # Quick Start
//!
//! ```
//! use motionfield_core::prelude::*;
//!
//! let config = WorldConfig {
//!     size: Dimensions::new(200, 150),
//!     view_size: Dimensions::new(100, 80),
//!     population: Population::Count(40),
//!     seed: Some(42),
//!     ..Default::default()
//! };
//! let mut world = World::new(config).unwrap();
//! world.view_mut().shake(10, 0.9, 6.0, Axis::Vertical, QueueMode::Append);
//!
//! for _ in 0..10 {
//!     let frame = world.draw();
//!     let map = world.draw_motion_map(8, 8);
//!     assert_eq!(frame.dimensions(), (100, 80));
//!     assert_eq!(map.as_slice().len(), 64);
//!     world.update();
//! }
//! assert_eq!(world.tick_count(), 10);
//! ```

#![deny(unsafe_code)]

pub mod agent;
pub mod motion_map;
pub mod raster;
pub mod shape;
pub mod snapshot;
pub mod view;
pub mod world;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors produced while configuring a world.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SimError {
    /// The world canvas has a zero dimension.
    #[error("world must be non-empty, got {width}x{height}")]
    EmptyWorld { width: u32, height: u32 },

    /// The view is empty or does not fit strictly inside the world.
    #[error(
        "view {view_width}x{view_height} must be non-empty and strictly smaller than world {width}x{height}"
    )]
    ViewTooLarge {
        view_width: u32,
        view_height: u32,
        width: u32,
        height: u32,
    },

    /// An explicit view lies partly outside the canvas.
    #[error("view {top_left:?}..{bottom_right:?} is outside world {width}x{height}")]
    ViewOutOfBounds {
        top_left: agent::Vec2,
        bottom_right: agent::Vec2,
        width: u32,
        height: u32,
    },

    /// An explicitly supplied shape starts off-canvas.
    #[error("agent {index} at ({x}, {y}) is outside world {width}x{height}")]
    AgentOutOfBounds {
        index: usize,
        x: i64,
        y: i64,
        width: u32,
        height: u32,
    },

    #[error("invalid size range {min}..={max}")]
    InvalidSizeRange { min: u32, max: u32 },

    /// No spawn table entry has a positive weight.
    #[error("spawn table has no entry with a positive weight")]
    EmptySpawnTable,

    #[error("invalid color '{0}', expected 'random', 'noise' or 'r,g,b'")]
    InvalidColor(String),

    #[error("invalid size '{0}', expected 'WIDTHxHEIGHT'")]
    InvalidSize(String),

    #[error("invalid population '{0}', expected 'auto' or an agent count")]
    InvalidPopulation(String),
}

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::agent::{Agent, Bounds, Vec2};
    pub use crate::motion_map::MotionMap;
    pub use crate::shape::{
        Geometry, MotionPolicy, Paint, Shape, ShapeKind, SizeRange, SpawnTable,
    };
    pub use crate::snapshot::WorldSnapshot;
    pub use crate::view::{Axis, Displacement, QueueMode, View};
    pub use crate::world::{
        Background, BackgroundSpec, Dimensions, Population, World, WorldConfig,
    };
    pub use crate::SimError;
}

// ---------------------------------------------------------------------------
// Integration Tests
// ---------------------------------------------------------------------------
