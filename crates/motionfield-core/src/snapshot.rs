//! World snapshots with BLAKE3 hashing.
//!
//! [`WorldSnapshot`] is a serializable summary of everything that determines
//! future frames: tick counter, view rectangle and pending camera motion,
//! background and every shape. Pixel buffers (noise background, shape
//! textures) are recorded by their BLAKE3 digest rather than inline, so a
//! snapshot stays small while still changing whenever any pixel changes.
//!
//! Two worlds built from the same configuration and seed and driven through
//! the same number of updates produce the same [`World::state_hash`].
//!
//! ```
//! use motionfield_core::prelude::*;
//!
//! let config = WorldConfig {
//!     size: Dimensions::new(120, 90),
//!     view_size: Dimensions::new(60, 40),
//!     population: Population::Count(30),
//!     seed: Some(7),
//!     ..Default::default()
//! };
//! let mut a = World::new(config.clone()).unwrap();
//! let mut b = World::new(config).unwrap();
//! a.run_ticks(20);
//! b.run_ticks(20);
//!
//! let snapshot = a.capture_snapshot();
//! assert_eq!(snapshot.tick_counter, 20);
//! assert_eq!(snapshot.hash.len(), 64); // BLAKE3 hex digest
//! assert_eq!(snapshot.hash, b.state_hash());
//! ```
//!
//! The RNG state is not part of the snapshot; worlds cannot be restored from
//! one, only compared.

use image::{Rgb, RgbImage};
use serde::{Deserialize, Serialize};

use crate::agent::{Agent, Bounds, Vec2};
use crate::shape::{Geometry, MotionPolicy, Paint, Shape};
use crate::view::Displacement;
use crate::world::{Background, World};

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// Serialized form of a pixel fill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaintRecord {
    Flat([u8; 3]),
    /// BLAKE3 hex digest of the texture bytes.
    Noise(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapeRecord {
    pub agent: Agent,
    pub geometry: Geometry,
    pub paint: PaintRecord,
    pub policy: MotionPolicy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BackgroundRecord {
    Solid([u8; 3]),
    /// BLAKE3 hex digest of the noise canvas bytes.
    Noise(String),
}

/// A serializable summary of a [`World`] at one tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    /// Number of updates executed at the time of capture.
    pub tick_counter: u64,
    pub bounds: Bounds,
    pub view_top_left: Vec2,
    pub view_bottom_right: Vec2,
    pub view_queue: Vec<Displacement>,
    pub background: BackgroundRecord,
    pub shapes: Vec<ShapeRecord>,
    /// BLAKE3 hex digest (64 lowercase hex chars) of every other field.
    pub hash: String,
}

impl WorldSnapshot {
    /// Recompute the digest and compare it with the recorded one.
    pub fn verify(&self) -> bool {
        compute_hash(&HashableState::of(self)) == self.hash
    }
}

// ---------------------------------------------------------------------------
// Hashing helpers
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct HashableState<'a> {
    tick_counter: u64,
    bounds: Bounds,
    view_top_left: Vec2,
    view_bottom_right: Vec2,
    view_queue: &'a [Displacement],
    background: &'a BackgroundRecord,
    shapes: &'a [ShapeRecord],
}

impl<'a> HashableState<'a> {
    fn of(snapshot: &'a WorldSnapshot) -> Self {
        Self {
            tick_counter: snapshot.tick_counter,
            bounds: snapshot.bounds,
            view_top_left: snapshot.view_top_left,
            view_bottom_right: snapshot.view_bottom_right,
            view_queue: &snapshot.view_queue,
            background: &snapshot.background,
            shapes: &snapshot.shapes,
        }
    }
}

fn compute_hash(state: &HashableState<'_>) -> String {
    let json_bytes =
        serde_json::to_vec(state).expect("world snapshot state should always be JSON-serializable");
    blake3::hash(&json_bytes).to_hex().to_string()
}

fn image_digest(image: &RgbImage) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(&image.width().to_le_bytes());
    hasher.update(&image.height().to_le_bytes());
    hasher.update(image.as_raw());
    hasher.finalize().to_hex().to_string()
}

fn rgb(color: Rgb<u8>) -> [u8; 3] {
    color.0
}

impl From<&Shape> for ShapeRecord {
    fn from(shape: &Shape) -> Self {
        let paint = match shape.paint() {
            Paint::Flat(color) => PaintRecord::Flat(rgb(*color)),
            Paint::Noise(texture) => PaintRecord::Noise(image_digest(texture)),
        };
        Self {
            agent: *shape.agent(),
            geometry: *shape.geometry(),
            paint,
            policy: shape.policy(),
        }
    }
}

// ---------------------------------------------------------------------------
// World snapshot methods
// ---------------------------------------------------------------------------

impl World {
    /// Capture a hashed summary of the current state.
    pub fn capture_snapshot(&self) -> WorldSnapshot {
        let (view_top_left, view_bottom_right) = self.view().corners();
        let background = match self.background() {
            Background::Solid(color) => BackgroundRecord::Solid(rgb(*color)),
            Background::Noise(noise) => BackgroundRecord::Noise(image_digest(noise)),
        };
        let mut snapshot = WorldSnapshot {
            tick_counter: self.tick_count(),
            bounds: self.bounds(),
            view_top_left,
            view_bottom_right,
            view_queue: self.view().queue().copied().collect(),
            background,
            shapes: self.agents().iter().map(ShapeRecord::from).collect(),
            hash: String::new(),
        };
        snapshot.hash = compute_hash(&HashableState::of(&snapshot));
        snapshot
    }

    /// BLAKE3 hex digest of the current state.
    pub fn state_hash(&self) -> String {
        self.capture_snapshot().hash
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
