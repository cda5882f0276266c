//! Kinematic state and the per-tick biased random walk.
//!
//! An [`Agent`] is a plain value: position, velocity and acceleration on an
//! integer grid. [`Agent::step`] draws an acceleration delta per axis and
//! returns the next state; the receiver is never mutated. Boundary handling is
//! a hard clamp followed by a reflection of the axis that touched an edge.
//!
//! The y axis does not accumulate velocity: each tick `vy` is overwritten by
//! the new `ay`, while `vx` accumulates `ax`. Downstream training data depends
//! on this asymmetry, so it is kept as is.

use std::ops::Add;

use rand::Rng;
use rand_distr::{Distribution, Geometric};
use serde::{Deserialize, Serialize};

use crate::view::View;

/// Equally likely acceleration directions. Four of six draws are zero.
const DIRECTIONS: [i64; 6] = [-1, 0, 0, 0, 0, 1];

/// Success probability of the acceleration magnitude distribution.
const ACCELERATION_SUCCESS_P: f64 = 0.8;

// ---------------------------------------------------------------------------
// Vec2 / Bounds
// ---------------------------------------------------------------------------

/// An integer 2D vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Vec2 {
    /// Horizontal component.
    pub x: i64,
    /// Vertical component.
    pub y: i64,
}

impl Vec2 {
    /// The zero vector.
    pub const ZERO: Vec2 = Vec2 { x: 0, y: 0 };

    /// Build a vector from its components.
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Whether both components are zero.
    pub fn is_zero(self) -> bool {
        self == Self::ZERO
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

/// Canvas dimensions an agent is confined to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
}

impl Bounds {
    /// Bounds of a `width × height` canvas.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Largest valid x coordinate.
    pub fn max_x(self) -> i64 {
        self.width as i64 - 1
    }

    /// Largest valid y coordinate.
    pub fn max_y(self) -> i64 {
        self.height as i64 - 1
    }

    /// Whether `p` lies on the canvas.
    pub fn contains(self, p: Vec2) -> bool {
        (0..=self.max_x()).contains(&p.x) && (0..=self.max_y()).contains(&p.y)
    }

    /// Hard-clip `p` onto the canvas.
    pub fn clamp(self, p: Vec2) -> Vec2 {
        Vec2::new(p.x.clamp(0, self.max_x()), p.y.clamp(0, self.max_y()))
    }
}

// ---------------------------------------------------------------------------
// Agent
// ---------------------------------------------------------------------------

/// Kinematic state of a single simulated entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Agent {
    /// Pixel coordinates on the world canvas.
    pub position: Vec2,
    /// Per-tick displacement.
    pub velocity: Vec2,
    /// Per-tick velocity change; a random delta is added every step.
    pub acceleration: Vec2,
}

impl Agent {
    pub const fn new(position: Vec2, velocity: Vec2, acceleration: Vec2) -> Self {
        Self {
            position,
            velocity,
            acceleration,
        }
    }

    /// A motionless agent at `(x, y)`.
    pub const fn at(x: i64, y: i64) -> Self {
        Self::new(Vec2::new(x, y), Vec2::ZERO, Vec2::ZERO)
    }

    /// False only when velocity and acceleration are both the zero vector.
    pub fn is_moving(&self) -> bool {
        !(self.velocity.is_zero() && self.acceleration.is_zero())
    }

    /// Advance one tick, drawing the acceleration delta from `rng`.
    ///
    /// The x delta is drawn before the y delta.
    pub fn step<R: Rng + ?Sized>(&self, bounds: Bounds, rng: &mut R) -> Agent {
        let dx = acceleration_delta(rng);
        let dy = acceleration_delta(rng);
        self.integrate(bounds, Vec2::new(dx, dy))
    }

    /// Deterministic part of [`step`](Self::step) with the delta supplied.
    pub fn integrate(&self, bounds: Bounds, delta: Vec2) -> Agent {
        let mut acceleration = self.acceleration + delta;
        let mut velocity = Vec2::new(self.velocity.x + acceleration.x, acceleration.y);
        let position = bounds.clamp(self.position + velocity);

        if position.x == 0 || position.x == bounds.max_x() {
            velocity.x = -velocity.x;
            acceleration.x = -acceleration.x;
        }
        if position.y == 0 || position.y == bounds.max_y() {
            velocity.y = -velocity.y;
            acceleration.y = -acceleration.y;
        }

        Agent::new(position, velocity, acceleration)
    }

    /// Motion-map cell of this agent for a `rows × cols` grid over `view`.
    ///
    /// `None` when the agent is still or outside the view.
    pub fn sector(&self, view: &View, rows: usize, cols: usize) -> Option<(usize, usize)> {
        let Vec2 { x, y } = self.position;
        if !(view.contains(x, y) && self.is_moving()) {
            return None;
        }
        let (tl, _) = view.corners();
        let rel_x = (x - tl.x) as f64;
        let rel_y = (y - tl.y) as f64;
        let row = (rel_y / view.height() as f64 * rows as f64) as usize;
        let col = (rel_x / view.width() as f64 * cols as f64) as usize;
        Some((row, col))
    }
}

/// One axis of acceleration change: a random direction times a geometric
/// magnitude counted from zero.
pub fn acceleration_delta<R: Rng + ?Sized>(rng: &mut R) -> i64 {
    let direction = DIRECTIONS[rng.gen_range(0..DIRECTIONS.len())];
    let magnitude = Geometric::new(ACCELERATION_SUCCESS_P)
        .expect("constant success probability is within (0, 1]")
        .sample(rng);
    direction * magnitude as i64
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
