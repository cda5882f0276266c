//! The crop window emitted as a frame, with queued camera motion.
//!
//! A [`View`] is a fixed-size rectangle over the world canvas. Camera motion
//! is expressed as a FIFO queue of per-tick [`Displacement`]s; each
//! [`View::update`] consumes at most one of them and then re-clamps the
//! rectangle so it never leaves the canvas. Clamping silently overrides any
//! displacement that would push the window out of bounds.
//!
//! Two generators fill the queue: [`View::shake`] (a truncated sine wave) and
//! [`View::pan`] (a linear ramp). Both can either append to the pending queue
//! or be summed into it element by element.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::agent::{Bounds, Vec2};

/// A single queued camera translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Displacement {
    pub dx: i64,
    pub dy: i64,
}

impl Displacement {
    pub const fn new(dx: i64, dy: i64) -> Self {
        Self { dx, dy }
    }

    fn along(axis: Axis, amount: i64) -> Self {
        match axis {
            Axis::Horizontal => Self::new(amount, 0),
            Axis::Vertical => Self::new(0, amount),
        }
    }
}

/// Axis a shake or pan moves along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Axis {
    Horizontal,
    #[default]
    Vertical,
}

/// How a generated displacement sequence joins the pending queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueueMode {
    /// Concatenate after whatever is already queued.
    #[default]
    Append,
    /// Sum element-wise with the queue; the shorter side is zero-padded.
    Merge,
}

/// Element-wise sum of two displacement sequences, zero-padding the shorter.
pub fn merge_displacements(
    existing: impl IntoIterator<Item = Displacement>,
    incoming: impl IntoIterator<Item = Displacement>,
) -> VecDeque<Displacement> {
    let mut a = existing.into_iter();
    let mut b = incoming.into_iter();
    let mut out = VecDeque::new();
    loop {
        match (a.next(), b.next()) {
            (None, None) => break,
            (l, r) => {
                let l = l.unwrap_or_default();
                let r = r.unwrap_or_default();
                out.push_back(Displacement::new(l.dx + r.dx, l.dy + r.dy));
            }
        }
    }
    out
}

// ---------------------------------------------------------------------------
// View
// ---------------------------------------------------------------------------

/// The camera window cropped out of the world canvas, with its pending
/// displacement queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    top_left: Vec2,
    bottom_right: Vec2,
    queue: VecDeque<Displacement>,
}

impl View {
    /// A view spanning `[top_left, bottom_right)` with an empty queue.
    pub fn new(top_left: Vec2, bottom_right: Vec2) -> Self {
        Self {
            top_left,
            bottom_right,
            queue: VecDeque::new(),
        }
    }

    /// A `width × height` view centered on the canvas.
    pub fn centered(bounds: Bounds, width: u32, height: u32) -> Self {
        let cx = bounds.width as i64 / 2;
        let cy = bounds.height as i64 / 2;
        let top_left = Vec2::new(cx - width as i64 / 2, cy - height as i64 / 2);
        let bottom_right = Vec2::new(top_left.x + width as i64, top_left.y + height as i64);
        Self::new(top_left, bottom_right)
    }

    /// `(top_left, bottom_right)`; the bottom-right corner is exclusive.
    pub fn corners(&self) -> (Vec2, Vec2) {
        (self.top_left, self.bottom_right)
    }

    pub fn width(&self) -> u32 {
        (self.bottom_right.x - self.top_left.x) as u32
    }

    pub fn height(&self) -> u32 {
        (self.bottom_right.y - self.top_left.y) as u32
    }

    /// Pending displacements, next-to-apply first.
    pub fn queue(&self) -> impl Iterator<Item = &Displacement> {
        self.queue.iter()
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// Half-open containment: `tlx <= x < brx && tly <= y < bry`.
    pub fn contains(&self, x: i64, y: i64) -> bool {
        (self.top_left.x..self.bottom_right.x).contains(&x)
            && (self.top_left.y..self.bottom_right.y).contains(&y)
    }

    /// Whether the window lies fully inside `bounds`.
    pub fn fits(&self, bounds: Bounds) -> bool {
        self.top_left.x >= 0
            && self.top_left.y >= 0
            && self.top_left.x < self.bottom_right.x
            && self.top_left.y < self.bottom_right.y
            && self.bottom_right.x <= bounds.width as i64
            && self.bottom_right.y <= bounds.height as i64
    }

    /// Apply the next queued displacement, then re-clamp onto the canvas.
    pub fn update(&mut self, bounds: Bounds) {
        let w = self.bottom_right.x - self.top_left.x;
        let h = self.bottom_right.y - self.top_left.y;

        if let Some(d) = self.queue.pop_front() {
            self.top_left.x += d.dx;
            self.top_left.y += d.dy;
            self.bottom_right.x += d.dx;
            self.bottom_right.y += d.dy;
        }

        let (tl, br) = (&mut self.top_left, &mut self.bottom_right);
        clamp_axis(&mut tl.x, &mut br.x, w, bounds.width as i64);
        clamp_axis(&mut tl.y, &mut br.y, h, bounds.height as i64);
    }

    /// Queue `timesteps` ticks of `trunc(mag * sin(freq * t))`, `t` from 1.
    pub fn shake(&mut self, timesteps: usize, freq: f64, mag: f64, axis: Axis, mode: QueueMode) {
        let wave = (1..=timesteps).map(|t| {
            let amount = (mag * (freq * t as f64).sin()) as i64;
            Displacement::along(axis, amount)
        });
        self.enqueue(wave, mode);
    }

    /// Queue `timesteps` ticks of `t * speed`, `t` from 1.
    pub fn pan(&mut self, timesteps: usize, speed: i64, axis: Axis, mode: QueueMode) {
        let ramp = (1..=timesteps).map(|t| Displacement::along(axis, t as i64 * speed));
        self.enqueue(ramp, mode);
    }

    fn enqueue(&mut self, moves: impl Iterator<Item = Displacement>, mode: QueueMode) {
        match mode {
            QueueMode::Append => self.queue.extend(moves),
            QueueMode::Merge => {
                let pending = std::mem::take(&mut self.queue);
                self.queue = merge_displacements(pending, moves);
            }
        }
    }
}

/// Low edge first, then high edge against `limit - 1`, keeping the span `len`.
fn clamp_axis(lo: &mut i64, hi: &mut i64, len: i64, limit: i64) {
    if *lo < 0 {
        *lo = 0;
        *hi = len;
    }
    if *hi >= limit {
        *hi = limit - 1;
        *lo = limit - 1 - len;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
