//! Drawable shapes: geometry, paint and motion policy over an [`Agent`].
//!
//! A [`Shape`] carries one tag from each of three independent axes:
//!
//! - [`Geometry`]: a circle of some radius, or a rectangle of some height and
//!   width centered on the agent position.
//! - [`Paint`]: a flat RGB color, or a noise texture generated once and shared
//!   unchanged through every update.
//! - [`MotionPolicy`]: free random-walk motion, or forced-static (position
//!   kept, velocity and acceleration zeroed every tick).
//!
//! [`Shape::step`] and [`Shape::render`] dispatch on those tags. The
//! [`ShapeKind`] presets bundle common combinations with their size ranges and
//! initial-velocity rules, and [`SpawnTable`] picks among presets by weight.

use std::sync::Arc;

use image::{Rgb, RgbImage};
use rand::distributions::WeightedIndex;
use rand::Rng;
use rand_distr::{Binomial, Distribution, Geometric};
use serde::{Deserialize, Serialize};

use crate::agent::{Agent, Bounds, Vec2};
use crate::raster::{self, WHITE};
use crate::SimError;

/// Success probability of each initial velocity component of a free preset.
const INITIAL_VELOCITY_SUCCESS_P: f64 = 0.9;

// ---------------------------------------------------------------------------
// SizeRange
// ---------------------------------------------------------------------------

/// Inclusive size range sampled as `Binomial(max - min, 0.5) + min`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeRange {
    pub min: u32,
    pub max: u32,
}

impl SizeRange {
    /// Radius range of ordinary circles.
    pub const CIRCLE_RADIUS: SizeRange = SizeRange { min: 2, max: 10 };
    /// Radius range of big static circles.
    pub const BIG_CIRCLE_RADIUS: SizeRange = SizeRange { min: 20, max: 100 };
    /// Side range of rectangles (height and width drawn independently).
    pub const RECTANGLE_SIDE: SizeRange = SizeRange { min: 2, max: 15 };

    pub fn new(min: u32, max: u32) -> Result<Self, SimError> {
        if min > max {
            return Err(SimError::InvalidSizeRange { min, max });
        }
        Ok(Self { min, max })
    }

    /// Draw a size. The distribution is symmetric around the midpoint.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        let trials = self.max.saturating_sub(self.min) as u64;
        let offset = Binomial::new(trials, 0.5)
            .expect("p = 0.5 is a valid binomial probability")
            .sample(rng);
        self.min + offset as u32
    }
}

// ---------------------------------------------------------------------------
// Geometry
// ---------------------------------------------------------------------------

/// Footprint of a shape relative to its agent position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Geometry {
    Circle { radius: u32 },
    Rectangle { height: u32, width: u32 },
}

impl Geometry {
    /// Top-left corner of the bounding box when anchored at `center`.
    pub fn top_left(&self, center: Vec2) -> Vec2 {
        match *self {
            Geometry::Circle { radius } => {
                Vec2::new(center.x - radius as i64, center.y - radius as i64)
            }
            Geometry::Rectangle { height, width } => {
                Vec2::new(center.x - width as i64 / 2, center.y - height as i64 / 2)
            }
        }
    }

    /// `(width, height)` of the bounding box, which is also the texture size.
    pub fn extent(&self) -> (u32, u32) {
        match *self {
            Geometry::Circle { radius } => (2 * radius, 2 * radius),
            Geometry::Rectangle { height, width } => (width, height),
        }
    }

    /// Solid-fill the footprint anchored at `center`.
    pub fn fill(&self, buf: &mut RgbImage, center: Vec2, color: Rgb<u8>) {
        match *self {
            Geometry::Circle { radius } => {
                raster::fill_circle(buf, (center.x, center.y), radius, color);
            }
            Geometry::Rectangle { height, width } => {
                if height == 0 || width == 0 {
                    return;
                }
                let tl = self.top_left(center);
                let br = (tl.x + width as i64 - 1, tl.y + height as i64 - 1);
                raster::fill_rect(buf, (tl.x, tl.y), br, color);
            }
        }
    }

    /// A per-pixel random RGB texture covering this footprint.
    ///
    /// Circles get a disk of radius `r` centered at `(r, r)` inside a
    /// `2r × 2r` bitmap, zero outside the disk. Rectangles are filled solid.
    pub fn noise_texture<R: Rng + ?Sized>(&self, rng: &mut R) -> RgbImage {
        let (w, h) = self.extent();
        let mut texture = RgbImage::new(w, h);
        match *self {
            Geometry::Circle { radius } => {
                let r = radius as i64;
                for (x, y, px) in texture.enumerate_pixels_mut() {
                    let dx = x as i64 - r;
                    let dy = y as i64 - r;
                    if dx * dx + dy * dy <= r * r {
                        *px = raster::random_color(rng);
                    }
                }
            }
            Geometry::Rectangle { .. } => {
                for px in texture.pixels_mut() {
                    *px = raster::random_color(rng);
                }
            }
        }
        texture
    }
}

// ---------------------------------------------------------------------------
// Paint / MotionPolicy
// ---------------------------------------------------------------------------

/// How a shape's pixels are colored.
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Flat(Rgb<u8>),
    /// Immutable texture; clones share the same bitmap.
    Noise(Arc<RgbImage>),
}

impl Paint {
    /// A fresh noise texture sized to `geometry`.
    pub fn noise<R: Rng + ?Sized>(geometry: &Geometry, rng: &mut R) -> Self {
        Paint::Noise(Arc::new(geometry.noise_texture(rng)))
    }

    pub fn texture(&self) -> Option<&Arc<RgbImage>> {
        match self {
            Paint::Flat(_) => None,
            Paint::Noise(texture) => Some(texture),
        }
    }
}

/// Whether a shape follows the random walk or stays put.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MotionPolicy {
    #[default]
    Free,
    /// Velocity and acceleration are forced to zero every tick.
    Static,
}

impl MotionPolicy {
    /// Next kinematic state under this policy. `Static` draws nothing from `rng`.
    pub fn step<R: Rng + ?Sized>(self, agent: &Agent, bounds: Bounds, rng: &mut R) -> Agent {
        match self {
            MotionPolicy::Free => agent.step(bounds, rng),
            MotionPolicy::Static => Agent::at(agent.position.x, agent.position.y),
        }
    }
}

// ---------------------------------------------------------------------------
// Shape
// ---------------------------------------------------------------------------

/// A drawable agent: kinematics plus geometry, paint and motion policy.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    agent: Agent,
    geometry: Geometry,
    paint: Paint,
    policy: MotionPolicy,
}

impl Shape {
    /// Assemble a shape. A `Static` policy zeroes the agent's motion at once.
    pub fn new(agent: Agent, geometry: Geometry, paint: Paint, policy: MotionPolicy) -> Self {
        let agent = match policy {
            MotionPolicy::Free => agent,
            MotionPolicy::Static => Agent::at(agent.position.x, agent.position.y),
        };
        Self {
            agent,
            geometry,
            paint,
            policy,
        }
    }

    pub fn agent(&self) -> &Agent {
        &self.agent
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn paint(&self) -> &Paint {
        &self.paint
    }

    pub fn policy(&self) -> MotionPolicy {
        self.policy
    }

    pub fn position(&self) -> Vec2 {
        self.agent.position
    }

    pub fn is_moving(&self) -> bool {
        self.agent.is_moving()
    }

    /// Next-tick shape. Geometry, paint and policy carry over unchanged.
    pub fn step<R: Rng + ?Sized>(&self, bounds: Bounds, rng: &mut R) -> Shape {
        Shape {
            agent: self.policy.step(&self.agent, bounds, rng),
            geometry: self.geometry,
            paint: self.paint.clone(),
            policy: self.policy,
        }
    }

    /// Draw into `buf`.
    ///
    /// A textured shape without an override blits its texture; everything
    /// else is a solid fill in the override color or the flat color.
    pub fn render(&self, buf: &mut RgbImage, override_color: Option<Rgb<u8>>) {
        let center = self.agent.position;
        match (&self.paint, override_color) {
            (_, Some(color)) => self.geometry.fill(buf, center, color),
            (Paint::Flat(color), None) => self.geometry.fill(buf, center, *color),
            (Paint::Noise(texture), None) => {
                let tl = self.geometry.top_left(center);
                raster::blit_nonzero(buf, texture, (tl.x, tl.y));
            }
        }
    }

    /// Draw in white if moving; otherwise leave `buf` untouched.
    pub fn draw_motion_mask(&self, buf: &mut RgbImage) {
        if self.is_moving() {
            self.render(buf, Some(WHITE));
        }
    }

    /// Draw in white if still; otherwise leave `buf` untouched.
    pub fn draw_static_mask(&self, buf: &mut RgbImage) {
        if !self.is_moving() {
            self.render(buf, Some(WHITE));
        }
    }
}

// ---------------------------------------------------------------------------
// ShapeKind presets
// ---------------------------------------------------------------------------

/// Spawn presets: a geometry family, a motion policy and a size range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    Circle,
    StaticCircle,
    BigStaticCircle,
    Rectangle,
    StaticRectangle,
}

impl ShapeKind {
    pub fn policy(self) -> MotionPolicy {
        match self {
            ShapeKind::Circle | ShapeKind::Rectangle => MotionPolicy::Free,
            ShapeKind::StaticCircle | ShapeKind::BigStaticCircle | ShapeKind::StaticRectangle => {
                MotionPolicy::Static
            }
        }
    }

    pub fn size_range(self) -> SizeRange {
        match self {
            ShapeKind::Circle | ShapeKind::StaticCircle => SizeRange::CIRCLE_RADIUS,
            ShapeKind::BigStaticCircle => SizeRange::BIG_CIRCLE_RADIUS,
            ShapeKind::Rectangle | ShapeKind::StaticRectangle => SizeRange::RECTANGLE_SIDE,
        }
    }

    fn sample_geometry<R: Rng + ?Sized>(self, range: SizeRange, rng: &mut R) -> Geometry {
        match self {
            ShapeKind::Circle | ShapeKind::StaticCircle | ShapeKind::BigStaticCircle => {
                Geometry::Circle {
                    radius: range.sample(rng),
                }
            }
            ShapeKind::Rectangle | ShapeKind::StaticRectangle => {
                let height = range.sample(rng);
                let width = range.sample(rng);
                Geometry::Rectangle { height, width }
            }
        }
    }

    /// Spawn at a uniformly random position on the canvas.
    ///
    /// Free presets start with non-negative geometric velocity components and
    /// zero acceleration. With `noise`, paint is a texture instead of a flat
    /// random color.
    pub fn spawn<R: Rng + ?Sized>(self, bounds: Bounds, noise: bool, rng: &mut R) -> Shape {
        self.spawn_sized(self.size_range(), bounds, noise, rng)
    }

    /// [`spawn`](Self::spawn) with `range` in place of the preset size range.
    pub fn spawn_sized<R: Rng + ?Sized>(
        self,
        range: SizeRange,
        bounds: Bounds,
        noise: bool,
        rng: &mut R,
    ) -> Shape {
        let position = Vec2::new(
            rng.gen_range(0..bounds.width) as i64,
            rng.gen_range(0..bounds.height) as i64,
        );
        let velocity = match self.policy() {
            MotionPolicy::Free => {
                let geo = Geometric::new(INITIAL_VELOCITY_SUCCESS_P)
                    .expect("constant success probability is within (0, 1]");
                Vec2::new(geo.sample(rng) as i64, geo.sample(rng) as i64)
            }
            MotionPolicy::Static => Vec2::ZERO,
        };
        let agent = Agent::new(position, velocity, Vec2::ZERO);

        let geometry = self.sample_geometry(range, rng);
        let paint = if noise {
            Paint::noise(&geometry, rng)
        } else {
            Paint::Flat(raster::random_color(rng))
        };
        Shape::new(agent, geometry, paint, self.policy())
    }
}

// ---------------------------------------------------------------------------
// SpawnTable
// ---------------------------------------------------------------------------

/// Weighted choice among presets for generated populations, with optional
/// per-preset size overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpawnTable {
    entries: Vec<(ShapeKind, u32)>,
    sizes: Vec<(ShapeKind, SizeRange)>,
}

impl Default for SpawnTable {
    /// Free circles only.
    fn default() -> Self {
        Self::new(vec![(ShapeKind::Circle, 1)])
    }
}

impl SpawnTable {
    pub fn new(entries: Vec<(ShapeKind, u32)>) -> Self {
        Self {
            entries,
            sizes: Vec::new(),
        }
    }

    /// Replace the size range `kind` spawns with. A later override for the
    /// same preset wins.
    pub fn with_size_range(mut self, kind: ShapeKind, range: SizeRange) -> Self {
        self.sizes.retain(|(k, _)| *k != kind);
        self.sizes.push((kind, range));
        self
    }

    /// Effective size range of `kind`: the override if any, else the preset's.
    pub fn size_range(&self, kind: ShapeKind) -> SizeRange {
        self.sizes
            .iter()
            .find(|(k, _)| *k == kind)
            .map_or_else(|| kind.size_range(), |(_, range)| *range)
    }

    /// Moving shapes outnumber still ones; both geometries appear.
    pub fn mixed() -> Self {
        Self::new(vec![
            (ShapeKind::Circle, 3),
            (ShapeKind::Rectangle, 3),
            (ShapeKind::StaticCircle, 1),
            (ShapeKind::StaticRectangle, 1),
            (ShapeKind::BigStaticCircle, 1),
        ])
    }

    pub fn entries(&self) -> &[(ShapeKind, u32)] {
        &self.entries
    }

    /// Validated sampler over the table.
    ///
    /// Fails on an inverted size override or when no entry has a positive
    /// weight.
    pub fn sampler(&self) -> Result<SpawnSampler<'_>, SimError> {
        for (_, range) in &self.sizes {
            SizeRange::new(range.min, range.max)?;
        }
        let index = WeightedIndex::new(self.entries.iter().map(|(_, w)| *w))
            .map_err(|_| SimError::EmptySpawnTable)?;
        Ok(SpawnSampler { table: self, index })
    }
}

/// Draws presets from a [`SpawnTable`].
pub struct SpawnSampler<'a> {
    table: &'a SpawnTable,
    index: WeightedIndex<u32>,
}

impl SpawnSampler<'_> {
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> ShapeKind {
        self.table.entries[self.index.sample(rng)].0
    }

    /// Pick a preset and spawn it at its effective size range.
    pub fn spawn<R: Rng + ?Sized>(&self, bounds: Bounds, noise: bool, rng: &mut R) -> Shape {
        let kind = self.pick(rng);
        kind.spawn_sized(self.table.size_range(kind), bounds, noise, rng)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::BLACK;
    use rand::SeedableRng;
    use rand_pcg::Pcg64;

    const BOUNDS: Bounds = Bounds::new(40, 30);
    const GREEN: Rgb<u8> = Rgb([0, 200, 0]);

    fn rng() -> Pcg64 {
        Pcg64::seed_from_u64(0xC0FFEE)
    }

    fn count(buf: &RgbImage, color: Rgb<u8>) -> usize {
        buf.pixels().filter(|p| **p == color).count()
    }

    fn moving_circle(x: i64, y: i64, radius: u32, paint: Paint) -> Shape {
        Shape::new(
            Agent::new(Vec2::new(x, y), Vec2::new(1, 0), Vec2::ZERO),
            Geometry::Circle { radius },
            paint,
            MotionPolicy::Free,
        )
    }

    // -- size ranges --------------------------------------------------------

    #[test]
    fn size_range_rejects_inverted_bounds() {
        assert!(matches!(
            SizeRange::new(5, 2),
            Err(SimError::InvalidSizeRange { min: 5, max: 2 })
        ));
        assert!(SizeRange::new(3, 3).is_ok());
    }

    #[test]
    fn size_range_samples_stay_inside() {
        let mut rng = rng();
        for range in [
            SizeRange::CIRCLE_RADIUS,
            SizeRange::BIG_CIRCLE_RADIUS,
            SizeRange::RECTANGLE_SIDE,
        ] {
            for _ in 0..500 {
                let s = range.sample(&mut rng);
                assert!((range.min..=range.max).contains(&s));
            }
        }
        assert_eq!(SizeRange { min: 4, max: 4 }.sample(&mut rng), 4);
    }

    // -- textures -----------------------------------------------------------

    #[test]
    fn circle_texture_is_zero_outside_disk() {
        let mut rng = rng();
        let geometry = Geometry::Circle { radius: 4 };
        let texture = geometry.noise_texture(&mut rng);
        assert_eq!(texture.dimensions(), (8, 8));
        // Bitmap corners are outside the disk.
        assert_eq!(*texture.get_pixel(0, 0), BLACK);
        assert_eq!(*texture.get_pixel(7, 7), BLACK);
        assert_eq!(*texture.get_pixel(0, 7), BLACK);
    }

    #[test]
    fn rectangle_texture_covers_bounding_box() {
        let mut rng = rng();
        let geometry = Geometry::Rectangle { height: 3, width: 5 };
        let texture = geometry.noise_texture(&mut rng);
        assert_eq!(texture.dimensions(), (5, 3));
        // With 45 random bytes, at least most pixels are non-black.
        assert!(count(&texture, BLACK) < 3);
    }

    #[test]
    fn texture_is_shared_across_steps() {
        let mut rng = rng();
        let geometry = Geometry::Circle { radius: 3 };
        let shape = moving_circle(10, 10, 3, Paint::noise(&geometry, &mut rng));
        let mut next = shape.clone();
        for _ in 0..5 {
            next = next.step(BOUNDS, &mut rng);
        }
        let a = shape.paint().texture().unwrap();
        let b = next.paint().texture().unwrap();
        assert!(Arc::ptr_eq(a, b));
    }

    // -- rendering ----------------------------------------------------------

    #[test]
    fn flat_circle_renders_its_color() {
        let mut buf = RgbImage::new(20, 20);
        moving_circle(10, 10, 2, Paint::Flat(GREEN)).render(&mut buf, None);
        assert_eq!(count(&buf, GREEN), 13);
    }

    #[test]
    fn override_color_wins_over_texture() {
        let mut rng = rng();
        let geometry = Geometry::Circle { radius: 2 };
        let shape = moving_circle(10, 10, 2, Paint::noise(&geometry, &mut rng));
        let mut buf = RgbImage::new(20, 20);
        shape.render(&mut buf, Some(WHITE));
        assert_eq!(count(&buf, WHITE), 13);
    }

    #[test]
    fn texture_blit_is_anchored_at_center_minus_radius() {
        let mut texture = RgbImage::new(4, 4);
        texture.put_pixel(0, 0, Rgb([7, 8, 9]));
        let shape = moving_circle(10, 10, 2, Paint::Noise(Arc::new(texture)));
        let mut buf = RgbImage::from_pixel(20, 20, Rgb([1, 1, 1]));
        shape.render(&mut buf, None);
        assert_eq!(*buf.get_pixel(8, 8), Rgb([7, 8, 9]));
        // Zero texels are transparent.
        assert_eq!(*buf.get_pixel(9, 9), Rgb([1, 1, 1]));
    }

    #[test]
    fn texture_blit_replaces_only_nonzero_channels() {
        let mut texture = RgbImage::new(4, 4);
        texture.put_pixel(1, 2, GREEN);
        let shape = moving_circle(10, 10, 2, Paint::Noise(Arc::new(texture)));
        let mut buf = RgbImage::from_pixel(20, 20, Rgb([1, 1, 1]));
        shape.render(&mut buf, None);
        // Red and blue are zero in the texel, so the canvas keeps them.
        assert_eq!(*buf.get_pixel(9, 10), Rgb([1, 200, 1]));
    }

    #[test]
    fn texture_truncates_at_canvas_edge() {
        let texture = RgbImage::from_pixel(4, 4, GREEN);
        let shape = moving_circle(19, 19, 2, Paint::Noise(Arc::new(texture)));
        let mut buf = RgbImage::new(20, 20);
        shape.render(&mut buf, None);
        // Region [17, 21) clipped to [17, 20): 3 × 3.
        assert_eq!(count(&buf, GREEN), 9);
    }

    #[test]
    fn rectangle_is_centered_on_position() {
        let shape = Shape::new(
            Agent::at(10, 10),
            Geometry::Rectangle { height: 3, width: 4 },
            Paint::Flat(GREEN),
            MotionPolicy::Static,
        );
        let mut buf = RgbImage::new(20, 20);
        shape.render(&mut buf, None);
        assert_eq!(count(&buf, GREEN), 12);
        // top-left = (10 - 2, 10 - 1)
        assert_eq!(*buf.get_pixel(8, 9), GREEN);
        assert_eq!(*buf.get_pixel(11, 11), GREEN);
        assert_eq!(*buf.get_pixel(12, 11), BLACK);
    }

    // -- masks --------------------------------------------------------------

    #[test]
    fn masks_route_by_motion_state() {
        let moving = moving_circle(5, 5, 1, Paint::Flat(GREEN));
        let still = Shape::new(
            Agent::at(5, 5),
            Geometry::Circle { radius: 1 },
            Paint::Flat(GREEN),
            MotionPolicy::Static,
        );

        let mut motion = RgbImage::new(10, 10);
        let mut stat = RgbImage::new(10, 10);
        moving.draw_motion_mask(&mut motion);
        moving.draw_static_mask(&mut stat);
        assert_eq!(count(&motion, WHITE), 5);
        assert_eq!(count(&stat, WHITE), 0);

        let mut motion = RgbImage::new(10, 10);
        let mut stat = RgbImage::new(10, 10);
        still.draw_motion_mask(&mut motion);
        still.draw_static_mask(&mut stat);
        assert_eq!(count(&motion, WHITE), 0);
        assert_eq!(count(&stat, WHITE), 5);
    }

    // -- motion policy ------------------------------------------------------

    #[test]
    fn static_policy_zeroes_motion_on_construction_and_step() {
        let mut rng = rng();
        let shape = Shape::new(
            Agent::new(Vec2::new(3, 4), Vec2::new(5, 5), Vec2::new(1, 1)),
            Geometry::Circle { radius: 2 },
            Paint::Flat(GREEN),
            MotionPolicy::Static,
        );
        assert!(!shape.is_moving());
        let next = shape.step(BOUNDS, &mut rng);
        assert_eq!(*next.agent(), Agent::at(3, 4));
    }

    #[test]
    fn static_step_consumes_no_randomness() {
        let mut a = rng();
        let mut b = rng();
        let shape = Shape::new(
            Agent::at(1, 1),
            Geometry::Circle { radius: 2 },
            Paint::Flat(GREEN),
            MotionPolicy::Static,
        );
        let _ = shape.step(BOUNDS, &mut a);
        assert_eq!(a.gen::<u64>(), b.gen::<u64>());
    }

    // -- presets ------------------------------------------------------------

    #[test]
    fn presets_spawn_inside_bounds_with_matching_policy() {
        let mut rng = rng();
        for kind in [
            ShapeKind::Circle,
            ShapeKind::StaticCircle,
            ShapeKind::BigStaticCircle,
            ShapeKind::Rectangle,
            ShapeKind::StaticRectangle,
        ] {
            for noise in [false, true] {
                let shape = kind.spawn(BOUNDS, noise, &mut rng);
                assert!(BOUNDS.contains(shape.position()));
                assert_eq!(shape.policy(), kind.policy());
                assert_eq!(shape.paint().texture().is_some(), noise);
                let v = shape.agent().velocity;
                assert!(v.x >= 0 && v.y >= 0);
                assert!(shape.agent().acceleration.is_zero());
            }
        }
    }

    #[test]
    fn big_static_circle_uses_big_radius() {
        let mut rng = rng();
        let shape = ShapeKind::BigStaticCircle.spawn(BOUNDS, false, &mut rng);
        match shape.geometry() {
            Geometry::Circle { radius } => assert!((20..=100).contains(radius)),
            other => panic!("unexpected geometry {other:?}"),
        }
    }

    #[test]
    fn spawn_table_rejects_zero_weights() {
        assert!(matches!(
            SpawnTable::new(vec![(ShapeKind::Circle, 0)]).sampler(),
            Err(SimError::EmptySpawnTable)
        ));
        assert!(matches!(
            SpawnTable::new(Vec::new()).sampler(),
            Err(SimError::EmptySpawnTable)
        ));
    }

    #[test]
    fn size_override_replaces_preset_range() {
        let mut rng = rng();
        let table = SpawnTable::default()
            .with_size_range(ShapeKind::Circle, SizeRange::new(1, 2).unwrap())
            .with_size_range(ShapeKind::Circle, SizeRange::new(5, 5).unwrap());
        assert_eq!(table.size_range(ShapeKind::Circle), SizeRange { min: 5, max: 5 });
        assert_eq!(table.size_range(ShapeKind::Rectangle), SizeRange::RECTANGLE_SIDE);

        let sampler = table.sampler().unwrap();
        for _ in 0..20 {
            let shape = sampler.spawn(BOUNDS, false, &mut rng);
            assert_eq!(*shape.geometry(), Geometry::Circle { radius: 5 });
        }
    }

    #[test]
    fn sampler_rejects_inverted_size_override() {
        let table = SpawnTable::default()
            .with_size_range(ShapeKind::Circle, SizeRange { min: 9, max: 3 });
        assert!(matches!(
            table.sampler(),
            Err(SimError::InvalidSizeRange { min: 9, max: 3 })
        ));
    }

    #[test]
    fn default_table_only_spawns_free_circles() {
        let mut rng = rng();
        let table = SpawnTable::default();
        let sampler = table.sampler().unwrap();
        for _ in 0..50 {
            assert_eq!(sampler.pick(&mut rng), ShapeKind::Circle);
        }
    }
}
