//! The world compositor: agents, background, view and the owned RNG.
//!
//! A [`World`] is built once per simulated sequence from a [`WorldConfig`].
//! Per tick an orchestrator calls the draw methods, which only read state,
//! and then [`World::update`], which advances the view and replaces every
//! shape with its independently stepped successor.
//!
//! # Compositing rules
//!
//! - [`World::draw`] renders moving shapes first and still shapes second, so
//!   still shapes win wherever footprints overlap.
//! - [`World::draw_motion_mask`] renders moving shapes (white) into one
//!   buffer and still shapes into another, then zeroes every byte of the
//!   moving buffer that equals the still buffer at the same position.
//! - [`World::draw_motion_map`] marks the grid cell of each moving agent
//!   inside the view.
//!
//! All three outputs are cropped to (or expressed relative to) the view.

use std::fmt;
use std::str::FromStr;

use image::{Rgb, RgbImage};
use rand::{Rng, SeedableRng};
use rand_distr::{Binomial, Distribution};
use rand_pcg::Pcg64;
use tracing::{debug, trace, warn};

use crate::agent::{Bounds, Vec2};
use crate::motion_map::MotionMap;
use crate::raster::{self, BLACK};
use crate::shape::{Shape, SpawnTable};
use crate::view::View;
use crate::SimError;

/// Auto-density draws this many agents per 100×100 area, at least.
const MIN_DENSITY: u64 = 25;
/// Auto-density draws this many agents per 100×100 area, at most.
const MAX_DENSITY: u64 = 75;
/// Area the density is expressed against.
const DENSITY_AREA: f64 = 100.0 * 100.0;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// How the initial agent collection is produced.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Population {
    /// Derive the count from the canvas area at a random density.
    #[default]
    Auto,
    /// Spawn exactly this many agents from the spawn table.
    Count(usize),
    /// Use these shapes as given.
    Explicit(Vec<Shape>),
}

impl FromStr for Population {
    type Err = SimError;

    /// `"auto"` or a non-negative agent count.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("auto") {
            return Ok(Population::Auto);
        }
        s.parse::<usize>()
            .map(Population::Count)
            .map_err(|_| SimError::InvalidPopulation(s.to_owned()))
    }
}

/// Requested background, resolved at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackgroundSpec {
    /// A random flat color.
    #[default]
    Random,
    Solid(Rgb<u8>),
    /// A fixed random-noise canvas generated once.
    Noise,
}

impl FromStr for BackgroundSpec {
    type Err = SimError;

    /// `"random"`, `"noise"`, or `"r,g,b"` with components in `0..=255`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "random" => return Ok(BackgroundSpec::Random),
            "noise" => return Ok(BackgroundSpec::Noise),
            _ => {}
        }
        let parts: Vec<&str> = trimmed.split(',').map(str::trim).collect();
        if parts.len() != 3 {
            return Err(SimError::InvalidColor(s.to_owned()));
        }
        let mut rgb = [0u8; 3];
        for (slot, part) in rgb.iter_mut().zip(&parts) {
            *slot = part
                .parse::<u8>()
                .map_err(|_| SimError::InvalidColor(s.to_owned()))?;
        }
        Ok(BackgroundSpec::Solid(Rgb(rgb)))
    }
}

/// A `width × height` pair, parsed from `"WxH"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl FromStr for Dimensions {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (w, h) = s
            .trim()
            .split_once(['x', 'X'])
            .ok_or_else(|| SimError::InvalidSize(s.to_owned()))?;
        let parse = |v: &str| {
            v.trim()
                .parse::<u32>()
                .map_err(|_| SimError::InvalidSize(s.to_owned()))
        };
        Ok(Self::new(parse(w)?, parse(h)?))
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Construction parameters for a [`World`].
#[derive(Debug, Clone)]
pub struct WorldConfig {
    pub size: Dimensions,
    pub population: Population,
    pub background: BackgroundSpec,
    /// Size of the centered view. Ignored when `view` is set.
    pub view_size: Dimensions,
    /// Explicit view, used as given.
    pub view: Option<View>,
    /// Give every generated shape a noise texture instead of a flat color.
    pub all_noise: bool,
    pub spawn_table: SpawnTable,
    /// RNG seed; `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for WorldConfig {
    /// An 800×800 world with a centered 400×400 view and auto density.
    fn default() -> Self {
        Self {
            size: Dimensions::new(800, 800),
            population: Population::Auto,
            background: BackgroundSpec::Random,
            view_size: Dimensions::new(400, 400),
            view: None,
            all_noise: false,
            spawn_table: SpawnTable::default(),
            seed: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Background
// ---------------------------------------------------------------------------

/// Resolved background.
#[derive(Debug, Clone, PartialEq)]
pub enum Background {
    Solid(Rgb<u8>),
    Noise(RgbImage),
}

impl Background {
    /// A fresh full-canvas buffer holding the background.
    fn canvas(&self, bounds: Bounds) -> RgbImage {
        match self {
            Background::Solid(color) => RgbImage::from_pixel(bounds.width, bounds.height, *color),
            Background::Noise(noise) => noise.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// World
// ---------------------------------------------------------------------------

/// The simulated canvas and the view cropped out of it.
pub struct World {
    bounds: Bounds,
    background: Background,
    agents: Vec<Shape>,
    view: View,
    rng: Pcg64,
    tick_counter: u64,
}

impl World {
    /// Build a world, validating the configuration.
    ///
    /// Fails without producing a partial world when the canvas is empty, the
    /// view does not fit, an explicit shape lies off-canvas, or the spawn
    /// table has no positive weight.
    pub fn new(config: WorldConfig) -> Result<Self, SimError> {
        let WorldConfig {
            size,
            population,
            background,
            view_size,
            view,
            all_noise,
            spawn_table,
            seed,
        } = config;

        if size.width == 0 || size.height == 0 {
            return Err(SimError::EmptyWorld {
                width: size.width,
                height: size.height,
            });
        }
        let bounds = Bounds::new(size.width, size.height);

        let view = match view {
            Some(view) => {
                check_view_size(bounds, view.width(), view.height())?;
                if !view.fits(bounds) {
                    let (top_left, bottom_right) = view.corners();
                    return Err(SimError::ViewOutOfBounds {
                        top_left,
                        bottom_right,
                        width: bounds.width,
                        height: bounds.height,
                    });
                }
                view
            }
            None => {
                check_view_size(bounds, view_size.width, view_size.height)?;
                View::centered(bounds, view_size.width, view_size.height)
            }
        };

        let seed = seed.unwrap_or_else(rand::random);
        let mut rng = Pcg64::seed_from_u64(seed);

        let agents = match population {
            Population::Explicit(shapes) => {
                for (index, shape) in shapes.iter().enumerate() {
                    if !bounds.contains(shape.position()) {
                        let Vec2 { x, y } = shape.position();
                        return Err(SimError::AgentOutOfBounds {
                            index,
                            x,
                            y,
                            width: bounds.width,
                            height: bounds.height,
                        });
                    }
                }
                shapes
            }
            Population::Count(count) => {
                spawn_population(count, bounds, &spawn_table, all_noise, &mut rng)?
            }
            Population::Auto => {
                let count = auto_population(bounds, &mut rng);
                spawn_population(count, bounds, &spawn_table, all_noise, &mut rng)?
            }
        };
        if agents.is_empty() {
            warn!("world has no agents; every motion map will be empty");
        }

        let background = match background {
            BackgroundSpec::Random => Background::Solid(raster::random_color(&mut rng)),
            BackgroundSpec::Solid(color) => Background::Solid(color),
            BackgroundSpec::Noise => {
                Background::Noise(raster::noise_canvas(bounds.width, bounds.height, &mut rng))
            }
        };

        debug!(
            seed,
            width = bounds.width,
            height = bounds.height,
            agents = agents.len(),
            noise_background = matches!(background, Background::Noise(_)),
            view = ?view.corners(),
            "world created"
        );

        Ok(Self {
            bounds,
            background,
            agents,
            view,
            rng,
            tick_counter: 0,
        })
    }

    // -- frame outputs ------------------------------------------------------

    /// The visible frame: background, moving shapes, then still shapes,
    /// cropped to the view.
    pub fn draw(&self) -> RgbImage {
        let mut canvas = self.background.canvas(self.bounds);
        for shape in self.agents.iter().filter(|s| s.is_moving()) {
            shape.render(&mut canvas, None);
        }
        for shape in self.agents.iter().filter(|s| !s.is_moving()) {
            shape.render(&mut canvas, None);
        }
        self.crop_to_view(&canvas)
    }

    /// White where moving shapes are, minus bytes that coincide with the
    /// still-shape mask, cropped to the view.
    pub fn draw_motion_mask(&self) -> RgbImage {
        let mut still = RgbImage::from_pixel(self.bounds.width, self.bounds.height, BLACK);
        let mut moving = still.clone();
        for shape in &self.agents {
            shape.draw_static_mask(&mut still);
            shape.draw_motion_mask(&mut moving);
        }
        for (m, s) in moving.iter_mut().zip(still.iter()) {
            if *m == *s {
                *m = 0;
            }
        }
        self.crop_to_view(&moving)
    }

    /// `rows × cols` grid with a 1 in the cell of every moving agent inside
    /// the view.
    pub fn draw_motion_map(&self, rows: usize, cols: usize) -> MotionMap {
        let mut map = MotionMap::zeros(rows, cols);
        for shape in &self.agents {
            if let Some((row, col)) = shape.agent().sector(&self.view, rows, cols) {
                map.mark(row, col);
            }
        }
        map
    }

    fn crop_to_view(&self, canvas: &RgbImage) -> RgbImage {
        let (tl, _) = self.view.corners();
        raster::crop(
            canvas,
            (tl.x as u32, tl.y as u32),
            self.view.width(),
            self.view.height(),
        )
    }

    // -- simulation ---------------------------------------------------------

    /// Advance the view, then every shape, by one tick.
    pub fn update(&mut self) {
        self.view.update(self.bounds);
        let bounds = self.bounds;
        let rng = &mut self.rng;
        self.agents = self.agents.iter().map(|s| s.step(bounds, rng)).collect();
        self.tick_counter += 1;
        trace!(
            tick = self.tick_counter,
            moving = self.moving_count(),
            "world updated"
        );
    }

    /// Run `count` updates.
    pub fn run_ticks(&mut self, count: u64) {
        for _ in 0..count {
            self.update();
        }
    }

    // -- accessors ----------------------------------------------------------

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn agents(&self) -> &[Shape] {
        &self.agents
    }

    pub fn background(&self) -> &Background {
        &self.background
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    /// Mutable view access, for queueing shakes and pans.
    pub fn view_mut(&mut self) -> &mut View {
        &mut self.view
    }

    /// Number of updates executed so far.
    pub fn tick_count(&self) -> u64 {
        self.tick_counter
    }

    pub fn moving_count(&self) -> usize {
        self.agents.iter().filter(|s| s.is_moving()).count()
    }
}

/// Each view side must be strictly smaller than the canvas side, so that the
/// high-edge clamp against `limit - 1` keeps the low edge non-negative.
fn check_view_size(bounds: Bounds, width: u32, height: u32) -> Result<(), SimError> {
    if width == 0 || height == 0 || width >= bounds.width || height >= bounds.height {
        return Err(SimError::ViewTooLarge {
            view_width: width,
            view_height: height,
            width: bounds.width,
            height: bounds.height,
        });
    }
    Ok(())
}

/// Agent count for a random density in `[25, 75]` per 100×100 area.
fn auto_population<R: Rng + ?Sized>(bounds: Bounds, rng: &mut R) -> usize {
    let density = Binomial::new(MAX_DENSITY - MIN_DENSITY, 0.5)
        .expect("p = 0.5 is a valid binomial probability")
        .sample(rng)
        + MIN_DENSITY;
    let area = bounds.width as f64 * bounds.height as f64;
    (area / DENSITY_AREA * density as f64) as usize
}

fn spawn_population<R: Rng + ?Sized>(
    count: usize,
    bounds: Bounds,
    table: &SpawnTable,
    noise: bool,
    rng: &mut R,
) -> Result<Vec<Shape>, SimError> {
    let sampler = table.sampler()?;
    Ok((0..count)
        .map(|_| sampler.spawn(bounds, noise, rng))
        .collect())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
