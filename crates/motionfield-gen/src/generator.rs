//! Sequence and batch generation on top of [`World`].
//!
//! A [`SequenceGenerator`] turns a [`GeneratorConfig`] into a stream of
//! [`Batch`]es. Each sequence builds a fresh world with a randomly chosen
//! [`SceneVariant`], then for every frame calls `draw`, `draw_motion_map` and
//! `update` in that order.
//!
//! Sequences of one batch are generated in parallel with `rayon`. Every
//! sequence has its own seed derived from the master seed, the batch index
//! and the sequence index, so the output does not depend on the thread
//! schedule.

use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

use image::RgbImage;
use motionfield_core::prelude::*;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use rayon::prelude::*;
use tracing::{debug, trace};

use crate::batch::Batch;
use crate::GenError;

// ---------------------------------------------------------------------------
// Scene variants
// ---------------------------------------------------------------------------

/// Per-sequence choice of noise texturing for shapes and background.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneVariant {
    /// Noise-textured shapes over a random flat background.
    NoisyShapes,
    /// Flat shapes over a noise background.
    NoiseBackground,
    /// Flat shapes over a random flat background.
    Plain,
    /// Noise-textured shapes over a noise background.
    NoiseEverywhere,
}

impl SceneVariant {
    pub const ALL: [SceneVariant; 4] = [
        SceneVariant::NoisyShapes,
        SceneVariant::NoiseBackground,
        SceneVariant::Plain,
        SceneVariant::NoiseEverywhere,
    ];

    /// Uniform pick over [`ALL`](Self::ALL), or always
    /// [`NoiseEverywhere`](Self::NoiseEverywhere) when `all_noise` is set.
    pub fn pick<R: Rng + ?Sized>(rng: &mut R, all_noise: bool) -> Self {
        if all_noise {
            return SceneVariant::NoiseEverywhere;
        }
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }

    pub fn noisy_shapes(self) -> bool {
        matches!(self, SceneVariant::NoisyShapes | SceneVariant::NoiseEverywhere)
    }

    pub fn background(self) -> BackgroundSpec {
        match self {
            SceneVariant::NoiseBackground | SceneVariant::NoiseEverywhere => BackgroundSpec::Noise,
            SceneVariant::NoisyShapes | SceneVariant::Plain => BackgroundSpec::Random,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SceneVariant::NoisyShapes => "noisy-shapes",
            SceneVariant::NoiseBackground => "noise-background",
            SceneVariant::Plain => "plain",
            SceneVariant::NoiseEverywhere => "noise-everywhere",
        }
    }
}

impl fmt::Display for SceneVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Motion-map grid size, parsed from `"RxC"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapSize {
    pub rows: usize,
    pub cols: usize,
}

impl MapSize {
    pub const fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }
}

impl FromStr for MapSize {
    type Err = GenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || GenError::InvalidMapSize(s.to_owned());
        let (rows, cols) = s.trim().split_once(['x', 'X']).ok_or_else(invalid)?;
        let rows = rows.trim().parse().map_err(|_| invalid())?;
        let cols = cols.trim().parse().map_err(|_| invalid())?;
        Ok(Self::new(rows, cols))
    }
}

impl fmt::Display for MapSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}

/// Parameters shared by every sequence a generator produces.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Frames per sequence.
    pub num_frames: usize,
    pub map_size: MapSize,
    pub sequences_per_batch: usize,
    pub world_size: Dimensions,
    pub view_size: Dimensions,
    pub population: Population,
    /// Force [`SceneVariant::NoiseEverywhere`] for every sequence.
    pub all_noise: bool,
    /// Spawn from [`SpawnTable::mixed`] instead of free circles only.
    pub mixed_shapes: bool,
    /// Master seed; `None` draws one from entropy at construction.
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            num_frames: 15,
            map_size: MapSize::new(32, 32),
            sequences_per_batch: 5,
            world_size: Dimensions::new(800, 800),
            view_size: Dimensions::new(400, 400),
            population: Population::Count(400),
            all_noise: false,
            mixed_shapes: false,
            seed: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Sequence
// ---------------------------------------------------------------------------

/// Wall-clock time spent per generation stage.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SequenceDiagnostics {
    /// World construction.
    pub build_time: Duration,
    pub draw_time: Duration,
    pub map_time: Duration,
    pub update_time: Duration,
    pub total_time: Duration,
}

impl SequenceDiagnostics {
    /// Sum of per-stage times across sequences.
    pub fn accumulate(&mut self, other: &SequenceDiagnostics) {
        self.build_time += other.build_time;
        self.draw_time += other.draw_time;
        self.map_time += other.map_time;
        self.update_time += other.update_time;
        self.total_time += other.total_time;
    }
}

/// One simulated clip: aligned frames and motion maps.
#[derive(Debug, Clone)]
pub struct Sequence {
    /// Seed the sequence was generated from.
    pub seed: u64,
    pub variant: SceneVariant,
    pub frames: Vec<RgbImage>,
    pub maps: Vec<MotionMap>,
    pub diagnostics: SequenceDiagnostics,
}

impl Sequence {
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Fraction of motion-map cells set to 1 across all frames.
    pub fn marked_fraction(&self) -> f64 {
        let total: usize = self.maps.iter().map(|m| m.as_slice().len()).sum();
        if total == 0 {
            return 0.0;
        }
        let marked: usize = self.maps.iter().map(MotionMap::marked_count).sum();
        marked as f64 / total as f64
    }
}

// ---------------------------------------------------------------------------
// SequenceGenerator
// ---------------------------------------------------------------------------

/// Produces batches of sequences from one master seed.
pub struct SequenceGenerator {
    config: GeneratorConfig,
    master_seed: u64,
}

impl SequenceGenerator {
    /// Validate `config` and fix the master seed.
    pub fn new(config: GeneratorConfig) -> Result<Self, GenError> {
        if config.num_frames == 0 {
            return Err(GenError::ZeroFrames);
        }
        if config.sequences_per_batch == 0 {
            return Err(GenError::ZeroSequences);
        }
        if config.map_size.rows == 0 || config.map_size.cols == 0 {
            return Err(GenError::InvalidMapSize(config.map_size.to_string()));
        }
        let master_seed = config.seed.unwrap_or_else(rand::random);
        debug!(
            master_seed,
            frames = config.num_frames,
            sequences = config.sequences_per_batch,
            world = %config.world_size,
            view = %config.view_size,
            map = %config.map_size,
            "sequence generator ready"
        );
        Ok(Self {
            config,
            master_seed,
        })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn master_seed(&self) -> u64 {
        self.master_seed
    }

    /// Seed of sequence `sequence` in batch `batch`.
    pub fn sequence_seed(&self, batch: u64, sequence: u64) -> u64 {
        derive_seed(self.master_seed, batch, sequence)
    }

    /// World parameters for one sequence.
    pub fn world_config(&self, variant: SceneVariant, world_seed: u64) -> WorldConfig {
        WorldConfig {
            size: self.config.world_size,
            population: self.config.population.clone(),
            background: variant.background(),
            view_size: self.config.view_size,
            view: None,
            all_noise: variant.noisy_shapes(),
            spawn_table: if self.config.mixed_shapes {
                SpawnTable::mixed()
            } else {
                SpawnTable::default()
            },
            seed: Some(world_seed),
        }
    }

    /// Simulate one sequence from `seed`.
    pub fn generate_sequence(&self, seed: u64) -> Result<Sequence, GenError> {
        let start = Instant::now();
        let mut rng = Pcg64::seed_from_u64(seed);
        let variant = SceneVariant::pick(&mut rng, self.config.all_noise);

        let mut diagnostics = SequenceDiagnostics::default();
        let mut world = World::new(self.world_config(variant, rng.gen()))?;
        diagnostics.build_time = start.elapsed();

        let MapSize { rows, cols } = self.config.map_size;
        let mut frames = Vec::with_capacity(self.config.num_frames);
        let mut maps = Vec::with_capacity(self.config.num_frames);
        for _ in 0..self.config.num_frames {
            let t = Instant::now();
            frames.push(world.draw());
            diagnostics.draw_time += t.elapsed();

            let t = Instant::now();
            maps.push(world.draw_motion_map(rows, cols));
            diagnostics.map_time += t.elapsed();

            let t = Instant::now();
            world.update();
            diagnostics.update_time += t.elapsed();
        }
        diagnostics.total_time = start.elapsed();

        trace!(
            seed,
            %variant,
            agents = world.agents().len(),
            elapsed_ms = diagnostics.total_time.as_millis() as u64,
            "sequence generated"
        );

        Ok(Sequence {
            seed,
            variant,
            frames,
            maps,
            diagnostics,
        })
    }

    /// Generate batch `index`, one rayon task per sequence.
    pub fn generate_batch(&self, index: u64) -> Result<Batch, GenError> {
        let start = Instant::now();
        let sequences = (0..self.config.sequences_per_batch)
            .into_par_iter()
            .map(|s| self.generate_sequence(self.sequence_seed(index, s as u64)))
            .collect::<Result<Vec<_>, _>>()?;
        debug!(
            batch = index,
            sequences = sequences.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "batch generated"
        );
        Ok(Batch::new(index, sequences))
    }

    /// Batches `0..count`, generated lazily.
    pub fn batches(&self, count: u64) -> impl Iterator<Item = Result<Batch, GenError>> + '_ {
        (0..count).map(move |index| self.generate_batch(index))
    }
}

/// Mix the master seed with batch and sequence indices (SplitMix64 finalizer).
fn derive_seed(master: u64, batch: u64, sequence: u64) -> u64 {
    let mut z = master
        ^ batch.wrapping_add(1).wrapping_mul(0x9e37_79b9_7f4a_7c15)
        ^ sequence.wrapping_add(1).wrapping_mul(0xd1b5_4a32_d192_ed03);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
