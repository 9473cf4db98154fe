//! Simulator state and particle types
//!
//! The simulator owns particle and geometry state only. Score, timer and
//! levels belong to the session, which pushes level changes in through
//! `apply_level_up`.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::hourglass::{Bulb, HourglassGeometry};
use crate::consts::*;
use crate::error::ConfigResult;
use crate::settings::Settings;

/// Sand colors (0xRRGGBB), picked uniformly
pub const SAND_PALETTE: [u32; 5] = [0xDEB887, 0xD2B48C, 0xF4A460, 0xCD853F, 0xBC9A6A];

/// A grain of sand
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SandParticle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Index into `SAND_PALETTE`
    pub color: u8,
    /// Bulb whose wall this grain collides with
    pub bulb: Bulb,
}

impl SandParticle {
    /// New grain somewhere in the top bulb
    pub fn spawn<R: Rng + ?Sized>(rng: &mut R, geometry: &HourglassGeometry) -> Self {
        let top = geometry.top_bulb();
        let bulb_radius = top.radius;

        let angle = rng.random::<f32>() * TAU;
        let r = rng.random::<f32>() * bulb_radius * 0.8;
        let x = top.center.x + angle.cos() * r;
        let y = top.center.y + rng.random::<f32>() * bulb_radius - bulb_radius / 2.0;

        let vel = Vec2::new(
            (rng.random::<f32>() - 0.5) * 0.5,
            rng.random::<f32>() * 0.5,
        );
        let radius = rng.random::<f32>() * 2.0 + 1.0;
        let color = rng.random_range(0..SAND_PALETTE.len()) as u8;

        Self {
            pos: Vec2::new(x, y),
            vel,
            radius,
            color,
            bulb: Bulb::Top,
        }
    }

    pub fn rgb(&self) -> u32 {
        SAND_PALETTE[self.color as usize % SAND_PALETTE.len()]
    }
}

/// A collectible gold nugget
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoldParticle {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Sparkle phase (radians), drives the glow size
    pub sparkle: f32,
    pub collected: bool,
}

impl GoldParticle {
    /// New nugget dropped from the top bulb's exit row
    pub fn spawn<R: Rng + ?Sized>(id: u32, rng: &mut R, geometry: &HourglassGeometry) -> Self {
        let x = geometry.center.x + (rng.random::<f32>() - 0.5) * geometry.width;
        let y = geometry.top_bulb().center.y;
        let vel = Vec2::new(
            (rng.random::<f32>() - 0.5) * 2.0,
            rng.random::<f32>() * 2.0 + 1.0,
        );
        Self {
            id,
            pos: Vec2::new(x, y),
            vel,
            radius: rng.random::<f32>() * 3.0 + 2.0,
            sparkle: rng.random::<f32>() * TAU,
            collected: false,
        }
    }
}

/// Short-lived sparkle left behind by a collected nugget
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectParticle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// 1.0 on spawn, removed at 0
    pub life: f32,
    pub size: f32,
}

impl EffectParticle {
    pub fn spawn<R: Rng + ?Sized>(rng: &mut R, pos: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::new(
                (rng.random::<f32>() - 0.5) * 4.0,
                (rng.random::<f32>() - 0.5) * 4.0,
            ),
            life: 1.0,
            size: rng.random::<f32>() * 3.0 + 1.0,
        }
    }
}

/// A nugget picked up by `Simulator::collect_at`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collected {
    pub id: u32,
    pub pos: Vec2,
}

/// Result of `Simulator::flip`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlipOutcome {
    /// Orientation after the flip
    pub flipped: bool,
    /// Id of the nugget spawned by this flip, if any
    pub gold: Option<u32>,
}

fn unseeded_rng() -> Pcg32 {
    Pcg32::seed_from_u64(0)
}

/// Particle simulation for one hourglass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Simulator {
    pub geometry: HourglassGeometry,
    /// Visible area (width, height); culling uses the height
    pub bounds: Vec2,
    pub max_sand: usize,
    /// Fraction of `max_sand` placed in the top bulb on reset
    pub sand_level: f32,
    /// Per-frame spawn probability before the level multiplier
    pub flow_rate: f32,
    pub gravity: f32,
    /// Spawn multiplier, mirrored from the session
    pub level: u32,
    /// Hourglass upside down (gravity points up)
    pub flipped: bool,
    pub paused: bool,
    pub sand: Vec<SandParticle>,
    pub gold: Vec<GoldParticle>,
    pub effects: Vec<EffectParticle>,
    /// Values restored by `reset`
    base_flow_rate: f32,
    base_gravity: f32,
    seed: u64,
    next_id: u32,
    #[serde(skip, default = "unseeded_rng")]
    pub(crate) rng: Pcg32,
}

impl Simulator {
    /// Build from settings and fill the top bulb
    pub fn new(settings: &Settings) -> ConfigResult<Self> {
        settings.validate()?;
        let geometry = HourglassGeometry::new(
            settings.hourglass_center(),
            settings.hourglass_width,
            settings.hourglass_height,
        )?;

        let mut sim = Self {
            geometry,
            bounds: Vec2::new(settings.canvas_width, settings.canvas_height),
            max_sand: settings.max_sand,
            sand_level: settings.sand_level,
            flow_rate: settings.flow_rate,
            gravity: settings.gravity,
            level: 1,
            flipped: false,
            paused: false,
            sand: Vec::with_capacity(settings.max_sand),
            gold: Vec::new(),
            effects: Vec::new(),
            base_flow_rate: settings.flow_rate,
            base_gravity: settings.gravity,
            seed: settings.seed,
            next_id: 1,
            rng: Pcg32::seed_from_u64(settings.seed),
        };
        sim.fill_top_bulb();

        log::info!(
            "Simulator ready: {} grains, cap {}, seed {}",
            sim.sand.len(),
            sim.max_sand,
            sim.seed
        );
        Ok(sim)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Allocate a new gold particle ID
    fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Number of grains the top bulb starts with
    pub fn initial_sand_count(&self) -> usize {
        ((self.max_sand as f32 * self.sand_level).ceil() as usize).min(self.max_sand)
    }

    fn fill_top_bulb(&mut self) {
        let count = self.initial_sand_count();
        for _ in 0..count {
            let grain = SandParticle::spawn(&mut self.rng, &self.geometry);
            self.sand.push(grain);
        }
    }

    /// Add one grain if below the cap. Returns whether one was added.
    pub fn spawn_sand(&mut self) -> bool {
        if self.sand.len() >= self.max_sand {
            return false;
        }
        let grain = SandParticle::spawn(&mut self.rng, &self.geometry);
        self.sand.push(grain);
        true
    }

    /// Drop a gold nugget from the top bulb, returning its ID
    pub fn spawn_gold(&mut self) -> u32 {
        let id = self.next_entity_id();
        let nugget = GoldParticle::spawn(id, &mut self.rng, &self.geometry);
        self.gold.push(nugget);
        id
    }

    /// Sparkle burst at a collection point
    pub fn spawn_burst(&mut self, pos: Vec2) {
        for _ in 0..BURST_SIZE {
            let effect = EffectParticle::spawn(&mut self.rng, pos);
            self.effects.push(effect);
        }
    }

    /// Invert the hourglass; may drop a gold nugget
    pub fn flip(&mut self) -> FlipOutcome {
        self.flipped = !self.flipped;
        let gold = if self.rng.random::<f32>() < GOLD_CHANCE {
            Some(self.spawn_gold())
        } else {
            None
        };
        log::debug!("Flip -> flipped={}, gold={:?}", self.flipped, gold);
        FlipOutcome {
            flipped: self.flipped,
            gold,
        }
    }

    /// Mark every uncollected nugget within the pickup radius of `point`
    ///
    /// Already collected nuggets are never touched, so a second call at the
    /// same point returns nothing new.
    pub fn collect_at(&mut self, point: Vec2) -> Vec<Collected> {
        let mut collected = Vec::new();
        for nugget in self.gold.iter_mut().filter(|g| !g.collected) {
            if nugget.pos.distance(point) < PICKUP_RADIUS {
                nugget.collected = true;
                collected.push(Collected {
                    id: nugget.id,
                    pos: nugget.pos,
                });
            }
        }
        if !collected.is_empty() {
            log::debug!("Collected {} gold at {:?}", collected.len(), point);
        }
        collected
    }

    /// Freeze or resume physics
    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    /// Raise the level and apply the parameter deltas that come with it
    pub fn apply_level_up(&mut self, level: u32, flow_rate_delta: f32, gravity_delta: f32) {
        self.level = level;
        self.flow_rate += flow_rate_delta;
        self.gravity += gravity_delta;
    }

    /// Signed gravity for the current orientation
    pub fn signed_gravity(&self) -> f32 {
        if self.flipped { -self.gravity } else { self.gravity }
    }

    /// Per-frame spawn probability
    pub fn spawn_chance(&self) -> f32 {
        self.flow_rate * self.level as f32
    }

    /// Back to a freshly filled top bulb with the configured parameters
    ///
    /// The RNG keeps its stream; a reset does not replay the previous run.
    pub fn reset(&mut self) {
        self.sand.clear();
        self.gold.clear();
        self.effects.clear();
        self.flipped = false;
        self.paused = false;
        self.level = 1;
        self.flow_rate = self.base_flow_rate;
        self.gravity = self.base_gravity;
        self.fill_top_bulb();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sim_with_seed(seed: u64) -> Simulator {
        let settings = Settings {
            seed,
            ..Default::default()
        };
        Simulator::new(&settings).unwrap()
    }

    #[test]
    fn test_initial_fill_is_full_cap() {
        let sim = sim_with_seed(7);
        assert_eq!(sim.max_sand, 200);
        assert_eq!(sim.sand.len(), 200);
        assert!(sim.sand.iter().all(|p| p.bulb == Bulb::Top));
    }

    #[test]
    fn test_initial_fill_partial_level_rounds_up() {
        let settings = Settings {
            sand_level: 0.333,
            ..Default::default()
        };
        let sim = Simulator::new(&settings).unwrap();
        assert_eq!(sim.sand.len(), 67);
    }

    #[test]
    fn test_spawned_sand_ranges() {
        let sim = sim_with_seed(42);
        let top = sim.geometry.top_bulb();
        for p in &sim.sand {
            assert!((p.pos.x - top.center.x).abs() <= top.radius * 0.8);
            assert!((p.pos.y - top.center.y).abs() <= top.radius / 2.0);
            assert!(p.vel.x >= -0.25 && p.vel.x < 0.25);
            assert!(p.vel.y >= 0.0 && p.vel.y < 0.5);
            assert!(p.radius >= 1.0 && p.radius < 3.0);
            assert!((p.color as usize) < SAND_PALETTE.len());
        }
    }

    #[test]
    fn test_same_seed_same_particles() {
        let a = sim_with_seed(99);
        let b = sim_with_seed(99);
        for (pa, pb) in a.sand.iter().zip(&b.sand) {
            assert_eq!(pa.pos, pb.pos);
            assert_eq!(pa.vel, pb.vel);
            assert_eq!(pa.color, pb.color);
        }
        let c = sim_with_seed(100);
        assert!(a.sand.iter().zip(&c.sand).any(|(pa, pc)| pa.pos != pc.pos));
    }

    #[test]
    fn test_spawn_sand_respects_cap() {
        let mut sim = sim_with_seed(1);
        assert!(!sim.spawn_sand());
        assert_eq!(sim.sand.len(), sim.max_sand);
        sim.sand.pop();
        assert!(sim.spawn_sand());
        assert_eq!(sim.sand.len(), sim.max_sand);
    }

    #[test]
    fn test_gold_spawn_ranges_and_ids() {
        let mut sim = sim_with_seed(3);
        let first = sim.spawn_gold();
        let second = sim.spawn_gold();
        assert_eq!(second, first + 1);
        let g = sim.geometry;
        for nugget in &sim.gold {
            assert!((nugget.pos.x - g.center.x).abs() <= g.width / 2.0);
            assert_eq!(nugget.pos.y, g.top_bulb().center.y);
            assert!(nugget.vel.y >= 1.0 && nugget.vel.y < 3.0);
            assert!(nugget.radius >= 2.0 && nugget.radius < 5.0);
            assert!(!nugget.collected);
        }
    }

    #[test]
    fn test_flip_toggles_orientation() {
        let mut sim = sim_with_seed(5);
        assert_eq!(sim.signed_gravity(), 0.5);
        assert!(sim.flip().flipped);
        assert_eq!(sim.signed_gravity(), -0.5);
        assert!(!sim.flip().flipped);
    }

    #[test]
    fn test_flip_gold_chance_is_roughly_thirty_percent() {
        let mut sim = sim_with_seed(11);
        let spawned = (0..2000).filter(|_| sim.flip().gold.is_some()).count();
        assert!((450..750).contains(&spawned), "spawned {spawned}");
        assert_eq!(sim.gold.len(), spawned);
    }

    #[test]
    fn test_collect_at_exact_point_once() {
        let mut sim = sim_with_seed(8);
        let id = sim.spawn_gold();
        let pos = sim.gold[0].pos;

        let first = sim.collect_at(pos);
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].id, id);
        assert!(sim.gold[0].collected);

        let second = sim.collect_at(pos);
        assert!(second.is_empty());
    }

    #[test]
    fn test_collect_radius_is_strict() {
        let mut sim = sim_with_seed(8);
        sim.spawn_gold();
        let pos = sim.gold[0].pos;
        assert!(sim.collect_at(pos + Vec2::new(PICKUP_RADIUS, 0.0)).is_empty());
        assert_eq!(sim.collect_at(pos + Vec2::new(PICKUP_RADIUS - 0.5, 0.0)).len(), 1);
    }

    #[test]
    fn test_burst_spawns_effects() {
        let mut sim = sim_with_seed(2);
        sim.spawn_burst(Vec2::new(10.0, 20.0));
        assert_eq!(sim.effects.len(), BURST_SIZE);
        for e in &sim.effects {
            assert_eq!(e.pos, Vec2::new(10.0, 20.0));
            assert_eq!(e.life, 1.0);
            assert!(e.vel.x.abs() <= 2.0 && e.vel.y.abs() <= 2.0);
        }
    }

    #[test]
    fn test_level_up_and_reset() {
        let mut sim = sim_with_seed(4);
        sim.apply_level_up(2, FLOW_RATE_STEP, GRAVITY_STEP);
        assert_eq!(sim.level, 2);
        assert!((sim.flow_rate - 0.0015).abs() < 1e-7);
        assert!((sim.gravity - 0.6).abs() < 1e-6);
        assert!((sim.spawn_chance() - 0.003).abs() < 1e-7);

        sim.flip();
        sim.spawn_gold();
        sim.spawn_burst(Vec2::ZERO);
        sim.sand.truncate(10);
        sim.set_paused(true);

        sim.reset();
        assert_eq!(sim.level, 1);
        assert_eq!(sim.flow_rate, 0.001);
        assert_eq!(sim.gravity, 0.5);
        assert!(!sim.flipped);
        assert!(!sim.paused);
        assert!(sim.gold.is_empty());
        assert!(sim.effects.is_empty());
        assert_eq!(sim.sand.len(), 200);
    }

    #[test]
    fn test_rejects_bad_geometry() {
        let settings = Settings {
            hourglass_width: 0.0,
            ..Default::default()
        };
        assert!(Simulator::new(&settings).is_err());
    }

    #[test]
    fn test_rejects_oversized_cap_before_allocating() {
        let settings = Settings {
            max_sand: usize::MAX,
            ..Default::default()
        };
        assert!(matches!(
            Simulator::new(&settings),
            Err(crate::error::ConfigError::InvalidParameter { name: "max_sand", .. })
        ));
    }
}
