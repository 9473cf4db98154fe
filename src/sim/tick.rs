//! Per-frame simulation step
//!
//! `advance` is driven by the host with the real elapsed time. Motion is
//! tuned in 60 Hz frames, so velocities are scaled by `delta * 60`. Sand
//! spawning is a single Bernoulli trial per call and is not
//! scaled by delta.

use rand::Rng;

use super::collision::resolve_boundaries;
use super::state::{SandParticle, Simulator};
use crate::consts::*;
use crate::frame_scale;

/// What happened during one `advance`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepReport {
    /// A new grain was added
    pub spawned: bool,
    /// Grains dropped for leaving the visible area
    pub culled: usize,
    /// Grains clamped by a bulb wall or the neck
    pub contacts: usize,
    /// Gold removed this step (fell out or collected)
    pub gold_removed: usize,
}

/// Advance sand and gold by `delta` seconds
///
/// Does nothing while the simulator is paused. Gold motion is scaled by
/// `delta * 60` like sand, so it matches a fixed per-frame step only at 60 Hz.
/// Gold is only culled below the canvas; rising gold is kept.
pub fn advance(sim: &mut Simulator, delta: f32) -> StepReport {
    let mut report = StepReport::default();
    if sim.paused {
        return report;
    }

    let frames = frame_scale(delta);
    let gravity = sim.signed_gravity();
    let geometry = sim.geometry;
    let floor = sim.bounds.y + CULL_MARGIN;
    let ceiling = -CULL_MARGIN;

    // --- SAND ---
    let before = sim.sand.len();
    let mut contacts = 0;
    sim.sand.retain_mut(|grain| {
        step_sand(grain, gravity, frames);
        if resolve_boundaries(&geometry, grain).any() {
            contacts += 1;
        }
        grain.pos.y <= floor && grain.pos.y >= ceiling
    });
    report.culled = before - sim.sand.len();
    report.contacts = contacts;

    // --- GOLD ---
    let before = sim.gold.len();
    sim.gold.retain_mut(|nugget| {
        // Collected nuggets have already paid out
        if nugget.collected {
            return false;
        }
        nugget.vel.y += GOLD_GRAVITY * frames;
        nugget.pos += nugget.vel * frames;
        nugget.sparkle += SPARKLE_SPEED * frames;
        nugget.pos.y <= floor
    });
    report.gold_removed = before - sim.gold.len();

    // --- SPAWN ---
    if sim.sand.len() < sim.max_sand && sim.rng.random::<f32>() < sim.spawn_chance() {
        report.spawned = sim.spawn_sand();
    }

    report
}

/// Gravity, integration and drag for one grain
fn step_sand(grain: &mut SandParticle, gravity: f32, frames: f32) {
    grain.vel.y += gravity * frames;
    grain.pos += grain.vel * frames;
    grain.vel.x *= DRAG_X;
    grain.vel.y *= DRAG_Y;
}

/// Fade and shrink collection effects
///
/// Runs even while paused; effects are cosmetic. Motion, fade and shrink are
/// scaled by `delta * 60` rather than applied once per call.
pub fn advance_effects(sim: &mut Simulator, delta: f32) {
    let frames = frame_scale(delta);
    let shrink = EFFECT_SHRINK.powf(frames);
    sim.effects.retain_mut(|effect| {
        effect.pos += effect.vel * frames;
        effect.life -= EFFECT_FADE * frames;
        effect.size *= shrink;
        effect.life > 0.0
    });
}
