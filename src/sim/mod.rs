//! Deterministic particle simulation
//!
//! Sand, gold and collection effects for one hourglass. This module must stay
//! free of rendering and platform code:
//! - Explicit `advance(delta)` steps, no hidden scheduling
//! - Seeded RNG only
//! - Session rules (score, timer) live outside

pub mod collision;
pub mod hourglass;
pub mod state;
pub mod tick;

pub use collision::{BoundaryContact, resolve_boundaries, update_membership};
pub use hourglass::{Bulb, BulbCircle, HourglassGeometry};
pub use state::{
    Collected, EffectParticle, FlipOutcome, GoldParticle, SAND_PALETTE, SandParticle, Simulator,
};
pub use tick::{StepReport, advance, advance_effects};
