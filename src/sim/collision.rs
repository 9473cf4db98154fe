//! Hourglass boundary resolution
//!
//! Sand lives inside two circles joined by a narrow neck. Each frame a sand
//! particle is:
//! 1. re-assigned to a bulb (top checked first, bottom wins when both match)
//! 2. clamped back inside its bulb's circle if it poked through the wall
//! 3. squeezed to the neck edge if it sits in the neck band outside the channel
//!
//! Steps 2 and 3 are independent; both can fire on the same frame.

use glam::Vec2;

use super::hourglass::{Bulb, HourglassGeometry};
use super::state::SandParticle;
use crate::consts::{BULB_RESTITUTION, NECK_RESTITUTION};

/// What the resolver touched this frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BoundaryContact {
    /// Particle was projected back onto its bulb wall
    pub bulb_wall: bool,
    /// Particle was pushed to the neck edge
    pub neck: bool,
}

impl BoundaryContact {
    pub fn any(&self) -> bool {
        self.bulb_wall || self.neck
    }
}

/// Update bulb membership from the particle's current position
///
/// The checks are not exclusive: in the overlap near the neck the bottom
/// bulb, evaluated last, wins. Outside both bulbs membership is unchanged.
pub fn update_membership(geometry: &HourglassGeometry, particle: &mut SandParticle) {
    if geometry.top_bulb().contains(particle.pos) {
        particle.bulb = Bulb::Top;
    }
    if geometry.bottom_bulb().contains(particle.pos) {
        particle.bulb = Bulb::Bottom;
    }
}

/// Keep a sand particle inside the hourglass
pub fn resolve_boundaries(
    geometry: &HourglassGeometry,
    particle: &mut SandParticle,
) -> BoundaryContact {
    let mut contact = BoundaryContact::default();

    update_membership(geometry, particle);

    // Wall of whichever bulb the particle belongs to
    let bulb = geometry.bulb(particle.bulb);
    let limit = bulb.radius - particle.radius;
    let offset = particle.pos - bulb.center;
    if offset.length() > limit {
        let angle = offset.y.atan2(offset.x);
        particle.pos = bulb.center + Vec2::new(angle.cos(), angle.sin()) * limit;
        particle.vel *= BULB_RESTITUTION;
        contact.bulb_wall = true;
    }

    // Neck channel
    let half_width = geometry.neck_half_width();
    let dx = particle.pos.x - geometry.center.x;
    if geometry.in_neck_band(particle.pos) && dx.abs() > half_width {
        particle.pos.x = geometry.center.x + dx.signum() * half_width;
        particle.vel.x *= NECK_RESTITUTION;
        contact.neck = true;
    }

    contact
}
