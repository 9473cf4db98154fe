//! Frame building
//!
//! Turns simulator and session state into one triangle list, painted back to
//! front: background, hourglass frame, sand, gold, collection effects.

use glam::Vec2;

use super::shapes::{circle, circle_stroke, line, outline, quad, radial_gradient, segments_for};
use super::vertex::{Vertex, colors, rgba};
use crate::consts::NECK_HALF_HEIGHT;
use crate::rotate_about;
use crate::session::Session;
use crate::sim::{HourglassGeometry, Simulator};

const BUBBLE_COUNT: usize = 5;
const BUBBLE_RADIUS: f32 = 20.0;
const BUBBLE_SPACING: f32 = 200.0;

const FRAME_STROKE: f32 = 4.0;
const RING_STROKE: f32 = 2.0;
const RING_COUNT: usize = 3;
const RING_SPACING: f32 = 15.0;
const RING_INSET: f32 = 10.0;

const GOLD_GLOW: f32 = 10.0;
const SPARKLE_ARM: f32 = 8.0;
const SPARKLE_STROKE: f32 = 2.0;

/// Everything visible this frame; `time_ms` drives the drifting bubbles
pub fn build_frame(sim: &Simulator, session: &Session, time_ms: f64) -> Vec<Vertex> {
    let mut vertices = background(sim.bounds, time_ms);
    vertices.extend(hourglass(&sim.geometry, session.flip_angle()));
    vertices.extend(particles(sim));
    vertices
}

/// Radial gradient over the canvas plus slowly bobbing bubbles
pub fn background(bounds: Vec2, time_ms: f64) -> Vec<Vertex> {
    let center = bounds / 2.0;
    let edge = rgba(colors::BACKGROUND_EDGE, 1.0);

    // Outer color fills the corners the gradient disc does not reach
    let mut vertices = quad(
        [
            Vec2::ZERO,
            Vec2::new(bounds.x, 0.0),
            bounds,
            Vec2::new(0.0, bounds.y),
        ],
        edge,
    );
    vertices.extend(radial_gradient(
        center,
        bounds.x / 2.0,
        rgba(colors::BACKGROUND_CENTER, 1.0),
        edge,
        64,
    ));

    let bubble = rgba(colors::BUBBLE, colors::BUBBLE_ALPHA);
    let t = (time_ms * 0.001) as f32;
    for i in 0..BUBBLE_COUNT {
        let x = (i as f32 * BUBBLE_SPACING + 100.0) % bounds.x.max(1.0);
        let y = 50.0 + (t + i as f32).sin() * 30.0;
        vertices.extend(circle(
            Vec2::new(x, y),
            BUBBLE_RADIUS,
            bubble,
            segments_for(BUBBLE_RADIUS),
        ));
    }

    vertices
}

/// Hourglass frame, rotated by `angle` around its center
pub fn hourglass(geometry: &HourglassGeometry, angle: f32) -> Vec<Vertex> {
    let c = geometry.center;
    let fill = rgba(colors::FRAME, colors::FRAME_FILL_ALPHA);
    let stroke = rgba(colors::FRAME, 1.0);
    let ring_color = rgba(colors::RING, 1.0);

    let mut vertices = Vec::new();

    for bulb in [geometry.top_bulb(), geometry.bottom_bulb()] {
        vertices.extend(circle(
            bulb.center,
            bulb.radius,
            fill,
            segments_for(bulb.radius),
        ));
        vertices.extend(circle_stroke(bulb.center, bulb.radius, FRAME_STROKE, stroke));
    }

    // Drawn neck is wider than the collision channel
    let hw = geometry.width / 6.0;
    let hh = NECK_HALF_HEIGHT;
    let neck = [
        c + Vec2::new(-hw, -hh),
        c + Vec2::new(-hw, hh),
        c + Vec2::new(hw, hh),
        c + Vec2::new(hw, -hh),
    ];
    vertices.extend(quad(neck, fill));
    vertices.extend(outline(&neck, FRAME_STROKE, stroke));

    let ring_radius = geometry.width / 2.0 + 5.0;
    for i in 0..RING_COUNT {
        let offset = geometry.height / 2.0 - RING_INSET - i as f32 * RING_SPACING;
        for y in [-offset, offset] {
            vertices.extend(circle_stroke(
                c + Vec2::new(0.0, y),
                ring_radius,
                RING_STROKE,
                ring_color,
            ));
        }
    }

    if angle != 0.0 {
        for v in &mut vertices {
            let p = rotate_about(Vec2::from(v.position), c, angle);
            v.position = p.to_array();
        }
    }

    vertices
}

/// Sand, uncollected gold and collection effects
pub fn particles(sim: &Simulator) -> Vec<Vertex> {
    let mut vertices = Vec::new();

    for grain in &sim.sand {
        vertices.extend(circle(
            grain.pos,
            grain.radius,
            rgba(grain.rgb(), 1.0),
            8,
        ));
    }

    let gold = rgba(colors::GOLD, 1.0);
    let sparkle = rgba(colors::SPARKLE, 1.0);
    for nugget in sim.gold.iter().filter(|g| !g.collected) {
        let size = nugget.radius + 2.0 + nugget.sparkle.sin();
        let mut glow = gold;
        glow[3] = 0.0;
        vertices.extend(radial_gradient(
            nugget.pos,
            size + GOLD_GLOW,
            [gold[0], gold[1], gold[2], 0.6],
            glow,
            segments_for(size + GOLD_GLOW),
        ));
        vertices.extend(circle(nugget.pos, size, gold, segments_for(size)));

        let arm_x = Vec2::new(SPARKLE_ARM, 0.0);
        let arm_y = Vec2::new(0.0, SPARKLE_ARM);
        vertices.extend(line(nugget.pos - arm_x, nugget.pos + arm_x, SPARKLE_STROKE, sparkle));
        vertices.extend(line(nugget.pos - arm_y, nugget.pos + arm_y, SPARKLE_STROKE, sparkle));
    }

    for effect in &sim.effects {
        vertices.extend(circle(
            effect.pos,
            effect.size,
            rgba(colors::GOLD, effect.life.clamp(0.0, 1.0)),
            8,
        ));
    }

    vertices
}
