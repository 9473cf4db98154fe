//! Shape generation for 2D primitives
//!
//! Every shape is emitted as a plain triangle list in canvas units.

use glam::Vec2;
use std::f32::consts::TAU;

use super::vertex::Vertex;

/// Segment count giving smooth edges at the given radius
pub fn segments_for(radius: f32) -> u32 {
    ((radius * 0.75) as u32).clamp(8, 64)
}

fn unit(i: u32, segments: u32) -> Vec2 {
    Vec2::from_angle(i as f32 / segments as f32 * TAU)
}

/// Filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    radial_gradient(center, radius, color, color, segments)
}

/// Filled circle blending from `inner` at the center to `outer` at the rim
pub fn radial_gradient(
    center: Vec2,
    radius: f32,
    inner: [f32; 4],
    outer: [f32; 4],
    segments: u32,
) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let a = center + unit(i, segments) * radius;
        let b = center + unit(i + 1, segments) * radius;

        vertices.push(Vertex::new(center.x, center.y, inner));
        vertices.push(Vertex::new(a.x, a.y, outer));
        vertices.push(Vertex::new(b.x, b.y, outer));
    }

    vertices
}

/// Ring (hollow circle)
pub fn ring(
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    color: [f32; 4],
    segments: u32,
) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 6) as usize);

    for i in 0..segments {
        let d1 = unit(i, segments);
        let d2 = unit(i + 1, segments);
        let inner1 = center + d1 * inner_radius;
        let outer1 = center + d1 * outer_radius;
        let inner2 = center + d2 * inner_radius;
        let outer2 = center + d2 * outer_radius;

        // Two triangles per segment
        vertices.push(Vertex::new(inner1.x, inner1.y, color));
        vertices.push(Vertex::new(outer1.x, outer1.y, color));
        vertices.push(Vertex::new(inner2.x, inner2.y, color));

        vertices.push(Vertex::new(inner2.x, inner2.y, color));
        vertices.push(Vertex::new(outer1.x, outer1.y, color));
        vertices.push(Vertex::new(outer2.x, outer2.y, color));
    }

    vertices
}

/// Circle outline of `width` centered on `radius`, like a canvas stroke
pub fn circle_stroke(center: Vec2, radius: f32, width: f32, color: [f32; 4]) -> Vec<Vertex> {
    let half = width / 2.0;
    ring(
        center,
        (radius - half).max(0.0),
        radius + half,
        color,
        segments_for(radius),
    )
}

/// Convex quad from corners in winding order
pub fn quad(corners: [Vec2; 4], color: [f32; 4]) -> Vec<Vertex> {
    let [a, b, c, d] = corners;
    [a, b, c, a, c, d]
        .iter()
        .map(|p| Vertex::new(p.x, p.y, color))
        .collect()
}

/// Line segment of the given width
pub fn line(from: Vec2, to: Vec2, width: f32, color: [f32; 4]) -> Vec<Vertex> {
    let dir = (to - from).normalize_or_zero();
    let perp = dir.perp() * (width / 2.0);
    quad([from + perp, to + perp, to - perp, from - perp], color)
}

/// Closed polyline outline
pub fn outline(points: &[Vec2], width: f32, color: [f32; 4]) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(points.len() * 6);
    for (i, &from) in points.iter().enumerate() {
        let to = points[(i + 1) % points.len()];
        vertices.extend(line(from, to, width, color));
    }
    vertices
}
