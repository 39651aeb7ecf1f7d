//! Shape generation for 2D primitives
//!
//! Everything is built in field coordinates (origin top-left, y down);
//! the pipeline maps to clip space.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::{Vertex, colors};
use crate::Rect;
use crate::session::{Phase, Snapshot};

/// Number of mowing stripes across the pitch
const STRIPES: u32 = 10;
/// Width of painted lines and goal outlines
const LINE_WIDTH: f32 = 3.0;

/// Generate vertices for a filled rectangle (two triangles)
pub fn rect(r: &Rect, color: [f32; 4]) -> Vec<Vertex> {
    let min = r.pos;
    let max = r.pos + r.size;
    vec![
        Vertex::new(min.x, min.y, color),
        Vertex::new(max.x, min.y, color),
        Vertex::new(min.x, max.y, color),
        Vertex::new(min.x, max.y, color),
        Vertex::new(max.x, min.y, color),
        Vertex::new(max.x, max.y, color),
    ]
}

/// Generate vertices for a rectangle outline drawn inside its bounds
pub fn rect_outline(r: &Rect, thickness: f32, color: [f32; 4]) -> Vec<Vertex> {
    let t = thickness.min(r.size.x / 2.0).min(r.size.y / 2.0);
    let Rect { pos, size } = *r;

    let edges = [
        Rect::new(pos, Vec2::new(size.x, t)),
        Rect::new(Vec2::new(pos.x, pos.y + size.y - t), Vec2::new(size.x, t)),
        Rect::new(Vec2::new(pos.x, pos.y + t), Vec2::new(t, size.y - 2.0 * t)),
        Rect::new(
            Vec2::new(pos.x + size.x - t, pos.y + t),
            Vec2::new(t, size.y - 2.0 * t),
        ),
    ];
    edges.iter().flat_map(|edge| rect(edge, color)).collect()
}

/// Generate vertices for a filled ellipse
pub fn ellipse(center: Vec2, radii: Vec2, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radii.x * theta1.cos(),
            center.y + radii.y * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radii.x * theta2.cos(),
            center.y + radii.y * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Generate vertices for a ring (hollow circle)
pub fn ring(
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    color: [f32; 4],
    segments: u32,
) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 6) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        let dir1 = Vec2::new(theta1.cos(), theta1.sin());
        let dir2 = Vec2::new(theta2.cos(), theta2.sin());
        let inner1 = center + dir1 * inner_radius;
        let outer1 = center + dir1 * outer_radius;
        let inner2 = center + dir2 * inner_radius;
        let outer2 = center + dir2 * outer_radius;

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

/// Pitch markings: stripes, halfway line, centre circle
fn pitch(field: &Rect) -> Vec<Vertex> {
    let mut vertices = rect(field, colors::PITCH);

    let stripe_w = field.size.x / STRIPES as f32;
    for i in (1..STRIPES).step_by(2) {
        let stripe = Rect::new(
            Vec2::new(field.pos.x + i as f32 * stripe_w, field.pos.y),
            Vec2::new(stripe_w, field.size.y),
        );
        vertices.extend(rect(&stripe, colors::PITCH_STRIPE));
    }

    let center = field.center();
    let halfway = Rect::new(
        Vec2::new(center.x - LINE_WIDTH / 2.0, field.pos.y),
        Vec2::new(LINE_WIDTH, field.size.y),
    );
    vertices.extend(rect(&halfway, colors::LINES));
    let circle_r = field.size.y * 0.15;
    vertices.extend(ring(center, circle_r - LINE_WIDTH, circle_r, colors::LINES, 48));
    vertices.extend(rect_outline(field, LINE_WIDTH, colors::LINES));

    vertices
}

/// Build the full frame for a snapshot, back to front
pub fn scene(snapshot: &Snapshot) -> Vec<Vertex> {
    let mut vertices = pitch(&snapshot.field);

    vertices.extend(rect_outline(&snapshot.left_goal, LINE_WIDTH, colors::GOAL));
    vertices.extend(rect_outline(&snapshot.right_goal, LINE_WIDTH, colors::GOAL));

    vertices.extend(rect(&snapshot.player, colors::PLAYER));
    vertices.extend(rect(&snapshot.opponent, colors::OPPONENT));

    let ball = &snapshot.ball;
    vertices.extend(ellipse(ball.center(), ball.size / 2.0, colors::BALL, 24));

    if snapshot.phase == Phase::Paused {
        vertices.extend(rect(&snapshot.field, colors::PAUSE_VEIL));
    }

    vertices
}
