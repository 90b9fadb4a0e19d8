use bytemuck::{cast_slice, Pod, Zeroable};

use super::simulation::ParticleField;
use crate::surface::{RenderSurface, Rgba};

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct CircleInstance {
    pub center: [f32; 2],
    pub radius: f32,
    pub alpha: f32,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct LineSegment {
    pub from: [f32; 2],
    pub to: [f32; 2],
    pub alpha: f32,
    pub width: f32,
    _pad: [f32; 2],
}

impl LineSegment {
    pub fn new(from: [f32; 2], to: [f32; 2], alpha: f32, width: f32) -> Self {
        Self {
            from,
            to,
            alpha,
            width,
            _pad: [0.0; 2],
        }
    }
}

/// One frame of the particle field as flat instance arrays.
///
/// Circles come first, then lines, matching the canvas paint order. The
/// arrays are `Pod` so a host can upload or share them without copying.
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    pub circles: Vec<CircleInstance>,
    pub lines: Vec<LineSegment>,
}

impl DrawList {
    pub fn rebuild(&mut self, field: &ParticleField) {
        self.circles.clear();
        self.lines.clear();

        self.circles
            .extend(field.particles().iter().map(|p| CircleInstance {
                center: p.position,
                radius: p.radius,
                alpha: p.alpha,
            }));

        let particles = field.particles();
        let width = field.config().line_width;
        self.lines.extend(field.connections().into_iter().map(|c| {
            LineSegment::new(
                particles[c.a].position,
                particles[c.b].position,
                c.opacity,
                width,
            )
        }));
    }

    pub fn replay(&self, surface: &mut dyn RenderSurface, color: [u8; 3]) {
        surface.clear();
        for circle in &self.circles {
            surface.fill_circle(circle.center, circle.radius, Rgba::with_alpha(color, circle.alpha));
        }
        for line in &self.lines {
            surface.stroke_line(
                line.from,
                line.to,
                line.width,
                Rgba::with_alpha(color, line.alpha),
            );
        }
    }

    pub fn circle_bytes(&self) -> &[u8] {
        cast_slice(&self.circles)
    }

    pub fn line_bytes(&self) -> &[u8] {
        cast_slice(&self.lines)
    }
}
