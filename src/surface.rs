//! Seams between the engine and whatever hosts it.

use serde::Serialize;

use crate::visuals::SplashVisuals;

/// Smallest dimension a surface may take.
pub const MIN_SURFACE_DIMENSION: f32 = 1.0;

/// Surface dimensions in CSS pixels, never smaller than 1x1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SurfaceSize {
    width: f32,
    height: f32,
}

impl SurfaceSize {
    /// Builds a size clamped to at least 1x1. Non-finite input also clamps.
    pub fn clamped(width: f32, height: f32) -> Self {
        Self {
            width: clamp_dimension(width),
            height: clamp_dimension(height),
        }
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }
}

fn clamp_dimension(value: f32) -> f32 {
    if value.is_finite() {
        value.max(MIN_SURFACE_DIMENSION)
    } else {
        MIN_SURFACE_DIMENSION
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub fn with_alpha(rgb: [u8; 3], a: f32) -> Self {
        Self {
            r: rgb[0],
            g: rgb[1],
            b: rgb[2],
            a,
        }
    }

    /// CSS `rgba(...)` form, as a 2D canvas expects for fill/stroke styles.
    pub fn to_css(self) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

/// 2D drawing target for the particle field.
pub trait RenderSurface {
    fn resize(&mut self, size: SurfaceSize);
    fn clear(&mut self);
    fn fill_circle(&mut self, center: [f32; 2], radius: f32, color: Rgba);
    fn stroke_line(&mut self, from: [f32; 2], to: [f32; 2], width: f32, color: Rgba);
}

/// The page that hosts the splash.
pub trait HostSurface {
    /// Pushes the current tweened state of every splash element.
    fn apply_visuals(&mut self, visuals: &SplashVisuals);
    /// Suppresses or restores page scrolling and interaction.
    fn set_interaction_locked(&mut self, locked: bool);
    /// Marks the wrapped content visible and interactive. Called once per mount.
    fn reveal_content(&mut self);
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear,
    Circle {
        center: [f32; 2],
        radius: f32,
        color: Rgba,
    },
    Line {
        from: [f32; 2],
        to: [f32; 2],
        width: f32,
        color: Rgba,
    },
}

/// Render surface that keeps the commands of the most recent frame and a
/// running total. Used by the headless runner and tests.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    pub size: SurfaceSize,
    pub frame: Vec<DrawCommand>,
    pub frames_drawn: u64,
    pub total_commands: u64,
}

impl RecordingSurface {
    pub fn new(size: SurfaceSize) -> Self {
        Self {
            size,
            frame: Vec::new(),
            frames_drawn: 0,
            total_commands: 0,
        }
    }

    pub fn circles(&self) -> impl Iterator<Item = &DrawCommand> {
        self.frame
            .iter()
            .filter(|c| matches!(c, DrawCommand::Circle { .. }))
    }

    pub fn lines(&self) -> impl Iterator<Item = &DrawCommand> {
        self.frame
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { .. }))
    }

    fn record(&mut self, command: DrawCommand) {
        self.total_commands += 1;
        self.frame.push(command);
    }
}

impl RenderSurface for RecordingSurface {
    fn resize(&mut self, size: SurfaceSize) {
        self.size = size;
    }

    fn clear(&mut self) {
        self.frame.clear();
        self.frames_drawn += 1;
        self.record(DrawCommand::Clear);
    }

    fn fill_circle(&mut self, center: [f32; 2], radius: f32, color: Rgba) {
        self.record(DrawCommand::Circle {
            center,
            radius,
            color,
        });
    }

    fn stroke_line(&mut self, from: [f32; 2], to: [f32; 2], width: f32, color: Rgba) {
        self.record(DrawCommand::Line {
            from,
            to,
            width,
            color,
        });
    }
}

/// Host that remembers what it was told.
#[derive(Debug, Clone, Default)]
pub struct RecordingHost {
    pub visuals: Option<SplashVisuals>,
    pub visual_updates: u64,
    pub locked: bool,
    pub lock_changes: u32,
    pub reveals: u32,
}

impl HostSurface for RecordingHost {
    fn apply_visuals(&mut self, visuals: &SplashVisuals) {
        self.visuals = Some(visuals.clone());
        self.visual_updates += 1;
    }

    fn set_interaction_locked(&mut self, locked: bool) {
        if self.locked != locked {
            self.lock_changes += 1;
        }
        self.locked = locked;
    }

    fn reveal_content(&mut self) {
        self.reveals += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::{Rgba, SurfaceSize};

    #[test]
    fn size_clamps_to_one_by_one() {
        assert_eq!(SurfaceSize::clamped(0.0, -40.0), SurfaceSize::clamped(1.0, 1.0));
        assert_eq!(SurfaceSize::clamped(f32::NAN, 600.0).width(), 1.0);
        assert_eq!(SurfaceSize::clamped(800.0, 600.0).height(), 600.0);
    }

    #[test]
    fn degenerate_sizes_never_reach_the_field() {
        for (w, h) in [(0.0, 0.0), (-1.0, 5.0), (f32::INFINITY, f32::NEG_INFINITY), (0.5, 0.25)] {
            let size = SurfaceSize::clamped(w, h);
            assert!(size.width() >= 1.0, "{w}x{h}");
            assert!(size.height() >= 1.0, "{w}x{h}");
        }
    }

    #[test]
    fn css_color() {
        let c = Rgba::with_alpha([167, 243, 208], 0.5);
        assert_eq!(c.to_css(), "rgba(167, 243, 208, 0.5)");
    }
}
