use serde::{Deserialize, Serialize};

/// Coarse viewport classification used to size the particle field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeviceClass {
    Mobile,
    Tablet,
    Desktop,
}

/// Particle budget for one device class.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldProfile {
    pub particle_count: u32,
    /// Connection lines are drawn only between particles closer than this.
    pub max_distance: f32,
}

pub const TABLET_MIN_WIDTH: f32 = 768.0;
pub const DESKTOP_MIN_WIDTH: f32 = 1024.0;

impl DeviceClass {
    pub fn from_viewport_width(width: f32) -> Self {
        if width < TABLET_MIN_WIDTH {
            Self::Mobile
        } else if width < DESKTOP_MIN_WIDTH {
            Self::Tablet
        } else {
            Self::Desktop
        }
    }

    pub fn profile(self) -> FieldProfile {
        match self {
            Self::Mobile => FieldProfile {
                particle_count: 25,
                max_distance: 70.0,
            },
            // Chosen midpoint between the mobile and desktop budgets.
            Self::Tablet => FieldProfile {
                particle_count: 38,
                max_distance: 85.0,
            },
            Self::Desktop => FieldProfile {
                particle_count: 50,
                max_distance: 100.0,
            },
        }
    }
}

/// Resolves the field profile for a viewport. Decided once when a field
/// starts; later resizes do not re-resolve it.
pub fn resolve_profile(viewport_width: f32) -> FieldProfile {
    DeviceClass::from_viewport_width(viewport_width).profile()
}
