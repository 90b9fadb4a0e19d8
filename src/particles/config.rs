use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::easing::Ease;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{name} range is inverted: min {min} > max {max}")]
    InvertedRange { name: &'static str, min: f32, max: f32 },
    #[error("{name} must be finite and non-negative, got {value}")]
    Negative { name: &'static str, value: f32 },
}

/// Half-open uniform range `[min, max)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UniformRange {
    pub min: f32,
    pub max: f32,
}

impl UniformRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn sample(self, rng: &mut fastrand::Rng) -> f32 {
        self.min + rng.f32() * (self.max - self.min)
    }

    fn validate(self, name: &'static str) -> Result<(), ConfigError> {
        if self.min > self.max {
            return Err(ConfigError::InvertedRange {
                name,
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldConfig {
    /// Per-axis velocity in pixels per frame.
    pub velocity: UniformRange,
    pub radius: UniformRange,
    pub target_alpha: UniformRange,
    pub fade_in_seconds: f32,
    /// Delay between consecutive particles' fade-in starts.
    pub fade_in_stagger_seconds: f32,
    pub fade_in_ease: Ease,
    pub color: [u8; 3],
    pub line_width: f32,
    /// Peak connection opacity for two touching, fully faded-in particles.
    pub connection_strength: f32,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            velocity: UniformRange::new(-0.25, 0.25),
            radius: UniformRange::new(1.0, 3.0),
            target_alpha: UniformRange::new(0.2, 0.7),
            fade_in_seconds: 1.0,
            fade_in_stagger_seconds: 0.02,
            fade_in_ease: Ease::Power2Out,
            color: [167, 243, 208],
            line_width: 0.5,
            connection_strength: 0.2,
        }
    }
}

impl FieldConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.velocity.validate("velocity")?;
        self.radius.validate("radius")?;
        self.target_alpha.validate("target_alpha")?;
        for (name, value) in [
            ("fade_in_seconds", self.fade_in_seconds),
            ("fade_in_stagger_seconds", self.fade_in_stagger_seconds),
            ("line_width", self.line_width),
        ] {
            if !(value >= 0.0 && value.is_finite()) {
                return Err(ConfigError::Negative { name, value });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, FieldConfig, UniformRange};

    #[test]
    fn default_config_is_valid() {
        assert_eq!(FieldConfig::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_inverted_radius() {
        let config = FieldConfig {
            radius: UniformRange::new(3.0, 1.0),
            ..FieldConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvertedRange { name: "radius", .. })
        ));
    }

    #[test]
    fn samples_stay_in_range() {
        let mut rng = fastrand::Rng::with_seed(7);
        let range = UniformRange::new(0.2, 0.7);
        for _ in 0..1_000 {
            let v = range.sample(&mut rng);
            assert!((0.2..=0.7).contains(&v));
        }
    }
}
