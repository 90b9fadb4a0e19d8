pub mod config;
pub mod render;
pub mod simulation;

pub use config::{ConfigError, FieldConfig, UniformRange};
pub use render::{CircleInstance, DrawList, LineSegment};
pub use simulation::{connection_opacity, Connection, Particle, ParticleField};
