use tracing::debug;

use super::config::FieldConfig;
use super::render::DrawList;
use crate::quality::FieldProfile;
use crate::surface::{RenderSurface, SurfaceSize};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub position: [f32; 2],
    /// Pixels per frame. Never modified after creation.
    pub velocity: [f32; 2],
    pub radius: f32,
    pub alpha: f32,
    pub target_alpha: f32,
}

impl Particle {
    fn random(size: SurfaceSize, config: &FieldConfig, rng: &mut fastrand::Rng) -> Self {
        Self {
            position: [rng.f32() * size.width(), rng.f32() * size.height()],
            velocity: [config.velocity.sample(rng), config.velocity.sample(rng)],
            radius: config.radius.sample(rng),
            alpha: 0.0,
            target_alpha: config.target_alpha.sample(rng),
        }
    }

    /// Moves by one frame of velocity, wrapping to the opposite edge.
    pub fn advance(&mut self, size: SurfaceSize) {
        self.position[0] = wrap(self.position[0] + self.velocity[0], size.width());
        self.position[1] = wrap(self.position[1] + self.velocity[1], size.height());
    }
}

fn wrap(value: f32, bound: f32) -> f32 {
    if value < 0.0 {
        bound
    } else if value > bound {
        0.0
    } else {
        value
    }
}

/// Opacity of the line between two particles `distance` apart.
///
/// Zero at or beyond `max_distance`; otherwise falls off linearly with distance
/// and is capped by the dimmer endpoint.
pub fn connection_opacity(
    distance: f32,
    max_distance: f32,
    alpha_a: f32,
    alpha_b: f32,
    strength: f32,
) -> f32 {
    if !(distance < max_distance) || max_distance <= 0.0 {
        return 0.0;
    }
    strength * (1.0 - distance / max_distance) * alpha_a.min(alpha_b)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Connection {
    pub a: usize,
    pub b: usize,
    pub distance: f32,
    pub opacity: f32,
}

/// A fixed population of wrapping particles on one drawing surface.
///
/// Particles are allocated once in [`ParticleField::start`]; resizing only
/// changes the wrap bounds.
#[derive(Debug)]
pub struct ParticleField {
    particles: Vec<Particle>,
    size: SurfaceSize,
    max_distance: f32,
    config: FieldConfig,
    started_at: f32,
    running: bool,
    frames: u64,
    scratch: DrawList,
}

impl ParticleField {
    pub fn start(
        size: SurfaceSize,
        profile: FieldProfile,
        config: FieldConfig,
        seed: u64,
        now_seconds: f32,
    ) -> Self {
        let mut rng = fastrand::Rng::with_seed(seed);
        let particles = (0..profile.particle_count)
            .map(|_| Particle::random(size, &config, &mut rng))
            .collect();
        debug!(
            count = profile.particle_count,
            max_distance = profile.max_distance,
            width = size.width(),
            height = size.height(),
            "particle field started"
        );
        Self::from_particles(size, profile.max_distance, config, particles, now_seconds)
    }

    /// Builds a field around explicit particles.
    pub fn from_particles(
        size: SurfaceSize,
        max_distance: f32,
        config: FieldConfig,
        particles: Vec<Particle>,
        now_seconds: f32,
    ) -> Self {
        Self {
            particles,
            size,
            max_distance,
            config,
            started_at: now_seconds,
            running: true,
            frames: 0,
            scratch: DrawList::default(),
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn size(&self) -> SurfaceSize {
        self.size
    }

    pub fn max_distance(&self) -> f32 {
        self.max_distance
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn resize(&mut self, size: SurfaceSize) {
        self.size = size;
    }

    pub fn stop(&mut self) {
        if self.running {
            debug!(frames = self.frames, "particle field stopped");
        }
        self.running = false;
    }

    /// Advances fade-in and positions by one frame. Returns `false` once stopped.
    pub fn step(&mut self, now_seconds: f32) -> bool {
        if !self.running {
            return false;
        }
        let elapsed = (now_seconds - self.started_at).max(0.0);
        let config = self.config;
        for (i, particle) in self.particles.iter_mut().enumerate() {
            particle.alpha = faded_alpha(&config, i, particle.target_alpha, elapsed);
            particle.advance(self.size);
        }
        self.frames += 1;
        true
    }

    /// One animation frame: step, then redraw everything onto `surface`.
    pub fn tick(&mut self, now_seconds: f32, surface: &mut dyn RenderSurface) -> bool {
        if !self.step(now_seconds) {
            return false;
        }
        self.draw(surface);
        true
    }

    pub fn draw(&mut self, surface: &mut dyn RenderSurface) {
        let mut list = std::mem::take(&mut self.scratch);
        list.rebuild(self);
        list.replay(surface, self.config.color);
        self.scratch = list;
    }

    /// The packed draw list of the most recent [`draw`](Self::draw).
    pub fn last_draw_list(&self) -> &DrawList {
        &self.scratch
    }

    /// Every unordered pair closer than `max_distance`.
    pub fn connections(&self) -> Vec<Connection> {
        let mut out = Vec::new();
        for (a, pa) in self.particles.iter().enumerate() {
            for (offset, pb) in self.particles[a + 1..].iter().enumerate() {
                let dx = pa.position[0] - pb.position[0];
                let dy = pa.position[1] - pb.position[1];
                let distance = (dx * dx + dy * dy).sqrt();
                if distance >= self.max_distance {
                    continue;
                }
                out.push(Connection {
                    a,
                    b: a + 1 + offset,
                    distance,
                    opacity: connection_opacity(
                        distance,
                        self.max_distance,
                        pa.alpha,
                        pb.alpha,
                        self.config.connection_strength,
                    ),
                });
            }
        }
        out
    }
}

fn faded_alpha(config: &FieldConfig, index: usize, target: f32, elapsed: f32) -> f32 {
    let local = elapsed - index as f32 * config.fade_in_stagger_seconds;
    if local <= 0.0 {
        return 0.0;
    }
    if config.fade_in_seconds <= f32::EPSILON || local >= config.fade_in_seconds {
        return target;
    }
    target * config.fade_in_ease.apply(local / config.fade_in_seconds)
}
