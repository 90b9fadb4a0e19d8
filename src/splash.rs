//! One mount of the splash screen. Times are seconds on the mount clock.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::lock::{InteractionLock, ReleaseReason};
use crate::particles::{ConfigError, FieldConfig, ParticleField};
use crate::quality::resolve_profile;
use crate::sequencer::{Sequencer, SequencerConfig, SequencerEvent, SequencerState};
use crate::surface::{HostSurface, RenderSurface, SurfaceSize};
use crate::timeline::{EntranceTimeline, TimelineError, SPLASH_SUBTITLE, SPLASH_TITLE};
use crate::visuals::SplashVisuals;

#[derive(Debug, Error)]
pub enum SplashError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("invalid timeline: {0}")]
    Timeline(#[from] TimelineError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplashConfig {
    pub title: String,
    pub subtitle: String,
    pub field: FieldConfig,
    pub sequencer: SequencerConfig,
    /// Seed for particle placement. Hosts without a reason to reproduce a
    /// field should pass something time-derived.
    pub seed: u64,
}

impl Default for SplashConfig {
    fn default() -> Self {
        Self {
            title: SPLASH_TITLE.to_owned(),
            subtitle: SPLASH_SUBTITLE.to_owned(),
            field: FieldConfig::default(),
            sequencer: SequencerConfig::default(),
            seed: 0x5EED,
        }
    }
}

pub struct SplashScreen<S: RenderSurface, H: HostSurface> {
    surface: Option<S>,
    field: Option<ParticleField>,
    host: H,
    sequencer: Sequencer,
    lock: InteractionLock,
    content_revealed: bool,
    disposed: bool,
}

impl<S: RenderSurface, H: HostSurface> SplashScreen<S, H> {
    /// Mounts the splash: locks the page, pushes the initial visuals, starts
    /// the particle field and begins warm-up.
    ///
    /// A missing `surface` skips the particle field; the timeline still plays.
    pub fn mount(
        config: SplashConfig,
        surface: Option<S>,
        viewport: SurfaceSize,
        mut host: H,
        now_seconds: f32,
    ) -> Result<Self, SplashError> {
        config.field.validate()?;
        config.sequencer.validate()?;
        let timeline = EntranceTimeline::splash_sequence(&config.title, &config.subtitle)?;

        let mut surface = surface;
        let field = match surface.as_mut() {
            Some(surface) => {
                surface.resize(viewport);
                let profile = resolve_profile(viewport.width());
                Some(ParticleField::start(
                    viewport,
                    profile,
                    config.field,
                    config.seed,
                    now_seconds,
                ))
            }
            None => {
                warn!("no drawing surface available, particle field skipped");
                None
            }
        };

        let mut lock = InteractionLock::new(config.sequencer.lock_ceiling_seconds);
        lock.engage(now_seconds);
        host.set_interaction_locked(true);
        host.apply_visuals(&SplashVisuals::initial(&timeline));

        let mut sequencer = Sequencer::new(timeline, config.sequencer.warm_up_seconds);
        sequencer.mount(now_seconds);

        info!(
            width = viewport.width(),
            height = viewport.height(),
            particles = field.as_ref().map_or(0, |f| f.particles().len()),
            warm_up = config.sequencer.warm_up_seconds,
            "splash mounted"
        );

        Ok(Self {
            surface,
            field,
            host,
            sequencer,
            lock,
            content_revealed: false,
            disposed: false,
        })
    }

    pub fn state(&self) -> SequencerState {
        self.sequencer.state()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn is_locked(&self) -> bool {
        self.lock.is_locked()
    }

    pub fn content_revealed(&self) -> bool {
        self.content_revealed
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    pub fn field(&self) -> Option<&ParticleField> {
        self.field.as_ref()
    }

    pub fn timeline(&self) -> &EntranceTimeline {
        self.sequencer.timeline()
    }

    /// Animation-frame callback: particle tick, then timeline. Returns `None`
    /// once disposed so the host can stop requesting frames.
    pub fn frame(&mut self, now_seconds: f32) -> Option<Vec<SequencerEvent>> {
        if self.disposed {
            return None;
        }
        if let (Some(field), Some(surface)) = (self.field.as_mut(), self.surface.as_mut()) {
            field.tick(now_seconds, surface);
        }
        Some(self.advance(now_seconds))
    }

    /// Applies timeline progress and the lock ceiling for `now_seconds`.
    pub fn advance(&mut self, now_seconds: f32) -> Vec<SequencerEvent> {
        if self.disposed {
            return Vec::new();
        }

        let events = self.sequencer.advance(now_seconds);
        if let Some(t) = self.sequencer.timeline_time(now_seconds) {
            if self.sequencer.state() != SequencerState::Complete
                || events.contains(&SequencerEvent::Completed)
            {
                let visuals = SplashVisuals::sample(self.sequencer.timeline(), t);
                self.host.apply_visuals(&visuals);
            }
        }

        if events.contains(&SequencerEvent::Completed) {
            self.complete();
        }

        if self.lock.enforce_ceiling(now_seconds) {
            warn!(
                state = ?self.sequencer.state(),
                "interaction lock ceiling reached before completion, unlocking"
            );
            self.host.set_interaction_locked(false);
        }
        events
    }

    fn complete(&mut self) {
        if !self.content_revealed {
            self.content_revealed = true;
            self.host.reveal_content();
            info!("splash complete, content revealed");
        }
        if self.lock.release(ReleaseReason::Completed) {
            self.host.set_interaction_locked(false);
        }
    }

    /// Synchronous viewport change. Particles and timeline are untouched apart
    /// from the new wrap bounds.
    pub fn resize(&mut self, width: f32, height: f32) {
        if self.disposed {
            return;
        }
        let size = SurfaceSize::clamped(width, height);
        if let Some(surface) = self.surface.as_mut() {
            surface.resize(size);
        }
        if let Some(field) = self.field.as_mut() {
            field.resize(size);
        }
        debug!(width = size.width(), height = size.height(), "splash resized");
    }

    /// Tears the mount down: stops the field, cancels pending stages and
    /// restores page interaction. Idempotent; later calls into this mount do
    /// nothing.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        if let Some(field) = self.field.as_mut() {
            field.stop();
        }
        self.sequencer.dispose();
        if self.lock.release(ReleaseReason::Disposed) {
            self.host.set_interaction_locked(false);
        }
        info!(state = ?self.sequencer.state(), "splash disposed");
    }
}

#[cfg(test)]
mod tests {
    use super::{SplashConfig, SplashScreen};
    use crate::sequencer::{SequencerConfig, SequencerState};
    use crate::surface::{RecordingHost, RecordingSurface, SurfaceSize};

    type TestSplash = SplashScreen<RecordingSurface, RecordingHost>;

    fn mount(config: SplashConfig, with_surface: bool) -> TestSplash {
        let size = SurfaceSize::clamped(1280.0, 720.0);
        let surface = with_surface.then(|| RecordingSurface::new(size));
        SplashScreen::mount(config, surface, size, RecordingHost::default(), 0.0).unwrap()
    }

    fn run(splash: &mut TestSplash, until: f32) {
        let mut t = 0.0;
        while t <= until {
            splash.frame(t);
            t += 1.0 / 60.0;
        }
    }

    #[test]
    fn mount_locks_and_sizes_field_by_viewport() {
        let splash = mount(SplashConfig::default(), true);
        assert_eq!(splash.state(), SequencerState::WarmingUp);
        assert!(splash.host().locked);
        assert_eq!(splash.field().map(|f| f.particles().len()), Some(50));
        assert_eq!(splash.host().visual_updates, 1);
    }

    #[test]
    fn full_run_reveals_once_and_unlocks() {
        let mut splash = mount(SplashConfig::default(), true);
        run(&mut splash, 10.0);
        assert_eq!(splash.state(), SequencerState::Complete);
        assert_eq!(splash.host().reveals, 1);
        assert!(!splash.host().locked);
        assert_eq!(splash.host().lock_changes, 2);
        let visuals = splash.host().visuals.as_ref().unwrap();
        assert!(!visuals.screen_displayed);
        assert_eq!(visuals.content_opacity, 1.0);
    }

    #[test]
    fn visuals_stop_updating_after_completion() {
        let mut splash = mount(SplashConfig::default(), true);
        run(&mut splash, 8.0);
        let updates = splash.host().visual_updates;
        splash.frame(9.0);
        splash.frame(9.5);
        assert_eq!(splash.host().visual_updates, updates);
    }

    #[test]
    fn missing_surface_still_plays_timeline() {
        let mut splash = mount(SplashConfig::default(), false);
        assert!(splash.field().is_none());
        run(&mut splash, 10.0);
        assert_eq!(splash.state(), SequencerState::Complete);
        assert_eq!(splash.host().reveals, 1);
    }

    #[test]
    fn ceiling_unlocks_before_completion() {
        let config = SplashConfig {
            sequencer: SequencerConfig {
                warm_up_seconds: 1.0,
                lock_ceiling_seconds: 6.0,
            },
            ..SplashConfig::default()
        };
        let mut splash = mount(config, true);
        splash.advance(5.9);
        assert!(splash.host().locked);
        splash.advance(6.0);
        assert!(!splash.host().locked);
        assert!(matches!(splash.state(), SequencerState::Playing(_)));
        assert_eq!(splash.host().reveals, 0);

        splash.advance(7.5);
        assert_eq!(splash.state(), SequencerState::Complete);
        assert_eq!(splash.host().reveals, 1);
        assert_eq!(splash.host().lock_changes, 2);
    }

    #[test]
    fn resize_clamps_and_keeps_state() {
        let mut splash = mount(SplashConfig::default(), true);
        run(&mut splash, 2.0);
        let state = splash.state();
        let positions: Vec<_> = splash
            .field()
            .unwrap()
            .particles()
            .iter()
            .map(|p| p.position)
            .collect();
        splash.resize(0.0, -5.0);
        assert_eq!(splash.surface().unwrap().size, SurfaceSize::clamped(1.0, 1.0));
        assert_eq!(splash.field().unwrap().size(), SurfaceSize::clamped(1.0, 1.0));
        assert_eq!(splash.state(), state);
        let after: Vec<_> = splash
            .field()
            .unwrap()
            .particles()
            .iter()
            .map(|p| p.position)
            .collect();
        assert_eq!(positions, after);
    }

    #[test]
    fn dispose_mid_stage_silences_everything() {
        let mut splash = mount(SplashConfig::default(), true);
        run(&mut splash, 2.0);
        splash.dispose();
        assert!(!splash.host().locked);
        let commands = splash.surface().unwrap().total_commands;
        let updates = splash.host().visual_updates;

        assert!(splash.frame(3.0).is_none());
        assert!(splash.advance(20.0).is_empty());
        splash.resize(10.0, 10.0);
        splash.dispose();

        assert_eq!(splash.surface().unwrap().total_commands, commands);
        assert_eq!(splash.host().visual_updates, updates);
        assert_eq!(splash.host().reveals, 0);
        assert_eq!(splash.host().lock_changes, 2);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = SplashConfig::default();
        config.sequencer.warm_up_seconds = f32::NAN;
        let size = SurfaceSize::clamped(800.0, 600.0);
        let result: Result<TestSplash, _> =
            SplashScreen::mount(config, None, size, RecordingHost::default(), 0.0);
        assert!(result.is_err());
    }
}
