use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::particles::ConfigError;
use crate::timeline::{EntranceTimeline, StageId};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SequencerConfig {
    /// How long particles run alone before the first stage.
    pub warm_up_seconds: f32,
    /// Longest the page may stay interaction-locked, measured from mount.
    pub lock_ceiling_seconds: f32,
}

impl Default for SequencerConfig {
    fn default() -> Self {
        Self {
            warm_up_seconds: 1.0,
            lock_ceiling_seconds: 8.0,
        }
    }
}

impl SequencerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("warm_up_seconds", self.warm_up_seconds),
            ("lock_ceiling_seconds", self.lock_ceiling_seconds),
        ] {
            if !(value >= 0.0 && value.is_finite()) {
                return Err(ConfigError::Negative { name, value });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequencerState {
    Idle,
    WarmingUp,
    /// Index of the most recently started stage.
    Playing(usize),
    Complete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequencerEvent {
    WarmUpStarted,
    StageStarted { index: usize, id: StageId },
    Completed,
}

/// Drives the entrance timeline through
/// `Idle -> WarmingUp -> Playing(i) -> Complete` from a caller-supplied clock.
///
/// Every stage start is reported exactly once and in order, even when one
/// `advance` spans several of them. `Complete` is terminal.
#[derive(Debug, Clone)]
pub struct Sequencer {
    timeline: EntranceTimeline,
    warm_up_seconds: f32,
    state: SequencerState,
    /// Mount time plus warm-up, fixed at mount.
    playing_at: f32,
    next_stage: usize,
    disposed: bool,
}

impl Sequencer {
    pub fn new(timeline: EntranceTimeline, warm_up_seconds: f32) -> Self {
        Self {
            timeline,
            warm_up_seconds,
            state: SequencerState::Idle,
            playing_at: 0.0,
            next_stage: 0,
            disposed: false,
        }
    }

    pub fn state(&self) -> SequencerState {
        self.state
    }

    pub fn timeline(&self) -> &EntranceTimeline {
        &self.timeline
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn mount(&mut self, now_seconds: f32) -> Option<SequencerEvent> {
        if self.disposed || self.state != SequencerState::Idle {
            return None;
        }
        self.playing_at = now_seconds + self.warm_up_seconds;
        self.state = SequencerState::WarmingUp;
        Some(SequencerEvent::WarmUpStarted)
    }

    /// Time on the entrance timeline, or `None` while idle or warming up.
    pub fn timeline_time(&self, now_seconds: f32) -> Option<f32> {
        match self.state {
            SequencerState::Playing(_) | SequencerState::Complete => {
                Some(now_seconds - self.playing_at)
            }
            SequencerState::Idle | SequencerState::WarmingUp => None,
        }
    }

    pub fn advance(&mut self, now_seconds: f32) -> Vec<SequencerEvent> {
        let mut events = Vec::new();
        if self.disposed {
            return events;
        }
        match self.state {
            SequencerState::Idle | SequencerState::Complete => return events,
            SequencerState::WarmingUp | SequencerState::Playing(_) => {}
        }

        if now_seconds < self.playing_at {
            return events;
        }
        let local = now_seconds - self.playing_at;

        let stages = self.timeline.stages();
        while let Some(stage) = stages.get(self.next_stage) {
            if stage.start_seconds > local {
                break;
            }
            let index = self.next_stage;
            debug!(index, stage = stage.preset.label, t = local, "stage started");
            self.state = SequencerState::Playing(index);
            events.push(SequencerEvent::StageStarted {
                index,
                id: stage.preset.id,
            });
            self.next_stage += 1;
        }

        if self.next_stage == stages.len() && local >= self.timeline.total_duration() {
            debug!(t = local, "timeline complete");
            self.state = SequencerState::Complete;
            events.push(SequencerEvent::Completed);
        }
        events
    }

    /// Cancels everything still pending. Idempotent.
    pub fn dispose(&mut self) {
        self.disposed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::{Sequencer, SequencerConfig, SequencerEvent, SequencerState};
    use crate::timeline::{EntranceTimeline, SPLASH_SUBTITLE, SPLASH_TITLE};

    fn sequencer(warm_up: f32) -> Sequencer {
        let timeline = EntranceTimeline::splash_sequence(SPLASH_TITLE, SPLASH_SUBTITLE).unwrap();
        Sequencer::new(timeline, warm_up)
    }

    #[test]
    fn mount_moves_to_warming_up_once() {
        let mut seq = sequencer(1.0);
        assert_eq!(seq.state(), SequencerState::Idle);
        assert_eq!(seq.mount(0.0), Some(SequencerEvent::WarmUpStarted));
        assert_eq!(seq.mount(0.5), None);
        assert_eq!(seq.state(), SequencerState::WarmingUp);
    }

    #[test]
    fn idle_sequencer_ignores_time() {
        let mut seq = sequencer(1.0);
        assert!(seq.advance(100.0).is_empty());
        assert_eq!(seq.state(), SequencerState::Idle);
    }

    #[test]
    fn warm_up_boundary() {
        let mut seq = sequencer(6.0);
        seq.mount(0.0);
        assert!(seq.advance(5.999).is_empty());
        assert_eq!(seq.state(), SequencerState::WarmingUp);
        let events = seq.advance(6.0);
        assert_eq!(seq.state(), SequencerState::Playing(0));
        assert!(matches!(events[0], SequencerEvent::StageStarted { index: 0, .. }));
    }

    #[test]
    fn warm_up_boundary_from_late_mount() {
        for mount in [0.1f32, 0.3, 1.7, 2.9, 12.34, 1234.5] {
            let mut seq = sequencer(6.0);
            seq.mount(mount);
            seq.advance(mount + 5.99);
            assert_eq!(seq.state(), SequencerState::WarmingUp, "mount at {mount}");
            seq.advance(mount + 6.0);
            assert_eq!(seq.state(), SequencerState::Playing(0), "mount at {mount}");
        }
    }

    #[test]
    fn stages_start_in_order_without_gaps() {
        let mut seq = sequencer(1.0);
        seq.mount(0.0);
        let mut seen = Vec::new();
        let mut t = 0.0;
        while t < 9.0 {
            for event in seq.advance(t) {
                if let SequencerEvent::StageStarted { index, .. } = event {
                    seen.push(index);
                }
            }
            t += 1.0 / 60.0;
        }
        assert_eq!(seen, (0..seq.timeline().len()).collect::<Vec<_>>());
        assert_eq!(seq.state(), SequencerState::Complete);
    }

    #[test]
    fn long_gap_reports_every_stage_then_completes_once() {
        let mut seq = sequencer(1.0);
        seq.mount(0.0);
        let events = seq.advance(60.0);
        let len = seq.timeline().len();
        assert_eq!(events.len(), len + 1);
        for (i, event) in events[..len].iter().enumerate() {
            assert!(matches!(event, SequencerEvent::StageStarted { index, .. } if *index == i));
        }
        assert_eq!(events[len], SequencerEvent::Completed);
        assert!(seq.advance(61.0).is_empty());
        assert_eq!(seq.state(), SequencerState::Complete);
    }

    #[test]
    fn overlapping_stage_starts_before_previous_ends() {
        let mut seq = sequencer(0.0);
        seq.mount(0.0);
        seq.advance(1.1);
        // Title still animating (ends at 1.45) while the divider has started.
        assert_eq!(seq.state(), SequencerState::Playing(1));
    }

    #[test]
    fn disposed_sequencer_emits_nothing() {
        let mut seq = sequencer(1.0);
        seq.mount(0.0);
        seq.advance(1.5);
        seq.dispose();
        seq.dispose();
        assert!(seq.advance(30.0).is_empty());
        assert_eq!(seq.state(), SequencerState::Playing(0));
    }

    #[test]
    fn config_validation() {
        assert!(SequencerConfig::default().validate().is_ok());
        let bad = SequencerConfig {
            warm_up_seconds: -1.0,
            ..SequencerConfig::default()
        };
        assert!(bad.validate().is_err());
    }
}
