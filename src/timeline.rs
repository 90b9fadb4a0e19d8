use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::easing::Ease;

pub const SPLASH_TITLE: &str = "Code With Tama";
pub const SPLASH_SUBTITLE: &str = "Fullstack Developer";
/// Four corner borders, two side circles, four corner dots.
pub const DECORATION_COUNT: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StageId {
    TitleCharactersIn,
    DividerGrow,
    SubtitleCharactersIn,
    DecorationsPopIn,
    Hold,
    GradientFadeOut,
    ScreenSlideAway,
    ContentFadeIn,
    ScreenHidden,
}

/// Where a stage starts relative to what was placed before it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Placement {
    /// At the end of everything placed so far.
    Sequential,
    /// This many seconds before the end of everything placed so far.
    Overlap(f32),
    /// At an absolute offset from timeline start.
    At(f32),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StagePreset {
    pub id: StageId,
    pub label: &'static str,
    pub placement: Placement,
    /// Tween duration of a single target.
    pub duration_seconds: f32,
    pub stagger_seconds: f32,
    pub targets: u32,
    pub ease: Ease,
}

impl StagePreset {
    pub fn span_seconds(&self) -> f32 {
        self.duration_seconds + self.stagger_seconds * self.targets.saturating_sub(1) as f32
    }

    fn hold(duration_seconds: f32) -> Self {
        Self {
            id: StageId::Hold,
            label: "hold",
            placement: Placement::Sequential,
            duration_seconds,
            stagger_seconds: 0.0,
            targets: 0,
            ease: Ease::Linear,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduledStage {
    pub preset: StagePreset,
    pub start_seconds: f32,
}

impl ScheduledStage {
    pub fn end_seconds(&self) -> f32 {
        self.start_seconds + self.preset.span_seconds()
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum TimelineError {
    #[error("timeline has no stages")]
    Empty,
    #[error("stage {index} ({label}) has invalid {field}: {value}")]
    InvalidTiming {
        index: usize,
        label: &'static str,
        field: &'static str,
        value: f32,
    },
    #[error("stage {index} ({label}) would start before timeline start ({start}s)")]
    NegativeStart {
        index: usize,
        label: &'static str,
        start: f32,
    },
    #[error("stage {index} ({label}) starts at {start}s, before the previous stage at {previous}s")]
    OutOfOrder {
        index: usize,
        label: &'static str,
        start: f32,
        previous: f32,
    },
}

/// Immutable, resolved stage table. Start offsets are computed once from the
/// placements; stage starts are non-decreasing in declaration order.
#[derive(Debug, Clone)]
pub struct EntranceTimeline {
    stages: Vec<ScheduledStage>,
    total_duration: f32,
}

impl EntranceTimeline {
    pub fn new(presets: Vec<StagePreset>) -> Result<Self, TimelineError> {
        if presets.is_empty() {
            return Err(TimelineError::Empty);
        }

        let mut stages: Vec<ScheduledStage> = Vec::with_capacity(presets.len());
        let mut cursor = 0.0f32;
        for (index, preset) in presets.into_iter().enumerate() {
            for (field, value) in [
                ("duration", preset.duration_seconds),
                ("stagger", preset.stagger_seconds),
            ] {
                if !(value >= 0.0 && value.is_finite()) {
                    return Err(TimelineError::InvalidTiming {
                        index,
                        label: preset.label,
                        field,
                        value,
                    });
                }
            }

            let start = match preset.placement {
                Placement::Sequential => cursor,
                Placement::Overlap(seconds) => cursor - seconds,
                Placement::At(seconds) => seconds,
            };
            if !(start >= 0.0) {
                return Err(TimelineError::NegativeStart {
                    index,
                    label: preset.label,
                    start,
                });
            }
            if let Some(previous) = stages.last() {
                if start < previous.start_seconds {
                    return Err(TimelineError::OutOfOrder {
                        index,
                        label: preset.label,
                        start,
                        previous: previous.start_seconds,
                    });
                }
            }

            let stage = ScheduledStage {
                preset,
                start_seconds: start,
            };
            cursor = cursor.max(stage.end_seconds());
            stages.push(stage);
        }

        Ok(Self {
            stages,
            total_duration: cursor,
        })
    }

    /// The portfolio entrance: characters, divider, decorations, then the
    /// splash clears away and the content fades in.
    pub fn splash_sequence(title: &str, subtitle: &str) -> Result<Self, TimelineError> {
        let back_out = Ease::BACK_OUT_DEFAULT;
        Self::new(vec![
            StagePreset {
                id: StageId::TitleCharactersIn,
                label: "title characters in",
                placement: Placement::Sequential,
                duration_seconds: 0.8,
                stagger_seconds: 0.05,
                targets: char_count(title),
                ease: back_out,
            },
            StagePreset {
                id: StageId::DividerGrow,
                label: "divider grow",
                placement: Placement::Overlap(0.4),
                duration_seconds: 0.6,
                stagger_seconds: 0.0,
                targets: 1,
                ease: Ease::Power2Out,
            },
            StagePreset {
                id: StageId::SubtitleCharactersIn,
                label: "subtitle characters in",
                placement: Placement::Overlap(0.4),
                duration_seconds: 0.8,
                stagger_seconds: 0.03,
                targets: char_count(subtitle),
                ease: back_out,
            },
            StagePreset {
                id: StageId::DecorationsPopIn,
                label: "decorations pop in",
                placement: Placement::Overlap(0.8),
                duration_seconds: 0.6,
                stagger_seconds: 0.1,
                targets: DECORATION_COUNT,
                ease: back_out,
            },
            StagePreset::hold(0.8),
            StagePreset {
                id: StageId::GradientFadeOut,
                label: "gradient fade out",
                placement: Placement::Sequential,
                duration_seconds: 0.6,
                stagger_seconds: 0.0,
                targets: 1,
                ease: Ease::Power2InOut,
            },
            StagePreset::hold(0.4),
            StagePreset {
                id: StageId::ScreenSlideAway,
                label: "screen slide away",
                placement: Placement::Sequential,
                duration_seconds: 0.8,
                stagger_seconds: 0.0,
                targets: 1,
                ease: Ease::Power2InOut,
            },
            StagePreset {
                id: StageId::ContentFadeIn,
                label: "content fade in",
                placement: Placement::Overlap(0.3),
                duration_seconds: 0.8,
                stagger_seconds: 0.0,
                targets: 1,
                ease: Ease::Power2Out,
            },
            StagePreset {
                id: StageId::ScreenHidden,
                label: "screen hidden",
                placement: Placement::Sequential,
                duration_seconds: 0.0,
                stagger_seconds: 0.0,
                targets: 1,
                ease: Ease::Linear,
            },
        ])
    }

    pub fn total_duration(&self) -> f32 {
        self.total_duration
    }

    pub fn stages(&self) -> &[ScheduledStage] {
        &self.stages
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// First stage with the given id, if any.
    pub fn find(&self, id: StageId) -> Option<(usize, &ScheduledStage)> {
        self.stages.iter().enumerate().find(|(_, s)| s.preset.id == id)
    }

    /// Eased progress of target `target` of stage `index`. Clamped to the
    /// stage's own window, so it reads 0 before and 1 after.
    pub fn target_progress(&self, index: usize, target: u32, time_seconds: f32) -> f32 {
        let Some(stage) = self.stages.get(index) else {
            return 0.0;
        };
        let preset = &stage.preset;
        let local =
            time_seconds - stage.start_seconds - preset.stagger_seconds * target as f32;
        if preset.duration_seconds <= f32::EPSILON {
            return if local >= 0.0 { 1.0 } else { 0.0 };
        }
        preset.ease.apply(local / preset.duration_seconds)
    }
}

/// Number of character targets a text splits into.
pub fn char_count(text: &str) -> u32 {
    text.chars().count() as u32
}

/// Splits text into per-character spans. Spaces become non-breaking so every
/// span keeps its width when animated independently.
pub fn split_chars(text: &str) -> Vec<char> {
    text.chars()
        .map(|c| if c == ' ' { '\u{00A0}' } else { c })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{
        split_chars, EntranceTimeline, Placement, StageId, StagePreset, TimelineError,
        SPLASH_SUBTITLE, SPLASH_TITLE,
    };
    use crate::easing::Ease;

    fn splash() -> EntranceTimeline {
        EntranceTimeline::splash_sequence(SPLASH_TITLE, SPLASH_SUBTITLE).unwrap()
    }

    fn preset(placement: Placement, duration_seconds: f32) -> StagePreset {
        StagePreset {
            id: StageId::Hold,
            label: "test",
            placement,
            duration_seconds,
            stagger_seconds: 0.0,
            targets: 1,
            ease: Ease::Linear,
        }
    }

    #[test]
    fn splash_stage_starts() {
        let timeline = splash();
        let starts: Vec<f32> = timeline.stages().iter().map(|s| s.start_seconds).collect();
        let expected = [0.0, 1.05, 1.25, 1.79, 3.29, 4.09, 4.69, 5.09, 5.59, 6.39];
        assert_eq!(starts.len(), expected.len());
        for (got, want) in starts.iter().zip(expected) {
            assert!((got - want).abs() < 1e-4, "got {got}, want {want}");
        }
        assert!((timeline.total_duration() - 6.39).abs() < 1e-4);
    }

    #[test]
    fn starts_are_non_decreasing() {
        let timeline = splash();
        for pair in timeline.stages().windows(2) {
            assert!(pair[0].start_seconds <= pair[1].start_seconds);
        }
    }

    #[test]
    fn target_counts_follow_text() {
        let timeline = splash();
        let (_, title) = timeline.find(StageId::TitleCharactersIn).unwrap();
        let (_, subtitle) = timeline.find(StageId::SubtitleCharactersIn).unwrap();
        assert_eq!(title.preset.targets, 14);
        assert_eq!(subtitle.preset.targets, 19);
    }

    #[test]
    fn staggered_targets_start_later() {
        let timeline = splash();
        let early = timeline.target_progress(0, 0, 0.4);
        let late = timeline.target_progress(0, 5, 0.4);
        assert!(early > late);
        assert_eq!(timeline.target_progress(0, 13, 0.0), 0.0);
        assert_eq!(timeline.target_progress(0, 13, 10.0), 1.0);
    }

    #[test]
    fn instant_stage_snaps() {
        let timeline = splash();
        let last = timeline.len() - 1;
        assert_eq!(timeline.target_progress(last, 0, 6.3), 0.0);
        assert_eq!(timeline.target_progress(last, 0, 6.4), 1.0);
    }

    #[test]
    fn rejects_bad_tables() {
        assert_eq!(EntranceTimeline::new(Vec::new()).unwrap_err(), TimelineError::Empty);
        assert!(matches!(
            EntranceTimeline::new(vec![preset(Placement::Overlap(1.0), 0.5)]),
            Err(TimelineError::NegativeStart { .. })
        ));
        assert!(matches!(
            EntranceTimeline::new(vec![
                preset(Placement::At(2.0), 0.5),
                preset(Placement::At(1.0), 0.5),
            ]),
            Err(TimelineError::OutOfOrder { index: 1, .. })
        ));
        assert!(matches!(
            EntranceTimeline::new(vec![preset(Placement::Sequential, -1.0)]),
            Err(TimelineError::InvalidTiming { field: "duration", .. })
        ));
    }

    #[test]
    fn split_keeps_spaces_as_nbsp() {
        let chars = split_chars("Code With");
        assert_eq!(chars.len(), 9);
        assert_eq!(chars[4], '\u{00A0}');
    }

    #[test]
    fn split_yields_one_span_per_stage_target() {
        let timeline = splash();
        let (_, title) = timeline.find(StageId::TitleCharactersIn).unwrap();
        let (_, subtitle) = timeline.find(StageId::SubtitleCharactersIn).unwrap();
        assert_eq!(split_chars(SPLASH_TITLE).len() as u32, title.preset.targets);
        assert_eq!(split_chars(SPLASH_SUBTITLE).len() as u32, subtitle.preset.targets);
    }
}
