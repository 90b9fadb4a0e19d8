//! Tweened element state of the splash at a point on the timeline.

use serde::{Deserialize, Serialize};

use crate::easing::lerp;
use crate::timeline::{EntranceTimeline, StageId, DECORATION_COUNT};

const CHAR_START_Y_PX: f32 = 40.0;
const CHAR_START_ROTATE_X_DEG: f32 = -90.0;
const DIVIDER_WIDTH_REM: f32 = 8.0;
const GRADIENT_START_OPACITY: f32 = 0.9;
const CONTENT_START_Y_PX: f32 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CharVisual {
    pub opacity: f32,
    pub y_px: f32,
    pub rotate_x_deg: f32,
}

impl CharVisual {
    fn at(progress: f32) -> Self {
        Self {
            opacity: progress.clamp(0.0, 1.0),
            y_px: lerp(CHAR_START_Y_PX, 0.0, progress),
            rotate_x_deg: lerp(CHAR_START_ROTATE_X_DEG, 0.0, progress),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PopVisual {
    pub scale: f32,
    pub opacity: f32,
}

impl PopVisual {
    fn at(progress: f32) -> Self {
        Self {
            scale: progress.max(0.0),
            opacity: progress.clamp(0.0, 1.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplashVisuals {
    pub title: Vec<CharVisual>,
    pub subtitle: Vec<CharVisual>,
    pub divider_width_rem: f32,
    pub divider_opacity: f32,
    pub decorations: Vec<PopVisual>,
    pub gradient_opacity: f32,
    /// Vertical translation of the whole splash, in percent of its height.
    pub screen_offset_percent: f32,
    pub content_opacity: f32,
    pub content_offset_px: f32,
    pub screen_displayed: bool,
}

impl SplashVisuals {
    /// State before any stage has run.
    pub fn initial(timeline: &EntranceTimeline) -> Self {
        Self::sample(timeline, f32::NEG_INFINITY)
    }

    pub fn sample(timeline: &EntranceTimeline, time_seconds: f32) -> Self {
        let targets = |id| {
            timeline
                .find(id)
                .map(|(i, s)| (i, s.preset.targets))
        };
        let single = |id| {
            timeline
                .find(id)
                .map(|(i, _)| timeline.target_progress(i, 0, time_seconds))
                .unwrap_or(0.0)
        };
        let per_target = |id, fallback: u32| -> Vec<f32> {
            match targets(id) {
                Some((i, n)) => (0..n)
                    .map(|k| timeline.target_progress(i, k, time_seconds))
                    .collect(),
                None => vec![0.0; fallback as usize],
            }
        };

        let divider = single(StageId::DividerGrow);
        let gradient = single(StageId::GradientFadeOut);
        let slide = single(StageId::ScreenSlideAway);
        let content = single(StageId::ContentFadeIn);
        let hidden = single(StageId::ScreenHidden);

        Self {
            title: per_target(StageId::TitleCharactersIn, 0)
                .into_iter()
                .map(CharVisual::at)
                .collect(),
            subtitle: per_target(StageId::SubtitleCharactersIn, 0)
                .into_iter()
                .map(CharVisual::at)
                .collect(),
            divider_width_rem: lerp(0.0, DIVIDER_WIDTH_REM, divider),
            divider_opacity: divider.clamp(0.0, 1.0),
            decorations: per_target(StageId::DecorationsPopIn, DECORATION_COUNT)
                .into_iter()
                .map(PopVisual::at)
                .collect(),
            gradient_opacity: lerp(GRADIENT_START_OPACITY, 0.0, gradient),
            screen_offset_percent: lerp(0.0, -100.0, slide),
            content_opacity: content.clamp(0.0, 1.0),
            content_offset_px: lerp(CONTENT_START_Y_PX, 0.0, content),
            screen_displayed: hidden < 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::SplashVisuals;
    use crate::timeline::{EntranceTimeline, SPLASH_SUBTITLE, SPLASH_TITLE};

    fn timeline() -> EntranceTimeline {
        EntranceTimeline::splash_sequence(SPLASH_TITLE, SPLASH_SUBTITLE).unwrap()
    }

    #[test]
    fn initial_state_hides_everything() {
        let v = SplashVisuals::initial(&timeline());
        assert_eq!(v.title.len(), 14);
        assert_eq!(v.subtitle.len(), 19);
        assert_eq!(v.decorations.len(), 10);
        assert!(v.title.iter().all(|c| c.opacity == 0.0 && c.y_px == 40.0));
        assert_eq!(v.divider_width_rem, 0.0);
        assert_eq!(v.gradient_opacity, 0.9);
        assert_eq!(v.content_opacity, 0.0);
        assert_eq!(v.content_offset_px, 20.0);
        assert!(v.screen_displayed);
    }

    #[test]
    fn final_state_reveals_content() {
        let t = timeline();
        let v = SplashVisuals::sample(&t, t.total_duration() + 0.01);
        assert!(v.title.iter().all(|c| c.opacity == 1.0 && c.rotate_x_deg.abs() < 1e-4));
        assert!((v.divider_width_rem - 8.0).abs() < 1e-4);
        assert!(v.decorations.iter().all(|d| (d.scale - 1.0).abs() < 1e-4));
        assert_eq!(v.gradient_opacity, 0.0);
        assert_eq!(v.screen_offset_percent, -100.0);
        assert_eq!(v.content_opacity, 1.0);
        assert!(!v.screen_displayed);
    }

    #[test]
    fn hold_keeps_text_and_gradient() {
        let t = timeline();
        let v = SplashVisuals::sample(&t, 3.5);
        assert!(v.title.iter().all(|c| c.opacity == 1.0));
        assert_eq!(v.gradient_opacity, 0.9);
        assert_eq!(v.screen_offset_percent, 0.0);
    }
}
