//! Scroll-scrubbed word reveal for long-form text below the splash.

pub const DIMMED_OPACITY: f32 = 0.2;

/// Opacity of word `index` out of `total` at `progress` in `[0, 1]`.
pub fn word_opacity(index: usize, total: usize, progress: f32) -> f32 {
    if total == 0 {
        return DIMMED_OPACITY;
    }
    let width = 1.0 / total as f32;
    let start = index as f32 * width;
    let local = ((progress - start) / width).clamp(0.0, 1.0);
    DIMMED_OPACITY + (1.0 - DIMMED_OPACITY) * local
}

/// Opacities for every whitespace-separated word of `text`.
pub fn reveal_words(text: &str, progress: f32) -> Vec<(&str, f32)> {
    let words: Vec<&str> = text.split_whitespace().collect();
    let total = words.len();
    words
        .into_iter()
        .enumerate()
        .map(|(i, w)| (w, word_opacity(i, total, progress)))
        .collect()
}

/// Opacities only, in word order. Exported to the page's scroll handler.
#[cfg_attr(feature = "web", wasm_bindgen::prelude::wasm_bindgen(js_name = wordOpacities))]
pub fn word_opacities(text: &str, progress: f32) -> Vec<f32> {
    reveal_words(text, progress)
        .into_iter()
        .map(|(_, opacity)| opacity)
        .collect()
}
