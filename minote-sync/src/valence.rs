//! Valence mapping
//!
//! Some external mood sources store a signed pleasantness score in
//! [-1, 1] instead of a label. These helpers translate between the two so
//! such sources can share the one `ExternalMoodSource` interface.

/// Mood used when neither label nor valence is available
pub const NEUTRAL_MOOD: &str = "一般";

/// Label for a valence score (clamped to [-1, 1])
pub fn mood_for_valence(valence: f64) -> &'static str {
    let v = if valence.is_nan() { 0.0 } else { valence.clamp(-1.0, 1.0) };
    if v < -0.6 {
        "非常难过"
    } else if v < -0.2 {
        "难过"
    } else if v < 0.2 {
        NEUTRAL_MOOD
    } else if v < 0.6 {
        "开心"
    } else {
        "非常开心"
    }
}

/// Valence score for a mood label; unknown labels are neutral
pub fn valence_for_mood(mood: &str) -> f64 {
    match mood {
        "非常难过" | "抑郁" | "绝望" => -0.8,
        "难过" | "沮丧" | "有点难过" => -0.4,
        "一般" | "平静" | "中性" => 0.0,
        "开心" | "愉快" | "比较开心" | "轻松" => 0.4,
        "非常开心" | "狂欢" | "兴奋" | "满足" => 0.8,
        _ => 0.0,
    }
}
