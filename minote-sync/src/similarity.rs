//! Text similarity
//!
//! Levenshtein edit distance over Unicode scalar values and the normalized
//! similarity score derived from it. Used by the loose duplicate tier to
//! compare notes.
//!
//! Both functions are pure and defer to `strsim`, which counts `char`s,
//! so a CJK character costs one edit just like an ASCII letter.

/// Levenshtein distance: insert, delete and substitute each cost 1
///
/// An empty string is `len(other)` edits away from `other`.
pub fn edit_distance(a: &str, b: &str) -> usize {
    strsim::levenshtein(a, b)
}

/// `1 - edit_distance / max(len(a), len(b))`, clamped to `[0, 1]`
///
/// Two empty strings are identical (1.0).
pub fn similarity(a: &str, b: &str) -> f64 {
    let longest = a.chars().count().max(b.chars().count());
    if longest == 0 {
        return 1.0;
    }
    let score = 1.0 - edit_distance(a, b) as f64 / longest as f64;
    score.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classic_examples() {
        assert_eq!(edit_distance("kitten", "sitting"), 3);
        assert_eq!(edit_distance("flaw", "lawn"), 2);
        assert_eq!(edit_distance("abc", "abc"), 0);
    }

    #[test]
    fn test_empty_inputs() {
        assert_eq!(edit_distance("", "abc"), 3);
        assert_eq!(edit_distance("abc", ""), 3);
        assert_eq!(edit_distance("", ""), 0);
    }

    #[test]
    fn test_counts_scalars_not_bytes() {
        // each CJK char is 3 bytes in UTF-8 but one edit
        assert_eq!(edit_distance("开心", "开朗"), 1);
        assert_eq!(edit_distance("", "笔记内容"), 4);
        assert_eq!(similarity("今天很开心", "今天很开心！"), 1.0 - 1.0 / 6.0);
    }

    #[test]
    fn test_similarity_bounds() {
        assert_eq!(similarity("abc", "abc"), 1.0);
        assert_eq!(similarity("", ""), 1.0);
        assert_eq!(similarity("abc", ""), 0.0);
        assert_eq!(similarity("abc", "xyz"), 0.0);
    }

    #[test]
    fn test_similarity_is_symmetric() {
        let a = "feeling great today";
        let b = "feeling great today!";
        assert_eq!(similarity(a, b), similarity(b, a));
        assert!((similarity(a, b) - 0.95).abs() < 1e-9);
    }
}
