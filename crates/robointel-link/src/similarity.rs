//! Trigram string similarity.
//!
//! Padded-trigram Jaccard over lowercased input, in the style of Postgres
//! `pg_trgm`: two leading and one trailing space of padding, similarity =
//! |shared trigrams| / |all trigrams|. Tolerant of minor spelling and
//! transliteration variation; identical strings score exactly 1.0.

use std::collections::HashSet;

/// Similarity between two strings in [0, 1].
pub fn trigram_similarity(a: &str, b: &str) -> f64 {
    let ta = trigram_set(a);
    let tb = trigram_set(b);
    if ta.is_empty() || tb.is_empty() {
        return 0.0;
    }
    let intersection = ta.intersection(&tb).count();
    let union = ta.union(&tb).count();
    intersection as f64 / union as f64
}

fn trigram_set(s: &str) -> HashSet<(char, char, char)> {
    let normalized = s.trim().to_lowercase();
    if normalized.is_empty() {
        return HashSet::new();
    }
    let mut chars: Vec<char> = Vec::with_capacity(normalized.chars().count() + 3);
    chars.push(' ');
    chars.push(' ');
    chars.extend(normalized.chars());
    chars.push(' ');
    chars.windows(3).map(|w| (w[0], w[1], w[2])).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_strings_score_one() {
        assert_eq!(trigram_similarity("RobotCo", "robotco"), 1.0);
        assert_eq!(trigram_similarity("  RobotCo  ", "robotco"), 1.0);
    }

    #[test]
    fn test_disjoint_strings_score_zero() {
        assert_eq!(trigram_similarity("xyz", "qrs"), 0.0);
    }

    #[test]
    fn test_empty_input_scores_zero() {
        assert_eq!(trigram_similarity("", "robotco"), 0.0);
        assert_eq!(trigram_similarity("   ", "robotco"), 0.0);
        assert_eq!(trigram_similarity("", ""), 0.0);
    }

    #[test]
    fn test_bounded_and_symmetric() {
        let pairs = [
            ("RobotCo", "RobotCo Inc"),
            ("actuator", "actuators"),
            ("Boston Dynamics", "Boston Dynamic"),
            ("유니트리", "유니트리 로보틱스"),
        ];
        for (a, b) in pairs {
            let ab = trigram_similarity(a, b);
            let ba = trigram_similarity(b, a);
            assert!((0.0..=1.0).contains(&ab));
            assert_eq!(ab, ba);
        }
    }

    #[test]
    fn test_prefix_variant_scores_high() {
        // "robotco" trigrams are a subset of "robotco inc" trigrams: 8 of 12.
        let score = trigram_similarity("RobotCo", "RobotCo Inc");
        assert!((score - 8.0 / 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_closer_variant_scores_higher() {
        let close = trigram_similarity("RobotCo", "RobotCo Inc");
        let far = trigram_similarity("RobotCo", "RobotCo Systems International");
        assert!(close > far);
    }
}
