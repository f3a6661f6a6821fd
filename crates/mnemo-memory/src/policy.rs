//! Importance scoring and tier assignment for incoming messages.

use mnemo_storage::MemoryTier;

/// Default ceiling on short-term records per user.
pub const DEFAULT_SHORT_TERM_LIMIT: usize = 10;
/// Default score at or above which a message is retained long-term.
pub const DEFAULT_IMPORTANCE_THRESHOLD: f64 = 0.7;

/// Emotion confidence above which the emotion signal raises importance.
const EMOTION_CONFIDENCE_FLOOR: f64 = 0.8;

/// Need/question keywords that raise importance, spanning zh and en.
const IMPORTANCE_KEYWORDS: &[&str] = &[
    "需要", "问题", "如何", "为什么", "how", "why", "need", "problem",
];

/// Additive importance heuristic deciding which tier retains a message.
///
/// Scoring is a pure function; persistence is the memory service's job.
#[derive(Debug, Clone)]
pub struct ImportancePolicy {
    /// Score at or above which a message becomes long-term.
    pub importance_threshold: f64,
}

impl Default for ImportancePolicy {
    fn default() -> Self {
        Self {
            importance_threshold: DEFAULT_IMPORTANCE_THRESHOLD,
        }
    }
}

impl ImportancePolicy {
    /// Score a message in [0, 1].
    ///
    /// Length contributes +0.3 above 200 chars, +0.2 above 100, else +0.1;
    /// an emotion signal with confidence above 0.8 contributes +0.3; any
    /// need/question keyword contributes +0.2. The sum is capped at 1.0.
    pub fn score(&self, message: &str, emotion_confidence: Option<f64>) -> f64 {
        let mut score: f64 = 0.0;

        let length = message.chars().count();
        if length > 200 {
            score += 0.3;
        } else if length > 100 {
            score += 0.2;
        } else {
            score += 0.1;
        }

        if emotion_confidence.is_some_and(|confidence| confidence > EMOTION_CONFIDENCE_FLOOR) {
            score += 0.3;
        }

        let lowered = message.to_lowercase();
        if IMPORTANCE_KEYWORDS
            .iter()
            .any(|keyword| lowered.contains(keyword))
        {
            score += 0.2;
        }

        score.min(1.0)
    }

    /// Assign a retention tier for a score; the threshold itself is
    /// long-term. Tiers never change after assignment.
    pub fn tier_for(&self, score: f64) -> MemoryTier {
        if score >= self.importance_threshold {
            MemoryTier::LongTerm
        } else {
            MemoryTier::ShortTerm
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ImportancePolicy;
    use mnemo_storage::MemoryTier;
    use pretty_assertions::assert_eq;

    #[test]
    fn long_plain_message_scores_length_only() {
        let policy = ImportancePolicy::default();
        let message = "a".repeat(250);
        let score = policy.score(&message, None);
        assert!((score - 0.3).abs() < 1e-9);
        assert_eq!(policy.tier_for(score), MemoryTier::ShortTerm);
    }

    #[test]
    fn short_emotional_question_stays_short_term() {
        let policy = ImportancePolicy::default();
        let message = format!("why {}", "a".repeat(46));
        assert_eq!(message.chars().count(), 50);
        let score = policy.score(&message, Some(0.9));
        // 0.1 length + 0.3 emotion + 0.2 keyword
        assert!((score - 0.6).abs() < 1e-9);
        assert_eq!(policy.tier_for(score), MemoryTier::ShortTerm);
    }

    #[test]
    fn threshold_boundary_is_long_term() {
        let policy = ImportancePolicy::default();
        assert_eq!(policy.tier_for(0.7), MemoryTier::LongTerm);
        assert_eq!(policy.tier_for(0.699), MemoryTier::ShortTerm);
    }

    #[test]
    fn chinese_keywords_count() {
        let policy = ImportancePolicy::default();
        let score = policy.score("这是一个问题", None);
        // 0.1 length + 0.2 keyword
        assert!((score - 0.3).abs() < 1e-9);
    }

    #[test]
    fn all_contributions_combine() {
        let policy = ImportancePolicy::default();
        let message = format!("why do I need this {}", "a".repeat(250));
        let score = policy.score(&message, Some(0.95));
        // 0.3 length + 0.3 emotion + 0.2 keyword
        assert!((score - 0.8).abs() < 1e-9);
        assert_eq!(policy.tier_for(score), MemoryTier::LongTerm);
    }

    #[test]
    fn low_confidence_emotion_is_ignored() {
        let policy = ImportancePolicy::default();
        let score = policy.score("hello there", Some(0.8));
        assert!((score - 0.1).abs() < 1e-9);
    }

    #[test]
    fn length_tier_midband() {
        let policy = ImportancePolicy::default();
        let message = "a".repeat(150);
        let score = policy.score(&message, None);
        assert!((score - 0.2).abs() < 1e-9);
    }
}
