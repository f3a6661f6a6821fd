//! Recency/relevance context window assembly.

use crate::error::PipelineError;
use log::debug;
use mnemo_retrieval::{RelevanceRanker, Vectorizer};
use mnemo_storage::{Role, Turn};
use std::collections::HashSet;

/// Assembles the bounded, deduplicated context window for a query.
///
/// The window merges two explicitly ordered selections: the most recent
/// complete (user, assistant) pairs in chronological order, then the
/// semantically relevant turns in descending similarity order, skipping
/// any whose content was already emitted. The output is implicitly
/// bounded by `recency_window` plus the ranker's top-k.
pub struct ContextAssembler {
    vectorizer: Vectorizer,
    ranker: RelevanceRanker,
    recency_window: usize,
}

impl ContextAssembler {
    /// Create an assembler with the given retrieval components.
    pub fn new(vectorizer: Vectorizer, ranker: RelevanceRanker, recency_window: usize) -> Self {
        Self {
            vectorizer,
            ranker,
            recency_window,
        }
    }

    /// Assemble the context window for `query` over `history`.
    ///
    /// An empty history returns an empty window without invoking the
    /// embedding backend; so does a query with no embeddable text, which
    /// yields a recency-only window.
    pub async fn assemble(&self, history: &[Turn], query: &str) -> Result<Vec<Turn>, PipelineError> {
        if history.is_empty() {
            return Ok(Vec::new());
        }

        let recency = self.recency_set(history);
        if query.trim().is_empty() {
            return Ok(Self::merge(&recency, &[]));
        }

        // candidates with embeddable content, index-aligned for the ranker
        let candidates: Vec<&Turn> = history
            .iter()
            .filter(|turn| !turn.content.trim().is_empty())
            .collect();
        let mut texts: Vec<String> = candidates
            .iter()
            .map(|turn| turn.content.clone())
            .collect();
        texts.push(query.to_string());

        let mut vectors = self.vectorizer.embed(&texts).await?;
        let Some(query_vector) = vectors.pop() else {
            return Ok(Self::merge(&recency, &[]));
        };
        let ranked = self.ranker.rank(&query_vector, &vectors);
        let relevance: Vec<&Turn> = ranked.iter().map(|entry| candidates[entry.index]).collect();

        let window = Self::merge(&recency, &relevance);
        debug!(
            "assembled context (history={}, recency={}, relevance={}, window={})",
            history.len(),
            recency.len(),
            relevance.len(),
            window.len()
        );
        Ok(window)
    }

    /// The most recent complete (user, assistant) pairs, oldest first.
    ///
    /// Walks history newest to oldest, pairing each assistant turn with
    /// its immediately preceding user turn until `recency_window` turns
    /// are collected. Trailing user turns without an assistant reply are
    /// not included.
    fn recency_set<'a>(&self, history: &'a [Turn]) -> Vec<&'a Turn> {
        let mut pairs: Vec<(&Turn, &Turn)> = Vec::new();
        let mut pending_assistant: Option<&Turn> = None;
        for turn in history.iter().rev() {
            if pairs.len() * 2 >= self.recency_window {
                break;
            }
            match turn.role {
                Role::Assistant => pending_assistant = Some(turn),
                Role::User => {
                    if let Some(assistant) = pending_assistant.take() {
                        pairs.push((turn, assistant));
                    }
                }
            }
        }
        pairs
            .iter()
            .rev()
            .flat_map(|(user, assistant)| [*user, *assistant])
            .collect()
    }

    /// Merge the two ordered selections, deduplicating by exact content.
    ///
    /// Two distinct turns with identical text are treated as duplicates;
    /// the first emission wins, so overlap stays in the recency prefix.
    fn merge(recency: &[&Turn], relevance: &[&Turn]) -> Vec<Turn> {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut window = Vec::new();
        for turn in recency.iter().chain(relevance.iter()) {
            if seen.insert(turn.content.as_str()) {
                window.push((*turn).clone());
            }
        }
        window
    }
}

#[cfg(test)]
mod tests {
    use super::ContextAssembler;
    use chrono::{TimeZone, Utc};
    use mnemo_retrieval::{RelevanceRanker, Vectorizer};
    use mnemo_storage::{Role, Turn};
    use mnemo_test_utils::StubEmbedder;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn turn(id: i64, role: Role, content: &str) -> Turn {
        Turn {
            id,
            user_id: 1,
            role,
            content: content.to_string(),
            segmented_content: None,
            timestamp: Utc.timestamp_opt(1_700_000_000 + id, 0).unwrap(),
            memory_id: None,
        }
    }

    fn assembler(embedder: Arc<StubEmbedder>, recency_window: usize) -> ContextAssembler {
        ContextAssembler::new(
            Vectorizer::new(embedder),
            RelevanceRanker::new(0.6, 5),
            recency_window,
        )
    }

    fn contents(window: &[Turn]) -> Vec<&str> {
        window.iter().map(|turn| turn.content.as_str()).collect()
    }

    #[tokio::test]
    async fn empty_history_skips_the_backend() {
        let embedder = Arc::new(StubEmbedder::new());
        let assembler = assembler(embedder.clone(), 4);
        let window = assembler.assemble(&[], "anything").await.expect("assemble");
        assert_eq!(window, Vec::new());
        assert_eq!(embedder.calls(), 0);
    }

    #[tokio::test]
    async fn recency_set_collects_complete_pairs_chronologically() {
        let embedder = Arc::new(StubEmbedder::new());
        let assembler = assembler(embedder, 4);
        let history = vec![
            turn(1, Role::User, "q1"),
            turn(2, Role::Assistant, "a1"),
            turn(3, Role::User, "q2"),
            turn(4, Role::Assistant, "a2"),
            turn(5, Role::User, "q3"),
            turn(6, Role::Assistant, "a3"),
        ];
        let window = assembler.assemble(&history, "query").await.expect("assemble");
        // window of 4 turns: the two most recent pairs, oldest first
        assert_eq!(contents(&window), vec!["q2", "a2", "q3", "a3"]);
    }

    #[tokio::test]
    async fn trailing_unanswered_user_turn_is_excluded() {
        let embedder = Arc::new(StubEmbedder::new());
        let assembler = assembler(embedder, 4);
        let history = vec![
            turn(1, Role::User, "q1"),
            turn(2, Role::Assistant, "a1"),
            turn(3, Role::User, "pending"),
        ];
        let window = assembler.assemble(&history, "query").await.expect("assemble");
        assert_eq!(contents(&window), vec!["q1", "a1"]);
    }

    #[tokio::test]
    async fn relevant_turns_follow_the_recency_prefix_by_similarity() {
        let embedder = Arc::new(
            StubEmbedder::new()
                .with_vector("old fact", vec![0.9, 0.1])
                .with_vector("older fact", vec![1.0, 0.0])
                .with_vector("query", vec![1.0, 0.0]),
        );
        let assembler = assembler(embedder, 2);
        let history = vec![
            turn(1, Role::User, "older fact"),
            turn(2, Role::Assistant, "old fact"),
            turn(3, Role::User, "q2"),
            turn(4, Role::Assistant, "a2"),
        ];
        let window = assembler.assemble(&history, "query").await.expect("assemble");
        // recency pair first, then relevance hits ordered by similarity
        assert_eq!(contents(&window), vec!["q2", "a2", "older fact", "old fact"]);
    }

    #[tokio::test]
    async fn duplicate_content_stays_in_the_recency_prefix() {
        let embedder = Arc::new(
            StubEmbedder::new()
                .with_vector("repeated", vec![0.8, 0.2])
                .with_vector("query", vec![1.0, 0.0]),
        );
        let assembler = assembler(embedder, 4);
        let history = vec![
            turn(1, Role::User, "repeated"),
            turn(2, Role::Assistant, "a1"),
            turn(3, Role::User, "repeated"),
            turn(4, Role::Assistant, "a2"),
        ];
        let window = assembler.assemble(&history, "query").await.expect("assemble");
        let repeats = window
            .iter()
            .filter(|turn| turn.content == "repeated")
            .count();
        assert_eq!(repeats, 1);
        assert_eq!(contents(&window)[0], "repeated");
    }

    #[tokio::test]
    async fn assembly_is_deterministic_for_identical_input() {
        let embedder = Arc::new(
            StubEmbedder::new()
                .with_vector("fact", vec![1.0, 0.0])
                .with_vector("query", vec![1.0, 0.0]),
        );
        let assembler = assembler(embedder, 2);
        let history = vec![
            turn(1, Role::User, "fact"),
            turn(2, Role::Assistant, "a1"),
            turn(3, Role::User, "q2"),
            turn(4, Role::Assistant, "a2"),
        ];
        let first = assembler.assemble(&history, "query").await.expect("assemble");
        let second = assembler.assemble(&history, "query").await.expect("assemble");
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn blank_query_yields_recency_only() {
        let embedder = Arc::new(StubEmbedder::new());
        let assembler = assembler(embedder.clone(), 2);
        let history = vec![
            turn(1, Role::User, "q1"),
            turn(2, Role::Assistant, "a1"),
        ];
        let window = assembler.assemble(&history, "   ").await.expect("assemble");
        assert_eq!(contents(&window), vec!["q1", "a1"]);
        assert_eq!(embedder.calls(), 0);
    }
}
