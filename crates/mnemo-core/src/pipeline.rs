//! The message-handling pipeline.

use crate::context::ContextAssembler;
use crate::error::PipelineError;
use crate::gate::AdmissionGate;
use crate::language::{Segmenter, is_cjk, language_hint};
use crate::prompt::build_messages;
use chrono::Utc;
use log::{debug, info};
use mnemo_config::MnemoConfig;
use mnemo_memory::{
    CachedSentiment, ImportancePolicy, MemoryService, SentimentBackend,
};
use mnemo_protocol::{Completion, CompletionBackend, MemoryId, UserId};
use mnemo_retrieval::{EmbeddingBackend, RelevanceRanker, Vectorizer};
use mnemo_storage::{ConversationStore, GlobalStats, MemoryTier, Role, TierStats, Turn};
use std::sync::Arc;

/// Outcome of recording a message and assembling its context window.
#[derive(Debug)]
pub struct AssembledContext {
    /// Memory record created for the recorded message.
    pub memory_id: MemoryId,
    /// Deduplicated context window, recency turns first.
    pub window: Vec<Turn>,
}

/// Orchestrates one conversational round end to end.
///
/// A round is: admit, classify and persist the user turn, assemble the
/// context window from prior history, call the completion backend, and
/// persist the assistant reply under the same lifecycle rules. All
/// collaborators are injected; the pipeline owns only the wiring.
pub struct Pipeline {
    store: Arc<dyn ConversationStore>,
    memory: MemoryService,
    assembler: ContextAssembler,
    completion: Arc<dyn CompletionBackend>,
    sentiment: Option<CachedSentiment>,
    sentiment_cache_size: usize,
    segmenter: Option<Arc<dyn Segmenter>>,
    gate: AdmissionGate,
}

impl Pipeline {
    /// Wire a pipeline from config and its storage, embedding, and
    /// completion collaborators.
    pub fn new(
        config: &MnemoConfig,
        store: Arc<dyn ConversationStore>,
        embedding: Arc<dyn EmbeddingBackend>,
        completion: Arc<dyn CompletionBackend>,
    ) -> Self {
        let policy = ImportancePolicy {
            importance_threshold: config.memory.importance_threshold,
        };
        let memory = MemoryService::new(store.clone(), policy, config.memory.short_term_limit);
        let assembler = ContextAssembler::new(
            Vectorizer::new(embedding),
            RelevanceRanker::new(config.retrieval.similarity_threshold, config.retrieval.top_k),
            config.context.recency_window,
        );
        Self {
            store,
            memory,
            assembler,
            completion,
            sentiment: None,
            sentiment_cache_size: config.memory.sentiment_cache_size,
            segmenter: None,
            gate: AdmissionGate::new(config.pipeline.max_concurrent),
        }
    }

    /// Attach a sentiment backend, cached per the configured capacity.
    ///
    /// Without one, scoring runs with no emotion signal.
    pub fn with_sentiment(mut self, backend: Arc<dyn SentimentBackend>) -> Self {
        self.sentiment = Some(CachedSentiment::new(backend, self.sentiment_cache_size));
        self
    }

    /// Attach a segmenter for languages without whitespace tokenization.
    pub fn with_segmenter(mut self, segmenter: Arc<dyn Segmenter>) -> Self {
        self.segmenter = Some(segmenter);
        self
    }

    /// Run one full round: record the user message, assemble its context,
    /// obtain a completion, and record the assistant reply.
    ///
    /// Fails fast with `Busy` when the gate rejects the request and with
    /// `EmptyInput` for whitespace-only messages; neither leaves any
    /// partial state behind.
    pub async fn handle_message(
        &self,
        user_id: UserId,
        message: &str,
    ) -> Result<Completion, PipelineError> {
        let _permit = self.gate.try_admit(user_id)?;
        let question = message.trim();
        let assembled = self.assemble_inner(user_id, question).await?;
        let messages = build_messages(&assembled.window, question);
        let completion = self.completion.complete(&messages).await?;
        // the reply enters the same memory lifecycle, with no emotion signal
        self.record_turn(user_id, Role::Assistant, &completion.content, None)?;
        info!(
            "completed round (user_id={}, window={}, reply_len={})",
            user_id,
            assembled.window.len(),
            completion.content.chars().count()
        );
        Ok(completion)
    }

    /// Record a user message and assemble its context window without
    /// calling the completion backend.
    pub async fn assemble_context(
        &self,
        user_id: UserId,
        message: &str,
    ) -> Result<AssembledContext, PipelineError> {
        let _permit = self.gate.try_admit(user_id)?;
        self.assemble_inner(user_id, message.trim()).await
    }

    /// Per-tier memory stats for one user.
    pub fn stats(&self, user_id: UserId) -> Result<Vec<TierStats>, PipelineError> {
        Ok(self.memory.stats(user_id)?)
    }

    /// Aggregate memory stats across all users.
    pub fn global_stats(&self) -> Result<GlobalStats, PipelineError> {
        Ok(self.memory.global_stats()?)
    }

    /// The recording and assembly steps shared by both entry points.
    ///
    /// History is read before the message is appended, so the new turn can
    /// never be selected as its own context.
    async fn assemble_inner(
        &self,
        user_id: UserId,
        question: &str,
    ) -> Result<AssembledContext, PipelineError> {
        if question.is_empty() {
            return Err(PipelineError::EmptyInput);
        }
        self.store.ensure_user(user_id)?;
        let history = self.store.read_history(user_id)?;

        let emotion_confidence = match &self.sentiment {
            Some(cache) => {
                let sentiment = cache.classify(question, language_hint(question)).await?;
                debug!(
                    "classified sentiment (user_id={}, label={}, confidence={:.2})",
                    user_id, sentiment.label, sentiment.confidence
                );
                Some(sentiment.confidence)
            }
            None => None,
        };

        let memory_id = self.record_turn(user_id, Role::User, question, emotion_confidence)?;
        let window = self.assembler.assemble(&history, question).await?;
        Ok(AssembledContext { memory_id, window })
    }

    /// Classify and persist one turn atomically, then enforce the
    /// short-term ceiling when the new record landed in that tier.
    fn record_turn(
        &self,
        user_id: UserId,
        role: Role,
        content: &str,
        emotion_confidence: Option<f64>,
    ) -> Result<MemoryId, PipelineError> {
        let policy = self.memory.policy();
        let score = policy.score(content, emotion_confidence);
        let tier = policy.tier_for(score);
        let segmented = self
            .segmenter
            .as_ref()
            .filter(|_| is_cjk(content))
            .map(|segmenter| segmenter.segment(content));
        let (_turn_id, memory_id) = self.store.append_turn_with_memory(
            user_id,
            role,
            content,
            segmented.as_deref(),
            Utc::now(),
            score,
            tier,
        )?;
        if tier == MemoryTier::ShortTerm {
            self.memory.enforce_short_term_limit(user_id)?;
        }
        Ok(memory_id)
    }
}
