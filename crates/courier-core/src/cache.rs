use crate::error::CoreError;
use crate::mentions::{extract_mentions, MentionToken};
use crate::resolve::{ResolutionPipeline, ResolveOptions};
use courier_api::types::ResolvedIdentity;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinSet;

/// Session-lifetime read-through cache over the resolution pipeline, keyed
/// by lowercased handle. Negative outcomes are cached too, so a handle that
/// resolved to nothing is not re-queried for the rest of the session.
///
/// There is no single-flight deduplication: two concurrent resolutions of
/// the same handle may both hit the network, and the later write wins.
#[derive(Clone)]
pub struct IdentityCache {
    pipeline: Arc<ResolutionPipeline>,
    entries: Arc<Mutex<HashMap<String, Option<ResolvedIdentity>>>>,
}

fn cache_key(handle: &str) -> String {
    handle.trim().trim_start_matches('@').to_ascii_lowercase()
}

impl IdentityCache {
    pub fn new(pipeline: Arc<ResolutionPipeline>) -> Self {
        Self {
            pipeline,
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Cached outcome for a handle, without any network activity. The outer
    /// `None` means the handle was never resolved this session; the inner
    /// `None` is a cached negative.
    pub async fn get(&self, handle: &str) -> Option<Option<ResolvedIdentity>> {
        self.entries.lock().await.get(&cache_key(handle)).cloned()
    }

    /// Resolves through the pipeline on cache miss and stores the outcome,
    /// even a negative one, before returning. Validation failures are not
    /// cached; they are synchronous and carry no lookup cost.
    pub async fn resolve(
        &self,
        handle: &str,
        opts: &ResolveOptions,
    ) -> Result<Option<ResolvedIdentity>, CoreError> {
        let key = cache_key(handle);
        if let Some(cached) = self.entries.lock().await.get(&key) {
            return Ok(cached.clone());
        }
        let outcome = self.pipeline.resolve(handle, opts).await?;
        self.entries.lock().await.insert(key, outcome.clone());
        Ok(outcome)
    }

    /// Resolves every uncached handle concurrently (mention semantics) and
    /// merges the outcomes. Best effort: a handle that fails validation is
    /// simply skipped.
    pub async fn preload(&self, handles: &[String]) {
        let mut pending = Vec::new();
        {
            let entries = self.entries.lock().await;
            let mut seen = HashSet::new();
            for handle in handles {
                let key = cache_key(handle);
                if !entries.contains_key(&key) && seen.insert(key) {
                    pending.push(handle.clone());
                }
            }
        }
        if pending.is_empty() {
            return;
        }
        let mut set = JoinSet::new();
        for handle in pending {
            let pipeline = self.pipeline.clone();
            set.spawn(async move {
                let outcome = pipeline
                    .resolve(&handle, &ResolveOptions::default())
                    .await
                    .unwrap_or(None);
                (cache_key(&handle), outcome)
            });
        }
        while let Some(joined) = set.join_next().await {
            if let Ok((key, outcome)) = joined {
                self.entries.lock().await.insert(key, outcome);
            }
        }
    }

    /// Tokenizes the text and resolves all mentions concurrently, preserving
    /// token order in the result.
    pub async fn resolve_mentions_in_text(
        &self,
        text: &str,
    ) -> Vec<(MentionToken, Option<ResolvedIdentity>)> {
        let mentions = extract_mentions(text);
        let mut set = JoinSet::new();
        for (position, token) in mentions.iter().enumerate() {
            let cache = self.clone();
            let username = token.username.clone();
            set.spawn(async move {
                let outcome = cache
                    .resolve(&username, &ResolveOptions { is_mention: true })
                    .await
                    .unwrap_or(None);
                (position, outcome)
            });
        }
        let mut outcomes: Vec<Option<ResolvedIdentity>> = vec![None; mentions.len()];
        while let Some(joined) = set.join_next().await {
            if let Ok((position, outcome)) = joined {
                outcomes[position] = outcome;
            }
        }
        mentions.into_iter().zip(outcomes).collect()
    }

    pub async fn clear(&self) {
        self.entries.lock().await.clear();
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }
}
