use std::cmp::Reverse;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

pub mod candidates;

pub use self::candidates::{CandidateSet, DEFAULT_CAPACITY};
use crate::error::Result;
use crate::indexer::DatasetIndex;
use crate::normalize::{normalize, tokens};
use crate::remote::CandidateSource;
use crate::speller::SpellingOracle;

/// What to do when the inference service cannot be reached mid-query.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemoteFailurePolicy {
    /// Fail the query.
    #[default]
    Strict,
    /// Answer with the local candidates only.
    Degraded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteStatus {
    Available,
    /// The service failed and the policy allowed a local-only answer.
    Unavailable(String),
}

/// Candidates for one query, and whether the service contributed to them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestions {
    pub candidates: CandidateSet,
    pub remote: RemoteStatus,
}

/// Turns raw queries into ranked candidate phrases.
///
/// Local candidates come from spelling correction against the dataset's word
/// frequencies. Whatever capacity they leave is requested from the remote
/// source, and those phrases are ranked by dataset rating.
pub struct PromptEngine<O, S> {
    index: Arc<DatasetIndex>,
    oracle: O,
    source: S,
    capacity: usize,
    policy: RemoteFailurePolicy,
}

impl<O: SpellingOracle, S: CandidateSource> PromptEngine<O, S> {
    pub fn new(index: Arc<DatasetIndex>, oracle: O, source: S) -> Self {
        Self {
            index,
            oracle,
            source,
            capacity: DEFAULT_CAPACITY,
            policy: RemoteFailurePolicy::default(),
        }
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_policy(mut self, policy: RemoteFailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub async fn generate_candidates(&self, raw_query: &str) -> Result<Suggestions> {
        let query = normalize(raw_query);
        let (literal, corrected) = self.local_phrases(&query);

        let mut candidates = CandidateSet::with_capacity(self.capacity);
        if literal != query {
            candidates.push(literal.clone());
        }
        if corrected != query && corrected != literal {
            candidates.push(corrected.clone());
        }

        let wanted = candidates.remaining();
        let remote = match self.source.fetch_candidates(&corrected, wanted).await {
            Ok(phrases) => {
                for phrase in self.rank_by_rating(phrases) {
                    if candidates.is_full() {
                        break;
                    }
                    if !candidates.contains(&phrase) {
                        candidates.push(phrase);
                    } else {
                        tracing::debug!(%phrase, "Dropping duplicate remote candidate");
                    }
                }
                RemoteStatus::Available
            }
            Err(e) => match self.policy {
                RemoteFailurePolicy::Strict => return Err(e),
                RemoteFailurePolicy::Degraded => {
                    tracing::warn!(error = %e, "Inference service unavailable; answering with local candidates");
                    RemoteStatus::Unavailable(e.to_string())
                }
            },
        };

        tracing::debug!(%query, requested = wanted, total = candidates.len(), "Candidates generated");
        Ok(Suggestions { candidates, remote })
    }

    /// Builds the completion phrase (prior words as typed, last word
    /// corrected) and the fully corrected phrase.
    fn local_phrases(&self, query: &str) -> (String, String) {
        let words: Vec<&str> = tokens(query).collect();
        let Some((last, prior)) = words.split_last() else {
            return (String::new(), String::new());
        };

        let mut literal = String::with_capacity(query.len());
        let mut corrected = String::with_capacity(query.len());
        for word in prior {
            literal.push_str(word);
            literal.push(' ');
            corrected.push_str(&self.oracle.suggest(word, self.index.words()));
            corrected.push(' ');
        }

        // The last word may still be in progress, so it is completed in both.
        let tail = self.oracle.suggest(last, self.index.words());
        literal.push_str(&tail);
        corrected.push_str(&tail);
        (literal, corrected)
    }

    /// Highest rating first, unknown ratings last, ties keep their order.
    fn rank_by_rating(&self, mut phrases: Vec<String>) -> Vec<String> {
        phrases.sort_by_cached_key(|p| Reverse(self.index.rating_of(p)));
        phrases
    }
}
