use std::collections::HashMap;
use std::path::Path;

pub mod dataset;

use self::dataset::Record;
use crate::error::Result;
use crate::normalize::{normalize, tokens};

/// Normalized token -> number of times it occurs across all titles.
pub type FrequencyIndex = HashMap<String, u64>;
/// Normalized title -> rating, as the dataset stores it.
pub type RatingIndex = HashMap<String, String>;

/// The two read-only lookups built from the movie dataset.
///
/// Built once at startup and then shared by reference; nothing mutates it
/// afterwards, so concurrent readers need no synchronization.
#[derive(Debug, Default, Clone)]
pub struct DatasetIndex {
    words: FrequencyIndex,
    ratings: RatingIndex,
}

impl DatasetIndex {
    /// Parses the dataset at `path` and builds both indexes.
    ///
    /// Any I/O or parse failure is returned as is; callers treat it as fatal.
    pub fn load(path: &Path, with_ratings: bool) -> Result<Self> {
        tracing::info!(path = %path.display(), with_ratings, "Indexing dataset");
        let records = dataset::parse_csv(path, with_ratings)?;
        let index = Self::from_records(&records);
        tracing::info!(
            rows = records.len(),
            tokens = index.words.len(),
            titles = index.ratings.len(),
            "Dataset indexed"
        );
        Ok(index)
    }

    pub fn from_records(records: &[Record]) -> Self {
        let mut index = Self {
            words: HashMap::with_capacity(1000),
            ratings: HashMap::with_capacity(1000),
        };
        for record in records {
            let clean = normalize(&record.title);
            for word in tokens(&clean).filter(|w| !w.is_empty()) {
                *index.words.entry(word.to_string()).or_insert(0) += 1;
            }
            if let Some(rating) = &record.rating {
                index.ratings.insert(clean, rating.clone());
            }
        }
        index
    }

    pub fn words(&self) -> &FrequencyIndex {
        &self.words
    }

    pub fn ratings(&self) -> &RatingIndex {
        &self.ratings
    }

    /// Rating for a phrase, looked up by its normalized form.
    ///
    /// Empty rating fields count as unknown.
    pub fn rating_of(&self, phrase: &str) -> Option<&str> {
        self.ratings
            .get(&normalize(phrase))
            .map(String::as_str)
            .filter(|r| !r.is_empty())
    }
}
