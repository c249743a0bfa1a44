//! Movie-title search prompts.
//!
//! Builds word-frequency and rating lookups from a movie dataset, corrects
//! and completes queries against them, and tops the result up with phrases
//! from a sibling inference service ranked by rating.

pub mod config;
pub mod engine;
pub mod error;
pub mod indexer;
pub mod normalize;
pub mod readiness;
pub mod remote;
pub mod session;
pub mod speller;

pub use config::Config;
pub use engine::{CandidateSet, PromptEngine, RemoteFailurePolicy, RemoteStatus, Suggestions};
pub use error::{Error, Result};
pub use indexer::DatasetIndex;
pub use readiness::ReadinessCoordinator;
pub use remote::RemoteClient;
pub use speller::{EditDistanceSpeller, SpellingOracle};
