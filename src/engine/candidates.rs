/// Default number of phrases offered per query.
pub const DEFAULT_CAPACITY: usize = 5;

/// Ordered, duplicate-free, capacity-bounded list of phrases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateSet {
    items: Vec<String>,
    capacity: usize,
}

impl CandidateSet {
    pub fn with_capacity(capacity: usize) -> Self {
        Self { items: Vec::with_capacity(capacity), capacity }
    }

    /// Appends `phrase` unless it is already present or the set is full.
    /// Returns whether it was added.
    pub fn push(&mut self, phrase: String) -> bool {
        if self.is_full() || self.contains(&phrase) {
            return false;
        }
        self.items.push(phrase);
        true
    }

    pub fn contains(&self, phrase: &str) -> bool {
        self.items.iter().any(|p| p == phrase)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Slots left before the set is full.
    pub fn remaining(&self) -> usize {
        self.capacity - self.items.len()
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.items.get(index).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(String::as_str)
    }

    pub fn into_vec(self) -> Vec<String> {
        self.items
    }
}
