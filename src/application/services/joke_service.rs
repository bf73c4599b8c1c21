use std::sync::{Mutex, PoisonError, RwLock};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::application::errors::JokeError;

const DEFAULT_JOKES: [&str; 5] = [
    "Why do programmers prefer dark mode? Because light attracts bugs!",
    "Why do Kubernetes administrators never get lost? Because they always follow the NodePath!",
    "What's a SRE's favorite breakfast? YAML and eggs!",
    "What did the Prometheus query say to the time series? You've got a lot of explaining to do!",
    "Why did the OpenTelemetry collector go to therapy? It had too much emotional baggage to trace!",
];

/// Service holding the joke catalog
pub struct JokeService {
    jokes: RwLock<Vec<String>>,
    // Seeded once for the lifetime of the service
    rng: Mutex<StdRng>,
}

impl JokeService {
    pub fn new() -> Self {
        Self::with_jokes(DEFAULT_JOKES)
    }

    pub fn with_jokes(jokes: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            jokes: RwLock::new(jokes.into_iter().map(Into::into).collect()),
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Deterministic selection
    #[cfg(test)]
    pub fn with_seed(self, seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            ..self
        }
    }

    /// Uniform pick with replacement
    pub fn random_joke(&self) -> Result<String, JokeError> {
        let jokes = self.jokes.read().unwrap_or_else(PoisonError::into_inner);
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        jokes.choose(&mut *rng).cloned().ok_or(JokeError::EmptyCatalog)
    }

    pub fn add_joke(&self, joke: impl Into<String>) {
        self.jokes
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(joke.into());
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.jokes.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for JokeService {
    fn default() -> Self {
        Self::new()
    }
}
