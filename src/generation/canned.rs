use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{GenerationError, GenerationRequest, Generator};

const OFFLINE_LINES: &[&str] = &[
    "Noted. Consider a reset and over-index on consistency.",
    "Your execution needs fewer excuses and more momentum.",
    "Chore governance is failing, somebody launch DishOps.",
    "Rent is a constraint, not an excuse.",
    "That idea had less life than my cactus.",
    "Even your excuses are underperforming KPIs.",
];

/// Offline backend that cycles through a fixed set of lines.
#[derive(Debug, Default)]
pub struct CannedGenerator {
    next: AtomicUsize,
}

impl CannedGenerator {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Generator for CannedGenerator {
    async fn generate(&self, _request: &GenerationRequest) -> Result<String, GenerationError> {
        let index = self.next.fetch_add(1, Ordering::Relaxed) % OFFLINE_LINES.len();
        Ok(OFFLINE_LINES[index].to_string())
    }

    fn name(&self) -> &str {
        "canned"
    }
}
