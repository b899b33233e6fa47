use async_trait::async_trait;
use futures_util::stream;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::generation::{FragmentStream, GenerationError, GenerationRequest, Generator};

/// Replies with the scripted lines in order, cycling.
pub struct ScriptedGenerator {
    lines: Vec<String>,
    next: AtomicUsize,
}

impl ScriptedGenerator {
    pub fn new(lines: &[&str]) -> Self {
        Self {
            lines: lines.iter().map(|line| line.to_string()).collect(),
            next: AtomicUsize::new(0),
        }
    }

    fn next_line(&self) -> String {
        if self.lines.is_empty() {
            return String::new();
        }
        let index = self.next.fetch_add(1, Ordering::SeqCst);
        self.lines[index % self.lines.len()].clone()
    }
}

#[async_trait]
impl Generator for ScriptedGenerator {
    async fn generate(&self, _request: &GenerationRequest) -> Result<String, GenerationError> {
        Ok(self.next_line())
    }

    async fn generate_stream(&self, _request: &GenerationRequest) -> Result<FragmentStream, GenerationError> {
        let fragments: Vec<Result<String, GenerationError>> = self
            .next_line()
            .split_inclusive(' ')
            .map(|fragment| Ok(fragment.to_string()))
            .collect();
        Ok(Box::pin(stream::iter(fragments)))
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

pub struct FailingGenerator;

#[async_trait]
impl Generator for FailingGenerator {
    async fn generate(&self, _request: &GenerationRequest) -> Result<String, GenerationError> {
        Err(GenerationError::Status {
            status: 500,
            body: "backend down".to_string(),
        })
    }
}
