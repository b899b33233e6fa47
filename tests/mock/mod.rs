use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use futures_util::stream;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration as StdDuration;

use flatshare_chaos::generation::FragmentStream;
use flatshare_chaos::{ConversationEntry, GenerationError, GenerationRequest, Generator};

pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
}

pub fn persona_entry(speaker: &str, message: &str, minutes: i64) -> ConversationEntry {
    ConversationEntry::new(speaker, message, vec![], 0.0).at(base_time() + Duration::minutes(minutes))
}

pub fn user_entry(message: &str, topics: &[&str], sentiment: f64, minutes: i64) -> ConversationEntry {
    let tags = topics.iter().map(|topic| topic.to_string()).collect();
    ConversationEntry::user(message, tags, sentiment).at(base_time() + Duration::minutes(minutes))
}

/// Cycles through fixed replies and keeps a copy of every request.
pub struct ScriptedGenerator {
    lines: Vec<String>,
    next: AtomicUsize,
    requests: Arc<Mutex<Vec<GenerationRequest>>>,
}

impl ScriptedGenerator {
    pub fn new(lines: &[&str]) -> Self {
        Self {
            lines: lines.iter().map(|line| line.to_string()).collect(),
            next: AtomicUsize::new(0),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn requests(&self) -> Arc<Mutex<Vec<GenerationRequest>>> {
        Arc::clone(&self.requests)
    }

    fn next_line(&self, request: &GenerationRequest) -> String {
        self.requests.lock().unwrap().push(request.clone());
        let index = self.next.fetch_add(1, Ordering::SeqCst);
        self.lines[index % self.lines.len()].clone()
    }
}

#[async_trait]
impl Generator for ScriptedGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        Ok(self.next_line(request))
    }

    async fn generate_stream(&self, request: &GenerationRequest) -> Result<FragmentStream, GenerationError> {
        let fragments: Vec<Result<String, GenerationError>> = self
            .next_line(request)
            .split_inclusive(' ')
            .map(|fragment| Ok(fragment.to_string()))
            .collect();
        Ok(Box::pin(stream::iter(fragments)))
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Fails every other call, starting with the first.
pub struct FlakyGenerator {
    calls: AtomicUsize,
}

impl FlakyGenerator {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl Generator for FlakyGenerator {
    async fn generate(&self, _request: &GenerationRequest) -> Result<String, GenerationError> {
        if self.calls.fetch_add(1, Ordering::SeqCst) % 2 == 0 {
            Err(GenerationError::Timeout)
        } else {
            Ok("made it through".to_string())
        }
    }
}

/// Streams one fragment and then stalls until dropped.
pub struct StallingGenerator;

#[async_trait]
impl Generator for StallingGenerator {
    async fn generate(&self, _request: &GenerationRequest) -> Result<String, GenerationError> {
        tokio::time::sleep(StdDuration::from_secs(3600)).await;
        Ok("never".to_string())
    }

    async fn generate_stream(&self, _request: &GenerationRequest) -> Result<FragmentStream, GenerationError> {
        let first = stream::iter(vec![Ok("half a ".to_string())]);
        let stalled = stream::once(async {
            tokio::time::sleep(StdDuration::from_secs(3600)).await;
            Ok("thought".to_string())
        });
        Ok(Box::pin(futures_util::StreamExt::chain(first, stalled)))
    }
}
