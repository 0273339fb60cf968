//! Mock judge for testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use civiq_core::error::JudgeError;
use civiq_core::traits::{AnswerJudge, JudgeRequest, JudgeVerdict};

/// A scripted judge for exercising review flows without network calls.
///
/// Replies are chosen by answer substring; unmatched answers get the
/// default reply. A configured number of leading calls can be made to fail.
pub struct MockJudge {
    /// Map of answer substring → reply text.
    replies: HashMap<String, String>,
    /// Reply if no substring matches.
    default_reply: String,
    /// Calls that fail before replies start.
    failures: Mutex<Vec<JudgeError>>,
    /// Number of calls made.
    call_count: AtomicU32,
    /// Last request received.
    last_request: Mutex<Option<JudgeRequest>>,
}

impl MockJudge {
    /// Create a mock with the given answer→reply mappings.
    pub fn new(replies: HashMap<String, String>) -> Self {
        Self {
            replies,
            default_reply: "Incorrect".to_string(),
            failures: Mutex::new(Vec::new()),
            call_count: AtomicU32::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Create a mock that always gives the same reply.
    pub fn with_fixed_reply(reply: &str) -> Self {
        Self {
            default_reply: reply.to_string(),
            ..Self::new(HashMap::new())
        }
    }

    /// Fail the next calls with these errors, in order.
    pub fn failing_with(self, errors: Vec<JudgeError>) -> Self {
        let mut errors = errors;
        errors.reverse();
        Self {
            failures: Mutex::new(errors),
            ..self
        }
    }

    /// Get the number of calls made to this judge.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Get the last request made to this judge.
    pub fn last_request(&self) -> Option<JudgeRequest> {
        self.last_request
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait]
impl AnswerJudge for MockJudge {
    fn name(&self) -> &str {
        "mock"
    }

    async fn judge(&self, request: &JudgeRequest) -> anyhow::Result<JudgeVerdict> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        *self.last_request.lock().unwrap_or_else(|e| e.into_inner()) = Some(request.clone());

        let failure = self.failures.lock().unwrap_or_else(|e| e.into_inner()).pop();
        if let Some(err) = failure {
            return Err(err.into());
        }

        let reply = self
            .replies
            .iter()
            .find(|(key, _)| request.answer.contains(key.as_str()))
            .map(|(_, v)| v.clone())
            .unwrap_or_else(|| self.default_reply.clone());

        Ok(JudgeVerdict::from_reply(reply, 1))
    }
}
