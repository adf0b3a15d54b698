
use crate::error::GenerationError;
use crate::generation::{CodeGenerator, GenerationRequest};
use std::collections::VecDeque;
use std::sync::Mutex;

/// Replays canned responses and records every request
pub(crate) struct ScriptedGenerator {
    responses: Mutex<VecDeque<Result<String, GenerationError>>>,
    pub(crate) requests: Mutex<Vec<GenerationRequest>>,
}

impl ScriptedGenerator {
    pub(crate) fn new(responses: Vec<Result<String, GenerationError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn replies(replies: &[&str]) -> Self {
        Self::new(replies.iter().map(|r| Ok(r.to_string())).collect())
    }

    pub(crate) fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub(crate) fn prompt(&self, index: usize) -> String {
        self.requests.lock().unwrap()[index].prompt()
    }
}

impl CodeGenerator for ScriptedGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(GenerationError::Malformed("script exhausted".to_string())))
    }
}
