//! Test generators — mock `StoryGenerator` implementations for tests.

use std::sync::Mutex;

use async_trait::async_trait;
use visualquest_core::error::DomainError;
use visualquest_core::generation::{ImagePayload, StoryGenerator};

/// A generator that returns canned text and records every call with its
/// context, so tests can assert on call order and prompt chaining.
#[derive(Debug)]
pub struct ScriptedGenerator {
    caption: String,
    narrative: String,
    rewritten: String,
    conclusion: String,
    calls: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    /// Create a scripted generator with explicit canned responses.
    #[must_use]
    pub fn with_responses(
        caption: &str,
        narrative: &str,
        rewritten: &str,
        conclusion: &str,
    ) -> Self {
        Self {
            caption: caption.to_owned(),
            narrative: narrative.to_owned(),
            rewritten: rewritten.to_owned(),
            conclusion: conclusion.to_owned(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Returns the recorded calls as `"method:context"` strings, in order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

impl Default for ScriptedGenerator {
    fn default() -> Self {
        Self::with_responses(
            "a scripted caption",
            "a scripted draft",
            "a scripted story\n\nCHOICES:\n1. one\n2. two\n3. three",
            "a scripted conclusion",
        )
    }
}

#[async_trait]
impl StoryGenerator for ScriptedGenerator {
    async fn describe_image(&self, image: &ImagePayload) -> Result<String, DomainError> {
        self.record(format!("describe_image:{}", image.content_type));
        Ok(self.caption.clone())
    }

    async fn narrate(&self, context: &str) -> Result<String, DomainError> {
        self.record(format!("narrate:{context}"));
        Ok(self.narrative.clone())
    }

    async fn rewrite_with_choices(&self, draft: &str) -> Result<String, DomainError> {
        self.record(format!("rewrite_with_choices:{draft}"));
        Ok(self.rewritten.clone())
    }

    async fn conclude(&self, context: &str) -> Result<String, DomainError> {
        self.record(format!("conclude:{context}"));
        Ok(self.conclusion.clone())
    }
}

/// A generator whose every call fails. Useful for testing that generation
/// failures surface as errors and never as story content.
#[derive(Debug)]
pub struct FailingGenerator;

#[async_trait]
impl StoryGenerator for FailingGenerator {
    async fn describe_image(&self, _image: &ImagePayload) -> Result<String, DomainError> {
        Err(DomainError::Generation("model provider unavailable".into()))
    }

    async fn narrate(&self, _context: &str) -> Result<String, DomainError> {
        Err(DomainError::Generation("model provider unavailable".into()))
    }

    async fn rewrite_with_choices(&self, _draft: &str) -> Result<String, DomainError> {
        Err(DomainError::Generation("model provider unavailable".into()))
    }

    async fn conclude(&self, _context: &str) -> Result<String, DomainError> {
        Err(DomainError::Generation("model provider unavailable".into()))
    }
}
