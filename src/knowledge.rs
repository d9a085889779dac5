//! Knowledge-base lookup.
//!
//! Placeholder for the retrieval pipeline; callers depend only on the
//! trait so a real index can be dropped in later.

use async_trait::async_trait;
use tracing::debug;

/// Answers free-form questions from the onboarding knowledge base.
#[async_trait]
pub trait KnowledgeBase: Send + Sync {
    async fn query(&self, question: &str) -> String;
}

/// Stub implementation returning a fixed answer.
pub struct PlaceholderKnowledgeBase;

#[async_trait]
impl KnowledgeBase for PlaceholderKnowledgeBase {
    async fn query(&self, question: &str) -> String {
        debug!(question = %question, "Knowledge base query");
        "This is a placeholder RAG response.".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn placeholder_answers_everything() {
        let kb = PlaceholderKnowledgeBase;
        let answer = kb.query("what documents do I need?").await;
        assert_eq!(answer, "This is a placeholder RAG response.");
    }
}
