//! Intent classification for user speech.
//!
//! The engine depends only on the [`IntentClassifier`] trait; the shipped
//! implementation is a keyword matcher standing in for a real language
//! understanding step.

use async_trait::async_trait;

/// What the user is asking about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    PaymentQuery,
    DocumentQuery,
    Unknown,
}

/// Classifies a user utterance into an [`Intent`].
#[async_trait]
pub trait IntentClassifier: Send + Sync {
    async fn classify(&self, text: &str) -> Intent;
}

/// Fixed-keyword classifier.
pub struct KeywordClassifier;

#[async_trait]
impl IntentClassifier for KeywordClassifier {
    async fn classify(&self, text: &str) -> Intent {
        let lowered = text.to_lowercase();
        if lowered.contains("payment") || lowered.contains("pay") {
            Intent::PaymentQuery
        } else if lowered.contains("document") || lowered.contains("paper") {
            Intent::DocumentQuery
        } else {
            Intent::Unknown
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn matches_payment_keywords() {
        let classifier = KeywordClassifier;
        assert_eq!(classifier.classify("how do I pay?").await, Intent::PaymentQuery);
        assert_eq!(
            classifier.classify("Payment options please").await,
            Intent::PaymentQuery
        );
    }

    #[tokio::test]
    async fn matches_document_keywords() {
        let classifier = KeywordClassifier;
        assert_eq!(
            classifier.classify("Which documents do you need?").await,
            Intent::DocumentQuery
        );
        assert_eq!(
            classifier.classify("do I need any PAPERwork").await,
            Intent::DocumentQuery
        );
    }

    #[tokio::test]
    async fn everything_else_is_unknown() {
        let classifier = KeywordClassifier;
        assert_eq!(classifier.classify("hello there").await, Intent::Unknown);
        assert_eq!(classifier.classify("").await, Intent::Unknown);
    }
}
