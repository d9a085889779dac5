//! Canned agent messages.
//!
//! The exact wording is a contract with the frontend, which matches on
//! message content in a few places. Change with care.

use super::stage::Stage;

/// Sent once when the agent joins the session.
pub const WELCOME: &str =
    "Hello! Welcome to our onboarding process. I'm here to help you get started.";

/// Sent when the user tries to advance past the final stage.
pub const COMPLETION: &str =
    "Great! You've completed all the onboarding steps. Your application is being processed.";

/// Answer for document-related questions.
pub const DOCUMENT_REQUIREMENTS: &str = "Great question about documents! You'll need your \
     government ID, passport photo, address proof, and income proof.";

/// Answer for payment-related questions.
pub const PAYMENT_OPTIONS: &str =
    "I understand you're interested in payment options. Let me show you what's available.";

/// Generic reply when no intent matched.
pub const FALLBACK: &str =
    "I understand. Let me help you with that. What would you like to know more about?";

/// The scripted message for a stage.
pub fn stage_message(stage: Stage) -> &'static str {
    match stage.get() {
        1 => "Welcome to your onboarding journey! Let's get started with the basics.",
        2 => "Now let's talk about payment options. What works best for you?",
        3 => "Great choice! Let's continue with the EMI details.",
        4 => "Finally, let's review the required documents to complete your application.",
        _ => "Let's continue with the next step.",
    }
}

/// Acknowledgement for a payment method selection, naming the choice.
pub fn payment_ack(choice: &str) -> String {
    format!("Excellent choice! You've selected {choice}. Let's continue with the next steps.")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_stage_has_a_distinct_message() {
        let mut messages = Vec::new();
        let mut stage = Stage::FIRST;
        loop {
            let message = stage_message(stage);
            assert!(!message.is_empty());
            assert!(!messages.contains(&message), "stage {stage} reuses a message");
            messages.push(message);
            match stage.next() {
                Some(next) => stage = next,
                None => break,
            }
        }
        assert_eq!(messages.len(), 4);
    }

    #[test]
    fn payment_ack_names_the_choice() {
        let ack = payment_ack("EMI Plan");
        assert!(ack.contains("EMI Plan"));
    }
}
