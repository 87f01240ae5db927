//! Chat widget on the help-center page.
//!
//! Local only: the operator greets the visitor and visitor lines are
//! appended as they are sent. Nothing reaches the ticket store.

use chrono::{DateTime, Utc};
use helpdesk_core::{effect::Effect, environment::Clock, reducer::Reducer, SmallVec};
use std::sync::Arc;

/// First line every conversation starts with
pub const GREETING: &str = "Hello! How can we help you?";

/// Who wrote a line
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Speaker {
    /// Support operator
    Operator,
    /// Site visitor
    Visitor,
}

/// One chat bubble
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatLine {
    /// Author side
    pub speaker: Speaker,
    /// Text
    pub text: String,
    /// When the line was added
    pub sent_at: DateTime<Utc>,
}

/// Conversation plus the input box
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatState {
    /// Lines in the order they were added
    pub lines: Vec<ChatLine>,
    /// Current input
    pub draft: String,
}

impl ChatState {
    /// A conversation holding only the operator greeting
    #[must_use]
    pub fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            lines: vec![ChatLine {
                speaker: Speaker::Operator,
                text: GREETING.to_string(),
                sent_at: started_at,
            }],
            draft: String::new(),
        }
    }
}

/// Chat actions
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChatAction {
    /// Input edited
    UpdateDraft(String),
    /// Send pressed
    Send,
}

/// Chat dependencies
#[derive(Clone)]
pub struct ChatEnvironment {
    /// Stamps new lines
    pub clock: Arc<dyn Clock>,
}

/// Chat reducer
#[derive(Clone, Copy, Debug, Default)]
pub struct ChatReducer;

impl Reducer for ChatReducer {
    type State = ChatState;
    type Action = ChatAction;
    type Environment = ChatEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            ChatAction::UpdateDraft(text) => state.draft = text,
            ChatAction::Send => {
                let text = state.draft.trim();
                if !text.is_empty() {
                    state.lines.push(ChatLine {
                        speaker: Speaker::Visitor,
                        text: text.to_string(),
                        sent_at: env.clock.now(),
                    });
                    state.draft.clear();
                }
            },
        }
        SmallVec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use helpdesk_testing::{ReducerTest, assertions, test_clock};

    fn env() -> ChatEnvironment {
        ChatEnvironment {
            clock: Arc::new(test_clock()),
        }
    }

    #[test]
    fn test_starts_with_greeting() {
        let state = ChatState::new(test_clock().now());
        assert_eq!(state.lines.len(), 1);
        assert_eq!(state.lines[0].speaker, Speaker::Operator);
        assert_eq!(state.lines[0].text, GREETING);
    }

    #[test]
    fn test_send_appends_trimmed_visitor_line() {
        ReducerTest::new(ChatReducer)
            .with_env(env())
            .given_state(ChatState::new(test_clock().now()))
            .when_action(ChatAction::UpdateDraft("  my order is late \n".to_string()))
            .when_action(ChatAction::Send)
            .then_state(|state| {
                assert_eq!(state.lines.len(), 2);
                let line = &state.lines[1];
                assert_eq!(line.speaker, Speaker::Visitor);
                assert_eq!(line.text, "my order is late");
                assert_eq!(line.sent_at, test_clock().now());
                assert!(state.draft.is_empty());
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_blank_send_is_ignored() {
        ReducerTest::new(ChatReducer)
            .with_env(env())
            .given_state(ChatState::new(test_clock().now()))
            .when_action(ChatAction::UpdateDraft("   ".to_string()))
            .when_action(ChatAction::Send)
            .then_state(|state| {
                assert_eq!(state.lines.len(), 1);
                assert_eq!(state.draft, "   ");
            })
            .run();
    }
}
