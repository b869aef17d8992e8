//! Dialogue turn and engine outcome types.
//!
//! The engine never touches the DOM or paces messages itself. Each handled
//! input yields an ordered list of [`EngineEvent`]s which the host renders
//! in order with its own timing.

use serde::{Deserialize, Serialize};

/// A next-step choice attached to a bot turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Choice {
    /// A clickable button; `value` re-enters `handle_message` verbatim.
    Button { label: String, value: String },
    /// A date picker; the picked date re-enters as free text.
    Date { label: String },
    /// A time picker; the picked time re-enters as free text.
    Time { label: String },
}

impl Choice {
    pub fn button(label: impl Into<String>, value: impl Into<String>) -> Self {
        Choice::Button {
            label: label.into(),
            value: value.into(),
        }
    }

    /// The button value, if this choice is a button.
    pub fn value(&self) -> Option<&str> {
        match self {
            Choice::Button { value, .. } => Some(value),
            _ => None,
        }
    }
}

/// One bot message plus its next-step choices (empty for free-text prompts).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueTurn {
    pub text: String,
    #[serde(default)]
    pub choices: Vec<Choice>,
}

impl DialogueTurn {
    /// A free-text prompt with no choices.
    pub fn say(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            choices: Vec::new(),
        }
    }

    /// A prompt with attached choices.
    pub fn with_choices(text: impl Into<String>, choices: Vec<Choice>) -> Self {
        Self {
            text: text.into(),
            choices,
        }
    }
}

/// High-level events the engine asks the host to perform, in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EngineEvent {
    /// Render one bot turn.
    Say(DialogueTurn),
    /// Render the enquiry registration form (schema via `enquiry_fields()`).
    ShowEnquiryForm,
    /// Open a URL in a new tab (prospectus). Hosts that cannot open tabs
    /// can rely on the accompanying `view_prospectus|<url>` button instead.
    OpenUrl(String),
    /// A booking was just confirmed; resume any paused voice session.
    BookingCompleted,
}

/// Result of feeding one visitor input to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageOutcome {
    /// The engine consumed the input; render these events in order.
    Handled(Vec<EngineEvent>),
    /// Not meaningful for the current stage; the host should route the
    /// input to its general Q&A path.
    NotHandled,
}

impl MessageOutcome {
    pub fn is_handled(&self) -> bool {
        matches!(self, MessageOutcome::Handled(_))
    }

    /// The dialogue turns within the handled events, in order.
    pub fn turns(&self) -> Vec<&DialogueTurn> {
        match self {
            MessageOutcome::Handled(events) => events
                .iter()
                .filter_map(|event| match event {
                    EngineEvent::Say(turn) => Some(turn),
                    _ => None,
                })
                .collect(),
            MessageOutcome::NotHandled => Vec::new(),
        }
    }
}
