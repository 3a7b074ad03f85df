//! Conversation state machine for the chat UI.
//!
//! A [`Conversation`] is an append-only list of [`Message`]s plus a loading
//! flag. A turn is two steps: [`Conversation::submit`] appends the user
//! message and marks the conversation as loading, [`Conversation::resolve`]
//! appends the assistant reply (or an `"Error: ..."` bubble) and clears the
//! flag. Only one turn may be in flight at a time.

use thiserror::Error;
use tracing::{debug, warn};

use crate::client::{ChatTransport, ClientError};
use crate::models::{ChatResponse, Message};

/// Why a submission was not accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SubmitRejected {
    #[error("message is empty")]
    Empty,

    #[error("a reply is still pending")]
    InFlight,
}

#[derive(Debug, Default, Clone)]
pub struct Conversation {
    messages: Vec<Message>,
    loading: bool,
    revision: u64,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Bumped on every change to the message list. Views scroll to the
    /// latest message when they observe a new revision.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Whether `input` would currently be accepted by [`Self::submit`].
    pub fn can_submit(&self, input: &str) -> bool {
        !self.loading && !input.trim().is_empty()
    }

    /// Starts a turn: appends the trimmed input as a user message and returns
    /// the content to send.
    pub fn submit(&mut self, input: &str) -> Result<String, SubmitRejected> {
        let content = input.trim();
        if content.is_empty() {
            return Err(SubmitRejected::Empty);
        }
        if self.loading {
            return Err(SubmitRejected::InFlight);
        }

        self.push(Message::user(content));
        self.loading = true;
        Ok(content.to_string())
    }

    /// Finishes the pending turn with the outcome of the round trip and
    /// returns the assistant message it appended.
    pub fn resolve(&mut self, outcome: Result<ChatResponse, ClientError>) -> &Message {
        let reply = match outcome {
            Ok(resp) => Message::assistant(resp.display_text()),
            Err(e) => {
                warn!("Error sending message: {e}");
                Message::assistant(format!("Error: {e}"))
            }
        };
        self.loading = false;
        self.push(reply)
    }

    fn push(&mut self, message: Message) -> &Message {
        self.messages.push(message);
        self.revision += 1;
        &self.messages[self.messages.len() - 1]
    }
}

/// A conversation bound to a transport, for callers that can simply await a
/// whole turn.
pub struct ChatSession<T> {
    transport: T,
    conversation: Conversation,
}

impl<T: ChatTransport> ChatSession<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            conversation: Conversation::new(),
        }
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Runs one full turn and returns the assistant message it produced.
    pub async fn send(&mut self, input: &str) -> Result<&Message, SubmitRejected> {
        let content = self.conversation.submit(input)?;
        debug!(content = %content, "sending chat message");
        let outcome = self.transport.send(&content).await;
        Ok(self.conversation.resolve(outcome))
    }
}
