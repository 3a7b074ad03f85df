use chatrelay_core::models::ChatResponse;
use chatrelay_core::{ClientError, Conversation, SubmitRejected};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

const PAGE_LINES: u16 = 10;

/// What the event loop should do after a key press.
#[derive(Debug, PartialEq, Eq)]
pub enum Action {
    None,
    /// Start a request with this content.
    Send(String),
    Quit,
}

pub struct App {
    pub conversation: Conversation,
    pub relay_url: String,
    pub input: String,
    /// Cursor position in chars.
    pub cursor: usize,
    /// Lines scrolled up from the latest message; 0 follows the conversation.
    pub scroll_back: u16,
    pub animation_frame: u8,
    pub status: Option<String>,
    seen_revision: u64,
}

impl App {
    pub fn new(relay_url: impl Into<String>) -> Self {
        Self {
            conversation: Conversation::new(),
            relay_url: relay_url.into(),
            input: String::new(),
            cursor: 0,
            scroll_back: 0,
            animation_frame: 0,
            status: None,
            seen_revision: 0,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => Action::Quit,
            KeyCode::Char('c') if ctrl => Action::Quit,
            KeyCode::Enter => self.submit(),
            KeyCode::Char(c) if !ctrl => {
                self.insert_char(c);
                Action::None
            }
            KeyCode::Backspace => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    let at = self.byte_index();
                    self.input.remove(at);
                }
                Action::None
            }
            KeyCode::Delete => {
                if self.cursor < self.input.chars().count() {
                    let at = self.byte_index();
                    self.input.remove(at);
                }
                Action::None
            }
            KeyCode::Left => {
                self.cursor = self.cursor.saturating_sub(1);
                Action::None
            }
            KeyCode::Right => {
                self.cursor = (self.cursor + 1).min(self.input.chars().count());
                Action::None
            }
            KeyCode::Home => {
                self.cursor = 0;
                Action::None
            }
            KeyCode::End => {
                self.cursor = self.input.chars().count();
                Action::None
            }
            KeyCode::Up => {
                self.scroll_back = self.scroll_back.saturating_add(1);
                Action::None
            }
            KeyCode::Down => {
                self.scroll_back = self.scroll_back.saturating_sub(1);
                Action::None
            }
            KeyCode::PageUp => {
                self.scroll_back = self.scroll_back.saturating_add(PAGE_LINES);
                Action::None
            }
            KeyCode::PageDown => {
                self.scroll_back = self.scroll_back.saturating_sub(PAGE_LINES);
                Action::None
            }
            _ => Action::None,
        }
    }

    /// Input stays editable while a reply is pending; only sending is refused.
    fn submit(&mut self) -> Action {
        match self.conversation.submit(&self.input) {
            Ok(content) => {
                self.input.clear();
                self.cursor = 0;
                self.status = None;
                Action::Send(content)
            }
            Err(SubmitRejected::InFlight) => {
                self.status = Some("Waiting for the current reply...".to_string());
                Action::None
            }
            Err(SubmitRejected::Empty) => Action::None,
        }
    }

    pub fn receive(&mut self, outcome: Result<ChatResponse, ClientError>) {
        self.conversation.resolve(outcome);
        self.status = None;
    }

    pub fn tick(&mut self) {
        if self.conversation.is_loading() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }

    /// Snaps back to the latest message whenever the conversation changed.
    pub fn sync_scroll(&mut self) {
        let revision = self.conversation.revision();
        if revision != self.seen_revision {
            self.seen_revision = revision;
            self.scroll_back = 0;
        }
    }

    pub fn can_send(&self) -> bool {
        self.conversation.can_submit(&self.input)
    }

    fn insert_char(&mut self, c: char) {
        let at = self.byte_index();
        self.input.insert(at, c);
        self.cursor += 1;
    }

    fn byte_index(&self) -> usize {
        self.input
            .char_indices()
            .nth(self.cursor)
            .map(|(i, _)| i)
            .unwrap_or(self.input.len())
    }
}
