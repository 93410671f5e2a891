use crate::action::Action;
use crate::model::{Board, DEFAULT_COLOR};
use chrono::Utc;
use std::fmt;

pub type OnConfirm = Box<dyn FnOnce(&str, Option<&str>) -> Vec<Action>>;

/// A request for the shell to collect one line of text (and optionally a
/// color) from the user. `on_confirm` turns the answer into actions.
pub struct PromptRequest {
    pub title: String,
    pub description: Option<String>,
    pub placeholder: Option<String>,
    pub default_value: Option<String>,
    pub show_color_picker: bool,
    pub on_confirm: OnConfirm,
}

/// Capability handed to views that need the shell to open a prompt.
pub trait PromptRequester {
    fn request_prompt(&mut self, request: PromptRequest);

    fn request_create_board(&mut self) {
        self.request_prompt(PromptRequest::create_board());
    }
}

impl PromptRequest {
    pub fn new(
        title: impl Into<String>,
        on_confirm: impl FnOnce(&str, Option<&str>) -> Vec<Action> + 'static,
    ) -> Self {
        PromptRequest {
            title: title.into(),
            description: None,
            placeholder: None,
            default_value: None,
            show_color_picker: false,
            on_confirm: Box::new(on_confirm),
        }
    }

    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }

    pub fn placeholder(mut self, text: impl Into<String>) -> Self {
        self.placeholder = Some(text.into());
        self
    }

    pub fn default_value(mut self, text: impl Into<String>) -> Self {
        self.default_value = Some(text.into());
        self
    }

    pub fn with_color_picker(mut self) -> Self {
        self.show_color_picker = true;
        self
    }

    pub fn create_board() -> Self {
        PromptRequest::new("Create New Board", |title, color| {
            let board = Board::new(title, color.map(str::to_string), Utc::now());
            let id = board.id.clone();
            vec![Action::AddBoard(board), Action::SetCurrentBoard(Some(id))]
        })
        .description("Enter a name for your new board and choose a color")
        .placeholder("Enter board title...")
        .with_color_picker()
    }

    /// Trims `value` and hands it to the callback. Blank input is refused
    /// and gives the request back so the dialog can stay open.
    pub fn confirm(self, value: &str, color: Option<&str>) -> Result<Vec<Action>, Self> {
        let value = value.trim();
        if value.is_empty() {
            return Err(self);
        }
        let color = if self.show_color_picker {
            Some(color.unwrap_or(DEFAULT_COLOR))
        } else {
            None
        };
        Ok((self.on_confirm)(value, color))
    }
}

impl fmt::Debug for PromptRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PromptRequest")
            .field("title", &self.title)
            .field("description", &self.description)
            .field("placeholder", &self.placeholder)
            .field("default_value", &self.default_value)
            .field("show_color_picker", &self.show_color_picker)
            .finish_non_exhaustive()
    }
}

/// Holds at most one pending request until the shell picks it up.
#[derive(Debug, Default)]
pub struct PromptSlot {
    pending: Option<PromptRequest>,
}

impl PromptSlot {
    pub fn take(&mut self) -> Option<PromptRequest> {
        self.pending.take()
    }
}

impl PromptRequester for PromptSlot {
    fn request_prompt(&mut self, request: PromptRequest) {
        self.pending = Some(request);
    }
}
