use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type BoardId = String;
pub type ListId = String;
pub type CardId = String;
pub type CommentId = String;

pub const DEFAULT_COLOR: &str = "#3b82f6";

pub const PRESET_COLORS: [(&str, &str); 8] = [
    ("Blue", "#3b82f6"),
    ("Green", "#10b981"),
    ("Purple", "#8b5cf6"),
    ("Red", "#ef4444"),
    ("Orange", "#f97316"),
    ("Pink", "#ec4899"),
    ("Indigo", "#6366f1"),
    ("Teal", "#14b8a6"),
];

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    pub boards: Vec<Board>,
    #[serde(default)]
    pub current_board_id: Option<BoardId>,
    #[serde(default)]
    pub is_dark_mode: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub id: BoardId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub lists: Vec<List>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct List {
    pub id: ListId,
    pub title: String,
    pub board_id: BoardId,
    pub position: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub cards: Vec<Card>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: CardId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub list_id: ListId,
    pub position: usize,
    pub comments: Vec<Comment>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: CommentId,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// Fields a view may overwrite on an existing card. `None` leaves the field as is.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CardPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        AppState {
            boards: Vec::new(),
            current_board_id: None,
            is_dark_mode: false,
        }
    }
}

impl AppState {
    pub fn board(&self, id: &str) -> Option<&Board> {
        self.boards.iter().find(|b| b.id == id)
    }

    pub fn current_board(&self) -> Option<&Board> {
        self.current_board_id.as_deref().and_then(|id| self.board(id))
    }
}

impl Board {
    pub fn new(title: impl Into<String>, color: Option<String>, now: DateTime<Utc>) -> Self {
        Board {
            id: generate_id(),
            title: title.into(),
            color,
            lists: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn list(&self, id: &str) -> Option<&List> {
        self.lists.iter().find(|l| l.id == id)
    }

    pub fn next_list(
        &self,
        title: impl Into<String>,
        color: Option<String>,
        now: DateTime<Utc>,
    ) -> List {
        List::new(&self.id, self.lists.len(), title, color, now)
    }

    pub fn card_count(&self) -> usize {
        self.lists.iter().map(|l| l.cards.len()).sum()
    }
}

impl List {
    pub fn new(
        board_id: &str,
        position: usize,
        title: impl Into<String>,
        color: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        List {
            id: generate_id(),
            title: title.into(),
            board_id: board_id.to_string(),
            position,
            color,
            cards: Vec::new(),
            created_at: now,
        }
    }

    pub fn next_card(&self, title: impl Into<String>, now: DateTime<Utc>) -> Card {
        Card::new(&self.id, self.cards.len(), title, now)
    }

    pub fn card(&self, id: &str) -> Option<&Card> {
        self.cards.iter().find(|c| c.id == id)
    }
}

impl Card {
    pub fn new(list_id: &str, position: usize, title: impl Into<String>, now: DateTime<Utc>) -> Self {
        Card {
            id: generate_id(),
            title: title.into(),
            description: String::new(),
            list_id: list_id.to_string(),
            position,
            comments: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl Comment {
    pub fn new(text: impl Into<String>, now: DateTime<Utc>) -> Self {
        Comment {
            id: generate_id(),
            text: text.into(),
            created_at: now,
        }
    }
}

impl CardPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none()
    }

    pub fn apply(self, card: &mut Card) {
        if let Some(title) = self.title {
            card.title = title;
        }
        if let Some(description) = self.description {
            card.description = description;
        }
    }
}

pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}

pub fn color_name(value: &str) -> Option<&'static str> {
    PRESET_COLORS
        .iter()
        .find(|(_, hex)| hex.eq_ignore_ascii_case(value))
        .map(|(name, _)| *name)
}
