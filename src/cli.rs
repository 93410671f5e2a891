use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "tackboard", version, about = "Kanban boards with lists, cards and comments")]
pub struct Cli {
    /// Path to a YAML config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// Directory holding the saved boards (overrides the config file)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,
    /// Log level: trace, debug, info, warn, error or off
    #[arg(long, global = true)]
    pub log_level: Option<String>,
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List all boards
    Boards,
    /// Print a board with its lists and cards (defaults to the selected board)
    Show {
        board: Option<String>,
    },
    /// Create a board and select it
    AddBoard {
        title: String,
        /// Color tag, e.g. #3b82f6
        #[arg(long)]
        color: Option<String>,
    },
    /// Rename a board
    RenameBoard { board: String, title: String },
    /// Delete a board with everything on it
    DeleteBoard { board: String },
    /// Select a board, or clear the selection when none is given
    Select { board: Option<String> },
    /// Append a list to a board
    AddList {
        board: String,
        title: String,
        /// Color tag, e.g. #10b981
        #[arg(long)]
        color: Option<String>,
    },
    /// Rename a list
    RenameList {
        board: String,
        list: String,
        title: String,
    },
    /// Delete a list and its cards
    DeleteList { board: String, list: String },
    /// Append a card to a list
    AddCard {
        board: String,
        list: String,
        title: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// Change a card's title or description
    EditCard {
        board: String,
        list: String,
        card: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete a card
    DeleteCard {
        board: String,
        list: String,
        card: String,
    },
    /// Move a card to another list (or another slot in the same list)
    MoveCard {
        board: String,
        card: String,
        /// Destination list
        #[arg(long)]
        to: String,
        /// Index in the destination list (defaults to the end)
        #[arg(long)]
        position: Option<usize>,
    },
    /// Add a comment to a card
    Comment {
        board: String,
        list: String,
        card: String,
        text: String,
    },
    /// Delete a comment from a card
    DeleteComment {
        board: String,
        list: String,
        card: String,
        comment: String,
    },
    /// Toggle dark mode
    DarkMode,
    /// Submit a raw action, e.g. '{"type":"TOGGLE_DARK_MODE"}'
    Dispatch { action: String },
    /// Launch the interactive TUI
    Tui,
}
