use crate::action::Action;
use crate::context::AppContext;
use crate::model::{color_name, AppState, Board, Card, CardPatch, Comment, List};
use crate::ui::{self, format_ago};
use anyhow::{anyhow, bail, Context, Result};
use chrono::Utc;
use log::info;

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum LookupError {
    #[error("{kind} not found: {key}")]
    NotFound { kind: &'static str, key: String },
    #[error("{kind} {key:?} is ambiguous ({matches} matches); use a longer id")]
    Ambiguous {
        kind: &'static str,
        key: String,
        matches: usize,
    },
    #[error("no board selected; pass a board explicitly")]
    NoBoardSelected,
}

pub fn boards(ctx: &AppContext) -> Result<()> {
    let state = ctx.state();
    if state.boards.is_empty() {
        println!("No boards yet. Create one with `tackboard add-board <title>`.");
        return Ok(());
    }
    let now = Utc::now();
    for board in &state.boards {
        let marker = if state.current_board_id.as_deref() == Some(board.id.as_str()) {
            "*"
        } else {
            " "
        };
        println!(
            "{} {}  {}{}  ({} lists, {} cards, updated {})",
            marker,
            short_id(&board.id),
            board.title,
            color_suffix(board.color.as_deref()),
            board.lists.len(),
            board.card_count(),
            format_ago(board.updated_at, now)
        );
    }
    Ok(())
}

pub fn show(ctx: &AppContext, board: Option<String>) -> Result<()> {
    let state = ctx.state();
    let board = match board {
        Some(key) => resolve_board(state, &key)?,
        None => state.current_board().ok_or(LookupError::NoBoardSelected)?,
    };
    let now = Utc::now();
    println!(
        "Board: {} [{}]{}",
        board.title,
        short_id(&board.id),
        color_suffix(board.color.as_deref())
    );
    println!("updated {}", format_ago(board.updated_at, now));
    println!();
    if board.lists.is_empty() {
        println!("(no lists)");
    }
    for list in &board.lists {
        println!(
            "{} [{}]{} ({})",
            list.title,
            short_id(&list.id),
            color_suffix(list.color.as_deref()),
            list.cards.len()
        );
        if list.cards.is_empty() {
            println!("  (empty)");
        }
        for card in &list.cards {
            print_card(card);
        }
        println!();
    }
    Ok(())
}

pub fn add_board(ctx: &mut AppContext, title: String, color: Option<String>) -> Result<()> {
    let title = required(&title, "board title")?;
    let board = Board::new(title, color, Utc::now());
    let id = board.id.clone();
    ctx.dispatch(Action::AddBoard(board))?;
    ctx.dispatch(Action::SetCurrentBoard(Some(id.clone())))?;
    info!("created board {}", id);
    println!("Created board {} ({})", title, short_id(&id));
    Ok(())
}

pub fn rename_board(ctx: &mut AppContext, board: String, title: String) -> Result<()> {
    let title = required(&title, "board title")?;
    let id = resolve_board(ctx.state(), &board)?.id.clone();
    ctx.dispatch(Action::UpdateBoard {
        id: id.clone(),
        title: title.to_string(),
    })?;
    println!("Renamed board {} to {}", short_id(&id), title);
    Ok(())
}

pub fn delete_board(ctx: &mut AppContext, board: String) -> Result<()> {
    let found = resolve_board(ctx.state(), &board)?;
    let (id, title) = (found.id.clone(), found.title.clone());
    ctx.dispatch(Action::DeleteBoard(id.clone()))?;
    info!("deleted board {}", id);
    println!("Deleted board {}", title);
    Ok(())
}

pub fn select(ctx: &mut AppContext, board: Option<String>) -> Result<()> {
    let id = match board {
        Some(key) => Some(resolve_board(ctx.state(), &key)?.id.clone()),
        None => None,
    };
    ctx.dispatch(Action::SetCurrentBoard(id.clone()))?;
    match id {
        Some(id) => println!("Selected board {}", short_id(&id)),
        None => println!("Cleared board selection"),
    }
    Ok(())
}

pub fn add_list(
    ctx: &mut AppContext,
    board: String,
    title: String,
    color: Option<String>,
) -> Result<()> {
    let title = required(&title, "list title")?;
    let board = resolve_board(ctx.state(), &board)?;
    let list = board.next_list(title, color, Utc::now());
    let (board_id, list_id) = (board.id.clone(), list.id.clone());
    ctx.dispatch(Action::AddList { board_id, list })?;
    println!("Added list {} ({})", title, short_id(&list_id));
    Ok(())
}

pub fn rename_list(ctx: &mut AppContext, board: String, list: String, title: String) -> Result<()> {
    let title = required(&title, "list title")?;
    let board = resolve_board(ctx.state(), &board)?;
    let list = resolve_list(board, &list)?;
    let action = Action::UpdateList {
        board_id: board.id.clone(),
        list_id: list.id.clone(),
        title: title.to_string(),
    };
    ctx.dispatch(action)?;
    println!("Renamed list to {}", title);
    Ok(())
}

pub fn delete_list(ctx: &mut AppContext, board: String, list: String) -> Result<()> {
    let board = resolve_board(ctx.state(), &board)?;
    let list = resolve_list(board, &list)?;
    let title = list.title.clone();
    let action = Action::DeleteList {
        board_id: board.id.clone(),
        list_id: list.id.clone(),
    };
    ctx.dispatch(action)?;
    println!("Deleted list {}", title);
    Ok(())
}

pub fn add_card(
    ctx: &mut AppContext,
    board: String,
    list: String,
    title: String,
    description: Option<String>,
) -> Result<()> {
    let title = required(&title, "card title")?;
    let board = resolve_board(ctx.state(), &board)?;
    let list = resolve_list(board, &list)?;
    let mut card = list.next_card(title, Utc::now());
    if let Some(description) = description {
        card.description = description.trim().to_string();
    }
    let card_id = card.id.clone();
    let action = Action::AddCard {
        board_id: board.id.clone(),
        list_id: list.id.clone(),
        card,
    };
    ctx.dispatch(action)?;
    println!("Added card {} ({})", title, short_id(&card_id));
    Ok(())
}

pub fn edit_card(
    ctx: &mut AppContext,
    board: String,
    list: String,
    card: String,
    title: Option<String>,
    description: Option<String>,
) -> Result<()> {
    let updates = CardPatch {
        title: match title {
            Some(t) => Some(required(&t, "card title")?.to_string()),
            None => None,
        },
        description: description.map(|d| d.trim().to_string()),
    };
    if updates.is_empty() {
        bail!("nothing to change; pass --title and/or --description");
    }
    let board = resolve_board(ctx.state(), &board)?;
    let list = resolve_list(board, &list)?;
    let card = resolve_card(list, &card)?;
    let card_id = card.id.clone();
    let action = Action::UpdateCard {
        board_id: board.id.clone(),
        list_id: list.id.clone(),
        card_id: card_id.clone(),
        updates,
    };
    ctx.dispatch(action)?;
    println!("Updated card {}", short_id(&card_id));
    Ok(())
}

pub fn delete_card(ctx: &mut AppContext, board: String, list: String, card: String) -> Result<()> {
    let board = resolve_board(ctx.state(), &board)?;
    let list = resolve_list(board, &list)?;
    let card = resolve_card(list, &card)?;
    let title = card.title.clone();
    let action = Action::DeleteCard {
        board_id: board.id.clone(),
        list_id: list.id.clone(),
        card_id: card.id.clone(),
    };
    ctx.dispatch(action)?;
    println!("Deleted card {}", title);
    Ok(())
}

pub fn move_card(
    ctx: &mut AppContext,
    board: String,
    card: String,
    to: String,
    position: Option<usize>,
) -> Result<()> {
    let board = resolve_board(ctx.state(), &board)?;
    let (source, card) = resolve_board_card(board, &card)?;
    let target = resolve_list(board, &to)?;
    let new_position = position.unwrap_or(target.cards.len());
    let summary = format!("Moved {} to {}", card.title, target.title);
    let action = Action::MoveCard {
        board_id: board.id.clone(),
        card_id: card.id.clone(),
        source_list_id: source.id.clone(),
        target_list_id: target.id.clone(),
        new_position,
    };
    ctx.dispatch(action)?;
    println!("{}", summary);
    Ok(())
}

pub fn comment(
    ctx: &mut AppContext,
    board: String,
    list: String,
    card: String,
    text: String,
) -> Result<()> {
    let text = required(&text, "comment text")?;
    let board = resolve_board(ctx.state(), &board)?;
    let list = resolve_list(board, &list)?;
    let card = resolve_card(list, &card)?;
    let comment = Comment::new(text, Utc::now());
    let comment_id = comment.id.clone();
    let action = Action::AddComment {
        board_id: board.id.clone(),
        list_id: list.id.clone(),
        card_id: card.id.clone(),
        comment,
    };
    ctx.dispatch(action)?;
    println!("Added comment {}", short_id(&comment_id));
    Ok(())
}

pub fn delete_comment(
    ctx: &mut AppContext,
    board: String,
    list: String,
    card: String,
    comment: String,
) -> Result<()> {
    let board = resolve_board(ctx.state(), &board)?;
    let list = resolve_list(board, &list)?;
    let card = resolve_card(list, &card)?;
    let comment = resolve_comment(card, &comment)?;
    let action = Action::DeleteComment {
        board_id: board.id.clone(),
        list_id: list.id.clone(),
        card_id: card.id.clone(),
        comment_id: comment.id.clone(),
    };
    ctx.dispatch(action)?;
    println!("Deleted comment");
    Ok(())
}

pub fn dark_mode(ctx: &mut AppContext) -> Result<()> {
    ctx.dispatch(Action::ToggleDarkMode)?;
    println!(
        "Dark mode {}",
        if ctx.state().is_dark_mode { "on" } else { "off" }
    );
    Ok(())
}

pub fn dispatch_raw(ctx: &mut AppContext, raw: String) -> Result<()> {
    let action: Action = serde_json::from_str(&raw).context("parsing action")?;
    let label = action.label();
    if ctx.dispatch(action)? {
        println!("Applied {}", label);
    } else {
        println!("{} changed nothing", label);
    }
    Ok(())
}

pub fn tui(ctx: AppContext) -> Result<()> {
    ui::run(ctx)
}

fn required<'a>(value: &'a str, what: &str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(anyhow!("{} must not be empty", what));
    }
    Ok(trimmed)
}

fn resolve<'a, T>(
    items: &'a [T],
    key: &str,
    kind: &'static str,
    id: impl Fn(&T) -> &str,
    title: impl Fn(&T) -> &str,
) -> Result<&'a T, LookupError> {
    if let Some(found) = items.iter().find(|item| id(*item) == key) {
        return Ok(found);
    }
    let titled: Vec<&T> = items
        .iter()
        .filter(|item| title(*item).eq_ignore_ascii_case(key))
        .collect();
    let candidates: Vec<&T> = if titled.is_empty() {
        items
            .iter()
            .filter(|item| !key.is_empty() && id(*item).starts_with(key))
            .collect()
    } else {
        titled
    };
    match candidates.as_slice() {
        [one] => Ok(*one),
        [] => Err(LookupError::NotFound {
            kind,
            key: key.to_string(),
        }),
        many => Err(LookupError::Ambiguous {
            kind,
            key: key.to_string(),
            matches: many.len(),
        }),
    }
}

pub fn resolve_board<'a>(state: &'a AppState, key: &str) -> Result<&'a Board, LookupError> {
    resolve(&state.boards, key, "board", |b| b.id.as_str(), |b| b.title.as_str())
}

pub fn resolve_list<'a>(board: &'a Board, key: &str) -> Result<&'a List, LookupError> {
    resolve(&board.lists, key, "list", |l| l.id.as_str(), |l| l.title.as_str())
}

pub fn resolve_card<'a>(list: &'a List, key: &str) -> Result<&'a Card, LookupError> {
    resolve(&list.cards, key, "card", |c| c.id.as_str(), |c| c.title.as_str())
}

/// Looks a card up across every list of `board`, with the same matching
/// rules as the per-list lookups.
pub fn resolve_board_card<'a>(
    board: &'a Board,
    key: &str,
) -> Result<(&'a List, &'a Card), LookupError> {
    let cards: Vec<(&List, &Card)> = board
        .lists
        .iter()
        .flat_map(|list| list.cards.iter().map(move |card| (list, card)))
        .collect();
    resolve(&cards, key, "card", |(_, c)| c.id.as_str(), |(_, c)| c.title.as_str()).copied()
}

pub fn resolve_comment<'a>(card: &'a Card, key: &str) -> Result<&'a Comment, LookupError> {
    resolve(&card.comments, key, "comment", |c| c.id.as_str(), |c| c.text.as_str())
}

fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

fn color_suffix(color: Option<&str>) -> String {
    match color {
        Some(c) => match color_name(c) {
            Some(name) => format!(" <{}>", name.to_lowercase()),
            None => format!(" <{}>", c),
        },
        None => String::new(),
    }
}

fn print_card(card: &Card) {
    let comments = match card.comments.len() {
        0 => String::new(),
        1 => "  (1 comment)".to_string(),
        n => format!("  ({} comments)", n),
    };
    println!("  - {}: {}{}", short_id(&card.id), card.title, comments);
    if !card.description.is_empty() {
        for line in card.description.lines() {
            println!("    {}", line);
        }
    }
}
