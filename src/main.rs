mod action;
mod cli;
mod commands;
mod config;
mod context;
mod logging;
mod model;
mod prompt;
mod storage;
mod store;
mod ui;

use anyhow::Result;
use clap::Parser;
use cli::Command;
use context::AppContext;
use storage::FileStore;

fn main() -> Result<()> {
    let args = cli::Cli::parse();

    let mut config = config::Config::load(args.config.as_deref())?;
    if let Some(dir) = args.data_dir {
        config.data_dir = Some(dir);
    }
    if let Some(level) = args.log_level {
        config.log_level = Some(level);
    }
    let settings = config.resolve(storage::default_data_dir())?;
    storage::ensure_dir(&settings.data_dir)?;
    let _logger = logging::init_logging(&settings.log_level, &settings.log_dir)?;

    let store = FileStore::new(&settings.data_dir);
    let mut ctx = AppContext::open(Box::new(store), settings.storage_key);

    let command = args.command.unwrap_or(Command::Tui);
    match command {
        Command::Boards => commands::boards(&ctx),
        Command::Show { board } => commands::show(&ctx, board),
        Command::AddBoard { title, color } => commands::add_board(&mut ctx, title, color),
        Command::RenameBoard { board, title } => commands::rename_board(&mut ctx, board, title),
        Command::DeleteBoard { board } => commands::delete_board(&mut ctx, board),
        Command::Select { board } => commands::select(&mut ctx, board),
        Command::AddList { board, title, color } => {
            commands::add_list(&mut ctx, board, title, color)
        }
        Command::RenameList { board, list, title } => {
            commands::rename_list(&mut ctx, board, list, title)
        }
        Command::DeleteList { board, list } => commands::delete_list(&mut ctx, board, list),
        Command::AddCard {
            board,
            list,
            title,
            description,
        } => commands::add_card(&mut ctx, board, list, title, description),
        Command::EditCard {
            board,
            list,
            card,
            title,
            description,
        } => commands::edit_card(&mut ctx, board, list, card, title, description),
        Command::DeleteCard { board, list, card } => {
            commands::delete_card(&mut ctx, board, list, card)
        }
        Command::MoveCard {
            board,
            card,
            to,
            position,
        } => commands::move_card(&mut ctx, board, card, to, position),
        Command::Comment {
            board,
            list,
            card,
            text,
        } => commands::comment(&mut ctx, board, list, card, text),
        Command::DeleteComment {
            board,
            list,
            card,
            comment,
        } => commands::delete_comment(&mut ctx, board, list, card, comment),
        Command::DarkMode => commands::dark_mode(&mut ctx),
        Command::Dispatch { action } => commands::dispatch_raw(&mut ctx, action),
        Command::Tui => commands::tui(ctx),
    }
}
