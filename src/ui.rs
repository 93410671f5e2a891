use crate::action::Action;
use crate::context::{AppContext, DarkModeSwitch};
use crate::model::{AppState, Board, Card, CardPatch, Comment, List as BoardList, PRESET_COLORS};
use crate::prompt::{PromptRequest, PromptRequester, PromptSlot};
use anyhow::Result;
use chrono::{DateTime, Utc};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use log::debug;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::{Alignment, Color, Modifier, Rect, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::ListState;
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap};
use ratatui::Terminal;
use std::io::{stdout, Stdout};
use std::time::Duration;

pub fn run(mut ctx: AppContext) -> Result<()> {
    let dark = DarkModeSwitch::new();
    ctx.observe(Box::new(dark.clone()));
    let mut terminal = setup_terminal()?;
    let mut app = App::new(ctx, dark);
    let result = app.event_loop(&mut terminal);
    teardown_terminal(&mut terminal)?;
    result
}

struct App {
    ctx: AppContext,
    dark: DarkModeSwitch,
    selected_board: usize,
    selected_list: usize,
    selected_card: usize,
    scroll_offsets: Vec<usize>,
    detail: Option<CardView>,
    status: String,
    mode: Mode,
}

enum Mode {
    Normal,
    Prompt(PromptDialog),
    Confirm(ConfirmDialog),
    EditCard(CardForm),
}

/// The card opened in the detail pane, addressed by ids so it survives
/// unrelated changes to the board.
#[derive(Clone, Debug, PartialEq)]
struct CardView {
    board_id: String,
    list_id: String,
    card_id: String,
    selected_comment: usize,
}

struct PromptDialog {
    request: PromptRequest,
    input: FieldValue,
    color_idx: usize,
}

struct ConfirmDialog {
    title: String,
    message: String,
    actions: Vec<Action>,
    done: String,
}

struct CardForm {
    title: FieldValue,
    description: FieldValue,
    field: FormField,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum FormField {
    Title,
    Description,
}

#[derive(Clone)]
struct FieldValue {
    value: String,
    cursor: usize,
}

struct Theme {
    bg: Color,
    panel: Color,
    card: Color,
    text: Color,
    muted: Color,
    accent: Color,
    highlight_bg: Color,
    highlight_fg: Color,
    danger: Color,
}

impl Theme {
    fn for_dark(dark: bool) -> Self {
        if dark {
            Theme {
                bg: Color::Rgb(17, 24, 39),
                panel: Color::Rgb(31, 41, 55),
                card: Color::Rgb(55, 65, 81),
                text: Color::Rgb(243, 244, 246),
                muted: Color::Rgb(156, 163, 175),
                accent: Color::Rgb(96, 165, 250),
                highlight_bg: Color::Rgb(252, 214, 112),
                highlight_fg: Color::Rgb(17, 24, 39),
                danger: Color::Rgb(248, 113, 113),
            }
        } else {
            Theme {
                bg: Color::Rgb(243, 244, 246),
                panel: Color::Rgb(229, 231, 235),
                card: Color::Rgb(255, 255, 255),
                text: Color::Rgb(17, 24, 39),
                muted: Color::Rgb(107, 114, 128),
                accent: Color::Rgb(37, 99, 235),
                highlight_bg: Color::Rgb(191, 219, 254),
                highlight_fg: Color::Rgb(17, 24, 39),
                danger: Color::Rgb(220, 38, 38),
            }
        }
    }
}

impl PromptDialog {
    fn new(request: PromptRequest) -> Self {
        let input = FieldValue::new(request.default_value.as_deref().unwrap_or(""));
        PromptDialog {
            request,
            input,
            color_idx: 0,
        }
    }

    fn color(&self) -> Option<&'static str> {
        self.request
            .show_color_picker
            .then(|| PRESET_COLORS[self.color_idx % PRESET_COLORS.len()].1)
    }
}

impl CardForm {
    fn from_card(card: &Card) -> Self {
        CardForm {
            title: FieldValue::new(&card.title),
            description: FieldValue::new(&card.description),
            field: FormField::Title,
        }
    }

    fn toggle_field(&mut self) {
        self.field = match self.field {
            FormField::Title => FormField::Description,
            FormField::Description => FormField::Title,
        };
    }

    fn active_field_mut(&mut self) -> &mut FieldValue {
        match self.field {
            FormField::Title => &mut self.title,
            FormField::Description => &mut self.description,
        }
    }
}

impl FieldValue {
    fn new(value: &str) -> Self {
        FieldValue {
            value: value.to_string(),
            cursor: value.len(),
        }
    }

    fn move_left(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor = prev_char_boundary(self.cursor, &self.value);
    }

    fn move_right(&mut self) {
        if self.cursor >= self.value.len() {
            return;
        }
        self.cursor = next_char_boundary(self.cursor, &self.value);
    }

    fn move_up(&mut self) {
        let (line_starts, line_idx, col) = line_state(&self.value, self.cursor);
        if line_idx == 0 {
            return;
        }
        let target_start = line_starts[line_idx - 1];
        self.cursor = index_at_col(&self.value, target_start, col);
    }

    fn move_down(&mut self) {
        let (line_starts, line_idx, col) = line_state(&self.value, self.cursor);
        if line_idx + 1 >= line_starts.len() {
            return;
        }
        let target_start = line_starts[line_idx + 1];
        self.cursor = index_at_col(&self.value, target_start, col);
    }

    fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let prev = prev_char_boundary(self.cursor, &self.value);
        self.value.drain(prev..self.cursor);
        self.cursor = prev;
    }

    fn insert_char(&mut self, ch: char) {
        self.value.insert(self.cursor, ch);
        self.cursor += ch.len_utf8();
    }

    fn with_caret(&self) -> String {
        let mut text = self.value.clone();
        text.insert_str(self.cursor, "▌");
        text
    }
}

impl App {
    fn new(ctx: AppContext, dark: DarkModeSwitch) -> Self {
        let status = match ctx.state().boards.len() {
            0 => "No boards yet, press n to create one".to_string(),
            1 => "Loaded 1 board".to_string(),
            n => format!("Loaded {} boards", n),
        };
        let mut app = App {
            ctx,
            dark,
            selected_board: 0,
            selected_list: 0,
            selected_card: 0,
            scroll_offsets: Vec::new(),
            detail: None,
            status,
            mode: Mode::Normal,
        };
        if let Some(id) = app.state().current_board_id.clone() {
            if let Some(idx) = app.state().boards.iter().position(|b| b.id == id) {
                app.selected_board = idx;
            }
        }
        app
    }

    fn state(&self) -> &AppState {
        self.ctx.state()
    }

    fn event_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        let mut prompts = PromptSlot::default();
        loop {
            terminal.draw(|f| self.draw(f))?;
            if event::poll(Duration::from_millis(200))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key, &mut prompts) {
                        break;
                    }
                }
            }
        }
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent, prompts: &mut PromptSlot) -> bool {
        let quit = match self.mode {
            Mode::Normal => self.handle_normal_key(key, prompts),
            Mode::Prompt(_) => {
                self.handle_prompt_key(key);
                false
            }
            Mode::Confirm(_) => {
                self.handle_confirm_key(key);
                false
            }
            Mode::EditCard(_) => {
                self.handle_form_key(key);
                false
            }
        };
        if let Some(request) = prompts.take() {
            debug!("opening prompt {:?}", request.title);
            self.mode = Mode::Prompt(PromptDialog::new(request));
        }
        quit
    }

    fn handle_normal_key(&mut self, key: KeyEvent, prompts: &mut dyn PromptRequester) -> bool {
        match key.code {
            KeyCode::Char('q') => return true,
            KeyCode::Char('t') => {
                let theme = if self.state().is_dark_mode { "light" } else { "dark" };
                self.apply(
                    vec![Action::ToggleDarkMode],
                    format!("Switched to {} theme", theme),
                );
                return false;
            }
            _ => {}
        }
        if self.detail.is_some() {
            self.handle_detail_key(key, prompts);
        } else if self.state().current_board().is_some() {
            self.handle_board_key(key, prompts);
        } else {
            self.handle_selector_key(key, prompts);
        }
        false
    }

    fn handle_selector_key(&mut self, key: KeyEvent, prompts: &mut dyn PromptRequester) {
        let count = self.state().boards.len();
        match key.code {
            KeyCode::Char('n') => prompts.request_create_board(),
            KeyCode::Down | KeyCode::Char('j') => {
                if self.selected_board + 1 < count {
                    self.selected_board += 1;
                }
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected_board = self.selected_board.saturating_sub(1);
            }
            KeyCode::Enter => {
                if let Some(board) = self.state().boards.get(self.selected_board) {
                    let (id, title) = (board.id.clone(), board.title.clone());
                    self.open_board(id, format!("Opened {}", title));
                }
            }
            KeyCode::Char('r') => {
                if let Some(board) = self.state().boards.get(self.selected_board) {
                    prompts.request_prompt(rename_board_prompt(board));
                }
            }
            KeyCode::Char('d') => {
                if let Some(board) = self.state().boards.get(self.selected_board) {
                    self.mode = Mode::Confirm(delete_board_confirm(board));
                }
            }
            _ => {}
        }
    }

    fn handle_board_key(&mut self, key: KeyEvent, prompts: &mut dyn PromptRequester) {
        let Some(board) = self.state().current_board() else {
            return;
        };
        let list = board.lists.get(self.selected_list);
        let card = list.and_then(|l| l.cards.get(self.selected_card));
        match key.code {
            KeyCode::Esc | KeyCode::Backspace => {
                self.apply(vec![Action::SetCurrentBoard(None)], "Back to all boards");
            }
            KeyCode::Left | KeyCode::Char('h') => self.prev_list(),
            KeyCode::Right | KeyCode::Char('l') => self.next_list(),
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected_card = self.selected_card.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                let len = list.map(|l| l.cards.len()).unwrap_or(0);
                if self.selected_card + 1 < len {
                    self.selected_card += 1;
                }
            }
            KeyCode::Char('n') | KeyCode::Char('a') => {
                if let Some(list) = list {
                    prompts.request_prompt(add_card_prompt(board, list));
                }
            }
            KeyCode::Char('L') => prompts.request_prompt(add_list_prompt(board)),
            KeyCode::Char('R') => {
                if let Some(list) = list {
                    prompts.request_prompt(rename_list_prompt(board, list));
                }
            }
            KeyCode::Char('X') => {
                if let Some(list) = list {
                    self.mode = Mode::Confirm(delete_list_confirm(board, list));
                }
            }
            KeyCode::Char('r') => prompts.request_prompt(rename_board_prompt(board)),
            KeyCode::Char('D') => self.mode = Mode::Confirm(delete_board_confirm(board)),
            KeyCode::Char('d') => {
                if let (Some(list), Some(card)) = (list, card) {
                    self.mode = Mode::Confirm(delete_card_confirm(board, list, card));
                }
            }
            KeyCode::Enter => {
                if let (Some(list), Some(card)) = (list, card) {
                    self.detail = Some(CardView {
                        board_id: board.id.clone(),
                        list_id: list.id.clone(),
                        card_id: card.id.clone(),
                        selected_comment: 0,
                    });
                }
            }
            KeyCode::Char('>') | KeyCode::Char('m') => self.move_to_adjacent_list(1),
            KeyCode::Char('<') | KeyCode::Char('b') => self.move_to_adjacent_list(-1),
            KeyCode::Char('K') => self.reorder_selected(-1),
            KeyCode::Char('J') => self.reorder_selected(1),
            _ => {}
        }
    }

    fn handle_detail_key(&mut self, key: KeyEvent, prompts: &mut dyn PromptRequester) {
        let Some(view) = self.detail.clone() else {
            return;
        };
        let Some((board, list, card)) = locate(self.state(), &view) else {
            self.detail = None;
            return;
        };
        match key.code {
            KeyCode::Esc => self.detail = None,
            KeyCode::Char('e') => self.mode = Mode::EditCard(CardForm::from_card(card)),
            KeyCode::Char('c') => prompts.request_prompt(add_comment_prompt(board, list, card)),
            KeyCode::Char('d') => {
                self.mode = Mode::Confirm(delete_card_confirm(board, list, card));
            }
            KeyCode::Char('x') => {
                if let Some(comment) = card.comments.get(view.selected_comment) {
                    self.mode = Mode::Confirm(delete_comment_confirm(board, list, card, comment));
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                let len = card.comments.len();
                if let Some(view) = self.detail.as_mut() {
                    if view.selected_comment + 1 < len {
                        view.selected_comment += 1;
                    }
                }
            }
            KeyCode::Up | KeyCode::Char('k') => {
                if let Some(view) = self.detail.as_mut() {
                    view.selected_comment = view.selected_comment.saturating_sub(1);
                }
            }
            _ => {}
        }
    }

    fn handle_prompt_key(&mut self, key: KeyEvent) {
        let Mode::Prompt(mut dialog) = std::mem::replace(&mut self.mode, Mode::Normal) else {
            return;
        };
        match key.code {
            KeyCode::Esc => {
                self.status = "Canceled".into();
                return;
            }
            KeyCode::Enter => {
                let title = dialog.request.title.clone();
                let color = dialog.color();
                match dialog.request.confirm(&dialog.input.value, color) {
                    Ok(actions) => {
                        self.apply(actions, format!("{}: done", title));
                        return;
                    }
                    Err(request) => {
                        dialog.request = request;
                        self.status = "Enter a value or press Esc to cancel".into();
                    }
                }
            }
            KeyCode::Tab if dialog.request.show_color_picker => {
                dialog.color_idx = (dialog.color_idx + 1) % PRESET_COLORS.len();
            }
            KeyCode::BackTab if dialog.request.show_color_picker => {
                dialog.color_idx = (dialog.color_idx + PRESET_COLORS.len() - 1) % PRESET_COLORS.len();
            }
            KeyCode::Left => dialog.input.move_left(),
            KeyCode::Right => dialog.input.move_right(),
            KeyCode::Backspace => dialog.input.backspace(),
            KeyCode::Char(c) => {
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
                {
                    dialog.input.insert_char(c);
                }
            }
            _ => {}
        }
        self.mode = Mode::Prompt(dialog);
    }

    fn handle_confirm_key(&mut self, key: KeyEvent) {
        let Mode::Confirm(dialog) = std::mem::replace(&mut self.mode, Mode::Normal) else {
            return;
        };
        match key.code {
            KeyCode::Char('y') | KeyCode::Enter => self.apply(dialog.actions, dialog.done),
            KeyCode::Char('n') | KeyCode::Esc => self.status = "Delete canceled".into(),
            _ => self.mode = Mode::Confirm(dialog),
        }
    }

    fn handle_form_key(&mut self, key: KeyEvent) {
        let Mode::EditCard(mut form) = std::mem::replace(&mut self.mode, Mode::Normal) else {
            return;
        };
        match key.code {
            KeyCode::Esc => {
                self.status = "Canceled".into();
                return;
            }
            KeyCode::Tab | KeyCode::BackTab => form.toggle_field(),
            KeyCode::Left => form.active_field_mut().move_left(),
            KeyCode::Right => form.active_field_mut().move_right(),
            KeyCode::Up => form.active_field_mut().move_up(),
            KeyCode::Down => form.active_field_mut().move_down(),
            KeyCode::Enter => {
                let control = key.modifiers.contains(KeyModifiers::CONTROL);
                if form.field == FormField::Description && !control {
                    form.active_field_mut().insert_char('\n');
                } else if self.save_card_form(&form) {
                    return;
                }
            }
            KeyCode::Backspace => form.active_field_mut().backspace(),
            KeyCode::Char(c) => {
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
                {
                    form.active_field_mut().insert_char(c);
                }
            }
            _ => {}
        }
        self.mode = Mode::EditCard(form);
    }

    fn save_card_form(&mut self, form: &CardForm) -> bool {
        let title = form.title.value.trim();
        if title.is_empty() {
            self.status = "Title cannot be empty".into();
            return false;
        }
        let Some(view) = self.detail.clone() else {
            return true;
        };
        let action = Action::UpdateCard {
            board_id: view.board_id,
            list_id: view.list_id,
            card_id: view.card_id,
            updates: CardPatch {
                title: Some(title.to_string()),
                description: Some(form.description.value.trim().to_string()),
            },
        };
        self.apply(vec![action], format!("Saved {}", title));
        true
    }

    /// Dispatches `actions` in order. A failed save leaves the new state in
    /// place and is reported on the status line.
    fn apply(&mut self, actions: Vec<Action>, message: impl Into<String>) {
        let mut failed = None;
        for action in actions {
            if let Err(err) = self.ctx.dispatch(action) {
                failed.get_or_insert(err);
            }
        }
        self.status = match failed {
            Some(err) => format!("Save failed: {:#}", err),
            None => message.into(),
        };
        self.clamp_selection();
    }

    fn open_board(&mut self, id: String, message: String) {
        self.selected_list = 0;
        self.selected_card = 0;
        self.scroll_offsets.clear();
        self.apply(vec![Action::SetCurrentBoard(Some(id))], message);
    }

    fn clamp_selection(&mut self) {
        let state = self.ctx.state();
        self.selected_board = self
            .selected_board
            .min(state.boards.len().saturating_sub(1));
        if let Some(idx) = state
            .current_board_id
            .as_deref()
            .and_then(|id| state.boards.iter().position(|b| b.id == id))
        {
            self.selected_board = idx;
        }
        let lists = state.current_board().map(|b| b.lists.as_slice()).unwrap_or(&[]);
        self.selected_list = self.selected_list.min(lists.len().saturating_sub(1));
        let cards = lists.get(self.selected_list).map(|l| l.cards.len()).unwrap_or(0);
        self.selected_card = self.selected_card.min(cards.saturating_sub(1));

        let comments = self
            .detail
            .as_ref()
            .map(|view| locate(state, view).map(|(_, _, card)| card.comments.len()));
        match comments {
            Some(None) => self.detail = None,
            Some(Some(len)) => {
                if let Some(view) = self.detail.as_mut() {
                    view.selected_comment = view.selected_comment.min(len.saturating_sub(1));
                }
            }
            None => {}
        }
    }

    fn prev_list(&mut self) {
        if self.selected_list > 0 {
            self.selected_list -= 1;
            self.selected_card = 0;
        }
    }

    fn next_list(&mut self) {
        let count = self
            .state()
            .current_board()
            .map(|b| b.lists.len())
            .unwrap_or(0);
        if self.selected_list + 1 < count {
            self.selected_list += 1;
            self.selected_card = 0;
        }
    }

    fn move_to_adjacent_list(&mut self, delta: isize) {
        let Some(board) = self.state().current_board() else {
            return;
        };
        let target_idx = self.selected_list as isize + delta;
        if target_idx < 0 || target_idx as usize >= board.lists.len() {
            return;
        }
        let target_idx = target_idx as usize;
        let (Some(source), Some(target)) =
            (board.lists.get(self.selected_list), board.lists.get(target_idx))
        else {
            return;
        };
        let Some(card) = source.cards.get(self.selected_card) else {
            return;
        };
        let action = Action::MoveCard {
            board_id: board.id.clone(),
            card_id: card.id.clone(),
            source_list_id: source.id.clone(),
            target_list_id: target.id.clone(),
            new_position: target.cards.len(),
        };
        let message = format!("Moved {} to {}", card.title, target.title);
        let landing = target.cards.len();
        self.apply(vec![action], message);
        self.selected_list = target_idx;
        self.selected_card = landing;
        self.clamp_selection();
    }

    fn reorder_selected(&mut self, delta: isize) {
        let Some(board) = self.state().current_board() else {
            return;
        };
        let Some(list) = board.lists.get(self.selected_list) else {
            return;
        };
        let Some(card) = list.cards.get(self.selected_card) else {
            return;
        };
        let target = self.selected_card as isize + delta;
        if target < 0 || target as usize >= list.cards.len() {
            return;
        }
        let action = Action::MoveCard {
            board_id: board.id.clone(),
            card_id: card.id.clone(),
            source_list_id: list.id.clone(),
            target_list_id: list.id.clone(),
            new_position: target as usize,
        };
        let message = format!("Moved {} to slot {}", card.title, target + 1);
        self.apply(vec![action], message);
        self.selected_card = target as usize;
    }

    fn draw(&mut self, f: &mut ratatui::Frame<'_>) {
        let theme = Theme::for_dark(self.dark.is_dark());
        f.render_widget(
            Block::default().style(Style::default().bg(theme.bg).fg(theme.text)),
            f.size(),
        );
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(8),
                Constraint::Length(4),
            ])
            .split(f.size());

        self.draw_header(f, layout[0], &theme);
        if self.state().current_board().is_some() {
            self.draw_board(f, layout[1], &theme);
        } else {
            self.draw_selector(f, layout[1], &theme);
        }
        self.draw_footer(f, layout[2], &theme);

        if self.detail.is_some() {
            self.draw_card_detail(f, &theme);
        }
        match &self.mode {
            Mode::Prompt(dialog) => draw_prompt(f, dialog, &theme),
            Mode::Confirm(dialog) => draw_confirm(f, dialog, &theme),
            Mode::EditCard(form) => draw_form(f, form, &theme),
            Mode::Normal => {}
        }
    }

    fn draw_header(&self, f: &mut ratatui::Frame<'_>, area: Rect, theme: &Theme) {
        let state = self.state();
        let mut spans = vec![Span::styled(
            "tackboard ",
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        )];
        match state.current_board() {
            Some(board) => {
                spans.push(Span::styled(
                    "■ ",
                    Style::default().fg(swatch(board.color.as_deref(), theme.accent)),
                ));
                spans.push(Span::styled(
                    board.title.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                ));
                spans.push(Span::raw("  •  "));
                spans.push(Span::styled(
                    format!("{} lists, {} cards", board.lists.len(), board.card_count()),
                    Style::default().fg(theme.muted),
                ));
            }
            None => spans.push(Span::styled(
                "All Boards",
                Style::default().add_modifier(Modifier::BOLD),
            )),
        }
        spans.push(Span::raw("  •  "));
        spans.push(Span::styled(
            format!("{} boards", state.boards.len()),
            Style::default().fg(theme.muted),
        ));
        spans.push(Span::raw("  •  "));
        spans.push(Span::styled(
            if self.dark.is_dark() { "dark" } else { "light" },
            Style::default().fg(theme.muted),
        ));

        let block = Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(theme.muted));
        let paragraph = Paragraph::new(Line::from(spans))
            .alignment(Alignment::Center)
            .block(block);
        f.render_widget(paragraph, area);
    }

    fn draw_selector(&self, f: &mut ratatui::Frame<'_>, area: Rect, theme: &Theme) {
        let state = self.ctx.state();
        if state.boards.is_empty() {
            let body = vec![
                Line::from(""),
                Line::from(Span::styled(
                    "Welcome to tackboard",
                    Style::default()
                        .fg(theme.accent)
                        .add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
                Line::from("Create your first board to get started."),
                Line::from(Span::styled(
                    "Press n to create a board",
                    Style::default().fg(theme.muted),
                )),
            ];
            let msg = Paragraph::new(body).alignment(Alignment::Center).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(theme.muted))
                    .style(Style::default().bg(theme.panel)),
            );
            f.render_widget(msg, area);
            return;
        }

        let now = Utc::now();
        let items = state
            .boards
            .iter()
            .map(|board| board_item(board, now, theme))
            .collect::<Vec<_>>();
        let mut list_state = ListState::default();
        list_state.select(Some(self.selected_board));
        let block = Block::default()
            .title(Span::styled(
                "Your Boards",
                Style::default()
                    .fg(theme.accent)
                    .add_modifier(Modifier::BOLD),
            ))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.muted))
            .style(Style::default().bg(theme.panel));
        let list = List::new(items).block(block).highlight_style(
            Style::default()
                .bg(theme.highlight_bg)
                .fg(theme.highlight_fg)
                .add_modifier(Modifier::BOLD),
        );
        f.render_stateful_widget(list, area, &mut list_state);
    }

    fn draw_board(&mut self, f: &mut ratatui::Frame<'_>, area: Rect, theme: &Theme) {
        let state = self.ctx.state();
        let Some(board) = state.current_board() else {
            return;
        };
        if board.lists.is_empty() {
            let msg = Paragraph::new("No lists yet, press L to add one")
                .alignment(Alignment::Center)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(theme.muted))
                        .title(board.title.clone()),
                );
            f.render_widget(Clear, area);
            f.render_widget(msg, area);
            return;
        }

        if self.scroll_offsets.len() != board.lists.len() {
            self.scroll_offsets.resize(board.lists.len(), 0);
        }

        let chunk_constraints = board
            .lists
            .iter()
            .map(|_| Constraint::Percentage((100 / board.lists.len() as u16).max(1)))
            .collect::<Vec<_>>();
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(chunk_constraints)
            .split(area);

        for (idx, list) in board.lists.iter().enumerate() {
            let accent = swatch(list.color.as_deref(), color_for_index(idx));
            let card_width = chunks[idx].width.saturating_sub(2);
            let focused = idx == self.selected_list;
            let cards = list
                .cards
                .iter()
                .enumerate()
                .map(|(c_idx, card)| {
                    card_item(card, card_width, focused && c_idx == self.selected_card, theme)
                })
                .collect::<Vec<_>>();
            let mut list_state = ListState::default();
            let mut offset = *self.scroll_offsets.get(idx).unwrap_or(&0);
            let viewport = chunks[idx].height.saturating_sub(2) as usize / CARD_HEIGHT;
            if focused {
                offset = adjust_offset(self.selected_card, offset, viewport, 1, cards.len());
                self.scroll_offsets[idx] = offset;
                list_state.select(Some(self.selected_card));
                *list_state.offset_mut() = offset;
            } else {
                *list_state.offset_mut() = offset.min(cards.len().saturating_sub(1));
            }

            let title = format!("{} ({})", list.title, list.cards.len());
            let block = Block::default()
                .title(Span::styled(
                    title,
                    Style::default().fg(accent).add_modifier(if focused {
                        Modifier::BOLD | Modifier::UNDERLINED
                    } else {
                        Modifier::BOLD
                    }),
                ))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(accent))
                .style(Style::default().bg(theme.panel));

            let widget = List::new(cards).block(block);
            f.render_stateful_widget(widget, chunks[idx], &mut list_state);
        }
    }

    fn draw_card_detail(&self, f: &mut ratatui::Frame<'_>, theme: &Theme) {
        let Some(view) = self.detail.as_ref() else {
            return;
        };
        let Some((_, list, card)) = locate(self.state(), view) else {
            return;
        };
        let now = Utc::now();
        let area = centered_rect(70, 70, f.size());
        let mut lines = vec![
            Line::from(Span::styled(
                card.title.clone(),
                Style::default()
                    .fg(theme.text)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                format!(
                    "in {}  •  created {}  •  updated {}",
                    list.title,
                    format_ago(card.created_at, now),
                    format_ago(card.updated_at, now)
                ),
                Style::default().fg(theme.muted),
            )),
            Line::from(""),
        ];
        if card.description.is_empty() {
            lines.push(Line::from(Span::styled(
                "No description. Press e to add one.",
                Style::default()
                    .fg(theme.muted)
                    .add_modifier(Modifier::ITALIC),
            )));
        } else {
            lines.extend(card.description.lines().map(|l| Line::from(l.to_string())));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("Comments ({})", card.comments.len()),
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        )));
        if card.comments.is_empty() {
            lines.push(Line::from(Span::styled(
                "No comments yet",
                Style::default().fg(theme.muted),
            )));
        }
        for (idx, comment) in card.comments.iter().enumerate() {
            lines.push(comment_line(
                comment,
                now,
                idx == view.selected_comment,
                theme,
            ));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "e edit • c comment • x delete comment • d delete card • Esc close",
            Style::default().fg(theme.muted),
        )));

        let dialog = Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .title(Span::styled(
                        "Card",
                        Style::default()
                            .fg(theme.accent)
                            .add_modifier(Modifier::BOLD),
                    ))
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(theme.accent))
                    .style(Style::default().bg(theme.panel).fg(theme.text)),
            );
        f.render_widget(Clear, area);
        f.render_widget(dialog, area);
    }

    fn draw_footer(&self, f: &mut ratatui::Frame<'_>, area: Rect, theme: &Theme) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(2), Constraint::Length(2)])
            .split(area);

        let help_bar = Paragraph::new(self.footer_help_line(theme))
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::TOP)
                    .border_style(Style::default().fg(theme.muted)),
            );
        f.render_widget(help_bar, rows[0]);

        let status_style = if self.status.starts_with("Save failed") {
            Style::default().fg(theme.danger)
        } else {
            Style::default().fg(theme.text)
        };
        let status = Paragraph::new(Span::styled(self.status.clone(), status_style))
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::TOP)
                    .border_style(Style::default().fg(theme.muted)),
            );
        f.render_widget(status, rows[1]);
    }

    fn footer_help_line(&self, theme: &Theme) -> Line<'static> {
        let key = |k: &'static str| Span::styled(k, Style::default().fg(theme.accent));
        let danger = |k: &'static str| Span::styled(k, Style::default().fg(theme.danger));
        let mut spans = Vec::new();
        if self.detail.is_some() {
            spans.extend([
                key("j/k"),
                Span::raw(" comments  "),
                key("e"),
                Span::raw(" edit  "),
                key("c"),
                Span::raw(" comment  "),
                danger("x"),
                Span::raw(" delete comment  "),
                key("Esc"),
                Span::raw(" close  "),
            ]);
        } else if self.state().current_board().is_some() {
            spans.extend([
                key("h j k l"),
                Span::raw(" move  "),
                key("</>"),
                Span::raw(" move card  "),
                key("K/J"),
                Span::raw(" reorder  "),
                key("n"),
                Span::raw(" card  "),
                key("L"),
                Span::raw(" list  "),
                key("R/r"),
                Span::raw(" rename  "),
                danger("d/X/D"),
                Span::raw(" delete  "),
                key("Esc"),
                Span::raw(" boards  "),
            ]);
        } else {
            spans.extend([
                key("j/k"),
                Span::raw(" browse  "),
                key("Enter"),
                Span::raw(" open  "),
                key("n"),
                Span::raw(" new  "),
                key("r"),
                Span::raw(" rename  "),
                danger("d"),
                Span::raw(" delete  "),
            ]);
        }
        spans.extend([key("t"), Span::raw(" theme  "), danger("q"), Span::raw(" quit")]);
        Line::from(spans)
    }
}

fn locate<'a>(state: &'a AppState, view: &CardView) -> Option<(&'a Board, &'a BoardList, &'a Card)> {
    let board = state.board(&view.board_id)?;
    let list = board.list(&view.list_id)?;
    let card = list.card(&view.card_id)?;
    Some((board, list, card))
}

fn rename_board_prompt(board: &Board) -> PromptRequest {
    let id = board.id.clone();
    PromptRequest::new("Rename Board", move |title, _| {
        vec![Action::UpdateBoard {
            id,
            title: title.to_string(),
        }]
    })
    .default_value(board.title.clone())
}

fn add_list_prompt(board: &Board) -> PromptRequest {
    let board_id = board.id.clone();
    let position = board.lists.len();
    PromptRequest::new("Add List", move |title, color| {
        let list = BoardList::new(
            &board_id,
            position,
            title,
            color.map(str::to_string),
            Utc::now(),
        );
        vec![Action::AddList { board_id, list }]
    })
    .description("Enter a name for the new list and choose a color")
    .placeholder("Enter list title...")
    .with_color_picker()
}

fn rename_list_prompt(board: &Board, list: &BoardList) -> PromptRequest {
    let board_id = board.id.clone();
    let list_id = list.id.clone();
    PromptRequest::new("Rename List", move |title, _| {
        vec![Action::UpdateList {
            board_id,
            list_id,
            title: title.to_string(),
        }]
    })
    .default_value(list.title.clone())
}

fn add_card_prompt(board: &Board, list: &BoardList) -> PromptRequest {
    let board_id = board.id.clone();
    let list_id = list.id.clone();
    let position = list.cards.len();
    PromptRequest::new("Add Card", move |title, _| {
        let card = Card::new(&list_id, position, title, Utc::now());
        vec![Action::AddCard {
            board_id,
            list_id,
            card,
        }]
    })
    .description(format!("New card in {}", list.title))
    .placeholder("Enter card title...")
}

fn add_comment_prompt(board: &Board, list: &BoardList, card: &Card) -> PromptRequest {
    let board_id = board.id.clone();
    let list_id = list.id.clone();
    let card_id = card.id.clone();
    PromptRequest::new("Add Comment", move |text, _| {
        vec![Action::AddComment {
            board_id,
            list_id,
            card_id,
            comment: Comment::new(text, Utc::now()),
        }]
    })
    .description(format!("Comment on {}", card.title))
    .placeholder("Write a comment...")
}

fn delete_board_confirm(board: &Board) -> ConfirmDialog {
    ConfirmDialog {
        title: "Delete Board".into(),
        message: format!(
            "Delete board \"{}\" with {} lists and {} cards?",
            board.title,
            board.lists.len(),
            board.card_count()
        ),
        actions: vec![Action::DeleteBoard(board.id.clone())],
        done: format!("Deleted board {}", board.title),
    }
}

fn delete_list_confirm(board: &Board, list: &BoardList) -> ConfirmDialog {
    ConfirmDialog {
        title: "Delete List".into(),
        message: format!(
            "Delete list \"{}\" and its {} cards?",
            list.title,
            list.cards.len()
        ),
        actions: vec![Action::DeleteList {
            board_id: board.id.clone(),
            list_id: list.id.clone(),
        }],
        done: format!("Deleted list {}", list.title),
    }
}

fn delete_card_confirm(board: &Board, list: &BoardList, card: &Card) -> ConfirmDialog {
    ConfirmDialog {
        title: "Delete Card".into(),
        message: format!("Delete card \"{}\"?", card.title),
        actions: vec![Action::DeleteCard {
            board_id: board.id.clone(),
            list_id: list.id.clone(),
            card_id: card.id.clone(),
        }],
        done: format!("Deleted card {}", card.title),
    }
}

fn delete_comment_confirm(
    board: &Board,
    list: &BoardList,
    card: &Card,
    comment: &Comment,
) -> ConfirmDialog {
    ConfirmDialog {
        title: "Delete Comment".into(),
        message: format!("Delete comment \"{}\"?", truncate_text(&comment.text, 40)),
        actions: vec![Action::DeleteComment {
            board_id: board.id.clone(),
            list_id: list.id.clone(),
            card_id: card.id.clone(),
            comment_id: comment.id.clone(),
        }],
        done: "Deleted comment".into(),
    }
}

fn draw_prompt(f: &mut ratatui::Frame<'_>, dialog: &PromptDialog, theme: &Theme) {
    let area = centered_rect(60, 40, f.size());
    let request = &dialog.request;
    let mut lines = Vec::new();
    if let Some(description) = &request.description {
        lines.push(Line::from(Span::styled(
            description.clone(),
            Style::default().fg(theme.muted),
        )));
        lines.push(Line::from(""));
    }
    let input = if dialog.input.value.is_empty() {
        Line::from(vec![
            Span::raw("▌"),
            Span::styled(
                request.placeholder.clone().unwrap_or_default(),
                Style::default()
                    .fg(theme.muted)
                    .add_modifier(Modifier::DIM),
            ),
        ])
    } else {
        Line::from(Span::styled(
            dialog.input.with_caret(),
            Style::default().fg(theme.accent),
        ))
    };
    lines.push(input);
    if request.show_color_picker {
        lines.push(Line::from(""));
        let mut spans = vec![Span::styled("Color: ", Style::default().fg(theme.muted))];
        for (idx, (name, hex)) in PRESET_COLORS.iter().enumerate() {
            let color = hex_color(hex).unwrap_or(theme.accent);
            let marker = if idx == dialog.color_idx { "[■]" } else { " ■ " };
            spans.push(Span::styled(marker, Style::default().fg(color)));
            if idx == dialog.color_idx {
                spans.push(Span::styled(
                    format!("{} ", name),
                    Style::default().add_modifier(Modifier::BOLD),
                ));
            }
        }
        lines.push(Line::from(spans));
    }
    lines.push(Line::from(""));
    let help = if request.show_color_picker {
        "Enter confirm • Tab/Shift-Tab color • Esc cancel"
    } else {
        "Enter confirm • Esc cancel"
    };
    lines.push(Line::from(Span::styled(help, Style::default().fg(theme.muted))));

    let block = Block::default()
        .title(Span::styled(
            request.title.clone(),
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.accent))
        .style(Style::default().bg(theme.panel).fg(theme.text));
    let widget = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
    f.render_widget(Clear, area);
    f.render_widget(widget, area);
}

fn draw_confirm(f: &mut ratatui::Frame<'_>, dialog: &ConfirmDialog, theme: &Theme) {
    let area = centered_rect(50, 30, f.size());
    let body = vec![
        Line::from(Span::styled(
            dialog.message.clone(),
            Style::default()
                .fg(theme.danger)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("Press y to confirm, n or Esc to cancel"),
    ];
    let widget = Paragraph::new(body)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title(Span::styled(
                    dialog.title.clone(),
                    Style::default()
                        .fg(theme.danger)
                        .add_modifier(Modifier::BOLD),
                ))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.danger))
                .style(Style::default().bg(theme.panel).fg(theme.text)),
        );
    f.render_widget(Clear, area);
    f.render_widget(widget, area);
}

fn draw_form(f: &mut ratatui::Frame<'_>, form: &CardForm, theme: &Theme) {
    let area = centered_rect(70, 60, f.size());
    let mut fields = Vec::new();
    fields.extend(field_lines(
        "Title",
        &form.title,
        form.field == FormField::Title,
        theme,
    ));
    fields.extend(field_lines(
        "Description",
        &form.description,
        form.field == FormField::Description,
        theme,
    ));
    fields.push(Line::from(""));
    fields.push(Line::from(Span::styled(
        "Ctrl+Enter to save • Esc to cancel • Tab to switch • Enter adds newline in Description",
        Style::default().fg(theme.muted),
    )));
    let dialog = Paragraph::new(fields)
        .block(
            Block::default()
                .title(Span::styled(
                    "Edit Card",
                    Style::default()
                        .fg(theme.accent)
                        .add_modifier(Modifier::BOLD),
                ))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.accent))
                .style(Style::default().bg(theme.panel).fg(theme.text)),
        )
        .wrap(Wrap { trim: true });

    f.render_widget(Clear, area);
    f.render_widget(dialog, area);
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn teardown_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Renders a relative age like "5m ago". Timestamps in the future read as
/// "just now".
pub fn format_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - then).num_seconds();
    if secs < 10 {
        "just now".to_string()
    } else if secs < 60 {
        format!("{}s ago", secs)
    } else if secs < 3600 {
        format!("{}m ago", secs / 60)
    } else if secs < 86_400 {
        format!("{}h ago", secs / 3600)
    } else {
        format!("{}d ago", secs / 86_400)
    }
}

fn hex_color(value: &str) -> Option<Color> {
    let hex = value.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
    Some(Color::Rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

fn swatch(color: Option<&str>, fallback: Color) -> Color {
    color.and_then(hex_color).unwrap_or(fallback)
}

fn color_for_index(idx: usize) -> Color {
    let palette = [
        Color::Cyan,
        Color::LightGreen,
        Color::LightMagenta,
        Color::LightBlue,
        Color::LightYellow,
        Color::LightRed,
    ];
    palette[idx % palette.len()]
}

fn adjust_offset(
    selected: usize,
    current_offset: usize,
    viewport: usize,
    scrolloff: usize,
    len: usize,
) -> usize {
    if viewport == 0 || len == 0 {
        return 0;
    }
    let max_offset = len.saturating_sub(viewport);
    let margin = scrolloff.min(viewport.saturating_sub(1));
    let mut offset = current_offset.min(max_offset);
    if selected < offset.saturating_add(margin) {
        offset = selected.saturating_sub(margin);
    } else {
        let upper = offset
            .saturating_add(viewport.saturating_sub(1))
            .saturating_sub(margin);
        if selected > upper {
            offset = selected.saturating_add(margin + 1).saturating_sub(viewport);
        }
    }
    offset.min(max_offset)
}

fn prev_char_boundary(cursor: usize, text: &str) -> usize {
    text[..cursor]
        .char_indices()
        .next_back()
        .map(|(idx, _)| idx)
        .unwrap_or(0)
}

fn next_char_boundary(cursor: usize, text: &str) -> usize {
    text[cursor..]
        .chars()
        .next()
        .map(|ch| cursor + ch.len_utf8())
        .unwrap_or(text.len())
}

fn line_state(text: &str, cursor: usize) -> (Vec<usize>, usize, usize) {
    let mut starts = vec![0];
    for (idx, ch) in text.char_indices() {
        if ch == '\n' {
            starts.push(idx + 1);
        }
    }
    let line_idx = starts
        .iter()
        .rposition(|start| *start <= cursor)
        .unwrap_or(0);
    let col = text[starts[line_idx]..cursor].chars().count();
    (starts, line_idx, col)
}

fn index_at_col(text: &str, start: usize, target_col: usize) -> usize {
    let slice = &text[start..];
    let limit = slice.find('\n').unwrap_or(slice.len());
    slice[..limit]
        .char_indices()
        .nth(target_col)
        .map(|(idx, _)| start + idx)
        .unwrap_or(start + limit)
}

fn truncate_text(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    if max <= 3 {
        return text.chars().take(max).collect();
    }
    let mut out: String = text.chars().take(max - 3).collect();
    out.push_str("...");
    out
}

const CARD_HEIGHT: usize = 4;

fn board_item(board: &Board, now: DateTime<Utc>, theme: &Theme) -> ListItem<'static> {
    let spans = vec![
        Span::styled(
            "■ ",
            Style::default().fg(swatch(board.color.as_deref(), theme.accent)),
        ),
        Span::styled(
            truncate_text(&board.title, 40),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(
            format!(
                "{} lists • {} cards • updated {}",
                board.lists.len(),
                board.card_count(),
                format_ago(board.updated_at, now)
            ),
            Style::default().fg(theme.muted),
        ),
    ];
    ListItem::new(Line::from(spans)).style(Style::default().fg(theme.text))
}

fn card_item(card: &Card, width: u16, selected: bool, theme: &Theme) -> ListItem<'static> {
    let inner = width.saturating_sub(2).max(10) as usize;
    let description = card.description.lines().next().unwrap_or("");
    let meta = match card.comments.len() {
        0 => String::new(),
        1 => "1 comment".to_string(),
        n => format!("{} comments", n),
    };
    let lines = vec![
        Line::from(Span::styled(
            format!(" {}", truncate_text(&card.title, inner.saturating_sub(1))),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!(" {}", truncate_text(description, inner.saturating_sub(1))),
            Style::default().fg(theme.muted),
        )),
        Line::from(Span::styled(
            format!(" {}", meta),
            Style::default().fg(theme.muted),
        )),
        Line::raw(""),
    ];
    let style = if selected {
        Style::default()
            .bg(theme.highlight_bg)
            .fg(theme.highlight_fg)
    } else {
        Style::default().bg(theme.card).fg(theme.text)
    };
    ListItem::new(lines).style(style)
}

fn comment_line(comment: &Comment, now: DateTime<Utc>, selected: bool, theme: &Theme) -> Line<'static> {
    let marker = if selected { "▶ " } else { "• " };
    let text_style = if selected {
        Style::default()
            .bg(theme.highlight_bg)
            .fg(theme.highlight_fg)
    } else {
        Style::default().fg(theme.text)
    };
    Line::from(vec![
        Span::styled(marker, Style::default().fg(theme.accent)),
        Span::styled(comment.text.clone(), text_style),
        Span::styled(
            format!("  {}", format_ago(comment.created_at, now)),
            Style::default().fg(theme.muted),
        ),
    ])
}

fn field_lines(label: &str, field: &FieldValue, active: bool, theme: &Theme) -> Vec<Line<'static>> {
    let label_style = Style::default()
        .fg(theme.muted)
        .add_modifier(Modifier::BOLD);
    let value_style = Style::default().fg(if active { theme.accent } else { theme.text });
    let prefix = format!("{}: ", label);
    let spacer = " ".repeat(prefix.chars().count());
    let text = if active {
        field.with_caret()
    } else {
        field.value.clone()
    };
    text.split('\n')
        .enumerate()
        .map(|(idx, line)| {
            Line::from(vec![
                Span::styled(
                    if idx == 0 {
                        prefix.clone()
                    } else {
                        spacer.clone()
                    },
                    label_style,
                ),
                Span::styled(line.to_string(), value_style),
            ])
        })
        .collect()
}
