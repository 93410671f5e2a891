//! The transition function for the whole application state.
//!
//! `reduce` consumes the previous snapshot and hands back the next one,
//! together with a flag telling whether anything changed. Only the path
//! from the root to the changed node is rebuilt; sibling boards, lists and
//! cards are moved across untouched. A reference to an unknown id yields
//! the input state unchanged and a `false` flag.

use crate::action::Action;
use crate::model::{AppState, Board, Card, CardPatch, Comment, List};
use chrono::{DateTime, Utc};

pub fn reduce(state: AppState, action: Action, now: DateTime<Utc>) -> (AppState, bool) {
    match action {
        Action::SetBoards(boards) => (AppState { boards, ..state }, true),
        Action::AddBoard(board) => {
            let mut state = state;
            state.boards.push(board);
            (state, true)
        }
        Action::UpdateBoard { id, title } => update_board(state, &id, now, |board| {
            board.title = title;
            true
        }),
        Action::DeleteBoard(id) => delete_board(state, &id),
        Action::SetCurrentBoard(id) => {
            let changed = state.current_board_id != id;
            (
                AppState {
                    current_board_id: id,
                    ..state
                },
                changed,
            )
        }
        Action::AddList { board_id, list } => update_board(state, &board_id, now, |board| {
            add_list(board, list);
            true
        }),
        Action::UpdateList {
            board_id,
            list_id,
            title,
        } => update_list(state, &board_id, &list_id, now, |list| {
            list.title = title;
            true
        }),
        Action::DeleteList { board_id, list_id } => {
            update_board(state, &board_id, now, |board| delete_list(board, &list_id))
        }
        Action::AddCard {
            board_id,
            list_id,
            card,
        } => update_list(state, &board_id, &list_id, now, |list| {
            add_card(list, card);
            true
        }),
        Action::UpdateCard {
            board_id,
            list_id,
            card_id,
            updates,
        } => update_card(state, &board_id, &list_id, &card_id, now, |card| {
            patch_card(card, updates)
        }),
        Action::DeleteCard {
            board_id,
            list_id,
            card_id,
        } => update_list(state, &board_id, &list_id, now, |list| {
            delete_card(list, &card_id)
        }),
        Action::MoveCard {
            board_id,
            card_id,
            source_list_id,
            target_list_id,
            new_position,
        } => update_board(state, &board_id, now, |board| {
            move_card(
                board,
                &card_id,
                &source_list_id,
                &target_list_id,
                new_position,
            )
        }),
        Action::AddComment {
            board_id,
            list_id,
            card_id,
            comment,
        } => update_card(state, &board_id, &list_id, &card_id, now, |card| {
            add_comment(card, comment);
            true
        }),
        Action::DeleteComment {
            board_id,
            list_id,
            card_id,
            comment_id,
        } => update_card(state, &board_id, &list_id, &card_id, now, |card| {
            delete_comment(card, &comment_id)
        }),
        Action::ToggleDarkMode => (
            AppState {
                is_dark_mode: !state.is_dark_mode,
                ..state
            },
            true,
        ),
    }
}

// Each `update_*` helper applies `f` to the addressed node and refreshes the
// board's `updated_at` when `f` reports a change. A missing node or a `false`
// from `f` leaves the state exactly as it came in.

fn update_board<F>(
    mut state: AppState,
    board_id: &str,
    now: DateTime<Utc>,
    f: F,
) -> (AppState, bool)
where
    F: FnOnce(&mut Board) -> bool,
{
    let mut changed = false;
    if let Some(board) = state.boards.iter_mut().find(|b| b.id == board_id) {
        if f(board) {
            board.updated_at = now;
            changed = true;
        }
    }
    (state, changed)
}

fn update_list<F>(
    state: AppState,
    board_id: &str,
    list_id: &str,
    now: DateTime<Utc>,
    f: F,
) -> (AppState, bool)
where
    F: FnOnce(&mut List) -> bool,
{
    update_board(state, board_id, now, |board| {
        match board.lists.iter_mut().find(|l| l.id == list_id) {
            Some(list) => f(list),
            None => false,
        }
    })
}

fn update_card<F>(
    state: AppState,
    board_id: &str,
    list_id: &str,
    card_id: &str,
    now: DateTime<Utc>,
    f: F,
) -> (AppState, bool)
where
    F: FnOnce(&mut Card) -> bool,
{
    update_list(state, board_id, list_id, now, |list| {
        let Some(card) = list.cards.iter_mut().find(|c| c.id == card_id) else {
            return false;
        };
        if !f(card) {
            return false;
        }
        card.updated_at = now;
        true
    })
}

fn delete_board(mut state: AppState, board_id: &str) -> (AppState, bool) {
    let before = state.boards.len();
    state.boards.retain(|b| b.id != board_id);
    let removed = state.boards.len() != before;
    if removed && state.current_board_id.as_deref() == Some(board_id) {
        state.current_board_id = None;
    }
    (state, removed)
}

fn add_list(board: &mut Board, mut list: List) {
    list.board_id = board.id.clone();
    list.position = board.lists.len();
    board.lists.push(list);
}

fn delete_list(board: &mut Board, list_id: &str) -> bool {
    let before = board.lists.len();
    board.lists.retain(|l| l.id != list_id);
    if board.lists.len() == before {
        return false;
    }
    for (idx, list) in board.lists.iter_mut().enumerate() {
        list.position = idx;
    }
    true
}

fn add_card(list: &mut List, mut card: Card) {
    card.list_id = list.id.clone();
    card.position = list.cards.len();
    list.cards.push(card);
}

fn patch_card(card: &mut Card, updates: CardPatch) -> bool {
    updates.apply(card);
    true
}

fn delete_card(list: &mut List, card_id: &str) -> bool {
    let before = list.cards.len();
    list.cards.retain(|c| c.id != card_id);
    if list.cards.len() == before {
        return false;
    }
    renumber(&mut list.cards);
    true
}

fn move_card(
    board: &mut Board,
    card_id: &str,
    source_list_id: &str,
    target_list_id: &str,
    new_position: usize,
) -> bool {
    let Some(source_idx) = board.lists.iter().position(|l| l.id == source_list_id) else {
        return false;
    };
    let Some(target_idx) = board.lists.iter().position(|l| l.id == target_list_id) else {
        return false;
    };
    let Some(card_idx) = board.lists[source_idx]
        .cards
        .iter()
        .position(|c| c.id == card_id)
    else {
        return false;
    };

    let mut card = board.lists[source_idx].cards.remove(card_idx);
    renumber(&mut board.lists[source_idx].cards);

    let target = &mut board.lists[target_idx];
    let index = new_position.min(target.cards.len());
    card.list_id = target.id.clone();
    target.cards.insert(index, card);
    renumber(&mut target.cards);
    true
}

fn add_comment(card: &mut Card, comment: Comment) {
    card.comments.push(comment);
}

fn delete_comment(card: &mut Card, comment_id: &str) -> bool {
    let before = card.comments.len();
    card.comments.retain(|c| c.id != comment_id);
    card.comments.len() != before
}

fn renumber(cards: &mut [Card]) {
    for (idx, card) in cards.iter_mut().enumerate() {
        card.position = idx;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use pretty_assertions::assert_eq;

    fn step(state: AppState, action: Action, now: DateTime<Utc>) -> AppState {
        reduce(state, action, now).0
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap()
    }

    fn later() -> DateTime<Utc> {
        t0() + Duration::hours(2)
    }

    struct Fixture {
        state: AppState,
        board: String,
        todo: String,
        doing: String,
        card_a: String,
        card_b: String,
        card_c: String,
        comment: String,
    }

    // board "Work": Todo = [A, B], Doing = [C]; A carries one comment.
    fn fixture() -> Fixture {
        let mut board = Board::new("Work", Some("#3b82f6".into()), t0());
        let mut todo = board.next_list("Todo", None, t0());
        let mut card_a = todo.next_card("A", t0());
        let comment = Comment::new("first!", t0());
        card_a.comments.push(comment.clone());
        todo.cards.push(card_a.clone());
        let card_b = todo.next_card("B", t0());
        todo.cards.push(card_b.clone());
        board.lists.push(todo.clone());
        let mut doing = board.next_list("Doing", None, t0());
        let card_c = doing.next_card("C", t0());
        doing.cards.push(card_c.clone());
        board.lists.push(doing.clone());

        let other = Board::new("Home", None, t0());
        Fixture {
            board: board.id.clone(),
            todo: todo.id,
            doing: doing.id,
            card_a: card_a.id,
            card_b: card_b.id,
            card_c: card_c.id,
            comment: comment.id,
            state: AppState {
                boards: vec![board, other],
                current_board_id: None,
                is_dark_mode: false,
            },
        }
    }

    fn titles(list: &List) -> Vec<&str> {
        list.cards.iter().map(|c| c.title.as_str()).collect()
    }

    #[test]
    fn add_board_appends_and_select_is_unvalidated() {
        let state = step(
            AppState::default(),
            Action::AddBoard(Board::new("First", None, t0())),
            t0(),
        );
        let state = step(state, Action::AddBoard(Board::new("Second", None, t0())), t0());
        assert_eq!(state.boards[1].title, "Second");

        let state = step(state, Action::SetCurrentBoard(Some("nope".into())), t0());
        assert_eq!(state.current_board_id.as_deref(), Some("nope"));
        assert!(state.current_board().is_none());
    }

    #[test]
    fn rename_board_refreshes_updated_at() {
        let f = fixture();
        let state = step(
            f.state,
            Action::UpdateBoard {
                id: f.board.clone(),
                title: "Office".into(),
            },
            later(),
        );
        let board = state.board(&f.board).unwrap();
        assert_eq!(board.title, "Office");
        assert_eq!(board.updated_at, later());
        assert_eq!(board.created_at, t0());
        assert_eq!(state.boards[1].updated_at, t0());
    }

    #[test]
    fn unknown_ids_leave_state_untouched() {
        let f = fixture();
        let actions = vec![
            Action::UpdateBoard {
                id: "missing".into(),
                title: "x".into(),
            },
            Action::DeleteBoard("missing".into()),
            Action::AddList {
                board_id: "missing".into(),
                list: List::new("x", 0, "x", None, t0()),
            },
            Action::UpdateList {
                board_id: f.board.clone(),
                list_id: "missing".into(),
                title: "x".into(),
            },
            Action::DeleteList {
                board_id: f.board.clone(),
                list_id: "missing".into(),
            },
            Action::UpdateCard {
                board_id: f.board.clone(),
                list_id: f.todo.clone(),
                card_id: "missing".into(),
                updates: CardPatch {
                    title: Some("x".into()),
                    description: None,
                },
            },
            Action::DeleteCard {
                board_id: f.board.clone(),
                list_id: f.doing.clone(),
                card_id: f.card_a.clone(),
            },
            Action::MoveCard {
                board_id: f.board.clone(),
                card_id: f.card_c.clone(),
                source_list_id: f.todo.clone(),
                target_list_id: f.doing.clone(),
                new_position: 0,
            },
            Action::MoveCard {
                board_id: f.board.clone(),
                card_id: f.card_a.clone(),
                source_list_id: f.todo.clone(),
                target_list_id: "missing".into(),
                new_position: 0,
            },
            Action::DeleteComment {
                board_id: f.board.clone(),
                list_id: f.todo.clone(),
                card_id: f.card_a.clone(),
                comment_id: "missing".into(),
            },
            Action::AddCard {
                board_id: f.board.clone(),
                list_id: "missing".into(),
                card: Card::new("missing", 0, "x", t0()),
            },
            Action::AddCard {
                board_id: "missing".into(),
                list_id: f.todo.clone(),
                card: Card::new(&f.todo, 0, "x", t0()),
            },
            Action::AddComment {
                board_id: f.board.clone(),
                list_id: f.todo.clone(),
                card_id: "missing".into(),
                comment: Comment::new("x", t0()),
            },
            Action::AddComment {
                board_id: f.board.clone(),
                list_id: f.doing.clone(),
                card_id: f.card_a.clone(),
                comment: Comment::new("x", t0()),
            },
            Action::UpdateCard {
                board_id: "missing".into(),
                list_id: f.todo.clone(),
                card_id: f.card_a.clone(),
                updates: CardPatch {
                    title: Some("x".into()),
                    description: None,
                },
            },
            Action::DeleteCard {
                board_id: "missing".into(),
                list_id: f.todo.clone(),
                card_id: f.card_a.clone(),
            },
            Action::MoveCard {
                board_id: "missing".into(),
                card_id: f.card_a.clone(),
                source_list_id: f.todo.clone(),
                target_list_id: f.doing.clone(),
                new_position: 0,
            },
            Action::SetCurrentBoard(None),
        ];
        for action in actions {
            let label = action.label();
            let (next, changed) = reduce(f.state.clone(), action, later());
            assert_eq!(next, f.state, "{label} should be a no-op");
            assert!(!changed, "{label} should report no change");
        }
    }

    #[test]
    fn delete_board_cascades() {
        let f = fixture();
        let state = step(f.state, Action::DeleteBoard(f.board.clone()), later());
        assert_eq!(state.boards.len(), 1);
        let json = serde_json::to_string(&state).unwrap();
        for id in [&f.board, &f.todo, &f.doing, &f.card_a, &f.comment] {
            assert!(!json.contains(id.as_str()), "{id} survived the delete");
        }
    }

    #[test]
    fn delete_board_clears_only_matching_selection() {
        let f = fixture();
        let other = f.state.boards[1].id.clone();

        let selected = step(
            f.state.clone(),
            Action::SetCurrentBoard(Some(f.board.clone())),
            t0(),
        );
        let cleared = step(selected.clone(), Action::DeleteBoard(f.board.clone()), t0());
        assert_eq!(cleared.current_board_id, None);

        let kept = step(selected, Action::DeleteBoard(other), t0());
        assert_eq!(kept.current_board_id.as_deref(), Some(f.board.as_str()));
    }

    #[test]
    fn add_list_forces_owner_and_position() {
        let f = fixture();
        let mut list = List::new("elsewhere", 0, "Done", None, t0());
        list.position = 42;
        let state = step(
            f.state,
            Action::AddList {
                board_id: f.board.clone(),
                list,
            },
            later(),
        );
        let board = state.board(&f.board).unwrap();
        let done = &board.lists[2];
        assert_eq!(done.title, "Done");
        assert_eq!(done.board_id, f.board);
        assert_eq!(done.position, 2);
        assert_eq!(board.updated_at, later());
    }

    #[test]
    fn rename_and_delete_list() {
        let f = fixture();
        let state = step(
            f.state,
            Action::UpdateList {
                board_id: f.board.clone(),
                list_id: f.doing.clone(),
                title: "In progress".into(),
            },
            later(),
        );
        let board = state.board(&f.board).unwrap();
        assert_eq!(board.lists[1].title, "In progress");
        assert_eq!(board.updated_at, later());

        let state = step(
            state,
            Action::DeleteList {
                board_id: f.board.clone(),
                list_id: f.todo.clone(),
            },
            later(),
        );
        let board = state.board(&f.board).unwrap();
        assert_eq!(board.lists.len(), 1);
        assert_eq!(board.lists[0].id, f.doing);
        assert_eq!(board.lists[0].position, 0);
        assert!(board.lists.iter().all(|l| l.card(&f.card_a).is_none()));
    }

    #[test]
    fn add_card_appends_with_position() {
        let f = fixture();
        let mut card = Card::new("elsewhere", 0, "D", later());
        card.position = 9;
        let state = step(
            f.state,
            Action::AddCard {
                board_id: f.board.clone(),
                list_id: f.doing.clone(),
                card,
            },
            later(),
        );
        let board = state.board(&f.board).unwrap();
        let doing = board.list(&f.doing).unwrap();
        assert_eq!(titles(doing), vec!["C", "D"]);
        assert_eq!(doing.cards[1].position, 1);
        assert_eq!(doing.cards[1].list_id, f.doing);
        assert_eq!(board.updated_at, later());
    }

    #[test]
    fn update_card_merges_and_refreshes() {
        let f = fixture();
        let state = step(
            f.state,
            Action::UpdateCard {
                board_id: f.board.clone(),
                list_id: f.todo.clone(),
                card_id: f.card_b.clone(),
                updates: CardPatch {
                    title: None,
                    description: Some("details".into()),
                },
            },
            later(),
        );
        let board = state.board(&f.board).unwrap();
        let card = board.list(&f.todo).unwrap().card(&f.card_b).unwrap();
        assert_eq!(card.title, "B");
        assert_eq!(card.description, "details");
        assert_eq!(card.updated_at, later());
        assert_eq!(board.updated_at, later());
        let untouched = board.list(&f.todo).unwrap().card(&f.card_a).unwrap();
        assert_eq!(untouched.updated_at, t0());
    }

    #[test]
    fn delete_card_renumbers_siblings() {
        let f = fixture();
        let state = step(
            f.state,
            Action::DeleteCard {
                board_id: f.board.clone(),
                list_id: f.todo.clone(),
                card_id: f.card_a.clone(),
            },
            later(),
        );
        let todo = state.board(&f.board).unwrap().list(&f.todo).unwrap().clone();
        assert_eq!(titles(&todo), vec!["B"]);
        assert_eq!(todo.cards[0].position, 0);
    }

    #[test]
    fn move_card_across_lists() {
        let f = fixture();
        let state = step(
            f.state,
            Action::MoveCard {
                board_id: f.board.clone(),
                card_id: f.card_a.clone(),
                source_list_id: f.todo.clone(),
                target_list_id: f.doing.clone(),
                new_position: 0,
            },
            later(),
        );
        let board = state.board(&f.board).unwrap();
        let todo = board.list(&f.todo).unwrap();
        let doing = board.list(&f.doing).unwrap();
        assert_eq!(titles(todo), vec!["B"]);
        assert_eq!(titles(doing), vec!["A", "C"]);
        assert_eq!(doing.cards[0].list_id, f.doing);
        assert_eq!(doing.cards[0].position, 0);
        assert_eq!(doing.cards[1].position, 1);
        assert_eq!(todo.cards[0].position, 0);
        assert_eq!(doing.cards[0].comments.len(), 1);
        assert_eq!(board.updated_at, later());
    }

    #[test]
    fn move_card_clamps_out_of_range_index() {
        let f = fixture();
        let state = step(
            f.state,
            Action::MoveCard {
                board_id: f.board.clone(),
                card_id: f.card_b.clone(),
                source_list_id: f.todo.clone(),
                target_list_id: f.doing.clone(),
                new_position: 99,
            },
            later(),
        );
        let doing = state.board(&f.board).unwrap().list(&f.doing).unwrap().clone();
        assert_eq!(titles(&doing), vec!["C", "B"]);
        assert_eq!(doing.cards[1].position, 1);
    }

    #[test]
    fn move_card_within_same_list_reorders() {
        let f = fixture();
        let state = step(
            f.state,
            Action::MoveCard {
                board_id: f.board.clone(),
                card_id: f.card_a.clone(),
                source_list_id: f.todo.clone(),
                target_list_id: f.todo.clone(),
                new_position: 1,
            },
            later(),
        );
        let todo = state.board(&f.board).unwrap().list(&f.todo).unwrap().clone();
        assert_eq!(titles(&todo), vec!["B", "A"]);
        assert_eq!(todo.cards[1].position, 1);
        assert_eq!(todo.cards[1].list_id, f.todo);
    }

    #[test]
    fn comments_refresh_card_and_board() {
        let f = fixture();
        let state = step(
            f.state,
            Action::AddComment {
                board_id: f.board.clone(),
                list_id: f.doing.clone(),
                card_id: f.card_c.clone(),
                comment: Comment::new("looks good", later()),
            },
            later(),
        );
        let board = state.board(&f.board).unwrap();
        let card = board.list(&f.doing).unwrap().card(&f.card_c).unwrap();
        assert_eq!(card.comments[0].text, "looks good");
        assert_eq!(card.updated_at, later());
        assert_eq!(board.updated_at, later());

        let removed_at = later() + Duration::minutes(5);
        let state = step(
            state,
            Action::DeleteComment {
                board_id: f.board.clone(),
                list_id: f.todo.clone(),
                card_id: f.card_a.clone(),
                comment_id: f.comment.clone(),
            },
            removed_at,
        );
        let card = state
            .board(&f.board)
            .unwrap()
            .list(&f.todo)
            .unwrap()
            .card(&f.card_a)
            .unwrap();
        assert!(card.comments.is_empty());
        assert_eq!(card.updated_at, removed_at);
    }

    #[test]
    fn toggle_dark_mode_is_a_pure_flip() {
        let f = fixture();
        let once = step(f.state.clone(), Action::ToggleDarkMode, later());
        assert!(once.is_dark_mode);
        assert_eq!(once.boards, f.state.boards);
        let twice = step(once, Action::ToggleDarkMode, later());
        assert_eq!(twice, f.state);
    }

    #[test]
    fn applied_actions_report_a_change() {
        let f = fixture();
        let (state, changed) = reduce(
            f.state,
            Action::SetCurrentBoard(Some(f.board.clone())),
            t0(),
        );
        assert!(changed);
        let (state, changed) = reduce(
            state,
            Action::DeleteComment {
                board_id: f.board.clone(),
                list_id: f.todo.clone(),
                card_id: f.card_a.clone(),
                comment_id: f.comment.clone(),
            },
            later(),
        );
        assert!(changed);
        let (_, changed) = reduce(state, Action::DeleteBoard(f.board.clone()), later());
        assert!(changed);
    }

    #[test]
    fn set_boards_replaces_sequence_only() {
        let f = fixture();
        let selected = step(
            f.state,
            Action::SetCurrentBoard(Some(f.board.clone())),
            t0(),
        );
        let state = step(selected, Action::SetBoards(Vec::new()), t0());
        assert!(state.boards.is_empty());
        assert_eq!(state.current_board_id.as_deref(), Some(f.board.as_str()));
    }
}
