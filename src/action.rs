use crate::model::{Board, BoardId, Card, CardId, CardPatch, Comment, CommentId, List, ListId};
use serde::{Deserialize, Serialize};

/// Every state change a view can request. The payload shapes mirror the
/// durable record, so a script can hand one over as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    content = "payload",
    rename_all = "SCREAMING_SNAKE_CASE"
)]
pub enum Action {
    SetBoards(Vec<Board>),
    AddBoard(Board),
    #[serde(rename_all = "camelCase")]
    UpdateBoard {
        id: BoardId,
        title: String,
    },
    DeleteBoard(BoardId),
    SetCurrentBoard(Option<BoardId>),
    #[serde(rename_all = "camelCase")]
    AddList {
        board_id: BoardId,
        list: List,
    },
    #[serde(rename_all = "camelCase")]
    UpdateList {
        board_id: BoardId,
        list_id: ListId,
        title: String,
    },
    #[serde(rename_all = "camelCase")]
    DeleteList {
        board_id: BoardId,
        list_id: ListId,
    },
    #[serde(rename_all = "camelCase")]
    AddCard {
        board_id: BoardId,
        list_id: ListId,
        card: Card,
    },
    #[serde(rename_all = "camelCase")]
    UpdateCard {
        board_id: BoardId,
        list_id: ListId,
        card_id: CardId,
        updates: CardPatch,
    },
    #[serde(rename_all = "camelCase")]
    DeleteCard {
        board_id: BoardId,
        list_id: ListId,
        card_id: CardId,
    },
    #[serde(rename_all = "camelCase")]
    MoveCard {
        board_id: BoardId,
        card_id: CardId,
        source_list_id: ListId,
        target_list_id: ListId,
        new_position: usize,
    },
    #[serde(rename_all = "camelCase")]
    AddComment {
        board_id: BoardId,
        list_id: ListId,
        card_id: CardId,
        comment: Comment,
    },
    #[serde(rename_all = "camelCase")]
    DeleteComment {
        board_id: BoardId,
        list_id: ListId,
        card_id: CardId,
        comment_id: CommentId,
    },
    ToggleDarkMode,
}

impl Action {
    pub fn label(&self) -> &'static str {
        match self {
            Action::SetBoards(_) => "SET_BOARDS",
            Action::AddBoard(_) => "ADD_BOARD",
            Action::UpdateBoard { .. } => "UPDATE_BOARD",
            Action::DeleteBoard(_) => "DELETE_BOARD",
            Action::SetCurrentBoard(_) => "SET_CURRENT_BOARD",
            Action::AddList { .. } => "ADD_LIST",
            Action::UpdateList { .. } => "UPDATE_LIST",
            Action::DeleteList { .. } => "DELETE_LIST",
            Action::AddCard { .. } => "ADD_CARD",
            Action::UpdateCard { .. } => "UPDATE_CARD",
            Action::DeleteCard { .. } => "DELETE_CARD",
            Action::MoveCard { .. } => "MOVE_CARD",
            Action::AddComment { .. } => "ADD_COMMENT",
            Action::DeleteComment { .. } => "DELETE_COMMENT",
            Action::ToggleDarkMode => "TOGGLE_DARK_MODE",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_tagged_json() {
        let action: Action = serde_json::from_str(
            r#"{"type":"MOVE_CARD","payload":{"boardId":"b","cardId":"c","sourceListId":"l1","targetListId":"l2","newPosition":3}}"#,
        )
        .unwrap();
        assert_eq!(
            action,
            Action::MoveCard {
                board_id: "b".into(),
                card_id: "c".into(),
                source_list_id: "l1".into(),
                target_list_id: "l2".into(),
                new_position: 3,
            }
        );
        assert_eq!(action.label(), "MOVE_CARD");
    }

    #[test]
    fn unit_and_newtype_variants() {
        let toggle: Action = serde_json::from_str(r#"{"type":"TOGGLE_DARK_MODE"}"#).unwrap();
        assert_eq!(toggle, Action::ToggleDarkMode);

        let clear: Action =
            serde_json::from_str(r#"{"type":"SET_CURRENT_BOARD","payload":null}"#).unwrap();
        assert_eq!(clear, Action::SetCurrentBoard(None));

        let patch: Action = serde_json::from_str(
            r#"{"type":"UPDATE_CARD","payload":{"boardId":"b","listId":"l","cardId":"c","updates":{"description":"x"}}}"#,
        )
        .unwrap();
        assert_eq!(
            patch,
            Action::UpdateCard {
                board_id: "b".into(),
                list_id: "l".into(),
                card_id: "c".into(),
                updates: CardPatch {
                    title: None,
                    description: Some("x".into()),
                },
            }
        );
    }
}
