use crate::model::AppState;
use anyhow::{Context, Result};
use log::{debug, error, warn};
#[cfg(test)]
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub trait RecordStore {
    fn read(&self, key: &str) -> Result<Option<String>>;
    fn write(&mut self, key: &str, value: &str) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileStore { dir: dir.into() }
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl RecordStore for FileStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        let data = fs::read_to_string(&path).with_context(|| format!("reading {:?}", path))?;
        Ok(Some(data))
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir).with_context(|| format!("creating {:?}", self.dir))?;
        let path = self.path_for(key);
        let mut tmp = NamedTempFile::new_in(&self.dir)
            .with_context(|| format!("creating temp file in {:?}", self.dir))?;
        tmp.write_all(value.as_bytes())
            .with_context(|| format!("writing {:?}", tmp.path()))?;
        tmp.as_file()
            .sync_all()
            .with_context(|| format!("syncing {:?}", tmp.path()))?;
        tmp.persist(&path)
            .with_context(|| format!("replacing {:?}", path))?;
        Ok(())
    }
}

#[cfg(test)]
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    records: HashMap<String, String>,
}

#[cfg(test)]
impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }
}

#[cfg(test)]
impl RecordStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.records.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        self.records.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    #[error("reading stored record: {0:#}")]
    Read(anyhow::Error),
    #[error("parsing stored record: {0}")]
    Parse(#[from] serde_json::Error),
}

pub fn encode_state(state: &AppState) -> Result<String> {
    serde_json::to_string(state).context("serializing app state")
}

pub fn decode_state(data: &str) -> Result<AppState, LoadError> {
    Ok(serde_json::from_str(data)?)
}

pub fn try_load_state(store: &dyn RecordStore, key: &str) -> Result<Option<AppState>, LoadError> {
    match store.read(key).map_err(LoadError::Read)? {
        Some(data) => decode_state(&data).map(Some),
        None => Ok(None),
    }
}

/// Reads the durable record under `key`. Anything short of a well-formed
/// record yields the empty default.
pub fn load_state(store: &dyn RecordStore, key: &str) -> AppState {
    match try_load_state(store, key) {
        Ok(Some(state)) => {
            debug!("loaded {} boards from record {:?}", state.boards.len(), key);
            state
        }
        Ok(None) => {
            debug!("no stored record {:?}, starting empty", key);
            AppState::default()
        }
        Err(err @ LoadError::Read(_)) => {
            warn!("could not read record {:?}, starting empty: {}", key, err);
            AppState::default()
        }
        Err(err @ LoadError::Parse(_)) => {
            error!("discarding corrupt record {:?}: {}", key, err);
            AppState::default()
        }
    }
}

pub fn save_state(store: &mut dyn RecordStore, key: &str, state: &AppState) -> Result<()> {
    let serialized = encode_state(state)?;
    store
        .write(key, &serialized)
        .with_context(|| format!("saving record {:?}", key))
}

pub fn default_data_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "tackboard").map(|dirs| dirs.data_dir().to_path_buf())
}

pub fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("creating {:?}", dir))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Board, Comment};
    use chrono::{DateTime, TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    const KEY: &str = "tackboard-data";

    fn stamp(min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 2, 29, 23, min, 7).unwrap() + chrono::Duration::milliseconds(321)
    }

    fn sample_state() -> AppState {
        let mut board = Board::new("Launch", Some("#ef4444".into()), stamp(1));
        board.updated_at = stamp(9);
        let mut list = board.next_list("Backlog", Some("#14b8a6".into()), stamp(2));
        let mut card = list.next_card("Write copy", stamp(3));
        card.description = "headline + body\nsecond line".into();
        card.updated_at = stamp(8);
        card.comments.push(Comment::new("draft is in the doc", stamp(4)));
        card.comments.push(Comment::new("ünïcödé ✓", stamp(5)));
        list.cards.push(card);
        board.lists.push(list);
        let bare = Board::new("Empty", None, stamp(6));
        AppState {
            current_board_id: Some(board.id.clone()),
            boards: vec![board, bare],
            is_dark_mode: true,
        }
    }

    #[test]
    fn file_store_round_trip() {
        let dir = TempDir::new().unwrap();
        let mut store = FileStore::new(dir.path().join("nested"));
        let state = sample_state();
        save_state(&mut store, KEY, &state).unwrap();
        assert!(store.path_for(KEY).exists());

        let loaded = load_state(&store, KEY);
        assert_eq!(loaded, state);
        assert_eq!(loaded.boards[0].lists[0].cards[0].comments[1].created_at, stamp(5));
    }

    #[test]
    fn record_uses_camel_case_and_text_timestamps() {
        let state = sample_state();
        let value: serde_json::Value = serde_json::from_str(&encode_state(&state).unwrap()).unwrap();
        assert_eq!(value["isDarkMode"], true);
        assert_eq!(value["currentBoardId"], state.boards[0].id.as_str());
        let list = &value["boards"][0]["lists"][0];
        assert_eq!(list["boardId"], state.boards[0].id.as_str());
        assert!(list["createdAt"].is_string());
        assert!(list["cards"][0]["listId"].is_string());
        assert!(value["boards"][1].get("color").is_none());
    }

    #[test]
    fn loads_record_written_by_a_browser() {
        let raw = r##"{"boards":[{"id":"b1","title":"Old","lists":[{"id":"l1","title":"Todo","boardId":"b1","position":0,"color":"#3b82f6","cards":[{"id":"c1","title":"Card","description":"","listId":"l1","position":0,"comments":[{"id":"m1","text":"hi","createdAt":"2024-01-02T03:04:05.678Z"}],"createdAt":"2024-01-02T03:04:05.678Z","updatedAt":"2024-01-02T03:04:05.678Z"}],"createdAt":"2024-01-02T03:04:05.678Z"}],"createdAt":"2024-01-02T03:04:05.678Z","updatedAt":"2024-01-02T03:04:05.678Z"}],"currentBoardId":null,"isDarkMode":false}"##;
        let state = decode_state(raw).unwrap();
        let expected = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap()
            + chrono::Duration::milliseconds(678);
        let comment = &state.boards[0].lists[0].cards[0].comments[0];
        assert_eq!(comment.created_at, expected);
        assert_eq!(state.boards[0].color, None);
        assert_eq!(state.current_board_id, None);
    }

    #[test]
    fn missing_flags_default() {
        let state = decode_state(r#"{"boards":[]}"#).unwrap();
        assert_eq!(state, AppState::default());
    }

    #[test]
    fn corrupt_record_falls_back_to_default() {
        let mut store = MemoryStore::new();
        store.write(KEY, "{\"boards\": [ not json").unwrap();
        let corrupt = load_state(&store, KEY);
        let missing = load_state(&MemoryStore::new(), KEY);
        assert_eq!(corrupt, missing);
        assert_eq!(corrupt, AppState::default());
        assert!(matches!(
            try_load_state(&store, KEY),
            Err(LoadError::Parse(_))
        ));
    }

    #[test]
    fn wrong_shape_is_treated_as_corrupt() {
        let mut store = MemoryStore::new();
        store
            .write(KEY, r#"{"boards":[{"id":"b","title":"x","lists":[],"createdAt":"yesterday","updatedAt":"today"}]}"#)
            .unwrap();
        assert_eq!(load_state(&store, KEY), AppState::default());
    }

    #[test]
    fn overwrite_keeps_latest_snapshot() {
        let dir = TempDir::new().unwrap();
        let mut store = FileStore::new(dir.path());
        let mut state = sample_state();
        save_state(&mut store, KEY, &state).unwrap();
        state.boards.pop();
        state.is_dark_mode = false;
        save_state(&mut store, KEY, &state).unwrap();
        assert_eq!(load_state(&store, KEY), state);
        let leftovers = fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(leftovers, 1);
    }
}
