use crate::error::GameResult;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const DATA_DIR_ENV: &str = "FLAG_GAMES_DATA_DIR";
const DEFAULT_DIR_NAME: &str = ".flag-games";
const RECORDS_FILE: &str = "records.json";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BestRecords
{
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best_time: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best_moves: Option<u32>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordUpdate
{
    pub time_improved: bool,
    pub moves_improved: bool,
}

impl RecordUpdate
{
    pub fn any(&self) -> bool
    {
        self.time_improved || self.moves_improved
    }
}

impl BestRecords
{
    /// Each record only moves on a strict improvement.
    pub fn submit(&mut self, seconds: u32, moves: u32) -> RecordUpdate
    {
        let time_improved = self.best_time.is_none_or(|best| seconds < best);
        if time_improved {
            self.best_time = Some(seconds);
        }
        let moves_improved = self.best_moves.is_none_or(|best| moves < best);
        if moves_improved {
            self.best_moves = Some(moves);
        }
        RecordUpdate {
            time_improved,
            moves_improved,
        }
    }
}

pub struct RecordStore
{
    path: PathBuf,
}

impl RecordStore
{
    pub fn in_dir(dir: &Path) -> Self
    {
        Self {
            path: dir.join(RECORDS_FILE),
        }
    }

    pub fn path(&self) -> &Path
    {
        &self.path
    }

    pub fn load(&self) -> GameResult<BestRecords>
    {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(BestRecords::default()),
            Err(err) => Err(err.into()),
        }
    }

    pub fn save(&self, records: &BestRecords) -> GameResult<()>
    {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_vec_pretty(records)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

pub fn data_dir() -> PathBuf
{
    if let Ok(dir) = env::var(DATA_DIR_ENV) {
        if !dir.trim().is_empty() {
            return PathBuf::from(dir);
        }
    }
    match env::var("HOME") {
        Ok(home) => PathBuf::from(home).join(DEFAULT_DIR_NAME),
        Err(_) => PathBuf::from(DEFAULT_DIR_NAME),
    }
}

#[cfg(test)]
mod tests
{
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn scratch_dir(tag: &str) -> PathBuf
    {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_nanos())
            .unwrap_or(0);
        env::temp_dir().join(format!("flag-games-{tag}-{}-{nanos}", std::process::id()))
    }

    #[test]
    fn first_win_sets_both_records()
    {
        let mut records = BestRecords::default();
        let update = records.submit(42, 30);
        assert!(update.time_improved && update.moves_improved);
        assert_eq!(records.best_time, Some(42));
        assert_eq!(records.best_moves, Some(30));
    }

    #[test]
    fn records_only_move_on_strict_improvement()
    {
        let mut records = BestRecords {
            best_time: Some(40),
            best_moves: Some(20),
        };

        let update = records.submit(35, 20);
        assert!(update.time_improved);
        assert!(!update.moves_improved);
        assert_eq!(records.best_time, Some(35));
        assert_eq!(records.best_moves, Some(20));

        let update = records.submit(50, 18);
        assert!(!update.time_improved);
        assert!(update.moves_improved);
        assert_eq!(records.best_time, Some(35));
        assert_eq!(records.best_moves, Some(18));
    }

    #[test]
    fn missing_file_loads_empty_records()
    {
        let store = RecordStore::in_dir(&scratch_dir("missing"));
        assert_eq!(store.load().unwrap(), BestRecords::default());
    }

    #[test]
    fn saved_records_load_back_under_fixed_keys()
    {
        let dir = scratch_dir("save");
        let store = RecordStore::in_dir(&dir);
        let records = BestRecords {
            best_time: Some(35),
            best_moves: Some(18),
        };
        store.save(&records).unwrap();

        let text = fs::read_to_string(store.path()).unwrap();
        assert!(text.contains("\"bestTime\": 35"));
        assert!(text.contains("\"bestMoves\": 18"));
        assert_eq!(store.load().unwrap(), records);

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn malformed_file_is_an_error()
    {
        let dir = scratch_dir("bad");
        fs::create_dir_all(&dir).unwrap();
        let store = RecordStore::in_dir(&dir);
        fs::write(store.path(), b"not json").unwrap();
        assert!(store.load().is_err());
        let _ = fs::remove_dir_all(dir);
    }
}
