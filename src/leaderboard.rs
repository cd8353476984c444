//! High score leaderboard
//!
//! Persisted as a text file, one `name~score~level~date` row per line,
//! optionally under a `Name~Score~Level~Date` header. Tracks the top 10.

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Maximum number of rows to keep
pub const MAX_ENTRIES: usize = 10;
/// Longest accepted player name
pub const MAX_NAME_LEN: usize = 20;

const HEADER: &str = "Name~Score~Level~Date";
const SEPARATOR: char = '~';

#[derive(Debug, thiserror::Error)]
pub enum LeaderboardError {
    #[error("leaderboard file: {0}")]
    Io(#[from] io::Error),
    #[error("malformed leaderboard row {line}: {reason}")]
    MalformedRow { line: usize, reason: String },
    #[error("invalid name {0:?}: use 1-20 letters, digits or underscores")]
    InvalidName(String),
}

/// A single leaderboard row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    pub score: u64,
    /// Level reached
    pub level: u32,
    /// Display date, e.g. `Jan 01 2020`
    pub date: String,
}

impl LeaderboardEntry {
    fn parse(line_no: usize, line: &str) -> Result<Self, LeaderboardError> {
        let malformed = |reason: &str| LeaderboardError::MalformedRow {
            line: line_no,
            reason: reason.to_string(),
        };

        let fields: Vec<&str> = line.split(SEPARATOR).collect();
        let [name, score, level, date] = fields[..] else {
            return Err(malformed(&format!("expected 4 fields, found {}", fields.len())));
        };
        Ok(Self {
            name: name.to_string(),
            score: score.trim().parse().map_err(|_| malformed("score is not a number"))?,
            level: level.trim().parse().map_err(|_| malformed("level is not a number"))?,
            date: date.to_string(),
        })
    }

    fn to_line(&self) -> String {
        format!("{}~{}~{}~{}", self.name, self.score, self.level, self.date)
    }
}

/// Top scores, sorted descending
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leaderboard {
    pub entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_ENTRIES {
            return true;
        }
        // Must strictly beat the lowest row
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Get the rank a score would achieve (1-indexed, None if doesn't qualify)
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Add a score if it qualifies. Returns the rank achieved (1-indexed).
    pub fn add_score(
        &mut self,
        name: &str,
        score: u64,
        level: u32,
        date: &str,
    ) -> Result<Option<usize>, LeaderboardError> {
        // Only a qualifying score needs a name
        if !self.qualifies(score) {
            return Ok(None);
        }
        validate_name(name)?;

        let entry = LeaderboardEntry {
            name: name.to_string(),
            score,
            level,
            date: date.to_string(),
        };

        // Insert ahead of the first strictly lower score
        let pos = self
            .entries
            .iter()
            .position(|e| score > e.score)
            .unwrap_or(self.entries.len());
        self.entries.insert(pos, entry);

        // Trim to max size
        self.entries.truncate(MAX_ENTRIES);

        Ok(Some(pos + 1))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Parse the file format. Blank lines and a leading header are skipped.
    pub fn parse(text: &str) -> Result<Self, LeaderboardError> {
        let mut entries = Vec::new();
        for (i, line) in text.lines().enumerate() {
            let line = line.trim_end_matches('\r');
            if line.trim().is_empty() || (i == 0 && line.eq_ignore_ascii_case(HEADER)) {
                continue;
            }
            entries.push(LeaderboardEntry::parse(i + 1, line)?);
        }
        // Hand-edited files may be out of order; the sort is stable
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        entries.truncate(MAX_ENTRIES);
        Ok(Self { entries })
    }

    /// Serialize to the file format, header first
    pub fn render(&self) -> String {
        std::iter::once(HEADER.to_string())
            .chain(self.entries.iter().map(LeaderboardEntry::to_line))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Load from disk. A missing file is an empty board.
    pub fn load(path: &Path) -> Result<Self, LeaderboardError> {
        match fs::read_to_string(path) {
            Ok(text) => {
                let board = Self::parse(&text)?;
                log::info!("Loaded {} leaderboard rows from {}", board.entries.len(), path.display());
                Ok(board)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::info!("No leaderboard at {}, starting fresh", path.display());
                Ok(Self::new())
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), LeaderboardError> {
        fs::write(path, self.render())?;
        log::info!("Leaderboard saved ({} entries)", self.entries.len());
        Ok(())
    }
}

/// Names are 1-20 word characters (letters, digits, underscore)
pub fn validate_name(name: &str) -> Result<(), LeaderboardError> {
    let valid = !name.is_empty()
        && name.chars().count() <= MAX_NAME_LEN
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(())
    } else {
        Err(LeaderboardError::InvalidName(name.to_string()))
    }
}

/// Today's date as shown on the board, e.g. `Jan 01 2020`
pub fn today() -> String {
    chrono::Local::now().format("%b %d %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_board() -> Leaderboard {
        let mut board = Leaderboard::new();
        for i in 0..MAX_ENTRIES as u64 {
            board.add_score("Bot", 100 - i * 10, 1, "Jan 01 2020").unwrap();
        }
        board
    }

    #[test]
    fn test_qualifies() {
        let board = Leaderboard::new();
        assert!(!board.qualifies(0));
        assert!(board.qualifies(1));

        let board = full_board();
        // Lowest row is 10: ties don't qualify
        assert!(!board.qualifies(10));
        assert!(board.qualifies(11));
    }

    #[test]
    fn test_insert_sorted_and_drop_last() {
        let mut board = full_board();
        assert_eq!(board.potential_rank(55), Some(6));
        let rank = board.add_score("Ada", 55, 3, "Feb 02 2021").unwrap();
        assert_eq!(rank, Some(6));
        assert_eq!(board.entries.len(), MAX_ENTRIES);
        assert_eq!(board.entries[5].name, "Ada");
        assert_eq!(board.entries.last().map(|e| e.score), Some(20));
        assert_eq!(board.top_score(), Some(100));
    }

    #[test]
    fn test_equal_score_ranks_below_existing() {
        let mut board = Leaderboard::new();
        board.add_score("First", 50, 1, "d").unwrap();
        assert_eq!(board.add_score("Second", 50, 1, "d").unwrap(), Some(2));
        assert_eq!(board.entries[0].name, "First");
    }

    #[test]
    fn test_non_qualifying_score_is_ignored() {
        let mut board = full_board();
        let before = board.clone();
        assert_eq!(board.add_score("Late", 5, 1, "d").unwrap(), None);
        assert_eq!(board, before);
    }

    #[test]
    fn test_name_validation() {
        assert!(validate_name("Player_1").is_ok());
        assert!(validate_name("abcdefghijklmnopqrst").is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_name("   ").is_err());
        assert!(validate_name("two words").is_err());
        assert!(validate_name("tilde~name").is_err());
        assert!(validate_name("abcdefghijklmnopqrstu").is_err());

        let mut board = Leaderboard::new();
        assert!(matches!(
            board.add_score("bad name", 10, 1, "d"),
            Err(LeaderboardError::InvalidName(_))
        ));
        assert!(board.is_empty());
    }

    #[test]
    fn test_non_qualifying_score_skips_name_check() {
        let mut board = full_board();
        assert_eq!(board.add_score("not a name", 3, 1, "d").unwrap(), None);
        assert_eq!(Leaderboard::new().add_score("", 0, 1, "d").unwrap(), None);
    }

    #[test]
    fn test_parse_with_header() {
        let text = "Name~Score~Level~Date\nAda~40~2~Jan 01 2020\nBob~90~3~Feb 02 2020\n";
        let board = Leaderboard::parse(text).unwrap();
        assert_eq!(board.entries.len(), 2);
        assert_eq!(board.entries[0].name, "Bob");
        assert_eq!(board.entries[1].level, 2);
        assert_eq!(board.entries[1].date, "Jan 01 2020");
    }

    #[test]
    fn test_parse_rejects_malformed_rows() {
        let err = Leaderboard::parse("Ada~40~2\n").unwrap_err();
        assert!(matches!(err, LeaderboardError::MalformedRow { line: 1, .. }));

        let err = Leaderboard::parse("Name~Score~Level~Date\nAda~forty~2~Jan 01 2020").unwrap_err();
        assert!(matches!(err, LeaderboardError::MalformedRow { line: 2, .. }));
    }

    #[test]
    fn test_render_then_parse() {
        let board = full_board();
        let text = board.render();
        assert!(text.starts_with(HEADER));
        assert_eq!(text.lines().count(), MAX_ENTRIES + 1);
        assert_eq!(Leaderboard::parse(&text).unwrap(), board);
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let path = std::env::temp_dir().join(format!("square-siege-{}-no-board.txt", std::process::id()));
        assert!(Leaderboard::load(&path).unwrap().is_empty());
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("square-siege-{}-board.txt", std::process::id()));
        let mut board = Leaderboard::new();
        board.add_score("Ada", 12, 2, &today()).unwrap();
        board.save(&path).unwrap();
        assert_eq!(Leaderboard::load(&path).unwrap(), board);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_today_format() {
        let date = today();
        let parts: Vec<&str> = date.split(' ').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0].len(), 3);
        assert_eq!(parts[1].len(), 2);
        assert_eq!(parts[2].len(), 4);
    }
}
