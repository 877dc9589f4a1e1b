//! Journal storage and export.

use serde::{Deserialize, Serialize};

use super::entry::JournalEntry;

/// A chronological log of play events.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Journal {
    entries: Vec<JournalEntry>,
}

impl Journal {
    /// Create an empty journal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry to the journal.
    pub fn append(&mut self, entry: JournalEntry) {
        self.entries.push(entry);
    }

    /// Get all entries.
    pub fn entries(&self) -> &[JournalEntry] {
        &self.entries
    }

    /// The most recent `n` entries.
    pub fn recent(&self, n: usize) -> &[JournalEntry] {
        let start = self.entries.len().saturating_sub(n);
        &self.entries[start..]
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the journal is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Export the journal as markdown, one section per level.
    pub fn export_markdown(&self) -> String {
        let mut out = String::from("# Tile Master Journal\n\n");
        for entry in &self.entries {
            match entry {
                JournalEntry::LevelStarted { level, .. } => {
                    out.push_str(&format!("## Level {level}\n\n"));
                    out.push_str(&format!("{}\n\n", entry.describe()));
                }
                JournalEntry::SpecialMoment { .. } | JournalEntry::Achievement { .. } => {
                    out.push_str(&format!("**{}**\n\n", entry.describe()));
                }
                JournalEntry::LevelCompleted { .. }
                | JournalEntry::LevelFailed { .. }
                | JournalEntry::CampaignCompleted { .. } => {
                    out.push_str(&format!("*{}*\n\n", entry.describe()));
                }
                _ => {
                    out.push_str(&format!("- {}\n", entry.describe()));
                }
            }
        }
        out
    }

    /// Export the journal as plain text with times.
    pub fn export_text(&self) -> String {
        let mut out = String::from("Tile Master Journal\n===================\n\n");
        for entry in &self.entries {
            out.push_str(&format!(
                "[{}] {}\n",
                entry.timestamp().format("%H:%M:%S"),
                entry.describe()
            ));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn started(level: u32) -> JournalEntry {
        JournalEntry::LevelStarted {
            level,
            tier: 1,
            dice: 12,
            targets: vec!["Birds x4".to_string()],
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn empty_journal() {
        let j = Journal::new();
        assert!(j.is_empty());
        assert_eq!(j.len(), 0);
        assert!(j.recent(5).is_empty());
    }

    #[test]
    fn recent_returns_tail() {
        let mut j = Journal::new();
        for level in 1..=4 {
            j.append(started(level));
        }
        let tail = j.recent(2);
        assert_eq!(tail.len(), 2);
        assert!(matches!(tail[0], JournalEntry::LevelStarted { level: 3, .. }));
    }

    #[test]
    fn export_markdown_sections() {
        let mut j = Journal::new();
        j.append(started(2));
        j.append(JournalEntry::SpecialMoment {
            rule: "pacing boost".to_string(),
            timestamp: Utc::now(),
        });
        j.append(JournalEntry::DiceAdded {
            amount: 5,
            timestamp: Utc::now(),
        });
        let md = j.export_markdown();
        assert!(md.starts_with("# Tile Master Journal"));
        assert!(md.contains("## Level 2"));
        assert!(md.contains("**Special moment!"));
        assert!(md.contains("- Added 5 dice"));
    }

    #[test]
    fn export_text_lines() {
        let mut j = Journal::new();
        j.append(JournalEntry::Achievement {
            title: "Ad Watcher".to_string(),
            timestamp: Utc::now(),
        });
        let txt = j.export_text();
        assert!(txt.contains("Tile Master Journal"));
        assert!(txt.contains("Achievement unlocked: Ad Watcher"));
    }

    #[test]
    fn journal_serde_roundtrip() {
        let mut j = Journal::new();
        j.append(started(1));
        let json = serde_json::to_string(&j).unwrap();
        let j2: Journal = serde_json::from_str(&json).unwrap();
        assert_eq!(j2.len(), 1);
    }
}
