//! Battle narrative
//!
//! Append-only. Entries are stored in exactly the order the engine produced
//! them, each tagged with the round it belongs to and what kind of event it
//! describes, so callers can check structure as well as text.

use serde::{Deserialize, Serialize};

/// Kinds of narrative entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogEntryKind {
    BattleStarted,
    RoundStarted,
    /// A weapon opens fire, including the attack count line
    WeaponDeclared,
    /// An ability changed the attack (HEAVY, BLAST, crits, mortal wounds, ...)
    AbilityTriggered,
    HitRoll,
    WoundRoll,
    DamageRoll,
    /// Per-weapon tally after damage is applied
    Summary,
    /// Separator once a round ends and the battle goes on
    RoundEnded,
    BattleEnded,
    Anomaly,
}

impl LogEntryKind {
    /// Blank lines rendered (before, after) an entry of this kind
    fn spacing(&self) -> (bool, bool) {
        match self {
            LogEntryKind::BattleStarted | LogEntryKind::RoundStarted => (false, true),
            LogEntryKind::Summary | LogEntryKind::RoundEnded => (true, true),
            _ => (false, false),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Round number, 0 before the first round starts
    pub round: u32,
    pub kind: LogEntryKind,
    pub text: String,
}

#[derive(Debug, Clone, Default)]
pub struct BattleLog {
    entries: Vec<LogEntry>,
    round: u32,
}

impl BattleLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subsequent entries are stamped with this round
    pub fn set_round(&mut self, round: u32) {
        self.round = round;
    }

    pub fn push(&mut self, kind: LogEntryKind, text: impl Into<String>) {
        self.entries.push(LogEntry {
            round: self.round,
            kind,
            text: text.into(),
        });
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn filter_by_kind(&self, kind: LogEntryKind) -> Vec<&LogEntry> {
        self.entries.iter().filter(|e| e.kind == kind).collect()
    }

    /// The narrative as text, one entry per line
    ///
    /// Blank lines follow the battle and round openers and surround each
    /// summary and round separator.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            let (before, after) = entry.kind.spacing();
            if before {
                out.push('\n');
            }
            out.push_str(&entry.text);
            out.push('\n');
            if after {
                out.push('\n');
            }
        }
        out
    }

    pub fn into_entries(self) -> Vec<LogEntry> {
        self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_keep_order_and_round() {
        let mut log = BattleLog::new();
        log.push(LogEntryKind::BattleStarted, "start");
        log.set_round(1);
        log.push(LogEntryKind::RoundStarted, "round 1");
        log.push(LogEntryKind::HitRoll, "hit");

        let entries = log.entries();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].round, 0);
        assert_eq!(entries[1].round, 1);
        assert_eq!(entries[2].kind, LogEntryKind::HitRoll);
    }

    #[test]
    fn test_filter_by_kind() {
        let mut log = BattleLog::new();
        log.push(LogEntryKind::HitRoll, "a");
        log.push(LogEntryKind::WoundRoll, "b");
        log.push(LogEntryKind::HitRoll, "c");
        let hits = log.filter_by_kind(LogEntryKind::HitRoll);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[1].text, "c");
    }

    #[test]
    fn test_render_separates_rounds() {
        let mut log = BattleLog::new();
        log.push(LogEntryKind::BattleStarted, "start");
        log.push(LogEntryKind::RoundStarted, "round 1");
        log.push(LogEntryKind::HitRoll, "hit");
        log.push(LogEntryKind::Summary, "summary");
        log.push(LogEntryKind::RoundEnded, "---");
        log.push(LogEntryKind::RoundStarted, "round 2");
        log.push(LogEntryKind::Summary, "summary");
        log.push(LogEntryKind::BattleEnded, "end");
        assert_eq!(
            log.render(),
            "start\n\nround 1\n\nhit\n\nsummary\n\n\n---\n\nround 2\n\n\nsummary\n\nend\n"
        );
    }

    #[test]
    fn test_empty_log_renders_empty() {
        assert_eq!(BattleLog::new().render(), "");
        assert!(BattleLog::new().is_empty());
    }
}
