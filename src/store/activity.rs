//! Log of completed actions, newest first.
//!
//! The whole list is rewritten to `mvp_logs` on every append. JSON field
//! names (`date`, `book`, `action`, `proofName`) match what earlier builds
//! stored, so existing logs keep loading.

use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::config::KEY_LOGS;
use crate::console;

use super::kv::KvStore;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// ISO-8601 UTC timestamp.
    #[serde(rename = "date")]
    pub timestamp: String,
    #[serde(rename = "book")]
    pub book_title: String,
    #[serde(rename = "action")]
    pub action_text: String,
    /// Only the file name of the proof photo is kept.
    #[serde(rename = "proofName", default, skip_serializing_if = "Option::is_none")]
    pub proof_filename: Option<String>,
}

pub struct ActivityLog {
    store: Rc<KvStore>,
    entries: Vec<LogEntry>,
}

impl ActivityLog {
    pub fn load(store: Rc<KvStore>) -> Self {
        let raw = store.get_or(KEY_LOGS, "[]");
        let entries = match serde_json::from_str::<Vec<LogEntry>>(&raw) {
            Ok(e) => e,
            Err(e) => {
                console::warn(&format!("達成ログのパースに失敗（空で開始します）: {e}"));
                Vec::new()
            }
        };
        Self { store, entries }
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

    /// Prepend and persist the full list.
    pub fn push(&mut self, entry: LogEntry) {
        self.entries.insert(0, entry);
        self.persist();
    }

    /// Wipe the whole log, in memory and in storage.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.store.remove(KEY_LOGS);
    }

    fn persist(&self) {
        match serde_json::to_string(&self.entries) {
            Ok(json) => self.store.set(KEY_LOGS, &json),
            Err(e) => console::warn(&format!("達成ログのシリアライズに失敗: {e}")),
        }
    }
}
