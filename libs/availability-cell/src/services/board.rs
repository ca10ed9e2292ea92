use std::collections::HashMap;

use tokio::sync::RwLock;
use tracing::debug;

use crate::models::SlotBoard;

/// Hard bound on tracked sessions. Board keys can come from the anonymous
/// `x-session-id` header, so the cache must not grow with whatever ids
/// clients fabricate; at capacity the least recently touched session is
/// evicted.
pub const MAX_SESSIONS: usize = 1024;

/// Per-session cache of the most recent slot board, tagged with a fetch
/// generation. A fetch takes a ticket via `begin` and its result is kept
/// only if no later fetch started in the meantime, so a slow response can
/// never overwrite a newer one.
pub struct SlotBoardCache {
    inner: RwLock<BoardEntries>,
}

#[derive(Default)]
struct BoardEntries {
    // Logical clock: bumped on every begin/commit, recorded per entry so
    // eviction can pick the least recently touched session.
    clock: u64,
    map: HashMap<String, BoardEntry>,
}

struct BoardEntry {
    generation: u64,
    touched: u64,
    board: Option<SlotBoard>,
}

impl SlotBoardCache {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(BoardEntries::default()),
        }
    }

    /// Starts a fetch for `key` and returns its generation ticket. Any
    /// earlier in-flight fetch for the same key is superseded.
    pub async fn begin(&self, key: &str) -> u64 {
        let mut entries = self.inner.write().await;
        entries.clock += 1;
        let clock = entries.clock;

        if !entries.map.contains_key(key) && entries.map.len() >= MAX_SESSIONS {
            if let Some(oldest) = entries
                .map
                .iter()
                .min_by_key(|(_, entry)| entry.touched)
                .map(|(k, _)| k.clone())
            {
                debug!("Board cache full, evicting idle session {}", oldest);
                entries.map.remove(&oldest);
            }
        }

        let entry = entries.map.entry(key.to_string()).or_insert(BoardEntry {
            generation: 0,
            touched: clock,
            board: None,
        });
        entry.generation += 1;
        entry.touched = clock;
        entry.generation
    }

    /// Stores `board` if `generation` is still the latest ticket for `key`.
    /// Returns whether the commit was applied.
    pub async fn commit(&self, key: &str, generation: u64, board: SlotBoard) -> bool {
        let mut entries = self.inner.write().await;
        entries.clock += 1;
        let clock = entries.clock;
        match entries.map.get_mut(key) {
            Some(entry) if entry.generation == generation => {
                entry.board = Some(board);
                entry.touched = clock;
                true
            }
            _ => {
                debug!(
                    "Discarding superseded slot board for session {} (generation {})",
                    key, generation
                );
                false
            }
        }
    }

    pub async fn latest(&self, key: &str) -> Option<SlotBoard> {
        let entries = self.inner.read().await;
        entries.map.get(key).and_then(|entry| entry.board.clone())
    }
}

impl Default for SlotBoardCache {
    fn default() -> Self {
        Self::new()
    }
}
