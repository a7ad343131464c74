use std::collections::HashMap;
use std::sync::Mutex;
use chrono::{DateTime, Duration, Utc};
use rand::{distributions::Alphanumeric, Rng};

const TOKEN_TTL_MINUTES: i64 = 5;

/// One-time session handoff across the OAuth redirect. The connect endpoint
/// issues a token that travels inside the provider `state` parameter; the
/// callback consumes it exactly once. Expired entries are evicted lazily
/// whenever the map is locked for a lookup.
#[derive(Debug, Clone)]
pub struct HandoffEntry {
    pub account_id: String,
    pub workspace_id: String,
    pub provider: String,
    pub issued_at: DateTime<Utc>,
}

#[derive(Default)]
pub struct HandoffStore {
    entries: Mutex<HashMap<String, HandoffEntry>>,
}

impl HandoffStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self, account_id: String, workspace_id: String, provider: String) -> String {
        let token: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(32)
            .map(char::from)
            .collect();

        let entry = HandoffEntry {
            account_id,
            workspace_id,
            provider,
            issued_at: Utc::now(),
        };

        let mut entries = self.entries.lock().expect("handoff store poisoned");
        entries.insert(token.clone(), entry);
        token
    }

    /// Removes and returns the entry for `token`, if present and not expired.
    pub fn consume(&self, token: &str) -> Option<HandoffEntry> {
        let cutoff = Utc::now() - Duration::minutes(TOKEN_TTL_MINUTES);
        let mut entries = self.entries.lock().expect("handoff store poisoned");
        entries.retain(|_, entry| entry.issued_at >= cutoff);
        entries.remove(token)
    }

    #[cfg(test)]
    fn backdate(&self, token: &str, minutes: i64) {
        let mut entries = self.entries.lock().unwrap();
        if let Some(entry) = entries.get_mut(token) {
            entry.issued_at = Utc::now() - Duration::minutes(minutes);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_is_single_use() {
        let store = HandoffStore::new();
        let token = store.issue("acc-1".into(), "ws-1".into(), "google".into());

        let entry = store.consume(&token).expect("first consume succeeds");
        assert_eq!(entry.workspace_id, "ws-1");
        assert_eq!(entry.provider, "google");

        assert!(store.consume(&token).is_none());
    }

    #[test]
    fn expired_token_is_rejected_and_evicted() {
        let store = HandoffStore::new();
        let stale = store.issue("acc-1".into(), "ws-1".into(), "zoom".into());
        store.backdate(&stale, TOKEN_TTL_MINUTES + 1);

        assert!(store.consume(&stale).is_none());
        // Lookup of an unrelated token also triggers eviction without panicking.
        assert!(store.consume("missing").is_none());
    }

    #[test]
    fn unknown_token_is_rejected() {
        let store = HandoffStore::new();
        assert!(store.consume("nope").is_none());
    }
}
