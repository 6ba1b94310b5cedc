use crate::core::{UserPreferences, WineRecord};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// Ordered list of item names. Duplicates are kept.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    items: Vec<String>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, item: impl Into<String>) {
        self.items.push(item.into());
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}

/// Per-visitor state: the cart, the wine last picked with "Learn More" and
/// the sidebar preferences last submitted.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    pub cart: Cart,
    pub selected_wine: Option<WineRecord>,
    pub preferences: UserPreferences,
}

pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(2 * 60 * 60);
pub const DEFAULT_MAX_SESSIONS: usize = 10_000;

struct StoredSession {
    context: SessionContext,
    last_seen: Instant,
}

/// In-memory session contexts keyed by session id. Nothing is persisted.
///
/// An entry is only created when a request changes session state. Entries idle
/// for longer than the timeout are dropped, and once the store is full the
/// least recently seen entry makes room for a new one.
pub struct SessionStore {
    sessions: Mutex<HashMap<String, StoredSession>>,
    idle_timeout: Duration,
    max_sessions: usize,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_limits(DEFAULT_IDLE_TIMEOUT, DEFAULT_MAX_SESSIONS)
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(idle_timeout: Duration, max_sessions: usize) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            idle_timeout,
            max_sessions: max_sessions.max(1),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, StoredSession>> {
        self.sessions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Runs `f` against the session, creating an empty context on first use.
    pub fn with_session<R>(&self, session_id: &str, f: impl FnOnce(&mut SessionContext) -> R) -> R {
        let now = Instant::now();
        let mut sessions = self.lock();

        if !sessions.contains_key(session_id) {
            self.make_room(&mut sessions, now);
        }

        let stored = sessions
            .entry(session_id.to_string())
            .or_insert_with(|| StoredSession {
                context: SessionContext::default(),
                last_seen: now,
            });
        if now.duration_since(stored.last_seen) >= self.idle_timeout {
            stored.context = SessionContext::default();
        }
        stored.last_seen = now;
        f(&mut stored.context)
    }

    /// Copy of the session's state, or an empty context for an unknown id.
    /// Never creates an entry.
    pub fn snapshot(&self, session_id: &str) -> SessionContext {
        let now = Instant::now();
        let mut sessions = self.lock();
        match sessions.get_mut(session_id) {
            Some(stored) if now.duration_since(stored.last_seen) < self.idle_timeout => {
                stored.last_seen = now;
                stored.context.clone()
            }
            _ => SessionContext::default(),
        }
    }

    fn make_room(&self, sessions: &mut HashMap<String, StoredSession>, now: Instant) {
        let before = sessions.len();
        sessions.retain(|_, stored| now.duration_since(stored.last_seen) < self.idle_timeout);
        if sessions.len() < before {
            tracing::debug!("Expired {} idle sessions", before - sessions.len());
        }

        while sessions.len() >= self.max_sessions {
            let oldest = sessions
                .iter()
                .min_by_key(|(_, stored)| stored.last_seen)
                .map(|(id, _)| id.clone());
            match oldest {
                Some(id) => {
                    sessions.remove(&id);
                }
                None => break,
            }
        }
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
