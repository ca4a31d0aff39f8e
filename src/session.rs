//! Translation session identity.
//!
//! Sessions are numbered by a process-wide sequence. Closing a session
//! signals whoever holds per-session state elsewhere (remote workers) through
//! a [`SessionBroadcaster`]; the signal itself is not implemented here.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use tracing::info;

/// Identifier of a translation session
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SessionId(pub u64);

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Strictly increasing id allocator, starting at 1
#[derive(Debug)]
pub struct SessionSequence {
    next: AtomicU64,
}

impl SessionSequence {
    pub const fn new() -> Self {
        Self {
            next: AtomicU64::new(1),
        }
    }

    pub fn next_id(&self) -> SessionId {
        SessionId(self.next.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for SessionSequence {
    fn default() -> Self {
        Self::new()
    }
}

static SESSIONS: SessionSequence = SessionSequence::new();

/// Allocate the next process-wide session id
pub fn next_session_id() -> SessionId {
    SESSIONS.next_id()
}

/// Receives the close signal for a session
pub trait SessionBroadcaster: Send + Sync {
    fn broadcast_close(&self, id: SessionId);
}

/// Broadcaster for single-process use: nothing to notify
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalBroadcaster;

impl SessionBroadcaster for LocalBroadcaster {
    fn broadcast_close(&self, _id: SessionId) {}
}

/// An open translation session; closed explicitly or on drop
pub struct TranslationSession {
    id: SessionId,
    broadcaster: Arc<dyn SessionBroadcaster>,
    closed: bool,
}

impl TranslationSession {
    /// Open a session with an id from the process-wide sequence
    pub fn open(broadcaster: Arc<dyn SessionBroadcaster>) -> Self {
        Self::open_with(&SESSIONS, broadcaster)
    }

    /// Open a session with an id from `sequence`
    pub fn open_with(sequence: &SessionSequence, broadcaster: Arc<dyn SessionBroadcaster>) -> Self {
        let id = sequence.next_id();
        info!(session = id.0, "session opened");
        Self {
            id,
            broadcaster,
            closed: false,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Signal the broadcaster; only the first call has an effect
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.broadcaster.broadcast_close(self.id);
        info!(session = self.id.0, "session closed");
    }
}

impl Drop for TranslationSession {
    fn drop(&mut self) {
        self.close();
    }
}

impl std::fmt::Debug for TranslationSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranslationSession")
            .field("id", &self.id)
            .field("closed", &self.closed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Mutex;
    use std::thread;

    #[derive(Default)]
    struct RecordingBroadcaster {
        closed: Mutex<Vec<SessionId>>,
    }

    impl SessionBroadcaster for RecordingBroadcaster {
        fn broadcast_close(&self, id: SessionId) {
            self.closed.lock().unwrap().push(id);
        }
    }

    #[test]
    fn test_sequence_starts_at_one() {
        let sequence = SessionSequence::new();

        assert_eq!(sequence.next_id(), SessionId(1));
        assert_eq!(sequence.next_id(), SessionId(2));
    }

    #[test]
    fn test_global_ids_increase() {
        let a = next_session_id();
        let b = next_session_id();
        assert!(b > a);
    }

    #[test]
    fn test_concurrent_ids_are_unique() {
        let sequence = Arc::new(SessionSequence::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let sequence = Arc::clone(&sequence);
                thread::spawn(move || (0..100).map(|_| sequence.next_id()).collect::<Vec<_>>())
            })
            .collect();

        let ids: HashSet<SessionId> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        assert_eq!(ids.len(), 800);
        assert_eq!(sequence.next_id(), SessionId(801));
    }

    #[test]
    fn test_close_broadcasts_once() {
        let broadcaster = Arc::new(RecordingBroadcaster::default());
        let sequence = SessionSequence::new();

        let mut session = TranslationSession::open_with(&sequence, broadcaster.clone());
        session.close();
        session.close();
        assert!(session.is_closed());
        drop(session);

        assert_eq!(*broadcaster.closed.lock().unwrap(), vec![SessionId(1)]);
    }

    #[test]
    fn test_drop_closes_session() {
        let broadcaster = Arc::new(RecordingBroadcaster::default());
        let sequence = SessionSequence::new();

        {
            let _session = TranslationSession::open_with(&sequence, broadcaster.clone());
        }

        assert_eq!(*broadcaster.closed.lock().unwrap(), vec![SessionId(1)]);
    }
}
