use hatch_core::{HatchError, Result, WizardController, WizardEvent};
use serde::Serialize;
use std::collections::{HashMap, VecDeque};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::broadcast;
use uuid::Uuid;

/// A wizard event tagged with the session it came from.
#[derive(Debug, Clone, Serialize)]
pub struct SessionEvent {
    pub wizard_id: Uuid,
    #[serde(flatten)]
    pub event: WizardEvent,
}

/// How many closed session ids are remembered so late requests get 410
/// instead of 404.
const CLOSED_MEMORY: usize = 1024;

#[derive(Default)]
struct Sessions {
    live: HashMap<Uuid, WizardController>,
    closed: VecDeque<Uuid>,
}

impl Sessions {
    fn get_mut(&mut self, id: Uuid) -> Result<&mut WizardController> {
        if self.closed.contains(&id) {
            return Err(HatchError::WizardClosed(format!("session {id} was closed")));
        }
        self.live
            .get_mut(&id)
            .ok_or_else(|| HatchError::WizardNotFound(id.to_string()))
    }

    fn remove(&mut self, id: Uuid) -> Option<WizardController> {
        let wizard = self.live.remove(&id)?;
        if self.closed.len() == CLOSED_MEMORY {
            self.closed.pop_front();
        }
        self.closed.push_back(id);
        Some(wizard)
    }
}

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub root: PathBuf,
    sessions: Arc<Mutex<Sessions>>,
    pub event_tx: broadcast::Sender<SessionEvent>,
}

impl AppState {
    pub fn new(root: PathBuf) -> Self {
        let (tx, _) = broadcast::channel(256);
        Self {
            root,
            sessions: Arc::new(Mutex::new(Sessions::default())),
            event_tx: tx,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Sessions> {
        // A panic mid-operation leaves the map itself intact.
        self.sessions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn open_session(&self, wizard: WizardController) -> Uuid {
        let id = Uuid::new_v4();
        tracing::info!(wizard = %id, idea = %wizard.source().slug, "wizard session opened");
        self.lock().live.insert(id, wizard);
        id
    }

    /// Run `f` against one session under the lock, then publish whatever
    /// events it produced.
    pub fn with_wizard<T>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut WizardController) -> Result<T>,
    ) -> Result<T> {
        let (result, events) = {
            let mut sessions = self.lock();
            let wizard = sessions.get_mut(id)?;
            let result = f(wizard);
            (result, wizard.take_events())
        };
        self.publish(id, events);
        result
    }

    /// Like [`AppState::with_wizard`], but the session is dropped in the same
    /// critical section when `f` succeeds.
    pub fn close_with<T>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut WizardController) -> Result<T>,
    ) -> Result<T> {
        let (result, events) = {
            let mut sessions = self.lock();
            let wizard = sessions.get_mut(id)?;
            let result = f(wizard);
            let events = wizard.take_events();
            if result.is_ok() {
                sessions.remove(id);
                tracing::debug!(wizard = %id, "wizard session closed");
            }
            (result, events)
        };
        self.publish(id, events);
        result
    }

    /// Drop a session and hand its controller back to the caller.
    pub fn close_session(&self, id: Uuid) -> Result<WizardController> {
        let wizard = {
            let mut sessions = self.lock();
            sessions.get_mut(id)?;
            sessions.remove(id)
        }
        .ok_or_else(|| HatchError::WizardNotFound(id.to_string()))?;
        tracing::debug!(wizard = %id, "wizard session closed");
        Ok(wizard)
    }

    /// Number of live sessions. Closed ones are not counted.
    pub fn session_count(&self) -> usize {
        self.lock().live.len()
    }

    fn publish(&self, wizard_id: Uuid, events: Vec<WizardEvent>) {
        for event in events {
            // No subscribers is fine.
            let _ = self.event_tx.send(SessionEvent { wizard_id, event });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hatch_core::config::Config;
    use hatch_core::idea::Idea;

    fn wizard() -> WizardController {
        let mut idea = Idea::new("garden", "Community garden");
        idea.description = "Grow things together".to_string();
        WizardController::start(idea, &Config::new("test"))
    }

    #[test]
    fn new_state_stores_root() {
        let state = AppState::new(PathBuf::from("/tmp/test"));
        assert_eq!(state.root, PathBuf::from("/tmp/test"));
        assert_eq!(state.session_count(), 0);
    }

    #[test]
    fn unknown_session_is_not_found() {
        let state = AppState::new(PathBuf::from("/tmp/test"));
        let err = state.with_wizard(Uuid::new_v4(), |w| w.advance()).unwrap_err();
        assert!(matches!(err, HatchError::WizardNotFound(_)));
    }

    #[test]
    fn events_are_broadcast_with_session_id() {
        let state = AppState::new(PathBuf::from("/tmp/test"));
        let mut rx = state.event_tx.subscribe();
        let id = state.open_session(wizard());

        state.with_wizard(id, |w| w.advance()).unwrap();

        let got = rx.try_recv().unwrap();
        assert_eq!(got.wizard_id, id);
        assert!(matches!(got.event, WizardEvent::StepChanged { index: 1, .. }));
    }

    #[test]
    fn close_session_removes_it() {
        let state = AppState::new(PathBuf::from("/tmp/test"));
        let id = state.open_session(wizard());
        state.close_session(id).unwrap();
        assert_eq!(state.session_count(), 0);
        assert!(matches!(
            state.close_session(id),
            Err(HatchError::WizardClosed(_))
        ));
    }

    #[test]
    fn cancel_through_close_with_drops_session() {
        let state = AppState::new(PathBuf::from("/tmp/test"));
        let mut rx = state.event_tx.subscribe();
        let id = state.open_session(wizard());
        assert_eq!(state.session_count(), 1);

        state.close_with(id, |w| w.cancel()).unwrap();

        assert_eq!(state.session_count(), 0);
        assert!(matches!(rx.try_recv().unwrap().event, WizardEvent::Cancelled));
        let err = state.with_wizard(id, |w| w.advance()).unwrap_err();
        assert!(matches!(err, HatchError::WizardClosed(_)));
    }

    #[test]
    fn failed_close_with_keeps_session() {
        let state = AppState::new(PathBuf::from("/tmp/test"));
        let id = state.open_session(wizard());

        let err = state.close_with(id, |w| w.begin_submit()).unwrap_err();

        assert!(matches!(err, HatchError::NotOnFinalStep { .. }));
        assert_eq!(state.session_count(), 1);
    }

    #[test]
    fn closed_memory_is_bounded() {
        let state = AppState::new(PathBuf::from("/tmp/test"));
        let first = state.open_session(wizard());
        state.close_session(first).unwrap();
        for _ in 0..CLOSED_MEMORY {
            let id = state.open_session(wizard());
            state.close_session(id).unwrap();
        }
        let err = state.with_wizard(first, |w| w.advance()).unwrap_err();
        assert!(matches!(err, HatchError::WizardNotFound(_)));
    }
}
