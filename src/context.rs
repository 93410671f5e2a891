use crate::action::Action;
use crate::model::AppState;
use crate::storage::{load_state, save_state, RecordStore};
use crate::store::reduce;
use anyhow::Result;
use chrono::{DateTime, Utc};
use log::{debug, error};
use std::cell::Cell;
use std::rc::Rc;

/// Reacts to committed snapshots. Observers never see a half-applied
/// transition: they run after the new state is in place, and only when the
/// transition actually changed something.
pub trait StateObserver {
    fn attached(&mut self, _state: &AppState) -> Result<()> {
        Ok(())
    }

    fn state_changed(&mut self, current: &AppState) -> Result<()>;
}

pub struct AppContext {
    state: AppState,
    observers: Vec<Box<dyn StateObserver>>,
}

impl AppContext {
    pub fn new(state: AppState) -> Self {
        AppContext {
            state,
            observers: Vec::new(),
        }
    }

    /// Restores the last saved snapshot from `store` and keeps it mirrored
    /// there from now on.
    pub fn open(store: Box<dyn RecordStore>, key: impl Into<String>) -> Self {
        let key = key.into();
        let state = load_state(store.as_ref(), &key);
        let mut ctx = AppContext::new(state);
        ctx.observe(Box::new(Persister::new(store, key)));
        ctx
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn observe(&mut self, mut observer: Box<dyn StateObserver>) {
        if let Err(err) = observer.attached(&self.state) {
            error!("observer failed on attach: {:#}", err);
        }
        self.observers.push(observer);
    }

    /// Returns whether the action changed the state.
    pub fn dispatch(&mut self, action: Action) -> Result<bool> {
        self.dispatch_at(action, Utc::now())
    }

    /// Commits the transition and then notifies observers. The new state
    /// stays in place even when an observer fails; the first failure is
    /// returned after every observer has run.
    pub fn dispatch_at(&mut self, action: Action, now: DateTime<Utc>) -> Result<bool> {
        let label = action.label();
        let (next, changed) = reduce(std::mem::take(&mut self.state), action, now);
        self.state = next;
        if !changed {
            debug!("{} left the state unchanged", label);
            return Ok(false);
        }
        debug!("{} applied", label);

        let mut first_err = None;
        for observer in self.observers.iter_mut() {
            if let Err(err) = observer.state_changed(&self.state) {
                error!("observer failed after {}: {:#}", label, err);
                first_err.get_or_insert(err);
            }
        }
        match first_err {
            Some(err) => Err(err),
            None => Ok(true),
        }
    }
}

pub struct Persister {
    store: Box<dyn RecordStore>,
    key: String,
}

impl Persister {
    pub fn new(store: Box<dyn RecordStore>, key: impl Into<String>) -> Self {
        Persister {
            store,
            key: key.into(),
        }
    }
}

impl StateObserver for Persister {
    fn state_changed(&mut self, current: &AppState) -> Result<()> {
        save_state(self.store.as_mut(), &self.key, current)
    }
}

/// Shared switch the presentation layer reads when it paints.
#[derive(Debug, Clone, Default)]
pub struct DarkModeSwitch(Rc<Cell<bool>>);

impl DarkModeSwitch {
    pub fn new() -> Self {
        DarkModeSwitch::default()
    }

    pub fn is_dark(&self) -> bool {
        self.0.get()
    }

    fn apply(&self, dark: bool) {
        if self.0.get() != dark {
            self.0.set(dark);
            debug!("dark mode {}", if dark { "on" } else { "off" });
        }
    }
}

impl StateObserver for DarkModeSwitch {
    fn attached(&mut self, state: &AppState) -> Result<()> {
        self.apply(state.is_dark_mode);
        Ok(())
    }

    fn state_changed(&mut self, current: &AppState) -> Result<()> {
        self.apply(current.is_dark_mode);
        Ok(())
    }
}
