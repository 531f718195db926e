//! # Views and owners
//!
//! A `CorpusView` is a scoped handle onto the corpus or a region of it.
//! Owners register on the view and gate its teardown: `close()` asks every
//! owner to release and only frees resources once all of them agree.
//!
//! The owner set and the lifecycle status live behind one mutex; every
//! operation, including the owner-release loop inside `close()`, holds
//! that lock for its full duration. Concurrent acquire/release/close calls
//! from independent threads serialize and observe a consistent owner set.

use std::sync::{Arc, Mutex};

use stratum_model::ContainerId;

use crate::errors::{ReleaseInterrupted, ViewError};

/// What the holder may do with the corpus through this view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    Read,
    ReadWrite,
}

/// View lifecycle; `Closed` is terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewStatus {
    Open,
    Closing,
    Closed,
}

/// A party holding partial ownership of a view
///
/// `release` returns `Ok(true)` when the owner let go, `Ok(false)` when it
/// refuses (e.g. an edit referencing the view is still running), and an
/// error when the attempt was interrupted.
pub trait ViewOwner: Send + Sync {
    fn name(&self) -> &str;
    fn release(&self) -> Result<bool, ReleaseInterrupted>;
}

/// View-specific resource teardown, run between `Closing` and `Closed`
pub trait ViewResources: Send {
    fn release(&mut self) -> Result<(), ReleaseInterrupted>;
}

type CloseListener = Box<dyn FnMut(&str) + Send>;

struct ViewState {
    status: ViewStatus,
    owners: Vec<Arc<dyn ViewOwner>>,
    resources: Option<Box<dyn ViewResources>>,
    close_listeners: Vec<CloseListener>,
}

/// Scoped, owner-gated handle onto (a region of) the corpus
pub struct CorpusView {
    name: String,
    mode: AccessMode,
    region: Option<Vec<ContainerId>>,
    state: Mutex<ViewState>,
}

impl CorpusView {
    pub fn new(name: impl Into<String>, mode: AccessMode) -> Self {
        Self {
            name: name.into(),
            mode,
            region: None,
            state: Mutex::new(ViewState {
                status: ViewStatus::Open,
                owners: Vec::new(),
                resources: None,
                close_listeners: Vec::new(),
            }),
        }
    }

    /// Restrict the view to a set of containers
    pub fn with_region(mut self, region: Vec<ContainerId>) -> Self {
        self.region = Some(region);
        self
    }

    /// Attach the resource teardown hook run during a successful close
    pub fn with_resources(self, resources: Box<dyn ViewResources>) -> Self {
        self.state.lock().unwrap().resources = Some(resources);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mode(&self) -> AccessMode {
        self.mode
    }

    pub fn region(&self) -> Option<&[ContainerId]> {
        self.region.as_deref()
    }

    pub fn status(&self) -> ViewStatus {
        self.state.lock().unwrap().status
    }

    /// True until the view starts closing
    pub fn is_active(&self) -> bool {
        self.status() == ViewStatus::Open
    }

    /// True iff open with no registered owners
    pub fn closable(&self) -> bool {
        let state = self.state.lock().unwrap();
        state.status == ViewStatus::Open && state.owners.is_empty()
    }

    /// Names of the currently registered owners
    pub fn owners(&self) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .owners
            .iter()
            .map(|o| o.name().to_string())
            .collect()
    }

    /// Register an owner; re-acquiring an existing owner is not an error
    pub fn acquire(&self, owner: Arc<dyn ViewOwner>) -> Result<(), ViewError> {
        let mut state = self.state.lock().unwrap();
        if state.status != ViewStatus::Open {
            return Err(ViewError::Closed(self.name.clone()));
        }
        if state.owners.iter().any(|o| o.name() == owner.name()) {
            return Ok(());
        }
        state.owners.push(owner);
        Ok(())
    }

    /// Deregister an owner by name
    pub fn release(&self, owner_name: &str) -> Result<(), ViewError> {
        let mut state = self.state.lock().unwrap();
        if state.status != ViewStatus::Open {
            return Err(ViewError::Closed(self.name.clone()));
        }
        let pos = state
            .owners
            .iter()
            .position(|o| o.name() == owner_name)
            .ok_or_else(|| ViewError::UnknownOwner {
                view: self.name.clone(),
                owner: owner_name.to_string(),
            })?;
        state.owners.remove(pos);
        Ok(())
    }

    /// Run `listener` exactly once if the view ever closes successfully
    pub fn subscribe_close(
        &self,
        listener: impl FnMut(&str) + Send + 'static,
    ) -> Result<(), ViewError> {
        let mut state = self.state.lock().unwrap();
        if state.status == ViewStatus::Closed {
            return Err(ViewError::Closed(self.name.clone()));
        }
        state.close_listeners.push(Box::new(listener));
        Ok(())
    }

    /// Ask every owner to release, then tear the view down
    ///
    /// Owner failures are aggregated: every owner is asked even after the
    /// first refusal, owners that released are deregistered, and the error
    /// lists all blockers. On failure the view stays open so the caller
    /// can resolve the blockers and retry.
    pub fn close(&self) -> Result<(), ViewError> {
        let mut state = self.state.lock().unwrap();
        if state.status != ViewStatus::Open {
            return Ok(());
        }

        let mut blocking = Vec::new();
        let mut kept = Vec::new();
        for owner in state.owners.drain(..) {
            match owner.release() {
                Ok(true) => {}
                Ok(false) => {
                    blocking.push(owner.name().to_string());
                    kept.push(owner);
                }
                Err(interrupted) => {
                    tracing::warn!(
                        "owner {} of view {} was interrupted during release: {}",
                        owner.name(),
                        self.name,
                        interrupted
                    );
                    blocking.push(owner.name().to_string());
                    kept.push(owner);
                }
            }
        }
        if !blocking.is_empty() {
            state.owners = kept;
            tracing::warn!("view {} cannot close, blocked by {:?}", self.name, blocking);
            return Err(ViewError::Unclosable {
                view: self.name.clone(),
                blocking,
            });
        }

        state.status = ViewStatus::Closing;
        let mut failure = None;
        if let Some(mut resources) = state.resources.take() {
            if let Err(interrupted) = resources.release() {
                failure = Some(interrupted);
            }
        }
        // closed even on failure, so a leaked view cannot be re-entered
        state.status = ViewStatus::Closed;

        if let Some(cause) = failure {
            tracing::warn!("closing view {} was interrupted: {}", self.name, cause);
            return Err(ViewError::Interrupted {
                view: self.name.clone(),
                cause,
            });
        }

        let mut listeners = std::mem::take(&mut state.close_listeners);
        drop(state);
        tracing::debug!("view {} closed", self.name);
        for listener in listeners.iter_mut() {
            listener(&self.name);
        }
        Ok(())
    }
}
