//! Per-page view model.
//!
//! A page mounts, subscribes to whichever stores are active, and renders
//! derived state. Store callbacks never touch the view directly; they send
//! into a channel the page drains on its own turn of the event loop, so a
//! notification can never re-enter a render in progress. Updates delivered
//! after unmount are drained and dropped.

use crate::config::AppConfig;
use crate::local::LocalWaitlistStore;
use crate::remote::RemoteWaitlistStore;
use crate::subscriptions::Unsubscribe;
use crate::types::WaitlistSnapshot;
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::sync::Arc;
use tracing::warn;

/// Lifecycle of one page instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageState {
    Unmounted,
    Subscribed,
}

enum StoreUpdate {
    Local(WaitlistSnapshot),
    Remote(WaitlistSnapshot),
    RemoteDegraded(String),
}

/// View model shared by the landing, confirmation, and admin pages.
pub struct PageViewModel {
    config: Arc<AppConfig>,
    state: PageState,
    updates_tx: Sender<StoreUpdate>,
    updates_rx: Receiver<StoreUpdate>,
    local: WaitlistSnapshot,
    remote: WaitlistSnapshot,
    advisory: Option<String>,
    subscriptions: Vec<Unsubscribe>,
}

impl PageViewModel {
    pub fn new(config: Arc<AppConfig>) -> Self {
        let (updates_tx, updates_rx) = unbounded();
        Self {
            config,
            state: PageState::Unmounted,
            updates_tx,
            updates_rx,
            local: WaitlistSnapshot::empty(),
            remote: WaitlistSnapshot::empty(),
            advisory: None,
            subscriptions: Vec::new(),
        }
    }

    pub fn state(&self) -> PageState {
        self.state
    }

    /// Subscribe to the active stores.
    ///
    /// The local store is always subscribed; the remote store only when the
    /// configuration enables it. Mounting an already-mounted view is a
    /// no-op.
    pub fn mount(&mut self, local: &LocalWaitlistStore, remote: Option<&RemoteWaitlistStore>) {
        if self.state == PageState::Subscribed {
            return;
        }

        let tx = self.updates_tx.clone();
        self.subscriptions.push(local.subscribe(move |snap| {
            let _ = tx.send(StoreUpdate::Local(snap.clone()));
        }));

        if self.config.remote_enabled() {
            if let Some(remote) = remote {
                remote.initialize();
                let tx = self.updates_tx.clone();
                let degraded_tx = self.updates_tx.clone();
                self.subscriptions.push(remote.subscribe(
                    move |snap| {
                        let _ = tx.send(StoreUpdate::Remote(snap.clone()));
                    },
                    move |e| {
                        warn!(error = %e, "remote view degraded");
                        let _ = degraded_tx
                            .send(StoreUpdate::RemoteDegraded("Live count unavailable".into()));
                    },
                ));
            }
        }

        self.state = PageState::Subscribed;
        self.refresh();
    }

    /// Drain pending store updates into the rendered state.
    ///
    /// While unmounted this discards whatever arrives; a write completing
    /// after unmount is silently dropped.
    pub fn refresh(&mut self) {
        while let Ok(update) = self.updates_rx.try_recv() {
            if self.state != PageState::Subscribed {
                continue;
            }
            match update {
                StoreUpdate::Local(snap) => self.local = snap,
                StoreUpdate::Remote(snap) => self.remote = snap,
                StoreUpdate::RemoteDegraded(message) => self.advisory = Some(message),
            }
        }
    }

    /// Snapshot to render from.
    ///
    /// The authoritative store is selected here, on every call, rather than
    /// cached at mount.
    pub fn display(&self) -> &WaitlistSnapshot {
        if self.config.remote_enabled() {
            &self.remote
        } else {
            &self.local
        }
    }

    /// "N people joined" count from the active store.
    pub fn count(&self) -> usize {
        self.display().count
    }

    /// Soft degraded-mode message, if any.
    pub fn advisory(&self) -> Option<&str> {
        self.advisory.as_deref()
    }

    /// Release every subscription and return to `Unmounted`.
    ///
    /// Each handle is released exactly once no matter how often this runs;
    /// dropping the view without calling it releases them too.
    pub fn unmount(&mut self) {
        for subscription in self.subscriptions.drain(..) {
            subscription.unsubscribe();
        }
        self.state = PageState::Unmounted;
    }
}

impl Drop for PageViewModel {
    fn drop(&mut self) {
        self.unmount();
    }
}
