//! Readiness flag for reference data.
//!
//! The flag is lowered while a fetch is in flight and raised again when
//! the fetch finishes, whether it succeeded or not.

use tokio::sync::watch;

/// Create a linked handle/waiter pair, initially not ready
pub fn data_ready() -> (DataReadyHandle, DataReady) {
    let (tx, rx) = watch::channel(false);
    (DataReadyHandle { tx }, DataReady { rx })
}

/// Raising side, owned by the catalog loader
#[derive(Debug)]
pub struct DataReadyHandle {
    tx: watch::Sender<bool>,
}

impl DataReadyHandle {
    pub fn raise(&self) {
        self.tx.send_replace(true);
    }

    pub fn lower(&self) {
        self.tx.send_replace(false);
    }

    /// Lower the flag for the duration of a fetch; dropping the guard
    /// raises it again, also when the fetch is cancelled
    pub fn loading(&self) -> LoadingGuard<'_> {
        self.lower();
        LoadingGuard { handle: self }
    }

    pub fn subscribe(&self) -> DataReady {
        DataReady {
            rx: self.tx.subscribe(),
        }
    }
}

/// Raises the flag when dropped
#[must_use = "dropping the guard raises the flag immediately"]
pub struct LoadingGuard<'a> {
    handle: &'a DataReadyHandle,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.handle.raise();
    }
}

/// Waiting side, held by wizards
#[derive(Debug, Clone)]
pub struct DataReady {
    rx: watch::Receiver<bool>,
}

impl DataReady {
    /// A flag that is already raised
    pub fn ready() -> Self {
        let (_tx, rx) = watch::channel(true);
        Self { rx }
    }

    pub fn is_ready(&self) -> bool {
        *self.rx.borrow()
    }

    /// Wait until the flag is raised.
    ///
    /// Returns immediately if the loader went away without raising it.
    pub async fn wait(&self) {
        if self.is_ready() {
            return;
        }
        let mut rx = self.rx.clone();
        if rx.wait_for(|ready| *ready).await.is_err() {
            tracing::debug!("Reference data loader dropped before signalling readiness");
        }
    }
}
