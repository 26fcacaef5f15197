use std::sync::mpsc::{self, Receiver, Sender};

/// Fires the paired [`ShutdownSignal`]. Cloneable.
#[derive(Debug, Clone)]
pub struct ShutdownTrigger(Sender<()>);

/// Blocks a simulated service until shutdown is requested.
#[derive(Debug)]
pub struct ShutdownSignal(Receiver<()>);

pub fn channel() -> (ShutdownTrigger, ShutdownSignal) {
    let (tx, rx) = mpsc::channel();
    (ShutdownTrigger(tx), ShutdownSignal(rx))
}

impl ShutdownTrigger {
    pub fn trigger(&self) {
        // Receiver gone means the service already stopped.
        let _ = self.0.send(());
    }
}

impl ShutdownSignal {
    /// Block until a trigger fires or every trigger has been dropped.
    pub fn wait(&self) {
        let _ = self.0.recv();
    }

    /// Returns true if shutdown was requested within `timeout`.
    #[cfg(test)]
    fn wait_timeout(&self, timeout: std::time::Duration) -> bool {
        !matches!(
            self.0.recv_timeout(timeout),
            Err(mpsc::RecvTimeoutError::Timeout)
        )
    }
}
