//! Network reachability signal
//!
//! The platform reports connectivity changes through
//! [`ReachabilityService::update`]; interested parties subscribe and see
//! only actual changes.

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::debug;

/// How the device is connected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Connection {
    /// No route to the network.
    #[default]
    Unavailable,
    /// Wireless LAN.
    Wifi,
    /// Mobile data.
    Cellular,
    /// Wired Ethernet.
    Wired,
}

impl Connection {
    /// Returns true for every connection but [`Connection::Unavailable`].
    #[must_use]
    pub const fn is_reachable(self) -> bool {
        !matches!(self, Self::Unavailable)
    }
}

/// Holds the latest known [`Connection`].
#[derive(Debug)]
pub struct ReachabilityService {
    sender: watch::Sender<Connection>,
}

impl Default for ReachabilityService {
    fn default() -> Self {
        Self::new(Connection::Unavailable)
    }
}

impl ReachabilityService {
    /// Creates a service starting at `initial`.
    #[must_use]
    pub fn new(initial: Connection) -> Self {
        let (sender, _) = watch::channel(initial);
        Self { sender }
    }

    /// Records a new connection state. Subscribers are only woken if the
    /// state actually changed.
    pub fn update(&self, connection: Connection) {
        let changed = self.sender.send_if_modified(|current| {
            if *current == connection {
                false
            } else {
                *current = connection;
                true
            }
        });
        if changed {
            debug!(?connection, "Reachability changed");
        }
    }

    /// The latest connection state.
    #[must_use]
    pub fn current(&self) -> Connection {
        *self.sender.borrow()
    }

    /// Returns true if the network is currently reachable.
    #[must_use]
    pub fn is_reachable(&self) -> bool {
        self.current().is_reachable()
    }

    /// Subscribes to changes. The receiver starts at the current state.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Connection> {
        self.sender.subscribe()
    }
}
