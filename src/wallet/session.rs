//! Wallet session state and change notification.

use tokio::sync::watch;

use crate::rpc::Address;

/// What the wallet capability currently exposes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalletSession {
    pub connected: bool,
    pub address: Option<Address>,
}

impl WalletSession {
    pub fn disconnected() -> Self {
        Self::default()
    }

    pub fn connected(address: Address) -> Self {
        Self {
            connected: true,
            address: Some(address),
        }
    }

    /// Address to sync, present only while connected.
    pub fn ready_address(&self) -> Option<&Address> {
        if self.connected {
            self.address.as_ref()
        } else {
            None
        }
    }

    /// True when account data can be fetched for this session.
    pub fn is_ready(&self) -> bool {
        self.ready_address().is_some()
    }
}

/// Writer side of the session, owned by the wallet capability.
#[derive(Debug)]
pub struct WalletHandle {
    tx: watch::Sender<WalletSession>,
}

impl WalletHandle {
    /// Create a disconnected session and a watcher for it.
    pub fn new() -> (Self, SessionWatcher) {
        let (tx, rx) = watch::channel(WalletSession::disconnected());
        (Self { tx }, SessionWatcher { rx })
    }

    /// Connect `address`. Returns false when nothing changed.
    pub fn connect(&self, address: Address) -> bool {
        self.publish(WalletSession::connected(address))
    }

    /// Disconnect, keeping the last address like browser wallets do.
    pub fn disconnect(&self) -> bool {
        let address = self.tx.borrow().address.clone();
        self.publish(WalletSession {
            connected: false,
            address,
        })
    }

    /// Replace the whole session. Returns false when nothing changed.
    pub fn publish(&self, next: WalletSession) -> bool {
        self.tx.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                tracing::debug!(
                    connected = next.connected,
                    address = ?next.address.as_ref().map(Address::as_str),
                    "Wallet session changed"
                );
                *current = next;
                true
            }
        })
    }

    pub fn current(&self) -> WalletSession {
        self.tx.borrow().clone()
    }
}

/// Reader side of the session.
#[derive(Debug, Clone)]
pub struct SessionWatcher {
    rx: watch::Receiver<WalletSession>,
}

impl SessionWatcher {
    pub fn current(&self) -> WalletSession {
        self.rx.borrow().clone()
    }

    /// Wait for the next change. `None` once the wallet handle is dropped.
    pub async fn changed(&mut self) -> Option<WalletSession> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }
}
