//! Per-connection extension state
//!
//! Tracks, per connection, whether the server offers XCALIBRATE and caches
//! the assigned codes and the negotiated version. Discovery happens exactly
//! once per connection; a server that does not offer the extension is
//! remembered as unsupported until the connection is torn down.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::connection::{ConnectionId, Transport};
use crate::protocol::{Error, ExtensionCodes, Result, Version, NUMBER_EVENTS};
use crate::XCALIBRATE_NAME;

/// Cached extension state for one connection.
///
/// The codes are immutable once discovered and may be read concurrently
/// without locking; only the lazily negotiated version sits behind a lock.
#[derive(Debug)]
pub struct ExtensionState {
    codes: ExtensionCodes,
    version: Mutex<Option<Version>>,
}

impl ExtensionState {
    fn new(codes: ExtensionCodes) -> Self {
        ExtensionState {
            codes,
            version: Mutex::new(None),
        }
    }

    /// Codes the server assigned at discovery time.
    pub fn codes(&self) -> ExtensionCodes {
        self.codes
    }

    /// Version already negotiated on this connection, if any.
    pub fn cached_version(&self) -> Option<Version> {
        *self.version.lock().unwrap()
    }

    /// Return the cached version, negotiating it through `fetch` on first
    /// use. The cache lock is held across the fetch so two threads cannot
    /// race to negotiate twice; a failed fetch leaves the cache unset for a
    /// later retry.
    pub fn version_or_negotiate<F>(&self, fetch: F) -> Result<Version>
    where
        F: FnOnce() -> Result<Version>,
    {
        let mut cached = self.version.lock().unwrap();
        if let Some(version) = *cached {
            return Ok(version);
        }
        let version = fetch()?;
        *cached = Some(version);
        Ok(version)
    }
}

enum Entry {
    /// The server does not offer the extension. Permanent for the
    /// connection lifetime; no re-checks.
    Unsupported,
    Supported(Arc<ExtensionState>),
}

/// Per-connection extension-state table.
///
/// The connection is caller-owned, so state is kept in a side table keyed by
/// [`ConnectionId`]; the owner must call [`ExtensionRegistry::remove`] from
/// its close path.
#[derive(Default)]
pub struct ExtensionRegistry {
    connections: Mutex<HashMap<ConnectionId, Entry>>,
}

impl ExtensionRegistry {
    pub fn new() -> Self {
        ExtensionRegistry {
            connections: Mutex::new(HashMap::new()),
        }
    }

    /// Resolve the state for the transport's connection, performing the
    /// extension-directory lookup on first use. This is the only place the
    /// discovery round trip happens.
    pub fn resolve(&self, transport: &dyn Transport) -> Result<Arc<ExtensionState>> {
        let id = transport.connection_id();
        match self.connections.lock().unwrap().get(&id) {
            Some(Entry::Supported(state)) => return Ok(Arc::clone(state)),
            Some(Entry::Unsupported) => return Err(Error::ExtensionAbsent),
            None => {}
        }

        // The discovery round trip runs without the table lock; it can block
        // indefinitely and must not stall lookups on other connections.
        let discovered = transport.query_extension(XCALIBRATE_NAME)?;

        let mut connections = self.connections.lock().unwrap();
        // Another thread may have finished discovery for this connection
        // while the lock was released; its entry wins.
        match connections.get(&id) {
            Some(Entry::Supported(state)) => return Ok(Arc::clone(state)),
            Some(Entry::Unsupported) => return Err(Error::ExtensionAbsent),
            None => {}
        }
        match discovered {
            Some(codes) => {
                log::debug!(
                    "{}: {} at opcode {}, events {}..{}",
                    id,
                    XCALIBRATE_NAME,
                    codes.major_opcode,
                    codes.first_event,
                    codes.first_event + NUMBER_EVENTS
                );
                let state = Arc::new(ExtensionState::new(codes));
                connections.insert(id, Entry::Supported(Arc::clone(&state)));
                Ok(state)
            }
            None => {
                log::debug!("{}: server does not offer {}", id, XCALIBRATE_NAME);
                connections.insert(id, Entry::Unsupported);
                Err(Error::ExtensionAbsent)
            }
        }
    }

    /// Read-only resolution for the event-dispatch path. Never performs
    /// discovery: a connection with no entry fails as absent.
    pub fn lookup(&self, id: ConnectionId) -> Result<Arc<ExtensionState>> {
        match self.connections.lock().unwrap().get(&id) {
            Some(Entry::Supported(state)) => Ok(Arc::clone(state)),
            _ => Err(Error::ExtensionAbsent),
        }
    }

    /// Teardown hook. The connection owner must invoke this from its close
    /// path; the entry is discarded.
    pub fn remove(&self, id: ConnectionId) {
        if self.connections.lock().unwrap().remove(&id).is_some() {
            log::debug!("{}: released {} state", id, XCALIBRATE_NAME);
        }
    }
}
