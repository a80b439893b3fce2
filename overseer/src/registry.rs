use super::*;

use tracing::info;

/// Authoritative set of consensus-server addresses used by client-role
/// agents for RPC routing. One instance per agent process.
///
/// This is the only core-owned mutable state: writers replace the whole
/// set under the lock and readers clone the current set out, so a reader
/// never observes a mix of two generations. The lock is never held
/// across an await point.
pub struct ServerRegistry {
    servers: spin::RwLock<Vec<ServerAddress>>,
}

impl ServerRegistry {
    pub fn new() -> Self {
        Self {
            servers: spin::RwLock::new(vec![]),
        }
    }

    /// Atomically replace the entire set.
    /// Addresses are stored as given: callers may rely on every supplied
    /// address being retrievable, not on multiplicity. Empty input fails
    /// fast and leaves the stored set untouched.
    pub fn set_servers(&self, addresses: Vec<ServerAddress>) -> Result<()> {
        if addresses.is_empty() {
            bail!(Error::MissingServerAddress);
        }
        info!("updating server list to {} entries", addresses.len());
        *self.servers.write() = addresses;
        Ok(())
    }

    /// The most recently committed set.
    pub fn get_servers(&self) -> Vec<ServerAddress> {
        self.servers.read().clone()
    }
}

impl Default for ServerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
