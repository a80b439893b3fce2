use super::*;

use async_trait::async_trait;

mod gossip;
mod memory;

pub use gossip::GossipMembership;
pub use memory::{InMemoryMembership, MemberDirectory};

/// Liveness state of a member, owned entirely by the gossip layer.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Display, Serialize, Deserialize)]
pub enum MemberStatus {
    #[display("alive")]
    Alive,
    #[display("leaving")]
    Leaving,
    #[display("left")]
    Left,
    #[display("failed")]
    Failed,
}

/// Snapshot of one gossip-discovered node.
/// Produced by the provider; the core only reads it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Member {
    pub name: String,
    pub addr: String,
    pub port: u16,
    pub tags: HashMap<String, String>,
    pub status: MemberStatus,
}

impl Member {
    /// The address peers dial to join this member.
    pub fn advertise_addr(&self) -> String {
        format!("{}:{}", self.addr, self.port)
    }
}

/// Outcome of one bulk join.
/// Partial success is representable: `num_joined > 0` together with a
/// populated `error` means some targets were merged and some were not.
#[derive(Debug)]
pub struct JoinOutcome {
    pub num_joined: u64,
    pub error: Option<anyhow::Error>,
}

/// Black-box gossip membership service.
/// The anti-entropy and failure-detection internals live behind this
/// boundary; the core only consumes the converged view.
#[async_trait]
pub trait MembershipProvider: Send + Sync + 'static {
    /// Snapshot of this node as seen by the gossip layer.
    async fn local_member(&self) -> Result<Member>;

    /// Current membership view, the local node included.
    async fn members(&self) -> Result<Vec<Member>>;

    /// Attempt to join every address in order, duplicates included.
    /// Never fails the call: per-target failures ride inside the outcome.
    async fn join(&self, addresses: &[String]) -> JoinOutcome;

    /// Mark `node_name` as departed without its cooperation.
    /// Already-departed and unknown nodes are the provider's business;
    /// no extra failure condition is introduced here.
    async fn force_leave(&self, node_name: &str) -> Result<()>;
}
