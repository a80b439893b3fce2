use super::*;

use membership::JoinOutcome;
use std::time::Instant;
use tracing::{info, warn};

/// Identity and configuration snapshot of one agent.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AgentConfig {
    pub node_name: String,
    pub datacenter: String,
    pub region: String,
    pub advertise_addr: String,
    pub server: bool,
    pub version: String,
}

/// Self-description returned to administrative callers.
#[derive(Clone, Debug, Serialize)]
pub struct AgentSelf {
    pub config: AgentConfig,
    /// Runtime statistics, grouped. Never empty: the `runtime` group is
    /// emitted even on a freshly started node.
    pub stats: BTreeMap<String, BTreeMap<String, String>>,
}

/// Outcome of a join request. Partial success is first-class:
/// `num_joined` and `error` may both be populated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct JoinResult {
    pub num_joined: u64,
    /// Empty on full success.
    pub error: String,
}

/// Stateless façade over the membership provider.
/// Holds no mutable state of its own, so it needs no locking; all
/// serialization concerns are delegated to the provider.
#[derive(Clone)]
pub struct ClusterCoordinator {
    config: Arc<AgentConfig>,
    provider: Arc<dyn MembershipProvider>,
    started_at: Instant,
}

impl ClusterCoordinator {
    pub fn new(config: AgentConfig, provider: Arc<dyn MembershipProvider>) -> Self {
        Self {
            config: Arc::new(config),
            provider,
            started_at: Instant::now(),
        }
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// Identity snapshot plus runtime statistics. Read-only.
    pub async fn self_info(&self) -> Result<AgentSelf> {
        let mut stats = BTreeMap::new();

        let mut runtime = BTreeMap::new();
        runtime.insert(
            "uptime_ms".to_owned(),
            self.started_at.elapsed().as_millis().to_string(),
        );
        runtime.insert("version".to_owned(), self.config.version.clone());
        stats.insert("runtime".to_owned(), runtime);

        let members = self.provider.members().await?;
        let local = self.provider.local_member().await?;
        let n_alive = members
            .iter()
            .filter(|m| m.status == MemberStatus::Alive)
            .count();
        let mut cluster = BTreeMap::new();
        cluster.insert("known_members".to_owned(), members.len().to_string());
        cluster.insert("alive_members".to_owned(), n_alive.to_string());
        cluster.insert("local_member".to_owned(), local.name);
        cluster.insert("local_status".to_owned(), local.status.to_string());
        stats.insert("cluster".to_owned(), cluster);

        Ok(AgentSelf {
            config: (*self.config).clone(),
            stats,
        })
    }

    /// Join the cluster via every given address, duplicates included.
    /// The whole batch goes to the provider in one call. Per-target
    /// failures are reported in the result, not as a call failure; only
    /// an empty input fails fast.
    pub async fn join(&self, addresses: &[String]) -> Result<JoinResult> {
        if addresses.is_empty() {
            bail!(Error::MissingJoinAddress);
        }
        let JoinOutcome { num_joined, error } = self.provider.join(addresses).await;
        let error = match error {
            Some(e) => {
                warn!(
                    "joined {num_joined}/{} addresses: {e:#}",
                    addresses.len()
                );
                format!("{e:#}")
            }
            None => {
                info!("joined {num_joined} addresses");
                String::new()
            }
        };
        Ok(JoinResult { num_joined, error })
    }

    /// Current membership view, straight from the provider.
    pub async fn members(&self) -> Result<Vec<Member>> {
        self.provider.members().await
    }

    /// Evict `node_name` from the gossip state without its cooperation.
    /// Whatever the provider says about an already-departed node passes
    /// through unchanged; the core adds no failure condition of its own.
    pub async fn force_leave(&self, node_name: &str) -> Result<()> {
        if node_name.is_empty() {
            bail!(Error::MissingNodeName);
        }
        info!("force-leaving node {node_name}");
        self.provider.force_leave(node_name).await
    }
}
