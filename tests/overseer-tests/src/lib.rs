use anyhow::{ensure, Result};
use env::Env;
use overseer::service::agent::client::*;

pub struct Builder {
    with_logging: bool,
}
impl Builder {
    fn new() -> Self {
        Self { with_logging: true }
    }

    pub fn with_logging(self, b: bool) -> Self {
        Self { with_logging: b }
    }

    pub async fn build(self, n: u8) -> Result<Cluster> {
        ensure!(n > 0);
        let mut env = Env::new(self.with_logging);
        for id in 0..n {
            env.add_node(id);
            env.check_connectivity(id).await?;
        }
        Ok(Cluster { env })
    }
}

pub struct Cluster {
    env: Env,
}
impl Cluster {
    pub fn builder() -> Builder {
        Builder::new()
    }

    /// Create `n` agent nodes, each serving its own gossip sidecar.
    pub async fn new(n: u8) -> Result<Self> {
        Self::builder().build(n).await
    }

    pub fn env(&self) -> &Env {
        &self.env
    }

    pub fn env_mut(&mut self) -> &mut Env {
        &mut self.env
    }

    /// Administrative client for node `id`.
    pub fn admin(&self, id: u8) -> AgentClient {
        let conn = self.env.get_connection(id);
        AgentClient::new(conn)
    }

    /// Gossip address other nodes dial to join node `id`.
    pub fn join_addr(&self, id: u8) -> String {
        self.env.advertise_addr(id)
    }

    /// Request node `to` to join node `id`.
    pub async fn join(&self, to: u8, id: u8) -> Result<JoinResponse> {
        let resp = self
            .admin(to)
            .join(JoinRequest {
                addresses: vec![self.join_addr(id)],
            })
            .await?
            .into_inner();
        Ok(resp)
    }
}
