use super::*;

use crate::generated::overseer_gossip as pb;
use tonic::transport::{Channel, Endpoint, Uri};

type RawClient = pb::gossip_client::GossipClient<Channel>;

/// Production adapter: consumes the gossip sidecar over gRPC.
pub struct GossipMembership {
    client: RawClient,
}

impl GossipMembership {
    /// The channel is lazy; it is established on first use.
    pub fn new(sidecar: Uri) -> Self {
        let endpoint = Endpoint::from(sidecar);
        let chan = endpoint.connect_lazy();
        Self {
            client: RawClient::new(chan),
        }
    }
}

fn into_member(m: pb::Member) -> Result<Member> {
    let status = match m.status() {
        pb::MemberStatus::Alive => MemberStatus::Alive,
        pb::MemberStatus::Leaving => MemberStatus::Leaving,
        pb::MemberStatus::Left => MemberStatus::Left,
        pb::MemberStatus::Failed => MemberStatus::Failed,
        pb::MemberStatus::Unspecified => bail!("member {} has no status", m.name),
    };
    Ok(Member {
        name: m.name,
        addr: m.addr,
        port: m.port as u16,
        tags: m.tags,
        status,
    })
}

#[async_trait]
impl MembershipProvider for GossipMembership {
    async fn local_member(&self) -> Result<Member> {
        let mut cli = self.client.clone();
        let resp = cli
            .get_local_member(())
            .await
            .context("gossip sidecar unreachable")?;
        into_member(resp.into_inner())
    }

    async fn members(&self) -> Result<Vec<Member>> {
        let mut cli = self.client.clone();
        let resp = cli
            .list_members(())
            .await
            .context("gossip sidecar unreachable")?;
        resp.into_inner()
            .members
            .into_iter()
            .map(into_member)
            .collect()
    }

    async fn join(&self, addresses: &[String]) -> JoinOutcome {
        let mut cli = self.client.clone();
        let req = pb::JoinRequest {
            addresses: addresses.to_vec(),
        };
        match cli.join(req).await {
            Ok(resp) => {
                let resp = resp.into_inner();
                let error = if resp.error.is_empty() {
                    None
                } else {
                    Some(anyhow::anyhow!(resp.error))
                };
                JoinOutcome {
                    num_joined: resp.num_joined,
                    error,
                }
            }
            // An unreachable sidecar reads the same as no target being
            // reachable: the join call itself still returns an outcome.
            Err(e) => JoinOutcome {
                num_joined: 0,
                error: Some(e.into()),
            },
        }
    }

    async fn force_leave(&self, node_name: &str) -> Result<()> {
        let mut cli = self.client.clone();
        cli.force_leave(pb::ForceLeaveRequest {
            node_name: node_name.to_owned(),
        })
        .await
        .context("gossip sidecar unreachable")?;
        Ok(())
    }
}
