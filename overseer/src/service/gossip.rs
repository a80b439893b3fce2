use super::*;

mod pb {
    pub use crate::generated::overseer_gossip::*;
}
use pb::gossip_server::{Gossip, GossipServer};

/// Expose a membership provider as the gossip sidecar service.
/// This is what a sidecar process serves; tests also use it to exercise
/// the production adapter end to end.
pub fn new(provider: Arc<dyn MembershipProvider>) -> GossipServer<impl Gossip> {
    GossipServer::new(GossipService { provider })
}

#[doc(hidden)]
pub struct GossipService {
    provider: Arc<dyn MembershipProvider>,
}

#[tonic::async_trait]
impl Gossip for GossipService {
    async fn get_local_member(
        &self,
        _: tonic::Request<()>,
    ) -> std::result::Result<tonic::Response<pb::Member>, tonic::Status> {
        let m = self.provider.local_member().await.map_err(into_status)?;
        Ok(tonic::Response::new(member_to_pb(m)))
    }

    async fn list_members(
        &self,
        _: tonic::Request<()>,
    ) -> std::result::Result<tonic::Response<pb::MemberList>, tonic::Status> {
        let members = self.provider.members().await.map_err(into_status)?;
        Ok(tonic::Response::new(pb::MemberList {
            members: members.into_iter().map(member_to_pb).collect(),
        }))
    }

    async fn join(
        &self,
        request: tonic::Request<pb::JoinRequest>,
    ) -> std::result::Result<tonic::Response<pb::JoinResponse>, tonic::Status> {
        let req = request.into_inner();
        let outcome = self.provider.join(&req.addresses).await;
        Ok(tonic::Response::new(pb::JoinResponse {
            num_joined: outcome.num_joined,
            error: outcome.error.map(|e| format!("{e:#}")).unwrap_or_default(),
        }))
    }

    async fn force_leave(
        &self,
        request: tonic::Request<pb::ForceLeaveRequest>,
    ) -> std::result::Result<tonic::Response<()>, tonic::Status> {
        let req = request.into_inner();
        self.provider
            .force_leave(&req.node_name)
            .await
            .map_err(into_status)?;
        Ok(tonic::Response::new(()))
    }
}
