use super::*;

mod pb {
    pub use crate::generated::overseer::*;
}
use pb::agent_server::{Agent, AgentServer};

pub mod client;

use futures::Stream;
use std::pin::Pin;
use std::str::FromStr;

/// Create the agent service backed by a coordinator and a registry.
/// This is the administrative gateway: it decodes requests, validates
/// input, and maps errors onto gRPC statuses.
pub fn new(
    coordinator: ClusterCoordinator,
    registry: Arc<ServerRegistry>,
) -> AgentServer<impl Agent> {
    AgentServer::new(AgentService {
        coordinator,
        registry,
    })
}

#[doc(hidden)]
pub struct AgentService {
    coordinator: ClusterCoordinator,
    registry: Arc<ServerRegistry>,
}

#[tonic::async_trait]
impl Agent for AgentService {
    async fn get_self(
        &self,
        _: tonic::Request<()>,
    ) -> std::result::Result<tonic::Response<pb::SelfResponse>, tonic::Status> {
        let info = self.coordinator.self_info().await.map_err(into_status)?;

        let config = pb::AgentConfig {
            node_name: info.config.node_name,
            datacenter: info.config.datacenter,
            region: info.config.region,
            advertise_addr: info.config.advertise_addr,
            server: info.config.server,
            version: info.config.version,
        };
        let stats = info
            .stats
            .into_iter()
            .map(|(group, stats)| {
                let group_pb = pb::StatGroup {
                    stats: stats.into_iter().collect(),
                };
                (group, group_pb)
            })
            .collect();

        Ok(tonic::Response::new(pb::SelfResponse {
            config: Some(config),
            stats,
        }))
    }

    async fn join(
        &self,
        request: tonic::Request<pb::JoinRequest>,
    ) -> std::result::Result<tonic::Response<pb::JoinResponse>, tonic::Status> {
        let req = request.into_inner();
        let result = self
            .coordinator
            .join(&req.addresses)
            .await
            .map_err(into_status)?;
        Ok(tonic::Response::new(pb::JoinResponse {
            num_joined: result.num_joined,
            error: result.error,
        }))
    }

    async fn list_members(
        &self,
        _: tonic::Request<()>,
    ) -> std::result::Result<tonic::Response<pb::MemberList>, tonic::Status> {
        let members = self.coordinator.members().await.map_err(into_status)?;
        Ok(tonic::Response::new(pb::MemberList {
            members: members.into_iter().map(member_to_pb).collect(),
        }))
    }

    type WatchMembersStream =
        Pin<Box<dyn Stream<Item = std::result::Result<pb::MemberList, tonic::Status>> + Send>>;

    async fn watch_members(
        &self,
        _: tonic::Request<()>,
    ) -> std::result::Result<tonic::Response<Self::WatchMembersStream>, tonic::Status> {
        let coordinator = self.coordinator.clone();
        let st = async_stream::try_stream! {
            let mut intvl = tokio::time::interval(std::time::Duration::from_secs(1));
            loop {
                intvl.tick().await;

                let members = coordinator.members().await.map_err(into_status)?;
                yield pb::MemberList {
                    members: members.into_iter().map(member_to_pb).collect(),
                };
            }
        };
        Ok(tonic::Response::new(Box::pin(st)))
    }

    async fn force_leave(
        &self,
        request: tonic::Request<pb::ForceLeaveRequest>,
    ) -> std::result::Result<tonic::Response<()>, tonic::Status> {
        let req = request.into_inner();
        self.coordinator
            .force_leave(&req.node_name)
            .await
            .map_err(into_status)?;
        Ok(tonic::Response::new(()))
    }

    async fn list_servers(
        &self,
        _: tonic::Request<()>,
    ) -> std::result::Result<tonic::Response<pb::ServerList>, tonic::Status> {
        let servers = self
            .registry
            .get_servers()
            .iter()
            .map(|s| s.to_string())
            .collect();
        Ok(tonic::Response::new(pb::ServerList { servers }))
    }

    async fn set_servers(
        &self,
        request: tonic::Request<pb::SetServersRequest>,
    ) -> std::result::Result<tonic::Response<()>, tonic::Status> {
        let req = request.into_inner();

        // Parse the whole batch before touching the registry so a bad
        // entry cannot leave a partial update behind.
        let mut addresses = Vec::with_capacity(req.addresses.len());
        for raw in &req.addresses {
            let addr = ServerAddress::from_str(raw).map_err(into_status)?;
            addresses.push(addr);
        }

        self.registry.set_servers(addresses).map_err(into_status)?;
        Ok(tonic::Response::new(()))
    }
}
