use super::*;

pub type AgentClient = pb::agent_client::AgentClient<tonic::transport::channel::Channel>;
pub use crate::generated::overseer_gossip::{Member, MemberStatus};
pub use pb::{
    ForceLeaveRequest, JoinRequest, JoinResponse, MemberList, SelfResponse, ServerList,
    SetServersRequest,
};
