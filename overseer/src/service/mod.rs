use super::*;

pub mod agent;
pub mod gossip;
pub mod reflection;

use crate::generated::overseer_gossip;

pub(crate) fn member_to_pb(m: Member) -> overseer_gossip::Member {
    let status = match m.status {
        MemberStatus::Alive => overseer_gossip::MemberStatus::Alive,
        MemberStatus::Leaving => overseer_gossip::MemberStatus::Leaving,
        MemberStatus::Left => overseer_gossip::MemberStatus::Left,
        MemberStatus::Failed => overseer_gossip::MemberStatus::Failed,
    };
    overseer_gossip::Member {
        name: m.name,
        addr: m.addr,
        port: m.port as u32,
        tags: m.tags,
        status: status as i32,
    }
}

pub(crate) fn into_status(e: anyhow::Error) -> tonic::Status {
    // Crate-local errors are input-validation failures; anything else
    // came out of the provider.
    if e.downcast_ref::<Error>().is_some() {
        tonic::Status::invalid_argument(format!("{e:#}"))
    } else {
        tonic::Status::internal(format!("{e:#}"))
    }
}
