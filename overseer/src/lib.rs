#![deny(unused_must_use)]

mod error;
use error::Error;

/// Membership provider boundary and its implementations.
pub mod membership;

/// Cluster-coordination façade over the membership provider.
pub mod coordinator;

/// Registry of consensus-server addresses.
pub mod registry;

/// Implementation of gRPC services.
pub mod service;

use anyhow::{bail, Context, Result};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

pub use coordinator::{AgentConfig, AgentSelf, ClusterCoordinator, JoinResult};
pub use membership::{Member, MemberStatus, MembershipProvider};
pub use registry::ServerRegistry;

mod generated {
    pub mod overseer {
        tonic::include_proto!("overseer");
    }
    pub mod overseer_gossip {
        tonic::include_proto!("overseer_gossip");
    }
}

/// `host:port` of a consensus server.
/// Parsing is the only constructor, so a stored address is always
/// non-empty and well-formed.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Hash, Debug, Display)]
pub struct ServerAddress(String);

impl ServerAddress {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for ServerAddress {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let Some((host, port)) = s.rsplit_once(':') else {
            bail!(Error::InvalidServerAddress(s.to_owned()));
        };
        if host.is_empty() || port.parse::<u16>().is_err() {
            bail!(Error::InvalidServerAddress(s.to_owned()));
        }
        Ok(Self(s.to_owned()))
    }
}
