use super::*;

/// Maps advertised `addr:port` strings to the member answering there.
/// Instances sharing one directory see each other as a network.
#[derive(Default)]
pub struct MemberDirectory {
    entries: spin::RwLock<HashMap<String, Member>>,
}

impl MemberDirectory {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn register(&self, member: Member) {
        self.entries.write().insert(member.advertise_addr(), member);
    }

    fn resolve(&self, address: &str) -> Option<Member> {
        self.entries.read().get(address).cloned()
    }
}

/// Deterministic in-memory provider standing in for the gossip sidecar.
pub struct InMemoryMembership {
    local: Member,
    network: Arc<MemberDirectory>,
    members: spin::RwLock<HashMap<String, Member>>,
}

impl InMemoryMembership {
    /// Create a provider for `local` and register it into `network` so
    /// other instances can join it.
    pub fn new(local: Member, network: Arc<MemberDirectory>) -> Self {
        network.register(local.clone());
        let mut members = HashMap::new();
        members.insert(local.name.clone(), local.clone());
        Self {
            local,
            network,
            members: members.into(),
        }
    }

    /// Provider on a private network that contains only `local`.
    pub fn standalone(local: Member) -> Self {
        Self::new(local, MemberDirectory::new())
    }
}

#[async_trait]
impl MembershipProvider for InMemoryMembership {
    async fn local_member(&self) -> Result<Member> {
        Ok(self.local.clone())
    }

    async fn members(&self) -> Result<Vec<Member>> {
        let mut out: Vec<Member> = self.members.read().values().cloned().collect();
        out.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(out)
    }

    async fn join(&self, addresses: &[String]) -> JoinOutcome {
        let mut num_joined = 0;
        let mut failures = vec![];
        for address in addresses {
            match self.network.resolve(address) {
                Some(member) => {
                    // A duplicate target is attempted and counted again;
                    // the member table itself is keyed by name.
                    self.members.write().insert(member.name.clone(), member);
                    num_joined += 1;
                }
                None => failures.push(format!("{address}: connection refused")),
            }
        }
        let error = if failures.is_empty() {
            None
        } else {
            Some(anyhow::anyhow!(failures.join("; ")))
        };
        JoinOutcome { num_joined, error }
    }

    async fn force_leave(&self, node_name: &str) -> Result<()> {
        // Leaving an unknown or already-left node is not an error.
        if let Some(member) = self.members.write().get_mut(node_name) {
            member.status = MemberStatus::Left;
        }
        Ok(())
    }
}
