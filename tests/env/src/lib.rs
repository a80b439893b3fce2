use anyhow::Result;
use overseer::membership::{GossipMembership, InMemoryMembership, MemberDirectory};
use overseer::{AgentConfig, ClusterCoordinator, Member, MemberStatus, ServerRegistry};
use std::collections::HashMap;
use std::sync::{Arc, Once};
use std::time::Duration;
use tonic::transport::{Channel, Endpoint, Uri};
use tracing::info;

static INIT: Once = Once::new();

struct Node {
    port: u16,
    abort_tx0: Option<tokio::sync::oneshot::Sender<()>>,
}
impl Node {
    fn new(id: u8, port: u16, network: Arc<MemberDirectory>) -> Result<Self> {
        let nd_tag = format!("ND{port}>");
        let (tx, rx) = tokio::sync::oneshot::channel();

        let svc_task = async move {
            info!("add (id={id})");

            let local = Member {
                name: format!("node{id}"),
                addr: "127.0.0.1".to_owned(),
                port,
                tags: HashMap::from([("role".to_owned(), "server".to_owned())]),
                status: MemberStatus::Alive,
            };
            let provider = Arc::new(InMemoryMembership::new(local, network));
            let gossip_svc = overseer::service::gossip::new(provider);

            // The coordinator consumes its own sidecar over gRPC,
            // exactly as in production.
            let sidecar: Uri = format!("http://127.0.0.1:{port}").parse().unwrap();
            let adapter = Arc::new(GossipMembership::new(sidecar));
            let config = AgentConfig {
                node_name: format!("node{id}"),
                datacenter: "dc1".to_owned(),
                region: "global".to_owned(),
                advertise_addr: format!("127.0.0.1:{port}"),
                server: true,
                version: env!("CARGO_PKG_VERSION").to_owned(),
            };
            let coordinator = ClusterCoordinator::new(config, adapter);
            let registry = Arc::new(ServerRegistry::new());

            let agent_svc = overseer::service::agent::new(coordinator, registry);
            let reflection_svc = overseer::service::reflection::new();

            let socket = format!("127.0.0.1:{port}").parse().unwrap();

            let mut builder = tonic::transport::Server::builder();
            builder
                .add_service(agent_svc)
                .add_service(gossip_svc)
                .add_service(reflection_svc)
                .serve_with_shutdown(socket, async {
                    info!("remove (id={id})");
                    rx.await.ok();
                })
                .await
                .unwrap();
        };

        std::thread::Builder::new()
            .name(nd_tag.clone())
            .spawn(move || {
                let runtime = tokio::runtime::Builder::new_multi_thread()
                    .thread_name(nd_tag)
                    .enable_all()
                    .build()
                    .unwrap();
                runtime.block_on(svc_task);
            })?;

        Ok(Self {
            port,
            abort_tx0: Some(tx),
        })
    }

    fn address(&self) -> Uri {
        let uri = format!("http://127.0.0.1:{}", self.port);
        Uri::from_maybe_shared(uri).unwrap()
    }
}
impl Drop for Node {
    fn drop(&mut self) {
        let tx = self.abort_tx0.take().unwrap();
        tx.send(()).ok();
    }
}

pub struct Env {
    network: Arc<MemberDirectory>,
    nodes: HashMap<u8, Node>,
    conn_cache: spin::Mutex<HashMap<u8, Channel>>,
}
impl Env {
    pub fn new(with_logging: bool) -> Self {
        INIT.call_once(|| {
            // On terminating the tokio runtime,
            // flooding stack traces are printed and they are super noisy.
            // Until better idea is invented, we just suppress them.
            std::panic::set_hook(Box::new(|_info| {}));

            if with_logging {
                let format = tracing_subscriber::fmt::format()
                    .with_target(false)
                    .with_thread_names(true)
                    .compact();
                tracing_subscriber::fmt().event_format(format).init();
            }
        });
        Self {
            network: MemberDirectory::new(),
            nodes: HashMap::new(),
            conn_cache: spin::Mutex::new(HashMap::new()),
        }
    }

    pub fn add_node(&mut self, id: u8) {
        let free_port = port_check::free_local_ipv4_port().unwrap();
        let node = Node::new(id, free_port, self.network.clone()).unwrap();
        port_check::is_port_reachable_with_timeout(
            format!("127.0.0.1:{free_port}"),
            Duration::from_secs(5),
        );
        self.nodes.insert(id, node);
    }

    pub fn remove_node(&mut self, id: u8) {
        if let Some(_node) = self.nodes.remove(&id) {
            // node is dropped
        }
    }

    pub fn get_connection(&self, id: u8) -> Channel {
        self.conn_cache
            .lock()
            .entry(id)
            .or_insert_with(|| {
                let uri = self.nodes.get(&id).unwrap().address();
                let endpoint = Endpoint::from(uri)
                    .http2_keep_alive_interval(std::time::Duration::from_secs(1))
                    .keep_alive_while_idle(true)
                    .timeout(std::time::Duration::from_secs(5))
                    .connect_timeout(std::time::Duration::from_secs(5));
                endpoint.connect_lazy()
            })
            .clone()
    }

    pub fn address(&self, id: u8) -> Uri {
        self.nodes.get(&id).unwrap().address()
    }

    /// Gossip address other nodes use to join node `id`.
    pub fn advertise_addr(&self, id: u8) -> String {
        format!("127.0.0.1:{}", self.nodes.get(&id).unwrap().port)
    }

    pub async fn check_connectivity(&self, id: u8) -> Result<()> {
        for _ in 0..50 {
            let uri = self.nodes.get(&id).unwrap().address();
            let endpoint =
                Endpoint::from(uri).connect_timeout(std::time::Duration::from_millis(100));
            match endpoint.connect().await {
                Ok(_) => return Ok(()),
                Err(_) => {
                    tokio::time::sleep(std::time::Duration::from_millis(100)).await;
                }
            }
        }
        anyhow::bail!("failed to connect to id={}", id);
    }
}
