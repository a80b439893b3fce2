use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("missing join address")]
    MissingJoinAddress,
    #[error("missing node name")]
    MissingNodeName,
    #[error("missing server address")]
    MissingServerAddress,
    #[error("invalid server address: {0}")]
    InvalidServerAddress(String),
}
