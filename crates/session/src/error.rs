use protocol::{LandId, ProtocolError};

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("received {event} before session variables")]
    NotConfigured { event: &'static str },
    #[error("session variables were already received")]
    AlreadyConfigured,
    #[error("invalid session variables: land size must be positive, got {0}")]
    InvalidConfig(f64),
    #[error("map data was already loaded")]
    MapAlreadyLoaded,
    #[error("map data lists land {0} more than once")]
    DuplicateLand(LandId),
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}
