//! Event relay between the land server and the scene.
//!
//! A [`Session`] owns everything one connected viewer knows: the session
//! configuration, the scene graph and the land scene model. Decoded server
//! events go through [`Session::handle`], which is the only place that maps
//! event names to handlers.

pub mod error;
pub mod session;
pub mod transport;

pub use error::*;
pub use session::*;
pub use transport::*;
