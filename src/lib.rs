pub mod boundary;
pub mod config;
pub mod errors;
pub mod events;
pub mod handle;
pub mod node;
pub mod pipeline;
pub mod protocol;
pub mod session;
pub mod style;
pub mod transport;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::BridgeConfig;
pub use errors::BridgeError;
pub use session::{BridgeSession, HostMount, SessionRegistry};
