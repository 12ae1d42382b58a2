//! Connection module - push channel lifecycle types.

mod reconnect;
mod status;

pub use reconnect::ReconnectPolicy;
pub use status::{ConnectionState, ConnectionStatus};
