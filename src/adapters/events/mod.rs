//! Event registry adapters.
//!
//! - `InProcessEventRegistry` - Synchronous, isolated, in-process fan-out

mod in_process;

pub use in_process::InProcessEventRegistry;
