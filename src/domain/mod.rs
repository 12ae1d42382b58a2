//! Domain layer containing the realtime core's types and state.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (IDs, timestamps, errors, event envelope)
//! - `connection` - Push channel status machine and reconnection policy
//! - `notification` - Notification entity, inbox and shared store

pub mod connection;
pub mod foundation;
pub mod notification;
