//! SafeGuard Realtime - event distribution and notification state for the
//! workplace-safety dashboard.
//!
//! One authenticated push connection feeds an in-process event registry;
//! domain adapters translate incident, PPE, training, and project events
//! into a bounded, deduplicated notification store that the UI observes.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
