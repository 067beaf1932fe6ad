#![forbid(unsafe_code)]
//! threadnet-core library.
//!
//! # Conventions
//!
//! - **Errors**: Typed `thiserror` enums ([`error::TableError`],
//!   [`error::ConfigError`]); binaries wrap them in `anyhow`.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`,
//!   `trace!`). Libraries never install a subscriber.

pub mod config;
pub mod error;
pub mod io;
pub mod loader;
pub mod table;
pub mod text;
pub mod timestamp;

pub use error::{ConfigError, TableError};
pub use loader::{DatasetSummary, TableLoader};
pub use table::{Column, Table, Value};
pub use text::CleaningMethod;

/// Column names of the forum message export.
pub mod columns {
    /// Author identifier.
    pub const AUTHOR: &str = "msg_author_id";
    /// Topic (thread) identifier.
    pub const TOPIC: &str = "msg_topic_id";
    /// Posting time, UNIX seconds.
    pub const DATE: &str = "msg_date";
    /// Poster IP address.
    pub const IP_ADDRESS: &str = "msg_ip_address";
    /// Message body.
    pub const POST: &str = "msg_post";
}
