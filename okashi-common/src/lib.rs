//! Common utilities shared across the okashi crates.
//!
//! Kept deliberately small so every crate in the workspace can depend on it
//! without pulling in the HTTP or terminal stacks.
//!
//! - [`observability`]: centralised tracing/logging initialisation
//!
//! ```rust
//! use okashi_common::observability::{LogConfig, LogFormat};
//!
//! let cfg = LogConfig {
//!     format: LogFormat::Json,
//!     ..LogConfig::default()
//! };
//! assert_eq!(cfg.app_name, "okashi");
//! assert_eq!(cfg.default_filter, "info");
//! ```
pub mod observability;
