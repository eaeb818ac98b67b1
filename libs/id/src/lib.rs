//! # nomad-run-id
//!
//! Validated identifier and port types shared by every nomad-run crate.
//!
//! ## Design Principles
//!
//! - Values are parsed once, at the boundary, and carried typed afterwards
//! - A `Port` is always a non-zero `u16`; there is no string form in flight
//! - A `JobId` is safe to embed in an HCL string literal and a URL path segment
//!
//! ## Examples
//!
//! ```
//! use nomad_run_id::{JobId, Port};
//!
//! let id: JobId = "billing-api".parse().unwrap();
//! let port: Port = "8080".parse().unwrap();
//! assert_eq!(id.as_str(), "billing-api");
//! assert_eq!(port.get(), 8080);
//! ```

mod error;
mod types;

pub use error::IdError;
pub use types::*;
