//! # patchbay
//!
//! Data-model primitives for a node/port dataflow system. Processing nodes
//! (external to this crate) own collections of typed connection points and
//! get wired together through them:
//!
//! - [`Input`]: consumes a value produced elsewhere via a late-bound
//!   (node id, output name) link, resolved at read time
//! - [`Output`]: produces one value per cycle, exposed as a
//!   single-assignment [`Deferred`] result that readers may await before
//!   the producer has supplied it
//! - [`Property`]: a locally-owned, typed configuration value with a
//!   stage/commit (amend) write protocol
//! - [`PortInfo`]: the descriptive record every port carries
//!
//! Link resolution goes through [`NodeLookup`]; [`NodeRegistry`] is the
//! default HashMap-backed implementation and [`OutputSource`] is the
//! contract a node implements to be linkable. No executor, scheduler, or
//! graph engine lives here; those are external collaborators.
//!
//! [`DirFileAppender`] is a small logging utility on the side: a
//! `tracing-subscriber` file sink that creates the target directory tree
//! before opening the log file.

pub mod error;
pub mod input;
pub mod logging;
pub mod output;
pub mod port;
pub mod property;
pub mod registry;

// Re-export main types for convenience
pub use error::PortError;
pub use input::{Input, Link};
pub use logging::{DirFileAppender, OpenMode};
pub use output::{Deferred, Output};
pub use port::{Port, PortInfo};
pub use property::{Property, PropertyType};
pub use registry::{NodeLookup, NodeRegistry, OutputSource};

/// Result type alias using PortError
pub type Result<T> = std::result::Result<T, PortError>;
