//! Persistence for nanowire devices.
//!
//! Collaborator-facing save/load of the four device documents:
//!
//! - [`graph`] - node-link view of the electrical state
//! - [`wires_doc`] - raw geometry arrays
//! - [`backup`] - file-level save/load plus the named connections map
//!
//! The datasheet serializes directly from `nanonet_core::Datasheet`.

pub mod backup;
pub mod error;
pub mod graph;
pub mod wires_doc;

pub use backup::{BackupPaths, Connections, load, save};
pub use error::{Error, Result};
pub use graph::{GraphDocument, LinkRecord, NodeRecord, network_from_graph, network_to_graph};
pub use wires_doc::{WiresDocument, geometry_from_wires, geometry_to_wires};
