//! Core representation of a memristive nanowire network.
//!
//! This crate covers the static and mutable halves of a simulated device:
//!
//! - [`datasheet`] - immutable physical description of a device
//! - [`wires`] - wire distribution sampling and junction detection
//! - [`geometry`] - adjacency assembly and largest-component reduction
//! - [`network`] - electrical state, external loads, snapshots
//!
//! Solving and kinetic updates live in their own crates; this one only
//! owns the data they operate on.

pub mod datasheet;
pub mod error;
pub mod geometry;
pub mod network;
pub mod wires;

pub use datasheet::Datasheet;
pub use error::{Error, Result};
pub use geometry::{ComponentMap, Geometry, generate_geometry};
pub use network::{Network, build_network};
pub use wires::{Junction, WireDistribution, detect_junctions, generate_wires};
