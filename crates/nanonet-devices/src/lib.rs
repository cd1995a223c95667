//! Memristive junction device models.
//!
//! The only device in a nanowire network is the wire-to-wire junction,
//! modelled after Miranda's filamentary switching kinetics. The model is
//! a pure elementwise map over the adjacency mask: no junction couples to
//! another within a single update.

pub mod miranda;

pub use miranda::{depression_rate, potentiation_rate, steady_state, update_conductance};
