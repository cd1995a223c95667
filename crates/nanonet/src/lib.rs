//! Memristive nanowire network simulator.
//!
//! A random planar mesh of conductive nanowires is generated from a
//! [`Datasheet`]; every pairwise wire crossing is a memristive junction
//! whose conductance grows under applied voltage and decays otherwise.
//! [`stimulate`] drives one simulation step: the Miranda kinetic update
//! advances every junction, then modified nodal analysis solves the
//! resulting resistor network for node voltages.
//!
//! ```no_run
//! use std::collections::HashMap;
//! use nanonet::{Datasheet, build_network, generate_geometry, stimulate};
//!
//! let datasheet = Datasheet::default();
//! let geometry = generate_geometry(&datasheet, datasheet.seed)?;
//! let (mut network, _map) = build_network(&datasheet, &geometry, datasheet.y_min, 1)?;
//!
//! let inputs = HashMap::from([(0, 5.0)]);
//! for _ in 0..100 {
//!     stimulate(&mut network, &datasheet, 0.05, &inputs)?;
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::collections::HashMap;

pub use nanonet_core::{
    ComponentMap, Datasheet, Error as CoreError, Geometry, Junction, Network, WireDistribution,
    build_network, detect_junctions, generate_geometry, generate_wires,
};
pub use nanonet_devices::{depression_rate, potentiation_rate, steady_state, update_conductance};
pub use nanonet_io as io;
pub use nanonet_solver::{Error as SolverError, SPARSE_THRESHOLD, solve, solve_dense, solve_sparse};

/// Run one full simulation step on the network.
///
/// The step is atomic and strictly ordered: the kinetic update advances
/// every junction from the pre-step voltages, then the solver computes
/// the new node voltages from the updated conductances and writes them
/// back. `inputs` maps non-ground node indices to applied voltages.
pub fn stimulate(
    network: &mut Network,
    datasheet: &Datasheet,
    delta_time: f64,
    inputs: &HashMap<usize, f64>,
) -> nanonet_solver::Result<()> {
    update_conductance(network, datasheet, delta_time);
    solve(network, inputs)
}
