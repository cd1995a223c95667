//! Electrical state of a nanowire network.

use log::{debug, info};
use nalgebra::{DMatrix, DVector};

use crate::datasheet::Datasheet;
use crate::error::{Error, Result};
use crate::geometry::{ComponentMap, Geometry};

/// Mutable electrical state layered over a frozen geometry.
///
/// Node indices are partitioned contiguously: device wires first, then the
/// device grounds (the last device indices by convention), then any
/// external grounds appended at the tail. The conductance matrix
/// (`circuit`), the kinetic state (`admittance`) and the junction voltage
/// drops (`delta_voltage`) all share the adjacency sparsity pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct Network {
    /// Symmetric boolean node adjacency, grown by external connections.
    pub adjacency: DMatrix<bool>,
    /// Wire centroid positions, device wires only.
    pub wires_position: (DVector<f64>, DVector<f64>),
    /// Junction positions on the device adjacency pattern.
    pub junctions_position: (DMatrix<f64>, DMatrix<f64>),

    /// Junction conductances in siemens (`Y`).
    pub circuit: DMatrix<f64>,
    /// Junction kinetic state in `[0, 1]` (`g`).
    pub admittance: DMatrix<f64>,
    /// Last observed voltage drop across each junction.
    pub delta_voltage: DMatrix<f64>,
    /// Node voltages in volts.
    pub voltage: DVector<f64>,

    /// Wire nodes clamped to ground, occupying the last device indices.
    pub device_grounds: usize,
    /// External load nodes appended after the device nodes.
    pub external_grounds: usize,
}

/// Allocate the electrical state for a geometry.
///
/// The geometry is first reduced to its largest connected component;
/// orphan wires never reach the electrical graph. Junction conductances
/// start at `initial_conductance` everywhere the adjacency is set, the
/// kinetic state at zero, all voltages at zero. The returned map
/// translates pre-reduction wire indices.
pub fn build_network(
    datasheet: &Datasheet,
    geometry: &Geometry,
    initial_conductance: f64,
    device_grounds: usize,
) -> Result<(Network, ComponentMap)> {
    if initial_conductance < datasheet.y_min || initial_conductance > datasheet.y_max {
        return Err(Error::InvalidParameter {
            name: "initial_conductance",
            value: initial_conductance,
        });
    }

    let (reduced, map) = geometry.largest_component();
    let n = reduced.wire_count();
    if device_grounds >= n {
        return Err(Error::InvalidParameter {
            name: "device_grounds",
            value: device_grounds as f64,
        });
    }

    info!(
        "building network: {} wires, {} junctions, {} device grounds",
        n,
        reduced.junction_count(),
        device_grounds
    );

    let circuit = DMatrix::from_fn(n, n, |i, j| {
        if reduced.adjacency[(i, j)] {
            initial_conductance
        } else {
            0.0
        }
    });

    let network = Network {
        adjacency: reduced.adjacency.clone(),
        wires_position: (reduced.wires.xc.clone(), reduced.wires.yc.clone()),
        junctions_position: (reduced.junction_x.clone(), reduced.junction_y.clone()),
        circuit,
        admittance: DMatrix::zeros(n, n),
        delta_voltage: DMatrix::zeros(n, n),
        voltage: DVector::zeros(n),
        device_grounds,
        external_grounds: 0,
    };

    Ok((network, map))
}

impl Network {
    /// Total node count, grounds included.
    pub fn nodes(&self) -> usize {
        self.adjacency.nrows()
    }

    /// Non-ground node count.
    pub fn wires(&self) -> usize {
        self.nodes() - self.grounds()
    }

    /// Ground node count, device and external.
    pub fn grounds(&self) -> usize {
        self.device_grounds + self.external_grounds
    }

    /// Node count excluding the external tail; the memristive block.
    pub fn device_nodes(&self) -> usize {
        self.nodes() - self.external_grounds
    }

    /// Whether `node` is clamped to ground.
    pub fn is_ground(&self, node: usize) -> bool {
        node >= self.wires() && node < self.nodes()
    }

    /// Attach an external load between `wire` and a fresh ground node.
    ///
    /// Grows every matrix by one row and column; the new edge carries the
    /// load conductance `1/resistance` and no kinetic state (the load is
    /// ohmic, not memristive).
    pub fn connect(&mut self, wire: usize, resistance: f64) -> Result<()> {
        let nodes = self.nodes();
        if wire >= nodes {
            return Err(Error::InvalidIndex { index: wire, nodes });
        }
        if !resistance.is_finite() || resistance <= 0.0 {
            return Err(Error::InvalidParameter {
                name: "resistance",
                value: resistance,
            });
        }

        debug!("connecting load of {} ohm to wire {}", resistance, wire);

        let grown = nodes + 1;
        self.adjacency = self.adjacency.clone().resize(grown, grown, false);
        self.adjacency[(wire, nodes)] = true;
        self.adjacency[(nodes, wire)] = true;

        self.circuit = self.circuit.clone().resize(grown, grown, 0.0);
        let conductance = 1.0 / resistance;
        self.circuit[(wire, nodes)] = conductance;
        self.circuit[(nodes, wire)] = conductance;

        self.admittance = self.admittance.clone().resize(grown, grown, 0.0);
        self.delta_voltage = self.delta_voltage.clone().resize(grown, grown, 0.0);
        self.voltage = self.voltage.clone().resize_vertically(grown, 0.0);

        self.external_grounds += 1;
        Ok(())
    }

    /// Detach every external load, restoring the pre-connection shape.
    pub fn disconnect(&mut self) {
        if self.external_grounds == 0 {
            return;
        }

        debug!("disconnecting {} external loads", self.external_grounds);

        let keep = self.nodes() - self.external_grounds;
        self.adjacency = self.adjacency.clone().resize(keep, keep, false);
        self.circuit = self.circuit.clone().resize(keep, keep, 0.0);
        self.admittance = self.admittance.clone().resize(keep, keep, 0.0);
        self.delta_voltage = self.delta_voltage.clone().resize(keep, keep, 0.0);
        self.voltage = self.voltage.clone().resize_vertically(keep, 0.0);
        self.external_grounds = 0;
    }

    /// Independent deep copy for recording and offline analysis.
    ///
    /// The snapshot shares nothing with the live network; later mutation
    /// of either side leaves the other untouched.
    pub fn snapshot(&self) -> Network {
        self.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::generate_geometry;

    fn test_datasheet() -> Datasheet {
        Datasheet {
            wires_count: 80,
            lx: 150.0,
            ly: 150.0,
            ..Datasheet::default()
        }
    }

    fn test_network() -> Network {
        let ds = test_datasheet();
        let geometry = generate_geometry(&ds, ds.seed).unwrap();
        build_network(&ds, &geometry, ds.y_min, 1).unwrap().0
    }

    #[test]
    fn build_allocates_initial_state() {
        let ds = test_datasheet();
        let geometry = generate_geometry(&ds, ds.seed).unwrap();
        let (network, map) = build_network(&ds, &geometry, ds.y_min, 2).unwrap();

        assert_eq!(network.nodes(), map.retained_count());
        assert_eq!(network.device_grounds, 2);
        assert_eq!(network.external_grounds, 0);
        assert_eq!(network.wires(), network.nodes() - 2);
        assert!(network.voltage.iter().all(|&v| v == 0.0));

        for i in 0..network.nodes() {
            for j in 0..network.nodes() {
                if network.adjacency[(i, j)] {
                    assert_eq!(network.circuit[(i, j)], ds.y_min);
                } else {
                    assert_eq!(network.circuit[(i, j)], 0.0);
                }
                assert_eq!(network.admittance[(i, j)], 0.0);
            }
        }
    }

    #[test]
    fn build_rejects_out_of_bound_initial_conductance() {
        let ds = test_datasheet();
        let geometry = generate_geometry(&ds, ds.seed).unwrap();
        assert!(matches!(
            build_network(&ds, &geometry, ds.y_max * 2.0, 0),
            Err(Error::InvalidParameter { .. })
        ));
    }

    #[test]
    fn build_rejects_too_many_device_grounds() {
        let ds = test_datasheet();
        let geometry = generate_geometry(&ds, ds.seed).unwrap();
        let n = geometry.largest_component().0.wire_count();
        assert!(matches!(
            build_network(&ds, &geometry, ds.y_min, n),
            Err(Error::InvalidParameter { .. })
        ));
    }

    #[test]
    fn connect_appends_one_external_ground() {
        let mut network = test_network();
        let nodes = network.nodes();

        network.connect(0, 100.0).unwrap();

        assert_eq!(network.nodes(), nodes + 1);
        assert_eq!(network.external_grounds, 1);
        assert!(network.adjacency[(0, nodes)]);
        assert!(network.adjacency[(nodes, 0)]);
        assert_eq!(network.circuit[(0, nodes)], 0.01);
        assert_eq!(network.circuit[(nodes, 0)], 0.01);
        assert_eq!(network.admittance[(0, nodes)], 0.0);
        assert_eq!(network.voltage[nodes], 0.0);
        assert!(network.is_ground(nodes));
    }

    #[test]
    fn connect_rejects_bad_arguments() {
        let mut network = test_network();
        let nodes = network.nodes();
        assert_eq!(
            network.connect(nodes, 100.0),
            Err(Error::InvalidIndex {
                index: nodes,
                nodes
            })
        );
        assert!(matches!(
            network.connect(0, 0.0),
            Err(Error::InvalidParameter { .. })
        ));
        assert!(matches!(
            network.connect(0, -5.0),
            Err(Error::InvalidParameter { .. })
        ));
    }

    #[test]
    fn connect_then_disconnect_round_trips() {
        let mut network = test_network();
        let before = network.snapshot();

        network.connect(3, 1000.0).unwrap();
        network.connect(5, 2000.0).unwrap();
        assert_eq!(network.external_grounds, 2);

        network.disconnect();
        assert_eq!(network, before);
    }

    #[test]
    fn disconnect_without_externals_is_a_noop() {
        let mut network = test_network();
        let before = network.snapshot();
        network.disconnect();
        assert_eq!(network, before);
    }

    #[test]
    fn snapshot_is_independent() {
        let mut network = test_network();
        let snapshot = network.snapshot();

        network.voltage[0] = 42.0;
        network.circuit[(0, 0)] = 9.0;
        network.connect(1, 10.0).unwrap();

        assert_eq!(snapshot.voltage[0], 0.0);
        assert_eq!(snapshot.circuit[(0, 0)], 0.0);
        assert_eq!(snapshot.external_grounds, 0);
    }

    #[test]
    fn ground_partition_is_a_suffix() {
        let mut network = test_network();
        network.connect(0, 100.0).unwrap();

        let wires = network.wires();
        for node in 0..network.nodes() {
            assert_eq!(network.is_ground(node), node >= wires);
        }
        assert_eq!(network.grounds(), network.device_grounds + 1);
        assert_eq!(network.device_nodes(), network.nodes() - 1);
    }
}
