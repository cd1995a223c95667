//! Node-link document for the electrical graph.
//!
//! The persisted view is a labelled graph: one record per node carrying
//! its voltage and optional ground/position attributes, one record per
//! edge carrying the junction conductance, occupancy and position. The
//! live `Network` never mutates through this view; it is derived on
//! demand and rebuilt wholesale on load.

use nalgebra::{DMatrix, DVector};
use nanonet_core::{Error as CoreError, Network};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// One electrical node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: usize,
    /// Node voltage in volts.
    #[serde(rename = "V")]
    pub voltage: f64,
    /// Present and true on every ground node, device or external.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ground: Option<bool>,
    /// Present and true on external ground nodes only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external: Option<bool>,
    /// Wire centroid, absent for external grounds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pos: Option<(f64, f64)>,
}

/// One junction or load edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkRecord {
    pub source: usize,
    pub target: usize,
    /// Edge conductance in siemens.
    #[serde(rename = "Y")]
    pub conductance: f64,
    /// Kinetic occupancy; zero on ohmic load edges.
    pub g: f64,
    /// Junction position on the substrate.
    pub jx_pos: (f64, f64),
}

/// The persisted electrical graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphDocument {
    pub nodes: Vec<NodeRecord>,
    pub links: Vec<LinkRecord>,
}

/// Derive the node-link document from a live network.
pub fn network_to_graph(network: &Network) -> GraphDocument {
    let nodes = network.nodes();
    let wires = network.wires();
    let device = network.device_nodes();
    let (jx, jy) = &network.junctions_position;
    let (px, py) = &network.wires_position;

    let node_records = (0..nodes)
        .map(|id| NodeRecord {
            id,
            voltage: network.voltage[id],
            ground: (id >= wires).then_some(true),
            external: (id >= device).then_some(true),
            pos: (id < px.len()).then(|| (px[id], py[id])),
        })
        .collect();

    let mut links = Vec::new();
    for source in 0..nodes {
        for target in source + 1..nodes {
            if !network.adjacency[(source, target)] {
                continue;
            }
            let position = if source < jx.nrows() && target < jx.ncols() {
                (jx[(source, target)], jy[(source, target)])
            } else {
                (0.0, 0.0)
            };
            links.push(LinkRecord {
                source,
                target,
                conductance: network.circuit[(source, target)],
                g: network.admittance[(source, target)],
                jx_pos: position,
            });
        }
    }

    GraphDocument {
        nodes: node_records,
        links,
    }
}

/// Rebuild a network from its node-link document.
///
/// Node ids must cover `0..nodes` exactly; edge endpoints must be in
/// range. Junction voltage drops are re-derived from the node voltages
/// rather than persisted.
pub fn network_from_graph(document: &GraphDocument) -> Result<Network> {
    let nodes = document.nodes.len();

    let mut voltage = DVector::zeros(nodes);
    let mut grounds = 0;
    let mut externals = 0;
    let mut positions: Vec<(f64, f64)> = Vec::new();
    for record in &document.nodes {
        if record.id >= nodes {
            return Err(CoreError::InvalidIndex {
                index: record.id,
                nodes,
            }
            .into());
        }
        voltage[record.id] = record.voltage;
        if record.ground.unwrap_or(false) {
            grounds += 1;
        }
        if record.external.unwrap_or(false) {
            externals += 1;
        }
        if let Some(pos) = record.pos {
            positions.push(pos);
        }
    }
    if externals > grounds {
        return Err(CoreError::DimensionMismatch {
            expected: grounds,
            actual: externals,
        }
        .into());
    }

    let device = nodes - externals;
    let mut adjacency = DMatrix::from_element(nodes, nodes, false);
    let mut circuit = DMatrix::zeros(nodes, nodes);
    let mut admittance = DMatrix::zeros(nodes, nodes);
    let mut delta_voltage = DMatrix::zeros(nodes, nodes);
    let mut junction_x = DMatrix::zeros(device, device);
    let mut junction_y = DMatrix::zeros(device, device);

    for link in &document.links {
        let (u, v) = (link.source, link.target);
        if u >= nodes || v >= nodes {
            return Err(CoreError::InvalidIndex {
                index: u.max(v),
                nodes,
            }
            .into());
        }
        adjacency[(u, v)] = true;
        adjacency[(v, u)] = true;
        circuit[(u, v)] = link.conductance;
        circuit[(v, u)] = link.conductance;
        admittance[(u, v)] = link.g;
        admittance[(v, u)] = link.g;
        let voltage_drop = (voltage[u] - voltage[v]).abs();
        delta_voltage[(u, v)] = voltage_drop;
        delta_voltage[(v, u)] = voltage_drop;
        if u < device && v < device {
            junction_x[(u, v)] = link.jx_pos.0;
            junction_x[(v, u)] = link.jx_pos.0;
            junction_y[(u, v)] = link.jx_pos.1;
            junction_y[(v, u)] = link.jx_pos.1;
        }
    }

    let px = DVector::from_fn(positions.len(), |i, _| positions[i].0);
    let py = DVector::from_fn(positions.len(), |i, _| positions[i].1);

    Ok(Network {
        adjacency,
        wires_position: (px, py),
        junctions_position: (junction_x, junction_y),
        circuit,
        admittance,
        delta_voltage,
        voltage,
        device_grounds: grounds - externals,
        external_grounds: externals,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use nanonet_core::{Datasheet, build_network, generate_geometry};

    fn sample_network() -> Network {
        let ds = Datasheet {
            wires_count: 60,
            lx: 120.0,
            ly: 120.0,
            ..Datasheet::default()
        };
        let geometry = generate_geometry(&ds, ds.seed).unwrap();
        let (mut network, _) = build_network(&ds, &geometry, ds.y_min, 1).unwrap();
        network.connect(0, 1000.0).unwrap();
        network
    }

    #[test]
    fn document_marks_ground_suffix() {
        let network = sample_network();
        let document = network_to_graph(&network);

        let wires = network.wires();
        let device = network.device_nodes();
        for record in &document.nodes {
            assert_eq!(record.ground, (record.id >= wires).then_some(true));
            assert_eq!(record.external, (record.id >= device).then_some(true));
            assert_eq!(record.pos.is_none(), record.id >= device);
        }
    }

    #[test]
    fn document_round_trips() {
        let network = sample_network();
        let document = network_to_graph(&network);
        let restored = network_from_graph(&document).unwrap();

        assert_eq!(restored.adjacency, network.adjacency);
        assert_eq!(restored.circuit, network.circuit);
        assert_eq!(restored.admittance, network.admittance);
        assert_eq!(restored.voltage, network.voltage);
        assert_eq!(restored.wires_position, network.wires_position);
        assert_eq!(restored.junctions_position, network.junctions_position);
        assert_eq!(restored.device_grounds, network.device_grounds);
        assert_eq!(restored.external_grounds, network.external_grounds);
    }

    #[test]
    fn json_lists_coerce_back() {
        let network = sample_network();
        let document = network_to_graph(&network);

        let json = serde_json::to_string(&document).unwrap();
        let parsed: GraphDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, document);
    }

    #[test]
    fn edge_out_of_range_is_rejected() {
        let document = GraphDocument {
            nodes: vec![
                NodeRecord {
                    id: 0,
                    voltage: 0.0,
                    ground: None,
                    external: None,
                    pos: Some((0.0, 0.0)),
                },
                NodeRecord {
                    id: 1,
                    voltage: 0.0,
                    ground: Some(true),
                    external: None,
                    pos: Some((1.0, 0.0)),
                },
            ],
            links: vec![LinkRecord {
                source: 0,
                target: 7,
                conductance: 1.0,
                g: 0.0,
                jx_pos: (0.5, 0.0),
            }],
        };

        assert!(network_from_graph(&document).is_err());
    }
}
