//! Wires document: the raw geometry arrays.
//!
//! Everything needed to rebuild a `Geometry` without resampling: endpoint
//! and centroid arrays, junction coordinates with their wire pairs, the
//! adjacency matrix and the centroid distance matrix. Arrays are emitted
//! as JSON lists and coerced back into vectors and matrices on load.

use nalgebra::{DMatrix, DVector};
use nanonet_core::{Error as CoreError, Geometry, Junction, WireDistribution};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// The persisted geometry arrays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WiresDocument {
    pub number_of_wires: usize,
    pub number_of_junctions: usize,
    pub length_x: f64,
    pub length_y: f64,
    pub seed: u64,

    pub xa: Vec<f64>,
    pub ya: Vec<f64>,
    pub xb: Vec<f64>,
    pub yb: Vec<f64>,
    pub xc: Vec<f64>,
    pub yc: Vec<f64>,
    pub theta: Vec<f64>,
    pub wire_lengths: Vec<f64>,
    pub outside: Vec<u32>,

    /// Junction wire pairs, aligned with `xi`/`yi`.
    pub edge_list: Vec<(usize, usize)>,
    pub xi: Vec<f64>,
    pub yi: Vec<f64>,

    pub wire_distances: Vec<Vec<f64>>,
    pub adj_matrix: Vec<Vec<f64>>,
}

/// Flatten a geometry into its persisted arrays.
pub fn geometry_to_wires(geometry: &Geometry) -> WiresDocument {
    let wires = &geometry.wires;
    let n = wires.count();

    WiresDocument {
        number_of_wires: n,
        number_of_junctions: geometry.junction_count(),
        length_x: geometry.lx,
        length_y: geometry.ly,
        seed: geometry.seed,
        xa: wires.xa.iter().copied().collect(),
        ya: wires.ya.iter().copied().collect(),
        xb: wires.xb.iter().copied().collect(),
        yb: wires.yb.iter().copied().collect(),
        xc: wires.xc.iter().copied().collect(),
        yc: wires.yc.iter().copied().collect(),
        theta: wires.theta.iter().copied().collect(),
        wire_lengths: wires.lengths.iter().copied().collect(),
        outside: wires.outside.clone(),
        edge_list: geometry.junctions.iter().map(|j| (j.first, j.second)).collect(),
        xi: geometry.junctions.iter().map(|j| j.x).collect(),
        yi: geometry.junctions.iter().map(|j| j.y).collect(),
        wire_distances: (0..n)
            .map(|i| (0..n).map(|j| wires.distances[(i, j)]).collect())
            .collect(),
        adj_matrix: (0..n)
            .map(|i| {
                (0..n)
                    .map(|j| if geometry.adjacency[(i, j)] { 1.0 } else { 0.0 })
                    .collect()
            })
            .collect(),
    }
}

/// Rebuild a geometry from its persisted arrays.
///
/// The adjacency is reassembled from the edge list; array lengths must
/// agree with the declared counts.
pub fn geometry_from_wires(document: &WiresDocument) -> Result<Geometry> {
    let n = document.number_of_wires;

    for (name, len) in [
        ("xa", document.xa.len()),
        ("ya", document.ya.len()),
        ("xb", document.xb.len()),
        ("yb", document.yb.len()),
        ("xc", document.xc.len()),
        ("yc", document.yc.len()),
        ("theta", document.theta.len()),
        ("wire_lengths", document.wire_lengths.len()),
        ("outside", document.outside.len()),
    ] {
        if len != n {
            log::warn!("wires document field {} has length {} (expected {})", name, len, n);
            return Err(CoreError::DimensionMismatch {
                expected: n,
                actual: len,
            }
            .into());
        }
    }
    let junctions = document.number_of_junctions;
    if document.edge_list.len() != junctions
        || document.xi.len() != junctions
        || document.yi.len() != junctions
    {
        return Err(CoreError::DimensionMismatch {
            expected: junctions,
            actual: document.edge_list.len(),
        }
        .into());
    }

    let to_vector = |values: &[f64]| DVector::from_column_slice(values);
    let to_matrix = |rows: &[Vec<f64>]| -> Result<DMatrix<f64>> {
        let mut matrix = DMatrix::zeros(n, n);
        if rows.len() != n {
            return Err(CoreError::DimensionMismatch {
                expected: n,
                actual: rows.len(),
            }
            .into());
        }
        for (i, row) in rows.iter().enumerate() {
            if row.len() != n {
                return Err(CoreError::DimensionMismatch {
                    expected: n,
                    actual: row.len(),
                }
                .into());
            }
            for (j, &value) in row.iter().enumerate() {
                matrix[(i, j)] = value;
            }
        }
        Ok(matrix)
    };

    let wires = WireDistribution {
        xc: to_vector(&document.xc),
        yc: to_vector(&document.yc),
        xa: to_vector(&document.xa),
        ya: to_vector(&document.ya),
        xb: to_vector(&document.xb),
        yb: to_vector(&document.yb),
        theta: to_vector(&document.theta),
        lengths: to_vector(&document.wire_lengths),
        distances: to_matrix(&document.wire_distances)?,
        outside: document.outside.clone(),
    };

    let mut adjacency = DMatrix::from_element(n, n, false);
    let mut junction_x = DMatrix::zeros(n, n);
    let mut junction_y = DMatrix::zeros(n, n);
    let mut junction_records = Vec::with_capacity(junctions);
    for (k, &(first, second)) in document.edge_list.iter().enumerate() {
        if first >= n || second >= n {
            return Err(CoreError::InvalidIndex {
                index: first.max(second),
                nodes: n,
            }
            .into());
        }
        let (x, y) = (document.xi[k], document.yi[k]);
        adjacency[(first, second)] = true;
        adjacency[(second, first)] = true;
        junction_x[(first, second)] = x;
        junction_x[(second, first)] = x;
        junction_y[(first, second)] = y;
        junction_y[(second, first)] = y;
        junction_records.push(Junction {
            first,
            second,
            x,
            y,
        });
    }

    Ok(Geometry {
        wires,
        junctions: junction_records,
        adjacency,
        junction_x,
        junction_y,
        lx: document.length_x,
        ly: document.length_y,
        seed: document.seed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use nanonet_core::{Datasheet, generate_geometry};

    fn sample_geometry() -> Geometry {
        let ds = Datasheet {
            wires_count: 50,
            lx: 120.0,
            ly: 120.0,
            ..Datasheet::default()
        };
        generate_geometry(&ds, ds.seed).unwrap()
    }

    #[test]
    fn document_round_trips() {
        let geometry = sample_geometry();
        let document = geometry_to_wires(&geometry);
        let restored = geometry_from_wires(&document).unwrap();
        assert_eq!(restored, geometry);
    }

    #[test]
    fn json_round_trips() {
        let geometry = sample_geometry();
        let document = geometry_to_wires(&geometry);

        let json = serde_json::to_string(&document).unwrap();
        let parsed: WiresDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(geometry_from_wires(&parsed).unwrap(), geometry);
    }

    #[test]
    fn truncated_arrays_are_rejected() {
        let geometry = sample_geometry();
        let mut document = geometry_to_wires(&geometry);
        document.theta.pop();
        assert!(geometry_from_wires(&document).is_err());
    }

    #[test]
    fn edge_list_out_of_range_is_rejected() {
        let geometry = sample_geometry();
        let mut document = geometry_to_wires(&geometry);
        document.edge_list[0] = (0, document.number_of_wires + 3);
        assert!(geometry_from_wires(&document).is_err());
    }
}
