//! Modified nodal analysis over a nanowire network.
//!
//! The network's junction conductance matrix is turned into the grounded
//! Laplacian block `G`, bordered by one indicator column per voltage
//! source, and the resulting `[[G, B], [B', 0]]` system is solved for the
//! non-ground node voltages. Ground nodes are excluded from the unknowns
//! but their incident conductances still load the diagonal of `G`.
//!
//! Devices stay small enough that a dense factorization of the bordered
//! system is usually fastest; past [`SPARSE_THRESHOLD`] nodes the stamps
//! are handed to a sparse LU instead. Both paths produce the same
//! voltages to solver precision.

use std::collections::HashMap;

use faer::prelude::*;
use faer::sparse::{SparseColMat, Triplet};
use log::debug;
use nalgebra::{DMatrix, DVector};
use nanonet_core::Network;

use crate::error::{Error, Result};

/// Bordered systems with this many or more unknowns use the sparse path.
pub const SPARSE_THRESHOLD: usize = 50;

/// Solve the network for node voltages under the given source inputs.
///
/// `inputs` maps node index to applied voltage; keys must be non-ground
/// nodes. Inputs are processed in ascending node order, so the result does
/// not depend on the map's iteration order. On success the node voltage
/// vector is overwritten in place, with every ground node explicitly at
/// zero.
pub fn solve(network: &mut Network, inputs: &HashMap<usize, f64>) -> Result<()> {
    let nodes = network.nodes();
    let n = network.wires();
    let s = inputs.len();

    // deterministic source order
    let mut sources: Vec<(usize, f64)> = inputs.iter().map(|(&node, &v)| (node, v)).collect();
    sources.sort_unstable_by_key(|&(node, _)| node);
    for &(node, _) in &sources {
        if node >= n {
            return Err(Error::InvalidIndex {
                index: node,
                limit: n,
            });
        }
    }

    let size = n + s;
    debug!("assembling MNA system of dimension {}", size);

    let mut stamps: Vec<(usize, usize, f64)> = Vec::with_capacity(size * 4);
    for i in 0..n {
        // the diagonal sums every incident conductance, ground edges included
        let mut diagonal = 0.0;
        for j in 0..nodes {
            diagonal += network.circuit[(i, j)];
        }
        stamps.push((i, i, diagonal));

        for j in 0..n {
            if j != i && network.adjacency[(i, j)] {
                stamps.push((i, j, -network.circuit[(i, j)]));
            }
        }
    }

    let mut rhs = DVector::zeros(size);
    for (k, &(node, voltage)) in sources.iter().enumerate() {
        stamps.push((node, n + k, 1.0));
        stamps.push((n + k, node, 1.0));
        rhs[n + k] = voltage;
    }

    let solution = if size >= SPARSE_THRESHOLD {
        solve_sparse(size, &stamps, &rhs)?
    } else {
        let mut system = DMatrix::zeros(size, size);
        for &(row, col, value) in &stamps {
            system[(row, col)] += value;
        }
        solve_dense(&system, &rhs)?
    };

    for i in 0..n {
        network.voltage[i] = solution[i];
    }
    for ground in n..nodes {
        network.voltage[ground] = 0.0;
    }

    Ok(())
}

/// Solve an assembled bordered system with a dense LU factorization.
///
/// The source border makes the system indefinite despite the symmetric
/// Laplacian block, so a plain LU with partial pivoting is used rather
/// than a Cholesky. `SingularMatrix` marks a network where some wire
/// floats with no conductive path at all: its Laplacian row is zero.
pub fn solve_dense(system: &DMatrix<f64>, rhs: &DVector<f64>) -> Result<DVector<f64>> {
    if system.nrows() != system.ncols() {
        return Err(Error::DimensionMismatch {
            expected: system.nrows(),
            actual: system.ncols(),
        });
    }
    if system.nrows() != rhs.len() {
        return Err(Error::DimensionMismatch {
            expected: system.nrows(),
            actual: rhs.len(),
        });
    }

    system.clone().lu().solve(rhs).ok_or(Error::SingularMatrix)
}

/// Solve a bordered system given as conductance stamps with a sparse LU.
///
/// Each stamp is a `(row, col, value)` contribution; stamps landing on
/// the same position are summed during assembly, so diagonal and border
/// entries may be emitted piecewise.
pub fn solve_sparse(
    dimension: usize,
    stamps: &[(usize, usize, f64)],
    rhs: &DVector<f64>,
) -> Result<DVector<f64>> {
    if dimension != rhs.len() {
        return Err(Error::DimensionMismatch {
            expected: dimension,
            actual: rhs.len(),
        });
    }

    let entries: Vec<_> = stamps
        .iter()
        .map(|&(row, col, value)| Triplet::new(row, col, value))
        .collect();

    let system = SparseColMat::<usize, f64>::try_new_from_triplets(dimension, dimension, &entries)
        .map_err(|_| Error::SingularMatrix)?;
    let factors = system.sp_lu().map_err(|_| Error::SingularMatrix)?;

    let b = Col::<f64>::from_fn(dimension, |i| rhs[i]);
    let x = factors.solve(&b);

    Ok(DVector::from_fn(dimension, |i, _| x[i]))
}
