//! Wire distribution sampling and junction detection.
//!
//! Wires are straight segments dropped on the device plane: a centroid
//! uniform over the substrate, an orientation uniform over `[0, pi)`, and a
//! length drawn from a normal distribution. Every pairwise segment crossing
//! is a junction and becomes an edge of the electrical graph.

use log::debug;
use nalgebra::{DMatrix, DVector};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use rayon::prelude::*;

use crate::datasheet::Datasheet;
use crate::error::{Error, Result};

/// Determinant magnitude below which two segments are treated as parallel.
pub const PARALLEL_TOLERANCE: f64 = 1e-2;

/// A sampled population of straight wires on the device plane.
///
/// All coordinate vectors are indexed by wire. Endpoint `a` sits at
/// `centroid - (l/2)(cos t, sin t)` and endpoint `b` at the mirrored
/// position.
#[derive(Debug, Clone, PartialEq)]
pub struct WireDistribution {
    /// Centroid x coordinates.
    pub xc: DVector<f64>,
    /// Centroid y coordinates.
    pub yc: DVector<f64>,
    /// First endpoint x coordinates.
    pub xa: DVector<f64>,
    /// First endpoint y coordinates.
    pub ya: DVector<f64>,
    /// Second endpoint x coordinates.
    pub xb: DVector<f64>,
    /// Second endpoint y coordinates.
    pub yb: DVector<f64>,
    /// Orientations in radians, in `[0, pi)`.
    pub theta: DVector<f64>,
    /// Wire lengths in micrometers, strictly positive.
    pub lengths: DVector<f64>,
    /// Euclidean distances between wire centroids.
    pub distances: DMatrix<f64>,
    /// Per wire, how many endpoint coordinates fall outside the substrate.
    pub outside: Vec<u32>,
}

impl WireDistribution {
    /// Number of wires in the distribution.
    pub fn count(&self) -> usize {
        self.xc.len()
    }
}

/// A geometric crossing of two wires.
///
/// The pair is stored with `first < second`; the same junction never
/// appears twice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Junction {
    /// Lower wire index of the crossing pair.
    pub first: usize,
    /// Higher wire index of the crossing pair.
    pub second: usize,
    /// Intersection x coordinate.
    pub x: f64,
    /// Intersection y coordinate.
    pub y: f64,
}

/// Sample a wire distribution from the datasheet.
///
/// Lengths are redrawn until positive, so the distribution is truncated
/// rather than clipped. Draw order is fixed (lengths, then centroids, then
/// orientations): the same `(datasheet, seed)` reproduces the same wires
/// bit for bit.
pub fn generate_wires(datasheet: &Datasheet, seed: u64) -> Result<WireDistribution> {
    let count = datasheet.wires_count;
    if count == 0 {
        return Err(Error::InvalidParameter {
            name: "wires_count",
            value: 0.0,
        });
    }
    if !(datasheet.std_length > 0.0) {
        return Err(Error::InvalidParameter {
            name: "std_length",
            value: datasheet.std_length,
        });
    }

    debug!("sampling {} wires with seed {}", count, seed);

    let mut rng = StdRng::seed_from_u64(seed);
    let normal = Normal::new(datasheet.mean_length, datasheet.std_length).map_err(|_| {
        Error::InvalidParameter {
            name: "std_length",
            value: datasheet.std_length,
        }
    })?;

    let mut lengths = DVector::zeros(count);
    for i in 0..count {
        // redraw until positive
        let mut length = normal.sample(&mut rng);
        while length <= 0.0 {
            length = normal.sample(&mut rng);
        }
        lengths[i] = length;
    }

    let xc = DVector::from_fn(count, |_, _| rng.gen_range(0.0..datasheet.lx));
    let yc = DVector::from_fn(count, |_, _| rng.gen_range(0.0..datasheet.ly));
    let theta = DVector::from_fn(count, |_, _| rng.gen_range(0.0..std::f64::consts::PI));

    let half_dx = lengths.zip_map(&theta, |l, t| l / 2.0 * t.cos());
    let half_dy = lengths.zip_map(&theta, |l, t| l / 2.0 * t.sin());
    let xa = &xc - &half_dx;
    let ya = &yc - &half_dy;
    let xb = &xc + &half_dx;
    let yb = &yc + &half_dy;

    let distances = DMatrix::from_fn(count, count, |i, j| {
        ((xc[i] - xc[j]).powi(2) + (yc[i] - yc[j]).powi(2)).sqrt()
    });

    let outside = (0..count)
        .map(|i| {
            let mut violations = 0;
            for &v in &[xa[i], xb[i], ya[i], yb[i]] {
                if v < 0.0 {
                    violations += 1;
                }
            }
            for &v in &[xa[i], xb[i]] {
                if v > datasheet.lx {
                    violations += 1;
                }
            }
            for &v in &[ya[i], yb[i]] {
                if v > datasheet.ly {
                    violations += 1;
                }
            }
            violations
        })
        .collect();

    Ok(WireDistribution {
        xc,
        yc,
        xa,
        ya,
        xb,
        yb,
        theta,
        lengths,
        distances,
        outside,
    })
}

/// Find all pairwise wire crossings.
///
/// Pairs whose bounding intervals do not overlap on either axis are
/// rejected before the line solve; near-parallel pairs (including
/// collinear and degenerate segments) are rejected by the determinant
/// test. The returned list is ordered by `(first, second)`.
pub fn detect_junctions(wires: &WireDistribution) -> Result<Vec<Junction>> {
    debug!("detecting junctions over {} wires", wires.count());

    let n = wires.count();
    let dx: Vec<f64> = (0..n).map(|i| wires.xa[i] - wires.xb[i]).collect();
    let dy: Vec<f64> = (0..n).map(|i| wires.ya[i] - wires.yb[i]).collect();
    // line moment: xa*yb - ya*xb
    let moment: Vec<f64> = (0..n)
        .map(|i| wires.xa[i] * wires.yb[i] - wires.ya[i] * wires.xb[i])
        .collect();
    let x_range: Vec<(f64, f64)> = (0..n)
        .map(|i| (wires.xa[i].min(wires.xb[i]), wires.xa[i].max(wires.xb[i])))
        .collect();
    let y_range: Vec<(f64, f64)> = (0..n)
        .map(|i| (wires.ya[i].min(wires.yb[i]), wires.ya[i].max(wires.yb[i])))
        .collect();

    let overlaps = |a: (f64, f64), b: (f64, f64)| a.0 <= b.1 && b.0 <= a.1;
    let within = |v: f64, r: (f64, f64)| r.0 <= v && v <= r.1;

    // The outer index runs in parallel; per-row results are collected in
    // index order, so the output ordering is deterministic.
    let junctions: Vec<Junction> = (0..n)
        .into_par_iter()
        .map(|i| {
            let mut row = Vec::new();
            for j in i + 1..n {
                if !overlaps(x_range[i], x_range[j]) || !overlaps(y_range[i], y_range[j]) {
                    continue;
                }

                let det = dx[i] * dy[j] - dy[i] * dx[j];
                if det.abs() < PARALLEL_TOLERANCE {
                    continue;
                }

                let x = (moment[i] * dx[j] - moment[j] * dx[i]) / det;
                let y = (moment[i] * dy[j] - moment[j] * dy[i]) / det;

                if within(x, x_range[i])
                    && within(x, x_range[j])
                    && within(y, y_range[i])
                    && within(y, y_range[j])
                {
                    row.push(Junction {
                        first: i,
                        second: j,
                        x,
                        y,
                    });
                }
            }
            row
        })
        .collect::<Vec<_>>()
        .into_iter()
        .flatten()
        .collect();

    if junctions.is_empty() {
        return Err(Error::EmptyNetwork);
    }

    debug!("found {} junctions", junctions.len());
    Ok(junctions)
}
