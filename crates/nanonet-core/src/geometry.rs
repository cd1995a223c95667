//! Static geometry of a device: wires, junctions, adjacency.

use log::{debug, info};
use nalgebra::{DMatrix, DVector};

use crate::datasheet::Datasheet;
use crate::error::Result;
use crate::wires::{Junction, WireDistribution, detect_junctions, generate_wires};

/// The frozen geometric structure of a device.
///
/// Geometry is produced once from a datasheet and a seed and never mutated
/// afterwards; electrical state is layered on top of it separately. The
/// adjacency matrix is symmetric with a zero diagonal, and the junction
/// coordinate matrices carry the intersection point mirrored at `(i, j)`
/// and `(j, i)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    /// The sampled wire population.
    pub wires: WireDistribution,
    /// All detected crossings, ordered by wire pair.
    pub junctions: Vec<Junction>,
    /// Symmetric boolean wire-to-wire adjacency.
    pub adjacency: DMatrix<bool>,
    /// Junction x coordinates on the adjacency pattern.
    pub junction_x: DMatrix<f64>,
    /// Junction y coordinates on the adjacency pattern.
    pub junction_y: DMatrix<f64>,
    /// Horizontal substrate size.
    pub lx: f64,
    /// Vertical substrate size.
    pub ly: f64,
    /// Seed the wires were sampled with.
    pub seed: u64,
}

/// Relabelling from pre-reduction wire indices to the surviving compact
/// index space.
///
/// Callers holding references to wires by their original index (named
/// sources, grounds, transducer pads) translate them through this map
/// after a largest-component reduction.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentMap {
    forward: Vec<Option<usize>>,
    retained: usize,
}

impl ComponentMap {
    /// New index of `old`, or `None` if the wire was discarded.
    pub fn translate(&self, old: usize) -> Option<usize> {
        self.forward.get(old).copied().flatten()
    }

    /// Number of wires before the reduction.
    pub fn original_count(&self) -> usize {
        self.forward.len()
    }

    /// Number of wires surviving the reduction.
    pub fn retained_count(&self) -> usize {
        self.retained
    }
}

/// Generate the full device geometry for a datasheet.
///
/// Deterministic in `(datasheet, seed)`: two calls with equal arguments
/// produce bitwise-identical wires, junctions and adjacency.
pub fn generate_geometry(datasheet: &Datasheet, seed: u64) -> Result<Geometry> {
    info!(
        "generating geometry: {} wires on {}x{} um",
        datasheet.wires_count, datasheet.lx, datasheet.ly
    );

    let wires = generate_wires(datasheet, seed)?;
    let junctions = detect_junctions(&wires)?;

    let n = wires.count();
    let mut adjacency = DMatrix::from_element(n, n, false);
    let mut junction_x = DMatrix::zeros(n, n);
    let mut junction_y = DMatrix::zeros(n, n);
    for j in &junctions {
        adjacency[(j.first, j.second)] = true;
        adjacency[(j.second, j.first)] = true;
        junction_x[(j.first, j.second)] = j.x;
        junction_x[(j.second, j.first)] = j.x;
        junction_y[(j.first, j.second)] = j.y;
        junction_y[(j.second, j.first)] = j.y;
    }

    Ok(Geometry {
        wires,
        junctions,
        adjacency,
        junction_x,
        junction_y,
        lx: datasheet.lx,
        ly: datasheet.ly,
        seed,
    })
}

impl Geometry {
    /// Number of wires.
    pub fn wire_count(&self) -> usize {
        self.wires.count()
    }

    /// Number of junctions.
    pub fn junction_count(&self) -> usize {
        self.junctions.len()
    }

    /// Reduce the geometry to its largest connected component.
    ///
    /// Surviving wires are relabelled contiguously from 0 in their
    /// original order. Ties on component size go to the component holding
    /// the smallest wire index. The returned map translates pre-reduction
    /// indices into the new index space.
    pub fn largest_component(&self) -> (Geometry, ComponentMap) {
        let n = self.wire_count();

        let mut visited = vec![false; n];
        let mut best: Vec<usize> = Vec::new();
        for start in 0..n {
            if visited[start] {
                continue;
            }
            // iterative BFS over the adjacency nonzeros
            let mut component = vec![start];
            let mut queue = std::collections::VecDeque::from([start]);
            visited[start] = true;
            while let Some(node) = queue.pop_front() {
                for neighbour in 0..n {
                    if self.adjacency[(node, neighbour)] && !visited[neighbour] {
                        visited[neighbour] = true;
                        component.push(neighbour);
                        queue.push_back(neighbour);
                    }
                }
            }
            // strict comparison keeps the first (lowest-index) component on ties
            if component.len() > best.len() {
                best = component;
            }
        }

        best.sort_unstable();
        let retained = best.len();
        debug!("largest component keeps {} of {} wires", retained, n);

        let mut forward = vec![None; n];
        for (new, &old) in best.iter().enumerate() {
            forward[old] = Some(new);
        }

        let gather = |v: &DVector<f64>| DVector::from_fn(retained, |i, _| v[best[i]]);
        let wires = WireDistribution {
            xc: gather(&self.wires.xc),
            yc: gather(&self.wires.yc),
            xa: gather(&self.wires.xa),
            ya: gather(&self.wires.ya),
            xb: gather(&self.wires.xb),
            yb: gather(&self.wires.yb),
            theta: gather(&self.wires.theta),
            lengths: gather(&self.wires.lengths),
            distances: DMatrix::from_fn(retained, retained, |i, j| {
                self.wires.distances[(best[i], best[j])]
            }),
            outside: best.iter().map(|&old| self.wires.outside[old]).collect(),
        };

        let junctions: Vec<Junction> = self
            .junctions
            .iter()
            .filter_map(|j| match (forward[j.first], forward[j.second]) {
                (Some(first), Some(second)) => Some(Junction {
                    first,
                    second,
                    x: j.x,
                    y: j.y,
                }),
                _ => None,
            })
            .collect();

        let mut adjacency = DMatrix::from_element(retained, retained, false);
        let mut junction_x = DMatrix::zeros(retained, retained);
        let mut junction_y = DMatrix::zeros(retained, retained);
        for j in &junctions {
            adjacency[(j.first, j.second)] = true;
            adjacency[(j.second, j.first)] = true;
            junction_x[(j.first, j.second)] = j.x;
            junction_x[(j.second, j.first)] = j.x;
            junction_y[(j.first, j.second)] = j.y;
            junction_y[(j.second, j.first)] = j.y;
        }

        let reduced = Geometry {
            wires,
            junctions,
            adjacency,
            junction_x,
            junction_y,
            lx: self.lx,
            ly: self.ly,
            seed: self.seed,
        };

        (reduced, ComponentMap { forward, retained })
    }
}
