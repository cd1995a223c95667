//! MNA solve benchmarks over ladder networks of increasing size.

use std::collections::HashMap;

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use nalgebra::{DMatrix, DVector};
use nanonet_core::Network;
use nanonet_solver::solve;

/// Ladder network: a chain with unit-conductance rungs every other node.
fn ladder(nodes: usize) -> Network {
    let mut adjacency = DMatrix::from_element(nodes, nodes, false);
    let mut circuit = DMatrix::zeros(nodes, nodes);
    let mut link = |u: usize, v: usize, y: f64| {
        adjacency[(u, v)] = true;
        adjacency[(v, u)] = true;
        circuit[(u, v)] = y;
        circuit[(v, u)] = y;
    };
    for i in 0..nodes - 1 {
        link(i, i + 1, 1.0);
    }
    for i in (0..nodes - 2).step_by(2) {
        link(i, i + 2, 0.5);
    }
    Network {
        adjacency,
        wires_position: (DVector::zeros(nodes), DVector::zeros(nodes)),
        junctions_position: (DMatrix::zeros(nodes, nodes), DMatrix::zeros(nodes, nodes)),
        circuit,
        admittance: DMatrix::zeros(nodes, nodes),
        delta_voltage: DMatrix::zeros(nodes, nodes),
        voltage: DVector::zeros(nodes),
        device_grounds: 1,
        external_grounds: 0,
    }
}

fn bench_mna_solve(c: &mut Criterion) {
    let inputs = HashMap::from([(0, 5.0)]);

    for &nodes in &[16usize, 64, 256] {
        let network = ladder(nodes);
        c.bench_function(&format!("mna_solve_ladder_{nodes}"), |b| {
            b.iter(|| {
                let mut live = network.clone();
                solve(&mut live, &inputs).unwrap();
                black_box(live.voltage[nodes / 2]);
            });
        });
    }
}

criterion_group!(benches, bench_mna_solve);
criterion_main!(benches);
