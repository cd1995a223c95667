//! Miranda kinetic model for memristive junctions.
//!
//! Each junction carries a filament occupancy `g` in `[0, 1]` that relaxes
//! towards a bias-dependent equilibrium. With potentiation and depression
//! rates
//!
//! ```text
//! kp = kp0 * exp( eta_p * |dV|)
//! kd = kd0 * exp(-eta_d * |dV|)
//! ```
//!
//! the occupancy follows `dg/dt = kp (1 - g) - kd g`, whose exact solution
//! over a step of length `dt` is
//!
//! ```text
//! g' = kp/(kp+kd) * (1 - (1 - (1 + kd/kp) g) * exp(-(kp+kd) dt))
//! ```
//!
//! The junction conductance interpolates linearly between the depressed
//! and potentiated bounds: `Y = Ymin (1 - g) + Ymax g`.

use log::trace;
use nalgebra::{DMatrix, DVector};
use nanonet_core::{Datasheet, Network};

/// Potentiation rate at the given junction voltage drop.
pub fn potentiation_rate(datasheet: &Datasheet, delta_v: f64) -> f64 {
    datasheet.kp0 * (datasheet.eta_p * delta_v).exp()
}

/// Depression rate at the given junction voltage drop.
pub fn depression_rate(datasheet: &Datasheet, delta_v: f64) -> f64 {
    datasheet.kd0 * (-datasheet.eta_d * delta_v).exp()
}

/// Equilibrium occupancy `kp/(kp+kd)` a junction held at `delta_v`
/// relaxes towards.
///
/// Evaluated as `1/(1 + kd/kp)`: `kp` grows without bound under strong
/// bias and the plain quotient would degenerate to `inf/inf`.
pub fn steady_state(datasheet: &Datasheet, delta_v: f64) -> f64 {
    let kp = potentiation_rate(datasheet, delta_v);
    let kd = depression_rate(datasheet, delta_v);
    1.0 / (1.0 + kd / kp)
}

/// Advance every memristive junction by `delta_time`.
///
/// One masked elementwise pass over the device block: the voltage drops,
/// rates and relaxed occupancies are built as whole-matrix expressions
/// and written back in a single masked assignment per state matrix.
/// External load edges sit outside the device block and are never
/// touched; their conductance is fixed.
///
/// The update runs unconditionally, first step included: with `V = 0`
/// everywhere the rates reduce to `kp0` and `kd0` and the formula is
/// well defined.
pub fn update_conductance(network: &mut Network, datasheet: &Datasheet, delta_time: f64) {
    let device = network.device_nodes();
    trace!("kinetic update over {} device nodes, dt = {}", device, delta_time);

    // 1.0 on every memristive junction, 0.0 elsewhere
    let mask = DMatrix::from_fn(device, device, |i, j| {
        if network.adjacency[(i, j)] { 1.0 } else { 0.0 }
    });

    // junction voltage drops |V_i - V_j|, broadcast over the block
    let voltage = network.voltage.rows(0, device).into_owned();
    let spread = &voltage * DVector::from_element(device, 1.0).transpose();
    let delta_v = (&spread - spread.transpose())
        .map(f64::abs)
        .component_mul(&mask);

    // rate coefficients, elementwise
    let kp = delta_v.map(|dv| potentiation_rate(datasheet, dv));
    let kd = delta_v.map(|dv| depression_rate(datasheet, dv));
    // kp never underflows (eta_p >= 0, dv >= 0), so the ratio stays
    // finite even where kp has saturated to infinity
    let ratio = kd.component_div(&kp);
    let decay = kp.zip_map(&kd, |p, d| (-(p + d) * delta_time).exp());

    let occupancy = network
        .admittance
        .view((0, 0), (device, device))
        .into_owned();
    let occupancy = ratio
        .zip_zip_map(&decay, &occupancy, |r, e, g| {
            (1.0 / (1.0 + r) * (1.0 - (1.0 - (1.0 + r) * g) * e)).clamp(0.0, 1.0)
        })
        .component_mul(&mask);
    let conductance = occupancy.zip_map(&mask, |g, m| {
        m * (datasheet.y_min * (1.0 - g) + datasheet.y_max * g)
            .clamp(datasheet.y_min, datasheet.y_max)
    });

    network
        .admittance
        .view_mut((0, 0), (device, device))
        .copy_from(&occupancy);
    network
        .circuit
        .view_mut((0, 0), (device, device))
        .copy_from(&conductance);
    network
        .delta_voltage
        .view_mut((0, 0), (device, device))
        .copy_from(&delta_v);
}
