//! Static description of a nanowire device.

use serde::{Deserialize, Serialize};

/// Physical and kinetic parameters of a nanowire device.
///
/// A datasheet is immutable: it describes how a device is manufactured
/// (wire population and dimensions) and how its junctions respond to
/// stimulation (rate constants and conductance bounds). The same datasheet
/// plus the same seed always reproduces the same device.
///
/// Serialized field names keep the spelling used by the persisted
/// datasheet document (`Lx`, `Y_min`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Datasheet {
    /// Number of wires dropped on the device.
    pub wires_count: usize,
    /// Average wire length, in micrometers.
    pub mean_length: f64,
    /// Standard deviation of the wire length distribution, in micrometers.
    pub std_length: f64,

    /// Horizontal size of the device, in micrometers.
    #[serde(rename = "Lx")]
    pub lx: f64,
    /// Vertical size of the device, in micrometers.
    #[serde(rename = "Ly")]
    pub ly: f64,

    /// Junction potentiation rate constant at zero bias.
    pub kp0: f64,
    /// Exponential sensitivity of potentiation to the junction voltage drop.
    pub eta_p: f64,
    /// Junction depression rate constant at zero bias.
    pub kd0: f64,
    /// Exponential sensitivity of depression to the junction voltage drop.
    pub eta_d: f64,

    /// Junction conductance in the fully depressed state, in siemens.
    #[serde(rename = "Y_min")]
    pub y_min: f64,
    /// Junction conductance in the fully potentiated state, in siemens.
    #[serde(rename = "Y_max")]
    pub y_max: f64,

    /// Seed for the wire distribution generator.
    pub seed: u64,
}

impl Default for Datasheet {
    /// The reference device: 1500 wires of 40 um average length on a
    /// 500x500 um substrate.
    fn default() -> Self {
        Self {
            wires_count: 1500,
            mean_length: 40.0,
            std_length: 14.0,
            lx: 500.0,
            ly: 500.0,
            kp0: 0.0001,
            eta_p: 10.0,
            kd0: 0.5,
            eta_d: 1.0,
            y_min: 0.001,
            y_max: 0.1,
            seed: 40,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_bounds_are_ordered() {
        let ds = Datasheet::default();
        assert!(ds.y_min > 0.0);
        assert!(ds.y_min < ds.y_max);
        assert!(ds.std_length > 0.0);
    }

    #[test]
    fn serde_field_spelling() {
        let ds = Datasheet::default();
        let json = serde_json::to_value(ds).unwrap();
        assert!(json.get("Lx").is_some());
        assert!(json.get("Y_min").is_some());
        assert!(json.get("Y_max").is_some());
        assert!(json.get("wires_count").is_some());

        let back: Datasheet = serde_json::from_value(json).unwrap();
        assert_eq!(back, ds);
    }
}
