//! File-level persistence of a simulated device.
//!
//! A device is saved as four JSON documents: the datasheet, the
//! electrical graph, the geometry arrays, and the map from transducer
//! names to wire indices.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use log::info;
use nanonet_core::{Datasheet, Geometry, Network};

use crate::error::Result;
use crate::graph::{network_from_graph, network_to_graph};
use crate::wires_doc::{geometry_from_wires, geometry_to_wires};

/// Map from external transducer name to the wire it is attached to.
pub type Connections = IndexMap<String, usize>;

/// Locations of the four persisted documents.
#[derive(Debug, Clone, PartialEq)]
pub struct BackupPaths {
    pub datasheet: PathBuf,
    pub graph: PathBuf,
    pub wires: PathBuf,
    pub connections: PathBuf,
}

impl Default for BackupPaths {
    fn default() -> Self {
        Self {
            datasheet: PathBuf::from("datasheet.dat"),
            graph: PathBuf::from("graph.dat"),
            wires: PathBuf::from("wires.dat"),
            connections: PathBuf::from("connections.dat"),
        }
    }
}

impl BackupPaths {
    /// The default document names inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            datasheet: dir.join("datasheet.dat"),
            graph: dir.join("graph.dat"),
            wires: dir.join("wires.dat"),
            connections: dir.join("connections.dat"),
        }
    }

    /// Whether every document file exists.
    pub fn exist(&self) -> bool {
        [&self.datasheet, &self.graph, &self.wires, &self.connections]
            .iter()
            .all(|path| path.exists())
    }
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    let file = BufWriter::new(File::create(path)?);
    serde_json::to_writer(file, value)?;
    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let file = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(file)?)
}

/// Save the device to the four document files.
pub fn save(
    paths: &BackupPaths,
    datasheet: &Datasheet,
    network: &Network,
    geometry: &Geometry,
    connections: &Connections,
) -> Result<()> {
    info!("saving device to {:?}", paths.graph);

    write_json(&paths.datasheet, datasheet)?;
    write_json(&paths.graph, &network_to_graph(network))?;
    write_json(&paths.wires, &geometry_to_wires(geometry))?;
    write_json(&paths.connections, connections)?;
    Ok(())
}

/// Load a device back from its four document files.
pub fn load(paths: &BackupPaths) -> Result<(Datasheet, Network, Geometry, Connections)> {
    info!("loading device from {:?}", paths.graph);

    let datasheet: Datasheet = read_json(&paths.datasheet)?;
    let network = network_from_graph(&read_json(&paths.graph)?)?;
    let geometry = geometry_from_wires(&read_json(&paths.wires)?)?;
    let connections: Connections = read_json(&paths.connections)?;
    Ok((datasheet, network, geometry, connections))
}

#[cfg(test)]
mod tests {
    use super::*;
    use nanonet_core::{build_network, generate_geometry};

    #[test]
    fn save_then_load_round_trips() {
        let ds = Datasheet {
            wires_count: 50,
            lx: 120.0,
            ly: 120.0,
            ..Datasheet::default()
        };
        let geometry = generate_geometry(&ds, ds.seed).unwrap();
        let (mut network, map) = build_network(&ds, &geometry, ds.y_min, 1).unwrap();
        network.connect(2, 500.0).unwrap();

        let mut connections = Connections::new();
        connections.insert("source".into(), map.translate(0).unwrap_or(0));
        connections.insert("drain".into(), 2);

        let dir = std::env::temp_dir().join(format!("nanonet-backup-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let paths = BackupPaths::in_dir(&dir);

        assert!(!paths.exist());
        save(&paths, &ds, &network, &geometry, &connections).unwrap();
        assert!(paths.exist());

        let (ds2, network2, geometry2, connections2) = load(&paths).unwrap();
        assert_eq!(ds2, ds);
        assert_eq!(network2.adjacency, network.adjacency);
        assert_eq!(network2.circuit, network.circuit);
        assert_eq!(network2.voltage, network.voltage);
        assert_eq!(network2.device_grounds, network.device_grounds);
        assert_eq!(network2.external_grounds, network.external_grounds);
        assert_eq!(geometry2, geometry);
        assert_eq!(connections2, connections);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let paths = BackupPaths::in_dir("/nonexistent/nanonet");
        assert!(matches!(load(&paths), Err(crate::error::Error::Io(_))));
    }
}
