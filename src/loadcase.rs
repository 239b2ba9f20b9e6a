use crate::network::Network;
use anyhow::Result;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Loads a network snapshot from a JSON file.
///
/// This is a convenience for the CLI and tests; the library itself only
/// consumes in-memory snapshots and owns no persistence format.
pub fn load_network(path: &Path) -> Result<Network> {
    let file = File::open(path)?;
    let net: Network = serde_json::from_reader(BufReader::new(file))?;
    Ok(net)
}

#[cfg(test)]
mod tests {
    use crate::network::Network;
    use anyhow::Result;

    #[test]
    fn snapshot_round_trips_with_absent_fields() -> Result<()> {
        let json = r#"{
            "buses": [
                {"id": "a", "voltage_level_id": "vl1"},
                {"id": "b", "voltage_level_id": "vl1", "v_mag": 218.0}
            ],
            "voltage_levels": [
                {"id": "vl1", "nominal_v": 220.0}
            ],
            "lines": [
                {"id": "l1", "bus1_id": "a", "bus2_id": "b",
                 "r": 0.01, "x": 0.1, "g1": 0.0, "b1": 0.0, "g2": 0.0, "b2": 0.0}
            ],
            "transformers": [],
            "generators": [],
            "curve_points": [],
            "loads": []
        }"#;

        let net: Network = serde_json::from_str(json)?;
        assert_eq!(net.num_buses(), 2);
        assert_eq!(net.buses[0].v_mag, None);
        assert_eq!(net.buses[1].v_mag, Some(218.0));
        assert_eq!(net.voltage_levels[0].low_voltage_limit, None);
        Ok(())
    }
}
