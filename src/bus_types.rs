use crate::network::{Bus, Generator};
use std::collections::BTreeSet;

/// Partitions the bus set into PV (voltage-regulated) and PQ (load)
/// buses, each in ascending identifier order.
///
/// A bus hosting at least one voltage-regulating generator is PV; it
/// appears once however many regulating units it hosts. Every other
/// bus, including buses with no generator at all, is PQ. Regulation is
/// taken to act at the generator's own bus (remote regulation is
/// approximated as local).
pub fn bus_types(buses: &[Bus], generators: &[Generator]) -> (Vec<String>, Vec<String>) {
    // Buses with a regulating generator.
    let regulated = generators
        .iter()
        .filter(|g| g.voltage_regulator_on)
        .map(|g| g.bus_id.as_str())
        .collect::<BTreeSet<&str>>();

    let mut ids: Vec<&str> = buses.iter().map(|b| b.id.as_str()).collect();
    ids.sort_unstable();

    let pv = ids
        .iter()
        .filter(|id| regulated.contains(*id))
        .map(|id| id.to_string())
        .collect::<Vec<String>>();
    let pq = ids
        .iter()
        .filter(|id| !regulated.contains(*id))
        .map(|id| id.to_string())
        .collect::<Vec<String>>();

    (pv, pq)
}
