use crate::error::{Error, Result};
use crate::network::Network;
use log::debug;
use std::collections::{HashMap, HashSet};

/// Counts, for each PV bus, the other PV buses adjacent through exactly
/// one line or transformer. An adjacency only counts when both branch
/// endpoints are inside the network's bus set.
pub fn pv_neighbor_counts(net: &Network, pv: &[String]) -> HashMap<String, usize> {
    let bus_set: HashSet<&str> = net.buses.iter().map(|b| b.id.as_str()).collect();
    let pv_set: HashSet<&str> = pv.iter().map(|id| id.as_str()).collect();

    let mut counts: HashMap<String, usize> = pv.iter().map(|id| (id.clone(), 0)).collect();

    let ends = net
        .lines
        .iter()
        .map(|l| (l.bus1_id.as_str(), l.bus2_id.as_str()))
        .chain(
            net.transformers
                .iter()
                .map(|t| (t.bus1_id.as_str(), t.bus2_id.as_str())),
        );
    for (b1, b2) in ends {
        if !bus_set.contains(b1) || !bus_set.contains(b2) {
            continue;
        }
        if pv_set.contains(b1) && pv_set.contains(b2) {
            *counts.get_mut(b1).unwrap() += 1;
            *counts.get_mut(b2).unwrap() += 1;
        }
    }
    counts
}

/// Selects the slack bus among the PV buses.
///
/// Single scan in ascending identifier order, keeping the best
/// candidate so far: a candidate replaces the current best only if its
/// nominal voltage is >= the best's and its PV neighbor count is
/// strictly greater. The tie-break is order dependent, which is why the
/// scan order is fixed to ascending identifiers. The first PV bus seeds
/// the scan, so a non-empty PV set always yields a slack.
pub fn find_slack(net: &Network, pv: &[String]) -> Result<String> {
    let counts = pv_neighbor_counts(net, pv);

    let mut best: Option<(&str, f64, usize)> = None;
    for id in pv {
        let bus = match net.buses.iter().find(|b| b.id == *id) {
            Some(b) => b,
            None => continue,
        };
        let nominal = net
            .voltage_level(&bus.voltage_level_id)
            .ok_or_else(|| Error::UnknownVoltageLevel {
                bus: bus.id.clone(),
                voltage_level: bus.voltage_level_id.clone(),
            })?
            .nominal_v;
        let neighbors = counts.get(id).copied().unwrap_or(0);

        best = match best {
            None => Some((id, nominal, neighbors)),
            Some((_, best_v, best_n)) if nominal >= best_v && neighbors > best_n => {
                Some((id, nominal, neighbors))
            }
            other => other,
        };
    }

    match best {
        Some((id, nominal, neighbors)) => {
            debug!(
                "slack bus {} (nominal {} kV, {} PV neighbors)",
                id, nominal, neighbors
            );
            Ok(id.to_string())
        }
        None => Err(Error::NoSlackCandidate),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::tests::{bus, gen, line, three_bus_chain, voltage_level};
    use crate::network::NetworkBuilder;
    use anyhow::Result;

    #[test]
    fn empty_pv_set_has_no_candidate() {
        let net = NetworkBuilder::default()
            .buses(vec![bus("b1", "vl1")])
            .voltage_levels(vec![voltage_level("vl1", 220.0)])
            .build()
            .unwrap();

        assert_eq!(find_slack(&net, &[]), Err(Error::NoSlackCandidate));
    }

    #[test]
    fn lone_pv_bus_is_selected() -> Result<()> {
        let net = NetworkBuilder::default()
            .buses(vec![bus("b1", "vl1"), bus("b2", "vl1")])
            .voltage_levels(vec![voltage_level("vl1", 220.0)])
            .generators(vec![gen("g1", "b1", 50.0, true)])
            .lines(vec![line("l1", "b1", "b2", 0.01, 0.1)])
            .build()?;

        assert_eq!(find_slack(&net, &["b1".to_string()])?, "b1");
        Ok(())
    }

    #[test]
    fn neighbor_count_breaks_voltage_ties() -> Result<()> {
        // Chain of three PV buses at one level; b2 touches both others
        // through the only two branches, b1 and b3 one each.
        let net = three_bus_chain();
        let pv = vec!["b1".to_string(), "b2".to_string(), "b3".to_string()];

        let counts = pv_neighbor_counts(&net, &pv);
        assert_eq!(counts["b1"], 1);
        assert_eq!(counts["b2"], 2);
        assert_eq!(counts["b3"], 1);

        assert_eq!(find_slack(&net, &pv)?, "b2");
        Ok(())
    }

    #[test]
    fn higher_voltage_with_more_neighbors_wins() -> Result<()> {
        let net = NetworkBuilder::default()
            .buses(vec![bus("a", "vl_low"), bus("b", "vl_high"), bus("c", "vl_low")])
            .voltage_levels(vec![
                voltage_level("vl_low", 63.0),
                voltage_level("vl_high", 400.0),
            ])
            .lines(vec![
                line("l1", "a", "b", 0.01, 0.1),
                line("l2", "b", "c", 0.01, 0.1),
            ])
            .build()?;
        let pv = vec!["a".to_string(), "b".to_string(), "c".to_string()];

        // a: 1 neighbor, b: 2, c: 1. b beats the seed on both criteria.
        assert_eq!(find_slack(&net, &pv)?, "b");
        Ok(())
    }

    #[test]
    fn equal_neighbor_counts_keep_the_scan_seed() -> Result<()> {
        // The replacement rule requires strictly more PV neighbors, so
        // a higher nominal voltage alone does not displace the first
        // candidate. Order dependence is deliberate and pinned to
        // ascending identifier order.
        let net = NetworkBuilder::default()
            .buses(vec![bus("a", "vl_low"), bus("b", "vl_high")])
            .voltage_levels(vec![
                voltage_level("vl_low", 63.0),
                voltage_level("vl_high", 400.0),
            ])
            .lines(vec![line("l1", "a", "b", 0.01, 0.1)])
            .build()?;
        let pv = vec!["a".to_string(), "b".to_string()];

        assert_eq!(find_slack(&net, &pv)?, "a");
        Ok(())
    }

    #[test]
    fn adjacency_ignores_dangling_branches() {
        let net = NetworkBuilder::default()
            .buses(vec![bus("b1", "vl1"), bus("b2", "vl1")])
            .voltage_levels(vec![voltage_level("vl1", 220.0)])
            .lines(vec![
                line("l1", "b1", "b2", 0.01, 0.1),
                line("l2", "b1", "ghost", 0.01, 0.1),
            ])
            .build()
            .unwrap();
        let pv = vec!["b1".to_string(), "b2".to_string()];

        let counts = pv_neighbor_counts(&net, &pv);
        assert_eq!(counts["b1"], 1);
        assert_eq!(counts["b2"], 1);
    }
}
