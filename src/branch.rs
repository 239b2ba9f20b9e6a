use crate::error::Error;
use crate::network::Network;
use crate::per_unit::PerUnit;
use log::{debug, warn};
use num_complex::Complex64;
use std::collections::HashMap;

/// One endpoint view of a branch, with every electrical quantity
/// already converted to the branch's own per-unit base.
///
/// Each in-service branch yields two `BranchEnd`s, one per orientation.
/// The balance equation of a bus sums the ends whose `near` side is
/// that bus, which collapses the two orientation formulas into a single
/// parameterized contribution.
#[derive(Debug, Clone)]
pub struct BranchEnd {
    /// Owning branch, for diagnostics.
    pub branch_id: String,

    /// Bus whose balance this end contributes to.
    pub near: usize,

    /// Bus at the other end.
    pub far: usize,

    /// Series admittance magnitude, 1/sqrt(r^2 + x^2) (pu).
    pub y: f64,

    /// Series admittance angle, atan2(r, x) (rad). The argument order
    /// (r, x) fixes the physical phase convention.
    pub ksi: f64,

    /// Shunt conductance at the near end (pu). Zero for transformers.
    pub g: f64,

    /// Shunt susceptance at the near end (pu). Zero for transformers.
    pub b: f64,

    /// Off-nominal turns ratio on the near voltage. 1 everywhere
    /// except the bus1 side of a transformer.
    pub ratio_near: f64,

    /// Off-nominal turns ratio on the far voltage.
    pub ratio_far: f64,
}

/// Per-bus incidence index: bus -> ends whose near side is that bus.
/// Built once before constraint compilation so that no constraint has
/// to rescan the branch tables.
pub struct AdjacencyIndex {
    per_bus: Vec<Vec<BranchEnd>>,
}

impl AdjacencyIndex {
    pub fn incident(&self, bus: usize) -> &[BranchEnd] {
        &self.per_bus[bus]
    }
}

/// Evaluates every line and transformer under its own per-unit base and
/// indexes the resulting endpoint records by near bus.
///
/// `bus_index` maps bus identifiers to dense indices and `nominal_v`
/// holds each bus's nominal voltage in the same order. Branches with an
/// endpoint outside the bus set or with a non-finite per-unit
/// admittance are excluded with a warning; they never poison the model.
pub fn build_adjacency(
    net: &Network,
    pu: &PerUnit,
    bus_index: &HashMap<String, usize>,
    nominal_v: &[f64],
) -> AdjacencyIndex {
    let mut per_bus = vec![Vec::new(); nominal_v.len()];
    let mut excluded = 0usize;

    for line in &net.lines {
        let (i, j) = match endpoints(&line.id, &line.bus1_id, &line.bus2_id, bus_index) {
            Some(pair) => pair,
            None => {
                excluded += 1;
                continue;
            }
        };
        let base = pu.admittance_base(nominal_v[i], nominal_v[j]);
        let (y, ksi) = match series_admittance(&line.id, line.r, line.x, base) {
            Some(pair) => pair,
            None => {
                excluded += 1;
                continue;
            }
        };
        per_bus[i].push(BranchEnd {
            branch_id: line.id.clone(),
            near: i,
            far: j,
            y,
            ksi,
            g: line.g1 / base,
            b: line.b1 / base,
            ratio_near: 1.0,
            ratio_far: 1.0,
        });
        per_bus[j].push(BranchEnd {
            branch_id: line.id.clone(),
            near: j,
            far: i,
            y,
            ksi,
            g: line.g2 / base,
            b: line.b2 / base,
            ratio_near: 1.0,
            ratio_far: 1.0,
        });
    }

    for tr in &net.transformers {
        let (i, j) = match endpoints(&tr.id, &tr.bus1_id, &tr.bus2_id, bus_index) {
            Some(pair) => pair,
            None => {
                excluded += 1;
                continue;
            }
        };
        let base = pu.admittance_base(nominal_v[i], nominal_v[j]);
        let (y, ksi) = match series_admittance(&tr.id, tr.r, tr.x, base) {
            Some(pair) => pair,
            None => {
                excluded += 1;
                continue;
            }
        };
        // Off-nominal ratio relative to the nominal voltages of the two
        // endpoints. The from-side value is identical from either end,
        // so it is computed once; orientation decides which voltage
        // factor it multiplies.
        let ratio = (tr.rated_u2 / tr.rated_u1) / (nominal_v[j] / nominal_v[i]);
        per_bus[i].push(BranchEnd {
            branch_id: tr.id.clone(),
            near: i,
            far: j,
            y,
            ksi,
            g: 0.0,
            b: 0.0,
            ratio_near: ratio,
            ratio_far: 1.0,
        });
        per_bus[j].push(BranchEnd {
            branch_id: tr.id.clone(),
            near: j,
            far: i,
            y,
            ksi,
            g: 0.0,
            b: 0.0,
            ratio_near: 1.0,
            ratio_far: ratio,
        });
    }

    debug!(
        "adjacency index: {} buses, {} branches, {} excluded",
        nominal_v.len(),
        net.num_branches(),
        excluded
    );
    AdjacencyIndex { per_bus }
}

fn endpoints(
    branch_id: &str,
    bus1_id: &str,
    bus2_id: &str,
    bus_index: &HashMap<String, usize>,
) -> Option<(usize, usize)> {
    for end in [bus1_id, bus2_id] {
        if !bus_index.contains_key(end) {
            warn!(
                "{}",
                Error::InvalidBranchReference {
                    branch: branch_id.to_string(),
                    bus: end.to_string(),
                }
            );
            return None;
        }
    }
    Some((bus_index[bus1_id], bus_index[bus2_id]))
}

/// Series admittance magnitude and angle in per-unit, or `None` for a
/// degenerate impedance.
fn series_admittance(branch_id: &str, r: f64, x: f64, base: f64) -> Option<(f64, f64)> {
    let y = 1.0 / Complex64::new(r, x).norm() / base;
    let ksi = f64::atan2(r, x);
    if !y.is_finite() || !ksi.is_finite() {
        warn!(
            "{}",
            Error::DegenerateBranch {
                branch: branch_id.to_string(),
            }
        );
        return None;
    }
    Some((y, ksi))
}
