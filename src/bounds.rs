use crate::error::{Error, Result};
use crate::network::{Network, VoltageLevel};
use crate::per_unit::PerUnit;

/// Voltage-magnitude bounds for a bus, in per-unit of its nominal
/// voltage. An absent (or non-finite) operating limit leaves that side
/// at its natural bound: zero below, unbounded above.
pub fn voltage_bounds(vl: &VoltageLevel) -> (f64, f64) {
    let lower = vl
        .low_voltage_limit
        .filter(|v| v.is_finite())
        .map(|v| v / vl.nominal_v)
        .unwrap_or(0.0);
    let upper = vl
        .high_voltage_limit
        .filter(|v| v.is_finite())
        .map(|v| v / vl.nominal_v)
        .unwrap_or(f64::INFINITY);
    (lower, upper)
}

/// Reactive-injection bounds for a PV bus, in per-unit.
///
/// For each generator attached to the bus, the capability point whose
/// active-power coordinate lies closest to the generator's target
/// (ties to the first point in table order) contributes its Q limits;
/// the contributions accumulate, then the bus's total load q0 is
/// subtracted once from both sides. A generator with no capability
/// points leaves the bus bound undefined, which is an error.
pub fn reactive_bounds(net: &Network, pu: &PerUnit, bus_id: &str) -> Result<(f64, f64)> {
    let mut min_q = 0.0;
    let mut max_q = 0.0;

    for g in net.generators.iter().filter(|g| g.bus_id == bus_id) {
        let mut closest: Option<(f64, f64, f64)> = None; // (distance, min_q, max_q)
        for pt in net.curve_points.iter().filter(|p| p.generator_id == g.id) {
            let dist = (pt.p - g.target_p).abs();
            match closest {
                Some((best, _, _)) if dist >= best => {}
                _ => closest = Some((dist, pt.min_q, pt.max_q)),
            }
        }
        let (_, lo, hi) = closest.ok_or_else(|| Error::MissingCapabilityCurve {
            bus: bus_id.to_string(),
            generator: g.id.clone(),
        })?;
        min_q += lo;
        max_q += hi;
    }

    let load_q: f64 = net
        .loads
        .iter()
        .filter(|l| l.bus_id == bus_id)
        .map(|l| l.q0)
        .sum();

    Ok((pu.power(min_q - load_q), pu.power(max_q - load_q)))
}
