//! Shared test fixtures: snapshot row constructors and small networks.

use crate::network::{
    Bus, Generator, Line, Load, Network, NetworkBuilder, ReactiveCapabilityPoint, Transformer,
    VoltageLevel,
};

pub fn bus(id: &str, voltage_level_id: &str) -> Bus {
    Bus {
        id: id.to_string(),
        voltage_level_id: voltage_level_id.to_string(),
        v_mag: None,
    }
}

pub fn voltage_level(id: &str, nominal_v: f64) -> VoltageLevel {
    VoltageLevel {
        id: id.to_string(),
        nominal_v,
        low_voltage_limit: None,
        high_voltage_limit: None,
    }
}

pub fn line(id: &str, bus1_id: &str, bus2_id: &str, r: f64, x: f64) -> Line {
    Line {
        id: id.to_string(),
        bus1_id: bus1_id.to_string(),
        bus2_id: bus2_id.to_string(),
        r,
        x,
        g1: 0.0,
        b1: 0.0,
        g2: 0.0,
        b2: 0.0,
    }
}

pub fn transformer(
    id: &str,
    bus1_id: &str,
    bus2_id: &str,
    r: f64,
    x: f64,
    rated_u1: f64,
    rated_u2: f64,
) -> Transformer {
    Transformer {
        id: id.to_string(),
        bus1_id: bus1_id.to_string(),
        bus2_id: bus2_id.to_string(),
        r,
        x,
        rated_u1,
        rated_u2,
    }
}

pub fn gen(id: &str, bus_id: &str, target_p: f64, voltage_regulator_on: bool) -> Generator {
    Generator {
        id: id.to_string(),
        bus_id: bus_id.to_string(),
        target_p,
        target_q: 0.0,
        voltage_regulator_on,
    }
}

pub fn load(id: &str, bus_id: &str, p0: f64, q0: f64) -> Load {
    Load {
        id: id.to_string(),
        bus_id: bus_id.to_string(),
        p0,
        q0,
    }
}

pub fn curve_point(generator_id: &str, p: f64, min_q: f64, max_q: f64) -> ReactiveCapabilityPoint {
    ReactiveCapabilityPoint {
        generator_id: generator_id.to_string(),
        p,
        min_q,
        max_q,
    }
}

/// Three buses on one 220 kV level joined in a chain b1 - b2 - b3, so
/// b2 has two PV neighbors when all three are PV.
pub fn three_bus_chain() -> Network {
    NetworkBuilder::default()
        .buses(vec![bus("b1", "vl1"), bus("b2", "vl1"), bus("b3", "vl1")])
        .voltage_levels(vec![voltage_level("vl1", 220.0)])
        .lines(vec![
            line("l12", "b1", "b2", 0.01, 0.1),
            line("l23", "b2", "b3", 0.01, 0.1),
        ])
        .build()
        .unwrap()
}

/// The two-bus seed scenario: slack generator at `a` (220 kV nominal,
/// target 50 MW), 50 MW load and a 218 kV voltage measurement at `b`,
/// one line between them.
pub fn two_bus() -> Network {
    let mut b = bus("b", "vl1");
    b.v_mag = Some(218.0);
    NetworkBuilder::default()
        .buses(vec![bus("a", "vl1"), b])
        .voltage_levels(vec![voltage_level("vl1", 220.0)])
        .lines(vec![line("l1", "a", "b", 0.01, 0.1)])
        .generators(vec![gen("g1", "a", 50.0, true)])
        .loads(vec![load("ld1", "b", 50.0, 0.0)])
        .build()
        .unwrap()
}
