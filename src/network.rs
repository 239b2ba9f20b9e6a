use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// Network is a frozen snapshot of an electrical transmission network,
/// exposed as read-only tables keyed by stable string identifiers.
///
/// Compilation never mutates a snapshot; a changed network requires a
/// fresh snapshot and a fresh compile.
#[derive(Clone, Default, Builder, Serialize, Deserialize)]
#[builder(default)]
#[serde(default)]
pub struct Network {
    /// Electrical nodes.
    pub buses: Vec<Bus>,

    /// Voltage levels referenced by buses.
    pub voltage_levels: Vec<VoltageLevel>,

    /// AC transmission lines and cables.
    pub lines: Vec<Line>,

    /// Two-winding transformers.
    pub transformers: Vec<Transformer>,

    /// Generating units.
    pub generators: Vec<Generator>,

    /// Reactive capability curve points, keyed by generator.
    pub curve_points: Vec<ReactiveCapabilityPoint>,

    /// Static loads.
    pub loads: Vec<Load>,
}

impl Network {
    pub fn voltage_level(&self, id: &str) -> Option<&VoltageLevel> {
        self.voltage_levels.iter().find(|vl| vl.id == id)
    }

    pub fn num_buses(&self) -> usize {
        self.buses.len()
    }

    pub fn num_branches(&self) -> usize {
        self.lines.len() + self.transformers.len()
    }
}

/// Bus is a node in the network graph.
#[derive(Clone, Serialize, Deserialize)]
pub struct Bus {
    pub id: String,

    /// Voltage level this bus belongs to.
    pub voltage_level_id: String,

    /// Measured voltage magnitude (kV). `None` when unmeasured; an
    /// absent measurement is never coerced to zero.
    #[serde(default)]
    pub v_mag: Option<f64>,
}

/// VoltageLevel carries the nominal voltage and operating limits shared
/// by every bus that references it.
#[derive(Clone, Serialize, Deserialize)]
pub struct VoltageLevel {
    pub id: String,

    /// Nominal voltage (kV). Voltage base for per-unit conversion.
    pub nominal_v: f64,

    /// Low operating voltage limit (kV). `None` leaves the lower
    /// voltage bound at zero.
    #[serde(default)]
    pub low_voltage_limit: Option<f64>,

    /// High operating voltage limit (kV). `None` leaves the upper
    /// voltage bound unbounded.
    #[serde(default)]
    pub high_voltage_limit: Option<f64>,
}

/// Line is an AC transmission line or cable with a pi-model shunt at
/// each end.
#[derive(Clone, Serialize, Deserialize)]
pub struct Line {
    pub id: String,

    pub bus1_id: String,
    pub bus2_id: String,

    /// Series resistance (ohm).
    pub r: f64,

    /// Series reactance (ohm).
    pub x: f64,

    /// Shunt conductance at the bus1 end (S).
    pub g1: f64,

    /// Shunt susceptance at the bus1 end (S).
    pub b1: f64,

    /// Shunt conductance at the bus2 end (S).
    pub g2: f64,

    /// Shunt susceptance at the bus2 end (S).
    pub b2: f64,
}

/// Transformer is a two-winding transformer. Its off-nominal turns
/// ratio is derived from the rated voltages and the nominal voltages of
/// the two endpoint buses.
#[derive(Clone, Serialize, Deserialize)]
pub struct Transformer {
    pub id: String,

    pub bus1_id: String,
    pub bus2_id: String,

    /// Series resistance (ohm).
    pub r: f64,

    /// Series reactance (ohm).
    pub x: f64,

    /// Rated voltage at the bus1 side (kV).
    pub rated_u1: f64,

    /// Rated voltage at the bus2 side (kV).
    pub rated_u2: f64,
}

/// Generator is a generating unit attached to a bus.
///
/// Regulation is modeled as acting at the generator's own bus, even
/// where the data describes remote regulation. Known modeling
/// approximation.
#[derive(Clone, Serialize, Deserialize)]
pub struct Generator {
    pub id: String,

    pub bus_id: String,

    /// Active power target (MW).
    pub target_p: f64,

    /// Reactive power target (MVAr).
    pub target_q: f64,

    /// Whether the unit regulates voltage. A bus hosting at least one
    /// regulating unit is a PV bus.
    pub voltage_regulator_on: bool,
}

/// ReactiveCapabilityPoint is one point of a generator's reactive
/// capability curve: the Q limits that apply at active power `p`.
#[derive(Clone, Serialize, Deserialize)]
pub struct ReactiveCapabilityPoint {
    pub generator_id: String,

    /// Active power coordinate (MW).
    pub p: f64,

    /// Minimum reactive power at `p` (MVAr).
    pub min_q: f64,

    /// Maximum reactive power at `p` (MVAr).
    pub max_q: f64,
}

/// Load is a static consumption attached to a bus.
#[derive(Clone, Serialize, Deserialize)]
pub struct Load {
    pub id: String,

    pub bus_id: String,

    /// Active power consumption (MW).
    pub p0: f64,

    /// Reactive power consumption (MVAr).
    pub q0: f64,
}
