/// Default power base (MW).
pub const DEFAULT_S_BASE: f64 = 100.0;

/// Per-unit base system.
///
/// Power uses a single global base. Voltage is normalized per bus by
/// its voltage level's nominal voltage. Admittance has no single global
/// base: for a branch between buses at nominal voltages `vi` and `vj`
/// the base is `s_base / (vi * vj)`, so the base differs per endpoint
/// pair wherever a transformer joins two voltage levels.
#[derive(Debug, Clone, Copy)]
pub struct PerUnit {
    /// Power base (MW).
    pub s_base: f64,
}

impl Default for PerUnit {
    fn default() -> Self {
        Self {
            s_base: DEFAULT_S_BASE,
        }
    }
}

impl PerUnit {
    pub fn new(s_base: f64) -> Self {
        Self { s_base }
    }

    /// Power (MW or MVAr) in per-unit.
    pub fn power(&self, mw: f64) -> f64 {
        mw / self.s_base
    }

    /// Voltage magnitude in per-unit of its nominal voltage.
    pub fn voltage(&self, kv: f64, nominal_kv: f64) -> f64 {
        kv / nominal_kv
    }

    /// Normalizes an optional measurement, propagating absence. A NaN
    /// reading counts as absent, never as zero.
    pub fn voltage_opt(&self, kv: Option<f64>, nominal_kv: f64) -> Option<f64> {
        kv.filter(|v| v.is_finite())
            .map(|v| self.voltage(v, nominal_kv))
    }

    /// Admittance base (S) for a branch joining buses at the given
    /// nominal voltages.
    pub fn admittance_base(&self, nominal_i: f64, nominal_j: f64) -> f64 {
        self.s_base / nominal_i / nominal_j
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn power_uses_global_base() {
        let pu = PerUnit::new(100.0);
        assert_eq!(pu.power(50.0), 0.5);
        assert_eq!(pu.power(-30.0), -0.3);
    }

    #[test]
    fn admittance_base_is_per_endpoint_pair() {
        let pu = PerUnit::new(100.0);
        // Same level on both sides.
        assert_eq!(pu.admittance_base(220.0, 220.0), 100.0 / 220.0 / 220.0);
        // Across a transformer the base mixes both levels.
        assert_eq!(pu.admittance_base(220.0, 63.0), 100.0 / 220.0 / 63.0);
    }

    #[test]
    fn absent_measurement_stays_absent() {
        let pu = PerUnit::default();
        assert_eq!(pu.voltage_opt(None, 220.0), None);
        assert_eq!(pu.voltage_opt(Some(f64::NAN), 220.0), None);
        assert_eq!(pu.voltage_opt(Some(218.0), 220.0), Some(218.0 / 220.0));
    }
}
