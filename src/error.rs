use thiserror::Error;

/// Failure modes of model compilation.
///
/// `InvalidBranchReference` and `DegenerateBranch` are diagnostics: the
/// offending branch is excluded from the balance sums and compilation
/// continues. The remaining kinds abort the compile — a partially built
/// model is never returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// No voltage-regulating generator anywhere in the network, so no
    /// bus qualifies as the angle reference.
    #[error("no slack candidate: PV bus set is empty")]
    NoSlackCandidate,

    /// A PV bus needs reactive bounds but an attached generator has no
    /// capability curve points to derive them from.
    #[error("generator {generator} at PV bus {bus} has no reactive capability curve")]
    MissingCapabilityCurve { bus: String, generator: String },

    /// A bus references a voltage level that is not in the snapshot.
    /// Per-unit bases cannot be derived without the nominal voltage.
    #[error("bus {bus} references unknown voltage level {voltage_level}")]
    UnknownVoltageLevel { bus: String, voltage_level: String },

    /// A branch endpoint is not in the bus set. The branch is treated
    /// as not incident to anything.
    #[error("branch {branch} references bus {bus} which is not in the bus set")]
    InvalidBranchReference { branch: String, bus: String },

    /// Series impedance inverts to a non-finite admittance (r = x = 0).
    /// Including it would poison every constraint it touches.
    #[error("branch {branch} has degenerate series impedance")]
    DegenerateBranch { branch: String },
}

pub type Result<T> = std::result::Result<T, Error>;
