/// A decision variable of the compiled program.
#[derive(Debug, Clone)]
pub struct Variable {
    /// Solver-facing name, e.g. `v[BUS1]`, `phi[BUS1]`, `q[BUS1]`.
    pub name: String,

    /// Lower bound. `f64::NEG_INFINITY` for free variables.
    pub lower: f64,

    /// Upper bound. `f64::INFINITY` for free variables.
    pub upper: f64,

    /// Initial value, already clamped into [lower, upper].
    pub initial: f64,
}

impl Variable {
    pub fn free(name: String, initial: f64) -> Self {
        Self {
            name,
            lower: f64::NEG_INFINITY,
            upper: f64::INFINITY,
            initial,
        }
    }

    pub fn bounded(name: String, lower: f64, upper: f64, initial: f64) -> Self {
        // Not f64::clamp, which panics when malformed limit data leaves
        // lower above upper.
        Self {
            name,
            lower,
            upper,
            initial: initial.max(lower).min(upper),
        }
    }
}

/// Trigonometric flavor of a balance: sine terms carry active power,
/// cosine terms reactive power.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trig {
    Sin,
    Cos,
}

impl Trig {
    fn apply(self, a: f64) -> f64 {
        match self {
            Trig::Sin => a.sin(),
            Trig::Cos => a.cos(),
        }
    }
}

/// One branch endpoint's contribution to a power balance, in closed
/// form over the variable vector:
///
/// ```text
/// rn*V[i] * ( shunt*rn*V[i] + y*rn*V[i]*trig(ksi)
///             - y*rf*V[j]*trig(ksi - Phi[i] + Phi[j]) )
/// ```
///
/// with `rn`/`rf` the near/far turns-ratio factors and `shunt` the
/// signed near-end shunt (+g for active, -b for reactive). The same
/// form serves both branch orientations and both balance kinds.
#[derive(Debug, Clone)]
pub struct FlowTerm {
    pub near_v: usize,
    pub far_v: usize,
    pub near_phi: usize,
    pub far_phi: usize,
    pub y: f64,
    pub ksi: f64,
    pub shunt: f64,
    pub ratio_near: f64,
    pub ratio_far: f64,
    pub trig: Trig,
}

impl FlowTerm {
    pub fn eval(&self, x: &[f64]) -> f64 {
        let vi = x[self.near_v];
        let vj = x[self.far_v];
        let shifted = self.ksi - x[self.near_phi] + x[self.far_phi];
        let rn = self.ratio_near;
        let rf = self.ratio_far;

        rn * vi
            * (self.shunt * rn * vi + self.y * rn * vi * self.trig.apply(self.ksi)
                - self.y * rf * vj * self.trig.apply(shifted))
    }
}

/// Right-hand side of a power balance.
#[derive(Debug, Clone)]
pub enum BalanceRhs {
    /// Net scheduled injection, generation minus load (pu).
    Fixed(f64),

    /// A free reactive injection variable (PV buses).
    Var(usize),
}

/// Closed-form equality constraint.
#[derive(Debug, Clone)]
pub enum ConstraintExpr {
    /// Sum of branch flow terms equals the right-hand side.
    Balance {
        terms: Vec<FlowTerm>,
        rhs: BalanceRhs,
    },

    /// A variable pinned to a value (the slack phase reference).
    FixVar { var: usize, value: f64 },
}

/// Named equality constraint, `residual(x) == 0` when satisfied.
#[derive(Debug, Clone)]
pub struct Constraint {
    pub name: String,
    pub expr: ConstraintExpr,
}

impl Constraint {
    pub fn residual(&self, x: &[f64]) -> f64 {
        match &self.expr {
            ConstraintExpr::Balance { terms, rhs } => {
                let lhs: f64 = terms.iter().map(|t| t.eval(x)).sum();
                let rhs = match rhs {
                    BalanceRhs::Fixed(v) => *v,
                    BalanceRhs::Var(i) => x[*i],
                };
                lhs - rhs
            }
            ConstraintExpr::FixVar { var, value } => x[*var] - value,
        }
    }
}

/// One least-squares objective term, `(x[var] - target)^2`.
#[derive(Debug, Clone)]
pub struct Deviation {
    pub var: usize,

    /// Measured voltage magnitude (pu).
    pub target: f64,
}

/// Least-squares deviation objective over the measured PQ voltages.
/// Buses without a measurement contribute nothing.
#[derive(Debug, Clone, Default)]
pub struct Objective {
    pub terms: Vec<Deviation>,
}

impl Objective {
    pub fn value(&self, x: &[f64]) -> f64 {
        self.terms
            .iter()
            .map(|d| (x[d.var] - d.target) * (x[d.var] - d.target))
            .sum()
    }
}

/// The compiled nonlinear program: a least-squares objective subject to
/// the AC power-balance equalities. Built once per network snapshot and
/// never mutated afterwards.
#[derive(Debug, Clone)]
pub struct Model {
    pub variables: Vec<Variable>,
    pub objective: Objective,
    pub constraints: Vec<Constraint>,
}

impl Model {
    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// The clamped initial point, in variable order.
    pub fn initial_point(&self) -> Vec<f64> {
        self.variables.iter().map(|v| v.initial).collect()
    }

    pub fn objective_value(&self, x: &[f64]) -> f64 {
        self.objective.value(x)
    }

    /// Residual of every constraint at `x`, in emission order.
    pub fn residuals(&self, x: &[f64]) -> Vec<f64> {
        self.constraints.iter().map(|c| c.residual(x)).collect()
    }

    pub fn variable(&self, name: &str) -> Option<(usize, &Variable)> {
        self.variables
            .iter()
            .enumerate()
            .find(|(_, v)| v.name == name)
    }

    pub fn constraint(&self, name: &str) -> Option<&Constraint> {
        self.constraints.iter().find(|c| c.name == name)
    }
}
