use crate::model::{BalanceRhs, Constraint, ConstraintExpr, FlowTerm, Model, Trig};
use pretty_dtoa::{dtoa, FmtFloatConfig};

const FLOAT_CONFIG: FmtFloatConfig = FmtFloatConfig::default()
    .add_point_zero(false)
    .max_significant_digits(9);

fn num(f: f64) -> String {
    dtoa(f, FLOAT_CONFIG)
}

/// Renders a flow term as the closed-form algebra the solver sees,
/// with ratio factors of 1 and zero shunt terms elided.
fn format_term(m: &Model, t: &FlowTerm) -> String {
    let vi = &m.variables[t.near_v].name;
    let vj = &m.variables[t.far_v].name;
    let phi_i = &m.variables[t.near_phi].name;
    let phi_j = &m.variables[t.far_phi].name;
    let trig = match t.trig {
        Trig::Sin => "sin",
        Trig::Cos => "cos",
    };

    let rn = if t.ratio_near == 1.0 {
        String::new()
    } else {
        format!("{}*", num(t.ratio_near))
    };
    let rf = if t.ratio_far == 1.0 {
        String::new()
    } else {
        format!("{}*", num(t.ratio_far))
    };
    let shunt = if t.shunt == 0.0 {
        String::new()
    } else {
        format!("{}*{rn}{vi} + ", num(t.shunt))
    };

    format!(
        "{rn}{vi}*({shunt}{y}*{rn}{vi}*{trig}({ksi}) - {y}*{rf}{vj}*{trig}({ksi} - {phi_i} + {phi_j}))",
        y = num(t.y),
        ksi = num(t.ksi),
    )
}

fn format_constraint(m: &Model, c: &Constraint) -> String {
    match &c.expr {
        ConstraintExpr::Balance { terms, rhs } => {
            let lhs = terms
                .iter()
                .map(|t| format_term(m, t))
                .collect::<Vec<String>>()
                .join("\n      + ");
            let rhs = match rhs {
                BalanceRhs::Fixed(v) => num(*v),
                BalanceRhs::Var(i) => m.variables[*i].name.clone(),
            };
            format!("  {}:\n        {} == {}", c.name, lhs, rhs)
        }
        ConstraintExpr::FixVar { var, value } => {
            format!("  {}: {} == {}", c.name, m.variables[*var].name, num(*value))
        }
    }
}

/// Human-readable rendering of a compiled model: variables with bounds
/// and start values, the objective, and every constraint in emission
/// order.
pub fn format_model(m: &Model) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "{} variables, {} constraints\n\nvariables\n",
        m.num_variables(),
        m.num_constraints()
    ));
    for v in &m.variables {
        out.push_str(&format!(
            "  {} in [{}, {}], start {}\n",
            v.name,
            num(v.lower),
            num(v.upper),
            num(v.initial)
        ));
    }

    out.push_str("\nminimize\n  ");
    if m.objective.terms.is_empty() {
        out.push_str("0");
    } else {
        let terms: Vec<String> = m
            .objective
            .terms
            .iter()
            .map(|d| format!("({} - {})^2", m.variables[d.var].name, num(d.target)))
            .collect();
        out.push_str(&terms.join(" + "));
    }
    out.push('\n');

    out.push_str("\nsubject to\n");
    for c in &m.constraints {
        out.push_str(&format_constraint(m, c));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile::{compile, CompileOpt};
    use crate::tests::two_bus;
    use anyhow::Result;

    #[test]
    fn format_mentions_every_variable_and_constraint() -> Result<()> {
        let model = compile(&two_bus(), &CompileOpt::default())?;
        let text = format_model(&model);

        for v in &model.variables {
            assert!(text.contains(&v.name), "missing {}", v.name);
        }
        for c in &model.constraints {
            assert!(text.contains(&c.name), "missing {}", c.name);
        }
        assert!(text.contains("sin("));
        assert!(text.contains("cos("));
        Ok(())
    }
}
