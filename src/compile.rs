use crate::bounds::{reactive_bounds, voltage_bounds};
use crate::branch::build_adjacency;
use crate::bus_types::bus_types;
use crate::error::{Error, Result};
use crate::model::{
    BalanceRhs, Constraint, ConstraintExpr, Deviation, FlowTerm, Model, Objective, Trig, Variable,
};
use crate::network::Network;
use crate::per_unit::{PerUnit, DEFAULT_S_BASE};
use crate::slack::find_slack;
use log::debug;
use std::collections::{HashMap, HashSet};

/// Compilation options.
#[derive(Debug, Clone, Copy)]
pub struct CompileOpt {
    /// Global power base (MW).
    pub s_base: f64,
}

impl Default for CompileOpt {
    fn default() -> Self {
        Self {
            s_base: DEFAULT_S_BASE,
        }
    }
}

/// Compiles a frozen network snapshot into the initial-voltage-plan
/// nonlinear program.
///
/// Pure function over the snapshot: classification, slack selection,
/// per-unit normalization, admittance evaluation, balance constraints,
/// bounds and the least-squares objective, in that order. The returned
/// model is immutable; a changed network requires a fresh compile.
///
/// Variable order is V for every bus, then Phi for every bus, then Q
/// for every non-slack PV bus, each block in ascending bus identifier
/// order. Constraints are emitted as active balances, the slack phase
/// reference, then reactive balances, buses ascending. Both orders are
/// stable across compiles of the same snapshot.
pub fn compile(net: &Network, opt: &CompileOpt) -> Result<Model> {
    let pu = PerUnit::new(opt.s_base);

    let mut bus_ids: Vec<&str> = net.buses.iter().map(|b| b.id.as_str()).collect();
    bus_ids.sort_unstable();
    let nb = bus_ids.len();
    let bus_index: HashMap<String, usize> = bus_ids
        .iter()
        .enumerate()
        .map(|(i, id)| (id.to_string(), i))
        .collect();

    // Per-bus nominal voltage and operating bounds, erroring early on a
    // dangling voltage level reference.
    let mut nominal_v = Vec::with_capacity(nb);
    let mut v_bounds = Vec::with_capacity(nb);
    let mut v_measured = Vec::with_capacity(nb);
    for id in &bus_ids {
        let b = net.buses.iter().find(|b| b.id == *id).unwrap();
        let vl = net
            .voltage_level(&b.voltage_level_id)
            .ok_or_else(|| Error::UnknownVoltageLevel {
                bus: b.id.clone(),
                voltage_level: b.voltage_level_id.clone(),
            })?;
        nominal_v.push(vl.nominal_v);
        v_bounds.push(voltage_bounds(vl));
        v_measured.push(pu.voltage_opt(b.v_mag, vl.nominal_v));
    }

    let (pv, pq) = bus_types(&net.buses, &net.generators);
    let slack = find_slack(net, &pv)?;
    let slack_idx = bus_index[&slack];
    let pv_set: HashSet<usize> = pv.iter().map(|id| bus_index[id]).collect();
    let pq_set: HashSet<usize> = pq.iter().map(|id| bus_index[id]).collect();
    debug!(
        "classified {} PV / {} PQ buses, slack {}",
        pv.len(),
        pq.len(),
        slack
    );

    let adjacency = build_adjacency(net, &pu, &bus_index, &nominal_v);

    // Variables: V block, Phi block, Q block.
    let mut variables = Vec::with_capacity(2 * nb + pv.len());
    for (i, id) in bus_ids.iter().enumerate() {
        let (lo, hi) = v_bounds[i];
        let init = v_measured[i].unwrap_or(1.0);
        variables.push(Variable::bounded(format!("v[{id}]"), lo.max(0.0), hi, init));
    }
    let phi_offset = nb;
    for id in &bus_ids {
        variables.push(Variable::free(format!("phi[{id}]"), 0.0));
    }
    let mut q_var: HashMap<usize, usize> = HashMap::new();
    for id in &pv {
        let i = bus_index[id];
        if i == slack_idx {
            continue;
        }
        let (lo, hi) = reactive_bounds(net, &pu, id)?;
        q_var.insert(i, variables.len());
        variables.push(Variable::bounded(format!("q[{id}]"), lo, hi, 0.0));
    }

    // Net scheduled injections, generation minus load, in per-unit.
    let mut p_rhs = vec![0.0; nb];
    let mut q_rhs = vec![0.0; nb];
    for g in &net.generators {
        if let Some(&i) = bus_index.get(&g.bus_id) {
            p_rhs[i] += pu.power(g.target_p);
            q_rhs[i] += pu.power(g.target_q);
        }
    }
    for l in &net.loads {
        if let Some(&i) = bus_index.get(&l.bus_id) {
            p_rhs[i] -= pu.power(l.p0);
            q_rhs[i] -= pu.power(l.q0);
        }
    }

    let terms_for = |i: usize, trig: Trig| -> Vec<FlowTerm> {
        adjacency
            .incident(i)
            .iter()
            .map(|end| FlowTerm {
                near_v: end.near,
                far_v: end.far,
                near_phi: phi_offset + end.near,
                far_phi: phi_offset + end.far,
                y: end.y,
                ksi: end.ksi,
                shunt: match trig {
                    Trig::Sin => end.g,
                    Trig::Cos => -end.b,
                },
                ratio_near: end.ratio_near,
                ratio_far: end.ratio_far,
                trig,
            })
            .collect()
    };

    let mut constraints = Vec::new();

    // Active power balances. The slack bus is skipped by definition;
    // isolated buses are skipped because they have no physically
    // meaningful balance and would otherwise pin their injection to
    // zero.
    for (i, id) in bus_ids.iter().enumerate() {
        if i == slack_idx {
            continue;
        }
        let terms = terms_for(i, Trig::Sin);
        if terms.is_empty() {
            continue;
        }
        constraints.push(Constraint {
            name: format!("p_balance[{id}]"),
            expr: ConstraintExpr::Balance {
                terms,
                rhs: BalanceRhs::Fixed(p_rhs[i]),
            },
        });
    }

    constraints.push(Constraint {
        name: format!("phase_ref[{slack}]"),
        expr: ConstraintExpr::FixVar {
            var: phi_offset + slack_idx,
            value: 0.0,
        },
    });

    // Reactive power balances: fixed schedule at PQ buses, the free Q
    // variable at PV buses.
    for (i, id) in bus_ids.iter().enumerate() {
        if i == slack_idx {
            continue;
        }
        let terms = terms_for(i, Trig::Cos);
        if terms.is_empty() {
            continue;
        }
        let rhs = if pv_set.contains(&i) {
            BalanceRhs::Var(q_var[&i])
        } else {
            BalanceRhs::Fixed(q_rhs[i])
        };
        constraints.push(Constraint {
            name: format!("q_balance[{id}]"),
            expr: ConstraintExpr::Balance { terms, rhs },
        });
    }

    // Least-squares fit to the measured PQ voltages. Unmeasured buses
    // contribute nothing.
    let objective = Objective {
        terms: bus_ids
            .iter()
            .enumerate()
            .filter(|(i, _)| pq_set.contains(i))
            .filter_map(|(i, _)| v_measured[i].map(|target| Deviation { var: i, target }))
            .collect(),
    };

    debug!(
        "compiled model: {} variables, {} constraints, {} objective terms",
        variables.len(),
        constraints.len(),
        objective.terms.len()
    );
    Ok(Model {
        variables,
        objective,
        constraints,
    })
}
