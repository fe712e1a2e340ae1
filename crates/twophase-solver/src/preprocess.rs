use std::collections::{BTreeMap, HashSet};

use crate::numeric::round;
use crate::problem::{ConstraintOp, LpProblem};

/// Number of decision variables the solver accepts
pub const SUPPORTED_VARIABLES: usize = 2;

/// Outcome of the cheap structural checks run before any tableau is built
#[derive(Debug, Clone, PartialEq)]
pub enum Validation {
    Valid,
    /// The constraints contradict each other
    Infeasible(String),
    /// The problem is malformed
    Invalid(String),
}

pub fn validate(problem: &LpProblem) -> Validation {
    if problem.objective.coefficients.is_empty() {
        return Validation::Invalid("the objective has no coefficients".to_string());
    }
    if problem.constraints.is_empty() {
        return Validation::Invalid("the problem has no constraints".to_string());
    }
    if problem.num_variables() != SUPPORTED_VARIABLES {
        return Validation::Invalid(format!(
            "expected {} variables, found {}",
            SUPPORTED_VARIABLES,
            problem.num_variables()
        ));
    }
    if let Err(reason) = check_declarations(problem) {
        return Validation::Invalid(reason);
    }

    if let Some(i) = sign_contradiction(problem) {
        return Validation::Infeasible(format!(
            "constraint {} has a negative right-hand side but only non-negative coefficients",
            i + 1
        ));
    }
    if has_direct_contradictions(problem) {
        return Validation::Infeasible(
            "constraints with identical coefficients have incompatible right-hand sides".to_string(),
        );
    }

    Validation::Valid
}

fn check_declarations(problem: &LpProblem) -> Result<(), String> {
    let mut seen = HashSet::new();
    for name in &problem.variables {
        if !seen.insert(name.as_str()) {
            return Err(format!("variable {} is declared more than once", name));
        }
    }

    let objective = problem.objective.coefficients.iter();
    let constraints = problem.constraints.iter().flat_map(|c| c.coefficients.iter());
    for term in objective.chain(constraints) {
        if !seen.contains(term.variable.as_str()) {
            return Err(format!("variable {} is not declared", term.variable));
        }
        if !term.value.is_finite() {
            return Err(format!("coefficient of {} is not a finite number", term.variable));
        }
    }

    if let Some(i) = problem.constraints.iter().position(|c| !c.rhs.is_finite()) {
        return Err(format!("constraint {} has a non-finite right-hand side", i + 1));
    }
    Ok(())
}

/// A row with negative RHS and only non-negative coefficients is rejected
/// whatever its operator.
fn sign_contradiction(problem: &LpProblem) -> Option<usize> {
    problem
        .constraints
        .iter()
        .position(|c| c.rhs < 0.0 && c.coefficients.iter().all(|t| t.value >= 0.0))
}

#[derive(Debug, Default)]
struct RhsGroup {
    le: Vec<f64>,
    ge: Vec<f64>,
    eq: Vec<f64>,
}

impl RhsGroup {
    fn push(&mut self, op: ConstraintOp, rhs: f64) {
        match op {
            ConstraintOp::Le => self.le.push(rhs),
            ConstraintOp::Ge => self.ge.push(rhs),
            ConstraintOp::Eq => self.eq.push(rhs),
        }
    }

    fn is_contradictory(&self) -> bool {
        let upper = self.le.iter().copied().fold(f64::INFINITY, f64::min);
        let lower = self.ge.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        if self.eq.iter().any(|&v| v > upper || v < lower) {
            return true;
        }
        lower > upper
    }
}

/// Detects rows such as `2x + 3y <= 5` and `2x + 3y >= 10`.
pub fn has_direct_contradictions(problem: &LpProblem) -> bool {
    let mut groups: BTreeMap<String, RhsGroup> = BTreeMap::new();

    for c in &problem.constraints {
        let key = problem
            .coefficient_vector(&c.coefficients)
            .iter()
            .map(|&v| format!("{:.8}", round(v, 8)))
            .collect::<Vec<_>>()
            .join("|");
        groups.entry(key).or_default().push(c.operator, c.rhs);
    }

    groups.values().any(RhsGroup::is_contradictory)
}

/// Rewrites every `>=` row as `<=` by negating both sides.
pub fn normalize_to_le(problem: &LpProblem) -> LpProblem {
    let mut normalized = problem.clone();
    for c in &mut normalized.constraints {
        if c.operator == ConstraintOp::Ge {
            *c = c.negated();
        }
    }
    normalized
}

/// True when slack columns alone give a feasible starting basis
pub fn can_use_standard_form(problem: &LpProblem) -> bool {
    problem
        .constraints
        .iter()
        .all(|c| c.operator == ConstraintOp::Le && c.rhs >= 0.0)
}
