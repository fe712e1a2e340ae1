use std::fmt;

use log::{debug, info};

use crate::error::SolveError;
use crate::numeric::{EPS, PHASE_ONE_MAX_ITERATIONS, PHASE_TWO_MAX_ITERATIONS};
use crate::tableau::Tableau;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Auxiliary feasibility problem
    One,
    /// Original objective
    Two,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::One => write!(f, "Phase I"),
            Phase::Two => write!(f, "Phase II"),
        }
    }
}

/// Result of running the simplex loop to optimality
#[derive(Debug, Clone)]
pub struct Execution {
    /// Final tableau
    pub tableau: Tableau,
    /// Snapshot before the first pivot and after every pivot
    pub history: Vec<Tableau>,
}

/// Primal simplex loop with an iteration cap
#[derive(Debug, Clone)]
pub struct Executor {
    phase: Phase,
    max_iterations: usize,
    tolerance: f64,
    /// Leading columns holding decision variables
    decision_columns: usize,
}

impl Executor {
    pub fn phase_one() -> Self {
        Self {
            phase: Phase::One,
            max_iterations: PHASE_ONE_MAX_ITERATIONS,
            tolerance: EPS,
            decision_columns: 0,
        }
    }

    pub fn phase_two(decision_columns: usize) -> Self {
        Self {
            phase: Phase::Two,
            max_iterations: PHASE_TWO_MAX_ITERATIONS,
            tolerance: EPS,
            decision_columns,
        }
    }

    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    pub fn with_tolerance(mut self, tol: f64) -> Self {
        self.tolerance = tol;
        self
    }

    pub fn run(&self, mut tableau: Tableau) -> Result<Execution, SolveError> {
        let mut history = vec![tableau.clone()];

        for iteration in 0..self.max_iterations {
            let Some(col) = tableau.find_pivot_column(self.tolerance) else {
                info!("{}: optimal after {} pivots", self.phase, iteration);
                return Ok(Execution { tableau, history });
            };

            let Some(row) = tableau.find_pivot_row(col, self.tolerance) else {
                if self.phase == Phase::Two && self.is_unbounded(&tableau) {
                    info!("{}: column {} has no leaving row", self.phase, tableau.label(col));
                    return Err(SolveError::Unbounded(
                        "the objective can improve without bound".to_string(),
                    ));
                }
                debug!(
                    "{}: no leaving row for {}, stopping as optimal",
                    self.phase,
                    tableau.label(col)
                );
                return Ok(Execution { tableau, history });
            };

            debug!(
                "{} pivot {}: {} enters, {} leaves (row {}, column {})",
                self.phase,
                iteration + 1,
                tableau.label(col),
                tableau.label(tableau.basis[row]),
                row,
                col
            );
            tableau.pivot(row, col);
            history.push(tableau.clone());
        }

        if tableau.find_pivot_column(self.tolerance).is_none() {
            return Ok(Execution { tableau, history });
        }
        info!("{}: no convergence within {} iterations", self.phase, self.max_iterations);
        Err(SolveError::not_converged())
    }

    /// Some decision variable still has a clearly improving reduced cost
    fn is_unbounded(&self, tableau: &Tableau) -> bool {
        tableau.objective()[..self.decision_columns.min(tableau.rhs_col())]
            .iter()
            .any(|&v| v < -self.tolerance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::problem::{ConstraintOp, Direction, LpProblem};

    fn scenario_a() -> Tableau {
        let mut problem = LpProblem::new("a", vec!["x1".to_string(), "x2".to_string()]);
        problem.set_objective(Direction::Maximize, [(5.0, "x1"), (4.0, "x2")]);
        problem.add_constraint([(6.0, "x1"), (4.0, "x2")], ConstraintOp::Le, 24.0);
        problem.add_constraint([(1.0, "x1"), (2.0, "x2")], ConstraintOp::Le, 6.0);
        Tableau::initial(&problem)
    }

    #[test]
    fn test_runs_to_optimum_with_history() {
        let start = scenario_a();
        let execution = Executor::phase_two(2).run(start.clone()).unwrap();

        assert_eq!(execution.history.len(), 3);
        assert_eq!(execution.history[0], start);
        assert_eq!(execution.history.last(), Some(&execution.tableau));
        assert_eq!(execution.tableau.basis, vec![0, 1]);
        assert!((execution.tableau.objective_rhs() - 21.0).abs() < 1e-9);
    }

    #[test]
    fn test_snapshots_do_not_alias() {
        let execution = Executor::phase_two(2).run(scenario_a()).unwrap();
        assert_eq!(execution.history[0].basis, vec![2, 3]);
        assert_eq!(execution.history[1].basis, vec![0, 3]);
    }

    #[test]
    fn test_iteration_cap() {
        let result = Executor::phase_two(2).with_max_iterations(1).run(scenario_a());
        assert_eq!(result.unwrap_err().kind(), ErrorKind::InvalidInput);

        // Converging exactly on the last allowed pivot is fine
        let result = Executor::phase_two(2).with_max_iterations(2).run(scenario_a());
        assert!(result.is_ok());
    }

    #[test]
    fn test_tolerance_reaches_pivot_selection() {
        // Reduced costs -5 and -4 are not below -10
        let start = scenario_a();
        let execution = Executor::phase_two(2).with_tolerance(10.0).run(start.clone()).unwrap();
        assert_eq!(execution.history.len(), 1);
        assert_eq!(execution.tableau, start);
    }

    #[test]
    fn test_unbounded_column() {
        // max x1 + x2 with -x1 <= 0, -x2 <= 0
        let mut problem = LpProblem::new("c", vec!["x1".to_string(), "x2".to_string()]);
        problem.set_objective(Direction::Maximize, [(1.0, "x1"), (1.0, "x2")]);
        problem.add_constraint([(-1.0, "x1")], ConstraintOp::Le, 0.0);
        problem.add_constraint([(-1.0, "x2")], ConstraintOp::Le, 0.0);

        let result = Executor::phase_two(2).run(Tableau::initial(&problem));
        assert_eq!(result.unwrap_err().kind(), ErrorKind::Unbounded);
    }

    #[test]
    fn test_missing_row_on_slack_column_is_optimal() {
        let tableau = Tableau {
            matrix: vec![vec![1.0, 0.0, -1.0, 3.0], vec![0.0, 0.0, -1.0, 0.0]],
            basis: vec![0],
            non_basis: vec![1, 2],
            objective_row: vec![0.0, 0.0, -1.0, 0.0],
            labels: vec!["x1".into(), "x2".into(), "s1".into()],
        };
        let execution = Executor::phase_two(2).run(tableau).unwrap();
        assert_eq!(execution.history.len(), 1);

        let tableau = execution.tableau;
        assert!(Executor::phase_one().run(tableau).is_ok());
    }
}
