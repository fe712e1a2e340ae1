use log::{debug, info, warn};

use crate::error::SolveError;
use crate::executor::{Execution, Executor};
use crate::numeric::{
    DEFAULT_DECIMALS, EPS, MAX_DECIMALS, PHASE_ONE_MAX_ITERATIONS, PHASE_TWO_MAX_ITERATIONS, round,
};
use crate::phase_one::{PhaseOneTableau, phase_two_tableau};
use crate::preprocess::{Validation, can_use_standard_form, normalize_to_le, validate};
use crate::problem::LpProblem;
use crate::solution::Solution;
use crate::tableau::Tableau;
use crate::vertex;

/// Two-phase simplex solver for linear programming problems
#[derive(Debug, Clone)]
pub struct Solver {
    /// Maximum Phase II iterations before giving up
    max_iterations: usize,
    /// Maximum Phase I iterations before giving up
    phase_one_max_iterations: usize,
    /// Tolerance for floating point comparisons
    tolerance: f64,
    /// Decimals kept in returned values
    decimals: u32,
    /// Validate two-variable results by vertex enumeration
    cross_check: bool,
}

impl Default for Solver {
    fn default() -> Self {
        Self {
            max_iterations: PHASE_TWO_MAX_ITERATIONS,
            phase_one_max_iterations: PHASE_ONE_MAX_ITERATIONS,
            tolerance: EPS,
            decimals: DEFAULT_DECIMALS,
            cross_check: true,
        }
    }
}

impl Solver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    pub fn with_phase_one_max_iterations(mut self, max: usize) -> Self {
        self.phase_one_max_iterations = max;
        self
    }

    pub fn with_tolerance(mut self, tol: f64) -> Self {
        self.tolerance = tol;
        self
    }

    /// Values are rounded to at most [`MAX_DECIMALS`] places
    pub fn with_decimals(mut self, decimals: u32) -> Self {
        self.decimals = decimals.min(MAX_DECIMALS);
        self
    }

    pub fn with_cross_check(mut self, enabled: bool) -> Self {
        self.cross_check = enabled;
        self
    }

    /// Solve the LP problem using the two-phase simplex method
    pub fn solve(&self, problem: &LpProblem) -> Result<Solution, SolveError> {
        match validate(problem) {
            Validation::Valid => {}
            Validation::Invalid(reason) => return Err(SolveError::InvalidInput(reason)),
            Validation::Infeasible(reason) => return Err(SolveError::Infeasible(reason)),
        }
        info!(
            "Solving '{}': {} variables, {} constraints",
            problem.name,
            problem.num_variables(),
            problem.num_constraints()
        );

        let (start, phase_one_history) = self.prepare(problem)?;

        let phase_two = Executor::phase_two(problem.num_variables())
            .with_max_iterations(self.max_iterations)
            .with_tolerance(self.tolerance);
        let Execution { tableau, history } = match phase_two.run(start) {
            Ok(execution) => execution,
            Err(err @ SolveError::Unbounded(_)) => return self.unbounded_fallback(problem, err),
            Err(err) => return Err(err),
        };

        let mut iterations = phase_one_history;
        iterations.extend(history);
        let solution = Solution::extract(&tableau, problem, iterations, self.decimals);
        info!("Objective value {}", solution.objective_value);

        Ok(self.cross_checked(problem, solution))
    }

    /// Phase II starting tableau, plus the Phase I snapshots when Phase I ran
    fn prepare(&self, problem: &LpProblem) -> Result<(Tableau, Vec<Tableau>), SolveError> {
        let normalized = normalize_to_le(problem);
        let phase_one = if can_use_standard_form(&normalized) {
            None
        } else {
            PhaseOneTableau::build(problem)
        };
        let Some(mut phase_one) = phase_one else {
            debug!("Slack basis is feasible, skipping Phase I");
            return Ok((Tableau::initial(&normalized), Vec::new()));
        };

        let Execution { tableau, history } = Executor::phase_one()
            .with_max_iterations(self.phase_one_max_iterations)
            .with_tolerance(self.tolerance)
            .run(phase_one.tableau)?;
        phase_one.tableau = tableau;

        if !phase_one.is_feasible(self.tolerance) {
            info!("Phase I optimum {} is below zero", phase_one.tableau.objective_rhs());
            return Err(SolveError::Infeasible(
                "Phase I could not drive the artificial variables to zero".to_string(),
            ));
        }

        phase_one.pivot_out_artificial(self.tolerance);
        Ok((phase_two_tableau(problem, &phase_one), history))
    }

    /// An unbounded verdict from the tableau is replaced by a bounded vertex
    /// optimum when one exists.
    fn unbounded_fallback(&self, problem: &LpProblem, err: SolveError) -> Result<Solution, SolveError> {
        if !self.cross_check || problem.num_variables() != 2 {
            return Err(err);
        }
        match vertex::solve(problem, self.tolerance) {
            Ok(best) => {
                warn!("Tableau reported an unbounded objective, vertex enumeration found {}", best.objective_value);
                Ok(Solution::from_values(problem, &best.point, Vec::new()).rounded(self.decimals))
            }
            Err(_) => Err(err),
        }
    }

    /// Replaces the tableau result with the vertex optimum when that is
    /// strictly better. Both objectives are compared at output precision.
    fn cross_checked(&self, problem: &LpProblem, solution: Solution) -> Solution {
        if !self.cross_check || problem.num_variables() != 2 {
            return solution;
        }
        let Ok(best) = vertex::solve(problem, self.tolerance) else {
            return solution;
        };
        let candidate = round(best.objective_value, self.decimals);
        if !problem
            .objective
            .direction
            .improves(candidate, solution.objective_value, self.tolerance)
        {
            return solution;
        }

        warn!(
            "Vertex enumeration improves the tableau objective from {} to {}",
            solution.objective_value, candidate
        );
        Solution::from_values(problem, &best.point, solution.iterations).rounded(self.decimals)
    }
}
