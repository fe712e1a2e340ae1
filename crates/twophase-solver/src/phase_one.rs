use log::debug;

use crate::numeric::CLEANUP_EPS;
use crate::problem::{Constraint, ConstraintOp, LpProblem};
use crate::tableau::Tableau;

/// Auxiliary tableau for finding a first feasible basis
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseOneTableau {
    pub tableau: Tableau,
    /// Columns holding artificial variables
    pub artificial_columns: Vec<usize>,
}

impl PhaseOneTableau {
    /// Builds the Phase I tableau, or `None` if no artificial variable is needed.
    ///
    /// Rows with a negative right-hand side are negated first. Then `<=` rows
    /// get a slack column, `>=` rows a surplus and an artificial column, and
    /// `=` rows an artificial column. The objective row maximizes minus the sum
    /// of the artificials, reduced against the starting basis and stored
    /// negated, so its RHS reads `-w`.
    pub fn build(problem: &LpProblem) -> Option<Self> {
        let n = problem.num_variables();
        let m = problem.num_constraints();

        let oriented: Vec<Constraint> = problem
            .constraints
            .iter()
            .map(|c| if c.rhs < 0.0 { c.negated() } else { c.clone() })
            .collect();

        let mut labels = problem.variables.clone();
        let mut row_slack = vec![None; m];
        let mut row_surplus = vec![None; m];
        let mut row_artificial = vec![None; m];
        let mut artificial_columns = Vec::new();

        for (i, c) in oriented.iter().enumerate() {
            match c.operator {
                ConstraintOp::Le => {
                    row_slack[i] = Some(labels.len());
                    labels.push(format!("s{}", i + 1));
                }
                ConstraintOp::Ge => {
                    row_surplus[i] = Some(labels.len());
                    labels.push(format!("e{}", i + 1));
                    row_artificial[i] = Some(labels.len());
                    artificial_columns.push(labels.len());
                    labels.push(format!("a{}", i + 1));
                }
                ConstraintOp::Eq => {
                    row_artificial[i] = Some(labels.len());
                    artificial_columns.push(labels.len());
                    labels.push(format!("a{}", i + 1));
                }
            }
        }

        if artificial_columns.is_empty() {
            return None;
        }

        let cols = labels.len() + 1;
        let rhs_col = cols - 1;
        let mut matrix = vec![vec![0.0; cols]; m + 1];

        for (i, c) in oriented.iter().enumerate() {
            let row = &mut matrix[i];
            row[..n].copy_from_slice(&problem.coefficient_vector(&c.coefficients));
            if let Some(s) = row_slack[i] {
                row[s] = 1.0;
            }
            if let Some(e) = row_surplus[i] {
                row[e] = -1.0;
            }
            if let Some(a) = row_artificial[i] {
                row[a] = 1.0;
            }
            row[rhs_col] = c.rhs;
        }

        let mut objective = vec![0.0; cols];
        for &a in &artificial_columns {
            objective[a] = -1.0;
        }
        for (i, row) in matrix[..m].iter().enumerate() {
            if row_artificial[i].is_some() {
                for (o, v) in objective.iter_mut().zip(row) {
                    *o += v;
                }
            }
        }
        for o in &mut objective {
            *o = -*o;
        }
        matrix[m] = objective.clone();

        // Every row has either a slack or an artificial column
        let basis: Vec<usize> = (0..m)
            .map(|i| row_slack[i].or(row_artificial[i]).unwrap_or(0))
            .collect();
        let non_basis = (0..rhs_col).filter(|j| !basis.contains(j)).collect();

        debug!(
            "Phase I tableau: {} rows, {} columns, artificial columns {:?}",
            m + 1,
            cols,
            artificial_columns
        );

        Some(Self {
            tableau: Tableau {
                matrix,
                basis,
                non_basis,
                objective_row: objective,
                labels,
            },
            artificial_columns,
        })
    }

    pub fn is_artificial(&self, col: usize) -> bool {
        self.artificial_columns.contains(&col)
    }

    /// The auxiliary optimum is numerically zero
    pub fn is_feasible(&self, eps: f64) -> bool {
        self.tableau.objective_rhs() >= -eps
    }

    /// Pivots every artificial still basic (at value zero) out of the basis,
    /// using the first non-artificial column with a nonzero entry in its row.
    pub fn pivot_out_artificial(&mut self, eps: f64) {
        let rhs_col = self.tableau.rhs_col();
        for i in 0..self.tableau.num_constraints() {
            if !self.is_artificial(self.tableau.basis[i]) {
                continue;
            }
            let entering = (0..rhs_col)
                .find(|&j| !self.is_artificial(j) && self.tableau.matrix[i][j].abs() > eps);
            if let Some(j) = entering {
                debug!("Pivoting artificial {} out of row {}", self.tableau.label(self.tableau.basis[i]), i);
                self.tableau.pivot(i, j);
            }
        }
    }
}

/// Phase II starting tableau from a feasible Phase I tableau.
///
/// Artificial columns are dropped, and so is any row whose basic variable is
/// still artificial: such a row has no nonzero entry outside the artificial
/// columns, so it is a redundant constraint. The objective row is rebuilt from
/// the original objective and reduced against the remaining basis.
pub fn phase_two_tableau(problem: &LpProblem, phase_one: &PhaseOneTableau) -> Tableau {
    let source = &phase_one.tableau;
    let keep: Vec<usize> = (0..source.num_cols())
        .filter(|&c| !phase_one.is_artificial(c))
        .collect();

    let mut new_index = vec![None; source.num_cols()];
    for (new, &old) in keep.iter().enumerate() {
        new_index[old] = Some(new);
    }

    let mut matrix: Vec<Vec<f64>> = Vec::with_capacity(source.num_rows());
    let mut basis = Vec::with_capacity(source.num_constraints());
    for i in 0..source.num_constraints() {
        let Some(b) = new_index[source.basis[i]] else {
            debug!("Dropping redundant row {}", i);
            continue;
        };
        matrix.push(keep.iter().map(|&c| source.matrix[i][c]).collect());
        basis.push(b);
    }
    matrix.push(vec![0.0; keep.len()]);

    let rhs_col = keep.len() - 1;
    let labels = keep[..rhs_col].iter().map(|&c| source.label(c)).collect();
    let non_basis = (0..rhs_col).filter(|j| !basis.contains(j)).collect();

    let mut tableau = Tableau {
        matrix,
        basis,
        non_basis,
        objective_row: Vec::new(),
        labels,
    };
    let objective = reduced_objective_row(problem, &tableau);
    let last = tableau.num_rows() - 1;
    tableau.matrix[last] = objective.clone();
    tableau.objective_row = objective;
    tableau
}

/// The original objective (`-c` to maximize, `+c` to minimize) expressed in
/// reduced form against the current basis of `tableau`.
pub fn reduced_objective_row(problem: &LpProblem, tableau: &Tableau) -> Vec<f64> {
    let sign = if problem.is_minimization() { 1.0 } else { -1.0 };
    let mut row = vec![0.0; tableau.num_cols()];
    for (j, c) in problem
        .coefficient_vector(&problem.objective.coefficients)
        .into_iter()
        .enumerate()
    {
        row[j] = sign * c;
    }

    for (i, &b) in tableau.basis.iter().enumerate() {
        let factor = row[b];
        if factor.abs() > CLEANUP_EPS {
            for (r, v) in row.iter_mut().zip(&tableau.matrix[i]) {
                *r -= factor * v;
            }
        }
    }
    row
}
