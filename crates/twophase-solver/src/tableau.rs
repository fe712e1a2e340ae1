use crate::problem::{ConstraintOp, LpProblem};

/// Dense simplex tableau.
///
/// The last row is the objective row and the last column holds the
/// right-hand sides. `basis[i]` is the column of the variable that is basic in
/// constraint row `i`; `non_basis` lists every other non-RHS column.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Clone, PartialEq)]
pub struct Tableau {
    pub matrix: Vec<Vec<f64>>,
    pub basis: Vec<usize>,
    pub non_basis: Vec<usize>,
    /// Objective row as it was when the tableau was built
    pub objective_row: Vec<f64>,
    /// One name per non-RHS column
    pub labels: Vec<String>,
}

impl Tableau {
    /// Builds the slack/surplus tableau of `problem`.
    ///
    /// Row `i` gets `+1` (for `<=`) or `-1` (otherwise) in column `n + i`, and
    /// that column starts out basic. The objective row holds `-c` when
    /// maximizing and `+c` when minimizing, so the most negative entry always
    /// points at an improving column.
    pub fn initial(problem: &LpProblem) -> Self {
        let n = problem.num_variables();
        let m = problem.num_constraints();
        let total_vars = n + m;

        let mut matrix = vec![vec![0.0; total_vars + 1]; m + 1];
        let mut labels = problem.variables.clone();

        for (i, c) in problem.constraints.iter().enumerate() {
            let row = &mut matrix[i];
            row[..n].copy_from_slice(&problem.coefficient_vector(&c.coefficients));
            if c.operator == ConstraintOp::Le {
                row[n + i] = 1.0;
                labels.push(format!("s{}", i + 1));
            } else {
                row[n + i] = -1.0;
                labels.push(format!("e{}", i + 1));
            }
            row[total_vars] = c.rhs;
        }

        let objective = problem.coefficient_vector(&problem.objective.coefficients);
        for (j, c) in objective.iter().enumerate() {
            matrix[m][j] = -c;
        }

        let mut tableau = Self {
            objective_row: Vec::new(),
            basis: (n..total_vars).collect(),
            non_basis: (0..n).collect(),
            matrix,
            labels,
        };
        if problem.is_minimization() {
            tableau.to_maximization_row();
        }
        tableau.objective_row = tableau.objective().to_vec();
        tableau
    }

    pub fn num_rows(&self) -> usize {
        self.matrix.len()
    }

    pub fn num_cols(&self) -> usize {
        self.matrix.first().map_or(0, Vec::len)
    }

    pub fn num_constraints(&self) -> usize {
        self.num_rows().saturating_sub(1)
    }

    pub fn rhs_col(&self) -> usize {
        self.num_cols().saturating_sub(1)
    }

    pub fn objective(&self) -> &[f64] {
        &self.matrix[self.num_rows() - 1]
    }

    /// Right-hand side of the objective row
    pub fn objective_rhs(&self) -> f64 {
        self.matrix[self.num_rows() - 1][self.rhs_col()]
    }

    pub fn rhs(&self, row: usize) -> f64 {
        self.matrix[row][self.rhs_col()]
    }

    /// Row holding `col` as its basic variable, if any
    pub fn basic_row(&self, col: usize) -> Option<usize> {
        self.basis.iter().position(|&b| b == col)
    }

    pub fn label(&self, col: usize) -> String {
        self.labels
            .get(col)
            .cloned()
            .unwrap_or_else(|| format!("x{}", col))
    }

    /// Negates the whole objective row in place
    pub fn to_maximization_row(&mut self) {
        let last = self.num_rows() - 1;
        for v in &mut self.matrix[last] {
            *v = -*v;
        }
    }

    /// Column with the most negative objective entry below `-eps`; the first
    /// one wins ties. `None` means the tableau is optimal.
    pub fn find_pivot_column(&self, eps: f64) -> Option<usize> {
        let objective = self.objective();
        let mut min_val = -eps;
        let mut min_col = None;

        for (j, &v) in objective[..self.rhs_col()].iter().enumerate() {
            if v < min_val {
                min_val = v;
                min_col = Some(j);
            }
        }
        min_col
    }

    /// Minimum ratio test over rows whose entry in `col` exceeds `eps`; the
    /// first one wins ties. `None` means the column is unbounded.
    pub fn find_pivot_row(&self, col: usize, eps: f64) -> Option<usize> {
        let rhs_col = self.rhs_col();
        let mut min_ratio = f64::INFINITY;
        let mut min_row = None;

        for i in 0..self.num_constraints() {
            let val = self.matrix[i][col];
            if val > eps {
                let ratio = self.matrix[i][rhs_col] / val;
                if ratio >= -eps && ratio < min_ratio {
                    min_ratio = ratio;
                    min_row = Some(i);
                }
            }
        }
        min_row
    }

    /// Makes `col` basic in `row`, moving the leaving column into the non-basis.
    /// Call before [`Tableau::iterate`].
    pub fn swap_basis(&mut self, row: usize, col: usize) {
        let leaving = self.basis[row];
        self.basis[row] = col;
        if let Some(slot) = self.non_basis.iter_mut().find(|c| **c == col) {
            *slot = leaving;
        }
    }

    /// Gauss-Jordan pivot on `(row, col)`
    pub fn iterate(&mut self, row: usize, col: usize) {
        let pivot_val = self.matrix[row][col];
        for v in &mut self.matrix[row] {
            *v /= pivot_val;
        }

        let pivot_row = self.matrix[row].clone();
        for (i, current) in self.matrix.iter_mut().enumerate() {
            if i == row {
                continue;
            }
            let factor = current[col];
            if factor == 0.0 {
                continue;
            }
            for (v, p) in current.iter_mut().zip(&pivot_row) {
                *v -= factor * p;
            }
        }
    }

    /// `swap_basis` followed by `iterate`
    pub fn pivot(&mut self, row: usize, col: usize) {
        self.swap_basis(row, col);
        self.iterate(row, col);
    }
}
