use std::collections::BTreeMap;

use crate::numeric::round;
use crate::problem::LpProblem;
use crate::tableau::Tableau;

/// An optimal solution
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    pub optimal: bool,
    pub bounded: bool,
    /// Value of every declared variable
    pub variables: BTreeMap<String, f64>,
    pub objective_value: f64,
    /// Phase I snapshots followed by Phase II snapshots
    pub iterations: Vec<Tableau>,
}

/// Persistence-ready form of one iteration snapshot
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Clone, PartialEq)]
pub struct IterationRecord {
    /// 1-based
    pub iteration_number: usize,
    pub tableau: Vec<Vec<f64>>,
    /// Label of each row's basic variable mapped to its RHS
    pub basic_variables: BTreeMap<String, f64>,
    /// RHS of the objective row
    pub objective_value: f64,
    pub entering_var: Option<String>,
    pub leaving_var: Option<String>,
    pub is_optimal: bool,
}

impl Solution {
    /// Reads the solution off a final tableau.
    ///
    /// The objective value is recomputed from the original coefficients rather
    /// than read from the objective row, whose sign depends on how the tableau
    /// was built.
    pub fn extract(tableau: &Tableau, problem: &LpProblem, iterations: Vec<Tableau>, decimals: u32) -> Self {
        let n = problem.num_variables();
        let mut values = vec![0.0; n];
        for (row, &col) in tableau.basis.iter().enumerate() {
            if col < n {
                values[col] = tableau.rhs(row);
            }
        }
        Self::from_values(problem, &values, iterations).rounded(decimals)
    }

    /// Builds an optimal solution from values indexed like `problem.variables`
    pub fn from_values(problem: &LpProblem, values: &[f64], iterations: Vec<Tableau>) -> Self {
        let variables = problem
            .variables
            .iter()
            .enumerate()
            .map(|(j, name)| (name.clone(), values.get(j).copied().unwrap_or(0.0)))
            .collect();

        Self {
            optimal: true,
            bounded: true,
            variables,
            objective_value: problem.evaluate_objective(values),
            iterations,
        }
    }

    pub fn rounded(mut self, decimals: u32) -> Self {
        for v in self.variables.values_mut() {
            *v = round(*v, decimals);
        }
        self.objective_value = round(self.objective_value, decimals);
        self
    }

    pub fn value(&self, variable: &str) -> Option<f64> {
        self.variables.get(variable).copied()
    }

    pub fn iteration_records(&self) -> Vec<IterationRecord> {
        iteration_records(&self.iterations)
    }
}

/// Exports snapshots as records. Entering and leaving variables come from the
/// first row whose basic variable differs from the previous snapshot.
pub fn iteration_records(history: &[Tableau]) -> Vec<IterationRecord> {
    let last = history.len().saturating_sub(1);

    history
        .iter()
        .enumerate()
        .map(|(i, tableau)| {
            let basic_variables = tableau
                .basis
                .iter()
                .enumerate()
                .map(|(row, &col)| (tableau.label(col), tableau.rhs(row)))
                .collect();

            let (entering_var, leaving_var) = match i.checked_sub(1).map(|p| &history[p]) {
                Some(previous) => basis_change(previous, tableau),
                None => (None, None),
            };

            IterationRecord {
                iteration_number: i + 1,
                tableau: tableau.matrix.clone(),
                basic_variables,
                objective_value: tableau.objective_rhs(),
                entering_var,
                leaving_var,
                is_optimal: i == last,
            }
        })
        .collect()
}

/// Compares basic variables by label, so a Phase I snapshot and the Phase II
/// tableau built from it (different column layout) line up.
fn basis_change(previous: &Tableau, current: &Tableau) -> (Option<String>, Option<String>) {
    previous
        .basis
        .iter()
        .zip(&current.basis)
        .map(|(&before, &after)| (previous.label(before), current.label(after)))
        .find(|(before, after)| before != after)
        .map_or((None, None), |(leaving, entering)| (Some(entering), Some(leaving)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::{ConstraintOp, Direction};

    fn scenario_a() -> LpProblem {
        let mut problem = LpProblem::new("a", vec!["x1".to_string(), "x2".to_string()]);
        problem.set_objective(Direction::Maximize, [(5.0, "x1"), (4.0, "x2")]);
        problem.add_constraint([(6.0, "x1"), (4.0, "x2")], ConstraintOp::Le, 24.0);
        problem.add_constraint([(1.0, "x1"), (2.0, "x2")], ConstraintOp::Le, 6.0);
        problem
    }

    fn solved_history() -> Vec<Tableau> {
        let mut tableau = Tableau::initial(&scenario_a());
        let mut history = vec![tableau.clone()];
        tableau.pivot(0, 0);
        history.push(tableau.clone());
        tableau.pivot(1, 1);
        history.push(tableau);
        history
    }

    #[test]
    fn test_extract_reads_basic_rows() {
        let problem = scenario_a();
        let history = solved_history();
        let solution = Solution::extract(history.last().unwrap(), &problem, history.clone(), 6);

        assert_eq!(solution.value("x1"), Some(3.0));
        assert_eq!(solution.value("x2"), Some(1.5));
        assert_eq!(solution.objective_value, 21.0);
        assert!(solution.optimal && solution.bounded);
        assert_eq!(solution.iterations.len(), 3);
    }

    #[test]
    fn test_non_basic_variables_default_to_zero() {
        let problem = scenario_a();
        let tableau = Tableau::initial(&problem);
        let solution = Solution::extract(&tableau, &problem, Vec::new(), 6);

        assert_eq!(solution.variables.len(), 2);
        assert_eq!(solution.value("x1"), Some(0.0));
        assert_eq!(solution.value("x2"), Some(0.0));
        assert_eq!(solution.objective_value, 0.0);
    }

    #[test]
    fn test_rounding_absorbs_noise() {
        let problem = scenario_a();
        let solution = Solution::from_values(&problem, &[3.0000000001, 1.4999999999], Vec::new()).rounded(6);
        assert_eq!(solution.value("x1"), Some(3.0));
        assert_eq!(solution.value("x2"), Some(1.5));
        assert_eq!(solution.objective_value, 21.0);
    }

    #[test]
    fn test_iteration_records() {
        let records = iteration_records(&solved_history());
        assert_eq!(records.len(), 3);

        assert_eq!(records[0].iteration_number, 1);
        assert_eq!(records[0].entering_var, None);
        assert_eq!(records[0].leaving_var, None);
        assert_eq!(records[0].basic_variables.get("s1"), Some(&24.0));
        assert!(!records[0].is_optimal);

        assert_eq!(records[1].entering_var.as_deref(), Some("x1"));
        assert_eq!(records[1].leaving_var.as_deref(), Some("s1"));
        assert!((records[1].objective_value - 20.0).abs() < 1e-9);

        assert_eq!(records[2].entering_var.as_deref(), Some("x2"));
        assert_eq!(records[2].leaving_var.as_deref(), Some("s2"));
        assert!((records[2].objective_value - 21.0).abs() < 1e-9);
        assert!(records[2].is_optimal);
    }

    #[test]
    fn test_missing_labels_fall_back_to_index() {
        let mut history = solved_history();
        for t in &mut history {
            t.labels.clear();
        }
        let records = iteration_records(&history);
        assert_eq!(records[1].entering_var.as_deref(), Some("x0"));
        assert_eq!(records[1].leaving_var.as_deref(), Some("x2"));
    }
}
