/// A linear programming problem over non-negative decision variables
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct LpProblem {
    /// Problem name (informational only)
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: String,
    /// Objective function
    pub objective: Objective,
    /// Constraints, in declaration order
    pub constraints: Vec<Constraint>,
    /// Declared decision variable names; column order of every tableau
    pub variables: Vec<String>,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Objective {
    /// Whether to maximize or minimize
    #[cfg_attr(feature = "serde", serde(rename = "type", alias = "direction"))]
    pub direction: Direction,
    /// Objective terms
    pub coefficients: Vec<Term>,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    #[cfg_attr(feature = "serde", serde(rename = "max"))]
    Maximize,
    #[cfg_attr(feature = "serde", serde(rename = "min"))]
    Minimize,
}

/// A single `value * variable` term
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Term {
    pub variable: String,
    pub value: f64,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    /// Left-hand side terms
    pub coefficients: Vec<Term>,
    /// Comparison operator
    pub operator: ConstraintOp,
    /// Right-hand side value
    #[cfg_attr(feature = "serde", serde(rename = "rightSide"))]
    pub rhs: f64,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintOp {
    /// Less than or equal (<=)
    #[cfg_attr(feature = "serde", serde(rename = "<="))]
    Le,
    /// Greater than or equal (>=)
    #[cfg_attr(feature = "serde", serde(rename = ">="))]
    Ge,
    /// Equal (=)
    #[cfg_attr(feature = "serde", serde(rename = "="))]
    Eq,
}

impl Direction {
    /// True when `candidate` improves on `incumbent` by more than `eps`
    pub fn improves(self, candidate: f64, incumbent: f64, eps: f64) -> bool {
        match self {
            Direction::Maximize => candidate > incumbent + eps,
            Direction::Minimize => candidate < incumbent - eps,
        }
    }
}

impl ConstraintOp {
    /// The operator obtained by multiplying both sides by -1
    pub fn flipped(self) -> Self {
        match self {
            ConstraintOp::Le => ConstraintOp::Ge,
            ConstraintOp::Ge => ConstraintOp::Le,
            ConstraintOp::Eq => ConstraintOp::Eq,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            ConstraintOp::Le => "<=",
            ConstraintOp::Ge => ">=",
            ConstraintOp::Eq => "=",
        }
    }
}

impl Term {
    pub fn new(variable: impl Into<String>, value: f64) -> Self {
        Self {
            variable: variable.into(),
            value,
        }
    }
}

impl Constraint {
    /// Both sides multiplied by -1, operator flipped accordingly
    pub fn negated(&self) -> Self {
        Self {
            coefficients: self
                .coefficients
                .iter()
                .map(|t| Term::new(t.variable.clone(), -t.value))
                .collect(),
            operator: self.operator.flipped(),
            rhs: -self.rhs,
        }
    }
}

impl LpProblem {
    pub fn new(name: impl Into<String>, variables: Vec<String>) -> Self {
        Self {
            name: name.into(),
            objective: Objective {
                direction: Direction::Maximize,
                coefficients: Vec::new(),
            },
            constraints: Vec::new(),
            variables,
        }
    }

    pub fn set_objective<S: Into<String>>(
        &mut self,
        direction: Direction,
        terms: impl IntoIterator<Item = (f64, S)>,
    ) {
        self.objective = Objective {
            direction,
            coefficients: terms.into_iter().map(|(v, name)| Term::new(name, v)).collect(),
        };
    }

    pub fn add_constraint<S: Into<String>>(
        &mut self,
        terms: impl IntoIterator<Item = (f64, S)>,
        operator: ConstraintOp,
        rhs: f64,
    ) {
        self.constraints.push(Constraint {
            coefficients: terms.into_iter().map(|(v, name)| Term::new(name, v)).collect(),
            operator,
            rhs,
        });
    }

    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_minimization(&self) -> bool {
        self.objective.direction == Direction::Minimize
    }

    pub fn variable_index(&self, name: &str) -> Option<usize> {
        self.variables.iter().position(|v| v == name)
    }

    /// Lays `terms` out in declared-variable order. Undeclared variables are
    /// ignored and repeated terms are summed.
    pub fn coefficient_vector(&self, terms: &[Term]) -> Vec<f64> {
        let mut vector = vec![0.0; self.num_variables()];
        for term in terms {
            if let Some(idx) = self.variable_index(&term.variable) {
                vector[idx] += term.value;
            }
        }
        vector
    }

    /// Objective value at `values` (indexed like `variables`)
    pub fn evaluate_objective(&self, values: &[f64]) -> f64 {
        self.coefficient_vector(&self.objective.coefficients)
            .iter()
            .zip(values)
            .map(|(c, x)| c * x)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coefficient_vector_orders_and_sums() {
        let problem = LpProblem::new("p", vec!["x1".to_string(), "x2".to_string()]);
        let terms = vec![Term::new("x2", 3.0), Term::new("x1", 1.0), Term::new("x2", 0.5)];
        assert_eq!(problem.coefficient_vector(&terms), vec![1.0, 3.5]);
    }

    #[test]
    fn test_negated_constraint() {
        let c = Constraint {
            coefficients: vec![Term::new("x1", 2.0), Term::new("x2", -1.0)],
            operator: ConstraintOp::Ge,
            rhs: 4.0,
        };
        let n = c.negated();
        assert_eq!(n.operator, ConstraintOp::Le);
        assert_eq!(n.rhs, -4.0);
        assert_eq!(n.coefficients[0].value, -2.0);
        assert_eq!(n.coefficients[1].value, 1.0);
    }

    #[test]
    fn test_direction_improves() {
        assert!(Direction::Maximize.improves(2.0, 1.0, 1e-9));
        assert!(!Direction::Maximize.improves(1.0 + 1e-12, 1.0, 1e-9));
        assert!(Direction::Minimize.improves(1.0, 2.0, 1e-9));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_parse_problem_document() {
        let source = r#"{
            "name": "mix",
            "objective": { "type": "min", "coefficients": [{ "variable": "x1", "value": 2 }] },
            "constraints": [
                { "coefficients": [{ "variable": "x1", "value": 1 }], "operator": ">=", "rightSide": 4 },
                { "coefficients": [{ "variable": "x2", "value": 1 }], "operator": "=", "rightSide": 1 }
            ],
            "variables": ["x1", "x2"]
        }"#;
        let problem: LpProblem = serde_json::from_str(source).unwrap();
        assert_eq!(problem.objective.direction, Direction::Minimize);
        assert_eq!(problem.constraints[0].operator, ConstraintOp::Ge);
        assert_eq!(problem.constraints[0].rhs, 4.0);
        assert_eq!(problem.constraints[1].operator, ConstraintOp::Eq);

        let aliased = source.replace("\"type\"", "\"direction\"");
        let problem: LpProblem = serde_json::from_str(&aliased).unwrap();
        assert!(problem.is_minimization());
    }
}
