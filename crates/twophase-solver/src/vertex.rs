//! Exact solver for two-variable problems by enumerating the vertices of the
//! feasible polygon. Used to cross-check the tableau result.

use log::debug;

use crate::error::SolveError;
use crate::numeric::EQUALITY_EPS;
use crate::problem::{ConstraintOp, LpProblem};

/// Best feasible vertex
#[derive(Debug, Clone, PartialEq)]
pub struct VertexOptimum {
    /// Values of the two declared variables, in declaration order
    pub point: [f64; 2],
    pub objective_value: f64,
}

/// `a*x + b*y (op) c`
#[derive(Debug, Clone, Copy)]
struct HalfPlane {
    a: f64,
    b: f64,
    op: ConstraintOp,
    c: f64,
}

impl HalfPlane {
    fn contains(&self, x: f64, y: f64, eps: f64) -> bool {
        let diff = self.a * x + self.b * y - self.c;
        match self.op {
            ConstraintOp::Le => diff <= eps,
            ConstraintOp::Ge => -diff <= eps,
            ConstraintOp::Eq => diff.abs() <= EQUALITY_EPS,
        }
    }

    /// Whether moving along `(dx, dy)` forever keeps the constraint satisfied
    fn admits_direction(&self, dx: f64, dy: f64, eps: f64) -> bool {
        let dot = self.a * dx + self.b * dy;
        match self.op {
            ConstraintOp::Le => dot <= eps,
            ConstraintOp::Ge => dot >= -eps,
            ConstraintOp::Eq => dot.abs() <= eps,
        }
    }
}

fn intersect(l1: (f64, f64, f64), l2: (f64, f64, f64), eps: f64) -> Option<(f64, f64)> {
    let (a1, b1, c1) = l1;
    let (a2, b2, c2) = l2;
    let det = a1 * b2 - a2 * b1;
    if det.abs() < eps {
        return None;
    }
    let x = (c1 * b2 - c2 * b1) / det;
    let y = (a1 * c2 - a2 * c1) / det;
    (x.is_finite() && y.is_finite()).then_some((x, y))
}

pub fn solve(problem: &LpProblem, eps: f64) -> Result<VertexOptimum, SolveError> {
    if problem.num_variables() != 2 {
        return Err(SolveError::InvalidInput(
            "vertex enumeration needs exactly two variables".to_string(),
        ));
    }

    let half_planes: Vec<HalfPlane> = problem
        .constraints
        .iter()
        .map(|c| {
            let v = problem.coefficient_vector(&c.coefficients);
            HalfPlane {
                a: v[0],
                b: v[1],
                op: c.operator,
                c: c.rhs,
            }
        })
        .collect();
    let objective = problem.coefficient_vector(&problem.objective.coefficients);
    let direction = problem.objective.direction;

    let mut lines: Vec<(f64, f64, f64)> = half_planes.iter().map(|h| (h.a, h.b, h.c)).collect();
    lines.push((1.0, 0.0, 0.0));
    lines.push((0.0, 1.0, 0.0));

    let mut candidates = vec![(0.0, 0.0)];
    for (i, &l1) in lines.iter().enumerate() {
        for &l2 in &lines[i + 1..] {
            if let Some((x, y)) = intersect(l1, l2, eps) {
                let snap = |v: f64| if v.abs() < eps { 0.0 } else { v };
                candidates.push((snap(x), snap(y)));
            }
        }
    }

    let feasible = |x: f64, y: f64| {
        x >= -eps && y >= -eps && half_planes.iter().all(|h| h.contains(x, y, eps))
    };

    let mut best: Option<VertexOptimum> = None;
    for &(x, y) in &candidates {
        if !feasible(x, y) {
            continue;
        }
        let value = objective[0] * x + objective[1] * y;
        let improves = match &best {
            None => true,
            Some(current) => direction.improves(value, current.objective_value, eps),
        };
        if improves {
            best = Some(VertexOptimum {
                point: [x, y],
                objective_value: value,
            });
        }
    }

    let Some(best) = best else {
        return Err(SolveError::Infeasible("no feasible vertex".to_string()));
    };

    // The feasible set lies in the first quadrant, so its recession cone is
    // spanned by rays along the constraint lines or the axes.
    let mut rays = vec![(1.0, 0.0), (0.0, 1.0)];
    for h in &half_planes {
        let norm = h.a.hypot(h.b);
        if norm > eps {
            rays.push((h.b / norm, -h.a / norm));
            rays.push((-h.b / norm, h.a / norm));
        }
    }
    let improving_ray = rays.into_iter().find(|&(dx, dy)| {
        dx >= -eps
            && dy >= -eps
            && half_planes.iter().all(|h| h.admits_direction(dx, dy, eps))
            && direction.improves(objective[0] * dx + objective[1] * dy, 0.0, eps)
    });
    if let Some((dx, dy)) = improving_ray {
        debug!("Improving recession direction ({}, {})", dx, dy);
        return Err(SolveError::Unbounded(
            "the feasible region is unbounded in an improving direction".to_string(),
        ));
    }

    debug!(
        "Vertex enumeration: {} candidates, best {:?} with value {}",
        candidates.len(),
        best.point,
        best.objective_value
    );
    Ok(best)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::numeric::EPS;
    use crate::problem::Direction;

    fn problem(direction: Direction, objective: [f64; 2]) -> LpProblem {
        let mut p = LpProblem::new("2d", vec!["x1".to_string(), "x2".to_string()]);
        p.set_objective(direction, [(objective[0], "x1"), (objective[1], "x2")]);
        p
    }

    #[test]
    fn test_bounded_maximum() {
        let mut p = problem(Direction::Maximize, [5.0, 4.0]);
        p.add_constraint([(6.0, "x1"), (4.0, "x2")], ConstraintOp::Le, 24.0);
        p.add_constraint([(1.0, "x1"), (2.0, "x2")], ConstraintOp::Le, 6.0);

        let best = solve(&p, EPS).unwrap();
        assert!((best.objective_value - 21.0).abs() < 1e-9);
        assert!((best.point[0] - 3.0).abs() < 1e-9);
        assert!((best.point[1] - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_minimum_with_lower_bound() {
        let mut p = problem(Direction::Minimize, [2.0, 3.0]);
        p.add_constraint([(1.0, "x1"), (1.0, "x2")], ConstraintOp::Ge, 4.0);

        let best = solve(&p, EPS).unwrap();
        assert!((best.objective_value - 8.0).abs() < 1e-9);
        assert_eq!(best.point, [4.0, 0.0]);
    }

    #[test]
    fn test_equality_constraint() {
        let mut p = problem(Direction::Maximize, [1.0, 3.0]);
        p.add_constraint([(1.0, "x1"), (1.0, "x2")], ConstraintOp::Eq, 2.0);
        p.add_constraint([(0.0, "x1"), (1.0, "x2")], ConstraintOp::Le, 1.5);

        let best = solve(&p, EPS).unwrap();
        assert!((best.objective_value - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_infeasible() {
        let mut p = problem(Direction::Maximize, [1.0, 1.0]);
        p.add_constraint([(1.0, "x1"), (1.0, "x2")], ConstraintOp::Le, 5.0);
        p.add_constraint([(1.0, "x1"), (2.0, "x2")], ConstraintOp::Ge, 11.0);

        assert_eq!(solve(&p, EPS).unwrap_err().kind(), ErrorKind::Infeasible);
    }

    #[test]
    fn test_unbounded_region() {
        let mut p = problem(Direction::Maximize, [1.0, 1.0]);
        p.add_constraint([(1.0, "x1")], ConstraintOp::Ge, 0.0);
        p.add_constraint([(1.0, "x2")], ConstraintOp::Ge, 0.0);
        assert_eq!(solve(&p, EPS).unwrap_err().kind(), ErrorKind::Unbounded);

        // Unbounded region, bounded objective
        let mut p = problem(Direction::Minimize, [1.0, 1.0]);
        p.add_constraint([(1.0, "x1"), (-1.0, "x2")], ConstraintOp::Le, 1.0);
        let best = solve(&p, EPS).unwrap();
        assert_eq!(best.objective_value, 0.0);
    }

    #[test]
    fn test_ray_along_constraint_line() {
        // x2 - x1 <= 1 and x1 - x2 <= 1 leave the strip around x1 = x2
        let mut p = problem(Direction::Maximize, [1.0, 0.0]);
        p.add_constraint([(-1.0, "x1"), (1.0, "x2")], ConstraintOp::Le, 1.0);
        p.add_constraint([(1.0, "x1"), (-1.0, "x2")], ConstraintOp::Le, 1.0);
        assert_eq!(solve(&p, EPS).unwrap_err().kind(), ErrorKind::Unbounded);
    }
}
