mod error;
mod executor;
pub mod numeric;
mod phase_one;
pub mod preprocess;
mod problem;
mod solution;
mod solver;
mod tableau;
pub mod vertex;

pub use error::{ErrorKind, ErrorReport, SolveError};
pub use executor::{Execution, Executor, Phase};
pub use phase_one::{PhaseOneTableau, phase_two_tableau, reduced_objective_row};
pub use preprocess::{Validation, can_use_standard_form, normalize_to_le, validate};
pub use problem::{Constraint, ConstraintOp, Direction, LpProblem, Objective, Term};
pub use solution::{IterationRecord, Solution, iteration_records};
pub use solver::Solver;
pub use tableau::Tableau;
pub use vertex::VertexOptimum;
