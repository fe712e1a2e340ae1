use thiserror::Error;

/// Why a problem could not be solved
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolveError {
    /// Malformed input, or the simplex loop did not converge
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// No point satisfies every constraint
    #[error("No feasible solution: {0}")]
    Infeasible(String),
    /// The objective improves without bound
    #[error("Unbounded: {0}")]
    Unbounded(String),
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    #[cfg_attr(feature = "serde", serde(rename = "ENTRADA_INVALIDA"))]
    InvalidInput,
    #[cfg_attr(feature = "serde", serde(rename = "SIN_SOLUCION"))]
    Infeasible,
    #[cfg_attr(feature = "serde", serde(rename = "NO_ACOTADA"))]
    Unbounded,
}

/// Serializable `{kind, message}` form of a [`SolveError`]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorReport {
    pub kind: ErrorKind,
    pub message: String,
}

impl ErrorKind {
    /// Stable wire code
    pub fn code(self) -> &'static str {
        match self {
            ErrorKind::InvalidInput => "ENTRADA_INVALIDA",
            ErrorKind::Infeasible => "SIN_SOLUCION",
            ErrorKind::Unbounded => "NO_ACOTADA",
        }
    }
}

impl SolveError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SolveError::InvalidInput(_) => ErrorKind::InvalidInput,
            SolveError::Infeasible(_) => ErrorKind::Infeasible,
            SolveError::Unbounded(_) => ErrorKind::Unbounded,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            SolveError::InvalidInput(m) | SolveError::Infeasible(m) | SolveError::Unbounded(m) => m,
        }
    }

    pub fn not_converged() -> Self {
        SolveError::InvalidInput("the simplex method did not converge".to_string())
    }

    pub fn report(&self) -> ErrorReport {
        ErrorReport {
            kind: self.kind(),
            message: self.message().to_string(),
        }
    }
}
