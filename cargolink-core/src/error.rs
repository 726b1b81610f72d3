use rocket::http::Status;
use thiserror::Error;

/// Use for mapping errors in functions that can throw multiple errors.
///
/// Every variant knows the http status it is reported with.
#[derive(Debug, Error, PartialEq)]
pub enum CargoLinkError {
    #[error("{0}")]
    Validation(String),
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("unauthorized")]
    Unauthorized,
    #[error("{0}")]
    Forbidden(String),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("{0}")]
    Conflict(String),
    /// Detail is logged where the error is raised, never returned to clients
    #[error("internal server error")]
    Internal(String),
}

impl CargoLinkError {
    pub fn status(&self) -> Status {
        match self {
            CargoLinkError::Validation(_) => Status::BadRequest,
            CargoLinkError::InvalidCredentials | CargoLinkError::Unauthorized => {
                Status::Unauthorized
            }
            CargoLinkError::Forbidden(_) => Status::Forbidden,
            CargoLinkError::NotFound(_) => Status::NotFound,
            CargoLinkError::Conflict(_) => Status::Conflict,
            CargoLinkError::Internal(_) => Status::InternalServerError,
        }
    }

    /// Shorthand for a missing required request field
    pub fn missing(field: &str) -> Self {
        CargoLinkError::Validation(format!("missing required field: {}", field))
    }
}

// Tests
//-------------------------------------------------------------------------------
