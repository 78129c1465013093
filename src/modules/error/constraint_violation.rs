use std::error;
use std::fmt;

/// The type of constraint violation that caused the error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintViolationType {
    Unique,
    ForeignKey,
    NotNull,
    Other,
}

impl fmt::Display for ConstraintViolationType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConstraintViolationType::Unique => write!(f, "Unique"),
            ConstraintViolationType::ForeignKey => write!(f, "Foreign Key"),
            ConstraintViolationType::NotNull => write!(f, "Not Null"),
            ConstraintViolationType::Other => write!(f, "Other"),
        }
    }
}

/// An error which is returned because of a database constraint violation.
///
/// For profiles this is raised when an email or mobile number is already taken by any tenant, or
/// when a `(tenant_id, profile_id)` pair already exists.
#[derive(Debug)]
pub struct ConstraintViolationError {
    violation_type: ConstraintViolationType,
    source: Option<Box<dyn error::Error + Send + Sync>>,
}

impl ConstraintViolationError {
    /// Constructs a new `ConstraintViolationError` from a specified violation type.
    pub fn with_violation_type(violation_type: ConstraintViolationType) -> Self {
        Self {
            violation_type,
            source: None,
        }
    }

    /// Constructs a new `ConstraintViolationError` from a specified violation type and source
    /// error.
    pub fn from_source_with_violation_type(
        violation_type: ConstraintViolationType,
        source: Box<dyn error::Error + Send + Sync>,
    ) -> Self {
        Self {
            violation_type,
            source: Some(source),
        }
    }

    /// Returns the violation type of this error.
    pub fn violation_type(&self) -> &ConstraintViolationType {
        &self.violation_type
    }
}

impl error::Error for ConstraintViolationError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match &self.source {
            Some(s) => Some(&**s),
            None => None,
        }
    }
}

impl fmt::Display for ConstraintViolationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.source {
            Some(s) => write!(
                f,
                "{} constraint violated: {}",
                self.violation_type, s
            ),
            None => write!(f, "{} constraint violated", self.violation_type),
        }
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;

    #[test]
    fn test_display_with_violation_type() {
        let err = ConstraintViolationError::with_violation_type(ConstraintViolationType::Unique);
        assert_eq!(format!("{}", err), "Unique constraint violated");
        assert_eq!(err.violation_type(), &ConstraintViolationType::Unique);
    }

    #[test]
    fn test_display_from_source() {
        let err = ConstraintViolationError::from_source_with_violation_type(
            ConstraintViolationType::Unique,
            "UNIQUE constraint failed: profiles.email".into(),
        );
        assert_eq!(
            format!("{}", err),
            "Unique constraint violated: UNIQUE constraint failed: profiles.email"
        );
    }
}
