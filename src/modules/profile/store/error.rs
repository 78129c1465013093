use std::error::Error;
use std::fmt;

#[cfg(feature = "diesel")]
use crate::modules::error::ConstraintViolationType;
use crate::modules::error::{
    ConstraintViolationError, InternalError, InvalidArgumentError, InvalidStateError,
    ResourceTemporarilyUnavailableError,
};

/// Errors that may occur during [`ProfileStore`](super::ProfileStore) operations.
///
/// "Nothing matched" is not an error: delete and update report it as `Ok(false)`.
#[derive(Debug)]
pub enum ProfileStoreError {
    /// The key, email or mobile number is already taken
    ConstraintViolation(ConstraintViolationError),
    Internal(InternalError),
    /// A required argument, such as either half of a profile key, was blank
    InvalidArgument(InvalidArgumentError),
    /// The search predicate or sort expression could not be evaluated
    InvalidQuery(InvalidArgumentError),
    InvalidState(InvalidStateError),
    /// The operation is reserved and has no implementation
    NotImplemented(String),
    /// The backend could not be reached or failed to run the statement
    StorageUnavailable(ResourceTemporarilyUnavailableError),
}

impl ProfileStoreError {
    /// Builds an `InvalidQuery` error for the named search argument.
    pub fn invalid_query(argument: &str, message: String) -> Self {
        ProfileStoreError::InvalidQuery(InvalidArgumentError::new(argument.to_string(), message))
    }
}

impl Error for ProfileStoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ProfileStoreError::ConstraintViolation(err) => err.source(),
            ProfileStoreError::Internal(err) => err.source(),
            ProfileStoreError::InvalidArgument(err) => err.source(),
            ProfileStoreError::InvalidQuery(err) => err.source(),
            ProfileStoreError::InvalidState(err) => err.source(),
            ProfileStoreError::NotImplemented(_) => None,
            ProfileStoreError::StorageUnavailable(err) => err.source(),
        }
    }
}

impl fmt::Display for ProfileStoreError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ProfileStoreError::ConstraintViolation(err) => f.write_str(&err.to_string()),
            ProfileStoreError::Internal(err) => f.write_str(&err.to_string()),
            ProfileStoreError::InvalidArgument(err) => f.write_str(&err.to_string()),
            ProfileStoreError::InvalidQuery(err) => write!(f, "invalid query: {}", err),
            ProfileStoreError::InvalidState(err) => f.write_str(&err.to_string()),
            ProfileStoreError::NotImplemented(operation) => {
                write!(f, "{} is not implemented", operation)
            }
            ProfileStoreError::StorageUnavailable(err) => f.write_str(&err.to_string()),
        }
    }
}

#[cfg(feature = "diesel")]
impl From<diesel::r2d2::PoolError> for ProfileStoreError {
    fn from(err: diesel::r2d2::PoolError) -> ProfileStoreError {
        ProfileStoreError::StorageUnavailable(ResourceTemporarilyUnavailableError::from_source(
            Box::new(err),
        ))
    }
}

#[cfg(feature = "diesel")]
impl From<diesel::result::Error> for ProfileStoreError {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::DatabaseError(ref kind, _) => match kind {
                diesel::result::DatabaseErrorKind::UniqueViolation => {
                    ProfileStoreError::ConstraintViolation(
                        ConstraintViolationError::from_source_with_violation_type(
                            ConstraintViolationType::Unique,
                            Box::new(err),
                        ),
                    )
                }
                diesel::result::DatabaseErrorKind::ForeignKeyViolation => {
                    ProfileStoreError::ConstraintViolation(
                        ConstraintViolationError::from_source_with_violation_type(
                            ConstraintViolationType::ForeignKey,
                            Box::new(err),
                        ),
                    )
                }
                diesel::result::DatabaseErrorKind::NotNullViolation => {
                    ProfileStoreError::ConstraintViolation(
                        ConstraintViolationError::from_source_with_violation_type(
                            ConstraintViolationType::NotNull,
                            Box::new(err),
                        ),
                    )
                }
                _ => ProfileStoreError::StorageUnavailable(
                    ResourceTemporarilyUnavailableError::from_source(Box::new(err)),
                ),
            },
            _ => ProfileStoreError::StorageUnavailable(
                ResourceTemporarilyUnavailableError::from_source(Box::new(err)),
            ),
        }
    }
}

impl From<InternalError> for ProfileStoreError {
    fn from(err: InternalError) -> Self {
        Self::Internal(err)
    }
}

impl From<InvalidArgumentError> for ProfileStoreError {
    fn from(err: InvalidArgumentError) -> Self {
        Self::InvalidArgument(err)
    }
}

impl From<InvalidStateError> for ProfileStoreError {
    fn from(err: InvalidStateError) -> Self {
        Self::InvalidState(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_implemented_display() {
        let err = ProfileStoreError::NotImplemented("upload_profile_image".into());
        assert_eq!(err.to_string(), "upload_profile_image is not implemented");
    }

    #[cfg(feature = "diesel")]
    #[test]
    fn test_diesel_not_found_is_storage_unavailable() {
        let err = ProfileStoreError::from(diesel::result::Error::NotFound);
        assert!(matches!(err, ProfileStoreError::StorageUnavailable(_)));
    }
}
