//! Structured events describing each profile operation.

use std::fmt;

/// The profile operation an event refers to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProfileOperation {
    Create,
    Delete,
    Search,
    Update,
    UploadImage,
}

impl fmt::Display for ProfileOperation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            ProfileOperation::Create => "create",
            ProfileOperation::Delete => "delete",
            ProfileOperation::Search => "search",
            ProfileOperation::Update => "update",
            ProfileOperation::UploadImage => "upload_image",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EventOutcome {
    Attempted,
    Succeeded,
    /// Carries the rendered error
    Failed(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProfileEvent {
    pub operation: ProfileOperation,
    pub outcome: EventOutcome,
    pub tenant_id: String,
    /// Unset for operations that do not target a single profile
    pub profile_id: Option<String>,
}

impl ProfileEvent {
    pub fn new(operation: ProfileOperation, tenant_id: &str, profile_id: Option<&str>) -> Self {
        Self {
            operation,
            outcome: EventOutcome::Attempted,
            tenant_id: tenant_id.to_string(),
            profile_id: profile_id.map(str::to_string),
        }
    }

    /// Returns a copy of the event with a different outcome
    pub fn with_outcome(&self, outcome: EventOutcome) -> Self {
        Self {
            outcome,
            ..self.clone()
        }
    }
}

impl fmt::Display for ProfileEvent {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} tenant={}", self.operation, self.tenant_id)?;
        if let Some(profile_id) = &self.profile_id {
            write!(f, " profile={}", profile_id)?;
        }
        match &self.outcome {
            EventOutcome::Attempted => write!(f, " attempted"),
            EventOutcome::Succeeded => write!(f, " succeeded"),
            EventOutcome::Failed(err) => write!(f, " failed: {}", err),
        }
    }
}

/// Receives profile events. Implementations must not fail the operation they observe.
pub trait ProfileEventSink: Send + Sync {
    fn emit(&self, event: &ProfileEvent);
}

/// Writes events to the `log` facade.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogEventSink;

impl ProfileEventSink for LogEventSink {
    fn emit(&self, event: &ProfileEvent) {
        match event.outcome {
            EventOutcome::Failed(_) => log::error!(target: "tenant_profiles::events", "{}", event),
            _ => log::info!(target: "tenant_profiles::events", "{}", event),
        }
    }
}
