use std::fmt;

use crate::{NewJob, Priority};

/// Payload text a fresh form starts with.
pub const DEFAULT_PAYLOAD: &str = "{\n  \"key\": \"value\"\n}";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormField {
    #[default]
    TaskName,
    Priority,
    Payload,
}

impl FormField {
    pub fn next(self) -> Self {
        match self {
            FormField::TaskName => FormField::Priority,
            FormField::Priority => FormField::Payload,
            FormField::Payload => FormField::TaskName,
        }
    }

    pub fn previous(self) -> Self {
        match self {
            FormField::TaskName => FormField::Payload,
            FormField::Priority => FormField::TaskName,
            FormField::Payload => FormField::Priority,
        }
    }
}

/// Local validation failures; none of these reach the network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    MissingTaskName,
    InvalidPayload,
}

impl fmt::Display for FormError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormError::MissingTaskName => write!(f, "Task name is required"),
            FormError::InvalidPayload => write!(f, "Invalid JSON format in payload"),
        }
    }
}

pub(crate) const CREATE_FAILED_FALLBACK: &str = "Failed to create job";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CreateForm {
    pub(crate) task_name: String,
    pub(crate) priority: Priority,
    pub(crate) payload: String,
    pub(crate) focus: FormField,
    pub(crate) submitting: bool,
    pub(crate) error: Option<String>,
}

impl Default for CreateForm {
    fn default() -> Self {
        Self {
            task_name: String::new(),
            priority: Priority::default(),
            payload: DEFAULT_PAYLOAD.to_string(),
            focus: FormField::default(),
            submitting: false,
            error: None,
        }
    }
}

impl CreateForm {
    /// Builds the request body, parsing the payload text as JSON.
    pub(crate) fn validate(&self) -> Result<NewJob, FormError> {
        if self.task_name.trim().is_empty() {
            return Err(FormError::MissingTaskName);
        }
        let payload: serde_json::Value =
            serde_json::from_str(&self.payload).map_err(|_| FormError::InvalidPayload)?;
        Ok(NewJob {
            task_name: self.task_name.clone(),
            payload,
            priority: self.priority,
        })
    }

    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }
}
