use crate::domain::errors::ValidationError;

const MIN_LEN: usize = 3;
const MAX_LEN: usize = 63;

/// A validated container (bucket) name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContainerName(String);

impl ContainerName {
    /// Create a new ContainerName using the S3-compatible DNS naming rules
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();

        if value.len() < MIN_LEN {
            return Err(ValidationError::ContainerNameTooShort {
                actual: value.len(),
                min: MIN_LEN,
            });
        }

        if value.len() > MAX_LEN {
            return Err(ValidationError::ContainerNameTooLong {
                actual: value.len(),
                max: MAX_LEN,
            });
        }

        // Must start and end with lowercase letter or number
        if !value.chars().next().is_some_and(is_alphanumeric_lower) {
            return Err(ValidationError::ContainerNameInvalidStart);
        }

        if !value.chars().last().is_some_and(is_alphanumeric_lower) {
            return Err(ValidationError::ContainerNameInvalidEnd);
        }

        if let Some(c) = value
            .chars()
            .find(|&c| !is_alphanumeric_lower(c) && c != '-' && c != '.')
        {
            return Err(ValidationError::ContainerNameInvalidCharacter(c));
        }

        // The remaining naming rules are left to the backend
        if value.contains("..") {
            return Err(ValidationError::ContainerNameAdjacentPeriods);
        }

        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_alphanumeric_lower(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit()
}

impl std::fmt::Display for ContainerName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
