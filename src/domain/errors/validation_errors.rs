/// Validation errors for object coordinates
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    // ObjectKey validation errors
    EmptyObjectKey,
    ObjectKeyTooLong {
        actual: usize,
        max: usize,
    },
    InvalidObjectKeyCharacter(char),
    ObjectKeyStartsWithSlash,
    ObjectKeyEndsWithSlash,
    ObjectKeyContainsDoubleSlash,
    ObjectKeyRelativeSegment,
    /// The key could not be mapped to a backend path
    ObjectKeyUnaddressable(String),

    // ContainerName validation errors
    ContainerNameTooShort {
        actual: usize,
        min: usize,
    },
    ContainerNameTooLong {
        actual: usize,
        max: usize,
    },
    ContainerNameInvalidStart,
    ContainerNameInvalidEnd,
    ContainerNameInvalidCharacter(char),
    ContainerNameAdjacentPeriods,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ObjectKey errors
            ValidationError::EmptyObjectKey => write!(f, "Object key cannot be empty"),
            ValidationError::ObjectKeyTooLong { actual, max } => {
                write!(f, "Object key too long: {} bytes (max: {})", actual, max)
            }
            ValidationError::InvalidObjectKeyCharacter(c) => {
                write!(f, "Invalid character in object key: {:?}", c)
            }
            ValidationError::ObjectKeyStartsWithSlash => {
                write!(f, "Object key cannot start with '/'")
            }
            ValidationError::ObjectKeyEndsWithSlash => {
                write!(f, "Object key cannot end with '/'")
            }
            ValidationError::ObjectKeyContainsDoubleSlash => {
                write!(f, "Object key cannot contain '//'")
            }
            ValidationError::ObjectKeyRelativeSegment => {
                write!(f, "Object key cannot contain '.' or '..' segments")
            }
            ValidationError::ObjectKeyUnaddressable(reason) => {
                write!(f, "Object key cannot be addressed: {}", reason)
            }

            // ContainerName errors
            ValidationError::ContainerNameTooShort { actual, min } => {
                write!(
                    f,
                    "Container name too short: {} characters (min: {})",
                    actual, min
                )
            }
            ValidationError::ContainerNameTooLong { actual, max } => {
                write!(
                    f,
                    "Container name too long: {} characters (max: {})",
                    actual, max
                )
            }
            ValidationError::ContainerNameInvalidStart => {
                write!(f, "Container name must start with lowercase letter or number")
            }
            ValidationError::ContainerNameInvalidEnd => {
                write!(f, "Container name must end with lowercase letter or number")
            }
            ValidationError::ContainerNameInvalidCharacter(c) => {
                write!(
                    f,
                    "Invalid character in container name: '{}'. Only lowercase letters, numbers, hyphens, and periods allowed",
                    c
                )
            }
            ValidationError::ContainerNameAdjacentPeriods => {
                write!(f, "Container name cannot contain adjacent periods")
            }
        }
    }
}

impl std::error::Error for ValidationError {}
