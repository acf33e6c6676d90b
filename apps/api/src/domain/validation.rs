use std::fmt;

/// Reason a single attribute failed validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Value is absent, empty, or whitespace only
    Blank,
    /// Value collides with an existing record
    Taken,
}

impl ErrorKind {
    /// Returns the human-readable detail message
    pub fn message(&self) -> &'static str {
        match self {
            ErrorKind::Blank => "can't be blank",
            ErrorKind::Taken => "has already been taken",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// A validation failure on one attribute
///
/// Nested attributes are addressed with a dotted path, e.g. `tutors.email`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub attribute: String,
    pub kind: ErrorKind,
}

impl FieldError {
    pub fn new(attribute: impl Into<String>, kind: ErrorKind) -> Self {
        Self {
            attribute: attribute.into(),
            kind,
        }
    }
}

/// Ordered collection of validation failures
///
/// Keeps insertion order and drops exact duplicates, so several nested
/// records failing on the same attribute are reported once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a failure unless an identical one is already present
    pub fn add(&mut self, attribute: impl Into<String>, kind: ErrorKind) {
        let error = FieldError::new(attribute, kind);
        if !self.errors.contains(&error) {
            self.errors.push(error);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    /// Turns an empty collection into `Ok(())`
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .errors
            .iter()
            .map(|e| format!("{} {}", e.attribute, e.kind))
            .collect();
        write!(f, "{}", parts.join(", "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Returns true when a value is absent, empty, or only whitespace
pub fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}
