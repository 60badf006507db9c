//! User data model.
//!
//! A user is an identifier plus a three-part personal name. Every part is
//! required; a record with a blank part is never constructed.

use std::fmt;

use uuid::Uuid;

/// Which part of a [`FullName`] a value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NameField {
    /// Family name.
    Surname,
    /// Given (first) name.
    GivenName,
    /// Patronymic (middle name derived from the father's name).
    Patronymic,
}

impl NameField {
    /// Wire and storage name of the field.
    ///
    /// The given name is stored and transmitted as `name`.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Surname => "surname",
            Self::GivenName => "name",
            Self::Patronymic => "patronymic",
        }
    }
}

impl fmt::Display for NameField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation errors raised while building user values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    /// The identifier was empty.
    #[error("user id must not be empty")]
    EmptyId,
    /// The identifier was not a UUID.
    #[error("user id must be a valid UUID")]
    InvalidId,
    /// A name part was blank.
    #[error("{field} must not be empty")]
    EmptyNamePart {
        /// The offending field.
        field: NameField,
    },
}

/// Stable user identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(Uuid);

impl UserId {
    /// Parse a [`UserId`] from its hyphenated string form.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let raw = id.as_ref();
        if raw.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        if raw.trim() != raw {
            return Err(UserValidationError::InvalidId);
        }
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(|_| UserValidationError::InvalidId)
    }

    /// Generate a new random (v4) [`UserId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

/// One non-blank part of a personal name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamePart(String);

impl NamePart {
    /// Validate a name part for the given field.
    ///
    /// The value is kept verbatim; only blankness is rejected.
    pub fn new(field: NameField, value: impl Into<String>) -> Result<Self, UserValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(UserValidationError::EmptyNamePart { field });
        }
        Ok(Self(value))
    }

    /// Borrow the value.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for NamePart {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for NamePart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Surname, given name and patronymic, always present together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FullName {
    surname: NamePart,
    given_name: NamePart,
    patronymic: NamePart,
}

impl FullName {
    /// Build a name from validated parts.
    pub fn new(surname: NamePart, given_name: NamePart, patronymic: NamePart) -> Self {
        Self {
            surname,
            given_name,
            patronymic,
        }
    }

    /// Validate all three parts, reporting the first blank one.
    ///
    /// # Examples
    /// ```
    /// use user_registry::domain::FullName;
    ///
    /// let name = FullName::try_from_parts("Ivanov", "Ivan", "Ivanovich").expect("valid name");
    /// assert_eq!(name.given_name().as_str(), "Ivan");
    /// assert!(FullName::try_from_parts("Ivanov", " ", "Ivanovich").is_err());
    /// ```
    pub fn try_from_parts(
        surname: impl Into<String>,
        given_name: impl Into<String>,
        patronymic: impl Into<String>,
    ) -> Result<Self, UserValidationError> {
        Ok(Self::new(
            NamePart::new(NameField::Surname, surname)?,
            NamePart::new(NameField::GivenName, given_name)?,
            NamePart::new(NameField::Patronymic, patronymic)?,
        ))
    }

    /// Family name.
    pub fn surname(&self) -> &NamePart {
        &self.surname
    }

    /// Given name.
    pub fn given_name(&self) -> &NamePart {
        &self.given_name
    }

    /// Patronymic.
    pub fn patronymic(&self) -> &NamePart {
        &self.patronymic
    }
}

/// A stored user.
///
/// ## Invariants
/// - `id` never changes after creation.
/// - All three name parts are present and non-blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    name: FullName,
}

impl User {
    /// Assemble a user from validated components.
    pub fn new(id: UserId, name: FullName) -> Self {
        Self { id, name }
    }

    /// Stable identifier.
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// The user's full name.
    pub fn name(&self) -> &FullName {
        &self.name
    }
}
