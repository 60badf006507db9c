//! Hash layout for a stored user: fields `id`, `surname`, `name`,
//! `patronymic`, keyed by the hyphenated id.

use std::collections::HashMap;

use crate::domain::{FullName, NameField, User, UserId, UserValidationError};

pub(super) const ID_FIELD: &str = "id";

/// Reasons a stored hash cannot be turned back into a [`User`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub(super) enum RecordError {
    #[error("hash is missing field `{0}`")]
    MissingField(&'static str),
    #[error("hash holds an invalid user: {0}")]
    Invalid(#[from] UserValidationError),
}

/// Key under which the user's hash is stored.
pub(super) fn user_key(id: &UserId) -> String {
    id.to_string()
}

/// Field/value pairs written for a user.
pub(super) fn encode(id: &str, name: &FullName) -> [(&'static str, String); 4] {
    [
        (ID_FIELD, id.to_owned()),
        (NameField::Surname.as_str(), name.surname().to_string()),
        (NameField::GivenName.as_str(), name.given_name().to_string()),
        (NameField::Patronymic.as_str(), name.patronymic().to_string()),
    ]
}

/// Decode an `HGETALL` reply. An empty reply means the key does not exist.
pub(super) fn decode(fields: HashMap<String, String>) -> Result<Option<User>, RecordError> {
    if fields.is_empty() {
        return Ok(None);
    }
    let field = |name: &'static str| {
        fields
            .get(name)
            .map(String::as_str)
            .ok_or(RecordError::MissingField(name))
    };
    let id = UserId::new(field(ID_FIELD)?)?;
    let name = FullName::try_from_parts(
        field(NameField::Surname.as_str())?,
        field(NameField::GivenName.as_str())?,
        field(NameField::Patronymic.as_str())?,
    )?;
    Ok(Some(User::new(id, name)))
}
