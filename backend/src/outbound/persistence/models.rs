//! Diesel row structs. Internal to the persistence layer.

use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{FullName, User, UserId, UserValidationError};

use super::schema::users;

/// Row read from `users`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub surname: String,
    pub name: String,
    pub patronymic: String,
}

impl TryFrom<UserRow> for User {
    type Error = UserValidationError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let name = FullName::try_from_parts(row.surname, row.name, row.patronymic)?;
        Ok(User::new(UserId::from_uuid(row.id), name))
    }
}

/// Insertable row for `users`.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub surname: &'a str,
    pub name: &'a str,
    pub patronymic: &'a str,
}

impl<'a> NewUserRow<'a> {
    pub fn new(id: &UserId, full_name: &'a FullName) -> Self {
        Self {
            id: *id.as_uuid(),
            surname: full_name.surname().as_str(),
            name: full_name.given_name().as_str(),
            patronymic: full_name.patronymic().as_str(),
        }
    }
}

/// Full overwrite of the three name columns.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
pub(crate) struct UserNameChangeset<'a> {
    pub surname: &'a str,
    pub name: &'a str,
    pub patronymic: &'a str,
}

impl<'a> From<&'a FullName> for UserNameChangeset<'a> {
    fn from(full_name: &'a FullName) -> Self {
        Self {
            surname: full_name.surname().as_str(),
            name: full_name.given_name().as_str(),
            patronymic: full_name.patronymic().as_str(),
        }
    }
}
