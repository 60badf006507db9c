//! Diesel table definitions. Must match `backend/migrations`.

diesel::table! {
    /// Registered users. `name` holds the given name.
    users (id) {
        id -> Uuid,
        surname -> Varchar,
        name -> Varchar,
        patronymic -> Varchar,
    }
}
