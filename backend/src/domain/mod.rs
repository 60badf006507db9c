//! Domain primitives and ports.
//!
//! Public surface:
//! - `Error`/`ErrorCode`: transport-agnostic error payload.
//! - `User`, `UserId`, `FullName`, `NamePart`: the user record.
//! - `TraceId`: request correlation identifier.
//! - `ports`: the storage contract implemented by outbound adapters.

pub mod error;
pub mod ports;
pub mod trace_id;
pub mod user;

pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::trace_id::{TraceId, TRACE_ID_HEADER};
pub use self::user::{FullName, NameField, NamePart, User, UserId, UserValidationError};

