//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches
//!
//! plus the joined read shapes used by admin and public listings.

pub mod card;
pub mod mapping;
pub mod search;
pub mod talk;
pub mod theme;
pub mod validation;
