//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts (with `validator` rules)
//! - A `Deserialize` update DTO (all `Option` fields) for patches

pub mod activity;
pub mod check_in;
pub mod comment;
pub mod day;
pub mod member;
pub mod place;
pub mod review;
pub mod trip;
pub mod user;
