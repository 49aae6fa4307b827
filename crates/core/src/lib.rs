//! Tripboard domain core.
//!
//! Pure logic shared by the persistence and HTTP layers: role ranking,
//! hierarchical access resolution, the fractional-index ordering engine,
//! and place identity resolution. Store access is abstracted behind async
//! traits so none of this depends on a database.

pub mod access;
pub mod error;
pub mod ordering;
pub mod places;
pub mod roles;
pub mod types;
