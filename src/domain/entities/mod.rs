//! Core domain entities.
//!
//! Entities are plain data structures; creation inputs are separate structs:
//!
//! - [`Mapping`] / [`NewMapping`] - An allocated short link
//! - [`Allocation`] - A mapping plus whether it was reused
//! - [`User`] / [`NewUser`] - A registered link owner
//! - [`Identity`] / [`Role`] - The authenticated caller

pub mod identity;
pub mod mapping;
pub mod user;

pub use identity::{Identity, Role};
pub use mapping::{Allocation, Mapping, NewMapping};
pub use user::{NewUser, User};
