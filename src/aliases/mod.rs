//! Email aliases for VMAPP.
//!
//! An alias maps one address to another. Aliases do not reference domains
//! or users.

mod repository;
mod types;

pub use repository::AliasRepository;
pub use types::{Alias, AliasUpdate, NewAlias};
