//! Mail domains for VMAPP.
//!
//! A domain is a hostname under which mailboxes are organized. Deleting a
//! domain deletes its mailboxes.

mod repository;
mod types;

pub use repository::DomainRepository;
pub use types::{Domain, DomainUpdate, NewDomain};
