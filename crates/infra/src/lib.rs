//! Infrastructure layer: storage adapters for the ledger ports.

pub mod store;

pub use store::InMemoryAccountStore;
