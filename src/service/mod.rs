//! Service layer: serialized execution and event publication.
//!
//! [`LedgerService`] hosts the pool registry and the escrow ledger,
//! applies every operation one at a time, and emits committed events
//! through the [`super::domain::EventBus`].

pub mod ledger_service;

pub use ledger_service::LedgerService;
