//! Domain layer: identities, records, the two state machines, and events.
//!
//! The [`PoolRegistry`] and [`EscrowLedger`] are synchronous and lock-free;
//! they return a [`Receipt`] carrying the [`LedgerEvent`] of every
//! committed mutation. Serialization and publication are left to the
//! service layer.

pub mod address;
pub mod amount;
pub mod escrow;
pub mod escrow_ledger;
pub mod event;
pub mod event_bus;
pub mod key;
pub mod pool;
pub mod pool_registry;
pub mod treasury;

pub use address::Address;
pub use amount::Amount;
pub use escrow::Escrow;
pub use escrow_ledger::EscrowLedger;
pub use event::{LedgerEvent, Receipt};
pub use event_bus::EventBus;
pub use key::{EscrowId, Key, KeyGenerator, PoolId};
pub use pool::{Pool, PoolSummary};
pub use pool_registry::{PoolRegistry, StakeDirectory};
pub use treasury::{PayoutBook, Treasury};
