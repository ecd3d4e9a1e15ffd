//! # stakepool-gateway
//!
//! Pool registry and escrow ledger served over REST with a WebSocket
//! event feed.
//!
//! Pool owners publish staking pools with a minimum stake. Accounts open
//! escrows against a pool by attaching at least that stake, then deposit
//! to and withdraw from their own escrow. The escrow ledger only accepts
//! pools from the registry an administrator bound it to.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP, WebSocket)
//!     │
//!     ├── REST Handlers (api/)
//!     ├── WS Handler (ws/)
//!     │
//!     ├── LedgerService (service/)   one lock, total order
//!     ├── EventBus (domain/)
//!     │
//!     ├── PoolRegistry (domain/)
//!     ├── EscrowLedger (domain/)
//!     └── Treasury / PayoutBook (domain/)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod service;
pub mod ws;
