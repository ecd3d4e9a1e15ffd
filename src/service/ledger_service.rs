//! Ledger service: serializes operations and publishes their events.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::domain::{
    Address, Amount, Escrow, EscrowId, EscrowLedger, EventBus, PayoutBook, Pool, PoolId,
    PoolRegistry, PoolSummary, Receipt, StakeDirectory,
};
use crate::error::LedgerError;

/// Everything behind the serialization lock.
#[derive(Debug)]
struct World {
    registry: PoolRegistry,
    ledger: EscrowLedger,
    treasury: PayoutBook,
}

/// Orchestration layer for all registry and ledger operations.
///
/// Owns the [`PoolRegistry`], the [`EscrowLedger`] and the payout
/// [`PayoutBook`] behind one [`Mutex`], so every operation (reads
/// included) is applied in a single total order against the latest
/// committed state. Every mutation follows the pattern: acquire lock →
/// run the state machine → publish the receipt's event → release.
/// Events are published under the lock so bus order equals commit order.
#[derive(Debug)]
pub struct LedgerService {
    world: Mutex<World>,
    event_bus: EventBus,
    registry_address: Address,
    admin: Address,
}

impl LedgerService {
    /// Creates a service hosting an empty registry at `registry_address`
    /// and an unbound ledger administered by `admin`.
    #[must_use]
    pub fn new(admin: Address, registry_address: Address, event_bus: EventBus) -> Self {
        Self {
            world: Mutex::new(World {
                registry: PoolRegistry::new(registry_address),
                ledger: EscrowLedger::new(admin),
                treasury: PayoutBook::new(),
            }),
            event_bus,
            registry_address,
            admin,
        }
    }

    /// Convenience constructor returning the service behind an [`Arc`].
    #[must_use]
    pub fn shared(admin: Address, registry_address: Address, event_bus: EventBus) -> Arc<Self> {
        Arc::new(Self::new(admin, registry_address, event_bus))
    }

    /// Returns a reference to the inner [`EventBus`].
    #[must_use]
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// Address of the hosted pool registry.
    #[must_use]
    pub const fn registry_address(&self) -> Address {
        self.registry_address
    }

    /// Ledger administrator.
    #[must_use]
    pub const fn admin(&self) -> Address {
        self.admin
    }

    /// Runs one mutation under the lock and publishes its event on success.
    async fn execute<T, F>(
        &self,
        operation: &'static str,
        caller: &Address,
        op: F,
    ) -> Result<T, LedgerError>
    where
        F: FnOnce(&mut World) -> Result<Receipt<T>, LedgerError>,
    {
        let mut world = self.world.lock().await;
        match op(&mut world) {
            Ok(receipt) => {
                let _ = self.event_bus.publish(receipt.event);
                Ok(receipt.output)
            }
            Err(err) => {
                tracing::debug!(operation, %caller, kind = err.kind(), error = %err, "operation rejected");
                Err(err)
            }
        }
    }

    // ── Escrow ledger wiring ────────────────────────────────────────────

    /// Binds the escrow ledger to the registry at `registry`.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::UnauthorisedAddress`] if `caller` is not the
    /// administrator.
    pub async fn bind_registry(
        &self,
        caller: &Address,
        registry: Address,
    ) -> Result<(), LedgerError> {
        self.execute("bind_registry", caller, |w| {
            w.ledger.bind_registry(caller, registry)
        })
        .await?;
        tracing::info!(%registry, "escrow ledger bound to registry");
        Ok(())
    }

    /// Registry the ledger is bound to, if any.
    pub async fn bound_registry(&self) -> Option<Address> {
        self.world.lock().await.ledger.bound_registry()
    }

    // ── Pool registry ───────────────────────────────────────────────────

    /// Creates a pool owned by `caller`.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::EmptyString`] if `name` is empty.
    pub async fn create_pool(
        &self,
        caller: &Address,
        name: String,
        description: String,
        min_stake: Amount,
    ) -> Result<PoolId, LedgerError> {
        let pool_id = self
            .execute("create_pool", caller, |w| {
                w.registry
                    .create_pool(caller, name, description, min_stake)
            })
            .await?;
        tracing::info!(%pool_id, owner = %caller, %min_stake, "pool created");
        Ok(pool_id)
    }

    /// Overwrites a pool's name, description and minimum stake. Returns
    /// the record as committed.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::KeyNotFound`], [`LedgerError::EmptyString`]
    /// or [`LedgerError::AddressUnauthorised`].
    pub async fn update_pool(
        &self,
        caller: &Address,
        pool_id: PoolId,
        name: String,
        description: String,
        min_stake: Amount,
    ) -> Result<Pool, LedgerError> {
        let pool = self
            .execute("update_pool", caller, |w| {
                w.registry
                    .update_pool(caller, pool_id, name, description, min_stake)
            })
            .await?;
        tracing::info!(%pool_id, %min_stake, "pool updated");
        Ok(pool)
    }

    /// Removes a pool from the registry.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::KeyNotFound`] or
    /// [`LedgerError::AddressUnauthorised`].
    pub async fn delete_pool(&self, caller: &Address, pool_id: PoolId) -> Result<(), LedgerError> {
        let _pool = self
            .execute("delete_pool", caller, |w| {
                w.registry.delete_pool(caller, pool_id)
            })
            .await?;
        tracing::info!(%pool_id, "pool deleted");
        Ok(())
    }

    /// Returns a snapshot of a pool.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::KeyNotFound`] if the pool does not exist.
    pub async fn get_pool(&self, pool_id: PoolId) -> Result<Pool, LedgerError> {
        self.world.lock().await.registry.get(pool_id).cloned()
    }

    /// Returns the minimum stake of a pool.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::KeyNotFound`] if the pool does not exist.
    pub async fn min_stake(&self, pool_id: PoolId) -> Result<Amount, LedgerError> {
        self.world.lock().await.registry.min_stake(pool_id)
    }

    /// Returns summaries of all pools, optionally filtered by owner.
    pub async fn list_pools(&self, owner: Option<&Address>) -> Vec<PoolSummary> {
        self.world.lock().await.registry.list(owner)
    }

    // ── Escrow ledger ───────────────────────────────────────────────────

    /// Opens an escrow under `pool_id` with the attached `value` as stake.
    /// Returns the record as committed.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::RegistryNotBound`],
    /// [`LedgerError::RegistryMismatch`], [`LedgerError::KeyNotFound`],
    /// [`LedgerError::InsufficientStake`] or
    /// [`LedgerError::BalanceOverflow`].
    pub async fn create_escrow(
        &self,
        caller: &Address,
        pool_id: PoolId,
        value: Amount,
    ) -> Result<Escrow, LedgerError> {
        let escrow = self
            .execute("create_escrow", caller, |w| {
                w.ledger.create(caller, &w.registry, pool_id, value)
            })
            .await?;
        tracing::info!(
            escrow_id = %escrow.escrow_id,
            %pool_id,
            owner = %caller,
            stake = %value,
            "escrow created"
        );
        Ok(escrow)
    }

    /// Adds the attached `value` to an escrow. Returns the new balance.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::KeyNotFound`],
    /// [`LedgerError::AddressUnauthorised`] or
    /// [`LedgerError::BalanceOverflow`].
    pub async fn deposit(
        &self,
        caller: &Address,
        escrow_id: EscrowId,
        value: Amount,
    ) -> Result<Amount, LedgerError> {
        let balance = self
            .execute("deposit", caller, |w| {
                w.ledger.deposit(caller, escrow_id, value)
            })
            .await?;
        tracing::info!(%escrow_id, amount = %value, %balance, "escrow deposit");
        Ok(balance)
    }

    /// Pays `amount` out of an escrow to its owner. Returns the new
    /// balance.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::KeyNotFound`],
    /// [`LedgerError::AddressUnauthorised`],
    /// [`LedgerError::InsufficientBalance`] or
    /// [`LedgerError::TransferFailed`].
    pub async fn withdraw(
        &self,
        caller: &Address,
        escrow_id: EscrowId,
        amount: Amount,
    ) -> Result<Amount, LedgerError> {
        let balance = self
            .execute("withdraw", caller, |w| {
                w.ledger
                    .withdraw(caller, escrow_id, amount, &mut w.treasury)
            })
            .await?;
        tracing::info!(%escrow_id, %amount, %balance, "escrow withdrawal");
        Ok(balance)
    }

    /// Returns a snapshot of an escrow.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::KeyNotFound`] if the escrow does not exist.
    pub async fn get_escrow(&self, escrow_id: EscrowId) -> Result<Escrow, LedgerError> {
        self.world.lock().await.ledger.get(escrow_id).cloned()
    }

    /// Returns escrows matching the optional owner and pool filters.
    pub async fn list_escrows(
        &self,
        owner: Option<&Address>,
        pool_id: Option<PoolId>,
    ) -> Vec<Escrow> {
        self.world.lock().await.ledger.list(owner, pool_id)
    }

    /// Total value held across all escrows.
    pub async fn custody(&self) -> Amount {
        self.world.lock().await.ledger.custody()
    }

    /// Total value paid out to `account` by withdrawals.
    pub async fn paid_to(&self, account: &Address) -> Amount {
        self.world.lock().await.treasury.paid_to(account)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::LedgerEvent;

    const MIN_STAKE: u128 = 1_050_975_209;

    fn deployer() -> Address {
        Address::from_bytes([0xd0; 20])
    }

    fn pool_admin() -> Address {
        Address::from_bytes([0xa0; 20])
    }

    fn user() -> Address {
        Address::from_bytes([0x05; 20])
    }

    fn make_service() -> Arc<LedgerService> {
        LedgerService::shared(deployer(), Address::derive("registry"), EventBus::new(1000))
    }

    async fn bound_service_with_pool() -> (Arc<LedgerService>, PoolId) {
        let service = make_service();
        let Ok(pool_id) = service
            .create_pool(
                &pool_admin(),
                "Lorem Ipsum".to_string(),
                "lorem ipsum".to_string(),
                Amount::new(MIN_STAKE),
            )
            .await
        else {
            panic!("pool creation failed");
        };
        let registry = service.registry_address();
        tokio_test::assert_ok!(service.bind_registry(&deployer(), registry).await);
        (service, pool_id)
    }

    #[tokio::test]
    async fn create_pool_emits_event() {
        let service = make_service();
        let mut rx = service.event_bus().subscribe();

        let Ok(pool_id) = service
            .create_pool(&pool_admin(), "p".to_string(), String::new(), Amount::ZERO)
            .await
        else {
            panic!("pool creation failed");
        };

        let Ok(event) = rx.recv().await else {
            panic!("expected event");
        };
        assert_eq!(event.event_type_str(), "pool_created");
        assert_eq!(event.keys(), vec![*pool_id.as_key()]);
    }

    #[tokio::test]
    async fn rejected_operation_emits_nothing() {
        let service = make_service();
        let mut rx = service.event_bus().subscribe();

        let result = service
            .create_pool(&pool_admin(), String::new(), String::new(), Amount::ZERO)
            .await;
        tokio_test::assert_err!(result);
        assert!(rx.try_recv().is_err());
        assert!(service.list_pools(None).await.is_empty());
    }

    #[tokio::test]
    async fn create_escrow_requires_binding() {
        let service = make_service();
        let Ok(pool_id) = service
            .create_pool(&pool_admin(), "p".to_string(), String::new(), Amount::ZERO)
            .await
        else {
            panic!("pool creation failed");
        };
        let result = service
            .create_escrow(&user(), pool_id, Amount::new(1))
            .await;
        assert!(matches!(result, Err(LedgerError::RegistryNotBound)));
        assert_eq!(service.bound_registry().await, None);
    }

    #[tokio::test]
    async fn bind_to_foreign_registry_blocks_create() {
        let (service, pool_id) = bound_service_with_pool().await;
        tokio_test::assert_ok!(
            service
                .bind_registry(&deployer(), Address::derive("elsewhere"))
                .await
        );
        let result = service
            .create_escrow(&user(), pool_id, Amount::new(MIN_STAKE))
            .await;
        assert!(matches!(result, Err(LedgerError::RegistryMismatch { .. })));
    }

    #[tokio::test]
    async fn escrow_lifecycle_publishes_in_commit_order() {
        let (service, pool_id) = bound_service_with_pool().await;
        let mut rx = service.event_bus().subscribe();

        let Ok(escrow) = service
            .create_escrow(&user(), pool_id, Amount::new(MIN_STAKE))
            .await
        else {
            panic!("escrow creation failed");
        };
        let escrow_id = escrow.escrow_id;
        tokio_test::assert_ok!(service.deposit(&user(), escrow_id, Amount::new(1)).await);
        let Ok(balance) = service
            .withdraw(&user(), escrow_id, Amount::new(MIN_STAKE + 1))
            .await
        else {
            panic!("withdraw failed");
        };
        assert_eq!(balance, Amount::ZERO);
        assert_eq!(service.paid_to(&user()).await, Amount::new(MIN_STAKE + 1));
        assert_eq!(service.custody().await, Amount::ZERO);

        let mut kinds = Vec::new();
        while let Ok(event) = rx.try_recv() {
            kinds.push(event.event_type_str());
        }
        assert_eq!(
            kinds,
            vec!["escrow_created", "escrow_deposited", "escrow_withdrawn"]
        );
    }

    #[tokio::test]
    async fn escrow_created_event_carries_stake() {
        let (service, pool_id) = bound_service_with_pool().await;
        let mut rx = service.event_bus().subscribe();

        let Ok(escrow) = service
            .create_escrow(&user(), pool_id, Amount::new(MIN_STAKE))
            .await
        else {
            panic!("escrow creation failed");
        };
        let escrow_id = escrow.escrow_id;
        let Ok(event) = rx.recv().await else {
            panic!("expected event");
        };
        assert_eq!(
            event,
            LedgerEvent::EscrowCreated {
                escrow_id,
                owner: user(),
                pool_id,
                balance: Amount::new(MIN_STAKE),
            }
        );
    }

    #[tokio::test]
    async fn update_returns_committed_snapshot() {
        let (service, pool_id) = bound_service_with_pool().await;
        let mut rx = service.event_bus().subscribe();

        let Ok(pool) = service
            .update_pool(
                &pool_admin(),
                pool_id,
                "Dolar Sit Amet".to_string(),
                "dolar sit amet".to_string(),
                Amount::new(7),
            )
            .await
        else {
            panic!("update failed");
        };
        // A delete landing right after the update must not affect what
        // the update reported.
        tokio_test::assert_ok!(service.delete_pool(&pool_admin(), pool_id).await);

        let Ok(event) = rx.recv().await else {
            panic!("expected event");
        };
        assert_eq!(
            event,
            LedgerEvent::PoolUpdated {
                pool_id: pool.pool_id,
                owner: pool.owner,
                name: pool.name.clone(),
                description: pool.description.clone(),
                min_stake: pool.min_stake,
            }
        );
        assert_eq!(pool.name, "Dolar Sit Amet");
        assert!(service.get_pool(pool_id).await.is_err());
    }

    #[tokio::test]
    async fn create_escrow_returns_committed_snapshot() {
        let (service, pool_id) = bound_service_with_pool().await;
        let mut rx = service.event_bus().subscribe();

        let Ok(escrow) = service
            .create_escrow(&user(), pool_id, Amount::new(MIN_STAKE))
            .await
        else {
            panic!("escrow creation failed");
        };
        tokio_test::assert_ok!(
            service
                .deposit(&user(), escrow.escrow_id, Amount::new(5))
                .await
        );

        let Ok(event) = rx.recv().await else {
            panic!("expected event");
        };
        assert_eq!(
            event,
            LedgerEvent::EscrowCreated {
                escrow_id: escrow.escrow_id,
                owner: escrow.owner,
                pool_id: escrow.pool_id,
                balance: escrow.balance,
            }
        );
        assert_eq!(escrow.balance, Amount::new(MIN_STAKE));
    }

    #[tokio::test]
    async fn concurrent_deposits_are_serialized() {
        let (service, pool_id) = bound_service_with_pool().await;
        let Ok(escrow) = service
            .create_escrow(&user(), pool_id, Amount::new(MIN_STAKE))
            .await
        else {
            panic!("escrow creation failed");
        };
        let escrow_id = escrow.escrow_id;

        let mut handles = Vec::new();
        for i in 1..=50u128 {
            let service = Arc::clone(&service);
            handles.push(tokio::spawn(async move {
                service.deposit(&user(), escrow_id, Amount::new(i)).await
            }));
        }
        for handle in handles {
            let Ok(result) = handle.await else {
                panic!("task panicked");
            };
            tokio_test::assert_ok!(result);
        }

        let expected = MIN_STAKE + (1..=50u128).sum::<u128>();
        let Ok(escrow) = service.get_escrow(escrow_id).await else {
            panic!("escrow missing");
        };
        assert_eq!(escrow.balance, Amount::new(expected));
        assert_eq!(service.custody().await, Amount::new(expected));
    }
}
