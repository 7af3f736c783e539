use std::collections::{HashMap, HashSet};
use std::hash::Hash;
use std::sync::{Arc, RwLock};

use error_stack::Report;
use kernel::interface::database::{DatabaseConnection, Transaction};
use kernel::prelude::entity::{
    Offer, OfferId, OrderId, PartnerId, RentOrder, Ship, ShipId, UserId,
};
use kernel::KernelError;

use crate::error::ConvertError;

pub use self::{account::*, offer::*, order::*, ship::*};

mod account;
mod offer;
mod order;
mod ship;

#[derive(Default)]
struct Tables {
    orders: HashMap<OrderId, RentOrder>,
    offers: HashMap<OfferId, Offer>,
    ships: HashMap<ShipId, Ship>,
    users: HashSet<UserId>,
    partners: HashSet<PartnerId>,
}

/// Entity store kept in process memory.
///
/// Every transaction stages its writes and applies them under one write lock on commit,
/// so readers observe either all of a transaction's writes or none of them.
#[derive(Clone, Default)]
pub struct InMemoryDatabase {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_user(&self, id: UserId) -> error_stack::Result<(), KernelError> {
        self.tables.write().convert_error()?.users.insert(id);
        Ok(())
    }

    pub fn insert_partner(&self, id: PartnerId) -> error_stack::Result<(), KernelError> {
        self.tables.write().convert_error()?.partners.insert(id);
        Ok(())
    }

    pub fn insert_ship(&self, ship: Ship) -> error_stack::Result<(), KernelError> {
        self.tables
            .write()
            .convert_error()?
            .ships
            .insert(ship.id().clone(), ship);
        Ok(())
    }
}

#[async_trait::async_trait]
impl DatabaseConnection for InMemoryDatabase {
    type Transaction = InMemoryTransaction;
    async fn transact(&self) -> error_stack::Result<Self::Transaction, KernelError> {
        Ok(InMemoryTransaction {
            tables: Arc::clone(&self.tables),
            orders: HashMap::new(),
            offers: HashMap::new(),
        })
    }
}

/// Staged rows: `Some` is an insert or update, `None` a delete.
pub struct InMemoryTransaction {
    tables: Arc<RwLock<Tables>>,
    orders: HashMap<OrderId, Option<RentOrder>>,
    offers: HashMap<OfferId, Option<Offer>>,
}

#[async_trait::async_trait]
impl Transaction for InMemoryTransaction {
    async fn commit(self) -> error_stack::Result<(), KernelError> {
        let mut tables = self.tables.write().convert_error()?;
        apply(&mut tables.orders, self.orders);
        apply(&mut tables.offers, self.offers);
        Ok(())
    }

    async fn roll_back(self) -> error_stack::Result<(), KernelError> {
        Ok(())
    }
}

fn apply<K: Eq + Hash, V>(table: &mut HashMap<K, V>, staged: HashMap<K, Option<V>>) {
    for (key, row) in staged {
        match row {
            Some(row) => table.insert(key, row),
            None => table.remove(&key),
        };
    }
}

/// Committed rows overlaid with the rows staged in this transaction.
fn visible<K, V, F>(
    committed: &HashMap<K, V>,
    staged: &HashMap<K, Option<V>>,
    predicate: F,
) -> Vec<V>
where
    K: Eq + Hash,
    V: Clone,
    F: Fn(&V) -> bool,
{
    committed
        .iter()
        .filter(|(key, _)| !staged.contains_key(*key))
        .map(|(_, row)| row)
        .chain(staged.values().flatten())
        .filter(|row| predicate(*row))
        .cloned()
        .collect()
}

fn stage<K, V>(
    staged: &mut HashMap<K, Option<V>>,
    exists: bool,
    key: K,
    row: Option<V>,
    must_exist: bool,
    entity: &str,
) -> error_stack::Result<(), KernelError>
where
    K: Eq + Hash,
{
    match (exists, must_exist) {
        (true, false) => Err(Report::new(KernelError::Internal)
            .attach_printable(format!("{entity} with the same id already exists"))),
        (false, true) => Err(Report::new(KernelError::NotFound)
            .attach_printable(format!("{entity} does not exist"))),
        _ => {
            staged.insert(key, row);
            Ok(())
        }
    }
}

impl InMemoryTransaction {
    fn read(&self) -> error_stack::Result<std::sync::RwLockReadGuard<'_, Tables>, KernelError> {
        self.tables.read().convert_error()
    }

    pub(in crate::database) fn order(
        &self,
        id: &OrderId,
    ) -> error_stack::Result<Option<RentOrder>, KernelError> {
        if let Some(staged) = self.orders.get(id) {
            return Ok(staged.clone());
        }
        Ok(self.read()?.orders.get(id).cloned())
    }

    pub(in crate::database) fn orders_where(
        &self,
        predicate: impl Fn(&RentOrder) -> bool,
    ) -> error_stack::Result<Vec<RentOrder>, KernelError> {
        let tables = self.read()?;
        let mut orders = visible(&tables.orders, &self.orders, predicate);
        orders.sort_by(|a, b| b.created_at().as_ref().cmp(a.created_at().as_ref()));
        Ok(orders)
    }

    pub(in crate::database) fn stage_order(
        &mut self,
        id: OrderId,
        order: Option<RentOrder>,
        must_exist: bool,
    ) -> error_stack::Result<(), KernelError> {
        let exists = self.order(&id)?.is_some();
        stage(&mut self.orders, exists, id, order, must_exist, "Order")
    }

    pub(in crate::database) fn offer(
        &self,
        id: &OfferId,
    ) -> error_stack::Result<Option<Offer>, KernelError> {
        if let Some(staged) = self.offers.get(id) {
            return Ok(staged.clone());
        }
        Ok(self.read()?.offers.get(id).cloned())
    }

    /// Oldest first.
    pub(in crate::database) fn offers_where(
        &self,
        predicate: impl Fn(&Offer) -> bool,
    ) -> error_stack::Result<Vec<Offer>, KernelError> {
        let tables = self.read()?;
        let mut offers = visible(&tables.offers, &self.offers, predicate);
        offers.sort_by(|a, b| a.created_at().as_ref().cmp(b.created_at().as_ref()));
        Ok(offers)
    }

    pub(in crate::database) fn stage_offer(
        &mut self,
        id: OfferId,
        offer: Option<Offer>,
        must_exist: bool,
    ) -> error_stack::Result<(), KernelError> {
        let exists = self.offer(&id)?.is_some();
        stage(&mut self.offers, exists, id, offer, must_exist, "Offer")
    }

    pub(in crate::database) fn ship(
        &self,
        id: &ShipId,
    ) -> error_stack::Result<Option<Ship>, KernelError> {
        Ok(self.read()?.ships.get(id).cloned())
    }

    pub(in crate::database) fn ships_of(
        &self,
        partner_id: &PartnerId,
    ) -> error_stack::Result<Vec<Ship>, KernelError> {
        Ok(self
            .read()?
            .ships
            .values()
            .filter(|ship| ship.is_owned_by(partner_id))
            .cloned()
            .collect())
    }

    pub(in crate::database) fn has_user(&self, id: &UserId) -> error_stack::Result<bool, KernelError> {
        Ok(self.read()?.users.contains(id))
    }

    pub(in crate::database) fn has_partner(
        &self,
        id: &PartnerId,
    ) -> error_stack::Result<bool, KernelError> {
        Ok(self.read()?.partners.contains(id))
    }
}
