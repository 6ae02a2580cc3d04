//! sled-backed persistence session
//!
//! Every entity is one CBOR record in the default keyspace, keyed by its
//! id. The bech32 prefix of the id doubles as the namespace for prefix
//! scans, so no separate trees are needed.

use crate::error::StoreError;
use sled::transaction::{
    ConflictableTransactionResult, TransactionError, TransactionalTree, abort,
};
use std::path::Path;
use std::sync::Arc;

pub const PRODUCT_HRP: &str = "prod_";
pub const ORDER_HRP: &str = "order_";
pub const USER_HRP: &str = "user_";
const CART_PREFIX: &str = "cart_";

/// Key of the cart record owned by `user_id`.
pub fn cart_key(user_id: &str) -> String {
    format!("{CART_PREFIX}{user_id}")
}

#[derive(Clone)]
pub struct Store {
    db: Arc<sled::Db>,
}

impl Store {
    pub fn new(db: Arc<sled::Db>) -> Self {
        Self { db }
    }

    pub fn open(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        Ok(Self::new(Arc::new(sled::open(path)?)))
    }

    pub fn get<T>(&self, key: &str) -> anyhow::Result<Option<T>>
    where
        T: for<'b> minicbor::Decode<'b, ()>,
    {
        match self.db.get(key.as_bytes())? {
            Some(raw) => Ok(Some(decode_record(key, raw.as_ref())?)),
            None => Ok(None),
        }
    }

    pub fn put<T: minicbor::Encode<()>>(&self, key: &str, value: &T) -> anyhow::Result<()> {
        self.db.insert(key.as_bytes(), minicbor::to_vec(value)?)?;
        Ok(())
    }

    /// Remove a record, reporting whether it existed.
    pub fn remove(&self, key: &str) -> anyhow::Result<bool> {
        Ok(self.db.remove(key.as_bytes())?.is_some())
    }

    /// Decode every record under a key prefix.
    pub fn scan<T>(&self, prefix: &str) -> anyhow::Result<Vec<T>>
    where
        T: for<'b> minicbor::Decode<'b, ()>,
    {
        let mut records = Vec::new();
        for entry in self.db.scan_prefix(prefix.as_bytes()) {
            let (key, raw) = entry?;
            let key = String::from_utf8_lossy(&key).into_owned();
            records.push(decode_record(&key, raw.as_ref())?);
        }

        Ok(records)
    }

    /// Run a closure as one serializable transaction. Everything the
    /// closure writes commits together or not at all; an abort unwinds all
    /// pending writes. The closure may be retried on conflict and must not
    /// touch anything outside the store.
    pub fn tx<T, F>(&self, f: F) -> anyhow::Result<T>
    where
        F: Fn(&TransactionalTree) -> ConflictableTransactionResult<T, anyhow::Error>,
    {
        match self.db.transaction(f) {
            Ok(value) => Ok(value),
            Err(TransactionError::Abort(err)) => Err(err),
            Err(TransactionError::Storage(err)) => Err(err.into()),
        }
    }
}

/// Read a record inside a transaction.
pub fn tx_get<T>(
    tree: &TransactionalTree,
    key: &str,
) -> ConflictableTransactionResult<Option<T>, anyhow::Error>
where
    T: for<'b> minicbor::Decode<'b, ()>,
{
    match tree.get(key.as_bytes())? {
        Some(raw) => match decode_record(key, raw.as_ref()) {
            Ok(value) => Ok(Some(value)),
            Err(err) => abort(err.into()),
        },
        None => Ok(None),
    }
}

/// Write a record inside a transaction.
pub fn tx_put<T: minicbor::Encode<()>>(
    tree: &TransactionalTree,
    key: &str,
    value: &T,
) -> ConflictableTransactionResult<(), anyhow::Error> {
    match minicbor::to_vec(value) {
        Ok(bytes) => {
            tree.insert(key.as_bytes(), bytes)?;
            Ok(())
        }
        Err(err) => abort(anyhow::Error::new(err)),
    }
}

fn decode_record<T>(key: &str, raw: &[u8]) -> Result<T, StoreError>
where
    T: for<'b> minicbor::Decode<'b, ()>,
{
    minicbor::decode(raw).map_err(|_| StoreError::Corrupt(key.to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::Cart;
    use crate::error::CommerceError;
    use crate::types::Timestamp;

    fn temp_store(name: &str) -> (tempfile::TempDir, Store) {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path().join(name)).unwrap();
        (dir, store)
    }

    #[test]
    fn put_get_roundtrip() {
        let (_dir, store) = temp_store("roundtrip.db");

        let mut cart = Cart::new("user_a", Timestamp::now());
        cart.add("prod_a", 2);

        store.put(&cart_key("user_a"), &cart).unwrap();
        let loaded: Cart = store.get(&cart_key("user_a")).unwrap().unwrap();

        assert_eq!(cart, loaded);
    }

    #[test]
    fn scan_honours_the_prefix() {
        let (_dir, store) = temp_store("scan.db");

        store
            .put(&cart_key("user_a"), &Cart::new("user_a", Timestamp::now()))
            .unwrap();
        store
            .put(&cart_key("user_b"), &Cart::new("user_b", Timestamp::now()))
            .unwrap();

        let carts: Vec<Cart> = store.scan("cart_").unwrap();
        assert_eq!(carts.len(), 2);

        let none: Vec<Cart> = store.scan(ORDER_HRP).unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn aborted_transactions_leave_no_writes() {
        let (_dir, store) = temp_store("abort.db");

        let result: anyhow::Result<()> = store.tx(|tx| {
            tx_put(tx, &cart_key("user_a"), &Cart::new("user_a", Timestamp::now()))?;
            abort(CommerceError::EmptyCart.into())
        });

        assert!(result.is_err());
        let cart: Option<Cart> = store.get(&cart_key("user_a")).unwrap();
        assert!(cart.is_none());
    }
}
