//! In-memory account store
//!
//! Backs unit tests and local development without a database. Mirrors the
//! semantics of the Postgres store, including atomic create-if-absent.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use super::{AccountStore, StoreError, StoreResult};
use crate::models::Account;

/// In-memory `AccountStore` keyed by normalized email
#[derive(Default)]
pub struct MemoryAccountStore {
    accounts: RwLock<HashMap<String, Account>>,
}

impl MemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored accounts (test helper)
    pub fn len(&self) -> usize {
        self.accounts.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn get(&self, email: &str) -> StoreResult<Option<Account>> {
        Ok(self.accounts.read().unwrap().get(email).cloned())
    }

    async fn create(&self, account: &Account) -> StoreResult<()> {
        let mut accounts = self.accounts.write().unwrap();
        if accounts.contains_key(&account.email) {
            return Err(StoreError::AlreadyExists);
        }
        accounts.insert(account.email.clone(), account.clone());
        Ok(())
    }

    async fn put(&self, account: &Account) -> StoreResult<()> {
        let mut accounts = self.accounts.write().unwrap();
        match accounts.get_mut(&account.email) {
            Some(existing) => {
                *existing = account.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound),
        }
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}
