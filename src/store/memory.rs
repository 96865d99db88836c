use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use crate::models::user::{NewUser, User};
use crate::store::{StoreError, UserStore};

/// In-memory user store keyed by email. Used by tests and by demo runs without
/// a configured database; contents are lost on restart.
#[derive(Default)]
pub struct MemoryUserStore {
    users: DashMap<String, User>,
    next_id: AtomicI64,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self.users.get(email).map(|entry| entry.value().clone()))
    }

    async fn insert(&self, new_user: NewUser) -> Result<User, StoreError> {
        match self.users.entry(new_user.email.clone()) {
            Entry::Occupied(_) => Err(StoreError::DuplicateEmail),
            Entry::Vacant(slot) => {
                let user = User {
                    id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
                    email: new_user.email,
                    password_hash: new_user.password_hash,
                    user_type: new_user.user_type,
                    first_name: new_user.first_name,
                    last_name: new_user.last_name,
                    phone: new_user.phone,
                };
                slot.insert(user.clone());
                Ok(user)
            }
        }
    }
}
