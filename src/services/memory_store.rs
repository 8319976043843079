// In-process store, selected with STORE_BACKEND=memory. Same id format as Mongo.

use crate::{
    models::{now_millis, UserFields, UserRecord},
    services::user_store::{validate, StoreError, UserStore},
};
use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<String, UserRecord>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create(&self, fields: UserFields) -> Result<UserRecord, StoreError> {
        validate(&fields)?;

        let record = UserRecord {
            id: ObjectId::new().to_hex(),
            name: fields.name,
            email: fields.email,
            phone: fields.phone,
            age: fields.age,
            address: fields.address,
            created_at: now_millis(),
        };

        self.users.write().await.insert(record.id.clone(), record.clone());
        log::debug!("💾 [memory] user {} created", record.id);
        Ok(record)
    }

    async fn list(&self) -> Result<Vec<UserRecord>, StoreError> {
        let mut users: Vec<UserRecord> = self.users.read().await.values().cloned().collect();
        // ObjectIds grow with creation time, so the id breaks ties inside one millisecond
        users.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(users)
    }

    async fn get(&self, id: &str) -> Result<UserRecord, StoreError> {
        self.users
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn update(&self, id: &str, fields: UserFields) -> Result<UserRecord, StoreError> {
        let mut users = self.users.write().await;
        let existing = users
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        validate(&fields)?;

        existing.name = fields.name;
        existing.email = fields.email;
        existing.phone = fields.phone;
        existing.age = fields.age;
        existing.address = fields.address;

        log::debug!("💾 [memory] user {} updated", id);
        Ok(existing.clone())
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        match self.users.write().await.remove(id) {
            Some(_) => Ok(()),
            None => Err(StoreError::NotFound(id.to_string())),
        }
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
