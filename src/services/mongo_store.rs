// ==================== MONGO USER STORE ====================
// Collection "users" no MongoDB. Cada operação do store é uma única
// operação de documento no driver (atômica por documento).

use crate::{
    database::MongoDB,
    models::{now_millis, UserDocument, UserFields, UserRecord},
    services::user_store::{validate, StoreError, UserStore},
};
use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::{
    bson::{self, doc, oid::ObjectId, Document},
    options::ReturnDocument,
    Collection,
};

pub const COLLECTION: &str = "users";

#[derive(Clone)]
pub struct MongoUserStore {
    db: MongoDB,
}

impl MongoUserStore {
    pub fn new(db: MongoDB) -> Self {
        Self { db }
    }

    fn collection(&self) -> Collection<UserDocument> {
        self.db.collection::<UserDocument>(COLLECTION)
    }
}

/// Ids that are not ObjectId hex can never match a stored document.
fn parse_id(id: &str) -> Result<ObjectId, StoreError> {
    ObjectId::parse_str(id).map_err(|_| StoreError::NotFound(id.to_string()))
}

/// `$set` for supplied fields, `$unset` for absent optionals.
fn replacement_update(fields: &UserFields) -> Document {
    let mut set = doc! { "name": &fields.name, "email": &fields.email };
    let mut unset = Document::new();

    match &fields.phone {
        Some(phone) => { set.insert("phone", phone); }
        None => { unset.insert("phone", ""); }
    }
    match fields.age {
        Some(age) => { set.insert("age", age); }
        None => { unset.insert("age", ""); }
    }
    match &fields.address {
        Some(address) => { set.insert("address", address); }
        None => { unset.insert("address", ""); }
    }

    let mut update = doc! { "$set": set };
    if !unset.is_empty() {
        update.insert("$unset", unset);
    }
    update
}

#[async_trait]
impl UserStore for MongoUserStore {
    async fn create(&self, fields: UserFields) -> Result<UserRecord, StoreError> {
        validate(&fields)?;

        let created_at = bson::DateTime::from_millis(now_millis().timestamp_millis());
        let document = UserDocument::new(ObjectId::new(), fields, created_at);

        self.collection().insert_one(&document).await?;

        log::info!("✅ User {} inserted", document.id.to_hex());
        Ok(UserRecord::from(document))
    }

    async fn list(&self) -> Result<Vec<UserRecord>, StoreError> {
        let cursor = self
            .collection()
            .find(doc! {})
            .sort(doc! { "createdAt": -1, "_id": -1 })
            .await?;

        let documents: Vec<UserDocument> = cursor.try_collect().await?;
        log::debug!("📋 Loaded {} users", documents.len());

        Ok(documents.into_iter().map(UserRecord::from).collect())
    }

    async fn get(&self, id: &str) -> Result<UserRecord, StoreError> {
        let object_id = parse_id(id)?;

        self.collection()
            .find_one(doc! { "_id": object_id })
            .await?
            .map(UserRecord::from)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn update(&self, id: &str, fields: UserFields) -> Result<UserRecord, StoreError> {
        let object_id = parse_id(id)?;

        if let Err(e) = validate(&fields) {
            // Um id inexistente é sempre NotFound, mesmo com campos inválidos
            let exists = self
                .collection()
                .count_documents(doc! { "_id": object_id })
                .await?;
            return Err(if exists == 0 { StoreError::NotFound(id.to_string()) } else { e });
        }

        let updated = self
            .collection()
            .find_one_and_update(doc! { "_id": object_id }, replacement_update(&fields))
            .return_document(ReturnDocument::After)
            .await?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        log::info!("✅ User {} updated", id);
        Ok(UserRecord::from(updated))
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let object_id = parse_id(id)?;

        let result = self
            .collection()
            .delete_one(doc! { "_id": object_id })
            .await?;

        if result.deleted_count == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }

        log::info!("🗑️  User {} deleted", id);
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.db.health_check().await
    }
}
