use async_trait::async_trait;
use dashmap::DashMap;
use uuid::Uuid;

use super::{Directory, PatientStore, PersistenceGateway, Record};
use crate::error::Result;
use crate::models::{Patient, PatientStatus};

/// Process-local gateway. Each single-row operation holds the shard lock for
/// that row only.
pub struct InMemoryGateway<T: Record> {
    rows: DashMap<Uuid, T>,
}

impl<T: Record> InMemoryGateway<T> {
    pub fn new() -> Self {
        Self {
            rows: DashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl<T: Record> Default for InMemoryGateway<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Record> PersistenceGateway<T> for InMemoryGateway<T> {
    async fn get(&self, id: Uuid) -> Result<Option<T>> {
        Ok(self.rows.get(&id).map(|row| row.value().clone()))
    }

    async fn get_all(&self) -> Result<Vec<T>> {
        Ok(self.rows.iter().map(|row| row.value().clone()).collect())
    }

    async fn create(&self, mut entity: T) -> Result<T> {
        let id = Uuid::new_v4();
        entity.set_id(id);
        self.rows.insert(id, entity.clone());
        Ok(entity)
    }

    async fn update(&self, id: Uuid, entity: T) -> Result<T> {
        if let Some(mut row) = self.rows.get_mut(&id) {
            let mut stored = entity.clone();
            stored.set_id(id);
            *row = stored;
        }
        Ok(entity)
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        self.rows.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl<T: Record> Directory<T> for InMemoryGateway<T> {
    async fn find_by_exact_field(&self, field: T::Field, value: &str) -> Result<Vec<T>> {
        Ok(self
            .rows
            .iter()
            .filter(|row| row.value().field_value(field) == value)
            .map(|row| row.value().clone())
            .collect())
    }
}

#[async_trait]
impl PatientStore for InMemoryGateway<Patient> {
    async fn compare_and_set_status(
        &self,
        id: Uuid,
        expected: PatientStatus,
        next: PatientStatus,
    ) -> Result<bool> {
        match self.rows.get_mut(&id) {
            Some(mut row) if row.status == expected => {
                row.status = next;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
