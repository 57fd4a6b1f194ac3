//! Persistence gateways.
//!
//! Use cases depend on the capability traits declared here and never on a
//! concrete storage engine. Two engines implement them identically:
//! - `postgres`: `sqlx` against PostgreSQL
//! - `memory`: process-local `DashMap`

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{Doctor, DoctorField, Patient, PatientField, PatientStatus};

pub use memory::InMemoryGateway;
pub use postgres::PgGateway;

/// An entity a gateway can store.
pub trait Record: Clone + Send + Sync + 'static {
    /// Closed set of fields the directory can match on.
    type Field: Copy + Send + Sync + 'static;

    fn id(&self) -> Option<Uuid>;
    fn set_id(&mut self, id: Uuid);
    fn field_value(&self, field: Self::Field) -> &str;
}

/// Generic CRUD contract over one entity collection.
///
/// Absence is `None`, never an error. Storage failures propagate unchanged.
#[async_trait]
pub trait PersistenceGateway<T: Record>: Send + Sync {
    async fn get(&self, id: Uuid) -> Result<Option<T>>;

    /// Eager full scan, no ordering guarantee.
    async fn get_all(&self) -> Result<Vec<T>>;

    /// Persist and return the stored entity carrying its generated id.
    async fn create(&self, entity: T) -> Result<T>;

    /// Full replace by id. Returns the entity as requested, not a re-read;
    /// a missing id writes nothing.
    async fn update(&self, id: Uuid, entity: T) -> Result<T>;

    async fn delete(&self, id: Uuid) -> Result<()>;
}

/// Exact-field lookups layered on a gateway.
#[async_trait]
pub trait Directory<T: Record>: PersistenceGateway<T> {
    /// Case-sensitive equality match. Empty when nothing matches.
    async fn find_by_exact_field(&self, field: T::Field, value: &str) -> Result<Vec<T>>;
}

/// Patient-specific storage capabilities.
#[async_trait]
pub trait PatientStore: Directory<Patient> {
    /// Single-row conditional status update. Returns `false` when the row is
    /// missing or its status is no longer `expected`.
    async fn compare_and_set_status(
        &self,
        id: Uuid,
        expected: PatientStatus,
        next: PatientStatus,
    ) -> Result<bool>;
}

impl Record for Patient {
    type Field = PatientField;

    fn id(&self) -> Option<Uuid> {
        self.id
    }

    fn set_id(&mut self, id: Uuid) {
        self.id = Some(id);
    }

    fn field_value(&self, field: PatientField) -> &str {
        match field {
            PatientField::Email => &self.email,
        }
    }
}

impl Record for Doctor {
    type Field = DoctorField;

    fn id(&self) -> Option<Uuid> {
        self.id
    }

    fn set_id(&mut self, id: Uuid) {
        self.id = Some(id);
    }

    fn field_value(&self, field: DoctorField) -> &str {
        match field {
            DoctorField::Name => &self.name,
            DoctorField::Email => &self.email,
            DoctorField::Specialty => &self.specialty,
        }
    }
}

/// Gateways for both collections, built for one storage engine.
#[derive(Clone)]
pub struct Storage {
    pub patients: Arc<dyn PatientStore>,
    pub doctors: Arc<dyn Directory<Doctor>>,
}

impl Storage {
    pub fn postgres(pool: sqlx::PgPool) -> Self {
        Self {
            patients: Arc::new(PgGateway::<Patient>::new(pool.clone())),
            doctors: Arc::new(PgGateway::<Doctor>::new(pool)),
        }
    }

    pub fn in_memory() -> Self {
        Self {
            patients: Arc::new(InMemoryGateway::<Patient>::new()),
            doctors: Arc::new(InMemoryGateway::<Doctor>::new()),
        }
    }
}
