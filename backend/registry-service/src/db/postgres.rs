use async_trait::async_trait;
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::{Arguments, FromRow, PgPool};
use std::marker::PhantomData;
use uuid::Uuid;

use super::{Directory, PatientStore, PersistenceGateway, Record};
use crate::error::Result;
use crate::models::{Doctor, DoctorField, Patient, PatientField, PatientStatus, Role};

/// Table mapping for an entity stored in PostgreSQL.
pub trait PgRecord: Record + Unpin {
    type Row: for<'r> FromRow<'r, PgRow> + Send + Unpin;

    const TABLE: &'static str;
    /// Columns read back, `id` first.
    const SELECT_COLUMNS: &'static str;
    /// Columns written on insert/update, in the order `arguments` binds them.
    const WRITE_COLUMNS: &'static [&'static str];

    fn from_row(row: Self::Row) -> Result<Self>;
    fn arguments(&self) -> PgArguments;
    fn column(field: Self::Field) -> &'static str;
}

/// Generic sqlx gateway; SQL is assembled from the static table mapping only.
pub struct PgGateway<T: PgRecord> {
    pool: PgPool,
    _entity: PhantomData<fn() -> T>,
}

impl<T: PgRecord> PgGateway<T> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _entity: PhantomData,
        }
    }

    fn insert_sql() -> String {
        let placeholders = (1..=T::WRITE_COLUMNS.len())
            .map(|i| format!("${}", i))
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
            T::TABLE,
            T::WRITE_COLUMNS.join(", "),
            placeholders,
            T::SELECT_COLUMNS
        )
    }

    fn update_sql() -> String {
        let assignments = T::WRITE_COLUMNS
            .iter()
            .enumerate()
            .map(|(i, column)| format!("{} = ${}", column, i + 1))
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "UPDATE {} SET {} WHERE id = ${}",
            T::TABLE,
            assignments,
            T::WRITE_COLUMNS.len() + 1
        )
    }
}

#[async_trait]
impl<T: PgRecord> PersistenceGateway<T> for PgGateway<T> {
    async fn get(&self, id: Uuid) -> Result<Option<T>> {
        let sql = format!("SELECT {} FROM {} WHERE id = $1", T::SELECT_COLUMNS, T::TABLE);
        let row = sqlx::query_as::<_, T::Row>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(T::from_row).transpose()
    }

    async fn get_all(&self) -> Result<Vec<T>> {
        let sql = format!("SELECT {} FROM {}", T::SELECT_COLUMNS, T::TABLE);
        sqlx::query_as::<_, T::Row>(&sql)
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(T::from_row)
            .collect()
    }

    async fn create(&self, entity: T) -> Result<T> {
        let sql = Self::insert_sql();
        let row = sqlx::query_as_with::<_, T::Row, _>(&sql, entity.arguments())
            .fetch_one(&self.pool)
            .await?;

        T::from_row(row)
    }

    async fn update(&self, id: Uuid, entity: T) -> Result<T> {
        let sql = Self::update_sql();
        let mut args = entity.arguments();
        args.add(id);

        let result = sqlx::query_with(&sql, args).execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            tracing::debug!(table = T::TABLE, %id, "update matched no rows");
        }

        Ok(entity)
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let sql = format!("DELETE FROM {} WHERE id = $1", T::TABLE);
        sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl<T: PgRecord> Directory<T> for PgGateway<T> {
    async fn find_by_exact_field(&self, field: T::Field, value: &str) -> Result<Vec<T>> {
        let sql = format!(
            "SELECT {} FROM {} WHERE {} = $1",
            T::SELECT_COLUMNS,
            T::TABLE,
            T::column(field)
        );
        sqlx::query_as::<_, T::Row>(&sql)
            .bind(value)
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(T::from_row)
            .collect()
    }
}

#[async_trait]
impl PatientStore for PgGateway<Patient> {
    async fn compare_and_set_status(
        &self,
        id: Uuid,
        expected: PatientStatus,
        next: PatientStatus,
    ) -> Result<bool> {
        let result = sqlx::query("UPDATE patients SET status = $1 WHERE id = $2 AND status = $3")
            .bind(next.as_str())
            .bind(id)
            .bind(expected.as_str())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() == 1)
    }
}

#[derive(Debug, FromRow)]
pub struct PatientRow {
    id: Uuid,
    name: String,
    cpf: String,
    email: String,
    password: String,
    status: String,
}

impl PgRecord for Patient {
    type Row = PatientRow;

    const TABLE: &'static str = "patients";
    const SELECT_COLUMNS: &'static str = "id, name, cpf, email, password, status";
    const WRITE_COLUMNS: &'static [&'static str] = &["name", "cpf", "email", "password", "status"];

    fn from_row(row: PatientRow) -> Result<Self> {
        Ok(Patient {
            id: Some(row.id),
            name: row.name,
            cpf: row.cpf,
            email: row.email,
            password_hash: row.password,
            status: row.status.parse()?,
        })
    }

    fn arguments(&self) -> PgArguments {
        let mut args = PgArguments::default();
        args.add(self.name.clone());
        args.add(self.cpf.clone());
        args.add(self.email.clone());
        args.add(self.password_hash.clone());
        args.add(self.status.as_str());
        args
    }

    fn column(field: PatientField) -> &'static str {
        match field {
            PatientField::Email => "email",
        }
    }
}

#[derive(Debug, FromRow)]
pub struct DoctorRow {
    id: Uuid,
    name: String,
    cpf: String,
    crm: String,
    email: String,
    specialty: String,
    password: String,
}

impl PgRecord for Doctor {
    type Row = DoctorRow;

    const TABLE: &'static str = "doctors";
    const SELECT_COLUMNS: &'static str = "id, name, cpf, crm, email, specialty, password";
    const WRITE_COLUMNS: &'static [&'static str] =
        &["name", "cpf", "crm", "email", "specialty", "password", "role"];

    fn from_row(row: DoctorRow) -> Result<Self> {
        Ok(Doctor {
            id: Some(row.id),
            name: row.name,
            cpf: row.cpf,
            crm: row.crm,
            email: row.email,
            specialty: row.specialty,
            password_hash: row.password,
        })
    }

    fn arguments(&self) -> PgArguments {
        let mut args = PgArguments::default();
        args.add(self.name.clone());
        args.add(self.cpf.clone());
        args.add(self.crm.clone());
        args.add(self.email.clone());
        args.add(self.specialty.clone());
        args.add(self.password_hash.clone());
        args.add(Role::Doctor.as_str());
        args
    }

    fn column(field: DoctorField) -> &'static str {
        match field {
            DoctorField::Name => "name",
            DoctorField::Email => "email",
            DoctorField::Specialty => "specialty",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_sql_binds_write_columns_in_order() {
        assert_eq!(
            PgGateway::<Patient>::insert_sql(),
            "INSERT INTO patients (name, cpf, email, password, status) \
             VALUES ($1, $2, $3, $4, $5) RETURNING id, name, cpf, email, password, status"
        );
    }

    #[test]
    fn test_update_sql_puts_id_last() {
        assert_eq!(
            PgGateway::<Doctor>::update_sql(),
            "UPDATE doctors SET name = $1, cpf = $2, crm = $3, email = $4, \
             specialty = $5, password = $6, role = $7 WHERE id = $8"
        );
    }
}
