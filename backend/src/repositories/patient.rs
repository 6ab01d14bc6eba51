//! Schema and seed writes for the `patient` table. Admin role only.

use sqlx::MySqlConnection;

use crate::{
    db::connection::{AdminPool, RolePool},
    error::AppError,
    models::{InsertOutcome, SeedPatient, SEED_PATIENTS},
};

const CREATE_PATIENT_TABLE: &str = "\
CREATE TABLE IF NOT EXISTS patient (
    patientId INT(11) NOT NULL AUTO_INCREMENT,
    name VARCHAR(100) NOT NULL,
    dateOfBirth DATETIME NOT NULL,
    PRIMARY KEY (patientId)
) ENGINE=InnoDB";

const INSERT_PATIENT: &str = "INSERT INTO patient (name, dateOfBirth) VALUES (?, ?)";

/// Creates `patient` if absent, then appends every seed record in order.
///
/// Rows are never deduplicated, so each call grows the table by
/// `SEED_PATIENTS.len()`. A failure stops the remaining inserts; rows already
/// written stay committed. One admin connection covers the whole call and is
/// returned to the pool when it drops.
pub async fn insert_seed_data(pool: &AdminPool) -> Result<InsertOutcome, AppError> {
    let mut conn = pool.acquire().await?;

    ensure_table(&mut conn).await?;
    for patient in &SEED_PATIENTS {
        insert_patient(&mut conn, patient).await?;
    }

    tracing::info!(rows = SEED_PATIENTS.len(), "Inserted seed patients");
    Ok(InsertOutcome::inserted(SEED_PATIENTS.len()))
}

async fn ensure_table(conn: &mut MySqlConnection) -> Result<(), AppError> {
    sqlx::query(CREATE_PATIENT_TABLE).execute(&mut *conn).await?;
    Ok(())
}

async fn insert_patient(conn: &mut MySqlConnection, patient: &SeedPatient) -> Result<(), AppError> {
    sqlx::query(INSERT_PATIENT)
        .bind(patient.name)
        .bind(patient.date_of_birth)
        .execute(&mut *conn)
        .await?;
    Ok(())
}
