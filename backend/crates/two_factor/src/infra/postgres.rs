//! PostgreSQL Repository Implementation

use chrono::{DateTime, Utc};
use kernel::id::TwoFactorCodeId;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entities::TwoFactorCode;
use crate::domain::repository::TwoFactorCodeRepository;
use crate::domain::value_objects::{CodePurpose, Email, VerificationCode};
use crate::error::{TwoFactorError, TwoFactorResult};

const CODE_COLUMNS: &str = r#"
    two_factor_code_id,
    email,
    code,
    purpose,
    expires_at,
    attempts,
    is_used,
    created_at,
    updated_at
"#;

/// PostgreSQL-backed repository
#[derive(Clone)]
pub struct PgTwoFactorRepository {
    pool: PgPool,
}

impl PgTwoFactorRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl TwoFactorCodeRepository for PgTwoFactorRepository {
    async fn replace_outstanding(
        &self,
        code: &TwoFactorCode,
        purpose: Option<CodePurpose>,
        now: DateTime<Utc>,
    ) -> TwoFactorResult<u64> {
        let mut tx = self.pool.begin().await?;

        // Serialise issuance per email so two concurrent requests cannot both
        // leave a live code behind
        sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
            .bind(code.email.as_str())
            .execute(&mut *tx)
            .await?;

        let invalidated = sqlx::query(
            r#"
            UPDATE two_factor_codes
            SET is_used = TRUE, updated_at = $3
            WHERE email = $1
              AND NOT is_used
              AND expires_at >= $3
              AND ($2::TEXT IS NULL OR purpose = $2)
            "#,
        )
        .bind(code.email.as_str())
        .bind(purpose.map(|p| p.as_str()))
        .bind(now)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        sqlx::query(
            r#"
            INSERT INTO two_factor_codes (
                two_factor_code_id,
                email,
                code,
                purpose,
                expires_at,
                attempts,
                is_used,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(code.id.as_uuid())
        .bind(code.email.as_str())
        .bind(code.code.as_str())
        .bind(code.purpose.as_str())
        .bind(code.expires_at)
        .bind(i16::from(code.attempts))
        .bind(code.is_used)
        .bind(code.created_at)
        .bind(code.updated_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(invalidated)
    }

    async fn find_latest(
        &self,
        email: &Email,
        purpose: CodePurpose,
    ) -> TwoFactorResult<Option<TwoFactorCode>> {
        let row = sqlx::query_as::<_, TwoFactorCodeRow>(&format!(
            r#"
            SELECT {CODE_COLUMNS}
            FROM two_factor_codes
            WHERE email = $1 AND purpose = $2
            ORDER BY issue_seq DESC
            LIMIT 1
            "#
        ))
        .bind(email.as_str())
        .bind(purpose.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(TwoFactorCodeRow::into_code).transpose()
    }

    async fn find_by_id(&self, id: TwoFactorCodeId) -> TwoFactorResult<Option<TwoFactorCode>> {
        let row = sqlx::query_as::<_, TwoFactorCodeRow>(&format!(
            "SELECT {CODE_COLUMNS} FROM two_factor_codes WHERE two_factor_code_id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(TwoFactorCodeRow::into_code).transpose()
    }

    async fn record_attempt(
        &self,
        id: TwoFactorCodeId,
        now: DateTime<Utc>,
        max_attempts: u8,
    ) -> TwoFactorResult<Option<TwoFactorCode>> {
        let row = sqlx::query_as::<_, TwoFactorCodeRow>(&format!(
            r#"
            UPDATE two_factor_codes
            SET attempts = attempts + 1, updated_at = $2
            WHERE two_factor_code_id = $1
              AND NOT is_used
              AND attempts < $3
              AND expires_at >= $2
            RETURNING {CODE_COLUMNS}
            "#
        ))
        .bind(id.as_uuid())
        .bind(now)
        .bind(i16::from(max_attempts))
        .fetch_optional(&self.pool)
        .await?;

        row.map(TwoFactorCodeRow::into_code).transpose()
    }

    async fn mark_used(&self, id: TwoFactorCodeId, now: DateTime<Utc>) -> TwoFactorResult<bool> {
        let affected = sqlx::query(
            r#"
            UPDATE two_factor_codes
            SET is_used = TRUE, updated_at = $2
            WHERE two_factor_code_id = $1 AND NOT is_used
            "#,
        )
        .bind(id.as_uuid())
        .bind(now)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(affected == 1)
    }

    async fn purge_expired(&self, cutoff: DateTime<Utc>) -> TwoFactorResult<u64> {
        let deleted = sqlx::query("DELETE FROM two_factor_codes WHERE expires_at < $1")
            .bind(cutoff)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted)
    }
}

// Internal row type for sqlx mapping
#[derive(sqlx::FromRow)]
struct TwoFactorCodeRow {
    two_factor_code_id: Uuid,
    email: String,
    code: String,
    purpose: String,
    expires_at: DateTime<Utc>,
    attempts: i16,
    is_used: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TwoFactorCodeRow {
    fn into_code(self) -> TwoFactorResult<TwoFactorCode> {
        let attempts = u8::try_from(self.attempts).map_err(|_| {
            TwoFactorError::Internal(format!(
                "stored attempt count out of range: {}",
                self.attempts
            ))
        })?;

        Ok(TwoFactorCode {
            id: TwoFactorCodeId::from_uuid(self.two_factor_code_id),
            email: Email::from_db(self.email),
            code: VerificationCode::from_db(self.code),
            purpose: self.purpose.parse()?,
            expires_at: self.expires_at,
            attempts,
            is_used: self.is_used,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
