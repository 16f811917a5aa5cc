//! Case repository implementation.
//!
//! PostgreSQL-backed persistence for case records. Assessment blocks and the
//! counterparty reference are stored as JSONB; scores are never persisted,
//! they are recomputed from the blocks on read.

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use tracing::{debug, instrument};
use uuid::Uuid;

use caseflow_application::{ApplicationError, CaseQueryFilters, CaseRepositoryPort};
use caseflow_common::pagination::{PaginationParams, SortParams};
use caseflow_domain::case::{Case, CaseKind, CaseStatus};
use caseflow_domain::collaboration::{CaseComment, CaseWorklog};
use caseflow_domain::errors::CaseError;
use caseflow_domain::identifiers::CaseId;

use crate::database::TransactionExt;
use crate::{Error, Result};

/// Repository trait for case persistence operations.
#[async_trait]
pub trait CaseRepository: Send + Sync {
    /// Insert a new case record.
    async fn insert(&self, case: &Case) -> Result<()>;

    /// Get a case by its ID.
    async fn get_by_id(&self, id: CaseId) -> Result<Option<Case>>;

    /// List cases matching the filters, one page at a time.
    async fn list(
        &self,
        filters: &CaseQueryFilters,
        pagination: &PaginationParams,
        sort: &SortParams,
    ) -> Result<Vec<Case>>;

    /// Count cases matching the filters.
    async fn count(&self, filters: &CaseQueryFilters) -> Result<u64>;

    /// Overwrite a case record.
    async fn update(&self, case: &Case) -> Result<()>;

    /// Delete a case and its comments/worklogs in one transaction.
    ///
    /// Returns whether a case row was actually removed.
    async fn delete(&self, id: CaseId) -> Result<bool>;

    /// List the comments attached to a case, oldest first.
    async fn list_comments(&self, case_id: CaseId) -> Result<Vec<CaseComment>>;

    /// List the worklog entries attached to a case, oldest first.
    async fn list_worklogs(&self, case_id: CaseId) -> Result<Vec<CaseWorklog>>;
}

/// PostgreSQL implementation of CaseRepository.
pub struct PgCaseRepository {
    pool: PgPool,
}

impl PgCaseRepository {
    /// Create a new PostgreSQL case repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Convert a database row to a Case.
    fn row_to_case(&self, row: sqlx::postgres::PgRow) -> Result<Case> {
        let kind_str: String = row.get("kind");
        let status_str: String = row.get("status");
        let counterparty_json: Option<serde_json::Value> = row.get("counterparty");
        let user_assessment_json: serde_json::Value = row.get("user_assessment");
        let admin_assessment_json: serde_json::Value = row.get("admin_assessment");

        Ok(Case {
            id: CaseId::from(row.get::<Uuid, _>("id")),
            kind: parse_kind(&kind_str)?,
            title: row.get("title"),
            description: row.get("description"),
            requester: row.get::<Uuid, _>("requester").into(),
            handler: row.get::<Uuid, _>("handler").into(),
            counterparty: counterparty_json
                .map(serde_json::from_value)
                .transpose()
                .map_err(Error::Serialization)?,
            status: parse_status(&status_str)?,
            start_date: row.get("start_date"),
            in_progress_at: row.get("in_progress_at"),
            end_date: row.get("end_date"),
            notes: row.get("notes"),
            crm_reference_code: row.get("crm_reference_code"),
            user_assessment: serde_json::from_value(user_assessment_json)
                .map_err(Error::Serialization)?,
            admin_assessment: serde_json::from_value(admin_assessment_json)
                .map_err(Error::Serialization)?,
            revision: row.get("revision"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
    }

    /// Build the dynamic WHERE clause for the given filters.
    fn where_clause(filters: &CaseQueryFilters) -> String {
        let mut conditions = vec!["1=1".to_string()];
        let mut param_count = 0;

        if filters.kind.is_some() {
            param_count += 1;
            conditions.push(format!("kind = ${}", param_count));
        }
        if filters.status.is_some() {
            param_count += 1;
            conditions.push(format!("status = ${}", param_count));
        }
        if filters.handler.is_some() {
            param_count += 1;
            conditions.push(format!("handler = ${}", param_count));
        }
        if filters.requester.is_some() {
            param_count += 1;
            conditions.push(format!("requester = ${}", param_count));
        }
        if filters.start_date.start.is_some() {
            param_count += 1;
            conditions.push(format!("start_date >= ${}", param_count));
        }
        if filters.start_date.end.is_some() {
            param_count += 1;
            conditions.push(format!("start_date <= ${}", param_count));
        }

        conditions.join(" AND ")
    }
}

#[async_trait]
impl CaseRepository for PgCaseRepository {
    #[instrument(skip(self, case), fields(case_id = %case.id))]
    async fn insert(&self, case: &Case) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO cases (
                id, kind, title, description, requester, handler,
                counterparty, status, start_date, in_progress_at, end_date,
                notes, crm_reference_code, user_assessment, admin_assessment,
                revision, created_at, updated_at
            ) VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11,
                $12, $13, $14, $15, $16, $17, $18
            )
            "#,
        )
        .bind(case.id.as_uuid())
        .bind(kind_to_str(&case.kind))
        .bind(&case.title)
        .bind(&case.description)
        .bind(case.requester.as_uuid())
        .bind(case.handler.as_uuid())
        .bind(
            case.counterparty
                .as_ref()
                .map(serde_json::to_value)
                .transpose()
                .map_err(Error::Serialization)?,
        )
        .bind(status_to_str(&case.status))
        .bind(case.start_date)
        .bind(case.in_progress_at)
        .bind(case.end_date)
        .bind(&case.notes)
        .bind(&case.crm_reference_code)
        .bind(serde_json::to_value(case.user_assessment).map_err(Error::Serialization)?)
        .bind(serde_json::to_value(case.admin_assessment).map_err(Error::Serialization)?)
        .bind(case.revision)
        .bind(case.created_at)
        .bind(case.updated_at)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        debug!(case_id = %case.id, "Case inserted");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: CaseId) -> Result<Option<Case>> {
        let row = sqlx::query(
            r#"
            SELECT
                id, kind, title, description, requester, handler,
                counterparty, status, start_date, in_progress_at, end_date,
                notes, crm_reference_code, user_assessment, admin_assessment,
                revision, created_at, updated_at
            FROM cases
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        match row {
            Some(row) => Ok(Some(self.row_to_case(row)?)),
            None => Ok(None),
        }
    }

    #[instrument(skip(self, filters, pagination, sort))]
    async fn list(
        &self,
        filters: &CaseQueryFilters,
        pagination: &PaginationParams,
        sort: &SortParams,
    ) -> Result<Vec<Case>> {
        let offset = pagination.offset() as i64;
        let limit = pagination.limit() as i64;

        let where_clause = Self::where_clause(filters);
        let order_column = match sort.field.as_str() {
            "created_at" => "created_at",
            "updated_at" => "updated_at",
            "start_date" => "start_date",
            "title" => "title",
            "revision" => "revision",
            _ => "created_at",
        };

        let list_sql = format!(
            r#"
            SELECT
                id, kind, title, description, requester, handler,
                counterparty, status, start_date, in_progress_at, end_date,
                notes, crm_reference_code, user_assessment, admin_assessment,
                revision, created_at, updated_at
            FROM cases
            WHERE {}
            ORDER BY {} {}
            LIMIT {} OFFSET {}
            "#,
            where_clause, order_column, sort.direction, limit, offset
        );

        let mut list_query = sqlx::query(&list_sql);
        if let Some(ref kind) = filters.kind {
            list_query = list_query.bind(kind_to_str(kind));
        }
        if let Some(ref status) = filters.status {
            list_query = list_query.bind(status_to_str(status));
        }
        if let Some(handler) = filters.handler {
            list_query = list_query.bind(*handler.as_uuid());
        }
        if let Some(requester) = filters.requester {
            list_query = list_query.bind(*requester.as_uuid());
        }
        if let Some(start) = filters.start_date.start {
            list_query = list_query.bind(start);
        }
        if let Some(end) = filters.start_date.end {
            list_query = list_query.bind(end);
        }

        let rows = list_query
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)?;

        let mut cases = Vec::with_capacity(rows.len());
        for row in rows {
            cases.push(self.row_to_case(row)?);
        }

        Ok(cases)
    }

    #[instrument(skip(self, filters))]
    async fn count(&self, filters: &CaseQueryFilters) -> Result<u64> {
        let count_sql = format!(
            "SELECT COUNT(*) FROM cases WHERE {}",
            Self::where_clause(filters)
        );

        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        if let Some(ref kind) = filters.kind {
            count_query = count_query.bind(kind_to_str(kind));
        }
        if let Some(ref status) = filters.status {
            count_query = count_query.bind(status_to_str(status));
        }
        if let Some(handler) = filters.handler {
            count_query = count_query.bind(*handler.as_uuid());
        }
        if let Some(requester) = filters.requester {
            count_query = count_query.bind(*requester.as_uuid());
        }
        if let Some(start) = filters.start_date.start {
            count_query = count_query.bind(start);
        }
        if let Some(end) = filters.start_date.end {
            count_query = count_query.bind(end);
        }

        let total: i64 = count_query
            .fetch_one(&self.pool)
            .await
            .map_err(Error::Database)?;

        Ok(total as u64)
    }

    #[instrument(skip(self, case), fields(case_id = %case.id))]
    async fn update(&self, case: &Case) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE cases SET
                title = $2,
                description = $3,
                handler = $4,
                counterparty = $5,
                status = $6,
                start_date = $7,
                in_progress_at = $8,
                end_date = $9,
                notes = $10,
                crm_reference_code = $11,
                user_assessment = $12,
                admin_assessment = $13,
                revision = $14,
                updated_at = $15
            WHERE id = $1
            "#,
        )
        .bind(case.id.as_uuid())
        .bind(&case.title)
        .bind(&case.description)
        .bind(case.handler.as_uuid())
        .bind(
            case.counterparty
                .as_ref()
                .map(serde_json::to_value)
                .transpose()
                .map_err(Error::Serialization)?,
        )
        .bind(status_to_str(&case.status))
        .bind(case.start_date)
        .bind(case.in_progress_at)
        .bind(case.end_date)
        .bind(&case.notes)
        .bind(&case.crm_reference_code)
        .bind(serde_json::to_value(case.user_assessment).map_err(Error::Serialization)?)
        .bind(serde_json::to_value(case.admin_assessment).map_err(Error::Serialization)?)
        .bind(case.revision)
        .bind(case.updated_at)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("Case {}", case.id)));
        }

        debug!(case_id = %case.id, revision = case.revision, "Case updated");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: CaseId) -> Result<bool> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        let result: Result<u64> = async {
            sqlx::query("DELETE FROM case_comments WHERE case_id = $1")
                .bind(id.as_uuid())
                .execute(&mut *tx)
                .await?;

            sqlx::query("DELETE FROM case_worklogs WHERE case_id = $1")
                .bind(id.as_uuid())
                .execute(&mut *tx)
                .await?;

            let deleted = sqlx::query("DELETE FROM cases WHERE id = $1")
                .bind(id.as_uuid())
                .execute(&mut *tx)
                .await?;

            Ok(deleted.rows_affected())
        }
        .await;

        let deleted = tx.commit_or_rollback(result).await?;

        debug!(case_id = %id, deleted = deleted > 0, "Case delete finished");
        Ok(deleted > 0)
    }

    #[instrument(skip(self))]
    async fn list_comments(&self, case_id: CaseId) -> Result<Vec<CaseComment>> {
        let rows = sqlx::query(
            r#"
            SELECT id, case_id, author, body, created_at
            FROM case_comments
            WHERE case_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(case_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(rows
            .into_iter()
            .map(|row| CaseComment {
                id: row.get::<Uuid, _>("id").into(),
                case_id: row.get::<Uuid, _>("case_id").into(),
                author: row.get::<Uuid, _>("author").into(),
                body: row.get("body"),
                created_at: row.get("created_at"),
            })
            .collect())
    }

    #[instrument(skip(self))]
    async fn list_worklogs(&self, case_id: CaseId) -> Result<Vec<CaseWorklog>> {
        let rows = sqlx::query(
            r#"
            SELECT id, case_id, author, minutes_spent, description, logged_at
            FROM case_worklogs
            WHERE case_id = $1
            ORDER BY logged_at
            "#,
        )
        .bind(case_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(rows
            .into_iter()
            .map(|row| CaseWorklog {
                id: row.get::<Uuid, _>("id").into(),
                case_id: row.get::<Uuid, _>("case_id").into(),
                author: row.get::<Uuid, _>("author").into(),
                minutes_spent: row.get::<i32, _>("minutes_spent").unsigned_abs(),
                description: row.get("description"),
                logged_at: row.get("logged_at"),
            })
            .collect())
    }
}

#[async_trait]
impl CaseRepositoryPort for PgCaseRepository {
    async fn insert(&self, case: &Case) -> std::result::Result<(), ApplicationError> {
        Ok(CaseRepository::insert(self, case).await?)
    }

    async fn get_by_id(&self, id: CaseId) -> std::result::Result<Option<Case>, ApplicationError> {
        Ok(CaseRepository::get_by_id(self, id).await?)
    }

    async fn list(
        &self,
        filters: &CaseQueryFilters,
        pagination: &PaginationParams,
        sort: &SortParams,
    ) -> std::result::Result<Vec<Case>, ApplicationError> {
        Ok(CaseRepository::list(self, filters, pagination, sort).await?)
    }

    async fn count(&self, filters: &CaseQueryFilters) -> std::result::Result<u64, ApplicationError> {
        Ok(CaseRepository::count(self, filters).await?)
    }

    async fn update(&self, case: &Case) -> std::result::Result<(), ApplicationError> {
        Ok(CaseRepository::update(self, case).await?)
    }

    async fn delete(&self, id: CaseId) -> std::result::Result<(), ApplicationError> {
        if CaseRepository::delete(self, id).await? {
            Ok(())
        } else {
            Err(CaseError::NotFound(id).into())
        }
    }

    async fn list_comments(
        &self,
        case_id: CaseId,
    ) -> std::result::Result<Vec<CaseComment>, ApplicationError> {
        Ok(CaseRepository::list_comments(self, case_id).await?)
    }

    async fn list_worklogs(
        &self,
        case_id: CaseId,
    ) -> std::result::Result<Vec<CaseWorklog>, ApplicationError> {
        Ok(CaseRepository::list_worklogs(self, case_id).await?)
    }
}

// Helper functions for enum column conversion

fn kind_to_str(kind: &CaseKind) -> &'static str {
    match kind {
        CaseKind::Internal => "internal",
        CaseKind::Delivery => "delivery",
        CaseKind::Receiving => "receiving",
        CaseKind::Incident => "incident",
        CaseKind::Maintenance => "maintenance",
        CaseKind::Warranty => "warranty",
        CaseKind::Deployment => "deployment",
    }
}

fn parse_kind(s: &str) -> Result<CaseKind> {
    match s.to_lowercase().as_str() {
        "internal" => Ok(CaseKind::Internal),
        "delivery" => Ok(CaseKind::Delivery),
        "receiving" => Ok(CaseKind::Receiving),
        "incident" => Ok(CaseKind::Incident),
        "maintenance" => Ok(CaseKind::Maintenance),
        "warranty" => Ok(CaseKind::Warranty),
        "deployment" => Ok(CaseKind::Deployment),
        _ => Err(Error::Configuration(format!("Unknown case kind: {}", s))),
    }
}

fn status_to_str(status: &CaseStatus) -> &'static str {
    match status {
        CaseStatus::Received => "received",
        CaseStatus::InProgress => "in_progress",
        CaseStatus::Completed => "completed",
        CaseStatus::Cancelled => "cancelled",
    }
}

fn parse_status(s: &str) -> Result<CaseStatus> {
    match s.to_lowercase().as_str() {
        "received" => Ok(CaseStatus::Received),
        "in_progress" => Ok(CaseStatus::InProgress),
        "completed" => Ok(CaseStatus::Completed),
        "cancelled" => Ok(CaseStatus::Cancelled),
        _ => Err(Error::Configuration(format!("Unknown case status: {}", s))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use caseflow_common::pagination::DateRange;

    #[test]
    fn test_kind_conversion() {
        for kind in CaseKind::all() {
            assert_eq!(parse_kind(kind_to_str(kind)).unwrap(), *kind);
        }
        assert!(parse_kind("invalid").is_err());
    }

    #[test]
    fn test_status_conversion() {
        for status in CaseStatus::all() {
            assert_eq!(parse_status(status_to_str(status)).unwrap(), *status);
        }
        assert!(parse_status("invalid").is_err());
    }

    #[test]
    fn test_where_clause_numbering_follows_filter_order() {
        let filters = CaseQueryFilters {
            kind: Some(CaseKind::Incident),
            status: None,
            handler: None,
            requester: Some(caseflow_domain::identifiers::EmployeeId::new()),
            start_date: DateRange::new(Some(chrono::Utc::now()), None),
        };

        let clause = PgCaseRepository::where_clause(&filters);
        assert_eq!(clause, "1=1 AND kind = $1 AND requester = $2 AND start_date >= $3");
    }

    #[test]
    fn test_where_clause_without_filters() {
        let clause = PgCaseRepository::where_clause(&CaseQueryFilters::default());
        assert_eq!(clause, "1=1");
    }
}
