//! Case Lifecycle Service
//!
//! Orchestrates the date validator, the status transition engine and the
//! scoring engine around create/update/delete, and triggers the post-commit
//! notification fan-out on creation.

use super::{EventPublisher, ServiceConfig, ServiceContext, ServiceEvent};
use crate::scoring::{ScoreReport, ScoringEngine};
use crate::validation::{self, CreateCaseRequest, Validatable};
use crate::{ApplicationError, ApplicationResult};
use async_trait::async_trait;
use caseflow_common::datetime::now_utc;
use caseflow_common::pagination::{DateRange, PaginatedResult, PaginationParams, SortParams};
use caseflow_domain::case::{Case, CaseKind, CaseStatus};
use caseflow_domain::collaboration::{CaseComment, CaseWorklog};
use caseflow_domain::errors::{CaseError, ReferenceError};
use caseflow_domain::identifiers::{CaseId, EmployeeId, PartnerId};
use caseflow_domain::patch::CasePatch;
use caseflow_domain::{dates, transitions};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// An employee as resolved by the personnel directory.
#[derive(Debug, Clone)]
pub struct EmployeeRef {
    pub id: EmployeeId,
    pub display_name: String,
    pub email: Option<String>,
    pub is_admin: bool,
}

/// A partner as resolved by the partner registry.
#[derive(Debug, Clone)]
pub struct PartnerRef {
    pub id: PartnerId,
    pub name: String,
}

/// Filters for case list queries.
#[derive(Debug, Clone, Default)]
pub struct CaseQueryFilters {
    pub kind: Option<CaseKind>,
    pub status: Option<CaseStatus>,
    pub handler: Option<EmployeeId>,
    pub requester: Option<EmployeeId>,
    pub start_date: DateRange,
}

/// A case together with its derived scores.
///
/// Scores are computed on every read and never stored.
#[derive(Debug, Clone)]
pub struct CaseView {
    pub case: Case,
    pub scores: ScoreReport,
}

/// The collaboration children of a case: its comments and worklogs.
#[derive(Debug, Clone, Default)]
pub struct CaseCollaboration {
    pub comments: Vec<CaseComment>,
    pub worklogs: Vec<CaseWorklog>,
}

/// Case repository trait
#[async_trait]
pub trait CaseRepositoryPort: Send + Sync {
    async fn insert(&self, case: &Case) -> Result<(), ApplicationError>;
    async fn get_by_id(&self, id: CaseId) -> Result<Option<Case>, ApplicationError>;
    async fn list(
        &self,
        filters: &CaseQueryFilters,
        pagination: &PaginationParams,
        sort: &SortParams,
    ) -> Result<Vec<Case>, ApplicationError>;
    async fn count(&self, filters: &CaseQueryFilters) -> Result<u64, ApplicationError>;
    async fn update(&self, case: &Case) -> Result<(), ApplicationError>;
    /// Deletes the case and its comments/worklogs in one transaction.
    async fn delete(&self, id: CaseId) -> Result<(), ApplicationError>;
    async fn list_comments(&self, case_id: CaseId) -> Result<Vec<CaseComment>, ApplicationError>;
    async fn list_worklogs(&self, case_id: CaseId) -> Result<Vec<CaseWorklog>, ApplicationError>;
}

/// Personnel directory trait
#[async_trait]
pub trait PersonnelPort: Send + Sync {
    async fn resolve_employee(&self, id: EmployeeId)
        -> Result<Option<EmployeeRef>, ApplicationError>;
    async fn list_active_admins(&self) -> Result<Vec<EmployeeRef>, ApplicationError>;
}

/// Partner registry trait
#[async_trait]
pub trait PartnerPort: Send + Sync {
    async fn resolve_partner(&self, id: PartnerId)
        -> Result<Option<PartnerRef>, ApplicationError>;
}

/// Case lifecycle service implementation
pub struct CaseLifecycleService<R, P, N, E>
where
    R: CaseRepositoryPort,
    P: PersonnelPort,
    N: PartnerPort,
    E: EventPublisher,
{
    repository: Arc<R>,
    personnel: Arc<P>,
    partners: Arc<N>,
    events: Arc<E>,
    scoring: ScoringEngine,
    config: ServiceConfig,
}

impl<R, P, N, E> CaseLifecycleService<R, P, N, E>
where
    R: CaseRepositoryPort,
    P: PersonnelPort,
    N: PartnerPort,
    E: EventPublisher,
{
    pub fn new(
        repository: Arc<R>,
        personnel: Arc<P>,
        partners: Arc<N>,
        events: Arc<E>,
        scoring: ScoringEngine,
        config: ServiceConfig,
    ) -> Self {
        Self {
            repository,
            personnel,
            partners,
            events,
            scoring,
            config,
        }
    }

    /// Create a new case.
    ///
    /// The case always starts as `Received`; any sub-scores supplied up front
    /// get their assessment timestamp stamped in the same operation.
    #[instrument(skip(self, ctx, request), fields(correlation_id = %ctx.correlation_id))]
    pub async fn create(
        &self,
        ctx: &ServiceContext,
        request: CreateCaseRequest,
    ) -> ApplicationResult<CaseView> {
        request.validate_all().ensure_valid()?;
        ctx.require_authenticated()?;

        let requester = self.resolve_employee(request.requester).await?;
        self.resolve_employee(request.handler).await?;
        if let Some(counterparty) = &request.counterparty {
            self.resolve_partner(counterparty.partner_id).await?;
        }

        // End dates only ever arrive through updates, so only the start and
        // in-progress stamps participate here.
        dates::validate(request.start_date, None, request.in_progress_at)?;

        let now = now_utc();
        let mut user_assessment = Default::default();
        if request.user_assessment.apply(&mut user_assessment) {
            user_assessment.assessed_at = Some(now);
        }

        let case = Case {
            id: CaseId::new(),
            kind: request.kind,
            title: request.title,
            description: request.description,
            requester: request.requester,
            handler: request.handler,
            counterparty: request.counterparty,
            status: CaseStatus::Received,
            start_date: request.start_date,
            in_progress_at: request.in_progress_at,
            end_date: None,
            notes: request.notes,
            crm_reference_code: request.crm_reference_code,
            user_assessment,
            admin_assessment: Default::default(),
            revision: 0,
            created_at: now,
            updated_at: now,
        };

        self.repository.insert(&case).await?;

        info!(case_id = %case.id, kind = ?case.kind, "Case created");

        // Post-commit fan-out; a publish failure never fails the creation.
        self.publish_best_effort(ServiceEvent::CaseCreated {
            case_id: case.id,
            kind: case.kind,
            title: case.title.clone(),
            requester_name: requester.display_name,
        })
        .await;

        Ok(self.view(case))
    }

    /// Get a case by ID, with its scores recomputed.
    #[instrument(skip(self, ctx), fields(correlation_id = %ctx.correlation_id))]
    pub async fn get_by_id(
        &self,
        ctx: &ServiceContext,
        id: CaseId,
    ) -> ApplicationResult<Option<CaseView>> {
        let case = self.repository.get_by_id(id).await?;
        Ok(case.map(|c| self.view(c)))
    }

    /// List cases with filters.
    #[instrument(skip(self, ctx, filters), fields(correlation_id = %ctx.correlation_id))]
    pub async fn list(
        &self,
        ctx: &ServiceContext,
        filters: CaseQueryFilters,
        pagination: PaginationParams,
        sort: SortParams,
    ) -> ApplicationResult<PaginatedResult<CaseView>> {
        let pagination = PaginationParams::new(
            pagination.page,
            pagination.per_page.min(self.config.max_page_size),
        );

        let total = self.repository.count(&filters).await?;
        let items = self.repository.list(&filters, &pagination, &sort).await?;
        let items = items.into_iter().map(|c| self.view(c)).collect();

        Ok(PaginatedResult::from_params(items, &pagination, total))
    }

    /// Apply a partial update to a case.
    ///
    /// A rejected date combination aborts before any write: the stored record
    /// stays untouched, including `updated_at`.
    #[instrument(skip(self, ctx, patch), fields(correlation_id = %ctx.correlation_id, case_id = %id))]
    pub async fn update(
        &self,
        ctx: &ServiceContext,
        id: CaseId,
        patch: CasePatch,
    ) -> ApplicationResult<CaseView> {
        patch.validate_all().ensure_valid()?;
        ctx.require_authenticated()?;
        if !patch.admin_assessment.is_empty() {
            ctx.require_admin()?;
        }

        let existing = self
            .repository
            .get_by_id(id)
            .await?
            .ok_or_else(|| ApplicationError::from(CaseError::NotFound(id)))?;

        if let Some(expected) = patch.expected_revision {
            if expected != existing.revision {
                return Err(CaseError::RevisionConflict {
                    expected,
                    actual: existing.revision,
                }
                .into());
            }
        }

        let mut candidate = existing.clone();

        if let Some(title) = &patch.title {
            candidate.title = title.clone();
        }
        if let Some(description) = &patch.description {
            candidate.description = description.clone();
        }
        if let Some(handler) = patch.handler {
            if handler != existing.handler {
                self.resolve_employee(handler).await?;
            }
            candidate.handler = handler;
        }
        if let Some(counterparty) = patch.counterparty.as_set() {
            validation::validate_counterparty(candidate.kind, Some(counterparty)).ensure_valid()?;
            self.resolve_partner(counterparty.partner_id).await?;
        }
        candidate.counterparty = patch.counterparty.apply(candidate.counterparty);
        if let Some(start_date) = patch.start_date {
            candidate.start_date = start_date;
        }
        candidate.in_progress_at = patch.in_progress_at.apply(candidate.in_progress_at);
        candidate.end_date = patch.end_date.apply(candidate.end_date);
        candidate.notes = patch.notes.apply(candidate.notes);
        candidate.crm_reference_code = patch
            .crm_reference_code
            .apply(candidate.crm_reference_code);

        dates::validate(
            candidate.start_date,
            candidate.end_date,
            candidate.in_progress_at,
        )?;

        let resolution =
            transitions::resolve(existing.status, patch.status, patch.end_date.is_set());
        if resolution.auto_promoted {
            info!(case_id = %id, "End date set, promoting case to completed");
        }
        candidate.status = resolution.status;

        let now = now_utc();
        if patch.user_assessment.apply(&mut candidate.user_assessment) {
            candidate.user_assessment.assessed_at = Some(now);
        }
        if patch.admin_assessment.apply(&mut candidate.admin_assessment) {
            candidate.admin_assessment.assessed_at = Some(now);
        }

        candidate.revision = existing.revision + 1;
        candidate.updated_at = now;

        self.repository.update(&candidate).await?;

        info!(case_id = %id, revision = candidate.revision, "Case updated");

        self.publish_best_effort(ServiceEvent::CaseUpdated { case_id: id })
            .await;
        if candidate.status != existing.status {
            self.publish_best_effort(ServiceEvent::CaseStatusChanged {
                case_id: id,
                from: existing.status,
                to: candidate.status,
            })
            .await;
        }

        Ok(self.view(candidate))
    }

    /// Hard-delete a case and its comments/worklogs.
    #[instrument(skip(self, ctx), fields(correlation_id = %ctx.correlation_id, case_id = %id))]
    pub async fn delete(&self, ctx: &ServiceContext, id: CaseId) -> ApplicationResult<()> {
        ctx.require_authenticated()?;

        self.repository
            .get_by_id(id)
            .await?
            .ok_or_else(|| ApplicationError::from(CaseError::NotFound(id)))?;

        self.repository.delete(id).await?;

        info!(case_id = %id, "Case deleted");

        self.publish_best_effort(ServiceEvent::CaseDeleted { case_id: id })
            .await;

        Ok(())
    }

    /// Fetch the comments and worklogs attached to a case.
    #[instrument(skip(self, ctx), fields(correlation_id = %ctx.correlation_id, case_id = %id))]
    pub async fn collaboration(
        &self,
        ctx: &ServiceContext,
        id: CaseId,
    ) -> ApplicationResult<CaseCollaboration> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or_else(|| ApplicationError::from(CaseError::NotFound(id)))?;

        let comments = self.repository.list_comments(id).await?;
        let worklogs = self.repository.list_worklogs(id).await?;

        Ok(CaseCollaboration { comments, worklogs })
    }

    fn view(&self, case: Case) -> CaseView {
        let scores = self.scoring.score(&case);
        CaseView { case, scores }
    }

    async fn resolve_employee(&self, id: EmployeeId) -> ApplicationResult<EmployeeRef> {
        self.personnel
            .resolve_employee(id)
            .await?
            .ok_or_else(|| ReferenceError::EmployeeNotFound(id).into())
    }

    async fn resolve_partner(&self, id: PartnerId) -> ApplicationResult<PartnerRef> {
        self.partners
            .resolve_partner(id)
            .await?
            .ok_or_else(|| ReferenceError::PartnerNotFound(id).into())
    }

    async fn publish_best_effort(&self, event: ServiceEvent) {
        if let Err(error) = self.events.publish(event).await {
            warn!(error = %error, "Event publish failed, continuing");
        }
    }
}
