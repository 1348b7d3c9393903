use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::capacity;
use super::dashboard::DashboardAggregator;
use super::domain::{
    ApplicantSnapshot, Application, ApplicationStatus, Difficulty, Position, PositionLimits,
    Proficiency, ProficiencyRange, Project, ProjectId, ProjectMember, UserId, ValidationError,
};
use super::eligibility::{self, EligibilityContext, EligibilityReport};
use super::repository::{ProjectRecord, RecruitmentRepository, RepositoryError};
use super::window;

/// Caller-supplied fields for a new project. Identity, ownership, the
/// `is_open` cache, and timestamps are assigned by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectDraft {
    pub name: String,
    pub description: String,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub repo_url: Option<String>,
    #[serde(default)]
    pub recruitment_start: Option<DateTime<Utc>>,
    #[serde(default)]
    pub recruitment_end: Option<DateTime<Utc>>,
    pub project_start: DateTime<Utc>,
    pub project_end: DateTime<Utc>,
    #[serde(default)]
    pub limits: PositionLimits,
    #[serde(default)]
    pub min_proficiency: Option<Proficiency>,
    #[serde(default)]
    pub max_proficiency: Option<Proficiency>,
}

/// Partial update applied by the project owner. `None` leaves a field
/// untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectChanges {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
    #[serde(default)]
    pub repo_url: Option<String>,
    #[serde(default)]
    pub recruitment_start: Option<DateTime<Utc>>,
    #[serde(default)]
    pub recruitment_end: Option<DateTime<Utc>>,
    #[serde(default)]
    pub project_start: Option<DateTime<Utc>>,
    #[serde(default)]
    pub project_end: Option<DateTime<Utc>>,
    #[serde(default)]
    pub limits: Option<PositionLimits>,
    #[serde(default)]
    pub proficiency: Option<ProficiencyRange>,
}

static PROJECT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_project_id() -> ProjectId {
    let id = PROJECT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ProjectId(format!("proj-{id:06}"))
}

/// Service composing the eligibility evaluator, the capacity accountant, and
/// the repository into the application lifecycle. All operations fetch state
/// immediately before deciding; nothing is cached across calls.
pub struct ProjectService<R> {
    repository: Arc<R>,
    aggregator: DashboardAggregator<R>,
}

impl<R> ProjectService<R>
where
    R: RecruitmentRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        let aggregator = DashboardAggregator::new(repository.clone());
        Self {
            repository,
            aggregator,
        }
    }

    /// Read-side composition of owned/member/application views.
    pub fn dashboard(&self) -> &DashboardAggregator<R> {
        &self.aggregator
    }

    pub fn create_project(
        &self,
        owner: UserId,
        draft: ProjectDraft,
        now: DateTime<Utc>,
    ) -> Result<Project, ProjectServiceError> {
        let proficiency = ProficiencyRange::new(draft.min_proficiency, draft.max_proficiency);
        validate_schedule(draft.project_start, draft.project_end)?;
        validate_proficiency(proficiency)?;

        let mut project = Project {
            id: next_project_id(),
            owner_id: owner,
            name: draft.name,
            description: draft.description,
            difficulty: draft.difficulty,
            repo_url: draft.repo_url,
            recruitment_start: draft.recruitment_start,
            recruitment_end: draft.recruitment_end,
            project_start: draft.project_start,
            project_end: draft.project_end,
            limits: draft.limits,
            proficiency,
            is_open: false,
            created_at: now,
            updated_at: now,
        };
        project.is_open = window::is_open(&project, now);

        let stored = self.repository.insert_project(project)?;
        info!(project = %stored.id.0, owner = %stored.owner_id.0, "project created");
        Ok(stored)
    }

    pub fn update_project(
        &self,
        actor: &UserId,
        project_id: &ProjectId,
        changes: ProjectChanges,
        now: DateTime<Utc>,
    ) -> Result<Project, ProjectServiceError> {
        let record = self.fetch_project(project_id)?;
        let mut project = record.project;

        if project.owner_id != *actor {
            return Err(ProjectServiceError::NotProjectOwner);
        }

        if let Some(name) = changes.name {
            project.name = name;
        }
        if let Some(description) = changes.description {
            project.description = description;
        }
        if let Some(difficulty) = changes.difficulty {
            project.difficulty = difficulty;
        }
        if let Some(repo_url) = changes.repo_url {
            project.repo_url = Some(repo_url);
        }
        if let Some(start) = changes.recruitment_start {
            project.recruitment_start = Some(start);
        }
        if let Some(end) = changes.recruitment_end {
            project.recruitment_end = Some(end);
        }
        if let Some(start) = changes.project_start {
            project.project_start = start;
        }
        if let Some(end) = changes.project_end {
            project.project_end = end;
        }
        if let Some(limits) = changes.limits {
            project.limits = limits;
        }
        if let Some(proficiency) = changes.proficiency {
            project.proficiency = proficiency;
        }

        validate_schedule(project.project_start, project.project_end)?;
        validate_proficiency(project.proficiency)?;

        project.is_open = window::is_open(&project, now);
        project.updated_at = now;

        Ok(self.repository.update_project(project)?)
    }

    pub fn delete_project(
        &self,
        actor: &UserId,
        project_id: &ProjectId,
    ) -> Result<(), ProjectServiceError> {
        let record = self.fetch_project(project_id)?;
        if record.project.owner_id != *actor {
            return Err(ProjectServiceError::NotProjectOwner);
        }
        Ok(self.repository.delete_project(project_id)?)
    }

    pub fn get_project(&self, project_id: &ProjectId) -> Result<ProjectRecord, ProjectServiceError> {
        self.fetch_project(project_id)
    }

    pub fn list_projects(&self) -> Result<Vec<ProjectRecord>, ProjectServiceError> {
        Ok(self.repository.projects()?)
    }

    /// Full-reason verdict without creating an application. The persisted
    /// `is_open` flag plays no part; the window is recomputed from `now`.
    pub fn check_eligibility(
        &self,
        applicant: &ApplicantSnapshot,
        project_id: &ProjectId,
        requested: &[Position],
        now: DateTime<Utc>,
    ) -> Result<EligibilityReport, ProjectServiceError> {
        let record = self.fetch_project(project_id)?;
        let existing_application = self.repository.application(&applicant.id, project_id)?;
        let existing_membership = self.repository.member(&applicant.id, project_id)?;

        Ok(eligibility::evaluate(&EligibilityContext {
            applicant,
            project: &record.project,
            requested,
            members: &record.members,
            existing_application: existing_application.as_ref(),
            existing_membership: existing_membership.as_ref(),
            now,
        }))
    }

    /// Create a PENDING application, guarded by a fresh eligibility verdict.
    /// The repository's uniqueness constraint backstops the duplicate checks
    /// against concurrent applies for the same (user, project) pair.
    pub fn apply(
        &self,
        applicant: &ApplicantSnapshot,
        project_id: &ProjectId,
        requested: Vec<Position>,
        cover_letter: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<Application, ProjectServiceError> {
        if requested.is_empty() {
            return Err(ValidationError::NoPositionsRequested.into());
        }

        let report = self.check_eligibility(applicant, project_id, &requested, now)?;
        if !report.eligible {
            return Err(ProjectServiceError::Ineligible(report));
        }

        let application = self.repository.insert_application(Application {
            user_id: applicant.id.clone(),
            project_id: project_id.clone(),
            applied_position: requested,
            status: ApplicationStatus::Pending,
            cover_letter,
            created_at: now,
            updated_at: now,
        })?;

        info!(
            user = %application.user_id.0,
            project = %application.project_id.0,
            "application submitted"
        );
        Ok(application)
    }

    /// Owner-only: PENDING -> ACCEPTED, promoting the applicant to member.
    /// Capacity is re-validated against current members at acceptance time;
    /// a position that filled since apply rejects the write. Re-accepting an
    /// already-accepted application is idempotent on the membership side.
    pub fn accept(
        &self,
        actor: &UserId,
        applicant: &UserId,
        project_id: &ProjectId,
        now: DateTime<Utc>,
    ) -> Result<Application, ProjectServiceError> {
        let record = self.fetch_project(project_id)?;
        if record.project.owner_id != *actor {
            return Err(ProjectServiceError::NotProjectOwner);
        }

        let application = self
            .repository
            .application(applicant, project_id)?
            .ok_or(ProjectServiceError::ApplicationNotFound)?;

        match application.status {
            ApplicationStatus::Pending => {
                for position in &application.applied_position {
                    if !capacity::has_room(&record.project, *position, &record.members) {
                        return Err(ProjectServiceError::CapacityExhausted(*position));
                    }
                }

                let updated = self.repository.update_application_status(
                    applicant,
                    project_id,
                    ApplicationStatus::Accepted,
                    now,
                )?;
                self.ensure_member(&updated, now)?;
                info!(
                    user = %updated.user_id.0,
                    project = %updated.project_id.0,
                    "application accepted"
                );
                Ok(updated)
            }
            // Already accepted: make sure the membership exists, never a
            // second one.
            ApplicationStatus::Accepted => {
                self.ensure_member(&application, now)?;
                Ok(application)
            }
            ApplicationStatus::Rejected => Err(ProjectServiceError::InvalidState {
                action: "accept",
                status: application.status,
            }),
        }
    }

    /// Owner-only: PENDING -> REJECTED. No side effect beyond the status.
    pub fn reject(
        &self,
        actor: &UserId,
        applicant: &UserId,
        project_id: &ProjectId,
        now: DateTime<Utc>,
    ) -> Result<Application, ProjectServiceError> {
        let record = self.fetch_project(project_id)?;
        if record.project.owner_id != *actor {
            return Err(ProjectServiceError::NotProjectOwner);
        }

        let application = self
            .repository
            .application(applicant, project_id)?
            .ok_or(ProjectServiceError::ApplicationNotFound)?;

        if application.status != ApplicationStatus::Pending {
            return Err(ProjectServiceError::InvalidState {
                action: "reject",
                status: application.status,
            });
        }

        let updated = self.repository.update_application_status(
            applicant,
            project_id,
            ApplicationStatus::Rejected,
            now,
        )?;
        info!(
            user = %updated.user_id.0,
            project = %updated.project_id.0,
            "application rejected"
        );
        Ok(updated)
    }

    /// Applicant-only: delete a PENDING application, leaving no trace.
    pub fn withdraw(
        &self,
        actor: &UserId,
        applicant: &UserId,
        project_id: &ProjectId,
    ) -> Result<(), ProjectServiceError> {
        if actor != applicant {
            return Err(ProjectServiceError::NotApplicant);
        }

        let application = self
            .repository
            .application(applicant, project_id)?
            .ok_or(ProjectServiceError::ApplicationNotFound)?;

        if application.status != ApplicationStatus::Pending {
            return Err(ProjectServiceError::InvalidState {
                action: "withdraw",
                status: application.status,
            });
        }

        self.repository.delete_application(applicant, project_id)?;
        info!(
            user = %applicant.0,
            project = %project_id.0,
            "application withdrawn"
        );
        Ok(())
    }

    /// Recompute the recruitment window and persist the `is_open` cache when
    /// it changed. Returns the live verdict either way.
    pub fn refresh_open_flag(
        &self,
        project_id: &ProjectId,
        now: DateTime<Utc>,
    ) -> Result<bool, ProjectServiceError> {
        let record = self.fetch_project(project_id)?;
        let open = window::is_open(&record.project, now);
        if record.project.is_open != open {
            self.repository.set_project_open(project_id, open)?;
        }
        Ok(open)
    }

    fn fetch_project(&self, project_id: &ProjectId) -> Result<ProjectRecord, ProjectServiceError> {
        self.repository
            .project(project_id)?
            .ok_or(ProjectServiceError::ProjectNotFound)
    }

    fn ensure_member(
        &self,
        application: &Application,
        now: DateTime<Utc>,
    ) -> Result<(), ProjectServiceError> {
        if self
            .repository
            .member(&application.user_id, &application.project_id)?
            .is_some()
        {
            return Ok(());
        }

        let member = ProjectMember {
            user_id: application.user_id.clone(),
            project_id: application.project_id.clone(),
            role: application.applied_position.clone(),
            joined_at: now,
        };
        match self.repository.insert_member(member) {
            Ok(_) => Ok(()),
            // Lost a race to a concurrent accept; the membership is present.
            Err(RepositoryError::Conflict) => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

fn validate_schedule(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<(), ProjectServiceError> {
    if end <= start {
        return Err(ValidationError::ScheduleInverted.into());
    }
    Ok(())
}

fn validate_proficiency(range: ProficiencyRange) -> Result<(), ProjectServiceError> {
    if range.is_inverted() {
        return Err(ValidationError::ProficiencyBoundsInverted.into());
    }
    Ok(())
}

/// Error raised by the lifecycle service. Every variant except
/// `Repository(Unavailable)` is an expected business outcome.
#[derive(Debug, thiserror::Error)]
pub enum ProjectServiceError {
    #[error("project not found")]
    ProjectNotFound,
    #[error("application not found")]
    ApplicationNotFound,
    #[error("only the project owner may perform this operation")]
    NotProjectOwner,
    #[error("only the applicant may withdraw an application")]
    NotApplicant,
    #[error("application is not eligible: {0}")]
    Ineligible(EligibilityReport),
    #[error("cannot {} an application in the {} state", .action, .status.label())]
    InvalidState {
        action: &'static str,
        status: ApplicationStatus,
    },
    #[error("{} has no remaining capacity", .0.label())]
    CapacityExhausted(Position),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
