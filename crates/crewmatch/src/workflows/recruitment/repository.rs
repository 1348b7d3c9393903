use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{
    Application, ApplicationStatus, Project, ProjectId, ProjectMember, UserId,
};

/// A project together with its current members and applications, fetched as
/// one consistent read immediately before a decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectRecord {
    pub project: Project,
    pub members: Vec<ProjectMember>,
    pub applications: Vec<Application>,
}

/// Storage abstraction so the matching engine can be exercised in isolation.
///
/// Implementations MUST enforce the (user, project) uniqueness of
/// applications and memberships at the storage layer: `insert_application`
/// and `insert_member` return [`RepositoryError::Conflict`] on a duplicate
/// pair. A check-then-insert in the service alone would race under
/// concurrent applies for the same pair.
pub trait RecruitmentRepository: Send + Sync {
    fn insert_project(&self, project: Project) -> Result<Project, RepositoryError>;
    fn update_project(&self, project: Project) -> Result<Project, RepositoryError>;
    fn delete_project(&self, id: &ProjectId) -> Result<(), RepositoryError>;
    fn project(&self, id: &ProjectId) -> Result<Option<ProjectRecord>, RepositoryError>;
    fn projects(&self) -> Result<Vec<ProjectRecord>, RepositoryError>;
    fn projects_owned_by(&self, owner: &UserId) -> Result<Vec<ProjectRecord>, RepositoryError>;
    fn projects_with_member(&self, user: &UserId) -> Result<Vec<ProjectRecord>, RepositoryError>;
    /// Refresh the persisted `is_open` cache. Never consulted for
    /// correctness-sensitive gates; see the window module.
    fn set_project_open(&self, id: &ProjectId, open: bool) -> Result<(), RepositoryError>;

    fn application(
        &self,
        user: &UserId,
        project: &ProjectId,
    ) -> Result<Option<Application>, RepositoryError>;
    fn applications_by_user(&self, user: &UserId) -> Result<Vec<Application>, RepositoryError>;
    fn insert_application(&self, application: Application) -> Result<Application, RepositoryError>;
    fn update_application_status(
        &self,
        user: &UserId,
        project: &ProjectId,
        status: ApplicationStatus,
        updated_at: DateTime<Utc>,
    ) -> Result<Application, RepositoryError>;
    fn delete_application(&self, user: &UserId, project: &ProjectId)
        -> Result<(), RepositoryError>;

    fn member(
        &self,
        user: &UserId,
        project: &ProjectId,
    ) -> Result<Option<ProjectMember>, RepositoryError>;
    fn insert_member(&self, member: ProjectMember) -> Result<ProjectMember, RepositoryError>;
}

/// Error enumeration for repository failures. `Unavailable` is the only
/// unexpected kind; the rest are ordinary outcomes of uniqueness and lookup
/// invariants.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
