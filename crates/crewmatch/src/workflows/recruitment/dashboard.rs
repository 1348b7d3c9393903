//! Read-side composition of projects, memberships, and applications into
//! per-user views. No eligibility or capacity logic lives here; the views
//! reflect the persisted state with no additional filtering.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::domain::{Application, Position, PositionLimits, ProjectId, UserId};
use super::repository::{ProjectRecord, RecruitmentRepository, RepositoryError};

/// Flat project summary used in listings and as application enrichment.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectSummaryView {
    pub id: ProjectId,
    pub owner_id: UserId,
    pub name: String,
    pub description: String,
    pub difficulty: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repo_url: Option<String>,
    pub is_open: bool,
    pub recruitment_start: Option<DateTime<Utc>>,
    pub recruitment_end: Option<DateTime<Utc>>,
    pub project_start: DateTime<Utc>,
    pub project_end: DateTime<Utc>,
    pub limits: PositionLimits,
    pub min_proficiency: Option<&'static str>,
    pub max_proficiency: Option<&'static str>,
    pub member_count: usize,
    pub application_count: usize,
}

/// Owner-facing detail view with nested member and application lists.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectDetailView {
    #[serde(flatten)]
    pub summary: ProjectSummaryView,
    pub members: Vec<MemberView>,
    pub applications: Vec<ApplicationView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MemberView {
    pub user_id: UserId,
    pub role: Vec<Position>,
    pub joined_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ApplicationView {
    pub user_id: UserId,
    pub project_id: ProjectId,
    pub applied_position: Vec<Position>,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_letter: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<ProjectSummaryView>,
}

impl ApplicationView {
    fn new(application: Application, project: Option<ProjectSummaryView>) -> Self {
        Self {
            user_id: application.user_id,
            project_id: application.project_id,
            applied_position: application.applied_position,
            status: application.status.label(),
            cover_letter: application.cover_letter,
            created_at: application.created_at,
            updated_at: application.updated_at,
            project,
        }
    }
}

impl ProjectRecord {
    pub fn summary_view(&self) -> ProjectSummaryView {
        ProjectSummaryView {
            id: self.project.id.clone(),
            owner_id: self.project.owner_id.clone(),
            name: self.project.name.clone(),
            description: self.project.description.clone(),
            difficulty: self.project.difficulty.label(),
            repo_url: self.project.repo_url.clone(),
            is_open: self.project.is_open,
            recruitment_start: self.project.recruitment_start,
            recruitment_end: self.project.recruitment_end,
            project_start: self.project.project_start,
            project_end: self.project.project_end,
            limits: self.project.limits,
            min_proficiency: self.project.proficiency.min.map(|tier| tier.label()),
            max_proficiency: self.project.proficiency.max.map(|tier| tier.label()),
            member_count: self.members.len(),
            application_count: self.applications.len(),
        }
    }

    pub fn detail_view(&self) -> ProjectDetailView {
        ProjectDetailView {
            summary: self.summary_view(),
            members: self
                .members
                .iter()
                .map(|member| MemberView {
                    user_id: member.user_id.clone(),
                    role: member.role.clone(),
                    joined_at: member.joined_at,
                })
                .collect(),
            applications: self
                .applications
                .iter()
                .map(|application| ApplicationView::new(application.clone(), None))
                .collect(),
        }
    }
}

/// Everything one user sees in one round trip.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub owned_projects: Vec<ProjectDetailView>,
    pub member_projects: Vec<ProjectSummaryView>,
    pub my_applications: Vec<ApplicationView>,
}

/// Owner-only slice of the dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct OwnerDashboardView {
    pub owned_projects: Vec<ProjectDetailView>,
}

/// Member/applicant slice of the dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct MemberDashboardView {
    pub member_projects: Vec<ProjectSummaryView>,
    pub my_applications: Vec<ApplicationView>,
}

/// Pure read-side join over the repository.
pub struct DashboardAggregator<R> {
    repository: Arc<R>,
}

impl<R> DashboardAggregator<R>
where
    R: RecruitmentRepository,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub fn aggregate(&self, user: &UserId) -> Result<DashboardView, RepositoryError> {
        Ok(DashboardView {
            owned_projects: self.owned_details(user)?,
            member_projects: self.member_summaries(user)?,
            my_applications: self.applications_with_projects(user)?,
        })
    }

    pub fn owner_view(&self, user: &UserId) -> Result<OwnerDashboardView, RepositoryError> {
        Ok(OwnerDashboardView {
            owned_projects: self.owned_details(user)?,
        })
    }

    pub fn member_view(&self, user: &UserId) -> Result<MemberDashboardView, RepositoryError> {
        Ok(MemberDashboardView {
            member_projects: self.member_summaries(user)?,
            my_applications: self.applications_with_projects(user)?,
        })
    }

    fn owned_details(&self, user: &UserId) -> Result<Vec<ProjectDetailView>, RepositoryError> {
        Ok(self
            .repository
            .projects_owned_by(user)?
            .iter()
            .map(ProjectRecord::detail_view)
            .collect())
    }

    fn member_summaries(&self, user: &UserId) -> Result<Vec<ProjectSummaryView>, RepositoryError> {
        Ok(self
            .repository
            .projects_with_member(user)?
            .iter()
            .map(ProjectRecord::summary_view)
            .collect())
    }

    /// Each application is enriched with its parent project's summary; a
    /// project deleted underneath an application leaves the summary off.
    fn applications_with_projects(
        &self,
        user: &UserId,
    ) -> Result<Vec<ApplicationView>, RepositoryError> {
        self.repository
            .applications_by_user(user)?
            .into_iter()
            .map(|application| {
                let project = self
                    .repository
                    .project(&application.project_id)?
                    .map(|record| record.summary_view());
                Ok(ApplicationView::new(application, project))
            })
            .collect()
    }
}
