use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, TimeZone, Utc};

use crate::workflows::recruitment::domain::{
    ApplicantSnapshot, Application, ApplicationStatus, Difficulty, Position, PositionLimits,
    Proficiency, ProficiencyRange, Project, ProjectId, ProjectMember, UserId,
};
use crate::workflows::recruitment::repository::{
    ProjectRecord, RecruitmentRepository, RepositoryError,
};
use crate::workflows::recruitment::service::ProjectService;

pub(super) fn instant(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, 0, 0)
        .single()
        .expect("valid instant")
}

/// Fixed evaluation instant inside the sample project's recruitment window.
pub(super) fn now() -> DateTime<Utc> {
    instant(2026, 3, 1, 12)
}

pub(super) fn owner() -> UserId {
    UserId("user-owner".to_string())
}

/// Project open for applications at `now()`: recruitment 2026-02-01 to
/// 2026-03-15, kickoff 2026-04-01, one backend slot, BRONZE..=GOLD.
pub(super) fn sample_project(id: &str) -> Project {
    Project {
        id: ProjectId(id.to_string()),
        owner_id: owner(),
        name: "Realtime chat platform".to_string(),
        description: "Team up to ship a realtime chat service".to_string(),
        difficulty: Difficulty::Normal,
        repo_url: None,
        recruitment_start: Some(instant(2026, 2, 1, 0)),
        recruitment_end: Some(instant(2026, 3, 15, 0)),
        project_start: instant(2026, 4, 1, 0),
        project_end: instant(2026, 10, 1, 0),
        limits: PositionLimits {
            backend: 1,
            frontend: 2,
            ..PositionLimits::default()
        },
        proficiency: ProficiencyRange::new(Some(Proficiency::Bronze), Some(Proficiency::Gold)),
        is_open: true,
        created_at: instant(2026, 1, 15, 9),
        updated_at: instant(2026, 1, 15, 9),
    }
}

pub(super) fn applicant(id: &str, proficiency: Proficiency) -> ApplicantSnapshot {
    ApplicantSnapshot {
        id: UserId(id.to_string()),
        positions: vec![Position::Backend],
        proficiency,
    }
}

pub(super) fn member_of(user: &str, project_id: &str, role: Vec<Position>) -> ProjectMember {
    ProjectMember {
        user_id: UserId(user.to_string()),
        project_id: ProjectId(project_id.to_string()),
        role,
        joined_at: instant(2026, 2, 20, 10),
    }
}

pub(super) fn build_service() -> (ProjectService<MemoryRepository>, Arc<MemoryRepository>) {
    let repository = Arc::new(MemoryRepository::default());
    let service = ProjectService::new(repository.clone());
    (service, repository)
}

pub(super) fn seed_project(repository: &MemoryRepository, project: Project) {
    repository.insert_project(project).expect("seed project");
}

#[derive(Default)]
struct Inner {
    projects: HashMap<ProjectId, Project>,
    applications: HashMap<(UserId, ProjectId), Application>,
    members: HashMap<(UserId, ProjectId), ProjectMember>,
}

impl Inner {
    fn record_for(&self, project: Project) -> ProjectRecord {
        let members = self
            .members
            .values()
            .filter(|member| member.project_id == project.id)
            .cloned()
            .collect();
        let applications = self
            .applications
            .values()
            .filter(|application| application.project_id == project.id)
            .cloned()
            .collect();
        ProjectRecord {
            project,
            members,
            applications,
        }
    }
}

/// In-memory double enforcing the same (user, project) uniqueness the real
/// storage layer must provide.
#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    inner: Arc<Mutex<Inner>>,
}

impl RecruitmentRepository for MemoryRepository {
    fn insert_project(&self, project: Project) -> Result<Project, RepositoryError> {
        let mut guard = self.inner.lock().expect("repository mutex poisoned");
        if guard.projects.contains_key(&project.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.projects.insert(project.id.clone(), project.clone());
        Ok(project)
    }

    fn update_project(&self, project: Project) -> Result<Project, RepositoryError> {
        let mut guard = self.inner.lock().expect("repository mutex poisoned");
        if !guard.projects.contains_key(&project.id) {
            return Err(RepositoryError::NotFound);
        }
        guard.projects.insert(project.id.clone(), project.clone());
        Ok(project)
    }

    fn delete_project(&self, id: &ProjectId) -> Result<(), RepositoryError> {
        let mut guard = self.inner.lock().expect("repository mutex poisoned");
        if guard.projects.remove(id).is_none() {
            return Err(RepositoryError::NotFound);
        }
        guard
            .applications
            .retain(|(_, project_id), _| project_id != id);
        guard.members.retain(|(_, project_id), _| project_id != id);
        Ok(())
    }

    fn project(&self, id: &ProjectId) -> Result<Option<ProjectRecord>, RepositoryError> {
        let guard = self.inner.lock().expect("repository mutex poisoned");
        Ok(guard
            .projects
            .get(id)
            .cloned()
            .map(|project| guard.record_for(project)))
    }

    fn projects(&self) -> Result<Vec<ProjectRecord>, RepositoryError> {
        let guard = self.inner.lock().expect("repository mutex poisoned");
        Ok(guard
            .projects
            .values()
            .cloned()
            .map(|project| guard.record_for(project))
            .collect())
    }

    fn projects_owned_by(&self, owner: &UserId) -> Result<Vec<ProjectRecord>, RepositoryError> {
        let guard = self.inner.lock().expect("repository mutex poisoned");
        Ok(guard
            .projects
            .values()
            .filter(|project| project.owner_id == *owner)
            .cloned()
            .map(|project| guard.record_for(project))
            .collect())
    }

    fn projects_with_member(&self, user: &UserId) -> Result<Vec<ProjectRecord>, RepositoryError> {
        let guard = self.inner.lock().expect("repository mutex poisoned");
        Ok(guard
            .projects
            .values()
            .filter(|project| {
                guard
                    .members
                    .contains_key(&(user.clone(), project.id.clone()))
            })
            .cloned()
            .map(|project| guard.record_for(project))
            .collect())
    }

    fn set_project_open(&self, id: &ProjectId, open: bool) -> Result<(), RepositoryError> {
        let mut guard = self.inner.lock().expect("repository mutex poisoned");
        let project = guard.projects.get_mut(id).ok_or(RepositoryError::NotFound)?;
        project.is_open = open;
        Ok(())
    }

    fn application(
        &self,
        user: &UserId,
        project: &ProjectId,
    ) -> Result<Option<Application>, RepositoryError> {
        let guard = self.inner.lock().expect("repository mutex poisoned");
        Ok(guard
            .applications
            .get(&(user.clone(), project.clone()))
            .cloned())
    }

    fn applications_by_user(&self, user: &UserId) -> Result<Vec<Application>, RepositoryError> {
        let guard = self.inner.lock().expect("repository mutex poisoned");
        Ok(guard
            .applications
            .values()
            .filter(|application| application.user_id == *user)
            .cloned()
            .collect())
    }

    fn insert_application(&self, application: Application) -> Result<Application, RepositoryError> {
        let mut guard = self.inner.lock().expect("repository mutex poisoned");
        let key = (application.user_id.clone(), application.project_id.clone());
        if guard.applications.contains_key(&key) {
            return Err(RepositoryError::Conflict);
        }
        guard.applications.insert(key, application.clone());
        Ok(application)
    }

    fn update_application_status(
        &self,
        user: &UserId,
        project: &ProjectId,
        status: ApplicationStatus,
        updated_at: DateTime<Utc>,
    ) -> Result<Application, RepositoryError> {
        let mut guard = self.inner.lock().expect("repository mutex poisoned");
        let application = guard
            .applications
            .get_mut(&(user.clone(), project.clone()))
            .ok_or(RepositoryError::NotFound)?;
        application.status = status;
        application.updated_at = updated_at;
        Ok(application.clone())
    }

    fn delete_application(
        &self,
        user: &UserId,
        project: &ProjectId,
    ) -> Result<(), RepositoryError> {
        let mut guard = self.inner.lock().expect("repository mutex poisoned");
        guard
            .applications
            .remove(&(user.clone(), project.clone()))
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }

    fn member(
        &self,
        user: &UserId,
        project: &ProjectId,
    ) -> Result<Option<ProjectMember>, RepositoryError> {
        let guard = self.inner.lock().expect("repository mutex poisoned");
        Ok(guard.members.get(&(user.clone(), project.clone())).cloned())
    }

    fn insert_member(&self, member: ProjectMember) -> Result<ProjectMember, RepositoryError> {
        let mut guard = self.inner.lock().expect("repository mutex poisoned");
        let key = (member.user_id.clone(), member.project_id.clone());
        if guard.members.contains_key(&key) {
            return Err(RepositoryError::Conflict);
        }
        guard.members.insert(key, member.clone());
        Ok(member)
    }
}

impl MemoryRepository {
    pub(super) fn member_count(&self, project: &ProjectId) -> usize {
        let guard = self.inner.lock().expect("repository mutex poisoned");
        guard
            .members
            .values()
            .filter(|member| member.project_id == *project)
            .count()
    }
}
