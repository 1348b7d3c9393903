use chrono::{DateTime, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use crewmatch::workflows::recruitment::{
    Application, ApplicationStatus, Project, ProjectId, ProjectMember, ProjectRecord,
    RecruitmentRepository, RepositoryError, UserId,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default)]
struct Store {
    projects: HashMap<ProjectId, Project>,
    applications: HashMap<(UserId, ProjectId), Application>,
    members: HashMap<(UserId, ProjectId), ProjectMember>,
}

impl Store {
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

/// Reference repository backing the demo and the standalone server. The
/// single mutex serializes apply/accept decisions, and the keyed maps give
/// the (user, project) uniqueness the matching engine requires from its
/// storage layer.
#[derive(Default, Clone)]
pub(crate) struct InMemoryRecruitmentRepository {
    store: Arc<Mutex<Store>>,
}

impl RecruitmentRepository for InMemoryRecruitmentRepository {
    fn insert_project(&self, project: Project) -> Result<Project, RepositoryError> {
        let mut store = self.store.lock().expect("repository mutex poisoned");
        if store.projects.contains_key(&project.id) {
            return Err(RepositoryError::Conflict);
        }
        store.projects.insert(project.id.clone(), project.clone());
        Ok(project)
    }

    fn update_project(&self, project: Project) -> Result<Project, RepositoryError> {
        let mut store = self.store.lock().expect("repository mutex poisoned");
        if !store.projects.contains_key(&project.id) {
            return Err(RepositoryError::NotFound);
        }
        store.projects.insert(project.id.clone(), project.clone());
        Ok(project)
    }

    fn delete_project(&self, id: &ProjectId) -> Result<(), RepositoryError> {
        let mut store = self.store.lock().expect("repository mutex poisoned");
        if store.projects.remove(id).is_none() {
            return Err(RepositoryError::NotFound);
        }
        store
            .applications
            .retain(|(_, project_id), _| project_id != id);
        store.members.retain(|(_, project_id), _| project_id != id);
        Ok(())
    }

    fn project(&self, id: &ProjectId) -> Result<Option<ProjectRecord>, RepositoryError> {
        let store = self.store.lock().expect("repository mutex poisoned");
        Ok(store
            .projects
            .get(id)
            .cloned()
            .map(|project| store.record_for(project)))
    }

    fn projects(&self) -> Result<Vec<ProjectRecord>, RepositoryError> {
        let store = self.store.lock().expect("repository mutex poisoned");
        Ok(store
            .projects
            .values()
            .cloned()
            .map(|project| store.record_for(project))
            .collect())
    }

    fn projects_owned_by(&self, owner: &UserId) -> Result<Vec<ProjectRecord>, RepositoryError> {
        let store = self.store.lock().expect("repository mutex poisoned");
        Ok(store
            .projects
            .values()
            .filter(|project| project.owner_id == *owner)
            .cloned()
            .map(|project| store.record_for(project))
            .collect())
    }

    fn projects_with_member(&self, user: &UserId) -> Result<Vec<ProjectRecord>, RepositoryError> {
        let store = self.store.lock().expect("repository mutex poisoned");
        Ok(store
            .projects
            .values()
            .filter(|project| {
                store
                    .members
                    .contains_key(&(user.clone(), project.id.clone()))
            })
            .cloned()
            .map(|project| store.record_for(project))
            .collect())
    }

    fn set_project_open(&self, id: &ProjectId, open: bool) -> Result<(), RepositoryError> {
        let mut store = self.store.lock().expect("repository mutex poisoned");
        let project = store.projects.get_mut(id).ok_or(RepositoryError::NotFound)?;
        project.is_open = open;
        Ok(())
    }

    fn application(
        &self,
        user: &UserId,
        project: &ProjectId,
    ) -> Result<Option<Application>, RepositoryError> {
        let store = self.store.lock().expect("repository mutex poisoned");
        Ok(store
            .applications
            .get(&(user.clone(), project.clone()))
            .cloned())
    }

    fn applications_by_user(&self, user: &UserId) -> Result<Vec<Application>, RepositoryError> {
        let store = self.store.lock().expect("repository mutex poisoned");
        Ok(store
            .applications
            .values()
            .filter(|application| application.user_id == *user)
            .cloned()
            .collect())
    }

    fn insert_application(&self, application: Application) -> Result<Application, RepositoryError> {
        let mut store = self.store.lock().expect("repository mutex poisoned");
        let key = (application.user_id.clone(), application.project_id.clone());
        if store.applications.contains_key(&key) {
            return Err(RepositoryError::Conflict);
        }
        store.applications.insert(key, application.clone());
        Ok(application)
    }

    fn update_application_status(
        &self,
        user: &UserId,
        project: &ProjectId,
        status: ApplicationStatus,
        updated_at: DateTime<Utc>,
    ) -> Result<Application, RepositoryError> {
        let mut store = self.store.lock().expect("repository mutex poisoned");
        let application = store
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
        let mut store = self.store.lock().expect("repository mutex poisoned");
        store
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
        let store = self.store.lock().expect("repository mutex poisoned");
        Ok(store.members.get(&(user.clone(), project.clone())).cloned())
    }

    fn insert_member(&self, member: ProjectMember) -> Result<ProjectMember, RepositoryError> {
        let mut store = self.store.lock().expect("repository mutex poisoned");
        let key = (member.user_id.clone(), member.project_id.clone());
        if store.members.contains_key(&key) {
            return Err(RepositoryError::Conflict);
        }
        store.members.insert(key, member.clone());
        Ok(member)
    }
}
