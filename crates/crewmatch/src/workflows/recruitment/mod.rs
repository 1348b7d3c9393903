//! Project/team matching: eligibility, capacity accounting, and the
//! application lifecycle.
//!
//! The engine is a set of pure or near-pure functions over data fetched by
//! the caller immediately before each decision. Persistence stays behind the
//! [`repository::RecruitmentRepository`] trait; the service composes the
//! evaluators with storage reads/writes and the router exposes the
//! operations as plain request/response structures.

pub mod capacity;
pub mod dashboard;
pub mod domain;
pub mod eligibility;
pub mod repository;
pub mod router;
pub mod service;
pub mod window;

#[cfg(test)]
mod tests;

pub use dashboard::{
    ApplicationView, DashboardAggregator, DashboardView, MemberDashboardView, MemberView,
    OwnerDashboardView, ProjectDetailView, ProjectSummaryView,
};
pub use domain::{
    ApplicantSnapshot, Application, ApplicationStatus, Difficulty, Position, PositionLimits,
    Proficiency, ProficiencyRange, Project, ProjectId, ProjectMember, UserId, ValidationError,
};
pub use eligibility::{EligibilityContext, EligibilityReport, IneligibilityReason};
pub use repository::{ProjectRecord, RecruitmentRepository, RepositoryError};
pub use router::recruitment_router;
pub use service::{ProjectChanges, ProjectDraft, ProjectService, ProjectServiceError};
pub use window::WindowClosure;
