//! Recruitment window policy: is a project accepting applications right now?
//!
//! Always evaluated live against a caller-supplied instant. The persisted
//! `Project::is_open` flag is a cache refreshed on writes and is never
//! consulted here.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::domain::Project;

/// Why a project is closed to applications at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowClosure {
    NotYetStarted,
    Ended,
    ProjectStarted,
}

impl WindowClosure {
    pub const fn reason(self) -> &'static str {
        match self {
            Self::NotYetStarted => "recruitment not yet started",
            Self::Ended => "recruitment period ended",
            Self::ProjectStarted => "project already started",
        }
    }
}

/// Evaluate the window rules in order; the first failing rule wins. `None`
/// means the project is open for applications.
pub fn closure_at(project: &Project, now: DateTime<Utc>) -> Option<WindowClosure> {
    if let Some(start) = project.recruitment_start {
        if now < start {
            return Some(WindowClosure::NotYetStarted);
        }
    }

    if let Some(end) = project.recruitment_end {
        if now > end {
            return Some(WindowClosure::Ended);
        }
    }

    if now >= project.project_start {
        return Some(WindowClosure::ProjectStarted);
    }

    None
}

pub fn is_open(project: &Project, now: DateTime<Utc>) -> bool {
    closure_at(project, now).is_none()
}
