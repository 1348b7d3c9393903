//! Application eligibility verdicts.
//!
//! Composes the recruitment window policy, the capacity accountant, and the
//! proficiency range into a single yes/no-with-reasons answer for one
//! (applicant, project, requested positions) triple. Every applicable reason
//! is collected rather than failing fast, so a caller can surface complete
//! feedback in one round trip.

mod rules;

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{ApplicantSnapshot, Application, Position, Project, ProjectMember};

/// One ground on which an application attempt is blocked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IneligibilityReason {
    OwnProject,
    AlreadyApplied,
    AlreadyMember,
    RecruitmentNotStarted,
    RecruitmentEnded,
    ProjectAlreadyStarted,
    PositionFull(Position),
    ProficiencyOutOfRange,
}

impl IneligibilityReason {
    pub fn message(&self) -> String {
        match self {
            Self::OwnProject => "owner cannot apply to own project".to_string(),
            Self::AlreadyApplied => "already applied".to_string(),
            Self::AlreadyMember => "already a member".to_string(),
            Self::RecruitmentNotStarted => "recruitment not yet started".to_string(),
            Self::RecruitmentEnded => "recruitment period ended".to_string(),
            Self::ProjectAlreadyStarted => "project already started".to_string(),
            Self::PositionFull(position) => format!("{} is full", position.label()),
            Self::ProficiencyOutOfRange => "proficiency out of accepted range".to_string(),
        }
    }
}

impl fmt::Display for IneligibilityReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

/// Everything the evaluator needs, fetched by the caller beforehand. The
/// evaluator itself never touches storage.
#[derive(Debug)]
pub struct EligibilityContext<'a> {
    pub applicant: &'a ApplicantSnapshot,
    pub project: &'a Project,
    pub requested: &'a [Position],
    pub members: &'a [ProjectMember],
    pub existing_application: Option<&'a Application>,
    pub existing_membership: Option<&'a ProjectMember>,
    pub now: DateTime<Utc>,
}

/// Accumulated verdict; eligible exactly when no reason applies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityReport {
    pub eligible: bool,
    pub reasons: Vec<IneligibilityReason>,
}

impl EligibilityReport {
    pub fn from_reasons(reasons: Vec<IneligibilityReason>) -> Self {
        Self {
            eligible: reasons.is_empty(),
            reasons,
        }
    }

    pub fn messages(&self) -> Vec<String> {
        self.reasons.iter().map(IneligibilityReason::message).collect()
    }
}

impl fmt::Display for EligibilityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.eligible {
            f.write_str("eligible")
        } else {
            f.write_str(&self.messages().join("; "))
        }
    }
}

/// Run the full rule chain. Reasons come back in evaluation order: ownership,
/// duplicate application, existing membership, window closure, per-position
/// capacity, proficiency range.
pub fn evaluate(context: &EligibilityContext<'_>) -> EligibilityReport {
    EligibilityReport::from_reasons(rules::collect_reasons(context))
}
