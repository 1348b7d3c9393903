use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for users. Issued by the external identity provider;
/// opaque to the matching engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub String);

/// Identifier wrapper for projects.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProjectId(pub String);

/// A role category a project recruits for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Position {
    Backend,
    Frontend,
    Pm,
    Mobile,
    Ai,
}

impl Position {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::Backend,
            Self::Frontend,
            Self::Pm,
            Self::Mobile,
            Self::Ai,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Backend => "BACKEND",
            Self::Frontend => "FRONTEND",
            Self::Pm => "PM",
            Self::Mobile => "MOBILE",
            Self::Ai => "AI",
        }
    }
}

/// Ordered skill tier. Wire values outside the known set collapse to
/// `Unknown`, the lowest rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Proficiency {
    Unknown,
    Bronze,
    Silver,
    Gold,
    Platinum,
    Diamond,
}

impl<'de> Deserialize<'de> for Proficiency {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::from_label(&raw))
    }
}

impl Proficiency {
    pub fn from_label(value: &str) -> Self {
        match value.trim().to_ascii_uppercase().as_str() {
            "BRONZE" => Self::Bronze,
            "SILVER" => Self::Silver,
            "GOLD" => Self::Gold,
            "PLATINUM" => Self::Platinum,
            "DIAMOND" => Self::Diamond,
            _ => Self::Unknown,
        }
    }

    pub const fn rank(self) -> u8 {
        match self {
            Self::Unknown => 0,
            Self::Bronze => 1,
            Self::Silver => 2,
            Self::Gold => 3,
            Self::Platinum => 4,
            Self::Diamond => 5,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Unknown => "UNKNOWN",
            Self::Bronze => "BRONZE",
            Self::Silver => "SILVER",
            Self::Gold => "GOLD",
            Self::Platinum => "PLATINUM",
            Self::Diamond => "DIAMOND",
        }
    }
}

/// Tier bounds a project accepts. An unset lower bound is minimal and an
/// unset upper bound is maximal, so a project with no declared bounds
/// accepts any proficiency.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProficiencyRange {
    pub min: Option<Proficiency>,
    pub max: Option<Proficiency>,
}

impl ProficiencyRange {
    pub fn new(min: Option<Proficiency>, max: Option<Proficiency>) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: Proficiency) -> bool {
        let floor = self.min.map_or(Proficiency::Unknown.rank(), Proficiency::rank);
        let ceiling = self.max.map_or(Proficiency::Diamond.rank(), Proficiency::rank);
        floor <= value.rank() && value.rank() <= ceiling
    }

    /// Bounds are inverted when both are declared and min outranks max.
    pub fn is_inverted(&self) -> bool {
        match (self.min, self.max) {
            (Some(min), Some(max)) => min.rank() > max.rank(),
            _ => false,
        }
    }
}

/// Informational difficulty tag; carries no decision weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Difficulty {
    Easy,
    Normal,
    Hard,
}

impl Difficulty {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Easy => "EASY",
            Self::Normal => "NORMAL",
            Self::Hard => "HARD",
        }
    }
}

/// Per-position headcount ceilings. A limit of zero means the position is
/// unlimited; this sentinel is preserved from the source system for
/// compatibility.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionLimits {
    #[serde(default)]
    pub backend: u32,
    #[serde(default)]
    pub frontend: u32,
    #[serde(default)]
    pub pm: u32,
    #[serde(default)]
    pub mobile: u32,
    #[serde(default)]
    pub ai: u32,
}

impl PositionLimits {
    pub const fn limit_for(&self, position: Position) -> u32 {
        match position {
            Position::Backend => self.backend,
            Position::Frontend => self.frontend,
            Position::Pm => self.pm,
            Position::Mobile => self.mobile,
            Position::Ai => self.ai,
        }
    }
}

/// A recruiting project. The owner is exactly one user, fixed at creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub owner_id: UserId,
    pub name: String,
    pub description: String,
    pub difficulty: Difficulty,
    pub repo_url: Option<String>,
    pub recruitment_start: Option<DateTime<Utc>>,
    pub recruitment_end: Option<DateTime<Utc>>,
    pub project_start: DateTime<Utc>,
    pub project_end: DateTime<Utc>,
    pub limits: PositionLimits,
    pub proficiency: ProficiencyRange,
    /// Persisted cache of the recruitment window verdict, refreshed on
    /// create/update. Advisory only; eligibility checks recompute live.
    pub is_open: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A member occupying one or more positions on a project. Created exactly
/// once per (user, project) when an application is accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectMember {
    pub user_id: UserId,
    pub project_id: ProjectId,
    pub role: Vec<Position>,
    pub joined_at: DateTime<Utc>,
}

/// Status lifecycle of an application. `Pending` is the only state that
/// admits further transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationStatus {
    Pending,
    Accepted,
    Rejected,
}

impl ApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Accepted => "ACCEPTED",
            Self::Rejected => "REJECTED",
        }
    }
}

/// An application by one user to one project. At most one exists per
/// (user, project) pair at any time; the repository enforces the uniqueness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub user_id: UserId,
    pub project_id: ProjectId,
    pub applied_position: Vec<Position>,
    pub status: ApplicationStatus,
    pub cover_letter: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The slice of a user the matching engine consumes. Owned by the external
/// identity service; read-only input here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicantSnapshot {
    pub id: UserId,
    #[serde(default)]
    pub positions: Vec<Position>,
    pub proficiency: Proficiency,
}

/// Structural validation failures for project and application input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("project end must be after project start")]
    ScheduleInverted,
    #[error("minimum proficiency outranks maximum proficiency")]
    ProficiencyBoundsInverted,
    #[error("at least one position must be requested")]
    NoPositionsRequested,
}
