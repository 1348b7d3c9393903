use std::sync::Arc;

use chrono::{Duration, Utc};
use clap::Args;

use crate::infra::InMemoryRecruitmentRepository;
use crewmatch::error::AppError;
use crewmatch::workflows::recruitment::{
    ApplicantSnapshot, Difficulty, Position, PositionLimits, Proficiency, ProjectDraft,
    ProjectService, ProjectServiceError, UserId,
};

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Number of competing backend applicants to simulate
    #[arg(long, default_value_t = 3)]
    pub(crate) applicants: u8,
}

/// Walk one project through apply, accept, and the dashboard so stakeholders
/// can see the capacity and window rules working end to end.
pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let repository = Arc::new(InMemoryRecruitmentRepository::default());
    let service = ProjectService::new(repository);
    let now = Utc::now();

    println!("Crewmatch matching demo");

    let owner = UserId("owner-hana".to_string());
    let draft = ProjectDraft {
        name: "Realtime chat platform".to_string(),
        description: "Team up to ship a realtime chat service".to_string(),
        difficulty: Difficulty::Normal,
        repo_url: Some("https://github.com/crewmatch/chat-platform".to_string()),
        recruitment_start: Some(now - Duration::days(7)),
        recruitment_end: Some(now + Duration::days(14)),
        project_start: now + Duration::days(30),
        project_end: now + Duration::days(120),
        limits: PositionLimits {
            backend: 1,
            frontend: 2,
            ..PositionLimits::default()
        },
        min_proficiency: Some(Proficiency::Bronze),
        max_proficiency: Some(Proficiency::Gold),
    };
    let project = service.create_project(owner.clone(), draft, now)?;
    println!(
        "Created '{}' ({}) with one BACKEND slot, open: {}",
        project.name, project.id.0, project.is_open
    );

    let applicants: Vec<ApplicantSnapshot> = (1..=args.applicants.max(1))
        .map(|index| ApplicantSnapshot {
            id: UserId(format!("dev-{index:02}")),
            positions: vec![Position::Backend],
            proficiency: if index % 2 == 0 {
                Proficiency::Gold
            } else {
                Proficiency::Silver
            },
        })
        .collect();

    println!("\nApplications");
    for user in &applicants {
        let report =
            service.check_eligibility(user, &project.id, &[Position::Backend], Utc::now())?;
        if report.eligible {
            service.apply(
                user,
                &project.id,
                vec![Position::Backend],
                None,
                Utc::now(),
            )?;
            println!("- {} applied for BACKEND", user.id.0);
        } else {
            println!("- {} blocked: {}", user.id.0, report.messages().join("; "));
        }
    }

    println!("\nDecisions");
    for (index, user) in applicants.iter().enumerate() {
        match service.accept(&owner, &user.id, &project.id, Utc::now()) {
            Ok(application) => println!(
                "- {} accepted, now a member ({})",
                user.id.0,
                application.status.label()
            ),
            Err(ProjectServiceError::CapacityExhausted(position)) => println!(
                "- {} refused: {} has no remaining capacity",
                user.id.0,
                position.label()
            ),
            Err(err) => println!("- {} refused: {err}", user.id.0),
        }
        if index == 0 {
            println!("  (one slot configured; the rest should bounce)");
        }
    }

    let dashboard = service
        .dashboard()
        .aggregate(&owner)
        .map_err(ProjectServiceError::Repository)?;

    println!("\nOwner dashboard");
    for detail in &dashboard.owned_projects {
        println!(
            "- {}: {} member(s), {} application(s)",
            detail.summary.name, detail.summary.member_count, detail.summary.application_count
        );
        for application in &detail.applications {
            println!("  - {} -> {}", application.user_id.0, application.status);
        }
    }

    Ok(())
}
