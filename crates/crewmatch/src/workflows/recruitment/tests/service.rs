use super::common::*;
use crate::workflows::recruitment::domain::{
    ApplicationStatus, Difficulty, Position, PositionLimits, Proficiency, ProficiencyRange,
    UserId, ValidationError,
};
use crate::workflows::recruitment::eligibility::IneligibilityReason;
use crate::workflows::recruitment::repository::RecruitmentRepository;
use crate::workflows::recruitment::service::{ProjectChanges, ProjectDraft, ProjectServiceError};

fn draft() -> ProjectDraft {
    ProjectDraft {
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
            ..PositionLimits::default()
        },
        min_proficiency: Some(Proficiency::Bronze),
        max_proficiency: Some(Proficiency::Gold),
    }
}

#[test]
fn apply_creates_a_pending_application() {
    let (service, repository) = build_service();
    seed_project(&repository, sample_project("proj-1"));
    let user = applicant("user-kim", Proficiency::Silver);

    let application = service
        .apply(
            &user,
            &sample_project("proj-1").id,
            vec![Position::Backend],
            Some("I ship fast".to_string()),
            now(),
        )
        .expect("application accepted for creation");

    assert_eq!(application.status, ApplicationStatus::Pending);
    let stored = repository
        .application(&user.id, &application.project_id)
        .expect("fetch succeeds")
        .expect("application persisted");
    assert_eq!(stored.applied_position, vec![Position::Backend]);
    assert_eq!(stored.cover_letter.as_deref(), Some("I ship fast"));
}

#[test]
fn apply_refuses_to_create_when_ineligible() {
    let (service, repository) = build_service();
    seed_project(&repository, sample_project("proj-1"));
    let user = applicant("user-owner", Proficiency::Silver);

    match service.apply(
        &user,
        &sample_project("proj-1").id,
        vec![Position::Backend],
        None,
        now(),
    ) {
        Err(ProjectServiceError::Ineligible(report)) => {
            assert!(report.reasons.contains(&IneligibilityReason::OwnProject));
        }
        other => panic!("expected ineligible error, got {other:?}"),
    }

    let stored = repository
        .application(&user.id, &sample_project("proj-1").id)
        .expect("fetch succeeds");
    assert!(stored.is_none(), "no application may be created");
}

#[test]
fn apply_requires_at_least_one_position() {
    let (service, repository) = build_service();
    seed_project(&repository, sample_project("proj-1"));
    let user = applicant("user-kim", Proficiency::Silver);

    match service.apply(&user, &sample_project("proj-1").id, Vec::new(), None, now()) {
        Err(ProjectServiceError::Validation(ValidationError::NoPositionsRequested)) => {}
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn second_apply_for_the_same_pair_reports_already_applied() {
    let (service, repository) = build_service();
    seed_project(&repository, sample_project("proj-1"));
    let user = applicant("user-kim", Proficiency::Silver);
    let project_id = sample_project("proj-1").id;

    service
        .apply(&user, &project_id, vec![Position::Backend], None, now())
        .expect("first apply succeeds");

    match service.apply(&user, &project_id, vec![Position::Backend], None, now()) {
        Err(ProjectServiceError::Ineligible(report)) => {
            assert_eq!(report.reasons, vec![IneligibilityReason::AlreadyApplied]);
        }
        other => panic!("expected ineligible error, got {other:?}"),
    }
}

#[test]
fn accept_promotes_the_applicant_to_member_once() {
    let (service, repository) = build_service();
    seed_project(&repository, sample_project("proj-1"));
    let user = applicant("user-kim", Proficiency::Silver);
    let project_id = sample_project("proj-1").id;

    service
        .apply(&user, &project_id, vec![Position::Backend], None, now())
        .expect("apply succeeds");

    let accepted = service
        .accept(&owner(), &user.id, &project_id, now())
        .expect("owner accepts");
    assert_eq!(accepted.status, ApplicationStatus::Accepted);

    let member = repository
        .member(&user.id, &project_id)
        .expect("fetch succeeds")
        .expect("member created");
    assert_eq!(member.role, vec![Position::Backend]);
    assert_eq!(repository.member_count(&project_id), 1);

    // Re-accepting must not create a second member.
    let again = service
        .accept(&owner(), &user.id, &project_id, now())
        .expect("re-accept is idempotent");
    assert_eq!(again.status, ApplicationStatus::Accepted);
    assert_eq!(repository.member_count(&project_id), 1);
}

#[test]
fn accept_by_a_non_owner_is_forbidden() {
    let (service, repository) = build_service();
    seed_project(&repository, sample_project("proj-1"));
    let user = applicant("user-kim", Proficiency::Silver);
    let project_id = sample_project("proj-1").id;

    service
        .apply(&user, &project_id, vec![Position::Backend], None, now())
        .expect("apply succeeds");

    match service.accept(&UserId("user-mallory".to_string()), &user.id, &project_id, now()) {
        Err(ProjectServiceError::NotProjectOwner) => {}
        other => panic!("expected forbidden error, got {other:?}"),
    }
}

#[test]
fn accept_of_a_rejected_application_is_an_invalid_state() {
    let (service, repository) = build_service();
    seed_project(&repository, sample_project("proj-1"));
    let user = applicant("user-kim", Proficiency::Silver);
    let project_id = sample_project("proj-1").id;

    service
        .apply(&user, &project_id, vec![Position::Backend], None, now())
        .expect("apply succeeds");
    service
        .reject(&owner(), &user.id, &project_id, now())
        .expect("owner rejects");

    match service.accept(&owner(), &user.id, &project_id, now()) {
        Err(ProjectServiceError::InvalidState { action, status }) => {
            assert_eq!(action, "accept");
            assert_eq!(status, ApplicationStatus::Rejected);
        }
        other => panic!("expected invalid state error, got {other:?}"),
    }
}

#[test]
fn accept_revalidates_capacity_at_decision_time() {
    let (service, repository) = build_service();
    seed_project(&repository, sample_project("proj-1"));
    let first = applicant("user-kim", Proficiency::Silver);
    let second = applicant("user-lee", Proficiency::Silver);
    let project_id = sample_project("proj-1").id;

    // Both applications land while the single backend slot is unoccupied.
    service
        .apply(&first, &project_id, vec![Position::Backend], None, now())
        .expect("first apply succeeds");
    service
        .apply(&second, &project_id, vec![Position::Backend], None, now())
        .expect("second apply succeeds");

    service
        .accept(&owner(), &first.id, &project_id, now())
        .expect("first accept succeeds");

    match service.accept(&owner(), &second.id, &project_id, now()) {
        Err(ProjectServiceError::CapacityExhausted(Position::Backend)) => {}
        other => panic!("expected capacity exhaustion, got {other:?}"),
    }
    assert_eq!(repository.member_count(&project_id), 1);
}

#[test]
fn reject_changes_status_without_creating_a_member() {
    let (service, repository) = build_service();
    seed_project(&repository, sample_project("proj-1"));
    let user = applicant("user-kim", Proficiency::Silver);
    let project_id = sample_project("proj-1").id;

    service
        .apply(&user, &project_id, vec![Position::Backend], None, now())
        .expect("apply succeeds");
    let rejected = service
        .reject(&owner(), &user.id, &project_id, now())
        .expect("owner rejects");

    assert_eq!(rejected.status, ApplicationStatus::Rejected);
    assert_eq!(repository.member_count(&project_id), 0);
}

#[test]
fn withdraw_deletes_a_pending_application() {
    let (service, repository) = build_service();
    seed_project(&repository, sample_project("proj-1"));
    let user = applicant("user-kim", Proficiency::Silver);
    let project_id = sample_project("proj-1").id;

    service
        .apply(&user, &project_id, vec![Position::Backend], None, now())
        .expect("apply succeeds");
    service
        .withdraw(&user.id, &user.id, &project_id)
        .expect("withdraw succeeds");

    let stored = repository
        .application(&user.id, &project_id)
        .expect("fetch succeeds");
    assert!(stored.is_none(), "withdrawal leaves no trace");
}

#[test]
fn withdraw_of_a_decided_application_is_an_invalid_state() {
    let (service, repository) = build_service();
    seed_project(&repository, sample_project("proj-1"));
    let user = applicant("user-kim", Proficiency::Silver);
    let project_id = sample_project("proj-1").id;

    service
        .apply(&user, &project_id, vec![Position::Backend], None, now())
        .expect("apply succeeds");
    service
        .accept(&owner(), &user.id, &project_id, now())
        .expect("owner accepts");

    match service.withdraw(&user.id, &user.id, &project_id) {
        Err(ProjectServiceError::InvalidState { action, status }) => {
            assert_eq!(action, "withdraw");
            assert_eq!(status, ApplicationStatus::Accepted);
        }
        other => panic!("expected invalid state error, got {other:?}"),
    }
}

#[test]
fn withdraw_by_anyone_but_the_applicant_is_forbidden() {
    let (service, repository) = build_service();
    seed_project(&repository, sample_project("proj-1"));
    let user = applicant("user-kim", Proficiency::Silver);
    let project_id = sample_project("proj-1").id;

    service
        .apply(&user, &project_id, vec![Position::Backend], None, now())
        .expect("apply succeeds");

    match service.withdraw(&owner(), &user.id, &project_id) {
        Err(ProjectServiceError::NotApplicant) => {}
        other => panic!("expected forbidden error, got {other:?}"),
    }
}

#[test]
fn accept_without_an_application_is_not_found() {
    let (service, repository) = build_service();
    seed_project(&repository, sample_project("proj-1"));

    match service.accept(
        &owner(),
        &UserId("user-ghost".to_string()),
        &sample_project("proj-1").id,
        now(),
    ) {
        Err(ProjectServiceError::ApplicationNotFound) => {}
        other => panic!("expected not found error, got {other:?}"),
    }
}

#[test]
fn create_project_computes_the_open_cache() {
    let (service, _repository) = build_service();

    let open = service
        .create_project(owner(), draft(), now())
        .expect("project created");
    assert!(open.is_open);

    let mut closed_draft = draft();
    closed_draft.recruitment_end = Some(instant(2026, 2, 15, 0));
    let closed = service
        .create_project(owner(), closed_draft, now())
        .expect("project created");
    assert!(!closed.is_open);
}

#[test]
fn create_project_rejects_an_inverted_schedule() {
    let (service, _repository) = build_service();
    let mut bad = draft();
    bad.project_end = bad.project_start;

    match service.create_project(owner(), bad, now()) {
        Err(ProjectServiceError::Validation(ValidationError::ScheduleInverted)) => {}
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn create_project_rejects_inverted_proficiency_bounds() {
    let (service, _repository) = build_service();
    let mut bad = draft();
    bad.min_proficiency = Some(Proficiency::Gold);
    bad.max_proficiency = Some(Proficiency::Bronze);

    match service.create_project(owner(), bad, now()) {
        Err(ProjectServiceError::Validation(ValidationError::ProficiencyBoundsInverted)) => {}
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn update_project_recomputes_the_open_cache() {
    let (service, repository) = build_service();
    seed_project(&repository, sample_project("proj-1"));
    let project_id = sample_project("proj-1").id;

    let changes = ProjectChanges {
        recruitment_end: Some(instant(2026, 2, 15, 0)),
        ..ProjectChanges::default()
    };
    let updated = service
        .update_project(&owner(), &project_id, changes, now())
        .expect("owner updates");

    assert!(!updated.is_open);
    let stored = repository
        .project(&project_id)
        .expect("fetch succeeds")
        .expect("project present");
    assert!(!stored.project.is_open);
}

#[test]
fn update_project_by_a_non_owner_is_forbidden() {
    let (service, repository) = build_service();
    seed_project(&repository, sample_project("proj-1"));

    let changes = ProjectChanges {
        name: Some("Hijacked".to_string()),
        ..ProjectChanges::default()
    };
    match service.update_project(
        &UserId("user-mallory".to_string()),
        &sample_project("proj-1").id,
        changes,
        now(),
    ) {
        Err(ProjectServiceError::NotProjectOwner) => {}
        other => panic!("expected forbidden error, got {other:?}"),
    }
}

#[test]
fn update_can_relax_proficiency_bounds() {
    let (service, repository) = build_service();
    seed_project(&repository, sample_project("proj-1"));
    let project_id = sample_project("proj-1").id;

    let changes = ProjectChanges {
        proficiency: Some(ProficiencyRange::default()),
        ..ProjectChanges::default()
    };
    let updated = service
        .update_project(&owner(), &project_id, changes, now())
        .expect("owner updates");
    assert_eq!(updated.proficiency, ProficiencyRange::default());
}

#[test]
fn refresh_open_flag_persists_only_the_changed_verdict() {
    let (service, repository) = build_service();
    seed_project(&repository, sample_project("proj-1"));
    let project_id = sample_project("proj-1").id;

    // Inside the window: cache already true, verdict stays true.
    let open = service
        .refresh_open_flag(&project_id, now())
        .expect("refresh succeeds");
    assert!(open);

    // After the recruitment end the cache flips to false.
    let open = service
        .refresh_open_flag(&project_id, instant(2026, 3, 20, 0))
        .expect("refresh succeeds");
    assert!(!open);
    let stored = repository
        .project(&project_id)
        .expect("fetch succeeds")
        .expect("project present");
    assert!(!stored.project.is_open);
}

#[test]
fn delete_project_requires_the_owner() {
    let (service, repository) = build_service();
    seed_project(&repository, sample_project("proj-1"));

    match service.delete_project(
        &UserId("user-mallory".to_string()),
        &sample_project("proj-1").id,
    ) {
        Err(ProjectServiceError::NotProjectOwner) => {}
        other => panic!("expected forbidden error, got {other:?}"),
    }

    service
        .delete_project(&owner(), &sample_project("proj-1").id)
        .expect("owner deletes");
    match service.get_project(&sample_project("proj-1").id) {
        Err(ProjectServiceError::ProjectNotFound) => {}
        other => panic!("expected not found error, got {other:?}"),
    }
}
