use super::super::capacity;
use super::super::window::{self, WindowClosure};
use super::{EligibilityContext, IneligibilityReason};

pub(crate) fn collect_reasons(context: &EligibilityContext<'_>) -> Vec<IneligibilityReason> {
    let mut reasons = Vec::new();

    if context.project.owner_id == context.applicant.id {
        reasons.push(IneligibilityReason::OwnProject);
    }

    if context.existing_application.is_some() {
        reasons.push(IneligibilityReason::AlreadyApplied);
    }

    if context.existing_membership.is_some() {
        reasons.push(IneligibilityReason::AlreadyMember);
    }

    if let Some(closure) = window::closure_at(context.project, context.now) {
        reasons.push(match closure {
            WindowClosure::NotYetStarted => IneligibilityReason::RecruitmentNotStarted,
            WindowClosure::Ended => IneligibilityReason::RecruitmentEnded,
            WindowClosure::ProjectStarted => IneligibilityReason::ProjectAlreadyStarted,
        });
    }

    for position in context.requested {
        if !capacity::has_room(context.project, *position, context.members) {
            reasons.push(IneligibilityReason::PositionFull(*position));
        }
    }

    if !context
        .project
        .proficiency
        .contains(context.applicant.proficiency)
    {
        reasons.push(IneligibilityReason::ProficiencyOutOfRange);
    }

    reasons
}
