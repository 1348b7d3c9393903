//! Per-position occupancy accounting against configured headcount limits.
//!
//! Pure functions over data handed in by the caller; no storage access. The
//! read-then-decide nature of `has_room` means the surrounding storage layer
//! must serialize apply/accept decisions per project or re-validate capacity
//! inside the write (see the service module).

use std::collections::BTreeMap;

use super::domain::{Position, Project, ProjectMember};

/// Count, for each position, the members whose role set contains it. A
/// member holding several roles counts once per role; duplicate entries in
/// one member's role list count once.
pub fn occupancy(members: &[ProjectMember]) -> BTreeMap<Position, u32> {
    let mut counts = BTreeMap::new();
    for position in Position::ordered() {
        counts.insert(position, 0);
    }

    for member in members {
        for position in Position::ordered() {
            if member.role.contains(&position) {
                if let Some(count) = counts.get_mut(&position) {
                    *count += 1;
                }
            }
        }
    }

    counts
}

/// Whether `position` can take one more member. A configured limit of zero
/// means unlimited.
pub fn has_room(project: &Project, position: Position, members: &[ProjectMember]) -> bool {
    let limit = project.limits.limit_for(position);
    if limit == 0 {
        return true;
    }

    let occupied = occupancy(members).get(&position).copied().unwrap_or(0);
    occupied < limit
}
