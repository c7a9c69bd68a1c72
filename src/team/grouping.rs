use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::team::model::{RoleMetadata, TeamMember};

/// Rank of the catch-all bucket for members with no resolvable group. Sorts after every real rank.
pub const UNASSIGNED_GROUP: i64 = i64::MAX;

pub const UNASSIGNED_LABEL: &str = "TEAM MEMBERS";

/// One display section of the team page.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoleGroup {
    pub label: String,
    pub rank: i64,
    /// Members directly under the group heading (subgroup 0), in input order.
    pub members: Vec<TeamMember>,
    /// Nested sections, ascending by rank.
    pub subgroups: Vec<RoleSubgroup>,
}

impl RoleGroup {
    pub fn is_unassigned(&self) -> bool {
        self.rank == UNASSIGNED_GROUP
    }

    /// Every member in display order.
    pub fn iter_members(&self) -> impl Iterator<Item = &TeamMember> {
        self.members
            .iter()
            .chain(self.subgroups.iter().flat_map(|s| s.members.iter()))
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoleSubgroup {
    pub label: String,
    pub rank: i64,
    pub members: Vec<TeamMember>,
}

/// Resolve `(group, subgroup)` for one member.
///
/// The member's own `group` wins (with its own subgroup, or 0). Otherwise the first role entry
/// named exactly like the member's role and carrying a group supplies both ranks. Otherwise the
/// member is unassigned.
pub fn resolve_ranks(member: &TeamMember, roles: &[RoleMetadata]) -> (i64, i64) {
    if let Some(group) = member.group {
        return (group, member.subgroup.unwrap_or(0));
    }
    roles
        .iter()
        .filter(|r| r.name == member.role)
        .find_map(|r| r.group.map(|g| (g, r.subgroup.unwrap_or(0))))
        .unwrap_or((UNASSIGNED_GROUP, 0))
}

#[derive(Default)]
struct Bucket<'a> {
    label: Option<String>,
    direct: Vec<&'a TeamMember>,
    subgroups: BTreeMap<i64, Vec<&'a TeamMember>>,
}

/// Sort members into ordered display sections.
///
/// Groups ascend by rank with the unassigned bucket last. A group is labelled by the first
/// non-empty role among its members, upper-cased. Never fails; output depends only on input.
#[tracing::instrument(level = "debug", skip_all, fields(members = members.len(), roles = roles.len()))]
pub fn group_members(members: &[TeamMember], roles: &[RoleMetadata]) -> Vec<RoleGroup> {
    let mut buckets: BTreeMap<i64, Bucket<'_>> = BTreeMap::new();

    for member in members {
        let (group, subgroup) = resolve_ranks(member, roles);
        let bucket = buckets.entry(group).or_default();

        if bucket.label.is_none() {
            let role = member.role.trim();
            if !role.is_empty() {
                bucket.label = Some(role.to_uppercase());
            }
        }

        if subgroup == 0 {
            bucket.direct.push(member);
        } else {
            bucket.subgroups.entry(subgroup).or_default().push(member);
        }
    }

    let groups: Vec<RoleGroup> = buckets
        .into_iter()
        .map(|(rank, bucket)| RoleGroup {
            label: if rank == UNASSIGNED_GROUP {
                UNASSIGNED_LABEL.to_owned()
            } else {
                bucket.label.unwrap_or_else(|| format!("GROUP {rank}"))
            },
            rank,
            members: bucket.direct.into_iter().cloned().collect(),
            subgroups: bucket
                .subgroups
                .into_iter()
                .map(|(rank, members)| RoleSubgroup {
                    label: format!("Subgroup {rank}"),
                    rank,
                    members: members.into_iter().cloned().collect(),
                })
                .collect(),
        })
        .collect();

    tracing::debug!(groups = groups.len(), "team members grouped");
    groups
}

#[cfg(test)]
#[path = "../../tests/unit/team/grouping.rs"]
mod tests;
