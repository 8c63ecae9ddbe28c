//! Role assignment for a project draft.
//!
//! The role list is fixed when the draft is created: `assign` and `clear`
//! only touch existing keys and never add or remove one. A member may hold
//! several roles at once; nothing here enforces uniqueness across roles.

use crate::config::Member;
use crate::error::{HatchError, Result};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// RoleSlot
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleSlot {
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

// ---------------------------------------------------------------------------
// RoleAssignments
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleAssignments {
    slots: Vec<RoleSlot>,
}

impl RoleAssignments {
    /// Build an empty assignment table over `roles`, preserving order.
    /// Repeated names collapse to their first occurrence.
    pub fn new<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut slots: Vec<RoleSlot> = Vec::new();
        for role in roles {
            let role = role.into();
            if !slots.iter().any(|s| s.role == role) {
                slots.push(RoleSlot {
                    role,
                    user_id: None,
                });
            }
        }
        Self { slots }
    }

    pub fn roles(&self) -> impl Iterator<Item = &str> {
        self.slots.iter().map(|s| s.role.as_str())
    }

    pub fn slots(&self) -> &[RoleSlot] {
        &self.slots
    }

    pub fn contains(&self, role: &str) -> bool {
        self.slots.iter().any(|s| s.role == role)
    }

    pub fn get(&self, role: &str) -> Option<&str> {
        self.slots
            .iter()
            .find(|s| s.role == role)
            .and_then(|s| s.user_id.as_deref())
    }

    fn slot_mut(&mut self, role: &str) -> Result<&mut RoleSlot> {
        self.slots
            .iter_mut()
            .find(|s| s.role == role)
            .ok_or_else(|| HatchError::UnknownRole(role.to_string()))
    }

    /// Assign `user_id` to `role`, replacing any previous holder.
    /// A blank user id clears the role.
    pub fn assign(&mut self, role: &str, user_id: impl Into<String>) -> Result<()> {
        let user_id = user_id.into();
        let slot = self.slot_mut(role)?;
        slot.user_id = if user_id.trim().is_empty() {
            None
        } else {
            Some(user_id)
        };
        Ok(())
    }

    pub fn clear(&mut self, role: &str) -> Result<()> {
        self.slot_mut(role)?.user_id = None;
        Ok(())
    }

    pub fn assigned_count(&self) -> usize {
        self.slots.iter().filter(|s| s.user_id.is_some()).count()
    }

    /// Resolve every role against the member directory.
    pub fn summary(&self, members: &[Member]) -> RoleSummary {
        let lines = self
            .slots
            .iter()
            .map(|slot| {
                let display_name = match &slot.user_id {
                    Some(id) => members
                        .iter()
                        .find(|m| &m.id == id)
                        .map(|m| m.display_name.clone())
                        .unwrap_or_else(|| id.clone()),
                    None => UNASSIGNED.to_string(),
                };
                RoleLine {
                    role: slot.role.clone(),
                    user_id: slot.user_id.clone(),
                    display_name,
                }
            })
            .collect();
        RoleSummary {
            assigned: self.assigned_count(),
            total: self.slots.len(),
            lines,
        }
    }
}

pub const UNASSIGNED: &str = "unassigned";

// ---------------------------------------------------------------------------
// RoleSummary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleLine {
    pub role: String,
    pub user_id: Option<String>,
    pub display_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleSummary {
    pub assigned: usize,
    pub total: usize,
    pub lines: Vec<RoleLine>,
}

impl RoleSummary {
    pub fn display_name(&self, role: &str) -> Option<&str> {
        self.lines
            .iter()
            .find(|l| l.role == role)
            .map(|l| l.display_name.as_str())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> RoleAssignments {
        RoleAssignments::new(["lead", "designer", "developer"])
    }

    #[test]
    fn new_keeps_order_and_drops_repeats() {
        let r = RoleAssignments::new(["lead", "mentor", "lead"]);
        assert_eq!(r.roles().collect::<Vec<_>>(), vec!["lead", "mentor"]);
        assert_eq!(r.assigned_count(), 0);
    }

    #[test]
    fn assign_and_clear_are_independent() {
        let mut r = table();
        r.assign("lead", "user1").unwrap();
        r.assign("designer", "user2").unwrap();
        r.clear("lead").unwrap();
        assert_eq!(r.get("lead"), None);
        assert_eq!(r.get("designer"), Some("user2"));
        assert_eq!(r.assigned_count(), 1);
    }

    #[test]
    fn unknown_role_is_rejected_without_adding_a_key() {
        let mut r = table();
        assert!(matches!(
            r.assign("janitor", "user1"),
            Err(HatchError::UnknownRole(_))
        ));
        assert!(matches!(r.clear("janitor"), Err(HatchError::UnknownRole(_))));
        assert_eq!(r.roles().count(), 3);
    }

    #[test]
    fn same_user_may_hold_several_roles() {
        let mut r = table();
        r.assign("lead", "user1").unwrap();
        r.assign("developer", "user1").unwrap();
        assert_eq!(r.assigned_count(), 2);
    }

    #[test]
    fn blank_user_clears() {
        let mut r = table();
        r.assign("lead", "user1").unwrap();
        r.assign("lead", "  ").unwrap();
        assert_eq!(r.get("lead"), None);
    }

    #[test]
    fn summary_resolves_display_names() {
        let mut r = table();
        r.assign("lead", "user1").unwrap();
        r.assign("designer", "stranger").unwrap();
        let members = vec![Member {
            id: "user1".to_string(),
            display_name: "Ada".to_string(),
        }];

        let s = r.summary(&members);
        assert_eq!(s.assigned, 2);
        assert_eq!(s.total, 3);
        assert_eq!(s.display_name("lead"), Some("Ada"));
        assert_eq!(s.display_name("designer"), Some("stranger"));
        assert_eq!(s.display_name("developer"), Some(UNASSIGNED));
    }

    #[test]
    fn serializes_as_ordered_list() {
        let mut r = table();
        r.assign("lead", "user1").unwrap();
        let yaml = serde_yaml::to_string(&r).unwrap();
        let parsed: RoleAssignments = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed, r);
        assert!(yaml.find("lead").unwrap() < yaml.find("designer").unwrap());
    }
}
