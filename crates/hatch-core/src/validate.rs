use crate::staging::StagingRecord;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Step
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    ConfirmImport,
    Scope,
    Roles,
    WorkspaceSetup,
}

impl Step {
    pub fn all() -> &'static [Step] {
        &[
            Step::ConfirmImport,
            Step::Scope,
            Step::Roles,
            Step::WorkspaceSetup,
        ]
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Step> {
        Step::all().get(index).copied()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Step::ConfirmImport => "confirm_import",
            Step::Scope => "scope",
            Step::Roles => "roles",
            Step::WorkspaceSetup => "workspace_setup",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Step::ConfirmImport => "Confirm & Import",
            Step::Scope => "Scope",
            Step::Roles => "Roles",
            Step::WorkspaceSetup => "Workspace Setup",
        }
    }

    pub fn last() -> Step {
        Step::WorkspaceSetup
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// StepRule
// ---------------------------------------------------------------------------

/// A fn-pointer gate over an immutable draft. `check` returns the reason the
/// step is incomplete, or `None` when forward navigation is allowed.
pub struct StepRule {
    pub step: Step,
    pub check: fn(&StagingRecord) -> Option<String>,
}

fn always_valid(_: &StagingRecord) -> Option<String> {
    None
}

fn scope_complete(r: &StagingRecord) -> Option<String> {
    let missing: Vec<&str> = [("name", &r.name), ("description", &r.description)]
        .into_iter()
        .filter(|(_, v)| v.trim().is_empty())
        .map(|(field, _)| field)
        .collect();
    if missing.is_empty() {
        None
    } else {
        Some(format!("{} must not be empty", missing.join(" and ")))
    }
}

/// Only scope is gated. A platform that requires a lead adds its own
/// `Step::Roles` rule.
pub fn default_rules() -> Vec<StepRule> {
    vec![
        StepRule {
            step: Step::ConfirmImport,
            check: always_valid,
        },
        StepRule {
            step: Step::Scope,
            check: scope_complete,
        },
        StepRule {
            step: Step::Roles,
            check: always_valid,
        },
        StepRule {
            step: Step::WorkspaceSetup,
            check: always_valid,
        },
    ]
}

// ---------------------------------------------------------------------------
// StepValidators
// ---------------------------------------------------------------------------

pub struct StepValidators {
    rules: Vec<StepRule>,
}

impl Default for StepValidators {
    fn default() -> Self {
        Self::new(default_rules())
    }
}

impl StepValidators {
    pub fn new(rules: Vec<StepRule>) -> Self {
        Self { rules }
    }

    /// Evaluate every rule registered for `step`; the first failure wins.
    /// A step with no rules is always valid.
    pub fn check(&self, step: Step, record: &StagingRecord) -> Option<String> {
        self.rules
            .iter()
            .filter(|r| r.step == step)
            .find_map(|r| (r.check)(record))
    }

    pub fn is_valid(&self, step: Step, record: &StagingRecord) -> bool {
        self.check(step, record).is_none()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WizardConfig;
    use crate::idea::Idea;

    fn record(name: &str, description: &str) -> StagingRecord {
        let mut idea = Idea::new("x", name);
        idea.description = description.to_string();
        StagingRecord::seed(&idea, &WizardConfig::default())
    }

    #[test]
    fn step_order_and_indices() {
        assert_eq!(Step::all().len(), 4);
        assert_eq!(Step::from_index(1), Some(Step::Scope));
        assert_eq!(Step::from_index(4), None);
        assert_eq!(Step::last().index(), 3);
    }

    #[test]
    fn confirm_import_always_valid() {
        let v = StepValidators::default();
        assert!(v.is_valid(Step::ConfirmImport, &record("", "")));
    }

    #[test]
    fn scope_requires_name_and_description() {
        let v = StepValidators::default();
        assert!(v.is_valid(Step::Scope, &record("X", "Y")));
        assert_eq!(
            v.check(Step::Scope, &record("", "Y")).as_deref(),
            Some("name must not be empty")
        );
        assert_eq!(
            v.check(Step::Scope, &record("X", "   ")).as_deref(),
            Some("description must not be empty")
        );
        assert_eq!(
            v.check(Step::Scope, &record("", "")).as_deref(),
            Some("name and description must not be empty")
        );
    }

    #[test]
    fn roles_valid_with_nothing_assigned() {
        let v = StepValidators::default();
        let r = record("X", "Y");
        assert_eq!(r.roles.assigned_count(), 0);
        assert!(v.is_valid(Step::Roles, &r));
    }

    #[test]
    fn workspace_setup_always_valid() {
        let v = StepValidators::default();
        assert!(v.is_valid(Step::WorkspaceSetup, &record("", "")));
    }

    #[test]
    fn custom_rules_can_tighten_a_step() {
        fn lead_required(r: &StagingRecord) -> Option<String> {
            r.roles
                .get("lead")
                .is_none()
                .then(|| "lead must be assigned".to_string())
        }
        let mut rules = default_rules();
        rules.push(StepRule {
            step: Step::Roles,
            check: lead_required,
        });
        let v = StepValidators::new(rules);

        let mut r = record("X", "Y");
        assert!(!v.is_valid(Step::Roles, &r));
        r.roles.assign("lead", "user1").unwrap();
        assert!(v.is_valid(Step::Roles, &r));
    }
}
