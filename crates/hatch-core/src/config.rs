use crate::error::{HatchError, Result};
use crate::paths;
use crate::types::{BoardTemplate, WorkspaceToggle};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// WizardConfig
// ---------------------------------------------------------------------------

/// Settings that shape every conversion wizard opened on this platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WizardConfig {
    /// Ordered role names offered on the roles step. Fixed for a wizard's lifetime.
    #[serde(default = "default_roles")]
    pub roles: Vec<String>,
    /// Role pre-assigned to the idea's champion when the wizard opens.
    #[serde(default = "default_champion_role")]
    pub champion_role: String,
    #[serde(default)]
    pub default_board_template: BoardTemplate,
    #[serde(default = "default_toggles")]
    pub default_toggles: BTreeMap<WorkspaceToggle, bool>,
}

fn default_roles() -> Vec<String> {
    ["lead", "designer", "developer", "mentor"]
        .iter()
        .map(|r| r.to_string())
        .collect()
}

fn default_champion_role() -> String {
    "lead".to_string()
}

fn default_toggles() -> BTreeMap<WorkspaceToggle, bool> {
    WorkspaceToggle::all().iter().map(|&t| (t, true)).collect()
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            roles: default_roles(),
            champion_role: default_champion_role(),
            default_board_template: BoardTemplate::default(),
            default_toggles: default_toggles(),
        }
    }
}

impl WizardConfig {
    /// Toggle value for a new draft. Toggles missing from the config start enabled.
    pub fn toggle_default(&self, toggle: WorkspaceToggle) -> bool {
        self.default_toggles.get(&toggle).copied().unwrap_or(true)
    }
}

// ---------------------------------------------------------------------------
// Member
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub id: String,
    pub display_name: String,
}

// ---------------------------------------------------------------------------
// PlatformConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformConfig {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

// ---------------------------------------------------------------------------
// Config (top-level)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,
    pub platform: PlatformConfig,
    #[serde(default)]
    pub wizard: WizardConfig,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<Member>,
}

fn default_version() -> u32 {
    1
}

impl Config {
    pub fn new(platform_name: impl Into<String>) -> Self {
        Self {
            version: 1,
            platform: PlatformConfig {
                name: platform_name.into(),
                description: None,
            },
            wizard: WizardConfig::default(),
            members: Vec::new(),
        }
    }

    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Err(HatchError::NotInitialized);
        }
        let data = std::fs::read_to_string(&path)?;
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::config_path(root);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    pub fn member(&self, id: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.id == id)
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        if self.wizard.roles.is_empty() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "wizard.roles is empty: the roles step has nothing to assign".to_string(),
            });
        }

        let mut seen = HashSet::new();
        for role in &self.wizard.roles {
            if role.trim().is_empty() {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Error,
                    message: "wizard.roles contains a blank role name".to_string(),
                });
            } else if !seen.insert(role.as_str()) {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Error,
                    message: format!("duplicate role '{role}' in wizard.roles"),
                });
            }
        }

        if !self.wizard.roles.contains(&self.wizard.champion_role) {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: format!(
                    "champion_role '{}' is not in wizard.roles; champions will not be pre-assigned",
                    self.wizard.champion_role
                ),
            });
        }

        let mut member_ids = HashSet::new();
        for member in &self.members {
            if !member_ids.insert(member.id.as_str()) {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Warning,
                    message: format!(
                        "duplicate member id '{}': only the first display name is used",
                        member.id
                    ),
                });
            }
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::new("test-platform");
        let yaml = serde_yaml::to_string(&cfg).unwrap();
        let parsed: Config = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed.platform.name, "test-platform");
        assert_eq!(parsed.version, 1);
        assert_eq!(parsed.wizard.roles, vec!["lead", "designer", "developer", "mentor"]);
    }

    #[test]
    fn minimal_yaml_fills_wizard_defaults() {
        let yaml = "platform:\n  name: garden-club\n";
        let cfg: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.wizard.champion_role, "lead");
        assert_eq!(cfg.wizard.default_board_template, BoardTemplate::Kanban);
        assert!(cfg.wizard.toggle_default(WorkspaceToggle::DocsSpace));
        assert!(cfg.members.is_empty());
    }

    #[test]
    fn partial_toggle_map_defaults_missing_to_enabled() {
        let yaml = "platform:\n  name: p\nwizard:\n  default_toggles:\n    whiteboard: false\n";
        let cfg: Config = serde_yaml::from_str(yaml).unwrap();
        assert!(!cfg.wizard.toggle_default(WorkspaceToggle::Whiteboard));
        assert!(cfg.wizard.toggle_default(WorkspaceToggle::Chat));
    }

    #[test]
    fn load_missing_is_not_initialized() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            Config::load(dir.path()),
            Err(HatchError::NotInitialized)
        ));
    }

    #[test]
    fn save_then_load() {
        let dir = TempDir::new().unwrap();
        let mut cfg = Config::new("p");
        cfg.members.push(Member {
            id: "user1".to_string(),
            display_name: "Ada Lovelace".to_string(),
        });
        cfg.save(dir.path()).unwrap();

        let loaded = Config::load(dir.path()).unwrap();
        assert_eq!(loaded.member("user1").unwrap().display_name, "Ada Lovelace");
    }

    #[test]
    fn validate_valid_config_no_warnings() {
        let cfg = Config::new("p");
        assert!(cfg.validate().is_empty());
    }

    #[test]
    fn validate_duplicate_role() {
        let mut cfg = Config::new("p");
        cfg.wizard.roles.push("lead".to_string());
        let warnings = cfg.validate();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].level, WarnLevel::Error);
        assert!(warnings[0].message.contains("duplicate role 'lead'"));
    }

    #[test]
    fn validate_champion_role_missing() {
        let mut cfg = Config::new("p");
        cfg.wizard.champion_role = "captain".to_string();
        let warnings = cfg.validate();
        assert!(warnings
            .iter()
            .any(|w| w.message.contains("champion_role 'captain'")));
    }

    #[test]
    fn validate_empty_roles() {
        let mut cfg = Config::new("p");
        cfg.wizard.roles.clear();
        let warnings = cfg.validate();
        assert!(warnings.iter().any(|w| w.level == WarnLevel::Error));
    }
}
