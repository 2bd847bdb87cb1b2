//! Organization policy configuration.

use serde::{Deserialize, Serialize};

/// What happens when an admin invites someone who is already a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReinvitePolicy {
    /// Overwrite the existing role and refresh `joined_at`.
    #[default]
    UpdateRole,
    /// Fail with `ALREADY_MEMBER`.
    Reject,
}

/// Organization policy settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizationsConfig {
    /// Whether newly synced users may create organizations.
    #[serde(default = "default_true")]
    pub default_can_create: bool,
    /// Behavior of `add_member` for existing members.
    #[serde(default)]
    pub reinvite_policy: ReinvitePolicy,
    /// Name of the bootstrap organization when the first user has no display name.
    #[serde(default = "default_bootstrap_name")]
    pub bootstrap_name: String,
    /// Type of the bootstrap organization.
    #[serde(default = "default_bootstrap_type")]
    pub bootstrap_type: String,
}

impl Default for OrganizationsConfig {
    fn default() -> Self {
        Self {
            default_can_create: true,
            reinvite_policy: ReinvitePolicy::default(),
            bootstrap_name: default_bootstrap_name(),
            bootstrap_type: default_bootstrap_type(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_bootstrap_name() -> String {
    "Default Organization".to_string()
}

fn default_bootstrap_type() -> String {
    "team".to_string()
}
