use serde::{Deserialize, Serialize};

/// Account role used for RBAC.
///
/// The wire form is the upper snake case name (`"SYSTEM_ENGINEER"`), which is
/// what ends up in the `role` claim of a session token.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Employee,
    Manager,
    SystemEngineer,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Employee, Role::Manager, Role::SystemEngineer];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Employee => "EMPLOYEE",
            Role::Manager => "MANAGER",
            Role::SystemEngineer => "SYSTEM_ENGINEER",
        }
    }

    const fn bit(self) -> u8 {
        match self {
            Role::Employee => 0b001,
            Role::Manager => 0b010,
            Role::SystemEngineer => 0b100,
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compact set of roles (one bit per role).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct RoleSet(u8);

impl RoleSet {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub fn of(roles: &[Role]) -> Self {
        roles.iter().fold(Self::empty(), |set, r| set.with(*r))
    }

    pub const fn with(self, role: Role) -> Self {
        Self(self.0 | role.bit())
    }

    pub const fn contains(&self, role: Role) -> bool {
        self.0 & role.bit() != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_name_round_trips_through_serde() {
        let json = serde_json::to_string(&Role::SystemEngineer).unwrap();
        assert_eq!(json, "\"SYSTEM_ENGINEER\"");

        let role: Role = serde_json::from_str("\"MANAGER\"").unwrap();
        assert_eq!(role, Role::Manager);
    }

    #[test]
    fn deserialize_rejects_unknown_and_lowercase_names() {
        assert!(serde_json::from_str::<Role>("\"employee\"").is_err());
        assert!(serde_json::from_str::<Role>("\"ADMIN\"").is_err());
    }

    #[test]
    fn role_set_membership() {
        let set = RoleSet::of(&[Role::Manager, Role::SystemEngineer]);
        assert!(!set.contains(Role::Employee));
        assert!(set.contains(Role::Manager));
        assert!(set.contains(Role::SystemEngineer));

        let empty = RoleSet::empty();
        assert!(Role::ALL.into_iter().all(|r| !empty.contains(r)));
        assert_eq!(RoleSet::of(&Role::ALL), empty.with(Role::Employee).with(Role::Manager).with(Role::SystemEngineer));
    }
}
