use derive_more::Display;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UserRole {
    #[default]
    #[display("user")]
    User,
    #[display("guide")]
    Guide,
    #[display("lead-guide")]
    LeadGuide,
    #[display("admin")]
    Admin,
}

impl UserRole {
    pub const ALL: [UserRole; 4] = [
        UserRole::User,
        UserRole::Guide,
        UserRole::LeadGuide,
        UserRole::Admin,
    ];

    #[inline]
    pub const fn code(&self) -> &'static str {
        use UserRole::*;
        match self {
            User => "user",
            Guide => "guide",
            LeadGuide => "lead-guide",
            Admin => "admin",
        }
    }

    #[inline]
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|role| role.code() == code)
    }

    #[inline]
    pub const fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }

    /// Guides and lead guides can be attached to tours
    #[inline]
    pub const fn is_guide(&self) -> bool {
        matches!(self, UserRole::Guide | UserRole::LeadGuide)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_role_from_code() {
        assert_eq!(UserRole::from_code("user"), Some(UserRole::User));
        assert_eq!(UserRole::from_code("guide"), Some(UserRole::Guide));
        assert_eq!(UserRole::from_code("lead-guide"), Some(UserRole::LeadGuide));
        assert_eq!(UserRole::from_code("admin"), Some(UserRole::Admin));
        assert_eq!(UserRole::from_code("super_admin"), None);
    }

    #[test]
    fn test_user_role_display_matches_code() {
        for role in UserRole::ALL {
            assert_eq!(role.to_string(), role.code());
        }
    }

    #[test]
    fn test_user_role_serde() {
        assert_eq!(
            serde_json::to_string(&UserRole::LeadGuide).unwrap(),
            "\"lead-guide\""
        );
        let role: UserRole = serde_json::from_str("\"guide\"").unwrap();
        assert_eq!(role, UserRole::Guide);
    }

    #[test]
    fn test_user_role_checks() {
        assert!(UserRole::Admin.is_admin());
        assert!(!UserRole::LeadGuide.is_admin());
        assert!(UserRole::Guide.is_guide());
        assert!(UserRole::LeadGuide.is_guide());
        assert!(!UserRole::User.is_guide());
    }
}
