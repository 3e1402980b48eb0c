//! Role: the namespace a handler lives in.

use serde::{Deserialize, Serialize};

/// Classification of a capability contract.
///
/// Every contract carries exactly one role, and the role decides which of the
/// three dispatch namespaces its handlers are registered in. Messages have no
/// role of their own: they are matched by type only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Inbound events ("messages" that expect no reply).
    Event,
    Request,
    Response,
}

impl Role {
    /// All roles in lookup priority order.
    pub const ALL: [Role; 3] = [Role::Event, Role::Request, Role::Response];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Event => "event",
            Role::Request => "request",
            Role::Response => "response",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
