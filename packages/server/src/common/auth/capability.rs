use crate::common::Role;

/// Capabilities in the Caseline platform
///
/// Every mutating moderation action names the capability it requires; the
/// role -> capability mapping below is the single place that grants them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Manage site content (static pages, announcements)
    ManageSiteContent,

    /// Approve, reject or delete investigator profiles
    ModerateInvestigators,

    /// Delete customer accounts
    ModerateCustomers,

    /// Assign and complete investigation requests
    ManageRequests,
}

impl Capability {
    /// Stable wire name, used in audit events and error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::ManageSiteContent => "site.content.manage",
            Capability::ModerateInvestigators => "investigators.moderate",
            Capability::ModerateCustomers => "customers.moderate",
            Capability::ManageRequests => "requests.manage",
        }
    }

    /// Role -> capability table.
    ///
    /// Admins hold every capability; customers and investigators hold none
    /// of the moderation capabilities.
    pub fn granted_to(&self, role: Role) -> bool {
        match role {
            Role::Admin => true,
            Role::Customer | Role::Investigator => false,
        }
    }
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
