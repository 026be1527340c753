/// Security policy actions a user account can be subscribed to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SecurityPolicyAction {
    /// The subscribed owner controls the required signer of its packages.
    ControlRequiredSigner,
    /// The subscriber may overwrite a required signer set by somebody else.
    OverwriteRequiredSigner,
}

impl SecurityPolicyAction {
    pub fn policy_name(&self) -> &'static str {
        match self {
            Self::ControlRequiredSigner => "ControlRequiredSignerPolicy",
            Self::OverwriteRequiredSigner => "OverwriteRequiredSignerPolicy",
        }
    }
}

/// Subscription lookup, answered by the surrounding gallery.
pub trait SecurityPolicyService: Send + Sync {
    fn is_subscribed(&self, user_id: i32, policy_name: &str) -> bool;
}

/// A policy service which has no subscriptions at all.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoPolicies;

impl SecurityPolicyService for NoPolicies {
    fn is_subscribed(&self, _user_id: i32, _policy_name: &str) -> bool {
        false
    }
}

/// A fixed, in-memory subscription table.
#[derive(Clone, Debug, Default)]
pub struct StaticPolicyService {
    subscriptions: Vec<(i32, &'static str)>,
}

impl StaticPolicyService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(mut self, user_id: i32, action: SecurityPolicyAction) -> Self {
        self.subscriptions.push((user_id, action.policy_name()));
        self
    }
}

impl SecurityPolicyService for StaticPolicyService {
    fn is_subscribed(&self, user_id: i32, policy_name: &str) -> bool {
        self.subscriptions
            .iter()
            .any(|(id, name)| *id == user_id && *name == policy_name)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn policy_names() {
        assert_eq!(
            SecurityPolicyAction::ControlRequiredSigner.policy_name(),
            "ControlRequiredSignerPolicy"
        );
        assert_eq!(
            SecurityPolicyAction::OverwriteRequiredSigner.policy_name(),
            "OverwriteRequiredSignerPolicy"
        );
    }

    #[test]
    fn subscriptions() {
        let policies = StaticPolicyService::new()
            .subscribe(1, SecurityPolicyAction::ControlRequiredSigner);

        assert!(policies.is_subscribed(1, "ControlRequiredSignerPolicy"));
        assert!(!policies.is_subscribed(1, "OverwriteRequiredSignerPolicy"));
        assert!(!policies.is_subscribed(2, "ControlRequiredSignerPolicy"));
        assert!(!NoPolicies.is_subscribed(1, "ControlRequiredSignerPolicy"));
    }
}
