use crate::policy::{SecurityPolicyAction, SecurityPolicyService};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A user account eligible to sign, with its number of active certificates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signer {
    pub id: i32,
    pub username: String,
    pub active_certificates: u64,
}

impl Signer {
    /// Render the signer as a selectable option.
    pub fn option(&self) -> SignerOption {
        SignerOption {
            id: Some(self.id),
            username: Some(self.username.clone()),
            display_text: format!(
                "{} ({} certificate{})",
                self.username,
                self.active_certificates,
                if self.active_certificates == 1 { "" } else { "s" }
            ),
        }
    }
}

/// A selectable signer entry.
///
/// The "Any" sentinel carries no identity, any owner may sign then.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct SignerOption {
    pub id: Option<i32>,
    pub username: Option<String>,
    pub display_text: String,
}

impl SignerOption {
    pub fn any() -> Self {
        Self {
            id: None,
            username: None,
            display_text: "Any".into(),
        }
    }
}

/// The required-signer controls of one package registration, as presented to
/// one viewer.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct RequiredSignerProjection {
    /// The currently designated signer, if one is configured.
    pub required_signer: Option<SignerOption>,
    /// Tells a locked-out owner who manages the signing owner.
    pub message: Option<String>,
    /// The choices offered to the viewer.
    pub options: Vec<SignerOption>,
    /// Whether the controls are rendered at all.
    pub shown: bool,
    /// Whether the viewer may change the designated signer.
    pub editable: bool,
}

impl RequiredSignerProjection {
    /// Compute the controls for `viewer`.
    ///
    /// `owners` carries the registration's owners in presentation order,
    /// `required_signer` the designated signer, if any. The policy service
    /// answers `ControlRequiredSignerPolicy` subscription checks.
    pub fn compute(
        owners: &[Signer],
        required_signer: Option<&Signer>,
        viewer: &Signer,
        policy: &dyn SecurityPolicyService,
    ) -> Self {
        let required = required_signer.map(Signer::option);
        let viewer_is_owner = owners.iter().any(|owner| owner.id == viewer.id);

        if owners.len() <= 1 {
            return match required_signer {
                None => Self::hidden(required),
                Some(signer) if signer.id == viewer.id => Self::hidden(required),
                Some(signer) if viewer_is_owner => Self {
                    options: vec![signer.option(), viewer.option()],
                    required_signer: required,
                    message: None,
                    shown: true,
                    editable: true,
                },
                Some(signer) => Self {
                    options: vec![signer.option()],
                    required_signer: required,
                    message: None,
                    shown: false,
                    editable: false,
                },
            };
        }

        let control = SecurityPolicyAction::ControlRequiredSigner.policy_name();
        let viewer_has_control = policy.is_subscribed(viewer.id, control);
        let no_owner_has_control = !owners
            .iter()
            .any(|owner| policy.is_subscribed(owner.id, control));

        if viewer_is_owner && (viewer_has_control || no_owner_has_control) {
            let options = std::iter::once(SignerOption::any())
                .chain(owners.iter().map(Signer::option))
                .collect();

            Self {
                required_signer: required,
                message: None,
                options,
                shown: true,
                editable: true,
            }
        } else {
            let message = if viewer_is_owner {
                let controllers = owners
                    .iter()
                    .filter(|owner| policy.is_subscribed(owner.id, control))
                    .map(|owner| owner.username.as_str())
                    .collect::<Vec<_>>();

                management_message(&controllers)
            } else {
                None
            };

            Self {
                options: vec![required.clone().unwrap_or_else(SignerOption::any)],
                required_signer: required,
                message,
                shown: true,
                editable: false,
            }
        }
    }

    fn hidden(required_signer: Option<SignerOption>) -> Self {
        Self {
            required_signer,
            message: None,
            options: Vec::new(),
            shown: false,
            editable: false,
        }
    }
}

/// Name the owners controlling the signing owner, oxford style.
fn management_message(controllers: &[&str]) -> Option<String> {
    let mut message = String::from("The signing owner is managed by the ");

    match controllers {
        [] => return None,
        [only] => message.push_str(&format!("'{only}' account.")),
        [first, second] => message.push_str(&format!("'{first}' and '{second}' accounts.")),
        [rest @ .., last] => {
            for name in rest {
                message.push_str(&format!("'{name}', "));
            }
            message.push_str(&format!("and '{last}' accounts."));
        }
    }

    Some(message)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::policy::{NoPolicies, StaticPolicyService};

    fn signer(id: i32, username: &str, active_certificates: u64) -> Signer {
        Signer {
            id,
            username: username.into(),
            active_certificates,
        }
    }

    #[test]
    fn label_pluralization() {
        assert_eq!(
            signer(1, "alice", 0).option().display_text,
            "alice (0 certificates)"
        );
        assert_eq!(
            signer(1, "alice", 1).option().display_text,
            "alice (1 certificate)"
        );
        assert_eq!(
            signer(1, "alice", 2).option().display_text,
            "alice (2 certificates)"
        );
    }

    #[test]
    fn any_sentinel() {
        let any = SignerOption::any();
        assert_eq!(any.id, None);
        assert_eq!(any.username, None);
        assert_eq!(any.display_text, "Any");
    }

    #[test]
    fn sole_owner_without_required_signer() {
        let alice = signer(1, "alice", 1);

        let projection =
            RequiredSignerProjection::compute(&[alice.clone()], None, &alice, &NoPolicies);

        assert_eq!(projection.required_signer, None);
        assert_eq!(projection.message, None);
        assert!(projection.options.is_empty());
        assert!(!projection.shown);
        assert!(!projection.editable);
    }

    #[test]
    fn required_signer_is_the_viewer() {
        let alice = signer(1, "alice", 1);
        let bob = signer(2, "bob", 0);

        // hidden even when the viewer does not own the package
        let projection =
            RequiredSignerProjection::compute(&[bob], Some(&alice), &alice, &NoPolicies);

        assert!(projection.options.is_empty());
        assert!(!projection.shown);
        assert!(!projection.editable);
    }

    #[test]
    fn sole_owner_with_foreign_required_signer() {
        let alice = signer(1, "alice", 1);
        let bob = signer(2, "bob", 3);

        let projection = RequiredSignerProjection::compute(
            &[alice.clone()],
            Some(&bob),
            &alice,
            &NoPolicies,
        );

        assert_eq!(
            projection.options,
            vec![bob.option(), alice.option()],
        );
        assert_eq!(projection.required_signer, Some(bob.option()));
        assert!(projection.shown);
        assert!(projection.editable);
    }

    #[test]
    fn outsider_viewing_a_single_owner_package() {
        let alice = signer(1, "alice", 1);
        let bob = signer(2, "bob", 0);
        let carol = signer(3, "carol", 0);

        let projection =
            RequiredSignerProjection::compute(&[alice.clone()], Some(&bob), &carol, &NoPolicies);

        assert_eq!(projection.options, vec![bob.option()]);
        assert!(!projection.shown);
        assert!(!projection.editable);
    }

    #[test]
    fn ownerless_registration() {
        let alice = signer(1, "alice", 1);

        let projection = RequiredSignerProjection::compute(&[], None, &alice, &NoPolicies);

        assert!(projection.options.is_empty());
        assert!(!projection.shown);
        assert!(!projection.editable);
    }

    #[test]
    fn co_owners_without_policies_can_edit() {
        let alice = signer(1, "alice", 1);
        let bob = signer(2, "bob", 2);

        let projection = RequiredSignerProjection::compute(
            &[alice.clone(), bob.clone()],
            None,
            &alice,
            &NoPolicies,
        );

        assert!(projection.shown);
        assert!(projection.editable);
        assert_eq!(
            projection.options,
            vec![SignerOption::any(), alice.option(), bob.option()],
        );
        assert_eq!(projection.message, None);
    }

    #[test]
    fn controlling_viewer_can_edit() {
        let alice = signer(1, "alice", 1);
        let bob = signer(2, "bob", 2);
        let policies = StaticPolicyService::new()
            .subscribe(1, SecurityPolicyAction::ControlRequiredSigner)
            .subscribe(2, SecurityPolicyAction::ControlRequiredSigner);

        let projection = RequiredSignerProjection::compute(
            &[alice.clone(), bob.clone()],
            Some(&bob),
            &alice,
            &policies,
        );

        assert!(projection.editable);
        assert_eq!(
            projection.options,
            vec![SignerOption::any(), alice.option(), bob.option()],
        );
    }

    #[test]
    fn locked_out_owner_sees_the_designated_signer() {
        let alice = signer(1, "alice", 1);
        let bob = signer(2, "bob", 2);
        let policies =
            StaticPolicyService::new().subscribe(2, SecurityPolicyAction::ControlRequiredSigner);

        let projection = RequiredSignerProjection::compute(
            &[alice.clone(), bob.clone()],
            Some(&bob),
            &alice,
            &policies,
        );

        assert!(projection.shown);
        assert!(!projection.editable);
        assert_eq!(projection.options, vec![bob.option()]);
        assert_eq!(
            projection.message.as_deref(),
            Some("The signing owner is managed by the 'bob' account."),
        );
    }

    #[test]
    fn locked_out_owner_without_designated_signer_gets_any() {
        let alice = signer(1, "alice", 1);
        let bob = signer(2, "bob", 2);
        let policies =
            StaticPolicyService::new().subscribe(2, SecurityPolicyAction::ControlRequiredSigner);

        let projection = RequiredSignerProjection::compute(
            &[alice.clone(), bob.clone()],
            None,
            &alice,
            &policies,
        );

        assert!(!projection.editable);
        assert_eq!(projection.options, vec![SignerOption::any()]);
    }

    #[test]
    fn outsider_viewing_a_co_owned_package() {
        let alice = signer(1, "alice", 1);
        let bob = signer(2, "bob", 2);
        let carol = signer(3, "carol", 0);
        let policies =
            StaticPolicyService::new().subscribe(2, SecurityPolicyAction::ControlRequiredSigner);

        let projection = RequiredSignerProjection::compute(
            &[alice.clone(), bob.clone()],
            Some(&bob),
            &carol,
            &policies,
        );

        assert!(projection.shown);
        assert!(!projection.editable);
        assert_eq!(projection.options, vec![bob.option()]);
        // only owners are told who manages the signing owner
        assert_eq!(projection.message, None);
    }

    #[test]
    fn management_message_join_rule() {
        let alice = signer(1, "alice", 0);
        let bob = signer(2, "bob", 0);
        let carol = signer(3, "carol", 0);
        let dave = signer(4, "dave", 0);

        let policies = StaticPolicyService::new()
            .subscribe(2, SecurityPolicyAction::ControlRequiredSigner)
            .subscribe(3, SecurityPolicyAction::ControlRequiredSigner)
            .subscribe(4, SecurityPolicyAction::ControlRequiredSigner);

        let projection = RequiredSignerProjection::compute(
            &[alice.clone(), bob.clone()],
            None,
            &alice,
            &policies,
        );
        assert_eq!(
            projection.message.as_deref(),
            Some("The signing owner is managed by the 'bob' account."),
        );

        let projection = RequiredSignerProjection::compute(
            &[alice.clone(), bob.clone(), carol.clone()],
            None,
            &alice,
            &policies,
        );
        assert_eq!(
            projection.message.as_deref(),
            Some("The signing owner is managed by the 'bob' and 'carol' accounts."),
        );

        let projection = RequiredSignerProjection::compute(
            &[alice.clone(), bob, carol, dave],
            None,
            &alice,
            &policies,
        );
        assert_eq!(
            projection.message.as_deref(),
            Some("The signing owner is managed by the 'bob', 'carol', and 'dave' accounts."),
        );
    }
}
