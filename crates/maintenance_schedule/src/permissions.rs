use std::collections::HashSet;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;

pub const ANY_RESOURCE: &str = "*";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action
{
    View,
    Create,
    Edit,
    Delete,
}

impl fmt::Display for Action
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        let action = match self {
            Action::View => "view",
            Action::Create => "create",
            Action::Edit => "edit",
            Action::Delete => "delete",
        };
        f.write_str(action)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PermissionGrant
{
    pub service: String,
    pub resource: String,
    pub action: Action,
}

impl PermissionGrant
{
    pub fn new(service: impl Into<String>, resource: impl Into<String>, action: Action) -> Self
    {
        Self {
            service: service.into(),
            resource: resource.into(),
            action,
        }
    }
}

/// Capability check consulted before every mutating board action.
pub trait PermissionCheck
{
    fn has_permission(&self, service: &str, resource: &str, action: Action) -> bool;
}

impl<F> PermissionCheck for F
where
    F: Fn(&str, &str, Action) -> bool,
{
    fn has_permission(&self, service: &str, resource: &str, action: Action) -> bool
    {
        self(service, resource, action)
    }
}

/// Grants read from configuration. A grant on [`ANY_RESOURCE`] covers
/// every resource of its service.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PermissionSet
{
    grants: HashSet<PermissionGrant>,
}

impl PermissionSet
{
    pub fn new(grants: impl IntoIterator<Item = PermissionGrant>) -> Self
    {
        Self {
            grants: grants.into_iter().collect(),
        }
    }

    /// Every action on every resource of `service`.
    pub fn full_access(service: &str) -> Self
    {
        Self::new(
            [Action::View, Action::Create, Action::Edit, Action::Delete]
                .into_iter()
                .map(|action| PermissionGrant::new(service, ANY_RESOURCE, action)),
        )
    }

    pub fn grant(&mut self, grant: PermissionGrant)
    {
        self.grants.insert(grant);
    }

    pub fn len(&self) -> usize
    {
        self.grants.len()
    }

    pub fn is_empty(&self) -> bool
    {
        self.grants.is_empty()
    }
}

impl PermissionCheck for PermissionSet
{
    fn has_permission(&self, service: &str, resource: &str, action: Action) -> bool
    {
        self.grants
            .iter()
            .any(|grant| grant.service == service && grant.action == action && (grant.resource == resource || grant.resource == ANY_RESOURCE))
    }
}
