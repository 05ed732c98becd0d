use chrono::Weekday;
use maintenance_environment::MonthRef;
use serde::Deserialize;
use serde::Serialize;

use crate::permissions::Action;
use crate::permissions::PermissionGrant;
use crate::permissions::PermissionSet;

pub const DEFAULT_SERVICE: &str = "maintenance";
pub const DEFAULT_PREVIEW_LEN: usize = 3;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig
{
    /// Work orders listed under each technician before "+N more".
    pub preview_len: usize,
    pub week_start: Weekday,
    /// Service name used for every permission check.
    pub service: String,
    pub grants: Vec<PermissionGrant>,
    pub initial_month: Option<MonthRef>,
}

impl BoardConfig
{
    pub fn permissions(&self) -> PermissionSet
    {
        PermissionSet::new(self.grants.iter().cloned())
    }
}

impl Default for BoardConfig
{
    fn default() -> Self
    {
        Self {
            preview_len: DEFAULT_PREVIEW_LEN,
            week_start: Weekday::Mon,
            service: DEFAULT_SERVICE.to_string(),
            grants: vec![PermissionGrant::new(DEFAULT_SERVICE, "*", Action::View)],
            initial_month: None,
        }
    }
}
