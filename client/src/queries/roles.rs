use serde::{Deserialize, Serialize};

use super::{BooleanFilter, Status, StringFilter, UuidExclusiveFilter, UuidFilter};
use crate::connection::{ConnectionFilter, NestedConnection};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleFilter {
    pub id: Option<UuidFilter>,
    pub name: Option<StringFilter>,
    pub status: Option<StringFilter>,
    pub system: Option<BooleanFilter>,
    pub organization_id: Option<UuidExclusiveFilter>,
    #[serde(rename = "AND")]
    pub and: Option<Vec<RoleFilter>>,
    #[serde(rename = "OR")]
    pub or: Option<Vec<RoleFilter>>,
}

impl ConnectionFilter for RoleFilter {
    const FILTER_TYPE: &'static str = "RoleFilter";
    const CONNECTION_NAME: &'static str = "rolesConnection";
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleNode {
    pub id: String,
    pub name: Option<String>,
    pub status: Status,
    pub system: bool,
    pub description: Option<String>,
}

pub const ROLE_NODE_FIELD: &str = "roleNode";

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionFilter {
    pub name: Option<StringFilter>,
    pub allow: Option<BooleanFilter>,
    pub role_id: Option<UuidFilter>,
    #[serde(rename = "AND")]
    pub and: Option<Vec<PermissionFilter>>,
    #[serde(rename = "OR")]
    pub or: Option<Vec<PermissionFilter>>,
}

impl ConnectionFilter for PermissionFilter {
    const FILTER_TYPE: &'static str = "PermissionFilter";
    const CONNECTION_NAME: &'static str = "permissionsConnection";
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionNode {
    pub id: Option<String>,
    pub name: String,
    pub category: Option<String>,
    pub group: Option<String>,
    pub level: Option<String>,
    pub description: Option<String>,
    pub allow: bool,
}

/// Permissions granted by a role, filtered with a [`PermissionFilter`].
pub const ROLE_PERMISSIONS: NestedConnection = NestedConnection {
    parent_field: ROLE_NODE_FIELD,
    connection_name: "permissionsConnection",
};
