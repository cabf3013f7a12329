use serde::{Deserialize, Serialize};

use super::{Status, StringFilter, UuidFilter};
use crate::connection::ConnectionFilter;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationFilter {
    pub id: Option<UuidFilter>,
    pub name: Option<StringFilter>,
    pub status: Option<StringFilter>,
    pub owner_user_id: Option<UuidFilter>,
    pub user_id: Option<UuidFilter>,
    #[serde(rename = "AND")]
    pub and: Option<Vec<OrganizationFilter>>,
    #[serde(rename = "OR")]
    pub or: Option<Vec<OrganizationFilter>>,
}

impl ConnectionFilter for OrganizationFilter {
    const FILTER_TYPE: &'static str = "OrganizationFilter";
    const CONNECTION_NAME: &'static str = "organizationsConnection";
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationNode {
    pub id: String,
    pub name: Option<String>,
    pub status: Status,
    pub short_code: Option<String>,
}

pub const ORGANIZATION_NODE_FIELD: &str = "organizationNode";
