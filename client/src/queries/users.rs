use serde::{Deserialize, Serialize};

use super::{Status, StringFilter, UuidExclusiveFilter, UuidFilter};
use crate::connection::ConnectionFilter;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserFilter {
    pub user_id: Option<UuidFilter>,
    pub given_name: Option<StringFilter>,
    pub family_name: Option<StringFilter>,
    pub email: Option<StringFilter>,
    pub phone: Option<StringFilter>,
    pub user_status: Option<StringFilter>,
    pub organization_id: Option<UuidFilter>,
    pub organization_user_status: Option<StringFilter>,
    pub role_id: Option<UuidFilter>,
    pub school_id: Option<UuidExclusiveFilter>,
    pub class_id: Option<UuidExclusiveFilter>,
    #[serde(rename = "AND")]
    pub and: Option<Vec<UserFilter>>,
    #[serde(rename = "OR")]
    pub or: Option<Vec<UserFilter>>,
}

impl ConnectionFilter for UserFilter {
    const FILTER_TYPE: &'static str = "UserFilter";
    const CONNECTION_NAME: &'static str = "usersConnection";
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserNode {
    pub id: String,
    pub given_name: Option<String>,
    pub family_name: Option<String>,
    pub status: Status,
    pub contact_info: Option<ContactInfo>,
}

impl UserNode {
    pub fn full_name(&self) -> String {
        [self.given_name.as_deref(), self.family_name.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ")
    }
}

pub const USER_NODE_FIELD: &str = "userNode";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_name_skips_missing_parts() {
        let mut user = UserNode {
            id: "u1".into(),
            given_name: Some("Ada".into()),
            family_name: Some("Lovelace".into()),
            status: Status::Active,
            contact_info: None,
        };
        assert_eq!(user.full_name(), "Ada Lovelace");

        user.given_name = None;
        assert_eq!(user.full_name(), "Lovelace");
    }
}
