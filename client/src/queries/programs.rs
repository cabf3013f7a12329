use serde::{Deserialize, Serialize};

use super::{BooleanFilter, Status, StringFilter, UuidExclusiveFilter, UuidFilter};
use crate::connection::ConnectionFilter;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramFilter {
    pub id: Option<UuidFilter>,
    pub name: Option<StringFilter>,
    pub status: Option<StringFilter>,
    pub system: Option<BooleanFilter>,
    pub organization_id: Option<UuidExclusiveFilter>,
    pub grade_id: Option<UuidFilter>,
    pub subject_id: Option<UuidFilter>,
    pub school_id: Option<UuidExclusiveFilter>,
    pub class_id: Option<UuidFilter>,
    #[serde(rename = "AND")]
    pub and: Option<Vec<ProgramFilter>>,
    #[serde(rename = "OR")]
    pub or: Option<Vec<ProgramFilter>>,
}

impl ConnectionFilter for ProgramFilter {
    const FILTER_TYPE: &'static str = "ProgramFilter";
    const CONNECTION_NAME: &'static str = "programsConnection";
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramNode {
    pub id: String,
    pub name: String,
    pub status: Status,
    pub system: bool,
}

pub const PROGRAM_NODE_FIELD: &str = "programNode";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        connection::{ConnectionPage, connection_query},
        encoding::{encode_literal, encode_selection},
    };

    #[test]
    fn organization_programs_query() {
        let filter = ProgramFilter {
            status: Some(StringFilter::status(Status::Active)),
            or: Some(vec![
                ProgramFilter {
                    organization_id: Some(UuidExclusiveFilter::eq("org-1")),
                    ..Default::default()
                },
                ProgramFilter {
                    system: Some(BooleanFilter::eq(true)),
                    ..Default::default()
                },
            ]),
            ..Default::default()
        };

        let query = connection_query(
            ProgramFilter::CONNECTION_NAME,
            &encode_literal(&filter).unwrap(),
            &encode_selection::<ConnectionPage<ProgramNode>>().unwrap(),
        );

        insta::assert_snapshot!(query, @r#"
        query($direction:ConnectionDirection!, $cursor:String!, $count:PageSize){
          programsConnection(direction:$direction, directionArgs:{cursor:$cursor count:$count}, filter:{status:{operator:eq,value:"active"},OR:[{organizationId:{operator:eq,value:"org-1"}},{system:{operator:eq,value:true}}]}, sort:{field:id,order:ASC}) {
        totalCount
        pageInfo {
          hasNextPage
          hasPreviousPage
          startCursor
          endCursor
        }
        edges {
          cursor
          node {
            id
            name
            status
            system
          }
        }
          }
        }
        "#);
    }
}
