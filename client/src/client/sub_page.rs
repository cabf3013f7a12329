use std::collections::HashMap;

use serde::{Serialize, de::DeserializeOwned};

use super::{AmsClient, GraphQlRequest, batch::dedup_ids};
use crate::{
    connection::{
        ConnectionPage, ConnectionPageInfo, ConnectionResponse, Direction, NestedConnection, PagerArgs, alias,
        ensure_progress, has_more, sub_page_query,
    },
    encoding::{encode_literal, encode_selection},
    errors::{AmsClientError, ErrorKind, Result},
    operator::Operator,
};

impl AmsClient {
    /// Pages `nested` under every parent id until each parent is exhausted.
    ///
    /// Every round trip carries one aliased parent per parent that still has pages; a parent
    /// whose connection ended is not queried again. Pages are collected per parent id in fetch
    /// order. A parent the AMS does not return fails the call with [`ErrorKind::NotFound`].
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(parent = nested.parent_field, connection = nested.connection_name, parents = parent_ids.len(), user_id = %operator.user_id)
    )]
    pub async fn sub_page_query<F, R, S>(
        &self,
        operator: &Operator,
        nested: NestedConnection,
        nested_filter: &F,
        parent_ids: &[S],
    ) -> Result<HashMap<String, Vec<R>>>
    where
        F: Serialize,
        R: ConnectionResponse,
        S: AsRef<str>,
    {
        let (parents, _) = dedup_ids(parent_ids);
        let filter_literal = encode_literal(nested_filter)?;
        let selection = encode_selection::<R>()?;

        let mut page_infos: Vec<Option<ConnectionPageInfo>> = vec![None; parents.len()];
        let mut result: HashMap<String, Vec<R>> = parents.iter().map(|id| (id.clone(), Vec::new())).collect();
        let mut round = 0;

        loop {
            let active: Vec<usize> = (0..parents.len())
                .filter(|&i| has_more(page_infos[i].as_ref(), Direction::Forward))
                .collect();
            if active.is_empty() {
                break;
            }

            let query = sub_page_query(
                nested.parent_field,
                nested.connection_name,
                &filter_literal,
                &selection,
                &active,
            );
            let mut request = GraphQlRequest::new(query)
                .variable("direction", Direction::Forward)?
                .variable("count", PagerArgs::next(None, Direction::Forward, self.cfg.page_size).count)?;
            for &i in &active {
                let args = PagerArgs::next(page_infos[i].as_ref(), Direction::Forward, self.cfg.page_size);
                request = request
                    .variable(format!("id{i}"), &parents[i])?
                    .variable(format!("cursor{i}"), args.cursor)?;
            }

            let mut data: HashMap<String, Option<HashMap<String, R>>> =
                self.execute(operator, nested.connection_name, request).await?;

            for &i in &active {
                let page = data
                    .remove(&alias(i))
                    .flatten()
                    .and_then(|mut node| node.remove(nested.connection_name))
                    .ok_or_else(|| {
                        tracing::error!(parent = %parents[i], "AMS returned no parent node");
                        AmsClientError::from(ErrorKind::NotFound(parents[i].clone()))
                    })?;
                ensure_progress(page_infos[i].as_ref(), page.page_info(), Direction::Forward)?;

                page_infos[i] = Some(page.page_info().clone());
                if let Some(pages) = result.get_mut(&parents[i]) {
                    pages.push(page);
                }
            }

            round += 1;
            tracing::debug!(round, active = active.len(), "fetched sub-page round");
        }

        Ok(result)
    }

    /// Runs [`AmsClient::sub_page_query`] and flattens each parent's pages to nodes.
    pub async fn sub_page_nodes<F, N, S>(
        &self,
        operator: &Operator,
        nested: NestedConnection,
        nested_filter: &F,
        parent_ids: &[S],
    ) -> Result<HashMap<String, Vec<N>>>
    where
        F: Serialize,
        N: DeserializeOwned,
        S: AsRef<str>,
    {
        let pages: HashMap<String, Vec<ConnectionPage<N>>> =
            self.sub_page_query(operator, nested, nested_filter, parent_ids).await?;

        Ok(pages
            .into_iter()
            .map(|(parent, pages)| (parent, pages.into_iter().flat_map(ConnectionPage::into_nodes).collect()))
            .collect())
    }
}
