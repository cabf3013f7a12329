use std::collections::HashMap;

use serde::de::DeserializeOwned;

use super::{AmsClient, GraphQlRequest};
use crate::{
    connection::{alias, batch_query},
    encoding::encode_selection,
    errors::{AmsClientError, ErrorKind, Result},
    operator::Operator,
};

/// Deduplicates `ids` keeping first-occurrence order.
///
/// Returns the unique ids and, for every input position, the index of its id among them.
pub(crate) fn dedup_ids<S: AsRef<str>>(ids: &[S]) -> (Vec<String>, Vec<usize>) {
    let mut positions: HashMap<&str, usize> = HashMap::with_capacity(ids.len());
    let mut unique = Vec::new();
    let mut mapping = Vec::with_capacity(ids.len());

    for id in ids {
        let id = id.as_ref();
        let position = *positions.entry(id).or_insert_with(|| {
            unique.push(id.to_owned());
            unique.len() - 1
        });
        mapping.push(position);
    }

    (unique, mapping)
}

impl AmsClient {
    /// Looks up every id through the single-node field `node_field` in one round trip.
    ///
    /// The output has one entry per input id, in input order; repeated ids yield clones of the
    /// same node. An id the AMS does not return fails the whole call with
    /// [`ErrorKind::NotFound`].
    #[tracing::instrument(level = "debug", skip_all, fields(node_field = %node_field, ids = ids.len(), user_id = %operator.user_id))]
    pub async fn batch_get<N, S>(&self, operator: &Operator, node_field: &str, ids: &[S]) -> Result<Vec<N>>
    where
        N: DeserializeOwned + Clone,
        S: AsRef<str>,
    {
        let (unique_ids, index_mapping) = dedup_ids(ids);
        let nodes = self.fetch_unique::<N>(operator, node_field, &unique_ids).await?;

        Ok(index_mapping.into_iter().map(|i| nodes[i].clone()).collect())
    }

    /// Like [`AmsClient::batch_get`] but keyed by id, one entry per distinct id.
    #[tracing::instrument(level = "debug", skip_all, fields(node_field = %node_field, ids = ids.len(), user_id = %operator.user_id))]
    pub async fn batch_get_map<N, S>(&self, operator: &Operator, node_field: &str, ids: &[S]) -> Result<HashMap<String, N>>
    where
        N: DeserializeOwned,
        S: AsRef<str>,
    {
        let (unique_ids, _) = dedup_ids(ids);
        let nodes = self.fetch_unique::<N>(operator, node_field, &unique_ids).await?;

        Ok(unique_ids.into_iter().zip(nodes).collect())
    }

    /// Fetches `unique_ids` in order, `unique_ids[i]` under alias `q<i>`.
    async fn fetch_unique<N: DeserializeOwned>(
        &self,
        operator: &Operator,
        node_field: &str,
        unique_ids: &[String],
    ) -> Result<Vec<N>> {
        if unique_ids.is_empty() {
            return Ok(Vec::new());
        }

        let selection = encode_selection::<N>()?;
        let mut request = GraphQlRequest::new(batch_query(node_field, unique_ids.len(), &selection));
        for (i, id) in unique_ids.iter().enumerate() {
            request = request.variable(format!("id{i}"), id)?;
        }

        let mut data: HashMap<String, Option<N>> = self.execute(operator, node_field, request).await?;

        unique_ids
            .iter()
            .enumerate()
            .map(|(i, id)| {
                data.remove(&alias(i)).flatten().ok_or_else(|| {
                    tracing::error!(%id, alias = %alias(i), node_field, "AMS returned no node for id");
                    AmsClientError::from(ErrorKind::NotFound(id.clone()))
                })
            })
            .collect()
    }
}
