use flexsearch_core::error::{FlexsearchError, Result};
use flexsearch_core::models::{ResultSet, SearchRequest};
use flexsearch_llm::Embedder;
use flexsearch_store::ports::{KnnQuery, SearchIndex};
use tracing::{debug, warn};

use crate::session::IndexTarget;

/// Answers free-text queries with a k-NN search over the vector field
pub struct Searcher<S, E>
where
    S: SearchIndex,
    E: Embedder,
{
    store: S,
    embedder: E,
}

impl<S, E> Searcher<S, E>
where
    S: SearchIndex,
    E: Embedder,
{
    /// Create a new searcher
    pub fn new(store: S, embedder: E) -> Self {
        Self { store, embedder }
    }

    /// Run a search request against `target`
    ///
    /// The request must carry a non-empty projection; see
    /// [`crate::Session::prepare_request`] for the default one.
    pub async fn search(&self, target: &IndexTarget, request: &SearchRequest) -> Result<ResultSet> {
        request.validate().map_err(FlexsearchError::search)?;
        if request.fields.is_empty() {
            return Err(FlexsearchError::search("no fields selected for display"));
        }

        let vector = self.embedder.encode(&request.query).await?;
        self.check_index(target, vector.len()).await?;

        let query = KnnQuery {
            field: target.vector_field.clone(),
            vector,
            k: request.top_k,
            num_candidates: request.num_candidates,
            source: request.fields.clone(),
        };

        let mut hits = self.store.knn_search(&target.index, &query).await?;
        hits.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        hits.truncate(request.top_k);

        debug!(index = %target.index, hits = hits.len(), "search finished");

        Ok(ResultSet::from_sources(
            request.query.clone(),
            request.fields.clone(),
            hits.into_iter().map(|hit| (hit.id, hit.score, hit.source)),
        ))
    }

    /// Reject searches whose query vector cannot match the stored vectors
    async fn check_index(&self, target: &IndexTarget, dims: usize) -> Result<()> {
        let info = self.store.index_info(&target.index).await?.ok_or_else(|| {
            FlexsearchError::search(format!("index '{}' does not exist", target.index))
        })?;

        if let Some(expected) = info.dimensions {
            if expected != dims {
                return Err(FlexsearchError::DimensionMismatch {
                    index: target.index.clone(),
                    expected,
                    actual: dims,
                });
            }
        }

        if let Some(model) = info.model.as_deref() {
            if model != self.embedder.model_name() {
                warn!(
                    index = %target.index,
                    indexed_with = %model,
                    query_model = %self.embedder.model_name(),
                    "index was built with a different embedding model"
                );
            }
        }

        Ok(())
    }
}
