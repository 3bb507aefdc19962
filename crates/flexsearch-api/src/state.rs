use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use flexsearch_core::config::LayeredConfig;
use flexsearch_core::error::FlexsearchError;
use flexsearch_llm::{build_embedder, Embedder, EmbeddingModel};
use flexsearch_retrieval::{IndexTarget, Session};
use flexsearch_store::{ElasticsearchConfig, ElasticsearchIndex, SearchIndex};
use uuid::Uuid;

use crate::error::ApiError;

/// Values a new session starts from
#[derive(Debug, Clone)]
pub struct SessionDefaults {
    pub model: EmbeddingModel,
    pub target: IndexTarget,
    pub top_k: usize,
    pub num_candidates: usize,
}

impl Default for SessionDefaults {
    fn default() -> Self {
        Self {
            model: EmbeddingModel::default(),
            target: IndexTarget::new("user_uploaded_data", "DescriptionVector"),
            top_k: 10,
            num_candidates: 500,
        }
    }
}

pub struct AppState {
    pub store: Arc<dyn SearchIndex>,
    pub defaults: SessionDefaults,
    embedders: HashMap<EmbeddingModel, Arc<dyn Embedder>>,
    sessions: RwLock<HashMap<Uuid, Session>>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn SearchIndex>,
        embedders: HashMap<EmbeddingModel, Arc<dyn Embedder>>,
        defaults: SessionDefaults,
    ) -> Self {
        Self { store, defaults, embedders, sessions: RwLock::new(HashMap::new()) }
    }

    /// Elasticsearch store and one embedder per supported model
    pub fn from_settings(settings: &LayeredConfig) -> Result<Self, FlexsearchError> {
        let store = ElasticsearchIndex::new(ElasticsearchConfig::from_layered(settings)?)?;

        let embedders = EmbeddingModel::ALL
            .iter()
            .map(|model| {
                let embedder = build_embedder(
                    settings.embedder_provider.value,
                    &settings.embedder_url.value,
                    *model,
                );
                (*model, embedder)
            })
            .collect();

        let defaults = SessionDefaults {
            model: settings.model.value.parse()?,
            target: IndexTarget::from_config(settings),
            top_k: settings.top_k.value,
            num_candidates: settings.num_candidates.value,
        };

        Ok(Self::new(Arc::new(store), embedders, defaults))
    }

    pub fn embedder(&self, model: EmbeddingModel) -> Result<Arc<dyn Embedder>, ApiError> {
        self.embedders.get(&model).cloned().ok_or_else(|| {
            ApiError::bad_request("Model not available").with_details(model.name().to_string())
        })
    }

    pub fn insert_session(&self, session: Session) -> Result<Uuid, ApiError> {
        let id = Uuid::new_v4();
        self.sessions.write().map_err(|_| lock_poisoned())?.insert(id, session);
        Ok(id)
    }

    /// Snapshot of a session; the lock is released before returning
    pub fn session(&self, id: Uuid) -> Result<Session, ApiError> {
        self.sessions
            .read()
            .map_err(|_| lock_poisoned())?
            .get(&id)
            .cloned()
            .ok_or_else(|| session_not_found(id))
    }

    /// Apply `update` to a stored session
    pub fn update_session<T>(
        &self,
        id: Uuid,
        update: impl FnOnce(&mut Session) -> T,
    ) -> Result<T, ApiError> {
        let mut sessions = self.sessions.write().map_err(|_| lock_poisoned())?;
        let session = sessions.get_mut(&id).ok_or_else(|| session_not_found(id))?;
        Ok(update(session))
    }
}

fn session_not_found(id: Uuid) -> ApiError {
    ApiError::not_found("Session not found").with_details(id.to_string())
}

fn lock_poisoned() -> ApiError {
    ApiError::internal("Session store unavailable")
}
