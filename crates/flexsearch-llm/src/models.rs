//! Supported sentence-embedding models

use flexsearch_core::error::{FlexsearchError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Closed set of pretrained sentence-embedding models
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmbeddingModel {
    #[serde(rename = "all-mpnet-base-v2")]
    AllMpnetBaseV2,
    #[serde(rename = "distilbert-base-nli-stsb-mean-tokens")]
    DistilbertBaseNliStsbMeanTokens,
    #[serde(rename = "paraphrase-MiniLM-L6-v2")]
    ParaphraseMiniLmL6V2,
    #[serde(rename = "roberta-base-nli-stsb-mean-tokens")]
    RobertaBaseNliStsbMeanTokens,
}

impl EmbeddingModel {
    /// All supported models, default first
    pub const ALL: [EmbeddingModel; 4] = [
        EmbeddingModel::AllMpnetBaseV2,
        EmbeddingModel::DistilbertBaseNliStsbMeanTokens,
        EmbeddingModel::ParaphraseMiniLmL6V2,
        EmbeddingModel::RobertaBaseNliStsbMeanTokens,
    ];

    /// Model name as published
    pub fn name(&self) -> &'static str {
        match self {
            EmbeddingModel::AllMpnetBaseV2 => "all-mpnet-base-v2",
            EmbeddingModel::DistilbertBaseNliStsbMeanTokens => {
                "distilbert-base-nli-stsb-mean-tokens"
            }
            EmbeddingModel::ParaphraseMiniLmL6V2 => "paraphrase-MiniLM-L6-v2",
            EmbeddingModel::RobertaBaseNliStsbMeanTokens => "roberta-base-nli-stsb-mean-tokens",
        }
    }

    /// Length of the vectors this model produces
    pub fn dimensions(&self) -> usize {
        match self {
            EmbeddingModel::ParaphraseMiniLmL6V2 => 384,
            _ => 768,
        }
    }

    /// Names of all supported models
    pub fn names() -> Vec<String> {
        Self::ALL.iter().map(|m| m.name().to_string()).collect()
    }
}

impl Default for EmbeddingModel {
    fn default() -> Self {
        EmbeddingModel::AllMpnetBaseV2
    }
}

impl fmt::Display for EmbeddingModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EmbeddingModel {
    type Err = FlexsearchError;

    fn from_str(s: &str) -> Result<Self> {
        // Accept the hub-qualified form as well, e.g. "sentence-transformers/all-mpnet-base-v2"
        let name = s.trim().rsplit('/').next().unwrap_or(s);
        Self::ALL
            .iter()
            .copied()
            .find(|m| m.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| FlexsearchError::UnknownModel {
                name: s.to_string(),
                available: Self::names(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_models() {
        for model in EmbeddingModel::ALL {
            assert_eq!(model.name().parse::<EmbeddingModel>().unwrap(), model);
        }
        assert_eq!(
            "sentence-transformers/paraphrase-MiniLM-L6-v2".parse::<EmbeddingModel>().unwrap(),
            EmbeddingModel::ParaphraseMiniLmL6V2
        );
        assert_eq!(
            "ALL-MPNET-BASE-V2".parse::<EmbeddingModel>().unwrap(),
            EmbeddingModel::AllMpnetBaseV2
        );
    }

    #[test]
    fn test_unknown_model_lists_allowed() {
        let err = "text-embedding-3-large".parse::<EmbeddingModel>().unwrap_err();
        let message = err.to_string();
        assert!(message.contains("text-embedding-3-large"));
        assert!(message.contains("all-mpnet-base-v2"));
    }

    #[test]
    fn test_dimensions() {
        assert_eq!(EmbeddingModel::AllMpnetBaseV2.dimensions(), 768);
        assert_eq!(EmbeddingModel::ParaphraseMiniLmL6V2.dimensions(), 384);
        assert_eq!(EmbeddingModel::default(), EmbeddingModel::AllMpnetBaseV2);
    }

    #[test]
    fn test_serde_uses_model_names() {
        let json = serde_json::to_string(&EmbeddingModel::ParaphraseMiniLmL6V2).unwrap();
        assert_eq!(json, "\"paraphrase-MiniLM-L6-v2\"");
        let parsed: EmbeddingModel =
            serde_json::from_str("\"roberta-base-nli-stsb-mean-tokens\"").unwrap();
        assert_eq!(parsed, EmbeddingModel::RobertaBaseNliStsbMeanTokens);
    }
}
