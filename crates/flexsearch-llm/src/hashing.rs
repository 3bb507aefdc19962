//! Offline feature-hashing embedder
//!
//! Produces deterministic, L2-normalized bag-of-words vectors without any
//! network access. Texts that share tokens get a positive cosine similarity,
//! which is enough for local development and tests.

use crate::models::EmbeddingModel;
use crate::ports::Embedder;
use async_trait::async_trait;
use flexsearch_core::error::Result;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Feature-hashing embedder
#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    model: EmbeddingModel,
}

impl HashingEmbedder {
    /// Create a hashing embedder that produces vectors shaped like `model`'s
    pub fn new(model: EmbeddingModel) -> Self {
        Self { model }
    }

    /// Embed a single text synchronously
    pub fn embed_text(&self, text: &str) -> Vec<f32> {
        let dims = self.model.dimensions();
        let mut vector = vec![0.0f32; dims];

        for token in tokenize(text) {
            let hash = fnv1a(token.as_bytes());
            let slot = (hash % dims as u64) as usize;
            let sign = if (hash >> 63) & 1 == 0 { 1.0 } else { -1.0 };
            vector[slot] += sign;
        }

        let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in &mut vector {
                *x /= norm;
            }
        }
        vector
    }
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self::new(EmbeddingModel::default())
    }
}

#[async_trait]
impl Embedder for HashingEmbedder {
    async fn encode_many(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|text| self.embed_text(text)).collect())
    }

    fn dimensions(&self) -> usize {
        self.model.dimensions()
    }

    fn model_name(&self) -> &str {
        self.model.name()
    }
}

fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(|token| token.to_lowercase())
}

fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET, |hash, byte| {
        (hash ^ u64::from(*byte)).wrapping_mul(FNV_PRIME)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cosine(a: &[f32], b: &[f32]) -> f32 {
        a.iter().zip(b).map(|(x, y)| x * y).sum()
    }

    #[test]
    fn test_deterministic_and_normalized() {
        let embedder = HashingEmbedder::default();
        let a = embedder.embed_text("Red running shoes");
        let b = embedder.embed_text("red RUNNING shoes!");

        assert_eq!(a.len(), 768);
        assert_eq!(a, b);
        let norm: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_shared_tokens_are_closer() {
        let embedder = HashingEmbedder::default();
        let query = embedder.embed_text("red shoes");
        let related = embedder.embed_text("bright red shoes for running");
        let unrelated = embedder.embed_text("stainless steel kettle");

        assert!(cosine(&query, &related) > cosine(&query, &unrelated));
    }

    #[test]
    fn test_blank_text_is_zero_vector() {
        let embedder = HashingEmbedder::new(EmbeddingModel::ParaphraseMiniLmL6V2);
        let vector = embedder.embed_text("  ...  ");
        assert_eq!(vector.len(), 384);
        assert!(vector.iter().all(|x| *x == 0.0));
    }

    #[tokio::test]
    async fn test_encode_through_port() {
        let embedder = HashingEmbedder::default();
        let vectors = embedder.encode_many(&["one", "two"]).await.unwrap();
        assert_eq!(vectors.len(), 2);
        assert_eq!(embedder.encode("one").await.unwrap(), vectors[0]);
        assert_eq!(embedder.model_name(), "all-mpnet-base-v2");
    }
}
