//! Sentence-embedding collaborator for the optional semantic blend.
//!
//! The embedding model runs out of process (a text-embeddings-inference
//! style HTTP service); this module only holds the client seam.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EmbedError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("embedding service returned status {0}")]
    Status(u16),

    #[error("embedding service returned no vectors")]
    Empty,
}

#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedError>;
}

/// Client for an HTTP sentence-embeddings endpoint.
/// Expects `POST {url} {"inputs": "..."}` returning `[[f32, ...]]`.
pub struct HttpEmbedder {
    client: reqwest::Client,
    url: String,
}

impl HttpEmbedder {
    pub fn new(url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            url,
        }
    }
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    inputs: &'a str,
}

#[async_trait]
impl Embedder for HttpEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedError> {
        let response = self
            .client
            .post(&self.url)
            .json(&EmbedRequest { inputs: text })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(EmbedError::Status(status.as_u16()));
        }

        let mut vectors: Vec<Vec<f32>> = response.json().await?;
        if vectors.is_empty() || vectors[0].is_empty() {
            return Err(EmbedError::Empty);
        }
        Ok(vectors.remove(0))
    }
}

/// Cosine similarity over embedding vectors; 0.0 when either is all-zero.
pub fn cosine_f32(a: &[f32], b: &[f32]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| (*x as f64) * (*y as f64)).sum();
    let norm_a = a.iter().map(|x| (*x as f64) * (*x as f64)).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|x| (*x as f64) * (*x as f64)).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_f32_identical_vectors() {
        let v = [0.5_f32, 0.25, 0.1];
        assert!((cosine_f32(&v, &v) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_cosine_f32_orthogonal_vectors() {
        assert_eq!(cosine_f32(&[1.0, 0.0], &[0.0, 1.0]), 0.0);
    }

    #[test]
    fn test_cosine_f32_zero_vector_guard() {
        assert_eq!(cosine_f32(&[0.0, 0.0], &[1.0, 2.0]), 0.0);
    }
}
