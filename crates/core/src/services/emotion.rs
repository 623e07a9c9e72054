//! Emotion analysis backed by an external text classifier.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use sahemind_common::{AppError, AppResult, config::EmotionConfig};
use serde::{Deserialize, Serialize};

/// Emotions a distribution is expressed over.
pub const EMOTION_VOCABULARY: [&str; 6] = [
    "anxiety",
    "burnout",
    "sadness",
    "anger",
    "fear",
    "loneliness",
];

/// Emotion reported when classification yields nothing usable.
pub const FALLBACK_EMOTION: &str = "anxiety";

/// Probability per emotion, summing to 1.
pub type EmotionDistribution = BTreeMap<String, f64>;

/// One raw label from a classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelScore {
    pub label: String,
    pub score: f64,
}

/// Text emotion classifier.
#[async_trait]
pub trait EmotionClassifier: Send + Sync {
    /// Score `text` against the classifier's own label set.
    async fn classify(&self, text: &str) -> AppResult<Vec<LabelScore>>;
}

/// Classifier served over HTTP, in the shape of a hosted inference endpoint.
pub struct HttpEmotionClassifier {
    http_client: reqwest::Client,
    url: String,
    api_key: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ClassifierResponse {
    Batched(Vec<Vec<LabelScore>>),
    Flat(Vec<LabelScore>),
}

impl HttpEmotionClassifier {
    /// Create a classifier for the given endpoint.
    pub fn new(url: String, api_key: Option<String>, timeout: Duration) -> AppResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            http_client,
            url,
            api_key,
        })
    }

    /// Build a classifier from config. `None` when no endpoint is configured.
    pub fn from_config(config: &EmotionConfig) -> AppResult<Option<Self>> {
        config
            .url
            .clone()
            .map(|url| {
                Self::new(
                    url,
                    config.api_key.clone(),
                    Duration::from_secs(config.timeout_secs),
                )
            })
            .transpose()
    }
}

#[async_trait]
impl EmotionClassifier for HttpEmotionClassifier {
    async fn classify(&self, text: &str) -> AppResult<Vec<LabelScore>> {
        let mut request = self
            .http_client
            .post(&self.url)
            .json(&serde_json::json!({ "inputs": text }));
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("Classifier request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalService(format!(
                "Classifier error: {status} - {body}"
            )));
        }

        let parsed: ClassifierResponse = response.json().await.map_err(|e| {
            AppError::ExternalService(format!("Failed to parse classifier response: {e}"))
        })?;

        Ok(match parsed {
            ClassifierResponse::Batched(batches) => batches.into_iter().flatten().collect(),
            ClassifierResponse::Flat(scores) => scores,
        })
    }
}

/// Map a classifier label into the vocabulary, if it has a counterpart.
#[must_use]
pub fn map_label(label: &str) -> Option<&'static str> {
    let label = label.trim().to_lowercase();
    if let Some(known) = EMOTION_VOCABULARY.iter().copied().find(|v| *v == label) {
        return Some(known);
    }
    match label.as_str() {
        "joy" => Some("loneliness"),
        "disgust" => Some("burnout"),
        "surprise" | "neutral" => Some("anxiety"),
        _ => None,
    }
}

/// The distribution used when nothing can be classified.
#[must_use]
pub fn fallback_distribution() -> EmotionDistribution {
    BTreeMap::from([(FALLBACK_EMOTION.to_string(), 1.0)])
}

/// Fold raw scores into a normalized distribution over the vocabulary.
///
/// Returns `None` when no positive score maps into the vocabulary.
#[must_use]
pub fn distribution_from_scores(scores: &[LabelScore]) -> Option<EmotionDistribution> {
    let mut totals: EmotionDistribution = BTreeMap::new();
    for s in scores {
        if !s.score.is_finite() || s.score <= 0.0 {
            continue;
        }
        if let Some(emotion) = map_label(&s.label) {
            *totals.entry(emotion.to_string()).or_default() += s.score;
        }
    }

    let sum: f64 = totals.values().sum();
    if sum <= 0.0 {
        return None;
    }
    for value in totals.values_mut() {
        *value /= sum;
    }
    Some(totals)
}

/// Input for an emotion analysis.
#[derive(Debug, Deserialize)]
pub struct AnalyzeInput {
    pub text: String,
}

/// Emotion service.
#[derive(Clone)]
pub struct EmotionService {
    classifier: Option<Arc<dyn EmotionClassifier>>,
}

impl EmotionService {
    /// Create a new emotion service. Without a classifier every analysis falls back.
    #[must_use]
    pub fn new(classifier: Option<Arc<dyn EmotionClassifier>>) -> Self {
        Self { classifier }
    }

    /// Estimate the emotion distribution of `text`.
    pub async fn analyze(&self, text: &str) -> AppResult<EmotionDistribution> {
        if text.trim().is_empty() {
            return Err(AppError::Validation("Text cannot be empty".to_string()));
        }

        let Some(classifier) = &self.classifier else {
            tracing::warn!("No emotion classifier configured, using fallback");
            return Ok(fallback_distribution());
        };

        match classifier.classify(text).await {
            Ok(scores) => Ok(distribution_from_scores(&scores).unwrap_or_else(|| {
                tracing::warn!(labels = scores.len(), "Classifier returned no usable scores");
                fallback_distribution()
            })),
            Err(e) => {
                tracing::warn!(error = %e, "Emotion classification failed, using fallback");
                Ok(fallback_distribution())
            }
        }
    }
}
