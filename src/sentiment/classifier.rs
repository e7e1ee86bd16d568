use super::{Sentiment, SentimentClassifier};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde::Deserialize;

pub const DEFAULT_MODEL: &str = "yiyanghkust/finbert-tone";
const INFERENCE_URL: &str = "https://api-inference.huggingface.co/models";

#[derive(Debug, Deserialize)]
struct LabelScore {
    label: String,
    score: f64,
}

/// Classifies posts with a hosted text-classification model through the
/// Hugging Face inference API.
///
/// The default model is FinBERT-tone, which labels text as Positive,
/// Neutral or Negative.
pub struct HuggingFaceClassifier {
    api_token: String,
    model: String,
    client: reqwest::Client,
}

impl HuggingFaceClassifier {
    pub fn new(api_token: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_token: api_token.into(),
            model: model.into(),
            client: reqwest::Client::new(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl SentimentClassifier for HuggingFaceClassifier {
    async fn classify(&self, text: &str) -> Result<Sentiment> {
        let url = format!("{}/{}", INFERENCE_URL, self.model);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_token)
            .json(&serde_json::json!({ "inputs": text }))
            .send()
            .await?
            .json::<serde_json::Value>()
            .await?;

        parse_prediction(response)
    }
}

/// Picks the highest-scoring label from an inference response.
///
/// The API answers either `[[{label, score}, ...]]` or `[{label, score}, ...]`,
/// or `{"error": ...}` when the request failed or the model is still loading.
fn parse_prediction(response: serde_json::Value) -> Result<Sentiment> {
    if let Some(error) = response.get("error") {
        return Err(anyhow!(
            "Inference API error: {}",
            error.as_str().unwrap_or("Unknown error")
        ));
    }

    let candidates = match response {
        serde_json::Value::Array(mut outer) if matches!(outer.first(), Some(serde_json::Value::Array(_))) => {
            outer.swap_remove(0)
        }
        other => other,
    };

    let scores: Vec<LabelScore> = serde_json::from_value(candidates)
        .map_err(|e| anyhow!("Unexpected inference response format: {}", e))?;

    scores
        .into_iter()
        .max_by(|a, b| a.score.total_cmp(&b.score))
        .map(|best| Sentiment::from_label(&best.label))
        .ok_or_else(|| anyhow!("Inference response contained no labels"))
}
