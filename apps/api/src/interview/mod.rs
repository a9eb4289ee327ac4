//! Interview-stage LLM helpers: transcript scoring and question generation.
//!
//! Both follow the matcher's failure policy — degraded, well-formed results
//! on any fault, never a propagated error.

pub mod prompts;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::interview::prompts::{
    QUESTIONS_PROMPT_TEMPLATE, QUESTIONS_SYSTEM, TRANSCRIPT_PROMPT_TEMPLATE, TRANSCRIPT_SYSTEM,
};
use crate::llm_client::{extract_json, ExtractedJson, LlmClient};

/// Score and feedback for one interview transcript. `score` is clamped to
/// [0, 100] regardless of what the model returned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptScore {
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub feedback: Vec<String>,
}

impl TranscriptScore {
    fn fallback(reason: &str) -> Self {
        Self {
            score: 0.0,
            feedback: vec![format!("Error occurred while processing: {reason}")],
        }
    }
}

/// Scores an interview transcript for technical correctness and quality.
pub async fn score_transcript(llm: &LlmClient, transcript: &str) -> TranscriptScore {
    if transcript.trim().is_empty() {
        return TranscriptScore::fallback("transcript cannot be empty");
    }

    let prompt = TRANSCRIPT_PROMPT_TEMPLATE.replace("{transcript}", transcript);
    let raw = match llm.generate(&prompt, TRANSCRIPT_SYSTEM).await {
        Ok(text) => text,
        Err(e) => {
            warn!("transcript scoring call failed: {e}");
            return TranscriptScore::fallback(&e.to_string());
        }
    };

    score_from_output(&raw)
}

fn score_from_output(raw: &str) -> TranscriptScore {
    match extract_json::<TranscriptScore>(raw) {
        ExtractedJson::Parsed(mut score) | ExtractedJson::Recovered(mut score) => {
            if !score.score.is_finite() {
                score.score = 0.0;
            }
            score.score = score.score.clamp(0.0, 100.0);
            score
        }
        ExtractedJson::Failed(e) => {
            warn!("unparsable transcript score output: {e}");
            TranscriptScore::fallback(&e)
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QaPair {
    pub question: String,
    pub answer: String,
}

/// Generates five technical question-answer pairs for the given labels.
pub async fn generate_questions(llm: &LlmClient, labels: &[String]) -> Vec<QaPair> {
    if labels.is_empty() {
        return fallback_questions("labels list cannot be empty");
    }

    let prompt = QUESTIONS_PROMPT_TEMPLATE.replace("{labels}", &labels.join(", "));
    let raw = match llm.generate(&prompt, QUESTIONS_SYSTEM).await {
        Ok(text) => text,
        Err(e) => {
            warn!("question generation call failed: {e}");
            return fallback_questions(&e.to_string());
        }
    };

    questions_from_output(&raw)
}

fn questions_from_output(raw: &str) -> Vec<QaPair> {
    match extract_json::<Vec<QaPair>>(raw) {
        ExtractedJson::Parsed(pairs) | ExtractedJson::Recovered(pairs) => pairs,
        ExtractedJson::Failed(e) => {
            warn!("unparsable question output: {e}");
            fallback_questions(&e)
        }
    }
}

fn fallback_questions(reason: &str) -> Vec<QaPair> {
    vec![QaPair {
        question: "N/A".to_string(),
        answer: format!("Error occurred: {reason}"),
    }]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_transcript_falls_back_without_llm_call() {
        let llm = LlmClient::new("test-key".to_string());
        let result = score_transcript(&llm, "  \n ").await;
        assert_eq!(result.score, 0.0);
        assert!(!result.feedback.is_empty());
    }

    #[test]
    fn test_clean_score_parses() {
        let result = score_from_output(r#"{"score": 85, "feedback": ["Solid answers"]}"#);
        assert_eq!(result.score, 85.0);
        assert_eq!(result.feedback, vec!["Solid answers"]);
    }

    #[test]
    fn test_score_clamped_to_hundred() {
        let result = score_from_output(r#"{"score": 140, "feedback": []}"#);
        assert_eq!(result.score, 100.0);
    }

    #[test]
    fn test_negative_score_clamped_to_zero() {
        let result = score_from_output(r#"{"score": -5, "feedback": []}"#);
        assert_eq!(result.score, 0.0);
    }

    #[test]
    fn test_prose_wrapped_score_is_recovered() {
        let result = score_from_output("The evaluation:\n{\"score\": 60, \"feedback\": []}\n");
        assert_eq!(result.score, 60.0);
    }

    #[test]
    fn test_garbage_score_output_falls_back() {
        let result = score_from_output("cannot evaluate");
        assert_eq!(result.score, 0.0);
        assert!(result.feedback[0].contains("Error occurred"));
    }

    #[tokio::test]
    async fn test_empty_labels_fall_back_without_llm_call() {
        let llm = LlmClient::new("test-key".to_string());
        let pairs = generate_questions(&llm, &[]).await;
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].question, "N/A");
        assert!(pairs[0].answer.contains("Error occurred"));
    }

    #[test]
    fn test_question_array_parses() {
        let pairs = questions_from_output(
            r#"[{"question": "What is Rust?", "answer": "A systems language."}]"#,
        );
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].question, "What is Rust?");
    }

    #[test]
    fn test_prose_wrapped_question_array_is_recovered() {
        let pairs = questions_from_output(
            "Here are the questions: [{\"question\": \"Q\", \"answer\": \"A\"}] Enjoy!",
        );
        assert_eq!(pairs.len(), 1);
    }

    #[test]
    fn test_garbage_question_output_falls_back() {
        let pairs = questions_from_output("no questions today");
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].question, "N/A");
    }
}
