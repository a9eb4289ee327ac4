//! Resume-to-requirement matching via the generation model.
//!
//! The semantic judgment is delegated to the LLM; this module owns the
//! prompt, the defensive parse of the model output, and the guarantee that
//! callers always receive a well-formed profile — on any failure the result
//! is a sentinel-filled record with `resume_match = 0` and an error note,
//! never a propagated error.

pub mod prompts;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::llm_client::{extract_json, ExtractedJson, LlmClient};
use crate::matching::prompts::{MATCH_PROMPT_TEMPLATE, MATCH_SYSTEM};

/// Sentinel for fields the model could not fill.
pub const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkExperience {
    pub company: String,
    pub position: String,
    pub duration: String,
    pub description: String,
}

impl Default for WorkExperience {
    fn default() -> Self {
        Self {
            company: NOT_AVAILABLE.to_string(),
            position: NOT_AVAILABLE.to_string(),
            duration: NOT_AVAILABLE.to_string(),
            description: NOT_AVAILABLE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Education {
    pub degree: String,
    pub school: String,
    pub year: String,
}

impl Default for Education {
    fn default() -> Self {
        Self {
            degree: NOT_AVAILABLE.to_string(),
            school: NOT_AVAILABLE.to_string(),
            year: NOT_AVAILABLE.to_string(),
        }
    }
}

/// Structured profile extracted from a resume, plus the match percentage.
/// `resume_match` is clamped to [0, 100] no matter what the model returned.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CandidateProfile {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub position: String,
    pub location: String,
    pub resume_match: f64,
    pub applied_date: String,
    pub experience: String,
    pub linkedin: String,
    pub github: String,
    pub portfolio: String,
    pub summary: String,
    pub skills: Vec<String>,
    pub work_experience: Vec<WorkExperience>,
    pub education: Vec<Education>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Default for CandidateProfile {
    fn default() -> Self {
        Self {
            name: NOT_AVAILABLE.to_string(),
            email: NOT_AVAILABLE.to_string(),
            phone: NOT_AVAILABLE.to_string(),
            position: NOT_AVAILABLE.to_string(),
            location: NOT_AVAILABLE.to_string(),
            resume_match: 0.0,
            applied_date: NOT_AVAILABLE.to_string(),
            experience: NOT_AVAILABLE.to_string(),
            linkedin: NOT_AVAILABLE.to_string(),
            github: NOT_AVAILABLE.to_string(),
            portfolio: NOT_AVAILABLE.to_string(),
            summary: NOT_AVAILABLE.to_string(),
            skills: Vec::new(),
            work_experience: Vec::new(),
            education: Vec::new(),
            error: None,
        }
    }
}

impl CandidateProfile {
    /// The record returned whenever matching cannot produce a real profile.
    pub fn fallback(reason: &str) -> Self {
        Self {
            error: Some(reason.to_string()),
            ..Self::default()
        }
    }
}

/// Scores raw resume text against a requirement list and extracts the
/// candidate profile. Infallible by contract: every failure mode ends in a
/// fallback record.
pub async fn match_resume(
    llm: &LlmClient,
    resume_text: &str,
    requirements: &[String],
) -> CandidateProfile {
    if resume_text.trim().is_empty() {
        return CandidateProfile::fallback("resume text is empty");
    }

    let prompt = MATCH_PROMPT_TEMPLATE
        .replace("{resume_text}", resume_text)
        .replace("{requirements}", &requirements.join("\n- "));

    let raw = match llm.generate(&prompt, MATCH_SYSTEM).await {
        Ok(text) => text,
        Err(e) => {
            warn!("resume match call failed: {e}");
            return CandidateProfile::fallback(&format!("generation call failed: {e}"));
        }
    };

    profile_from_output(&raw)
}

/// Parses and sanitizes one model response.
fn profile_from_output(raw: &str) -> CandidateProfile {
    let mut profile = match extract_json::<CandidateProfile>(raw) {
        ExtractedJson::Parsed(p) | ExtractedJson::Recovered(p) => p,
        ExtractedJson::Failed(e) => {
            warn!("unparsable match output: {e}");
            return CandidateProfile::fallback(&format!("unparsable model output: {e}"));
        }
    };

    if !profile.resume_match.is_finite() {
        profile.resume_match = 0.0;
    }
    profile.resume_match = profile.resume_match.clamp(0.0, 100.0);
    profile
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_resume_returns_fallback_without_llm_call() {
        let llm = LlmClient::new("test-key".to_string());
        let profile = match_resume(&llm, "   ", &["Python".to_string()]).await;
        assert_eq!(profile.resume_match, 0.0);
        assert_eq!(profile.name, NOT_AVAILABLE);
        assert!(profile.error.as_deref().unwrap_or_default().contains("empty"));
    }

    #[test]
    fn test_clean_output_parses() {
        let profile = profile_from_output(
            r#"{"name": "Jane Doe", "email": "jane@example.com", "resumeMatch": 85,
                "skills": ["python", "docker"],
                "workExperience": [{"company": "Acme", "position": "Engineer",
                                    "duration": "2019-2023", "description": "Built APIs"}],
                "education": [{"degree": "B.Sc.", "school": "ABC University", "year": "2018"}]}"#,
        );
        assert_eq!(profile.name, "Jane Doe");
        assert_eq!(profile.resume_match, 85.0);
        assert_eq!(profile.skills.len(), 2);
        assert_eq!(profile.work_experience[0].company, "Acme");
        assert!(profile.error.is_none());
        // Omitted fields get the sentinel.
        assert_eq!(profile.phone, NOT_AVAILABLE);
    }

    #[test]
    fn test_prose_wrapped_output_is_recovered() {
        let profile =
            profile_from_output("Here you go:\n{\"name\": \"Jo\", \"resumeMatch\": 55}\nCheers!");
        assert_eq!(profile.name, "Jo");
        assert_eq!(profile.resume_match, 55.0);
    }

    #[test]
    fn test_garbage_output_yields_fallback() {
        let profile = profile_from_output("I cannot process this resume, sorry.");
        assert_eq!(profile.resume_match, 0.0);
        assert!(profile.error.is_some());
        assert_eq!(profile.email, NOT_AVAILABLE);
    }

    #[test]
    fn test_out_of_range_match_is_clamped_high() {
        let profile = profile_from_output(r#"{"resumeMatch": 250}"#);
        assert_eq!(profile.resume_match, 100.0);
    }

    #[test]
    fn test_out_of_range_match_is_clamped_low() {
        let profile = profile_from_output(r#"{"resumeMatch": -30}"#);
        assert_eq!(profile.resume_match, 0.0);
    }

    #[test]
    fn test_non_numeric_match_yields_fallback() {
        let profile = profile_from_output(r#"{"resumeMatch": "eighty"}"#);
        assert_eq!(profile.resume_match, 0.0);
        assert!(profile.error.is_some());
    }

    #[test]
    fn test_fallback_serializes_error_field() {
        let json = serde_json::to_value(CandidateProfile::fallback("boom")).unwrap();
        assert_eq!(json["resumeMatch"], 0.0);
        assert_eq!(json["error"], "boom");
        assert_eq!(json["name"], NOT_AVAILABLE);
    }
}
