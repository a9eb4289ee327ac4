// Prompt constants for the resume matcher.

/// System prompt — enforces JSON-only output.
pub const MATCH_SYSTEM: &str = "You are an intelligent hiring assistant. \
    You evaluate resumes against job requirements and extract structured candidate data. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Matching prompt template. Replace `{resume_text}` and `{requirements}`
/// before sending.
pub const MATCH_PROMPT_TEMPLATE: &str = r#"Here is the candidate's resume:
---
{resume_text}
---

Here is the job requirement list:
---
- {requirements}
---

1. Calculate `resumeMatch` (0-100) based on how closely the resume aligns with these job requirements.
2. Extract all the information and fill it into this JSON format (fill missing fields as "N/A").

Note: Fill workExperience and education arrays with all relevant entries found in the resume (not just one).

{
  "name": "",
  "email": "",
  "phone": "",
  "position": "",
  "location": "",
  "resumeMatch": 0,
  "appliedDate": "N/A",
  "experience": "",
  "linkedin": "",
  "github": "",
  "portfolio": "",
  "summary": "",
  "skills": [],
  "workExperience": [
    {
      "company": "",
      "position": "",
      "duration": "",
      "description": ""
    }
  ],
  "education": [
    {
      "degree": "",
      "school": "",
      "year": ""
    }
  ]
}"#;
