// Prompt constants for the interview-stage LLM calls.

/// System prompt for transcript scoring — enforces JSON-only output.
pub const TRANSCRIPT_SYSTEM: &str = "You are a senior technical interviewer evaluating a candidate. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// Transcript scoring prompt template. Replace `{transcript}` before sending.
pub const TRANSCRIPT_PROMPT_TEMPLATE: &str = r#"Below is the transcript of a technical interview:

---
{transcript}
---

1. Evaluate the candidate's responses in terms of technical correctness, depth, and clarity.
2. Assign a score out of 100.
3. Provide 2-3 bullet points of constructive feedback.

Respond strictly in this JSON format:
{
    "score": 85,
    "feedback": [
        "Answer to question 2 lacked detail on database indexing.",
        "Great explanation of REST principles."
    ]
}"#;

/// System prompt for question generation — enforces a JSON array.
pub const QUESTIONS_SYSTEM: &str = "You are a technical interviewer preparing assessment material. \
    You MUST respond with a valid JSON array only. \
    Do NOT include any text outside the JSON array. \
    Do NOT use markdown code fences.";

/// Question generation prompt template. Replace `{labels}` before sending.
pub const QUESTIONS_PROMPT_TEMPLATE: &str = r#"Generate 5 technical interview question-answer pairs for these technologies: {labels}.

Format the output strictly as a JSON array like this:
[
  {
    "question": "What is ...?",
    "answer": "..."
  }
]"#;
