//! Skill/label extraction from free text (resumes and requirement lists).

use regex::Regex;

/// Fixed skill vocabulary, scanned in order. Matching is plain substring
/// search over the lower-cased input, so extraction stays deterministic.
const VOCABULARY: &[&str] = &[
    // Programming languages
    "python", "java", "c++", "c#", "javascript", "typescript", "go", "rust", "php", "swift",
    "kotlin",
    // Frontend frameworks
    "react", "angular", "vue", "next.js", "svelte", "bootstrap", "tailwind",
    // Backend frameworks
    "node", "express", "django", "flask", "fastapi", "spring", "spring boot", "laravel",
    "ruby on rails",
    // Databases
    "mysql", "postgresql", "mongodb", "sqlite", "oracle", "redis", "cassandra", "dynamodb",
    // Cloud & DevOps
    "aws", "azure", "gcp", "docker", "kubernetes", "jenkins", "terraform", "ansible",
    // Data Science & ML
    "pandas", "numpy", "matplotlib", "seaborn", "scikit-learn", "tensorflow", "pytorch", "keras",
    "openai", "huggingface",
    // Big Data
    "hadoop", "spark", "kafka", "airflow",
    // APIs
    "rest api", "graphql", "grpc", "postman", "swagger",
    // Tools & Misc
    "git", "github", "gitlab", "bitbucket", "jira", "figma", "excel", "power bi", "tableau",
    // Other
    "nlp", "data analysis", "data visualization", "linux", "agile", "scrum",
];

/// Turns free text into a normalized, duplicate-free label sequence, always
/// terminated by a `"<N> year"` experience token (`"0 year"` when no
/// experience mention is found). Only the first experience mention counts.
pub struct LabelExtractor {
    years: Regex,
}

impl LabelExtractor {
    pub fn new() -> Self {
        Self {
            years: Regex::new(r"(\d+)\s*\+?\s*(?:years?|yrs?)").expect("valid years pattern"),
        }
    }

    pub fn extract(&self, text: &str) -> Vec<String> {
        let text = text.to_lowercase();

        let mut labels: Vec<String> = Vec::new();
        for kw in VOCABULARY {
            if text.contains(kw) && !labels.iter().any(|l| l == kw) {
                labels.push((*kw).to_string());
            }
        }

        match self.years.captures(&text) {
            Some(caps) => labels.push(format!("{} year", &caps[1])),
            None => labels.push("0 year".to_string()),
        }

        labels
    }
}

impl Default for LabelExtractor {
    fn default() -> Self {
        Self::new()
    }
}
