//! Data exchanged with the model during tailoring.
//!
//! Field names follow the camelCase JSON the prompts ask the model to return.
//! The model sometimes answers `null` where a list or string is expected, so
//! required fields go through [`null_as_default`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::errors::AppError;
use crate::resume::TextDirection;

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Output language of the generated documents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    He,
}

impl Language {
    pub fn direction(self) -> TextDirection {
        match self {
            Language::En => TextDirection::Ltr,
            Language::He => TextDirection::Rtl,
        }
    }
}

impl FromStr for Language {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "en" => Ok(Language::En),
            "he" => Ok(Language::He),
            other => Err(AppError::Validation(format!(
                "Unsupported language '{other}'. Use 'en' or 'he'."
            ))),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::En => f.write_str("en"),
            Language::He => f.write_str("he"),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Step 1: structured CV
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInfo {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    pub summary: Option<String>,
    pub linkedin: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    #[serde(default, deserialize_with = "null_as_default")]
    pub company: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub role: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub start_date: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub end_date: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub bullets: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    #[serde(default, deserialize_with = "null_as_default")]
    pub institution: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub degree: String,
    pub field: Option<String>,
    pub year: Option<String>,
}

/// Facts extracted from the uploaded CV. Nothing here is invented by the model.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeJson {
    #[serde(default, deserialize_with = "null_as_default")]
    pub personal: PersonalInfo,
    #[serde(default, deserialize_with = "null_as_default")]
    pub skills: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub experience: Vec<Experience>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub education: Vec<Education>,
    pub certifications: Option<Vec<String>>,
    pub languages: Option<Vec<String>>,
}

// ────────────────────────────────────────────────────────────────────────────
// Step 2: job analysis
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobJson {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    pub company: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub required_skills: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub preferred_skills: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub responsibilities: Vec<String>,
    /// ATS terms likely used in resume screening.
    #[serde(default, deserialize_with = "null_as_default")]
    pub keywords: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Step 3: generated outputs
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulletUpgrade {
    #[serde(default, deserialize_with = "null_as_default")]
    pub original: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub improved: String,
    /// "Company - Role" the bullet belongs to.
    #[serde(default, deserialize_with = "null_as_default")]
    pub context: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeReport {
    /// 1–100: how well the original CV matched the job.
    #[serde(default, deserialize_with = "null_as_default")]
    pub match_score: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub summary_changes: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub skills_reordered: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub keywords_added: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub bullet_improvements: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub overall_notes: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationOutput {
    /// Plain-text resume; fed to the segmenter for every export.
    #[serde(default, deserialize_with = "null_as_default")]
    pub tailored_resume: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub bullet_upgrades: Vec<BulletUpgrade>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub linkedin_about: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub change_report: ChangeReport,
}
