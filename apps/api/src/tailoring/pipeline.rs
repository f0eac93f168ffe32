//! Tailoring pipeline: CV facts, then job analysis, then generated outputs.
//!
//! The model backend sits behind the [`Tailor`] trait so handlers and tests
//! never depend on the HTTP client. `AppState` holds an `Arc<dyn Tailor>`.

use std::time::Instant;

use async_trait::async_trait;
use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::llm_client::LlmClient;
use crate::resume::ResumeDocument;
use crate::tailoring::models::{GenerationOutput, JobJson, Language, ResumeJson};
use crate::tailoring::prompts::{
    cv_extraction_prompt, generation_prompt, job_analysis_prompt, TAILOR_SYSTEM,
};

const CV_EXTRACTION_MAX_TOKENS: u32 = 4096;
const JOB_ANALYSIS_MAX_TOKENS: u32 = 2048;
const GENERATION_MAX_TOKENS: u32 = 8192;

#[async_trait]
pub trait Tailor: Send + Sync {
    async fn parse_resume(&self, cv_text: &str) -> Result<ResumeJson, AppError>;

    async fn analyze_job(&self, job_text: &str) -> Result<JobJson, AppError>;

    async fn generate(
        &self,
        resume: &ResumeJson,
        job: &JobJson,
        language: Language,
    ) -> Result<GenerationOutput, AppError>;
}

/// Claude-backed tailor. One call per pipeline step.
pub struct LlmTailor(pub LlmClient);

#[async_trait]
impl Tailor for LlmTailor {
    async fn parse_resume(&self, cv_text: &str) -> Result<ResumeJson, AppError> {
        self.0
            .call_json(
                &cv_extraction_prompt(cv_text),
                TAILOR_SYSTEM,
                CV_EXTRACTION_MAX_TOKENS,
            )
            .await
            .map_err(|e| AppError::Llm(format!("Resume extraction failed: {e}")))
    }

    async fn analyze_job(&self, job_text: &str) -> Result<JobJson, AppError> {
        self.0
            .call_json(
                &job_analysis_prompt(job_text),
                TAILOR_SYSTEM,
                JOB_ANALYSIS_MAX_TOKENS,
            )
            .await
            .map_err(|e| AppError::Llm(format!("Job analysis failed: {e}")))
    }

    async fn generate(
        &self,
        resume: &ResumeJson,
        job: &JobJson,
        language: Language,
    ) -> Result<GenerationOutput, AppError> {
        let resume_json = serde_json::to_string_pretty(resume)
            .map_err(|e| AppError::Internal(e.into()))?;
        let job_json =
            serde_json::to_string_pretty(job).map_err(|e| AppError::Internal(e.into()))?;

        self.0
            .call_json(
                &generation_prompt(&resume_json, &job_json, language),
                TAILOR_SYSTEM,
                GENERATION_MAX_TOKENS,
            )
            .await
            .map_err(|e| AppError::Llm(format!("Generation failed: {e}")))
    }
}

/// Generated outputs plus the structured view of the tailored resume.
#[derive(Debug, Clone, Serialize)]
pub struct TailoringResult {
    pub data: GenerationOutput,
    pub document: ResumeDocument,
}

/// Runs the three steps in order. Any step failing aborts the run.
pub async fn run_pipeline(
    tailor: &dyn Tailor,
    cv_text: &str,
    job_description: &str,
    language: Language,
) -> Result<TailoringResult, AppError> {
    let started = Instant::now();

    let resume = tailor.parse_resume(cv_text).await?;
    info!(
        experience = resume.experience.len(),
        skills = resume.skills.len(),
        "Parsed resume"
    );

    let job = tailor.analyze_job(job_description).await?;
    info!(
        title = %job.title,
        keywords = job.keywords.len(),
        "Analyzed job description"
    );

    let data = tailor.generate(&resume, &job, language).await?;
    if data.tailored_resume.trim().is_empty() {
        return Err(AppError::Llm("Generation returned an empty resume".to_string()));
    }

    let document = ResumeDocument::from_text(&data.tailored_resume, language.direction());
    info!(
        %language,
        sections = document.sections.len(),
        entries = document.entry_count(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Tailoring pipeline finished"
    );

    Ok(TailoringResult { data, document })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::resume::TextDirection;
    use crate::tailoring::models::{ChangeReport, PersonalInfo};
    use std::sync::atomic::{AtomicUsize, Ordering};

    pub const TAILORED_RESUME: &str = "\
Jane Cohen
Senior Backend Engineer
jane@example.com | Tel Aviv

SUMMARY
Backend engineer focused on payments.

EXPERIENCE
Acme Corp | Senior Engineer | 2020 - Present
- Migrated billing to Rust
- Cut p99 latency by 40%
";

    /// Canned tailor used by pipeline and router tests.
    #[derive(Default)]
    pub struct FakeTailor {
        pub calls: AtomicUsize,
        pub fail_generation: bool,
        pub empty_resume: bool,
        /// Simulated model latency for the first step.
        pub latency: Option<std::time::Duration>,
    }

    #[async_trait]
    impl Tailor for FakeTailor {
        async fn parse_resume(&self, cv_text: &str) -> Result<ResumeJson, AppError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(latency) = self.latency {
                tokio::time::sleep(latency).await;
            }
            Ok(ResumeJson {
                personal: PersonalInfo {
                    name: cv_text.lines().next().unwrap_or_default().to_string(),
                    ..PersonalInfo::default()
                },
                skills: vec!["Rust".to_string()],
                ..ResumeJson::default()
            })
        }

        async fn analyze_job(&self, _job_text: &str) -> Result<JobJson, AppError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(JobJson {
                title: "Backend Engineer".to_string(),
                keywords: vec!["rust".to_string()],
                ..JobJson::default()
            })
        }

        async fn generate(
            &self,
            _resume: &ResumeJson,
            _job: &JobJson,
            _language: Language,
        ) -> Result<GenerationOutput, AppError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_generation {
                return Err(AppError::Llm("upstream unavailable".to_string()));
            }
            let tailored_resume = if self.empty_resume {
                "   ".to_string()
            } else {
                TAILORED_RESUME.to_string()
            };
            Ok(GenerationOutput {
                tailored_resume,
                linkedin_about: "I build payment systems.".to_string(),
                change_report: ChangeReport {
                    match_score: 80,
                    ..ChangeReport::default()
                },
                ..GenerationOutput::default()
            })
        }
    }

    #[tokio::test]
    async fn test_pipeline_runs_all_steps_and_segments_output() {
        let tailor = FakeTailor::default();
        let result = run_pipeline(&tailor, "Jane Cohen\n...", "Backend role", Language::En)
            .await
            .unwrap();

        assert_eq!(tailor.calls.load(Ordering::SeqCst), 3);
        assert_eq!(result.data.change_report.match_score, 80);

        let header = result.document.header.as_ref().unwrap();
        assert_eq!(header.name.as_deref(), Some("Jane Cohen"));
        let headings: Vec<_> = result
            .document
            .sections
            .iter()
            .map(|s| s.heading.as_deref().unwrap_or_default())
            .collect();
        assert_eq!(headings, vec!["SUMMARY", "EXPERIENCE"]);
    }

    #[tokio::test]
    async fn test_pipeline_uses_language_direction() {
        let tailor = FakeTailor::default();
        let result = run_pipeline(&tailor, "cv", "job", Language::He).await.unwrap();
        assert_eq!(result.document.direction, TextDirection::Rtl);
    }

    #[tokio::test]
    async fn test_pipeline_propagates_generation_failure() {
        let tailor = FakeTailor {
            fail_generation: true,
            ..FakeTailor::default()
        };
        let err = run_pipeline(&tailor, "cv", "job", Language::En)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Llm(_)));
    }

    #[tokio::test]
    async fn test_pipeline_rejects_blank_resume() {
        let tailor = FakeTailor {
            empty_resume: true,
            ..FakeTailor::default()
        };
        let err = run_pipeline(&tailor, "cv", "job", Language::En)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Llm(_)));
    }
}
