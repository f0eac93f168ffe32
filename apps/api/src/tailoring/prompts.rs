// Prompts for the three tailoring steps. Placeholders in braces are replaced
// with `str::replace` before the call; JSON braces in the schemas are literal.

use crate::tailoring::models::Language;

/// System prompt shared by every tailoring call.
pub const TAILOR_SYSTEM: &str = "You are a professional resume writer and career coach.

Hard rules:
1. Never invent information that is not in the source data.
2. Never add fabricated metrics, achievements or experience.
3. When information is missing, stay generic or leave it out.
4. Use professional, ATS-friendly wording.
5. Prefer short, high-impact phrasing.
6. Truthfulness comes before everything else.";

pub const CV_EXTRACTION_PROMPT_TEMPLATE: &str = r#"Extract the information in this CV into structured JSON.

Rules:
- Extract only facts that appear in the text.
- Do not infer anything that is not stated explicitly.
- Use null or an empty array for anything you cannot find.
- Keep company names, role titles and dates exactly as written.
- Copy bullet points verbatim.

CV TEXT:
{cv_text}

Return JSON with exactly this shape:
{
  "personal": {
    "name": "string",
    "email": "string or null",
    "phone": "string or null",
    "location": "string or null",
    "title": "string",
    "summary": "string or null",
    "linkedin": "string or null"
  },
  "skills": ["string"],
  "experience": [
    {
      "company": "string",
      "role": "string",
      "startDate": "string",
      "endDate": "string or Present",
      "bullets": ["string"]
    }
  ],
  "education": [
    {
      "institution": "string",
      "degree": "string",
      "field": "string or null",
      "year": "string or null"
    }
  ],
  "certifications": ["string"],
  "languages": ["string"]
}

Return only the JSON object."#;

pub const JOB_ANALYSIS_PROMPT_TEMPLATE: &str = r#"Analyze this job description and extract its key requirements.

JOB DESCRIPTION:
{job_text}

Return JSON with exactly this shape:
{
  "title": "string",
  "company": "string or null",
  "requiredSkills": ["must-have skills"],
  "preferredSkills": ["nice-to-have skills"],
  "responsibilities": ["key responsibilities"],
  "keywords": ["ATS terms likely used when screening resumes"]
}

Separate required from preferred skills, list the core responsibilities, and
include technical terms, tools and methodologies as keywords.

Return only the JSON object."#;

pub const GENERATION_PROMPT_TEMPLATE: &str = r#"You have a candidate's structured resume and an analysis of the job they are applying for.
Produce tailored application material.

{language_instruction}

RESUME DATA:
{resume_json}

JOB REQUIREMENTS:
{job_json}

Produce four outputs.

1. tailoredResume
- Plain text. Line 1: full name. Line 2: professional title. Line 3: contact details.
- Then sections, each introduced by a header line in capitals on its own line:
  SUMMARY, SKILLS, EXPERIENCE, EDUCATION (add others only if the data has them).
- Each experience entry starts with a line "Company | Role | Start - End",
  followed by one line per achievement starting with "- ".
- Put the skills most relevant to the job first and align the summary with the role.
- Keep every fact unchanged. No tables, no decorative characters.

2. bulletUpgrades
- One entry per experience bullet: original (exact text), improved, context ("Company - Role").
- Use stronger verbs and clearer outcomes; never invent metrics.
- If a bullet is already strong, change it only slightly.

3. linkedinAbout
- 200 to 250 words, first person, three short paragraphs: current role,
  key achievements and expertise, what the candidate is looking for.
- Based only on facts in the resume data.

4. changeReport
- matchScore: 1-100, how well the original CV matched the job.
- summaryChanges: what changed in the summary.
- skillsReordered: skills moved up for relevance.
- keywordsAdded: ATS keywords worked in.
- bulletImprovements: number of bullets strengthened.
- overallNotes: 3 to 5 short observations or recommendations.

Return JSON:
{
  "tailoredResume": "full resume text",
  "bulletUpgrades": [
    {"original": "exact original text", "improved": "strengthened text", "context": "Company - Role"}
  ],
  "linkedinAbout": "full LinkedIn about text",
  "changeReport": {
    "matchScore": 75,
    "summaryChanges": "string",
    "skillsReordered": ["string"],
    "keywordsAdded": ["string"],
    "bulletImprovements": 8,
    "overallNotes": ["string"]
  }
}

Return only the JSON object."#;

pub fn language_instruction(language: Language) -> &'static str {
    match language {
        Language::En => "Write every output in English.",
        Language::He => {
            "Write every output in Hebrew, in professional business Hebrew. \
             Keep the section header lines in capitals as described below."
        }
    }
}

pub fn cv_extraction_prompt(cv_text: &str) -> String {
    CV_EXTRACTION_PROMPT_TEMPLATE.replace("{cv_text}", cv_text)
}

pub fn job_analysis_prompt(job_text: &str) -> String {
    JOB_ANALYSIS_PROMPT_TEMPLATE.replace("{job_text}", job_text)
}

/// Language instruction is substituted first so that user data containing a
/// literal `{language_instruction}` is never expanded.
pub fn generation_prompt(resume_json: &str, job_json: &str, language: Language) -> String {
    GENERATION_PROMPT_TEMPLATE
        .replace("{language_instruction}", language_instruction(language))
        .replace("{resume_json}", resume_json)
        .replace("{job_json}", job_json)
}
