// All model prompt constants for the CV services.

/// System prompt for CV field extraction.
pub const CV_PARSER_SYSTEM: &str = "You are an AI CV parser. Extract relevant job details \
    from resumes and return structured JSON.";

/// CV extraction prompt template.
/// Replace: {cv_text}, {json_only}
pub const CV_PARSER_PROMPT_TEMPLATE: &str = r#"Extract structured details from the following resume:

{cv_text}

Respond with a JSON object using exactly these fields:
{
  "name": "full name",
  "email": "email address",
  "phone": "phone number",
  "skills": ["skill"],
  "experience": "summary of work experience",
  "education": "summary of education",
  "certifications": ["certification"],
  "summary": "short professional summary"
}
Use an empty string or empty list for anything the resume does not state.

{json_only}"#;

/// System prompt for resume optimization.
pub const OPTIMIZER_SYSTEM: &str = "You are an AI career coach that optimizes resumes \
    for ATS and professional readability.";

/// Resume optimization prompt template.
/// Replace: {seniority_level}, {industry}, {optimization_style}, {job_title}, {resume}, {json_only}
pub const OPTIMIZER_PROMPT_TEMPLATE: &str = r#"Optimize the following resume for a {seniority_level} position in {industry}.
The user prefers a {optimization_style} style.
Improve clarity, grammar, and structure while making it ATS-friendly.
Additionally, identify any missing skills relevant to {job_title}.

Respond in JSON format:
{
  "optimizedResume": "Updated resume text...",
  "missingSkills": ["Skill 1", "Skill 2"]
}

Original Resume:
{resume}

{json_only}"#;
