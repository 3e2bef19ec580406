// All model prompt constants for auto-apply. Both outputs are free text.

/// Cover letter prompt template.
/// Replace: {name}, {job_title}, {company}, {resume}, {description}
pub const COVER_LETTER_PROMPT_TEMPLATE: &str = r#"Write a professional, customized cover letter for {name} applying for {job_title} at {company}.
- The candidate's resume:
  {resume}
- Job description:
  {description}

Follow this structure:
- Introduction
- Why I'm a great fit
- Key skills that match the job
- Closing statement

Format it as a well-written business letter."#;

/// Tailored resume prompt template.
/// Replace: {name}, {job_title}, {company}, {skills_required}, {resume}
pub const TAILORED_RESUME_PROMPT_TEMPLATE: &str = r#"Optimize {name}'s resume for {job_title} at {company}.
- Highlight relevant experience & skills (the role asks for: {skills_required}).
- Make it ATS-friendly.
- Improve formatting & clarity.

Original Resume:
{resume}

Return only the optimized resume."#;
