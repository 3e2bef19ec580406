// All model prompt constants for the insight services.

/// System prompt for interview question generation.
pub const INTERVIEW_SYSTEM: &str = "You are an AI interview coach. Generate structured \
    interview questions with answers.";

/// Interview question prompt template.
/// Replace: {count}, {job_title}, {skills}, {json_only}
pub const INTERVIEW_PROMPT_TEMPLATE: &str = r#"Generate {count} interview questions for a {job_title} role.
The candidate has skills in: {skills}.
Provide a mix of technical and behavioral questions.
Each question should have a sample answer.

Respond in JSON format:
{
  "questions": [
    {"question": "What is dependency injection?", "answer": "Dependency injection is a design pattern..."},
    {"question": "Explain SOLID principles.", "answer": "SOLID is a set of five design principles..."}
  ]
}

{json_only}"#;

/// Hiring score prompt template. Sent without a system message.
/// Replace: {name}, {job_title}, {company}, {skills}, {experience}, {requirements}, {json_only}
pub const HIRING_SCORE_PROMPT_TEMPLATE: &str = r#"Predict the hiring score for {name} applying for {job_title} at {company}.
- Candidate's Skills: {skills}
- Experience: {experience}
- Job Requirements: {requirements}

Provide a hiring score (1-100) and improvement suggestions in JSON format:
{
  "score": 85,
  "reason": "Candidate matches 85% of required skills but lacks experience with cloud platforms.",
  "improvements": ["AWS Certification", "More experience in Microservices"]
}

{json_only}"#;

/// Skill-gap prompt template. Sent without a system message.
/// Replace: {name}, {job_title}, {company}, {skills}, {requirements}, {json_only}
pub const SKILL_GAP_PROMPT_TEMPLATE: &str = r#"Identify skill gaps for {name} applying for {job_title} at {company}.
- Candidate's Skills: {skills}
- Job Requirements: {requirements}

List missing skills and recommend relevant courses from Udemy, Coursera, and LinkedIn Learning.

Respond in JSON format:
{
  "missingSkills": ["AWS Cloud", "Microservices", "CI/CD"],
  "recommendedCourses": [
    {
      "platform": "Udemy",
      "courseTitle": "AWS Certified Solutions Architect",
      "link": "https://www.udemy.com/course/aws-solutions-architect/"
    }
  ]
}

{json_only}"#;
