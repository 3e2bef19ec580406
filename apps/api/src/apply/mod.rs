// Auto-apply: generates a cover letter and a tailored resume per selected job
// and records one application per job.

pub mod handlers;
pub mod orchestrator;
pub mod prompts;
