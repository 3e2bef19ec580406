// Candidate insights: interview preparation, hiring score and skill-gap analysis.

pub mod handlers;
pub mod hiring_score;
pub mod interview;
pub mod prompts;
pub mod skill_gap;
