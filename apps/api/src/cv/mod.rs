// CV services: structured extraction from resume text and resume optimization.

pub mod handlers;
pub mod optimizer;
pub mod parser;
pub mod prompts;
