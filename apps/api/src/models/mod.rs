pub mod application;
pub mod candidate;
pub mod job;

pub use application::{ApplicationRecord, ApplicationStatus};
pub use candidate::CandidateProfile;
pub use job::JobPosting;
