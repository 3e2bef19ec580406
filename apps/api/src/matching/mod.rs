// Job recommendation: ranks the catalog against a candidate profile via the
// model and resolves the answer back onto the authoritative catalog.

pub mod handlers;
pub mod prompts;
pub mod recommender;
