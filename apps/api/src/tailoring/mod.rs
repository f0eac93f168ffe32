// Resume tailoring: CV extraction, job analysis and generation.
// All model calls go through llm_client via the `Tailor` trait.

pub mod handlers;
pub mod models;
pub mod pipeline;
pub mod prompts;
