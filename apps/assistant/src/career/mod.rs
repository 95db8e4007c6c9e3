// Career planning: the scripted slot prompts and the report generator.
// Report requests go through llm_client like every other model call.

pub mod prompts;
pub mod report;
