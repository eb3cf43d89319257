// Assessment generation: clause carving, audit prompt assembly, and the
// per-section LLM calls that produce the compliance checklist.
// All LLM calls go through llm_client — no direct Anthropic calls here.

pub mod generator;
pub mod handlers;
pub mod prompts;
