//! Orchestrator tests against fake token, avatar and assistant providers.

mod submit;
