//! Pipeline scenario tests against stub LLM clients.
