// Cross-cutting prompt fragments shared by every LLM call.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Joins a task-specific system prompt with the JSON-only contract.
pub fn json_system(task_system: &str) -> String {
    format!("{task_system}\n\n{JSON_ONLY_SYSTEM}")
}
