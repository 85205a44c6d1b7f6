// Shared prompt fragments. Feature-specific prompts live next to the feature
// (see assist/prompts.rs); this file holds the cross-cutting rules.

/// Appended to every system prompt: the model rewrites, it does not invent.
pub const NO_FABRICATION: &str = "\
    Only use facts present in the provided resume content. \
    Do NOT invent employers, dates, metrics, degrees or tools. \
    If a detail is missing, leave it out rather than guessing.";

/// Output shape rules shared by all text-generation features.
pub const PLAIN_OUTPUT: &str = "\
    Respond with the requested text only. \
    No preamble, no explanations, no markdown headings.";

/// Builds a system prompt from a feature-specific role plus the shared rules.
pub fn system_prompt(role: &str) -> String {
    format!("{role}\n\n{NO_FABRICATION}\n\n{PLAIN_OUTPUT}")
}
