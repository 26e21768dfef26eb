// Shared prompt fragments.
// Each stage that needs LLM calls defines its own prompts alongside it.
// This file contains cross-cutting fragments only.

/// Appended to every prompt that reads the candidate's CV.
pub const NO_INFERENCE_INSTRUCTION: &str = "\
Extract only facts that are explicitly present in the text. \
Do not infer, generalize, embellish or add information.";

/// Appended to every prompt that produces text about the candidate.
pub const GROUNDING_INSTRUCTION: &str = "\
CRITICAL: Every statement about the candidate must be traceable to an entry in FACTS. \
Do NOT add any candidate information, dates, skills or claims that are not in FACTS. \
If a requirement is not supported by FACTS, omit it entirely rather than fabricate \
supporting experience.";

/// Appended to every prompt whose answer is shown to the user verbatim.
pub const PLAIN_TEXT_INSTRUCTION: &str = "Output plain text only, no markdown.";
