//! Prompt templates for chunk summaries and the final synthesis.

/// System prompt for summarizing one chunk.
pub const CHUNK_SYSTEM_PROMPT: &str = "You are a professional patent analyst. Write a technical summary of this patent chunk.\n\
Focus on:\n\
- The technical problem being addressed\n\
- The core inventive solution\n\
- Any unique mechanisms or techniques\n\
\n\
Write clearly and concisely for engineers. No fluff or marketing tone.";

/// System prompt for merging several chunk summaries.
pub const MERGE_SYSTEM_PROMPT: &str = "Given the following individual summaries of a patent document, synthesize them into one clear, concise technical summary. \
Focus on identifying the central technical problem and the inventive solution. Keep the language objective and professional.";

/// Separator placed between partial summaries in the merge input.
pub const SUMMARY_SEPARATOR: &str = "\n\n";

/// System prompt for one chunk, prefixed by the caller's instruction when present.
pub fn chunk_system_prompt(custom_instruction: &str) -> String {
    if custom_instruction.is_empty() {
        CHUNK_SYSTEM_PROMPT.to_string()
    } else {
        format!("INSTRUCTION:\n{custom_instruction}\n\n{CHUNK_SYSTEM_PROMPT}")
    }
}
