//! Response sanitization for model output wrapped in Markdown code fences

use regex::Regex;

/// Fence marker that may wrap a model reply
pub const CODE_FENCE: &str = "```";

/// Strips Markdown code fences from a model reply
#[derive(Debug, Clone)]
pub struct ResponseSanitizer {
    opening_fence_regex: Regex,
}

impl ResponseSanitizer {
    pub fn new() -> Self {
        Self {
            // Opening fence plus an optional language tag such as ```json
            opening_fence_regex: Regex::new(r"^```[a-zA-Z0-9]*\s*")
                .expect("Invalid opening fence regex"),
        }
    }

    /// Remove a leading fence (with its language tag) and any trailing fence.
    ///
    /// Text that does not start with a fence after trimming is returned trimmed
    /// but otherwise untouched.
    pub fn strip_fences<'a>(&self, input: &'a str) -> &'a str {
        let trimmed = input.trim();
        if !trimmed.starts_with(CODE_FENCE) {
            return trimmed;
        }

        let body = match self.opening_fence_regex.find(trimmed) {
            Some(m) => &trimmed[m.end()..],
            None => trimmed,
        };

        body.trim_end_matches('`').trim()
    }

    /// Whether the reply is wrapped in a code fence
    pub fn is_fenced(&self, input: &str) -> bool {
        input.trim_start().starts_with(CODE_FENCE)
    }
}

impl Default for ResponseSanitizer {
    fn default() -> Self {
        Self::new()
    }
}
