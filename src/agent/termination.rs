//! Termination markers a prompt asks the model to emit at the end of a turn

/// Marker used by the onboarding prompts
pub const TERMINATE: &str = "TERMINATE";
/// Marker used by critique prompts once feedback is addressed
pub const APPROVE: &str = "APPROVE";

/// A literal word signalling a completed turn, matched case-insensitively
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminationMarker {
    marker: String,
    upper: String,
}

impl TerminationMarker {
    pub fn new<S: Into<String>>(marker: S) -> Self {
        let marker = marker.into();
        let upper = marker.to_uppercase();
        Self { marker, upper }
    }

    pub fn terminate() -> Self {
        Self::new(TERMINATE)
    }

    pub fn approve() -> Self {
        Self::new(APPROVE)
    }

    pub fn as_str(&self) -> &str {
        &self.marker
    }

    pub fn is_present(&self, text: &str) -> bool {
        !self.upper.is_empty() && text.to_uppercase().contains(&self.upper)
    }

    /// Drop lines that consist only of the marker
    pub fn strip(&self, text: &str) -> String {
        text.lines()
            .filter(|line| line.trim().to_uppercase() != self.upper)
            .collect::<Vec<_>>()
            .join("\n")
            .trim_end()
            .to_string()
    }

    /// Append the marker on its own line when the text lacks it
    pub fn ensure(&self, text: &str) -> String {
        if self.is_present(text) {
            text.to_string()
        } else {
            format!("{}\n{}", text, self.marker)
        }
    }
}

impl Default for TerminationMarker {
    fn default() -> Self {
        Self::terminate()
    }
}
