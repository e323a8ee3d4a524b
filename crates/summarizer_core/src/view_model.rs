use crate::ModelChoice;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub url_input: String,
    pub model: ModelChoice,
    /// Summary markdown, error text or validation message.
    pub output: String,
    pub status_text: String,
    pub busy: bool,
    pub summarize_enabled: bool,
}
