use crate::view_model::AppViewModel;

pub type RequestId = u64;

/// Which chat backend a summary request goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModelChoice {
    #[default]
    Hosted,
    Local,
}

impl ModelChoice {
    pub fn label(self) -> &'static str {
        match self {
            ModelChoice::Hosted => "Hosted (gpt-4o-mini)",
            ModelChoice::Local => "Local (llama3.2)",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Fetching,
    Extracting,
    Generating,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// The page could not be downloaded.
    Network,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub class: FailureClass,
    pub message: String,
}

impl Failure {
    pub fn network(message: impl Into<String>) -> Self {
        Self {
            class: FailureClass::Network,
            message: message.into(),
        }
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self {
            class: FailureClass::Other,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Ready,
    /// Trigger was pressed with a blank URL.
    NeedsUrl,
    Working {
        request_id: RequestId,
        stage: Stage,
    },
    Completed,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    url_input: String,
    model: ModelChoice,
    phase: Phase,
    output: String,
    last_request_id: RequestId,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            url_input: self.url_input.clone(),
            model: self.model,
            output: self.output.clone(),
            status_text: status_text(self.phase),
            busy: self.is_busy(),
            summarize_enabled: !self.is_busy(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_busy(&self) -> bool {
        matches!(self.phase, Phase::Working { .. })
    }

    /// Returns whether a render is needed and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn url_input(&self) -> &str {
        &self.url_input
    }

    pub(crate) fn model(&self) -> ModelChoice {
        self.model
    }

    pub(crate) fn set_url_input(&mut self, text: String) {
        if self.url_input != text {
            self.url_input = text;
            self.mark_dirty();
        }
    }

    pub(crate) fn set_model(&mut self, model: ModelChoice) {
        if self.model != model {
            self.model = model;
            self.mark_dirty();
        }
    }

    pub(crate) fn reject_blank_url(&mut self, message: &str) {
        self.phase = Phase::NeedsUrl;
        self.output = message.to_string();
        self.mark_dirty();
    }

    /// Starts a new request and returns its id.
    pub(crate) fn begin_request(&mut self) -> RequestId {
        self.last_request_id += 1;
        let request_id = self.last_request_id;
        self.phase = Phase::Working {
            request_id,
            stage: Stage::Fetching,
        };
        self.output.clear();
        self.mark_dirty();
        request_id
    }

    pub(crate) fn is_current(&self, request_id: RequestId) -> bool {
        matches!(self.phase, Phase::Working { request_id: current, .. } if current == request_id)
    }

    pub(crate) fn apply_stage(&mut self, request_id: RequestId, stage: Stage) {
        if !self.is_current(request_id) {
            return;
        }
        self.phase = Phase::Working { request_id, stage };
        self.mark_dirty();
    }

    pub(crate) fn complete(&mut self, request_id: RequestId, output: String) {
        if !self.is_current(request_id) {
            return;
        }
        self.phase = Phase::Completed;
        self.output = output;
        self.mark_dirty();
    }

    pub(crate) fn fail(&mut self, request_id: RequestId, output: String) {
        if !self.is_current(request_id) {
            return;
        }
        self.phase = Phase::Failed;
        self.output = output;
        self.mark_dirty();
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}

fn status_text(phase: Phase) -> String {
    match phase {
        Phase::Ready => "Ready".to_string(),
        Phase::NeedsUrl => "Waiting for a URL".to_string(),
        Phase::Working { stage, .. } => match stage {
            Stage::Fetching => "Fetching page...".to_string(),
            Stage::Extracting => "Extracting text...".to_string(),
            Stage::Generating => "Asking the model...".to_string(),
            Stage::Done => "Finishing...".to_string(),
        },
        Phase::Completed => "Summary ready".to_string(),
        Phase::Failed => "Failed".to_string(),
    }
}
