use crate::{AppState, Effect, Failure, FailureClass, Msg, Stage};

/// Shown instead of running the pipeline when the URL field is blank.
pub const VALIDATION_MESSAGE: &str = "Please enter a website URL.";
pub const NETWORK_ERROR_PREFIX: &str = "Network error: ";
pub const GENERIC_ERROR_PREFIX: &str = "An error occurred: ";

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::UrlChanged(text) => {
            state.set_url_input(text);
            Vec::new()
        }
        Msg::ModelSelected(model) => {
            state.set_model(model);
            Vec::new()
        }
        Msg::SummarizeClicked => {
            if state.is_busy() {
                return (state, Vec::new());
            }
            let url = state.url_input().trim().to_string();
            if url.is_empty() {
                state.reject_blank_url(VALIDATION_MESSAGE);
                return (state, Vec::new());
            }
            let model = state.model();
            let request_id = state.begin_request();
            vec![Effect::Summarize {
                request_id,
                url,
                model,
            }]
        }
        Msg::StageChanged { request_id, stage } => {
            // Done is implied by the result message that follows.
            if stage != Stage::Done {
                state.apply_stage(request_id, stage);
            }
            Vec::new()
        }
        Msg::SummaryReady {
            request_id,
            markdown,
        } => {
            state.complete(request_id, markdown);
            Vec::new()
        }
        Msg::SummaryFailed {
            request_id,
            failure,
        } => {
            state.fail(request_id, format_failure(&failure));
            Vec::new()
        }
    };

    (state, effects)
}

fn format_failure(failure: &Failure) -> String {
    let prefix = match failure.class {
        FailureClass::Network => NETWORK_ERROR_PREFIX,
        FailureClass::Other => GENERIC_ERROR_PREFIX,
    };
    format!("{prefix}{}", failure.message)
}
