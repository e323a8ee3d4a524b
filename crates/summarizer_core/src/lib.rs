//! Summarizer core: pure state machine and view-model helpers.
mod effect;
mod msg;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::Msg;
pub use state::{AppState, Failure, FailureClass, ModelChoice, Phase, RequestId, Stage};
pub use update::{
    update, GENERIC_ERROR_PREFIX, NETWORK_ERROR_PREFIX, VALIDATION_MESSAGE,
};
pub use view_model::AppViewModel;
