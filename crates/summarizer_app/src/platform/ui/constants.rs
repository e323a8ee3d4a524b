use std::time::Duration;

pub const APP_ID: &str = "page_summarizer";
pub const WINDOW_TITLE: &str = "Text Summariser";
pub const WINDOW_WIDTH: f32 = 400.0;
pub const WINDOW_HEIGHT: f32 = 600.0;

pub const LABEL_URL: &str = "Enter Website";
pub const HINT_URL: &str = "https://example.com";
pub const BUTTON_SUMMARIZE: &str = "Summarize";
pub const OUTPUT_ROWS: usize = 24;

/// How often to poll the engine while a request is in flight.
pub const BUSY_POLL_INTERVAL: Duration = Duration::from_millis(75);
