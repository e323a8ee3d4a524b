use serde::Serialize;

pub const SYSTEM_PROMPT: &str = "You are an expert AI assistant. \
Given text from a website, provide the user with a short summary of the website. \
Ignore unnecessary or navigational text. Respond in markdown.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Builds the system/user pair for one page. Body text is passed through
/// untruncated.
pub fn build_prompt(title: &str, body_text: &str) -> Vec<ChatMessage> {
    let user = format!(
        "Here is some content from this website titled {title}.\n\
         The content is as follows.\n\
         {body_text}\n\
         Provide a summary of the key points in markdown. \
         If you see any news or announcements, include a summary about that too."
    );
    vec![ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(user)]
}
