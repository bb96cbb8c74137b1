use serde::{Deserialize, Serialize};

/// Title used when a document has no (or an empty) `<title>`.
pub const NO_TITLE: &str = "No title found";

/// A fetched web document reduced to its title and visible text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub url: String,
    pub title: String,
    /// Visible body text, one text node per line. Never contains
    /// script or style content.
    pub text: String,
    /// Raw `href` values of every anchor, in document order. May be relative.
    pub links: Vec<String>,
}

impl Page {
    /// Title and text formatted as a prompt section.
    pub fn content(&self) -> String {
        format!(
            "Webpage Title:\n{}\nWebpage Contents:\n{}\n\n",
            self.title, self.text
        )
    }
}

/// Chat message author.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
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

/// A chat-completion request, independent of the backend wire format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatRequest {
    pub messages: Vec<Message>,
    /// Ask the backend to constrain its answer to a JSON object.
    pub json_output: bool,
}

impl ChatRequest {
    /// System instruction followed by a single user message.
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::system(system), Message::user(user)],
            json_output: false,
        }
    }

    pub fn json(mut self) -> Self {
        self.json_output = true;
        self
    }
}

/// A link the model judged relevant for a company brochure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkSelection {
    pub url: String,
    /// Page category, e.g. "about page" or "careers page".
    #[serde(rename = "type")]
    pub kind: String,
}

/// Envelope the link classifier is instructed to answer with.
#[derive(Debug, Clone, Deserialize)]
pub struct LinkSelectionResponse {
    pub links: Vec<LinkSelection>,
}
