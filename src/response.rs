use atty::Stream;
use colored_json::prelude::*;

/// Represents the status of a response from the Dataverse API.
///
/// We distinguish success and error responses with this enum.
/// Once the response is parsed, we can check if it's an error or not
/// and act accordingly.
#[derive(Debug, serde::Deserialize, serde::Serialize)]
pub enum Status {
    /// Indicates a successful response
    OK,
    /// Indicates an error response
    ERROR,
}

impl PartialEq for Status {
    fn eq(&self, other: &Self) -> bool {
        matches!(
            (self, other),
            (Status::OK, Status::OK) | (Status::ERROR, Status::ERROR)
        )
    }
}

impl Status {
    /// Returns the string representation of the status
    pub fn as_str(&self) -> &str {
        match self {
            Status::OK => "OK",
            Status::ERROR => "ERROR",
        }
    }

    /// Returns true if the status is OK
    pub fn is_ok(&self) -> bool {
        match self {
            Status::OK => true,
            Status::ERROR => false,
        }
    }

    /// Returns true if the status is ERROR
    pub fn is_err(&self) -> bool {
        !self.is_ok()
    }
}

/// A wrapper struct that models the response envelope returned by Dataverse.
///
/// This struct contains the response status, optional data payload
/// and an optional message.
#[derive(Debug, serde::Deserialize, serde::Serialize)]
pub struct Response<T> {
    /// The status of the response (OK or ERROR)
    pub status: Status,

    /// Optional data payload returned by the API
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    /// Optional message providing additional information
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<Message>,
}

impl<T> Response<T> {
    /// Returns the error message of an ERROR response, or a placeholder
    pub fn error_message(&self) -> String {
        match &self.message {
            Some(message) => message.to_string(),
            None => "Unknown error".to_string(),
        }
    }
}

/// Prints a JSON string to stdout, colorized when attached to a terminal.
///
/// If users are redirecting the output to a file, we don't want any
/// coloring escape codes but only the raw JSON to ensure that the output
/// is clean and can be used in other scripts.
pub fn print_json(json_str: &str) {
    if atty::is(Stream::Stdout) {
        println!(
            "{}",
            json_str
                .to_colored_json_auto()
                .unwrap_or_else(|_| json_str.to_string())
        );
    } else {
        println!("{}", json_str);
    }
}

/// Represents a message that can be either plain text or nested.
///
/// Some Dataverse endpoints wrap their error message in a nested
/// structure, so we accept both shapes.
#[derive(Debug, serde::Deserialize, serde::Serialize)]
#[serde(untagged)]
pub enum Message {
    /// A simple string message
    PlainMessage(String),
    /// A message wrapped in a nested structure
    NestedMessage(NestedMessage),
}

impl std::fmt::Display for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Message::PlainMessage(message) => write!(f, "{}", message),
            Message::NestedMessage(nested_message) => write!(f, "{}", nested_message),
        }
    }
}

/// Represents a nested message structure returned by some Dataverse endpoints
#[derive(Debug, serde::Deserialize, serde::Serialize)]
pub struct NestedMessage {
    /// The actual message content
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl std::fmt::Display for NestedMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.message.as_deref().unwrap_or(""))
    }
}
