//! Blocking HTTP client for the tally API.

use serde::Deserialize;

use tally_core::item::{NewTodo, TodoItem, TodoPatch};

/// Errors surfaced by the remote API.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// Non-2xx response; `message` carries the server envelope's `error`
    /// field when one was present.
    #[error("{message}")]
    Server { status: u16, message: String },

    /// Connection or IO failure before a response arrived.
    #[error("transport error: {0}")]
    Transport(String),
}

/// The surface the optimistic collection drives. Abstracted so its tests can
/// script failures without a server.
pub trait TodoApi {
    fn list(&self) -> Result<Vec<TodoItem>, ApiError>;
    fn create(&self, input: &NewTodo) -> Result<TodoItem, ApiError>;
    fn update(&self, id: &str, patch: &TodoPatch) -> Result<TodoItem, ApiError>;
    fn delete(&self, id: &str) -> Result<(), ApiError>;
}

#[derive(Debug, Deserialize)]
struct TodosEnvelope {
    todos: Vec<TodoItem>,
}

#[derive(Debug, Deserialize)]
struct DocEnvelope {
    doc: TodoItem,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: String,
}

/// ureq-backed [`TodoApi`] implementation with bearer-token auth.
pub struct ApiClient {
    agent: ureq::Agent,
    base_url: String,
    token: String,
}

impl ApiClient {
    #[must_use]
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            agent: ureq::Agent::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    fn request(&self, method: &str, path: &str) -> ureq::Request {
        self.agent
            .request(method, &format!("{}{path}", self.base_url))
            .set("Authorization", &format!("Bearer {}", self.token))
    }
}

fn classify(err: ureq::Error) -> ApiError {
    match err {
        ureq::Error::Status(status, response) => {
            let message = response
                .into_json::<ErrorEnvelope>()
                .map(|envelope| envelope.error)
                .unwrap_or_else(|_| format!("request failed with status {status}"));
            ApiError::Server { status, message }
        }
        ureq::Error::Transport(transport) => ApiError::Transport(transport.to_string()),
    }
}

fn body<T: serde::de::DeserializeOwned>(response: ureq::Response) -> Result<T, ApiError> {
    response
        .into_json()
        .map_err(|e| ApiError::Transport(e.to_string()))
}

impl TodoApi for ApiClient {
    fn list(&self) -> Result<Vec<TodoItem>, ApiError> {
        let response = self.request("GET", "/todos").call().map_err(classify)?;
        Ok(body::<TodosEnvelope>(response)?.todos)
    }

    fn create(&self, input: &NewTodo) -> Result<TodoItem, ApiError> {
        let response = self
            .request("POST", "/todos")
            .send_json(input)
            .map_err(classify)?;
        Ok(body::<DocEnvelope>(response)?.doc)
    }

    fn update(&self, id: &str, patch: &TodoPatch) -> Result<TodoItem, ApiError> {
        let response = self
            .request("PATCH", &format!("/todos/{id}"))
            .send_json(patch)
            .map_err(classify)?;
        Ok(body::<DocEnvelope>(response)?.doc)
    }

    fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.request("DELETE", &format!("/todos/{id}"))
            .call()
            .map_err(classify)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{ApiClient, ApiError};

    #[test]
    fn base_url_trailing_slash_is_normalized() {
        let client = ApiClient::new("http://localhost:8080/", "tok");
        assert_eq!(client.base_url, "http://localhost:8080");
    }

    #[test]
    fn server_errors_display_their_message() {
        let err = ApiError::Server {
            status: 400,
            message: "Title is required".to_string(),
        };
        assert_eq!(err.to_string(), "Title is required");
    }
}
