use api_types::{
    error::ErrorBody,
    expense::{ExpenseView, ExpenseWriteRequest, SplitWrite},
    group::GroupDetail,
};
use engine::{WriteRequest, WriteTarget};
use reqwest::{StatusCode, Url};

use crate::auth::Credentials;

/// Errors surfaced by the HTTP layer, classified by what the caller should
/// do about them.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Missing or expired credential. Fatal to the session: the user must
    /// re-authenticate before anything else can happen.
    #[error("authentication failed, please log in again")]
    Unauthorized,
    /// The acting user is not allowed to do this (not a group member, or not
    /// the payer). Recoverable, no state change.
    #[error("access denied: {0}")]
    Forbidden(String),
    #[error("not found: {0}")]
    NotFound(String),
    /// Rejected input. Local validation errors use this variant too, so they
    /// read the same whether they were caught before or after the wire.
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("server error: {0}")]
    Server(String),
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error(transparent)]
    Engine(#[from] engine::EngineError),
}

/// Best-effort extraction of a human-readable message from an error body:
/// JSON `message`, then JSON `error`, then the truncated raw text.
pub(crate) fn extract_message(body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        if let Some(message) = parsed.message.filter(|m| !m.is_empty()) {
            return message;
        }
        if let Some(error) = parsed.error.filter(|e| !e.is_empty()) {
            return error;
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "unknown error".to_string();
    }
    let mut message: String = trimmed.chars().take(200).collect();
    if message.len() < trimmed.len() {
        message.push('…');
    }
    message
}

fn classify(status: StatusCode, body: &str) -> ClientError {
    let message = extract_message(body);
    match status.as_u16() {
        401 => ClientError::Unauthorized,
        403 => ClientError::Forbidden(message),
        404 => ClientError::NotFound(message),
        400 | 422 => ClientError::Validation(message),
        _ => ClientError::Server(message),
    }
}

/// Thin wrapper over the group-expense HTTP API.
///
/// Carries the bearer credential on every request and maps non-2xx
/// responses into [`ClientError`]. No retries: a failed call is surfaced
/// and the user re-triggers it.
#[derive(Clone, Debug)]
pub struct ApiClient {
    base_url: Url,
    http: reqwest::Client,
    credentials: Credentials,
}

impl ApiClient {
    pub fn new(base_url: &str, credentials: Credentials) -> Result<Self, ClientError> {
        let base_url = Url::parse(base_url)
            .map_err(|err| ClientError::Server(format!("invalid base_url: {err}")))?;
        Ok(Self {
            base_url,
            http: reqwest::Client::new(),
            credentials,
        })
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(path)
            .map_err(|err| ClientError::Server(format!("invalid base_url: {err}")))
    }

    async fn decode<T: serde::de::DeserializeOwned>(
        &self,
        res: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = res.status();
        if status.is_success() {
            return res.json::<T>().await.map_err(ClientError::Transport);
        }
        let body = res.text().await.unwrap_or_default();
        Err(classify(status, &body))
    }

    /// Fetches one group with its member list.
    pub async fn group_detail(&self, group_id: i64) -> Result<GroupDetail, ClientError> {
        let endpoint = self.endpoint(&format!("api/groups/{group_id}"))?;
        let res = self
            .http
            .get(endpoint)
            .bearer_auth(self.credentials.token())
            .send()
            .await?;
        self.decode(res).await
    }

    /// Fetches one page of a group's expenses (`page` is 0-based).
    pub async fn expenses_page(
        &self,
        group_id: i64,
        page: u32,
        size: usize,
    ) -> Result<Vec<ExpenseView>, ClientError> {
        let endpoint = self.endpoint(&format!(
            "api/groups/{group_id}/expenses?page={page}&size={size}"
        ))?;
        let res = self
            .http
            .get(endpoint)
            .bearer_auth(self.credentials.token())
            .send()
            .await?;
        self.decode(res).await
    }

    /// Fetches one expense with its splits.
    ///
    /// This is the sole source of truth when opening an expense for view or
    /// edit; callers must not fall back to cached list entries.
    pub async fn expense_detail(
        &self,
        group_id: i64,
        expense_id: i64,
    ) -> Result<ExpenseView, ClientError> {
        let endpoint = self.endpoint(&format!("api/groups/{group_id}/expenses/{expense_id}"))?;
        let res = self
            .http
            .get(endpoint)
            .bearer_auth(self.credentials.token())
            .send()
            .await?;
        self.decode(res).await
    }

    /// Creates or fully replaces an expense; the response echoes the
    /// persisted expense.
    pub async fn write_expense(
        &self,
        group_id: i64,
        request: &WriteRequest,
    ) -> Result<ExpenseView, ClientError> {
        let body = to_wire(request);
        let res = match request.target {
            WriteTarget::Create => {
                let endpoint = self.endpoint(&format!("api/groups/{group_id}/expenses"))?;
                self.http
                    .post(endpoint)
                    .bearer_auth(self.credentials.token())
                    .json(&body)
                    .send()
                    .await?
            }
            WriteTarget::Update(expense_id) => {
                let endpoint =
                    self.endpoint(&format!("api/groups/{group_id}/expenses/{expense_id}"))?;
                self.http
                    .put(endpoint)
                    .bearer_auth(self.credentials.token())
                    .json(&body)
                    .send()
                    .await?
            }
        };
        self.decode(res).await
    }
}

fn to_wire(request: &WriteRequest) -> ExpenseWriteRequest {
    ExpenseWriteRequest {
        amount: request.amount.to_major(),
        description: request.description.clone(),
        paid_by: request.paid_by.to_string(),
        split_details: request
            .splits
            .iter()
            .map(|split| SplitWrite {
                member_username: split.member.to_string(),
                owed_amount: split.owed.to_major(),
                paid_amount: split.paid.to_major(),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_json_message_first() {
        assert_eq!(
            extract_message(r#"{"message": "split is unbalanced"}"#),
            "split is unbalanced"
        );
        assert_eq!(extract_message(r#"{"error": "no such group"}"#), "no such group");
    }

    #[test]
    fn falls_back_to_raw_text() {
        assert_eq!(extract_message("Forbidden"), "Forbidden");
        assert_eq!(extract_message("   "), "unknown error");
    }

    #[test]
    fn classifies_statuses_per_taxonomy() {
        assert!(matches!(
            classify(StatusCode::UNAUTHORIZED, ""),
            ClientError::Unauthorized
        ));
        assert!(matches!(
            classify(StatusCode::FORBIDDEN, "nope"),
            ClientError::Forbidden(_)
        ));
        assert!(matches!(
            classify(StatusCode::NOT_FOUND, ""),
            ClientError::NotFound(_)
        ));
        assert!(matches!(
            classify(StatusCode::BAD_REQUEST, ""),
            ClientError::Validation(_)
        ));
        assert!(matches!(
            classify(StatusCode::UNPROCESSABLE_ENTITY, ""),
            ClientError::Validation(_)
        ));
        assert!(matches!(
            classify(StatusCode::BAD_GATEWAY, ""),
            ClientError::Server(_)
        ));
    }

    #[test]
    fn wire_request_round_trips_cents() {
        let session = engine::AllocationSession::new(
            engine::resolve_participants(["alice", "bob"], "alice"),
            "alice",
            engine::MoneyCents::new(6000),
            None,
            engine::TableMode::Edit,
        )
        .unwrap();
        let request = session.build_write_request("dinner").unwrap();
        let wire = to_wire(&request);
        assert_eq!(wire.amount, 60.0);
        assert_eq!(wire.paid_by, "alice");
        assert_eq!(wire.split_details.len(), 2);
        assert_eq!(wire.split_details[0].owed_amount, 30.0);
    }
}
