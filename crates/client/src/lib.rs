//! HTTP client and coordination layer for the group-expense API.
//!
//! [`ApiClient`] wraps the network collaborator (bearer-authenticated
//! requests, status-code error classification); [`GroupContext`] carries the
//! per-group state the engine operates on: the expense working set,
//! sequential pagination, fresh-detail loading for the editor, and the
//! submit/reset cycle.

pub use api::{ApiClient, ClientError};
pub use auth::Credentials;
pub use context::GroupContext;

mod api;
mod auth;
mod context;
