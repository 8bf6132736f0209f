use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

pub mod group {
    use super::*;

    /// One entry of a group's member list.
    ///
    /// The server is inconsistent about the shape here: older deployments
    /// return bare usernames, newer ones return `{ "username": ... }`
    /// objects. Both deserialize into this enum; callers should only ever
    /// look at [`MemberRef::username`].
    #[derive(Clone, Debug, Serialize, Deserialize)]
    #[serde(untagged)]
    pub enum MemberRef {
        Name(String),
        Object { username: String },
    }

    impl MemberRef {
        pub fn username(&self) -> &str {
            match self {
                Self::Name(name) => name,
                Self::Object { username } => username,
            }
        }
    }

    /// Response body for fetching one group.
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct GroupDetail {
        pub id: i64,
        pub name: Option<String>,
        pub description: Option<String>,
        pub created_by: Option<String>,
        #[serde(default)]
        pub members: Vec<MemberRef>,
        pub total_members: Option<u32>,
    }
}

pub mod expense {
    use super::*;

    /// An expense as returned by the server, with or without its splits
    /// (list pages may omit them, the single-expense endpoint never does).
    #[derive(Clone, Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ExpenseView {
        pub id: i64,
        /// Total cost in major units with two decimals.
        pub amount: f64,
        pub description: Option<String>,
        pub paid_by: Option<String>,
        /// Server-assigned creation timestamp (RFC3339 with offset).
        pub date: Option<DateTime<FixedOffset>>,
        #[serde(default)]
        pub splits: Vec<SplitDetail>,
    }

    /// One member's owed/paid allocation inside an expense.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct SplitDetail {
        pub member_username: String,
        pub owed_amount: f64,
        pub paid_amount: f64,
        /// `paid - owed`, persisted server-side for quick queries. Optional:
        /// clients must be able to derive it.
        pub net_balance: Option<f64>,
    }

    /// Request body for creating or replacing an expense.
    ///
    /// The same shape serves `POST .../expenses` (create) and
    /// `PUT .../expenses/{id}` (full replace, no partial patches).
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ExpenseWriteRequest {
        pub amount: f64,
        pub description: String,
        pub paid_by: String,
        pub split_details: Vec<SplitWrite>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct SplitWrite {
        pub member_username: String,
        pub owed_amount: f64,
        pub paid_amount: f64,
    }
}

pub mod error {
    use super::*;

    /// Error body shape used by the server for non-2xx responses.
    ///
    /// Some handlers emit `{"message": ...}`, some `{"error": ...}`, and a
    /// few fall back to plain text; both fields are optional so a partial
    /// parse still yields something displayable.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ErrorBody {
        pub message: Option<String>,
        pub error: Option<String>,
    }
}

#[cfg(test)]
mod tests {
    use super::group::MemberRef;

    #[test]
    fn member_ref_accepts_both_wire_shapes() {
        let bare: Vec<MemberRef> = serde_json::from_str(r#"["Alice", "bob"]"#).unwrap();
        assert_eq!(bare[0].username(), "Alice");

        let object: Vec<MemberRef> =
            serde_json::from_str(r#"[{"username": "carol"}]"#).unwrap();
        assert_eq!(object[0].username(), "carol");
    }
}
