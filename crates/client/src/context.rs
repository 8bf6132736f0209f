use api_types::{
    expense::{ExpenseView, SplitDetail},
    group::{GroupDetail, MemberRef},
};
use engine::{
    AllocationSession, ExpenseRecord, ExpenseWorkingSet, MoneyCents, SplitSeed, TableMode,
    Username, resolve_participants,
};

use crate::api::{ApiClient, ClientError};

/// Mutable UI-bound state for one displayed group, passed explicitly into
/// every operation instead of living in ambient globals.
///
/// Owns the expense working set and the in-flight flags that keep network
/// operations sequential: load-more is ignored while a page fetch is
/// outstanding, and submission is exclusive with itself. All methods run on
/// one logical thread; the flags span the await points inside them.
#[derive(Debug)]
pub struct GroupContext {
    group_id: i64,
    group: Option<GroupDetail>,
    participants: Vec<Username>,
    working_set: ExpenseWorkingSet,
    fetch_in_flight: bool,
    submit_in_flight: bool,
}

impl GroupContext {
    #[must_use]
    pub fn new(group_id: i64, page_size: usize) -> Self {
        Self {
            group_id,
            group: None,
            participants: Vec::new(),
            working_set: ExpenseWorkingSet::new(page_size),
            fetch_in_flight: false,
            submit_in_flight: false,
        }
    }

    /// Loads the group detail and resolves the participant set.
    ///
    /// Switching the context to a (possibly different) group resets the
    /// working set: merged pages from another group must never leak into
    /// this view.
    pub async fn load_group(&mut self, api: &ApiClient) -> Result<(), ClientError> {
        let detail = api.group_detail(self.group_id).await?;
        self.participants = resolve_participants(
            detail.members.iter().map(MemberRef::username),
            api.credentials().username(),
        );
        self.group = Some(detail);
        self.working_set.reset();
        Ok(())
    }

    /// Fetches and merges the next page of expenses.
    ///
    /// Returns whether more pages may exist. A call while a fetch is
    /// already outstanding is ignored, keeping pagination sequential.
    pub async fn load_more(&mut self, api: &ApiClient) -> Result<bool, ClientError> {
        if self.fetch_in_flight {
            tracing::debug!(group_id = self.group_id, "page fetch outstanding, ignoring");
            return Ok(self.working_set.has_more());
        }
        if !self.working_set.has_more() {
            return Ok(false);
        }

        self.fetch_in_flight = true;
        let result = api
            .expenses_page(
                self.group_id,
                self.working_set.next_page(),
                self.working_set.page_size(),
            )
            .await;
        self.fetch_in_flight = false;

        let mut records = Vec::new();
        for view in result? {
            records.push(record_from_view(view)?);
        }
        self.working_set.merge(records);
        Ok(self.working_set.has_more())
    }

    /// Clears the working set and fetches the first page again.
    pub async fn refresh(&mut self, api: &ApiClient) -> Result<bool, ClientError> {
        self.working_set.reset();
        self.load_more(api).await
    }

    /// Opens an expense for viewing or editing.
    ///
    /// Always fetches the fresh detail; the cached list entry is explicitly
    /// not an acceptable fallback. Editing additionally requires the acting
    /// user to be a member and the payer of the expense.
    pub async fn open_expense(
        &self,
        api: &ApiClient,
        expense_id: i64,
        mode: TableMode,
    ) -> Result<AllocationSession, ClientError> {
        let view = api.expense_detail(self.group_id, expense_id).await?;
        let acting = api.credentials().username();

        let payer = view.paid_by.as_deref().unwrap_or(acting);
        if mode == TableMode::Edit {
            self.ensure_member(acting)?;
            if Username::new(payer) != Username::new(acting) {
                return Err(ClientError::Forbidden(
                    "only the user who paid for this expense can update it".to_string(),
                ));
            }
        }

        let total = MoneyCents::from_major(view.amount)?;

        // A payer who has since left the group still needs a row in the
        // table, so they join the participant set like the acting user does.
        let mut participants = self.participants.clone();
        let payer_user = Username::new(payer);
        if !payer_user.is_empty() && !participants.contains(&payer_user) {
            participants.push(payer_user);
        }

        let mut session =
            AllocationSession::new(participants, payer, total, Some(view.id), mode)?;
        let seeds: Vec<SplitSeed> = view.splits.iter().map(seed_from_detail).collect();
        session.populate(&seeds)?;
        Ok(session)
    }

    /// Starts a session for a brand-new expense, payer = acting user,
    /// default equal split.
    pub fn new_expense(
        &self,
        api: &ApiClient,
        total: MoneyCents,
    ) -> Result<AllocationSession, ClientError> {
        let acting = api.credentials().username();
        self.ensure_member(acting)?;
        let session = AllocationSession::new(
            self.participants.clone(),
            acting,
            total,
            None,
            TableMode::Edit,
        )?;
        Ok(session)
    }

    /// Sends the session's allocation to the store (create or update by the
    /// session's target) and resets the working set on success.
    ///
    /// The caller discards the session and calls [`GroupContext::refresh`]
    /// afterwards so the list reflects authoritative state; a stale local
    /// merge is never kept across a successful write.
    pub async fn submit(
        &mut self,
        api: &ApiClient,
        session: &AllocationSession,
        description: &str,
    ) -> Result<ExpenseView, ClientError> {
        if self.submit_in_flight {
            return Err(ClientError::Validation(
                "a submission is already in flight".to_string(),
            ));
        }
        self.ensure_member(api.credentials().username())?;
        let request = session.build_write_request(description)?;

        self.submit_in_flight = true;
        let result = api.write_expense(self.group_id, &request).await;
        self.submit_in_flight = false;

        let saved = result?;
        self.working_set.reset();
        Ok(saved)
    }

    /// Whether the acting user fronted this expense (drives the
    /// update-vs-view affordance in a UI).
    #[must_use]
    pub fn acting_is_payer(&self, api: &ApiClient, record: &ExpenseRecord) -> bool {
        record.paid_by == Username::new(api.credentials().username())
    }

    fn ensure_member(&self, acting: &str) -> Result<(), ClientError> {
        let Some(group) = &self.group else {
            return Err(ClientError::Validation(
                "group detail not loaded".to_string(),
            ));
        };
        if !member_of(group, acting) {
            return Err(ClientError::Forbidden(
                "you are not a member of this group".to_string(),
            ));
        }
        Ok(())
    }

    #[must_use]
    pub fn group_id(&self) -> i64 {
        self.group_id
    }

    #[must_use]
    pub fn group(&self) -> Option<&GroupDetail> {
        self.group.as_ref()
    }

    #[must_use]
    pub fn participants(&self) -> &[Username] {
        &self.participants
    }

    #[must_use]
    pub fn working_set(&self) -> &ExpenseWorkingSet {
        &self.working_set
    }
}

fn member_of(group: &GroupDetail, acting: &str) -> bool {
    let acting = Username::new(acting);
    group
        .members
        .iter()
        .any(|member| Username::new(member.username()) == acting)
}

fn seed_from_detail(detail: &SplitDetail) -> SplitSeed {
    SplitSeed {
        member: detail.member_username.clone(),
        owed: detail.owed_amount,
        paid: detail.paid_amount,
        net: detail.net_balance,
    }
}

fn record_from_view(view: ExpenseView) -> Result<ExpenseRecord, ClientError> {
    let amount = MoneyCents::from_major(view.amount)?;
    let splits = view.splits.iter().map(seed_from_detail).collect();
    Ok(ExpenseRecord {
        id: view.id,
        amount,
        description: view.description.unwrap_or_default(),
        paid_by: Username::new(view.paid_by.as_deref().unwrap_or_default()),
        date: view.date,
        splits,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group_with(members: &[&str]) -> GroupDetail {
        GroupDetail {
            id: 1,
            name: Some("flat".to_string()),
            description: None,
            created_by: None,
            members: members
                .iter()
                .map(|name| MemberRef::Name((*name).to_string()))
                .collect(),
            total_members: Some(members.len() as u32),
        }
    }

    #[test]
    fn membership_check_is_case_insensitive() {
        let group = group_with(&["Alice", "bob"]);
        assert!(member_of(&group, "alice"));
        assert!(member_of(&group, "BOB"));
        assert!(!member_of(&group, "carol"));
    }

    #[test]
    fn view_maps_into_a_record() {
        let view = ExpenseView {
            id: 9,
            amount: 60.0,
            description: Some("dinner".to_string()),
            paid_by: Some("Alice".to_string()),
            date: None,
            splits: vec![SplitDetail {
                member_username: "bob".to_string(),
                owed_amount: 20.0,
                paid_amount: 0.0,
                net_balance: Some(-20.0),
            }],
        };

        let record = record_from_view(view).unwrap();
        assert_eq!(record.amount, MoneyCents::new(6000));
        assert_eq!(record.paid_by.as_str(), "alice");
        assert_eq!(record.splits.len(), 1);
        assert_eq!(record.splits[0].net, Some(-20.0));
    }

    #[test]
    fn rejects_non_finite_amounts() {
        let view = ExpenseView {
            id: 9,
            amount: f64::NAN,
            description: None,
            paid_by: None,
            date: None,
            splits: Vec::new(),
        };
        assert!(record_from_view(view).is_err());
    }
}
