use crate::{
    EngineError, MoneyCents, ResultEngine, allocation::AllocationSession, members::Username,
};

/// Create a new expense or fully replace an existing one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WriteTarget {
    Create,
    Update(i64),
}

/// A validated allocation assembled for the authoritative store.
///
/// Amounts are already reconciled cents; the transport layer converts them
/// back to wire decimals when serializing.
#[derive(Clone, Debug, PartialEq)]
pub struct WriteRequest {
    pub target: WriteTarget,
    pub amount: MoneyCents,
    pub description: String,
    pub paid_by: Username,
    pub splits: Vec<WriteSplit>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct WriteSplit {
    pub member: Username,
    pub owed: MoneyCents,
    pub paid: MoneyCents,
}

impl AllocationSession {
    /// Assembles the create/update request for this session.
    ///
    /// Only callable while the validator reports the allocation submittable;
    /// rows with nothing owed and nothing paid are omitted from the
    /// persisted set. Create vs update is chosen by whether the session was
    /// opened on an existing expense.
    pub fn build_write_request(&self, description: &str) -> ResultEngine<WriteRequest> {
        let summary = self.recompute();
        if !summary.submit_enabled {
            return Err(EngineError::Unbalanced(format!(
                "total owed {} does not balance the amount {}",
                summary.sum_owed,
                self.total()
            )));
        }

        let description = description.trim();
        if description.is_empty() {
            return Err(EngineError::InvalidAmount(
                "description must not be empty".to_string(),
            ));
        }

        let splits = self
            .rows()
            .iter()
            .filter(|row| !row.is_empty())
            .map(|row| WriteSplit {
                member: row.member.clone(),
                owed: row.owed,
                paid: row.paid,
            })
            .collect();

        Ok(WriteRequest {
            target: match self.expense_id() {
                Some(id) => WriteTarget::Update(id),
                None => WriteTarget::Create,
            },
            amount: self.total(),
            description: description.to_string(),
            paid_by: self.payer().clone(),
            splits,
        })
    }
}
