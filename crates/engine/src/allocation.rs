use crate::{
    EngineError, MoneyCents, ResultEngine,
    members::Username,
    split::{SplitRow, SplitRowDisplay, SplitSeed},
};

/// Whether the open expense is being edited or only viewed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TableMode {
    Edit,
    View,
}

/// Aggregate state of the owed/paid ledgers for the open session.
///
/// `remaining` is `total - sum_owed`; the allocation is valid when it sits
/// within the one-cent band. The paid sum is reported for display but
/// intentionally excluded from the validity gate: the system tracks debt
/// obligations authoritatively while paid contributions stay informational.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BalanceSummary {
    pub sum_owed: MoneyCents,
    pub sum_paid: MoneyCents,
    pub remaining: MoneyCents,
    pub is_valid: bool,
    /// True when the allocation is valid and the total is at least one cent.
    /// A zero or near-zero expense is never submittable.
    pub submit_enabled: bool,
}

impl BalanceSummary {
    /// The reconciliation line shown next to the table.
    #[must_use]
    pub fn status_line(&self, total: MoneyCents) -> String {
        if self.is_valid {
            format!("Balanced! ({total} split)")
        } else if self.remaining.is_positive() {
            format!("{} remaining", self.remaining)
        } else {
            format!("{} over assigned", self.remaining.abs())
        }
    }
}

/// Transient editor state bound to one open expense (or a new one).
///
/// Owns the in-memory working copy of the splits; the authoritative copy
/// lives in the external store and only ever changes through a full
/// replace-on-submit.
#[derive(Clone, Debug)]
pub struct AllocationSession {
    expense_id: Option<i64>,
    total: MoneyCents,
    payer: Username,
    mode: TableMode,
    rows: Vec<SplitRow>,
}

impl AllocationSession {
    /// Opens a session for the given participants, seeding every row with
    /// the default equal split.
    ///
    /// `expense_id` is `None` for a new expense and `Some` when an existing
    /// one was opened for view or edit.
    pub fn new(
        participants: Vec<Username>,
        payer: &str,
        total: MoneyCents,
        expense_id: Option<i64>,
        mode: TableMode,
    ) -> ResultEngine<Self> {
        if total.is_negative() {
            return Err(EngineError::InvalidAmount(
                "total amount must not be negative".to_string(),
            ));
        }
        let payer = Username::new(payer);
        if !participants.contains(&payer) {
            return Err(EngineError::KeyNotFound(
                "payer is not a participant".to_string(),
            ));
        }

        let mut session = Self {
            expense_id,
            total,
            payer,
            mode,
            rows: Vec::new(),
        };
        session.rows = session.default_rows(participants);
        Ok(session)
    }

    fn default_rows(&self, participants: Vec<Username>) -> Vec<SplitRow> {
        let share = self.total.equal_share(participants.len());
        participants
            .into_iter()
            .map(|member| {
                let paid = if member == self.payer {
                    self.total
                } else {
                    MoneyCents::ZERO
                };
                SplitRow::new(member, share, paid)
            })
            .collect()
    }

    /// Adopts stored splits over the defaults.
    ///
    /// Every row keeps its default unless a seed matches its member
    /// case-insensitively; matched rows take the stored owed/paid verbatim.
    /// In edit mode the payer's paid amount is then forced back onto the
    /// total, since the payer is defined as having fronted the entire
    /// expense.
    pub fn populate(&mut self, existing: &[SplitSeed]) -> ResultEngine<()> {
        for row in &mut self.rows {
            let seed = existing
                .iter()
                .find(|seed| Username::new(&seed.member) == row.member);
            if let Some(seed) = seed {
                *row = SplitRow::from_seed(row.member.clone(), seed)?;
            }
        }
        if self.mode == TableMode::Edit {
            self.lock_payer_paid();
        }
        Ok(())
    }

    fn lock_payer_paid(&mut self) {
        let total = self.total;
        if let Some(row) = self.rows.iter_mut().find(|row| row.member == self.payer) {
            row.paid = total;
            row.recompute_net();
        }
    }

    /// Replaces the total amount and re-derives every row's default
    /// owed/paid via the equal-split rule.
    ///
    /// Manual edits are discarded on purpose: a new total invalidates any
    /// hand-tuned allocation against the old one.
    pub fn set_total(&mut self, total: MoneyCents) -> ResultEngine<BalanceSummary> {
        self.require_edit_mode()?;
        if total.is_negative() {
            return Err(EngineError::InvalidAmount(
                "total amount must not be negative".to_string(),
            ));
        }
        self.total = total;
        let participants: Vec<Username> = self.rows.iter().map(|row| row.member.clone()).collect();
        self.rows = self.default_rows(participants);
        Ok(self.recompute())
    }

    /// Sets one member's owed share and re-runs the validator.
    pub fn edit_owed(&mut self, member: &str, value: MoneyCents) -> ResultEngine<BalanceSummary> {
        self.require_edit_mode()?;
        if value.is_negative() {
            return Err(EngineError::InvalidAmount(
                "owed amount must not be negative".to_string(),
            ));
        }
        let row = self.row_mut(member)?;
        row.owed = value;
        row.recompute_net();
        Ok(self.recompute())
    }

    /// Sets one member's paid contribution and re-runs the validator.
    ///
    /// The payer's paid amount is not editable: it always tracks the total
    /// (co-payers are not modeled).
    pub fn edit_paid(&mut self, member: &str, value: MoneyCents) -> ResultEngine<BalanceSummary> {
        self.require_edit_mode()?;
        if value.is_negative() {
            return Err(EngineError::InvalidAmount(
                "paid amount must not be negative".to_string(),
            ));
        }
        if Username::new(member) == self.payer {
            return Err(EngineError::NotEditable(
                "the payer's paid amount tracks the total".to_string(),
            ));
        }
        let row = self.row_mut(member)?;
        row.paid = value;
        row.recompute_net();
        Ok(self.recompute())
    }

    /// Aggregates the owed/paid ledgers and decides submit-eligibility.
    #[must_use]
    pub fn recompute(&self) -> BalanceSummary {
        let mut sum_owed = MoneyCents::ZERO;
        let mut sum_paid = MoneyCents::ZERO;
        for row in &self.rows {
            sum_owed += row.owed;
            sum_paid += row.paid;
        }
        let remaining = self.total - sum_owed;
        let is_valid = remaining.abs() <= MoneyCents::TOLERANCE;
        BalanceSummary {
            sum_owed,
            sum_paid,
            remaining,
            is_valid,
            submit_enabled: is_valid && self.total >= MoneyCents::new(1),
        }
    }

    fn require_edit_mode(&self) -> ResultEngine<()> {
        if self.mode != TableMode::Edit {
            return Err(EngineError::NotEditable(
                "the expense is open for viewing only".to_string(),
            ));
        }
        Ok(())
    }

    fn row_mut(&mut self, member: &str) -> ResultEngine<&mut SplitRow> {
        let member = Username::new(member);
        self.rows
            .iter_mut()
            .find(|row| row.member == member)
            .ok_or_else(|| EngineError::KeyNotFound(member.to_string()))
    }

    #[must_use]
    pub fn expense_id(&self) -> Option<i64> {
        self.expense_id
    }

    #[must_use]
    pub fn total(&self) -> MoneyCents {
        self.total
    }

    #[must_use]
    pub fn payer(&self) -> &Username {
        &self.payer
    }

    #[must_use]
    pub fn mode(&self) -> TableMode {
        self.mode
    }

    #[must_use]
    pub fn rows(&self) -> &[SplitRow] {
        &self.rows
    }

    /// Per-member display strings for the UI collaborator.
    #[must_use]
    pub fn row_displays(&self) -> Vec<SplitRowDisplay> {
        self.rows
            .iter()
            .map(|row| SplitRowDisplay::from_row(row, row.member == self.payer))
            .collect()
    }
}
