//! Split reconciliation engine for a shared-expense group ledger.
//!
//! Given a total expense amount, a payer, and a group's membership, the
//! engine computes and validates a per-member allocation of owed (share of
//! cost) and paid (cash fronted) amounts, keeps the two ledgers consistent
//! while a user edits them, and decides when an allocation may be submitted.
//! It also maintains the deduplicated, date-ordered working set of expenses
//! accumulated across paginated fetches.
//!
//! The engine is pure: it performs no I/O and holds no ambient state. Every
//! operation works on an explicit session or working-set value handed in by
//! the caller.

pub use allocation::{AllocationSession, BalanceSummary, TableMode};
pub use currency::Currency;
pub use error::EngineError;
pub use members::{Username, resolve_participants};
pub use money::MoneyCents;
pub use split::{NetStanding, SplitRow, SplitRowDisplay, SplitSeed};
pub use submit::{WriteRequest, WriteSplit, WriteTarget};
pub use working_set::{ExpenseRecord, ExpenseWorkingSet};

mod allocation;
mod currency;
mod error;
mod members;
mod money;
mod split;
mod submit;
mod working_set;

type ResultEngine<T> = Result<T, EngineError>;
