use crate::{EngineError, MoneyCents, members::Username};

/// Raw split values as they arrive from the authoritative store, before the
/// allocation table adopts them.
///
/// Amounts are still decimal major units here; the table converts them to
/// cents exactly once while populating.
#[derive(Clone, Debug, PartialEq)]
pub struct SplitSeed {
    pub member: String,
    pub owed: f64,
    pub paid: f64,
    /// `paid - owed` as persisted server-side. Optional; the table derives it
    /// when absent and cross-checks it when present.
    pub net: Option<f64>,
}

/// Qualitative reading of a net balance.
///
/// The one-cent band around zero absorbs rounding noise and is treated as
/// exact equality.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NetStanding {
    /// Net above the band: the member fronted more than their share.
    GetsBack,
    /// Net below the band: the member still owes.
    Owes,
    Settled,
}

impl NetStanding {
    #[must_use]
    pub fn from_net(net: MoneyCents) -> Self {
        if net > MoneyCents::TOLERANCE {
            Self::GetsBack
        } else if net < -MoneyCents::TOLERANCE {
            Self::Owes
        } else {
            Self::Settled
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::GetsBack => "gets back",
            Self::Owes => "owes",
            Self::Settled => "settled",
        }
    }
}

/// One member's row in the allocation table.
#[derive(Clone, Debug, PartialEq)]
pub struct SplitRow {
    pub member: Username,
    pub owed: MoneyCents,
    pub paid: MoneyCents,
    pub net: MoneyCents,
}

impl SplitRow {
    pub(crate) fn new(member: Username, owed: MoneyCents, paid: MoneyCents) -> Self {
        let net = paid - owed;
        Self {
            member,
            owed,
            paid,
            net,
        }
    }

    /// Adopts amounts from a stored split.
    ///
    /// The supplied net balance wins when present; if it disagrees with the
    /// derived `paid - owed` by more than the band, a data-integrity warning
    /// is logged and the supplied value is still kept.
    pub(crate) fn from_seed(member: Username, seed: &SplitSeed) -> Result<Self, EngineError> {
        let owed = MoneyCents::from_major(seed.owed)?;
        let paid = MoneyCents::from_major(seed.paid)?;
        let derived = paid - owed;
        let net = match seed.net {
            Some(value) => {
                let supplied = MoneyCents::from_major(value)?;
                if (supplied - derived).abs() > MoneyCents::TOLERANCE {
                    tracing::warn!(
                        member = %member,
                        %supplied,
                        %derived,
                        "stored net balance disagrees with paid - owed",
                    );
                }
                supplied
            }
            None => derived,
        };
        Ok(Self {
            member,
            owed,
            paid,
            net,
        })
    }

    pub(crate) fn recompute_net(&mut self) {
        self.net = self.paid - self.owed;
    }

    /// A split with nothing owed and nothing paid is considered absent and is
    /// omitted from the persisted set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.owed.is_zero() && self.paid.is_zero()
    }

    #[must_use]
    pub fn standing(&self) -> NetStanding {
        NetStanding::from_net(self.net)
    }
}

/// Ready-to-render strings for one row, handed to the UI collaborator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SplitRowDisplay {
    pub member: String,
    pub owed: String,
    pub paid: String,
    pub net: String,
    pub is_payer: bool,
}

impl SplitRowDisplay {
    pub(crate) fn from_row(row: &SplitRow, is_payer: bool) -> Self {
        let net = match row.standing() {
            NetStanding::GetsBack => format!("+{} ({})", row.net.abs(), NetStanding::GetsBack.label()),
            NetStanding::Owes => format!("-{} ({})", row.net.abs(), NetStanding::Owes.label()),
            NetStanding::Settled => format!("{} ({})", row.net, NetStanding::Settled.label()),
        };
        Self {
            member: row.member.to_string(),
            owed: row.owed.to_string(),
            paid: row.paid.to_string(),
            net,
            is_payer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standing_uses_one_cent_band() {
        assert_eq!(NetStanding::from_net(MoneyCents::new(2)), NetStanding::GetsBack);
        assert_eq!(NetStanding::from_net(MoneyCents::new(1)), NetStanding::Settled);
        assert_eq!(NetStanding::from_net(MoneyCents::new(0)), NetStanding::Settled);
        assert_eq!(NetStanding::from_net(MoneyCents::new(-1)), NetStanding::Settled);
        assert_eq!(NetStanding::from_net(MoneyCents::new(-2)), NetStanding::Owes);
    }

    #[test]
    fn seed_with_net_keeps_supplied_value() {
        let seed = SplitSeed {
            member: "bob".to_string(),
            owed: 15.0,
            paid: 5.0,
            net: Some(-10.0),
        };
        let row = SplitRow::from_seed(Username::new("bob"), &seed).unwrap();
        assert_eq!(row.net, MoneyCents::new(-1000));
    }

    #[test]
    fn seed_without_net_derives_it() {
        let seed = SplitSeed {
            member: "bob".to_string(),
            owed: 20.0,
            paid: 60.0,
            net: None,
        };
        let row = SplitRow::from_seed(Username::new("bob"), &seed).unwrap();
        assert_eq!(row.net, MoneyCents::new(4000));
    }
}
