use std::fmt;

/// Canonical member identity: a trimmed, lowercased username.
///
/// Usernames are case-insensitively unique across the system; folding happens
/// here, at construction, so no downstream comparison ever has to think about
/// casing again.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Username(String);

impl Username {
    #[must_use]
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().to_lowercase())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

/// Resolves the participant set for a split from raw group membership plus
/// the acting user.
///
/// Members are canonicalized through [`Username`] before deduplication, so
/// casing differences never produce duplicate participants; first occurrence
/// wins the ordering. Entries that are empty after trimming are dropped. The
/// acting user is appended if the membership list does not already contain
/// them: a user acting on a group must always be able to split with
/// themselves.
pub fn resolve_participants<'a, I>(members: I, acting_user: &str) -> Vec<Username>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut resolved: Vec<Username> = Vec::new();
    for raw in members {
        let member = Username::new(raw);
        if member.is_empty() || resolved.contains(&member) {
            continue;
        }
        resolved.push(member);
    }

    let acting = Username::new(acting_user);
    if !acting.is_empty() && !resolved.contains(&acting) {
        resolved.push(acting);
    }
    resolved
}
