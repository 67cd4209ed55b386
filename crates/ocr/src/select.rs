use crate::types::{Candidate, SelectionRule};

/// Pick the authoritative expiry date.
///
/// A keyworded candidate always wins, and the first one in text order is taken. Without any
/// keyword the latest date wins, since labels often print a manufacture date next to the
/// expiry. Equal dates keep the earlier candidate.
pub fn select_best(candidates: &[Candidate]) -> Option<(&Candidate, SelectionRule)> {
    if let Some(c) = candidates.iter().find(|c| c.has_keyword) {
        return Some((c, SelectionRule::Keyword));
    }
    match candidates {
        [] => None,
        [only] => Some((only, SelectionRule::Only)),
        _ => candidates
            .iter()
            .reduce(|best, c| if c.expires_at() > best.expires_at() { c } else { best })
            .map(|c| (c, SelectionRule::Latest)),
    }
}
