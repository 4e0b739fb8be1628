use crate::github::RawContributorRecord;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;

/// Lines added and deleted by one contributor over the whole history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributorStats {
    pub name: String,
    pub avatar_url: String,
    pub additions: u64,
    pub deletions: u64,
}

impl ContributorStats {
    pub fn total_changes(&self) -> u64 {
        self.additions.saturating_add(self.deletions)
    }
}

/// Sum the weekly buckets of every attributed record.
///
/// Records without an author (deleted accounts, some bots) are dropped rather
/// than reported under a placeholder name. Sums saturate at `u64::MAX`.
/// The output keeps the input order; the returned iterator is lazy and can be
/// cloned to walk it again.
pub fn aggregate(
    records: &[RawContributorRecord],
) -> impl Iterator<Item = ContributorStats> + Clone + '_ {
    records.iter().filter_map(|record| {
        let author = record.author.as_ref()?;

        let additions = record
            .weeks
            .iter()
            .map(|week| week.additions.unwrap_or(0))
            .fold(0u64, u64::saturating_add);
        let deletions = record
            .weeks
            .iter()
            .map(|week| week.deletions.unwrap_or(0))
            .fold(0u64, u64::saturating_add);

        Some(ContributorStats {
            name: author.login.clone(),
            avatar_url: author.avatar_url.clone(),
            additions,
            deletions,
        })
    })
}

/// Order contributors by total changes, highest first. Ties keep their input order.
pub fn rank(stats: &[ContributorStats]) -> Vec<ContributorStats> {
    let mut ranked = stats.to_vec();
    ranked.sort_by_key(|contributor| Reverse(contributor.total_changes()));
    ranked
}

/// Get the top contributors of an already ranked list
pub fn top(mut ranked: Vec<ContributorStats>, limit: Option<usize>) -> Vec<ContributorStats> {
    if let Some(limit) = limit {
        ranked.truncate(limit);
    }
    ranked
}
