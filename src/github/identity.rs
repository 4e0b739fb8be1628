use super::RepositoryIdentity;
use regex::Regex;

// owner/repo, optionally behind a github.com https or ssh prefix, with an
// optional .git suffix and trailing path (tree/main, issues, ...)
const REPOSITORY_REFERENCE: &str = r"^(?:(?:https?://)?(?:www\.)?github\.com/|git@github\.com:)?(?P<owner>[A-Za-z0-9](?:[A-Za-z0-9]|-[A-Za-z0-9])*)/(?P<repo>[A-Za-z0-9._-]+?)(?:\.git)?(?:[/?#].*)?$";

impl RepositoryIdentity {
    /// Parse a user supplied repository reference.
    ///
    /// Returns `None` for anything that does not name an owner/repo pair.
    pub fn parse(reference: &str) -> Option<Self> {
        let re = Regex::new(REPOSITORY_REFERENCE).ok()?;
        let captures = re.captures(reference.trim())?;

        let owner = captures.name("owner")?.as_str();
        let repo = captures.name("repo")?.as_str();

        if repo == "." || repo == ".." {
            return None;
        }

        Some(Self::new(owner, repo))
    }
}
