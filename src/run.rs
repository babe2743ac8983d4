//! End-to-end flow: search every term, merge the IDs, create the group.
//!
//! Progress goes to stdout. Errors are returned, never printed or turned
//! into an exit here; `main` owns that.

use tracing::info;

use crate::client::JssClient;
use crate::devices::{DeviceType, MatchResultSet, match_devices};
use crate::error::{JssError, Result};
use crate::groups::{GroupSpec, create_static_group};

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupCreated {
    /// JSS identifier of the new group.
    pub group_id: String,
    /// Number of devices placed in the group.
    pub member_count: usize,
}

/// Progress line reporting how many records one search returned.
pub fn term_summary(term: &str, matched: usize) -> String {
    format!("the JSS matched {matched} result(s) for {term}")
}

/// Runs one `match` search per term and merges the IDs, first-seen order,
/// no duplicates.
///
/// Prints the relative endpoint of each search (never the full URL).
pub async fn collect_matches(
    client: &JssClient,
    device_type: DeviceType,
    terms: &[String],
) -> Result<MatchResultSet> {
    let mut matches = MatchResultSet::new();
    for term in terms {
        println!(
            "performing search on the JSS at: ../{}/match/{term}",
            device_type.resource()
        );
        let ids = match_devices(client, device_type, term).await?;
        println!("{}", term_summary(term, ids.len()));
        let before = matches.len();
        matches.extend(ids);
        info!(term = %term, new = matches.len() - before, total = matches.len(), "merged search results");
    }
    Ok(matches)
}

/// Searches every term, then creates a static group holding the union of
/// the matches.
///
/// # Errors
///
/// - `JssError::NoResults` — no term matched a device; no group is created.
/// - `JssError::Conflict` — `group_name` is already taken.
/// - Any error from the searches or the create call, unchanged.
pub async fn create_group_from_search(
    client: &JssClient,
    device_type: DeviceType,
    terms: &[String],
    group_name: &str,
) -> Result<GroupCreated> {
    let matches = collect_matches(client, device_type, terms).await?;
    if matches.is_empty() {
        return Err(JssError::NoResults);
    }
    println!(
        "the JSS matched {} result(s) to the provided search value",
        matches.len()
    );

    let member_count = matches.len();
    let spec = GroupSpec::from_matches(device_type, group_name, matches);
    println!(
        "creating new Static Group on the JSS at: ../{}/id/0",
        device_type.group_resource()
    );
    let group_id = create_static_group(client, &spec).await?;

    Ok(GroupCreated {
        group_id,
        member_count,
    })
}
