//! Device search against the JSS `match` endpoints.
//!
//! - [`DeviceType`] — computers vs. mobile devices, and the resource and
//!   element names each uses on the wire.
//! - [`match_devices`] — `GET /JSSResource/{computers|mobiledevices}/match/{term}`.
//! - [`MatchResultSet`] — IDs merged across searches, deduplicated, in
//!   first-seen order.
//!
//! A match response looks like:
//!
//! ```xml
//! <computers>
//!   <size>2</size>
//!   <computer><id>12</id><name>lab-mac-01</name>...</computer>
//!   <computer><id>15</id><name>lab-mac-02</name>...</computer>
//! </computers>
//! ```
//!
//! Only the `id` of each record is used; every other field is ignored.

use std::collections::HashSet;
use std::fmt;

use serde::Deserialize;
use tracing::debug;

use crate::client::JssClient;
use crate::error::JssError;

/// The two device categories, each with its own API namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceType {
    /// macOS computers.
    Computer,
    /// iOS / iPadOS / tvOS devices.
    MobileDevice,
}

impl DeviceType {
    /// Resource name of the search endpoint (`/{resource}/match/…`).
    pub fn resource(self) -> &'static str {
        match self {
            DeviceType::Computer => "computers",
            DeviceType::MobileDevice => "mobiledevices",
        }
    }

    /// Resource name of the group endpoint (`/{group_resource}/id/0`).
    pub fn group_resource(self) -> &'static str {
        match self {
            DeviceType::Computer => "computergroups",
            DeviceType::MobileDevice => "mobiledevicegroups",
        }
    }

    /// Root element of a group document.
    pub fn group_element(self) -> &'static str {
        match self {
            DeviceType::Computer => "computer_group",
            DeviceType::MobileDevice => "mobile_device_group",
        }
    }

    /// Element wrapping the member list of a group document.
    pub fn collection_element(self) -> &'static str {
        match self {
            DeviceType::Computer => "computers",
            DeviceType::MobileDevice => "mobile_devices",
        }
    }

    /// Element of a single device record.
    pub fn item_element(self) -> &'static str {
        match self {
            DeviceType::Computer => "computer",
            DeviceType::MobileDevice => "mobile_device",
        }
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceType::Computer => f.write_str("computers"),
            DeviceType::MobileDevice => f.write_str("mobile devices"),
        }
    }
}

// ── Response types ─────────────────────────────────────────────────────

/// One device record of a match response. Only the ID is modelled.
#[derive(Debug, Deserialize)]
pub struct DeviceRecord {
    /// JSS identifier of the device.
    pub id: String,
}

/// Body of a match response for either device type.
///
/// Both record lists are declared so one struct serves both endpoints;
/// the one that does not apply is always empty. `<size>` and any other
/// element are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct MatchResponse {
    #[serde(default)]
    computer: Vec<DeviceRecord>,
    #[serde(default)]
    mobile_device: Vec<DeviceRecord>,
}

impl MatchResponse {
    /// IDs of the records for `device_type`, in document order.
    pub fn ids(self, device_type: DeviceType) -> Vec<String> {
        let records = match device_type {
            DeviceType::Computer => self.computer,
            DeviceType::MobileDevice => self.mobile_device,
        };
        records.into_iter().map(|r| r.id).collect()
    }
}

// ── Match result set ───────────────────────────────────────────────────

/// Device IDs collected across all searches of one run.
///
/// Iterates in first-insertion order and never holds the same ID twice
/// (exact string equality).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchResultSet {
    ids: Vec<String>,
    seen: HashSet<String>,
}

impl MatchResultSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `id` if it is new. Returns `true` when it was added.
    pub fn insert(&mut self, id: impl Into<String>) -> bool {
        let id = id.into();
        if self.seen.contains(&id) {
            return false;
        }
        self.seen.insert(id.clone());
        self.ids.push(id);
        true
    }

    /// Number of distinct IDs.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// `true` when no ID has been added.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// IDs in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    /// IDs as a slice, in first-seen order.
    pub fn as_slice(&self) -> &[String] {
        &self.ids
    }
}

impl<S: Into<String>> Extend<S> for MatchResultSet {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for id in iter {
            self.insert(id);
        }
    }
}

impl<S: Into<String>> FromIterator<S> for MatchResultSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = MatchResultSet::new();
        set.extend(iter);
        set
    }
}

// ── Endpoint functions ─────────────────────────────────────────────────

/// Rejects terms that cannot be sent as a single path segment.
///
/// `.` and `..` are dot segments: URL normalization would drop them and
/// query a different endpoint.
pub fn check_search_term(term: &str) -> crate::error::Result<()> {
    match term.trim() {
        "" => Err(JssError::Usage("search value must not be empty".to_string())),
        "." | ".." => Err(JssError::Usage(format!(
            "'{term}' is not a usable search value"
        ))),
        _ => Ok(()),
    }
}

/// Searches the JSS for devices matching `term` and returns their IDs in
/// document order.
///
/// `term` is sent as-is (wildcards such as `*` included) but
/// percent-encoded as a single path segment.
///
/// # Errors
///
/// - `JssError::Usage` — `term` is empty, `.` or `..`; nothing is sent.
/// - `JssError::ServerRejected` — non-2xx status (401 for bad credentials,
///   404 for a wrong server URL).
/// - `JssError::Unreachable` — transport-level failure.
/// - `JssError::MalformedResponse` — the body is not a match document.
pub async fn match_devices(
    client: &JssClient,
    device_type: DeviceType,
    term: &str,
) -> crate::error::Result<Vec<String>> {
    check_search_term(term)?;
    let response: MatchResponse = client
        .get_xml(&[device_type.resource(), "match", term])
        .await?;
    let ids = response.ids(device_type);
    debug!(term = %term, matched = ids.len(), "match search complete");
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── MatchResultSet ───────────────────────────────────────────────

    #[test]
    fn result_set_drops_duplicates_and_keeps_first_seen_order() {
        let set: MatchResultSet = ["3", "1", "3", "2", "1"].into_iter().collect();
        assert_eq!(set.as_slice(), ["3", "1", "2"]);
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn result_set_merges_overlapping_searches() {
        let mut set = MatchResultSet::new();
        set.extend(vec!["1".to_string(), "2".to_string()]);
        set.extend(vec!["2".to_string(), "3".to_string()]);
        assert_eq!(set.iter().collect::<Vec<_>>(), ["1", "2", "3"]);
    }

    #[test]
    fn result_set_insert_reports_novelty() {
        let mut set = MatchResultSet::new();
        assert!(set.is_empty());
        assert!(set.insert("7"));
        assert!(!set.insert("7"), "second insert of the same id is a no-op");
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn result_set_compares_ids_exactly() {
        let set: MatchResultSet = ["1", "01", " 1"].into_iter().collect();
        assert_eq!(set.len(), 3, "ids are opaque strings, not numbers");
    }

    #[test]
    fn dot_segments_are_not_search_terms() {
        for term in [".", "..", " .. ", ""] {
            let err = check_search_term(term).unwrap_err();
            assert!(matches!(err, JssError::Usage(_)), "{term:?} should be rejected");
        }
        for term in ["...", ".hidden", "mac*", "Lab iPad"] {
            assert!(check_search_term(term).is_ok(), "{term:?} should be accepted");
        }
    }

    // ── MatchResponse parsing ────────────────────────────────────────

    #[test]
    fn computer_match_response_yields_ids_in_order() {
        let xml = "<computers><size>2</size>\
            <computer><id>12</id><name>lab-mac-01</name><udid>AAA</udid></computer>\
            <computer><id>15</id><name>lab-mac-02</name><udid>BBB</udid></computer>\
            </computers>";
        let resp: MatchResponse = quick_xml::de::from_str(xml).unwrap();
        assert_eq!(resp.ids(DeviceType::Computer), ["12", "15"]);
    }

    #[test]
    fn mobile_match_response_yields_ids() {
        let xml = "<mobile_devices><size>1</size>\
            <mobile_device><id>301</id><name>Lab iPad</name></mobile_device>\
            </mobile_devices>";
        let resp: MatchResponse = quick_xml::de::from_str(xml).unwrap();
        assert_eq!(resp.ids(DeviceType::MobileDevice), ["301"]);
    }

    #[test]
    fn empty_match_response_yields_no_ids() {
        let xml = "<computers><size>0</size></computers>";
        let resp: MatchResponse = quick_xml::de::from_str(xml).unwrap();
        assert!(resp.ids(DeviceType::Computer).is_empty());
    }

    #[test]
    fn record_without_id_is_rejected() {
        let xml = "<computers><size>1</size><computer><name>x</name></computer></computers>";
        assert!(quick_xml::de::from_str::<MatchResponse>(xml).is_err());
    }

    // ── DeviceType wire names ────────────────────────────────────────

    #[test]
    fn wire_names_per_device_type() {
        let c = DeviceType::Computer;
        assert_eq!(
            (c.resource(), c.group_resource(), c.group_element()),
            ("computers", "computergroups", "computer_group")
        );
        assert_eq!((c.collection_element(), c.item_element()), ("computers", "computer"));

        let m = DeviceType::MobileDevice;
        assert_eq!(
            (m.resource(), m.group_resource(), m.group_element()),
            ("mobiledevices", "mobiledevicegroups", "mobile_device_group")
        );
        assert_eq!(
            (m.collection_element(), m.item_element()),
            ("mobile_devices", "mobile_device")
        );
    }
}
