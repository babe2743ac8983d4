//! Static group creation.
//!
//! [`build_group_payload`] renders a [`GroupSpec`] into the classic API's
//! group document and [`create_static_group`] POSTs it to
//! `/JSSResource/{computergroups|mobiledevicegroups}/id/0`. The `id/0`
//! form tells the JSS to assign the next free ID, which it returns as
//! `<computer_group><id>N</id></computer_group>`.

use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use serde::Deserialize;
use tracing::{debug, info};

use crate::client::JssClient;
use crate::devices::{DeviceType, MatchResultSet};
use crate::error::{JssError, Result};

/// A static group to create: a name plus an explicit member list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupSpec {
    device_type: DeviceType,
    name: String,
    members: MatchResultSet,
}

impl GroupSpec {
    /// Creates a spec; duplicate member IDs are dropped, first one wins.
    pub fn new<I, S>(device_type: DeviceType, name: impl Into<String>, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        GroupSpec {
            device_type,
            name: name.into(),
            members: members.into_iter().collect(),
        }
    }

    /// Creates a spec from an already deduplicated match set.
    pub fn from_matches(
        device_type: DeviceType,
        name: impl Into<String>,
        members: MatchResultSet,
    ) -> Self {
        GroupSpec {
            device_type,
            name: name.into(),
            members,
        }
    }

    /// Device type of every member.
    pub fn device_type(&self) -> DeviceType {
        self.device_type
    }

    /// Group name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Member IDs in first-seen order.
    pub fn members(&self) -> &MatchResultSet {
        &self.members
    }

    /// The POST body for this group.
    pub fn to_xml(&self) -> String {
        build_group_payload(self.device_type, &self.name, &self.members)
    }
}

/// Renders the create-group request body:
///
/// ```xml
/// <computer_group>
///   <name>NAME</name>
///   <is_smart>false</is_smart>
///   <computers><computer><id>1</id></computer>...</computers>
/// </computer_group>
/// ```
///
/// Element names follow `device_type`; text is XML-escaped.
pub fn build_group_payload(device_type: DeviceType, name: &str, members: &MatchResultSet) -> String {
    let mut writer = Writer::new(Vec::new());
    write_group(&mut writer, device_type, name, members)
        .expect("writing XML into an in-memory buffer cannot fail");
    String::from_utf8(writer.into_inner()).expect("XML writer only emits UTF-8 input")
}

fn write_group(
    w: &mut Writer<Vec<u8>>,
    device_type: DeviceType,
    name: &str,
    members: &MatchResultSet,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let root = device_type.group_element();
    let collection = device_type.collection_element();
    let item = device_type.item_element();

    w.write_event(Event::Start(BytesStart::new(root)))?;
    w.create_element("name")
        .write_text_content(BytesText::new(name))?;
    w.create_element("is_smart")
        .write_text_content(BytesText::new("false"))?;
    w.write_event(Event::Start(BytesStart::new(collection)))?;
    for id in members.iter() {
        w.write_event(Event::Start(BytesStart::new(item)))?;
        w.create_element("id").write_text_content(BytesText::new(id))?;
        w.write_event(Event::End(BytesEnd::new(item)))?;
    }
    w.write_event(Event::End(BytesEnd::new(collection)))?;
    w.write_event(Event::End(BytesEnd::new(root)))?;
    Ok(())
}

/// Response of a successful create: the new group's ID.
#[derive(Debug, Deserialize)]
pub struct CreatedGroup {
    /// JSS identifier assigned to the new group.
    pub id: String,
}

/// Creates `spec` on the JSS and returns the new group's ID.
///
/// # Errors
///
/// - `JssError::NoResults` — `spec` has no members; nothing is sent.
/// - `JssError::Conflict` — a group with this name already exists (409).
/// - `JssError::ServerRejected` — any other non-2xx status.
/// - `JssError::Unreachable` — transport-level failure.
/// - `JssError::MalformedResponse` — the response carries no `<id>`.
pub async fn create_static_group(client: &JssClient, spec: &GroupSpec) -> Result<String> {
    if spec.members.is_empty() {
        return Err(JssError::NoResults);
    }

    let body = spec.to_xml();
    debug!(group = %spec.name, members = spec.members.len(), "creating static group");

    let created: CreatedGroup = client
        .post_xml(&[spec.device_type.group_resource(), "id", "0"], body)
        .await?;
    info!(group = %spec.name, id = %created.id, "static group created");
    Ok(created.id)
}
