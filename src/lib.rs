//! Create Jamf Pro static groups from `/match` search results.
//!
//! Runs one or more searches against the classic API (`/JSSResource`),
//! merges the matched device IDs without duplicates, and POSTs a static
//! group containing them.
//!
//! # Modules
//!
//! - [`cli`] — clap surface and resolution into a [`cli::RunConfig`].
//! - [`client`] — authenticated XML-over-HTTP wrapper for the JSS.
//! - [`credentials`] — credentials and the prompt used when they are missing.
//! - [`devices`] — device types, the `match` search, and the merged ID set.
//! - [`error`] — typed error hierarchy (`JssError`) and exit codes.
//! - [`groups`] — group payload building and creation.
//! - [`run`] — the search-then-create flow.
//!
//! # Quick Start
//!
//! ```ignore
//! use jss_static_group::client::JssClient;
//! use jss_static_group::credentials::Credentials;
//! use jss_static_group::devices::DeviceType;
//! use jss_static_group::run::create_group_from_search;
//!
//! let creds = Credentials { username: "api".into(), password: "secret".into() };
//! let client = JssClient::new("https://jss.example.com", &creds)?;
//! let terms = vec!["lab-mac*".to_string()];
//! let created = create_group_from_search(&client, DeviceType::Computer, &terms, "Lab Macs").await?;
//! println!("group {}", created.group_id);
//! ```

#![warn(missing_docs)]

pub mod cli;
pub mod client;
pub mod credentials;
pub mod devices;
pub mod error;
pub mod groups;
pub mod run;
