//! Command-line surface and argument resolution.
//!
//! [`Cli`] is the raw clap surface. [`Cli::resolve`] turns it into an
//! immutable [`RunConfig`]: the server URL normalized, the search terms
//! loaded, and any missing credential prompted for. Reading the optional
//! term file and prompting are the only side effects.

use std::path::{Path, PathBuf};

use clap::Parser;
use tracing::debug;

use crate::credentials::{CredentialSource, Credentials, resolve_credentials};
use crate::devices::{DeviceType, check_search_term};
use crate::error::{JssError, Result};

const EXAMPLES: &str = "\
Examples:
  jss-static-group https://jss.myorg.com \"Contains iPhone\" -u user -p pass --mobile-devices -s '*iPhone*'
  jss-static-group https://jss.myorg.com \"Starts with admin\" --computers --search 'admin*'
  jss-static-group https://jss.myorg.com \"Devices from list\" --mobile-devices --csv-file list.csv";

/// Create a static group on a Jamf Pro server from the results of one or
/// more `/match` searches.
#[derive(Debug, Parser)]
#[command(
    name = "jss-static-group",
    version,
    about,
    long_about = None,
    arg_required_else_help = true,
    after_help = EXAMPLES
)]
pub struct Cli {
    /// JSS server URL. `https://` is assumed when no scheme is given.
    pub server_url: String,

    /// Name of the new static group.
    pub group_name: String,

    /// Which device type to search.
    #[command(flatten)]
    pub device: DeviceFlags,

    /// Where the search terms come from.
    #[command(flatten)]
    pub input: InputFlags,

    /// API username. Prompted for when omitted.
    #[arg(short, long, env = "JSS_USERNAME")]
    pub username: Option<String>,

    /// API password. Prompted for (without echo) when omitted. Prefer the
    /// JSS_PASSWORD environment variable over the flag to keep it out of
    /// shell history.
    #[arg(short, long, env = "JSS_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Log request details to stderr.
    #[arg(short, long)]
    pub verbose: bool,
}

/// Device type flags. Exactly one must be set.
#[derive(Debug, clap::Args)]
#[group(required = true, multiple = false)]
pub struct DeviceFlags {
    /// Search computers.
    #[arg(short, long)]
    pub computers: bool,

    /// Search mobile devices.
    #[arg(short, long, visible_alias = "mobiledevices")]
    pub mobile_devices: bool,
}

impl DeviceFlags {
    /// The selected device type. clap guarantees exactly one flag is set.
    pub fn device_type(&self) -> DeviceType {
        if self.mobile_devices {
            DeviceType::MobileDevice
        } else {
            DeviceType::Computer
        }
    }
}

/// Search input. Exactly one of a single term or a term file.
#[derive(Debug, clap::Args)]
#[group(required = true, multiple = false)]
pub struct InputFlags {
    /// A single search value (`*` wildcards allowed).
    #[arg(short, long)]
    pub search: Option<String>,

    /// File with one search value per line; only the first
    /// comma-separated column is used.
    #[arg(short = 'f', long)]
    pub csv_file: Option<PathBuf>,
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Normalized server URL: scheme present, no trailing slash.
    pub server_url: String,
    /// Name of the group to create.
    pub group_name: String,
    /// Which device namespace to search and group.
    pub device_type: DeviceType,
    /// Search terms in the order they will be run.
    pub search_terms: Vec<String>,
    /// API credentials.
    pub credentials: Credentials,
    /// Whether debug logging was requested.
    pub verbose: bool,
}

impl Cli {
    /// Resolves the parsed arguments into a [`RunConfig`], prompting
    /// `prompt` for any credential not given on the command line.
    ///
    /// # Errors
    ///
    /// - `JssError::Usage` — an empty, `.` or `..` search value, or a term
    ///   file with no usable rows.
    /// - `JssError::Io` — the term file is unreadable or a prompt failed.
    pub fn resolve(self, prompt: &mut dyn CredentialSource) -> Result<RunConfig> {
        let device_type = self.device.device_type();

        let search_terms = match (self.input.search, self.input.csv_file) {
            (Some(term), None) => vec![term],
            (None, Some(path)) => load_search_terms(&path)?,
            _ => {
                return Err(JssError::Usage(
                    "exactly one of --search or --csv-file is required".to_string(),
                ));
            }
        };

        for term in &search_terms {
            check_search_term(term)?;
        }

        let server_url = normalize_server_url(&self.server_url);
        let credentials = resolve_credentials(self.username, self.password, prompt)?;

        debug!(%server_url, %device_type, terms = search_terms.len(), "arguments resolved");
        Ok(RunConfig {
            server_url,
            group_name: self.group_name,
            device_type,
            search_terms,
            credentials,
            verbose: self.verbose,
        })
    }
}

fn has_http_scheme(url: &str) -> bool {
    ["http://", "https://"].iter().any(|scheme| {
        url.get(..scheme.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
    })
}

/// Strips trailing slashes and prepends `https://` when the URL carries
/// no http(s) scheme, warning the user about the assumption. An explicit
/// `http://` is kept as given.
pub fn normalize_server_url(url: &str) -> String {
    let trimmed = url.trim().trim_end_matches('/');
    if has_http_scheme(trimmed) {
        return trimmed.to_string();
    }
    eprintln!("valid prefix for server url not found: prefixing with https://");
    format!("https://{trimmed}")
}

/// Reads search terms from `path`: one per line, first comma-separated
/// column, surrounding whitespace and double quotes removed. Blank rows
/// are skipped.
///
/// # Errors
///
/// - `JssError::Io` — the file cannot be read.
/// - `JssError::Usage` — the file holds no terms.
pub fn load_search_terms(path: &Path) -> Result<Vec<String>> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        JssError::io(
            format!("failed to read search terms from {}", path.display()),
            e,
        )
    })?;

    let terms: Vec<String> = contents
        .lines()
        .map(|line| {
            let first = line.split(',').next().unwrap_or("");
            first
                .trim_start_matches('\u{feff}')
                .trim()
                .trim_matches('"')
                .trim()
                .to_string()
        })
        .filter(|term| !term.is_empty())
        .collect();

    if terms.is_empty() {
        return Err(JssError::Usage(format!(
            "{} contains no search terms",
            path.display()
        )));
    }
    Ok(terms)
}
