//! Device information parsed from a user-agent string.
//!
//! A `DeviceInfo` is built once per login request and never mutated. It is
//! not persisted as a whole; only its id and name are copied onto the
//! refresh-token record for the session it opens.

use std::net::IpAddr;

use md5::Md5;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::errors::{DomainResult, ValidationError};

/// Maximum accepted user-agent length in characters
pub const MAX_USER_AGENT_LENGTH: usize = 1000;

/// Tablet detection, checked before the mobile patterns
static TABLET_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"iPad|Android.*Tablet|Windows.*Touch").unwrap());

/// Mobile detection, only consulted when the agent is not a tablet
static MOBILE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Mobile|Android|iPhone|iPod|Windows Phone|BlackBerry").unwrap());

static IPAD_OS_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"iPad.*CPU OS (\d+[_\d]*)").unwrap());
static IPHONE_OS_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"iPhone OS (\d+[_\d]*)").unwrap());
static ANDROID_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"Android (\d+[.\d]*)").unwrap());
static WINDOWS_NT_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"Windows NT (\d+[.\d]*)").unwrap());
static MACOS_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"Mac OS X (\d+[_.\d]*)").unwrap());

static CHROME_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"Chrome/(\d+[.\d]*)").unwrap());
static FIREFOX_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"Firefox/(\d+[.\d]*)").unwrap());
static SAFARI_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"Safari/(\d+[.\d]*)").unwrap());
static EDGE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"Edge/(\d+[.\d]*)").unwrap());

/// Immutable description of the device/browser behind a login request
///
/// Exactly one of `is_mobile`, `is_tablet`, `is_desktop` is true; the
/// constructors enforce this. `device_id` is stable for a given
/// (user agent, IP, calendar day) triple and is the identity used on
/// refresh-token records. The fingerprint is a best-effort similarity hash
/// for device matching, never an identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    /// Stable hash identifying the device for session tracking
    pub device_id: String,

    /// Human-readable device name shown in session listings
    pub device_name: String,

    /// Raw user-agent string the info was derived from
    pub user_agent: String,

    /// Client IP address (IPv4 or IPv6)
    pub ip_address: String,

    /// Operating system family, if recognized
    pub platform: Option<String>,

    /// Operating system version, if recognized
    pub os_version: Option<String>,

    /// Browser family, if recognized
    pub browser: Option<String>,

    /// Browser version, if recognized
    pub browser_version: Option<String>,

    pub is_mobile: bool,
    pub is_tablet: bool,
    pub is_desktop: bool,
}

impl DeviceInfo {
    /// Creates a device info from already-derived parts
    ///
    /// # Returns
    ///
    /// `Err(ValidationError)` unless exactly one device-type flag is set.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        device_id: String,
        device_name: String,
        user_agent: String,
        ip_address: String,
        platform: Option<String>,
        os_version: Option<String>,
        browser: Option<String>,
        browser_version: Option<String>,
        is_mobile: bool,
        is_tablet: bool,
        is_desktop: bool,
    ) -> DomainResult<Self> {
        let flags = [is_mobile, is_tablet, is_desktop]
            .iter()
            .filter(|f| **f)
            .count();
        if flags != 1 {
            return Err(ValidationError::BusinessRuleViolation {
                rule: "exactly one device-type flag must be set".to_string(),
            }
            .into());
        }

        Ok(Self {
            device_id,
            device_name,
            user_agent,
            ip_address,
            platform,
            os_version,
            browser,
            browser_version,
            is_mobile,
            is_tablet,
            is_desktop,
        })
    }

    /// Derives a device info from a user-agent string and client IP
    ///
    /// # Arguments
    ///
    /// * `user_agent` - Raw user-agent header value (at most 1000 chars)
    /// * `ip_address` - Client IP, must parse as IPv4 or IPv6
    /// * `device_name` - Optional caller-supplied name; derived when absent
    ///
    /// # Returns
    ///
    /// * `Ok(DeviceInfo)` - Parsed device description
    /// * `Err(ValidationError)` - Empty inputs, oversized user agent, or a
    ///   syntactically invalid IP
    pub fn from_user_agent(
        user_agent: &str,
        ip_address: &str,
        device_name: Option<String>,
    ) -> DomainResult<Self> {
        if user_agent.is_empty() {
            return Err(ValidationError::RequiredField {
                field: "user_agent".to_string(),
            }
            .into());
        }
        if ip_address.is_empty() {
            return Err(ValidationError::RequiredField {
                field: "ip_address".to_string(),
            }
            .into());
        }
        let length = user_agent.chars().count();
        if length > MAX_USER_AGENT_LENGTH {
            return Err(ValidationError::InvalidLength {
                field: "user_agent".to_string(),
                max: MAX_USER_AGENT_LENGTH,
                actual: length,
            }
            .into());
        }
        if ip_address.parse::<IpAddr>().is_err() {
            return Err(ValidationError::InvalidFormat {
                field: "ip_address".to_string(),
            }
            .into());
        }

        let is_tablet = TABLET_REGEX.is_match(user_agent);
        let is_mobile = !is_tablet && MOBILE_REGEX.is_match(user_agent);
        let is_desktop = !is_mobile && !is_tablet;

        let (platform, os_version) = parse_platform(user_agent);
        let (browser, browser_version) = parse_browser(user_agent);

        let device_name = device_name.unwrap_or_else(|| {
            format!(
                "{} {} ({})",
                platform.as_deref().unwrap_or("Unknown"),
                device_type_label(is_mobile, is_tablet),
                browser.as_deref().unwrap_or("Browser"),
            )
        });

        let device_id = derive_device_id(user_agent, ip_address);

        Self::new(
            device_id,
            device_name,
            user_agent.to_string(),
            ip_address.to_string(),
            platform,
            os_version,
            browser,
            browser_version,
            is_mobile,
            is_tablet,
            is_desktop,
        )
    }

    /// Best-effort device-similarity hash, not a security identity
    pub fn fingerprint(&self) -> String {
        let digest = Md5::digest(self.user_agent.as_bytes());
        let short = &hex::encode(digest)[..8];
        format!(
            "{}|{}|{}|{}",
            self.platform.as_deref().unwrap_or("Unknown"),
            self.browser.as_deref().unwrap_or("Browser"),
            device_type_label(self.is_mobile, self.is_tablet),
            short,
        )
    }

    /// IP address with the host portion masked, for display and logging only
    pub fn masked_ip_address(&self) -> String {
        mask_ip_address(&self.ip_address)
    }
}

/// Stable per-day device identifier: `dev_` + first 32 hex chars of
/// sha256(user_agent + ip + ISO date)
fn derive_device_id(user_agent: &str, ip_address: &str) -> String {
    let date = chrono::Utc::now().format("%Y-%m-%d");
    let digest = Sha256::digest(format!("{}{}{}", user_agent, ip_address, date).as_bytes());
    format!("dev_{}", &hex::encode(digest)[..32])
}

fn device_type_label(is_mobile: bool, is_tablet: bool) -> &'static str {
    if is_tablet {
        "Tablet"
    } else if is_mobile {
        "Mobile"
    } else {
        "Desktop"
    }
}

/// Platform detection, first match wins
fn parse_platform(user_agent: &str) -> (Option<String>, Option<String>) {
    if let Some(caps) = IPAD_OS_REGEX.captures(user_agent) {
        return (
            Some("iOS".to_string()),
            Some(caps[1].replace('_', ".")),
        );
    }
    if let Some(caps) = IPHONE_OS_REGEX.captures(user_agent) {
        return (
            Some("iOS".to_string()),
            Some(caps[1].replace('_', ".")),
        );
    }
    if let Some(caps) = ANDROID_REGEX.captures(user_agent) {
        return (Some("Android".to_string()), Some(caps[1].to_string()));
    }
    if let Some(caps) = WINDOWS_NT_REGEX.captures(user_agent) {
        return (Some("Windows".to_string()), Some(caps[1].to_string()));
    }
    if let Some(caps) = MACOS_REGEX.captures(user_agent) {
        return (
            Some("macOS".to_string()),
            Some(caps[1].replace('_', ".")),
        );
    }
    if user_agent.contains("Linux") {
        return (Some("Linux".to_string()), None);
    }
    (None, None)
}

/// Browser detection, first match wins. Safari is only reported when the
/// agent does not also claim Chrome, since Chrome agents carry a Safari
/// token for compatibility.
fn parse_browser(user_agent: &str) -> (Option<String>, Option<String>) {
    if let Some(caps) = CHROME_REGEX.captures(user_agent) {
        return (Some("Chrome".to_string()), Some(caps[1].to_string()));
    }
    if let Some(caps) = FIREFOX_REGEX.captures(user_agent) {
        return (Some("Firefox".to_string()), Some(caps[1].to_string()));
    }
    if !user_agent.contains("Chrome") {
        if let Some(caps) = SAFARI_REGEX.captures(user_agent) {
            return (Some("Safari".to_string()), Some(caps[1].to_string()));
        }
    }
    if let Some(caps) = EDGE_REGEX.captures(user_agent) {
        return (Some("Edge".to_string()), Some(caps[1].to_string()));
    }
    (None, None)
}

/// Masks the host portion of an IP address for display
///
/// IPv4 keeps the network octets; IPv6 keeps the leading groups. Anything
/// unrecognized gets its trailing four characters replaced.
pub fn mask_ip_address(ip: &str) -> String {
    if ip.contains('.') && !ip.contains(':') {
        if let Some(idx) = ip.rfind('.') {
            return format!("{}xxx", &ip[..idx + 1]);
        }
    }
    if let Some(idx) = ip.find("::") {
        return format!("{}::xxxx", &ip[..idx]);
    }
    let groups: Vec<&str> = ip.split(':').collect();
    if groups.len() >= 4 {
        return format!("{}::xxxx", groups[..4].join(":"));
    }
    let chars: Vec<char> = ip.chars().collect();
    if chars.len() > 4 {
        let kept: String = chars[..chars.len() - 4].iter().collect();
        format!("{}xxxx", kept)
    } else {
        "xxxx".to_string()
    }
}
