use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use alert::AlertPolicy;
use alert::smtp::{SmtpCredentials, SmtpSettings, is_mailbox};
use ini::{Ini, ParseOption, Properties};
use market::brapi::DEFAULT_BASE_URL;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ConfigError;

pub const SETTINGS_FILE: &str = "settings.ini";
pub const CREDENTIALS_FILE: &str = "smtp-credentials.ini";
pub const PROVIDER_AUTH_FILE: &str = "auth-brapi.ini";

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}$")
        .expect("email pattern is a valid regex")
});

/// Plain `local@domain.tld` address that the mailer also accepts.
pub fn is_valid_email(address: &str) -> bool {
    EMAIL_RE.is_match(address) && is_mailbox(address)
}

/// Values are taken verbatim: no escape sequences, no quote stripping.
fn parse_option() -> ParseOption {
    ParseOption {
        enabled_quote: false,
        enabled_escape: false,
        ..Default::default()
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    /// `[ALERT]` of settings.ini.
    pub alert: AlertPolicy,

    /// `[SMTP]` of settings.ini.
    pub smtp: SmtpSettings,

    /// smtp-credentials.ini.
    pub credentials: SmtpCredentials,

    /// Optional `[PROVIDER]` of settings.ini plus the token from auth-brapi.ini.
    pub provider: ProviderSettings,
}

#[derive(Clone)]
pub struct ProviderSettings {
    pub base_url: String,
    pub token: String,

    /// Upper bound for a single quote request.
    pub request_timeout: Duration,

    /// Fetches slower than this are logged as warnings.
    pub slow_fetch_warn: Duration,
}

impl std::fmt::Debug for ProviderSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderSettings")
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .field("request_timeout", &self.request_timeout)
            .field("slow_fetch_warn", &self.slow_fetch_warn)
            .finish()
    }
}

impl AppConfig {
    /// Load and validate the three configuration files under `dir`.
    pub fn load(dir: &Path) -> Result<Self, ConfigError> {
        let settings = IniDoc::load(dir.join(SETTINGS_FILE))?;
        let credentials = IniDoc::load(dir.join(CREDENTIALS_FILE))?;
        let auth = IniDoc::load(dir.join(PROVIDER_AUTH_FILE))?;

        Self::from_docs(&settings, &credentials, &auth)
    }

    fn from_docs(
        settings: &IniDoc,
        credentials: &IniDoc,
        auth: &IniDoc,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            smtp: read_smtp(settings)?,
            credentials: read_credentials(credentials)?,
            alert: read_alert(settings)?,
            provider: read_provider(settings, auth)?,
        })
    }
}

fn read_alert(doc: &IniDoc) -> Result<AlertPolicy, ConfigError> {
    let s = doc.section("ALERT")?;

    let recipient = s.required("MailTo")?;
    if !is_valid_email(recipient) {
        return Err(s.invalid("MailTo", "a valid e-mail address", recipient));
    }

    Ok(AlertPolicy {
        alert_interval: s.millis("AlertInterval")?,
        stock_update_interval: s.millis("StockUpdateInterval")?,
        recipient: recipient.to_string(),
        resend_when_timestamp_unchanged: s.flag("ResendMailWhenStockTimestampEqual")?,
    })
}

fn read_smtp(doc: &IniDoc) -> Result<SmtpSettings, ConfigError> {
    let s = doc.section("SMTP")?;

    Ok(SmtpSettings {
        host: s.required("Host")?.to_string(),
        port: s.parse("Port", "a valid SMTP port number")?,
        enable_ssl: s.flag("EnableSsl")?,
    })
}

fn read_credentials(doc: &IniDoc) -> Result<SmtpCredentials, ConfigError> {
    let s = doc.section("CREDENTIALS")?;

    let username = s.required("Username")?;
    if !is_mailbox(username) {
        return Err(s.invalid(
            "Username",
            "an e-mail address (it is also the sender)",
            username,
        ));
    }

    Ok(SmtpCredentials {
        username: username.to_string(),
        password: s.required("Password")?.to_string(),
    })
}

fn read_provider(settings: &IniDoc, auth: &IniDoc) -> Result<ProviderSettings, ConfigError> {
    let token = auth.section("AUTH")?.required("BRAPI-Token")?.to_string();

    let mut provider = ProviderSettings {
        base_url: DEFAULT_BASE_URL.to_string(),
        token,
        request_timeout: Duration::from_secs(10),
        slow_fetch_warn: Duration::from_secs(2),
    };

    // [PROVIDER] is optional as a whole.
    if let Some(s) = settings.optional_section("PROVIDER") {
        if let Some(url) = s.get("BaseUrl") {
            provider.base_url = url.to_string();
        }
        if s.get("RequestTimeoutMs").is_some() {
            provider.request_timeout = s.millis("RequestTimeoutMs")?;
        }
        if s.get("SlowFetchWarnMs").is_some() {
            provider.slow_fetch_warn = s.millis("SlowFetchWarnMs")?;
        }
    }

    Ok(provider)
}

/// A parsed INI file together with the path it came from.
struct IniDoc {
    path: PathBuf,
    ini: Ini,
}

impl IniDoc {
    fn load(path: PathBuf) -> Result<Self, ConfigError> {
        match Ini::load_from_file_opt(&path, parse_option()) {
            Ok(ini) => Ok(Self { path, ini }),
            Err(source) => Err(ConfigError::Unreadable { file: path, source }),
        }
    }

    fn section(&self, name: &'static str) -> Result<Section<'_>, ConfigError> {
        self.optional_section(name)
            .ok_or_else(|| ConfigError::MissingSection {
                file: self.path.clone(),
                section: name,
            })
    }

    fn optional_section(&self, name: &'static str) -> Option<Section<'_>> {
        self.ini.section(Some(name)).map(|props| Section {
            path: &self.path,
            name,
            props,
        })
    }
}

struct Section<'a> {
    path: &'a Path,
    name: &'static str,
    props: &'a Properties,
}

impl<'a> Section<'a> {
    /// Trimmed, non-empty value of `field`.
    fn get(&self, field: &str) -> Option<&'a str> {
        self.props
            .get(field)
            .map(str::trim)
            .filter(|v| !v.is_empty())
    }

    fn required(&self, field: &'static str) -> Result<&'a str, ConfigError> {
        self.get(field).ok_or_else(|| ConfigError::MissingField {
            file: self.path.to_path_buf(),
            section: self.name,
            field,
        })
    }

    fn parse<T: FromStr>(
        &self,
        field: &'static str,
        expected: &'static str,
    ) -> Result<T, ConfigError> {
        let raw = self.required(field)?;
        raw.parse().map_err(|_| self.invalid(field, expected, raw))
    }

    /// Positive number of milliseconds.
    fn millis(&self, field: &'static str) -> Result<Duration, ConfigError> {
        const EXPECTED: &str = "a positive number of milliseconds";

        let ms: u64 = self.parse(field, EXPECTED)?;
        if ms == 0 {
            return Err(self.invalid(field, EXPECTED, "0"));
        }
        Ok(Duration::from_millis(ms))
    }

    /// `true` or `false`, in any case.
    fn flag(&self, field: &'static str) -> Result<bool, ConfigError> {
        let raw = self.required(field)?;
        match raw.to_ascii_lowercase().as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => Err(self.invalid(field, "a boolean (true, false)", raw)),
        }
    }

    fn invalid(&self, field: &'static str, expected: &'static str, value: &str) -> ConfigError {
        ConfigError::InvalidField {
            file: self.path.to_path_buf(),
            section: self.name,
            field,
            expected,
            value: value.to_string(),
        }
    }
}
