use anyhow::{Context, Result, anyhow};
use chrono::{NaiveDate, Utc};
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_PANEL_BASE_URL: &str = "http://www.roxysms.net";
pub const DEFAULT_CHANNEL_URL: &str = "https://t.me/freenumbergivway";
pub const DEFAULT_GROUP_URL: &str = "https://t.me/+1OQ8HC_fgwczNjg1";
pub const DEFAULT_TELEGRAM_API: &str = "https://api.telegram.org";

/// Runtime configuration, resolved once in `main` and handed to each component.
#[derive(Debug, Clone)]
pub struct Cfg {
    pub bot_token: String,
    pub chat_id: String,
    pub session_id: String,
    pub port: u16,
    pub panel: PanelCfg,
    pub telegram_api: String,
    pub buttons: ButtonCfg,
    pub poll_interval: Duration,
    pub seen_capacity: usize,
    pub dry_run: bool,
}

#[derive(Debug, Clone)]
pub struct PanelCfg {
    pub base_url: String,
    /// Fixed day to query. `None` follows the current UTC date.
    pub date: Option<NaiveDate>,
    pub page_size: u32,
}

impl PanelCfg {
    pub fn query_date(&self) -> NaiveDate {
        self.date.unwrap_or_else(|| Utc::now().date_naive())
    }
}

#[derive(Debug, Clone)]
pub struct ButtonCfg {
    pub channel_url: String,
    pub group_url: String,
}

impl Default for ButtonCfg {
    fn default() -> Self {
        Self {
            channel_url: DEFAULT_CHANNEL_URL.into(),
            group_url: DEFAULT_GROUP_URL.into(),
        }
    }
}

/// Load configuration from the environment.
///
/// | Env var              | Default                    | Description                     |
/// |----------------------|----------------------------|---------------------------------|
/// | `BOT_TOKEN`          | required                   | Telegram bot token              |
/// | `CHAT_ID`            | required                   | Destination chat                |
/// | `PHPSESSID`          | required                   | Panel session cookie            |
/// | `PORT`               | `10000`                    | Liveness server port            |
/// | `PANEL_BASE_URL`     | `http://www.roxysms.net`   | Panel origin                    |
/// | `PANEL_DATE`         | today (UTC)                | Day to query, `YYYY-MM-DD`      |
/// | `PANEL_PAGE_SIZE`    | `25`                       | Rows requested per poll         |
/// | `POLL_INTERVAL_SECS` | `15`                       | Sleep between poll cycles       |
/// | `SEEN_CAPACITY`      | `5000`                     | Dedup set bound                 |
/// | `TELEGRAM_API_BASE`  | `https://api.telegram.org` | Bot API origin                  |
/// | `CHANNEL_URL`        | main channel link          | First inline button             |
/// | `GROUP_URL`          | number group link          | Second inline button            |
/// | `DRY_RUN`            | `false`                    | Print instead of sending        |
pub fn load_cfg() -> Result<Cfg> {
    load_cfg_from(|key| std::env::var(key).ok())
}

/// Build a [`Cfg`] from any key lookup.  Blank values count as unset.
pub fn load_cfg_from(get: impl Fn(&str) -> Option<String>) -> Result<Cfg> {
    let env = Env { get };

    let bot_token = env.required("BOT_TOKEN")?;
    let chat_id = env.required("CHAT_ID")?;
    let session_id = env.required("PHPSESSID")?;

    let port: u16 = match env.value("PORT") {
        Some(v) => v.parse::<u16>().context("PORT must be u16")?,
        None => 10000,
    };

    let date = env
        .value("PANEL_DATE")
        .map(|v| NaiveDate::parse_from_str(&v, "%Y-%m-%d"))
        .transpose()
        .context("PANEL_DATE must be YYYY-MM-DD")?;

    let mut buttons = ButtonCfg::default();
    if let Some(url) = env.value("CHANNEL_URL") {
        buttons.channel_url = url;
    }
    if let Some(url) = env.value("GROUP_URL") {
        buttons.group_url = url;
    }

    Ok(Cfg {
        bot_token,
        chat_id,
        session_id,
        port,
        panel: PanelCfg {
            base_url: env
                .value("PANEL_BASE_URL")
                .unwrap_or_else(|| DEFAULT_PANEL_BASE_URL.into())
                .trim_end_matches('/')
                .to_string(),
            date,
            page_size: env.parsed("PANEL_PAGE_SIZE", 25u32).max(1),
        },
        telegram_api: env
            .value("TELEGRAM_API_BASE")
            .unwrap_or_else(|| DEFAULT_TELEGRAM_API.into())
            .trim_end_matches('/')
            .to_string(),
        buttons,
        poll_interval: Duration::from_secs(env.parsed("POLL_INTERVAL_SECS", 15u64).max(1)),
        seen_capacity: env.parsed("SEEN_CAPACITY", 5000usize).max(1),
        dry_run: env.parsed("DRY_RUN", Flag(false)).0,
    })
}

struct Env<F> {
    get: F,
}

impl<F: Fn(&str) -> Option<String>> Env<F> {
    /// Trimmed, non-blank value.
    fn value(&self, key: &str) -> Option<String> {
        (self.get)(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn required(&self, key: &str) -> Result<String> {
        self.value(key).ok_or_else(|| anyhow!("Missing env var {key}"))
    }

    /// Lenient parse: unset or unparsable falls back to `default`.
    fn parsed<T: FromStr>(&self, key: &str, default: T) -> T {
        self.value(key)
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }
}

/// Boolean switch accepting `1`/`true`/`yes` and `0`/`false`/`no`.
struct Flag(bool);

impl FromStr for Flag {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, ()> {
        match s.to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" => Ok(Flag(true)),
            "0" | "false" | "no" => Ok(Flag(false)),
            _ => Err(()),
        }
    }
}
