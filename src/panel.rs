//! SMS panel client: one authenticated fetch of the CDR table per poll and
//! normalization of its positional rows.

use anyhow::{Context, Result, anyhow};
use chrono::{NaiveDate, Utc};
use reqwest::Client as HttpClient;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, COOKIE, REFERER, USER_AGENT};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::config::PanelCfg;

const FETCH_TIMEOUT: Duration = Duration::from_secs(15);
const DATA_PATH: &str = "/client/res/data_smscdr.php";
const REFERER_PATH: &str = "/client/SMSCDRStats";
const BROWSER_UA: &str = "Mozilla/5.0 (Linux; Android 10; K) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/139.0.0.0 Mobile Safari/537.36";

/// Number of columns the panel table exposes.
const COLUMNS: usize = 7;

// Positional fields inside a row.
const COL_TIME: usize = 0;
const COL_NUMBER: usize = 2;
const COL_SERVICE: usize = 3;
const COL_MESSAGE: usize = 5;

/// One received SMS as reported by the panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowRecord {
    pub timestamp: String,
    pub phone_number: String,
    pub service_name: String,
    pub raw_message: String,
}

#[derive(Deserialize, Debug)]
pub struct PanelResponse {
    #[serde(rename = "aaData", default)]
    rows: Vec<Value>,
}

pub struct PanelClient {
    http: HttpClient,
    cfg: PanelCfg,
    session_id: String,
}

impl PanelClient {
    pub fn new(http: HttpClient, cfg: PanelCfg, session_id: String) -> Self {
        Self {
            http,
            cfg,
            session_id,
        }
    }

    /// Fetch the current table and return rows oldest-first.
    pub async fn fetch_rows(&self) -> Result<Vec<RowRecord>> {
        let url = format!(
            "{}{DATA_PATH}?{}",
            self.cfg.base_url,
            build_query(
                self.cfg.query_date(),
                self.cfg.page_size,
                Utc::now().timestamp_millis()
            )
        );

        let resp = self
            .http
            .get(&url)
            .timeout(FETCH_TIMEOUT)
            .header(COOKIE, format!("PHPSESSID={}", self.session_id))
            .header(USER_AGENT, BROWSER_UA)
            .header(ACCEPT, "application/json, text/javascript, */*; q=0.01")
            .header(ACCEPT_LANGUAGE, "en-US,en;q=0.9,bn;q=0.8")
            .header(REFERER, format!("{}{REFERER_PATH}", self.cfg.base_url))
            .header("X-Requested-With", "XMLHttpRequest")
            .send()
            .await
            .context("panel request failed")?;

        let status = resp.status();
        let raw = resp.text().await.context("panel body read failed")?;
        if !status.is_success() {
            return Err(anyhow!("panel returned {status}"));
        }

        let parsed: PanelResponse =
            serde_json::from_str(&raw).context("panel returned non-JSON (session expired?)")?;
        Ok(normalize_rows(parsed))
    }
}

/// DataTables query string for one day of records, newest first.
pub fn build_query(date: NaiveDate, page_size: u32, cache_buster: i64) -> String {
    let mut q = format!(
        "fdate1={date}%2000:00:00&fdate2={date}%2023:59:59\
         &frange=&fnum=&fcli=&fgdate=&fgmonth=&fgrange=&fgnumber=&fgcli=&fg=0\
         &sEcho=1&iColumns={COLUMNS}&sColumns=%2C%2C%2C%2C%2C%2C\
         &iDisplayStart=0&iDisplayLength={page_size}"
    );
    for i in 0..COLUMNS {
        q.push_str(&format!(
            "&mDataProp_{i}={i}&sSearch_{i}=&bRegex_{i}=false\
             &bSearchable_{i}=true&bSortable_{i}=true"
        ));
    }
    q.push_str(&format!(
        "&sSearch=&bRegex=false&iSortCol_0=0&sSortDir_0=desc&iSortingCols=1&_={cache_buster}"
    ));
    q
}

/// Turn the panel's newest-first positional rows into oldest-first records,
/// dropping rows without a real message body.
pub fn normalize_rows(resp: PanelResponse) -> Vec<RowRecord> {
    resp.rows
        .iter()
        .rev()
        .filter_map(|row| {
            let Some(fields) = row.as_array() else {
                debug!("Skipping non-array panel row");
                return None;
            };
            if fields.len() <= COL_MESSAGE {
                debug!("Skipping short panel row ({} fields)", fields.len());
                return None;
            }
            let raw_message = field_str(&fields[COL_MESSAGE]);
            let trimmed = raw_message.trim();
            if trimmed.is_empty() || trimmed == "0" {
                return None;
            }
            Some(RowRecord {
                timestamp: field_str(&fields[COL_TIME]),
                phone_number: field_str(&fields[COL_NUMBER]),
                service_name: field_str(&fields[COL_SERVICE]),
                raw_message,
            })
        })
        .collect()
}

fn field_str(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
