// Grid operator CSV API client
use crate::application::ports::LineSource;
use crate::domain::raw_record::RawRecord;
use crate::infrastructure::config::prepare_url;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("request for area {area} failed: {source}")]
    Transport {
        area: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("HTTP {status} area={area}")]
    Status {
        area: String,
        status: reqwest::StatusCode,
    },
    #[error("malformed CSV for area {area}: {source}")]
    Csv {
        area: String,
        #[source]
        source: csv::Error,
    },
}

#[derive(Debug, Clone)]
pub struct GridApiClient {
    client: reqwest::Client,
    url_template: String,
}

impl GridApiClient {
    pub fn new(url_template: String, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url_template,
        })
    }

    fn build_url(&self, area: &str, date: NaiveDate) -> String {
        let mut vars = HashMap::new();
        vars.insert("area".to_string(), area.to_string());
        vars.insert("date".to_string(), date.format("%Y%m%d").to_string());
        prepare_url(&self.url_template, &vars)
    }

    async fn fetch_csv(&self, area: &str, date: NaiveDate) -> Result<String, SourceError> {
        let url = self.build_url(area, date);
        tracing::debug!(area, %url, "fetching area CSV");

        let transport = |source| SourceError::Transport {
            area: area.to_string(),
            source,
        };

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::CACHE_CONTROL, "no-cache")
            .send()
            .await
            .map_err(transport)?;

        if !response.status().is_success() {
            return Err(SourceError::Status {
                area: area.to_string(),
                status: response.status(),
            });
        }

        response.text().await.map_err(transport)
    }
}

#[async_trait]
impl LineSource for GridApiClient {
    async fn fetch_area(&self, area: &str, date: NaiveDate) -> anyhow::Result<Vec<RawRecord>> {
        let body = self.fetch_csv(area, date).await?;
        let records = parse_csv(&body).map_err(|source| SourceError::Csv {
            area: area.to_string(),
            source,
        })?;
        tracing::debug!(area, rows = records.len(), "parsed area CSV");
        Ok(records)
    }
}

/// Decode a header-first CSV body into records.
///
/// Blank lines are skipped and ragged rows tolerated: missing trailing cells
/// are left out of the record and surplus cells are dropped. Header names are
/// trimmed and a leading byte-order mark is removed.
pub fn parse_csv(body: &str) -> Result<Vec<RawRecord>, csv::Error> {
    let body = body.strip_prefix('\u{feff}').unwrap_or(body);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(body.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.trim().to_string()).collect();

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        if row.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        let record: RawRecord = headers
            .iter()
            .zip(row.iter())
            .map(|(h, v)| (h.as_str(), v))
            .collect();
        records.push(record);
    }
    Ok(records)
}
