//! HTTP client for the NWIS instantaneous-values and statistics services.

use crate::error::Result;
use log::{info, warn};
use reqwest::{Client, StatusCode};
use std::time::Duration;

pub const IV_SERVICE_URL: &str = "https://waterservices.usgs.gov/nwis/iv/";
pub const STATISTICS_SERVICE_URL: &str = "https://waterservices.usgs.gov/nwis/stat/";

const MAX_TRIES: u32 = 3;
const INITIAL_BACKOFF_MILLIS: u64 = 1000;

/// The time span requested from the instantaneous-values service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeWindow {
    /// A relative period code such as "P7D".
    Period(String),
    /// Explicit ISO-8601 start and end.
    Range { start: String, end: String },
}

fn time_window_params(window: &TimeWindow) -> String {
    match window {
        TimeWindow::Period(period) => format!("period={}", period),
        TimeWindow::Range { start, end } => format!("startDT={}&endDT={}", start, end),
    }
}

/// Build the instantaneous-values JSON request URL.
pub fn time_series_url(sites: &[&str], parameter_codes: &[&str], window: &TimeWindow) -> String {
    let mut url = format!(
        "{}?sites={}&{}&siteStatus=all&format=json",
        IV_SERVICE_URL,
        sites.join(","),
        time_window_params(window)
    );
    if !parameter_codes.is_empty() {
        url.push_str(&format!("&parameterCd={}", parameter_codes.join(",")));
    }
    url
}

/// Build the daily median statistics RDB request URL.
pub fn median_statistics_url(site: &str, parameter_codes: &[&str]) -> String {
    let mut url = format!(
        "{}?format=rdb&sites={}&statReportType=daily&statTypeCd=median",
        STATISTICS_SERVICE_URL, site
    );
    if !parameter_codes.is_empty() {
        url.push_str(&format!("&parameterCd={}", parameter_codes.join(",")));
    }
    url
}

/// GET a text body with retry and exponential backoff.
///
/// Returns `None` when the service reports no data (404 or an empty body)
/// or every attempt fails.
async fn get_text(client: &Client, url: &str) -> Result<Option<String>> {
    let mut sleep_millis = INITIAL_BACKOFF_MILLIS;

    for attempt in 1..=MAX_TRIES {
        match client.get(url).send().await {
            Ok(response) => match response.status() {
                StatusCode::OK => {
                    let body = response.text().await?;
                    if body.trim().is_empty() {
                        warn!("Empty response for {}", url);
                        return Ok(None);
                    }
                    return Ok(Some(body));
                }
                StatusCode::NOT_FOUND => {
                    info!("No data for {}", url);
                    return Ok(None);
                }
                status => {
                    warn!(
                        "Attempt {}/{}: Bad response status for {}: {}",
                        attempt, MAX_TRIES, url, status
                    );
                }
            },
            Err(e) => {
                warn!("Attempt {}/{}: Request failed for {}: {}", attempt, MAX_TRIES, url, e);
                if attempt == MAX_TRIES {
                    return Err(e.into());
                }
            }
        }

        if attempt < MAX_TRIES {
            info!("Sleeping for {} milliseconds before retry", sleep_millis);
            tokio::time::sleep(Duration::from_millis(sleep_millis)).await;
            sleep_millis *= 2;
        }
    }

    warn!("All attempts failed for {}", url);
    Ok(None)
}

/// Fetch the instantaneous-values JSON document for the given sites.
pub async fn fetch_time_series(
    client: &Client,
    sites: &[&str],
    parameter_codes: &[&str],
    window: &TimeWindow,
) -> Result<Option<String>> {
    let url = time_series_url(sites, parameter_codes, window);
    info!("Fetching time series: {}", url);
    get_text(client, &url).await
}

/// Fetch the daily median statistics RDB for a site.
pub async fn fetch_median_statistics(
    client: &Client,
    site: &str,
    parameter_codes: &[&str],
) -> Result<Option<String>> {
    let url = median_statistics_url(site, parameter_codes);
    info!("Fetching median statistics: {}", url);
    get_text(client, &url).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_series_url() {
        let url = time_series_url(&["05413500"], &["00060"], &TimeWindow::Period("P7D".to_string()));
        assert_eq!(
            url,
            "https://waterservices.usgs.gov/nwis/iv/?sites=05413500&period=P7D&siteStatus=all&format=json&parameterCd=00060"
        );
        let url = time_series_url(
            &["05413500"],
            &[],
            &TimeWindow::Range {
                start: "2017-01-10".to_string(),
                end: "2017-01-11".to_string(),
            },
        );
        assert!(url.contains("startDT=2017-01-10&endDT=2017-01-11"));
        assert!(!url.contains("parameterCd"));
    }

    #[test]
    fn test_median_statistics_url() {
        assert_eq!(
            median_statistics_url("05370000", &["00060"]),
            "https://waterservices.usgs.gov/nwis/stat/?format=rdb&sites=05370000&statReportType=daily&statTypeCd=median&parameterCd=00060"
        );
    }
}
