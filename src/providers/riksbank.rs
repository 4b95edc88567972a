//! Riksbank SWEA API adapter for the bank day calendar and cross rates.

use crate::core::error::{UpstreamResult, UpstreamUnavailable};
use crate::core::{CalendarGateway, Currency, RateGateway, RateObservation};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, instrument};

const DATE_FORMAT: &str = "%Y-%m-%d";

pub struct RiksbankProvider {
    base_url: String,
    client: reqwest::Client,
}

impl RiksbankProvider {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("riksfx/0.1")
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(RiksbankProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> UpstreamResult<T> {
        debug!("Requesting {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| UpstreamUnavailable::Request {
                url: url.to_string(),
                source,
            })?;

        if !response.status().is_success() {
            return Err(UpstreamUnavailable::Status {
                url: url.to_string(),
                status: response.status(),
            });
        }

        let text = response
            .text()
            .await
            .map_err(|source| UpstreamUnavailable::Request {
                url: url.to_string(),
                source,
            })?;

        serde_json::from_str(&text).map_err(|e| UpstreamUnavailable::Parse {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CalendarDayResponse {
    calendar_date: String,
    swedish_bankday: bool,
}

#[derive(Debug, Deserialize)]
struct CrossRateResponse {
    date: String,
    value: f64,
}

impl CrossRateResponse {
    fn into_observation(
        self,
        from: Currency,
        to: Currency,
        url: &str,
    ) -> UpstreamResult<RateObservation> {
        let date = NaiveDate::parse_from_str(&self.date, DATE_FORMAT).map_err(|e| {
            UpstreamUnavailable::Parse {
                url: url.to_string(),
                reason: format!("invalid date '{}': {}", self.date, e),
            }
        })?;
        if !self.value.is_finite() || self.value <= 0.0 {
            return Err(UpstreamUnavailable::Parse {
                url: url.to_string(),
                reason: format!("non-positive rate {} on {}", self.value, self.date),
            });
        }
        Ok(RateObservation::new(from, to, date, self.value))
    }
}

#[async_trait]
impl CalendarGateway for RiksbankProvider {
    #[instrument(name = "RiksbankCalendar", skip_all, fields(date = %date))]
    async fn is_bank_day(&self, date: NaiveDate) -> UpstreamResult<bool> {
        let url = format!("{}/CalendarDays/{}", self.base_url, date.format(DATE_FORMAT));
        let days: Vec<CalendarDayResponse> = self.get_json(&url).await?;

        let is_bank_day = days.first().is_some_and(|day| day.swedish_bankday);
        if let Some(day) = days.first() {
            debug!(calendar_date = %day.calendar_date, is_bank_day, "Received calendar day");
        } else {
            debug!("Empty calendar response, treating as not a bank day");
        }
        Ok(is_bank_day)
    }
}

#[async_trait]
impl RateGateway for RiksbankProvider {
    #[instrument(name = "RiksbankCrossRates", skip_all, fields(from = %from, to = %to, start = %start))]
    async fn fetch_from(
        &self,
        from: Currency,
        to: Currency,
        start: NaiveDate,
    ) -> UpstreamResult<Vec<RateObservation>> {
        let url = format!(
            "{}/CrossRates/{}/{}/{}",
            self.base_url,
            from.series_id(),
            to.series_id(),
            start.format(DATE_FORMAT)
        );
        let rates: Vec<CrossRateResponse> = self.get_json(&url).await?;
        debug!(count = rates.len(), "Received cross rates");

        rates
            .into_iter()
            .map(|rate| rate.into_observation(from, to, &url))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn create_mock_server(request_path: &str, status: u16, body: &str) -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(request_path))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&mock_server)
            .await;

        mock_server
    }

    fn provider(server: &MockServer) -> RiksbankProvider {
        RiksbankProvider::new(&server.uri(), Duration::from_secs(5)).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn test_bank_day() {
        let body = r#"[{"calendarDate":"2024-01-15","swedishBankday":true,"weekYear":2024,"weekNumber":3,"quarterNumber":1,"ultimo":false}]"#;
        let server = create_mock_server("/CalendarDays/2024-01-15", 200, body).await;

        let result = provider(&server).is_bank_day(date(2024, 1, 15)).await;
        assert!(result.unwrap());
    }

    #[tokio::test]
    async fn test_holiday_is_not_bank_day() {
        let body = r#"[{"calendarDate":"2024-01-01","swedishBankday":false,"weekYear":2024,"weekNumber":1,"quarterNumber":1,"ultimo":false}]"#;
        let server = create_mock_server("/CalendarDays/2024-01-01", 200, body).await;

        let result = provider(&server).is_bank_day(date(2024, 1, 1)).await;
        assert!(!result.unwrap());
    }

    #[tokio::test]
    async fn test_empty_calendar_is_not_bank_day() {
        let server = create_mock_server("/CalendarDays/2024-01-15", 200, "[]").await;

        let result = provider(&server).is_bank_day(date(2024, 1, 15)).await;
        assert!(!result.unwrap());
    }

    #[tokio::test]
    async fn test_calendar_server_error() {
        let server = create_mock_server("/CalendarDays/2024-01-15", 500, "").await;

        let result = provider(&server).is_bank_day(date(2024, 1, 15)).await;
        let err = result.unwrap_err();
        assert!(matches!(err, UpstreamUnavailable::Status { .. }));
        assert_eq!(
            err.to_string(),
            format!(
                "HTTP error: 500 Internal Server Error for {}/CalendarDays/2024-01-15",
                server.uri()
            )
        );
    }

    #[tokio::test]
    async fn test_calendar_malformed_response() {
        let server =
            create_mock_server("/CalendarDays/2024-01-15", 200, r#"{"unexpected": true}"#).await;

        let result = provider(&server).is_bank_day(date(2024, 1, 15)).await;
        assert!(matches!(
            result.unwrap_err(),
            UpstreamUnavailable::Parse { .. }
        ));
    }

    #[tokio::test]
    async fn test_cross_rates() {
        let body = r#"[
            {"date": "2024-01-10", "value": 0.83},
            {"date": "2024-01-12", "value": 0.85}
        ]"#;
        let server = create_mock_server("/CrossRates/SEKUSDPMI/SEKEURPMI/2024-01-08", 200, body).await;

        let rates = provider(&server)
            .fetch_from(Currency::Usd, Currency::Eur, date(2024, 1, 8))
            .await
            .unwrap();

        assert_eq!(
            rates,
            vec![
                RateObservation::new(Currency::Usd, Currency::Eur, date(2024, 1, 10), 0.83),
                RateObservation::new(Currency::Usd, Currency::Eur, date(2024, 1, 12), 0.85),
            ]
        );
    }

    #[tokio::test]
    async fn test_cross_rates_empty() {
        let server = create_mock_server("/CrossRates/SEKETT/SEKUSDPMI/2024-01-15", 200, "[]").await;

        let rates = provider(&server)
            .fetch_from(Currency::Sek, Currency::Usd, date(2024, 1, 15))
            .await
            .unwrap();
        assert!(rates.is_empty());
    }

    #[tokio::test]
    async fn test_cross_rates_invalid_date() {
        let body = r#"[{"date": "15/01/2024", "value": 0.85}]"#;
        let server = create_mock_server("/CrossRates/SEKUSDPMI/SEKEURPMI/2024-01-15", 200, body).await;

        let err = provider(&server)
            .fetch_from(Currency::Usd, Currency::Eur, date(2024, 1, 15))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("invalid date '15/01/2024'"));
    }

    #[tokio::test]
    async fn test_cross_rates_rejects_non_positive_value() {
        let body = r#"[{"date": "2024-01-15", "value": 0.0}]"#;
        let server = create_mock_server("/CrossRates/SEKUSDPMI/SEKEURPMI/2024-01-15", 200, body).await;

        let err = provider(&server)
            .fetch_from(Currency::Usd, Currency::Eur, date(2024, 1, 15))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("non-positive rate"));
    }

    #[tokio::test]
    async fn test_request_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/CalendarDays/2024-01-15"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("[]")
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;
        let provider = RiksbankProvider::new(&server.uri(), Duration::from_millis(100)).unwrap();

        let err = provider.is_bank_day(date(2024, 1, 15)).await.unwrap_err();
        assert!(matches!(err, UpstreamUnavailable::Request { .. }));
    }
}
