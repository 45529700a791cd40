use crate::domain::model::{Dataset, DatasetOrigin, RaceRecord};
use crate::utils::error::{ChartError, Result};
use reqwest::Client;

pub const DEFAULT_DATA_URL: &str =
    "https://raw.githubusercontent.com/freeCodeCamp/ProjectReferenceData/master/cyclist-data.json";

const BUNDLED_DATASET: &str = include_str!("../../data/cyclist-data.json");

pub fn fallback_records() -> Result<Vec<RaceRecord>> {
    Ok(serde_json::from_str(BUNDLED_DATASET)?)
}

pub fn fallback_dataset() -> Result<Dataset> {
    Ok(Dataset {
        records: fallback_records()?,
        origin: DatasetOrigin::Fallback,
    })
}

/// 單次請求，不重試也不設逾時
pub async fn fetch_records(client: &Client, url: &str) -> Result<Vec<RaceRecord>> {
    tracing::debug!("Requesting dataset from: {}", url);
    let response = client.get(url).send().await?;

    let status = response.status();
    tracing::debug!("Dataset response status: {}", status);
    if !status.is_success() {
        return Err(ChartError::HttpStatusError {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }

    let body = response.bytes().await?;
    let records: Vec<RaceRecord> = serde_json::from_slice(&body)?;
    Ok(records)
}

/// Remote dataset, or the bundled one when the request fails for any reason.
pub async fn acquire_dataset(client: &Client, url: &str) -> Result<Dataset> {
    match fetch_records(client, url).await {
        Ok(records) => Ok(Dataset {
            records,
            origin: DatasetOrigin::Remote,
        }),
        Err(e) => {
            tracing::error!("{}", e);
            tracing::warn!("⚠️ Falling back to the bundled dataset");
            fallback_dataset()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[test]
    fn test_bundled_dataset_is_well_formed() {
        let dataset = fallback_dataset().unwrap();

        assert_eq!(dataset.origin, DatasetOrigin::Fallback);
        assert_eq!(dataset.len(), 35);
        assert!(dataset.parsed_points().is_ok());
        assert!(dataset.records.iter().any(|r| r.has_doping_allegation()));
        assert!(dataset.records.iter().any(|r| !r.has_doping_allegation()));

        for record in &dataset.records {
            assert_eq!(record.seconds.map(i64::from), record.finish_seconds().ok());
        }
    }

    #[tokio::test]
    async fn test_fetch_records_rejects_error_status() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/cyclist-data.json");
            then.status(404);
        });

        let result = fetch_records(&Client::new(), &server.url("/cyclist-data.json")).await;

        api_mock.assert();
        match result {
            Err(ChartError::HttpStatusError { status, .. }) => assert_eq!(status, 404),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_acquire_dataset_falls_back_on_malformed_body() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/cyclist-data.json");
            then.status(200)
                .header("Content-Type", "application/json")
                .body(r#"{"not": "an array"}"#);
        });

        let dataset = acquire_dataset(&Client::new(), &server.url("/cyclist-data.json"))
            .await
            .unwrap();

        api_mock.assert();
        assert_eq!(dataset, fallback_dataset().unwrap());
    }
}
