use cyclist_scatter::core::dataset::{acquire_dataset, fallback_dataset, fetch_records};
use cyclist_scatter::core::Pipeline;
use cyclist_scatter::{ChartError, DatasetOrigin, LocalStorage, ScatterPipeline, TomlConfig};
use httpmock::prelude::*;
use reqwest::Client;
use tempfile::TempDir;

#[tokio::test]
async fn test_server_error_falls_back_to_bundled_dataset() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/cyclist-data.json");
        then.status(500);
    });

    let dataset = acquire_dataset(&Client::new(), &server.url("/cyclist-data.json"))
        .await
        .unwrap();

    api_mock.assert();
    assert_eq!(dataset.origin, DatasetOrigin::Fallback);
    assert_eq!(dataset, fallback_dataset().unwrap());
}

#[tokio::test]
async fn test_single_attempt_without_retry() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/cyclist-data.json");
        then.status(503);
    });

    let _ = acquire_dataset(&Client::new(), &server.url("/cyclist-data.json"))
        .await
        .unwrap();

    api_mock.assert_hits(1);
}

#[tokio::test]
async fn test_unreachable_host_falls_back() {
    // 綁定後立即釋放，取得一個沒有人監聽的埠
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let url = format!("http://127.0.0.1:{}/cyclist-data.json", port);
    let direct = fetch_records(&Client::new(), &url).await;
    assert!(matches!(direct, Err(ChartError::ApiError(_))));

    let dataset = acquire_dataset(&Client::new(), &url).await.unwrap();
    assert_eq!(dataset.origin, DatasetOrigin::Fallback);
}

#[tokio::test]
async fn test_records_with_wrong_shape_fall_back() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/cyclist-data.json");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!([{"Year": "nineteen ninety", "Time": 1}]));
    });

    let dataset = acquire_dataset(&Client::new(), &server.url("/cyclist-data.json"))
        .await
        .unwrap();

    api_mock.assert();
    assert_eq!(dataset.origin, DatasetOrigin::Fallback);
}

#[tokio::test]
async fn test_toml_pipeline_falls_back_and_renders() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/broken");
        then.status(502);
    });

    let toml_content = format!(
        r#"
[source]
url = "{}"

[chart]
title = "Fallback chart"

[output]
path = "{}"
format = "svg"
filename = "fallback.svg"
"#,
        server.url("/broken"),
        output_path.replace('\\', "\\\\")
    );

    let config = TomlConfig::from_toml_str(&toml_content).unwrap();
    let pipeline = ScatterPipeline::new(LocalStorage::new(output_path.clone()), config);

    let dataset = pipeline.extract().await.unwrap();
    api_mock.assert();
    assert_eq!(dataset.origin, DatasetOrigin::Fallback);

    let plot = pipeline.transform(dataset).await.unwrap();
    assert_eq!(plot.points.len(), fallback_dataset().unwrap().len());

    let written = pipeline.load(plot).await.unwrap();
    assert!(written.ends_with("fallback.svg"));

    let svg = std::fs::read_to_string(temp_dir.path().join("fallback.svg")).unwrap();
    assert!(svg.contains("Fallback chart"));
}
