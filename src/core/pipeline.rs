use crate::core::chart;
use crate::domain::model::{
    CoverageEntry, RankedCountry, TransformResult, VaccineCount, VaccineRecord,
};
use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
use crate::utils::error::{PipelineError, Result};
use reqwest::Client;
use std::time::Duration;

const FETCH_TIMEOUT: Duration = Duration::from_secs(5);
const CSV_HEADER: [&str; 2] = ["country", "vaccines_administered"];
const TOP_N: usize = 10;
const PREVIEW_ROWS: usize = 10;

pub struct VaccinePipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    client: Client,
}

impl<S: Storage, C: ConfigProvider> VaccinePipeline<S, C> {
    pub fn new(storage: S, config: C) -> Result<Self> {
        let client = Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .map_err(|e| PipelineError::UnexpectedError(e.to_string()))?;

        Ok(Self {
            storage,
            config,
            client,
        })
    }
}

/// Maps a reqwest failure onto the fetch error taxonomy: decode problems are
/// format errors, anything transport-shaped is a network error, and the rest
/// lands in the catch-all.
fn classify_request_error(e: reqwest::Error) -> PipelineError {
    if e.is_decode() {
        PipelineError::FormatError(e.to_string())
    } else if e.is_timeout()
        || e.is_connect()
        || e.is_status()
        || e.is_request()
        || e.is_redirect()
        || e.is_body()
    {
        PipelineError::NetworkError(e.to_string())
    } else {
        PipelineError::UnexpectedError(e.to_string())
    }
}

fn preview(records: &[VaccineRecord]) -> String {
    records
        .iter()
        .take(PREVIEW_ROWS)
        .map(|r| format!("{}, {}", r.country, r.vaccines_administered))
        .collect::<Vec<_>>()
        .join("\n")
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for VaccinePipeline<S, C> {
    async fn extract(&self) -> Result<Vec<VaccineRecord>> {
        let url = format!(
            "{}?lastdays={}",
            self.config.api_endpoint(),
            self.config.lastdays()
        );

        tracing::info!("Fetching vaccine data from API...");
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(classify_request_error)?
            .error_for_status()
            .map_err(classify_request_error)?;

        tracing::debug!("API response status: {}", response.status());

        let body = response.text().await.map_err(classify_request_error)?;
        let entries: Vec<CoverageEntry> =
            serde_json::from_str(&body).map_err(|e| PipelineError::FormatError(e.to_string()))?;

        let records: Vec<VaccineRecord> = entries.into_iter().map(VaccineRecord::from).collect();
        tracing::info!("Successfully fetched data for {} countries.", records.len());

        Ok(records)
    }

    async fn transform(&self, records: Vec<VaccineRecord>) -> Result<TransformResult> {
        // Header is written by hand so an empty dataset still yields it.
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(Vec::new());
        writer.write_record(CSV_HEADER)?;
        for record in &records {
            writer.serialize(record)?;
        }
        let csv_output = writer
            .into_inner()
            .map_err(|e| PipelineError::IoError(std::io::Error::other(e.to_string())))?;

        // Coerce, drop N/A rows, rank. The sort is stable so ties keep
        // their upstream order.
        let mut ranked: Vec<RankedCountry> = records
            .iter()
            .filter_map(|record| match record.vaccines_administered {
                VaccineCount::Known(count) => Some(RankedCountry {
                    country: record.country.clone(),
                    vaccines_administered: count,
                }),
                VaccineCount::NotAvailable => None,
            })
            .collect();
        ranked.sort_by(|a, b| b.vaccines_administered.cmp(&a.vaccines_administered));
        ranked.truncate(TOP_N);

        Ok(TransformResult {
            records,
            csv_output,
            ranked,
        })
    }

    async fn load(&self, result: TransformResult) -> Result<String> {
        let csv_file = self.config.csv_file();
        self.storage.write_file(csv_file, &result.csv_output).await?;
        tracing::info!("✅ Data saved to {}", csv_file);
        tracing::info!("First 10 rows:\n{}", preview(&result.records));

        let chart_file = self.config.chart_file();
        let png = chart::render_bar_chart(&result.ranked)?;
        self.storage.write_file(chart_file, &png).await?;
        tracing::info!("📊 Vaccine data plot saved as '{}'.", chart_file);

        Ok(format!("{}/{}", self.config.output_path(), csv_file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn new() -> Self {
            Self {
                files: Arc::new(Mutex::new(HashMap::new())),
            }
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                PipelineError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    struct MockConfig {
        api_endpoint: String,
        lastdays: u32,
    }

    impl MockConfig {
        fn new(api_endpoint: String) -> Self {
            Self {
                api_endpoint,
                lastdays: 1,
            }
        }
    }

    impl ConfigProvider for MockConfig {
        fn api_endpoint(&self) -> &str {
            &self.api_endpoint
        }

        fn lastdays(&self) -> u32 {
            self.lastdays
        }

        fn output_path(&self) -> &str {
            "test_output"
        }

        fn csv_file(&self) -> &str {
            "vaccine_coverage.csv"
        }

        fn chart_file(&self) -> &str {
            "vaccine_coverage.png"
        }
    }

    fn pipeline(endpoint: String) -> VaccinePipeline<MockStorage, MockConfig> {
        VaccinePipeline::new(MockStorage::new(), MockConfig::new(endpoint)).unwrap()
    }

    fn record(country: &str, count: VaccineCount) -> VaccineRecord {
        VaccineRecord {
            country: country.to_string(),
            vaccines_administered: count,
        }
    }

    #[tokio::test]
    async fn test_extract_successful_api_response() {
        let server = MockServer::start();
        let mock_data = serde_json::json!([
            {"country": "USA", "timeline": {"3/23/24": 500_000_000u64}},
            {"country": "UK", "timeline": {"3/23/24": 100_000_000u64}}
        ]);

        let api_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/coverage")
                .query_param("lastdays", "1");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(mock_data);
        });

        let pipeline = pipeline(server.url("/coverage"));
        let records = pipeline.extract().await.unwrap();

        api_mock.assert();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], record("USA", VaccineCount::Known(500_000_000)));
        assert_eq!(records[1], record("UK", VaccineCount::Known(100_000_000)));
    }

    #[tokio::test]
    async fn test_extract_missing_timeline_yields_not_available() {
        let server = MockServer::start();
        let mock_data = serde_json::json!([
            {"country": "Atlantis"},
            {"country": "Elbonia", "timeline": {}}
        ]);

        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/coverage");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(mock_data);
        });

        let pipeline = pipeline(server.url("/coverage"));
        let records = pipeline.extract().await.unwrap();

        api_mock.assert();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].vaccines_administered, VaccineCount::NotAvailable);
        assert_eq!(records[1].vaccines_administered, VaccineCount::NotAvailable);
    }

    #[tokio::test]
    async fn test_extract_server_error_is_a_network_error() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/coverage");
            then.status(500);
        });

        let pipeline = pipeline(server.url("/coverage"));
        let error = pipeline.extract().await.unwrap_err();

        api_mock.assert();
        assert!(matches!(error, PipelineError::NetworkError(_)));
        let message = error.to_string();
        assert!(message.starts_with("Network error: "));
        assert!(message.contains("500"));
    }

    #[tokio::test]
    async fn test_extract_connection_refused_is_a_network_error() {
        // Port 9 (discard) is assumed closed.
        let pipeline = pipeline("http://127.0.0.1:9/coverage".to_string());
        let error = pipeline.extract().await.unwrap_err();

        assert!(matches!(error, PipelineError::NetworkError(_)));
        assert!(error.to_string().starts_with("Network error: "));
    }

    #[tokio::test]
    async fn test_extract_non_array_body_is_a_format_error() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/coverage");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({"message": "not found"}));
        });

        let pipeline = pipeline(server.url("/coverage"));
        let error = pipeline.extract().await.unwrap_err();

        api_mock.assert();
        assert!(matches!(error, PipelineError::FormatError(_)));
        assert!(error.to_string().starts_with("Unexpected response format: "));
    }

    #[tokio::test]
    async fn test_extract_wrong_typed_timeline_is_a_format_error() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/coverage");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!([{"country": "USA", "timeline": 5}]));
        });

        let pipeline = pipeline(server.url("/coverage"));
        let error = pipeline.extract().await.unwrap_err();

        api_mock.assert();
        assert!(matches!(error, PipelineError::FormatError(_)));
    }

    #[tokio::test]
    async fn test_transform_builds_csv_with_sentinel() {
        let pipeline = pipeline("http://unused".to_string());
        let records = vec![
            record("USA", VaccineCount::Known(500_000_000)),
            record("Atlantis", VaccineCount::NotAvailable),
        ];

        let result = pipeline.transform(records).await.unwrap();

        let csv_text = String::from_utf8(result.csv_output.clone()).unwrap();
        let lines: Vec<&str> = csv_text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "country,vaccines_administered");
        assert_eq!(lines[1], "USA,500000000");
        assert_eq!(lines[2], "Atlantis,N/A");
    }

    #[tokio::test]
    async fn test_transform_empty_input_keeps_header() {
        let pipeline = pipeline("http://unused".to_string());
        let result = pipeline.transform(Vec::new()).await.unwrap();

        let csv_text = String::from_utf8(result.csv_output).unwrap();
        assert_eq!(csv_text.trim_end(), "country,vaccines_administered");
        assert!(result.ranked.is_empty());
    }

    #[tokio::test]
    async fn test_transform_ranks_descending_and_truncates_to_ten() {
        let pipeline = pipeline("http://unused".to_string());
        let mut records: Vec<VaccineRecord> = (1..=12u64)
            .map(|i| record(&format!("Country {}", i), VaccineCount::Known(i * 1_000)))
            .collect();
        records.push(record("Atlantis", VaccineCount::NotAvailable));

        let result = pipeline.transform(records).await.unwrap();

        assert_eq!(result.ranked.len(), 10);
        assert_eq!(result.ranked[0].country, "Country 12");
        assert_eq!(result.ranked[0].vaccines_administered, 12_000);
        assert_eq!(result.ranked[9].country, "Country 3");
        // Non-numeric rows never make the ranking.
        assert!(result.ranked.iter().all(|c| c.country != "Atlantis"));
    }

    #[tokio::test]
    async fn test_transform_ties_keep_input_order() {
        let pipeline = pipeline("http://unused".to_string());
        let records = vec![
            record("First", VaccineCount::Known(100)),
            record("Second", VaccineCount::Known(100)),
            record("Biggest", VaccineCount::Known(200)),
        ];

        let result = pipeline.transform(records).await.unwrap();

        let order: Vec<&str> = result.ranked.iter().map(|c| c.country.as_str()).collect();
        assert_eq!(order, vec!["Biggest", "First", "Second"]);
    }

    #[tokio::test]
    async fn test_transform_is_byte_identical_for_identical_input() {
        let pipeline = pipeline("http://unused".to_string());
        let records = vec![
            record("USA", VaccineCount::Known(500_000_000)),
            record("UK", VaccineCount::Known(100_000_000)),
        ];

        let first = pipeline.transform(records.clone()).await.unwrap();
        let second = pipeline.transform(records).await.unwrap();

        assert_eq!(first.csv_output, second.csv_output);
    }

    #[tokio::test]
    async fn test_load_writes_csv_and_chart() {
        let storage = MockStorage::new();
        let config = MockConfig::new("http://unused".to_string());
        let pipeline = VaccinePipeline::new(storage.clone(), config).unwrap();

        let records = vec![
            record("USA", VaccineCount::Known(500_000_000)),
            record("UK", VaccineCount::Known(100_000_000)),
        ];
        let result = pipeline.transform(records).await.unwrap();
        let output_path = pipeline.load(result).await.unwrap();

        assert_eq!(output_path, "test_output/vaccine_coverage.csv");

        // Round trip through the storage port.
        let csv_data = storage.read_file("vaccine_coverage.csv").await.unwrap();
        let csv_text = String::from_utf8(csv_data).unwrap();
        let lines: Vec<&str> = csv_text.lines().collect();
        assert_eq!(lines[0], "country,vaccines_administered");
        assert_eq!(lines[1], "USA,500000000");
        assert_eq!(lines[2], "UK,100000000");

        let png = storage.get_file("vaccine_coverage.png").await.unwrap();
        assert_eq!(&png[..8], &PNG_MAGIC);
    }

    #[tokio::test]
    async fn test_load_with_no_plottable_rows_writes_csv_then_fails() {
        let storage = MockStorage::new();
        let config = MockConfig::new("http://unused".to_string());
        let pipeline = VaccinePipeline::new(storage.clone(), config).unwrap();

        let records = vec![record("Atlantis", VaccineCount::NotAvailable)];
        let result = pipeline.transform(records).await.unwrap();
        let error = pipeline.load(result).await.unwrap_err();

        assert!(matches!(error, PipelineError::EmptyChartError));
        // CSV persistence happens before charting, so it must survive.
        assert!(storage.get_file("vaccine_coverage.csv").await.is_some());
        assert!(storage.get_file("vaccine_coverage.png").await.is_none());
    }
}
