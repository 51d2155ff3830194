use crate::core::archive::bundle_files;
use crate::core::dedupe::resolve;
use crate::core::encode::{encode_batch, FileNaming};
use crate::core::normalize::normalize_entry;
use crate::core::packer::{pack, PackOptions};
use crate::core::{parse, ConfigProvider, Pipeline, Storage};
use crate::domain::model::{ParsedInput, PhoneEntry, RunOutput, RunStats, TransformResult};
use crate::utils::error::Result;

pub struct BundlePipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    naming: FileNaming,
}

impl<S: Storage, C: ConfigProvider> BundlePipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self {
            storage,
            config,
            naming: FileNaming::now(),
        }
    }

    /// Override output naming, mainly to pin timestamps in tests.
    pub fn with_naming(mut self, naming: FileNaming) -> Self {
        self.naming = naming;
        self
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for BundlePipeline<S, C> {
    async fn extract(&self) -> Result<ParsedInput> {
        let path = self.config.input_path();
        tracing::debug!("Reading order input from: {}", path);
        let bytes = self.storage.read_file(path).await?;

        let parsed = if path.to_ascii_lowercase().ends_with(".csv") {
            parse::parse_csv(&bytes)?
        } else {
            parse::parse_text(&String::from_utf8_lossy(&bytes))
        };

        if parsed.skipped > 0 {
            tracing::warn!("Skipped {} unparsable input line(s)", parsed.skipped);
        }
        Ok(parsed)
    }

    async fn transform(&self, input: ParsedInput) -> Result<TransformResult> {
        let entries: Vec<PhoneEntry> = input
            .lines
            .into_iter()
            .map(|raw| normalize_entry(raw.raw_number, raw.allocation_gb))
            .collect();

        let outcome = resolve(entries, self.config.identity_mode());
        let kept = outcome.kept;

        let invalid = kept.iter().filter(|e| !e.is_valid).count();
        let flagged = kept.iter().filter(|e| e.is_duplicate).count();
        let total_gb: f64 = kept.iter().map(|e| e.allocation_gb).sum();
        let stats = RunStats {
            kept: kept.len(),
            invalid,
            duplicate: outcome.dropped + flagged,
            fixed: outcome.fixed,
            skipped: input.skipped,
            total_gb,
        };

        let (clean, problematic): (Vec<PhoneEntry>, Vec<PhoneEntry>) = kept
            .clone()
            .into_iter()
            .partition(|e| e.is_valid && !e.is_duplicate);

        let options = PackOptions {
            capacity_gb: self.config.capacity_gb(),
            sort_before_packing: self.config.sort_before_packing(),
        };
        let batches = pack(clean, problematic, &options);

        Ok(TransformResult {
            batches,
            kept,
            stats,
        })
    }

    async fn load(&self, result: TransformResult) -> Result<RunOutput> {
        let total = result.batches.len();
        let mut files = Vec::with_capacity(total);
        for (idx, batch) in result.batches.iter().enumerate() {
            let file = encode_batch(batch, idx + 1, total, &self.naming)?;
            tracing::debug!("Encoded {} ({} bytes)", file.name, file.bytes.len());
            files.push(file);
        }

        if files.is_empty() {
            tracing::warn!("No entries survived parsing; nothing to export");
            return Ok(RunOutput {
                files,
                kept: result.kept,
                stats: result.stats,
                output_path: String::new(),
            });
        }

        let delivery = bundle_files(files.clone(), &self.naming)?;
        self.storage.write_file(&delivery.name, &delivery.bytes).await?;
        let output_path = format!("{}/{}", self.config.output_path(), delivery.name);
        tracing::debug!("Export written to {}", output_path);

        Ok(RunOutput {
            files,
            kept: result.kept,
            stats: result.stats,
            output_path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::IdentityMode;
    use crate::utils::error::BundleError;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

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

        async fn put_file(&self, path: &str, data: &[u8]) {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }

        async fn file_names(&self) -> Vec<String> {
            let files = self.files.lock().await;
            files.keys().cloned().collect()
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                BundleError::IoError(std::io::Error::new(
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
        input_path: String,
        output_path: String,
        capacity_gb: f64,
        identity_mode: IdentityMode,
        sort_before_packing: bool,
    }

    impl MockConfig {
        fn new(input_path: &str) -> Self {
            Self {
                input_path: input_path.to_string(),
                output_path: "test_output".to_string(),
                capacity_gb: 10.0,
                identity_mode: IdentityMode::NumberOnly,
                sort_before_packing: true,
            }
        }
    }

    impl ConfigProvider for MockConfig {
        fn input_path(&self) -> &str {
            &self.input_path
        }

        fn output_path(&self) -> &str {
            &self.output_path
        }

        fn capacity_gb(&self) -> f64 {
            self.capacity_gb
        }

        fn identity_mode(&self) -> IdentityMode {
            self.identity_mode
        }

        fn sort_before_packing(&self) -> bool {
            self.sort_before_packing
        }
    }

    fn pipeline(
        storage: MockStorage,
        config: MockConfig,
    ) -> BundlePipeline<MockStorage, MockConfig> {
        BundlePipeline::new(storage, config).with_naming(FileNaming::pinned("20260401_120000"))
    }

    #[tokio::test]
    async fn test_extract_parses_text_input() {
        let storage = MockStorage::new();
        storage
            .put_file("orders.txt", b"0554739033 5\nnot-a-line\n0244123456 2GB\n")
            .await;

        let parsed = pipeline(storage.clone(), MockConfig::new("orders.txt"))
            .extract()
            .await
            .unwrap();

        assert_eq!(parsed.lines.len(), 2);
        assert_eq!(parsed.skipped, 1);
    }

    #[tokio::test]
    async fn test_extract_parses_csv_by_extension() {
        let storage = MockStorage::new();
        storage
            .put_file("orders.csv", b"msisdn,allocation\n0554739033,5\n")
            .await;

        let parsed = pipeline(storage.clone(), MockConfig::new("orders.csv"))
            .extract()
            .await
            .unwrap();

        assert_eq!(parsed.lines.len(), 1);
        assert_eq!(parsed.skipped, 0);
    }

    #[tokio::test]
    async fn test_transform_builds_stats_and_batches() {
        let storage = MockStorage::new();
        let config = MockConfig::new("orders.txt");
        let pipeline = pipeline(storage, config);

        let input = parse::parse_text(
            "0200000001 8\n0200000002 8\n0200000003 4\n554739033 1\n12345 2\n0200000001 3\n",
        );
        assert_eq!(input.skipped, 0);

        let result = pipeline.transform(input).await.unwrap();

        // 6 kept: one fixed, one invalid, one duplicate-flagged.
        assert_eq!(result.stats.kept, 6);
        assert_eq!(result.stats.invalid, 1);
        assert_eq!(result.stats.duplicate, 1);
        assert_eq!(result.stats.fixed, 1);
        assert_eq!(result.stats.total_gb, 26.0);

        // Clean entries [8, 8, 4, 1] pack into three batches at capacity 10;
        // the invalid and duplicate entries ride along in the last one.
        assert_eq!(result.batches.len(), 3);
        assert_eq!(result.batches[0].entries.len(), 1);
        assert_eq!(result.batches[1].entries.len(), 1);
        assert_eq!(result.batches[2].entries.len(), 4);
        assert!(result.batches[2].entries.iter().any(|e| !e.is_valid));
        assert!(result.batches[2].entries.iter().any(|e| e.is_duplicate));
    }

    #[tokio::test]
    async fn test_transform_number_and_allocation_drops() {
        let storage = MockStorage::new();
        let mut config = MockConfig::new("orders.txt");
        config.identity_mode = IdentityMode::NumberAndAllocation;
        let pipeline = pipeline(storage, config);

        let input = parse::parse_text("0200000000 5\n0200000000 5\n0200000000 10\n");
        let result = pipeline.transform(input).await.unwrap();

        assert_eq!(result.stats.kept, 2);
        assert_eq!(result.stats.duplicate, 1);
        assert_eq!(result.stats.total_gb, 15.0);
        assert!(result.kept.iter().all(|e| !e.is_duplicate));
    }

    #[tokio::test]
    async fn test_load_single_batch_writes_spreadsheet() {
        let storage = MockStorage::new();
        let pipeline = pipeline(storage.clone(), MockConfig::new("orders.txt"));

        let input = parse::parse_text("0554739033 5\n0244123456 2\n");
        let result = pipeline.transform(input).await.unwrap();
        assert_eq!(result.batches.len(), 1);

        let output = pipeline.load(result).await.unwrap();

        assert_eq!(output.files.len(), 1);
        assert_eq!(
            output.output_path,
            "test_output/data_bundles_20260401_120000.xlsx"
        );
        let written = storage
            .get_file("data_bundles_20260401_120000.xlsx")
            .await
            .unwrap();
        assert!(!written.is_empty());
    }

    #[tokio::test]
    async fn test_load_multiple_batches_writes_archive() {
        let storage = MockStorage::new();
        let pipeline = pipeline(storage.clone(), MockConfig::new("orders.txt"));

        let input = parse::parse_text("0200000001 8\n0200000002 8\n0200000003 4\n");
        let result = pipeline.transform(input).await.unwrap();
        assert_eq!(result.batches.len(), 3);

        let output = pipeline.load(result).await.unwrap();

        assert_eq!(output.files.len(), 3);
        assert_eq!(
            output.output_path,
            "test_output/data_bundles_split_20260401_120000.zip"
        );

        let archive_bytes = storage
            .get_file("data_bundles_split_20260401_120000.zip")
            .await
            .unwrap();
        let mut zip = zip::ZipArchive::new(std::io::Cursor::new(archive_bytes)).unwrap();
        assert_eq!(zip.len(), 3);
        assert!(zip
            .by_name("data_bundles_part1_of_3_20260401_120000.xlsx")
            .is_ok());
    }

    #[tokio::test]
    async fn test_load_empty_result_writes_nothing() {
        let storage = MockStorage::new();
        let pipeline = pipeline(storage.clone(), MockConfig::new("orders.txt"));

        let output = pipeline.load(TransformResult::default()).await.unwrap();

        assert!(output.files.is_empty());
        assert!(output.output_path.is_empty());
        assert!(storage.file_names().await.is_empty());
    }

    #[tokio::test]
    async fn test_pipeline_is_idempotent() {
        let storage = MockStorage::new();
        let pipeline = pipeline(storage.clone(), MockConfig::new("orders.txt"));

        let input = parse::parse_text("0200000001 8\n0200000002 8\n554739033 4\n12345 1\n");
        let first = pipeline.transform(input.clone()).await.unwrap();
        let second = pipeline.transform(input).await.unwrap();

        assert_eq!(first.kept, second.kept);
        assert_eq!(first.batches, second.batches);

        let first_files = pipeline.load(first).await.unwrap().files;
        let second_files = pipeline.load(second).await.unwrap().files;
        assert_eq!(first_files, second_files);
    }
}
