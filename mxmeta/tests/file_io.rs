use std::path::{Path, PathBuf};

use rand::Rng;
use tempfile::{tempdir, TempDir};

use mxmeta::sidecar::{load_metadata, save_inferred, save_metadata};
use mxmeta::{
    infer_file, sidecar_path, InferConfig, InputCatalog, MatrixFormat, MatrixMetadata,
    MetaConfig, MetadataFile,
};

fn write_file(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

fn temp_files(dir: &Path) -> Vec<PathBuf> {
    std::fs::read_dir(dir)
        .unwrap()
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "tmp"))
        .collect()
}

fn random_metadata(rng: &mut impl Rng) -> MatrixMetadata {
    let mut meta = MatrixMetadata::new();
    if rng.gen_bool(0.5) {
        let tag = rng.gen_range(0..MatrixFormat::ALL.len());
        meta.set_matrix_format(Some(MatrixFormat::ALL[tag]));
    }
    meta.set_num_rows(rng.gen_bool(0.5).then(|| rng.gen()));
    meta.set_num_columns(rng.gen_bool(0.5).then(|| rng.gen()));
    meta.set_num_non_zeros(rng.gen_bool(0.5).then(|| rng.gen()));
    meta.set_num_rows_per_block(rng.gen_bool(0.5).then(|| rng.gen()));
    meta.set_num_columns_per_block(rng.gen_bool(0.5).then(|| rng.gen()));
    meta
}

#[test]
fn sidecar_and_record_preserve_every_field() {
    let dir = tempdir().unwrap();
    let mut rng = rand::thread_rng();

    for i in 0..32 {
        let meta = random_metadata(&mut rng);

        let data = dir.path().join(format!("m{i}.bin"));
        save_metadata(&data, &meta).unwrap();
        assert_eq!(load_metadata(&data).unwrap(), Some(meta));

        let decoded = MatrixMetadata::from_record_bytes(&meta.to_record_bytes()).unwrap();
        assert_eq!(decoded, meta);
    }
}

#[test]
fn missing_sidecar_is_none() {
    let dir = tempdir().unwrap();
    assert_eq!(load_metadata(dir.path().join("absent.csv")).unwrap(), None);
}

#[test]
fn write_leaves_no_temp_file() {
    let dir = tempdir().unwrap();
    let data = dir.path().join("x.csv");
    let path = save_metadata(&data, &MatrixMetadata::with_dimensions(2, 2)).unwrap();

    assert_eq!(path, sidecar_path(&data));
    assert!(path.exists());
    assert!(temp_files(dir.path()).is_empty());
}

#[test]
fn failed_write_leaves_no_temp_file() {
    let dir = tempdir().unwrap();
    let file = MetadataFile::from_metadata(&MatrixMetadata::with_dimensions(2, 2));

    // A non-empty directory in the way makes the final rename fail
    let blocked = dir.path().join("blocked.mtd");
    std::fs::create_dir(&blocked).unwrap();
    write_file(&dir, "blocked.mtd/keep", "");
    assert!(file.write(&blocked).is_err());
    assert!(temp_files(dir.path()).is_empty());

    let missing = dir.path().join("no-such-dir").join("m.mtd");
    assert!(file.write(&missing).is_err());
    assert!(!missing.exists());
    assert!(temp_files(dir.path()).is_empty());
}

#[test]
fn inferred_sidecar_records_csv_options() {
    let dir = tempdir().unwrap();
    let config = MetaConfig::default()
        .with_infer(InferConfig::default().with_header(true).with_delimiter(';'));

    let data = write_file(&dir, "h.csv", "a;b\n1;0\n2;3\n");
    let meta = infer_file(&data, MatrixFormat::Csv, &config).unwrap();
    let path = save_inferred(&data, &meta, &config.infer).unwrap();

    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(value["sep"], ";");
    assert_eq!(value["header"], true);
    assert_eq!(value["rows"], 2);
    assert_eq!(load_metadata(&data).unwrap(), Some(meta));
}

#[test]
fn infer_from_files() {
    let dir = tempdir().unwrap();
    let config = MetaConfig::default();

    let csv = write_file(&dir, "a.csv", "1,0,0\r\n0,2,0\r\n0,0,3\r\n0,0,0\r\n");
    let meta = infer_file(&csv, MatrixFormat::Csv, &config).unwrap();
    assert_eq!(meta.num_rows(), Some(4));
    assert_eq!(meta.num_columns(), Some(3));
    assert_eq!(meta.num_non_zeros(), Some(3));

    let ijv = write_file(&dir, "b.ijv", "1 1 1.0\n10 4 2.0\n");
    let meta = infer_file(&ijv, MatrixFormat::Ijv, &config).unwrap();
    assert_eq!(meta.num_rows(), Some(10));
    assert_eq!(meta.num_columns(), Some(4));
    assert_eq!(meta.num_non_zeros(), Some(2));

    let empty = write_file(&dir, "c.csv", "");
    let meta = infer_file(&empty, MatrixFormat::Csv, &config).unwrap();
    assert_eq!(meta.num_rows(), Some(0));

    assert!(infer_file(dir.path().join("nope.csv"), MatrixFormat::Csv, &config).is_err());
}

#[test]
fn catalog_prefers_sidecar_over_inference() {
    let dir = tempdir().unwrap();
    let mut catalog = InputCatalog::new(MetaConfig::default());

    let inferred = write_file(&dir, "x.csv", "1,2\n3,4\n");
    let meta = catalog.bind_file("X", &inferred, MatrixFormat::Csv).unwrap();
    assert_eq!(meta.num_rows(), Some(2));
    assert_eq!(meta.num_non_zeros(), Some(4));

    // The sidecar deliberately disagrees with the data
    let described = write_file(&dir, "y.csv", "1,2\n3,4\n");
    std::fs::write(
        sidecar_path(&described),
        r#"{"data_type": "matrix", "rows": 1000, "cols": 2}"#,
    )
    .unwrap();
    let meta = catalog.bind_file("Y", &described, MatrixFormat::Csv).unwrap();
    assert_eq!(meta.num_rows(), Some(1000));
    assert_eq!(meta.num_non_zeros(), None);
    assert_eq!(meta.matrix_format(), Some(MatrixFormat::Csv));

    assert_eq!(catalog.registry().len(), 2);
    assert_eq!(catalog.get("Y"), Some(&meta));
}

#[test]
fn config_file_round_trip() {
    let dir = tempdir().unwrap();
    let path = write_file(&dir, "config.json", r#"{"default_block_size": 2048, "validate_on_bind": true}"#);

    let config = MetaConfig::from_json_file(&path).unwrap();
    assert_eq!(config.default_block_size, 2048);
    assert!(config.validate_on_bind);

    let bad = write_file(&dir, "bad.json", r#"{"default_block_size": -5}"#);
    assert!(MetaConfig::from_json_file(&bad).is_err());
}

#[cfg(feature = "async")]
#[tokio::test]
async fn async_sidecar_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("z.csv.mtd");
    let file = MetadataFile::from_metadata(
        &MatrixMetadata::builder()
            .format(MatrixFormat::Csv)
            .rows(5)
            .columns(6)
            .non_zeros(7)
            .build(),
    )
    .with_csv_options(true, '\t');

    file.write_async(&path).await.unwrap();
    let read = MetadataFile::read_async(&path).await.unwrap();

    assert_eq!(read, file);
    assert_eq!(read.sep.as_deref(), Some("\t"));
    assert_eq!(MetadataFile::read(&path).unwrap(), file);
}
