use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const EXPORT: &str = "\
Tanggal,No Faktur,Nama Supplier,Jenis Pembelian,Deadline,Nama Obat,Jumlah,Harga Beli,Nilai Total,Total Transaksi,Diskon,Pajak
03/04/2024,F-001,Acme,Hutang,03/05/2024,Paracetamol,2,\"Rp 18.767,50\",\"37.535,00\",\"Rp 60.035,00\",0%,11%
,,,,,Amoxicillin,1,\"22.500,00\",\"22.500,00\",,0%,11%
";

const BAD_PERCENT: &str = "\
Tanggal,No Faktur,Nama Supplier,Jenis Pembelian,Deadline,Jumlah,Harga Beli,Nilai Total,Total Transaksi,Diskon,Pajak
03/04/2024,F-001,Acme,Hutang,03/05/2024,1,1000,1000,1000,lima,11
";

fn write_fixture(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

/// A `faktur` command isolated from the user's configuration directory.
fn faktur(config_home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("faktur").unwrap();
    cmd.env("XDG_CONFIG_HOME", config_home.path())
        .env("HOME", config_home.path());
    cmd
}

#[test]
fn test_clean_to_stdout() {
    let dir = TempDir::new().unwrap();
    let input = write_fixture(dir.path(), "pembelian.csv", EXPORT);

    faktur(&dir)
        .arg("clean")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "2024-04-03,F-001,Acme,Hutang,2024-05-03,Paracetamol,2,\"18767,5\",37535,60035,0,11",
        ))
        .stdout(predicate::str::contains(
            "2024-04-03,F-001,Acme,Hutang,2024-05-03,Amoxicillin,1,22500,22500,,0,11",
        ));
}

#[test]
fn test_clean_json_to_file() {
    let dir = TempDir::new().unwrap();
    let input = write_fixture(dir.path(), "pembelian.csv", EXPORT);
    let output = dir.path().join("bersih.json");

    faktur(&dir)
        .args(["clean", "-f", "json", "-o"])
        .arg(&output)
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("Cleaned 2 rows"));

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    let rows = json.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1]["Nama Supplier"], "Acme");
    assert_eq!(rows[1]["Tanggal"], "2024-04-03");
    assert_eq!(rows[0]["Jumlah"], 2);
    assert!(rows[1]["Total Transaksi"].is_null());
}

#[test]
fn test_clean_missing_input() {
    let dir = TempDir::new().unwrap();

    faktur(&dir)
        .args(["clean", "does-not-exist.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn test_clean_missing_columns() {
    let dir = TempDir::new().unwrap();
    let input = write_fixture(dir.path(), "partial.csv", "Tanggal,No Faktur\n01/01/2024,F-1\n");

    faktur(&dir)
        .arg("clean")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing required column(s)"))
        .stderr(predicate::str::contains("Nama Supplier"));
}

#[test]
fn test_clean_unparseable_percent_fails() {
    let dir = TempDir::new().unwrap();
    let input = write_fixture(dir.path(), "bad.csv", BAD_PERCENT);

    faktur(&dir)
        .arg("clean")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Diskon"))
        .stderr(predicate::str::contains("lima"));
}

#[test]
fn test_report_suppliers_text() {
    let dir = TempDir::new().unwrap();
    let input = write_fixture(dir.path(), "pembelian.csv", EXPORT);

    faktur(&dir)
        .arg("report")
        .arg(&input)
        .arg("suppliers")
        .assert()
        .success()
        .stdout(predicate::str::contains("Acme"))
        .stdout(predicate::str::contains("Rp 60.035"));
}

#[test]
fn test_report_payment_types_csv() {
    let dir = TempDir::new().unwrap();
    let input = write_fixture(dir.path(), "pembelian.csv", EXPORT);

    faktur(&dir)
        .arg("report")
        .arg(&input)
        .args(["payment-types", "-f", "csv"])
        .assert()
        .success()
        .stdout("kind,count,percent\nHUTANG,2,100\n");
}

#[test]
fn test_report_all_json() {
    let dir = TempDir::new().unwrap();
    let input = write_fixture(dir.path(), "pembelian.csv", EXPORT);

    let output = faktur(&dir)
        .arg("report")
        .arg(&input)
        .args(["all", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    for view in [
        "suppliers",
        "liability-age",
        "monthly",
        "payment-types",
        "anomalies",
        "reconciliation",
        "trend",
    ] {
        assert!(json.get(view).is_some(), "missing view {view}");
    }
    assert_eq!(json["trend"][0]["month"], "2024-04");
    assert_eq!(json["trend"][0]["total"], 60035.0);
    assert_eq!(json["liability-age"]["mean_days"], 30.0);
}

#[test]
fn test_batch_with_summary() {
    let dir = TempDir::new().unwrap();
    let inputs = dir.path().join("in");
    fs::create_dir(&inputs).unwrap();
    write_fixture(&inputs, "a.csv", EXPORT);
    write_fixture(&inputs, "b.csv", BAD_PERCENT);
    write_fixture(&inputs, "notes.txt", "not an export");
    let out = dir.path().join("out");

    faktur(&dir)
        .arg("batch")
        .arg(inputs.join("*").to_string_lossy().as_ref())
        .arg("-o")
        .arg(&out)
        .args(["--summary", "--continue-on-error"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 2 files"))
        .stdout(predicate::str::contains("b.csv"));

    assert!(out.join("a.clean.csv").exists());
    assert!(!out.join("b.clean.csv").exists());

    let summary = fs::read_to_string(out.join("summary.csv")).unwrap();
    let lines: Vec<&str> = summary.lines().collect();
    assert_eq!(lines[0], "filename,status,rows,processing_time_ms,error");
    assert!(lines[1].starts_with("a.csv,success,2,"));
    assert!(lines[2].starts_with("b.csv,error,,"));
}

#[test]
fn test_batch_stops_on_first_error() {
    let dir = TempDir::new().unwrap();
    write_fixture(dir.path(), "bad.csv", BAD_PERCENT);

    faktur(&dir)
        .arg("batch")
        .arg(dir.path().join("*.csv").to_string_lossy().as_ref())
        .assert()
        .failure()
        .stderr(predicate::str::contains("bad.csv"));
}

#[test]
fn test_config_set_and_get() {
    let dir = TempDir::new().unwrap();

    faktur(&dir)
        .args(["config", "set", "report.max_tax_percent", "11"])
        .assert()
        .success();

    faktur(&dir)
        .args(["config", "get", "report.max_tax_percent"])
        .assert()
        .success()
        .stdout(predicate::str::contains("11"));

    faktur(&dir)
        .args(["config", "get", "report.unknown"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration key not found"));
}

#[test]
fn test_config_init_refuses_overwrite() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("faktur.json");

    faktur(&dir)
        .args(["config", "init", "-o"])
        .arg(&path)
        .assert()
        .success();

    faktur(&dir)
        .args(["config", "init", "-o"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));
}

#[test]
fn test_explicit_config_changes_delimiter() {
    let dir = TempDir::new().unwrap();
    let config = write_fixture(dir.path(), "faktur.json", r#"{"input": {"delimiter": ";"}}"#);
    let export = "\
Tanggal;No Faktur;Nama Supplier;Jenis Pembelian;Deadline;Jumlah;Harga Beli;Nilai Total;Total Transaksi;Diskon;Pajak
3 Januari 2024;F-9;Beta;Tunai;2024-01-10;3;1.000,00;3.000,00;3.000,00;0;0
";
    let input = write_fixture(dir.path(), "titik-koma.csv", export);

    faktur(&dir)
        .arg("-c")
        .arg(&config)
        .arg("clean")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("2024-01-03,F-9,Beta,Tunai,2024-01-10,3,1000,3000,3000,0,0"));
}

#[test]
fn test_report_on_cleaned_file_keeps_fractional_discount() {
    let dir = TempDir::new().unwrap();
    let export = "\
Tanggal,No Faktur,Nama Supplier,Jenis Pembelian,Deadline,Jumlah,Harga Beli,Nilai Total,Total Transaksi,Diskon,Pajak
03/04/2024,F-001,Acme,Hutang,03/05/2024,1,1000,975,975,\"2,5%\",0
";
    let input = write_fixture(dir.path(), "pembelian.csv", export);
    let cleaned = dir.path().join("bersih.csv");

    faktur(&dir)
        .arg("clean")
        .arg(&input)
        .arg("-o")
        .arg(&cleaned)
        .assert()
        .success();

    let output = faktur(&dir)
        .arg("report")
        .arg(&cleaned)
        .args(["reconciliation", "-f", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["lines"][0]["discount_percent"], 2.5);
    assert_eq!(json["lines"][0]["difference"], 0.0);
}
