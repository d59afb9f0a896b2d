//! Integration tests for the `facturas` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const SAMPLE: &str = "Factura FAC-001 por $ 1.200,50 y\n\nFactura FAC-002 por $ 300,00 USD 10,00";

const SAMPLE_CSV: &str = "Factura,Importe_ARS,Importe_USD\n\
                          FAC-001,1200.50,10.00\n\
                          FAC-002,300.00,0\n\
                          TOTAL GENERAL,1500.50,10.00\n";

/// CLI command isolated from the user's config directory.
fn cli(home: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_facturas"));
    cmd.env("XDG_CONFIG_HOME", home.join(".config"))
        .env("HOME", home)
        .env_remove("TESSERACT_CMD")
        .current_dir(home);
    cmd
}

fn write_sample(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_process_text_to_csv_stdout() {
    let dir = TempDir::new().unwrap();
    let input = write_sample(dir.path(), "factura.txt", SAMPLE);

    cli(dir.path())
        .arg("process")
        .arg(&input)
        .args(["-f", "csv"])
        .assert()
        .success()
        .stdout(SAMPLE_CSV);
}

#[test]
fn test_process_text_to_json_file() {
    let dir = TempDir::new().unwrap();
    let input = write_sample(dir.path(), "factura.txt", SAMPLE);
    let output = dir.path().join("out.json");

    cli(dir.path())
        .arg("process")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .assert()
        .success()
        .stderr(predicate::str::contains("2 rows written"));

    let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    let records = value.as_array().unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(records[1]["Factura"], "FAC-002");
    assert_eq!(records[2]["Factura"], "TOTAL GENERAL");
    assert_eq!(records[2]["Importe_ARS"], 1500.5);
}

#[test]
fn test_process_text_preview() {
    let dir = TempDir::new().unwrap();
    let input = write_sample(dir.path(), "factura.txt", SAMPLE);

    cli(dir.path())
        .arg("process")
        .arg(&input)
        .args(["-f", "text"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Importe_ARS"))
        .stdout(predicate::str::contains("1.200,50"))
        .stdout(predicate::str::contains("TOTAL GENERAL"))
        .stdout(predicate::str::contains("1.500,50"));
}

#[test]
fn test_process_html_preview() {
    let dir = TempDir::new().unwrap();
    let input = write_sample(dir.path(), "factura.txt", SAMPLE);

    cli(dir.path())
        .arg("process")
        .arg(&input)
        .args(["-f", "html"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("<table"))
        .stdout(predicate::str::contains("<td>FAC-001</td>"));
}

#[test]
fn test_process_xlsx_defaults_to_resultado() {
    let dir = TempDir::new().unwrap();
    let input = write_sample(dir.path(), "factura.txt", SAMPLE);

    cli(dir.path()).arg("process").arg(&input).assert().success();

    let bytes = fs::read(dir.path().join("resultado.xlsx")).unwrap();
    assert_eq!(&bytes[..2], b"PK");
}

#[test]
fn test_process_empty_text_has_total_row_only() {
    let dir = TempDir::new().unwrap();
    let input = write_sample(dir.path(), "vacia.txt", "");

    cli(dir.path())
        .arg("process")
        .arg(&input)
        .args(["-f", "csv"])
        .assert()
        .success()
        .stdout("Factura,Importe_ARS,Importe_USD\nTOTAL GENERAL,0,0\n");
}

#[test]
fn test_process_unsupported_output_extension() {
    let dir = TempDir::new().unwrap();
    let input = write_sample(dir.path(), "factura.txt", SAMPLE);

    cli(dir.path())
        .arg("process")
        .arg(&input)
        .arg("-o")
        .arg(dir.path().join("out.pdf"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported export format: pdf"));
}

#[test]
fn test_process_missing_input() {
    let dir = TempDir::new().unwrap();

    cli(dir.path())
        .args(["process", "no-existe.txt", "-f", "csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn test_process_unsupported_input() {
    let dir = TempDir::new().unwrap();
    let input = write_sample(dir.path(), "factura.docx", SAMPLE);

    cli(dir.path())
        .arg("process")
        .arg(&input)
        .args(["-f", "csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported file format: docx"));
}

#[test]
fn test_process_uses_config_file() {
    let dir = TempDir::new().unwrap();
    let input = write_sample(dir.path(), "factura.txt", "FAC-1 EUR 5,00");
    let config = write_sample(
        dir.path(),
        "config.json",
        r#"{"extraction": {"currencies": [{"code": "EUR", "markers": ["EUR"]}]}}"#,
    );

    cli(dir.path())
        .arg("-c")
        .arg(&config)
        .arg("process")
        .arg(&input)
        .args(["-f", "csv"])
        .assert()
        .success()
        .stdout("Factura,Importe_EUR\nFAC-1,5.00\nTOTAL GENERAL,5.00\n");
}

#[test]
fn test_batch_with_summary() {
    let dir = TempDir::new().unwrap();
    let inputs = dir.path().join("in");
    let outputs = dir.path().join("out");
    fs::create_dir_all(&inputs).unwrap();
    write_sample(&inputs, "a.txt", SAMPLE);
    write_sample(&inputs, "b.txt", "FAC-9 USD 1,00");

    cli(dir.path())
        .arg("batch")
        .arg(format!("{}/*.txt", inputs.display()))
        .arg("-d")
        .arg(&outputs)
        .args(["-f", "csv", "-j", "2", "--summary"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Found 2 files"))
        .stderr(predicate::str::contains("2 successful"));

    assert_eq!(fs::read_to_string(outputs.join("a.csv")).unwrap(), SAMPLE_CSV);
    assert_eq!(
        fs::read_to_string(outputs.join("b.csv")).unwrap(),
        "Factura,Importe_ARS,Importe_USD\nFAC-9,0,1.00\nTOTAL GENERAL,0,1.00\n"
    );

    let summary = fs::read_to_string(outputs.join("summary.csv")).unwrap();
    let lines: Vec<&str> = summary.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("file,status,rows,Total_ARS,Total_USD,"));
    assert!(lines[1].starts_with("a.txt,success,2,1500.50,10.00,"));
    assert!(lines[2].starts_with("b.txt,success,1,0,1.00,"));
}

#[test]
fn test_batch_same_stem_outputs_do_not_collide() {
    let dir = TempDir::new().unwrap();
    let outputs = dir.path().join("out");
    for (sub, content) in [("uno", "FAC-1 $ 1,00"), ("dos", "FAC-2 $ 2,00")] {
        let inputs = dir.path().join(sub);
        fs::create_dir_all(&inputs).unwrap();
        write_sample(&inputs, "factura.txt", content);
    }

    cli(dir.path())
        .arg("batch")
        .arg(format!("{}/*/factura.txt", dir.path().display()))
        .arg("-d")
        .arg(&outputs)
        .args(["-f", "csv"])
        .assert()
        .success();

    // glob yields dos/ before uno/
    let first = fs::read_to_string(outputs.join("factura.csv")).unwrap();
    let second = fs::read_to_string(outputs.join("factura.txt.csv")).unwrap();
    assert!(first.contains("FAC-2,2.00"));
    assert!(second.contains("FAC-1,1.00"));
}

#[test]
fn test_batch_no_matches() {
    let dir = TempDir::new().unwrap();

    cli(dir.path())
        .arg("batch")
        .arg(format!("{}/*.pdf", dir.path().display()))
        .assert()
        .failure()
        .stderr(predicate::str::contains("No matching files found"));
}

#[test]
fn test_config_init_get_set() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("facturas.json");

    cli(dir.path())
        .arg("-c")
        .arg(&config)
        .args(["config", "init"])
        .assert()
        .success();
    assert!(config.exists());

    cli(dir.path())
        .arg("-c")
        .arg(&config)
        .args(["config", "set", "ocr.language", "eng"])
        .assert()
        .success();

    cli(dir.path())
        .arg("-c")
        .arg(&config)
        .args(["config", "get", "ocr.language"])
        .assert()
        .success()
        .stdout("\"eng\"\n");
}

#[test]
fn test_config_set_rejects_invalid_values() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("facturas.json");

    cli(dir.path())
        .arg("-c")
        .arg(&config)
        .args(["config", "set", "export.default_format", "pdf"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported export format: pdf"));

    cli(dir.path())
        .arg("-c")
        .arg(&config)
        .args(["config", "set", "ocr.no_such_key", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration key not found"));

    assert!(!config.exists());
}

#[test]
fn test_config_path_default_location() {
    let dir = TempDir::new().unwrap();

    cli(dir.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("facturas"))
        .stdout(predicate::str::contains("not created"));
}
