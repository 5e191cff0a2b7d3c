use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

/// Helper function to run passenger-eda with the given stdin and extra flags
fn run_eda(stdin_text: &str, args: &[&str]) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_passenger-eda"))
        .args(args)
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn process");

    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(stdin_text.as_bytes())
            .expect("Failed to write to stdin");
    }

    child.wait_with_output().expect("Failed to wait for process")
}

fn stdout_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Fresh, empty directory for chart output
fn output_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("passenger-eda-it-{}-{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    dir
}

/// Check if bytes are a valid PNG
fn is_valid_png(bytes: &[u8]) -> bool {
    bytes.len() > 8 && bytes[0..8] == [137, 80, 78, 71, 13, 10, 26, 10]
}

fn chart_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .map(|entries| entries.filter_map(|e| e.ok()).map(|e| e.path()).collect())
        .unwrap_or_default();
    files.sort();
    files
}

#[test]
fn test_end_to_end_full_dataset() {
    let dir = output_dir("full");
    let output = run_eda(
        "test/titanic_sample.csv\n",
        &["--output-dir", dir.to_str().unwrap()],
    );
    assert!(output.status.success(), "Failed: {}", String::from_utf8_lossy(&output.stderr));

    let stdout = stdout_of(&output);
    assert!(stdout.contains("Loading dataset from '"));
    assert!(stdout.contains("Dataset loaded successfully!"));
    assert!(stdout.contains("Data columns (total 12 columns):"));
    assert!(stdout.contains("Data columns (total 10 columns):"));
    assert!(stdout.contains("--- Titanic EDA Completed Successfully ---"));
    assert!(!stdout.contains("Skipping"));

    let files = chart_files(&dir);
    let names: Vec<String> = files
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
        .collect();
    assert_eq!(
        names,
        vec![
            "01_survival_distribution.png",
            "02_passenger_class_distribution.png",
            "03_gender_distribution.png",
            "04_age_distribution.png",
            "05_fare_distribution.png",
            "06_embarked_port_distribution.png",
            "07_correlation_heatmap.png",
        ]
    );
    for file in &files {
        assert!(is_valid_png(&fs::read(file).unwrap()), "{} is not a PNG", file.display());
    }
}

#[test]
fn test_end_to_end_missing_value_report() {
    let dir = output_dir("missing");
    let output = run_eda("test/titanic_sample.csv\n", &["--output-dir", dir.to_str().unwrap()]);
    let stdout = stdout_of(&output);

    let missing = stdout
        .split("--- Missing Values ---")
        .nth(1)
        .and_then(|s| s.split("--- Cleaned Data Overview ---").next())
        .expect("missing values section");
    assert!(missing.lines().any(|l| l.starts_with("Age") && l.trim_end().ends_with(" 3")));
    assert!(missing.lines().any(|l| l.starts_with("Embarked") && l.trim_end().ends_with(" 1")));

    let cleaned = stdout.split("--- Cleaned Data Overview ---").nth(1).unwrap();
    assert!(!cleaned.contains("Cabin"));
    assert!(!cleaned.contains("Ticket"));
    assert!(cleaned.contains("21 non-null"));
}

#[test]
fn test_end_to_end_empty_input_exits_cleanly() {
    let output = run_eda("\n", &[]);
    assert!(output.status.success());
    let stdout = stdout_of(&output);
    assert!(stdout.contains("No file name or path provided. Exiting."));
    assert!(!stdout.contains("Loading dataset"));
}

#[test]
fn test_end_to_end_reprompts_for_missing_file() {
    let dir = output_dir("reprompt");
    let output = run_eda(
        "no_such_file.csv\ntest/titanic_sample.csv\n",
        &["--output-dir", dir.to_str().unwrap()],
    );
    assert!(output.status.success());
    let stdout = stdout_of(&output);
    assert!(stdout.contains("no_such_file.csv' not found. Please try again."));
    assert!(stdout.contains("--- Titanic EDA Completed Successfully ---"));
}

#[test]
fn test_end_to_end_malformed_csv() {
    let output = run_eda("test/malformed.csv\n", &[]);
    assert!(!output.status.success(), "Should have failed with load error");
    assert_eq!(output.status.code(), Some(1));
    let stdout = stdout_of(&output);
    assert!(stdout.contains("Error loading dataset"));
    assert!(!stdout.contains("Basic Information"));
}

#[test]
fn test_end_to_end_empty_csv() {
    let output = run_eda("test/empty.csv\n", &[]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout_of(&output).contains("Error loading dataset: "));
    assert!(stdout_of(&output).contains("No columns to parse from file"));
}

#[test]
fn test_end_to_end_header_only_csv() {
    let dir = output_dir("header-only");
    let output = run_eda("test/header_only.csv\n", &["--output-dir", dir.to_str().unwrap()]);
    assert!(output.status.success(), "Failed: {}", String::from_utf8_lossy(&output.stderr));

    let stdout = stdout_of(&output);
    assert!(stdout.contains("--- Titanic EDA Completed Successfully ---"));
    assert!(stdout.contains("Not enough numeric columns for correlation heatmap."));

    let names: Vec<String> = chart_files(&dir)
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
        .collect();
    assert_eq!(
        names,
        vec![
            "01_survival_distribution.png",
            "02_passenger_class_distribution.png",
            "03_gender_distribution.png",
            "04_age_distribution.png",
            "05_fare_distribution.png",
            "06_embarked_port_distribution.png",
        ]
    );
}

#[test]
fn test_end_to_end_no_numeric_columns() {
    let dir = output_dir("no-numeric");
    let output = run_eda("test/no_numeric.csv\n", &["--output-dir", dir.to_str().unwrap()]);
    assert!(output.status.success(), "Failed: {}", String::from_utf8_lossy(&output.stderr));

    let stdout = stdout_of(&output);
    assert!(stdout.contains("Column 'Survived' not found. Skipping survival distribution plot."));
    assert!(stdout.contains("Column 'Age' not found. Skipping age distribution plot."));
    assert!(stdout.contains("Not enough numeric columns for correlation heatmap."));

    let names: Vec<String> = chart_files(&dir)
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
        .collect();
    assert_eq!(names, vec!["01_gender_distribution.png", "02_embarked_port_distribution.png"]);
}

#[test]
fn test_end_to_end_attempt_limit() {
    let output = run_eda("a.csv\nb.csv\n", &["--max-attempts", "2"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("after 2 attempts"));
}

#[test]
fn test_end_to_end_svg_output() {
    let dir = output_dir("svg");
    let output = run_eda(
        "test/no_numeric.csv\n",
        &["--output-dir", dir.to_str().unwrap(), "--render-options", r#"{"type": "svg"}"#],
    );
    assert!(output.status.success(), "Failed: {}", String::from_utf8_lossy(&output.stderr));
    let files = chart_files(&dir);
    assert_eq!(files.len(), 2);
    for file in files {
        assert_eq!(file.extension().unwrap(), "svg");
        assert!(fs::read_to_string(&file).unwrap().contains("<svg"));
    }
}

#[test]
fn test_end_to_end_invalid_render_options() {
    let output = run_eda("\n", &["--render-options", "not json"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("render-options"));
}
