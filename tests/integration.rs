use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn tgta_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_tgta"))
}

/// Config that never touches the network: summaries disabled and the
/// weather/exchange APIs pointed at a closed local port.
fn offline_config(extra: &str) -> String {
    format!(
        r#"[summary]
provider = "disabled"

[weather]
base_url = "http://127.0.0.1:9"
timeout_secs = 1

[exchange]
base_url = "http://127.0.0.1:9"
timeout_secs = 1

{}
"#,
        extra
    )
}

fn setup_test_env(extra: &str) -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let config_dir = tmp.path().join("config");
    fs::create_dir_all(&config_dir).unwrap();

    let config_path = config_dir.join("tgta.toml");
    fs::write(&config_path, offline_config(extra)).unwrap();

    (tmp, config_path)
}

fn run_tgta(config_path: &Path, args: &[&str]) -> (String, String, bool) {
    let binary = tgta_binary();
    let output = Command::new(&binary)
        .arg("--config")
        .arg(config_path.to_str().unwrap())
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("Failed to run tgta binary at {:?}: {}", binary, e));

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

#[test]
fn test_ask_exact_topic() {
    let (_tmp, config_path) = setup_test_env("");

    let (stdout, stderr, success) = run_tgta(&config_path, &["ask", "visa"]);
    assert!(success, "ask failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("# Visa"));
    assert!(stdout.contains("visa on arrival"));
    assert!(stdout.contains("Related questions:"));
    assert!(stdout.contains("Tourism Levy (tourism_levy)"));
}

#[test]
fn test_ask_partial_match() {
    let (_tmp, config_path) = setup_test_env("");

    let (stdout, _, success) = run_tgta(&config_path, &["ask", "Do I need a visa to visit?"]);
    assert!(success);
    assert!(stdout.contains("Visa Requirements"));
}

#[test]
fn test_ask_empty_shows_examples() {
    let (_tmp, config_path) = setup_test_env("");

    let (stdout, _, success) = run_tgta(&config_path, &["ask", "   "]);
    assert!(success);
    assert!(stdout.contains("Try asking about:"));
    assert!(stdout.contains("visa requirements"));
}

#[test]
fn test_ask_nonsense_not_found() {
    let (_tmp, config_path) = setup_test_env("");

    let (stdout, _, success) = run_tgta(&config_path, &["ask", "xyznonsense"]);
    assert!(success, "no-answer must not be a failure");
    assert!(stdout.contains("I couldn't find specific information about 'xyznonsense'."));
    assert!(stdout.contains("Try asking about:"));
}

#[test]
fn test_resolve_kunta_kinteh() {
    let (_tmp, config_path) = setup_test_env("");

    let (stdout, _, success) = run_tgta(&config_path, &["resolve", "  Kunta Kinteh "]);
    assert!(success);
    assert!(stdout.contains("query:      kunta kinteh"));
    assert!(stdout.contains("topic:      kunta_kinteh"));
    assert!(stdout.contains("confidence: 1.00"));

    let (stdout, _, success) = run_tgta(&config_path, &["related", "kunta_kinteh"]);
    assert!(success);
    let lines: Vec<&str> = stdout.lines().collect();
    assert!(!lines.is_empty() && lines.len() <= 5);
    assert_eq!(lines[0], "things_to_do");
}

#[test]
fn test_resolve_no_match() {
    let (_tmp, config_path) = setup_test_env("");

    let (stdout, _, success) = run_tgta(&config_path, &["resolve", "xyznonsense"]);
    assert!(success);
    assert!(stdout.contains("(no match)"));
}

#[test]
fn test_related_unknown_topic_is_empty() {
    let (_tmp, config_path) = setup_test_env("");

    let (stdout, _, success) = run_tgta(&config_path, &["related", "no_such_topic"]);
    assert!(success);
    assert!(stdout.contains("No related topics."));
}

#[test]
fn test_guide() {
    let (_tmp, config_path) = setup_test_env("");

    let (stdout, _, success) = run_tgta(&config_path, &["guide", "money"]);
    assert!(success);
    assert!(stdout.contains("Gambian Dalasi"));

    let (_, stderr, success) = run_tgta(&config_path, &["guide", "no_such_topic"]);
    assert!(!success);
    assert!(stderr.contains("topic not found"));
}

#[test]
fn test_custom_topics_file() {
    let tmp = TempDir::new().unwrap();
    let topics_path = tmp.path().join("topics.toml");
    fs::write(
        &topics_path,
        r#"
[[topics]]
id = "birding"
triggers = ["birds", "bird watching"]
answer = "Over 540 species."
related = ["abuko"]

[[topics]]
id = "abuko"
triggers = ["abuko"]
answer = "Abuko Nature Reserve."
"#,
    )
    .unwrap();

    let config_path = tmp.path().join("tgta.toml");
    fs::write(
        &config_path,
        offline_config(&format!(
            "[knowledge]\ntopics_path = \"{}\"\n",
            topics_path.display()
        )),
    )
    .unwrap();

    let (stdout, _, success) = run_tgta(&config_path, &["topics"]);
    assert!(success);
    assert!(stdout.contains("birding"));
    assert!(stdout.contains("bird watching"));
    assert!(!stdout.contains("visa"));

    let (stdout, _, success) = run_tgta(&config_path, &["ask", "BIRDS"]);
    assert!(success);
    assert!(stdout.contains("Over 540 species."));
    assert!(stdout.contains("Abuko (abuko)"));
}

#[test]
fn test_broken_topics_file_degrades_to_empty() {
    let tmp = TempDir::new().unwrap();
    let topics_path = tmp.path().join("topics.toml");
    fs::write(&topics_path, "this is [ not toml").unwrap();

    let config_path = tmp.path().join("tgta.toml");
    fs::write(
        &config_path,
        offline_config(&format!(
            "[knowledge]\ntopics_path = \"{}\"\n",
            topics_path.display()
        )),
    )
    .unwrap();

    let (stdout, _, success) = run_tgta(&config_path, &["topics"]);
    assert!(success, "a broken topics file must not stop the process");
    assert!(stdout.contains("No topics loaded."));

    let (stdout, _, success) = run_tgta(&config_path, &["resolve", "visa"]);
    assert!(success);
    assert!(stdout.contains("(no match)"));
}

#[test]
fn test_knowledge_disabled_uses_null_resolver() {
    let (_tmp, config_path) = setup_test_env("[knowledge]\nenabled = false\n");

    let (stdout, _, success) = run_tgta(&config_path, &["resolve", "visa"]);
    assert!(success);
    assert!(stdout.contains("(no match)"));
}

#[test]
fn test_invalid_config_fails() {
    let (_tmp, config_path) = setup_test_env("[retrieval]\nusable_confidence = 2.0\n");

    let (_, stderr, success) = run_tgta(&config_path, &["topics"]);
    assert!(!success);
    assert!(stderr.contains("usable_confidence"));
}

#[test]
fn test_explicit_missing_config_fails() {
    let tmp = TempDir::new().unwrap();
    let missing = tmp.path().join("nope.toml");

    let (_, stderr, success) = run_tgta(&missing, &["topics"]);
    assert!(!success);
    assert!(stderr.contains("Failed to read config file"));
}

#[test]
fn test_weather_and_rates_offline_fallback() {
    let (_tmp, config_path) = setup_test_env("");

    let (stdout, _, success) = run_tgta(&config_path, &["weather"]);
    assert!(success);
    assert!(stdout.contains("28.0°C"));
    assert!(stdout.contains("typical values"));

    let (stdout, _, success) = run_tgta(&config_path, &["rates"]);
    assert!(success);
    assert!(stdout.contains("1 EUR (€) = 70.00 GMD"));
    assert!(stdout.contains("typical values"));
}

fn run_tgta_in(dir: &Path, args: &[&str]) -> (String, String, bool) {
    let output = Command::new(tgta_binary())
        .current_dir(dir)
        .args(args)
        .output()
        .unwrap();
    (
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
        output.status.success(),
    )
}

#[test]
fn test_no_config_flag_uses_defaults() {
    let tmp = TempDir::new().unwrap();

    let (stdout, stderr, success) = run_tgta_in(tmp.path(), &["topics"]);
    assert!(success, "stderr={}", stderr);
    assert!(stdout.contains("visa"));
}

#[test]
fn test_explicit_default_path_missing_fails() {
    let tmp = TempDir::new().unwrap();

    let (_, stderr, success) =
        run_tgta_in(tmp.path(), &["--config", "./config/tgta.toml", "topics"]);
    assert!(!success);
    assert!(stderr.contains("Failed to read config file"));
}
