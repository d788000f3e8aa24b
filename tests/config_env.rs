// tests/config_env.rs
// ScannerConfig::from_env against the real process environment.

use std::{env, fs, time::Duration};

use asymmetry_scanner::buzz::BuzzWeights;
use asymmetry_scanner::config::keywords::load_keywords_from;
use asymmetry_scanner::ScannerConfig;

const VARS: &[&str] = &[
    "SCANNER_KEYWORDS_PATH",
    "SCANNER_THRESHOLD",
    "SCANNER_WEIGHTS",
    "SCAN_CONCURRENCY",
    "SCAN_INTERVAL_SECS",
    "HTTP_TIMEOUT_SECS",
    "GROQ_API_KEY",
    "ORACLE_TEST_MODE",
    "DISCORD_WEBHOOK",
    "SERPAPI_KEY",
    "REDDIT_CLIENT_ID",
    "REDDIT_CLIENT_SECRET",
    "TWITTER_API_KEY",
    "TWITTER_API_SECRET",
    "TWITTER_ACCESS_TOKEN",
    "TWITTER_ACCESS_SECRET",
];

fn clear_env() {
    for v in VARS {
        env::remove_var(v);
    }
}

#[test]
fn keyword_files_trim_drop_empties_and_dedupe() {
    let dir = tempfile::tempdir().unwrap();

    let p_toml = dir.path().join("keywords.toml");
    fs::write(
        &p_toml,
        r#"
keywords = [" matcha ", "", "sauna", "matcha"]
"#,
    )
    .unwrap();
    assert_eq!(
        load_keywords_from(&p_toml).unwrap(),
        vec!["matcha".to_string(), "sauna".to_string()]
    );

    let p_json = dir.path().join("keywords.json");
    fs::write(&p_json, r#"["cold plunge", "  ", " sauna"]"#).unwrap();
    assert_eq!(
        load_keywords_from(&p_json).unwrap(),
        vec!["cold plunge".to_string(), "sauna".to_string()]
    );

    let p_empty = dir.path().join("empty.json");
    fs::write(&p_empty, r#"["", " "]"#).unwrap();
    assert!(load_keywords_from(&p_empty).is_err());
}

#[serial_test::serial]
#[test]
fn environment_overrides_defaults() {
    clear_env();
    let dir = tempfile::tempdir().unwrap();
    let p = dir.path().join("kw.json");
    fs::write(&p, r#"["matcha", "sauna"]"#).unwrap();

    env::set_var("SCANNER_KEYWORDS_PATH", &p);
    env::set_var("SCANNER_THRESHOLD", "8");
    env::set_var("SCANNER_WEIGHTS", "2,2,2");
    env::set_var("SCAN_CONCURRENCY", "4");
    env::set_var("SCAN_INTERVAL_SECS", "3600");
    env::set_var("HTTP_TIMEOUT_SECS", "3");
    env::set_var("ORACLE_TEST_MODE", "mock");
    env::set_var("DISCORD_WEBHOOK", "  ");

    let cfg = ScannerConfig::from_env().unwrap();
    clear_env();

    assert_eq!(cfg.keywords, vec!["matcha".to_string(), "sauna".to_string()]);
    assert_eq!(cfg.threshold, 8);
    assert_eq!(
        cfg.weights,
        BuzzWeights {
            web_search: 2,
            reddit: 2,
            social: 2
        }
    );
    assert_eq!(cfg.concurrency, 4);
    assert_eq!(cfg.interval, Some(Duration::from_secs(3600)));
    assert_eq!(cfg.sources.timeout, Duration::from_secs(3));
    assert_eq!(cfg.delivery.timeout, Duration::from_secs(3));
    assert!(cfg.oracle.test_mode);
    // Blank counts as unset.
    assert!(cfg.delivery.webhook_url.is_none());
}

#[serial_test::serial]
#[test]
fn malformed_values_are_rejected() {
    clear_env();
    env::set_var("SCANNER_THRESHOLD", "high");
    assert!(ScannerConfig::from_env().is_err());
    clear_env();

    env::set_var("SCAN_INTERVAL_SECS", "0");
    assert!(ScannerConfig::from_env().is_err());
    clear_env();

    env::set_var("SCANNER_KEYWORDS_PATH", "/definitely/not/here.toml");
    assert!(ScannerConfig::from_env().is_err());
    clear_env();
}

#[serial_test::serial]
#[tokio::test]
async fn mock_oracle_run_without_credentials_completes() {
    clear_env();
    let dir = tempfile::tempdir().unwrap();
    let p = dir.path().join("kw.toml");
    fs::write(&p, r#"keywords = ["matcha"]"#).unwrap();
    env::set_var("SCANNER_KEYWORDS_PATH", &p);
    env::set_var("ORACLE_TEST_MODE", "mock");

    let cfg = ScannerConfig::from_env().unwrap();
    clear_env();

    // Unconfigured sources short-circuit and the mock oracle stays below threshold.
    let report = asymmetry_scanner::run_once(&cfg).await;
    assert!(!report.has_signal());
    assert_eq!(report.lines().len(), 2);
}
