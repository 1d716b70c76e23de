//! Configuration loading: files, search locations and environment overrides.

mod support;

use std::fs;

use wikimap::config::{ConfigError, WikimapConfig};
use wikimap::i18n::Language;
use wikimap::sources::{FullSource, SourceFactory, SourceType};

use support::with_scoped_env;

fn env_with<'a>(
    overrides: &[(&'a str, Option<&'a str>)],
) -> Vec<(&'a str, Option<&'a str>)> {
    let mut changes: Vec<(&'a str, Option<&'a str>)> = support::clean_env();
    changes.extend_from_slice(overrides);
    changes
}

#[test]
fn load_reads_explicit_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wikimap.toml");
    fs::write(
        &path,
        r#"
[server]
port = 9090

[wiki]
language = "en"

[histogram]
bins = 12
"#,
    )
    .unwrap();
    let path_str = path.to_str().unwrap();

    let config = with_scoped_env(&env_with(&[("WIKIMAP_CONFIG", Some(path_str))]), || {
        WikimapConfig::load().unwrap()
    });

    assert_eq!(config.server.port, 9090);
    assert_eq!(config.wiki.language, Language::En);
    assert_eq!(config.histogram.bins, 12);
    assert_eq!(config.query.limit, 500);
}

#[test]
fn env_overrides_file_values() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wikimap.toml");
    fs::write(&path, "[server]\nport = 9090\n").unwrap();
    let path_str = path.to_str().unwrap();

    let config = with_scoped_env(
        &env_with(&[
            ("WIKIMAP_CONFIG", Some(path_str)),
            ("PORT", Some("7070")),
            ("WIKIMAP_LANGUAGE", Some("en")),
            ("WIKIMAP_API_URL", Some("http://wiki.test/w/api.php")),
        ]),
        || WikimapConfig::load().unwrap(),
    );

    assert_eq!(config.server.port, 7070);
    assert_eq!(config.wiki.language, Language::En);
    assert_eq!(config.wiki.resolved_api_url(), "http://wiki.test/w/api.php");
}

#[test]
fn invalid_env_values_are_rejected() {
    let err = with_scoped_env(&env_with(&[("PORT", Some("not-a-port"))]), || {
        let mut config = WikimapConfig::default();
        config.apply_env_overrides().unwrap_err()
    });
    assert!(matches!(err, ConfigError::Invalid { .. }));

    let err = with_scoped_env(&env_with(&[("WIKIMAP_LANGUAGE", Some("fr"))]), || {
        let mut config = WikimapConfig::default();
        config.apply_env_overrides().unwrap_err()
    });
    assert!(matches!(err, ConfigError::Invalid { .. }));
}

#[test]
fn missing_explicit_config_file_fails() {
    let result = with_scoped_env(
        &env_with(&[("WIKIMAP_CONFIG", Some("/nonexistent/wikimap.toml"))]),
        WikimapConfig::load,
    );
    assert!(matches!(result, Err(ConfigError::Read { .. })));
}

#[test]
fn source_type_from_env() {
    let kind = with_scoped_env(&env_with(&[("WIKIMAP_SOURCE", Some("local"))]), SourceType::from_env);
    assert_eq!(kind, SourceType::Local);

    let kind = with_scoped_env(&env_with(&[]), SourceType::from_env);
    assert_eq!(kind, SourceType::Wikipedia);
}

#[test]
fn local_source_from_env_fixture() {
    let dir = tempfile::tempdir().unwrap();
    let fixture = dir.path().join("berlin.json");
    fs::write(
        &fixture,
        r#"{"api_url": "https://de.wikipedia.org/w/api.php",
            "pages": [{"id": 6151, "title": "Brandenburger Tor", "lat": 52.516275, "lon": 13.377704, "views": 4096}]}"#,
    )
    .unwrap();
    let fixture_str = fixture.to_str().unwrap();
    let config_path = dir.path().join("wikimap.toml");
    fs::write(&config_path, "").unwrap();
    let config_str = config_path.to_str().unwrap();

    let config = with_scoped_env(
        &env_with(&[
            ("WIKIMAP_CONFIG", Some(config_str)),
            ("WIKIMAP_SOURCE", Some("local")),
            ("WIKIMAP_FIXTURE", Some(fixture_str)),
        ]),
        || WikimapConfig::load().unwrap(),
    );

    let source = SourceFactory::create(&config).unwrap();
    assert_eq!(source.kind(), "local");
}

#[test]
fn bundled_fixtures_load() {
    use wikimap::i18n::{DictionaryTranslator, Translator};
    use wikimap::sources::LocalSource;

    let root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"));

    let example = WikimapConfig::from_file(root.join("wikimap.example.toml")).unwrap();
    assert_eq!(example.histogram.bins, 20);

    let source = LocalSource::from_fixture_file(root.join("fixtures/berlin.json")).unwrap();
    assert_eq!(source.page_count(), 6);

    let dictionary = DictionaryTranslator::from_file(root.join("fixtures/dictionary.json")).unwrap();
    assert_eq!(dictionary.translate("zum Artikel", Language::En), "to the article");
    assert_eq!(dictionary.translate("zum Artikel", Language::De), "zum Artikel");
}
