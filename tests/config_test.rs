//! 設定ファイルテスト
//!
//! 設定の保存・読み込みとAPIベースURLの決定順を検証

use dara_local_common::api::DEVELOPMENT_API_BASE;
use dara_local_rust::config::Config;
use tempfile::tempdir;

/// 設定ファイルが無ければ既定値
#[test]
fn test_load_missing_config() {
    let dir = tempdir().expect("Failed to create temp dir");
    let config = Config::load_from(&dir.path().join("config.json")).unwrap();

    assert_eq!(config.base_url, None);
    assert_eq!(config.default_user, None);
    assert_eq!(config.timeout_seconds, 60);
}

/// 保存と読み込み
#[test]
fn test_save_and_load() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("nested").join("config.json");

    let config = Config {
        base_url: Some("https://dara.example.org/api".to_string()),
        default_user: Some("kf".to_string()),
        timeout_seconds: 15,
    };
    config.save_to(&path).expect("設定保存失敗");

    let loaded = Config::load_from(&path).unwrap();
    assert_eq!(loaded.base_url.as_deref(), Some("https://dara.example.org/api"));
    assert_eq!(loaded.default_user.as_deref(), Some("kf"));
    assert_eq!(loaded.timeout_seconds, 15);
}

/// 欠けた項目は既定値で補う
#[test]
fn test_partial_config() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{"default_user":"kf"}"#).unwrap();

    let config = Config::load_from(&path).unwrap();
    assert_eq!(config.default_user.as_deref(), Some("kf"));
    assert_eq!(config.timeout_seconds, 60);
}

/// 壊れた設定ファイルはエラー
#[test]
fn test_broken_config() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("config.json");
    std::fs::write(&path, "{broken").unwrap();

    assert!(Config::load_from(&path).is_err());
}

/// コマンドライン > 環境変数 > 設定ファイル > 開発サーバー
#[test]
fn test_base_url_priority() {
    let config = Config {
        base_url: Some("http://file/api".to_string()),
        ..Default::default()
    };

    assert_eq!(
        config.resolve_base_url_with(Some("http://cli/api"), Some("http://env/api")),
        "http://cli/api"
    );
    assert_eq!(config.resolve_base_url_with(None, Some("http://env/api")), "http://env/api");
    assert_eq!(config.resolve_base_url_with(None, None), "http://file/api");
    assert_eq!(config.resolve_base_url_with(Some("  "), Some("")), "http://file/api");
    assert_eq!(
        Config::default().resolve_base_url_with(None, None),
        DEVELOPMENT_API_BASE
    );
}
