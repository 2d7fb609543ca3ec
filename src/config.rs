use crate::error::{DaraError, Result};
use dara_local_common::api::DEVELOPMENT_API_BASE;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// APIベースURLを上書きする環境変数
pub const BASE_URL_ENV: &str = "DARA_API_URL";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub base_url: Option<String>,
    pub default_user: Option<String>,
    /// 接続確立までの秒数（応答本体の受信には上限なし）
    pub timeout_seconds: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: None,
            default_user: None,
            timeout_seconds: 60,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| DaraError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("dara-local").join("config.json"))
    }

    /// APIベースURLを決める
    ///
    /// 優先順位: コマンドライン > 環境変数 > 設定ファイル > 開発サーバー
    pub fn resolve_base_url(&self, cli_override: Option<&str>) -> String {
        let env_value = std::env::var(BASE_URL_ENV).ok();
        self.resolve_base_url_with(cli_override, env_value.as_deref())
    }

    pub fn resolve_base_url_with(&self, cli_override: Option<&str>, env_value: Option<&str>) -> String {
        [cli_override, env_value, self.base_url.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|url| !url.is_empty())
            .unwrap_or(DEVELOPMENT_API_BASE)
            .to_string()
    }

    pub fn set_base_url(&mut self, url: String) -> Result<()> {
        let url = url.trim().to_string();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(DaraError::Config(format!(
                "base URL must start with http:// or https://: {}",
                url
            )));
        }
        self.base_url = Some(url);
        self.save()
    }

    pub fn set_default_user(&mut self, user: String) -> Result<()> {
        let user = user.trim().to_string();
        self.default_user = (!user.is_empty()).then_some(user);
        self.save()
    }
}
