//! 設定管理を行うモジュール

use std::path::Path;

use super::{
    ConfigError,
    RunConfig,
    SyncSettings,
    loader,
};

/// 設定管理を行う
///
/// 設定ファイルを読み込んだあと CLI の指定で上書きし、検証してから
/// 実行用の `RunConfig` を作る。
#[derive(Default, Debug, Clone)]
pub struct ConfigManager {
    /// 現在の設定
    current_settings: SyncSettings,
}

impl ConfigManager {
    /// 新しい設定マネージャーを作成
    #[must_use]
    pub fn new() -> Self {
        Self { current_settings: SyncSettings::default() }
    }

    /// 設定ファイルを読み込む
    ///
    /// `config_file` を指定した場合はそのファイルを、指定しない場合は
    /// `workspace_root` の `.locale-sync.json` を読む（なければ既定値）。
    /// 必須項目は CLI で補われることがあるため、ここでは検証しない。
    ///
    /// # Errors
    /// - ファイル読み込みエラー
    /// - JSON パースエラー
    pub fn load_settings(
        &mut self,
        workspace_root: &Path,
        config_file: Option<&Path>,
    ) -> Result<(), ConfigError> {
        let settings = match config_file {
            Some(path) => loader::load_from_file(path)?,
            None => loader::load_from_workspace(workspace_root)?.unwrap_or_default(),
        };

        self.current_settings = settings;
        tracing::debug!("Settings loaded: {:?}", self.current_settings);

        Ok(())
    }

    /// 設定を更新する
    ///
    /// # Errors
    /// - バリデーションエラー
    pub fn update_settings(&mut self, new_settings: SyncSettings) -> Result<(), ConfigError> {
        tracing::debug!("Updating settings...");

        new_settings.validate().map_err(ConfigError::ValidationErrors)?;

        self.current_settings = new_settings;
        tracing::debug!("Settings updated successfully");

        Ok(())
    }

    /// 現在の設定を取得
    #[must_use]
    pub const fn get_settings(&self) -> &SyncSettings {
        &self.current_settings
    }

    /// 検証して実行用の設定を作る
    ///
    /// # Errors
    /// - バリデーションエラー
    pub fn run_config(&self) -> Result<RunConfig, ConfigError> {
        self.current_settings.validate().map_err(ConfigError::ValidationErrors)?;
        Ok(self.current_settings.to_run_config())
    }
}
