use async_trait::async_trait;

use super::{
    ServiceError,
    TResult,
    TService,
    TServiceArgs,
};

/// 原文をそのまま返す（キー集合の同期用）
#[derive(Debug, Clone, Copy, Default)]
pub struct SyncWithoutTranslate;

#[async_trait]
impl TService for SyncWithoutTranslate {
    async fn translate_strings(&self, args: &TServiceArgs) -> Result<Vec<TResult>, ServiceError> {
        Ok(args
            .strings
            .iter()
            .map(|s| TResult { key: s.key.clone(), translated: s.value.clone() })
            .collect())
    }
}
