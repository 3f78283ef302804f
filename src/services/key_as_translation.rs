use async_trait::async_trait;

use super::{
    ServiceError,
    TResult,
    TService,
    TServiceArgs,
};

/// キーそのものを訳文として返す
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyAsTranslation;

#[async_trait]
impl TService for KeyAsTranslation {
    async fn translate_strings(&self, args: &TServiceArgs) -> Result<Vec<TResult>, ServiceError> {
        Ok(args
            .strings
            .iter()
            .map(|s| TResult { key: s.key.clone(), translated: s.key.clone() })
            .collect())
    }
}
