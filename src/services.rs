//! 翻訳サービス
//!
//! バックエンドごとに `TService` を実装し、`ServiceKind` から選ぶ。

mod key_as_translation;
mod openai;
mod sync_without_translate;
mod types;

use std::collections::HashMap;

use async_trait::async_trait;

pub use key_as_translation::KeyAsTranslation;
pub use openai::OpenAiTranslator;
pub use sync_without_translate::SyncWithoutTranslate;
pub use types::{
    ServiceError,
    ServiceKind,
    ServiceSettings,
    TResult,
    TServiceArgs,
    TString,
};

use crate::annotation::AnnotationLookup;
use crate::engine::invocation::ServiceInvocation;
use crate::matchers::{
    MatcherKind,
    Replacer,
    protect_placeholders,
    restore_placeholders,
};
use crate::tset::TSet;

/// 翻訳バックエンド
///
/// 翻訳できなかったキーは結果から省いてよい（skipped として扱われる）。
#[async_trait]
pub trait TService: Send + Sync {
    /// 1 バッチ分の文字列を翻訳する
    async fn translate_strings(&self, args: &TServiceArgs) -> Result<Vec<TResult>, ServiceError>;
}

/// 設定からバックエンドを作成する
///
/// # Errors
/// 必要な認証情報がない場合
pub fn instantiate_service(settings: &ServiceSettings) -> Result<Box<dyn TService>, ServiceError> {
    tracing::debug!(service = settings.kind.name(), "Instantiating translation service");
    let service: Box<dyn TService> = match settings.kind {
        ServiceKind::OpenAi => Box::new(OpenAiTranslator::new(settings)?),
        ServiceKind::SyncWithoutTranslate => Box::new(SyncWithoutTranslate),
        ServiceKind::KeyAsTranslation => Box::new(KeyAsTranslation),
    };
    Ok(service)
}

/// `invoke_translation_service` の入力
#[derive(Debug, Clone, Copy)]
pub struct InvokeArgs<'a> {
    /// 翻訳対象のキーと原文
    pub inputs: &'a TSet,
    pub src_lng: &'a str,
    pub target_lng: &'a str,
    pub annotations: &'a AnnotationLookup,
    pub matcher: MatcherKind,
    pub prompt: &'a str,
}

/// バックエンドを 1 回呼び出し、入力と結果の組を返す
///
/// - 原文が null または空のキーは送信しない（入力には残るため skipped になる）
/// - プレースホルダーは送信前に保護し、受信後に戻す
/// - 依頼していないキーの結果は捨てる
///
/// # Errors
/// バックエンドがエラーを返した場合
pub async fn invoke_translation_service(
    service: &dyn TService,
    args: InvokeArgs<'_>,
) -> Result<ServiceInvocation, ServiceError> {
    let mut replacers: HashMap<&str, Vec<Replacer>> = HashMap::new();
    let mut strings = Vec::new();
    for (key, value) in args.inputs.iter() {
        let Some(value) = value.filter(|v| !v.is_empty()) else {
            continue;
        };
        let protected = protect_placeholders(value, args.matcher);
        let context = args
            .annotations
            .get(key)
            .map(|annotation| annotation.context.clone())
            .filter(|context| !context.is_empty());
        strings.push(TString { key: key.to_string(), value: protected.text, context });
        replacers.insert(key, protected.replacers);
    }

    if strings.is_empty() {
        tracing::debug!("No translatable strings in batch; skipping service call");
        return Ok(ServiceInvocation { inputs: args.inputs.clone(), results: TSet::new() });
    }

    tracing::debug!(
        count = strings.len(),
        src_lng = args.src_lng,
        target_lng = args.target_lng,
        "Invoking translation service"
    );
    let service_args = TServiceArgs {
        strings,
        src_lng: args.src_lng.to_string(),
        target_lng: args.target_lng.to_string(),
        prompt: args.prompt.to_string(),
    };
    let raw_results = service.translate_strings(&service_args).await?;

    let mut translated: HashMap<String, String> = HashMap::new();
    for result in raw_results {
        if replacers.contains_key(result.key.as_str()) {
            translated.insert(result.key, result.translated);
        } else {
            tracing::warn!("Ignoring result for unrequested key '{}'", result.key);
        }
    }

    let results: TSet = args
        .inputs
        .keys()
        .filter_map(|key| {
            let text = translated.get(key)?;
            let restored = replacers
                .get(key)
                .map_or_else(|| text.clone(), |r| restore_placeholders(text, r));
            Some((key.to_string(), Some(restored)))
        })
        .collect();

    Ok(ServiceInvocation { inputs: args.inputs.clone(), results })
}
