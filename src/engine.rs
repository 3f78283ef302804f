//! 差分同期エンジン
//!
//! ソース・前回のターゲット・翻訳指示から、キーごとの扱い（翻訳・スキップ・
//! 原文コピー・代替ソースからの翻訳）を決め、新しいターゲットと変更内容を求める。

pub mod change_set;
pub mod error;
pub mod invocation;
pub mod orchestrator;
pub mod override_source;
pub mod routing;

pub use change_set::{
    ChangeSet,
    ChangeSetArgs,
    compute_change_set,
};
pub use error::CoreError;
pub use invocation::{
    InvocationBuilder,
    ServiceInvocation,
};
pub use orchestrator::{
    CoreArgs,
    CoreResults,
    translate_core,
};
pub use override_source::{
    FileOverrideSource,
    OverrideSource,
    override_source_path,
};
pub use routing::{
    ManualRoute,
    RoutedKeys,
    RoutingArgs,
    SourceOverrides,
    filter_manual_keys,
    route_key,
};
