use serde::{Deserialize, Serialize};

use crate::signals;

/// 求人票。1回のランキング実行につき1件。
///
/// `content` が一次情報で、残りは本文から導出した要件タグ。
/// タグ導出は任意であり、`opaque` で本文を不透明文字列のまま扱える。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Requisition {
    pub content: String,
    #[serde(default)]
    pub required_licenses: Vec<String>,
    #[serde(default)]
    pub weekly_slots: Option<u32>,
    #[serde(default)]
    pub start_month: Option<u32>,
}

impl Requisition {
    /// 本文から要件タグを導出して構築する。
    pub fn from_content(content: impl Into<String>) -> Self {
        let content = content.into();
        Self {
            required_licenses: signals::extract_required_licenses(&content),
            weekly_slots: signals::extract_weekly_slots(&content),
            start_month: signals::extract_start_month(&content),
            content,
        }
    }

    /// タグ導出なしで構築する（本文を不透明文字列として扱う）。
    pub fn opaque(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }
}
