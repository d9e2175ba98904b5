//! 求人票本文からの要件シグナル抽出。
//!
//! 採点の入力になるタグを正規表現で拾う。抽出できなかった項目は
//! `None` のままにし、採点側の中立スコアに委ねる（落とさない）。

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

// 必須要件行: "必須: 中学・高校の美術教員免許。"
static REQUIRED_LINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"必須\s*[:：]\s*([^\n]+)").unwrap());

// 免許・資格語: "〜免許" / "〜資格"
static LICENSE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\p{Han}\p{Hiragana}\p{Katakana}A-Za-z0-9・ー]+(?:免許|資格)").unwrap()
});

// コマ数: "週13コマ" / "週 13 コマ"
static WEEKLY_SLOTS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"週\s*(\d{1,2})\s*コマ").unwrap());

// 開始月: "11月から" / "11月開始" / "11月〜"
static START_MONTH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{1,2})\s*月\s*(?:から|〜|～|開始)").unwrap());

/// "必須:" 行に現れる免許・資格タグを出現順で返す（重複除去）。
pub fn extract_required_licenses(content: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut tags = Vec::new();

    for caps in REQUIRED_LINE_RE.captures_iter(content) {
        for found in LICENSE_RE.find_iter(&caps[1]) {
            let tag = found.as_str().to_string();
            if seen.insert(tag.clone()) {
                tags.push(tag);
            }
        }
    }

    tags
}

/// 週あたりのコマ数
pub fn extract_weekly_slots(content: &str) -> Option<u32> {
    WEEKLY_SLOTS_RE
        .captures(content)
        .and_then(|caps| caps[1].parse().ok())
}

/// 稼働開始月（1〜12のみ有効）
pub fn extract_start_month(content: &str) -> Option<u32> {
    START_MONTH_RE
        .captures(content)
        .and_then(|caps| caps[1].parse::<u32>().ok())
        .filter(|month| (1..=12).contains(month))
}

/// ラベル照合用の正規化: NFKC → 小文字化 → 空白除去。
/// 全角英数や表記ゆれの資格名を同一視するために使う。
pub fn normalize_label(label: &str) -> String {
    label
        .nfkc()
        .collect::<String>()
        .to_lowercase()
        .split_whitespace()
        .collect()
}
