use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::error::RankError;
use crate::requisition::Requisition;
use crate::scoring::{ScoredCandidate, WeightConfig};

/// ランキング1回分のスナップショット。作成後は変更しない。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedResult {
    /// 実行ID（ULID、時刻順にソート可能）
    pub run_id: String,
    pub requisition: Requisition,
    pub weights: WeightConfig,
    /// 合成スコア降順、長さ ≤ top_k
    pub candidates: Vec<ScoredCandidate>,
    pub ranked_at: DateTime<Utc>,
}

impl RankedResult {
    pub fn new(
        requisition: Requisition,
        weights: WeightConfig,
        candidates: Vec<ScoredCandidate>,
    ) -> Self {
        Self {
            run_id: Ulid::new().to_string(),
            requisition,
            weights,
            candidates,
            ranked_at: Utc::now(),
        }
    }
}

/// 合成スコア降順に並べ、top_k 件に切り詰める。
///
/// 同点は cv_id の辞書順昇順で安定化する。top_k が候補者数を超える場合は
/// 全件を返す（パディングもエラーもしない）。
pub fn rank(
    mut scored: Vec<ScoredCandidate>,
    top_k: usize,
) -> Result<Vec<ScoredCandidate>, RankError> {
    if top_k == 0 {
        return Err(RankError::InvalidTopK(0));
    }

    scored.sort_by(|a, b| {
        match b
            .combined
            .partial_cmp(&a.combined)
            .unwrap_or(Ordering::Equal)
        {
            Ordering::Equal => a.cv_id.cmp(&b.cv_id),
            other => other,
        }
    });
    scored.truncate(top_k);

    Ok(scored)
}
