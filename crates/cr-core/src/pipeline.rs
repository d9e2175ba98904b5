use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::RankError;
use crate::extract::ProfileExtractor;
use crate::rank::{rank, RankedResult};
use crate::requisition::Requisition;
use crate::scoring::{FactorScorer, ScoreEngine, WeightConfig};
use crate::table::TableRow;
use crate::CandidateProfile;

/// ランキング実行の設定。プロセス静的な既定値ではなく明示的に渡す。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankingConfig {
    pub weights: WeightConfig,
    pub top_k: usize,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            weights: WeightConfig::default(),
            top_k: 1,
        }
    }
}

/// 1回のランキング実行を束ねるエンジン。
/// `(profiles, requisition, weights, top_k)` の純関数で、実行間に共有状態を持たない。
pub struct RankingEngine {
    scorer: ScoreEngine,
    top_k: usize,
}

impl RankingEngine {
    pub fn new(config: RankingConfig) -> Result<Self, RankError> {
        Ok(Self {
            scorer: ScoreEngine::new(config.weights)?,
            top_k: config.top_k,
        })
    }

    /// hours / reliability / competency の採点戦略を差し替えて構築する。
    pub fn with_scorers(
        config: RankingConfig,
        hours: Box<dyn FactorScorer>,
        reliability: Box<dyn FactorScorer>,
        competency: Box<dyn FactorScorer>,
    ) -> Result<Self, RankError> {
        Ok(Self {
            scorer: ScoreEngine::with_scorers(config.weights, hours, reliability, competency)?,
            top_k: config.top_k,
        })
    }

    /// ランキングを1回実行する。
    ///
    /// 完全な `RankedResult` を返すか、単一のエラーで失敗するかのどちらか。
    /// 部分的な結果は返さない。
    pub fn run(
        &self,
        profiles: &[CandidateProfile],
        requisition: &Requisition,
    ) -> Result<RankedResult, RankError> {
        if self.top_k == 0 {
            return Err(RankError::InvalidTopK(0));
        }

        let scored: Vec<_> = profiles
            .iter()
            .map(|profile| self.scorer.score(profile, requisition))
            .collect();
        let ranked = rank(scored, self.top_k)?;

        debug!(
            candidates = profiles.len(),
            returned = ranked.len(),
            top_k = self.top_k,
            "ranking run complete"
        );

        Ok(RankedResult::new(
            requisition.clone(),
            self.scorer.weights(),
            ranked,
        ))
    }
}

/// 表の全行からプロフィールを抽出する。
///
/// 空行は無視し、不正な行は警告ログを残してスキップする（実行は落とさない）。
/// cv_id はテンプレートの id に1始まりの行番号を付けて一意化する。
pub fn extract_profiles(extractor: &ProfileExtractor, rows: &[TableRow]) -> Vec<CandidateProfile> {
    let mut profiles = Vec::new();

    for (idx, row) in rows.iter().enumerate() {
        if !row.has_data() {
            continue;
        }

        let row_number = idx + 1;
        let cv_id = format!("{}-{:03}", extractor.fixture().cv_id, row_number);
        match extractor.extract(cv_id, row, row_number) {
            Ok(profile) => profiles.push(profile),
            Err(err) => warn!(row = row_number, error = %err, "skipping malformed row"),
        }
    }

    profiles
}

/// 指定インデックス（0始まり）の候補者だけを抽出する。
/// 範囲外はこの要求のみの失敗で、他の処理には影響しない。
pub fn profile_by_index(
    extractor: &ProfileExtractor,
    rows: &[TableRow],
    index: usize,
) -> Result<CandidateProfile, RankError> {
    let row = rows.get(index).ok_or(RankError::OutOfRange {
        index,
        available: rows.len(),
    })?;
    extractor.extract(extractor.fixture().cv_id.clone(), row, index + 1)
}
