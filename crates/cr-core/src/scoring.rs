use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::RankError;
use crate::requisition::Requisition;
use crate::signals::normalize_label;
use crate::CandidateProfile;

/// シグナル欠損時の中立スコア。
/// 任意項目の欠損でランキングを落とさず、順位への寄与だけを消す。
pub const NEUTRAL_SCORE: f64 = 0.5;

/// 4因子の重み設定。
///
/// 合計は 1.0 が望ましいが強制はしない。合成時に実際の合計で正規化する
/// ため、合成スコアは常に [0,1] に収まる。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightConfig {
    pub license_score: f64,
    pub hours_score: f64,
    pub reliability_score: f64,
    pub competency_score: f64,
}

impl Default for WeightConfig {
    fn default() -> Self {
        Self {
            license_score: 0.4,
            hours_score: 0.2,
            reliability_score: 0.2,
            competency_score: 0.2,
        }
    }
}

impl WeightConfig {
    pub fn sum(&self) -> f64 {
        self.license_score + self.hours_score + self.reliability_score + self.competency_score
    }

    /// 全因子が非負の有限値で、合計が正であること。
    pub fn validate(&self) -> Result<(), RankError> {
        let components = [
            ("license_score", self.license_score),
            ("hours_score", self.hours_score),
            ("reliability_score", self.reliability_score),
            ("competency_score", self.competency_score),
        ];

        for (name, value) in components {
            if !value.is_finite() || value < 0.0 {
                return Err(RankError::InvalidWeightConfig(format!(
                    "{name} must be a non-negative finite number (got {value})"
                )));
            }
        }

        if self.sum() <= 0.0 {
            return Err(RankError::InvalidWeightConfig(
                "weight sum must be positive".into(),
            ));
        }

        Ok(())
    }
}

/// 因子別サブスコア（各 0.0〜1.0）。
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SubScores {
    pub license_score: f64,
    pub hours_score: f64,
    pub reliability_score: f64,
    pub competency_score: f64,
}

/// スコア済み候補者。実行ごとに再計算され、単独では永続化しない。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredCandidate {
    pub cv_id: String,
    pub sub_scores: SubScores,
    pub combined: f64,
}

/// hours / reliability / competency の差し替え可能な採点戦略。
///
/// `None` はシグナル欠損を表し、エンジン側で中立スコアに落ちる。
/// 有限でない値や [0,1] 外の値を返した実装はエンジン側で丸める。
pub trait FactorScorer: Send + Sync {
    fn score(&self, candidate: &CandidateProfile, requisition: &Requisition) -> Option<f64>;
}

/// 常にシグナル欠損を返す既定戦略。
#[derive(Debug, Clone, Copy, Default)]
pub struct NeutralScorer;

impl FactorScorer for NeutralScorer {
    fn score(&self, _candidate: &CandidateProfile, _requisition: &Requisition) -> Option<f64> {
        None
    }
}

/// コマ数カバレッジに基づく hours 戦略。
///
/// 求人票の週コマ数が稼働上限以内なら満点、超過分は比例で減点する。
/// 求人票にコマ数シグナルがなければ欠損扱い。
#[derive(Debug, Clone, Copy)]
pub struct SlotCoverageScorer {
    pub capacity_slots: u32,
}

impl Default for SlotCoverageScorer {
    fn default() -> Self {
        // 週20コマを満稼働の目安とする
        Self { capacity_slots: 20 }
    }
}

impl FactorScorer for SlotCoverageScorer {
    fn score(&self, _candidate: &CandidateProfile, requisition: &Requisition) -> Option<f64> {
        let requested = requisition.weekly_slots?;
        if self.capacity_slots == 0 || requested == 0 {
            return None;
        }
        if requested <= self.capacity_slots {
            Some(1.0)
        } else {
            Some(self.capacity_slots as f64 / requested as f64)
        }
    }
}

/// 必須免許の充足率。要件なしは 1.0（落第させる根拠がない）。
pub fn score_license(candidate: &CandidateProfile, requisition: &Requisition) -> f64 {
    if requisition.required_licenses.is_empty() {
        return 1.0;
    }

    let held: HashSet<String> = candidate
        .certificates
        .iter()
        .map(|cert| normalize_label(cert))
        .collect();
    let required: HashSet<String> = requisition
        .required_licenses
        .iter()
        .map(|lic| normalize_label(lic))
        .collect();

    let matched = required.iter().filter(|lic| held.contains(*lic)).count();
    matched as f64 / required.len() as f64
}

/// 候補者×求人票の採点エンジン。
/// license は固定式、残り3因子は注入された戦略で採点する。
pub struct ScoreEngine {
    weights: WeightConfig,
    hours: Box<dyn FactorScorer>,
    reliability: Box<dyn FactorScorer>,
    competency: Box<dyn FactorScorer>,
}

impl ScoreEngine {
    /// 既定戦略（全て中立）でエンジンを作る。重みはここで検証する。
    pub fn new(weights: WeightConfig) -> Result<Self, RankError> {
        Self::with_scorers(
            weights,
            Box::new(NeutralScorer),
            Box::new(NeutralScorer),
            Box::new(NeutralScorer),
        )
    }

    pub fn with_scorers(
        weights: WeightConfig,
        hours: Box<dyn FactorScorer>,
        reliability: Box<dyn FactorScorer>,
        competency: Box<dyn FactorScorer>,
    ) -> Result<Self, RankError> {
        weights.validate()?;
        Ok(Self {
            weights,
            hours,
            reliability,
            competency,
        })
    }

    pub fn weights(&self) -> WeightConfig {
        self.weights
    }

    /// 因子別サブスコアを算出する。
    pub fn sub_scores(&self, candidate: &CandidateProfile, requisition: &Requisition) -> SubScores {
        SubScores {
            license_score: clamp_unit(score_license(candidate, requisition)),
            hours_score: factor_or_neutral(self.hours.as_ref(), candidate, requisition),
            reliability_score: factor_or_neutral(self.reliability.as_ref(), candidate, requisition),
            competency_score: factor_or_neutral(self.competency.as_ref(), candidate, requisition),
        }
    }

    /// 重み付き合成: Σ(wᵢ·sᵢ) / Σ(wᵢ)
    pub fn combine(&self, sub: &SubScores) -> f64 {
        let w = self.weights;
        let weighted = w.license_score * sub.license_score
            + w.hours_score * sub.hours_score
            + w.reliability_score * sub.reliability_score
            + w.competency_score * sub.competency_score;
        weighted / w.sum()
    }

    pub fn score(&self, candidate: &CandidateProfile, requisition: &Requisition) -> ScoredCandidate {
        let sub_scores = self.sub_scores(candidate, requisition);
        ScoredCandidate {
            cv_id: candidate.cv_id.clone(),
            combined: self.combine(&sub_scores),
            sub_scores,
        }
    }
}

fn factor_or_neutral(
    scorer: &dyn FactorScorer,
    candidate: &CandidateProfile,
    requisition: &Requisition,
) -> f64 {
    scorer
        .score(candidate, requisition)
        .map(clamp_unit)
        .unwrap_or(NEUTRAL_SCORE)
}

fn clamp_unit(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        NEUTRAL_SCORE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate_with_certs(certs: &[&str]) -> CandidateProfile {
        CandidateProfile {
            cv_id: "12788".into(),
            certificates: certs.iter().map(|c| c.to_string()).collect(),
            ..CandidateProfile::default()
        }
    }

    fn requisition_requiring(licenses: &[&str]) -> Requisition {
        Requisition {
            content: "案件".into(),
            required_licenses: licenses.iter().map(|l| l.to_string()).collect(),
            ..Requisition::default()
        }
    }

    #[test]
    fn no_required_licenses_scores_full() {
        let score = score_license(&candidate_with_certs(&[]), &requisition_requiring(&[]));
        assert_eq!(score, 1.0);
    }

    #[test]
    fn license_score_is_fraction_of_required() {
        let candidate = candidate_with_certs(&["美術科教員免許", "書道"]);
        let requisition = requisition_requiring(&["美術科教員免許", "体育教員免許"]);
        assert!((score_license(&candidate, &requisition) - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn license_match_survives_width_and_case_variants() {
        let candidate = candidate_with_certs(&["ＴＯＥＩＣ ８００資格"]);
        let requisition = requisition_requiring(&["TOEIC 800資格"]);
        assert_eq!(score_license(&candidate, &requisition), 1.0);
    }

    #[test]
    fn missing_signals_default_to_neutral() {
        let engine = ScoreEngine::new(WeightConfig::default()).expect("default weights are valid");
        let sub = engine.sub_scores(&candidate_with_certs(&[]), &requisition_requiring(&[]));

        assert_eq!(sub.hours_score, NEUTRAL_SCORE);
        assert_eq!(sub.reliability_score, NEUTRAL_SCORE);
        assert_eq!(sub.competency_score, NEUTRAL_SCORE);
    }

    #[test]
    fn combines_with_documented_example() {
        // weights {0.4, 0.2, 0.2, 0.2} × subs {1.0, 0.5, 0.5, 0.5} = 0.7
        let engine = ScoreEngine::new(WeightConfig::default()).expect("default weights are valid");
        let sub = SubScores {
            license_score: 1.0,
            hours_score: 0.5,
            reliability_score: 0.5,
            competency_score: 0.5,
        };
        assert!((engine.combine(&sub) - 0.7).abs() < 1e-9);
    }

    #[test]
    fn combined_score_stays_in_unit_interval() {
        // 合計が 1.0 でなくても正規化で [0,1] に収まる
        let weights = WeightConfig {
            license_score: 3.0,
            hours_score: 1.0,
            reliability_score: 0.0,
            competency_score: 2.0,
        };
        let engine = ScoreEngine::new(weights).expect("positive sum is valid");

        for sub in [
            SubScores::default(),
            SubScores {
                license_score: 1.0,
                hours_score: 1.0,
                reliability_score: 1.0,
                competency_score: 1.0,
            },
            SubScores {
                license_score: 0.3,
                hours_score: 0.9,
                reliability_score: 0.1,
                competency_score: 0.7,
            },
        ] {
            let combined = engine.combine(&sub);
            assert!((0.0..=1.0).contains(&combined), "combined = {combined}");
        }
    }

    #[test]
    fn zero_sum_weights_are_rejected() {
        let weights = WeightConfig {
            license_score: 0.0,
            hours_score: 0.0,
            reliability_score: 0.0,
            competency_score: 0.0,
        };
        assert!(matches!(
            ScoreEngine::new(weights),
            Err(RankError::InvalidWeightConfig(_))
        ));
    }

    #[test]
    fn negative_weights_are_rejected() {
        let weights = WeightConfig {
            license_score: -0.4,
            ..WeightConfig::default()
        };
        assert!(matches!(
            weights.validate(),
            Err(RankError::InvalidWeightConfig(_))
        ));
    }

    #[test]
    fn slot_coverage_scorer_uses_weekly_slots_signal() {
        let scorer = SlotCoverageScorer::default();
        let candidate = candidate_with_certs(&[]);

        let light = Requisition {
            weekly_slots: Some(13),
            ..Requisition::default()
        };
        assert_eq!(scorer.score(&candidate, &light), Some(1.0));

        let heavy = Requisition {
            weekly_slots: Some(25),
            ..Requisition::default()
        };
        assert_eq!(scorer.score(&candidate, &heavy), Some(0.8));

        assert_eq!(scorer.score(&candidate, &Requisition::default()), None);
    }

    #[test]
    fn out_of_range_strategy_values_are_clamped() {
        struct Wild;
        impl FactorScorer for Wild {
            fn score(&self, _: &CandidateProfile, _: &Requisition) -> Option<f64> {
                Some(7.5)
            }
        }

        let engine = ScoreEngine::with_scorers(
            WeightConfig::default(),
            Box::new(Wild),
            Box::new(NeutralScorer),
            Box::new(NeutralScorer),
        )
        .expect("weights are valid");

        let sub = engine.sub_scores(&candidate_with_certs(&[]), &Requisition::default());
        assert_eq!(sub.hours_score, 1.0);
    }
}
