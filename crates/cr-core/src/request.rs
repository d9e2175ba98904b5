use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::RankError;
use crate::requisition::Requisition;
use crate::scoring::WeightConfig;
use crate::CandidateProfile;

/// `list_cv` の1要素。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CvEntry {
    pub cv_id: String,
    pub content: String,
}

/// `jd` ペイロード。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JdPayload {
    pub content: String,
}

/// マッチングサービスへ送るリクエスト本体。
///
/// フィールドは宣言順で直列化されるため、同一入力からの再構築は
/// バイト同一になる。下流はこの内容のハッシュをキーにすることがある。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchPayload {
    pub list_cv: Vec<CvEntry>,
    pub jd: JdPayload,
    pub top_k: u32,
    pub custom_weights: WeightConfig,
}

impl MatchPayload {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// 直列化済みペイロードの SHA-256 ハッシュ先頭16文字。
    /// 下流のコンテンツハッシュ照合・重複検知に使う。
    pub fn payload_hash(&self) -> serde_json::Result<String> {
        let json = self.to_json()?;
        let mut hasher = Sha256::new();
        hasher.update(json.as_bytes());
        let digest = hasher.finalize();
        let mut hex: String = digest.iter().map(|b| format!("{b:02x}")).collect();
        hex.truncate(16);
        Ok(hex)
    }
}

/// `(candidates, requisition, top_k, weights)` から転送用ペイロードを組み立てる。
pub struct RequestBuilder {
    weights: WeightConfig,
    top_k: u32,
}

impl RequestBuilder {
    /// 設定を検証して構築する。不正な重み・top_k はここで弾く。
    pub fn new(weights: WeightConfig, top_k: u32) -> Result<Self, RankError> {
        weights.validate()?;
        if top_k == 0 {
            return Err(RankError::InvalidTopK(0));
        }
        Ok(Self { weights, top_k })
    }

    pub fn build(&self, profiles: &[CandidateProfile], requisition: &Requisition) -> MatchPayload {
        MatchPayload {
            list_cv: profiles
                .iter()
                .map(|profile| CvEntry {
                    cv_id: profile.cv_id.clone(),
                    content: render_content(profile),
                })
                .collect(),
            jd: JdPayload {
                content: requisition.content.clone(),
            },
            top_k: self.top_k,
            custom_weights: self.weights,
        }
    }
}

/// プロフィールの転記。フィールド順は固定で、1項目1行。
/// 資格・免許と大学名は空でない場合のみ出力する。集合は BTreeSet なので
/// 連結順がハッシュの反復順に依存することはない。
pub fn render_content(profile: &CandidateProfile) -> String {
    let mut content = String::new();
    content.push_str(&format!("氏名: {}\n", profile.name));
    content.push_str(&format!("フリガナ: {}\n", profile.furigana));
    content.push_str(&format!("性別: {}\n", profile.gender));
    content.push_str(&format!("生年月日: {}\n", profile.birthdate));
    content.push_str(&format!("住所: {}\n", profile.address));

    if !profile.certificates.is_empty() {
        let joined = profile
            .certificates
            .iter()
            .cloned()
            .collect::<Vec<_>>()
            .join(", ");
        content.push_str(&format!("資格・免許: {joined}\n"));
    }

    if !profile.institutions.is_empty() {
        let joined = profile
            .institutions
            .iter()
            .cloned()
            .collect::<Vec<_>>()
            .join(", ");
        content.push_str(&format!("大学名: {joined}\n"));
    }

    content
}
