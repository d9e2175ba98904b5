pub mod error;
pub mod extract;
pub mod logging;
pub mod pipeline;
pub mod rank;
pub mod request;
pub mod requisition;
pub mod scoring;
pub mod signals;
pub mod table;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// 候補者プロフィール。抽出後は不変で、実行のたびに元の行から作り直す。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub cv_id: String,
    pub name: String,
    pub furigana: String,
    pub gender: String,
    pub birthdate: String,
    pub address: String,
    /// 保有資格・免許（順序が直列化に影響しないよう BTreeSet）
    pub certificates: BTreeSet<String>,
    /// 出身校
    pub institutions: BTreeSet<String>,
}
