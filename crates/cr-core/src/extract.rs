use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::RankError;
use crate::table::{CategorySpan, HeaderLayout, TableRow};
use crate::CandidateProfile;

/// 候補者の固定属性テンプレート。
/// 元データ生成器のクラス定数に相当するが、プロセス全体の静的値ではなく
/// 呼び出し側から明示的に渡す設定値として扱う（テストで併走可能にするため）。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateFixture {
    pub cv_id: String,
    pub name: String,
    pub furigana: String,
    pub gender: String,
    pub birthdate: String,
    pub address: String,
}

/// スキルマトリクスの1行を `CandidateProfile` へ変換する純粋変換器。
pub struct ProfileExtractor {
    layout: HeaderLayout,
    fixture: CandidateFixture,
}

impl ProfileExtractor {
    pub fn new(layout: HeaderLayout, fixture: CandidateFixture) -> Self {
        Self { layout, fixture }
    }

    pub fn fixture(&self) -> &CandidateFixture {
        &self.fixture
    }

    pub fn layout(&self) -> &HeaderLayout {
        &self.layout
    }

    /// 1行からプロフィールを構築する。副作用なし。
    ///
    /// 列数を宣言している行がラベル付きヘッダの範囲に届かない場合は
    /// `RankError::MalformedRow` を返す（`row_number` は1始まり、ログ用）。
    /// 宣言のない疎な行は未定義の列を空セルとして読み、不正扱いにしない。
    pub fn extract(
        &self,
        cv_id: impl Into<String>,
        row: &TableRow,
        row_number: usize,
    ) -> Result<CandidateProfile, RankError> {
        if let Some(actual) = row.width {
            let expected = self.layout.required_width();
            if actual < expected {
                return Err(RankError::MalformedRow {
                    row: row_number,
                    expected,
                    actual,
                });
            }
        }

        Ok(CandidateProfile {
            cv_id: cv_id.into(),
            name: self.fixture.name.clone(),
            furigana: self.fixture.furigana.clone(),
            gender: self.fixture.gender.clone(),
            birthdate: self.fixture.birthdate.clone(),
            address: self.fixture.address.clone(),
            certificates: self.collect_marked(&self.layout.certificate, row),
            institutions: self.collect_marked(&self.layout.institution, row),
        })
    }

    /// スパン内で "x" マークされた列のラベルを集める。
    /// 見出しのない列はマークされていてもスキルにならない。
    fn collect_marked(&self, span: &CategorySpan, row: &TableRow) -> BTreeSet<String> {
        span.columns()
            .filter(|&col| row.cell(col).is_marked())
            .filter_map(|col| self.layout.label_at(col))
            .map(str::to_owned)
            .collect()
    }
}
