use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

static EMPTY_CELL: CellValue = CellValue::Empty;

/// スキルマトリクスのセル値。
/// 元データは文字列・数値・空セルが混在するため単一の直和型に落とす。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Empty,
}

impl Default for CellValue {
    fn default() -> Self {
        CellValue::Empty
    }
}

impl CellValue {
    /// スキル「保有」マーク判定。
    /// trim + 大文字小文字無視で "x" に一致する文字列セルのみ true。
    /// 数値セル・空セルは常に false。
    pub fn is_marked(&self) -> bool {
        match self {
            CellValue::Text(value) => value.trim().eq_ignore_ascii_case("x"),
            _ => false,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Text(value) => value.trim().is_empty(),
            CellValue::Number(_) => false,
            CellValue::Empty => true,
        }
    }
}

/// 表の1行。1始まりの列番号からセル値への対応。
///
/// マップは疎でよく、未定義の列は空セルとして読む。`width` は表読み取り側が
/// 物理的な列数を宣言する場合のみ持ち、宣言がある行だけが列不足の検査対象に
/// なる（宣言のない疎な行を不正扱いにはしない）。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    pub cells: BTreeMap<u32, CellValue>,
    /// 物理的な列数（宣言されている場合のみ）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
}

impl TableRow {
    /// 列番号（1始まり）でセルを引く。未定義の列は空セル扱い。
    pub fn cell(&self, col: u32) -> &CellValue {
        self.cells.get(&col).unwrap_or(&EMPTY_CELL)
    }

    /// いずれかのセルに値が入っているか（空行スキップ用）
    pub fn has_data(&self) -> bool {
        self.cells.values().any(|cell| !cell.is_empty())
    }

    /// 先頭列から順に値を並べて行を作る。
    /// 空文字も物理列として保持し、列数を宣言済みにする。
    pub fn from_values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let cells: BTreeMap<u32, CellValue> = values
            .into_iter()
            .enumerate()
            .map(|(idx, value)| (idx as u32 + 1, CellValue::Text(value.into())))
            .collect();
        let width = cells.keys().next_back().copied().unwrap_or(0);
        Self {
            cells,
            width: Some(width),
        }
    }
}

/// カテゴリ見出し（元表の1行目の結合セル相当）。
/// 表示ラベルと両端を含む列範囲を持つ。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySpan {
    pub label: String,
    pub start_col: u32,
    pub end_col: u32,
}

impl CategorySpan {
    pub fn new(label: impl Into<String>, start_col: u32, end_col: u32) -> Self {
        Self {
            label: label.into(),
            start_col,
            end_col,
        }
    }

    pub fn columns(&self) -> impl Iterator<Item = u32> {
        self.start_col..=self.end_col
    }

    pub fn contains(&self, col: u32) -> bool {
        (self.start_col..=self.end_col).contains(&col)
    }
}

/// ヘッダ定義（カテゴリ行 + 列ごとのスキル名行の2段構成）。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeaderLayout {
    pub certificate: CategorySpan,
    pub institution: CategorySpan,
    /// 列ごとのスキル名。index 0 が1列目。空文字は「見出しなし」。
    pub skill_labels: Vec<String>,
}

impl HeaderLayout {
    /// 列のスキル名（trim 済み）。空見出しの列は None。列番号は1始まり。
    pub fn label_at(&self, col: u32) -> Option<&str> {
        if col == 0 {
            return None;
        }
        let label = self.skill_labels.get(col as usize - 1)?.trim();
        if label.is_empty() {
            None
        } else {
            Some(label)
        }
    }

    /// 宣言済みスパンの中で実際にラベルが付いている最後の列。
    /// 行がここまで届いていなければその行は不正。
    pub fn required_width(&self) -> u32 {
        [&self.certificate, &self.institution]
            .iter()
            .flat_map(|span| span.columns())
            .filter(|&col| self.label_at(col).is_some())
            .max()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> HeaderLayout {
        HeaderLayout {
            certificate: CategorySpan::new("資格・免許", 1, 3),
            institution: CategorySpan::new("大学名", 4, 5),
            skill_labels: vec![
                "中学美術".into(),
                "".into(),
                "高校美術".into(),
                "多摩美術大学".into(),
                "  ".into(),
            ],
        }
    }

    #[test]
    fn marked_cells_accept_only_x() {
        assert!(CellValue::Text("x".into()).is_marked());
        assert!(CellValue::Text("X".into()).is_marked());
        assert!(CellValue::Text(" x ".into()).is_marked());
        assert!(!CellValue::Text("yes".into()).is_marked());
        assert!(!CellValue::Text("1".into()).is_marked());
        assert!(!CellValue::Text("".into()).is_marked());
        assert!(!CellValue::Number(1.0).is_marked());
        assert!(!CellValue::Empty.is_marked());
    }

    #[test]
    fn missing_cells_read_as_empty() {
        let row = TableRow::from_values(["x"]);
        assert!(row.cell(1).is_marked());
        assert!(row.cell(9).is_empty());
        assert_eq!(row.width, Some(1));
    }

    #[test]
    fn blank_rows_have_no_data() {
        let blank = TableRow::from_values(["", "  ", ""]);
        assert!(!blank.has_data());
        assert_eq!(blank.width, Some(3));

        let row = TableRow::from_values(["", "x"]);
        assert!(row.has_data());
    }

    #[test]
    fn empty_labels_are_invisible() {
        let layout = layout();
        assert_eq!(layout.label_at(1), Some("中学美術"));
        assert_eq!(layout.label_at(2), None);
        assert_eq!(layout.label_at(5), None);
        assert_eq!(layout.label_at(99), None);
    }

    #[test]
    fn required_width_stops_at_last_labelled_column() {
        // 5列目はラベルが空白のみなので4列目までで足りる
        assert_eq!(layout().required_width(), 4);
    }

    #[test]
    fn cell_values_deserialize_from_mixed_json() {
        let row: TableRow = serde_json::from_str(r#"{"cells":{"1":"x","2":12788,"3":null}}"#)
            .expect("row should parse");
        assert!(row.cell(1).is_marked());
        assert_eq!(row.cell(2), &CellValue::Number(12788.0));
        assert!(row.cell(3).is_empty());
        assert_eq!(row.width, None);
    }

    #[test]
    fn sparse_rows_keep_omitted_columns_empty() {
        // 疎なマップは宣言列数を持たず、飛んだ列は空セルとして読む
        let row: TableRow = serde_json::from_str(r#"{"cells":{"2":"x","7":"x"}}"#)
            .expect("row should parse");
        assert_eq!(row.width, None);
        assert!(row.cell(2).is_marked());
        assert!(row.cell(3).is_empty());
        assert!(row.cell(7).is_marked());
        assert!(row.has_data());
    }

    #[test]
    fn declared_width_survives_serde() {
        let row: TableRow = serde_json::from_str(r#"{"cells":{"1":"x"},"width":9}"#)
            .expect("row should parse");
        assert_eq!(row.width, Some(9));
    }
}
