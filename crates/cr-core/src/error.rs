use thiserror::Error;

/// ランキング実行で発生するエラー。
///
/// `MalformedRow` のみ行単位で回復可能（該当行をスキップして続行）。
/// それ以外は実行全体を中断し、部分的な結果は返さない。
#[derive(Debug, Error)]
pub enum RankError {
    /// 行の列数が宣言済みヘッダ範囲に届いていない
    #[error("row {row} has {actual} columns but headers declare {expected}")]
    MalformedRow {
        row: usize,
        expected: u32,
        actual: u32,
    },

    /// 重み設定が不正（負値・非有限値・合計ゼロ）
    #[error("invalid weight config: {0}")]
    InvalidWeightConfig(String),

    /// top_k が正でない
    #[error("top_k must be positive (got {0})")]
    InvalidTopK(i64),

    /// 指定された候補者インデックスが行数を超えている
    #[error("candidate index {index} out of range ({available} rows available)")]
    OutOfRange { index: usize, available: usize },
}
