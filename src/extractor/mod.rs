//! 在庫抽出アルゴリズム
//!
//! OCRが返した断片列（検出順）とラベル辞書から、ラベル→数量の
//! 対応を組み立てる。位置情報は使わず、並び順だけを手がかりにする。
//!
//! ## 対応付けの規則
//! 1. 断片を検出順に走査し、辞書の表層形が部分文字列として含まれる
//!    最初のラベルを探す（辞書は定義順で照合、順序は安定）
//! 2. 未解決のラベルなら、直後の `window` 個（既定5個）の断片から
//!    未使用かつ数値パターンに一致する最初の断片を数量として採用する
//! 3. 採用した断片のインデックスは使用済みとして記録し、別のラベルが
//!    同じ断片を数量として取り合わないようにする
//! 4. 既に数量が決まったラベルは上書きしない（先勝ち）。解決済み
//!    ラベルのために断片を使用済みにすることもない
//!
//! 窓内に数値が見つからない場合、その出現は何も記録しない。同じ
//! 表層形が後で再び現れればそちらで解決し得る。抽出結果が空でも
//! エラーではない。

pub mod numeral;
pub mod summary;

pub use summary::{render_report, StockSummary};

use crate::error::Result;
use crate::ocr::{Fragment, OcrProvider};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// ラベル辞書の1エントリ（表層形 → 正規名）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelEntry {
    /// 在庫表に書かれる表記（例: "牛乳"）
    pub surface: String,
    /// 出力キー（例: "milk"）
    pub canonical: String,
}

/// ラベル辞書
///
/// 定義順がそのまま照合順になる。同じ断片に複数の表層形が含まれる
/// 場合の決着を再現可能にするため、ハッシュ表ではなく順序つきの
/// リストで持つ。
#[derive(Debug, Clone, Default)]
pub struct LabelDictionary {
    entries: Vec<LabelEntry>,
}

impl LabelDictionary {
    pub fn new(entries: Vec<LabelEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[LabelEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// いずれかの表層形がテキストに含まれるか
    pub fn matches_any(&self, text: &str) -> bool {
        self.entries.iter().any(|e| text.contains(&e.surface))
    }
}

/// 抽出オプション
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// ラベル出現の直後、何個先の断片まで数量を探すか
    pub window: usize,
    /// ラベル表層形を含む断片を数量候補から外すか。
    /// 表層形が数字で始まらない限り数値パターンには一致しないため、
    /// 既定では無効（元の挙動のまま）
    pub skip_label_fragments: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            window: 5,
            skip_label_fragments: false,
        }
    }
}

/// 断片列からラベル→数量の対応を組み立てる
///
/// 失敗しない。数値として解釈できない断片は読み飛ばすだけで、
/// 結果が空でも正常終了。
pub fn associate(
    fragments: &[Fragment],
    labels: &LabelDictionary,
    options: &ExtractOptions,
) -> StockSummary {
    let mut stock = StockSummary::new();
    let mut used_indices: HashSet<usize> = HashSet::new();

    for (i, fragment) in fragments.iter().enumerate() {
        for entry in labels.entries() {
            if !fragment.text.contains(&entry.surface) {
                continue;
            }

            // 解決済みラベルは上書きも断片消費もしない
            if stock.contains(&entry.canonical) {
                continue;
            }

            // 直後の窓から未使用の数値断片を探す
            let end = (i + 1 + options.window).min(fragments.len());
            for (j, candidate) in fragments.iter().enumerate().take(end).skip(i + 1) {
                if used_indices.contains(&j) {
                    continue;
                }
                if options.skip_label_fragments && labels.matches_any(&candidate.text) {
                    continue;
                }

                if let Some(quantity) = numeral::parse_quantity(&candidate.text) {
                    stock.insert(&entry.canonical, quantity);
                    used_indices.insert(j);
                    break;
                }
            }

            // 1断片が担えるラベルは照合順で最初の未解決ラベルまで
            break;
        }
    }

    stock
}

/// 画像バイト列から在庫サマリーを抽出する
///
/// 失敗し得るのはOCRプロバイダ呼び出しだけ。OCRが失敗した場合は
/// 部分結果を返さず `StockOcrError::Ocr` で打ち切る。
pub fn extract_stock(
    image: &[u8],
    provider: &dyn OcrProvider,
    labels: &LabelDictionary,
    options: &ExtractOptions,
) -> Result<StockSummary> {
    let fragments = provider.recognize(image)?;
    tracing::info!("OCRで{}個のテキストブロックを検出", fragments.len());
    Ok(associate(&fragments, labels, options))
}
