//! 数値断片の判定と正規化
//!
//! - 先頭アンカーのパターンマッチ（区切り文字1つまで許容）
//! - 全角数字→半角数字の変換
//!
//! 在庫表では「12」「： 12」「１２」のような断片が数量として現れる。
//! 数字列の後ろに別の文字が続いてもパターンとしては許容し、
//! 取り出すのは数字列だけとする。

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // 先頭: 空白 → コロン（半角/全角）1つまで → 空白 → 数字列（半角/全角）
    static ref NUMERAL_RE: Regex = Regex::new(r"^\s*[:：]?\s*([0-9０-９]+)").unwrap();
}

/// 断片テキストから数量を取り出す
///
/// パターンに一致しない、または（通常は起きないが）変換後の
/// 整数パースに失敗した場合は `None`。呼び出し側はエラーにせず
/// 次の断片へ進む。
pub fn parse_quantity(text: &str) -> Option<u64> {
    let caps = NUMERAL_RE.captures(text)?;
    let digits = to_hankaku(&caps[1]);
    digits.parse().ok()
}

/// 全角数字を半角に変換（コードポイント差で対応付け）
pub fn to_hankaku(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '０'..='９' => ((c as u32) - '０' as u32 + '0' as u32) as u8 as char,
            _ => c,
        })
        .collect()
}
