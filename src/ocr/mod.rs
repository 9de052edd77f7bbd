//! OCRプロバイダ
//!
//! OCRエンジンはブラックボックスとして扱う。画像バイト列を渡すと
//! 検出順のテキスト断片列（位置・信頼度つき）が返る。
//! 抽出アルゴリズムはこの並び順だけを手がかりにするため、
//! 実装は検出結果の順序をそのまま保持しなければならない。

pub mod command;
pub mod lazy;

pub use command::CommandOcrEngine;
pub use lazy::LazyOcr;

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// 検出領域（抽出アルゴリズムでは未使用、そのまま持ち回る）
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// OCRが検出した1件のテキスト断片
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fragment {
    pub text: String,
    #[serde(default)]
    pub bounding_box: BoundingBox,
    #[serde(default)]
    pub confidence: f32,
}

impl Fragment {
    /// テキストのみの断片（テスト・CLI入力用）
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bounding_box: BoundingBox::default(),
            confidence: 0.0,
        }
    }
}

/// OCRエンジンの抽象
///
/// 1リクエストにつき1回呼ばれる。実装は内部状態を変更しないこと。
pub trait OcrProvider: Send + Sync {
    /// 画像バイト列を認識し、検出順の断片列を返す
    fn recognize(&self, image: &[u8]) -> Result<Vec<Fragment>>;
}
