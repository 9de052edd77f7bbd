use crate::error::{Result, StockOcrError};
use crate::extractor::{LabelDictionary, LabelEntry};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// アップロード上限（16MB）
pub const MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

/// 対応する画像拡張子
pub const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "tiff"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// 外部OCRコマンド（画像パスを受け取り、検出結果のJSON配列を標準出力に返す）
    pub ocr_command: String,
    /// OCR言語
    pub languages: Vec<String>,
    /// アップロード上限（バイト）
    pub max_upload_bytes: usize,
    /// ラベル辞書（表層形 → 正規名）。並び順がそのまま照合順になる
    pub labels: Vec<LabelEntry>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ocr_command: "easyocr-cli".into(),
            languages: vec!["ja".into(), "en".into()],
            max_upload_bytes: MAX_UPLOAD_BYTES,
            labels: default_labels(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| StockOcrError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("stock-ocr").join("config.json"))
    }

    pub fn set_ocr_command(&mut self, command: String) -> Result<()> {
        self.ocr_command = command;
        self.save()
    }

    /// ラベル辞書を照合用に取り出す
    pub fn label_dictionary(&self) -> LabelDictionary {
        LabelDictionary::new(self.labels.clone())
    }
}

/// 既定のラベル辞書
///
/// 表層形は在庫表に実際に書かれる日本語、正規名は出力キー。
/// 並び順＝照合順なので、定義順は安定させること。
pub fn default_labels() -> Vec<LabelEntry> {
    [
        ("日付", "date"),
        ("牛乳", "milk"),
        ("卵", "egg"),
        ("バター", "butter"),
        ("ピザ", "pizza"),
        ("パン", "bread"),
        ("冷蔵", "refrigerated_sweets"),
        ("冷凍", "frozen_sweets"),
    ]
    .iter()
    .map(|(surface, canonical)| LabelEntry {
        surface: surface.to_string(),
        canonical: canonical.to_string(),
    })
    .collect()
}

/// ファイル拡張子が許可されているかチェック
pub fn allowed_file(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| {
            let ext = ext.to_lowercase();
            ALLOWED_EXTENSIONS.iter().any(|&e| e == ext)
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_labels_order() {
        let labels = default_labels();
        assert_eq!(labels.len(), 8);
        // 照合順の安定性が前提なので定義順を固定で検証
        assert_eq!(labels[0].surface, "日付");
        assert_eq!(labels[0].canonical, "date");
        assert_eq!(labels[1].canonical, "milk");
        assert_eq!(labels[7].canonical, "frozen_sweets");
    }

    #[test]
    fn test_allowed_file() {
        assert!(allowed_file("stock.jpg"));
        assert!(allowed_file("stock.JPG"));
        assert!(allowed_file("在庫表.png"));
        assert!(allowed_file("a.b.tiff"));
        assert!(!allowed_file("stock.pdf"));
        assert!(!allowed_file("stock"));
        assert!(!allowed_file(""));
    }

    #[test]
    fn test_config_roundtrip_json() {
        let config = Config::default();
        let json = serde_json::to_string(&config).unwrap();
        let loaded: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded.ocr_command, config.ocr_command);
        assert_eq!(loaded.max_upload_bytes, MAX_UPLOAD_BYTES);
        assert_eq!(loaded.labels.len(), 8);
    }
}
