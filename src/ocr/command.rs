//! 外部OCRコマンド連携
//!
//! OCR本体は外部コマンドに委譲する。画像を一時ファイルに書き出して
//! パスを渡し、標準出力のJSON配列（検出順）をパースする。
//!
//! 期待する出力形式:
//! ```json
//! [{"text": "牛乳", "bbox": [10, 20, 80, 30], "confidence": 0.97}, ...]
//! ```

use crate::error::{Result, StockOcrError};
use crate::ocr::{BoundingBox, Fragment, OcrProvider};
use serde::Deserialize;
use std::io::Write;
use std::process::Command;

/// 外部コマンドの1検出行
#[derive(Debug, Deserialize)]
struct Detection {
    text: String,
    #[serde(default)]
    bbox: Option<[i32; 4]>,
    #[serde(default)]
    confidence: f32,
}

/// 外部OCRコマンドを呼び出すエンジン
pub struct CommandOcrEngine {
    command: String,
    languages: Vec<String>,
}

impl CommandOcrEngine {
    pub fn new(command: impl Into<String>, languages: Vec<String>) -> Self {
        Self {
            command: command.into(),
            languages,
        }
    }

    fn run_command(&self, image_path: &std::path::Path) -> Result<String> {
        let lang = self.languages.join(",");

        // Windowsではcmd /c経由
        #[cfg(windows)]
        let output = Command::new("cmd")
            .args(["/c", self.command.as_str()])
            .args(["--lang", lang.as_str()])
            .arg(image_path)
            .output()
            .map_err(|e| StockOcrError::Ocr(format!("OCRコマンド実行エラー: {}", e)))?;

        #[cfg(not(windows))]
        let output = Command::new(&self.command)
            .args(["--lang", lang.as_str()])
            .arg(image_path)
            .output()
            .map_err(|e| StockOcrError::Ocr(format!("OCRコマンド実行エラー: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(StockOcrError::Ocr(format!(
                "OCRコマンド失敗 (code {:?}): {}",
                output.status.code(),
                stderr
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

impl OcrProvider for CommandOcrEngine {
    fn recognize(&self, image: &[u8]) -> Result<Vec<Fragment>> {
        if image.is_empty() {
            return Err(StockOcrError::EmptyUpload);
        }

        // 画像を一時ファイルに書き出してコマンドに渡す
        let mut temp = tempfile::Builder::new()
            .prefix("stock-ocr-")
            .suffix(".img")
            .tempfile()
            .map_err(|e| StockOcrError::Ocr(format!("一時ファイル作成エラー: {}", e)))?;
        temp.write_all(image)
            .map_err(|e| StockOcrError::Ocr(format!("一時ファイル書き込みエラー: {}", e)))?;
        temp.flush()
            .map_err(|e| StockOcrError::Ocr(format!("一時ファイル書き込みエラー: {}", e)))?;

        let stdout = self.run_command(temp.path())?;
        parse_detections(&stdout)
    }
}

/// コマンド出力のJSON配列を検出順のまま断片列に変換する
fn parse_detections(stdout: &str) -> Result<Vec<Fragment>> {
    let detections: Vec<Detection> = serde_json::from_str(stdout.trim())
        .map_err(|e| StockOcrError::Ocr(format!("OCR出力のJSONパースエラー: {}", e)))?;

    Ok(detections
        .into_iter()
        .map(|d| Fragment {
            text: d.text,
            bounding_box: d
                .bbox
                .map(|[x, y, w, h]| BoundingBox {
                    x,
                    y,
                    width: w.max(0) as u32,
                    height: h.max(0) as u32,
                })
                .unwrap_or_default(),
            confidence: d.confidence,
        })
        .collect())
}
