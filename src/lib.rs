//! 在庫表OCR解析ライブラリ
//!
//! 在庫表の写真をOCRにかけ、検出順のテキスト断片列からラベル→数量の
//! 対応を復元する。中核は `extractor` の対応付けアルゴリズムで、
//! OCRエンジン（`ocr`）と配信面（`server` / CLI）は差し替え可能な
//! 周辺部として分離している。

pub mod cli;
pub mod config;
pub mod error;
pub mod extractor;
pub mod ocr;
pub mod scanner;
pub mod server;
