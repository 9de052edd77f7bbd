//! エラーケーステスト
//!
//! 各種エラー条件でのエラーハンドリングを検証

use std::path::Path;
use stock_ocr_rust::error::StockOcrError;
use stock_ocr_rust::scanner;
use tempfile::tempdir;

/// 存在しないフォルダをスキャンした場合
#[test]
fn test_scan_nonexistent_folder() {
    let result = scanner::scan_folder(Path::new("/nonexistent/path/12345"));
    assert!(result.is_err());

    let err = result.unwrap_err();
    assert!(matches!(err, StockOcrError::FolderNotFound(_)));
}

/// 空のフォルダをスキャンした場合
#[test]
fn test_scan_empty_folder() {
    let dir = tempdir().expect("Failed to create temp dir");
    let result = scanner::scan_folder(dir.path());

    // 空フォルダはエラーではなく空のVecを返す
    assert!(result.is_ok());
    assert!(result.unwrap().is_empty());
}

/// 画像のないフォルダをスキャンした場合
#[test]
fn test_scan_folder_no_images() {
    let dir = tempdir().expect("Failed to create temp dir");

    // テキストファイルのみ作成
    std::fs::write(dir.path().join("test.txt"), "hello").unwrap();
    std::fs::write(dir.path().join("data.json"), "{}").unwrap();

    let result = scanner::scan_folder(dir.path());
    assert!(result.is_ok());
    assert!(result.unwrap().is_empty());
}

/// StockOcrErrorのDisplay実装確認
#[test]
fn test_error_display() {
    let errors = vec![
        StockOcrError::Config("テスト設定エラー".to_string()),
        StockOcrError::Ocr("OCRエンジンが応答しません".to_string()),
        StockOcrError::FileNotFound("test.jpg".to_string()),
        StockOcrError::FolderNotFound("/path/to/folder".to_string()),
        StockOcrError::NoImagesFound("フォルダ".to_string()),
        StockOcrError::UnsupportedFormat("stock.pdf".to_string()),
        StockOcrError::EmptyUpload,
    ];

    for err in errors {
        let display = format!("{}", err);
        assert!(!display.is_empty());
    }
}

/// IOエラーからの変換
#[test]
fn test_io_error_conversion() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no file");
    let err: StockOcrError = io_err.into();
    assert!(matches!(err, StockOcrError::Io(_)));
}
