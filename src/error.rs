use thiserror::Error;

#[derive(Error, Debug)]
pub enum StockOcrError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("OCR処理中にエラーが発生しました: {0}")]
    Ocr(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("フォルダが見つかりません: {0}")]
    FolderNotFound(String),

    #[error("画像が見つかりません: {0}")]
    NoImagesFound(String),

    #[error("サポートされていないファイル形式です: {0}")]
    UnsupportedFormat(String),

    #[error("空のファイルです")]
    EmptyUpload,

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, StockOcrError>;
