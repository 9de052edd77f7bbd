//! HTTP APIアダプタ
//!
//! 画像アップロードを受け取り、在庫抽出の結果をJSONで返す。
//!
//! - `GET /` ... API情報
//! - `GET /health` ... ヘルスチェック（OCRの初期化はしない）
//! - `POST /scan` ... multipartの `file` フィールドで画像を受け取る
//!
//! 抽出が空でも成功レスポンス（`data: {}`）。エラーは必ず
//! `{"error": メッセージ}` の形に落とし、リクエスト処理を落とさない。

use crate::config::{allowed_file, Config, ALLOWED_EXTENSIONS};
use crate::error::{Result, StockOcrError};
use crate::extractor::{self, ExtractOptions, LabelDictionary, StockSummary};
use crate::ocr::{CommandOcrEngine, LazyOcr, OcrProvider};
use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};

/// 全ルートで共有する状態
#[derive(Clone)]
pub struct AppState {
    pub ocr: Arc<LazyOcr>,
    pub labels: Arc<LabelDictionary>,
    pub options: ExtractOptions,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn from_config(config: &Config) -> Self {
        let command = config.ocr_command.clone();
        let languages = config.languages.clone();
        Self {
            ocr: Arc::new(LazyOcr::new(move || {
                Ok(Arc::new(CommandOcrEngine::new(command.clone(), languages.clone()))
                    as Arc<dyn OcrProvider>)
            })),
            labels: Arc::new(config.label_dictionary()),
            options: ExtractOptions::default(),
            max_upload_bytes: config.max_upload_bytes,
        }
    }
}

/// HTTPサーバーを起動する
pub async fn start_server(addr: SocketAddr, state: AppState) -> Result<()> {
    let app = router(state);

    info!("在庫OCRサーバーを起動: {}", addr);
    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/scan", post(scan))
        .layer(DefaultBodyLimit::max(state.max_upload_bytes))
        .with_state(state)
}

#[derive(Serialize)]
struct ScanResponse {
    success: bool,
    data: StockSummary,
    count: usize,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Serialize)]
struct HealthReport {
    status: &'static str,
    ocr_initialized: bool,
    message: &'static str,
    timestamp: DateTime<Utc>,
}

/// ハンドラから返すエラー（ステータス + `{"error": ...}`）
struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    fn too_large() -> Self {
        Self {
            status: StatusCode::PAYLOAD_TOO_LARGE,
            message: "ファイルサイズが大きすぎます（上限: 16MB）".into(),
        }
    }
}

impl From<StockOcrError> for ApiError {
    fn from(err: StockOcrError) -> Self {
        let status = match err {
            StockOcrError::UnsupportedFormat(_) | StockOcrError::EmptyUpload => {
                StatusCode::BAD_REQUEST
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                error: self.message,
            }),
        )
            .into_response()
    }
}

/// `GET /` - API情報
async fn index(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "service": "OCR Stock Scanner API",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "ready",
        "endpoints": {
            "/health": "ヘルスチェック",
            "/scan": "画像からOCR処理（POST）"
        },
        "supported_formats": ALLOWED_EXTENSIONS,
        "max_file_size": format!("{}MB", state.max_upload_bytes / (1024 * 1024)),
    }))
}

/// `GET /health` - ヘルスチェック
async fn health(State(state): State<AppState>) -> Json<HealthReport> {
    let ocr_initialized = state.ocr.is_initialized();
    Json(HealthReport {
        status: "healthy",
        ocr_initialized,
        message: if ocr_initialized {
            "OCRリーダー準備完了"
        } else {
            "OCRリーダーは初回リクエスト時に初期化されます"
        },
        timestamp: Utc::now(),
    })
}

/// `POST /scan` - 画像を受け取り在庫を抽出する
async fn scan(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> std::result::Result<Json<ScanResponse>, ApiError> {
    // `file` フィールドを探す（フィールドはMultipartを借りるので、
    // 見つけたその場で読み切る）
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::bad_request("マルチパートの読み取りに失敗しました"))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field
            .file_name()
            .map(|s| s.to_string())
            .unwrap_or_default();
        if filename.is_empty() {
            return Err(ApiError::bad_request("ファイルが選択されていません"));
        }

        if !allowed_file(&filename) {
            return Err(ApiError::bad_request(
                "サポートされていないファイル形式です。対応形式: PNG, JPG, JPEG, GIF, BMP, TIFF",
            ));
        }

        // 本文の読み取り（上限超過はここで弾かれる）
        let data = field.bytes().await.map_err(|_| ApiError::too_large())?;

        if data.is_empty() {
            return Err(ApiError::bad_request("空のファイルです"));
        }

        if image::guess_format(&data).is_err() {
            return Err(ApiError::bad_request("画像として認識できないデータです"));
        }

        info!("アップロード受信: {} ({} bytes)", filename, data.len());

        // OCRはブロッキング処理なのでワーカースレッドに逃がす
        let ocr = state.ocr.clone();
        let labels = state.labels.clone();
        let options = state.options.clone();
        let summary = tokio::task::spawn_blocking(move || {
            let provider = ocr.get_or_init()?;
            extractor::extract_stock(&data, provider.as_ref(), &labels, &options)
        })
        .await
        .map_err(|e| {
            error!("抽出タスクの実行に失敗: {}", e);
            ApiError {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: "サーバー内部エラーが発生しました".into(),
            }
        })?
        .map_err(|e| {
            error!("抽出失敗: {}", e);
            ApiError::from(e)
        })?;

        info!("OCR処理完了: {}個のアイテムを検出", summary.len());

        return Ok(Json(ScanResponse {
            success: true,
            count: summary.len(),
            data: summary,
        }));
    }

    Err(ApiError::bad_request("ファイルがありません"))
}
