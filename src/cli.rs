use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "stock-ocr")]
#[command(about = "在庫表OCR解析・在庫サマリー抽出ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 在庫表画像を解析して在庫サマリーを出力
    Scan {
        /// 画像ファイルまたはフォルダのパス
        #[arg(required = true)]
        path: PathBuf,

        /// 結果JSONの出力先
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 出力形式 (text/json)
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// ラベルの直後、何個先の断片まで数量を探すか
        #[arg(long, default_value = "5")]
        window: usize,

        /// ラベル表層形を含む断片を数量候補から外す
        #[arg(long)]
        skip_label_fragments: bool,
    },

    /// HTTP APIサーバーを起動
    Serve {
        /// バインドするホスト
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        /// ポート番号
        #[arg(short, long, default_value = "5000")]
        port: u16,
    },

    /// 設定の確認・変更
    Config {
        /// OCRコマンドを設定
        #[arg(long)]
        set_command: Option<String>,

        /// 現在の設定を表示
        #[arg(long)]
        show: bool,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
