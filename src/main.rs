use clap::Parser;
use stock_ocr_rust::{cli, config, error, extractor, ocr, scanner, server};

use cli::{Cli, Commands, OutputFormat};
use config::Config;
use error::{Result, StockOcrError};
use extractor::ExtractOptions;
use ocr::CommandOcrEngine;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Scan {
            path,
            output,
            format,
            window,
            skip_label_fragments,
        } => {
            println!("📷 stock-ocr - 在庫表解析\n");

            let options = ExtractOptions {
                window,
                skip_label_fragments,
            };
            let labels = config.label_dictionary();
            let engine = CommandOcrEngine::new(&config.ocr_command, config.languages.clone());

            // 1. 対象画像の収集
            println!("[1/2] 画像を収集中...");
            let images = if path.is_dir() {
                let images = scanner::scan_folder(&path)?;
                if images.is_empty() {
                    return Err(StockOcrError::NoImagesFound(path.display().to_string()));
                }
                images
            } else {
                if !path.exists() {
                    return Err(StockOcrError::FileNotFound(path.display().to_string()));
                }
                let file_name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_default();
                vec![scanner::ImageInfo { path, file_name }]
            };
            println!("✔ {}枚の画像を検出\n", images.len());

            // 2. OCR解析と在庫抽出
            println!("[2/2] OCR解析中...");
            let mut all_results = serde_json::Map::new();
            for image in &images {
                let data = std::fs::read(&image.path)?;
                let summary = extractor::extract_stock(&data, &engine, &labels, &options)?;

                if cli.verbose {
                    println!("  {}: {}個のアイテムを検出", image.file_name, summary.len());
                }

                if matches!(format, OutputFormat::Text) {
                    println!("\n--- {} ---", image.file_name);
                    println!("{}", extractor::render_report(&summary));
                }

                all_results.insert(image.file_name.clone(), serde_json::to_value(&summary)?);
            }

            if matches!(format, OutputFormat::Json) {
                println!("{}", serde_json::to_string_pretty(&all_results)?);
            }

            if let Some(output_path) = output {
                let json = serde_json::to_string_pretty(&all_results)?;
                std::fs::write(&output_path, json)?;
                println!("\n✔ 結果を保存: {}", output_path.display());
            }

            println!("\n✅ 解析完了");
        }

        Commands::Serve { host, port } => {
            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| "info".into()),
                )
                .init();

            let addr = format!("{}:{}", host, port)
                .parse()
                .map_err(|e| StockOcrError::Config(format!("バインド先が不正です: {}", e)))?;

            let state = server::AppState::from_config(&config);
            server::start_server(addr, state).await?;
        }

        Commands::Config { set_command, show } => {
            let mut config = config;

            if let Some(command) = set_command {
                config.set_ocr_command(command)?;
                println!("✔ OCRコマンドを設定しました");
            }

            if show {
                println!("設定:");
                println!("  OCRコマンド: {}", config.ocr_command);
                println!("  言語: {}", config.languages.join(", "));
                println!(
                    "  アップロード上限: {}MB",
                    config.max_upload_bytes / (1024 * 1024)
                );
                println!("  ラベル辞書 ({}件):", config.labels.len());
                for entry in &config.labels {
                    println!("    {} → {}", entry.surface, entry.canonical);
                }
            }
        }
    }

    Ok(())
}
