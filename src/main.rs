use clap::Parser;
use safety_ai_rust::{analyzer, cli, config, error, media, server, storage, thumbnail, vision};

use chrono::{Local, Utc};
use cli::{Cli, Commands};
use config::Config;
use error::SafetyAiError;
use std::sync::Arc;

use safety_ai_common::{
    append_history, clear_history, find_history, is_quota_available, list_history,
    record_analysis, remaining_quota, AnalysisMode, AnalysisResult, HistoryItem, DAILY_QUOTA,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Analyze {
            image,
            mode,
            output,
            no_history,
            no_thumbnail,
        } => {
            println!("📸 safety-ai - 安全点検\n");

            let mode = AnalysisMode::from_tag(&mode);
            let mut store = storage::FileStore::open_default()?;
            let today = Local::now().format("%Y-%m-%d").to_string();

            // 1. 日次利用チェック（外部呼び出しの前に判定）
            if !is_quota_available(&store, &today)? {
                eprintln!("⚠ 本日の解析上限に達しました");
                return Err(SafetyAiError::QuotaExceeded(DAILY_QUOTA).into());
            }

            // 2. 画像読み込み
            println!("[1/3] 画像を読み込み中...");
            if !image.exists() {
                return Err(SafetyAiError::FileNotFound(image.display().to_string()).into());
            }
            let media_type = media::require_image_media_type(&image)?;
            let bytes = std::fs::read(&image)?;
            let file_name = image
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            println!("✔ {} ({} bytes)\n", file_name, bytes.len());

            let upload = analyzer::ImageUpload {
                bytes,
                media_type: media_type.to_string(),
                file_name,
            };

            // 3. AI解析
            println!("[2/3] AI解析中... (モード: {})", mode);
            let model = vision::OpenAiVision::from_config(&config)?;
            let outcome = analyzer::analyze_image(&model, mode, &upload).await?;
            if cli.verbose {
                println!("  レスポンス長: {} chars", outcome.result.raw.len());
            }
            println!("✔ 解析完了\n");

            print_result(&outcome.result);
            if let Some(note) = &outcome.note {
                println!("⚠ {}\n", note);
            }

            // 4. 記録（成功した解析のみ。失敗時はここまで到達しない）
            println!("[3/3] 結果を記録中...");
            let usage = record_analysis(&mut store, &today)?;
            if cli.verbose {
                println!("  本日の利用: {}/{}", usage.count, DAILY_QUOTA);
            }

            if !no_history {
                let created_at = Utc::now();
                let item = HistoryItem {
                    id: storage::make_history_id(&upload.bytes, &created_at),
                    created_at,
                    mode,
                    result: outcome.result.clone(),
                    image_data: if no_thumbnail {
                        None
                    } else {
                        thumbnail::make_thumbnail(&upload.bytes)
                    },
                };
                let id = item.id.clone();
                append_history(&mut store, item)?;
                println!("✔ 履歴に保存 (id: {})", id);
            }

            if let Some(output) = output {
                let json = serde_json::to_string_pretty(&outcome.result)?;
                std::fs::write(&output, json)?;
                println!("✔ 結果を保存: {}", output.display());
            }

            println!("\n✅ 完了");
        }

        Commands::Serve { addr } => {
            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
                )
                .init();

            let addr: std::net::SocketAddr = addr
                .parse()
                .map_err(|_| SafetyAiError::Config(format!("不正なアドレス: {}", addr)))?;

            let model = vision::OpenAiVision::from_config(&config)?;
            let state = server::ServerState {
                model: Arc::new(model),
            };

            server::start_server(addr, state).await?;
        }

        Commands::Config { set_api_key, show } => {
            let mut config = config;

            if let Some(key) = set_api_key {
                config.set_api_key(key)?;
                println!("✔ APIキーを設定しました");
            }

            if show {
                println!("設定:");
                println!("  モデル: {}", config.model);
                println!("  APIベース: {}", config.api_base);
                println!("  応答トークン上限: {}", config.max_output_tokens);
                println!(
                    "  APIキー: {}",
                    if config.api_key.is_some() {
                        "設定済み"
                    } else {
                        "未設定"
                    }
                );
            }
        }

        Commands::History { show, clear } => {
            let mut store = storage::FileStore::open_default()?;

            if let Some(id) = show {
                let item = find_history(&store, &id)?
                    .ok_or(SafetyAiError::HistoryNotFound(id))?;

                println!("🕐 {} (モード: {})\n", item.created_at, item.mode);
                print_result(&item.result);
            } else if clear {
                let confirmed = dialoguer::Confirm::new()
                    .with_prompt("履歴を全削除しますか？")
                    .default(false)
                    .interact()?;

                if confirmed {
                    clear_history(&mut store)?;
                    println!("✔ 履歴を削除しました");
                }
            } else {
                let items = list_history(&store)?;
                if items.is_empty() {
                    println!("履歴はありません");
                } else {
                    for item in items {
                        println!(
                            "{}  {}  {:9}  [{}]",
                            item.id,
                            item.created_at.format("%Y-%m-%d %H:%M"),
                            item.mode.as_tag(),
                            item.result.risk_level
                        );
                    }
                }
            }
        }

        Commands::Quota => {
            let store = storage::FileStore::open_default()?;
            let today = Local::now().format("%Y-%m-%d").to_string();
            let remaining = remaining_quota(&store, &today)?;
            println!("本日の残り解析回数: {}/{}", remaining, DAILY_QUOTA);
        }
    }

    Ok(())
}

/// 解析結果を整形して表示する
fn print_result(result: &AnalysisResult) {
    println!("── 見えているもの ──");
    println!("{}\n", section_or_placeholder(&result.what_i_see));
    println!("── それが意味すること ──");
    println!("{}\n", section_or_placeholder(&result.what_this_means));
    println!("── 考えられる問題 ──");
    println!("{}\n", section_or_placeholder(&result.possible_issues));
    println!("── 次にできること ──");
    println!("{}\n", section_or_placeholder(&result.what_you_can_do_next));
    println!("リスクレベル: {}\n", result.risk_level);
}

fn section_or_placeholder(text: &str) -> &str {
    if text.is_empty() {
        "(なし)"
    } else {
        text
    }
}
