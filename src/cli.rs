use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "safety-ai")]
#[command(about = "職場写真AI安全点検ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 写真を解析して安全レポートを出力
    Analyze {
        /// 写真ファイルのパス
        #[arg(required = true)]
        image: PathBuf,

        /// 解析モード (kitchen/warehouse/office、未知の値はkitchen)
        #[arg(short, long, default_value = "kitchen")]
        mode: String,

        /// 結果JSONの出力先
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 履歴に保存しない
        #[arg(long)]
        no_history: bool,

        /// 履歴にサムネイルを埋め込まない
        #[arg(long)]
        no_thumbnail: bool,
    },

    /// 解析HTTPサーバを起動
    Serve {
        /// 待ち受けアドレス
        #[arg(short, long, default_value = "127.0.0.1:8787")]
        addr: String,
    },

    /// 設定を表示/編集
    Config {
        /// APIキーを設定
        #[arg(long)]
        set_api_key: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },

    /// 解析履歴の表示・再表示・削除
    History {
        /// IDを指定して過去の結果を再表示
        #[arg(long)]
        show: Option<String>,

        /// 履歴を全削除
        #[arg(long)]
        clear: bool,
    },

    /// 本日の残り解析回数を表示
    Quota,
}
