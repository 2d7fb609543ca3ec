use clap::{Parser, Subcommand};
use dara_local_common::{Database, StatusFilter};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dara-local")]
#[command(about = "XRD相同定ジョブの投稿・結果閲覧クライアント", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// APIベースURL（例: http://localhost:8899/api）
    #[arg(long, global = true)]
    pub base_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 回折パターンを投稿して相探索ジョブを作成
    Submit {
        /// パターンファイル (.xy/.xrdml/.raw/.xye/.txt/.dat)
        #[arg(required = true)]
        pattern: PathBuf,

        /// 投稿者名（省略時は設定値、無ければ対話入力）
        #[arg(short, long)]
        user: Option<String>,

        /// 化学系（例: Y-Mo-O）
        #[arg(short, long, default_value = "")]
        chemical_system: String,

        /// 必須元素（カンマ・空白区切り）
        #[arg(short, long, default_value = "Y, Mo, O")]
        required: String,

        /// 除外元素（カンマ・空白区切り）
        #[arg(short, long, default_value = "")]
        exclude: String,

        /// 波長（Cu/Co/Cr/Fe/Mo または Å）
        #[arg(short, long, default_value = "Cu")]
        wavelength: String,

        /// 装置プロファイル
        #[arg(short, long, default_value = "Aeris-fds-Pixcel1d-Medipix3")]
        instrument: String,

        /// データベース (COD/ICSD/MP/NONE)
        #[arg(short, long, default_value = "ICSD")]
        database: Database,

        /// 最大相数
        #[arg(short, long, default_value = "200")]
        max_phases: String,

        /// MP: 実験由来の相のみ
        #[arg(long)]
        mp_experimental_only: bool,

        /// MP: E-above-hull 上限 (eV/atom)
        #[arg(long, default_value = "0.1")]
        mp_max_e_above_hull: String,

        /// 追加CIFファイル（複数指定可）
        #[arg(long = "cif")]
        cifs: Vec<PathBuf>,

        /// 旧エンドポイント (/search) に投稿
        #[arg(long)]
        legacy: bool,
    },

    /// ジョブ一覧を表示
    List {
        /// ステータス (ALL/PENDING/RUNNING/COMPLETED/FAILED)
        #[arg(short, long, default_value = "ALL")]
        status: StatusFilter,

        /// 投稿者で絞り込み
        #[arg(short, long)]
        user: Option<String>,

        /// 最大件数
        #[arg(long)]
        limit: Option<u32>,

        /// 開始位置
        #[arg(long)]
        offset: Option<u32>,
    },

    /// ジョブ詳細（診断情報・解候補）を表示
    Show {
        /// ジョブID
        #[arg(required = true)]
        job_id: String,

        /// 取得したJSONをそのまま出力
        #[arg(long)]
        json: bool,
    },

    /// 解候補のレポートZIPを保存
    Download {
        /// ジョブID
        #[arg(required = true)]
        job_id: String,

        /// 解候補番号
        #[arg(required = true)]
        index: u32,

        /// 保存先（省略時: <job_id>_solution_<index>.zip）
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 設定を表示/編集
    Config {
        /// APIベースURLを設定
        #[arg(long)]
        set_base_url: Option<String>,

        /// 既定の投稿者名を設定
        #[arg(long)]
        set_user: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

/// ダウンロードの既定保存先
pub fn default_download_path(job_id: &str, index: u32) -> PathBuf {
    PathBuf::from(format!("{}_solution_{}.zip", job_id, index))
}
