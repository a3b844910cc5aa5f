mod cli;

use clap::Parser;
use cli::Args;
use srt_recode::config::ConvertOptions;
use srt_recode::workflow;

fn main() {
    // コマンドライン引数を解析します
    let args = Args::parse();

    init_logging(args.verbose);

    // バッチは個々のファイルの失敗に関わらず最後まで実行され、終了コードは常に 0
    let options = ConvertOptions::from(args);
    workflow::run(&options);
}

/// tracing によるログ出力を初期化します。`RUST_LOG` が設定されていればそちらを優先します。
fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "srt_recode=debug"
    } else {
        "srt_recode=info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}
