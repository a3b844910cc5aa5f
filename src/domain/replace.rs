use crate::domain::conversion_job::ConversionJob;
use std::fs;
use tracing::{debug, warn};

/// 元ファイルを削除し、変換後のファイルを元のパスへリネームします。
///
/// どちらの操作も結果を検証せず、失敗してもロールバックしません (警告ログのみ出力します)。
/// 削除を先に行うのは、リネーム先が存在すると失敗するプラットフォームがあるためです。
pub fn replace_original(job: &ConversionJob) {
    if let Err(e) = fs::remove_file(job.source()) {
        warn!(path = %job.source().display(), error = %e, "元ファイルの削除に失敗しました");
    }

    match fs::rename(job.target(), job.source()) {
        Ok(()) => debug!(
            from = %job.target().display(),
            to = %job.source().display(),
            "変換後のファイルで置き換えました"
        ),
        Err(e) => warn!(
            from = %job.target().display(),
            to = %job.source().display(),
            error = %e,
            "変換後のファイルのリネームに失敗しました"
        ),
    }
}
