//! 字幕ファイルを再帰的に検索するモジュール。

use crate::domain::input_source::directory_path::DirectoryPath;
use crate::domain::input_source::path_error::PathError;
use crate::error::AppError;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

/// `root` 配下から、パスが `extension` で終わる通常ファイルをすべて集めます。
///
/// # 戻り値
/// * `Ok(Vec<PathBuf>)`: 見つかったファイルの絶対パス。順序はファイルシステムの列挙順です。
///   `root` が存在しない、またはディレクトリでない場合は空のリストを返します (エラーログのみ出力します)。
/// * `Err(AppError::Walk)`: サブディレクトリの走査に失敗した場合。途中までの結果は捨てます。
pub fn find_subtitle_files(root: &Path, extension: &str) -> Result<Vec<PathBuf>, AppError> {
    info!(path = %root.display(), "ディレクトリの監視を試みます");

    let dir = match DirectoryPath::new(root) {
        Ok(dir) => dir,
        Err(e @ (PathError::NotFound(_) | PathError::NotADirectory(_))) => {
            error!(path = %root.display(), "{}", e);
            return Ok(Vec::new());
        }
        Err(e) => return Err(e.into()),
    };

    debug!(path = %dir, extension, "字幕ファイルを再帰的に検索します");
    let mut found = Vec::new();
    for entry_result in dir.walk() {
        let entry = entry_result?;
        let path = entry.path();

        // ディレクトリは走査するだけで、結果には含めない
        if entry.file_type().is_dir() {
            debug!(path = %path.display(), "ディレクトリ内を検索中");
            continue;
        }

        if is_subtitle_file(path, extension) {
            info!(path = %path.display(), "ファイルを発見しました");
            found.push(path.to_path_buf());
        }
    }

    Ok(found)
}

/// パスが通常ファイルで、かつ末尾が `extension` と一致するか判定します。
///
/// 大文字小文字は区別します (`.SRT` は対象外です)。
pub fn is_subtitle_file(path: &Path, extension: &str) -> bool {
    path.is_file() && path.as_os_str().to_string_lossy().ends_with(extension)
}
