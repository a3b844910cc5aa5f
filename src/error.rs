use crate::domain::input_source::path_error::PathError;
use std::path::PathBuf;
use thiserror::Error;

/// バッチ全体に関わるエラー。
///
/// ファイル単位のエラー (`ReadError` / `WriteError` / `CloseError`) はログに変換され、
/// ここまで伝播することはありません。
#[derive(Debug, Error)]
pub enum AppError {
    #[error("パス関連のエラー: {0}")]
    Path(#[from] PathError),

    #[error("ディレクトリの走査中にエラーが発生しました: {0}")]
    Walk(#[from] walkdir::Error),
}

/// 読み込みフェーズのエラー。
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("ファイル '{}' が存在しません", .path.display())]
    NotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("ファイル '{}' の読み込み中に問題が発生しました", .path.display())]
    IoFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ReadError {
    /// `io::Error` の種類に応じて `NotFound` か `IoFailure` に振り分けます。
    pub fn from_io(path: &std::path::Path, source: std::io::Error) -> Self {
        let path = path.to_path_buf();
        match source.kind() {
            std::io::ErrorKind::NotFound => ReadError::NotFound { path, source },
            _ => ReadError::IoFailure { path, source },
        }
    }
}

/// 書き込みフェーズのエラー。
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("エンコーディング '{}' でファイル '{}' に書き込めません", .label, .path.display())]
    UnsupportedEncoding { path: PathBuf, label: String },

    #[error("ファイル '{}' の出力先が見つかりません", .path.display())]
    NotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("ファイル '{}' への書き込み中に問題が発生しました", .path.display())]
    IoFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// フラッシュまたは同期の失敗。内容がディスクに届いていない可能性があります。
    #[error(transparent)]
    Close(#[from] CloseError),
}

impl WriteError {
    /// `io::Error` の種類に応じて `NotFound` か `IoFailure` に振り分けます。
    pub fn from_io(path: &std::path::Path, source: std::io::Error) -> Self {
        let path = path.to_path_buf();
        match source.kind() {
            std::io::ErrorKind::NotFound => WriteError::NotFound { path, source },
            _ => WriteError::IoFailure { path, source },
        }
    }
}

/// ファイルハンドルの解放 (フラッシュ・同期) に失敗したことを表します。
#[derive(Debug, Error)]
#[error("ファイル '{}' のクローズに失敗しました", .path.display())]
pub struct CloseError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}
