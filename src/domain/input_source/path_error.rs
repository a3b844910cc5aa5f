use std::path::PathBuf;
use thiserror::Error;

// パス検証時のエラー型を定義
#[derive(Debug, Error)]
pub enum PathError {
    #[error("パス '{}' は存在しません。", .0.display())]
    NotFound(PathBuf),

    #[error("パス '{}' はディレクトリではありません。", .0.display())]
    NotADirectory(PathBuf),

    #[error("I/Oエラー: {0}")]
    Io(#[from] std::io::Error),
}
