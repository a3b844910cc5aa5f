use super::path_error::PathError;
use std::fmt;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 走査対象のルートディレクトリを表現する構造体。
///
/// `new` を通じてのみ生成でき、パスが存在するディレクトリであることと、
/// 内部のパスが絶対パスであることが保証されます。
#[derive(Debug)]
pub struct DirectoryPath {
    path: PathBuf,
}

impl DirectoryPath {
    // コンストラクタ: パスを受け取り、バリデーションを行う
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, PathError> {
        let path = path.as_ref();

        // パスが存在し、かつディレクトリであることを検証
        if !path.exists() {
            return Err(PathError::NotFound(path.to_path_buf()));
        }
        if !path.is_dir() {
            return Err(PathError::NotADirectory(path.to_path_buf()));
        }

        // 相対パスで渡された場合でも、結果のパスが絶対パスになるように変換する。
        // シンボリックリンクは解決しない (canonicalize は使わない)。
        let path = std::path::absolute(path)?;

        Ok(Self { path })
    }

    // 内部のPathBufへの参照を返す
    pub fn as_path(&self) -> &Path {
        &self.path
    }

    /// ディレクトリ配下を再帰的に走査するイテレータを返します。
    ///
    /// ルート自身は含めない。並び順はファイルシステムの列挙順のままで、ソートしません。
    /// ディレクトリへのシンボリックリンクは辿りません (循環を避けるため)。
    pub fn walk(&self) -> walkdir::IntoIter {
        WalkDir::new(&self.path)
            .min_depth(1)
            .follow_links(false)
            .into_iter()
    }
}

// Displayトレイトの実装（表示用）
impl fmt::Display for DirectoryPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}
