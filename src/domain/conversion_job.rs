use crate::config::CONVERTED_PREFIX;
use std::fmt;
use std::path::{Path, PathBuf};

/// 1つの字幕ファイルに対する変換ジョブ。
///
/// 変換後のファイルは元ファイルと同じディレクトリに `converted-<元のファイル名>` として作られ、
/// 置き換えの段階で元のパスへリネームされます。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionJob {
    source: PathBuf,
    target: PathBuf,
    encoding: String,
}

impl ConversionJob {
    pub fn new(source: impl Into<PathBuf>, encoding: impl Into<String>) -> Self {
        let source = source.into();
        let target = converted_path(&source);
        Self {
            source,
            target,
            encoding: encoding.into(),
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    pub fn encoding(&self) -> &str {
        &self.encoding
    }
}

impl fmt::Display for ConversionJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {} ({})", self.source.display(), self.target.display(), self.encoding)
    }
}

/// 元ファイルのパスから、変換中に使う一時ファイルのパスを組み立てます。
fn converted_path(source: &Path) -> PathBuf {
    let mut file_name = std::ffi::OsString::from(CONVERTED_PREFIX);
    if let Some(name) = source.file_name() {
        file_name.push(name);
    }
    source.with_file_name(file_name)
}
