//! 変換処理の設定値を定義するモジュール。

use std::path::PathBuf;

/// エンコーディングが指定されなかった場合に使用するラベル。
pub const DEFAULT_ENCODING: &str = "UTF-8";

/// 変換対象とみなすファイルパスの末尾です (大文字小文字を区別します)。
pub const DEFAULT_EXTENSION: &str = ".srt";

/// 変換中の一時ファイル名に付ける接頭辞。
pub const CONVERTED_PREFIX: &str = "converted-";

/// 書き込みフェーズの後に、元ファイルを置き換えるかどうかの方針。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ReplacePolicy {
    /// 書き込みの成否に関わらず、元ファイルを削除して変換後のファイルで置き換えます。
    ///
    /// 書き込みに失敗した場合、空または途中までのファイルが元のパスに残ります。
    #[default]
    Always,
    /// 書き込みが成功した場合にのみ置き換えます。
    OnWriteSuccess,
}

impl ReplacePolicy {
    pub fn should_replace(self, write_ok: bool) -> bool {
        match self {
            ReplacePolicy::Always => true,
            ReplacePolicy::OnWriteSuccess => write_ok,
        }
    }
}

/// 1回のバッチ実行に必要な設定。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertOptions {
    pub directory: PathBuf,
    pub encoding: String,
    pub extension: String,
    pub replace_policy: ReplacePolicy,
}

impl ConvertOptions {
    /// 指定ディレクトリに対して、その他はデフォルト値を使う設定を作ります。
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            encoding: DEFAULT_ENCODING.to_string(),
            extension: DEFAULT_EXTENSION.to_string(),
            replace_policy: ReplacePolicy::default(),
        }
    }

    /// エンコーディングを設定します。`None` や空文字列の場合は `DEFAULT_ENCODING` を使います。
    pub fn with_encoding(mut self, encoding: Option<&str>) -> Self {
        self.encoding = resolve_encoding_label(encoding).to_string();
        self
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn with_replace_policy(mut self, policy: ReplacePolicy) -> Self {
        self.replace_policy = policy;
        self
    }
}

/// 空または未指定のラベルを `DEFAULT_ENCODING` に置き換えます。
pub fn resolve_encoding_label(encoding: Option<&str>) -> &str {
    match encoding.map(str::trim) {
        Some(label) if !label.is_empty() => label,
        _ => DEFAULT_ENCODING,
    }
}
