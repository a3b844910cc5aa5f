//! 字幕ファイルの読み込みフェーズ。
//!
//! ファイル全体をプラットフォーム標準のエンコーディング (UTF-8) でデコードし、
//! 行ごとにプラットフォームの改行コードを付け直したテキストをメモリ上に保持します。

use crate::error::ReadError;
use encoding_rs::{Encoding, UTF_8};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

/// 読み込み時に想定する元ファイルのエンコーディング。
pub const SOURCE_ENCODING: &Encoding = UTF_8;

/// 各行の末尾に付ける改行コード。
#[cfg(windows)]
pub const LINE_SEPARATOR: &str = "\r\n";
#[cfg(not(windows))]
pub const LINE_SEPARATOR: &str = "\n";

/// 読み込み済みの字幕テキスト。改行コードは `LINE_SEPARATOR` に統一されています。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleText(String);

impl SubtitleText {
    /// ファイルを開いてデコードし、`SubtitleText` を作ります。
    ///
    /// # 戻り値
    /// * `Err(ReadError::NotFound)`: ファイルが存在しない場合に返します。
    /// * `Err(ReadError::IoFailure)`: それ以外の I/O エラーの場合に返します。
    pub fn read(path: &Path) -> Result<Self, ReadError> {
        info!(path = %path.display(), "ファイルを読み込みます");
        let mut file = File::open(path).map_err(|e| ReadError::from_io(path, e))?;

        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)
            .map_err(|e| ReadError::from_io(path, e))?;

        let text = Self::from_bytes(&bytes);
        debug!(path = %path.display(), bytes = bytes.len(), "読み込みが完了しました");
        Ok(text)
    }

    /// バイト列をデコードして行を正規化します。
    ///
    /// 不正なバイト列は U+FFFD に置き換え、BOM は取り除かずにそのまま残します。
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let (decoded, _had_errors) = SOURCE_ENCODING.decode_without_bom_handling(bytes);
        Self::from_lines(&decoded)
    }

    /// `\n`・`\r\n`・`\r` のいずれでも行を区切り、各行に `LINE_SEPARATOR` を付け直します。
    pub fn from_lines(text: &str) -> Self {
        let mut buffer = String::with_capacity(text.len());
        for line in split_lines(text) {
            buffer.push_str(line);
            buffer.push_str(LINE_SEPARATOR);
        }
        SubtitleText(buffer)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// 改行コードで行に分割します。末尾の改行の後ろに空行は作りません。
fn split_lines(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut lines = Vec::new();
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\n' => {
                lines.push(&text[start..i]);
                i += 1;
                start = i;
            }
            b'\r' => {
                lines.push(&text[start..i]);
                i += 1;
                if bytes.get(i) == Some(&b'\n') {
                    i += 1;
                }
                start = i;
            }
            _ => i += 1,
        }
    }
    if start < bytes.len() {
        lines.push(&text[start..]);
    }
    lines
}
