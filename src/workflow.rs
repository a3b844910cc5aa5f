//! 字幕ファイル変換のメインワークフローを定義するモジュール。
//!
//! 検索 (`subtitle_finder`) で対象ファイルをすべて集めてから、
//! 1ファイルずつ「読み込み → 書き込み → 置き換え」を順番に実行します。
//! ファイル単位のエラーはすべてログに変換され、バッチ全体は常に最後まで進みます。

use crate::config::{ConvertOptions, ReplacePolicy};
use crate::domain::conversion_job::ConversionJob;
use crate::domain::converted_file::write_converted;
use crate::domain::replace::replace_original;
use crate::domain::subtitle_finder::find_subtitle_files;
use crate::domain::subtitle_text::SubtitleText;
use std::path::Path;
use tracing::{error, info, warn};

/// 1ファイル分の変換結果。ログとテストのためだけに使います。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOutcome {
    /// 読み込みに失敗したため、何も変更していません。
    ReadFailed,
    /// 元ファイルを変換後のファイルで置き換えました。`write_ok` が偽の場合、中身は空または途中までです。
    Replaced { write_ok: bool },
    /// 書き込みに失敗し、方針に従って元ファイルを残しました。
    Kept,
}

/// `directory` 配下の字幕ファイルを `encoding` (省略時は UTF-8) に変換します。
pub fn convert_to_encoding(directory: impl AsRef<Path>, encoding: Option<&str>) {
    let options = ConvertOptions::new(directory.as_ref()).with_encoding(encoding);
    run(&options);
}

/// 設定に従ってバッチ処理を実行します。
///
/// 戻り値はありません。個々のファイルの成否は、ログと最終的なファイルの状態でのみ確認できます。
pub fn run(options: &ConvertOptions) {
    info!(
        path = %options.directory.display(),
        encoding = %options.encoding,
        "字幕ファイルの変換を開始します"
    );

    match find_subtitle_files(&options.directory, &options.extension) {
        Ok(files) if files.is_empty() => {
            info!("字幕ファイルが見つかりませんでした");
        }
        Ok(files) => {
            info!(count = files.len(), "変換対象のファイルが見つかりました");
            for source in files {
                let job = ConversionJob::new(source, options.encoding.as_str());
                convert_file(&job, options.replace_policy);
            }
        }
        Err(e) => {
            // 走査の途中で失敗した場合は、1ファイルも変換しない
            error!(path = %options.directory.display(), "{}", e);
        }
    }

    info!(path = %options.directory.display(), "変換処理が完了しました");
}

/// 1つのジョブについて「読み込み → 書き込み → 置き換え」を実行します。
///
/// 読み込みに失敗した場合は、書き込みも置き換えも行いません。
/// 書き込み (フラッシュ・同期を含む) に失敗した場合に置き換えるかどうかは `policy` で決まります。
pub fn convert_file(job: &ConversionJob, policy: ReplacePolicy) -> FileOutcome {
    info!(job = %job, "ファイルを変換します");

    let text = match SubtitleText::read(job.source()) {
        Ok(text) => text,
        Err(e) => {
            error!(error = ?e, "{}", e);
            return FileOutcome::ReadFailed;
        }
    };

    let write_ok = match write_converted(job, &text) {
        Ok(()) => true,
        Err(e) => {
            error!(error = ?e, "{}", e);
            false
        }
    };

    if policy.should_replace(write_ok) {
        replace_original(job);
        FileOutcome::Replaced { write_ok }
    } else {
        warn!(
            path = %job.source().display(),
            target = %job.target().display(),
            "書き込みに失敗したため、元ファイルを残します"
        );
        FileOutcome::Kept
    }
}
