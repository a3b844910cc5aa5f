//! 変換後ファイルの書き込みフェーズ。

use crate::domain::conversion_job::ConversionJob;
use crate::domain::subtitle_text::SubtitleText;
use crate::domain::target_encoding::TargetEncoding;
use crate::error::{CloseError, WriteError};
use std::fs::File;
use std::io::{BufWriter, Write};
use tracing::{debug, error, info, warn};

/// `job.target()` にファイルを作成し、`text` を `job.encoding()` で書き込みます。
///
/// 処理順は「ファイル作成 → エンコーディング解決 → 一括書き込み → クローズ」です。
/// そのため、エンコーディングが未対応の場合でも空のファイルが作成された状態で
/// `WriteError::UnsupportedEncoding` を返します。途中で失敗したファイルは削除しません。
///
/// 小さな内容はバッファに留まり、実際の書き込みはクローズ時のフラッシュで行われるため、
/// クローズの失敗も `WriteError::Close` として返します (ログにも出力します)。
pub fn write_converted(job: &ConversionJob, text: &SubtitleText) -> Result<(), WriteError> {
    let target = job.target();
    info!(
        path = %target.display(),
        encoding = job.encoding(),
        "変換後のファイルに書き込みます"
    );

    let file = File::create(target).map_err(|e| WriteError::from_io(target, e))?;
    let file = write_buffered(file, job, text)?;

    file.sync_all().map_err(|source| {
        let e = CloseError {
            path: target.to_path_buf(),
            source,
        };
        error!(path = %target.display(), error = %e.source, "{}", e);
        WriteError::Close(e)
    })
}

/// バッファ付きで書き込み、フラッシュ済みの中身を返します。
///
/// 書き込みとフラッシュの両方が失敗した場合は、先に起きた書き込みのエラーを返し、
/// フラッシュのエラーはログにのみ出力します。
fn write_buffered<W: Write>(
    inner: W,
    job: &ConversionJob,
    text: &SubtitleText,
) -> Result<W, WriteError> {
    let target = job.target();
    let mut writer = BufWriter::new(inner);
    let written = write_encoded(&mut writer, job, text);

    // 書き込みの成否に関わらずバッファは吐き出す
    let flushed = writer.into_inner().map_err(|e| CloseError {
        path: target.to_path_buf(),
        source: e.into_error(),
    });

    match (written, flushed) {
        (Ok(()), Ok(inner)) => Ok(inner),
        (Ok(()), Err(close)) => {
            error!(path = %target.display(), error = %close.source, "{}", close);
            Err(close.into())
        }
        (Err(e), Ok(_)) => Err(e),
        (Err(e), Err(close)) => {
            error!(path = %target.display(), error = %close.source, "{}", close);
            Err(e)
        }
    }
}

fn write_encoded<W: Write>(
    writer: &mut W,
    job: &ConversionJob,
    text: &SubtitleText,
) -> Result<(), WriteError> {
    let encoding =
        TargetEncoding::for_label(job.encoding()).ok_or_else(|| WriteError::UnsupportedEncoding {
            path: job.target().to_path_buf(),
            label: job.encoding().to_string(),
        })?;

    let encoded = encoding.encode(text.as_str());
    if encoded.had_unmappable {
        warn!(
            path = %job.target().display(),
            encoding = %encoding,
            "表現できない文字を ? に置き換えました"
        );
    }

    writer
        .write_all(&encoded.bytes)
        .map_err(|e| WriteError::from_io(job.target(), e))?;
    debug!(path = %job.target().display(), bytes = encoded.bytes.len(), "書き込みが完了しました");
    Ok(())
}
