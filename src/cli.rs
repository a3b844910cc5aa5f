use clap::Parser;
use srt_recode::config::{ConvertOptions, ReplacePolicy, DEFAULT_ENCODING, DEFAULT_EXTENSION};
use std::path::PathBuf;

/// 指定されたフォルダ配下の字幕ファイルを、指定したエンコーディングで書き直すツール
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// 字幕ファイルを再帰的に検索するフォルダのパス
    #[arg(required = true)]
    pub directory: PathBuf,

    /// 書き込みに使うエンコーディング (空文字列の場合も UTF-8)
    #[arg(short, long, default_value = DEFAULT_ENCODING)]
    pub encoding: String,

    /// 変換対象とするファイルパスの末尾 (大文字小文字を区別)
    #[arg(long, default_value = DEFAULT_EXTENSION)]
    pub extension: String,

    /// 書き込みに失敗した場合にも元ファイルを置き換えるかどうか
    #[arg(long, value_enum, default_value_t = ReplacePolicy::Always)]
    pub replace_policy: ReplacePolicy,

    /// デバッグレベルのログを出力します
    #[arg(short, long)]
    pub verbose: bool,
}

impl From<Args> for ConvertOptions {
    fn from(args: Args) -> Self {
        ConvertOptions::new(args.directory)
            .with_encoding(Some(args.encoding.as_str()))
            .with_extension(args.extension)
            .with_replace_policy(args.replace_policy)
    }
}
