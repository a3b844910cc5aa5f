//! ディレクトリ配下の字幕ファイルを指定したエンコーディングで書き直すライブラリ。

pub mod config;
pub mod domain;
pub mod error;
pub mod workflow;
