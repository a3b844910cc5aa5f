//! 書き込み先のエンコーディングを解決し、テキストをバイト列に変換するモジュール。
//!
//! ラベルの解決は2段階で行います。
//! 1. `UTF-8` / `US-ASCII` / `ISO-8859-1` / `UTF-16` / `UTF-32` 系の標準的な名前は、
//!    このモジュールの表で解決します (大文字小文字は区別しません)。
//! 2. それ以外は WHATWG の規則 (`encoding_rs::Encoding::for_label`) で解決します。
//!
//! 表現できない文字はすべて `?` に置き換えます。

use encoding_rs::{EncoderResult, Encoding, REPLACEMENT, UTF_16BE, UTF_16LE, UTF_8};
use std::borrow::Cow;
use std::fmt;

/// UTF-16 / UTF-32 のバイト順。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    Big,
    Little,
}

/// 書き込みに使うエンコーディング。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetEncoding {
    Utf8,
    /// 7ビット ASCII。0x80 以上の文字は `?` になります。
    Ascii,
    /// ISO-8859-1。U+0100 以上の文字は `?` になります。
    Latin1,
    /// `bom` が真の場合、先頭にバイト順マークを書き出します。
    Utf16 { order: ByteOrder, bom: bool },
    /// BOM は書き出しません。
    Utf32 { order: ByteOrder },
    /// `encoding_rs` に任せるエンコーディング (Shift_JIS, windows-1252 など)。
    Legacy(&'static Encoding),
}

/// エンコード結果。
#[derive(Debug)]
pub struct Encoded<'a> {
    pub bytes: Cow<'a, [u8]>,
    /// 対象のエンコーディングで表現できず、`?` に置き換えた文字があったかどうか。
    pub had_unmappable: bool,
}

impl TargetEncoding {
    /// ラベルからエンコーディングを解決します。書き込みに使えない場合は `None` を返します。
    pub fn for_label(label: &str) -> Option<Self> {
        if let Some(encoding) = Self::standard(label) {
            return Some(encoding);
        }

        let encoding = Encoding::for_label(label.as_bytes())?;
        let resolved = if encoding == REPLACEMENT {
            // `replacement` はデコード専用で、書き込み先としては意味を持ちません
            return None;
        } else if encoding == UTF_8 {
            TargetEncoding::Utf8
        } else if encoding == UTF_16BE {
            TargetEncoding::Utf16 { order: ByteOrder::Big, bom: false }
        } else if encoding == UTF_16LE {
            TargetEncoding::Utf16 { order: ByteOrder::Little, bom: false }
        } else {
            TargetEncoding::Legacy(encoding)
        };
        Some(resolved)
    }

    /// 標準的な名前と別名の表。
    fn standard(label: &str) -> Option<Self> {
        let lower = label.to_ascii_lowercase();
        let encoding = match lower.as_str() {
            "utf-8" | "utf8" | "unicode-1-1-utf-8" => TargetEncoding::Utf8,
            "us-ascii" | "ascii" | "us" | "iso646-us" | "iso-646-us" | "646" | "ascii7"
            | "cp367" | "ibm367" | "csascii" | "default" | "iso-ir-6" | "ansi_x3.4-1968"
            | "ansi_x3.4-1986" | "iso_646.irv:1983" => TargetEncoding::Ascii,
            "iso-8859-1" | "iso8859-1" | "iso8859_1" | "iso_8859-1" | "iso_8859_1"
            | "iso_8859-1:1987" | "8859_1" | "latin1" | "l1" | "ibm819" | "ibm-819" | "cp819"
            | "819" | "csisolatin1" | "iso-ir-100" => TargetEncoding::Latin1,
            "utf-16" | "utf_16" | "utf16" | "unicode" | "unicodebig" => TargetEncoding::Utf16 {
                order: ByteOrder::Big,
                bom: true,
            },
            "utf-16be" | "utf_16be" | "x-utf-16be" | "iso-10646-ucs-2" | "unicodebigunmarked" => {
                TargetEncoding::Utf16 { order: ByteOrder::Big, bom: false }
            }
            "utf-16le" | "utf_16le" | "x-utf-16le" | "unicodelittleunmarked" => {
                TargetEncoding::Utf16 { order: ByteOrder::Little, bom: false }
            }
            "x-utf-16le-bom" | "unicodelittle" => TargetEncoding::Utf16 {
                order: ByteOrder::Little,
                bom: true,
            },
            "utf-32" | "utf_32" | "utf32" | "utf-32be" | "utf_32be" | "x-utf-32be" => {
                TargetEncoding::Utf32 { order: ByteOrder::Big }
            }
            "utf-32le" | "utf_32le" | "x-utf-32le" => TargetEncoding::Utf32 {
                order: ByteOrder::Little,
            },
            _ => return None,
        };
        Some(encoding)
    }

    /// 正式名を返します。
    pub fn name(&self) -> &'static str {
        match self {
            TargetEncoding::Utf8 => "UTF-8",
            TargetEncoding::Ascii => "US-ASCII",
            TargetEncoding::Latin1 => "ISO-8859-1",
            TargetEncoding::Utf16 { order: ByteOrder::Big, bom: true } => "UTF-16",
            TargetEncoding::Utf16 { order: ByteOrder::Big, bom: false } => "UTF-16BE",
            TargetEncoding::Utf16 { order: ByteOrder::Little, bom: false } => "UTF-16LE",
            TargetEncoding::Utf16 { order: ByteOrder::Little, bom: true } => "x-UTF-16LE-BOM",
            TargetEncoding::Utf32 { order: ByteOrder::Big } => "UTF-32BE",
            TargetEncoding::Utf32 { order: ByteOrder::Little } => "UTF-32LE",
            TargetEncoding::Legacy(encoding) => encoding.name(),
        }
    }

    /// テキスト全体をエンコードします。
    pub fn encode<'a>(&self, text: &'a str) -> Encoded<'a> {
        match *self {
            TargetEncoding::Utf8 => Encoded {
                bytes: Cow::Borrowed(text.as_bytes()),
                had_unmappable: false,
            },
            TargetEncoding::Ascii => encode_single_byte(text, 0x7F),
            TargetEncoding::Latin1 => encode_single_byte(text, 0xFF),
            TargetEncoding::Utf16 { order, bom } => {
                let mut bytes = Vec::with_capacity(text.len() * 2 + 2);
                if bom {
                    push_unit(&mut bytes, 0xFEFF, order);
                }
                for unit in text.encode_utf16() {
                    push_unit(&mut bytes, unit, order);
                }
                Encoded {
                    bytes: Cow::Owned(bytes),
                    had_unmappable: false,
                }
            }
            TargetEncoding::Utf32 { order } => {
                let mut bytes = Vec::with_capacity(text.len() * 4);
                for c in text.chars() {
                    let unit = c as u32;
                    match order {
                        ByteOrder::Big => bytes.extend_from_slice(&unit.to_be_bytes()),
                        ByteOrder::Little => bytes.extend_from_slice(&unit.to_le_bytes()),
                    }
                }
                Encoded {
                    bytes: Cow::Owned(bytes),
                    had_unmappable: false,
                }
            }
            TargetEncoding::Legacy(encoding) => encode_legacy(encoding, text),
        }
    }
}

impl fmt::Display for TargetEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn push_unit(bytes: &mut Vec<u8>, unit: u16, order: ByteOrder) {
    match order {
        ByteOrder::Big => bytes.extend_from_slice(&unit.to_be_bytes()),
        ByteOrder::Little => bytes.extend_from_slice(&unit.to_le_bytes()),
    }
}

/// 1文字1バイトのエンコーディング。`max` を超える文字は `?` に置き換えます。
fn encode_single_byte(text: &str, max: u32) -> Encoded<'_> {
    let mut had_unmappable = false;
    let bytes: Vec<u8> = text
        .chars()
        .map(|c| match u8::try_from(c as u32) {
            Ok(b) if u32::from(b) <= max => b,
            _ => {
                had_unmappable = true;
                b'?'
            }
        })
        .collect();
    Encoded {
        bytes: Cow::Owned(bytes),
        had_unmappable,
    }
}

/// `encoding_rs` のエンコーダで変換し、表現できない文字は `?` に置き換えます。
///
/// `?` もエンコーダを通して書き出すため、ISO-2022-JP のような状態を持つ
/// エンコーディングでも ASCII への切り替えが正しく行われます。
fn encode_legacy<'a>(encoding: &'static Encoding, text: &'a str) -> Encoded<'a> {
    let mut encoder = encoding.new_encoder();
    let mut bytes = Vec::with_capacity(text.len());
    let mut had_unmappable = false;
    let mut pending = text;

    loop {
        let (result, read) = encode_chunk(&mut encoder, pending, &mut bytes, false);
        pending = &pending[read..];
        match result {
            EncoderResult::Unmappable(_) => {
                had_unmappable = true;
                encode_chunk(&mut encoder, "?", &mut bytes, false);
            }
            _ => break,
        }
    }
    // 状態を持つエンコーディングを初期状態に戻す
    encode_chunk(&mut encoder, "", &mut bytes, true);

    Encoded {
        bytes: Cow::Owned(bytes),
        had_unmappable,
    }
}

/// 出力バッファを確保しながら `src` をエンコードします。
/// 戻り値は `InputEmpty` か `Unmappable` のどちらかと、読み進めたバイト数です。
fn encode_chunk(
    encoder: &mut encoding_rs::Encoder,
    src: &str,
    dst: &mut Vec<u8>,
    last: bool,
) -> (EncoderResult, usize) {
    let mut total = 0;
    loop {
        let rest = &src[total..];
        let needed = encoder
            .max_buffer_length_from_utf8_without_replacement(rest.len())
            .unwrap_or(rest.len() * 4 + 16);
        dst.reserve(needed);
        let (result, read) = encoder.encode_from_utf8_to_vec_without_replacement(rest, dst, last);
        total += read;
        if !matches!(result, EncoderResult::OutputFull) {
            return (result, total);
        }
    }
}
