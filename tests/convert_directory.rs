//! バッチ変換の結合テスト
//!
//! 実際のディレクトリツリーを一時フォルダに作り、`workflow` を通して
//! ファイルシステムの最終状態を検証します。

use srt_recode::config::{ConvertOptions, ReplacePolicy};
use srt_recode::domain::conversion_job::ConversionJob;
use srt_recode::domain::subtitle_finder::find_subtitle_files;
use srt_recode::domain::subtitle_text::LINE_SEPARATOR;
use srt_recode::error::AppError;
use srt_recode::workflow::{self, convert_file, FileOutcome};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

/// ディレクトリ配下の全ファイルを (相対パス, 中身) の組で返す
fn snapshot(root: &Path) -> Vec<(PathBuf, Vec<u8>)> {
    let mut files: Vec<(PathBuf, Vec<u8>)> = walkdir_files(root)
        .into_iter()
        .map(|p| {
            let content = fs::read(&p).unwrap();
            (p.strip_prefix(root).unwrap().to_path_buf(), content)
        })
        .collect();
    files.sort();
    files
}

fn walkdir_files(dir: &Path) -> Vec<PathBuf> {
    let mut out = Vec::new();
    for entry in fs::read_dir(dir).unwrap() {
        let path = entry.unwrap().path();
        if path.is_dir() {
            out.extend(walkdir_files(&path));
        } else {
            out.push(path);
        }
    }
    out
}

fn lines(parts: &[&str]) -> String {
    parts
        .iter()
        .map(|p| format!("{}{}", p, LINE_SEPARATOR))
        .collect()
}

#[test]
fn test_tree_without_subtitles_is_untouched() {
    let dir = tempdir().expect("Failed to create temp directory");
    let root = dir.path();
    fs::create_dir_all(root.join("a").join("b")).unwrap();
    fs::write(root.join("readme.txt"), "hello\r\n").unwrap();
    fs::write(root.join("a").join("b").join("movie.mkv"), [0u8, 1, 2]).unwrap();
    fs::write(root.join("a").join("upper.SRT"), "1\r\n").unwrap();

    let before = snapshot(root);
    assert!(find_subtitle_files(root, ".srt").unwrap().is_empty());

    workflow::convert_to_encoding(root, None);

    assert_eq!(snapshot(root), before);
}

#[test]
fn test_scenario_root_with_one_subtitle_and_a_text_file() {
    let dir = tempdir().expect("Failed to create temp directory");
    let root = dir.path().join("root");
    fs::create_dir_all(root.join("sub")).unwrap();
    fs::write(root.join("a.srt"), "1\n2").unwrap();
    fs::write(root.join("sub").join("b.txt"), "keep me\r\n").unwrap();

    let found = find_subtitle_files(&root, ".srt").unwrap();
    assert_eq!(found, vec![root.join("a.srt")]);

    workflow::convert_to_encoding(&root, None);

    let converted = fs::read(root.join("a.srt")).unwrap();
    assert_eq!(converted, lines(&["1", "2"]).into_bytes());
    assert!(String::from_utf8(converted).is_ok());
    assert!(!root.join("converted-a.srt").exists());
    assert_eq!(
        fs::read_to_string(root.join("sub").join("b.txt")).unwrap(),
        "keep me\r\n"
    );
}

#[test]
fn test_every_subtitle_at_any_depth_is_converted() {
    let dir = tempdir().expect("Failed to create temp directory");
    let root = dir.path();
    let deep = root.join("s1").join("e1").join("extras");
    fs::create_dir_all(&deep).unwrap();
    let files = [
        root.join("top.srt"),
        root.join("s1").join("mid.srt"),
        deep.join("deep.srt"),
    ];
    for f in &files {
        fs::write(f, "1\r\n00:00:01,000 --> 00:00:02,000\r\nこんにちは\r\n").unwrap();
    }

    let options = ConvertOptions::new(root).with_encoding(Some("UTF-8"));
    workflow::run(&options);

    let expected = lines(&["1", "00:00:01,000 --> 00:00:02,000", "こんにちは"]);
    for f in &files {
        assert_eq!(fs::read_to_string(f).unwrap(), expected);
    }
    // 一時ファイルは1つも残らない
    assert!(snapshot(root)
        .iter()
        .all(|(p, _)| !p.to_string_lossy().contains("converted-")));
}

#[test]
fn test_utf8_round_trip_preserves_content() {
    let dir = tempdir().expect("Failed to create temp directory");
    let path = dir.path().join("ep.srt");
    let original = lines(&["1", "00:00:01,000 --> 00:00:04,000", "Ünïcödé – 字幕 🎬", ""]);
    fs::write(&path, &original).unwrap();

    workflow::convert_to_encoding(dir.path(), Some("UTF-8"));

    assert_eq!(fs::read_to_string(&path).unwrap(), original);
}

#[test]
fn test_converts_to_shift_jis() {
    let dir = tempdir().expect("Failed to create temp directory");
    let path = dir.path().join("ep.srt");
    fs::write(&path, "あ\n").unwrap();

    workflow::convert_to_encoding(dir.path(), Some("Shift_JIS"));

    let mut expected = vec![0x82, 0xA0];
    expected.extend_from_slice(LINE_SEPARATOR.as_bytes());
    assert_eq!(fs::read(&path).unwrap(), expected);
}

#[test]
fn test_utf16_is_big_endian_with_byte_order_mark() {
    let dir = tempdir().expect("Failed to create temp directory");
    let path = dir.path().join("ep.srt");
    fs::write(&path, "A\n").unwrap();

    workflow::convert_to_encoding(dir.path(), Some("UTF-16"));

    let mut expected = vec![0xFE, 0xFF, 0x00, 0x41];
    for b in LINE_SEPARATOR.bytes() {
        expected.extend_from_slice(&[0x00, b]);
    }
    assert_eq!(fs::read(&path).unwrap(), expected);
}

#[test]
fn test_us_ascii_replaces_unmappable_characters() {
    let dir = tempdir().expect("Failed to create temp directory");
    let path = dir.path().join("ep.srt");
    fs::write(&path, "café あ\n").unwrap();

    workflow::convert_to_encoding(dir.path(), Some("US-ASCII"));

    assert_eq!(fs::read(&path).unwrap(), lines(&["caf? ?"]).into_bytes());
}

#[test]
fn test_converts_to_utf32() {
    let dir = tempdir().expect("Failed to create temp directory");
    let path = dir.path().join("ep.srt");
    fs::write(&path, "あ\n").unwrap();

    workflow::convert_to_encoding(dir.path(), Some("UTF-32"));

    let mut expected = vec![0x00, 0x00, 0x30, 0x42];
    for b in LINE_SEPARATOR.bytes() {
        expected.extend_from_slice(&[0x00, 0x00, 0x00, b]);
    }
    assert_eq!(fs::read(&path).unwrap(), expected);
    assert!(!dir.path().join("converted-ep.srt").exists());
}

/// 走査の途中で失敗した場合は、見つかっていたファイルも含めて1つも変換しない
#[cfg(unix)]
#[test]
fn test_traversal_failure_converts_nothing() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().expect("Failed to create temp directory");
    let root = dir.path();
    fs::write(root.join("a.srt"), "1\r\n").unwrap();
    let locked = root.join("locked");
    fs::create_dir(&locked).unwrap();
    fs::write(locked.join("b.srt"), "2\r\n").unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    // root 権限では権限に関係なく読めてしまうので確認できない
    if fs::read_dir(&locked).is_ok() {
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let found = find_subtitle_files(root, ".srt");
    workflow::convert_to_encoding(root, Some("UTF-16"));
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

    assert!(matches!(found, Err(AppError::Walk(_))));
    assert_eq!(fs::read(root.join("a.srt")).unwrap(), b"1\r\n");
    assert_eq!(fs::read(locked.join("b.srt")).unwrap(), b"2\r\n");
    assert!(!root.join("converted-a.srt").exists());
}

#[test]
fn test_deleted_source_fails_without_affecting_others() {
    let dir = tempdir().expect("Failed to create temp directory");
    let root = dir.path();
    fs::write(root.join("a.srt"), "a\n").unwrap();
    fs::write(root.join("b.srt"), "b\n").unwrap();

    let found = find_subtitle_files(root, ".srt").unwrap();
    assert_eq!(found.len(), 2);

    // 検索後、変換前に片方を削除する
    fs::remove_file(root.join("a.srt")).unwrap();

    let outcomes: Vec<FileOutcome> = found
        .into_iter()
        .map(|p| convert_file(&ConversionJob::new(p, "UTF-8"), ReplacePolicy::Always))
        .collect();

    assert!(outcomes.contains(&FileOutcome::ReadFailed));
    assert!(outcomes.contains(&FileOutcome::Replaced { write_ok: true }));
    assert!(!root.join("a.srt").exists());
    assert!(!root.join("converted-a.srt").exists());
    assert_eq!(fs::read_to_string(root.join("b.srt")).unwrap(), lines(&["b"]));
}

#[test]
fn test_unsupported_encoding_empties_every_subtitle() {
    let dir = tempdir().expect("Failed to create temp directory");
    let root = dir.path();
    fs::create_dir(root.join("sub")).unwrap();
    fs::write(root.join("a.srt"), "1\n2\n").unwrap();
    fs::write(root.join("sub").join("b.srt"), "3\n").unwrap();
    fs::write(root.join("c.txt"), "untouched").unwrap();

    workflow::convert_to_encoding(root, Some("definitely-not-an-encoding"));

    // 書き込みは失敗するが、置き換えは実行されるため空のファイルが残る
    assert_eq!(fs::metadata(root.join("a.srt")).unwrap().len(), 0);
    assert_eq!(fs::metadata(root.join("sub").join("b.srt")).unwrap().len(), 0);
    assert!(!root.join("converted-a.srt").exists());
    assert!(!root.join("sub").join("converted-b.srt").exists());
    assert_eq!(fs::read_to_string(root.join("c.txt")).unwrap(), "untouched");
}

#[test]
fn test_on_write_success_policy_preserves_originals() {
    let dir = tempdir().expect("Failed to create temp directory");
    let root = dir.path();
    fs::write(root.join("a.srt"), "1\n2\n").unwrap();

    let options = ConvertOptions::new(root)
        .with_encoding(Some("definitely-not-an-encoding"))
        .with_replace_policy(ReplacePolicy::OnWriteSuccess);
    workflow::run(&options);

    assert_eq!(fs::read_to_string(root.join("a.srt")).unwrap(), "1\n2\n");
    assert_eq!(fs::metadata(root.join("converted-a.srt")).unwrap().len(), 0);
}

#[test]
fn test_custom_extension_only_touches_matching_files() {
    let dir = tempdir().expect("Failed to create temp directory");
    let root = dir.path();
    fs::write(root.join("a.ass"), "x\r\n").unwrap();
    fs::write(root.join("b.srt"), "y\r\n").unwrap();

    let options = ConvertOptions::new(root).with_extension(".ass");
    workflow::run(&options);

    assert_eq!(fs::read_to_string(root.join("a.ass")).unwrap(), lines(&["x"]));
    assert_eq!(fs::read_to_string(root.join("b.srt")).unwrap(), "y\r\n");
}
