use std::collections::HashMap;
use std::fs::{self, File};

use cjk_analysis::analysis::char_filter::CharFilter;
use cjk_analysis::analysis::char_filter::reader::{CharRead, StrReader, Utf8Reader, read_to_string};
use cjk_analysis::analysis::char_filter::transliterate::TransliterateCharFilter;
use cjk_analysis::analysis::token::Token;
use cjk_analysis::analysis::token_filter::Filter;
use cjk_analysis::analysis::token_filter::cjk_folding::CjkFoldingFilter;
use cjk_analysis::config::{Direction, FoldingConfig, TransformConfig};
use cjk_analysis::error::CjkAnalysisError;
use cjk_analysis::resource::{FsResourceLoader, MemoryResourceLoader};

use tempfile::tempdir;

const SAMPLE_RULES: &str = include_str!("../resources/cjk_transliterations.txt");

fn args(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn fold_one(filter: &CjkFoldingFilter, text: &str) -> String {
    let tokens = vec![Token::new(text, 0)];
    filter
        .filter(Box::new(tokens.into_iter()))
        .unwrap()
        .map(|t| t.text)
        .collect()
}

#[test]
fn test_custom_rules_from_filesystem() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("cjk.txt"), SAMPLE_RULES).unwrap();
    let loader = FsResourceLoader::new(dir.path());

    let config = TransformConfig::from_args(args(&[("id", "cjk.txt")])).unwrap();
    let filter = TransliterateCharFilter::from_config(&config, &loader).unwrap();
    assert_eq!(filter.filter("両").0, "兩");

    let reverse = TransformConfig::from_args(args(&[("id", "cjk.txt"), ("direction", "reverse")]))
        .unwrap();
    let filter = TransliterateCharFilter::from_config(&reverse, &loader).unwrap();
    assert_eq!(filter.filter("兩").0, "両");
}

#[test]
fn test_builtin_transforms_by_id() {
    let loader = MemoryResourceLoader::new();

    let kana = TransliterateCharFilter::from_config(&TransformConfig::new("Katakana-Hiragana"), &loader)
        .unwrap();
    assert_eq!(kana.filter("ヒラガナ").0, "ひらがな");

    let width =
        TransliterateCharFilter::from_config(&TransformConfig::new("Fullwidth-Halfwidth"), &loader)
            .unwrap();
    assert_eq!(width.filter("ＡＢＣ\u{3000}１").0, "ABC 1");

    let reverse = TransformConfig::new("Fullwidth-Halfwidth").with_direction(Direction::Reverse);
    let widen = TransliterateCharFilter::from_config(&reverse, &loader).unwrap();
    assert_eq!(widen.filter("ABC 1").0, "ＡＢＣ\u{3000}１");
}

#[test]
fn test_fullwidth_katakana_stream_to_halfwidth() {
    let loader = MemoryResourceLoader::new();
    let width =
        TransliterateCharFilter::from_config(&TransformConfig::new("Fullwidth-Halfwidth"), &loader)
            .unwrap();

    let mut reader = width.reader(StrReader::new("アルアノリウ"));
    let mut buf = ['\0'; 10];
    let mut output = String::new();
    loop {
        let n = reader.read_chars(&mut buf).unwrap();
        if n == 0 {
            break;
        }
        output.extend(&buf[..n]);
    }
    assert_eq!(output, "ｱﾙｱﾉﾘｳ");

    let reverse = TransformConfig::new("Fullwidth-Halfwidth").with_direction(Direction::Reverse);
    let widen = TransliterateCharFilter::from_config(&reverse, &loader).unwrap();
    let mut reader = widen.reader(StrReader::new("ｶﾞﾗｽ ﾊﾟﾝ").with_max_chunk(1));
    assert_eq!(read_to_string(&mut reader).unwrap(), "ガラス\u{3000}パン");
}

#[test]
fn test_json_transform_config() {
    let config = TransformConfig::from_json(r#"{"id": "Hiragana-Katakana"}"#).unwrap();
    assert_eq!(config.direction, Direction::Forward);

    let filter =
        TransliterateCharFilter::from_config(&config, &MemoryResourceLoader::new()).unwrap();
    assert_eq!(filter.filter("ひらがな").0, "ヒラガナ");

    assert!(TransformConfig::from_json(r#"{"id": "x", "direction": "up"}"#).is_err());
}

#[test]
fn test_streaming_from_a_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("input.txt");
    let text = "両方の亜 ".repeat(100);
    fs::write(&path, &text).unwrap();

    let filter = TransliterateCharFilter::new(
        cjk_analysis::analysis::transliterator::transliterator_for(
            &TransformConfig::new("cjk.txt"),
            &MemoryResourceLoader::new().with_resource("cjk.txt", SAMPLE_RULES),
        )
        .unwrap(),
    );
    let mut reader = filter.reader(Utf8Reader::new(File::open(&path).unwrap()));
    let output = read_to_string(&mut reader).unwrap();

    assert_eq!(output, filter.filter(&text).0);
    assert!(output.starts_with("兩方の亜"));
}

#[test]
fn test_transform_configuration_errors() {
    let loader = MemoryResourceLoader::new()
        .with_resource("broken.txt", "両 兩 ;")
        .with_resource("context.txt", "a { b > c ;");

    // Missing id.
    let err = TransformConfig::from_args(args(&[("direction", "forward")])).unwrap_err();
    assert!(err.is_configuration());

    // Invalid direction.
    let err = TransformConfig::from_args(args(&[("id", "x"), ("direction", "sideways")]))
        .unwrap_err();
    assert!(err.is_configuration());

    // Unknown parameter.
    let err = TransformConfig::from_args(args(&[("id", "x"), ("rules", "y")])).unwrap_err();
    assert_eq!(err.to_string(), CjkAnalysisError::configuration("unknown parameters: rules").to_string());

    // Unknown id with no resource behind it.
    let err = TransliterateCharFilter::from_config(&TransformConfig::new("Han-Latin"), &loader)
        .unwrap_err();
    assert!(err.is_configuration());

    // Malformed rules.
    for id in ["broken.txt", "context.txt"] {
        let err = TransliterateCharFilter::from_config(&TransformConfig::new(id), &loader)
            .unwrap_err();
        assert!(err.is_configuration(), "{id}: {err}");
        assert!(err.to_string().contains("line 1"), "{id}: {err}");
    }
}

#[test]
fn test_folding_from_filesystem() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("fold.tsv"), "# custom\nU+4E9C\t亞\n").unwrap();
    fs::write(dir.path().join("fold.json"), r#"{"黒": "黑"}"#).unwrap();
    let loader = FsResourceLoader::new(dir.path());

    let tsv = CjkFoldingFilter::from_config(
        &FoldingConfig::from_args(args(&[("resource", "fold.tsv")])).unwrap(),
        &loader,
    )
    .unwrap();
    assert_eq!(fold_one(&tsv, "亜黒"), "亞黒");

    let json = CjkFoldingFilter::from_config(
        &FoldingConfig::from_args(args(&[("resource", "fold.json")])).unwrap(),
        &loader,
    )
    .unwrap();
    assert_eq!(fold_one(&json, "亜黒"), "亜黑");

    let builtin =
        CjkFoldingFilter::from_config(&FoldingConfig::from_args(args(&[])).unwrap(), &loader)
            .unwrap();
    assert_eq!(fold_one(&builtin, "亜黒"), "亞黑");
}

#[test]
fn test_folding_configuration_errors() {
    let loader = MemoryResourceLoader::new()
        .with_resource("chain.tsv", "亜 亞\n亞 亚\n")
        .with_resource("multi.tsv", "亜黒 亞\n")
        .with_resource("short.tsv", "亜\n");

    assert!(
        FoldingConfig::from_args(args(&[("variants", "x")]))
            .unwrap_err()
            .is_configuration()
    );

    for id in ["chain.tsv", "multi.tsv", "short.tsv", "missing.tsv"] {
        let config = FoldingConfig {
            resource: Some(id.to_string()),
        };
        let err = CjkFoldingFilter::from_config(&config, &loader).unwrap_err();
        assert!(err.is_configuration(), "{id}: {err}");
    }
}
