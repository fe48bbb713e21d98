//! Built-in transforms addressed by id.
//!
//! | id                    | forward                                              |
//! |-----------------------|------------------------------------------------------|
//! | `Katakana-Hiragana`   | ァ..ヶ, ヽ ヾ → ぁ..ゖ, ゝ ゞ                            |
//! | `Hiragana-Katakana`   | inverse of the above                                 |
//! | `Fullwidth-Halfwidth` | fullwidth ASCII, ideographic space, katakana, CJK    |
//! |                       | punctuation and symbols → their halfwidth forms      |
//! | `Halfwidth-Fullwidth` | inverse of the above                                 |
//! | `Null`, `Any-Null`    | identity                                             |
//!
//! Ids are matched case-insensitively. Running a transform in reverse selects
//! its inverse.
//!
//! Halfwidth katakana have no precomposed voiced forms, so `ガ` narrows to the
//! two characters `ｶﾞ` and widening composes them back. A halfwidth base at the
//! end of a non-final span is withheld until the next character shows whether
//! a voicing mark follows.

use std::fmt;
use std::sync::Arc;

use ahash::{AHashMap, AHashSet};
use lazy_static::lazy_static;

use super::{Transliteration, Transliterator};
use crate::config::Direction;

const KANA_OFFSET: u32 = 0x60;
const FULLWIDTH_OFFSET: u32 = 0xFEE0;

const VOICED_MARK: char = '\u{FF9E}';
const SEMI_VOICED_MARK: char = '\u{FF9F}';

/// `(halfwidth, fullwidth)` pairs beyond the ASCII block.
const HALFWIDTH_FORMS: &[(char, char)] = &[
    ('⦅', '｟'), ('⦆', '｠'), ('¢', '￠'), ('£', '￡'), ('¬', '￢'), ('¯', '￣'),
    ('¦', '￤'), ('¥', '￥'), ('₩', '￦'), ('｡', '。'), ('｢', '「'), ('｣', '」'),
    ('､', '、'), ('･', '・'), ('ｦ', 'ヲ'), ('ｧ', 'ァ'), ('ｨ', 'ィ'), ('ｩ', 'ゥ'),
    ('ｪ', 'ェ'), ('ｫ', 'ォ'), ('ｬ', 'ャ'), ('ｭ', 'ュ'), ('ｮ', 'ョ'), ('ｯ', 'ッ'),
    ('ｰ', 'ー'), ('ｱ', 'ア'), ('ｲ', 'イ'), ('ｳ', 'ウ'), ('ｴ', 'エ'), ('ｵ', 'オ'),
    ('ｶ', 'カ'), ('ｷ', 'キ'), ('ｸ', 'ク'), ('ｹ', 'ケ'), ('ｺ', 'コ'), ('ｻ', 'サ'),
    ('ｼ', 'シ'), ('ｽ', 'ス'), ('ｾ', 'セ'), ('ｿ', 'ソ'), ('ﾀ', 'タ'), ('ﾁ', 'チ'),
    ('ﾂ', 'ツ'), ('ﾃ', 'テ'), ('ﾄ', 'ト'), ('ﾅ', 'ナ'), ('ﾆ', 'ニ'), ('ﾇ', 'ヌ'),
    ('ﾈ', 'ネ'), ('ﾉ', 'ノ'), ('ﾊ', 'ハ'), ('ﾋ', 'ヒ'), ('ﾌ', 'フ'), ('ﾍ', 'ヘ'),
    ('ﾎ', 'ホ'), ('ﾏ', 'マ'), ('ﾐ', 'ミ'), ('ﾑ', 'ム'), ('ﾒ', 'メ'), ('ﾓ', 'モ'),
    ('ﾔ', 'ヤ'), ('ﾕ', 'ユ'), ('ﾖ', 'ヨ'), ('ﾗ', 'ラ'), ('ﾘ', 'リ'), ('ﾙ', 'ル'),
    ('ﾚ', 'レ'), ('ﾛ', 'ロ'), ('ﾜ', 'ワ'), ('ﾝ', 'ン'), (VOICED_MARK, '\u{3099}'),
    (SEMI_VOICED_MARK, '\u{309A}'),
];

/// Halfwidth base and the fullwidth kana it forms with `ﾞ`.
const VOICED: &[(char, char)] = &[
    ('ｶ', 'ガ'), ('ｷ', 'ギ'), ('ｸ', 'グ'), ('ｹ', 'ゲ'), ('ｺ', 'ゴ'), ('ｻ', 'ザ'), ('ｼ', 'ジ'), ('ｽ', 'ズ'),
    ('ｾ', 'ゼ'), ('ｿ', 'ゾ'), ('ﾀ', 'ダ'), ('ﾁ', 'ヂ'), ('ﾂ', 'ヅ'), ('ﾃ', 'デ'), ('ﾄ', 'ド'), ('ﾊ', 'バ'),
    ('ﾋ', 'ビ'), ('ﾌ', 'ブ'), ('ﾍ', 'ベ'), ('ﾎ', 'ボ'), ('ｳ', 'ヴ'), ('ﾜ', 'ヷ'), ('ｦ', 'ヺ'),
];

/// Halfwidth base and the fullwidth kana it forms with `ﾟ`.
const SEMI_VOICED: &[(char, char)] = &[
    ('ﾊ', 'パ'), ('ﾋ', 'ピ'), ('ﾌ', 'プ'), ('ﾍ', 'ペ'), ('ﾎ', 'ポ'),
];

struct WidthTables {
    /// Fullwidth character to its halfwidth spelling (one or two characters).
    narrow: AHashMap<char, Box<[char]>>,
    /// Halfwidth character to its fullwidth form.
    wide: AHashMap<char, char>,
    /// Halfwidth base plus voicing mark to the precomposed fullwidth kana.
    composed: AHashMap<(char, char), char>,
    /// Halfwidth characters that may combine with a following mark.
    bases: AHashSet<char>,
}

impl WidthTables {
    fn build() -> Self {
        let mut tables = WidthTables {
            narrow: AHashMap::new(),
            wide: AHashMap::new(),
            composed: AHashMap::new(),
            bases: AHashSet::new(),
        };

        let ascii = (0x21..=0x7E).filter_map(|cp| {
            Some((char::from_u32(cp)?, char::from_u32(cp + FULLWIDTH_OFFSET)?))
        });
        for (half, full) in ascii
            .chain([(' ', '\u{3000}')])
            .chain(HALFWIDTH_FORMS.iter().copied())
        {
            tables.narrow.insert(full, Box::from([half]));
            tables.wide.insert(half, full);
        }
        // Spacing voicing marks narrow too, but widen to the combining ones.
        tables.narrow.insert('\u{309B}', Box::from([VOICED_MARK]));
        tables.narrow.insert('\u{309C}', Box::from([SEMI_VOICED_MARK]));

        for (marks, mark) in [(VOICED, VOICED_MARK), (SEMI_VOICED, SEMI_VOICED_MARK)] {
            for &(base, full) in marks {
                tables.narrow.insert(full, Box::from([base, mark]));
                tables.composed.insert((base, mark), full);
                tables.bases.insert(base);
            }
        }
        tables
    }
}

lazy_static! {
    static ref WIDTH_TABLES: WidthTables = WidthTables::build();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Transform {
    KatakanaToHiragana,
    HiraganaToKatakana,
    Null,
}

impl Transform {
    fn id(self) -> &'static str {
        match self {
            Transform::KatakanaToHiragana => "Katakana-Hiragana",
            Transform::HiraganaToKatakana => "Hiragana-Katakana",
            Transform::Null => "Null",
        }
    }

    fn inverse(self) -> Self {
        match self {
            Transform::KatakanaToHiragana => Transform::HiraganaToKatakana,
            Transform::HiraganaToKatakana => Transform::KatakanaToHiragana,
            Transform::Null => Transform::Null,
        }
    }

    fn map(self, c: char) -> Option<char> {
        let cp = c as u32;
        let mapped = match self {
            Transform::KatakanaToHiragana => match cp {
                0x30A1..=0x30F6 | 0x30FD..=0x30FE => cp - KANA_OFFSET,
                _ => return None,
            },
            Transform::HiraganaToKatakana => match cp {
                0x3041..=0x3096 | 0x309D..=0x309E => cp + KANA_OFFSET,
                _ => return None,
            },
            Transform::Null => return None,
        };
        char::from_u32(mapped)
    }
}

/// A transform that maps each character independently.
///
/// Every character is final as soon as it is seen, so nothing is ever withheld.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct CharMapTransliterator {
    transform: Transform,
}

impl CharMapTransliterator {
    /// Map a single character.
    pub fn map_char(&self, c: char) -> char {
        self.transform.map(c).unwrap_or(c)
    }
}

impl Transliterator for CharMapTransliterator {
    fn id(&self) -> &str {
        self.transform.id()
    }

    fn transliterate(&self, span: &[char], _final_pass: bool) -> Transliteration {
        let mut result = Transliteration::with_capacity(span.len());
        for &c in span {
            result.push_unchanged(self.map_char(c));
        }
        result
    }
}

impl fmt::Debug for CharMapTransliterator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CharMapTransliterator")
            .field("id", &self.transform.id())
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Width {
    Narrow,
    Wide,
}

/// Converts between fullwidth and halfwidth forms.
///
/// Narrowing splits voiced katakana into base and mark; widening composes
/// them again.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct WidthTransliterator {
    width: Width,
}

impl WidthTransliterator {
    fn narrow(span: &[char]) -> Transliteration {
        let tables = &*WIDTH_TABLES;
        let mut result = Transliteration::with_capacity(span.len() * 2);
        for &c in span {
            match tables.narrow.get(&c) {
                Some(halfwidth) => result.push(1, halfwidth),
                None => result.push_unchanged(c),
            }
        }
        result
    }

    fn widen(span: &[char], final_pass: bool) -> Transliteration {
        let tables = &*WIDTH_TABLES;
        let mut result = Transliteration::with_capacity(span.len());
        let mut pos = 0;

        while pos < span.len() {
            let c = span[pos];
            if tables.bases.contains(&c) {
                match span.get(pos + 1) {
                    Some(&mark) => {
                        if let Some(&composed) = tables.composed.get(&(c, mark)) {
                            result.push(2, &[composed]);
                            pos += 2;
                            continue;
                        }
                    }
                    None if !final_pass => break,
                    None => {}
                }
            }

            match tables.wide.get(&c) {
                Some(&full) => result.push(1, &[full]),
                None => result.push_unchanged(c),
            }
            pos += 1;
        }

        result
    }
}

impl Transliterator for WidthTransliterator {
    fn id(&self) -> &str {
        match self.width {
            Width::Narrow => "Fullwidth-Halfwidth",
            Width::Wide => "Halfwidth-Fullwidth",
        }
    }

    fn transliterate(&self, span: &[char], final_pass: bool) -> Transliteration {
        match self.width {
            Width::Narrow => Self::narrow(span),
            Width::Wide => Self::widen(span, final_pass),
        }
    }
}

impl fmt::Debug for WidthTransliterator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WidthTransliterator")
            .field("id", &self.id())
            .finish()
    }
}

/// Find a built-in transform by id.
pub fn lookup(id: &str, direction: Direction) -> Option<Arc<dyn Transliterator>> {
    let reverse = direction == Direction::Reverse;
    let transform = match id.trim().to_ascii_lowercase().as_str() {
        "katakana-hiragana" => Transform::KatakanaToHiragana,
        "hiragana-katakana" => Transform::HiraganaToKatakana,
        "null" | "any-null" => Transform::Null,
        "fullwidth-halfwidth" => return Some(width_transform(Width::Narrow, reverse)),
        "halfwidth-fullwidth" => return Some(width_transform(Width::Wide, reverse)),
        _ => return None,
    };

    let transform = if reverse { transform.inverse() } else { transform };
    Some(Arc::new(CharMapTransliterator { transform }))
}

fn width_transform(width: Width, reverse: bool) -> Arc<dyn Transliterator> {
    let width = match (width, reverse) {
        (Width::Narrow, true) => Width::Wide,
        (Width::Wide, true) => Width::Narrow,
        (width, false) => width,
    };
    Arc::new(WidthTransliterator { width })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::transliterator::Edit;

    fn apply(id: &str, direction: Direction, input: &str) -> String {
        let t = lookup(id, direction).unwrap();
        let span: Vec<char> = input.chars().collect();
        let result = t.transliterate(&span, true);
        assert_eq!(result.consumed, span.len());
        result.output.into_iter().collect()
    }

    #[test]
    fn test_katakana_hiragana() {
        assert_eq!(apply("Katakana-Hiragana", Direction::Forward, "ヒラガナ"), "ひらがな");
        assert_eq!(apply("Katakana-Hiragana", Direction::Reverse, "ひらがな"), "ヒラガナ");
        // The prolonged sound mark has no hiragana counterpart.
        assert_eq!(apply("Katakana-Hiragana", Direction::Forward, "ラーメン"), "らーめん");
    }

    #[test]
    fn test_fullwidth_halfwidth() {
        assert_eq!(
            apply("Fullwidth-Halfwidth", Direction::Forward, "ＡＢＣ\u{3000}１"),
            "ABC 1"
        );
        assert_eq!(
            apply("Halfwidth-Fullwidth", Direction::Forward, "ABC 1"),
            "ＡＢＣ\u{3000}１"
        );
        assert_eq!(apply("Fullwidth-Halfwidth", Direction::Reverse, "a!"), "ａ！");
    }

    #[test]
    fn test_katakana_narrows_to_halfwidth() {
        assert_eq!(apply("Fullwidth-Halfwidth", Direction::Forward, "アルアノリウ"), "ｱﾙｱﾉﾘｳ");
        assert_eq!(apply("Halfwidth-Fullwidth", Direction::Forward, "ｱﾙｱﾉﾘｳ"), "アルアノリウ");
        assert_eq!(
            apply("Fullwidth-Halfwidth", Direction::Forward, "「カタカナ」、ー￥"),
            "｢ｶﾀｶﾅ｣､ｰ¥"
        );
    }

    #[test]
    fn test_voiced_kana_split_and_compose() {
        assert_eq!(apply("Fullwidth-Halfwidth", Direction::Forward, "ガパヴ"), "ｶﾞﾊﾟｳﾞ");
        assert_eq!(apply("Fullwidth-Halfwidth", Direction::Reverse, "ｶﾞﾊﾟｳﾞ"), "ガパヴ");
        // A mark that does not combine with the base widens on its own.
        assert_eq!(apply("Halfwidth-Fullwidth", Direction::Forward, "ｱﾞ"), "ア\u{3099}");

        let narrow = lookup("Fullwidth-Halfwidth", Direction::Forward).unwrap();
        let result = narrow.transliterate(&['a', 'ガ'], false);
        assert_eq!(result.edits, vec![Edit::new(1, 1), Edit::new(1, 2)]);
    }

    #[test]
    fn test_widening_withholds_a_trailing_base() {
        let wide = lookup("Halfwidth-Fullwidth", Direction::Forward).unwrap();

        let pending = wide.transliterate(&['A', 'ﾊ'], false);
        assert_eq!(pending.consumed, 1);
        assert_eq!(pending.output, vec!['Ａ']);

        let composed = wide.transliterate(&['ﾊ', 'ﾟ'], false);
        assert_eq!(composed.consumed, 2);
        assert_eq!(composed.output, vec!['パ']);
        assert_eq!(composed.edits, vec![Edit::new(2, 1)]);

        let last = wide.transliterate(&['ﾊ'], true);
        assert_eq!(last.output, vec!['ハ']);

        // Not a base, so nothing to wait for.
        assert_eq!(wide.transliterate(&['ﾝ'], false).consumed, 1);
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert_eq!(lookup("katakana-HIRAGANA", Direction::Forward).unwrap().id(), "Katakana-Hiragana");
        assert_eq!(lookup("Any-Null", Direction::Reverse).unwrap().id(), "Null");
        assert!(lookup("Han-Latin", Direction::Forward).is_none());
    }

    #[test]
    fn test_null_is_identity() {
        assert_eq!(apply("Null", Direction::Forward, "両 ｱ"), "両 ｱ");
    }
}
