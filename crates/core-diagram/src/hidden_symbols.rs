//! Replaces control and otherwise invisible characters in a `Node`'s label
//! with a readable stand-in, flanked by a caller-supplied escape pair so a
//! backend can tell canonical text from revealed markup apart. Spaces are
//! always left untouched; everything else that would render as blank or
//! ambiguous gets a name.

use unicode_general_category::{get_general_category, GeneralCategory};
use unicode_segmentation::UnicodeSegmentation;

/// Single control/space characters with a dedicated canonical name, matched
/// before falling back to the general Unicode-category rule below.
const CHAR_NAMES: &[(char, &str)] = &[
    ('\u{0}', "<NUL>"),
    ('\u{1}', "<SOH>"),
    ('\u{2}', "<STX>"),
    ('\u{3}', "<ETX>"),
    ('\u{4}', "<EOT>"),
    ('\u{5}', "<ENQ>"),
    ('\u{6}', "<ACK>"),
    ('\u{7}', "\\a"),
    ('\u{8}', "\\b"),
    ('\t', "\\t"),
    ('\n', "\\n"),
    ('\u{b}', "\\v"),
    ('\u{c}', "\\f"),
    ('\r', "\\r"),
    ('\u{e}', "<SO>"),
    ('\u{f}', "<SI>"),
    ('\u{10}', "<DLE>"),
    ('\u{11}', "<DC1>"),
    ('\u{12}', "<DC2>"),
    ('\u{13}', "<DC3>"),
    ('\u{14}', "<DC4>"),
    ('\u{15}', "<NAK>"),
    ('\u{16}', "<SYN>"),
    ('\u{17}', "<ETB>"),
    ('\u{18}', "<CAN>"),
    ('\u{19}', "<EM>"),
    ('\u{1a}', "<SUB>"),
    ('\u{1b}', "<ESC>"),
    ('\u{1c}', "<FS>"),
    ('\u{1d}', "<GS>"),
    ('\u{1e}', "<RS>"),
    ('\u{1f}', "<US>"),
    ('\u{7f}', "<DEL>"),
    ('\u{80}', "<PAD>"),
    ('\u{81}', "<HOP>"),
    ('\u{82}', "<BPH>"),
    ('\u{83}', "<NBH>"),
    ('\u{84}', "<IND>"),
    ('\u{85}', "<NEL>"),
    ('\u{86}', "<SSA>"),
    ('\u{87}', "<ESA>"),
    ('\u{88}', "<HTS>"),
    ('\u{89}', "<HTJ>"),
    ('\u{8a}', "<VTS>"),
    ('\u{8b}', "<PLD>"),
    ('\u{8c}', "<PLU>"),
    ('\u{8d}', "<RI>"),
    ('\u{8e}', "<SS2>"),
    ('\u{8f}', "<SS3>"),
    ('\u{90}', "<DCS>"),
    ('\u{91}', "<PU1>"),
    ('\u{92}', "<PU2>"),
    ('\u{93}', "<STS>"),
    ('\u{94}', "<CCH>"),
    ('\u{95}', "<MW>"),
    ('\u{96}', "<SPA>"),
    ('\u{97}', "<EPA>"),
    ('\u{98}', "<SOS>"),
    ('\u{99}', "<SGCI>"),
    ('\u{9a}', "<SCI>"),
    ('\u{9b}', "<CSI>"),
    ('\u{9c}', "<ST>"),
    ('\u{9d}', "<OSC>"),
    ('\u{9e}', "<PM>"),
    ('\u{9f}', "<APC>"),
    ('\u{a0}', "<NBSP>"),
    ('\u{ad}', "<SHY>"),
];

fn lookup(c: char) -> Option<&'static str> {
    CHAR_NAMES.iter().find(|(ch, _)| *ch == c).map(|(_, name)| *name)
}

/// Wraps every hidden or otherwise invisible character in `text` with
/// `escape` (`escape.0` before, `escape.1` after), leaving plain spaces and
/// multi-character grapheme clusters untouched. Characters without a
/// dedicated name fall back to their Unicode general category: marks (`M`),
/// other (`C`), and separators (`Z`) other than plain space get a `<UXXXX>`
/// code point name.
pub fn reveal_hidden_symbols(text: &str, escape: (&str, &str)) -> String {
    let mut out = String::with_capacity(text.len());
    for grapheme in text.graphemes(true) {
        let mut chars = grapheme.chars();
        let first = chars.next();
        if grapheme.chars().count() > 1 && !grapheme.chars().all(char::is_whitespace) {
            out.push_str(grapheme);
            continue;
        }
        let Some(c) = first else { continue };
        if c == ' ' {
            out.push(c);
            continue;
        }
        if let Some(name) = lookup(c) {
            out.push_str(escape.0);
            out.push_str(name);
            out.push_str(escape.1);
            continue;
        }
        match get_general_category(c) {
            GeneralCategory::NonspacingMark
            | GeneralCategory::SpacingMark
            | GeneralCategory::EnclosingMark
            | GeneralCategory::Control
            | GeneralCategory::Format
            | GeneralCategory::Surrogate
            | GeneralCategory::PrivateUse
            | GeneralCategory::Unassigned
            | GeneralCategory::SpaceSeparator
            | GeneralCategory::LineSeparator
            | GeneralCategory::ParagraphSeparator => {
                out.push_str(escape.0);
                let code = c as u32;
                if code > 0xFFFF {
                    out.push_str(&format!("<U{code:08x}>"));
                } else {
                    out.push_str(&format!("<U{code:04x}>"));
                }
                out.push_str(escape.1);
            }
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reveals_control_characters_with_canonical_token() {
        assert_eq!(reveal_hidden_symbols("a\tb", ("<", ">")), "a<\\t>b");
    }

    #[test]
    fn uses_the_supplied_escape_pair() {
        assert_eq!(reveal_hidden_symbols("a\tb", ("\0", "\0")), "a\0\\t\0b");
    }

    #[test]
    fn leaves_plain_text_unchanged() {
        assert_eq!(reveal_hidden_symbols("identifier", ("<", ">")), "identifier");
    }

    #[test]
    fn leaves_lone_space_untouched() {
        assert_eq!(reveal_hidden_symbols(" ", ("<", ">")), " ");
    }

    #[test]
    fn reveals_non_breaking_space() {
        assert_eq!(reveal_hidden_symbols("\u{a0}", ("<", ">")), "<<NBSP>>");
    }

    #[test]
    fn falls_back_to_code_point_for_unnamed_controls() {
        assert_eq!(reveal_hidden_symbols("\u{200b}", ("<", ">")), "<<U200b>>");
    }
}
