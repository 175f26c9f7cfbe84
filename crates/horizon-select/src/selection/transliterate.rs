//! Diacritic folding for typeahead.

use unicode_normalization::char::{decompose_canonical, is_combining_mark};

/// Replace accented Latin letters with their unaccented spelling.
///
/// German umlauts expand (`ü` to `ue`). Other characters are canonically
/// decomposed with their combining marks dropped, so `ṅ` folds to `n`.
pub fn transliterate(text: &str) -> String {
    let mut folded = String::with_capacity(text.len());
    for ch in text.chars() {
        match fold(ch) {
            Some(replacement) => folded.push_str(replacement),
            None if ch.is_ascii() => folded.push(ch),
            None => decompose_canonical(ch, |part| {
                if !is_combining_mark(part) {
                    folded.push(part);
                }
            }),
        }
    }
    folded
}

#[rustfmt::skip]
fn fold(ch: char) -> Option<&'static str> {
    if ch.is_ascii() {
        return None;
    }
    let folded = match ch {
        'ä' | 'æ' | 'ǽ' => "ae",
        'ö' | 'œ' => "oe",
        'ü' => "ue",
        'Ä' => "Ae",
        'Ü' => "Ue",
        'Ö' => "Oe",
        'À' | 'Á' | 'Â' | 'Ã' | 'Å' | 'Ǻ' | 'Ā' | 'Ă' | 'Ą' | 'Ǎ' => "A",
        'à' | 'á' | 'â' | 'ã' | 'å' | 'ǻ' | 'ā' | 'ă' | 'ą' | 'ǎ' | 'ª' => "a",
        'Ç' | 'Ć' | 'Ĉ' | 'Ċ' | 'Č' => "C",
        'ç' | 'ć' | 'ĉ' | 'ċ' | 'č' => "c",
        'Ð' | 'Ď' | 'Đ' => "D",
        'ð' | 'ď' | 'đ' => "d",
        'È' | 'É' | 'Ê' | 'Ë' | 'Ē' | 'Ĕ' | 'Ė' | 'Ę' | 'Ě' => "E",
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ĕ' | 'ė' | 'ę' | 'ě' => "e",
        'Ĝ' | 'Ğ' | 'Ġ' | 'Ģ' => "G",
        'ĝ' | 'ğ' | 'ġ' | 'ģ' => "g",
        'Ĥ' | 'Ħ' => "H",
        'ĥ' | 'ħ' => "h",
        'Ì' | 'Í' | 'Î' | 'Ï' | 'Ĩ' | 'Ī' | 'Ĭ' | 'Ǐ' | 'Į' | 'İ' => "I",
        'ì' | 'í' | 'î' | 'ï' | 'ĩ' | 'ī' | 'ĭ' | 'ǐ' | 'į' | 'ı' => "i",
        'Ĵ' => "J",
        'ĵ' => "j",
        'Ķ' => "K",
        'ķ' => "k",
        'Ĺ' | 'Ļ' | 'Ľ' | 'Ŀ' | 'Ł' => "L",
        'ĺ' | 'ļ' | 'ľ' | 'ŀ' | 'ł' => "l",
        'Ñ' | 'Ń' | 'Ņ' | 'Ň' => "N",
        'ñ' | 'ń' | 'ņ' | 'ň' | 'ŉ' => "n",
        'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ō' | 'Ŏ' | 'Ǒ' | 'Ő' | 'Ơ' | 'Ø' | 'Ǿ' => "O",
        'ò' | 'ó' | 'ô' | 'õ' | 'ō' | 'ŏ' | 'ǒ' | 'ő' | 'ơ' | 'ø' | 'ǿ' | 'º' => "o",
        'Ŕ' | 'Ŗ' | 'Ř' => "R",
        'ŕ' | 'ŗ' | 'ř' => "r",
        'Ś' | 'Ŝ' | 'Ş' | 'Š' => "S",
        'ś' | 'ŝ' | 'ş' | 'š' | 'ſ' => "s",
        'Ţ' | 'Ť' | 'Ŧ' => "T",
        'ţ' | 'ť' | 'ŧ' => "t",
        'Ù' | 'Ú' | 'Û' | 'Ũ' | 'Ū' | 'Ŭ' | 'Ů' | 'Ű' | 'Ų' | 'Ư' | 'Ǔ' | 'Ǖ' | 'Ǘ' | 'Ǚ' | 'Ǜ' => "U",
        'ù' | 'ú' | 'û' | 'ũ' | 'ū' | 'ŭ' | 'ů' | 'ű' | 'ų' | 'ư' | 'ǔ' | 'ǖ' | 'ǘ' | 'ǚ' | 'ǜ' => "u",
        'Ý' | 'Ÿ' | 'Ŷ' => "Y",
        'ý' | 'ÿ' | 'ŷ' => "y",
        'Ŵ' => "W",
        'ŵ' => "w",
        'Ź' | 'Ż' | 'Ž' => "Z",
        'ź' | 'ż' | 'ž' => "z",
        'Æ' | 'Ǽ' => "AE",
        'ß' => "ss",
        'Ĳ' => "IJ",
        'ĳ' => "ij",
        'Œ' => "OE",
        'ƒ' => "f",
        _ => return None,
    };
    Some(folded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_folds_accents() {
        assert_eq!(transliterate("Příliš žluťoučký kůň"), "Prilis zlutoucky kun");
        assert_eq!(transliterate("Straße"), "Strasse");
        assert_eq!(transliterate("Ærø"), "AEro");
    }

    #[test]
    fn test_umlauts_expand() {
        assert_eq!(transliterate("Müller"), "Mueller");
        assert_eq!(transliterate("plain ascii"), "plain ascii");
    }

    #[test]
    fn test_unlisted_letters_drop_combining_marks() {
        assert_eq!(transliterate("Ṅgāti Ẽ"), "Ngati E");
        assert_eq!(transliterate("cafe\u{301}"), "cafe");
        assert_eq!(transliterate("日本"), "日本");
    }
}
