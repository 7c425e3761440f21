//! PT-BR text normalization.
//!
//! Course content has passed through more than one encoding over its life,
//! and titles occasionally arrive as mojibake: UTF-8 that was decoded as
//! Latin-1/Windows-1252 (`análise` shown as `anÃ¡lise`), or text where the
//! accented characters were flattened to `?` or U+FFFD. [`fix_text`] repairs
//! the common cases before titles reach calendars and reports.

/// Two-character (and longer) sequences that only appear when UTF-8 bytes of
/// PT-BR text were decoded as Windows-1252. Kept specific on purpose:
/// a lone `Ã` is legitimate in words like `SÃO`.
const MOJIBAKE_SIGNATURES: &[&str] = &[
    "\u{c3}\u{a1}",
    "\u{c3}\u{a2}",
    "\u{c3}\u{a3}",
    "\u{c3}\u{a9}",
    "\u{c3}\u{aa}",
    "\u{c3}\u{ad}",
    "\u{c3}\u{b3}",
    "\u{c3}\u{b4}",
    "\u{c3}\u{b5}",
    "\u{c3}\u{ba}",
    "\u{c3}\u{a7}",
    "\u{c3}\u{81}",
    "\u{c3}\u{2030}",
    "\u{c3}\u{201c}",
    "\u{c3}\u{161}",
    "\u{c3}\u{2021}",
    "\u{c2}\u{a0}",
    "\u{c2}\u{b7}",
    "\u{e2}\u{20ac}\u{201c}",
    "\u{e2}\u{20ac}\u{201d}",
    "\u{e2}\u{20ac}\u{153}",
    "\u{e2}\u{20ac}\u{9d}",
    "\u{e2}\u{20ac}\u{2dc}",
    "\u{e2}\u{20ac}\u{2122}",
    "\u{e2}\u{20ac}\u{a6}",
    "\u{e2}\u{20ac}\u{a2}",
    "\u{e2}\u{201a}\u{ac}",
    "\u{f0}\u{178}",
];

const REPLACEMENT_CHAR: char = '\u{fffd}';

/// Words whose accents were flattened to literal question marks somewhere
/// upstream. These cannot be recovered mechanically, so the frequent ones are
/// patched by table.
const QUESTION_MARK_FIXES: &[(&str, &str)] = &[
    ("aquisi??o", "aquisição"),
    ("Descri??o", "Descrição"),
    ("descri??o", "descrição"),
    ("produ??o", "produção"),
    ("medi??o", "medição"),
    ("M?trica", "Métrica"),
    ("m?trica", "métrica"),
    ("P?blico", "Público"),
    ("p?blico", "público"),
    ("l?gica", "lógica"),
    ("L?gica", "Lógica"),
    ("l?quida", "líquida"),
    ("L?quida", "Líquida"),
    ("r?pido", "rápido"),
    ("R?pido", "Rápido"),
    ("est?", "está"),
    ("Est?", "Está"),
    ("?nico", "único"),
    ("?nica", "única"),
    ("?nicos", "únicos"),
    ("?nicas", "únicas"),
];

/// Same idea for U+FFFD, which is what strict decoders leave behind.
const REPLACEMENT_CHAR_FIXES: &[(&str, &str)] = &[
    ("Voc\u{fffd}", "Você"),
    ("voc\u{fffd}", "você"),
    ("j\u{fffd}", "já"),
    ("N\u{fffd}o", "Não"),
    ("n\u{fffd}o", "não"),
    ("m\u{fffd}s", "mês"),
    ("mar\u{fffd}o", "março"),
    ("milh\u{fffd}es", "milhões"),
    ("v\u{fffd}rios", "vários"),
    ("exporta\u{fffd}\u{fffd}o", "exportação"),
    ("decis\u{fffd}es", "decisões"),
    ("programa\u{fffd}\u{fffd}o", "programação"),
    ("est\u{fffd}o", "estão"),
    ("t\u{fffd}m", "têm"),
    ("\u{fffd} uma ", "é uma "),
    ("\u{fffd} um ", "é um "),
    ("\u{fffd} o ", "é o "),
    ("\u{fffd} a ", "é a "),
];

/// Repairs common PT-BR mojibake in a piece of text.
///
/// Applies the literal fix tables, then up to three passes of re-decoding the
/// text's Windows-1252 byte form as UTF-8. Each pass only sticks when it
/// decodes cleanly and does not increase the mojibake score, so text that
/// merely looks suspicious comes through unchanged.
///
/// # Examples
///
/// ```
/// use trilha_core::ptbr::fix_text;
///
/// assert_eq!(fix_text("an\u{c3}\u{a1}lise de dados"), "análise de dados");
/// assert_eq!(fix_text("Descri??o"), "Descrição");
/// assert_eq!(fix_text("Relatório limpo"), "Relatório limpo");
/// ```
#[must_use]
pub fn fix_text(text: &str) -> String {
    let mut out = apply_replacement_char_fixes(&apply_question_mark_fixes(text));
    for _ in 0..3 {
        if !has_mojibake_hint(&out) {
            break;
        }
        let Some(decoded) = redecode_as_utf8(&out) else {
            break;
        };
        if decoded == out || mojibake_score(&decoded) > mojibake_score(&out) {
            break;
        }
        out = decoded;
    }
    apply_replacement_char_fixes(&apply_question_mark_fixes(&out))
}

fn apply_question_mark_fixes(value: &str) -> String {
    let mut out = value.to_string();
    for (bad, good) in QUESTION_MARK_FIXES {
        out = out.replace(bad, good);
    }
    out
}

fn apply_replacement_char_fixes(value: &str) -> String {
    let mut out = value.to_string();
    for (bad, good) in REPLACEMENT_CHAR_FIXES {
        out = out.replace(bad, good);
    }
    out
}

/// Count of characters that almost never appear in clean PT-BR text but are
/// everywhere in mojibake: `Â`, `Ã`, `ð` and the replacement character.
fn mojibake_score(value: &str) -> usize {
    value
        .chars()
        .filter(|c| matches!(c, '\u{c2}' | '\u{c3}' | '\u{f0}' | '\u{fffd}'))
        .count()
}

fn has_mojibake_hint(value: &str) -> bool {
    if value.contains(REPLACEMENT_CHAR) {
        return true;
    }
    MOJIBAKE_SIGNATURES.iter().any(|seq| value.contains(seq))
}

/// Maps the text back to the bytes it came from under Windows-1252 and
/// decodes those as UTF-8. Returns `None` when some character has no
/// Windows-1252 byte or when the bytes are not valid UTF-8.
fn redecode_as_utf8(value: &str) -> Option<String> {
    let mut bytes = Vec::with_capacity(value.len());
    for c in value.chars() {
        bytes.push(windows_1252_byte(c)?);
    }
    String::from_utf8(bytes).ok()
}

/// The Windows-1252 byte for a character, covering Latin-1 plus the 0x80-0x9F
/// punctuation block that distinguishes 1252 from plain Latin-1.
fn windows_1252_byte(c: char) -> Option<u8> {
    let code = u32::from(c);
    if code <= 0xff {
        return Some(code as u8);
    }
    let byte = match c {
        '\u{20ac}' => 0x80,
        '\u{201a}' => 0x82,
        '\u{192}' => 0x83,
        '\u{201e}' => 0x84,
        '\u{2026}' => 0x85,
        '\u{2020}' => 0x86,
        '\u{2021}' => 0x87,
        '\u{2c6}' => 0x88,
        '\u{2030}' => 0x89,
        '\u{160}' => 0x8a,
        '\u{2039}' => 0x8b,
        '\u{152}' => 0x8c,
        '\u{17d}' => 0x8e,
        '\u{2018}' => 0x91,
        '\u{2019}' => 0x92,
        '\u{201c}' => 0x93,
        '\u{201d}' => 0x94,
        '\u{2022}' => 0x95,
        '\u{2013}' => 0x96,
        '\u{2014}' => 0x97,
        '\u{2dc}' => 0x98,
        '\u{2122}' => 0x99,
        '\u{161}' => 0x9a,
        '\u{203a}' => 0x9b,
        '\u{153}' => 0x9c,
        '\u{17e}' => 0x9e,
        '\u{178}' => 0x9f,
        _ => return None,
    };
    Some(byte)
}

// ─── Tests ─────────────────────────────────────────────────────────────────────
