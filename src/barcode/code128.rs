//! Code128 symbol encoding
//!
//! Produces the module (bar/space) pattern for a Code128 barcode: start code,
//! data symbols in code sets B and C, the modulo-103 check symbol, and the
//! stop pattern. Code set C is used for runs of digits so the dominant
//! digit-heavy codes stay compact; code set A (control characters) is not
//! needed for any code shape we accept and is not implemented.

use thiserror::Error;

/// Quiet zone required on each side of the symbol, in modules.
pub const QUIET_ZONE_MODULES: u32 = 10;

/// Encoding errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Code128Error {
    #[error("cannot encode an empty code")]
    Empty,

    #[error("character {0:?} is not encodable in Code128 sets B/C")]
    Unencodable(char),
}

const START_B: usize = 104;
const START_C: usize = 105;
/// Switch-to-B symbol, as seen from code set C.
const SWITCH_B: usize = 100;
/// Switch-to-C symbol, as seen from code set B.
const SWITCH_C: usize = 99;
const STOP: usize = 106;

/// Element widths for symbol values 0-105 (3 bars and 3 spaces, 11 modules
/// total) plus the 13-module stop pattern at index 106. Each digit is the
/// width of one element, alternating bar/space starting with a bar.
const PATTERNS: [&str; 107] = [
    "212222", "222122", "222221", "121223", "121322", "131222", "122213",
    "122312", "132212", "221213", "221312", "231212", "112232", "122132",
    "122231", "113222", "123122", "123221", "223211", "221132", "221231",
    "213212", "223112", "312131", "311222", "321122", "321221", "312212",
    "322112", "322211", "212123", "212321", "232121", "111323", "131123",
    "131321", "112313", "132113", "132311", "211313", "231113", "231311",
    "112133", "112331", "132131", "113123", "113321", "133121", "313121",
    "211331", "231131", "213113", "213311", "213131", "311123", "311321",
    "331121", "312113", "312311", "332111", "314111", "221411", "431111",
    "111224", "111422", "121124", "121421", "141122", "141221", "112214",
    "112412", "122114", "122411", "142112", "142211", "241211", "221114",
    "413111", "241112", "134111", "111242", "121142", "121241", "114212",
    "124112", "124211", "411212", "421112", "421211", "212141", "214121",
    "412121", "111143", "111341", "131141", "114113", "114311", "411113",
    "411311", "113141", "114131", "311141", "411131", "211412", "211214",
    "211232", "2331112",
];

/// Encode `text` into a module pattern (`true` = bar, `false` = space).
///
/// The returned slice does not include quiet zones; the rasterizer pads
/// [`QUIET_ZONE_MODULES`] of space on each side.
pub fn encode(text: &str) -> Result<Vec<bool>, Code128Error> {
    let values = symbol_values(text)?;
    let check = check_symbol(&values);

    let mut modules = Vec::with_capacity((values.len() + 2) * 11 + 2);
    for value in values.iter().chain([&check, &STOP]) {
        push_symbol(&mut modules, *value);
    }
    Ok(modules)
}

/// Modulo-103 check symbol: start value weighted 1, then each data symbol
/// weighted by its 1-based position.
fn check_symbol(values: &[usize]) -> usize {
    let mut sum = values[0];
    for (position, value) in values.iter().enumerate().skip(1) {
        sum += value * position;
    }
    sum % 103
}

fn push_symbol(out: &mut Vec<bool>, value: usize) {
    let mut bar = true;
    for width in PATTERNS[value].bytes() {
        for _ in 0..(width - b'0') {
            out.push(bar);
        }
        bar = !bar;
    }
}

fn digit_run(bytes: &[u8], from: usize) -> usize {
    bytes[from..].iter().take_while(|b| b.is_ascii_digit()).count()
}

/// Choose code sets and produce the symbol value sequence (start symbol
/// included, check and stop excluded).
///
/// Set selection follows the usual heuristic: start in C when the input leads
/// with four or more digits (or is entirely digits), switch to C mid-stream
/// for digit runs of four or more, and keep one digit of an odd run in B so
/// C always consumes pairs.
fn symbol_values(text: &str) -> Result<Vec<usize>, Code128Error> {
    if text.is_empty() {
        return Err(Code128Error::Empty);
    }
    if let Some(bad) = text.chars().find(|c| !matches!(c, ' '..='~')) {
        return Err(Code128Error::Unencodable(bad));
    }

    let bytes = text.as_bytes();
    let mut values = Vec::with_capacity(bytes.len() + 1);

    let lead = digit_run(bytes, 0);
    let mut in_c = lead >= 4 || (lead == bytes.len() && lead >= 2);
    values.push(if in_c { START_C } else { START_B });

    let mut i = 0;
    while i < bytes.len() {
        if in_c {
            if digit_run(bytes, i) >= 2 {
                let pair = (bytes[i] - b'0') as usize * 10 + (bytes[i + 1] - b'0') as usize;
                values.push(pair);
                i += 2;
            } else {
                values.push(SWITCH_B);
                in_c = false;
            }
        } else {
            let run = digit_run(bytes, i);
            if run >= 4 {
                if run % 2 == 1 {
                    values.push((bytes[i] - 32) as usize);
                    i += 1;
                }
                values.push(SWITCH_C);
                in_c = true;
            } else {
                values.push((bytes[i] - 32) as usize);
                i += 1;
            }
        }
    }

    Ok(values)
}
