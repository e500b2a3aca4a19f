//! Normalized Soundex difference.
//!
//! Encodes both inputs as US-English Soundex codes (one letter followed by
//! three digits), takes the edit distance between the codes, and divides by
//! the code length. Two identically pronounced names score 0.0; names with
//! entirely different codes score 1.0.

use crate::error::AlgorithmError;

use super::Similarity;

/// Length of a Soundex code and the normalization divisor.
const CODE_LEN: usize = 4;

/// Phonetic distance on Soundex codes, normalized to [0, 1].
#[derive(Debug, Clone, Copy, Default)]
pub struct NormalizedSoundexDifference;

impl Similarity for NormalizedSoundexDifference {
    fn calculate(&self, a: &str, b: &str) -> Result<f32, AlgorithmError> {
        let code_a = soundex(a)?;
        let code_b = soundex(b)?;
        Ok(strsim::levenshtein(&code_a, &code_b) as f32 / CODE_LEN as f32)
    }

    fn name(&self) -> &'static str {
        "soundex"
    }
}

/// Soundex digit for a letter; `None` for vowels and the silent H/W.
fn digit(c: char) -> Option<char> {
    match c {
        'B' | 'F' | 'P' | 'V' => Some('1'),
        'C' | 'G' | 'J' | 'K' | 'Q' | 'S' | 'X' | 'Z' => Some('2'),
        'D' | 'T' => Some('3'),
        'L' => Some('4'),
        'M' | 'N' => Some('5'),
        'R' => Some('6'),
        _ => None,
    }
}

/// US-English Soundex code of a string.
///
/// The first letter is kept; following letters map to digits with adjacent
/// duplicates collapsed. Vowels separate duplicates (letting the digit
/// repeat), H and W do not. Errors when the input contains no letters.
pub fn soundex(input: &str) -> Result<String, AlgorithmError> {
    let letters: Vec<char> = input
        .chars()
        .filter(|c| c.is_ascii_alphabetic())
        .map(|c| c.to_ascii_uppercase())
        .collect();

    let Some((&first, rest)) = letters.split_first() else {
        return Err(AlgorithmError::Unencodable {
            value: input.to_string(),
        });
    };

    let mut code = String::with_capacity(CODE_LEN);
    code.push(first);
    let mut last = digit(first);

    for &c in rest {
        if code.len() == CODE_LEN {
            break;
        }
        match digit(c) {
            Some(d) if last != Some(d) => {
                code.push(d);
                last = Some(d);
            }
            Some(_) => {}
            None => {
                // H and W are silent between consonants; vowels reset the
                // duplicate-collapsing state.
                if c != 'H' && c != 'W' {
                    last = None;
                }
            }
        }
    }

    while code.len() < CODE_LEN {
        code.push('0');
    }
    Ok(code)
}
