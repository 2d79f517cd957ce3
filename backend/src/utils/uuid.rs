//! String-level conversions between the hyphenated and short UUID forms.
//!
//! These never change case, so `rehyphenate_uuid(&shorten_uuid(x)) == x` for
//! any standard-form `x`.

const HYPHEN_POSITIONS: [usize; 4] = [8, 12, 16, 20];

pub fn is_standard_form(raw: &str) -> bool {
    raw.len() == 36
        && raw.char_indices().all(|(i, c)| match i {
            8 | 13 | 18 | 23 => c == '-',
            _ => c.is_ascii_hexdigit(),
        })
}

pub fn is_short_form(raw: &str) -> bool {
    raw.len() == 32 && raw.chars().all(|c| c.is_ascii_hexdigit())
}

pub fn shorten_uuid(raw: &str) -> String {
    raw.chars().filter(|c| *c != '-').collect()
}

pub fn rehyphenate_uuid(short: &str) -> String {
    let mut out = String::with_capacity(short.len() + HYPHEN_POSITIONS.len());
    for (i, c) in short.chars().enumerate() {
        if HYPHEN_POSITIONS.contains(&i) {
            out.push('-');
        }
        out.push(c);
    }
    out
}
