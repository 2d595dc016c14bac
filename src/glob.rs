/// Hand-rolled fnmatch-style wildcard matching for attachment names.
/// Supports `*` (any sequence, including empty) and `?` (exactly one char).
/// Every other character is literal, so `.`, `[`, `\` etc. need no escaping.
/// Characters are case-folded one at a time and the whole name must match.
pub fn wildcard_match(name: &str, pattern: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let name: Vec<char> = name.chars().collect();
    glob_match_chars(&pattern, &name)
}

// Folding per char keeps `?` aligned with one source char; `İ` lowercases to two.
fn chars_eq_ignore_case(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}

// Two-pointer walk with a single backtrack point at the last `*` seen.
// Linear in practice, no blow-up on runs like `a*a*a*a*b`.
fn glob_match_chars(pattern: &[char], text: &[char]) -> bool {
    let mut pi = 0;
    let mut ti = 0;
    let mut star_pi = usize::MAX;
    let mut star_ti = 0;

    while ti < text.len() {
        if pi < pattern.len()
            && pattern[pi] != '*'
            && (pattern[pi] == '?' || chars_eq_ignore_case(pattern[pi], text[ti]))
        {
            pi += 1;
            ti += 1;
        } else if pi < pattern.len() && pattern[pi] == '*' {
            star_pi = pi;
            star_ti = ti;
            pi += 1;
        } else if star_pi != usize::MAX {
            pi = star_pi + 1;
            star_ti += 1;
            ti = star_ti;
        } else {
            return false;
        }
    }

    while pi < pattern.len() && pattern[pi] == '*' {
        pi += 1;
    }

    pi == pattern.len()
}
