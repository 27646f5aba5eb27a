//! Porter stemming algorithm implementation.
//!
//! This is the original 1980 algorithm as published in the reference
//! implementation, including its two departures from the paper
//! (`bli → ble` and `logi → log` in step 2). Documentation indexes are
//! built with this exact variant, so query terms must be stemmed the same way
//! or they silently stop matching.
//!
//! # Algorithm
//!
//! 1. Plurals and -ed/-ing suffixes, then terminal y → i
//! 2. Double suffixes: -ational → -ate, -tional → -tion, ...
//! 3. -icate → -ic, -ative → "", ...
//! 4. Remove -al, -ance, -ence, ... when the stem is long enough
//! 5. Remove a final -e and reduce a final -ll
//!
//! # Examples
//!
//! ```
//! use docsearch::analysis::token_filter::stem::Stemmer;
//! use docsearch::analysis::token_filter::stem::porter::PorterStemmer;
//!
//! let stemmer = PorterStemmer::new();
//!
//! assert_eq!(stemmer.stem("running"), "run");
//! assert_eq!(stemmer.stem("bibliography"), "bibliographi");
//! assert_eq!(stemmer.stem("conditional"), "condit");
//! ```

use crate::analysis::token_filter::stem::Stemmer;

/// Porter stemming algorithm.
#[derive(Debug, Clone, Copy, Default)]
pub struct PorterStemmer;

impl PorterStemmer {
    /// Create a new Porter stemmer.
    pub fn new() -> Self {
        PorterStemmer
    }
}

/// Working buffer for one word.
///
/// `k` is the index of the last live character and `j` marks the end of the
/// stem left by the most recent successful [`Word::ends`] call. Both may go
/// to `-1`, hence `isize`.
struct Word {
    b: Vec<char>,
    k: isize,
    j: isize,
}

impl Word {
    fn char_at(&self, i: isize) -> char {
        if i < 0 {
            '\0'
        } else {
            self.b.get(i as usize).copied().unwrap_or('\0')
        }
    }

    /// True when `b[i]` is a consonant. `y` is a consonant at the start of a
    /// word or after a vowel.
    fn cons(&self, i: isize) -> bool {
        match self.char_at(i) {
            'a' | 'e' | 'i' | 'o' | 'u' => false,
            'y' => i == 0 || !self.cons(i - 1),
            _ => true,
        }
    }

    /// Number of VC sequences in `b[0..=j]`.
    fn measure(&self) -> usize {
        let mut n = 0;
        let mut i = 0isize;

        loop {
            if i > self.j {
                return n;
            }
            if !self.cons(i) {
                break;
            }
            i += 1;
        }
        i += 1;

        loop {
            loop {
                if i > self.j {
                    return n;
                }
                if self.cons(i) {
                    break;
                }
                i += 1;
            }
            i += 1;
            n += 1;

            loop {
                if i > self.j {
                    return n;
                }
                if !self.cons(i) {
                    break;
                }
                i += 1;
            }
            i += 1;
        }
    }

    fn vowel_in_stem(&self) -> bool {
        (0..=self.j).any(|i| !self.cons(i))
    }

    fn double_consonant(&self, j: isize) -> bool {
        j >= 1 && self.char_at(j) == self.char_at(j - 1) && self.cons(j)
    }

    /// consonant-vowel-consonant ending at `i`, where the last consonant is
    /// not w, x or y.
    fn cvc(&self, i: isize) -> bool {
        if i < 2 || !self.cons(i) || self.cons(i - 1) || !self.cons(i - 2) {
            return false;
        }
        !matches!(self.char_at(i), 'w' | 'x' | 'y')
    }

    /// Checks whether `b[0..=k]` ends with `suffix` and, if so, moves `j` to
    /// the character just before it.
    fn ends(&mut self, suffix: &str) -> bool {
        let len = suffix.chars().count() as isize;
        if len > self.k + 1 {
            return false;
        }

        let start = (self.k + 1 - len) as usize;
        let end = (self.k + 1) as usize;
        if !self.b[start..end].iter().copied().eq(suffix.chars()) {
            return false;
        }

        self.j = self.k - len;
        true
    }

    /// Replaces `b[j+1..=k]` with `replacement`.
    fn set_to(&mut self, replacement: &str) {
        self.b.truncate((self.j + 1) as usize);
        self.b.extend(replacement.chars());
        self.k = self.b.len() as isize - 1;
    }

    fn replace_if_measured(&mut self, replacement: &str) {
        if self.measure() > 0 {
            self.set_to(replacement);
        }
    }

    /// Applies the first rule whose suffix matches. A matching suffix ends
    /// the step even when the measure condition rejects the rewrite.
    fn replace_first(&mut self, rules: &[(&str, &str)]) {
        for (suffix, replacement) in rules {
            if self.ends(suffix) {
                self.replace_if_measured(replacement);
                return;
            }
        }
    }

    fn step1ab(&mut self) {
        if self.char_at(self.k) == 's' {
            if self.ends("sses") {
                self.k -= 2;
            } else if self.ends("ies") {
                self.set_to("i");
            } else if self.char_at(self.k - 1) != 's' {
                self.k -= 1;
            }
        }

        if self.ends("eed") {
            if self.measure() > 0 {
                self.k -= 1;
            }
        } else if (self.ends("ed") || self.ends("ing")) && self.vowel_in_stem() {
            self.k = self.j;
            if self.ends("at") {
                self.set_to("ate");
            } else if self.ends("bl") {
                self.set_to("ble");
            } else if self.ends("iz") {
                self.set_to("ize");
            } else if self.double_consonant(self.k) {
                self.k -= 1;
                if matches!(self.char_at(self.k), 'l' | 's' | 'z') {
                    self.k += 1;
                }
            } else if self.measure() == 1 && self.cvc(self.k) {
                self.set_to("e");
            }
        }
    }

    fn step1c(&mut self) {
        if self.ends("y") && self.vowel_in_stem() {
            self.b[self.k as usize] = 'i';
        }
    }

    fn step2(&mut self) {
        let rules: &[(&str, &str)] = match self.char_at(self.k - 1) {
            'a' => &[("ational", "ate"), ("tional", "tion")],
            'c' => &[("enci", "ence"), ("anci", "ance")],
            'e' => &[("izer", "ize")],
            'g' => &[("logi", "log")],
            'l' => &[
                ("bli", "ble"),
                ("alli", "al"),
                ("entli", "ent"),
                ("eli", "e"),
                ("ousli", "ous"),
            ],
            'o' => &[("ization", "ize"), ("ation", "ate"), ("ator", "ate")],
            's' => &[
                ("alism", "al"),
                ("iveness", "ive"),
                ("fulness", "ful"),
                ("ousness", "ous"),
            ],
            't' => &[("aliti", "al"), ("iviti", "ive"), ("biliti", "ble")],
            _ => &[],
        };
        self.replace_first(rules);
    }

    fn step3(&mut self) {
        let rules: &[(&str, &str)] = match self.char_at(self.k) {
            'e' => &[("icate", "ic"), ("ative", ""), ("alize", "al")],
            'i' => &[("iciti", "ic")],
            'l' => &[("ical", "ic"), ("ful", "")],
            's' => &[("ness", "")],
            _ => &[],
        };
        self.replace_first(rules);
    }

    fn step4(&mut self) {
        let suffixes: &[&str] = match self.char_at(self.k - 1) {
            'a' => &["al"],
            'c' => &["ance", "ence"],
            'e' => &["er"],
            'i' => &["ic"],
            'l' => &["able", "ible"],
            'n' => &["ant", "ement", "ment", "ent"],
            'o' => &["ion", "ou"],
            's' => &["ism"],
            't' => &["ate", "iti"],
            'u' => &["ous"],
            'v' => &["ive"],
            'z' => &["ize"],
            _ => return,
        };

        let matched = if suffixes[0] == "ion" {
            (self.ends("ion") && matches!(self.char_at(self.j), 's' | 't')) || self.ends("ou")
        } else {
            suffixes.iter().any(|suffix| self.ends(suffix))
        };

        if matched && self.measure() > 1 {
            self.k = self.j;
        }
    }

    fn step5(&mut self) {
        self.j = self.k;

        if self.char_at(self.k) == 'e' {
            let m = self.measure();
            if m > 1 || (m == 1 && !self.cvc(self.k - 1)) {
                self.k -= 1;
            }
        }

        if self.char_at(self.k) == 'l' && self.double_consonant(self.k) && self.measure() > 1 {
            self.k -= 1;
        }
    }

    fn finish(self) -> String {
        self.b[..(self.k + 1) as usize].iter().collect()
    }
}

impl Stemmer for PorterStemmer {
    fn stem(&self, word: &str) -> String {
        let lowered = word.to_lowercase();
        let chars: Vec<char> = lowered.chars().collect();
        if chars.len() <= 2 {
            return lowered;
        }

        let mut word = Word {
            k: chars.len() as isize - 1,
            j: 0,
            b: chars,
        };

        word.step1ab();
        if word.k > 0 {
            word.step1c();
            word.step2();
            word.step3();
            word.step4();
            word.step5();
        }
        word.finish()
    }

    fn name(&self) -> &'static str {
        "porter"
    }
}
