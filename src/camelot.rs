use std::fmt;

/// Minor/major side of the Camelot wheel: A = minor, B = major.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyLetter {
    A,
    B,
}

impl KeyLetter {
    pub fn opposite(self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::A,
        }
    }

    fn as_char(self) -> char {
        match self {
            Self::A => 'A',
            Self::B => 'B',
        }
    }
}

/// Normalized Camelot wheel coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CamelotKey {
    /// Wheel position, 1-12.
    pub number: u8,
    pub letter: KeyLetter,
}

impl fmt::Display for CamelotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.number, self.letter.as_char())
    }
}

/// How two Camelot coordinates relate for mixing purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyRelation {
    Identical,
    Adjacent,
    Unrelated,
}

impl KeyRelation {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Identical => "identical",
            Self::Adjacent => "adjacent",
            Self::Unrelated => "unrelated",
        }
    }
}

/// Parse strict Camelot notation: `<1-12><A|B>`, case-insensitive, trimmed.
/// Anything else, including traditional notation, yields `None`.
pub fn parse_camelot(raw: &str) -> Option<CamelotKey> {
    let trimmed = raw.trim();
    if !trimmed.is_ascii() || trimmed.len() < 2 {
        return None;
    }
    let (number_str, letter_str) = trimmed.split_at(trimmed.len() - 1);
    let letter = match letter_str {
        "A" | "a" => KeyLetter::A,
        "B" | "b" => KeyLetter::B,
        _ => return None,
    };
    let number: u8 = number_str.parse().ok()?;
    if !(1..=12).contains(&number) {
        return None;
    }
    Some(CamelotKey { number, letter })
}

/// Translate traditional key notation to a Camelot coordinate.
///
/// Total over the 24 standard major/minor keys: every root accepts both
/// enharmonic spellings (`C#`/`Db`), Unicode accidentals (♯/♭), and the
/// suffixes `m`/`min`/`minor` for minor and ``/`maj`/`major` for major.
pub fn from_traditional(raw: &str) -> Option<CamelotKey> {
    let normalized = raw.trim().replace('\u{266F}', "#").replace('\u{266D}', "b");
    if normalized.is_empty() || !normalized.is_ascii() {
        return None;
    }
    let lower = normalized.to_ascii_lowercase();

    let (root_raw, is_minor) = if lower.ends_with("minor") && normalized.len() > 5 {
        (&normalized[..normalized.len() - 5], true)
    } else if lower.ends_with("min") && normalized.len() > 3 {
        (&normalized[..normalized.len() - 3], true)
    } else if lower.ends_with('m') && normalized.len() > 1 {
        (&normalized[..normalized.len() - 1], true)
    } else if lower.ends_with("major") && normalized.len() > 5 {
        (&normalized[..normalized.len() - 5], false)
    } else if lower.ends_with("maj") && normalized.len() > 3 {
        (&normalized[..normalized.len() - 3], false)
    } else {
        (normalized.as_str(), false)
    };
    let root = normalize_root(root_raw)?;

    let number = if is_minor {
        match root.as_str() {
            "G#" | "Ab" => 1,
            "D#" | "Eb" => 2,
            "A#" | "Bb" => 3,
            "F" => 4,
            "C" => 5,
            "G" => 6,
            "D" => 7,
            "A" => 8,
            "E" => 9,
            "B" => 10,
            "F#" | "Gb" => 11,
            "C#" | "Db" => 12,
            _ => return None,
        }
    } else {
        match root.as_str() {
            "B" => 1,
            "F#" | "Gb" => 2,
            "C#" | "Db" => 3,
            "G#" | "Ab" => 4,
            "D#" | "Eb" => 5,
            "A#" | "Bb" => 6,
            "F" => 7,
            "C" => 8,
            "G" => 9,
            "D" => 10,
            "A" => 11,
            "E" => 12,
            _ => return None,
        }
    };
    let letter = if is_minor { KeyLetter::A } else { KeyLetter::B };
    Some(CamelotKey { number, letter })
}

fn normalize_root(root: &str) -> Option<String> {
    let stripped: String = root.chars().filter(|ch| !ch.is_whitespace()).collect();
    if stripped.is_empty() {
        return None;
    }
    let mut chars = stripped.chars();
    let letter = chars.next()?.to_ascii_uppercase();
    if !matches!(letter, 'A' | 'B' | 'C' | 'D' | 'E' | 'F' | 'G') {
        return None;
    }

    let accidental = chars.next();
    if chars.next().is_some() {
        return None;
    }

    let normalized = match accidental {
        Some('#') => format!("{letter}#"),
        Some('b') | Some('B') => format!("{letter}b"),
        Some(_) => return None,
        None => letter.to_string(),
    };
    Some(normalized)
}

/// Parse any supported key string: Camelot first, then traditional.
pub fn parse_key(raw: &str) -> Option<CamelotKey> {
    parse_camelot(raw).or_else(|| from_traditional(raw))
}

/// Classify a pair of coordinates: identical, adjacent on the wheel
/// (same letter one step apart, wrapping 12 to 1, or the relative
/// major/minor at the same number), or unrelated.
pub fn relation(a: CamelotKey, b: CamelotKey) -> KeyRelation {
    if a == b {
        return KeyRelation::Identical;
    }
    if a.number == b.number {
        return KeyRelation::Adjacent;
    }
    if a.letter == b.letter {
        let step = (i16::from(a.number) - i16::from(b.number)).rem_euclid(12);
        if step == 1 || step == 11 {
            return KeyRelation::Adjacent;
        }
    }
    KeyRelation::Unrelated
}

/// True when the pair is identical or adjacent.
pub fn are_adjacent(a: CamelotKey, b: CamelotKey) -> bool {
    relation(a, b) != KeyRelation::Unrelated
}

/// The coordinates that mix cleanly with `key`: itself, one step down,
/// one step up, and the relative major/minor.
pub fn compatible_keys(key: CamelotKey) -> Vec<CamelotKey> {
    let down = if key.number == 1 { 12 } else { key.number - 1 };
    let up = if key.number == 12 { 1 } else { key.number + 1 };
    vec![
        key,
        CamelotKey { number: down, letter: key.letter },
        CamelotKey { number: up, letter: key.letter },
        CamelotKey { number: key.number, letter: key.letter.opposite() },
    ]
}
