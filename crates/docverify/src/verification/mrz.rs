//! Structural checks for Machine Readable Zone lines.
//!
//! Classification is purely length based: two 44-character lines are TD-3
//! (passport booklets), three 30-character lines are TD-1 (ID cards). Anything
//! else cannot be classified and is reported as [`MrzAssessment::Unclassified`],
//! which callers treat as a pass so borderline scans are not blocked.
//!
//! ICAO 9303 check digits are only verified when explicitly requested.

use std::fmt;

const TD3_LINE_LENGTH: usize = 44;
const TD1_LINE_LENGTH: usize = 30;
const CHECK_DIGIT_WEIGHTS: [u32; 3] = [7, 3, 1];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MrzFormat {
    Td1,
    Td3,
}

impl fmt::Display for MrzFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MrzFormat::Td1 => write!(f, "TD-1"),
            MrzFormat::Td3 => write!(f, "TD-3"),
        }
    }
}

/// Raw MRZ lines as extracted. `line3` is only consulted for TD-1.
#[derive(Debug, Clone, Copy)]
pub struct MrzLines<'a> {
    pub line1: &'a str,
    pub line2: &'a str,
    pub line3: Option<&'a str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MrzAssessment {
    Valid(MrzFormat),
    InvalidCharacters { format: MrzFormat, line: usize },
    CheckDigitMismatch { format: MrzFormat, segment: &'static str },
    /// Line lengths match no known format; nothing can be verified.
    Unclassified,
}

impl MrzAssessment {
    pub fn passed(&self) -> bool {
        matches!(self, MrzAssessment::Valid(_) | MrzAssessment::Unclassified)
    }

    pub fn message(&self) -> String {
        match self {
            MrzAssessment::Valid(format) => format!("MRZ format valid ({format})"),
            MrzAssessment::InvalidCharacters { format, line } => format!(
                "MRZ line {line} contains characters outside A-Z, 0-9 and '<' ({format})"
            ),
            MrzAssessment::CheckDigitMismatch { format, segment } => {
                format!("MRZ check digit mismatch for {segment} ({format})")
            }
            MrzAssessment::Unclassified => {
                "MRZ line lengths match no known format; structural check not applied".to_string()
            }
        }
    }
}

pub fn classify(lines: &MrzLines<'_>) -> Option<MrzFormat> {
    let len1 = lines.line1.chars().count();
    let len2 = lines.line2.chars().count();

    if len1 == TD3_LINE_LENGTH && len2 == TD3_LINE_LENGTH {
        return Some(MrzFormat::Td3);
    }

    let len3 = lines.line3.map(|line| line.chars().count());
    if len1 == TD1_LINE_LENGTH && len2 == TD1_LINE_LENGTH && len3 == Some(TD1_LINE_LENGTH) {
        return Some(MrzFormat::Td1);
    }

    None
}

pub fn assess(lines: &MrzLines<'_>, verify_check_digits: bool) -> MrzAssessment {
    let Some(format) = classify(lines) else {
        return MrzAssessment::Unclassified;
    };

    let participating: Vec<&str> = match (format, lines.line3) {
        (MrzFormat::Td1, Some(line3)) => vec![lines.line1, lines.line2, line3],
        _ => vec![lines.line1, lines.line2],
    };

    if let Some(index) = participating.iter().position(|line| !is_mrz_text(line)) {
        return MrzAssessment::InvalidCharacters {
            format,
            line: index + 1,
        };
    }

    if verify_check_digits {
        let mismatch = match format {
            MrzFormat::Td3 => td3_check_digit_mismatch(lines.line2),
            MrzFormat::Td1 => td1_check_digit_mismatch(lines.line1, lines.line2),
        };
        if let Some(segment) = mismatch {
            return MrzAssessment::CheckDigitMismatch { format, segment };
        }
    }

    MrzAssessment::Valid(format)
}

fn is_mrz_text(line: &str) -> bool {
    !line.is_empty()
        && line
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '<')
}

fn char_value(c: u8) -> u32 {
    match c {
        b'0'..=b'9' => u32::from(c - b'0'),
        b'A'..=b'Z' => u32::from(c - b'A') + 10,
        _ => 0,
    }
}

/// ICAO 9303 7-3-1 weighted check digit. Fillers count as zero.
pub fn check_digit(field: &str) -> u32 {
    field
        .bytes()
        .zip(CHECK_DIGIT_WEIGHTS.iter().cycle())
        .map(|(c, weight)| char_value(c) * weight)
        .sum::<u32>()
        % 10
}

fn digit_matches(field: &str, digit: u8) -> bool {
    check_digit(field) == char_value(digit)
}

fn first_mismatch(segments: &[(&'static str, &str, u8)]) -> Option<&'static str> {
    segments
        .iter()
        .find(|(_, field, digit)| !digit_matches(field, *digit))
        .map(|(name, _, _)| *name)
}

// Lines reaching these helpers are ASCII of the classified length.
fn td3_check_digit_mismatch(line2: &str) -> Option<&'static str> {
    let bytes = line2.as_bytes();
    let segments: [(&'static str, &str, u8); 4] = [
        ("document number", &line2[0..9], bytes[9]),
        ("date of birth", &line2[13..19], bytes[19]),
        ("expiry date", &line2[21..27], bytes[27]),
        ("optional data", &line2[28..42], bytes[42]),
    ];
    let failed = first_mismatch(&segments);
    if failed.is_some() {
        return failed;
    }

    let composite = format!("{}{}{}", &line2[0..10], &line2[13..20], &line2[21..43]);
    if !digit_matches(&composite, bytes[43]) {
        return Some("composite");
    }
    None
}

fn td1_check_digit_mismatch(line1: &str, line2: &str) -> Option<&'static str> {
    let upper = line1.as_bytes();
    let lower = line2.as_bytes();
    let segments: [(&'static str, &str, u8); 3] = [
        ("document number", &line1[5..14], upper[14]),
        ("date of birth", &line2[0..6], lower[6]),
        ("expiry date", &line2[8..14], lower[14]),
    ];
    let failed = first_mismatch(&segments);
    if failed.is_some() {
        return failed;
    }

    let composite = format!(
        "{}{}{}{}",
        &line1[5..30],
        &line2[0..7],
        &line2[8..15],
        &line2[18..29]
    );
    if !digit_matches(&composite, lower[29]) {
        return Some("composite");
    }
    None
}
