//! Scale-name resolution.
//!
//! Scale types are looked up through `rust_music_theory`, the same way the
//! synthesizer's scale snapping does: build the scale on C, read back its
//! notes, and keep their distances from the root.

use rust_music_theory::note::Notes;
use rust_music_theory::scale::{Mode, Scale};

use super::{Interval, Pitch, TheoryError};

/// Split a scale name into its optional tonic and the scale type.
///
/// `"C4 major"` gives `(Some(C4), "major")`, `"major"` gives
/// `(None, "major")`. `:` is accepted as separator too (`"d:minor"`).
pub fn tokenize(name: &str) -> (Option<Pitch>, String) {
    let name = name.trim();
    let split = name
        .find([' ', ':'])
        .map(|i| (&name[..i], name[i + 1..].trim()));

    match split {
        Some((head, rest)) => match Pitch::parse(head) {
            Ok(tonic) => (Some(tonic), rest.to_string()),
            Err(_) => (None, name.to_string()),
        },
        None => match Pitch::parse(name) {
            Ok(tonic) => (Some(tonic), String::new()),
            Err(_) => (None, name.to_string()),
        },
    }
}

/// Scales built from explicit spellings rather than looked up:
/// accepted names and `(steps, semitones)` per degree.
const SPELLED_SCALES: &[(&[&str], &[(i32, i32)])] = &[
    (
        &["major pentatonic", "pentatonic major", "pent maj"],
        &[(0, 0), (1, 2), (2, 4), (4, 7), (5, 9)],
    ),
    (
        &["minor pentatonic", "pentatonic minor", "pent min"],
        &[(0, 0), (2, 3), (3, 5), (4, 7), (6, 10)],
    ),
    (
        &["blues", "minor blues"],
        &[(0, 0), (2, 3), (3, 5), (4, 6), (4, 7), (6, 10)],
    ),
    (
        &["major blues"],
        &[(0, 0), (1, 2), (2, 3), (2, 4), (4, 7), (5, 9)],
    ),
    (
        &["whole tone", "wholetone"],
        &[(0, 0), (1, 2), (2, 4), (3, 6), (4, 8), (6, 10)],
    ),
];

/// Ordered intervals of a scale type, starting with the unison.
///
/// Seven-note scales are spelled one letter per degree (so minor has a
/// minor third, not an augmented second); chromatic uses the conventional
/// spelling of each semitone offset.
pub fn intervals(scale_type: &str) -> Result<Vec<Interval>, TheoryError> {
    let normalized = normalize(scale_type);
    if normalized.is_empty() {
        return Err(TheoryError::UnknownScale(scale_type.to_string()));
    }

    if normalized == "chromatic" {
        return Ok((0..12).map(Interval::from_semitones).collect());
    }

    if let Some((_, degrees)) = SPELLED_SCALES
        .iter()
        .find(|(names, _)| names.contains(&normalized.as_str()))
    {
        return Ok(degrees
            .iter()
            .map(|&(steps, semitones)| Interval::new(steps, semitones))
            .collect());
    }

    let offsets = mode_offsets(scale_type.trim(), &normalized)?;
    if offsets.len() == 7 {
        Ok(offsets
            .iter()
            .zip(0..)
            .map(|(&semitones, steps)| Interval::new(steps, semitones))
            .collect())
    } else {
        Ok(offsets.into_iter().map(Interval::from_semitones).collect())
    }
}

/// Lowercase with runs of whitespace collapsed to one space.
fn normalize(scale_type: &str) -> String {
    scale_type
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Names each mode may be written as.
///
/// `Mode::from_regex` only anchors the start of the name, so `"majorxyz"`
/// or `"minor pentatonic"` would otherwise resolve to a diatonic mode.
fn mode_names(mode: Mode) -> &'static [&'static str] {
    match mode {
        Mode::Ionian => &["major", "maj", "ionian", "m"],
        Mode::Aeolian => &["minor", "min", "aeolian", "m"],
        Mode::Dorian => &["dorian"],
        Mode::Phrygian => &["phrygian"],
        Mode::Lydian => &["lydian"],
        Mode::Mixolydian => &["mixolydian"],
        Mode::Locrian => &["locrian"],
        Mode::HarmonicMinor => &["harmonic minor", "harmonicminor", "har minor"],
        Mode::MelodicMinor => &["melodic minor", "melodicminor", "mel minor"],
    }
}

/// Semitone offsets of a `rust_music_theory` mode, ascending within one octave.
fn mode_offsets(scale_type: &str, normalized: &str) -> Result<Vec<i32>, TheoryError> {
    let unknown = || TheoryError::UnknownScale(scale_type.to_string());

    // The mode regexes tell `M` (major) from `m` (minor), so match on the
    // original text and only compare names case-insensitively.
    let (mode, _) = Mode::from_regex(scale_type).map_err(|_| unknown())?;
    if !mode_names(mode).contains(&normalized) {
        return Err(unknown());
    }

    let scale = Scale::from_regex(&format!("C {}", scale_type)).map_err(|_| unknown())?;
    let mut offsets: Vec<i32> = scale
        .notes()
        .into_iter()
        .map(|n| i32::from(n.pitch_class.into_u8()).rem_euclid(12))
        .collect();
    offsets.sort();
    offsets.dedup();

    if offsets.is_empty() {
        return Err(unknown());
    }
    Ok(offsets)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(intervals: &[Interval]) -> Vec<String> {
        intervals.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_tokenize() {
        assert_eq!(tokenize("C4 major"), (Some(Pitch::C4), "major".to_string()));
        assert_eq!(tokenize("major"), (None, "major".to_string()));
        assert_eq!(
            tokenize("eb harmonic minor"),
            (Some(Pitch::parse("Eb").unwrap()), "harmonic minor".to_string())
        );
        assert_eq!(
            tokenize("d:minor"),
            (Some(Pitch::parse("D").unwrap()), "minor".to_string())
        );
        assert_eq!(tokenize("pentatonic major").0, None);
        assert_eq!(tokenize(""), (None, String::new()));
    }

    #[test]
    fn test_major() {
        assert_eq!(
            names(&intervals("major").unwrap()),
            vec!["1P", "2M", "3M", "4P", "5P", "6M", "7M"]
        );
    }

    #[test]
    fn test_minor_is_spelled_diatonically() {
        assert_eq!(
            names(&intervals("minor").unwrap()),
            vec!["1P", "2M", "3m", "4P", "5P", "6m", "7m"]
        );
    }

    #[test]
    fn test_chromatic() {
        assert_eq!(intervals("chromatic").unwrap().len(), 12);
    }

    #[test]
    fn test_mode_aliases() {
        assert_eq!(intervals("M").unwrap(), intervals("major").unwrap());
        assert_eq!(intervals("m").unwrap(), intervals("minor").unwrap());
        assert_eq!(intervals("Aeolian").unwrap(), intervals("minor").unwrap());
        assert_eq!(
            names(&intervals("harmonic  minor").unwrap()),
            vec!["1P", "2M", "3m", "4P", "5P", "6m", "7M"]
        );
        assert_eq!(names(&intervals("dorian").unwrap())[2], "3m");
    }

    #[test]
    fn test_pentatonic() {
        assert_eq!(
            names(&intervals("minor pentatonic").unwrap()),
            vec!["1P", "3m", "4P", "5P", "7m"]
        );
        assert_eq!(
            names(&intervals("major pentatonic").unwrap()),
            vec!["1P", "2M", "3M", "5P", "6M"]
        );
        assert_eq!(intervals("pent min").unwrap(), intervals("minor pentatonic").unwrap());
    }

    #[test]
    fn test_blues_and_whole_tone() {
        assert_eq!(
            names(&intervals("minor blues").unwrap()),
            vec!["1P", "3m", "4P", "5d", "5P", "7m"]
        );
        assert_eq!(intervals("blues").unwrap().len(), 6);
        assert_eq!(
            names(&intervals("whole tone").unwrap()),
            vec!["1P", "2M", "3M", "4A", "5A", "7m"]
        );
    }

    #[test]
    fn test_unknown() {
        assert!(matches!(intervals(""), Err(TheoryError::UnknownScale(_))));
        assert!(matches!(intervals("fake_mode"), Err(TheoryError::UnknownScale(_))));
        assert!(matches!(intervals("majorxyz"), Err(TheoryError::UnknownScale(_))));
        assert!(matches!(intervals("minor bebop"), Err(TheoryError::UnknownScale(_))));
    }
}
