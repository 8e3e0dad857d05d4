use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of speech pattern categories the classifier reports,
/// including the no-pattern category (`Normal`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternCategory {
    Normal,
    Blocking,
    Prolongation,
    SoundRepetition,
    WordRepetition,
    Interjection,
}

impl PatternCategory {
    pub const ALL: [PatternCategory; 6] = [
        PatternCategory::Normal,
        PatternCategory::Blocking,
        PatternCategory::Prolongation,
        PatternCategory::SoundRepetition,
        PatternCategory::WordRepetition,
        PatternCategory::Interjection,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            PatternCategory::Normal => "normal",
            PatternCategory::Blocking => "blocking",
            PatternCategory::Prolongation => "prolongation",
            PatternCategory::SoundRepetition => "sound_repetition",
            PatternCategory::WordRepetition => "word_repetition",
            PatternCategory::Interjection => "interjection",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "normal" => Some(PatternCategory::Normal),
            "blocking" => Some(PatternCategory::Blocking),
            "prolongation" => Some(PatternCategory::Prolongation),
            "sound_repetition" => Some(PatternCategory::SoundRepetition),
            "word_repetition" => Some(PatternCategory::WordRepetition),
            "interjection" => Some(PatternCategory::Interjection),
            _ => None,
        }
    }
}

impl fmt::Display for PatternCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Keyword rules for mapping free-text classifier labels onto categories.
///
/// Rules are tried in order and the first whose keywords all appear in the
/// lowercased label wins. Compound repetition categories come before the
/// single-keyword ones so a label mentioning "sound", "word", and "rep" lands
/// on sound-repetition deterministically; `Normal` comes last so fluent
/// wording never shadows a pattern label.
const KEYWORD_RULES: &[(PatternCategory, &[&str])] = &[
    (PatternCategory::SoundRepetition, &["sound", "rep"]),
    (PatternCategory::WordRepetition, &["word", "rep"]),
    (PatternCategory::Blocking, &["block"]),
    (PatternCategory::Prolongation, &["prolong"]),
    (PatternCategory::Interjection, &["interject"]),
    (PatternCategory::Normal, &["normal"]),
    (PatternCategory::Normal, &["nostutter"]),
    (PatternCategory::Normal, &["no-stutter"]),
    (PatternCategory::Normal, &["no_stutter"]),
    (PatternCategory::Normal, &["fluent"]),
];

/// Map a raw classifier label to a category by case-insensitive keyword
/// matching. Labels matching no rule return `None`; the caller decides how
/// they count (they still contribute to the normalization denominator).
pub fn classify_label(label: &str) -> Option<PatternCategory> {
    let lowered = label.to_lowercase();
    KEYWORD_RULES
        .iter()
        .find(|(_, keywords)| keywords.iter().all(|k| lowered.contains(k)))
        .map(|(category, _)| *category)
}
