use crate::stats::WordEntry;

/// Length-and-rarity score of a word.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WordScore {
    pub score: f64,
    pub multiplier: f64,
    pub normalized_frequency: f64,
    pub frequency: u64,
}

/// Multiplier for a normalized frequency, following the OED frequency bands
/// (https://public.oed.com/how-to-use-the-oed/key-to-frequency/).
pub fn band_multiplier(normalized_frequency: f64) -> f64 {
    if normalized_frequency >= 1000.0 {
        0.5 // band 8
    } else if normalized_frequency >= 100.0 {
        0.75 // band 7
    } else if normalized_frequency >= 10.0 {
        1.0 // band 6
    } else if normalized_frequency >= 1.0 {
        1.25 // band 5
    } else if normalized_frequency >= 0.1 {
        1.5 // band 4
    } else if normalized_frequency >= 0.01 {
        1.75 // band 3
    } else if normalized_frequency > 0.0 {
        2.0 // band 2
    } else {
        0.0 // band 1
    }
}

/// Scores a word as its character length times the rarity multiplier of its
/// corpus entry.
pub fn word_score(word: &str, entry: &WordEntry) -> WordScore {
    let multiplier = band_multiplier(entry.normalized_frequency);
    WordScore {
        score: word.chars().count() as f64 * multiplier,
        multiplier,
        normalized_frequency: entry.normalized_frequency,
        frequency: entry.frequency,
    }
}
