//! Note table and frequency/interval conversions
//!
//! Range boundaries are labelled with the nearest entry of a note table. The
//! default table is the 49-note equal-tempered span C2..C6 (A4 = 440 Hz) with
//! frequencies rounded to 0.01 Hz. Tables are plain values, so a segmenter can
//! be built with an alternate tuning.

/// Label used for unknown (≤ 0 Hz) frequencies
pub const UNKNOWN_NOTE: &str = "N/A";

/// Equal-tempered C2..C6, A4 = 440 Hz
const STANDARD_NOTES: [(&str, f64); 49] = [
    ("C2", 65.41),
    ("C#2", 69.30),
    ("D2", 73.42),
    ("D#2", 77.78),
    ("E2", 82.41),
    ("F2", 87.31),
    ("F#2", 92.50),
    ("G2", 98.00),
    ("G#2", 103.83),
    ("A2", 110.00),
    ("A#2", 116.54),
    ("B2", 123.47),
    ("C3", 130.81),
    ("C#3", 138.59),
    ("D3", 146.83),
    ("D#3", 155.56),
    ("E3", 164.81),
    ("F3", 174.61),
    ("F#3", 185.00),
    ("G3", 196.00),
    ("G#3", 207.65),
    ("A3", 220.00),
    ("A#3", 233.08),
    ("B3", 246.94),
    ("C4", 261.63),
    ("C#4", 277.18),
    ("D4", 293.66),
    ("D#4", 311.13),
    ("E4", 329.63),
    ("F4", 349.23),
    ("F#4", 369.99),
    ("G4", 392.00),
    ("G#4", 415.30),
    ("A4", 440.00),
    ("A#4", 466.16),
    ("B4", 493.88),
    ("C5", 523.25),
    ("C#5", 554.37),
    ("D5", 587.33),
    ("D#5", 622.25),
    ("E5", 659.25),
    ("F5", 698.46),
    ("F#5", 739.99),
    ("G5", 783.99),
    ("G#5", 830.61),
    ("A5", 880.00),
    ("A#5", 932.33),
    ("B5", 987.77),
    ("C6", 1046.50),
];

const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// A named reference pitch
#[derive(Debug, Clone, PartialEq)]
pub struct Note {
    /// Note name with octave (e.g., "A4")
    pub name: String,
    /// Reference frequency in Hz
    pub frequency: f64,
}

/// Ordered table of reference notes used for nearest-note labelling
#[derive(Debug, Clone, PartialEq)]
pub struct NoteTable {
    notes: Vec<Note>,
}

impl Default for NoteTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl NoteTable {
    /// The fixed C2..C6 table
    pub fn standard() -> Self {
        Self {
            notes: STANDARD_NOTES
                .iter()
                .map(|(name, frequency)| Note {
                    name: (*name).to_string(),
                    frequency: *frequency,
                })
                .collect(),
        }
    }

    /// Generate an equal-tempered table over an inclusive MIDI note span
    ///
    /// # Arguments
    ///
    /// * `reference_a4` - Frequency of A4 (MIDI 69) in Hz
    /// * `lowest_midi` - First MIDI note of the table
    /// * `highest_midi` - Last MIDI note of the table
    ///
    /// # Example
    ///
    /// ```
    /// use vocal_profile::features::notes::NoteTable;
    ///
    /// let baroque = NoteTable::equal_tempered(415.0, 36, 84);
    /// assert_eq!(baroque.len(), 49);
    /// assert_eq!(baroque.nearest(415.0), "A4");
    /// ```
    pub fn equal_tempered(reference_a4: f64, lowest_midi: u8, highest_midi: u8) -> Self {
        let notes = (lowest_midi..=highest_midi)
            .map(|midi| {
                let name = format!(
                    "{}{}",
                    NOTE_NAMES[(midi % 12) as usize],
                    (midi / 12) as i32 - 1
                );
                let frequency = reference_a4 * 2f64.powf((midi as f64 - 69.0) / 12.0);
                Note { name, frequency }
            })
            .collect();
        Self { notes }
    }

    /// Build a table from arbitrary entries (order defines tie-breaking)
    pub fn from_notes(notes: Vec<Note>) -> Self {
        Self { notes }
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.notes.len()
    }

    /// True if the table has no entries
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Table entries in order
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// Name of the nearest note by absolute Hz distance
    ///
    /// Ties go to the earlier entry. Frequencies ≤ 0 (unknown) and empty
    /// tables yield [`UNKNOWN_NOTE`].
    pub fn nearest(&self, freq: f64) -> String {
        if freq <= 0.0 || !freq.is_finite() {
            return UNKNOWN_NOTE.to_string();
        }

        let mut best: Option<(&Note, f64)> = None;
        for note in &self.notes {
            let diff = (freq - note.frequency).abs();
            match best {
                Some((_, best_diff)) if diff >= best_diff => {}
                _ => best = Some((note, diff)),
            }
        }

        best.map(|(note, _)| note.name.clone())
            .unwrap_or_else(|| UNKNOWN_NOTE.to_string())
    }
}

/// Interval size `12 · log2(max / min)` in semitones
///
/// Returns 0.0 when either bound is ≤ 0.
pub fn semitone_span(min_freq: f64, max_freq: f64) -> f64 {
    if min_freq <= 0.0 || max_freq <= 0.0 {
        return 0.0;
    }
    12.0 * (max_freq / min_freq).log2()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_table() {
        let table = NoteTable::standard();
        assert_eq!(table.len(), 49);
        assert_eq!(table.notes()[0].name, "C2");
        assert_eq!(table.notes()[48].name, "C6");
    }

    #[test]
    fn test_nearest_note() {
        let table = NoteTable::standard();
        assert_eq!(table.nearest(440.0), "A4");
        assert_eq!(table.nearest(220.0), "A3");
        assert_eq!(table.nearest(225.0), "A3");
        assert_eq!(table.nearest(230.0), "A#3");
        // Beyond the table edges the extreme entries win
        assert_eq!(table.nearest(20.0), "C2");
        assert_eq!(table.nearest(3000.0), "C6");
    }

    #[test]
    fn test_nearest_unknown() {
        let table = NoteTable::standard();
        assert_eq!(table.nearest(0.0), UNKNOWN_NOTE);
        assert_eq!(table.nearest(-5.0), UNKNOWN_NOTE);
        assert_eq!(NoteTable::from_notes(vec![]).nearest(440.0), UNKNOWN_NOTE);
    }

    #[test]
    fn test_nearest_tie_prefers_first() {
        let table = NoteTable::from_notes(vec![
            Note { name: "low".to_string(), frequency: 100.0 },
            Note { name: "high".to_string(), frequency: 200.0 },
        ]);
        assert_eq!(table.nearest(150.0), "low");
    }

    #[test]
    fn test_equal_tempered_matches_standard_names() {
        let generated = NoteTable::equal_tempered(440.0, 36, 84);
        let standard = NoteTable::standard();
        assert_eq!(generated.len(), standard.len());
        for (a, b) in generated.notes().iter().zip(standard.notes()) {
            assert_eq!(a.name, b.name);
            assert!((a.frequency - b.frequency).abs() < 0.01);
        }
    }

    #[test]
    fn test_semitone_span() {
        assert!((semitone_span(220.0, 440.0) - 12.0).abs() < 1e-12);
        assert_eq!(semitone_span(0.0, 440.0), 0.0);
        assert_eq!(semitone_span(220.0, 220.0), 0.0);
    }
}
