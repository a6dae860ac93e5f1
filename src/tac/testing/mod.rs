//! Test harness for TAC samples
//!
//!     Tests must not make up TAC text inline. Small details are easy to get wrong (a
//!     missing slash in a validity period, an aerodrome with five letters) and the test
//!     then passes for the wrong reason. All sample text lives in the `samples/` library,
//!     organized by message family:
//!
//!         samples/
//!             metar/001-minimal.tac
//!             taf/001-winter-changes.tac
//!             sigmet/001-cancel-airmet.tac
//!             swx/001-hf-com.tac
//!
//!     Each file is named `NNN-description.tac`; the number is unique within its family
//!     and is how tests refer to the sample. The line break ending the file is not part of
//!     the sample, every other byte is (including any `\r\n` row endings).
//!
//! Usage
//!
//!     ```rust,ignore
//!     use tac_parser::tac::testing::{SampleFamily, TacSamples};
//!
//!     let source = TacSamples::taf(1).source();
//!     let sequence = TacSamples::load(SampleFamily::Sigmet, 1).lex();
//!     ```

use crate::tac::hints::ConversionHints;
use crate::tac::lexing::Lexer;
use crate::tac::sequence::TokenSequence;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Message families in the sample library
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleFamily {
    Metar,
    Taf,
    Sigmet,
    SpaceWeather,
}

impl SampleFamily {
    pub const ALL: [SampleFamily; 4] = [
        SampleFamily::Metar,
        SampleFamily::Taf,
        SampleFamily::Sigmet,
        SampleFamily::SpaceWeather,
    ];

    fn dir_name(&self) -> &'static str {
        match self {
            SampleFamily::Metar => "metar",
            SampleFamily::Taf => "taf",
            SampleFamily::Sigmet => "sigmet",
            SampleFamily::SpaceWeather => "swx",
        }
    }
}

#[derive(Debug, Error)]
pub enum SampleError {
    #[error("no sample {number:03} for {family:?} in {dir}")]
    NotFound {
        family: SampleFamily,
        number: usize,
        dir: String,
    },

    #[error("duplicate sample number {number:03} for {family:?}: {files}")]
    Duplicate {
        family: SampleFamily,
        number: usize,
        files: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Fluent handle to one sample
#[derive(Debug, Clone, Copy)]
pub struct SampleLoader {
    family: SampleFamily,
    number: usize,
}

impl SampleLoader {
    pub fn family(&self) -> SampleFamily {
        self.family
    }

    pub fn number(&self) -> usize {
        self.number
    }

    pub fn path(&self) -> PathBuf {
        TacSamples::must_find(self.family, self.number)
    }

    /// The sample text, panicking when the sample does not exist.
    pub fn source(&self) -> String {
        TacSamples::must_get_source_for(self.family, self.number)
    }

    /// Lex the sample with default hints.
    pub fn lex(&self) -> TokenSequence {
        self.lex_with_hints(&ConversionHints::default())
    }

    pub fn lex_with_hints(&self, hints: &ConversionHints) -> TokenSequence {
        Lexer::with_hints(hints.clone()).lex(&self.source())
    }
}

pub struct TacSamples;

impl TacSamples {
    /// The sample library root, independent of the directory tests run from
    pub fn samples_dir() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("samples")
    }

    fn family_dir(family: SampleFamily) -> PathBuf {
        Self::samples_dir().join(family.dir_name())
    }

    pub fn load(family: SampleFamily, number: usize) -> SampleLoader {
        SampleLoader { family, number }
    }

    pub fn metar(number: usize) -> SampleLoader {
        Self::load(SampleFamily::Metar, number)
    }

    pub fn taf(number: usize) -> SampleLoader {
        Self::load(SampleFamily::Taf, number)
    }

    pub fn sigmet(number: usize) -> SampleLoader {
        Self::load(SampleFamily::Sigmet, number)
    }

    pub fn space_weather(number: usize) -> SampleLoader {
        Self::load(SampleFamily::SpaceWeather, number)
    }

    /// Every sample number of `family`, ascending.
    pub fn numbers(family: SampleFamily) -> Result<Vec<usize>, SampleError> {
        let mut numbers = Vec::new();
        for entry in fs::read_dir(Self::family_dir(family))? {
            let name = entry?.file_name();
            if let Some(number) = name.to_str().and_then(sample_number) {
                numbers.push(number);
            }
        }
        numbers.sort_unstable();
        numbers.dedup();
        Ok(numbers)
    }

    /// Find the file for a sample.
    ///
    /// Two files with the same number in one family is an error: the number is the only
    /// thing tests use to tell samples apart.
    pub fn find(family: SampleFamily, number: usize) -> Result<PathBuf, SampleError> {
        let dir = Self::family_dir(family);
        let mut matching = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            let name = entry.file_name();
            if name.to_str().and_then(sample_number) == Some(number) {
                matching.push(entry.path());
            }
        }
        matching.sort();

        match matching.len() {
            0 => Err(SampleError::NotFound {
                family,
                number,
                dir: dir.display().to_string(),
            }),
            1 => Ok(matching.remove(0)),
            _ => Err(SampleError::Duplicate {
                family,
                number,
                files: matching
                    .iter()
                    .map(|path| path.display().to_string())
                    .collect::<Vec<_>>()
                    .join(", "),
            }),
        }
    }

    pub fn get_source_for(family: SampleFamily, number: usize) -> Result<String, SampleError> {
        let path = Self::find(family, number)?;
        let content = fs::read_to_string(path)?;
        Ok(strip_final_line_break(&content).to_string())
    }

    // ===== "must_" variants panic with the reason =====

    pub fn must_find(family: SampleFamily, number: usize) -> PathBuf {
        Self::find(family, number)
            .unwrap_or_else(|e| panic!("Failed to find {:?} #{}: {}", family, number, e))
    }

    pub fn must_get_source_for(family: SampleFamily, number: usize) -> String {
        Self::get_source_for(family, number)
            .unwrap_or_else(|e| panic!("Failed to load {:?} #{}: {}", family, number, e))
    }
}

/// `012-name.tac` is sample 12
fn sample_number(file_name: &str) -> Option<usize> {
    let stem = file_name.strip_suffix(".tac")?;
    let (number, _) = stem.split_once('-')?;
    if number.len() != 3 {
        return None;
    }
    number.parse().ok()
}

fn strip_final_line_break(content: &str) -> &str {
    content
        .strip_suffix("\r\n")
        .or_else(|| content.strip_suffix('\n'))
        .unwrap_or(content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_number() {
        assert_eq!(sample_number("001-minimal.tac"), Some(1));
        assert_eq!(sample_number("120-long-name-here.tac"), Some(120));
        assert_eq!(sample_number("01-short.tac"), None);
        assert_eq!(sample_number("001-minimal.txt"), None);
        assert_eq!(sample_number("README.md"), None);
    }

    #[test]
    fn test_strip_final_line_break() {
        assert_eq!(strip_final_line_break("TAF=\n"), "TAF=");
        assert_eq!(strip_final_line_break("TAF=\r\n"), "TAF=");
        assert_eq!(strip_final_line_break("A\r\nB="), "A\r\nB=");
    }

    #[test]
    fn test_load_sample() {
        assert_eq!(TacSamples::metar(1).source(), "METAR EFHK 011750Z=");
        assert!(TacSamples::sigmet(1).source().contains("\r\n"));
    }

    #[test]
    fn test_every_family_has_samples() {
        for family in SampleFamily::ALL {
            let numbers = TacSamples::numbers(family).unwrap();
            assert!(!numbers.is_empty(), "{:?} has no samples", family);
            for number in numbers {
                assert!(TacSamples::find(family, number).is_ok());
            }
        }
    }

    #[test]
    fn test_missing_sample() {
        let err = TacSamples::get_source_for(SampleFamily::Taf, 999).unwrap_err();
        assert!(matches!(err, SampleError::NotFound { number: 999, .. }));
    }
}
