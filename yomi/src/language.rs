//! Language registry: the closed set of recognition languages and the
//! preprocessing strategy each one maps to.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::preprocess::PreprocessStrategy;

/// A supported recognition language, identified by its Tesseract traineddata
/// code. Unknown codes are rejected at parse time, so every value of this
/// type is valid everywhere downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum LanguageCode {
    Vie,
    Eng,
    ChiSim,
    ChiTra,
    Jpn,
    Kor,
    Tha,
    Ara,
    Fra,
    Deu,
    Spa,
    Rus,
    Hin,
}

impl LanguageCode {
    /// Every supported language, in registry order.
    pub const ALL: &'static [LanguageCode] = &[
        LanguageCode::Vie,
        LanguageCode::Eng,
        LanguageCode::ChiSim,
        LanguageCode::ChiTra,
        LanguageCode::Jpn,
        LanguageCode::Kor,
        LanguageCode::Tha,
        LanguageCode::Ara,
        LanguageCode::Fra,
        LanguageCode::Deu,
        LanguageCode::Spa,
        LanguageCode::Rus,
        LanguageCode::Hin,
    ];

    /// Default language applied when a request omits the `language` field.
    pub const DEFAULT: LanguageCode = LanguageCode::Eng;

    pub fn as_str(&self) -> &'static str {
        match self {
            LanguageCode::Vie => "vie",
            LanguageCode::Eng => "eng",
            LanguageCode::ChiSim => "chi_sim",
            LanguageCode::ChiTra => "chi_tra",
            LanguageCode::Jpn => "jpn",
            LanguageCode::Kor => "kor",
            LanguageCode::Tha => "tha",
            LanguageCode::Ara => "ara",
            LanguageCode::Fra => "fra",
            LanguageCode::Deu => "deu",
            LanguageCode::Spa => "spa",
            LanguageCode::Rus => "rus",
            LanguageCode::Hin => "hin",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            LanguageCode::Vie => "Vietnamese",
            LanguageCode::Eng => "English",
            LanguageCode::ChiSim => "Chinese Simplified",
            LanguageCode::ChiTra => "Chinese Traditional",
            LanguageCode::Jpn => "Japanese",
            LanguageCode::Kor => "Korean",
            LanguageCode::Tha => "Thai",
            LanguageCode::Ara => "Arabic",
            LanguageCode::Fra => "French",
            LanguageCode::Deu => "German",
            LanguageCode::Spa => "Spanish",
            LanguageCode::Rus => "Russian",
            LanguageCode::Hin => "Hindi",
        }
    }

    /// The preprocessing strategy for this language. Static classification:
    /// it never fails, it only dispatches.
    pub fn strategy(&self) -> PreprocessStrategy {
        match self {
            LanguageCode::ChiSim | LanguageCode::ChiTra | LanguageCode::Jpn | LanguageCode::Kor => {
                PreprocessStrategy::EastAsian
            }
            LanguageCode::Ara | LanguageCode::Hin => PreprocessStrategy::CurvedScript,
            _ => PreprocessStrategy::LatinDefault,
        }
    }

    /// Whether recognition should also run the alternate single-block
    /// segmentation pass. Dense logographic pages trip up automatic page
    /// segmentation often enough that both outputs are worth returning.
    pub fn wants_alternate_pass(&self) -> bool {
        self.strategy() == PreprocessStrategy::EastAsian
    }

    /// Comma-separated list of every supported code, for error messages.
    pub fn supported_codes() -> String {
        Self::ALL
            .iter()
            .map(|l| l.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LanguageCode {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|l| l.as_str() == s)
            .ok_or(())
    }
}
