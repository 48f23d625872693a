//! The fixed tissue label set and its lookup tables.

use serde::Serialize;

/// Description used when a label is not in the tissue table.
pub const UNKNOWN_RESULT: &str = "Unknown result.";

/// Tissue categories the classifier distinguishes, in model output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TissueClass {
    #[serde(rename = "Lung_adenocarcinoma")]
    Adenocarcinoma,
    #[serde(rename = "Lung_benign_tissue")]
    BenignTissue,
    #[serde(rename = "Lung squamous_cell_carcinoma")]
    SquamousCellCarcinoma,
}

impl TissueClass {
    /// All classes, index-aligned with the model's probability vector.
    pub const ALL: [Self; 3] = [
        Self::Adenocarcinoma,
        Self::BenignTissue,
        Self::SquamousCellCarcinoma,
    ];

    /// Number of classes the model scores.
    pub const COUNT: usize = Self::ALL.len();

    /// Class at a probability vector index.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Class with the given display label.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|class| class.label() == label)
    }

    /// Display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Adenocarcinoma => "Lung_adenocarcinoma",
            Self::BenignTissue => "Lung_benign_tissue",
            Self::SquamousCellCarcinoma => "Lung squamous_cell_carcinoma",
        }
    }

    /// Whether the class denotes a cancer.
    #[must_use]
    pub const fn is_malignant(self) -> bool {
        match self {
            Self::Adenocarcinoma | Self::SquamousCellCarcinoma => true,
            Self::BenignTissue => false,
        }
    }

    /// Clinical description shown for the uncertain band, before the
    /// consultation sentence.
    #[must_use]
    pub const fn base_description(self) -> &'static str {
        match self {
            Self::Adenocarcinoma => "This may indicate Lung adenocarcinoma, a type of lung cancer.",
            Self::BenignTissue => "This indicates a benign lung tissue.",
            Self::SquamousCellCarcinoma => {
                "This may indicate Lung squamous cell carcinoma, a type of lung cancer."
            }
        }
    }

    /// Full description shown for the confident band.
    #[must_use]
    pub const fn confident_description(self) -> &'static str {
        match self {
            Self::Adenocarcinoma => {
                "This may indicate Lung adenocarcinoma, a type of lung cancer. Please consult a doctor."
            }
            Self::BenignTissue => {
                "This indicates a benign lung tissue. However, regular checkups are recommended."
            }
            Self::SquamousCellCarcinoma => {
                "This may indicate Lung squamous cell carcinoma, a type of lung cancer. Please consult a doctor."
            }
        }
    }

    /// Presentation emphasis for this class.
    #[must_use]
    pub const fn emphasis(self) -> Emphasis {
        if self.is_malignant() {
            Emphasis::Danger
        } else {
            Emphasis::Safe
        }
    }
}

impl std::fmt::Display for TissueClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Presentation hint for highlighting a verdict's label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Emphasis {
    Safe,
    Danger,
    Neutral,
}

impl Emphasis {
    /// Emphasis for a label string; labels outside the table are neutral.
    #[must_use]
    pub fn for_label(label: &str) -> Self {
        TissueClass::from_label(label).map_or(Self::Neutral, TissueClass::emphasis)
    }

    /// Tag name used by presentation code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Safe => "safe",
            Self::Danger => "danger",
            Self::Neutral => "neutral",
        }
    }
}

impl std::fmt::Display for Emphasis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
