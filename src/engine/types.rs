//! Engine Types
//!
//! Core types for the risk scoring engine.
//! No scoring logic here - only data structures.

use serde::{Deserialize, Serialize};

// ============================================================================
// EVIDENCE INDICATORS
// ============================================================================

/// The closed set of evidence indicators an assessor can mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Indicator {
    /// Writing style does not match the author's known work
    StyleMismatch,
    /// Implausibly short or irregular production timeline
    SuspiciousTiming,
    /// Cited references cannot be located or verified
    UnverifiableReferences,
    /// Reported data contradicts itself or its sources
    InconsistentData,
    /// Figures or images show signs of manipulation or reuse
    SuspiciousImages,
    /// No drafts or intermediate versions were produced
    NoDrafts,
    /// Author could not explain the work when questioned
    WeakDefense,
}

impl Indicator {
    pub const ALL: [Indicator; 7] = [
        Indicator::StyleMismatch,
        Indicator::SuspiciousTiming,
        Indicator::UnverifiableReferences,
        Indicator::InconsistentData,
        Indicator::SuspiciousImages,
        Indicator::NoDrafts,
        Indicator::WeakDefense,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Indicator::StyleMismatch => "style_mismatch",
            Indicator::SuspiciousTiming => "suspicious_timing",
            Indicator::UnverifiableReferences => "unverifiable_references",
            Indicator::InconsistentData => "inconsistent_data",
            Indicator::SuspiciousImages => "suspicious_images",
            Indicator::NoDrafts => "no_drafts",
            Indicator::WeakDefense => "weak_defense",
        }
    }

    /// Parse a raw submission key. Unknown keys return None and are
    /// silently dropped by the normalizer.
    pub fn from_key(key: &str) -> Option<Self> {
        Indicator::ALL.iter().copied().find(|i| i.key() == key)
    }
}

// ============================================================================
// EVIDENCE RECORD
// ============================================================================

/// A complete, normalized evidence submission.
///
/// Every indicator in the closed set is present; a missing input
/// defaults to false. Construct through `evidence::normalize`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceRecord {
    pub style_mismatch: bool,
    pub suspicious_timing: bool,
    pub unverifiable_references: bool,
    pub inconsistent_data: bool,
    pub suspicious_images: bool,
    pub no_drafts: bool,
    pub weak_defense: bool,
}

impl EvidenceRecord {
    /// Build a record with the given indicators set (test and caller convenience)
    pub fn with(indicators: &[Indicator]) -> Self {
        let mut record = Self::default();
        for indicator in indicators {
            record.set(*indicator, true);
        }
        record
    }

    pub fn is_set(&self, indicator: Indicator) -> bool {
        match indicator {
            Indicator::StyleMismatch => self.style_mismatch,
            Indicator::SuspiciousTiming => self.suspicious_timing,
            Indicator::UnverifiableReferences => self.unverifiable_references,
            Indicator::InconsistentData => self.inconsistent_data,
            Indicator::SuspiciousImages => self.suspicious_images,
            Indicator::NoDrafts => self.no_drafts,
            Indicator::WeakDefense => self.weak_defense,
        }
    }

    pub fn set(&mut self, indicator: Indicator, present: bool) {
        match indicator {
            Indicator::StyleMismatch => self.style_mismatch = present,
            Indicator::SuspiciousTiming => self.suspicious_timing = present,
            Indicator::UnverifiableReferences => self.unverifiable_references = present,
            Indicator::InconsistentData => self.inconsistent_data = present,
            Indicator::SuspiciousImages => self.suspicious_images = present,
            Indicator::NoDrafts => self.no_drafts = present,
            Indicator::WeakDefense => self.weak_defense = present,
        }
    }

    /// Indicator as a 0/1 weight input
    pub fn value(&self, indicator: Indicator) -> f64 {
        if self.is_set(indicator) {
            1.0
        } else {
            0.0
        }
    }

    /// Number of indicators marked present
    pub fn true_count(&self) -> usize {
        Indicator::ALL.iter().filter(|i| self.is_set(**i)).count()
    }
}

// ============================================================================
// DIMENSIONS
// ============================================================================

/// Named clusters of indicators scored together.
///
/// Declaration order is fixed and drives the ordering of
/// dimension-driven recommendations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    AuthorshipStyle,
    TimingProcess,
    ReferencesData,
    Presentation,
}

impl Dimension {
    pub const ALL: [Dimension; 4] = [
        Dimension::AuthorshipStyle,
        Dimension::TimingProcess,
        Dimension::ReferencesData,
        Dimension::Presentation,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Dimension::AuthorshipStyle => "authorship_style",
            Dimension::TimingProcess => "timing_process",
            Dimension::ReferencesData => "references_data",
            Dimension::Presentation => "presentation",
        }
    }
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// One dimension's normalized score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DimensionScore {
    pub dimension: Dimension,
    pub score: f64,
}

// ============================================================================
// RISK LEVEL
// ============================================================================

/// Overall risk classification, ordered low to high
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
        }
    }

    pub fn severity_level(&self) -> u8 {
        match self {
            RiskLevel::Low => 0,
            RiskLevel::Medium => 1,
            RiskLevel::High => 2,
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "LOW" => Some(RiskLevel::Low),
            "MEDIUM" => Some(RiskLevel::Medium),
            "HIGH" => Some(RiskLevel::High),
            _ => None,
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// CONTEXT FACTORS
// ============================================================================

/// Role of the person who submitted the work.
///
/// Multipliers act only as risk amplifiers or dampeners, never as
/// independent risk sources. Values are configuration defaults with
/// no empirical calibration behind them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthorRole {
    Student,
    FacultyResearcher,
    ResearchTrainee,
    ExternalCoInvestigator,
    Other,
}

impl AuthorRole {
    pub fn multiplier(&self) -> f64 {
        match self {
            AuthorRole::Student => 1.0,
            AuthorRole::FacultyResearcher => 0.7,
            AuthorRole::ResearchTrainee => 0.9,
            AuthorRole::ExternalCoInvestigator => 0.6,
            AuthorRole::Other => 0.8,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            AuthorRole::Student => "Student",
            AuthorRole::FacultyResearcher => "Faculty Researcher",
            AuthorRole::ResearchTrainee => "Research Trainee",
            AuthorRole::ExternalCoInvestigator => "External Co-investigator",
            AuthorRole::Other => "Other",
        }
    }

    /// Parse an inbound role name. Unrecognized names return None,
    /// which the adjuster treats as a neutral multiplier of 1.0.
    pub fn from_name(name: &str) -> Option<Self> {
        [
            AuthorRole::Student,
            AuthorRole::FacultyResearcher,
            AuthorRole::ResearchTrainee,
            AuthorRole::ExternalCoInvestigator,
            AuthorRole::Other,
        ]
        .into_iter()
        .find(|r| r.name().eq_ignore_ascii_case(name))
    }
}

/// Type of academic product under analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentType {
    Essay,
    JournalArticle,
    Thesis,
    TechnicalReport,
    Coursework,
    CapstoneProject,
    Other,
}

impl DocumentType {
    pub fn multiplier(&self) -> f64 {
        match self {
            DocumentType::Essay => 0.8,
            DocumentType::JournalArticle => 1.1,
            DocumentType::Thesis => 1.2,
            DocumentType::TechnicalReport => 0.9,
            DocumentType::Coursework => 0.9,
            DocumentType::CapstoneProject => 1.1,
            DocumentType::Other => 1.0,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DocumentType::Essay => "Essay",
            DocumentType::JournalArticle => "Journal Article",
            DocumentType::Thesis => "Thesis",
            DocumentType::TechnicalReport => "Technical Report",
            DocumentType::Coursework => "Coursework",
            DocumentType::CapstoneProject => "Capstone Project",
            DocumentType::Other => "Other",
        }
    }

    /// Parse an inbound document-type name. Unrecognized names return
    /// None, which the adjuster treats as a neutral multiplier of 1.0.
    pub fn from_name(name: &str) -> Option<Self> {
        [
            DocumentType::Essay,
            DocumentType::JournalArticle,
            DocumentType::Thesis,
            DocumentType::TechnicalReport,
            DocumentType::Coursework,
            DocumentType::CapstoneProject,
            DocumentType::Other,
        ]
        .into_iter()
        .find(|t| t.name().eq_ignore_ascii_case(name))
    }
}

/// Resolved contextual multipliers for one analysis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContextFactors {
    pub role_multiplier: f64,
    pub document_multiplier: f64,
}

impl ContextFactors {
    /// Look up multipliers from raw role/type names. Unknown names
    /// fall back to 1.0 each - a deliberate permissiveness policy,
    /// never an error.
    pub fn resolve(role: &str, document_type: &str) -> Self {
        Self {
            role_multiplier: AuthorRole::from_name(role)
                .map(|r| r.multiplier())
                .unwrap_or(1.0),
            document_multiplier: DocumentType::from_name(document_type)
                .map(|t| t.multiplier())
                .unwrap_or(1.0),
        }
    }

    pub fn combined(&self) -> f64 {
        self.role_multiplier * self.document_multiplier
    }
}

impl Default for ContextFactors {
    fn default() -> Self {
        Self {
            role_multiplier: 1.0,
            document_multiplier: 1.0,
        }
    }
}

// ============================================================================
// SCORE RESULT
// ============================================================================

/// Result of one scoring pass. Immutable once produced; the engine
/// hands it off by value and never mutates it afterwards.
///
/// `confidence` is a dispersion-based heuristic - high when the
/// dimensions agree with each other, boosted by the number of raw
/// signals marked present. It is NOT a statistical probability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    /// Adjusted per-dimension scores, in declaration order
    pub dimension_scores: Vec<DimensionScore>,
    /// Overall risk score, 0-100
    pub overall: u8,
    pub level: RiskLevel,
    /// Dispersion heuristic, 0-1
    pub confidence: f64,
    /// Dimensions whose adjusted score exceeds the critical threshold
    pub critical_dimensions: Vec<Dimension>,
    /// Level-driven recommendations first, then dimension-driven in
    /// declaration order
    pub recommendations: Vec<String>,
    /// Scoring rules version that produced this result
    pub model_version: String,
}

/// Sanity report over a produced ScoreResult
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub low_confidence: bool,
    pub warnings: Vec<String>,
}
