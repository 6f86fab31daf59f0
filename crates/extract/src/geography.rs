use serde::{Deserialize, Serialize};

use crate::columns::ColumnPattern;
use crate::fuzzy;
use crate::states;

/// Matches scoring below this are treated as not found.
pub const DEFAULT_THRESHOLD: f64 = 0.6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeographyKind {
    State,
    County,
    Metro,
}

impl GeographyKind {
    /// Title of the geography column in rendered output.
    pub fn column_title(&self) -> &'static str {
        match self {
            Self::State => "State",
            Self::County => "County",
            Self::Metro => "Metro Area",
        }
    }
}

impl std::fmt::Display for GeographyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::State => write!(f, "state"),
            Self::County => write!(f, "county"),
            Self::Metro => write!(f, "metro"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeographyRequest {
    pub name: String,
    pub kind: GeographyKind,
}

impl GeographyRequest {
    pub fn new(name: impl Into<String>, kind: GeographyKind) -> Self {
        Self { name: name.into(), kind }
    }

    /// The fixed 50 states + DC, in table order.
    pub fn states() -> Vec<Self> {
        states::names().map(|n| Self::new(n, GeographyKind::State)).collect()
    }

    /// User-supplied names in order. Blank entries are dropped; duplicates are kept.
    pub fn from_names<I, S>(kind: GeographyKind, names: I) -> Vec<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names
            .into_iter()
            .map(|n| n.as_ref().trim().to_string())
            .filter(|n| !n.is_empty())
            .map(|n| Self::new(n, kind))
            .collect()
    }
}

/// Outcome of resolving one requested name against the header row.
/// `column_block_start == None` means not found; `confidence` is then the
/// best score seen, kept for diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    pub requested_name: String,
    pub matched_header_text: Option<String>,
    pub column_block_start: Option<usize>,
    pub confidence: f64,
}

impl MatchResult {
    pub fn is_match(&self) -> bool {
        self.column_block_start.is_some()
    }

    fn not_found(requested: &str, confidence: f64) -> Self {
        Self {
            requested_name: requested.to_string(),
            matched_header_text: None,
            column_block_start: None,
            confidence,
        }
    }
}

/// Resolves geography names to column blocks. Stateless apart from its
/// settings; every call is a pure function of its arguments.
#[derive(Debug, Clone, Copy)]
pub struct GeographyMatcher {
    kind: GeographyKind,
    threshold: f64,
    containment_bonus: f64,
}

impl GeographyMatcher {
    pub fn new(kind: GeographyKind, threshold: f64) -> Self {
        Self {
            kind,
            threshold,
            containment_bonus: fuzzy::CONTAINMENT_BONUS,
        }
    }

    pub fn with_containment_bonus(mut self, bonus: f64) -> Self {
        self.containment_bonus = bonus;
        self
    }

    /// Find the block whose start header best matches `requested`.
    ///
    /// Only header cells on block boundaries are candidates. When several
    /// candidates share the best score (the same county name under two
    /// states, say), `occurrence` picks among them in column order; an
    /// occurrence past the last tie falls back to the first.
    pub fn match_geography(
        &self,
        requested: &str,
        header_row: &[String],
        pattern: &ColumnPattern,
        occurrence: usize,
    ) -> MatchResult {
        let requested_norm = fuzzy::normalize(requested);
        let requested_state = match self.kind {
            GeographyKind::State => states::canonical(requested),
            _ => None,
        };
        let state_norm = requested_state.map(fuzzy::normalize);

        let mut best = 0.0f64;
        let mut ties: Vec<usize> = Vec::new();

        for col in pattern.block_starts(header_row.len()) {
            let text = &header_row[col];
            if text.trim().is_empty() {
                continue;
            }

            let score = self.score_candidate(&requested_norm, requested_state, state_norm.as_deref(), text);
            if score > best {
                best = score;
                ties.clear();
                ties.push(col);
            } else if score == best && score > 0.0 {
                ties.push(col);
            }
        }

        if ties.is_empty() || best < self.threshold {
            return MatchResult::not_found(requested, best);
        }

        let col = ties.get(occurrence).copied().unwrap_or(ties[0]);
        MatchResult {
            requested_name: requested.to_string(),
            matched_header_text: Some(header_row[col].clone()),
            column_block_start: Some(col),
            confidence: best,
        }
    }

    fn score_candidate(
        &self,
        requested_norm: &str,
        requested_state: Option<&'static str>,
        state_norm: Option<&str>,
        header: &str,
    ) -> f64 {
        // A header naming a state is definitive: it is this state or no match.
        if let Some(state) = requested_state {
            if let Some(other) = states::canonical(header) {
                return if other == state { 1.0 } else { 0.0 };
            }
        }

        let header_norm = fuzzy::normalize(header);
        let bonus = self.containment_bonus;
        let direct = fuzzy::score_with_bonus(requested_norm, &header_norm, bonus);
        match state_norm {
            Some(full) => direct.max(fuzzy::score_with_bonus(full, &header_norm, bonus)),
            None => direct,
        }
    }
}
