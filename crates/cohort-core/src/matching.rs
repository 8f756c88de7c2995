//! Skill matching — pure scoring and ranking over skill/expertise sets.
//!
//! Everything here is a pure function of its inputs: no store access, no
//! clock, no randomness. The service layers feed it profile data and use the
//! results to annotate requests, pick invitation candidates, and fan out
//! event notifications.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─── Modes ───────────────────────────────────────────────────────────────────

/// How two skill strings are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
  /// Case-insensitive equality.
  #[default]
  Exact,
  /// Case-insensitive equality or substring containment in either
  /// direction, so "Machine Learning" matches "learning".
  Fuzzy,
}

impl MatchMode {
  fn matches(&self, a: &str, b: &str) -> bool {
    let (a, b) = (a.trim().to_lowercase(), b.trim().to_lowercase());
    if a.is_empty() || b.is_empty() {
      return false;
    }
    match self {
      Self::Exact => a == b,
      Self::Fuzzy => a == b || a.contains(&b) || b.contains(&a),
    }
  }
}

// ─── Intersection ────────────────────────────────────────────────────────────

/// The entries of `own` that match something in `other`, preserving `own`'s
/// order and casing. Duplicates in `own` (case-insensitively) collapse to
/// their first occurrence.
pub fn shared_skills(
  own: &[String],
  other: &[String],
  mode: MatchMode,
) -> Vec<String> {
  let mut seen = BTreeSet::new();
  own
    .iter()
    .filter(|skill| seen.insert(skill.trim().to_lowercase()))
    .filter(|skill| other.iter().any(|o| mode.matches(skill, o)))
    .cloned()
    .collect()
}

/// The number of distinct matching skills between the two sets.
pub fn overlap(a: &[String], b: &[String], mode: MatchMode) -> usize {
  shared_skills(a, b, mode).len()
}

// ─── Scoring ─────────────────────────────────────────────────────────────────

fn distinct_len(skills: &[String]) -> usize {
  skills
    .iter()
    .map(|s| s.trim().to_lowercase())
    .filter(|s| !s.is_empty())
    .collect::<BTreeSet<_>>()
    .len()
}

/// Score a candidate's skill set against a target set, 0..=100.
///
/// Zero overlap scores zero. Otherwise the base is the overlap ratio against
/// the larger set, as a rounded percentage, plus a small bonus for strong
/// overlaps: +10 for three or more matches, +5 for exactly two. Capped at
/// 100.
pub fn score(candidate: &[String], target: &[String]) -> u8 {
  score_with_mode(candidate, target, MatchMode::Exact)
}

pub fn score_with_mode(
  candidate: &[String],
  target: &[String],
  mode: MatchMode,
) -> u8 {
  let m = overlap(candidate, target, mode);
  if m == 0 {
    return 0;
  }
  let larger = distinct_len(candidate).max(distinct_len(target));
  let base = (m as f64 / larger as f64 * 100.0).round() as u32;
  let bonus = match m {
    0 | 1 => 0,
    2 => 5,
    _ => 10,
  };
  (base + bonus).min(100) as u8
}

// ─── Ranking ─────────────────────────────────────────────────────────────────

/// A candidate offered to [`rank`].
#[derive(Debug, Clone)]
pub struct Candidate<'a> {
  pub id:     Uuid,
  pub skills: &'a [String],
  /// Prior engagement count (past sessions, talks, judged competitions);
  /// used as a ranking tie-breaker.
  pub prior_engagements: u32,
}

/// A ranked match produced by [`rank`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedMatch {
  pub id:             Uuid,
  pub score:          u8,
  pub overlap:        usize,
  pub matched_skills: Vec<String>,
  pub prior_engagements: u32,
}

/// Rank candidates against a target skill set.
///
/// Candidates with no overlap are dropped. Ordering is by score descending,
/// then raw overlap descending, then prior engagement count descending, then
/// id, so repeated calls over the same inputs are fully deterministic.
pub fn rank(
  candidates: &[Candidate<'_>],
  target: &[String],
  mode: MatchMode,
  limit: Option<usize>,
) -> Vec<RankedMatch> {
  let mut matches: Vec<RankedMatch> = candidates
    .iter()
    .filter_map(|c| {
      let matched = shared_skills(target, c.skills, mode);
      if matched.is_empty() {
        return None;
      }
      Some(RankedMatch {
        id:                c.id,
        score:             score_with_mode(c.skills, target, mode),
        overlap:           matched.len(),
        matched_skills:    matched,
        prior_engagements: c.prior_engagements,
      })
    })
    .collect();

  matches.sort_by(|a, b| {
    b.score
      .cmp(&a.score)
      .then(b.overlap.cmp(&a.overlap))
      .then(b.prior_engagements.cmp(&a.prior_engagements))
      .then(a.id.cmp(&b.id))
  });

  if let Some(limit) = limit {
    matches.truncate(limit);
  }
  matches
}
