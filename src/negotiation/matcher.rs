//! Semantic version range matching.
//!
//! # Responsibilities
//! - Parse supported versions (loose: surrounding whitespace and a leading `v`)
//! - Parse client ranges in npm syntax on top of the `semver` crate
//! - Select the highest supported version satisfying a range
//!
//! # Design Decisions
//! - Malformed input is a normal "no match", never an error
//! - Bare full versions are exact (`1.0.0` means `=1.0.0`), unlike Cargo's caret default
//! - Bare partial versions are X-ranges (`1.2` means `>=1.2.0, <1.3.0`)

use std::fmt;

use semver::{Version, VersionReq};

/// A supported version: the configured string plus its parsed form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupportedVersion {
    raw: String,
    version: Version,
}

impl SupportedVersion {
    /// Parse a supported version, returning `None` if it is not valid semver.
    pub fn parse(raw: &str) -> Option<Self> {
        parse_version(raw).map(|version| Self {
            raw: raw.to_string(),
            version,
        })
    }

    /// The version exactly as it was configured.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn version(&self) -> &Version {
        &self.version
    }
}

impl fmt::Display for SupportedVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Parse a single semantic version, tolerating whitespace and a leading `v`.
pub fn parse_version(input: &str) -> Option<Version> {
    let trimmed = input.trim();
    let bare = trimmed
        .strip_prefix('v')
        .or_else(|| trimmed.strip_prefix('V'))
        .unwrap_or(trimmed);
    Version::parse(bare).ok()
}

/// A client-supplied range: alternatives joined by `||`, any of which may match.
#[derive(Debug, Clone)]
pub struct VersionRange {
    alternatives: Vec<VersionReq>,
}

impl VersionRange {
    /// Parse an npm-style range. Returns `None` when the input is not a valid range.
    pub fn parse(input: &str) -> Option<Self> {
        if input.trim().is_empty() {
            return None;
        }

        let alternatives = input
            .split("||")
            .map(|set| {
                let comparators = comparator_set(set)?;
                VersionReq::parse(&comparators.join(", ")).ok()
            })
            .collect::<Option<Vec<_>>>()?;

        Some(Self { alternatives })
    }

    pub fn matches(&self, version: &Version) -> bool {
        self.alternatives.iter().any(|req| req.matches(version))
    }
}

/// Returns true if `version` satisfies `range`. Invalid ranges never match.
pub fn satisfies(range: &str, version: &Version) -> bool {
    VersionRange::parse(range).is_some_and(|r| r.matches(version))
}

/// Select the highest candidate satisfying `range`.
pub fn best_match<'a>(range: &str, candidates: &'a [SupportedVersion]) -> Option<&'a SupportedVersion> {
    let range = VersionRange::parse(range)?;
    candidates
        .iter()
        .filter(|candidate| range.matches(&candidate.version))
        .max_by(|a, b| a.version.cmp(&b.version))
}

/// Select the highest candidate under semver ordering.
pub fn max_version(candidates: &[SupportedVersion]) -> Option<&SupportedVersion> {
    candidates.iter().max_by(|a, b| a.version.cmp(&b.version))
}

/// Translate one whitespace/comma separated comparator set into `semver` syntax.
fn comparator_set(set: &str) -> Option<Vec<String>> {
    let set = set.trim();
    if set.is_empty() {
        return Some(vec!["*".to_string()]);
    }

    if let Some((low, high)) = set.split_once(" - ") {
        return Some(vec![
            format!(">={}", strip_v(low.trim())),
            format!("<={}", strip_v(high.trim())),
        ]);
    }

    let mut comparators = Vec::new();
    let mut pending_op: Option<&str> = None;

    for token in set
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
    {
        let (op, operand) = split_operator(token)?;
        let op = match (pending_op.take(), op) {
            (Some(pending), "") => pending,
            (None, op) => op,
            (Some(_), _) => return None,
        };

        // `>= 1.0.0`: operator and operand arrive as separate tokens
        if operand.is_empty() {
            pending_op = Some(op);
            continue;
        }

        comparators.push(comparator(op, operand));
    }

    if pending_op.is_some() || comparators.is_empty() {
        return None;
    }
    // `semver` only accepts `*` as the sole comparator
    if comparators.len() > 1 {
        comparators.retain(|c| c != "*");
        if comparators.is_empty() {
            comparators.push("*".to_string());
        }
    }
    Some(comparators)
}

fn split_operator(token: &str) -> Option<(&str, &str)> {
    let split = token
        .find(|c: char| !matches!(c, '<' | '>' | '=' | '~' | '^'))
        .unwrap_or(token.len());
    let (op, operand) = token.split_at(split);
    let op = match op {
        "" | "=" | ">" | ">=" | "<" | "<=" | "~" | "^" => op,
        "~>" => "~",
        _ => return None,
    };
    Some((op, operand))
}

fn comparator(op: &str, operand: &str) -> String {
    let operand = strip_v(operand);
    match op {
        "" | "=" if is_any(operand) => "*".to_string(),
        "" | "=" if is_wildcard(operand) => operand.to_string(),
        "" => format!("={operand}"),
        _ => format!("{op}{operand}"),
    }
}

fn is_wildcard(operand: &str) -> bool {
    operand
        .split('.')
        .any(|part| matches!(part, "*" | "x" | "X"))
}

/// `*`, `x`, `x.x.x` and friends: every part is a wildcard.
fn is_any(operand: &str) -> bool {
    operand
        .split('.')
        .all(|part| matches!(part, "*" | "x" | "X"))
}

fn strip_v(operand: &str) -> &str {
    operand
        .strip_prefix('v')
        .or_else(|| operand.strip_prefix('V'))
        .unwrap_or(operand)
}
