//! Canonical forms for user-supplied identifiers and report grouping names.
//!
//! Plates and firm names are stored normalized so that case and whitespace
//! variants of the same identifier collide on one row.

use std::fmt;

use serde::Serialize;
use utoipa::ToSchema;

/// Canonical plate: trimmed, uppercased, every whitespace character removed.
pub fn normalize_plate(raw: &str) -> String {
    raw.trim()
        .to_uppercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}

/// Canonical firm name: trimmed and uppercased. Inner spacing is kept.
pub fn normalize_firm_name(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Time bucket used to group report series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    #[default]
    Day,
    Month,
    Year,
}

impl Granularity {
    /// Parse a grouping name. English and Turkish spellings are accepted
    /// case-insensitively; anything else (including no value) is `Day`.
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::Day;
        };

        match raw.trim().to_lowercase().as_str() {
            "month" | "ay" => Self::Month,
            "year" | "yil" | "yıl" => Self::Year,
            _ => Self::Day,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Granularity::Day => "day",
            Granularity::Month => "month",
            Granularity::Year => "year",
        }
    }

    /// `strftime` pattern producing this bucket's period key.
    pub const fn strftime_pattern(self) -> &'static str {
        match self {
            Granularity::Day => "%Y-%m-%d",
            Granularity::Month => "%Y-%m",
            Granularity::Year => "%Y",
        }
    }

    /// Postgres `to_char` pattern producing this bucket's period key.
    pub const fn to_char_pattern(self) -> &'static str {
        match self {
            Granularity::Day => "YYYY-MM-DD",
            Granularity::Month => "YYYY-MM",
            Granularity::Year => "YYYY",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
