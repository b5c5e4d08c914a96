//! Criterion change intervals parsed from HTML reports.

use std::fmt;
use std::path::Path;

use crate::error::{Error, Result};

/// Line in a criterion report that precedes the change interval cells.
const CHANGE_MARKER: &str = "Change in Value:";

/// Changes smaller than this (in percent) are never significant.
const SIGNIFICANCE_THRESHOLD: f64 = 1.0;

/// Whether a benchmark got faster, slower, or neither.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Significance {
    /// The whole interval is below zero.
    Improvement,
    /// The interval straddles zero or the mean change is tiny.
    Neutral,
    /// The whole interval is above zero.
    Regression,
}

impl Significance {
    /// Color used in the markdown index.
    #[must_use]
    pub const fn color(&self) -> &'static str {
        match self {
            Self::Improvement => "green",
            Self::Neutral => "black",
            Self::Regression => "red",
        }
    }
}

/// The `[lower, mean, upper]` relative change criterion reports between runs.
///
/// Values are kept as the text criterion rendered (e.g. `-2.3456%`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeInterval {
    /// Lower bound.
    pub lower: String,
    /// Point estimate.
    pub mean: String,
    /// Upper bound.
    pub upper: String,
}

impl Default for ChangeInterval {
    fn default() -> Self {
        Self {
            lower: "0".to_string(),
            mean: "0".to_string(),
            upper: "0".to_string(),
        }
    }
}

impl ChangeInterval {
    /// Extract the change interval from the HTML of a criterion report.
    ///
    /// Looks for the first line containing `Change in Value:`; the three
    /// lines after it hold the lower bound, mean and upper bound. Anything
    /// missing reads as `0`.
    #[must_use]
    pub fn parse_html(html: &str) -> Self {
        let lines: Vec<&str> = html.lines().collect();
        let Some(start) = lines.iter().position(|line| line.contains(CHANGE_MARKER)) else {
            return Self::default();
        };

        let cell = |offset: usize| {
            lines
                .get(start + offset)
                .map_or_else(|| "0".to_string(), |line| cell_text(line))
        };

        Self {
            lower: cell(1),
            mean: cell(2),
            upper: cell(3),
        }
    }

    /// Read the change interval of a report directory (its `index.html`) or file.
    ///
    /// # Errors
    /// Returns error if the report can't be read.
    pub fn from_report(path: &Path) -> Result<Self> {
        let file = if path.is_dir() {
            path.join("index.html")
        } else {
            path.to_path_buf()
        };
        let html = std::fs::read_to_string(file)?;
        Ok(Self::parse_html(&html))
    }

    /// The mean change in percent.
    ///
    /// # Errors
    /// Returns [`Error::InvalidChange`] if the mean isn't a number.
    pub fn mean_value(&self) -> Result<f64> {
        percent(&self.mean)
    }

    /// Classify the change.
    ///
    /// # Errors
    /// Returns [`Error::InvalidChange`] if any bound isn't a number.
    pub fn significance(&self) -> Result<Significance> {
        let lower = percent(&self.lower)?;
        let mean = percent(&self.mean)?;
        let upper = percent(&self.upper)?;

        if mean.abs() < SIGNIFICANCE_THRESHOLD {
            return Ok(Significance::Neutral);
        }
        if lower < 0.0 && upper < 0.0 {
            return Ok(Significance::Improvement);
        }
        if lower > 0.0 && upper > 0.0 {
            return Ok(Significance::Regression);
        }
        Ok(Significance::Neutral)
    }

    /// Render as a colored markdown span.
    ///
    /// # Errors
    /// Returns [`Error::InvalidChange`] if any bound isn't a number.
    pub fn to_markdown(&self) -> Result<String> {
        Ok(format!(
            r#"<span style="color:{}"> {self} </span>"#,
            self.significance()?.color()
        ))
    }
}

impl fmt::Display for ChangeInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, <b>{}</b>, {}]", self.lower, self.mean, self.upper)
    }
}

/// Text between the first `>` and the next `<`, trimmed.
fn cell_text(line: &str) -> String {
    let Some(start) = line.find('>') else {
        return "0".to_string();
    };
    let rest = &line[start + 1..];
    let Some(end) = rest.find('<') else {
        return "0".to_string();
    };
    rest[..end].trim().to_string()
}

/// Parse `-2.34%` as `-2.34`.
fn percent(value: &str) -> Result<f64> {
    value
        .trim_matches('%')
        .trim()
        .parse()
        .map_err(|_| Error::InvalidChange(value.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const REPORT: &str = r#"<tr>
    <th>Change in Value:</th>
    <td class="ci-bound">-4.9170%</td>
    <td class="ci-bound">-3.0512%</td>
    <td class="ci-bound">-1.2250%</td>
</tr>"#;

    fn interval(lower: &str, mean: &str, upper: &str) -> ChangeInterval {
        ChangeInterval {
            lower: lower.into(),
            mean: mean.into(),
            upper: upper.into(),
        }
    }

    #[test]
    fn test_parse_html() {
        let ci = ChangeInterval::parse_html(REPORT);
        assert_eq!(ci, interval("-4.9170%", "-3.0512%", "-1.2250%"));
    }

    #[test]
    fn test_parse_html_without_marker() {
        assert_eq!(
            ChangeInterval::parse_html("<html><body>first run</body></html>"),
            ChangeInterval::default()
        );
    }

    #[test]
    fn test_parse_html_malformed_cells() {
        let html = "Change in Value:\nno brackets\n<td>+2.0%\n<td>+3.0%</td>";
        assert_eq!(ChangeInterval::parse_html(html), interval("0", "0", "+3.0%"));

        // Truncated report
        let html = "Change in Value:\n<td>1%</td>";
        assert_eq!(ChangeInterval::parse_html(html), interval("1%", "0", "0"));
    }

    #[test]
    fn test_significance() {
        assert_eq!(
            interval("-4%", "-3%", "-1%").significance().unwrap(),
            Significance::Improvement
        );
        assert_eq!(
            interval("1.5%", "2%", "3%").significance().unwrap(),
            Significance::Regression
        );
        assert_eq!(
            interval("-1%", "2%", "5%").significance().unwrap(),
            Significance::Neutral
        );
        // Tiny changes are neutral even if the interval excludes zero
        assert_eq!(
            interval("0.1%", "0.5%", "0.9%").significance().unwrap(),
            Significance::Neutral
        );
        assert_eq!(
            ChangeInterval::default().significance().unwrap(),
            Significance::Neutral
        );
    }

    #[test]
    fn test_invalid_value() {
        let err = interval("x", "1%", "2%").significance().unwrap_err();
        assert!(matches!(err, Error::InvalidChange(v) if v == "x"));
    }

    #[test]
    fn test_to_markdown() {
        assert_eq!(
            interval("-4.9%", "-3.1%", "-1.2%").to_markdown().unwrap(),
            r#"<span style="color:green"> [-4.9%, <b>-3.1%</b>, -1.2%] </span>"#
        );
    }
}
