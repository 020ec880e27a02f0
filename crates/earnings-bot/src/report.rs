use std::sync::LazyLock;

use regex::Regex;

use crate::feed::Post;

/// Shown when a post carries no ticker symbols at all.
const FALLBACK_TICKER: &str = "N/A";
const FALLBACK_NAME: &str = "Unknown";

static CONSENSUS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"consensus was \(*\$?([0-9.]+)\)*").expect("Invalid consensus regex")
});

// Two mutually exclusive capture groups; which one participated
// determines the sign.
static EARNINGS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"reported (?:earnings of )?\$([0-9.]+)|a loss of \$([0-9.]+)")
        .expect("Invalid earnings regex")
});

/// Beat/miss classification of one report. Undetermined whenever either
/// figure is missing from the post body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Beat,
    Miss,
    Undetermined,
}

impl Outcome {
    /// Discord embed color for this outcome.
    pub fn color(self) -> u32 {
        match self {
            Outcome::Beat => 0x008000,
            Outcome::Miss => 0xd42020,
            Outcome::Undetermined => 0xaaaaaa,
        }
    }
}

/// Structured earnings data extracted from one feed post.
///
/// Extraction is pure: the same post body always yields the same fields.
/// Money is held as signed integer cents to keep comparisons exact.
#[derive(Debug, Clone)]
pub struct Report {
    pub ticker: String,
    pub name: String,
    pub consensus: Option<i64>,
    pub earnings: Option<i64>,
}

impl Report {
    pub fn extract(post: &Post) -> Self {
        let (ticker, name) = match post.symbols.first() {
            Some(symbol) => (symbol.symbol.clone(), symbol.title.clone()),
            None => (FALLBACK_TICKER.to_string(), FALLBACK_NAME.to_string()),
        };

        Self {
            ticker,
            name,
            consensus: parse_consensus(&post.body),
            earnings: parse_earnings(&post.body),
        }
    }

    pub fn outcome(&self) -> Outcome {
        match (self.earnings, self.consensus) {
            // A tie is not a beat.
            (Some(earnings), Some(consensus)) if earnings > consensus => Outcome::Beat,
            (Some(_), Some(_)) => Outcome::Miss,
            _ => Outcome::Undetermined,
        }
    }

    /// Summary line: `"TICKER: $X.XX vs. $Y.YY expected"`, with a
    /// fallback phrase for each figure that was not found.
    pub fn title(&self) -> String {
        let earnings = match self.earnings {
            Some(cents) => format_dollars(cents),
            None => "Earnings not found".to_string(),
        };
        let consensus = match self.consensus {
            Some(cents) => format_dollars(cents),
            None => "Consensus not found".to_string(),
        };

        format!("{}: {earnings} vs. {consensus} expected", self.ticker)
    }

    /// Both figures present; anything less is noise from the stream and
    /// not worth publishing.
    pub fn is_complete(&self) -> bool {
        self.earnings.is_some() && self.consensus.is_some()
    }

    pub fn logo_url(&self) -> String {
        format!(
            "https://s3.amazonaws.com/logos.atom.finance/stocks-and-funds/{}.png",
            self.ticker
        )
    }

    pub fn quote_url(&self) -> String {
        format!("https://finance.yahoo.com/quote/{}/", self.ticker)
    }
}

/// Analyst consensus in cents. Smaller issuers often have no analyst
/// coverage, so no match is a normal absence, not an error.
fn parse_consensus(body: &str) -> Option<i64> {
    let captures = CONSENSUS_RE.captures(body)?;
    let cents = to_cents(&captures[1])?;

    // Parentheses around the figure mean a loss.
    if captures[0].contains('(') {
        return Some(-cents);
    }

    Some(cents)
}

/// Reported earnings in cents, negative when the body phrases the
/// figure as a loss.
fn parse_earnings(body: &str) -> Option<i64> {
    let captures = EARNINGS_RE.captures(body)?;

    if let Some(loss) = captures.get(2) {
        return to_cents(loss.as_str()).map(|cents| -cents);
    }

    captures.get(1).and_then(|gain| to_cents(gain.as_str()))
}

/// Decimal dollar string to cents: multiply by 100, truncate toward zero.
fn to_cents(decimal: &str) -> Option<i64> {
    let value: f64 = decimal.parse().ok()?;
    Some((value * 100.0) as i64)
}

fn format_dollars(cents: i64) -> String {
    format!("${:.2}", cents as f64 / 100.0)
}
