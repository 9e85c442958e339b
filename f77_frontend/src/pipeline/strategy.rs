use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which parser(s) a run uses
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParserStrategy {
    #[default]
    #[serde(alias = "rd")]
    RecursiveDescent,
    Ll1,
    /// Run both and compare acceptance
    Both,
}

impl ParserStrategy {
    pub fn runs_recursive_descent(&self) -> bool {
        matches!(self, Self::RecursiveDescent | Self::Both)
    }

    pub fn runs_ll1(&self) -> bool {
        matches!(self, Self::Ll1 | Self::Both)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RecursiveDescent => "recursive_descent",
            Self::Ll1 => "ll1",
            Self::Both => "both",
        }
    }
}

impl fmt::Display for ParserStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParserStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "rd" | "recursive_descent" | "recursive-descent" => Ok(Self::RecursiveDescent),
            "ll1" | "ll(1)" => Ok(Self::Ll1),
            "both" => Ok(Self::Both),
            other => Err(format!(
                "unknown parser '{}', expected rd, ll1 or both",
                other
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names() {
        assert_eq!("rd".parse::<ParserStrategy>(), Ok(ParserStrategy::RecursiveDescent));
        assert_eq!("LL1".parse::<ParserStrategy>(), Ok(ParserStrategy::Ll1));
        assert_eq!("both".parse::<ParserStrategy>(), Ok(ParserStrategy::Both));
        assert!("lr".parse::<ParserStrategy>().is_err());
    }

    #[test]
    fn test_selection() {
        assert!(ParserStrategy::Both.runs_recursive_descent());
        assert!(ParserStrategy::Both.runs_ll1());
        assert!(!ParserStrategy::Ll1.runs_recursive_descent());
    }
}
