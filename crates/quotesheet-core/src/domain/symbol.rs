use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::ValidationError;

const MAX_SYMBOL_LEN: usize = 15;

/// Upper-cased ticker symbol accepted by the quote API.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Symbol(String);

impl Symbol {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let normalized = input.trim().to_ascii_uppercase();
        let mut chars = normalized.chars().enumerate();

        match chars.next() {
            None => return Err(ValidationError::EmptySymbol),
            Some((_, first)) if !first.is_ascii_alphabetic() => {
                return Err(ValidationError::SymbolInvalidStart { ch: first });
            }
            Some(_) => {}
        }

        if let Some((index, ch)) =
            chars.find(|(_, ch)| !(ch.is_ascii_alphanumeric() || *ch == '.' || *ch == '-'))
        {
            return Err(ValidationError::SymbolInvalidChar { ch, index });
        }

        let len = normalized.len();
        if len > MAX_SYMBOL_LEN {
            return Err(ValidationError::SymbolTooLong {
                len,
                max: MAX_SYMBOL_LEN,
            });
        }

        Ok(Self(normalized))
    }

    /// Parses a comma-separated list such as `"AAPL, msft,IBM"`. Blank entries are ignored.
    pub fn parse_list(input: &str) -> Result<Vec<Self>, ValidationError> {
        let symbols = input
            .split(',')
            .map(str::trim)
            .filter(|raw| !raw.is_empty())
            .map(Self::parse)
            .collect::<Result<Vec<_>, _>>()?;

        if symbols.is_empty() {
            return Err(ValidationError::EmptySymbolList);
        }
        Ok(symbols)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for Symbol {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for Symbol {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Symbol> for String {
    fn from(value: Symbol) -> Self {
        value.0
    }
}
