use crate::error::{BankingError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Banking providers integrated behind the normalized contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE", try_from = "String")]
pub enum Provider {
    Revolut,
    Deutsche,
}

impl Provider {
    pub const ALL: [Provider; 2] = [Provider::Revolut, Provider::Deutsche];

    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Revolut => "REVOLUT",
            Provider::Deutsche => "DEUTSCHE",
        }
    }

    /// Parses every identifier, failing with all offending ids at once.
    pub fn parse_all<'a, I>(ids: I) -> Result<Vec<Provider>>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut parsed = Vec::new();
        let mut rejected = Vec::new();

        for id in ids {
            match id.parse::<Provider>() {
                Ok(provider) => parsed.push(provider),
                Err(_) => rejected.push(id.to_string()),
            }
        }

        if rejected.is_empty() {
            Ok(parsed)
        } else {
            Err(BankingError::unsupported(rejected))
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for Provider {
    type Error = BankingError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl FromStr for Provider {
    type Err = BankingError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "REVOLUT" => Ok(Provider::Revolut),
            "DEUTSCHE" => Ok(Provider::Deutsche),
            other => Err(BankingError::unsupported([other])),
        }
    }
}
