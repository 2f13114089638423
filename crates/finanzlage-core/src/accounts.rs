//! Account naming conventions and the balance sheet alias table
//!
//! Assets and liabilities are recognised by substrings of the account
//! names used in the bank exports. Renaming an account in the export
//! therefore changes how it is classified.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use finanzlage_config::AccountsConfig;

use crate::error::{CoreError, CoreResult};

/// Substring marking loan accounts counted into total liabilities
pub const LIABILITY_MARKER: &str = "Darlehen";

/// Private loans are spelled in lower case and need their own marker
pub const PRIVATE_LOAN_MARKER: &str = "Privatdarlehen";

/// Substrings marking accounts counted into total assets
pub const ASSET_MARKERS: [&str; 3] = ["Girokonto", "Sparkonto", "Freizeit"];

/// Development table row holding the total of all asset accounts
pub const TOTAL_ASSETS_POSITION: &str = "Summe Aktiva";

/// Development table row holding the total of all loans (negative)
pub const TOTAL_LIABILITIES_POSITION: &str = "Verbindlichkeiten";

/// Balance sheet account name to development table position
pub const DEFAULT_ACCOUNT_ALIASES: [(&str, &str); 5] = [
    ("Girokonto SKB-Konto 701-", "Freizeitkonto SKB 000"),
    ("Girokonto SKB -Konto 700-", "Girokonto SKB 001"),
    ("Sparkonto SKB -Rücklagenkonto f. Heizung", "Sparkonto SKB 003"),
    ("Darlehenskonto SKB", "Darlehenskonto SKB 004"),
    ("Privatdarlehen", "Privatdarlehen 006"),
];

/// Positions shown in the account trend chart
pub const DEFAULT_IMPORTANT_POSITIONS: [&str; 5] = [
    "Girokonto SKB 001",
    "Sparkonto SKB 003",
    "Freizeitkonto SKB 000",
    "Darlehenskonto SKB 004",
    "Privatdarlehen 006",
];

/// Loan account of any kind
pub fn is_liability(name: &str) -> bool {
    name.contains(LIABILITY_MARKER) || name.contains(PRIVATE_LOAN_MARKER)
}

/// Account summed into the total liabilities row (case sensitive `Darlehen`)
pub fn counts_toward_total_liabilities(name: &str) -> bool {
    name.contains(LIABILITY_MARKER)
}

pub fn is_asset(name: &str) -> bool {
    ASSET_MARKERS.iter().any(|marker| name.contains(marker))
}

/// One alias pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountAlias {
    pub account: String,
    pub position: String,
}

/// Validated, ordered alias table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountAliases {
    entries: Vec<AccountAlias>,
}

impl AccountAliases {
    /// Build a table; an account or position listed twice is rejected
    pub fn new<I, A, P>(pairs: I) -> CoreResult<Self>
    where
        I: IntoIterator<Item = (A, P)>,
        A: Into<String>,
        P: Into<String>,
    {
        let mut seen_accounts = HashSet::new();
        let mut seen_positions = HashSet::new();
        let mut entries = Vec::new();

        for (account, position) in pairs {
            let alias = AccountAlias {
                account: account.into(),
                position: position.into(),
            };
            if !seen_accounts.insert(alias.account.clone()) {
                return Err(CoreError::DuplicateAlias { name: alias.account });
            }
            if !seen_positions.insert(alias.position.clone()) {
                return Err(CoreError::DuplicateAlias { name: alias.position });
            }
            entries.push(alias);
        }

        Ok(Self { entries })
    }

    /// Use the configured table, or the built-in one when none is set
    pub fn from_config(config: &AccountsConfig) -> CoreResult<Self> {
        match &config.aliases {
            Some(aliases) => Self::new(
                aliases
                    .iter()
                    .map(|a| (a.account.clone(), a.position.clone())),
            ),
            None => Self::new(DEFAULT_ACCOUNT_ALIASES),
        }
    }

    /// Balance sheet account feeding `position`, first match wins
    pub fn account_for(&self, position: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|a| a.position == position)
            .map(|a| a.account.as_str())
    }

    /// Positions that hold loan balances
    pub fn liability_positions(&self) -> Vec<&str> {
        self.entries
            .iter()
            .map(|a| a.position.as_str())
            .filter(|p| is_liability(p))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AccountAlias> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for AccountAliases {
    fn default() -> Self {
        Self {
            entries: DEFAULT_ACCOUNT_ALIASES
                .iter()
                .map(|(account, position)| AccountAlias {
                    account: account.to_string(),
                    position: position.to_string(),
                })
                .collect(),
        }
    }
}

/// Positions for the trend chart, configured or built-in
pub fn important_positions(config: &AccountsConfig) -> Vec<String> {
    match &config.important {
        Some(positions) => positions.clone(),
        None => DEFAULT_IMPORTANT_POSITIONS.iter().map(|p| p.to_string()).collect(),
    }
}
