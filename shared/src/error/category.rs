//! Error categories, one per thousand-range of codes

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    General,
    Auth,
    Permission,
    Order,
    Ledger,
    Catalog,
    Table,
    Identity,
    /// Logged server-side; clients only see the default message
    System,
}

impl ErrorCategory {
    /// 3xxx is unassigned and falls back to `General`
    pub fn from_code(code: u16) -> Self {
        match code / 1000 {
            1 => Self::Auth,
            2 => Self::Permission,
            4 => Self::Order,
            5 => Self::Ledger,
            6 => Self::Catalog,
            7 => Self::Table,
            8 => Self::Identity,
            9.. => Self::System,
            _ => Self::General,
        }
    }
}

impl ErrorCode {
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::from_code(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranges() {
        let cases = [
            (0, ErrorCategory::General),
            (999, ErrorCategory::General),
            (3001, ErrorCategory::General),
            (1001, ErrorCategory::Auth),
            (2003, ErrorCategory::Permission),
            (4005, ErrorCategory::Order),
            (5003, ErrorCategory::Ledger),
            (6101, ErrorCategory::Catalog),
            (7001, ErrorCategory::Table),
            (8101, ErrorCategory::Identity),
            (9004, ErrorCategory::System),
            (10000, ErrorCategory::System),
        ];
        for (code, category) in cases {
            assert_eq!(ErrorCategory::from_code(code), category, "{code}");
        }
    }

    #[test]
    fn test_code_category() {
        assert_eq!(ErrorCode::TransactionAlreadyRecorded.category(), ErrorCategory::Ledger);
        assert_eq!(ErrorCode::ProductInactive.category(), ErrorCategory::Catalog);
        assert_eq!(ErrorCode::DatabaseError.category(), ErrorCategory::System);
        assert_eq!(serde_json::to_string(&ErrorCategory::Ledger).unwrap(), "\"ledger\"");
    }
}
