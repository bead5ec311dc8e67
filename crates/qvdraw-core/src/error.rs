use std::fmt;

/// Machine-readable error codes shared by every fallible qvdraw operation.
///
/// The graph builders themselves never fail; these codes cover the input and
/// configuration layers that feed them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    MatrixSyntax,
    RaggedMatrix,
    MatrixShape,
    UnknownDynkin,
    ConfigParseError,
    MoveTableParse,
    MoveTableInvalid,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::MatrixSyntax => "E1001",
            Self::RaggedMatrix => "E1002",
            Self::MatrixShape => "E1003",
            Self::UnknownDynkin => "E1004",
            Self::ConfigParseError => "E2001",
            Self::MoveTableParse => "E2002",
            Self::MoveTableInvalid => "E2003",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::MatrixSyntax => "Matrix text is malformed",
            Self::RaggedMatrix => "Matrix rows have different lengths",
            Self::MatrixShape => "Matrix data does not match its dimensions",
            Self::UnknownDynkin => "Unrecognized Dynkin type",
            Self::ConfigParseError => "Config file parse error",
            Self::MoveTableParse => "Move table parse error",
            Self::MoveTableInvalid => "Move table failed validation",
        }
    }

    /// Optional remediation hint that can be surfaced to operators.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::MatrixSyntax => Some("Write matrices as `{ { 0 1 } { -1 0 } }`."),
            Self::RaggedMatrix => Some("Give every row the same number of entries."),
            Self::MatrixShape => None,
            Self::UnknownDynkin => Some("Use A<n>, D<n> (n >= 4), E6, E7 or E8."),
            Self::ConfigParseError => Some("Fix syntax in the qvdraw config file and retry."),
            Self::MoveTableParse => Some("Check the move table TOML against the builtin table."),
            Self::MoveTableInvalid => {
                Some("Every connection needs one requirement and all indices must be in range.")
            }
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::ErrorCode;
    use std::collections::HashSet;

    const ALL: [ErrorCode; 7] = [
        ErrorCode::MatrixSyntax,
        ErrorCode::RaggedMatrix,
        ErrorCode::MatrixShape,
        ErrorCode::UnknownDynkin,
        ErrorCode::ConfigParseError,
        ErrorCode::MoveTableParse,
        ErrorCode::MoveTableInvalid,
    ];

    #[test]
    fn all_codes_are_unique() {
        let mut seen = HashSet::new();
        for code in ALL {
            assert!(seen.insert(code.code()), "duplicate code {}", code.code());
        }
    }

    #[test]
    fn code_format_is_machine_friendly() {
        for code in ALL {
            let text = code.to_string();
            assert_eq!(text.len(), 5);
            assert!(text.starts_with('E'));
            assert!(text.chars().skip(1).all(|c| c.is_ascii_digit()));
        }
    }
}
