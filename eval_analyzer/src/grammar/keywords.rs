//! Reserved words of the EVAL language
//!
//! Every literal word terminal is a keyword: types, control flow, the
//! built-in functions and the macro constants. Matching is case-sensitive.
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Keyword {
    // === TYPES ===
    Int,
    Float,
    StringType,
    Bool,

    // === DECLARATIONS AND CONTROL FLOW ===
    Const,
    If,
    Else,
    While,
    Try,
    Catch,

    // === BOOLEAN LITERALS ===
    True,
    False,

    // === BUILT-IN FUNCTIONS ===
    Print,
    Cast,
    Pow,
    Sqrt,
    Min,
    Max,
    Round,
    Abs,

    // === MACRO CONSTANTS ===
    Pi,
    DaysInWeek,
    HoursInDay,
    Year,
}

impl Keyword {
    /// Declaration order; earlier entries win ties between equal-length matches
    pub const ALL: [Keyword; 24] = [
        Self::Int,
        Self::Float,
        Self::StringType,
        Self::Bool,
        Self::Const,
        Self::If,
        Self::Else,
        Self::While,
        Self::Try,
        Self::Catch,
        Self::True,
        Self::False,
        Self::Print,
        Self::Cast,
        Self::Pow,
        Self::Sqrt,
        Self::Min,
        Self::Max,
        Self::Round,
        Self::Abs,
        Self::Pi,
        Self::DaysInWeek,
        Self::HoursInDay,
        Self::Year,
    ];

    /// Exact spelling in EVAL source
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::Float => "float",
            Self::StringType => "string",
            Self::Bool => "bool",
            Self::Const => "const",
            Self::If => "if",
            Self::Else => "else",
            Self::While => "while",
            Self::Try => "try",
            Self::Catch => "catch",
            Self::True => "true",
            Self::False => "false",
            Self::Print => "print",
            Self::Cast => "cast",
            Self::Pow => "pow",
            Self::Sqrt => "sqrt",
            Self::Min => "min",
            Self::Max => "max",
            Self::Round => "round",
            Self::Abs => "abs",
            Self::Pi => "PI",
            Self::DaysInWeek => "DAYS_IN_WEEK",
            Self::HoursInDay => "HOURS_IN_DAY",
            Self::Year => "YEAR",
        }
    }

    /// Symbolic terminal name, as used in syntax messages and tree dumps
    pub const fn terminal_name(self) -> &'static str {
        match self {
            Self::Int => "INT",
            Self::Float => "FLOAT",
            Self::StringType => "STRING_TYPE",
            Self::Bool => "BOOL",
            Self::Const => "CONST",
            Self::If => "IF",
            Self::Else => "ELSE",
            Self::While => "WHILE",
            Self::Try => "TRY",
            Self::Catch => "CATCH",
            Self::True => "TRUE",
            Self::False => "FALSE",
            Self::Print => "PRINT",
            Self::Cast => "CAST",
            Self::Pow => "POW",
            Self::Sqrt => "SQRT",
            Self::Min => "MIN",
            Self::Max => "MAX",
            Self::Round => "ROUND",
            Self::Abs => "ABS",
            Self::Pi => "PI",
            Self::DaysInWeek => "DAYS_IN_WEEK",
            Self::HoursInDay => "HOURS_IN_DAY",
            Self::Year => "YEAR",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|kw| kw.as_str() == s)
    }

    pub fn is_type(self) -> bool {
        matches!(
            self,
            Self::Int | Self::Float | Self::StringType | Self::Bool
        )
    }

    pub fn is_builtin_function(self) -> bool {
        matches!(
            self,
            Self::Print
                | Self::Cast
                | Self::Pow
                | Self::Sqrt
                | Self::Min
                | Self::Max
                | Self::Round
                | Self::Abs
        )
    }

    pub fn is_macro(self) -> bool {
        matches!(
            self,
            Self::Pi | Self::DaysInWeek | Self::HoursInDay | Self::Year
        )
    }
}

impl std::fmt::Display for Keyword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn is_reserved_keyword(s: &str) -> bool {
    Keyword::from_str(s).is_some()
}
