//! Parse-tree node definitions for EVAL programs
//!
//! One node type per grammar rule. Every node owns its children and carries
//! the span of the source it was built from. Binary nodes keep their operator
//! token so diagnostics can point at it.

use crate::grammar::keywords::Keyword;
use crate::tokens::Token;
use crate::utils::{Span, Spanned};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifiers follow `[a-zA-Z_][a-zA-Z0-9_]*`
pub type Identifier = String;

// === TYPES AND OPERATORS ===

/// Declared value types (grammar: type)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Type {
    Int,
    Float,
    String,
    Bool,
}

impl Type {
    /// Parse type from its keyword text (exact match, case-sensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "int" => Some(Self::Int),
            "float" => Some(Self::Float),
            "string" => Some(Self::String),
            "bool" => Some(Self::Bool),
            _ => None,
        }
    }

    pub fn from_keyword(keyword: Keyword) -> Option<Self> {
        match keyword {
            Keyword::Int => Some(Self::Int),
            Keyword::Float => Some(Self::Float),
            Keyword::StringType => Some(Self::String),
            Keyword::Bool => Some(Self::Bool),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::Float => "float",
            Self::String => "string",
            Self::Bool => "bool",
        }
    }

    /// Only int and float take part in numeric coercion
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Int | Self::Float)
    }
}

/// Assignment operators (grammar: assignOp)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssignOp {
    Assign,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
}

impl AssignOp {
    pub fn from_token(token: &Token) -> Option<Self> {
        match token {
            Token::Assign => Some(Self::Assign),
            Token::PlusAssign => Some(Self::AddAssign),
            Token::MinusAssign => Some(Self::SubAssign),
            Token::MultiplyAssign => Some(Self::MulAssign),
            Token::DivideAssign => Some(Self::DivAssign),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Assign => "=",
            Self::AddAssign => "+=",
            Self::SubAssign => "-=",
            Self::MulAssign => "*=",
            Self::DivAssign => "/=",
        }
    }
}

/// Macro constants supplied by the runtime (grammar: macro)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MacroKind {
    Pi,
    DaysInWeek,
    HoursInDay,
    Year,
}

impl MacroKind {
    pub fn from_keyword(keyword: Keyword) -> Option<Self> {
        match keyword {
            Keyword::Pi => Some(Self::Pi),
            Keyword::DaysInWeek => Some(Self::DaysInWeek),
            Keyword::HoursInDay => Some(Self::HoursInDay),
            Keyword::Year => Some(Self::Year),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pi => "PI",
            Self::DaysInWeek => "DAYS_IN_WEEK",
            Self::HoursInDay => "HOURS_IN_DAY",
            Self::Year => "YEAR",
        }
    }
}

// === PROGRAM AND STATEMENTS ===

/// Root node (grammar: program := statement* EOF)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Program {
    pub statements: Vec<Statement>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Statement {
    VariableDeclaration(VariableDeclaration),
    ConstDeclaration(ConstDeclaration),
    Assignment(Assignment),
    Print(PrintStatement),
    If(IfStatement),
    While(WhileStatement),
    Try(TryStatement),
    Block(Block),
}

impl Statement {
    pub fn span(&self) -> Span {
        match self {
            Self::VariableDeclaration(n) => n.span,
            Self::ConstDeclaration(n) => n.span,
            Self::Assignment(n) => n.span,
            Self::Print(n) => n.span,
            Self::If(n) => n.span,
            Self::While(n) => n.span,
            Self::Try(n) => n.span,
            Self::Block(n) => n.span,
        }
    }
}

/// grammar: block := '{' statement* '}'
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub statements: Vec<Statement>,
    pub span: Span,
}

/// grammar: varDecl := type IDENT '=' expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableDeclaration {
    pub var_type: Type,
    pub name: Identifier,
    pub value: Expression,
    pub span: Span,
}

/// grammar: constDecl := 'const' varDecl
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstDeclaration {
    pub declaration: VariableDeclaration,
    pub span: Span,
}

/// grammar: assignment := IDENT assignOp expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub target: Identifier,
    pub op: AssignOp,
    pub value: Expression,
    pub span: Span,
}

/// grammar: printStmt := 'print' '(' printArg (',' printArg)* ')'
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrintStatement {
    pub args: Vec<PrintArg>,
    pub span: Span,
}

/// grammar: printArg := STRING | expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PrintArg {
    /// Raw string argument, quotes included
    String { text: String, span: Span },
    Expression(Expression),
}

impl PrintArg {
    pub fn span(&self) -> Span {
        match self {
            Self::String { span, .. } => *span,
            Self::Expression(expr) => expr.span(),
        }
    }
}

/// One `else if (cond) { ... }` arm
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElseIf {
    pub condition: Expression,
    pub body: Block,
    pub span: Span,
}

/// grammar: ifStmt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IfStatement {
    pub condition: Expression,
    pub then_block: Block,
    pub else_ifs: Vec<ElseIf>,
    pub else_block: Option<Block>,
    pub span: Span,
}

/// grammar: whileStmt := 'while' '(' expr ')' block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhileStatement {
    pub condition: Expression,
    pub body: Block,
    pub span: Span,
}

/// grammar: tryStmt := 'try' block 'catch' ('(' IDENT ')')? block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TryStatement {
    pub body: Block,
    pub catch_binding: Option<Identifier>,
    pub handler: Block,
    pub span: Span,
}

// === EXPRESSIONS ===

/// Binary operation; the operator token keeps its own span
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinaryExpression {
    pub left: Box<Expression>,
    pub operator: Spanned<Token>,
    pub right: Box<Expression>,
    pub span: Span,
}

/// grammar: 'cast' '(' expression ',' type ')'
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CastCall {
    pub value: Box<Expression>,
    pub target: Type,
    pub span: Span,
}

/// grammar: 'pow' '(' expression ',' expression ')'
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowCall {
    pub base: Box<Expression>,
    pub exponent: Box<Expression>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SqrtCall {
    pub value: Box<Expression>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinCall {
    pub left: Box<Expression>,
    pub right: Box<Expression>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaxCall {
    pub left: Box<Expression>,
    pub right: Box<Expression>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundCall {
    pub value: Box<Expression>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbsCall {
    pub value: Box<Expression>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacroValue {
    pub kind: MacroKind,
    pub span: Span,
}

/// grammar: expression, one variant per labelled alternative
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expression {
    UnaryMinus { operand: Box<Expression>, span: Span },
    Paren { inner: Box<Expression>, span: Span },
    Cast(CastCall),
    Pow(PowCall),
    Sqrt(SqrtCall),
    Min(MinCall),
    Max(MaxCall),
    Round(RoundCall),
    Abs(AbsCall),
    Macro(MacroValue),
    Ident { name: Identifier, span: Span },
    IntLiteral { text: String, span: Span },
    RealLiteral { text: String, span: Span },
    StringLiteral { text: String, span: Span },
    TrueLiteral { span: Span },
    FalseLiteral { span: Span },
    Equality(BinaryExpression),
    Relational(BinaryExpression),
    Additive(BinaryExpression),
    Multiplicative(BinaryExpression),
}

impl Expression {
    pub fn span(&self) -> Span {
        match self {
            Self::UnaryMinus { span, .. }
            | Self::Paren { span, .. }
            | Self::Ident { span, .. }
            | Self::IntLiteral { span, .. }
            | Self::RealLiteral { span, .. }
            | Self::StringLiteral { span, .. }
            | Self::TrueLiteral { span }
            | Self::FalseLiteral { span } => *span,
            Self::Cast(n) => n.span,
            Self::Pow(n) => n.span,
            Self::Sqrt(n) => n.span,
            Self::Min(n) => n.span,
            Self::Max(n) => n.span,
            Self::Round(n) => n.span,
            Self::Abs(n) => n.span,
            Self::Macro(n) => n.span,
            Self::Equality(n) | Self::Relational(n) | Self::Additive(n) | Self::Multiplicative(n) => {
                n.span
            }
        }
    }

    /// Rule label of this alternative
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnaryMinus { .. } => "UnaryMinus",
            Self::Paren { .. } => "Paren",
            Self::Cast(_) => "Cast",
            Self::Pow(_) => "Pow",
            Self::Sqrt(_) => "Sqrt",
            Self::Min(_) => "Min",
            Self::Max(_) => "Max",
            Self::Round(_) => "Round",
            Self::Abs(_) => "Abs",
            Self::Macro(_) => "Macro",
            Self::Ident { .. } => "Ident",
            Self::IntLiteral { .. } => "IntLiteral",
            Self::RealLiteral { .. } => "RealLiteral",
            Self::StringLiteral { .. } => "StringLiteral",
            Self::TrueLiteral { .. } => "TrueLiteral",
            Self::FalseLiteral { .. } => "FalseLiteral",
            Self::Equality(_) => "Equality",
            Self::Relational(_) => "Relational",
            Self::Additive(_) => "Additive",
            Self::Multiplicative(_) => "Multiplicative",
        }
    }

    pub fn as_binary(&self) -> Option<&BinaryExpression> {
        match self {
            Self::Equality(n) | Self::Relational(n) | Self::Additive(n) | Self::Multiplicative(n) => {
                Some(n)
            }
            _ => None,
        }
    }
}

// === DISPLAY IMPLEMENTATIONS ===

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for AssignOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fully parenthesised rendering; binary nodes always get brackets
impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnaryMinus { operand, .. } => write!(f, "-{}", operand),
            Self::Paren { inner, .. } => write!(f, "({})", inner),
            Self::Cast(n) => write!(f, "cast({}, {})", n.value, n.target),
            Self::Pow(n) => write!(f, "pow({}, {})", n.base, n.exponent),
            Self::Sqrt(n) => write!(f, "sqrt({})", n.value),
            Self::Min(n) => write!(f, "min({}, {})", n.left, n.right),
            Self::Max(n) => write!(f, "max({}, {})", n.left, n.right),
            Self::Round(n) => write!(f, "round({})", n.value),
            Self::Abs(n) => write!(f, "abs({})", n.value),
            Self::Macro(n) => f.write_str(n.kind.as_str()),
            Self::Ident { name, .. } => f.write_str(name),
            Self::IntLiteral { text, .. }
            | Self::RealLiteral { text, .. }
            | Self::StringLiteral { text, .. } => f.write_str(text),
            Self::TrueLiteral { .. } => f.write_str("true"),
            Self::FalseLiteral { .. } => f.write_str("false"),
            Self::Equality(n) | Self::Relational(n) | Self::Additive(n) | Self::Multiplicative(n) => {
                write!(f, "[{} {} {}]", n.left, n.operator.value.text(), n.right)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::Span;

    fn int(text: &str) -> Expression {
        Expression::IntLiteral {
            text: text.to_string(),
            span: Span::dummy(),
        }
    }

    #[test]
    fn test_type_parsing() {
        assert_eq!(Type::parse("float"), Some(Type::Float));
        assert_eq!(Type::parse("Float"), None);
        assert_eq!(Type::from_keyword(Keyword::StringType), Some(Type::String));
        assert!(Type::Int.is_numeric());
        assert!(!Type::Bool.is_numeric());
    }

    #[test]
    fn test_assign_op_from_token() {
        assert_eq!(AssignOp::from_token(&Token::DivideAssign), Some(AssignOp::DivAssign));
        assert_eq!(AssignOp::from_token(&Token::Equals), None);
    }

    #[test]
    fn test_expression_display_brackets_binary_nodes() {
        let expr = Expression::Additive(BinaryExpression {
            left: Box::new(int("1")),
            operator: Spanned::new(Token::Plus, Span::dummy()),
            right: Box::new(Expression::Multiplicative(BinaryExpression {
                left: Box::new(int("2")),
                operator: Spanned::new(Token::Multiply, Span::dummy()),
                right: Box::new(int("3")),
                span: Span::dummy(),
            })),
            span: Span::dummy(),
        });
        assert_eq!(expr.to_string(), "[1 + [2 * 3]]");
        assert_eq!(expr.kind(), "Additive");
        assert!(expr.as_binary().is_some());
    }

    #[test]
    fn test_tree_serializes() {
        let program = Program::default();
        let json = serde_json::to_string(&program).unwrap();
        assert!(json.contains("\"statements\":[]"));
    }
}
