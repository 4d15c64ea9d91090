//! Single-dispatch traversal over the parse tree
//!
//! [`Node`] borrows any tree node; a [`Visitor`] receives every node through
//! one `visit` method and calls [`walk`] to descend into children.

use super::nodes::*;
use crate::utils::Span;

/// Borrowed view of any parse-tree node
#[derive(Debug, Clone, Copy)]
pub enum Node<'a> {
    Program(&'a Program),
    Statement(&'a Statement),
    Block(&'a Block),
    VariableDeclaration(&'a VariableDeclaration),
    ConstDeclaration(&'a ConstDeclaration),
    Assignment(&'a Assignment),
    Print(&'a PrintStatement),
    PrintArg(&'a PrintArg),
    If(&'a IfStatement),
    ElseIf(&'a ElseIf),
    While(&'a WhileStatement),
    Try(&'a TryStatement),
    Expression(&'a Expression),
}

impl<'a> Node<'a> {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Program(_) => "Program",
            Self::Statement(_) => "Statement",
            Self::Block(_) => "Block",
            Self::VariableDeclaration(_) => "VariableDeclaration",
            Self::ConstDeclaration(_) => "ConstDeclaration",
            Self::Assignment(_) => "Assignment",
            Self::Print(_) => "PrintStatement",
            Self::PrintArg(_) => "PrintArg",
            Self::If(_) => "IfStatement",
            Self::ElseIf(_) => "ElseIf",
            Self::While(_) => "WhileStatement",
            Self::Try(_) => "TryStatement",
            Self::Expression(expr) => expr.kind(),
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Self::Program(n) => n.span,
            Self::Statement(n) => n.span(),
            Self::Block(n) => n.span,
            Self::VariableDeclaration(n) => n.span,
            Self::ConstDeclaration(n) => n.span,
            Self::Assignment(n) => n.span,
            Self::Print(n) => n.span,
            Self::PrintArg(n) => n.span(),
            Self::If(n) => n.span,
            Self::ElseIf(n) => n.span,
            Self::While(n) => n.span,
            Self::Try(n) => n.span,
            Self::Expression(n) => n.span(),
        }
    }

    /// Direct children in source order
    pub fn children(&self) -> Vec<Node<'a>> {
        match *self {
            Self::Program(n) => n.statements.iter().map(Node::Statement).collect(),
            Self::Block(n) => n.statements.iter().map(Node::Statement).collect(),
            Self::Statement(stmt) => vec![match stmt {
                Statement::VariableDeclaration(n) => Node::VariableDeclaration(n),
                Statement::ConstDeclaration(n) => Node::ConstDeclaration(n),
                Statement::Assignment(n) => Node::Assignment(n),
                Statement::Print(n) => Node::Print(n),
                Statement::If(n) => Node::If(n),
                Statement::While(n) => Node::While(n),
                Statement::Try(n) => Node::Try(n),
                Statement::Block(n) => Node::Block(n),
            }],
            Self::VariableDeclaration(n) => vec![Node::Expression(&n.value)],
            Self::ConstDeclaration(n) => vec![Node::VariableDeclaration(&n.declaration)],
            Self::Assignment(n) => vec![Node::Expression(&n.value)],
            Self::Print(n) => n.args.iter().map(Node::PrintArg).collect(),
            Self::PrintArg(PrintArg::String { .. }) => Vec::new(),
            Self::PrintArg(PrintArg::Expression(expr)) => vec![Node::Expression(expr)],
            Self::If(n) => {
                let mut children = vec![Node::Expression(&n.condition), Node::Block(&n.then_block)];
                children.extend(n.else_ifs.iter().map(Node::ElseIf));
                children.extend(n.else_block.iter().map(Node::Block));
                children
            }
            Self::ElseIf(n) => vec![Node::Expression(&n.condition), Node::Block(&n.body)],
            Self::While(n) => vec![Node::Expression(&n.condition), Node::Block(&n.body)],
            Self::Try(n) => vec![Node::Block(&n.body), Node::Block(&n.handler)],
            Self::Expression(expr) => expression_children(expr),
        }
    }
}

fn expression_children(expr: &Expression) -> Vec<Node<'_>> {
    let boxed: Vec<&Expression> = match expr {
        Expression::UnaryMinus { operand, .. } => vec![&**operand],
        Expression::Paren { inner, .. } => vec![&**inner],
        Expression::Cast(n) => vec![&*n.value],
        Expression::Pow(n) => vec![&*n.base, &*n.exponent],
        Expression::Sqrt(n) => vec![&*n.value],
        Expression::Min(n) => vec![&*n.left, &*n.right],
        Expression::Max(n) => vec![&*n.left, &*n.right],
        Expression::Round(n) => vec![&*n.value],
        Expression::Abs(n) => vec![&*n.value],
        Expression::Equality(n)
        | Expression::Relational(n)
        | Expression::Additive(n)
        | Expression::Multiplicative(n) => vec![&*n.left, &*n.right],
        Expression::Macro(_)
        | Expression::Ident { .. }
        | Expression::IntLiteral { .. }
        | Expression::RealLiteral { .. }
        | Expression::StringLiteral { .. }
        | Expression::TrueLiteral { .. }
        | Expression::FalseLiteral { .. } => Vec::new(),
    };
    boxed.into_iter().map(Node::Expression).collect()
}

pub trait Visitor {
    /// Called for every node; the default descends into children
    fn visit(&mut self, node: Node<'_>) {
        walk(self, node);
    }
}

/// Visit each direct child of `node`
pub fn walk<V: Visitor + ?Sized>(visitor: &mut V, node: Node<'_>) {
    for child in node.children() {
        visitor.visit(child);
    }
}

/// Counts nodes per kind
#[derive(Debug, Default)]
pub struct NodeCounter {
    pub total: usize,
    pub max_depth: usize,
    depth: usize,
}

impl Visitor for NodeCounter {
    fn visit(&mut self, node: Node<'_>) {
        self.total += 1;
        self.depth += 1;
        self.max_depth = self.max_depth.max(self.depth);
        walk(self, node);
        self.depth -= 1;
    }
}

/// Indented outline of the tree, one node per line
#[derive(Debug, Default)]
pub struct TreePrinter {
    output: String,
    indent: usize,
}

impl TreePrinter {
    pub fn render(program: &Program) -> String {
        let mut printer = Self::default();
        printer.visit(Node::Program(program));
        printer.output
    }

    fn label(node: &Node<'_>) -> String {
        match node {
            Node::VariableDeclaration(n) => format!("VariableDeclaration {} {}", n.var_type, n.name),
            Node::Assignment(n) => format!("Assignment {} {}", n.target, n.op),
            Node::PrintArg(PrintArg::String { text, .. }) => format!("PrintArg {}", text),
            Node::Try(n) => match &n.catch_binding {
                Some(name) => format!("TryStatement catch({})", name),
                None => "TryStatement".to_string(),
            },
            Node::Expression(expr) => match expr {
                Expression::Ident { name, .. } => format!("Ident {}", name),
                Expression::IntLiteral { text, .. }
                | Expression::RealLiteral { text, .. }
                | Expression::StringLiteral { text, .. } => format!("{} {}", expr.kind(), text),
                Expression::Macro(m) => format!("Macro {}", m.kind.as_str()),
                Expression::Cast(c) => format!("Cast -> {}", c.target),
                _ => match expr.as_binary() {
                    Some(bin) => format!("{} {}", expr.kind(), bin.operator.value.text()),
                    None => expr.kind().to_string(),
                },
            },
            other => other.kind().to_string(),
        }
    }
}

impl Visitor for TreePrinter {
    fn visit(&mut self, node: Node<'_>) {
        // Statement wrappers add no information over their single child
        if matches!(node, Node::Statement(_)) {
            walk(self, node);
            return;
        }
        self.output.push_str(&"  ".repeat(self.indent));
        self.output.push_str(&Self::label(&node));
        self.output.push_str(&format!(" @{}\n", node.span()));
        self.indent += 1;
        walk(self, node);
        self.indent -= 1;
    }
}
