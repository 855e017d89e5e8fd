// Bibi AST Definitions
// Syntax tree nodes, each carrying the source span it was parsed from

use std::fmt;

/// Source position information for AST nodes.
///
/// `start`/`end` are byte offsets into the source; `line`/`column` are the
/// 1-based position of `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: usize,
    pub column: usize,
}

impl Span {
    pub fn new(start: usize, end: usize, line: usize, column: usize) -> Self {
        Self {
            start,
            end,
            line,
            column,
        }
    }

    /// Span covering `self` through the end of `other`.
    pub fn to(&self, other: &Span) -> Span {
        Span {
            start: self.start,
            end: other.end.max(self.end),
            line: self.line,
            column: self.column,
        }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Top-level program: an ordered list of statements
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub statements: Vec<Statement>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub kind: StatementKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StatementKind {
    VariableDeclaration(VariableDeclaration),
    Assignment(Assignment),
    FunctionDeclaration(FunctionDeclaration),
    Block(Block),
    If(IfStatement),
    While(WhileStatement),
    Break,
    Continue,
    Return(Option<Expression>),
    Print(Expression),
    Try(TryStatement),
    RecordTypeDeclaration(RecordTypeDeclaration),
    RecordInstanceDeclaration(RecordInstanceDeclaration),
    Expression(Expression),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    pub name: String,
    pub span: Span,
}

/// Scalar types that can be named in declarations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    Int,
    Float,
    Str,
    Char,
    Bool,
}

impl PrimitiveType {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "int" => Some(PrimitiveType::Int),
            "float" => Some(PrimitiveType::Float),
            "str" => Some(PrimitiveType::Str),
            "char" => Some(PrimitiveType::Char),
            "bool" => Some(PrimitiveType::Bool),
            _ => None,
        }
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            PrimitiveType::Int => "int",
            PrimitiveType::Float => "float",
            PrimitiveType::Str => "str",
            PrimitiveType::Char => "char",
            PrimitiveType::Bool => "bool",
        }
    }
}

/// A declared type such as `int` or `str[]`
#[derive(Debug, Clone, PartialEq)]
pub struct TypeName {
    pub primitive: PrimitiveType,
    pub is_array: bool,
    pub span: Span,
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_array {
            write!(f, "{}[]", self.primitive.keyword())
        } else {
            write!(f, "{}", self.primitive.keyword())
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariableDeclaration {
    pub type_name: TypeName,
    pub name: Identifier,
    pub initializer: Option<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AssignmentTarget {
    Variable(Identifier),
    Field { record: Identifier, field: Identifier },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub target: AssignmentTarget,
    pub value: Expression,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub type_name: TypeName,
    pub name: Identifier,
}

/// `func name(params) type { ... }`; a missing return type means `void`
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDeclaration {
    pub name: Identifier,
    pub parameters: Vec<Parameter>,
    pub return_type: Option<TypeName>,
    pub body: Block,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub statements: Vec<Statement>,
    pub span: Span,
}

/// One `if`/`else if` arm
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionalBranch {
    pub condition: Expression,
    pub body: Block,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfStatement {
    pub branches: Vec<ConditionalBranch>,
    pub else_block: Option<Block>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhileStatement {
    pub condition: Expression,
    pub body: Block,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TryStatement {
    pub protected: Block,
    pub recovery: Block,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldDeclaration {
    pub type_name: TypeName,
    pub name: Identifier,
}

/// `type Name { int field; ... }`
#[derive(Debug, Clone, PartialEq)]
pub struct RecordTypeDeclaration {
    pub name: Identifier,
    pub fields: Vec<FieldDeclaration>,
}

/// `Name variable;`
#[derive(Debug, Clone, PartialEq)]
pub struct RecordInstanceDeclaration {
    pub record_type: Identifier,
    pub name: Identifier,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    pub kind: ExpressionKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExpressionKind {
    Integer(i64),
    Float(f64),
    Str(String),
    Char(char),
    Boolean(bool),
    IntArray(Vec<NumberLiteral>),
    CharArray(Vec<char>),
    StrArray(Vec<String>),
    Identifier(Identifier),
    Index(IndexAccess),
    FieldAccess(FieldAccess),
    Call(FunctionCall),
    Unary(UnaryOperation),
    Binary(BinaryOperation),
    Parenthesized(Box<Expression>),
}

/// Element of a numeric array literal; the literal's text decides which
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumberLiteral {
    Int(i64),
    Float(f64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndexAccess {
    pub array: Identifier,
    pub index: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldAccess {
    pub record: Identifier,
    pub field: Identifier,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    pub name: Identifier,
    pub arguments: Vec<Expression>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Negate,
    Not,
}

impl fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnaryOperator::Negate => write!(f, "-"),
            UnaryOperator::Not => write!(f, "not"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnaryOperation {
    pub operator: UnaryOperator,
    pub operand: Box<Expression>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    And,
    Or,
}

impl BinaryOperator {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::Equal => "==",
            BinaryOperator::NotEqual => "!=",
            BinaryOperator::Less => "<",
            BinaryOperator::LessEqual => "<=",
            BinaryOperator::Greater => ">",
            BinaryOperator::GreaterEqual => ">=",
            BinaryOperator::And => "and",
            BinaryOperator::Or => "or",
        }
    }

    pub fn is_arithmetic(&self) -> bool {
        matches!(
            self,
            BinaryOperator::Add
                | BinaryOperator::Subtract
                | BinaryOperator::Multiply
                | BinaryOperator::Divide
        )
    }

    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            BinaryOperator::Equal
                | BinaryOperator::NotEqual
                | BinaryOperator::Less
                | BinaryOperator::LessEqual
                | BinaryOperator::Greater
                | BinaryOperator::GreaterEqual
        )
    }

    pub fn is_logical(&self) -> bool {
        matches!(self, BinaryOperator::And | BinaryOperator::Or)
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryOperation {
    pub left: Box<Expression>,
    pub operator: BinaryOperator,
    pub right: Box<Expression>,
}
