//! The minimal AST surface consumed from outside this crate (§6): enough
//! structure for the symbol table, predeclared registry, and import
//! resolver to operate on without depending on an external parser crate.
//! The lexer, a full expression grammar, and AST traversal boilerplate
//! remain out of scope — this module models only the node shapes the
//! analyzer substrate actually reads.

use serde::{Deserialize, Serialize};

/// A source location, carried by every AST node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SourceLocation {
    pub line: u32,
    pub column: u32,
}

impl SourceLocation {
    pub fn new(line: u32, column: u32) -> Self {
        SourceLocation { line, column }
    }
}

/// A string/identifier/integer/boolean attribute value, per the
/// `#[name(arg=value,...)]` annotation surface in §6.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttributeValue {
    String(String),
    Identifier(String),
    Integer(i64),
    Boolean(bool),
}

/// One `#[name]`, `#[name(none)]`, or `#[name(arg=value,...)]` annotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub args: Vec<(String, AttributeValue)>,
    pub location: SourceLocation,
}

impl Attribute {
    /// The legacy `@name` syntax is rejected outright with a migration
    /// message rather than parsed into an `Attribute`.
    pub const LEGACY_SYNTAX_MIGRATION_MESSAGE: &'static str =
        "the '@name' attribute syntax has been replaced by '#[name]'; update this annotation";
}

/// Declaration-level nodes the analyzer walks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Declaration {
    Package {
        name: String,
        location: SourceLocation,
    },
    Import {
        path: String,
        alias: Option<String>,
        location: SourceLocation,
    },
    Function {
        name: String,
        params: Vec<ParamDecl>,
        return_type: TypeNode,
        attributes: Vec<Attribute>,
        location: SourceLocation,
    },
    Struct {
        name: String,
        fields: Vec<FieldDecl>,
        attributes: Vec<Attribute>,
        location: SourceLocation,
    },
    Enum {
        name: String,
        variants: Vec<String>,
        attributes: Vec<Attribute>,
        location: SourceLocation,
    },
    Impl {
        type_name: String,
        methods: Vec<Declaration>,
        location: SourceLocation,
    },
    Method {
        name: String,
        params: Vec<ParamDecl>,
        return_type: TypeNode,
        location: SourceLocation,
    },
    Extern {
        name: String,
        signature: TypeNode,
        location: SourceLocation,
    },
    Const {
        name: String,
        type_node: TypeNode,
        location: SourceLocation,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamDecl {
    pub name: String,
    pub type_node: TypeNode,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDecl {
    pub name: String,
    pub type_node: TypeNode,
    pub location: SourceLocation,
}

/// Type nodes as written in source, before resolution to a `TypeId`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TypeNode {
    Base(String),
    Slice(Box<TypeNode>),
    Pointer(Box<TypeNode>),
    Result(Box<TypeNode>, Box<TypeNode>),
    Option(Box<TypeNode>),
}

/// Statement-level nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Statement {
    Let {
        name: String,
        type_node: Option<TypeNode>,
        location: SourceLocation,
    },
    Var {
        name: String,
        type_node: Option<TypeNode>,
        location: SourceLocation,
    },
    Assign {
        target: String,
        location: SourceLocation,
    },
    If {
        location: SourceLocation,
    },
    For {
        location: SourceLocation,
    },
    Return {
        location: SourceLocation,
    },
    Expression {
        expr: Expression,
        location: SourceLocation,
    },
    Spawn {
        entry: String,
        location: SourceLocation,
    },
    SpawnWithHandle {
        entry: String,
        handle_name: String,
        location: SourceLocation,
    },
    Match {
        scrutinee: Expression,
        arms: Vec<MatchArm>,
        location: SourceLocation,
    },
    Unsafe {
        location: SourceLocation,
    },
}

/// Expression-level nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expression {
    Binary {
        location: SourceLocation,
    },
    Unary {
        location: SourceLocation,
    },
    Call {
        callee: String,
        location: SourceLocation,
    },
    FieldAccess {
        base: String,
        field: String,
        location: SourceLocation,
    },
    IndexAccess {
        base: String,
        location: SourceLocation,
    },
    StructLiteral {
        type_name: String,
        location: SourceLocation,
    },
    ArrayLiteral {
        location: SourceLocation,
    },
    EnumVariant {
        enum_name: String,
        variant: String,
        location: SourceLocation,
    },
    Await {
        handle: String,
        location: SourceLocation,
    },
    Identifier {
        name: String,
        location: SourceLocation,
    },
    Literal {
        literal: Literal,
        location: SourceLocation,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    Integer(i64),
    Float(f64),
    Bool(bool),
    String(String),
}

/// A pattern used in a match arm's surface syntax, distinct from
/// [`crate::match_engine::Pattern`] which is the runtime dispatch tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SurfacePattern {
    EnumVariant { enum_name: String, variant: String },
    Struct { type_name: String },
    Field { name: String },
    OkBinding(String),
    ErrBinding(String),
    Wildcard,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchArm {
    pub pattern: SurfacePattern,
    pub location: SourceLocation,
}
