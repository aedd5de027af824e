//! Host syntax tree: a TSX-like subset of statements and expressions, plus
//! the markup nodes the transform consumes.

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Expr(Expr),
    Var(VarDecl),
    Function(Function),
    Return(Option<Expr>),
    If {
        test: Expr,
        cons: Box<Stmt>,
        alt: Option<Box<Stmt>>,
    },
    Block(Vec<Stmt>),
    Import(Import),
    /// `export <decl>`
    Export(Box<Stmt>),
    ExportDefault(Expr),
    Empty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarKind {
    Const,
    Let,
    Var,
}

impl VarKind {
    pub fn as_str(self) -> &'static str {
        match self {
            VarKind::Const => "const",
            VarKind::Let => "let",
            VarKind::Var => "var",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    pub kind: VarKind,
    pub declarators: Vec<Declarator>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Declarator {
    pub name: String,
    /// Type annotation source text, kept verbatim.
    pub ty: Option<String>,
    pub init: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub name: Option<String>,
    pub is_async: bool,
    pub params: Vec<Param>,
    pub ret: Option<String>,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub rest: bool,
    pub optional: bool,
    pub ty: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Import {
    pub default: Option<String>,
    pub namespace: Option<String>,
    pub named: Vec<ImportName>,
    /// Module specifier, quotes included.
    pub source: StrLit,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportName {
    pub imported: String,
    pub local: String,
}

impl Import {
    /// Local names this import brings into scope.
    pub fn locals(&self) -> impl Iterator<Item = &str> {
        self.default
            .iter()
            .chain(self.namespace.iter())
            .map(String::as_str)
            .chain(self.named.iter().map(|n| n.local.as_str()))
    }
}

/// A quoted string literal. `value` is the cooked text.
#[derive(Debug, Clone, PartialEq)]
pub struct StrLit {
    pub value: String,
    pub quote: char,
}

impl StrLit {
    pub fn double(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            quote: '"',
        }
    }

    /// Source text of the literal with its quotes.
    pub fn quoted(&self) -> String {
        format!("{q}{}{q}", self.value, q = self.quote)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    /// Cooked static text; always one longer than `exprs`.
    pub quasis: Vec<String>,
    pub exprs: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Ident(String),
    Str(StrLit),
    /// Numeric literal, source text.
    Num(String),
    Bool(bool),
    Null,
    Template(Template),
    Array(Vec<ArrayItem>),
    Object(Vec<Prop>),
    Member {
        obj: Box<Expr>,
        prop: String,
        optional: bool,
    },
    Index {
        obj: Box<Expr>,
        index: Box<Expr>,
    },
    Call {
        callee: Box<Expr>,
        args: Vec<ArrayItem>,
    },
    New {
        callee: Box<Expr>,
        args: Vec<ArrayItem>,
    },
    Arrow {
        is_async: bool,
        params: Vec<Param>,
        body: ArrowBody,
    },
    Function(Box<Function>),
    Unary {
        op: UnaryOp,
        arg: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Assign {
        op: AssignOp,
        target: Box<Expr>,
        value: Box<Expr>,
    },
    Cond {
        test: Box<Expr>,
        cons: Box<Expr>,
        alt: Box<Expr>,
    },
    Paren(Box<Expr>),
    Markup(Markup),
}

impl Expr {
    pub fn ident(name: impl Into<String>) -> Self {
        Expr::Ident(name.into())
    }

    pub fn str(value: impl Into<String>) -> Self {
        Expr::Str(StrLit::double(value))
    }

    /// Whether the expression can sit in callee or member-object position
    /// without parentheses.
    pub fn is_postfix_safe(&self) -> bool {
        matches!(
            self,
            Expr::Ident(_)
                | Expr::Str(_)
                | Expr::Template(_)
                | Expr::Array(_)
                | Expr::Member { .. }
                | Expr::Index { .. }
                | Expr::Call { .. }
                | Expr::Paren(_)
                | Expr::Null
                | Expr::Bool(_)
        )
    }
}

/// Array element, call argument or spread of either.
#[derive(Debug, Clone, PartialEq)]
pub enum ArrayItem {
    Expr(Expr),
    Spread(Expr),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Prop {
    KeyValue(PropKey, Expr),
    Shorthand(String),
    Spread(Expr),
}

#[derive(Debug, Clone, PartialEq)]
pub enum PropKey {
    Ident(String),
    Str(StrLit),
    Num(String),
    Computed(Box<Expr>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ArrowBody {
    Expr(Box<Expr>),
    Block(Vec<Stmt>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Neg,
    Plus,
    BitNot,
    Typeof,
    Void,
    Await,
}

impl UnaryOp {
    pub fn as_str(self) -> &'static str {
        match self {
            UnaryOp::Not => "!",
            UnaryOp::Neg => "-",
            UnaryOp::Plus => "+",
            UnaryOp::BitNot => "~",
            UnaryOp::Typeof => "typeof ",
            UnaryOp::Void => "void ",
            UnaryOp::Await => "await ",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Nullish,
    Or,
    And,
    BitOr,
    BitXor,
    BitAnd,
    StrictEq,
    StrictNe,
    Eq,
    Ne,
    Le,
    Ge,
    Lt,
    Gt,
    Instanceof,
    In,
    Shl,
    UShr,
    Shr,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Pow,
}

impl BinaryOp {
    pub fn as_str(self) -> &'static str {
        match self {
            BinaryOp::Nullish => "??",
            BinaryOp::Or => "||",
            BinaryOp::And => "&&",
            BinaryOp::BitOr => "|",
            BinaryOp::BitXor => "^",
            BinaryOp::BitAnd => "&",
            BinaryOp::StrictEq => "===",
            BinaryOp::StrictNe => "!==",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Le => "<=",
            BinaryOp::Ge => ">=",
            BinaryOp::Lt => "<",
            BinaryOp::Gt => ">",
            BinaryOp::Instanceof => "instanceof",
            BinaryOp::In => "in",
            BinaryOp::Shl => "<<",
            BinaryOp::UShr => ">>>",
            BinaryOp::Shr => ">>",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
            BinaryOp::Pow => "**",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    Assign,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Or,
    And,
    Nullish,
}

impl AssignOp {
    pub fn as_str(self) -> &'static str {
        match self {
            AssignOp::Assign => "=",
            AssignOp::Add => "+=",
            AssignOp::Sub => "-=",
            AssignOp::Mul => "*=",
            AssignOp::Div => "/=",
            AssignOp::Rem => "%=",
            AssignOp::Or => "||=",
            AssignOp::And => "&&=",
            AssignOp::Nullish => "??=",
        }
    }
}

// Markup

#[derive(Debug, Clone, PartialEq)]
pub enum Markup {
    Element(Element),
    Fragment(Vec<Child>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub tag: String,
    pub attrs: Vec<Attr>,
    pub children: Vec<Child>,
    pub self_closing: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Attr {
    Named {
        name: String,
        value: Option<AttrValue>,
    },
    Spread(Expr),
}

#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    /// Quoted attribute text; markup strings carry no escapes.
    Str(StrLit),
    /// `{expr}`
    Expr(Expr),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Child {
    Text(String),
    Expr(ExprChild),
    Markup(Markup),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExprChild {
    /// `None` for `{}` and comment-only containers.
    pub expr: Option<Expr>,
    pub spread: bool,
}
