//! Source printer for the host tree. Four-space indentation; string
//! literals keep their quote style.

use crate::ast::{
    ArrayItem, ArrowBody, Attr, AttrValue, BinaryOp, Child, Expr, Function, Import, Markup,
    Param, Program, Prop, PropKey, Stmt, Template, UnaryOp,
};

const INDENT: &str = "    ";

pub fn print_program(program: &Program) -> String {
    let mut p = Printer::default();
    for stmt in &program.body {
        p.stmt(stmt);
    }
    p.out
}

pub fn print_expr(expr: &Expr) -> String {
    let mut p = Printer::default();
    p.expr(expr, prec::ASSIGN);
    p.out
}

mod prec {
    pub const ASSIGN: u8 = 2;
    pub const COND: u8 = 3;
    pub const UNARY: u8 = 15;
    pub const POSTFIX: u8 = 17;
    pub const PRIMARY: u8 = 20;
}

fn binary_prec(op: BinaryOp) -> u8 {
    use BinaryOp::*;
    match op {
        Nullish | Or => 4,
        And => 5,
        BitOr => 6,
        BitXor => 7,
        BitAnd => 8,
        StrictEq | StrictNe | Eq | Ne => 9,
        Lt | Gt | Le | Ge | Instanceof | In => 10,
        Shl | Shr | UShr => 11,
        Add | Sub => 12,
        Mul | Div | Rem => 13,
        Pow => 14,
    }
}

fn expr_prec(expr: &Expr) -> u8 {
    match expr {
        Expr::Arrow { .. } | Expr::Assign { .. } => prec::ASSIGN,
        Expr::Cond { .. } => prec::COND,
        Expr::Binary { op, .. } => binary_prec(*op),
        Expr::Unary { .. } => prec::UNARY,
        Expr::Member { .. } | Expr::Index { .. } | Expr::Call { .. } | Expr::New { .. } => {
            prec::POSTFIX
        }
        _ => prec::PRIMARY,
    }
}

/// Quote `value` with `quote`, escaping what the literal cannot hold.
pub fn string_lit(value: &str, quote: char) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push(quote);
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}

/// Escape cooked text for a template literal quasi.
pub fn template_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '`' => out.push_str("\\`"),
            '\\' => out.push_str("\\\\"),
            '$' if chars.peek() == Some(&'{') => out.push_str("\\$"),
            c => out.push(c),
        }
    }
    out
}

#[derive(Default)]
struct Printer {
    out: String,
    depth: usize,
}

impl Printer {
    fn indent(&mut self) {
        for _ in 0..self.depth {
            self.out.push_str(INDENT);
        }
    }

    fn push(&mut self, s: &str) {
        self.out.push_str(s);
    }

    fn stmt(&mut self, stmt: &Stmt) {
        self.indent();
        self.stmt_inline(stmt);
        self.out.push('\n');
    }

    fn block(&mut self, body: &[Stmt]) {
        if body.is_empty() {
            self.push("{}");
            return;
        }
        self.push("{\n");
        self.depth += 1;
        for stmt in body {
            self.stmt(stmt);
        }
        self.depth -= 1;
        self.indent();
        self.push("}");
    }

    fn stmt_inline(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Expr(expr) => {
                // `{` or `function` at statement start would read as a declaration
                if matches!(expr, Expr::Object(_) | Expr::Function(_)) {
                    self.push("(");
                    self.expr(expr, prec::ASSIGN);
                    self.push(")");
                } else {
                    self.expr(expr, 0);
                }
                self.push(";");
            }
            Stmt::Var(var) => {
                self.push(var.kind.as_str());
                self.push(" ");
                for (i, decl) in var.declarators.iter().enumerate() {
                    if i > 0 {
                        self.push(", ");
                    }
                    self.push(&decl.name);
                    if let Some(ty) = &decl.ty {
                        self.push(": ");
                        self.push(ty);
                    }
                    if let Some(init) = &decl.init {
                        self.push(" = ");
                        self.expr(init, prec::ASSIGN);
                    }
                }
                self.push(";");
            }
            Stmt::Function(function) => self.function(function),
            Stmt::Return(None) => self.push("return;"),
            Stmt::Return(Some(value)) => {
                self.push("return ");
                self.expr(value, 0);
                self.push(";");
            }
            Stmt::If { test, cons, alt } => {
                self.push("if (");
                self.expr(test, 0);
                self.push(") ");
                self.stmt_inline(cons);
                if let Some(alt) = alt {
                    self.push(" else ");
                    self.stmt_inline(alt);
                }
            }
            Stmt::Block(body) => self.block(body),
            Stmt::Import(import) => self.import(import),
            Stmt::Export(inner) => {
                self.push("export ");
                self.stmt_inline(inner);
            }
            Stmt::ExportDefault(expr) => {
                self.push("export default ");
                match expr {
                    Expr::Function(function) => self.function(function),
                    _ => {
                        self.expr(expr, prec::ASSIGN);
                        self.push(";");
                    }
                }
            }
            Stmt::Empty => self.push(";"),
        }
    }

    fn import(&mut self, import: &Import) {
        self.push("import ");
        let mut clauses = Vec::new();
        if let Some(default) = &import.default {
            clauses.push(default.clone());
        }
        if let Some(namespace) = &import.namespace {
            clauses.push(format!("* as {namespace}"));
        }
        if !import.named.is_empty() {
            let names: Vec<String> = import
                .named
                .iter()
                .map(|n| {
                    if n.imported == n.local {
                        n.local.clone()
                    } else {
                        format!("{} as {}", n.imported, n.local)
                    }
                })
                .collect();
            clauses.push(format!("{{ {} }}", names.join(", ")));
        }
        if !clauses.is_empty() {
            self.push(&clauses.join(", "));
            self.push(" from ");
        }
        self.push(&string_lit(&import.source.value, import.source.quote));
        self.push(";");
    }

    fn function(&mut self, function: &Function) {
        if function.is_async {
            self.push("async ");
        }
        self.push("function");
        if let Some(name) = &function.name {
            self.push(" ");
            self.push(name);
        }
        self.params(&function.params);
        if let Some(ret) = &function.ret {
            self.push(": ");
            self.push(ret);
        }
        self.push(" ");
        self.block(&function.body);
    }

    fn params(&mut self, params: &[Param]) {
        self.push("(");
        for (i, param) in params.iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            if param.rest {
                self.push("...");
            }
            self.push(&param.name);
            if param.optional {
                self.push("?");
            }
            if let Some(ty) = &param.ty {
                self.push(": ");
                self.push(ty);
            }
        }
        self.push(")");
    }

    fn items(&mut self, items: &[ArrayItem]) {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            match item {
                ArrayItem::Expr(expr) => self.expr(expr, prec::ASSIGN),
                ArrayItem::Spread(expr) => {
                    self.push("...");
                    self.expr(expr, prec::ASSIGN);
                }
            }
        }
    }

    /// Print `expr`, parenthesized when it binds looser than `min`.
    fn expr(&mut self, expr: &Expr, min: u8) {
        if expr_prec(expr) < min {
            self.push("(");
            self.expr_bare(expr);
            self.push(")");
        } else {
            self.expr_bare(expr);
        }
    }

    fn postfix_obj(&mut self, obj: &Expr) {
        if matches!(obj, Expr::Num(_)) {
            self.push("(");
            self.expr_bare(obj);
            self.push(")");
        } else {
            self.expr(obj, prec::POSTFIX);
        }
    }

    fn expr_bare(&mut self, expr: &Expr) {
        match expr {
            Expr::Ident(name) => self.push(name),
            Expr::Str(lit) => self.push(&string_lit(&lit.value, lit.quote)),
            Expr::Num(text) => self.push(text),
            Expr::Bool(true) => self.push("true"),
            Expr::Bool(false) => self.push("false"),
            Expr::Null => self.push("null"),
            Expr::Template(template) => self.template(template),
            Expr::Array(items) => {
                self.push("[");
                self.items(items);
                self.push("]");
            }
            Expr::Object(props) => self.object(props),
            Expr::Member {
                obj,
                prop,
                optional,
            } => {
                self.postfix_obj(obj);
                self.push(if *optional { "?." } else { "." });
                self.push(prop);
            }
            Expr::Index { obj, index } => {
                self.postfix_obj(obj);
                self.push("[");
                self.expr(index, 0);
                self.push("]");
            }
            Expr::Call { callee, args } => {
                self.postfix_obj(callee);
                self.push("(");
                self.items(args);
                self.push(")");
            }
            Expr::New { callee, args } => {
                self.push("new ");
                self.postfix_obj(callee);
                self.push("(");
                self.items(args);
                self.push(")");
            }
            Expr::Arrow {
                is_async,
                params,
                body,
            } => {
                if *is_async {
                    self.push("async ");
                }
                self.params(params);
                self.push(" => ");
                match body {
                    ArrowBody::Expr(body) if matches!(**body, Expr::Object(_)) => {
                        self.push("(");
                        self.expr(body, prec::ASSIGN);
                        self.push(")");
                    }
                    ArrowBody::Expr(body) => self.expr(body, prec::ASSIGN),
                    ArrowBody::Block(body) => self.block(body),
                }
            }
            Expr::Function(function) => self.function(function),
            Expr::Unary { op, arg } => {
                self.push(op.as_str());
                let clash = matches!(
                    (op, &**arg),
                    (UnaryOp::Neg, Expr::Unary { op: UnaryOp::Neg, .. })
                        | (UnaryOp::Plus, Expr::Unary { op: UnaryOp::Plus, .. })
                );
                if clash {
                    self.push("(");
                    self.expr_bare(arg);
                    self.push(")");
                } else {
                    self.expr(arg, prec::UNARY);
                }
            }
            Expr::Binary { op, left, right } => {
                let p = binary_prec(*op);
                // `**` is right-associative and rejects a bare unary base
                let (lmin, rmin) = if *op == BinaryOp::Pow {
                    (prec::UNARY + 1, p)
                } else {
                    (p, p + 1)
                };
                self.expr(left, lmin);
                self.push(" ");
                self.push(op.as_str());
                self.push(" ");
                self.expr(right, rmin);
            }
            Expr::Assign { op, target, value } => {
                self.expr(target, prec::POSTFIX);
                self.push(" ");
                self.push(op.as_str());
                self.push(" ");
                self.expr(value, prec::ASSIGN);
            }
            Expr::Cond { test, cons, alt } => {
                self.expr(test, prec::COND + 1);
                self.push(" ? ");
                self.expr(cons, prec::ASSIGN);
                self.push(" : ");
                self.expr(alt, prec::ASSIGN);
            }
            Expr::Paren(inner) => {
                self.push("(");
                self.expr(inner, 0);
                self.push(")");
            }
            Expr::Markup(markup) => self.markup(markup),
        }
    }

    fn template(&mut self, template: &Template) {
        self.push("`");
        for (i, quasi) in template.quasis.iter().enumerate() {
            self.push(&template_text(quasi));
            if let Some(expr) = template.exprs.get(i) {
                self.push("${");
                self.expr(expr, 0);
                self.push("}");
            }
        }
        self.push("`");
    }

    fn object(&mut self, props: &[Prop]) {
        if props.is_empty() {
            self.push("{}");
            return;
        }
        self.push("{ ");
        for (i, prop) in props.iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            match prop {
                Prop::KeyValue(key, value) => {
                    match key {
                        PropKey::Ident(name) | PropKey::Num(name) => self.push(name),
                        PropKey::Str(lit) => self.push(&string_lit(&lit.value, lit.quote)),
                        PropKey::Computed(key) => {
                            self.push("[");
                            self.expr(key, prec::ASSIGN);
                            self.push("]");
                        }
                    }
                    self.push(": ");
                    self.expr(value, prec::ASSIGN);
                }
                Prop::Shorthand(name) => self.push(name),
                Prop::Spread(expr) => {
                    self.push("...");
                    self.expr(expr, prec::ASSIGN);
                }
            }
        }
        self.push(" }");
    }

    // Untransformed markup prints back as markup.
    fn markup(&mut self, markup: &Markup) {
        match markup {
            Markup::Fragment(children) => {
                self.push("<>");
                self.children(children);
                self.push("</>");
            }
            Markup::Element(element) => {
                self.push("<");
                self.push(&element.tag);
                for attr in &element.attrs {
                    self.push(" ");
                    match attr {
                        Attr::Spread(expr) => {
                            self.push("{...");
                            self.expr(expr, prec::ASSIGN);
                            self.push("}");
                        }
                        Attr::Named { name, value } => {
                            self.push(name);
                            match value {
                                None => {}
                                Some(AttrValue::Str(lit)) => {
                                    self.push("=");
                                    self.push(&lit.quoted());
                                }
                                Some(AttrValue::Expr(expr)) => {
                                    self.push("={");
                                    self.expr(expr, 0);
                                    self.push("}");
                                }
                            }
                        }
                    }
                }
                if element.self_closing {
                    self.push(" />");
                    return;
                }
                self.push(">");
                self.children(&element.children);
                self.push("</");
                self.push(&element.tag);
                self.push(">");
            }
        }
    }

    fn children(&mut self, children: &[Child]) {
        for child in children {
            match child {
                Child::Text(text) => self.push(text),
                Child::Expr(child) => {
                    self.push("{");
                    if child.spread {
                        self.push("...");
                    }
                    if let Some(expr) = &child.expr {
                        self.expr(expr, 0);
                    }
                    self.push("}");
                }
                Child::Markup(markup) => self.markup(markup),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_keeps_quote_style() {
        assert_eq!(string_lit("it's", '"'), r#""it's""#);
        assert_eq!(string_lit("it's", '\''), r"'it\'s'");
        assert_eq!(string_lit("a\nb", '"'), r#""a\nb""#);
    }

    #[test]
    fn template_text_escapes() {
        assert_eq!(template_text("a`b"), "a\\`b");
        assert_eq!(template_text("${x}"), "\\${x}");
        assert_eq!(template_text("$5"), "$5");
        assert_eq!(template_text("c:\\d"), "c:\\\\d");
    }

    #[test]
    fn binary_parenthesizes_by_precedence() {
        let sum = Expr::Binary {
            op: BinaryOp::Add,
            left: Box::new(Expr::ident("a")),
            right: Box::new(Expr::ident("b")),
        };
        let product = Expr::Binary {
            op: BinaryOp::Mul,
            left: Box::new(sum.clone()),
            right: Box::new(Expr::ident("c")),
        };
        assert_eq!(print_expr(&product), "(a + b) * c");

        let diff = Expr::Binary {
            op: BinaryOp::Sub,
            left: Box::new(Expr::ident("x")),
            right: Box::new(sum),
        };
        assert_eq!(print_expr(&diff), "x - (a + b)");
    }

    #[test]
    fn arrow_object_body_is_wrapped() {
        let arrow = Expr::Arrow {
            is_async: false,
            params: vec![],
            body: ArrowBody::Expr(Box::new(Expr::Object(vec![]))),
        };
        assert_eq!(print_expr(&arrow), "() => ({})");
    }
}
