use crate::ast::{ArrayItem, ArrowBody, BinaryOp, Expr, Param, Prop, PropKey, StrLit, Template};
use crate::config::DEFAULT_MERGE_HELPER;
use crate::transform::Span;

/// Materializes the nodes the transform decides on. The transform only
/// chooses shape and order; node construction goes through here.
pub trait NodeFactory {
    fn string_literal(&self, text: &str) -> Expr;

    /// `head${spans[0].expr}spans[0].after${…}…`
    fn template(&self, head: String, spans: Vec<Span>) -> Expr;

    fn call(&self, callee: Expr, args: Vec<Expr>) -> Expr;

    /// Object literal with keys in the given order.
    fn object(&self, props: Vec<(String, Expr)>) -> Expr;

    /// Shallow merge of `sources` onto a fresh empty object; later sources
    /// win.
    fn merge(&self, sources: Vec<Expr>) -> Expr;

    /// Concatenate the elements of an iterable with an empty separator.
    fn join_iterable(&self, iterable: Expr) -> Expr;

    /// Render an attribute bag as `key="value"` pairs separated by spaces;
    /// `true` values render as the bare key.
    fn serialize_attributes(&self, bag: Expr) -> Expr;

    fn true_literal(&self) -> Expr {
        Expr::Bool(true)
    }
}

/// Builds plain ECMAScript nodes.
#[derive(Debug, Clone)]
pub struct EcmaFactory {
    merge_helper: String,
}

impl EcmaFactory {
    pub fn new(merge_helper: impl Into<String>) -> Self {
        Self {
            merge_helper: merge_helper.into(),
        }
    }
}

impl Default for EcmaFactory {
    fn default() -> Self {
        Self::new(DEFAULT_MERGE_HELPER)
    }
}

/// `a.b.c` as a member chain.
pub fn path_expr(path: &str) -> Expr {
    let mut parts = path.split('.');
    let root = Expr::ident(parts.next().unwrap_or(path));
    parts.fold(root, member)
}

fn member(obj: Expr, prop: &str) -> Expr {
    let obj = if obj.is_postfix_safe() {
        obj
    } else {
        Expr::Paren(Box::new(obj))
    };
    Expr::Member {
        obj: Box::new(obj),
        prop: prop.to_string(),
        optional: false,
    }
}

fn method_call(obj: Expr, method: &str, args: Vec<Expr>) -> Expr {
    Expr::Call {
        callee: Box::new(member(obj, method)),
        args: args.into_iter().map(ArrayItem::Expr).collect(),
    }
}

pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

impl NodeFactory for EcmaFactory {
    fn string_literal(&self, text: &str) -> Expr {
        Expr::Str(StrLit::double(text))
    }

    fn template(&self, head: String, spans: Vec<Span>) -> Expr {
        let mut quasis = Vec::with_capacity(spans.len() + 1);
        let mut exprs = Vec::with_capacity(spans.len());
        quasis.push(head);
        for span in spans {
            exprs.push(span.expr);
            quasis.push(span.after);
        }
        Expr::Template(Template { quasis, exprs })
    }

    fn call(&self, callee: Expr, args: Vec<Expr>) -> Expr {
        let callee = if callee.is_postfix_safe() {
            callee
        } else {
            Expr::Paren(Box::new(callee))
        };
        Expr::Call {
            callee: Box::new(callee),
            args: args.into_iter().map(ArrayItem::Expr).collect(),
        }
    }

    fn object(&self, props: Vec<(String, Expr)>) -> Expr {
        Expr::Object(
            props
                .into_iter()
                .map(|(key, value)| {
                    let key = if is_identifier(&key) {
                        PropKey::Ident(key)
                    } else {
                        PropKey::Str(StrLit::double(key))
                    };
                    Prop::KeyValue(key, value)
                })
                .collect(),
        )
    }

    fn merge(&self, sources: Vec<Expr>) -> Expr {
        let mut args = Vec::with_capacity(sources.len() + 1);
        args.push(Expr::Object(Vec::new()));
        args.extend(sources);
        self.call(path_expr(&self.merge_helper), args)
    }

    fn join_iterable(&self, iterable: Expr) -> Expr {
        let array = self.call(path_expr("Array.from"), vec![iterable]);
        method_call(array, "join", vec![self.string_literal("")])
    }

    fn serialize_attributes(&self, bag: Expr) -> Expr {
        let entry = |i: &str| Expr::Index {
            obj: Box::new(Expr::ident("e")),
            index: Box::new(Expr::Num(i.to_string())),
        };
        let pair = Expr::Template(Template {
            quasis: vec![String::new(), "=\"".to_string(), "\"".to_string()],
            exprs: vec![entry("0"), entry("1")],
        });
        // flags render as a bare name
        let flag = Expr::Binary {
            op: BinaryOp::StrictEq,
            left: Box::new(entry("1")),
            right: Box::new(self.true_literal()),
        };
        let pair = Expr::Cond {
            test: Box::new(flag),
            cons: Box::new(entry("0")),
            alt: Box::new(pair),
        };
        let render = Expr::Arrow {
            is_async: false,
            params: vec![Param {
                name: "e".to_string(),
                rest: false,
                optional: false,
                ty: None,
            }],
            body: ArrowBody::Expr(Box::new(pair)),
        };
        let entries = self.call(path_expr("Object.entries"), vec![bag]);
        let rendered = method_call(entries, "map", vec![render]);
        method_call(rendered, "join", vec![self.string_literal(" ")])
    }
}
