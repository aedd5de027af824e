use std::sync::LazyLock;

use pest::Parser;
use pest::iterators::{Pair, Pairs};
use pest::pratt_parser::{Assoc, Op, PrattParser};

use crate::ast::{
    ArrayItem, ArrowBody, AssignOp, Attr, AttrValue, BinaryOp, Child, Declarator, Element, Expr,
    ExprChild, Function, Import, ImportName, Markup, Param, Program, Prop, PropKey, Stmt, StrLit,
    Template, UnaryOp, VarDecl, VarKind,
};
use crate::error::{Error, Result};

#[derive(pest_derive::Parser)]
#[grammar = "grammar.pest"]
pub struct HostParser;

static PRATT: LazyLock<PrattParser<Rule>> = LazyLock::new(|| {
    use Assoc::{Left, Right};
    PrattParser::new()
        .op(Op::infix(Rule::nullish, Left))
        .op(Op::infix(Rule::or, Left))
        .op(Op::infix(Rule::and, Left))
        .op(Op::infix(Rule::bit_or, Left))
        .op(Op::infix(Rule::bit_xor, Left))
        .op(Op::infix(Rule::bit_and, Left))
        .op(Op::infix(Rule::strict_eq, Left)
            | Op::infix(Rule::strict_ne, Left)
            | Op::infix(Rule::eq, Left)
            | Op::infix(Rule::ne, Left))
        .op(Op::infix(Rule::lt, Left)
            | Op::infix(Rule::gt, Left)
            | Op::infix(Rule::le, Left)
            | Op::infix(Rule::ge, Left)
            | Op::infix(Rule::instanceof, Left)
            | Op::infix(Rule::in_op, Left))
        .op(Op::infix(Rule::shl, Left) | Op::infix(Rule::shr, Left) | Op::infix(Rule::ushr, Left))
        .op(Op::infix(Rule::add, Left) | Op::infix(Rule::sub, Left))
        .op(Op::infix(Rule::mul, Left) | Op::infix(Rule::div, Left) | Op::infix(Rule::rem, Left))
        .op(Op::infix(Rule::pow, Right))
});

/// Parse a whole compilation unit.
pub fn parse_program(source: &str) -> Result<Program> {
    let mut pairs = HostParser::parse(Rule::program, source)?;
    let Some(program) = pairs.next() else {
        return Ok(Program::default());
    };

    let mut body = Vec::new();
    for pair in program.into_inner() {
        if pair.as_rule() == Rule::EOI {
            continue;
        }
        body.push(build_stmt(pair)?);
    }
    log::trace!("parsed {} top-level statements", body.len());
    Ok(Program { body })
}

/// Parse a single expression, e.g. `<p>{x}</p>`.
pub fn parse_expr(source: &str) -> Result<Expr> {
    let program = parse_program(source)?;
    match program.body.into_iter().next() {
        Some(Stmt::Expr(expr)) => Ok(expr),
        _ => Err(Error::Parse(Box::new(pest::error::Error::new_from_pos(
            pest::error::ErrorVariant::CustomError {
                message: "expected a single expression".to_string(),
            },
            pest::Position::from_start(source),
        )))),
    }
}

fn next<'i>(pairs: &mut Pairs<'i, Rule>) -> Pair<'i, Rule> {
    pairs
        .next()
        .unwrap_or_else(|| unreachable!("grammar guarantees another pair"))
}

fn line(pair: &Pair<Rule>) -> usize {
    pair.as_span().start_pos().line_col().0
}

fn type_text(pair: Pair<Rule>) -> String {
    pair.as_str().trim().to_string()
}

// ---------- statements ----------

fn build_stmt(pair: Pair<Rule>) -> Result<Stmt> {
    match pair.as_rule() {
        Rule::empty_stmt => Ok(Stmt::Empty),
        Rule::import_decl => build_import(pair).map(Stmt::Import),
        Rule::export_default => {
            let target = pair
                .into_inner()
                .find(|p| !matches!(p.as_rule(), Rule::kw_export | Rule::kw_default))
                .unwrap_or_else(|| unreachable!("export default has a target"));
            let expr = match target.as_rule() {
                Rule::function => Expr::Function(Box::new(build_function(target)?)),
                _ => build_expr(target)?,
            };
            Ok(Stmt::ExportDefault(expr))
        }
        Rule::export_decl => {
            let mut inner = pair.into_inner();
            let _export = next(&mut inner);
            Ok(Stmt::Export(Box::new(build_stmt(next(&mut inner))?)))
        }
        Rule::function_decl => build_function(next(&mut pair.into_inner())).map(Stmt::Function),
        Rule::var_decl => build_var(pair).map(Stmt::Var),
        Rule::return_stmt => {
            let value = pair
                .into_inner()
                .find(|p| p.as_rule() == Rule::expr)
                .map(build_expr)
                .transpose()?;
            Ok(Stmt::Return(value))
        }
        Rule::if_stmt => {
            let mut inner = pair.into_inner().filter(|p| {
                !matches!(p.as_rule(), Rule::kw_if | Rule::kw_else)
            });
            let test = build_expr(
                inner
                    .next()
                    .unwrap_or_else(|| unreachable!("if has a condition")),
            )?;
            let cons = build_stmt(
                inner
                    .next()
                    .unwrap_or_else(|| unreachable!("if has a body")),
            )?;
            let alt = inner.next().map(build_stmt).transpose()?;
            Ok(Stmt::If {
                test,
                cons: Box::new(cons),
                alt: alt.map(Box::new),
            })
        }
        Rule::block => build_block(pair).map(Stmt::Block),
        Rule::expr_stmt => build_expr(next(&mut pair.into_inner())).map(Stmt::Expr),
        rule => unreachable!("unexpected statement rule {rule:?}"),
    }
}

fn build_block(pair: Pair<Rule>) -> Result<Vec<Stmt>> {
    pair.into_inner().map(build_stmt).collect()
}

fn build_import(pair: Pair<Rule>) -> Result<Import> {
    let mut import = Import {
        default: None,
        namespace: None,
        named: Vec::new(),
        source: StrLit::double(""),
    };
    for p in pair.into_inner() {
        match p.as_rule() {
            Rule::import_default => import.default = Some(p.as_str().to_string()),
            Rule::import_namespace => {
                let ident = p
                    .into_inner()
                    .find(|p| p.as_rule() == Rule::ident)
                    .unwrap_or_else(|| unreachable!("namespace import binds a name"));
                import.namespace = Some(ident.as_str().to_string());
            }
            Rule::import_named => {
                for spec in p.into_inner() {
                    let mut inner = spec.into_inner();
                    let imported = next(&mut inner).as_str().to_string();
                    let local = inner
                        .find(|p| p.as_rule() == Rule::ident)
                        .map(|p| p.as_str().to_string())
                        .unwrap_or_else(|| imported.clone());
                    import.named.push(ImportName { imported, local });
                }
            }
            Rule::string => import.source = build_string(p),
            _ => {}
        }
    }
    Ok(import)
}

fn build_function(pair: Pair<Rule>) -> Result<Function> {
    let mut function = Function {
        name: None,
        is_async: false,
        params: Vec::new(),
        ret: None,
        body: Vec::new(),
    };
    for p in pair.into_inner() {
        match p.as_rule() {
            Rule::kw_async => function.is_async = true,
            Rule::ident => function.name = Some(p.as_str().to_string()),
            Rule::params => function.params = build_params(p),
            Rule::ret_type => function.ret = Some(type_text(next(&mut p.into_inner()))),
            Rule::block => function.body = build_block(p)?,
            _ => {}
        }
    }
    Ok(function)
}

fn build_params(pair: Pair<Rule>) -> Vec<Param> {
    pair.into_inner()
        .map(|param| {
            let mut out = Param {
                name: String::new(),
                rest: false,
                optional: false,
                ty: None,
            };
            for p in param.into_inner() {
                match p.as_rule() {
                    Rule::rest_marker => out.rest = true,
                    Rule::ident => out.name = p.as_str().to_string(),
                    Rule::optional_marker => out.optional = true,
                    Rule::ts_type => out.ty = Some(type_text(p)),
                    _ => {}
                }
            }
            out
        })
        .collect()
}

fn build_var(pair: Pair<Rule>) -> Result<VarDecl> {
    let mut inner = pair.into_inner();
    let kind = match next(&mut inner).as_str() {
        "const" => VarKind::Const,
        "let" => VarKind::Let,
        _ => VarKind::Var,
    };
    let mut declarators = Vec::new();
    for decl in inner {
        let mut d = Declarator {
            name: String::new(),
            ty: None,
            init: None,
        };
        for p in decl.into_inner() {
            match p.as_rule() {
                Rule::ident => d.name = p.as_str().to_string(),
                Rule::ts_type => d.ty = Some(type_text(p)),
                Rule::expr => d.init = Some(build_expr(p)?),
                _ => {}
            }
        }
        declarators.push(d);
    }
    Ok(VarDecl { kind, declarators })
}

// ---------- expressions ----------

fn build_expr(pair: Pair<Rule>) -> Result<Expr> {
    let mut inner = pair.into_inner();
    let first = next(&mut inner);
    let lhs = match first.as_rule() {
        Rule::arrow_fn => return build_arrow(first),
        _ => build_conditional(first)?,
    };
    let Some(op) = inner.next() else {
        return Ok(lhs);
    };
    let value = build_expr(next(&mut inner))?;
    Ok(Expr::Assign {
        op: assign_op(op.as_str()),
        target: Box::new(lhs),
        value: Box::new(value),
    })
}

fn assign_op(text: &str) -> AssignOp {
    match text {
        "+=" => AssignOp::Add,
        "-=" => AssignOp::Sub,
        "*=" => AssignOp::Mul,
        "/=" => AssignOp::Div,
        "%=" => AssignOp::Rem,
        "||=" => AssignOp::Or,
        "&&=" => AssignOp::And,
        "??=" => AssignOp::Nullish,
        _ => AssignOp::Assign,
    }
}

fn build_arrow(pair: Pair<Rule>) -> Result<Expr> {
    let mut is_async = false;
    let mut params = Vec::new();
    let mut body = ArrowBody::Block(Vec::new());
    for p in pair.into_inner() {
        match p.as_rule() {
            Rule::kw_async => is_async = true,
            Rule::arrow_params => params = build_params(next(&mut p.into_inner())),
            Rule::arrow_single => params.push(Param {
                name: p.as_str().trim().to_string(),
                rest: false,
                optional: false,
                ty: None,
            }),
            Rule::block => body = ArrowBody::Block(build_block(p)?),
            Rule::expr => body = ArrowBody::Expr(Box::new(build_expr(p)?)),
            _ => {}
        }
    }
    Ok(Expr::Arrow {
        is_async,
        params,
        body,
    })
}

fn build_conditional(pair: Pair<Rule>) -> Result<Expr> {
    let mut inner = pair.into_inner();
    let test = build_binary(next(&mut inner))?;
    match (inner.next(), inner.next()) {
        (Some(cons), Some(alt)) => Ok(Expr::Cond {
            test: Box::new(test),
            cons: Box::new(build_expr(cons)?),
            alt: Box::new(build_expr(alt)?),
        }),
        _ => Ok(test),
    }
}

fn build_binary(pair: Pair<Rule>) -> Result<Expr> {
    PRATT
        .map_primary(build_unary)
        .map_infix(|lhs, op, rhs| {
            Ok(Expr::Binary {
                op: binary_op(op.as_rule()),
                left: Box::new(lhs?),
                right: Box::new(rhs?),
            })
        })
        .parse(pair.into_inner())
}

fn binary_op(rule: Rule) -> BinaryOp {
    match rule {
        Rule::nullish => BinaryOp::Nullish,
        Rule::or => BinaryOp::Or,
        Rule::and => BinaryOp::And,
        Rule::bit_or => BinaryOp::BitOr,
        Rule::bit_xor => BinaryOp::BitXor,
        Rule::bit_and => BinaryOp::BitAnd,
        Rule::strict_eq => BinaryOp::StrictEq,
        Rule::strict_ne => BinaryOp::StrictNe,
        Rule::eq => BinaryOp::Eq,
        Rule::ne => BinaryOp::Ne,
        Rule::le => BinaryOp::Le,
        Rule::ge => BinaryOp::Ge,
        Rule::lt => BinaryOp::Lt,
        Rule::gt => BinaryOp::Gt,
        Rule::instanceof => BinaryOp::Instanceof,
        Rule::in_op => BinaryOp::In,
        Rule::shl => BinaryOp::Shl,
        Rule::shr => BinaryOp::Shr,
        Rule::ushr => BinaryOp::UShr,
        Rule::add => BinaryOp::Add,
        Rule::sub => BinaryOp::Sub,
        Rule::mul => BinaryOp::Mul,
        Rule::div => BinaryOp::Div,
        Rule::rem => BinaryOp::Rem,
        Rule::pow => BinaryOp::Pow,
        rule => unreachable!("not a binary operator: {rule:?}"),
    }
}

fn build_unary(pair: Pair<Rule>) -> Result<Expr> {
    let mut ops = Vec::new();
    let mut operand = None;
    for p in pair.into_inner() {
        match p.as_rule() {
            Rule::not => ops.push(UnaryOp::Not),
            Rule::neg => ops.push(UnaryOp::Neg),
            Rule::plus => ops.push(UnaryOp::Plus),
            Rule::bit_not => ops.push(UnaryOp::BitNot),
            Rule::typeof_op => ops.push(UnaryOp::Typeof),
            Rule::void_op => ops.push(UnaryOp::Void),
            Rule::await_op => ops.push(UnaryOp::Await),
            _ => operand = Some(build_postfix(p)?),
        }
    }
    let operand = operand.unwrap_or_else(|| unreachable!("unary has an operand"));
    Ok(ops.into_iter().rev().fold(operand, |arg, op| Expr::Unary {
        op,
        arg: Box::new(arg),
    }))
}

fn build_postfix(pair: Pair<Rule>) -> Result<Expr> {
    let mut inner = pair.into_inner();
    let mut expr = build_primary(next(&mut inner))?;
    for p in inner {
        expr = apply_postfix(expr, p)?;
    }
    Ok(expr)
}

fn apply_postfix(expr: Expr, pair: Pair<Rule>) -> Result<Expr> {
    Ok(match pair.as_rule() {
        Rule::call_args => Expr::Call {
            callee: Box::new(expr),
            args: build_items(pair)?,
        },
        Rule::member | Rule::opt_member => {
            let optional = pair.as_rule() == Rule::opt_member;
            Expr::Member {
                obj: Box::new(expr),
                prop: next(&mut pair.into_inner()).as_str().to_string(),
                optional,
            }
        }
        Rule::index => Expr::Index {
            obj: Box::new(expr),
            index: Box::new(build_expr(next(&mut pair.into_inner()))?),
        },
        rule => unreachable!("not a postfix rule: {rule:?}"),
    })
}

/// Arguments and array elements share the `spread | expr` shape.
fn build_items(pair: Pair<Rule>) -> Result<Vec<ArrayItem>> {
    pair.into_inner()
        .map(|p| match p.as_rule() {
            Rule::spread => Ok(ArrayItem::Spread(build_expr(next(&mut p.into_inner()))?)),
            _ => Ok(ArrayItem::Expr(build_expr(p)?)),
        })
        .collect()
}

fn build_primary(pair: Pair<Rule>) -> Result<Expr> {
    Ok(match pair.as_rule() {
        Rule::jsx => Expr::Markup(build_markup(pair)?),
        Rule::template => Expr::Template(build_template(pair)?),
        Rule::string => Expr::Str(build_string(pair)),
        Rule::number => Expr::Num(pair.as_str().to_string()),
        Rule::boolean => Expr::Bool(pair.as_str() == "true"),
        Rule::null => Expr::Null,
        Rule::function => Expr::Function(Box::new(build_function(pair)?)),
        Rule::new_expr => {
            let mut callee = None;
            let mut args = Vec::new();
            for p in pair.into_inner() {
                match p.as_rule() {
                    Rule::new_target => {
                        let mut inner = p.into_inner();
                        let mut target = build_primary(next(&mut inner))?;
                        for post in inner {
                            target = apply_postfix(target, post)?;
                        }
                        callee = Some(target);
                    }
                    Rule::call_args => args = build_items(p)?,
                    _ => {}
                }
            }
            Expr::New {
                callee: Box::new(callee.unwrap_or_else(|| unreachable!("new has a target"))),
                args,
            }
        }
        Rule::array => Expr::Array(build_items(pair)?),
        Rule::object => Expr::Object(build_object(pair)?),
        Rule::paren => Expr::Paren(Box::new(build_expr(next(&mut pair.into_inner()))?)),
        Rule::ident => Expr::Ident(pair.as_str().to_string()),
        rule => unreachable!("not a primary rule: {rule:?}"),
    })
}

fn build_object(pair: Pair<Rule>) -> Result<Vec<Prop>> {
    let mut props = Vec::new();
    for p in pair.into_inner() {
        match p.as_rule() {
            Rule::spread => props.push(Prop::Spread(build_expr(next(&mut p.into_inner()))?)),
            Rule::shorthand => props.push(Prop::Shorthand(p.as_str().trim().to_string())),
            Rule::key_value => {
                let mut inner = p.into_inner();
                let key = next(&mut inner);
                let key = match key.as_rule() {
                    Rule::string => PropKey::Str(build_string(key)),
                    Rule::number => PropKey::Num(key.as_str().to_string()),
                    Rule::computed_key => {
                        PropKey::Computed(Box::new(build_expr(next(&mut key.into_inner()))?))
                    }
                    _ => PropKey::Ident(key.as_str().to_string()),
                };
                props.push(Prop::KeyValue(key, build_expr(next(&mut inner))?));
            }
            _ => {}
        }
    }
    Ok(props)
}

fn build_string(pair: Pair<Rule>) -> StrLit {
    let quote = pair.as_str().chars().next().unwrap_or('"');
    let raw = pair.into_inner().next().map(|p| p.as_str()).unwrap_or("");
    StrLit {
        value: unescape(raw),
        quote,
    }
}

fn build_template(pair: Pair<Rule>) -> Result<Template> {
    let mut quasis = vec![String::new()];
    let mut exprs = Vec::new();
    for p in pair.into_inner() {
        match p.as_rule() {
            Rule::template_chars => {
                if let Some(last) = quasis.last_mut() {
                    last.push_str(&unescape(p.as_str()));
                }
            }
            Rule::template_sub => {
                exprs.push(build_expr(next(&mut p.into_inner()))?);
                quasis.push(String::new());
            }
            _ => {}
        }
    }
    Ok(Template { quasis, exprs })
}

/// Cook the escapes of a string or template literal body.
fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('b') => out.push('\u{8}'),
            Some('f') => out.push('\u{c}'),
            Some('v') => out.push('\u{b}'),
            Some('0') => out.push('\0'),
            Some('x') => {
                let hex: String = chars.by_ref().take(2).collect();
                push_code_point(&mut out, &hex);
            }
            Some('u') => {
                let hex: String = if chars.peek() == Some(&'{') {
                    chars.next();
                    chars.by_ref().take_while(|c| *c != '}').collect()
                } else {
                    chars.by_ref().take(4).collect()
                };
                push_code_point(&mut out, &hex);
            }
            // line continuation
            Some('\n') => {}
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

fn push_code_point(out: &mut String, hex: &str) {
    match u32::from_str_radix(hex, 16).ok().and_then(char::from_u32) {
        Some(c) => out.push(c),
        None => out.push(char::REPLACEMENT_CHARACTER),
    }
}

// ---------- markup ----------

fn build_markup(pair: Pair<Rule>) -> Result<Markup> {
    let node = next(&mut pair.into_inner());
    match node.as_rule() {
        Rule::jsx_fragment => Ok(Markup::Fragment(build_children(node.into_inner())?)),
        Rule::jsx_self_closing => {
            let mut inner = node.into_inner();
            let tag = next(&mut inner).as_str().to_string();
            let attrs = inner.map(build_attr).collect::<Result<Vec<_>>>()?;
            Ok(Markup::Element(Element {
                tag,
                attrs,
                children: Vec::new(),
                self_closing: true,
            }))
        }
        Rule::jsx_element => {
            let mut inner = node.into_inner();
            let open = next(&mut inner);
            let mut open_inner = open.into_inner();
            let tag = next(&mut open_inner).as_str().to_string();
            let attrs = open_inner.map(build_attr).collect::<Result<Vec<_>>>()?;

            let mut child_pairs = Vec::new();
            let mut close = None;
            for p in inner {
                if p.as_rule() == Rule::jsx_close {
                    close = Some(p);
                } else {
                    child_pairs.push(p);
                }
            }
            // inner mismatches are reported first
            let children = child_pairs
                .into_iter()
                .map(build_child)
                .collect::<Result<Vec<_>>>()?;
            if let Some(close) = close {
                let close_line = line(&close);
                let close_tag = next(&mut close.into_inner()).as_str();
                if close_tag != tag {
                    return Err(Error::MismatchedTag {
                        open: tag,
                        close: close_tag.to_string(),
                        line: close_line,
                    });
                }
            }
            Ok(Markup::Element(Element {
                tag,
                attrs,
                children,
                self_closing: false,
            }))
        }
        rule => unreachable!("not a markup rule: {rule:?}"),
    }
}

fn build_attr(pair: Pair<Rule>) -> Result<Attr> {
    match pair.as_rule() {
        Rule::jsx_spread_attr => Ok(Attr::Spread(build_expr(next(&mut pair.into_inner()))?)),
        Rule::jsx_named_attr => {
            let attr_line = line(&pair);
            let mut inner = pair.into_inner();
            let name = next(&mut inner).as_str().to_string();
            let value = match inner.next() {
                None => None,
                Some(v) if v.as_rule() == Rule::jsx_string => {
                    let quote = v.as_str().chars().next().unwrap_or('"');
                    let text = v.into_inner().next().map(|p| p.as_str()).unwrap_or("");
                    Some(AttrValue::Str(StrLit {
                        value: text.to_string(),
                        quote,
                    }))
                }
                Some(v) => match v.into_inner().next() {
                    Some(expr) => Some(AttrValue::Expr(build_expr(expr)?)),
                    None => {
                        return Err(Error::EmptyAttributeExpression {
                            name,
                            line: attr_line,
                        });
                    }
                },
            };
            Ok(Attr::Named { name, value })
        }
        rule => unreachable!("not an attribute rule: {rule:?}"),
    }
}

fn build_children(pairs: Pairs<Rule>) -> Result<Vec<Child>> {
    pairs.map(build_child).collect()
}

fn build_child(pair: Pair<Rule>) -> Result<Child> {
    Ok(match pair.as_rule() {
        Rule::jsx_text => Child::Text(pair.as_str().to_string()),
        Rule::jsx_expr_child => {
            let mut spread = false;
            let mut expr = None;
            for p in pair.into_inner() {
                match p.as_rule() {
                    Rule::jsx_spread_marker => spread = true,
                    _ => expr = Some(build_expr(p)?),
                }
            }
            Child::Expr(ExprChild { expr, spread })
        }
        Rule::jsx => Child::Markup(build_markup(pair)?),
        rule => unreachable!("not a child rule: {rule:?}"),
    })
}
