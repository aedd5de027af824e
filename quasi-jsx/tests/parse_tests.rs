use pretty_assertions::assert_eq;
use quasi_jsx::ast::{
    Attr, AttrValue, BinaryOp, Child, Element, Expr, ExprChild, Markup, Stmt, StrLit, VarKind,
};
use quasi_jsx::{Error, parse_expr, parse_program};

fn element(src: &str) -> Element {
    match parse_expr(src).expect("parse") {
        Expr::Markup(Markup::Element(element)) => element,
        other => panic!("not an element: {other:?}"),
    }
}

#[test]
fn element_with_attributes_and_children() {
    let el = element(r#"<a href="x" {...p} disabled n={1}>t{y}<b/></a>"#);
    assert_eq!(el.tag, "a");
    assert!(!el.self_closing);
    assert_eq!(
        el.attrs,
        vec![
            Attr::Named {
                name: "href".into(),
                value: Some(AttrValue::Str(StrLit::double("x"))),
            },
            Attr::Spread(Expr::ident("p")),
            Attr::Named {
                name: "disabled".into(),
                value: None,
            },
            Attr::Named {
                name: "n".into(),
                value: Some(AttrValue::Expr(Expr::Num("1".into()))),
            },
        ]
    );
    assert_eq!(
        el.children,
        vec![
            Child::Text("t".into()),
            Child::Expr(ExprChild {
                expr: Some(Expr::ident("y")),
                spread: false,
            }),
            Child::Markup(Markup::Element(Element {
                tag: "b".into(),
                attrs: vec![],
                children: vec![],
                self_closing: true,
            })),
        ]
    );
}

#[test]
fn markup_strings_are_raw() {
    let el = element(r#"<p title='a\nb'/>"#);
    assert_eq!(
        el.attrs,
        vec![Attr::Named {
            name: "title".into(),
            value: Some(AttrValue::Str(StrLit {
                value: "a\\nb".into(),
                quote: '\'',
            })),
        }]
    );
}

#[test]
fn text_keeps_whitespace() {
    let el = element("<p>\n  hi there\n</p>");
    assert_eq!(el.children, vec![Child::Text("\n  hi there\n".into())]);
}

#[test]
fn spread_and_empty_children() {
    let el = element("<ul>{...xs}{}{/* c */}</ul>");
    assert_eq!(
        el.children,
        vec![
            Child::Expr(ExprChild {
                expr: Some(Expr::ident("xs")),
                spread: true,
            }),
            Child::Expr(ExprChild {
                expr: None,
                spread: false,
            }),
            Child::Expr(ExprChild {
                expr: None,
                spread: false,
            }),
        ]
    );
}

#[test]
fn fragments_and_member_tags() {
    match parse_expr("<><ui.Button/>x</>").expect("parse") {
        Expr::Markup(Markup::Fragment(children)) => {
            assert_eq!(children.len(), 2);
            assert!(matches!(
                &children[0],
                Child::Markup(Markup::Element(el)) if el.tag == "ui.Button"
            ));
        }
        other => panic!("not a fragment: {other:?}"),
    }
}

#[test]
fn mismatched_closing_tag() {
    let err = parse_program("const a = <div>\n  <span>x</div>\n</span>;").unwrap_err();
    match err {
        Error::MismatchedTag { open, close, line } => {
            assert_eq!(open, "span");
            assert_eq!(close, "div");
            assert_eq!(line, 2);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn empty_attribute_expression() {
    let err = parse_expr("<p\n  title={} />").unwrap_err();
    assert!(matches!(
        err,
        Error::EmptyAttributeExpression { ref name, line: 2 } if name == "title"
    ));
}

#[test]
fn syntax_errors_come_from_the_grammar() {
    let err = parse_program("const = 1;").unwrap_err();
    assert!(matches!(err, Error::Parse(_)), "{err}");
}

#[test]
fn less_than_is_still_an_operator() {
    assert_eq!(
        parse_expr("a < b").expect("parse"),
        Expr::Binary {
            op: BinaryOp::Lt,
            left: Box::new(Expr::ident("a")),
            right: Box::new(Expr::ident("b")),
        }
    );
}

#[test]
fn precedence_and_associativity() {
    let expr = parse_expr("a + b * c - d").expect("parse");
    let Expr::Binary { op, left, right } = expr else {
        panic!("not binary");
    };
    assert_eq!(op, BinaryOp::Sub);
    assert_eq!(*right, Expr::ident("d"));
    assert!(matches!(*left, Expr::Binary { op: BinaryOp::Add, .. }));
}

#[test]
fn statements_and_types() {
    let program = parse_program(
        r#"
import { h } from "./h";
export function View(props: { name: string }, ...rest: any[]): string {
    if (props.name) {
        return <b>{props.name}</b>;
    } else return "";
}
let count: number = 0, other;
"#,
    )
    .expect("parse");
    assert_eq!(program.body.len(), 3);

    let Stmt::Export(inner) = &program.body[1] else {
        panic!("expected export");
    };
    let Stmt::Function(function) = &**inner else {
        panic!("expected function");
    };
    assert_eq!(function.name.as_deref(), Some("View"));
    assert_eq!(function.params.len(), 2);
    assert_eq!(function.params[0].ty.as_deref(), Some("{ name: string }"));
    assert!(function.params[1].rest);
    assert_eq!(function.ret.as_deref(), Some("string"));

    let Stmt::Var(var) = &program.body[2] else {
        panic!("expected var");
    };
    assert_eq!(var.kind, VarKind::Let);
    assert_eq!(var.declarators.len(), 2);
    assert_eq!(var.declarators[0].ty.as_deref(), Some("number"));
    assert_eq!(var.declarators[1].init, None);
}

#[test]
fn string_escapes_are_cooked() {
    assert_eq!(
        parse_expr(r#"'it\'s\nA\x42'"#).expect("parse"),
        Expr::Str(StrLit {
            value: "it's\nAB".into(),
            quote: '\'',
        })
    );
}
