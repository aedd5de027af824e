use pretty_assertions::assert_eq;
use quasi_jsx::ast::Expr;
use quasi_jsx::transform::TemplateAcc;
use quasi_jsx::{
    Compiled, EcmaFactory, NoSymbols, Span, SymbolResolver, SymbolTable, TransformOptions,
    Transformer, WhitespacePolicy, parse_expr, print_expr,
};

fn markup_of(src: &str) -> quasi_jsx::Markup {
    match parse_expr(src).expect("parse") {
        Expr::Markup(markup) => markup,
        other => panic!("not markup: {other:?}"),
    }
}

fn compile_with(src: &str, resolver: &dyn SymbolResolver, options: &TransformOptions) -> Compiled {
    let factory = EcmaFactory::default();
    Transformer::new(resolver, &factory, options).compile_markup(&markup_of(src))
}

fn compile(src: &str) -> Compiled {
    compile_with(src, &NoSymbols, &TransformOptions::default())
}

/// Compile and print through the template builder.
fn render(src: &str) -> String {
    let options = TransformOptions::default();
    let factory = EcmaFactory::default();
    let expr = parse_expr(src).expect("parse");
    let expr = Transformer::new(&NoSymbols, &factory, &options).visit_expr(&expr);
    print_expr(&expr)
}

fn span_exprs(compiled: &Compiled) -> Vec<String> {
    compiled.spans().iter().map(|s| print_expr(&s.expr)).collect()
}

#[test_log::test]
fn single_child_expression() {
    assert_eq!(
        compile("<p>{x}</p>"),
        Compiled::Template {
            head: "<p>".into(),
            spans: vec![Span {
                expr: Expr::ident("x"),
                after: "</p>".into()
            }],
        }
    );
}

#[test_log::test]
fn dynamic_attribute_opens_and_closes_quote() {
    assert_eq!(
        compile(r#"<div a="1" b={y}>txt</div>"#),
        Compiled::Template {
            head: r#"<div a="1" b=""#.into(),
            spans: vec![Span {
                expr: Expr::ident("y"),
                after: r#"">txt</div>"#.into()
            }],
        }
    );
}

#[test_log::test]
fn static_markup_round_trips() {
    assert_eq!(
        compile(r#"<a href="/x" Title='t' hidden>hi <b>there</b></a>"#),
        Compiled::Literal(r#"<a href="/x" title='t' hidden>hi <b>there</b></a>"#.into())
    );
    assert_eq!(render(r#"<a href="/x">hi</a>"#), r#""<a href=\"/x\">hi</a>""#);
}

#[test_log::test]
fn void_tags_never_close() {
    let compiled = compile("<div><br/><img src={u}/><hr></hr></div>");
    let (head, spans) = compiled.into_parts();
    assert_eq!(head, "<div><br><img src=\"");
    assert_eq!(spans.len(), 1);
    assert_eq!(spans[0].after, "\"><hr></div>");
    for text in std::iter::once(&head).chain(spans.iter().map(|s| &s.after)) {
        for tag in ["br", "img", "hr"] {
            assert!(!text.contains(&format!("</{tag}>")), "{text}");
        }
    }
}

#[test_log::test]
fn extra_void_tags_from_options() {
    let options = TransformOptions {
        void_tags: quasi_jsx::VoidTags::default().with_extra(["spacer"]),
        ..TransformOptions::default()
    };
    assert_eq!(
        compile_with("<p><spacer/></p>", &NoSymbols, &options),
        Compiled::Literal("<p><spacer></p>".into())
    );
}

#[test_log::test]
fn fragment_is_transparent() {
    let fragment = compile("<><b>{x}</b><i>y</i></>");

    let mut acc = TemplateAcc::default();
    acc.splice(compile("<b>{x}</b>"));
    acc.splice(compile("<i>y</i>"));
    assert_eq!(fragment, acc.finish());
    assert_eq!(compile("<>plain</>"), Compiled::Literal("plain".into()));
}

#[test_log::test]
fn spans_follow_source_order() {
    let compiled = compile(r#"<ul class={a}>{b}<li id={c}>{d}</li>{e}</ul>"#);
    assert_eq!(span_exprs(&compiled), vec!["a", "b", "c", "d", "e"]);
    let (head, spans) = compiled.into_parts();
    assert_eq!(head, "<ul class=\"");
    let afters: Vec<&str> = spans.iter().map(|s| s.after.as_str()).collect();
    assert_eq!(afters, vec!["\">", "<li id=\"", "\">", "</li>", "</ul>"]);
}

#[test_log::test]
fn component_counts_as_one_hole() {
    let symbols = SymbolTable::new().with_components(["Card"]);
    let compiled = compile_with(
        "<div>{a}<Card x={b}>{c}<i>{d}</i></Card>{e}</div>",
        &symbols,
        &TransformOptions::default(),
    );
    assert_eq!(compiled.spans().len(), 3);
    assert_eq!(
        span_exprs(&compiled),
        vec!["a", "Card({ x: b }, `${c}<i>${d}</i>`)", "e"]
    );
}

#[test_log::test]
fn attribute_template_is_spliced() {
    let compiled = compile("<a href={`/u/${id}/edit`}>x</a>");
    assert_eq!(
        compiled,
        Compiled::Template {
            head: "<a href=\"/u/".into(),
            spans: vec![Span {
                expr: Expr::ident("id"),
                after: "/edit\">x</a>".into()
            }],
        }
    );
}

#[test_log::test]
fn attribute_literals_fold_to_static() {
    assert_eq!(
        compile(r#"<td colspan={2} title={"t"} hidden={true}></td>"#),
        Compiled::Literal(r#"<td colspan="2" title="t" hidden></td>"#.into())
    );
    assert_eq!(
        compile("<div title={<b>x</b>}></div>"),
        Compiled::Literal(r#"<div title="<b>x</b>"></div>"#.into())
    );
}

#[test_log::test]
fn false_attribute_stays_dynamic() {
    assert_eq!(
        compile("<input checked={false}/>"),
        Compiled::Template {
            head: "<input checked=\"".into(),
            spans: vec![Span {
                expr: Expr::Bool(false),
                after: "\">".into()
            }],
        }
    );
}

#[test_log::test]
fn attribute_names_are_lowercased() {
    assert_eq!(
        compile(r#"<div onClick={f} DataX="1" Hidden></div>"#).into_parts().0,
        r#"<div onclick=""#
    );
    assert_eq!(
        compile(r#"<div DataX="1" Hidden></div>"#),
        Compiled::Literal(r#"<div datax="1" hidden></div>"#.into())
    );
}

const SERIALIZE_TAIL: &str = r#".map((e) => e[1] === true ? e[0] : `${e[0]}="${e[1]}"`).join(" ")"#;

#[test_log::test]
fn intrinsic_spreads_merge_before_named_attributes() {
    let compiled = compile(r#"<div {...s} {...t} id="2"></div>"#);
    assert_eq!(
        span_exprs(&compiled),
        vec![format!(
            r#"Object.entries(Object.assign({{}}, s, t, {{ id: "2" }})){SERIALIZE_TAIL}"#
        )]
    );
    let (head, spans) = compiled.into_parts();
    assert_eq!(head, "<div ");
    assert_eq!(spans[0].after, "></div>");
}

#[test_log::test]
fn named_attributes_join_the_spread_bag() {
    assert_eq!(
        render(r#"<input Disabled {...p} n={x} />"#),
        format!(
            r#"`<input ${{Object.entries(Object.assign({{}}, p, {{ disabled: true, n: x }})){SERIALIZE_TAIL}}}>`"#
        )
    );
}

#[test_log::test]
fn folded_literals_keep_their_escapes() {
    assert_eq!(
        compile(r#"<p title={"a\"b"} alt={'it\'s'}></p>"#),
        Compiled::Literal(r#"<p title="a\"b" alt='it\'s'></p>"#.into())
    );
}

#[test_log::test]
fn spread_child_is_joined() {
    assert_eq!(
        render("<ul>{...items}</ul>"),
        r#"`<ul>${Array.from(items).join("")}</ul>`"#
    );
}

#[test_log::test]
fn empty_expression_children_vanish() {
    assert_eq!(
        compile("<p>{}a{/* note */}</p>"),
        Compiled::Literal("<p>a</p>".into())
    );
}

#[test_log::test]
fn nested_markup_in_child_expressions() {
    assert_eq!(
        render("<ul>{items.map((i) => <li>{i}</li>)}</ul>"),
        "`<ul>${items.map((i) => `<li>${i}</li>`)}</ul>`"
    );
}

#[test_log::test]
fn template_text_is_escaped_on_print() {
    assert_eq!(render("<p>$5 `q`</p>"), "\"<p>$5 `q`</p>\"");
    assert_eq!(render("<p>`q` c:\\d {x}</p>"), "`<p>\\`q\\` c:\\\\d ${x}</p>`");
    assert_eq!(render("<p>${x}</p>"), "`<p>$${x}</p>`");
}

#[test_log::test]
fn trim_policy_strips_text_runs() {
    let options = TransformOptions {
        whitespace: WhitespacePolicy::Trim,
        ..TransformOptions::default()
    };
    assert_eq!(
        compile_with("<ul>\n    <li> a </li>\n</ul>", &NoSymbols, &options),
        Compiled::Literal("<ul><li>a</li></ul>".into())
    );
}

#[test_log::test]
fn collapse_policy_joins_lines() {
    let options = TransformOptions {
        whitespace: WhitespacePolicy::Collapse,
        ..TransformOptions::default()
    };
    assert_eq!(
        compile_with("<p>\n    Hello\n    {name}!\n</p>", &NoSymbols, &options),
        Compiled::Template {
            head: "<p>Hello".into(),
            spans: vec![Span {
                expr: Expr::ident("name"),
                after: "!</p>".into()
            }],
        }
    );
}
