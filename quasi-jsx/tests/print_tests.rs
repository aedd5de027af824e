use pretty_assertions::assert_eq;
use quasi_jsx::{TransformOptions, compile_source, parse_program, print_program};

fn reprint(src: &str) -> String {
    print_program(&parse_program(src).expect("parse"))
}

#[test]
fn statements_reprint_with_four_space_indent() {
    let src = r#"import { h as hh, Other } from './x';
const a = 1 + 2 * 3;
let b = (1 + 2) * 3;
if (a > b) {
    b = a;
} else b += 1;
export function f(x?: number, ...rest: string[]): void {
    return;
}
"#;
    assert_eq!(reprint(src), src);
}

#[test]
fn expressions_reprint() {
    let src = r#"const o = { a: 1, "b-c": [x, ...y], [k]: v, s, ...rest };
const g = async (p) => {
    await p;
};
const t = `a${x}b\`c`;
const m = obj?.prop[0](new Date(), typeof z);
const c = ok ? "y" : 'n';
const f = () => ({});
"#;
    assert_eq!(reprint(src), src);
}

#[test]
fn untransformed_markup_prints_back() {
    let src = "const v = <a href=\"x\" {...p} b={1}>t{y}<br /></a>;\n";
    assert_eq!(reprint(src), src);
}

#[test]
fn compile_rewrites_only_markup() {
    let src = r#"import { format } from "./fmt";
export function Row(props) {
    const label = format(props.label);
    return <tr class={props.kind}><td>{label}</td></tr>;
}
export default function Table(rows) {
    return <table>{rows.map((r) => <Row kind="odd" label={r} />)}</table>;
}
"#;
    let out = compile_source(src, &TransformOptions::default()).expect("compile");
    assert_eq!(
        out,
        r#"import { format } from "./fmt";
export function Row(props) {
    const label = format(props.label);
    return `<tr class="${props.kind}"><td>${label}</td></tr>`;
}
export default function Table(rows) {
    return `<table>${rows.map((r) => `${Row({ kind: "odd", label: r })}`)}</table>`;
}
"#
    );
}
