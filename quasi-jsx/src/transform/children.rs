use crate::ast::{Child, ExprChild};

use super::Transformer;
use super::template::{Compiled, TemplateAcc};

impl Transformer<'_> {
    /// Compile a child list to `(head, spans)`, in source order.
    pub fn compile_children(&self, children: &[Child]) -> Compiled {
        let mut acc = TemplateAcc::default();
        for child in children {
            match child {
                Child::Text(text) => {
                    if let Some(text) = self.options.whitespace.apply(text) {
                        acc.push_text(&text);
                    }
                }
                Child::Expr(ExprChild { expr: None, .. }) => {}
                Child::Expr(ExprChild {
                    expr: Some(expr),
                    spread,
                }) => {
                    let mut value = self.visit_expr(expr);
                    if *spread {
                        value = self.factory.join_iterable(value);
                    }
                    acc.push_span(value);
                }
                Child::Markup(markup) => acc.splice(self.compile_markup(markup)),
            }
        }
        acc.finish()
    }
}
