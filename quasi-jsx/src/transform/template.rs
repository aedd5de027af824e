use crate::ast::{Expr, StrLit, Template};
use crate::factory::NodeFactory;

/// One hole of a template: a dynamic value and the static text that follows
/// it up to the next hole or the end.
#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub expr: Expr,
    pub after: String,
}

impl Span {
    pub fn new(expr: Expr) -> Self {
        Self {
            expr,
            after: String::new(),
        }
    }
}

/// Result of compiling markup. `Template` always carries at least one span.
#[derive(Debug, Clone, PartialEq)]
pub enum Compiled {
    Literal(String),
    Template { head: String, spans: Vec<Span> },
}

impl Compiled {
    pub fn from_parts(head: String, spans: Vec<Span>) -> Self {
        if spans.is_empty() {
            Compiled::Literal(head)
        } else {
            Compiled::Template { head, spans }
        }
    }

    pub fn into_parts(self) -> (String, Vec<Span>) {
        match self {
            Compiled::Literal(text) => (text, Vec::new()),
            Compiled::Template { head, spans } => (head, spans),
        }
    }

    pub fn spans(&self) -> &[Span] {
        match self {
            Compiled::Literal(_) => &[],
            Compiled::Template { spans, .. } => spans,
        }
    }
}

/// Accumulates `(head, spans)`. Static text lands in the `after` of the
/// most recent span, or in the head while there is none.
#[derive(Debug, Default)]
pub struct TemplateAcc {
    head: String,
    spans: Vec<Span>,
}

impl TemplateAcc {
    pub fn new(head: impl Into<String>) -> Self {
        Self {
            head: head.into(),
            spans: Vec::new(),
        }
    }

    pub fn push_text(&mut self, text: &str) {
        match self.spans.last_mut() {
            Some(span) => span.after.push_str(text),
            None => self.head.push_str(text),
        }
    }

    pub fn push_span(&mut self, expr: Expr) {
        self.spans.push(Span::new(expr));
    }

    /// Append another compiled piece: its head joins the current text, its
    /// spans follow in order.
    pub fn splice(&mut self, compiled: Compiled) {
        let (head, spans) = compiled.into_parts();
        self.push_text(&head);
        self.spans.extend(spans);
    }

    pub fn finish(self) -> Compiled {
        Compiled::from_parts(self.head, self.spans)
    }
}

/// A visited attribute value, as the element compiler consumes it.
#[derive(Debug, Clone, PartialEq)]
pub enum Recompiled {
    /// A string literal; folded back into static text with its quotes.
    Literal(StrLit),
    /// A template; its pieces are spliced into the enclosing one.
    Template(Compiled),
    Dynamic(Expr),
}

impl From<Expr> for Recompiled {
    fn from(expr: Expr) -> Self {
        match expr {
            Expr::Str(lit) => Recompiled::Literal(lit),
            Expr::Template(Template { quasis, exprs }) => {
                let mut quasis = quasis.into_iter();
                let head = quasis.next().unwrap_or_default();
                let spans = exprs
                    .into_iter()
                    .zip(quasis)
                    .map(|(expr, after)| Span { expr, after })
                    .collect();
                Recompiled::Template(Compiled::from_parts(head, spans))
            }
            other => Recompiled::Dynamic(other),
        }
    }
}

/// Template Builder: a string literal when there are no spans, otherwise a
/// template expression.
pub fn build(factory: &dyn NodeFactory, compiled: Compiled) -> Expr {
    match compiled {
        Compiled::Literal(text) => factory.string_literal(&text),
        Compiled::Template { head, spans } => factory.template(head, spans),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::EcmaFactory;

    #[test]
    fn text_goes_to_head_until_first_span() {
        let mut acc = TemplateAcc::new("<p");
        acc.push_text(">");
        acc.push_span(Expr::ident("x"));
        acc.push_text("</p>");
        assert_eq!(
            acc.finish(),
            Compiled::Template {
                head: "<p>".into(),
                spans: vec![Span {
                    expr: Expr::ident("x"),
                    after: "</p>".into()
                }],
            }
        );
    }

    #[test]
    fn splice_joins_head_into_last_after() {
        let mut acc = TemplateAcc::default();
        acc.push_span(Expr::ident("a"));
        acc.splice(Compiled::Template {
            head: "<b>".into(),
            spans: vec![Span {
                expr: Expr::ident("b"),
                after: "</b>".into(),
            }],
        });
        let (head, spans) = acc.finish().into_parts();
        assert_eq!(head, "");
        assert_eq!(spans[0].after, "<b>");
        assert_eq!(spans[1].after, "</b>");
    }

    #[test]
    fn all_static_reduces_to_literal() {
        let mut acc = TemplateAcc::new("<br");
        acc.splice(Compiled::Literal(">".into()));
        assert_eq!(acc.finish(), Compiled::Literal("<br>".into()));
    }

    #[test]
    fn build_without_spans_is_a_string() {
        let factory = EcmaFactory::default();
        assert_eq!(
            build(&factory, Compiled::Literal("hi".into())),
            Expr::str("hi")
        );
    }

    #[test]
    fn empty_template_recompiles_to_static() {
        let expr = Expr::Template(Template {
            quasis: vec!["x".into()],
            exprs: vec![],
        });
        assert_eq!(
            Recompiled::from(expr),
            Recompiled::Template(Compiled::Literal("x".into()))
        );
    }
}
