use crate::ast::{Attr, AttrValue, Element, Markup};
use crate::print::string_lit;

use super::Transformer;
use super::attribute::{AttrClass, compile_attribute};
use super::template::{Compiled, Recompiled, TemplateAcc};

impl Transformer<'_> {
    /// Compile an element or fragment to `(head, spans)`.
    pub fn compile_markup(&self, markup: &Markup) -> Compiled {
        match markup {
            Markup::Fragment(children) => self.compile_children(children),
            Markup::Element(element) => self.compile_element(element),
        }
    }

    fn compile_element(&self, element: &Element) -> Compiled {
        if let Some(binding) = self.resolve_tag(&element.tag) {
            if binding.kind.is_callable() {
                log::debug!(
                    "<{}> is a component ({:?} binding)",
                    element.tag,
                    binding.kind
                );
                let mut acc = TemplateAcc::default();
                acc.push_span(self.compile_component_call(element));
                return acc.finish();
            }
        }

        let mut acc = TemplateAcc::new(format!("<{}", element.tag));
        if element.attrs.iter().any(|attr| matches!(attr, Attr::Spread(_))) {
            acc.push_text(" ");
            acc.push_span(self.compile_spread_attrs(&element.attrs));
        } else {
            for attr in &element.attrs {
                if let Attr::Named { name, value } = attr {
                    self.compile_intrinsic_attr(&mut acc, name, value.as_ref());
                }
            }
        }
        acc.push_text(">");

        acc.splice(self.compile_children(&element.children));

        if !self.options.void_tags.contains(&element.tag) {
            acc.push_text(&format!("</{}>", element.tag));
        }
        acc.finish()
    }

    fn compile_intrinsic_attr(
        &self,
        acc: &mut TemplateAcc,
        name: &str,
        value: Option<&AttrValue>,
    ) {
        let name = name.to_lowercase();
        match compile_attribute(value) {
            AttrClass::True => acc.push_text(&format!(" {name}")),
            AttrClass::StringLiteral(text) => acc.push_text(&format!(" {name}={text}")),
            AttrClass::Expression(expr) => match Recompiled::from(self.visit_expr(expr)) {
                Recompiled::Literal(lit) => {
                    acc.push_text(&format!(" {name}={}", string_lit(&lit.value, lit.quote)));
                }
                Recompiled::Template(compiled) => {
                    acc.push_text(&format!(" {name}=\""));
                    acc.splice(compiled);
                    acc.push_text("\"");
                }
                Recompiled::Dynamic(expr) => {
                    acc.push_text(&format!(" {name}=\""));
                    acc.push_span(expr);
                    acc.push_text("\"");
                }
            },
        }
    }
}
