use crate::ast::{Attr, AttrValue, Element, Expr};
use crate::factory::path_expr;

use super::Transformer;
use super::spread::merge_props;
use super::template::{self, Compiled};

impl Transformer<'_> {
    /// `tag(props, children?)` for an element whose tag is callable.
    pub(crate) fn compile_component_call(&self, element: &Element) -> Expr {
        let mut spreads = Vec::new();
        let mut named = Vec::new();
        for attr in &element.attrs {
            match attr {
                Attr::Spread(source) => spreads.push(self.visit_expr(source)),
                Attr::Named { name, value } => {
                    named.push((name.clone(), self.prop_value(value.as_ref())));
                }
            }
        }

        let mut args = vec![merge_props(self.factory, spreads, named)];
        match self.compile_children(&element.children) {
            Compiled::Literal(text) if text.is_empty() => {}
            children => args.push(template::build(self.factory, children)),
        }
        self.factory.call(path_expr(&element.tag), args)
    }

    fn prop_value(&self, value: Option<&AttrValue>) -> Expr {
        match value {
            None => self.factory.true_literal(),
            Some(AttrValue::Str(lit)) => Expr::Str(lit.clone()),
            Some(AttrValue::Expr(expr)) => self.visit_expr(expr),
        }
    }
}
