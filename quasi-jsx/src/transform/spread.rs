use crate::ast::{Attr, AttrValue, Expr};
use crate::factory::NodeFactory;

use super::Transformer;

impl Transformer<'_> {
    /// Single span for the attributes of an intrinsic element that carries
    /// spreads: every spread merged left to right, then the named attributes
    /// (lowercased), rendered as `key="value"` pairs.
    pub(crate) fn compile_spread_attrs(&self, attrs: &[Attr]) -> Expr {
        let mut sources = Vec::new();
        let mut named = Vec::new();
        for attr in attrs {
            match attr {
                Attr::Spread(source) => sources.push(self.visit_expr(source)),
                Attr::Named { name, value } => {
                    let value = match value {
                        None => self.factory.true_literal(),
                        Some(AttrValue::Str(lit)) => Expr::Str(lit.clone()),
                        Some(AttrValue::Expr(expr)) => self.visit_expr(expr),
                    };
                    named.push((name.to_lowercase(), value));
                }
            }
        }
        if !named.is_empty() {
            sources.push(self.factory.object(named));
        }
        let bag = self.factory.merge(sources);
        self.factory.serialize_attributes(bag)
    }
}

/// Props argument of a component call. Named attributes win over spreads,
/// later spreads over earlier ones.
pub fn merge_props(
    factory: &dyn NodeFactory,
    spreads: Vec<Expr>,
    named: Vec<(String, Expr)>,
) -> Expr {
    if spreads.is_empty() {
        return factory.object(named);
    }
    if spreads.len() == 1 && named.is_empty() {
        return spreads.into_iter().next().unwrap_or(Expr::Object(Vec::new()));
    }
    let mut sources = spreads;
    if !named.is_empty() {
        sources.push(factory.object(named));
    }
    factory.merge(sources)
}
