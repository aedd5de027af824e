//! Markup compiler. Every markup node is lowered to a `(head, spans)` pair
//! and materialized through a [`NodeFactory`] as a string literal, a
//! template literal or a component call.

mod attribute;
mod children;
mod component;
mod element;
mod spread;
mod template;
mod visitor;

pub use attribute::{AttrClass, compile_attribute};
pub use spread::merge_props;
pub use template::{Compiled, Recompiled, Span, TemplateAcc, build};

use std::cell::RefCell;

use crate::config::TransformOptions;
use crate::factory::NodeFactory;
use crate::resolve::{Binding, SymbolResolver, SymbolTable};

/// One transform run over one compilation unit.
///
/// `resolver` answers for the unit scope; function and block scopes entered
/// during the walk are stacked over it and shadow it.
pub struct Transformer<'a> {
    resolver: &'a dyn SymbolResolver,
    factory: &'a dyn NodeFactory,
    options: &'a TransformOptions,
    scopes: RefCell<Vec<SymbolTable>>,
}

impl<'a> Transformer<'a> {
    pub fn new(
        resolver: &'a dyn SymbolResolver,
        factory: &'a dyn NodeFactory,
        options: &'a TransformOptions,
    ) -> Self {
        Self {
            resolver,
            factory,
            options,
            scopes: RefCell::new(Vec::new()),
        }
    }

    pub fn options(&self) -> &TransformOptions {
        self.options
    }

    /// Resolve a markup tag through its root segment, innermost scope first.
    pub fn resolve_tag(&self, tag: &str) -> Option<Binding> {
        let root = tag.split('.').next().unwrap_or(tag);
        let local = self
            .scopes
            .borrow()
            .iter()
            .rev()
            .find_map(|scope| scope.resolve(root));
        local.or_else(|| self.resolver.resolve_tag(tag))
    }

    fn with_scope<T>(&self, scope: SymbolTable, f: impl FnOnce(&Self) -> T) -> T {
        self.scopes.borrow_mut().push(scope);
        let out = f(self);
        self.scopes.borrow_mut().pop();
        out
    }
}
