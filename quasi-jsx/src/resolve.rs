//! Tag classification: a tag naming a callable binding is a component,
//! anything else is an intrinsic element.

use std::collections::HashMap;

use crate::ast::{Expr, Param, Program, Stmt, VarKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingKind {
    Function,
    Import,
    Value,
    Param,
}

impl BindingKind {
    pub fn is_callable(self) -> bool {
        matches!(self, BindingKind::Function | BindingKind::Import)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub name: String,
    pub kind: BindingKind,
}

pub trait SymbolResolver {
    fn resolve(&self, name: &str) -> Option<Binding>;

    /// Resolve a markup tag. Member tags (`ui.Button`) resolve through their
    /// root binding.
    fn resolve_tag(&self, tag: &str) -> Option<Binding> {
        let root = tag.split('.').next().unwrap_or(tag);
        self.resolve(root)
    }
}

/// Resolver that knows nothing; every tag is intrinsic.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoSymbols;

impl SymbolResolver for NoSymbols {
    fn resolve(&self, _name: &str) -> Option<Binding> {
        None
    }
}

/// Declarations of one lexical scope.
///
/// A program scope holds the unit's top-level declarations; the transform
/// stacks function and block scopes over it while walking. Within a scope
/// the first declaration of a name wins.
#[derive(Debug, Default, Clone)]
pub struct SymbolTable {
    bindings: HashMap<String, BindingKind>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Top-level declarations of `program`, `var`s in nested blocks
    /// included.
    pub fn from_program(program: &Program) -> Self {
        let table = Self::from_body(&program.body);
        log::debug!("symbol table: {} bindings", table.bindings.len());
        table
    }

    /// Scope of a function: its own name, its parameters and the
    /// declarations of its body.
    pub fn from_function(name: Option<&str>, params: &[Param], body: &[Stmt]) -> Self {
        let mut table = Self::new();
        table.collect_params(params);
        for stmt in body {
            table.collect_stmt(stmt, true);
        }
        if let Some(name) = name {
            table.declare(name, BindingKind::Function);
        }
        table
    }

    /// Scope of an arrow function with an expression body.
    pub fn from_params(params: &[Param]) -> Self {
        let mut table = Self::new();
        table.collect_params(params);
        table
    }

    /// Scope of a block statement; `var`s belong to the enclosing function.
    pub fn from_block(body: &[Stmt]) -> Self {
        let mut table = Self::new();
        for stmt in body {
            table.collect_stmt(stmt, false);
        }
        table
    }

    fn from_body(body: &[Stmt]) -> Self {
        Self::from_function(None, &[], body)
    }

    /// Declare `name`, keeping an earlier binding of the same name.
    pub fn declare(&mut self, name: impl Into<String>, kind: BindingKind) {
        self.bindings.entry(name.into()).or_insert(kind);
    }

    /// Mark extra names as callable components, e.g. globals supplied by
    /// the runtime.
    pub fn with_components<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            self.declare(name, BindingKind::Function);
        }
        self
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    fn collect_params(&mut self, params: &[Param]) {
        for param in params {
            self.declare(param.name.clone(), BindingKind::Param);
        }
    }

    // Declarations made directly in this scope. With `hoist_vars`, `var`s
    // of nested blocks are lifted in as well.
    fn collect_stmt(&mut self, stmt: &Stmt, hoist_vars: bool) {
        match stmt {
            Stmt::Var(var) => {
                for decl in &var.declarators {
                    let kind = match &decl.init {
                        Some(Expr::Arrow { .. } | Expr::Function(_)) => BindingKind::Function,
                        _ => BindingKind::Value,
                    };
                    self.declare(decl.name.clone(), kind);
                }
            }
            Stmt::Function(function) => {
                if let Some(name) = &function.name {
                    self.declare(name.clone(), BindingKind::Function);
                }
            }
            Stmt::Import(import) => {
                for local in import.locals() {
                    self.declare(local, BindingKind::Import);
                }
            }
            Stmt::Export(inner) => self.collect_stmt(inner, hoist_vars),
            Stmt::Block(body) if hoist_vars => {
                for stmt in body {
                    self.collect_nested_var(stmt);
                }
            }
            Stmt::If { cons, alt, .. } if hoist_vars => {
                self.collect_nested_var(cons);
                if let Some(alt) = alt {
                    self.collect_nested_var(alt);
                }
            }
            _ => {}
        }
    }

    fn collect_nested_var(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Var(var) if var.kind == VarKind::Var => self.collect_stmt(stmt, true),
            Stmt::Block(_) | Stmt::If { .. } => self.collect_stmt(stmt, true),
            _ => {}
        }
    }
}

impl SymbolResolver for SymbolTable {
    fn resolve(&self, name: &str) -> Option<Binding> {
        self.bindings.get(name).map(|kind| Binding {
            name: name.to_string(),
            kind: *kind,
        })
    }
}
