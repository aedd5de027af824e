use crate::ast::{
    ArrayItem, ArrowBody, Declarator, Expr, Function, Program, Prop, PropKey, Stmt, Template,
    VarDecl,
};

use crate::resolve::SymbolTable;

use super::Transformer;
use super::template;

impl Transformer<'_> {
    /// Rewrite every markup expression in `program`; everything else is
    /// rebuilt unchanged.
    pub fn transform_program(&self, program: &Program) -> Program {
        Program {
            body: self.visit_stmts(&program.body),
        }
    }

    fn visit_stmts(&self, stmts: &[Stmt]) -> Vec<Stmt> {
        stmts.iter().map(|stmt| self.visit_stmt(stmt)).collect()
    }

    pub fn visit_stmt(&self, stmt: &Stmt) -> Stmt {
        match stmt {
            Stmt::Expr(expr) => Stmt::Expr(self.visit_expr(expr)),
            Stmt::Var(var) => Stmt::Var(VarDecl {
                kind: var.kind,
                declarators: var
                    .declarators
                    .iter()
                    .map(|decl| Declarator {
                        name: decl.name.clone(),
                        ty: decl.ty.clone(),
                        init: decl.init.as_ref().map(|init| self.visit_expr(init)),
                    })
                    .collect(),
            }),
            Stmt::Function(function) => Stmt::Function(self.visit_function(function)),
            Stmt::Return(value) => Stmt::Return(value.as_ref().map(|v| self.visit_expr(v))),
            Stmt::If { test, cons, alt } => Stmt::If {
                test: self.visit_expr(test),
                cons: Box::new(self.visit_stmt(cons)),
                alt: alt.as_ref().map(|alt| Box::new(self.visit_stmt(alt))),
            },
            Stmt::Block(body) => {
                let scope = SymbolTable::from_block(body);
                Stmt::Block(self.with_scope(scope, |t| t.visit_stmts(body)))
            }
            Stmt::Import(import) => Stmt::Import(import.clone()),
            Stmt::Export(inner) => Stmt::Export(Box::new(self.visit_stmt(inner))),
            Stmt::ExportDefault(expr) => Stmt::ExportDefault(self.visit_expr(expr)),
            Stmt::Empty => Stmt::Empty,
        }
    }

    fn visit_function(&self, function: &Function) -> Function {
        let scope = SymbolTable::from_function(
            function.name.as_deref(),
            &function.params,
            &function.body,
        );
        Function {
            name: function.name.clone(),
            is_async: function.is_async,
            params: function.params.clone(),
            ret: function.ret.clone(),
            body: self.with_scope(scope, |t| t.visit_stmts(&function.body)),
        }
    }

    fn visit_items(&self, items: &[ArrayItem]) -> Vec<ArrayItem> {
        items
            .iter()
            .map(|item| match item {
                ArrayItem::Expr(expr) => ArrayItem::Expr(self.visit_expr(expr)),
                ArrayItem::Spread(expr) => ArrayItem::Spread(self.visit_expr(expr)),
            })
            .collect()
    }

    fn visit_boxed(&self, expr: &Expr) -> Box<Expr> {
        Box::new(self.visit_expr(expr))
    }

    pub fn visit_expr(&self, expr: &Expr) -> Expr {
        match expr {
            Expr::Markup(markup) => template::build(self.factory, self.compile_markup(markup)),
            Expr::Ident(_) | Expr::Str(_) | Expr::Num(_) | Expr::Bool(_) | Expr::Null => {
                expr.clone()
            }
            Expr::Template(Template { quasis, exprs }) => Expr::Template(Template {
                quasis: quasis.clone(),
                exprs: exprs.iter().map(|e| self.visit_expr(e)).collect(),
            }),
            Expr::Array(items) => Expr::Array(self.visit_items(items)),
            Expr::Object(props) => Expr::Object(
                props
                    .iter()
                    .map(|prop| match prop {
                        Prop::KeyValue(key, value) => {
                            let key = match key {
                                PropKey::Computed(key) => PropKey::Computed(self.visit_boxed(key)),
                                other => other.clone(),
                            };
                            Prop::KeyValue(key, self.visit_expr(value))
                        }
                        Prop::Shorthand(name) => Prop::Shorthand(name.clone()),
                        Prop::Spread(expr) => Prop::Spread(self.visit_expr(expr)),
                    })
                    .collect(),
            ),
            Expr::Member {
                obj,
                prop,
                optional,
            } => Expr::Member {
                obj: self.visit_boxed(obj),
                prop: prop.clone(),
                optional: *optional,
            },
            Expr::Index { obj, index } => Expr::Index {
                obj: self.visit_boxed(obj),
                index: self.visit_boxed(index),
            },
            Expr::Call { callee, args } => Expr::Call {
                callee: self.visit_boxed(callee),
                args: self.visit_items(args),
            },
            Expr::New { callee, args } => Expr::New {
                callee: self.visit_boxed(callee),
                args: self.visit_items(args),
            },
            Expr::Arrow {
                is_async,
                params,
                body,
            } => Expr::Arrow {
                is_async: *is_async,
                params: params.clone(),
                body: match body {
                    ArrowBody::Expr(expr) => {
                        let scope = SymbolTable::from_params(params);
                        ArrowBody::Expr(self.with_scope(scope, |t| t.visit_boxed(expr)))
                    }
                    ArrowBody::Block(body) => {
                        let scope = SymbolTable::from_function(None, params, body);
                        ArrowBody::Block(self.with_scope(scope, |t| t.visit_stmts(body)))
                    }
                },
            },
            Expr::Function(function) => Expr::Function(Box::new(self.visit_function(function))),
            Expr::Unary { op, arg } => Expr::Unary {
                op: *op,
                arg: self.visit_boxed(arg),
            },
            Expr::Binary { op, left, right } => Expr::Binary {
                op: *op,
                left: self.visit_boxed(left),
                right: self.visit_boxed(right),
            },
            Expr::Assign { op, target, value } => Expr::Assign {
                op: *op,
                target: self.visit_boxed(target),
                value: self.visit_boxed(value),
            },
            Expr::Cond { test, cons, alt } => Expr::Cond {
                test: self.visit_boxed(test),
                cons: self.visit_boxed(cons),
                alt: self.visit_boxed(alt),
            },
            Expr::Paren(inner) => Expr::Paren(self.visit_boxed(inner)),
        }
    }
}
