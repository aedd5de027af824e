pub mod ast;
pub mod config;
pub mod error;
pub mod factory;
pub mod parse;
pub mod print;
pub mod resolve;
pub mod transform;
pub mod whitespace;

pub use ast::{Expr, Markup, Program};
pub use config::{TransformOptions, VoidTags};
pub use error::{Error, Result};
pub use factory::{EcmaFactory, NodeFactory};
pub use parse::{parse_expr, parse_program};
pub use print::{print_expr, print_program};
pub use resolve::{Binding, BindingKind, NoSymbols, SymbolResolver, SymbolTable};
pub use transform::{Compiled, Span, Transformer};
pub use whitespace::WhitespacePolicy;

/// Rewrite the markup of a parsed unit, resolving tags against the unit's
/// own declarations plus `options.components`.
pub fn transform_program(program: &Program, options: &TransformOptions) -> Program {
    let symbols =
        SymbolTable::from_program(program).with_components(options.components.iter().cloned());
    let factory = EcmaFactory::new(options.merge_helper.as_str());
    Transformer::new(&symbols, &factory, options).transform_program(program)
}

/// Parse, transform and print one compilation unit.
pub fn compile_source(source: &str, options: &TransformOptions) -> Result<String> {
    let program = parse_program(source)?;
    let output = transform_program(&program, options);
    Ok(print_program(&output))
}
