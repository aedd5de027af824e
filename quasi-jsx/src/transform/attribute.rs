use crate::ast::{AttrValue, Expr};

/// Classified attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrClass<'a> {
    /// Attribute text including its quotes.
    StringLiteral(String),
    True,
    Expression(&'a Expr),
}

pub fn compile_attribute(value: Option<&AttrValue>) -> AttrClass<'_> {
    match value {
        None => AttrClass::True,
        Some(AttrValue::Str(lit)) => AttrClass::StringLiteral(lit.quoted()),
        // numbers become quoted attribute text at compile time
        Some(AttrValue::Expr(Expr::Num(text))) => AttrClass::StringLiteral(format!("\"{text}\"")),
        Some(AttrValue::Expr(Expr::Bool(true))) => AttrClass::True,
        Some(AttrValue::Expr(expr)) => AttrClass::Expression(expr),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::StrLit;

    #[test]
    fn flag_without_value() {
        assert_eq!(compile_attribute(None), AttrClass::True);
    }

    #[test]
    fn string_keeps_its_quotes() {
        let value = AttrValue::Str(StrLit {
            value: "btn".into(),
            quote: '\'',
        });
        assert_eq!(
            compile_attribute(Some(&value)),
            AttrClass::StringLiteral("'btn'".into())
        );
    }

    #[test]
    fn numbers_are_quoted() {
        let value = AttrValue::Expr(Expr::Num("42".into()));
        assert_eq!(
            compile_attribute(Some(&value)),
            AttrClass::StringLiteral("\"42\"".into())
        );
    }

    #[test]
    fn true_constant_is_a_flag() {
        let value = AttrValue::Expr(Expr::Bool(true));
        assert_eq!(compile_attribute(Some(&value)), AttrClass::True);
    }

    #[test]
    fn other_values_stay_dynamic() {
        let value = AttrValue::Expr(Expr::Bool(false));
        assert_eq!(
            compile_attribute(Some(&value)),
            AttrClass::Expression(&Expr::Bool(false))
        );
    }
}
