use crate::element::resolve_element;
use crate::error::{ExpressionError, ExpressionResult};
use crate::scope::ScopeChain;
use crate::structure::{resolve_structure, StructureKind};
use crate::value::Value;
use reformulator_parser::{classify_operand, Operand};

/// Resolve a single operand. `Ok(None)` means the operand is absent,
/// which unary operators and groups rely on; text that matches no
/// operand grammar fails the enclosing expression.
pub fn resolve_value(text: &str, chain: ScopeChain<'_>) -> ExpressionResult<Option<Value>> {
    Ok(Some(match classify_operand(text) {
        Operand::Blank => return Ok(None),
        Operand::Number(number) => Value::number(number),
        Operand::Text(text) => Value::String(text),
        Operand::Boolean(flag) => Value::Boolean(flag),
        Operand::Object(interior) => resolve_structure(interior, StructureKind::Object, chain),
        Operand::Array(interior) => resolve_structure(interior, StructureKind::Array, chain),
        Operand::Element(literal) => resolve_element(literal, chain),
        Operand::Variable(name) => chain.lookup(name).clone(),
        Operand::SelfRef => chain.scope().clone(),
        Operand::Invalid => return Err(ExpressionError::InvalidOperand(text.trim().to_string())),
    }))
}
