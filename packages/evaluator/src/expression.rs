//! Expression evaluation
//!
//! A single left-to-right pass over the operation chunks with an operator
//! stack and a value stack. Before an incoming binary operator is pushed,
//! pending operators that bind at least as tightly are folded. Groups
//! fold back to their opening marker when `)` arrives.

use crate::error::ExpressionResult;
use crate::operand::resolve_value;
use crate::operation::{exists, negate, resolve_operation};
use crate::scope::ScopeChain;
use crate::value::Value;
use reformulator_parser::{is_identifier, split_operations, Operation, Operator};
use tracing::{debug, instrument};

/// Resolve an expression against a scope chain. Failures of any kind
/// resolve to `Value::Empty`, as do empty arrays and objects.
#[instrument(level = "trace", skip(chain))]
pub fn resolve_expression(expression: &str, chain: ScopeChain<'_>) -> Value {
    match evaluate(expression, chain) {
        Ok(value) => value.normalized(),
        Err(error) => {
            debug!(%error, expression, "expression resolved to empty");
            Value::Empty
        }
    }
}

/// Like [`resolve_expression`] but reports why an expression failed
pub fn evaluate(expression: &str, chain: ScopeChain<'_>) -> ExpressionResult<Value> {
    let operations = split_operations(expression)?;
    let mut stack = EvaluationStack::default();

    for operation in &operations {
        let operand = resolve_operand(operation, chain)?;
        stack.feed(operation, operand);
    }

    Ok(stack.finish())
}

/// Bare names after `.` are member keys, not variables
fn resolve_operand(operation: &Operation<'_>, chain: ScopeChain<'_>) -> ExpressionResult<Option<Value>> {
    if operation.operator == Operator::Member && is_identifier(operation.operand) {
        return Ok(Some(Value::string(operation.operand)));
    }
    resolve_value(operation.operand, chain)
}

/// `None` entries on the value stack are absent operands, which keep
/// `!`, `?` and `(` unary
#[derive(Debug, Default)]
struct EvaluationStack {
    operators: Vec<Operator>,
    values: Vec<Option<Value>>,
}

impl EvaluationStack {
    fn feed(&mut self, operation: &Operation<'_>, operand: Option<Value>) {
        match operation.operator {
            Operator::Open => {
                self.operators.push(Operator::Open);
                self.values.push(operand);
            }
            Operator::Close => self.close(operand),
            Operator::Subtract if operation.prefix => {
                // -x is -1 * x
                self.values.pop();
                self.values.push(Some(Value::Number(-1.0)));
                self.operators.push(Operator::Multiply);
                self.values.push(operand);
            }
            Operator::NotEqual | Operator::Exists if operation.prefix => {
                self.operators.push(operation.operator);
                self.values.push(operand);
            }
            operator => {
                while let Some(&pending) = self.operators.last() {
                    if pending == Operator::Open || pending.precedence() < operator.precedence() {
                        break;
                    }
                    self.fold();
                }
                self.operators.push(operator);
                self.values.push(operand);
            }
        }
    }

    fn close(&mut self, operand: Option<Value>) {
        while let Some(pending) = self.operators.last().copied() {
            self.fold();
            if pending == Operator::Open {
                break;
            }
        }
        if operand.is_some() {
            if let Some(top) = self.values.last_mut() {
                *top = Some(Value::Empty);
            }
        }
    }

    fn fold(&mut self) {
        let Some(operator) = self.operators.pop() else {
            return;
        };
        let right = self.values.pop().flatten();
        let left = self.values.pop().flatten();
        self.values.push(Some(apply(left, operator, right)));
    }

    fn finish(mut self) -> Value {
        while !self.operators.is_empty() {
            self.fold();
        }
        self.values.pop().flatten().unwrap_or_default()
    }
}

fn apply(left: Option<Value>, operator: Operator, right: Option<Value>) -> Value {
    let right = right.unwrap_or_default();
    match (left, operator) {
        (None, Operator::NotEqual) => negate(&right),
        (None, Operator::Exists) => exists(&right),
        (left, operator) => resolve_operation(&left.unwrap_or_default(), operator, &right),
    }
}
