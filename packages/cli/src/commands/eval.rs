use anyhow::Result;
use clap::Args;
use colored::Colorize;
use reformulator_evaluator::{evaluate, render_value, ScopeChain, Value};

#[derive(Debug, Args)]
pub struct EvalArgs {
    /// Expression to resolve
    pub expression: String,

    /// JSON data the expression is resolved against
    #[arg(short, long)]
    pub data: Option<String>,
}

pub fn eval(args: EvalArgs, _cwd: &str) -> Result<()> {
    let output = eval_to_string(&args.expression, args.data.as_deref())?;
    if output.is_empty() {
        println!("{}", "(empty)".dimmed());
    } else {
        println!("{}", output);
    }
    Ok(())
}

/// Markup for element results, JSON for anything else, nothing for Empty.
/// Grammar errors are reported instead of collapsing to Empty.
pub fn eval_to_string(expression: &str, data: Option<&str>) -> Result<String> {
    let data = data.map(Value::from_json).transpose()?.unwrap_or_default();
    let value = ScopeChain::new()
        .push(&data, |chain| evaluate(expression, chain))?
        .normalized();

    Ok(match &value {
        Value::Empty => String::new(),
        Value::Element(_) => render_value(&value),
        Value::Array(items) if items.iter().all(|item| item.as_element().is_some()) => {
            render_value(&value)
        }
        other => serde_json::to_string(other)?,
    })
}
