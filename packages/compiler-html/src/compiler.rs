use reformulator_evaluator::{LiveTemplate, Template, TemplateError, Value};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, instrument};

/// Errors that can occur during HTML compilation
#[derive(Error, Debug)]
pub enum CompileError {
    #[error("Invalid template: {0}")]
    Template(#[from] TemplateError),

    #[error("Could not serialize re-hydration script: {0}")]
    Script(#[from] serde_json::Error),
}

pub type CompileResult<T> = Result<T, CompileError>;

/// Options for HTML compilation
#[derive(Debug, Clone)]
pub struct CompileOptions {
    /// Append the client bootstrap script when the markup depends on state
    pub rehydrate: bool,
    /// Name of the client bootstrap function the script calls
    pub bootstrap: String,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            rehydrate: true,
            bootstrap: "reform".to_string(),
        }
    }
}

struct Context<'o> {
    options: &'o CompileOptions,
    buffer: String,
}

impl<'o> Context<'o> {
    fn new(options: &'o CompileOptions) -> Self {
        Self {
            options,
            buffer: String::new(),
        }
    }

    fn add(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    /// `<script>bootstrap(template, data, true);</script>`
    fn add_script(&mut self, template: &Template, data: Option<&Value>) -> CompileResult<()> {
        let template = script_json(template)?;
        let data = match data {
            Some(value) if !value.is_empty() => script_json(value)?,
            _ => "{}".to_string(),
        };
        let script = format!(
            "<script>{}({},{},true);</script>",
            self.options.bootstrap, template, data
        );
        self.add(&script);
        Ok(())
    }

    fn get_output(self) -> String {
        self.buffer
    }
}

/// JSON that cannot close the surrounding script element
fn script_json(value: &impl Serialize) -> CompileResult<String> {
    Ok(serde_json::to_string(value)?.replace("</", "<\\/"))
}

/// Render a template against optional data, followed by the re-hydration
/// script when the result binds state variables
#[instrument(skip_all, fields(rehydrate = options.rehydrate))]
pub fn compile_to_html(
    template: &Template,
    data: Option<&Value>,
    options: &CompileOptions,
) -> CompileResult<String> {
    let layers = data.cloned().into_iter().collect();
    let rendered = LiveTemplate::new(template.clone(), layers).render_markup();

    let mut ctx = Context::new(options);
    ctx.add(&rendered.html);

    if options.rehydrate && rendered.needs_rehydration() {
        debug!(variables = ?rendered.variables, "appending re-hydration script");
        ctx.add_script(template, data)?;
    }

    Ok(ctx.get_output())
}

/// Compile from JSON source text, as read from template and data files
pub fn compile_str(
    template_json: &str,
    data_json: Option<&str>,
    options: &CompileOptions,
) -> CompileResult<String> {
    let template = Template::from_json(template_json)?;
    let data = data_json.map(Value::from_json).transpose()?;
    compile_to_html(&template, data.as_ref(), options)
}
