//! HTML views rendered with minijinja.
//!
//! Templates are embedded at compile time; `.html` names get the default
//! HTML autoescaping.

use minijinja::{Environment, Value};

const BASE: &str = include_str!("templates/base.html");
const LANDING: &str = include_str!("templates/landing.html");
const AUTH: &str = include_str!("templates/auth.html");
const TODOS: &str = include_str!("templates/todos.html");
const CALLBACK: &str = include_str!("templates/callback.html");

/// Compiled template environment shared across requests.
pub struct Views {
    env: Environment<'static>,
}

impl Views {
    /// Compile the embedded templates.
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.add_template("base.html", BASE)?;
        env.add_template("landing.html", LANDING)?;
        env.add_template("auth.html", AUTH)?;
        env.add_template("todos.html", TODOS)?;
        env.add_template("callback.html", CALLBACK)?;
        Ok(Self { env })
    }

    /// Render a template with the given context.
    pub fn render(&self, name: &str, ctx: Value) -> Result<String, minijinja::Error> {
        self.env.get_template(name)?.render(ctx)
    }
}
