//! HTML page rendering.
//!
//! Templates are compiled into the binary and rendered with `minijinja`. The
//! `.html` template names keep auto-escaping on.

use axum::response::Html;
use minijinja::Environment;
use once_cell::sync::Lazy;

use crate::errors::Result;

static TEMPLATES: Lazy<Environment<'static>> = Lazy::new(|| {
    let mut env = Environment::new();
    env.add_template("index.html", include_str!("../templates/index.html"))
        .expect("index template parses");
    env.add_template("details.html", include_str!("../templates/details.html"))
        .expect("details template parses");
    env.add_template("selection.html", include_str!("../templates/selection.html"))
        .expect("selection template parses");
    env.add_template("error.html", include_str!("../templates/error.html"))
        .expect("error template parses");
    env
});

/// Render a named template with the given context into an HTML response body.
pub fn render(name: &str, ctx: minijinja::Value) -> Result<Html<String>> {
    let template = TEMPLATES.get_template(name)?;
    Ok(Html(template.render(ctx)?))
}
