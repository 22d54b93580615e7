use tera::Tera;

use crate::config::UNKNOWN_STATUS_PLACEHOLDER;
use crate::error::AppError;

/// Templates compiled into the binary, keyed by name.
const TEMPLATES: &[(&str, &str)] = &[
    ("base.html", include_str!("../templates/base.html")),
    ("frontend/index.html", include_str!("../templates/frontend/index.html")),
    ("frontend/secret.html", include_str!("../templates/frontend/secret.html")),
    (
        "health_checker/index.html",
        include_str!("../templates/health_checker/index.html"),
    ),
];

/// Initialize the Tera template engine
pub fn init_templates() -> Result<Tera, AppError> {
    let mut tera = Tera::default();
    tera.add_raw_templates(TEMPLATES.iter().copied())?;

    tera.register_filter("status_code", status_code_filter);
    tera.register_filter("status_class", status_class_filter);

    Ok(tera)
}

/// Render an optional status code, using a placeholder when there was no response
fn status_code_filter(
    value: &tera::Value,
    _args: &std::collections::HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    match value {
        tera::Value::Null => Ok(tera::Value::String(UNKNOWN_STATUS_PLACEHOLDER.to_string())),
        tera::Value::Number(n) => Ok(tera::Value::String(n.to_string())),
        tera::Value::String(s) => Ok(tera::Value::String(s.clone())),
        _ => Err(tera::Error::msg("status_code filter expects a number or null")),
    }
}

/// Map a healthy flag to its CSS class
fn status_class_filter(
    value: &tera::Value,
    _args: &std::collections::HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let healthy = value
        .as_bool()
        .ok_or_else(|| tera::Error::msg("status_class filter expects a boolean"))?;

    let class = if healthy {
        "has-background-success"
    } else {
        "has-background-danger"
    };
    Ok(tera::Value::String(class.to_string()))
}
