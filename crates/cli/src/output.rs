//! Text and JSON rendering of client results.

use anyhow::Result;
use dashboard::{Application, Instance, StatusRecord};
use serde_json::{json, Value};

/// Writes results to stdout, one line per record or one JSON document.
pub struct Output {
    json: bool,
}

impl Output {
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    pub fn apps(&self, apps: &[Application]) -> Result<()> {
        if self.json {
            return print_json(&Value::Array(apps.iter().map(app_json).collect()));
        }
        for app in apps {
            println!("{}", app_line(app));
        }
        Ok(())
    }

    pub fn app(&self, app: &Application) -> Result<()> {
        if self.json {
            return print_json(&app_json(app));
        }
        println!("{}", app_line(app));
        Ok(())
    }

    pub fn instances(&self, instances: &[Instance]) -> Result<()> {
        if self.json {
            let values = instances
                .iter()
                .map(instance_json)
                .collect::<Result<Vec<_>>>()?;
            return print_json(&Value::Array(values));
        }
        for instance in instances {
            println!("{}", instance_line(instance));
        }
        Ok(())
    }

    pub fn instance(&self, instance: &Instance) -> Result<()> {
        if self.json {
            return print_json(&instance_json(instance)?);
        }
        println!("{}", instance_line(instance));
        Ok(())
    }

    pub fn statuses(&self, statuses: &[StatusRecord]) -> Result<()> {
        if self.json {
            return print_json(&Value::Array(statuses.iter().map(|s| s.as_value().clone()).collect()));
        }
        for status in statuses {
            println!("{}", status_line(status));
        }
        Ok(())
    }

    /// Raw text such as a manifest file; printed as-is in both modes.
    pub fn text(&self, content: &str) -> Result<()> {
        if self.json {
            return print_json(&json!({ "content": content }));
        }
        println!("{content}");
        Ok(())
    }

    pub fn done(&self, message: &str) -> Result<()> {
        if self.json {
            return print_json(&json!({ "ok": true, "message": message }));
        }
        println!("{message}");
        Ok(())
    }
}

fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn app_json(app: &Application) -> Value {
    json!({ "name": app.name(), "version": app.version() })
}

fn app_line(app: &Application) -> String {
    format!("{}\t{}", app.name(), app.version())
}

fn instance_json(instance: &Instance) -> Result<Value> {
    Ok(serde_json::to_value(instance.snapshot())?)
}

fn instance_line(instance: &Instance) -> String {
    let mut line = format!("{}\t{}", instance.name(), instance.current_state());
    if let Some(desired) = instance.desired_state() {
        line.push_str(&format!(" -> {desired}"));
    }
    if let Some(app) = instance.application() {
        line.push_str(&format!("\t{}:{}", app.name(), app.version()));
    }
    line
}

fn status_line(status: &StatusRecord) -> String {
    let marker = match status.is_ok() {
        Some(true) => "ok",
        Some(false) => "FAIL",
        None => "?",
    };
    let mut line = format!("[{marker}] {}", status.name().unwrap_or("(unnamed)"));
    if let Some(checked) = status.last_checked() {
        line.push_str(&format!(" (checked {checked})"));
    }
    line
}
