use crate::output::is_quiet;
use crate::render::{Content, RenderedElement};
use crate::ui::{theme, Icons};
use owo_colors::OwoColorize;

pub fn header(text: &str) {
    if is_quiet() {
        return;
    }
    println!("{} {}", Icons::TREE, text.style(theme().header.clone()));
}

pub fn success(label: &str) {
    if is_quiet() {
        return;
    }
    println!("{} {}", Icons::CHECK, label.style(theme().success.clone()));
}

pub fn error(label: &str) {
    eprintln!("{} {}", Icons::CROSS, label.style(theme().error.clone()));
}

pub fn warn(label: &str) {
    eprintln!("{} {}", Icons::WARN, label.style(theme().warn.clone()));
}

pub fn file(path: &str, detail: &str) {
    if is_quiet() {
        return;
    }
    println!("{} {} {}", Icons::FILE, path, detail.style(theme().dim.clone()));
}

pub fn section(title: &str) {
    if is_quiet() {
        return;
    }
    println!();
    println!("{} {}", Icons::STATS, title.style(theme().header.clone()));
}

pub fn dim(text: &str) -> String {
    text.style(theme().dim.clone()).to_string()
}

/// Print an outline with entities, properties and relations styled apart
pub fn outline(element: &RenderedElement) {
    let mut lines = Vec::new();
    outline_lines(element, 0, String::new(), &mut lines);
    for line in lines {
        println!("{}", line);
    }
}

fn outline_lines(element: &RenderedElement, depth: usize, prefix: String, lines: &mut Vec<String>) {
    let span = element
        .span
        .map(|span| format!(" {}", dim(&format!("[{}]", span))))
        .unwrap_or_default();
    lines.push(format!("{}{}{}", prefix, element.entity.style(theme().entity.clone()), span));

    let indent = "  ".repeat(depth + 1);
    for value in &element.values {
        let label = format!("{}#{}", value.name, value.index);
        match &value.content {
            Content::Value(v) => lines.push(format!(
                "{}{}: {:?}",
                indent,
                label.style(theme().property.clone()),
                v.to_string()
            )),
            Content::Element(child) => {
                let prefix = format!("{}{}: ", indent, label.style(theme().relation.clone()));
                outline_lines(child, depth + 1, prefix, lines);
            }
            Content::Elided(entity) => lines.push(format!(
                "{}{}: {} {}",
                indent,
                label.style(theme().relation.clone()),
                entity.style(theme().entity.clone()),
                dim("...")
            )),
        }
    }
}
