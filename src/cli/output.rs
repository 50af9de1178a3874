//! Terminal output.
//!
//! [`Printer`] receives the result of a successful command exactly once and
//! renders it as json, yaml or a simple aligned table. [`OutputManager`]
//! writes coloured diagnostics to stderr.

use crate::error::{CliError, Result};
use crate::gitlab::{Group, Project, Release, Tag};
use serde::Serialize;
use std::io::Write;
use std::str::FromStr;
use termcolor::{BufferWriter, Color, ColorChoice, ColorSpec, WriteColor};

/// Output format selected with `--out`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Pretty-printed JSON
    Json,
    /// YAML
    Yaml,
    /// Aligned text columns
    Simple,
}

impl FromStr for OutputFormat {
    type Err = CliError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "json" => Ok(OutputFormat::Json),
            "yaml" => Ok(OutputFormat::Yaml),
            "simple" => Ok(OutputFormat::Simple),
            other => Err(CliError::InvalidFlagValue {
                flag: "out".to_string(),
                value: other.to_string(),
                allowed: super::flags::OUT_FORMATS
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
            }),
        }
    }
}

/// Result of a remote call, forwarded to the printer unchanged
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Entities {
    /// Group listing
    Groups(Vec<Group>),
    /// Project listing
    Projects(Vec<Project>),
    /// A created or updated group
    Group(Group),
    /// A created or updated project
    Project(Project),
    /// A created tag
    Tag(Tag),
    /// A created release
    Release(Release),
}

/// Output sink for command results
pub trait Printer {
    /// Print the result of a command
    fn print(&mut self, format: OutputFormat, entities: &Entities) -> Result<()>;
}

/// Printer writing rendered output to stdout
#[derive(Debug, Default)]
pub struct StdoutPrinter;

impl Printer for StdoutPrinter {
    fn print(&mut self, format: OutputFormat, entities: &Entities) -> Result<()> {
        let rendered = render(format, entities)?;
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(rendered.as_bytes())?;
        stdout.flush()?;
        Ok(())
    }
}

/// Render entities in the given format, newline terminated
pub fn render(format: OutputFormat, entities: &Entities) -> Result<String> {
    let mut out = match format {
        OutputFormat::Json => serde_json::to_string_pretty(entities)?,
        OutputFormat::Yaml => serde_yaml::to_string(entities)?,
        OutputFormat::Simple => render_simple(entities),
    };
    if !out.ends_with('\n') {
        out.push('\n');
    }
    Ok(out)
}

fn render_simple(entities: &Entities) -> String {
    let group_row = |g: &Group| vec![g.id.to_string(), g.full_path.clone(), g.web_url.clone()];
    let project_row = |p: &Project| {
        vec![
            p.id.to_string(),
            p.path_with_namespace.clone(),
            p.web_url.clone(),
        ]
    };
    let tag_row = |t: &Tag| {
        vec![
            t.name.clone(),
            t.commit.as_ref().map(|c| c.short_id.clone()).unwrap_or_default(),
            t.message.clone().unwrap_or_default(),
        ]
    };
    let release_row = |r: &Release| {
        vec![
            r.tag_name.clone(),
            r.name.clone().unwrap_or_default(),
            r.created_at.map(|t| t.to_rfc3339()).unwrap_or_default(),
        ]
    };

    match entities {
        Entities::Groups(groups) => table(&["ID", "PATH", "URL"], groups.iter().map(group_row)),
        Entities::Group(group) => table(&["ID", "PATH", "URL"], [group_row(group)]),
        Entities::Projects(projects) => {
            table(&["ID", "PATH", "URL"], projects.iter().map(project_row))
        }
        Entities::Project(project) => table(&["ID", "PATH", "URL"], [project_row(project)]),
        Entities::Tag(tag) => table(&["NAME", "COMMIT", "MESSAGE"], [tag_row(tag)]),
        Entities::Release(release) => table(&["TAG", "NAME", "CREATED"], [release_row(release)]),
    }
}

/// Left-aligned columns separated by two spaces; the last column is not padded
fn table<I>(headers: &[&str], rows: I) -> String
where
    I: IntoIterator<Item = Vec<String>>,
{
    let mut lines: Vec<Vec<String>> = vec![headers.iter().map(|h| h.to_string()).collect()];
    lines.extend(rows);

    let mut widths = vec![0usize; headers.len()];
    for line in &lines {
        for (i, cell) in line.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let mut out = String::new();
    for line in &lines {
        let last = line.len().saturating_sub(1);
        for (i, cell) in line.iter().enumerate() {
            if i == last {
                out.push_str(cell);
            } else {
                out.push_str(&format!("{:<width$}  ", cell, width = widths[i]));
            }
        }
        out.push('\n');
    }
    out
}

/// Coloured diagnostics on stderr
#[derive(Debug)]
pub struct OutputManager {
    bufwtr: BufferWriter,
}

impl Clone for OutputManager {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl Default for OutputManager {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputManager {
    /// Create a new output manager
    pub fn new() -> Self {
        Self {
            bufwtr: BufferWriter::stderr(ColorChoice::Auto),
        }
    }

    /// Print an error message
    pub fn error(&self, message: &str) {
        let mut buffer = self.bufwtr.buffer();

        if buffer.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true)).is_err()
            || write!(&mut buffer, "✗").is_err()
            || buffer.reset().is_err()
            || writeln!(&mut buffer, " {}", message).is_err()
            || self.bufwtr.print(&buffer).is_err()
        {
            // Stderr failed - fallback to stdout as last resort
            println!("[STDERR ERROR] ✗ {}", message);
        }
    }

    /// Print indented hint text
    pub fn indent(&self, message: &str) {
        let mut buffer = self.bufwtr.buffer();
        let _ = buffer.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)));
        let _ = writeln!(&mut buffer, "    {}", message);
        let _ = buffer.reset();
        let _ = self.bufwtr.print(&buffer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(id: u64, path: &str) -> Project {
        Project {
            id,
            path_with_namespace: path.to_string(),
            web_url: format!("https://gitlab.com/{path}"),
            ..Default::default()
        }
    }

    #[test]
    fn test_out_format_parsing() {
        assert_eq!("yaml".parse::<OutputFormat>().unwrap(), OutputFormat::Yaml);
        let err = "xml".parse::<OutputFormat>().unwrap_err();
        assert!(err.to_string().contains("[json, yaml, simple]"));
    }

    #[test]
    fn test_simple_table_alignment() {
        let entities = Entities::Projects(vec![project(7, "team1/app"), project(1234, "a/b")]);
        let out = render(OutputFormat::Simple, &entities).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "ID    PATH       URL");
        assert_eq!(lines[1], "7     team1/app  https://gitlab.com/team1/app");
        assert_eq!(lines[2], "1234  a/b        https://gitlab.com/a/b");
    }

    #[test]
    fn test_json_listing_is_an_array() {
        let entities = Entities::Projects(vec![project(7, "team1/app")]);
        let value: serde_json::Value =
            serde_json::from_str(&render(OutputFormat::Json, &entities).unwrap()).unwrap();
        assert_eq!(value[0]["id"], 7);
    }

    #[test]
    fn test_yaml_single_release() {
        let entities = Entities::Release(Release {
            tag_name: "v1.0".to_string(),
            description: Some("Sample".to_string()),
            ..Default::default()
        });
        let out = render(OutputFormat::Yaml, &entities).unwrap();
        assert!(out.contains("tag_name: v1.0"));
        assert!(out.contains("description: Sample"));
    }
}
