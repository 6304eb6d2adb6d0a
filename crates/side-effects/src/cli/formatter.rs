//! Output formatting for the side-effects report

use std::collections::BTreeMap;

use crate::{
    error::Result,
    introspect::{docstring, MISSING_DOCSTRING},
    registry::Events,
};

/// Text written by the report, split by stream
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayOutput {
    /// Text for standard output
    pub stdout: String,

    /// Text for standard error
    pub stderr: String,

    /// Fully-qualified names of functions without documentation
    pub missing_docstrings: Vec<String>,

    /// Suggested process exit code, between 0 and 255
    pub exit_code: i32,
}

impl DisplayOutput {
    pub(crate) fn out(&mut self, line: &str) {
        self.stdout.push_str(line);
        self.stdout.push('\n');
    }

    pub(crate) fn err(&mut self, line: &str) {
        self.stderr.push_str(line);
        self.stderr.push('\n');
    }

    fn missing(&mut self, name: String) {
        self.err(&format!("  x {} {}", name, MISSING_DOCSTRING));
        self.missing_docstrings.push(name);
    }
}

/// Print out the fully-qualified name of each bound function as JSON
pub fn format_raw(events: &Events, output: &mut DisplayOutput) -> Result<()> {
    let raw: BTreeMap<&str, Vec<String>> = events
        .iter()
        .map(|(label, bindings)| {
            (
                label.as_str(),
                bindings.iter().map(|b| b.qualified_name()).collect(),
            )
        })
        .collect();
    output.out(&serde_json::to_string_pretty(&raw)?);
    Ok(())
}

/// Print the entire docstring of each bound function
pub fn format_verbose(events: &Events, output: &mut DisplayOutput) {
    for (label, bindings) in events {
        output.out("");
        output.out(label);
        output.out("");
        for binding in bindings {
            match docstring(binding.doc()) {
                None => {
                    output.missing(binding.qualified_name());
                    output.out("");
                }
                Some(lines) => {
                    output.out(&format!("  - {}:", binding.qualified_name()));
                    for line in lines {
                        output.out(&format!("    {}", line));
                    }
                    output.out("");
                }
            }
        }
    }
}

/// Print the first docstring line of each bound function
pub fn format_default(events: &Events, output: &mut DisplayOutput) {
    for (label, bindings) in events {
        output.out("");
        output.out(label);
        for binding in bindings {
            match docstring(binding.doc()) {
                None => output.missing(binding.qualified_name()),
                Some(lines) => output.out(&format!("  - {}", lines[0])),
            }
        }
    }
}

/// Print the list of functions without documentation
pub fn format_missing(output: &mut DisplayOutput) {
    if output.missing_docstrings.is_empty() {
        output.out("\nAll registered functions have docstrings");
        return;
    }

    output.err("\nThe following functions have no docstrings:");
    for name in output.missing_docstrings.clone() {
        output.err(&format!("  {}", name));
    }
}
