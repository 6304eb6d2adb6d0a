//! Report of registered side effects
//!
//! A read-only view over the registry, meant to be embedded in a host
//! application's own binary (the registry is only populated inside that
//! application). With `--strict`, the suggested exit code is the number of
//! bound functions without documentation, capped at [`MAX_EXIT_CODE`] so it
//! never wraps to zero on Unix, and CI can fail the build.
//!
//! ```ignore
//! #[derive(clap::Parser)]
//! struct Cli {
//!     #[command(flatten)]
//!     display: side_effects::cli::DisplayArgs,
//! }
//!
//! let cli = Cli::parse();
//! let output = DisplayCli::new(side_effects::global()).execute(&cli.display)?;
//! print!("{}", output.stdout);
//! eprint!("{}", output.stderr);
//! std::process::exit(output.exit_code);
//! ```

pub mod commands;
pub mod formatter;

pub use commands::{DisplayArgs, DisplayFormat};
pub use formatter::{format_default, format_missing, format_raw, format_verbose, DisplayOutput};

use crate::{
    error::Result,
    registry::{LabelFilter, SideEffectRegistry},
};

/// Largest exit code reported by `--strict`
pub const MAX_EXIT_CODE: i32 = 255;

/// Side-effects report command
pub struct DisplayCli<'r> {
    registry: &'r SideEffectRegistry,
}

impl<'r> DisplayCli<'r> {
    /// Create a report over `registry`
    pub fn new(registry: &'r SideEffectRegistry) -> Self {
        Self { registry }
    }

    /// Render the report selected by `args`
    pub fn execute(&self, args: &DisplayArgs) -> Result<DisplayOutput> {
        let mut output = DisplayOutput::default();
        let filter = args.filter();

        match &filter {
            LabelFilter::Exact(label) => {
                output.out(&format!("\nSide-effects for event matching '{}':", label));
            }
            LabelFilter::Contains(substring) => {
                output.out(&format!(
                    "\nSide-effects for events matching '*{}*':",
                    substring
                ));
            }
            LabelFilter::All => output.out("\nRegistered side-effects:"),
        }

        let events = self.registry.events(&filter);
        match args.format() {
            DisplayFormat::Raw => format_raw(&events, &mut output)?,
            DisplayFormat::Verbose => format_verbose(&events, &mut output),
            DisplayFormat::Default => format_default(&events, &mut output),
        }

        format_missing(&mut output);

        if args.strict {
            output.exit_code = i32::try_from(output.missing_docstrings.len())
                .map_or(MAX_EXIT_CODE, |count| count.min(MAX_EXIT_CODE));
        }

        Ok(output)
    }
}
