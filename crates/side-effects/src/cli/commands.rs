//! Arguments of the side-effects report command

use clap::Args;

use crate::registry::LabelFilter;

/// Displays project side effects
///
/// Flatten this into a host application's own clap command.
#[derive(Debug, Clone, Default, Args)]
pub struct DisplayArgs {
    /// Display raw mapping of labels to functions
    #[arg(long)]
    pub raw: bool,

    /// Display full docstring for all side-effect functions
    #[arg(long)]
    pub verbose: bool,

    /// Exit with a non-zero exit code if any registered functions have no docstrings
    #[arg(long)]
    pub strict: bool,

    /// Filter side-effects on a single event label
    #[arg(long, conflicts_with = "label_contains")]
    pub label: Option<String>,

    /// Filter side-effects on event labels containing the supplied value
    #[arg(long = "label-contains")]
    pub label_contains: Option<String>,
}

impl DisplayArgs {
    /// Labels selected by `--label` / `--label-contains`
    pub fn filter(&self) -> LabelFilter {
        match (&self.label, &self.label_contains) {
            (Some(label), _) => LabelFilter::Exact(label.clone()),
            (None, Some(substring)) => LabelFilter::Contains(substring.clone()),
            (None, None) => LabelFilter::All,
        }
    }

    /// Output layout selected by `--raw` / `--verbose`
    pub fn format(&self) -> DisplayFormat {
        if self.raw {
            DisplayFormat::Raw
        } else if self.verbose {
            DisplayFormat::Verbose
        } else {
            DisplayFormat::Default
        }
    }
}

/// Output layout of the report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayFormat {
    /// First docstring line per function
    Default,

    /// Full docstring per function
    Verbose,

    /// JSON mapping of labels to fully-qualified function names
    Raw,
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        args: DisplayArgs,
    }

    fn parse(argv: &[&str]) -> DisplayArgs {
        TestCli::try_parse_from(std::iter::once("display-side-effects").chain(argv.iter().copied()))
            .unwrap()
            .args
    }

    #[test]
    fn test_defaults() {
        let args = parse(&[]);
        assert_eq!(args.filter(), LabelFilter::All);
        assert_eq!(args.format(), DisplayFormat::Default);
        assert!(!args.strict);
    }

    #[test]
    fn test_label_filters() {
        assert_eq!(
            parse(&["--label", "update_profile"]).filter(),
            LabelFilter::Exact("update_profile".to_string())
        );
        assert_eq!(
            parse(&["--label-contains", "profile"]).filter(),
            LabelFilter::Contains("profile".to_string())
        );
    }

    #[test]
    fn test_label_and_label_contains_conflict() {
        let result = TestCli::try_parse_from([
            "display-side-effects",
            "--label",
            "a",
            "--label-contains",
            "b",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_raw_takes_precedence_over_verbose() {
        assert_eq!(parse(&["--raw", "--verbose"]).format(), DisplayFormat::Raw);
        assert_eq!(parse(&["--verbose"]).format(), DisplayFormat::Verbose);
    }
}
