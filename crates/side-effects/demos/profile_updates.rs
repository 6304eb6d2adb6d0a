//! Profile update demo
//!
//! Binds two side effects to `update_profile`, runs the trigger a few times
//! and finishes with the side-effects report.
//!
//! ```text
//! cargo run -p side-effects --example profile_updates -- --verbose
//! SIDE_EFFECTS_DISABLED=1 cargo run -p side-effects --example profile_updates -- --strict
//! ```

use anyhow::Result;
use clap::Parser;
use side_effects::{
    check_function_signatures,
    cli::{DisplayArgs, DisplayCli},
    global, has_side_effects, is_side_effect_of, side_effect, with_side_effects_disabled,
};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "profile_updates")]
#[command(about = "Run a profile update and report its side effects")]
struct Cli {
    #[command(flatten)]
    display: DisplayArgs,
}

#[derive(Debug)]
struct Profile {
    user_id: u32,
    email: String,
}

/// Push the profile to the CRM.
///
/// Runs after every successful profile update.
fn update_crm(profile: &Profile) -> Result<()> {
    info!(user_id = profile.user_id, "CRM updated");
    Ok(())
}

fn send_confirmation(profile: &Profile, saved: &Result<u32, String>) -> Result<()> {
    anyhow::ensure!(profile.email.contains('@'), "invalid address {}", profile.email);
    info!(email = %profile.email, saved = ?saved, "Confirmation sent");
    Ok(())
}

fn save_profile(profile: &Profile) -> Result<u32, String> {
    if profile.user_id == 0 {
        return Err("anonymous users have no profile".to_string());
    }
    Ok(profile.user_id)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    is_side_effect_of("update_profile").bind(
        side_effect!(update_crm)
            .doc("Push the profile to the CRM.\n\nRuns after every successful profile update."),
    );
    is_side_effect_of("update_profile").bind(side_effect!(send_confirmation, with_return_value));

    for message in check_function_signatures(global()) {
        warn!(id = %message.id, "{}", message.msg);
    }

    let update_profile = has_side_effects("update_profile", save_profile);

    for profile in [
        Profile {
            user_id: 1,
            email: "ann@example.com".to_string(),
        },
        Profile {
            user_id: 0,
            email: "anon@example.com".to_string(),
        },
        Profile {
            user_id: 2,
            email: "not-an-address".to_string(),
        },
    ] {
        match update_profile(&profile) {
            Ok(id) => info!(id, "Profile saved"),
            Err(e) => warn!(error = %e, "Profile not saved"),
        }
    }

    let suppressed = with_side_effects_disabled(|events| {
        let _ = update_profile(&Profile {
            user_id: 3,
            email: "quiet@example.com".to_string(),
        });
        events.labels()
    });
    info!(labels = ?suppressed, "Recorded while suppressed");

    let output = DisplayCli::new(global()).execute(&cli.display)?;
    print!("{}", output.stdout);
    eprint!("{}", output.stderr);
    std::process::exit(output.exit_code);
}
