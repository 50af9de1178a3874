//! gitlabctl - manage GitLab groups, projects, tags and releases from the
//! command line.

use gitlabctl::cli;
use gitlabctl::cli::{OutputManager, Outcome};
use std::process;

#[tokio::main]
async fn main() {
    env_logger::init();

    match cli::run().await {
        Ok(Outcome::Done) => process::exit(0),
        Ok(Outcome::Displayed(text)) => {
            print!("{text}");
            process::exit(0);
        }
        Err(e) => {
            let output = OutputManager::new();
            if e.is_fatal() {
                log::error!("fatal flag registration defect: {e}");
            }
            output.error(&e.to_string());

            for suggestion in e.recovery_suggestions() {
                output.indent(&suggestion);
            }

            process::exit(e.exit_code());
        }
    }
}
