pub mod areas;
pub mod objectives;
pub mod settings;

use anyhow::{Result, bail};
use chrono::{DateTime, FixedOffset, Local, Utc};

use crate::config::Config;
use crate::ui::prompts::select_from;
use crate::ui::{Resolution, resolve};

/// Current time in the configured zone (local time when unset)
pub(crate) fn now_in_zone(config: &Config) -> Result<DateTime<FixedOffset>> {
    let now = Utc::now();
    Ok(match config.timezone()? {
        Some(tz) => now.with_timezone(&tz).fixed_offset(),
        None => now.with_timezone(&Local).fixed_offset(),
    })
}

/// Resolve a name typed on the command line, asking the user to pick when
/// several candidates match. Without input the full list is offered.
pub(crate) fn choose(label: &str, input: Option<&str>, options: &[String]) -> Result<String> {
    let Some(text) = input else {
        return select_from(label, options, None);
    };

    match resolve(text, options) {
        Resolution::Found(value) => Ok(value),
        Resolution::Ambiguous(candidates) => {
            select_from(&format!("'{}' matches several, pick one", text), &candidates, None)
        }
        Resolution::NotFound => bail!("No {} matches '{}'", label.to_lowercase(), text),
    }
}

/// Like [`choose`] but never prompts
pub(crate) fn choose_strict(label: &str, text: &str, options: &[String]) -> Result<String> {
    match resolve(text, options) {
        Resolution::Found(value) => Ok(value),
        Resolution::Ambiguous(candidates) => bail!(
            "'{}' matches several {} values: {}",
            text,
            label.to_lowercase(),
            candidates.join(", ")
        ),
        Resolution::NotFound => bail!("No {} matches '{}'", label.to_lowercase(), text),
    }
}
