use anyhow::Context;
use serde_json::json;
use tdec_core::NamingAttribute;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::SettingsArgs;
use crate::context::AppContext;
use crate::output::output;

/// Handle `tdec settings`: apply any given switches, then print the result.
pub fn handle(args: &SettingsArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let client = &ctx.client;

    if let Some(logging) = args.logging {
        client.set_logging_enabled(logging.enabled())?;
    }
    if let Some(raw) = &args.naming {
        let attribute = parse_naming(raw)?;
        client.set_naming_attribute(attribute)?;
    }

    output(
        &json!({
            "logging_enabled": client.logging_enabled(),
            "naming_attribute": client.naming_attribute(),
            "config_path": ctx.config_path.display().to_string(),
        }),
        flags.format,
    )
}

fn parse_naming(raw: &str) -> anyhow::Result<NamingAttribute> {
    raw.parse::<NamingAttribute>().with_context(|| {
        let valid: Vec<&str> = NamingAttribute::ALL.iter().map(|a| a.as_str()).collect();
        format!("expected one of: {}", valid.join(", "))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn naming_parse_is_case_insensitive() {
        assert_eq!(parse_naming("Title").unwrap(), NamingAttribute::Title);
        assert_eq!(parse_naming("internal_id").unwrap(), NamingAttribute::InternalId);
    }

    #[test]
    fn naming_parse_lists_choices() {
        let error = parse_naming("colour").unwrap_err();
        assert!(format!("{error:#}").contains("label, title, external_code, internal_id"));
    }
}
