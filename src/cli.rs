//! Command-line options for the `mlscope` binary.

use crate::views::ActiveView;

/// Overrides applied on top of the settings file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CliOptions {
    pub api: Option<String>,
    pub view: Option<ActiveView>,
}

/// Parse arguments (without the program name). `Ok(None)` means help was printed.
pub fn parse_args(args: Vec<String>) -> Result<Option<CliOptions>, String> {
    let mut options = CliOptions::default();
    let mut idx = 0usize;
    while idx < args.len() {
        match args[idx].as_str() {
            "-h" | "--help" => {
                println!("{}", help_text());
                return Ok(None);
            }
            "--api" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--api requires a value".to_string())?;
                if value.trim().is_empty() {
                    return Err("--api requires a non-empty URL".to_string());
                }
                options.api = Some(value.trim().to_string());
            }
            "--view" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--view requires a value".to_string())?;
                options.view = Some(value.parse::<ActiveView>()?);
            }
            unknown => {
                return Err(format!("Unknown argument: {unknown}\n\n{}", help_text()));
            }
        }
        idx += 1;
    }
    Ok(Some(options))
}

pub fn help_text() -> String {
    [
        "mlscope",
        "",
        "Interactive KNN and linear regression charts for the ML demo backend.",
        "",
        "Usage:",
        "  mlscope [--api <base-url>] [--view knn|regression]",
        "",
        "Options:",
        "  --api <base-url>   Backend base URL (overrides api.base_url in config.toml).",
        "  --view <name>      Tab to open first: knn (default) or regression.",
    ]
    .join("\n")
}
