use crate::cli::args::{BuildArgs, CliArgs, Command, RenderArgs};
use crate::loader::MalformedPolicy;
use crate::model::Column;

pub fn validate(args: &CliArgs) -> Result<(), String> {
    match &args.command {
        Command::Render(render) => validate_render(render),
        Command::Build(build) => validate_build(build),
        Command::Clear(_) => Ok(()),
        Command::Watch(watch) => {
            if watch.interval_ms == Some(0) {
                return Err("invalid --interval-ms, expected positive integer".to_string());
            }
            validate_build(&watch.build)
        }
    }
}

fn validate_render(args: &RenderArgs) -> Result<(), String> {
    if args.page == Some(0) {
        return Err("invalid --page, pages start at 1".to_string());
    }
    for raw in &args.hide {
        Column::parse(raw).ok_or_else(|| format!("invalid --hide '{raw}': unknown column"))?;
    }
    if let Some(raw) = args.sort.as_deref() {
        Column::parse(raw).ok_or_else(|| format!("invalid --sort '{raw}': unknown column"))?;
    }
    if let Some(raw) = args.malformed.as_deref() {
        MalformedPolicy::parse(raw)
            .ok_or_else(|| format!("invalid --malformed '{raw}', expected reject, skip or default"))?;
    }
    Ok(())
}

fn validate_build(args: &BuildArgs) -> Result<(), String> {
    if let Some(name) = args.css_bundle.as_deref() {
        crate::utils::validate_bundle_name(name)
            .map_err(|e| format!("invalid --css-bundle '{name}': {e}"))?;
    }
    Ok(())
}
