use std::io::IsTerminal;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use itertools::Itertools;
use log::{info, LevelFilter};
use simplelog::{ColorChoice, TermLogger, TerminalMode};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::time::Instant;

use crate::cli::args::{BuildArgs, CliArgs, Command, RenderArgs, WatchArgs};
use crate::cli::validation;
use crate::config::{self, ConfigFile};
use crate::events;
use crate::loader::{self, DataSource, LoadOptions, MalformedPolicy};
use crate::model::Column;
use crate::output::report;
use crate::pipeline::{self, BuildPipeline, BuildReport, Task};
use crate::view::{Event, Outcome, TableViewModel};

const DEFAULT_DATA_PATH: &str = "./dist/db/data.json";
const DEFAULT_TITLE: &str = "Records";

fn format_kv_line(label: &str, value: &str) {
    eprintln!(":: {:<10}: {}", label, value);
}

/// The one place a failure reaches the user. Nothing is rendered after it.
pub fn report_failure(message: &str) {
    eprintln!("{} {}", ":: Error ::".red().bold(), message);
}

fn init_logging(verbose: u8, no_color: bool) -> Result<(), log::SetLoggerError> {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    let color = if no_color {
        ColorChoice::Never
    } else {
        ColorChoice::Auto
    };
    TermLogger::init(
        level,
        simplelog::Config::default(),
        TerminalMode::Stderr,
        color,
    )
}

fn spinner(message: &'static str) -> ProgressBar {
    if !std::io::stderr().is_terminal() {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    pb.set_draw_target(ProgressDrawTarget::stderr());
    pb.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(message);
    pb
}

#[derive(Clone, Debug)]
pub(crate) struct RenderConfig {
    pub(crate) source: DataSource,
    pub(crate) load: LoadOptions,
    pub(crate) events_path: Option<String>,
    pub(crate) page: Option<usize>,
    pub(crate) hidden: Vec<Column>,
    pub(crate) sort: Option<Column>,
    pub(crate) output: Option<PathBuf>,
    pub(crate) title: String,
}

#[derive(Clone, Debug)]
enum Action {
    Render(RenderConfig),
    Build(BuildPipeline),
    Clear(BuildPipeline),
    Watch(BuildPipeline, Duration),
}

#[derive(Clone, Debug)]
struct RunConfig {
    no_color: bool,
    action: Action,
}

fn build_render_config(args: RenderArgs, cfg: &ConfigFile) -> Result<RenderConfig, String> {
    let data = args
        .data
        .or_else(|| cfg.data.clone())
        .unwrap_or_else(|| DEFAULT_DATA_PATH.to_string());

    let policy = match args.malformed.or_else(|| cfg.malformed.clone()) {
        Some(raw) => MalformedPolicy::parse(&raw)
            .ok_or_else(|| format!("invalid malformed policy '{raw}'"))?,
        None => MalformedPolicy::default(),
    };
    let timeout = match args
        .timeout
        .or(cfg.timeout)
        .unwrap_or(loader::DEFAULT_TIMEOUT_SECS)
    {
        0 => None,
        secs => Some(Duration::from_secs(secs)),
    };

    let hidden = if args.hide.is_empty() {
        crate::utils::parse_columns(cfg.hidden_columns.as_deref().unwrap_or_default())
            .map_err(|e| format!("invalid hidden_columns: {e}"))?
    } else {
        crate::utils::parse_columns(&args.hide).map_err(|e| format!("invalid --hide: {e}"))?
    };

    let sort = match args.sort.as_deref() {
        Some(raw) => Some(Column::parse(raw).ok_or_else(|| format!("invalid --sort '{raw}'"))?),
        None => None,
    };

    Ok(RenderConfig {
        source: DataSource::parse(&data),
        load: LoadOptions { policy, timeout },
        events_path: args.events,
        page: args.page,
        hidden,
        sort,
        output: args
            .output
            .or_else(|| cfg.output.clone())
            .map(|p| config::expand_tilde(&p)),
        title: args
            .title
            .or_else(|| cfg.title.clone())
            .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
    })
}

fn build_pipeline(args: BuildArgs, cfg: &ConfigFile) -> Result<BuildPipeline, String> {
    let src = args
        .src
        .or_else(|| cfg.src_dir.clone())
        .unwrap_or_else(|| "./site".to_string());
    let dist = args
        .dist
        .or_else(|| cfg.dist_dir.clone())
        .unwrap_or_else(|| "./dist".to_string());
    let css_bundle = args
        .css_bundle
        .or_else(|| cfg.css_bundle.clone())
        .unwrap_or_else(|| pipeline::DEFAULT_CSS_BUNDLE.to_string());
    crate::utils::validate_bundle_name(&css_bundle)
        .map_err(|e| format!("invalid css bundle '{css_bundle}': {e}"))?;

    let mut pipeline = BuildPipeline::new(config::expand_tilde(&src), config::expand_tilde(&dist));
    pipeline.css_bundle = css_bundle.trim().to_string();
    Ok(pipeline)
}

fn build_watch(args: WatchArgs, cfg: &ConfigFile) -> Result<Action, String> {
    let interval_ms = args
        .interval_ms
        .or(cfg.watch_interval_ms)
        .unwrap_or(pipeline::DEFAULT_WATCH_INTERVAL_MS);
    if interval_ms == 0 {
        return Err("invalid watch interval, expected positive integer".to_string());
    }
    Ok(Action::Watch(
        build_pipeline(args.build, cfg)?,
        Duration::from_millis(interval_ms),
    ))
}

fn build_run_config(args: CliArgs, cfg: ConfigFile) -> Result<RunConfig, String> {
    validation::validate(&args)?;

    let no_color = args.no_color || cfg.no_color.unwrap_or(false);
    let action = match args.command {
        Command::Render(render) => Action::Render(build_render_config(render, &cfg)?),
        Command::Build(build) => Action::Build(build_pipeline(build, &cfg)?),
        Command::Clear(clear) => {
            let build = BuildArgs {
                dist: clear.dist,
                ..BuildArgs::default()
            };
            Action::Clear(build_pipeline(build, &cfg)?)
        }
        Command::Watch(watch) => build_watch(watch, &cfg)?,
    };
    Ok(RunConfig { no_color, action })
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct RenderSummary {
    pub(crate) records: usize,
    pub(crate) pages: usize,
    pub(crate) page: usize,
    pub(crate) applied: usize,
    pub(crate) ignored: usize,
}

async fn read_event_script(path: &str) -> Result<String, String> {
    if path == "-" {
        let mut buf = String::new();
        tokio::io::stdin()
            .read_to_string(&mut buf)
            .await
            .map_err(|e| format!("failed to read events from stdin: {e}"))?;
        return Ok(buf);
    }
    tokio::fs::read_to_string(config::expand_tilde(path))
        .await
        .map_err(|e| format!("failed to read events file '{path}': {e}"))
}

/// Loads, replays events and renders. Any error leaves nothing rendered.
pub(crate) async fn execute_render(run: &RenderConfig) -> Result<(String, RenderSummary), String> {
    let records = loader::load(&run.source, &run.load)
        .await
        .map_err(|e| format!("failed to load data from '{}': {e}", run.source))?;

    let mut script = Vec::new();
    script.extend(run.hidden.iter().copied().map(Event::ToggleColumn));
    script.extend(run.page.map(Event::SwitchPage));
    script.extend(run.sort.map(Event::SortBy));
    if let Some(path) = run.events_path.as_deref() {
        let text = read_event_script(path).await?;
        script.extend(events::parse_event_script(&text).map_err(|e| format!("{path}: {e}"))?);
    }

    let mut vm = TableViewModel::with_records(records);
    let mut summary = RenderSummary::default();
    for event in script {
        match vm.dispatch(event) {
            Outcome::Applied(_) => summary.applied += 1,
            Outcome::Ignored(_) => summary.ignored += 1,
        }
    }

    let state = vm.state();
    summary.records = state.data().len();
    summary.pages = state.pages_quantity();
    summary.page = state.page();
    Ok((report::render_document(&vm.render_app(), &run.title), summary))
}

async fn run_render(run: RenderConfig) -> Result<(), String> {
    let now = Instant::now();
    let (html, summary) = execute_render(&run).await?;

    match run.output.as_ref() {
        Some(path) => {
            let mut outfile = tokio::fs::File::create(path)
                .await
                .map_err(|e| format!("failed to open output file: {e}"))?;
            outfile
                .write_all(html.as_bytes())
                .await
                .map_err(|e| format!("failed to write output file: {e}"))?;
            format_kv_line("Output", &path.display().to_string());
        }
        None => {
            let mut stdout = tokio::io::stdout();
            stdout
                .write_all(html.as_bytes())
                .await
                .map_err(|e| format!("failed to write page: {e}"))?;
            stdout
                .flush()
                .await
                .map_err(|e| format!("failed to write page: {e}"))?;
        }
    }

    format_kv_line("Records", &summary.records.to_string());
    format_kv_line("Page", &page_label(&summary));
    if summary.applied + summary.ignored > 0 {
        format_kv_line(
            "Events",
            &format!("{} applied, {} ignored", summary.applied, summary.ignored),
        );
    }
    info!("render took {}ms", now.elapsed().as_millis());
    Ok(())
}

/// Current page over the real page count; an empty dataset reads "1/0".
fn page_label(summary: &RenderSummary) -> String {
    format!("{}/{}", summary.page, summary.pages)
}

fn print_build_report(tasks: &[Task], report: &BuildReport) {
    let labels = tasks.iter().map(|t| t.label()).join(",");
    for file in &report.files {
        info!("wrote {} ({})", file.path.display(), crate::utils::human_bytes(file.bytes));
    }
    eprintln!(
        "{} {} -> {} files, {}",
        ":: Built ::".green().bold(),
        labels,
        report.files.len(),
        crate::utils::human_bytes(report.total_bytes())
    );
}

async fn run_async(run: RunConfig) -> Result<(), String> {
    match run.action {
        Action::Render(render) => run_render(render).await,
        Action::Build(pipeline) => {
            let pb = spinner("building assets");
            let report = pipeline.build().await;
            pb.finish_and_clear();
            let report = report.map_err(|e| e.to_string())?;
            print_build_report(&Task::BUILD, &report);
            Ok(())
        }
        Action::Clear(pipeline) => {
            pipeline.clear().await.map_err(|e| e.to_string())?;
            format_kv_line("Cleared", &pipeline.dist_dir.display().to_string());
            Ok(())
        }
        Action::Watch(pipeline, interval) => {
            format_kv_line("Watching", &pipeline.src_dir.display().to_string());
            pipeline
                .watch(interval, print_build_report)
                .await
                .map_err(|e| e.to_string())
        }
    }
}

fn resolve_config(args: &CliArgs) -> Result<ConfigFile, String> {
    if args.init_config {
        let path = config::default_config_path()
            .ok_or_else(|| "cannot locate home directory for config".to_string())?;
        if config::ensure_default_config_file(&path).map_err(|e| e.to_string())? {
            format_kv_line("Config", &format!("wrote {}", path.display()));
        }
    }
    match args.config.as_deref() {
        Some(path) => config::load_config(&config::expand_tilde(path), false),
        None => match config::default_config_path() {
            Some(path) => config::load_config(&path, true),
            None => Ok(ConfigFile::default()),
        },
    }
    .map_err(|e| e.to_string())
}

pub fn run_cli() -> Result<(), String> {
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) if !e.use_stderr() => {
            print!("{e}");
            return Ok(());
        }
        Err(e) => return Err(e.to_string()),
    };

    let cfg = resolve_config(&args)?;
    let verbose = args.verbose;
    let run = build_run_config(args, cfg)?;

    if run.no_color {
        colored::control::set_override(false);
    }
    if let Err(e) = init_logging(verbose, run.no_color) {
        eprintln!("{} logging disabled: {e}", ":: Warning ::".yellow().bold());
    }

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("failed to build runtime: {e}"))?;

    rt.block_on(run_async(run))
}

#[cfg(test)]
mod cli_tests {
    use super::*;

    fn parse(argv: &[&str]) -> CliArgs {
        CliArgs::parse_from(argv.iter().copied())
    }

    #[test]
    fn cli_overrides_config() {
        let args = parse(&["rowdeck", "render", "--data", "cli.json", "--hide", "about"]);
        let cfg = ConfigFile {
            data: Some("cfg.json".to_string()),
            hidden_columns: Some(vec!["name".to_string()]),
            ..Default::default()
        };
        let run = build_run_config(args, cfg).unwrap();
        let Action::Render(render) = run.action else {
            panic!("expected render action");
        };
        assert_eq!(render.source, DataSource::File(PathBuf::from("cli.json")));
        assert_eq!(render.hidden, vec![Column::About]);
        assert_eq!(render.load.policy, MalformedPolicy::Reject);
    }

    #[test]
    fn config_fills_missing_flags() {
        let args = parse(&["rowdeck", "render"]);
        let cfg = ConfigFile {
            hidden_columns: Some(vec!["eyeColor".to_string()]),
            malformed: Some("skip".to_string()),
            timeout: Some(0),
            ..Default::default()
        };
        let run = build_run_config(args, cfg).unwrap();
        let Action::Render(render) = run.action else {
            panic!("expected render action");
        };
        assert_eq!(render.hidden, vec![Column::EyeColor]);
        assert_eq!(render.load.policy, MalformedPolicy::Skip);
        assert_eq!(render.load.timeout, None);
        assert_eq!(
            render.source,
            DataSource::File(PathBuf::from(DEFAULT_DATA_PATH))
        );
    }

    #[test]
    fn invalid_values_are_rejected() {
        let bad_page = parse(&["rowdeck", "render", "--page", "0"]);
        assert!(build_run_config(bad_page, ConfigFile::default()).is_err());

        let bad_cfg = ConfigFile {
            malformed: Some("lenient".to_string()),
            ..Default::default()
        };
        assert!(build_run_config(parse(&["rowdeck", "render"]), bad_cfg).is_err());

        let bad_bundle = parse(&["rowdeck", "build", "--css-bundle", "bundle.js"]);
        assert!(build_run_config(bad_bundle, ConfigFile::default()).is_err());
    }

    #[test]
    fn watch_interval_defaults() {
        let run = build_run_config(parse(&["rowdeck", "watch"]), ConfigFile::default()).unwrap();
        let Action::Watch(pipeline, interval) = run.action else {
            panic!("expected watch action");
        };
        assert_eq!(interval, Duration::from_millis(500));
        assert_eq!(pipeline.css_bundle, "index.css");
        assert_eq!(pipeline.dist_dir, PathBuf::from("./dist"));
    }

    #[test]
    fn clear_only_takes_a_dist_dir() {
        let src_flag = CliArgs::try_parse_from(["rowdeck", "clear", "--src", "x"]);
        assert!(src_flag.is_err());
        let bundle_flag = CliArgs::try_parse_from(["rowdeck", "clear", "--css-bundle", "a.css"]);
        assert!(bundle_flag.is_err());

        let cfg = ConfigFile {
            src_dir: Some("pages".to_string()),
            ..Default::default()
        };
        let run = build_run_config(parse(&["rowdeck", "clear", "--dist", "out"]), cfg).unwrap();
        let Action::Clear(pipeline) = run.action else {
            panic!("expected clear action");
        };
        assert_eq!(pipeline.dist_dir, PathBuf::from("out"));
        assert_eq!(pipeline.src_dir, PathBuf::from("pages"));
    }

    #[test]
    fn page_label_reports_zero_pages_for_empty_data() {
        let empty = RenderSummary {
            page: 1,
            ..Default::default()
        };
        assert_eq!(page_label(&empty), "1/0");
        let full = RenderSummary {
            records: 14,
            pages: 2,
            page: 2,
            ..Default::default()
        };
        assert_eq!(page_label(&full), "2/2");
    }

    #[test]
    fn second_logger_init_reports_an_error() {
        // the first call may fail too if another test already installed a logger
        init_logging(0, true).ok();
        assert!(init_logging(1, true).is_err());
    }
}
