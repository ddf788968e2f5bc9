use clap::{ArgAction, Args, Parser, Subcommand};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "rowdeck",
    version,
    about = "paginated, sortable record table renderer",
    long_about = "rowdeck renders a JSON dataset as a paginated, sortable, column-hideable HTML table with inline row editing, and builds the static page assets.\n\nExamples:\n  rowdeck render --data ./dist/db/data.json -o table.html\n  rowdeck render --hide about --sort name --events session.txt\n  rowdeck build --src ./src --dist ./dist\n  rowdeck watch\n\nTip: Use --config to persist settings and keep CLI invocations short."
)]
pub struct CliArgs {
    #[arg(
        short = 'v',
        long = "verbose",
        action = ArgAction::Count,
        global = true,
        help_heading = "Output",
        help = "Increase verbosity (-v, -vv)."
    )]
    pub verbose: u8,

    #[arg(
        long = "no-color",
        global = true,
        help_heading = "Output",
        help = "Disable colored output."
    )]
    pub no_color: bool,

    #[arg(
        short = 'C',
        long = "config",
        value_name = "FILE",
        global = true,
        help_heading = "Input",
        help = "Path to config file (defaults to ~/.rowdeck/config.yml when present)."
    )]
    pub config: Option<String>,

    #[arg(
        long = "init-config",
        global = true,
        help_heading = "Input",
        help = "Write the default config file if it does not exist yet."
    )]
    pub init_config: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Load the dataset, apply events and write the rendered page.
    Render(RenderArgs),
    /// Clear the dist directory and rebuild every asset.
    Build(BuildArgs),
    /// Remove the dist directory.
    Clear(ClearArgs),
    /// Build, then rebuild on source changes until interrupted.
    Watch(WatchArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct RenderArgs {
    #[arg(
        short = 'd',
        long = "data",
        value_name = "FILE|URL",
        help_heading = "Input",
        help = "JSON dataset to load (file path or http(s) URL)."
    )]
    pub data: Option<String>,

    #[arg(
        short = 'e',
        long = "events",
        value_name = "FILE",
        help_heading = "Input",
        help = "Event script to apply after loading ('-' reads stdin)."
    )]
    pub events: Option<String>,

    #[arg(
        long = "malformed",
        value_name = "POLICY",
        help_heading = "Input",
        help = "Handling of malformed entries: reject, skip or default."
    )]
    pub malformed: Option<String>,

    #[arg(
        long = "timeout",
        value_name = "SECONDS",
        help_heading = "Input",
        help = "Remote fetch timeout in seconds (0 disables)."
    )]
    pub timeout: Option<u64>,

    #[arg(
        short = 'p',
        long = "page",
        value_name = "N",
        help_heading = "View",
        help = "Page to show (1-based)."
    )]
    pub page: Option<usize>,

    #[arg(
        long = "hide",
        value_name = "COLUMN",
        action = ArgAction::Append,
        help_heading = "View",
        help = "Hide a column (repeatable): name, surname, about, eyeColor."
    )]
    pub hide: Vec<String>,

    #[arg(
        short = 's',
        long = "sort",
        value_name = "COLUMN",
        help_heading = "View",
        help = "Sort the shown page ascending by a column."
    )]
    pub sort: Option<String>,

    #[arg(
        short = 'o',
        long = "output",
        value_name = "FILE",
        help_heading = "Output",
        help = "Write the page to a file instead of stdout."
    )]
    pub output: Option<String>,

    #[arg(
        long = "title",
        value_name = "TEXT",
        help_heading = "Output",
        help = "Document title."
    )]
    pub title: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct BuildArgs {
    #[arg(long = "src", value_name = "DIR", help = "Source directory.")]
    pub src: Option<String>,

    #[arg(long = "dist", value_name = "DIR", help = "Output directory.")]
    pub dist: Option<String>,

    #[arg(
        long = "css-bundle",
        value_name = "NAME",
        help = "File name of the concatenated stylesheet."
    )]
    pub css_bundle: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ClearArgs {
    #[arg(long = "dist", value_name = "DIR", help = "Output directory to remove.")]
    pub dist: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct WatchArgs {
    #[command(flatten)]
    pub build: BuildArgs,

    #[arg(
        long = "interval-ms",
        value_name = "MS",
        help = "Polling interval for source changes."
    )]
    pub interval_ms: Option<u64>,
}
