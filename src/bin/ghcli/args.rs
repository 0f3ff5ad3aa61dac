use clap::{crate_description, ArgAction, Args, Parser, Subcommand, ValueEnum};
use std::io::IsTerminal;
use std::path::PathBuf;

use ghcli::gh_binary::{DEFAULT_API_VERSION, DEFAULT_EXECUTABLE_NAME};
use ghcli::logging::LogFormat;

// -----------------------------------------------------------------------------
// command-line args
// -----------------------------------------------------------------------------
#[derive(Parser, Debug)]
#[command(
    name("ghcli"),
    bin_name("ghcli"),

    version,  // retrieved from Cargo.toml `version`
    about,    // retrieved from Cargo.toml `description`

    long_about = concat!(
        crate_description!(),
        "\n\n",
        "Requests are made by running the GitHub CLI (`gh`), which must be installed and authenticated.",
    ),
)]
#[deny(missing_docs)]
/// Run GitHub API requests through the GitHub CLI
pub struct CommandLineArgs {
    #[command(subcommand)]
    pub command: Command,

    #[command(flatten)]
    pub global_args: GlobalArgs,
}

impl CommandLineArgs {
    pub fn parse_args() -> Self {
        let mut args = Self::parse();

        // If `NO_COLOR` is set in the environment, disable colored output
        //
        // https://no-color.org/
        if std::env::var("NO_COLOR").is_ok() {
            args.global_args.color = Mode::Never
        }

        args
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Search repositories
    ///
    /// This fetches the authenticated identity and its repositories, runs the search, and finally
    /// prints the path of the `gh` executable that was used.
    #[command(display_order = 1)]
    Search(SearchArgs),

    /// Show the login of the account `gh` is authenticated as
    #[command(display_order = 2)]
    Whoami,

    /// Inspect the repositories of the authenticated account
    #[command(display_order = 3, subcommand)]
    Repos(ReposCommand),

    /// Make raw API requests
    ///
    /// The JSON response is printed to stdout.
    /// If the request produces no result, the command fails; details are logged to stderr.
    #[command(display_order = 4, subcommand)]
    Api(ApiCommand),

    /// Print the path of the `gh` executable
    #[command(display_order = 30)]
    Locate,
}

// -----------------------------------------------------------------------------
// global options
// -----------------------------------------------------------------------------
#[derive(Args, Debug)]
#[command(next_help_heading = "Global Options")]
pub struct GlobalArgs {
    /// Enable verbose output
    ///
    /// This can be repeated up to 3 times to enable successively more output.
    #[arg(global=true, long, short, action=ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error feedback messages
    ///
    /// This silences WARNING, INFO, DEBUG, and TRACE messages.
    /// This takes precedence over the `--verbose` option.
    #[arg(global = true, long, short)]
    pub quiet: bool,

    /// Enable or disable colored output
    ///
    /// When this is "auto", colors are enabled when stdout is a tty.
    ///
    /// If the `NO_COLOR` environment variable is set, it takes precedence and is equivalent to `--color=never`.
    #[arg(global=true, long, default_value_t=Mode::Auto, value_name="MODE")]
    pub color: Mode,

    /// Write log messages in the specified format
    #[arg(global=true, long, default_value_t=LogFormatArg::Human, value_name="FORMAT")]
    pub log_format: LogFormatArg,

    #[command(flatten)]
    pub gh: GhArgs,
}

impl GlobalArgs {
    pub fn use_color<T: IsTerminal>(&self, out: T) -> bool {
        match self.color {
            Mode::Never => false,
            Mode::Always => true,
            Mode::Auto => out.is_terminal(),
        }
    }
}

#[derive(Args, Debug)]
#[command(next_help_heading = "GitHub CLI Options")]
pub struct GhArgs {
    /// Use the specified `gh` executable
    ///
    /// A bare name is searched for in the directories of the `PATH` environment variable.
    /// A value containing a path separator is used as a path.
    #[arg(
        global=true,
        long="gh",
        default_value=DEFAULT_EXECUTABLE_NAME,
        value_name="NAME_OR_PATH",
        env="GHCLI_GH",
    )]
    pub executable: String,

    /// Request the specified GitHub REST API version
    ///
    /// This is sent to GitHub in the `X-GitHub-API-Version` header of every request.
    #[arg(
        global=true,
        long,
        default_value=DEFAULT_API_VERSION,
        value_name="VERSION",
        env="GHCLI_API_VERSION",
    )]
    pub api_version: String,
}

/// A generic auto/never/always mode value
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum Mode {
    Auto,
    Never,
    Always,
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Mode::Auto => "auto",
            Mode::Never => "never",
            Mode::Always => "always",
        };
        write!(f, "{s}")
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    /// Plain text lines
    Human,

    /// One JSON object per line
    Json,
}

impl std::fmt::Display for LogFormatArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            LogFormatArg::Human => "human",
            LogFormatArg::Json => "json",
        };
        write!(f, "{s}")
    }
}

impl From<LogFormatArg> for LogFormat {
    fn from(arg: LogFormatArg) -> Self {
        match arg {
            LogFormatArg::Human => LogFormat::Human,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}

// -----------------------------------------------------------------------------
// `search` command
// -----------------------------------------------------------------------------
#[derive(Args, Debug)]
pub struct SearchArgs {
    /// The search query, e.g., `user:octocat language:rust`
    #[arg(value_name = "QUERY")]
    pub query: String,

    #[command(flatten)]
    pub output_args: OutputArgs<OutputFormat>,
}

// -----------------------------------------------------------------------------
// `repos` command
// -----------------------------------------------------------------------------
#[derive(Subcommand, Debug)]
pub enum ReposCommand {
    /// List the full names of the repositories
    List(ReposListArgs),

    /// Show the permissions granted on each repository
    Permissions(ReposPermissionsArgs),
}

#[derive(Args, Debug)]
pub struct ReposListArgs {
    #[command(flatten)]
    pub output_args: OutputArgs<OutputFormat>,
}

#[derive(Args, Debug)]
pub struct ReposPermissionsArgs {
    /// Only include repositories on which the specified permission is granted
    #[arg(long, value_name = "PERMISSION")]
    pub has: Option<String>,

    #[command(flatten)]
    pub output_args: OutputArgs<OutputFormat>,
}

// -----------------------------------------------------------------------------
// `api` command
// -----------------------------------------------------------------------------
#[derive(Subcommand, Debug)]
pub enum ApiCommand {
    /// Make a GET request
    Get(ApiGetArgs),

    /// Make a POST request
    ///
    /// Arguments after `--` are passed through to `gh api` unchanged, e.g., `-- -f title=Hello`.
    Post(ApiPostArgs),
}

#[derive(Args, Debug)]
pub struct ApiGetArgs {
    /// The API path, e.g., `/user`
    #[arg(value_name = "PATH")]
    pub path: String,
}

#[derive(Args, Debug)]
pub struct ApiPostArgs {
    /// The API path, e.g., `/repos/OWNER/REPO/issues`
    #[arg(value_name = "PATH")]
    pub path: String,

    /// Additional arguments for `gh api`
    ///
    /// These must follow `--`, so that options such as `-q` reach `gh` rather than `ghcli`.
    #[arg(value_name = "ARGS", last = true)]
    pub args: Vec<String>,
}

// -----------------------------------------------------------------------------
// output options
// -----------------------------------------------------------------------------
#[derive(Args, Debug)]
#[command(next_help_heading = "Output Options")]
pub struct OutputArgs<Format: ValueEnum + Send + Sync + 'static> {
    /// Write output to the specified path
    ///
    /// If this argument is not provided, stdout will be used.
    #[arg(long, short, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Write output in the specified format
    #[arg(long, short, value_name = "FORMAT", default_value = "human")]
    pub format: Format,
}

impl<Format: ValueEnum + Send + Sync> OutputArgs<Format> {
    /// Get a writer for the specified output destination.
    pub fn get_writer(&self) -> std::io::Result<Box<dyn std::io::Write>> {
        use std::fs::File;
        use std::io::BufWriter;

        match &self.output {
            None => Ok(Box::new(BufWriter::new(std::io::stdout()))),
            Some(p) => {
                let f = File::create(p)?;
                Ok(Box::new(BufWriter::new(f)))
            }
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum OutputFormat {
    /// A text-based format designed for humans
    Human,

    /// Pretty-printed JSON format
    Json,

    /// JSON Lines format
    ///
    /// This is a sequence of JSON values, one per line.
    Jsonl,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            OutputFormat::Human => "human",
            OutputFormat::Json => "json",
            OutputFormat::Jsonl => "jsonl",
        };
        write!(f, "{s}")
    }
}
