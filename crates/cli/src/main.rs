mod config;

use config::Config;

use std::fmt::Display;
use std::io::{self, Read};

use chrono::{DateTime, Utc};
use clap::Parser;
use colored::{control::set_override, Colorize};
use is_terminal::IsTerminal;
use postdate_core::{
    load_post, parse_post, BlockAttributes, BlockRenderer, DateResolver, DisplayType,
    FieldSelector, FormatSpec, LazySnapshot, PostDocument, ResolverConfig, Source, TextAlign,
    REGISTERED_FIELDS,
};
use tracing_subscriber::{filter::LevelFilter, EnvFilter};

const LONG_ABOUT: &str = r##"
Renders the post date block for a post document.

The block shows the post's publish date, its last-modified date, or a date
stored in a custom field, formatted with PHP date() tokens or as a relative
time ("3 days ago").

INPUT:
  A post as returned by the REST API (id, date, modified, link, meta):
    postdate post.json
    curl -s https://example.com/wp-json/wp/v2/posts/42 | postdate
    postdate - < post.json

EXAMPLES:
  postdate post.json                      Publish date in the site format
  postdate post.json --modified           Modified date (nothing if never modified)
  postdate post.json --format human-diff  Relative time
  postdate post.json --format 'Y-m-d'     Custom pattern
  postdate post.json --source release_date
  postdate post.json --link --align center
  postdate post.json --json               Print the resolution as JSON

OUTPUT:
  Prints the block's HTML. Prints nothing (and exits 0) when there is
  nothing to show, e.g. --modified on a post that was never modified.

  With --preview, an unreadable custom field renders "Invalid date" instead
  of nothing, as the editor preview does.

CONFIGURATION:
  Settings can be configured via CLI flags, environment variables, or config file.
  Precedence: CLI args > Environment vars > Config file > Defaults

  Setting          | CLI flag       | Env var               | Default
  -----------------|----------------|-----------------------|-------------------
  site_date_format | --date-format  | POSTDATE_DATE_FORMAT  | F j, Y
  utc_offset       | --utc-offset   | POSTDATE_UTC_OFFSET   | +00:00
  block_class      | --block-class  | POSTDATE_BLOCK_CLASS  | wp-block-post-date
  no_color         | -C, --no-color | POSTDATE_NO_COLOR     | false

  Config file location: postdate --config-path
  Generate default config: postdate --config-init

  Note: NO_COLOR env var is also respected (https://no-color.org/)"##;

#[derive(Parser)]
#[command(name = "postdate")]
#[command(version)]
#[command(about = "Render a post date block from a post document")]
#[command(long_about = LONG_ABOUT)]
struct Cli {
    /// Post document (JSON) to render, or - for stdin
    ///
    /// Piped input is read automatically when omitted.
    #[arg(value_name = "POST")]
    post: Option<String>,

    /// Block attributes as JSON, in the shape the editor saves them
    ///
    /// The other block flags override what this sets.
    #[arg(long, value_name = "JSON")]
    attributes: Option<String>,

    /// Where the date comes from: postDate or a custom field key
    #[arg(long, short = 's', value_name = "SOURCE")]
    source: Option<String>,

    /// Show the last-modified date instead of the publish date
    #[arg(long, short = 'm')]
    modified: bool,

    /// Date format: PHP date() pattern, or human-diff for relative time
    #[arg(long, short = 'f', value_name = "FORMAT")]
    format: Option<String>,

    /// Link the date to the post's permalink
    #[arg(long, short = 'l')]
    link: bool,

    /// Text alignment class (left, center, right)
    #[arg(long, short = 'a', value_name = "ALIGN")]
    align: Option<TextAlign>,

    /// Link color from the block style (adds has-link-color)
    #[arg(long, value_name = "COLOR")]
    link_color: Option<String>,

    /// Render as the editor preview: unreadable custom fields show "Invalid date"
    #[arg(long)]
    preview: bool,

    /// Reference time for relative dates (RFC 3339, default: now)
    #[arg(long, value_name = "TIME")]
    now: Option<String>,

    /// Output the resolution as JSON (for scripting/piping)
    #[arg(long, short = 'j')]
    json: bool,

    /// List the registered custom fields and their defaults
    #[arg(long)]
    fields: bool,

    /// Site date format used when no --format is given
    #[arg(long, value_name = "PATTERN")]
    date_format: Option<String>,

    /// Site UTC offset, applied to dates without one (e.g. +02:00)
    #[arg(long, value_name = "OFFSET", allow_hyphen_values = true)]
    utc_offset: Option<String>,

    /// Base class of the wrapper element
    #[arg(long, value_name = "CLASS")]
    block_class: Option<String>,

    /// Disable colored output
    #[arg(long, short = 'C')]
    no_color: bool,

    /// Enable verbose logging (use multiple times for more detail)
    ///
    /// -v shows debug messages, -vv shows trace messages.
    /// Useful for understanding why a date was or wasn't rendered.
    #[arg(long, short = 'v', action = clap::ArgAction::Count)]
    verbose: u8,

    /// Show config file path
    #[arg(long)]
    config_path: bool,

    /// Generate default config file (see --config-path for location)
    #[arg(long)]
    config_init: bool,
}

fn exit_with_error(message: impl Display) -> ! {
    eprintln!("{}: {}", "error".red().bold(), message);
    std::process::exit(1);
}

fn main() {
    let cli = Cli::parse();

    // Handle --config-path
    if cli.config_path {
        match Config::path() {
            Some(path) => println!("{}", path.display()),
            None => exit_with_error("Cannot determine config directory"),
        }
        return;
    }

    // Handle --config-init
    if cli.config_init {
        match config::init_config() {
            Ok(path) => println!("Created config file: {}", path.display()),
            Err(e) => exit_with_error(e),
        }
        return;
    }

    // Initialize tracing based on verbosity level (before config loading for logging)
    let level = match cli.verbose {
        0 => LevelFilter::OFF,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    if level != LevelFilter::OFF {
        let filter = EnvFilter::builder()
            .with_default_directive(level.into())
            .from_env_lossy();
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }

    // Load config file and merge with CLI args
    // Precedence: CLI args > Environment vars > Config file > Defaults
    let file_config = Config::load();

    if let Some(path) = Config::path() {
        if path.exists() {
            tracing::debug!("Loaded config from: {}", path.display());
        } else {
            tracing::trace!("No config file at: {}", path.display());
        }
    }

    if cli.no_color || file_config.no_color() {
        set_override(false);
    }

    if cli.fields {
        print_fields(cli.json);
        return;
    }

    let site_date_format = if let Some(f) = cli.date_format.clone() {
        tracing::debug!("site_date_format = {} (from CLI)", f);
        f
    } else {
        let f = file_config.site_date_format();
        let source = setting_source("POSTDATE_DATE_FORMAT", file_config.site_date_format.is_some());
        tracing::debug!("site_date_format = {} (from {})", f, source);
        f
    };

    let utc_offset = if let Some(raw) = cli.utc_offset.as_deref() {
        let offset = config::parse_utc_offset(raw).unwrap_or_else(|e| exit_with_error(e));
        tracing::debug!("utc_offset = {} (from CLI)", offset);
        offset
    } else {
        let offset = file_config.utc_offset().unwrap_or_else(|e| exit_with_error(e));
        let source = setting_source("POSTDATE_UTC_OFFSET", file_config.utc_offset.is_some());
        tracing::debug!("utc_offset = {} (from {})", offset, source);
        offset
    };

    let block_class = if let Some(c) = cli.block_class.clone() {
        tracing::debug!("block_class = {} (from CLI)", c);
        c
    } else {
        let c = file_config.block_class();
        let source = setting_source("POSTDATE_BLOCK_CLASS", file_config.block_class.is_some());
        tracing::debug!("block_class = {} (from {})", c, source);
        c
    };

    let now = match cli.now.as_deref() {
        Some(raw) => DateTime::parse_from_rfc3339(raw)
            .unwrap_or_else(|e| exit_with_error(format!("invalid --now '{raw}': {e}"))),
        None => Utc::now().with_timezone(&utc_offset),
    };

    let attrs = block_attributes(&cli).unwrap_or_else(|e| exit_with_error(e));
    let selector = attrs.selector();
    tracing::debug!(selector = %selector, "resolving");

    let document = read_document(cli.post.as_deref()).unwrap_or_else(|e| exit_with_error(e));
    let mut record = document
        .record(utc_offset)
        .unwrap_or_else(|e| exit_with_error(e));
    tracing::debug!(record = record.id, "loaded post");

    // Custom fields are only fetched when the block reads one
    let store = document.meta_store();
    let meta = LazySnapshot::new(&store, record.id);
    if let FieldSelector::CustomField(_) = selector {
        let snapshot = meta.get().unwrap_or_else(|e| exit_with_error(e));
        tracing::debug!(fields = snapshot.len(), "loaded custom fields");
        record = record.with_meta(snapshot);
    }
    let permalink = document.permalink();

    let resolver = DateResolver::with_config(ResolverConfig {
        site_date_format,
        utc_offset,
        strict: cli.preview,
    });
    let renderer = BlockRenderer::new(resolver).with_block_class(block_class);
    let resolution = renderer.resolve(&attrs, Some(&record), permalink, &now);

    if cli.json {
        match serde_json::to_string_pretty(&resolution) {
            Ok(json) => println!("{json}"),
            Err(e) => exit_with_error(format!("Failed to serialize result: {e}")),
        }
        return;
    }

    let html = renderer.markup(&attrs, &resolution);
    if html.is_empty() {
        tracing::debug!("nothing to render");
    } else {
        println!("{html}");
    }
}

/// Block attributes from `--attributes`, with the individual flags on top.
fn block_attributes(cli: &Cli) -> Result<BlockAttributes, String> {
    let mut attrs = match cli.attributes.as_deref() {
        Some(json) => serde_json::from_str::<BlockAttributes>(json)
            .map_err(|e| format!("invalid --attributes: {e}"))?,
        None => BlockAttributes::default(),
    };

    if let Some(align) = cli.align {
        attrs.text_align = Some(align);
    }
    if let Some(format) = &cli.format {
        attrs.format = Some(FormatSpec::from(format.as_str()));
    }
    if cli.link {
        attrs.is_link = true;
    }
    if cli.modified {
        attrs.display_type = DisplayType::Modified;
    }
    if let Some(source) = &cli.source {
        attrs.source = Source::from(source.as_str());
    }
    if let Some(color) = &cli.link_color {
        attrs = attrs.with_link_color(color.as_str());
    }
    Ok(attrs)
}

fn setting_source(env_name: &str, in_file: bool) -> String {
    if std::env::var(env_name).is_ok() {
        format!("env {env_name}")
    } else if in_file {
        "config file".to_string()
    } else {
        "default".to_string()
    }
}

/// Read the post document from a path, `-`, or piped stdin.
fn read_document(post: Option<&str>) -> Result<PostDocument, String> {
    let stdin_is_pipe = !io::stdin().is_terminal();
    match post {
        Some("-") => read_stdin_document(),
        Some(path) => load_post(path).map_err(|e| e.to_string()),
        None if stdin_is_pipe => read_stdin_document(),
        None => Err(format!(
            "No input provided\n\nUsage: {} <POST>\n\nRun {} for more information.",
            "postdate".bold(),
            "postdate --help".bold()
        )),
    }
}

fn read_stdin_document() -> Result<PostDocument, String> {
    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .map_err(|e| format!("Failed to read stdin: {e}"))?;
    if buffer.trim().is_empty() {
        return Err("Empty input".to_string());
    }
    parse_post(&buffer).map_err(|e| e.to_string())
}

fn print_fields(json: bool) {
    if json {
        match serde_json::to_string_pretty(REGISTERED_FIELDS) {
            Ok(out) => println!("{out}"),
            Err(e) => exit_with_error(format!("Failed to serialize fields: {e}")),
        }
        return;
    }

    println!("{}", "Registered custom fields:".bold());
    for field in REGISTERED_FIELDS {
        println!(
            "  {:<14} {} {}",
            field.key.cyan(),
            field.value_type,
            format!("(default: {})", field.default).dimmed()
        );
    }
}
