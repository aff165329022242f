use color_eyre::eyre::{Result, WrapErr};
use simplelog::{Config, LevelFilter, WriteLogger};
use std::{
    env,
    fs::File,
    io,
    path::{Path, PathBuf},
    slice,
    time::Duration,
};
use taglog_framework::{
    ComposeWriter, CrosstermTerminal, DEBUG, DEFAULT_FRAME_SET, ERROR, FileSink, FilterOptions,
    FilterSpec, INFO, INSPECT, LiveRenderer, RendererDesc, SUCCESS, SpinnerOptions, Value, WARN,
    frame_set, live::FRAME_SETS, styles, tag, trace, values,
};
use tokio::{task::LocalSet, time::sleep};

type Writer = ComposeWriter<LiveRenderer>;

const STEP_DELAY: Duration = Duration::from_millis(700);

fn print_usage() {
    eprintln!("Usage: taglog [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --showcase, -s          Print every tag and value kind (default)");
    eprintln!("  --spinner, -p           Run a spinner with interleaved output");
    eprintln!("  --frames, -f <name>     Spinner frame set (default: {})", DEFAULT_FRAME_SET);
    eprintln!("  --file <path>           Also append every message to a file");
    eprintln!("  --json, -j              Write the file as JSON records");
    eprintln!("  --only <tag>            Console shows only this tag (repeatable)");
    eprintln!("  --exclude <tag>         Console hides this tag (repeatable)");
    eprintln!("  --list-frames, -l       List the available frame sets");
    eprintln!("  --debug-log <path>      Write internal debug logs to a file");
    eprintln!("  --help, -h              Print this help message");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Showcase,
    Spinner,
    ListFrames,
    Help,
}

struct UsageOptions {
    mode: Mode,
    frames: String,
    file: Option<PathBuf>,
    json: bool,
    only: Vec<String>,
    exclude: Vec<String>,
    debug_log: Option<PathBuf>,
}

impl Default for UsageOptions {
    fn default() -> Self {
        Self {
            mode: Mode::Showcase,
            frames: DEFAULT_FRAME_SET.to_string(),
            file: None,
            json: false,
            only: Vec::new(),
            exclude: Vec::new(),
            debug_log: None,
        }
    }
}

impl UsageOptions {
    fn from_args(args: &[String]) -> Result<Self, io::Error> {
        let mut options = Self::default();
        let mut args = args.iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--showcase" | "-s" => options.mode = Mode::Showcase,
                "--spinner" | "-p" => options.mode = Mode::Spinner,
                "--list-frames" | "-l" => options.mode = Mode::ListFrames,
                "--help" | "-h" => options.mode = Mode::Help,
                "--json" | "-j" => options.json = true,
                "--frames" | "-f" => options.frames = Self::value_of(&mut args, arg)?,
                "--file" => options.file = Some(Self::value_of(&mut args, arg)?.into()),
                "--only" => options.only.push(Self::value_of(&mut args, arg)?),
                "--exclude" => options.exclude.push(Self::value_of(&mut args, arg)?),
                "--debug-log" => options.debug_log = Some(Self::value_of(&mut args, arg)?.into()),
                _ => {
                    print_usage();
                    return Err(io::Error::new(
                        io::ErrorKind::InvalidInput,
                        format!("Unknown option: {}", arg),
                    ));
                }
            }
        }

        if options.json && options.file.is_none() {
            print_usage();
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "--json needs --file",
            ));
        }

        Ok(options)
    }

    fn value_of(args: &mut slice::Iter<'_, String>, flag: &str) -> Result<String, io::Error> {
        args.next().cloned().ok_or_else(|| {
            print_usage();
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("Missing value for {}", flag),
            )
        })
    }

    fn console_filter(&self) -> Option<FilterSpec> {
        if self.only.is_empty() && self.exclude.is_empty() {
            return None;
        }

        let mut filter = FilterOptions::new();
        if !self.only.is_empty() {
            filter = filter.only(self.only.clone());
        }
        if !self.exclude.is_empty() {
            filter = filter.exclude(self.exclude.clone());
        }
        Some(filter.into())
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;

    // Collect args excluding the binary name
    let args: Vec<String> = env::args().skip(1).collect();
    let options = UsageOptions::from_args(&args)?;

    match options.mode {
        Mode::Help => {
            print_usage();
            return Ok(());
        }
        Mode::ListFrames => {
            list_frames();
            return Ok(());
        }
        Mode::Showcase | Mode::Spinner => {}
    }

    if let Some(path) = &options.debug_log {
        init_debug_log(path)?;
    }

    // reject a bad frame set before anything is printed
    frame_set(&options.frames)?;

    // the spinner timer is a local task
    let local = LocalSet::new();
    local.run_until(run(options)).await
}

fn init_debug_log(path: &Path) -> Result<()> {
    let file = File::create(path)
        .wrap_err_with(|| format!("Cannot create debug log {}", path.display()))?;
    WriteLogger::init(LevelFilter::Debug, Config::default(), file)?;
    log::info!("taglog {} started", env!("CARGO_PKG_VERSION"));
    Ok(())
}

fn list_frames() {
    for set in FRAME_SETS {
        println!(
            "{:<14} {:>4}ms  {}",
            set.name,
            set.interval_ms,
            set.frames.join(" ")
        );
    }
}

async fn run(options: UsageOptions) -> Result<()> {
    let desc = RendererDesc {
        filter: options.console_filter(),
        ..RendererDesc::default()
    };
    let renderer = LiveRenderer::with_terminal(Box::new(CrosstermTerminal::new()), desc);
    let mut writer = ComposeWriter::new(renderer);

    if let Some(path) = &options.file {
        let sink = FileSink::new(path, options.json)
            .wrap_err_with(|| format!("Cannot open log file {}", path.display()))?;
        log::debug!("Mirroring output to {}", sink.path().display());
        writer = writer.with(sink);
    }

    match options.mode {
        Mode::Spinner => spinner_demo(&mut writer, &options.frames).await,
        _ => showcase(&mut writer),
    }
}

fn showcase(writer: &mut Writer) -> Result<()> {
    writer.print(&values![tag!(INFO, "taglog {}", env!("CARGO_PKG_VERSION"))])?;
    let destinations = writer.secondaries_len() + 1;
    writer.print(&values![tag!(DEBUG, "writing to {} destinations", destinations)])?;
    writer.print(&values![tag!(WARN, "disk usage at {}%", 91)])?;
    writer.print(&values![tag!(ERROR, "request failed: {}", "connection reset")])?;
    writer.print(&values![tag!(SUCCESS, "{} checks passed", 12)])?;

    writer.print(&values![
        styles::bold("bold"),
        styles::italic("italic"),
        styles::underline("underline"),
        styles::red("red"),
        styles::green("green"),
        styles::bg_blue(styles::white("on blue")),
    ])?;

    let config = Value::object([
        ("name", Value::from("taglog")),
        ("retries", Value::from(3)),
        ("ratio", Value::from(0.75)),
        ("pattern", Value::regex("^v\\d+", "i")),
        ("tags", Value::array([Value::from("info"), Value::from("warn")])),
        ("content-type", Value::from("text/plain")),
    ]);
    writer.print(&values![tag!(INSPECT, "config {}", &config)])?;

    let kinds = Value::array([
        Value::Null,
        Value::Undefined,
        Value::from(true),
        Value::from(f64::NAN),
        Value::function("handler"),
        Value::anonymous_function(),
        Value::class("Service"),
        Value::object(Vec::<(String, Value)>::new()),
    ]);
    writer.print(&values![tag!(INSPECT, "kinds {}", &kinds)])?;

    let node = Value::object([("id", Value::from(1))]);
    node.set("self", node.clone());
    writer.print(&values![tag!(INSPECT, "cycle {}", &node)])?;

    // blank values vanish from plain composition
    writer.print(&values!["plain", None::<&str>, false, "line"])?;

    writer.print(&values![trace("reached {}", &values!["showcase"])])?;
    Ok(())
}

async fn spinner_demo(writer: &mut Writer, frames: &str) -> Result<()> {
    let options = SpinnerOptions::new().frame_set(frames);
    writer.start_spinner("resolving dependencies", options)?;

    let steps = ["fetch", "compile", "link"];
    for (index, step) in steps.iter().enumerate() {
        sleep(STEP_DELAY).await;
        writer.print(&values![tag!(INFO, "{} finished", *step)])?;
        writer.update_spinner(&values!["running step", index + 2, "of", steps.len() + 1]);
    }

    sleep(STEP_DELAY).await;
    writer.print(&values![tag!(WARN, "cache is {}% full", 91)])?;
    writer.update_spinner(&values![
        styles::cyan("packaging"),
        "a long status line that is cut to the terminal width instead of wrapping",
    ]);

    sleep(STEP_DELAY * 2).await;
    writer.stop_spinner(&values![tag!(SUCCESS, "all {} steps done", steps.len() + 1)])?;
    Ok(())
}
