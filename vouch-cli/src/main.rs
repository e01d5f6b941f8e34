use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};
use std::path::PathBuf;
use vouch::{Action, ColorChoice, Config, Context, Stringify};

#[derive(Parser)]
#[command(name = "vouch-demo")]
#[command(version = "0.2.0")]
#[command(about = "Shows what vouch assertion reports look like", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run failing assertions and print their reports
    Run {
        /// Sections to run (default: all)
        #[arg(value_enum, value_name = "SECTION")]
        sections: Vec<Section>,

        /// When to use colors
        #[arg(long, value_enum)]
        color: Option<ColorArg>,

        /// Report width (default: terminal width)
        #[arg(short, long, value_name = "COLUMNS")]
        width: Option<usize>,

        /// Configuration file (default: nearest vouch.json)
        #[arg(short, long, value_name = "PATH")]
        config: Option<PathBuf>,

        /// What to do after a fatal failure
        #[arg(long, value_enum, default_value = "continue")]
        action: ActionArg,

        /// Leave out stack traces
        #[arg(long)]
        no_stack_trace: bool,
    },

    /// Print an example vouch.json
    Config {
        /// Write it to this file instead
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Section {
    Strings,
    Pointers,
    Numbers,
    Floats,
    Containers,
    Messages,
    Decomposition,
    Enums,
    Errors,
    Recursion,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ColorArg {
    Auto,
    Always,
    Never,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ActionArg {
    Abort,
    Panic,
    Continue,
}

impl From<ColorArg> for ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => ColorChoice::Auto,
            ColorArg::Always => ColorChoice::Always,
            ColorArg::Never => ColorChoice::Never,
        }
    }
}

impl From<ActionArg> for Action {
    fn from(arg: ActionArg) -> Self {
        match arg {
            ActionArg::Abort => Action::Abort,
            ActionArg::Panic => Action::Panic,
            ActionArg::Continue => Action::Continue,
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            sections,
            color,
            width,
            config,
            action,
            no_stack_trace,
        } => {
            let mut config = match config {
                Some(path) => Config::from_file(&path)
                    .with_context(|| format!("loading {}", path.display()))?
                    .with_env(),
                None => Config::load(),
            };
            if let Some(color) = color {
                config.color = color.into();
            }
            if width.is_some() {
                config.width = width;
            }
            if no_stack_trace {
                config.stack_trace = false;
            }
            config.action = action.into();
            log::info!("running with {:?}", config);

            install(config);
            let sections = if sections.is_empty() {
                Section::value_variants().to_vec()
            } else {
                sections
            };
            for section in sections {
                log::debug!("section {:?}", section);
                run_section(section);
            }
            vouch::teardown();
            Ok(())
        }

        Commands::Config { output } => {
            let example = Config::example();
            match output {
                Some(path) => {
                    std::fs::write(&path, example)
                        .with_context(|| format!("writing {}", path.display()))?;
                    println!("Wrote {}", path.display());
                }
                None => println!("{}", example),
            }
            Ok(())
        }
    }
}

/// Continuing runs print every report; the other actions use the built-in handlers.
fn install(config: Config) {
    let continuing = config.action == Action::Continue;
    let context = Context::new(config);
    if continuing {
        context
            .on_failure(|_, _, report| eprintln!("{}", report.render_for_terminal()))
            .install();
    } else {
        context.install();
    }
}

fn run_section(section: Section) {
    match section {
        Section::Strings => strings(),
        Section::Pointers => pointers(),
        Section::Numbers => numbers(),
        Section::Floats => floats(),
        Section::Containers => containers(),
        Section::Messages => messages(),
        Section::Decomposition => decomposition(),
        Section::Enums => enums(),
        Section::Errors => errors(),
        Section::Recursion => recursion(),
    }
}

fn strings() {
    let greeting = String::from("hello\tworld");
    vouch::assert!(greeting == "hello world");
    let path = std::path::Path::new("/tmp/vouch");
    vouch::assert!(path.is_relative(), path);
}

fn pointers() {
    let value = 5;
    let ptr: *const i32 = &value;
    let null: *const i32 = std::ptr::null();
    vouch::assert!(ptr == null);
    vouch::assert!(null);
}

fn numbers() {
    let flags: u16 = 0b110010101;
    vouch::assert!(flags == 0b101010);
    vouch::assert!(flags & 0x0f00 == 0x0200);
    let byte = b'q';
    vouch::assert!(byte == b'Q');
    let mut counter = 3;
    vouch::check!(counter -= 3);
    vouch::assert!(-7i64 > 0o17);
}

fn floats() {
    let third = 1.0 / 3.0;
    vouch::assert!(third * 3.0 != 1.0);
    vouch::assert!(0.1 + 0.2 == 0.3);
}

fn containers() {
    let values = vec![2, 4, 8, 16];
    vouch::assert!(values.len() == 5, values);

    let mut m1: BTreeMap<String, Vec<i32>> = BTreeMap::new();
    m1.insert("foo".into(), vec![1, -2, 3, -4]);
    m1.insert("bar".into(), vec![-100, 200, 400, -800]);
    vouch::assert!(m1.is_empty(), m1);

    let set: BTreeSet<&str> = ["a", "b"].into_iter().collect();
    let queue: VecDeque<(u8, char)> = [(1, 'x'), (2, 'y')].into_iter().collect();
    let lookup: HashMap<u32, Option<bool>> = [(7, Some(true))].into_iter().collect();
    vouch::assert!(set.contains("c"), set, queue, lookup);
}

fn messages() {
    vouch::assert!(false, "foo", 2);
    let user = "ada";
    vouch::assert!(
        user.len() > 10,
        format!(
            "user name {:?} is too short for this deliberately long message that wraps",
            user
        )
    );
}

fn decomposition() {
    let calls = std::cell::Cell::new(0);
    let next = || {
        calls.set(calls.get() + 1);
        calls.get()
    };
    vouch::assert!(next() > next());
    vouch::assert!(false && next() == 1);
    let total: i32 = vouch::verify!(next() + next() == 0);
    log::info!("verify handed back {}", total);
}

#[derive(Stringify, PartialEq)]
enum Shape {
    Point,
    Circle(f64),
    Rect { w: u32, h: u32 },
}

#[derive(Debug, PartialEq)]
struct Ticket {
    id: u32,
    tags: Vec<&'static str>,
}

fn enums() {
    let shape = Shape::Rect { w: 3, h: 4 };
    vouch::assert!(shape == Shape::Point);
    vouch::assert!(Shape::Circle(1.5) == Shape::Circle(2.5));
    vouch::assert!(std::cmp::Ordering::Less == 3i32.cmp(&2));

    let ticket = Ticket {
        id: 7,
        tags: vec!["urgent", "bug"],
    };
    vouch::assert!(ticket.tags.is_empty(), ticket);
}

fn errors() {
    let error = std::fs::File::open("/definitely/not/here").map(|_| ());
    vouch::assert!(error.is_ok(), error.err());
}

fn recurse(depth: u32) {
    if depth == 0 {
        vouch::assert!(depth == 1, "bottom of the recursion");
        return;
    }
    recurse(depth - 1);
}

fn recursion() {
    recurse(10);
}
