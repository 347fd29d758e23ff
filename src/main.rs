use blocktree::config::Config;
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(
    name = "blocktree",
    about = "Render a Music Blocks project as an indented block tree"
)]
struct Cli {
    /// Project JSON file
    #[arg(default_value = "input.json")]
    input: PathBuf,

    /// Output file ("-" for stdout)
    #[arg(short, long, default_value = "output.txt")]
    output: PathBuf,

    /// Config file path
    #[arg(long)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn die(msg: &str) -> ! {
    log::error!("{}", msg);
    process::exit(1);
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .format_target(false)
        .init();
}

fn load_config(path: &PathBuf) -> Config {
    let text = fs::read_to_string(path).unwrap_or_else(|e| die(&format!("cannot read config: {}", e)));
    serde_json::from_str(&text).unwrap_or_else(|e| die(&format!("invalid config JSON: {}", e)))
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = if let Some(ref config_path) = cli.config {
        load_config(config_path)
    } else {
        let defaults = ["blocktree.config.json", "config/blocktree.config.json"];
        defaults
            .iter()
            .map(PathBuf::from)
            .find(|p| p.is_file())
            .map(|p| load_config(&p))
            .unwrap_or_default()
    };

    let text = fs::read_to_string(&cli.input)
        .unwrap_or_else(|e| die(&format!("cannot read {}: {}", cli.input.display(), e)));

    if cli.output.as_os_str() == "-" {
        match blocktree::render(&text, &config) {
            Ok(Some(report)) => println!("{}", report),
            Ok(None) => {}
            Err(e) => die(&format!("{}: {}", cli.input.display(), e)),
        }
        return;
    }

    match blocktree::convert_to_file(&text, &cli.output, &config) {
        Ok(true) => log::info!(
            "converted {} -> {}",
            cli.input.display(),
            cli.output.display()
        ),
        Ok(false) => {}
        Err(e) => die(&format!("{}: {}", cli.input.display(), e)),
    }
}
