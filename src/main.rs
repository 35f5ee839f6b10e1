use std::path::PathBuf;
use std::process;

use clap::Parser;
use skysheet::{convert_file, ResourceConfig, Resources, SheetError};

#[derive(Parser, Debug)]
#[command(
    name = "skysheet",
    about = "Convert a SkySheet song file into an interactive HTML chord sheet"
)]
struct Args {
    /// SkySheet file to convert; the page is written beside it as <name>.html
    input: PathBuf,

    /// Directory of translation files (default: lang/ next to the program)
    #[arg(long)]
    lang_dir: Option<PathBuf>,

    /// Custom keyboard layout file (default: custom.xml next to the program)
    #[arg(long)]
    custom_layout: Option<PathBuf>,

    /// Show debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            // --help and --version are not failures
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            process::exit(code);
        }
    };

    let default_filter = if args.verbose { "skysheet=debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let config = ResourceConfig::discover(args.lang_dir, args.custom_layout);
    let resources = Resources::load(&config);

    match convert_file(&args.input, &resources) {
        Ok(output) => println!("HTML file generated: {}", output.display()),
        Err(e @ SheetError::InputNotFound(_)) => {
            eprintln!("{}", e);
            process::exit(1);
        }
        Err(e) => {
            eprintln!("Conversion error: {}", e);
            process::exit(1);
        }
    }
}
