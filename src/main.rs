use std::path::PathBuf;

use clap::{
    crate_authors, crate_description, crate_name, crate_version, value_parser, Arg, ArgAction,
    ArgMatches, Command,
};
use colored::Colorize;
use kaigyo::{
    api::{self, ConvertOptions},
    convert::is_conversion_available,
    project::Project,
    transactions::FinalTransactionState,
    Separator,
};

// The CLI layer should only parse inputs and forward them to library code.
fn main() -> miette::Result<()> {
    let matches = Command::new(crate_name!())
        .about(crate_description!())
        .author(crate_authors!())
        .version(crate_version!())
        .subcommand_required(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose output")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("project")
                .short('p')
                .long("project")
                .help("Project directory; defaults to the closest one holding a .kaigyo directory")
                .value_parser(value_parser!(PathBuf))
                .global(true),
        )
        .subcommand(
            Command::new("convert")
                .about("Converts the line separators of every text file under the given paths")
                .arg(
                    Arg::new("to")
                        .short('t')
                        .long("to")
                        .help("Target separator: crlf, lf or cr (defaults to the project config)")
                        .value_parser(parse_separator),
                )
                .arg(
                    Arg::new("dry-run")
                        .short('n')
                        .long("dry-run")
                        .help("Report what would change without writing anything")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("confirm")
                        .long("confirm")
                        .help("Ask before keeping the changes and roll them back on 'no'")
                        .action(ArgAction::SetTrue)
                        .conflicts_with("dry-run"),
                )
                .arg(
                    Arg::new("paths")
                        .help("Files and directories to convert")
                        .value_parser(value_parser!(PathBuf))
                        .num_args(0..),
                ),
        )
        .subcommand(
            Command::new("detect")
                .about("Shows the line separators used by every text file under the given paths")
                .arg(
                    Arg::new("paths")
                        .help("Files and directories to inspect")
                        .value_parser(value_parser!(PathBuf))
                        .num_args(1..)
                        .required(true),
                ),
        )
        .get_matches();

    let is_verbose = matches.get_flag("verbose");

    init_logging(is_verbose);

    let project = open_project(&matches)?;

    match matches.subcommand() {
        Some(("convert", args)) => handle_convert(args, &project, is_verbose),
        Some(("detect", args)) => handle_detect(args, &project),
        _ => unreachable!(),
    }
}

fn parse_separator(value: &str) -> Result<Separator, gyou::errors::SeparatorError> {
    value.parse()
}

fn init_logging(is_verbose: bool) {
    let default_filter = if is_verbose { "debug" } else { "warn" };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

fn open_project(matches: &ArgMatches) -> miette::Result<Project> {
    let project = match matches.get_one::<PathBuf>("project") {
        Some(dir) => Project::open(dir),
        None => {
            let cwd = std::env::current_dir().map_err(|error| {
                miette::miette!("unable to read the current directory: {}", error)
            })?;
            Project::discover(&cwd)
        }
    }?;

    log::debug!("using project at {}", project.base_dir.display());

    Ok(project)
}

fn selection(args: &ArgMatches) -> Vec<PathBuf> {
    args.get_many::<PathBuf>("paths")
        .map(|paths| paths.cloned().collect())
        .unwrap_or_default()
}

fn handle_convert(args: &ArgMatches, project: &Project, is_verbose: bool) -> miette::Result<()> {
    let selection = selection(args);

    if selection.is_empty() {
        println!("{}", "Nothing selected, nothing to convert".yellow());
        return Ok(());
    }

    let target = api::resolve_target(project, args.get_one::<Separator>("to").copied())?;

    if !is_conversion_available(&selection, target) {
        println!(
            "{} already uses {}",
            selection[0].display(),
            target.to_string().bold()
        );
        return Ok(());
    }

    let options = ConvertOptions {
        target: Some(target),
        dry_run: args.get_flag("dry-run"),
        confirm: args.get_flag("confirm"),
        verbose: is_verbose,
    };

    let Some(result) = api::convert_paths(Some(project), &selection, &options)? else {
        return Ok(());
    };

    if let FinalTransactionState::Canceled(trx) = result.state {
        let restored = trx.changes().len();
        drop(trx);
        println!("{} {} file(s) restored", "rolled back".red(), restored);
    }

    if result.report.failed() > 0 {
        return Err(miette::miette!(
            "{} file(s) could not be converted",
            result.report.failed()
        ));
    }

    Ok(())
}

fn handle_detect(args: &ArgMatches, project: &Project) -> miette::Result<()> {
    let results = api::detect_paths(project, &selection(args))?;

    for (path, census) in &results {
        match census {
            Ok(census) => match census.dominant() {
                None => println!("{}: {}", path.display(), "none".dimmed()),
                Some(dominant) if census.is_mixed() => println!(
                    "{}: {} (mixed: CRLF {}, LF {}, CR {})",
                    path.display(),
                    dominant.to_string().yellow(),
                    census.crlf,
                    census.lf,
                    census.cr
                ),
                Some(dominant) => println!("{}: {}", path.display(), dominant.to_string().green()),
            },
            Err(error) => println!("{} {}: {}", "fail".red(), error, error.source),
        }
    }

    Ok(())
}
