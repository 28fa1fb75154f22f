//! crates/cli/src/command.rs
//! Command-line definition and parsing into an [`Invocation`].

use std::ffi::OsString;
use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::{Arg, ArgAction, ArgMatches, Command, builder::PathBufValueParser};
use logging::Verbosity;
use runner::{Direction, SyncOptions};
use shell_io::{AdbCommand, Encoding, encoding_for_label};

const ABOUT: &str = "Synchronise a directory between this computer and an Android device \
over adb, rsync style: only newer files are copied.";

/// Everything parsed from the command line.
#[derive(Debug)]
pub(crate) struct Invocation {
    pub(crate) no_color: bool,
    pub(crate) verbosity: Verbosity,
    pub(crate) options: SyncOptions,
    pub(crate) exclude_from: Vec<PathBuf>,
    pub(crate) adb: AdbCommand,
    pub(crate) encoding: &'static Encoding,
}

fn parse_encoding(label: &str) -> Result<&'static Encoding, String> {
    encoding_for_label(label).map_err(|error| error.to_string())
}

fn path_arguments(command: Command, first: (&'static str, &'static str), second: (&'static str, &'static str)) -> Command {
    command
        .arg(
            Arg::new(first.0)
                .value_name(first.0)
                .help(first.1)
                .required(true),
        )
        .arg(
            Arg::new(second.0)
                .value_name(second.0)
                .help(second.1)
                .required(true),
        )
}

/// Builds the `clap` command.
pub(crate) fn clap_command() -> Command {
    let push = path_arguments(
        Command::new("push").about("Push from computer to phone"),
        ("LOCAL", "Local path"),
        ("ANDROID", "Android path"),
    );
    let pull = path_arguments(
        Command::new("pull").about("Pull from phone to computer"),
        ("ANDROID", "Android path"),
        ("LOCAL", "Local path"),
    );

    Command::new("adbsync")
        .version(env!("CARGO_PKG_VERSION"))
        .about(ABOUT)
        .subcommand_required(true)
        .subcommand_value_name("DIRECTION")
        .subcommand(push)
        .subcommand(pull)
        .arg(
            Arg::new("no-color")
                .long("no-color")
                .help("Disable coloured logging")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Increase logging verbosity: -v for debug")
                .action(ArgAction::Count)
                .conflicts_with("quiet"),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .short('q')
                .help("Decrease logging verbosity: -q for warnings, -qq for errors, -qqqq for silence")
                .action(ArgAction::Count),
        )
        .arg(
            Arg::new("dry-run")
                .long("dry-run")
                .short('n')
                .help("Perform a dry run; do not actually copy or delete anything")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("copy-links")
                .long("copy-links")
                .short('L')
                .help("Follow symlinks and copy their referent file or directory")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("exclude")
                .long("exclude")
                .value_name("PATTERN")
                .help("fnmatch pattern to ignore, relative to the destination (repeatable)")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("exclude-from")
                .long("exclude-from")
                .value_name("FILE")
                .help("File with one exclude pattern per line (repeatable)")
                .value_parser(PathBufValueParser::new())
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("del")
                .long("del")
                .help("Delete files at the destination that are not in the source")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("delete-excluded")
                .long("delete-excluded")
                .help("Delete files at the destination that are excluded")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("force")
                .long("force")
                .help("Allow files to overwrite folders and folders to overwrite files")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("show-progress")
                .long("show-progress")
                .help("Show progress from 'adb push' and 'adb pull'")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("adb-encoding")
                .long("adb-encoding")
                .value_name("ENCODING")
                .help("Text encoding of the adb shell")
                .default_value("UTF-8")
                .value_parser(parse_encoding),
        )
        .arg(
            Arg::new("adb-bin")
                .long("adb-bin")
                .value_name("BIN")
                .help("adb binary to run")
                .default_value("adb")
                .help_heading("ADB arguments"),
        )
        .arg(
            Arg::new("adb-flag")
                .long("adb-flag")
                .value_name("FLAG")
                .help("Flag to call adb with, e.g. '--adb-flag d' for adb -d")
                .action(ArgAction::Append)
                .allow_hyphen_values(true)
                .help_heading("ADB arguments"),
        )
        .arg(
            Arg::new("adb-option")
                .long("adb-option")
                .value_names(["OPTION", "VALUE"])
                .num_args(2)
                .help("Option to call adb with, e.g. '--adb-option P 5037' for adb -P 5037")
                .action(ArgAction::Append)
                .help_heading("ADB arguments"),
        )
}

fn strings(matches: &ArgMatches, id: &str) -> Vec<String> {
    matches
        .get_many::<String>(id)
        .map(|values| values.cloned().collect())
        .unwrap_or_default()
}

/// Parses `arguments`, the program name included.
pub(crate) fn parse_args<I, S>(arguments: I) -> Result<Invocation, clap::Error>
where
    I: IntoIterator<Item = S>,
    S: Into<OsString> + Clone,
{
    let matches = clap_command().try_get_matches_from(arguments)?;

    let (direction, local_path, android_path) = match matches.subcommand() {
        Some(("push", paths)) => (Direction::Push, first(paths, "LOCAL"), first(paths, "ANDROID")),
        Some(("pull", paths)) => (Direction::Pull, first(paths, "LOCAL"), first(paths, "ANDROID")),
        _ => {
            return Err(clap_command().error(ErrorKind::MissingSubcommand, "expected push or pull"));
        }
    };

    let mut options = SyncOptions::new(direction, local_path, android_path);
    options.dry_run = matches.get_flag("dry-run");
    options.copy_links = matches.get_flag("copy-links");
    options.excludes = strings(&matches, "exclude");
    options.delete = matches.get_flag("del");
    options.delete_excluded = matches.get_flag("delete-excluded");
    options.force = matches.get_flag("force");
    options.show_progress = matches.get_flag("show-progress");

    let program = matches
        .get_one::<String>("adb-bin")
        .map_or("adb", String::as_str);
    let mut adb = AdbCommand::new(program);
    for flag in strings(&matches, "adb-flag") {
        adb.push_flag(&flag);
    }
    if let Some(occurrences) = matches.get_occurrences::<String>("adb-option") {
        for mut pair in occurrences {
            if let (Some(option), Some(value)) = (pair.next(), pair.next()) {
                adb.push_option(option, value);
            }
        }
    }

    Ok(Invocation {
        no_color: matches.get_flag("no-color"),
        verbosity: Verbosity::new(matches.get_count("verbose"), matches.get_count("quiet")),
        options,
        exclude_from: matches
            .get_many::<PathBuf>("exclude-from")
            .map(|values| values.cloned().collect())
            .unwrap_or_default(),
        adb,
        encoding: matches
            .get_one::<&'static Encoding>("adb-encoding")
            .copied()
            .unwrap_or(encoding_rs::UTF_8),
    })
}

fn first(matches: &ArgMatches, id: &str) -> String {
    matches.get_one::<String>(id).cloned().unwrap_or_default()
}
