//! Handling of the command line interface
//!
//! This module handles the command line parsing as well as basic information (e.g. help dialog, version information, etc.).
use crate::{
    error::{ParaxError, ParaxResult},
    get_version,
};
use clap::{builder::Str, Parser};
use itertools::Itertools;
use rprompt::prompt_reply_from_bufread;
use std::{
    io::{stdin, stdout, BufRead, BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

/// File extensions accepted for system documents.
const VALID_EXTENSIONS: [&str; 2] = ["yaml", "yml"];

/// Command line arguments for the paraxial raytracer.
pub struct Args {
    /// file path of the system document, which should be read in
    pub file_path: PathBuf,
    /// optional file path of the csv export of the propagation result
    pub csv_path: Option<PathBuf>,
}

/// Raw command line arguments as parsed by clap.
///
/// Missing or invalid paths are requested interactively when converting into [`Args`].
#[derive(Parser)]
#[command(author, version = Str::from(&get_version()), about, long_about = None)]
pub struct PartialArgs {
    /// filepath of the system document (yaml) to read in
    #[arg(short, long)]
    file_path: Option<String>,

    /// filepath of the csv file the propagation result is written to
    #[arg(short, long)]
    csv: Option<String>,
}

/// Checks if the passed file path points to an existing system document.
fn file_path_is_valid(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| VALID_EXTENSIONS.contains(&ext))
}

fn eval_file_path_input(file_path: &str) -> Option<PathBuf> {
    let path = Path::new(file_path.trim());
    if file_path_is_valid(path) {
        Some(path.to_path_buf())
    } else {
        None
    }
}

/// Evaluates the csv output path.
///
/// An empty input disables the csv export. Otherwise the parent directory of the file must exist.
fn eval_csv_path_input(csv_path: &str) -> Option<Option<PathBuf>> {
    let csv_path = csv_path.trim();
    if csv_path.is_empty() {
        return Some(None);
    }
    let path = Path::new(csv_path);
    if path.is_dir() {
        return None;
    }
    match path.parent() {
        Some(parent) if parent.as_os_str().is_empty() || parent.is_dir() => {
            Some(Some(path.to_path_buf()))
        }
        _ => None,
    }
}

/// Creates the prompt string for the given argument flag ("f" for the system document, "c" for the csv export).
///
/// # Errors
/// This function returns an error if an invalid flag has been used.
fn create_prompt_str(flag: &str, init_str: &str) -> ParaxResult<String> {
    let prompt_str = init_str.to_owned();
    match flag {
        "f" => Ok(prompt_str
            + &format!(
                "Please insert path to the system document ({}):\n",
                VALID_EXTENSIONS.iter().join(", ")
            )),
        "c" => Ok(prompt_str
            + "Please insert a path for the csv export or nothing to skip the export:\n"),
        _ => Err(ParaxError::Console(
            "Invalid flag type! Cannot create prompt string!".into(),
        )),
    }
}

/// Extracts an argument, prompting the user until a valid input was given.
///
/// `reader` may be `stdin().lock()` for user input or a `BufReader` from a static string for tests.
///
/// # Errors
/// This function returns an error if the prompt string cannot be created or reading the reply fails.
fn get_args<T>(
    func: fn(&str) -> Option<T>,
    input: Option<&str>,
    arg_flag: &str,
    reader: &mut impl BufRead,
    writer: &mut impl Write,
) -> ParaxResult<T> {
    let init_str = match input.map(func) {
        Some(Some(arg)) => return Ok(arg),
        Some(None) => "Invalid input!\n",
        None => "",
    };
    let prompt_str = create_prompt_str(arg_flag, init_str)?;
    let reply = prompt_reply_from_bufread(reader, writer, prompt_str)
        .map_err(|e| ParaxError::Console(format!("reading user input failed: {e}")))?;
    get_args(func, Some(reply.as_str()), arg_flag, reader, writer)
}

impl TryFrom<PartialArgs> for Args {
    type Error = ParaxError;

    fn try_from(part_args: PartialArgs) -> ParaxResult<Self> {
        let mut reader = BufReader::new(stdin().lock());
        let mut writer = BufWriter::new(stdout().lock());
        show_intro();

        let file_path = get_args(
            eval_file_path_input,
            part_args.file_path.as_deref(),
            "f",
            &mut reader,
            &mut writer,
        )?;
        println!("Path to system document: {}", file_path.display());

        let csv_path = match part_args.csv.as_deref() {
            Some(csv) => get_args(
                eval_csv_path_input,
                Some(csv),
                "c",
                &mut reader,
                &mut writer,
            )?,
            None => None,
        };
        if let Some(csv_path) = &csv_path {
            println!("Path to csv export: {}", csv_path.display());
        }
        Ok(Self {
            file_path,
            csv_path,
        })
    }
}

/// Show the program name and the version information.
pub fn show_intro() {
    println!(
        "{: ^80}\n{: ^80}\n",
        "paraxial - ABCD matrix raytracing",
        format!("version {}", get_version())
    );
}
