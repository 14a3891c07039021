use std::collections::VecDeque;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use rectplot::{read_rectangles, render_rectangles, RectangleSet, RenderError, RenderParams};
use rten_tensor::prelude::*;

mod output;
use output::{
    default_output_path, format_json_output, image_format_for_path, write_file_atomic,
    write_image, FormatJsonArgs, OutputFormat,
};

/// Exit status for invalid command-line arguments.
const USAGE_EXIT_CODE: i32 = 2;

#[derive(Debug, PartialEq)]
struct Args {
    /// Path to rectangle listing.
    input: String,

    /// Output file path. Defaults to the input path with a new extension.
    output_path: Option<String>,

    output_format: OutputFormat,

    /// Label vertices with their coordinates.
    show_coords: bool,

    /// Enable debug output.
    debug: bool,
}

/// Action selected by the command line.
#[derive(Debug, PartialEq)]
enum Command {
    Run(Args),

    /// Print the contained help text and exit.
    Help(String),
}

fn usage(bin_name: &str) -> String {
    format!("Usage: {bin_name} [OPTIONS] <input-file> [<output-file>]")
}

fn help(bin_name: &str) -> String {
    format!(
        "Plot rectangles from a floorplan listing.

{usage}

The input has one rectangle per line, written as four vertices
\"(x1 y1) (x2 y2) (x3 y3) (x4 y4)\". The last line of the file is ignored.

The output path defaults to the input path with a \".png\" extension. The
image format is chosen from the output extension (png, jpeg or webp).

Options:

  -c, --coords

    Label each vertex with its coordinates.

  --debug

    Print a summary of the input and output to stderr.

  -j, --json

    Write the rectangles and plot layout as JSON instead of an image.
",
        usage = usage(bin_name)
    )
}

fn parse_args(mut parser: lexopt::Parser) -> Result<Command, lexopt::Error> {
    use lexopt::prelude::*;

    let mut values = VecDeque::new();
    let mut debug = false;
    let mut output_format = OutputFormat::Image;
    let mut show_coords = false;

    while let Some(arg) = parser.next()? {
        match arg {
            Value(val) => values.push_back(val.string()?),
            Short('c') | Long("coords") => {
                show_coords = true;
            }
            Long("debug") => {
                debug = true;
            }
            Short('j') | Long("json") => {
                output_format = OutputFormat::Json;
            }
            Long("help") => {
                return Ok(Command::Help(help(
                    parser.bin_name().unwrap_or("rectplot"),
                )));
            }
            _ => return Err(arg.unexpected()),
        }
    }

    if !(1..=2).contains(&values.len()) {
        return Err(format!("expected 1 or 2 arguments, found {}", values.len()).into());
    }

    Ok(Command::Run(Args {
        input: values.pop_front().ok_or("missing `<input-file>` arg")?,
        output_path: values.pop_front(),
        output_format,
        show_coords,
        debug,
    }))
}

/// Adds context to an error reading or writing a file.
trait FileErrorContext<T> {
    /// If `self` represents a failed operation on a file, wrap the error with
    /// a message of the form "{context} \"{path}\"".
    fn file_error_context<P: fmt::Display>(self, context: &str, path: P) -> anyhow::Result<T>;
}

impl<T, E> FileErrorContext<T> for Result<T, E>
where
    Result<T, E>: Context<T, E>,
{
    fn file_error_context<P: fmt::Display>(self, context: &str, path: P) -> anyhow::Result<T> {
        self.with_context(|| format!("{} \"{}\"", context, path))
    }
}

/// Return true if `a` and `b` name the same file.
///
/// Paths which do not exist yet are compared as written.
fn is_same_file(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Format the `--debug` summary of the input listing.
fn debug_summary(input: &str, rects: &RectangleSet) -> Vec<String> {
    let mut lines = vec![format!(
        "Read {} rectangles from \"{}\"",
        rects.len(),
        input
    )];
    if let Some(bounds) = rects.bounds() {
        let reported = rects
            .reported_area()
            .map(|area| area.to_string())
            .unwrap_or_else(|| "none".to_string());
        lines.push(format!(
            "Bounding box x [{}, {}] y [{}, {}], area {} (reported {})",
            bounds.x_min,
            bounds.x_max,
            bounds.y_min,
            bounds.y_max,
            bounds.area(),
            reported,
        ));
    }

    let total_area = rects.total_area();
    match rects.reported_area() {
        Some(reported) if reported > 0 => lines.push(format!(
            "Rectangle area {} ({:.1}% of reported area)",
            total_area,
            100. * total_area / reported as f64
        )),
        _ => lines.push(format!("Rectangle area {}", total_area)),
    }
    lines
}

fn run(args: Args) -> anyhow::Result<()> {
    let input_path = Path::new(&args.input);
    let output_path = args
        .output_path
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(|| default_output_path(input_path, args.output_format));

    if is_same_file(input_path, &output_path) {
        anyhow::bail!(
            "Output path \"{}\" would overwrite the input file",
            output_path.display()
        );
    }

    // Check the output format up front, so bad paths fail before any work.
    let image_format = match args.output_format {
        OutputFormat::Image => Some(image_format_for_path(&output_path)?),
        OutputFormat::Json => None,
    };

    let rects = read_rectangles(&args.input)
        .file_error_context("Failed to read rectangles from", &args.input)?;
    if rects.is_empty() {
        return Err(RenderError::EmptyInput)
            .file_error_context("Failed to plot rectangles from", &args.input);
    }

    if args.debug {
        for line in debug_summary(&args.input, &rects) {
            eprintln!("{}", line);
        }
    }

    match image_format {
        Some(format) => {
            let params = RenderParams {
                show_coords: args.show_coords,
                debug: args.debug,
                ..Default::default()
            };
            let img = render_rectangles(&rects, &params)?;
            write_image(&output_path, img.view(), format, params.dpi)
                .file_error_context("Failed to write image to", output_path.display())?;
        }
        None => {
            let content = format_json_output(FormatJsonArgs {
                input_path: &args.input,
                rects: &rects,
            });
            write_file_atomic(&output_path, |file| {
                use std::io::Write;
                file.write_all(content.as_bytes())?;
                Ok(())
            })
            .file_error_context("Failed to write JSON to", output_path.display())?;
        }
    }

    if args.debug {
        eprintln!("Wrote \"{}\"", output_path.display());
    }

    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = match parse_args(lexopt::Parser::from_env()) {
        Ok(Command::Run(args)) => args,
        Ok(Command::Help(text)) => {
            println!("{}", text);
            std::process::exit(0);
        }
        Err(err) => {
            eprintln!("{}\n\n{}", err, usage("rectplot"));
            std::process::exit(USAGE_EXIT_CODE);
        }
    };
    run(args)
}
