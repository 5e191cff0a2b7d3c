use anyhow::{Context, Result};
use clap::Parser;
use passenger_eda::display::DirectorySink;
use passenger_eda::error::EdaError;
use passenger_eda::pipeline::{self, PipelineOptions, PipelineOutcome};
use passenger_eda::RenderOptions;
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "passenger-eda")]
#[command(about = "Exploratory data analysis of a passenger CSV dataset", long_about = None)]
struct Args {
    /// Directory the rendered charts are written to
    #[arg(long, default_value = "eda_charts")]
    output_dir: PathBuf,

    /// Stop after this many file names that do not exist (default: keep asking)
    #[arg(long)]
    max_attempts: Option<usize>,

    /// Wait for Enter after each chart
    #[arg(long)]
    pause: bool,

    /// Render options as JSON (e.g. '{"dpi": 150, "type": "svg"}')
    #[arg(long)]
    render_options: Option<String>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let render = match &args.render_options {
        Some(json) => RenderOptions::from_json(json).context("Failed to parse --render-options")?,
        None => RenderOptions::default(),
    };
    let options = PipelineOptions {
        max_attempts: args.max_attempts,
        render,
        ..PipelineOptions::default()
    };

    let cwd = std::env::current_dir().context("Failed to determine working directory")?;
    let mut sink = DirectorySink::new(args.output_dir, args.pause);

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let stdout = io::stdout();
    let mut output = stdout.lock();

    match pipeline::run(&mut input, &mut output, &cwd, &options, &mut sink) {
        Ok(PipelineOutcome::Aborted) => Ok(()),
        Ok(PipelineOutcome::Completed(report)) => {
            log::info!(
                "Wrote {} chart(s) to {} for {}",
                sink.written().len(),
                sink.dir().display(),
                report.source.display()
            );
            Ok(())
        }
        Err(e) if e.downcast_ref::<EdaError>().is_some_and(EdaError::is_load_failure) => {
            writeln!(output, "Error loading dataset: {}", e).context("Failed to write to stdout")?;
            output.flush().context("Failed to flush stdout")?;
            std::process::exit(1);
        }
        Err(e) => Err(e),
    }
}
