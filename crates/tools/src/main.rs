use std::path::PathBuf;

use clap::{Parser, Subcommand};
use flowmap_web::IdTrim;
use formats::load_dataset_files;
use foundation::ViewportSize;
use tools::{HoverTarget, inspect, tooltip_html};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Inspect flow map datasets offline.
#[derive(Debug, Parser)]
#[command(name = "flowmap", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, clap::Args)]
struct DatasetArgs {
    /// CSV with id,name,lat,lon columns.
    #[arg(long)]
    locations: PathBuf,
    /// CSV with origin,dest,count columns.
    #[arg(long)]
    flows: PathBuf,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print row counts and the initial camera as JSON.
    Inspect {
        #[command(flatten)]
        dataset: DatasetArgs,
        #[arg(long, default_value_t = 1280.0)]
        width: f64,
        #[arg(long, default_value_t = 720.0)]
        height: f64,
        #[arg(long, default_value_t = 0.3)]
        pad: f64,
    },
    /// Print the tooltip HTML shown when hovering a location or a flow.
    Tooltip {
        #[command(flatten)]
        dataset: DatasetArgs,
        #[arg(long, conflicts_with = "flow", required_unless_present = "flow")]
        location: Option<String>,
        #[arg(long, num_args = 2, value_names = ["ORIGIN", "DEST"])]
        flow: Option<Vec<String>>,
        /// Characters trimmed from each end of flow ids.
        #[arg(long, default_value_t = 2)]
        trim: usize,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = real_main(Cli::parse()) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn real_main(cli: Cli) -> Result<(), String> {
    match cli.command {
        Command::Inspect {
            dataset,
            width,
            height,
            pad,
        } => {
            let ds = load_dataset_files(&dataset.locations, &dataset.flows)
                .map_err(|e| e.to_string())?;
            info!(
                locations = ds.locations.len(),
                flows = ds.flows.len(),
                "dataset loaded"
            );
            let report = inspect(&ds, ViewportSize::new(width, height), pad);
            let json = serde_json::to_string_pretty(&report).map_err(|e| e.to_string())?;
            println!("{json}");
            Ok(())
        }
        Command::Tooltip {
            dataset,
            location,
            flow,
            trim,
        } => {
            let target = match (location, flow) {
                (Some(id), _) => HoverTarget::Location(id),
                (None, Some(mut pair)) if pair.len() == 2 => {
                    let dest = pair.pop().unwrap_or_default();
                    let origin = pair.pop().unwrap_or_default();
                    HoverTarget::Flow { origin, dest }
                }
                _ => return Err("either --location or --flow ORIGIN DEST is required".to_string()),
            };
            let ds = load_dataset_files(&dataset.locations, &dataset.flows)
                .map_err(|e| e.to_string())?;
            let trim = IdTrim {
                leading: trim,
                trailing: trim,
            };
            match tooltip_html(ds, &target, trim) {
                Some(html) => println!("{html}"),
                None => return Err(format!("nothing to show for {target:?}")),
            }
            Ok(())
        }
    }
}
