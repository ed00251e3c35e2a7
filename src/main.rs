use std::process::ExitCode;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vslam_replay::cli::{ArgumentError, parse_args};
use vslam_replay::replay::{ReplayError, run_replay};

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vslam_replay=info,stereo_replay=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = match parse_args(std::env::args_os()) {
        Ok(config) => config,
        Err(e @ ArgumentError::Info(_)) => {
            println!("{}", e);
            return ExitCode::from(e.exit_code());
        }
        Err(e) => {
            eprintln!("\n{}", e);
            return ExitCode::from(e.exit_code());
        }
    };

    match run_replay(&config) {
        Ok(report) => {
            println!("-------");
            println!("Processed images: {}", report.frames);
            match report.timing {
                Some(summary) => println!("{}", summary),
                None => println!("tracking time: no data"),
            }
            println!("Trajectory saved to {}", report.trajectory_path.display());
            ExitCode::SUCCESS
        }
        Err(ReplayError::FrameDecode(e)) => {
            eprintln!("\n{}", e);
            ExitCode::from(1)
        }
        Err(e) => {
            eprintln!("\n{}", e);
            ExitCode::from(1)
        }
    }
}
