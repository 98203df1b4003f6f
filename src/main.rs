use kubessh_lib::logging::{init_logging, LogFormat};
use std::path::PathBuf;
use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = init_logging(LogFormat::from_env()) {
        eprintln!("warning: {}", e);
    }

    let Some(settings) = std::env::args_os().nth(1).map(PathBuf::from) else {
        eprintln!("usage: kubessh <settings.json>");
        return ExitCode::from(2);
    };

    match kubessh_lib::run(&settings) {
        Ok(report) => match serde_json::to_string_pretty(&report) {
            Ok(json) => {
                println!("{}", json);
                ExitCode::SUCCESS
            }
            Err(e) => {
                log::error!("Failed to encode report: {}", e);
                ExitCode::FAILURE
            }
        },
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
