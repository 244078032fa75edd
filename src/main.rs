#![allow(non_snake_case)]
use RustedExprTree::Examples::symbolic_examples::{NUMBER_OF_EXAMPLES, sym_examples};
use RustedExprTree::Utils::logger::{init_logger, log_file_name, read_task_file};
use RustedExprTree::Utils::task::{EngineTask, TaskError};
use log::{LevelFilter, error, info};
use std::env;
use std::process::ExitCode;

/// `RustedExprTree <task-file>` runs a task document, without arguments all examples are run
fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();
    match args.get(1) {
        Some(path) => match run_task(path) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                error!("{}", e);
                eprintln!("{}", e);
                ExitCode::FAILURE
            }
        },
        None => {
            init_logger(LevelFilter::Info, None);
            for example in 0..NUMBER_OF_EXAMPLES {
                println!("\n___________________ example {} ___________________", example);
                sym_examples(example);
            }
            ExitCode::SUCCESS
        }
    }
}

fn run_task(path: &str) -> Result<(), TaskError> {
    let document = read_task_file(path)?;
    let task = EngineTask::from_document(&document)?;
    let log_file = match task.log_file.as_deref() {
        Some("auto") => Some(log_file_name()),
        other => other.map(String::from),
    };
    init_logger(task.log_level, log_file.as_deref());
    info!("task {} loaded", path);
    let report = task.run()?;
    println!("{}", report);
    if let Some(sampling) = &task.sampling {
        println!("{}", report.samples_table(sampling.variable));
    }
    Ok(())
}
