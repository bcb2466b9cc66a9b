use std::process::ExitCode;

fn main() -> ExitCode {
    match dating_journal::run() {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "journal-doctor failed");
            eprintln!("journal-doctor: {e}");
            ExitCode::FAILURE
        }
    }
}
