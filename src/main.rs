use std::process::exit;

fn main() {
    if let Err(message) = rowdeck::app::run_cli() {
        rowdeck::app::report_failure(&message);
        exit(1);
    }
}
