use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    dsa_stepper::cli::run_cli()
}
