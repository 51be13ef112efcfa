//! reads real-time vehicle position reports and writes MF-JSON trajectories,
//! or combines previously written trajectories into daily files.
use bambam_mfjson::app::MfjsonApp;
use clap::Parser;

fn main() {
    env_logger::init();
    let args = MfjsonApp::parse();
    match args.op.run() {
        Ok(_) => log::info!("finished."),
        Err(e) => {
            log::error!("failed running bambam_mfjson: {e}");
            std::process::exit(1);
        }
    }
}
