fn main() {
    if let Err(e) = archview_cli::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
