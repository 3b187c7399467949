fn main() {
    if let Err(e) = pigment_cli::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
