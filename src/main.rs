fn main() {
    if let Err(e) = shopcmp::cli::run() {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
