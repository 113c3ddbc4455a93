fn main() {
    if let Err(err) = facet_board::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
