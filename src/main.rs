fn main() {
    if let Err(err) = kaggle_client::run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}
