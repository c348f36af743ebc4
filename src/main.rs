fn main() {
    if let Err(err) = waas_codegen::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
