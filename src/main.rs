fn main() {
    if let Err(err) = trace_graph::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
