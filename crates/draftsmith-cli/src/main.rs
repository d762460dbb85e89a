use draftsmith_cli::{command, flag, init_tracing, run};

fn main() {
    let matches = command().get_matches();
    init_tracing(flag(&matches, "verbose"), flag(&matches, "json"));

    match run(&matches, &mut std::io::stdout()) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err:#}");
            std::process::exit(2);
        }
    }
}
