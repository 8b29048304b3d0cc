use obfsh_core::{ConsoleReporter, Reporter};

fn real_main() -> anyhow::Result<i32> {
    obfsh_cli::run(std::env::args_os())
}

fn main() {
    let code = match real_main() {
        Ok(code) => code,
        Err(err) => {
            ConsoleReporter::new().fail(&format!("{err:#}"));
            1
        }
    };
    std::process::exit(code);
}
