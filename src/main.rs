use docker_stackx::plugin::decode_args;
use docker_stackx::{Stackx, StackxError, logging};

fn main() {
    let app = Stackx::from_process();
    logging::init(&app.settings().log_filter);

    let result = decode_args(std::env::args_os().skip(1))
        .map_err(anyhow::Error::from)
        .and_then(|args| {
            let args: Vec<&str> = args.iter().map(String::as_str).collect();
            app.run(&args)
        });

    let code = match result {
        Ok(code) => code,
        Err(err) => {
            let known = err.downcast_ref::<StackxError>();
            if !known.is_some_and(StackxError::is_reported) {
                eprintln!("ERROR: {err:#}");
            }
            known.map_or(1, StackxError::exit_code)
        }
    };
    std::process::exit(code);
}
