use workup_cli::input::Input;
use workup_cli::runner::Runner;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::default()
        .filter_level(log::LevelFilter::Error)
        .parse_env(env_logger::Env::default().filter_or("WORKUP_LOG", "error,workup=info"))
        .init();

    let matches = workup_cli::command().get_matches();

    let input = Input::from_arguments(matches)?;

    let runner = input.build().map(Runner::new)?;
    runner.run()?;

    Ok(())
}
