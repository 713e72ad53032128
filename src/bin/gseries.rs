use clap::ErrorKind;
use env_logger::Env;
use gseries::draw::Figure;
use gseries::plot::{parse_cli, CliError, PlotConfig};
use gseries::DiscreteSeries;
use log::info;

fn run(cfg: &PlotConfig) -> gseries::Result<()> {
    let series = match &cfg.infile {
        Some(fin) => DiscreteSeries::read_binary(fin)?,
        None => DiscreteSeries::read_stdin()?,
    };
    let figure = Figure::new(&series, &cfg.selection, cfg.appearance.ylim)?;
    figure.save(&cfg.appearance, &cfg.outfile)
}

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let cfg = match parse_cli() {
        Ok(cfg) => cfg,
        Err(CliError::Clap(e)) if e.kind == ErrorKind::HelpDisplayed => e.exit(),
        Err(CliError::Clap(e)) if e.kind == ErrorKind::VersionDisplayed => e.exit(),
        Err(e) => {
            eprintln!("gseries: {}", e);
            std::process::exit(1);
        }
    };
    info!(
        "read data from {} and draw to {}",
        cfg.infile
            .as_ref()
            .map_or_else(|| String::from("stdin"), |p| p.display().to_string()),
        cfg.outfile.display()
    );
    if let Err(e) = run(&cfg) {
        eprintln!("gseries: {}", e);
        std::process::exit(1);
    }
}
