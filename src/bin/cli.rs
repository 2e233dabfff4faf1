use colored::Colorize;
use structopt::StructOpt;

use dvsky::cli::base::Matcher;
use dvsky::cli::harvest::HarvestSubCommand;
use dvsky::cli::post::PostSubCommand;

static HEADER: &str = r#"
--- dvsky: announce Dataverse datasets on Bluesky ---
"#;

#[derive(StructOpt, Debug)]
#[structopt(about = "Harvest Dataverse datasets and announce them on Bluesky")]
enum DvSky {
    Harvest(HarvestSubCommand),
    Post(PostSubCommand),
}

fn main() {
    let cli = DvSky::from_args();

    if atty::is(atty::Stream::Stdout) {
        println!("{}", HEADER.bold());
    }

    match cli {
        DvSky::Harvest(command) => command.process(),
        DvSky::Post(command) => command.process(),
    }
}
